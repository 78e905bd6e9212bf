//! TT-012: Interactive choosers.
//!
//! A chooser shows the operator a list of options and returns the subset
//! they picked. `Ok(None)` means the operator cancelled or picked nothing.

pub mod dialog;
pub mod fzf;

pub use dialog::DialogChooser;
pub use fzf::FzfChooser;

use crate::core::error::Result;

/// Multi-select over a list of strings.
pub trait Chooser {
    fn choose(&self, options: &[String]) -> Result<Option<Vec<String>>>;
}
