//! tftarget — resolve Terraform addresses and pick `-target` sets.
//!
//! Walks a configuration's module tree (or its state inventory), lists every
//! resource and module address up to a chosen depth, and hands the operator's
//! pick to a downstream command.

pub mod chooser;
pub mod cli;
pub mod core;
pub mod logging;
pub mod transport;
