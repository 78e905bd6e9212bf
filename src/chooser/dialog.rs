//! Terminal multi-select prompt.

use super::Chooser;
use crate::core::error::Result;
use dialoguer::MultiSelect;

/// `dialoguer` multi-select. Space toggles, enter confirms, escape cancels.
#[derive(Debug, Clone)]
pub struct DialogChooser {
    pub prompt: String,
}

impl Default for DialogChooser {
    fn default() -> Self {
        Self {
            prompt: "Select targets (space to toggle, enter to confirm)".to_string(),
        }
    }
}

impl Chooser for DialogChooser {
    fn choose(&self, options: &[String]) -> Result<Option<Vec<String>>> {
        let picked = MultiSelect::new()
            .with_prompt(self.prompt.as_str())
            .items(options)
            .max_length(20)
            .interact_opt()?;

        Ok(picked
            .filter(|indices| !indices.is_empty())
            .map(|indices| indices.into_iter().map(|i| options[i].clone()).collect()))
    }
}
