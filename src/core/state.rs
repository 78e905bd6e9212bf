//! TT-008: State resolution — addresses from `terraform state list`.
//!
//! The state inventory is already flat: every line is a fully-qualified
//! address. Module addresses are synthesized from the `module.<name>`
//! prefixes of those lines, then everything deeper than `max_depth` is
//! filtered out.

use super::address::{depth, module_prefixes};
use super::error::{Error, Result};
use super::normalize::cleanup_and_sort;
use super::types::Address;
use crate::transport::local;
use indexmap::IndexSet;
use std::path::Path;

/// Source of live addresses for a working directory.
pub trait StateInventory {
    fn list(&self, dir: &Path) -> Result<Vec<String>>;
}

/// Runs `<program> state list` in the working directory.
#[derive(Debug, Clone)]
pub struct TerraformStateInventory {
    pub program: String,
}

impl TerraformStateInventory {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for TerraformStateInventory {
    fn default() -> Self {
        Self::new("terraform")
    }
}

impl StateInventory for TerraformStateInventory {
    fn list(&self, dir: &Path) -> Result<Vec<String>> {
        let out = local::run(&self.program, &["state", "list"], Some(dir))?;
        if !out.success() {
            return Err(Error::StateInventory {
                dir: dir.to_path_buf(),
                exit_code: out.exit_code,
                stderr: out.stderr.trim().to_string(),
            });
        }
        Ok(out.stdout.lines().map(str::to_string).collect())
    }
}

/// Fixed inventory served from memory.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct StaticInventory {
    pub lines: Vec<String>,
}

#[cfg(test)]
impl StaticInventory {
    pub fn new<S: AsRef<str>>(lines: &[S]) -> Self {
        Self {
            lines: lines.iter().map(|l| l.as_ref().to_string()).collect(),
        }
    }
}

#[cfg(test)]
impl StateInventory for StaticInventory {
    fn list(&self, _dir: &Path) -> Result<Vec<String>> {
        Ok(self.lines.clone())
    }
}

/// Add the module addresses implied by `raw_lines` and drop anything deeper
/// than `max_depth`. The result is neither trimmed nor sorted.
pub fn resolve_from_state<S: AsRef<str>>(raw_lines: &[S], max_depth: usize) -> Vec<Address> {
    let mut modules: IndexSet<String> = IndexSet::new();
    for line in raw_lines {
        for prefix in module_prefixes(line.as_ref().trim()) {
            modules.insert(prefix);
        }
    }

    raw_lines
        .iter()
        .map(|l| l.as_ref().to_string())
        .chain(modules)
        .filter(|a| depth(a.trim()) <= max_depth)
        .collect()
}

/// List the inventory for `dir` and turn it into a sorted address list.
///
/// An inventory failure is returned as-is; no partial list is produced.
pub fn state_addresses(
    inventory: &dyn StateInventory,
    dir: &Path,
    max_depth: usize,
) -> Result<Vec<Address>> {
    let lines = inventory.list(dir)?;
    tracing::debug!(dir = %dir.display(), lines = lines.len(), "read state inventory");
    Ok(cleanup_and_sort(&resolve_from_state(&lines, max_depth)))
}
