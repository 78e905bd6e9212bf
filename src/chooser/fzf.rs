//! `fzf` multi-select subprocess.

use super::Chooser;
use crate::core::error::{Error, Result};
use crate::transport::{find_in_path, local};

/// fzf exit code when nothing matched the query.
const EXIT_NO_MATCH: i32 = 1;
/// fzf exit code when the operator pressed escape or ctrl-c.
const EXIT_INTERRUPTED: i32 = 130;

/// Pipes options into `fzf -m` and reads the picked lines back.
#[derive(Debug, Clone)]
pub struct FzfChooser {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for FzfChooser {
    fn default() -> Self {
        Self {
            program: "fzf".to_string(),
            args: vec![
                "-m".to_string(),
                "--preview=printf '%s\\n' {+}".to_string(),
            ],
        }
    }
}

impl FzfChooser {
    /// Default fzf chooser, failing early when fzf is not installed.
    pub fn locate() -> Result<Self> {
        let chooser = Self::default();
        if find_in_path(&chooser.program).is_none() {
            return Err(Error::CommandNotFound {
                program: format!("{} (see https://github.com/junegunn/fzf)", chooser.program),
            });
        }
        Ok(chooser)
    }
}

impl Chooser for FzfChooser {
    fn choose(&self, options: &[String]) -> Result<Option<Vec<String>>> {
        let args: Vec<&str> = self.args.iter().map(String::as_str).collect();
        let input = options.join("\n");
        let out = local::run_with_input(&self.program, &args, &input)?;

        match out.exit_code {
            0 => {
                let picked: Vec<String> = out
                    .stdout
                    .lines()
                    .filter(|l| !l.trim().is_empty())
                    .map(str::to_string)
                    .collect();
                Ok((!picked.is_empty()).then_some(picked))
            }
            EXIT_NO_MATCH | EXIT_INTERRUPTED => Ok(None),
            code => Err(Error::Chooser(format!(
                "{} exited with status {}",
                self.program, code
            ))),
        }
    }
}
