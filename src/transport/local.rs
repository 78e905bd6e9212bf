//! TT-011: Local execution.

use super::ExecOutput;
use crate::core::error::{Error, Result};
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

/// Run a command and capture stdout and stderr.
pub fn run(program: &str, args: &[&str], cwd: Option<&Path>) -> Result<ExecOutput> {
    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }
    tracing::debug!(program, ?args, cwd = ?cwd, "running command");

    let output = cmd.output().map_err(|source| Error::Spawn {
        program: program.to_string(),
        source,
    })?;

    Ok(ExecOutput {
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    })
}

/// Run a command with `input` on stdin, capturing stdout.
/// Stderr stays attached to the terminal so interactive tools can draw on it.
pub fn run_with_input(program: &str, args: &[&str], input: &str) -> Result<ExecOutput> {
    tracing::debug!(program, ?args, bytes = input.len(), "running command with input");
    let spawn_err = |source| Error::Spawn {
        program: program.to_string(),
        source,
    };

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(spawn_err)?;

    if let Some(mut stdin) = child.stdin.take() {
        // The child may exit without reading everything (e.g. on cancel).
        if let Err(e) = stdin.write_all(input.as_bytes()) {
            if e.kind() != std::io::ErrorKind::BrokenPipe {
                return Err(Error::Io(e));
            }
        }
    }

    let output = child.wait_with_output()?;

    Ok(ExecOutput {
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::new(),
    })
}

/// Replace the current process with `bin`, passing `argv[1..]` as arguments
/// and `argv[0]` as the program name. Only returns on failure.
#[cfg(unix)]
pub fn exec(bin: &Path, argv: &[String]) -> Error {
    use std::os::unix::process::CommandExt;

    let mut cmd = Command::new(bin);
    if let Some((arg0, rest)) = argv.split_first() {
        cmd.arg0(arg0).args(rest);
    }
    let source = cmd.exec();
    Error::Exec {
        program: bin.display().to_string(),
        source,
    }
}

/// Run `bin` to completion and exit with its status.
#[cfg(not(unix))]
pub fn exec(bin: &Path, argv: &[String]) -> Error {
    let rest = argv.get(1..).unwrap_or_default();
    match Command::new(bin).args(rest).status() {
        Ok(status) => std::process::exit(status.code().unwrap_or(1)),
        Err(source) => Error::Exec {
            program: bin.display().to_string(),
            source,
        },
    }
}
