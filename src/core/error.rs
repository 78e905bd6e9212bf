//! TT-002: Error types.
//!
//! Only path-level failures live here. Anything a single module or file can
//! get wrong is a [`Diagnostic`](super::types::Diagnostic) instead.

use std::path::PathBuf;

/// Result type for tftarget operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Hard failures that end the current command.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Manifest file exists but could not be read
    #[error("could not load manifest file '{}': {source}", path.display())]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Manifest file is not valid JSON
    #[error("could not decode manifest file '{}': {source}", path.display())]
    ManifestDecode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A subprocess could not be started
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The state inventory command exited non-zero
    #[error("state list failed in {} (exit {exit_code}): {stderr}", dir.display())]
    StateInventory {
        dir: PathBuf,
        exit_code: i32,
        stderr: String,
    },

    /// A required executable is not on PATH
    #[error("could not find {program} in PATH")]
    CommandNotFound { program: String },

    /// The interactive chooser failed
    #[error("chooser failed: {0}")]
    Chooser(String),

    /// The operator picked nothing or cancelled
    #[error("nothing selected")]
    NothingSelected,

    /// Resolution produced an empty address list
    #[error("no modules or resources found in {}", root.display())]
    NoAddresses { root: PathBuf },

    /// Replacing the current process failed
    #[error("could not exec {program}: {source}")]
    Exec {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<dialoguer::Error> for Error {
    fn from(e: dialoguer::Error) -> Self {
        Error::Chooser(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tt002_display_no_addresses() {
        let e = Error::NoAddresses {
            root: PathBuf::from("infra"),
        };
        assert_eq!(e.to_string(), "no modules or resources found in infra");
    }

    #[test]
    fn test_tt002_display_state_inventory() {
        let e = Error::StateInventory {
            dir: PathBuf::from("/tf"),
            exit_code: 1,
            stderr: "No state file was found!".to_string(),
        };
        let msg = e.to_string();
        assert!(msg.contains("/tf"));
        assert!(msg.contains("exit 1"));
        assert!(msg.contains("No state file"));
    }

    #[test]
    fn test_tt002_manifest_decode_source() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let e = Error::ManifestDecode {
            path: PathBuf::from("modules.json"),
            source,
        };
        assert!(e.to_string().starts_with("could not decode manifest file 'modules.json'"));
        assert!(std::error::Error::source(&e).is_some());
    }

    #[test]
    fn test_tt002_io_from() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let e: Error = io.into();
        assert!(matches!(e, Error::Io(_)));
        assert_eq!(e.to_string(), "gone");
    }
}
