//! TT-001: Core types — manifest, configuration modules, diagnostics.
//!
//! Addresses are plain strings. Everything here is read-only once built:
//! a manifest is loaded once per run, a `ConfigModule` is produced fresh for
//! every directory visited, and a `Resolution` is handed to the caller.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// A fully-qualified resource or module address, e.g.
/// `module.network.aws_subnet.private`.
pub type Address = String;

// ============================================================================
// Module manifest
// ============================================================================

/// One entry of `.terraform/modules/modules.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Dotted module path relative to the root (`""` for the root module)
    #[serde(rename = "Key")]
    pub key: String,

    /// Module source as written in the module call
    #[serde(rename = "Source", default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Registry version, when the module came from a registry
    #[serde(rename = "Version", default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Materialized directory, relative to the manifest base directory
    #[serde(rename = "Dir")]
    pub dir: String,
}

/// On-disk shape of the manifest file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManifestFile {
    #[serde(rename = "Modules", default)]
    pub modules: Vec<ManifestEntry>,
}

/// Loaded manifest: module key to source directory.
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    /// Directory that entry `Dir` values are relative to
    pub base_dir: PathBuf,

    /// Entries by key (insertion order of the file; later duplicates win)
    pub entries: IndexMap<String, ManifestEntry>,
}

impl Manifest {
    /// Build a manifest from parsed entries.
    pub fn new(base_dir: impl Into<PathBuf>, modules: Vec<ManifestEntry>) -> Self {
        let mut entries = IndexMap::with_capacity(modules.len());
        for entry in modules {
            entries.insert(entry.key.clone(), entry);
        }
        Self {
            base_dir: base_dir.into(),
            entries,
        }
    }

    /// An empty manifest rooted at `base_dir`. Every lookup misses.
    pub fn empty(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            entries: IndexMap::new(),
        }
    }

    /// Source directory for a module key, joined onto the base directory.
    pub fn find_dir(&self, key: &str) -> Option<PathBuf> {
        self.entries.get(key).map(|e| self.base_dir.join(&e.dir))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

// ============================================================================
// Configuration modules
// ============================================================================

/// A `module "<name>" { source = ... }` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleCall {
    pub name: String,
    pub source: Option<String>,
}

/// A `resource "<kind>" "<name>"` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedResource {
    pub kind: String,
    pub name: String,
}

/// What one configuration directory declares.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigModule {
    /// Directory the module was loaded from
    pub path: PathBuf,

    /// Child module calls, in declaration order
    pub module_calls: Vec<ModuleCall>,

    /// Managed resources, in declaration order
    pub managed_resources: Vec<ManagedResource>,
}

impl ConfigModule {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Add a module call (builder style).
    pub fn call(mut self, name: &str, source: &str) -> Self {
        self.module_calls.push(ModuleCall {
            name: name.to_string(),
            source: Some(source.to_string()),
        });
        self
    }

    /// Add a managed resource (builder style).
    pub fn resource(mut self, kind: &str, name: &str) -> Self {
        self.managed_resources.push(ManagedResource {
            kind: kind.to_string(),
            name: name.to_string(),
        });
        self
    }
}

// ============================================================================
// Diagnostics
// ============================================================================

/// Severity of a non-fatal finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A non-fatal finding collected during resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub path: Option<PathBuf>,
}

impl Diagnostic {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            path: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            path: None,
        }
    }

    /// Attach the file or directory the finding refers to.
    pub fn at(mut self, path: &Path) -> Self {
        self.path = Some(path.to_path_buf());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)?;
        if let Some(ref path) = self.path {
            write!(f, " ({})", path.display())?;
        }
        Ok(())
    }
}

// ============================================================================
// Resolution result
// ============================================================================

/// Addresses produced by a resolver plus the diagnostics collected on the way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub addresses: Vec<Address>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Resolution {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// Options shared by both resolution strategies.
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Root configuration directory
    pub root: PathBuf,

    /// How many levels of module calls to descend into
    pub max_depth: usize,

    /// Treat an unreadable or malformed manifest as fatal
    pub strict_manifest: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            max_depth: 0,
            strict_manifest: false,
        }
    }
}
