//! TT-005: Configuration loading — module calls and managed resources of one directory.
//!
//! Reads every `*.tf` (HCL) and `*.tf.json` file in a directory, primary
//! files first and override files (`override.tf`, `*_override.tf`) last,
//! each group in file-name order. Only `module` and `resource` blocks are
//! inspected; expressions are never evaluated.
//!
//! Problems with individual files become diagnostics. The loader always
//! returns whatever it managed to read.

use super::types::{ConfigModule, Diagnostic, ManagedResource, ModuleCall};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

/// Source of per-directory module contents.
pub trait ConfigLoader {
    /// Load the module rooted at `dir`, appending findings to `diagnostics`.
    fn load_module(&self, dir: &Path, diagnostics: &mut Vec<Diagnostic>) -> ConfigModule;
}

/// Loader reading Terraform files from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsLoader;

impl ConfigLoader for FsLoader {
    fn load_module(&self, dir: &Path, diagnostics: &mut Vec<Diagnostic>) -> ConfigModule {
        let mut decls = Declarations::default();

        if !dir.is_dir() {
            diagnostics.push(Diagnostic::error("failed to read module directory").at(dir));
            return decls.into_module(dir);
        }

        for file in config_files(dir, diagnostics) {
            let content = match std::fs::read_to_string(&file) {
                Ok(c) => c,
                Err(e) => {
                    diagnostics.push(Diagnostic::error(format!("cannot read file: {}", e)).at(&file));
                    continue;
                }
            };
            let is_override = is_override_file(&file);
            let result = if is_json_file(&file) {
                parse_json(&content, &mut decls, is_override)
            } else {
                parse_hcl(&content, &mut decls, is_override)
            };
            if let Err(message) = result {
                diagnostics.push(Diagnostic::error(message).at(&file));
            }
        }

        for message in decls.duplicates.drain(..) {
            diagnostics.push(Diagnostic::error(message).at(dir));
        }

        decls.into_module(dir)
    }
}

/// Loader serving modules from memory, keyed by directory.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    modules: std::collections::HashMap<PathBuf, ConfigModule>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module under `dir`. Replaces any previous one.
    pub fn insert(&mut self, dir: impl Into<PathBuf>, module: ConfigModule) {
        let dir = dir.into();
        let mut module = module;
        module.path.clone_from(&dir);
        self.modules.insert(dir, module);
    }

    /// Builder form of [`MemoryLoader::insert`].
    pub fn with(mut self, dir: impl Into<PathBuf>, module: ConfigModule) -> Self {
        self.insert(dir, module);
        self
    }
}

impl ConfigLoader for MemoryLoader {
    fn load_module(&self, dir: &Path, diagnostics: &mut Vec<Diagnostic>) -> ConfigModule {
        match self.modules.get(dir) {
            Some(m) => m.clone(),
            None => {
                diagnostics.push(Diagnostic::error("failed to read module directory").at(dir));
                ConfigModule::new(dir)
            }
        }
    }
}

/// Module calls and resources collected across the files of one directory.
#[derive(Debug, Default)]
struct Declarations {
    module_calls: IndexMap<String, ModuleCall>,
    resources: IndexMap<(String, String), ManagedResource>,
    duplicates: Vec<String>,
}

impl Declarations {
    fn add_module_call(&mut self, name: &str, source: Option<String>, is_override: bool) {
        if let Some(existing) = self.module_calls.get_mut(name) {
            if is_override {
                if source.is_some() {
                    existing.source = source;
                }
            } else {
                self.duplicates
                    .push(format!("duplicate module call \"{}\"", name));
            }
            return;
        }
        self.module_calls.insert(
            name.to_string(),
            ModuleCall {
                name: name.to_string(),
                source,
            },
        );
    }

    fn add_resource(&mut self, kind: &str, name: &str, is_override: bool) {
        let key = (kind.to_string(), name.to_string());
        if self.resources.contains_key(&key) {
            if !is_override {
                self.duplicates
                    .push(format!("duplicate resource \"{}.{}\"", kind, name));
            }
            return;
        }
        self.resources.insert(
            key,
            ManagedResource {
                kind: kind.to_string(),
                name: name.to_string(),
            },
        );
    }

    fn into_module(self, dir: &Path) -> ConfigModule {
        ConfigModule {
            path: dir.to_path_buf(),
            module_calls: self.module_calls.into_values().collect(),
            managed_resources: self.resources.into_values().collect(),
        }
    }
}

/// List configuration files of `dir`: primary files, then overrides.
fn config_files(dir: &Path, diagnostics: &mut Vec<Diagnostic>) -> Vec<PathBuf> {
    let options = glob::MatchOptions {
        require_literal_leading_dot: true,
        ..Default::default()
    };
    let base = glob::Pattern::escape(&dir.to_string_lossy());

    let mut files = Vec::new();
    for suffix in ["*.tf", "*.tf.json"] {
        let pattern = format!("{}/{}", base, suffix);
        let paths = match glob::glob_with(&pattern, options) {
            Ok(p) => p,
            Err(e) => {
                diagnostics.push(Diagnostic::error(format!("bad file pattern: {}", e)).at(dir));
                continue;
            }
        };
        for entry in paths {
            match entry {
                Ok(path) if path.is_file() => files.push(path),
                Ok(_) => {}
                Err(e) => {
                    diagnostics.push(Diagnostic::error(format!("cannot list file: {}", e)).at(dir))
                }
            }
        }
    }

    files.sort_by(|a, b| {
        is_override_file(a)
            .cmp(&is_override_file(b))
            .then_with(|| a.file_name().cmp(&b.file_name()))
    });
    files
}

fn is_json_file(path: &Path) -> bool {
    path.to_string_lossy().ends_with(".tf.json")
}

fn is_override_file(path: &Path) -> bool {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let stem = name
        .strip_suffix(".tf.json")
        .or_else(|| name.strip_suffix(".tf"))
        .unwrap_or(&name);
    stem == "override" || stem.ends_with("_override")
}

/// Collect `module` and `resource` blocks from HCL source.
fn parse_hcl(content: &str, decls: &mut Declarations, is_override: bool) -> Result<(), String> {
    let body = hcl::parse(content).map_err(|e| format!("HCL parse error: {}", e))?;

    for block in body.blocks() {
        let labels: Vec<&str> = block.labels().iter().map(|l| l.as_str()).collect();
        match (block.identifier(), labels.as_slice()) {
            ("module", [name]) => {
                let source = block
                    .body()
                    .attributes()
                    .find(|a| a.key() == "source")
                    .and_then(|a| match a.expr() {
                        hcl::Expression::String(s) => Some(s.clone()),
                        _ => None,
                    });
                decls.add_module_call(name, source, is_override);
            }
            ("resource", [kind, name]) => decls.add_resource(kind, name, is_override),
            ("module", _) | ("resource", _) => {
                return Err(format!(
                    "{} block has unexpected labels: {:?}",
                    block.identifier(),
                    labels
                ));
            }
            _ => {}
        }
    }

    Ok(())
}

/// Collect `module` and `resource` objects from Terraform JSON syntax.
fn parse_json(content: &str, decls: &mut Declarations, is_override: bool) -> Result<(), String> {
    let root: serde_json::Value =
        serde_json::from_str(content).map_err(|e| format!("JSON parse error: {}", e))?;
    let root = root
        .as_object()
        .ok_or_else(|| "JSON configuration root must be an object".to_string())?;

    if let Some(modules) = root.get("module") {
        let modules = modules
            .as_object()
            .ok_or_else(|| "\"module\" must be an object".to_string())?;
        for (name, body) in modules {
            decls.add_module_call(name, json_source(body), is_override);
        }
    }

    if let Some(resources) = root.get("resource") {
        let kinds = resources
            .as_object()
            .ok_or_else(|| "\"resource\" must be an object".to_string())?;
        for (kind, named) in kinds {
            let named = named
                .as_object()
                .ok_or_else(|| format!("resource type \"{}\" must be an object", kind))?;
            for name in named.keys() {
                decls.add_resource(kind, name, is_override);
            }
        }
    }

    Ok(())
}

/// `source` of a JSON module body; bodies may also be a list of objects.
fn json_source(body: &serde_json::Value) -> Option<String> {
    match body {
        serde_json::Value::Object(map) => map
            .get("source")
            .and_then(|s| s.as_str())
            .map(str::to_string),
        serde_json::Value::Array(items) => items.iter().find_map(json_source),
        _ => None,
    }
}
