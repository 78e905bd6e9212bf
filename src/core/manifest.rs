//! TT-004: Module manifest loading — `.terraform/modules/modules.json`.

use super::error::{Error, Result};
use super::types::{Diagnostic, Manifest, ManifestFile};
use std::path::{Path, PathBuf};

/// Location of the manifest relative to the root configuration directory.
pub const MANIFEST_PATH: &str = ".terraform/modules/modules.json";

/// Derive the manifest path for a root configuration directory.
pub fn manifest_path(root: &Path) -> PathBuf {
    root.join(MANIFEST_PATH)
}

/// Parse a manifest from a string. Entry directories resolve against `base_dir`.
pub fn parse_manifest(json: &str, base_dir: &Path) -> serde_json::Result<Manifest> {
    let file: ManifestFile = serde_json::from_str(json)?;
    Ok(Manifest::new(base_dir, file.modules))
}

/// Load the manifest for `root`. Returns None if the file doesn't exist.
pub fn load_manifest(root: &Path) -> Result<Option<Manifest>> {
    let path = manifest_path(root);
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(&path).map_err(|source| Error::ManifestRead {
        path: path.clone(),
        source,
    })?;
    let manifest =
        parse_manifest(&content, root).map_err(|source| Error::ManifestDecode { path, source })?;
    Ok(Some(manifest))
}

/// Load the manifest, degrading to an empty one where allowed.
///
/// A missing file always degrades, with a warning. An unreadable or
/// malformed file degrades with an error diagnostic unless `strict` is set,
/// in which case the load error is returned.
pub fn load_or_empty(
    root: &Path,
    strict: bool,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Manifest> {
    match load_manifest(root) {
        Ok(Some(manifest)) => {
            tracing::debug!(
                path = %manifest_path(root).display(),
                entries = manifest.len(),
                "loaded module manifest"
            );
            Ok(manifest)
        }
        Ok(None) => {
            let path = manifest_path(root);
            diagnostics.push(
                Diagnostic::warning("module manifest not found, module calls will not be expanded")
                    .at(&path),
            );
            Ok(Manifest::empty(root))
        }
        Err(e) if strict => Err(e),
        Err(e) => {
            diagnostics.push(Diagnostic::error(e.to_string()));
            Ok(Manifest::empty(root))
        }
    }
}
