//! TT-007: Manifest resolution — walk module calls on disk.
//!
//! Starting at the root configuration directory, lists every managed
//! resource and module call, then follows each call into the directory the
//! module manifest records for it, up to `max_depth` levels. Output at each
//! level is resources (sorted) followed by modules and their expansions
//! (sorted), using plain byte ordering so runs are reproducible.

use super::address::{child_prefix, manifest_key, module_address, resource_address};
use super::parser::ConfigLoader;
use super::types::{Address, Diagnostic, Manifest, Resolution};
use rustc_hash::FxHashSet;
use std::path::{Path, PathBuf};

/// Depth-first resolver over a module tree.
pub struct Resolver<'a, L: ConfigLoader + ?Sized> {
    loader: &'a L,
    manifest: &'a Manifest,
    max_depth: usize,
    diagnostics: Vec<Diagnostic>,
    // canonical directories on the current recursion path
    active: FxHashSet<PathBuf>,
}

impl<'a, L: ConfigLoader + ?Sized> Resolver<'a, L> {
    pub fn new(loader: &'a L, manifest: &'a Manifest, max_depth: usize) -> Self {
        Self {
            loader,
            manifest,
            max_depth,
            diagnostics: Vec::new(),
            active: FxHashSet::default(),
        }
    }

    /// Resolve the module in `dir`, whose addresses all start with `prefix`.
    pub fn resolve_dir(&mut self, dir: &Path, prefix: &str, depth: usize) -> Vec<Address> {
        if depth > self.max_depth {
            return Vec::new();
        }

        let guard = canonical(dir);
        if !self.active.insert(guard.clone()) {
            self.diagnostics.push(
                Diagnostic::warning(format!(
                    "module cycle detected at {}",
                    manifest_key(prefix.trim_end_matches('.'))
                ))
                .at(dir),
            );
            return Vec::new();
        }

        tracing::debug!(dir = %dir.display(), prefix, depth, "resolving module");
        let module = self.loader.load_module(dir, &mut self.diagnostics);
        tracing::debug!(
            dir = %module.path.display(),
            calls = module.module_calls.len(),
            resources = module.managed_resources.len(),
            "loaded module"
        );

        let mut modules = Vec::with_capacity(module.module_calls.len());
        for call in &module.module_calls {
            let name = module_address(prefix, &call.name);
            modules.push(name.clone());

            let key = manifest_key(&name);
            let Some(sub_dir) = self.manifest.find_dir(&key) else {
                self.diagnostics
                    .push(Diagnostic::warning(format!("no source dir found for {}", key)));
                continue;
            };

            let submodules = self.resolve_dir(&sub_dir, &child_prefix(&name), depth + 1);
            modules.extend(submodules);
        }

        self.active.remove(&guard);

        let mut resources: Vec<Address> = module
            .managed_resources
            .iter()
            .map(|r| resource_address(prefix, &r.kind, &r.name))
            .collect();

        modules.sort();
        resources.sort();

        resources.extend(modules);
        resources
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

/// Resolve every address reachable from `root` within `max_depth` levels.
pub fn resolve_manifest<L: ConfigLoader + ?Sized>(
    loader: &L,
    root: &Path,
    manifest: &Manifest,
    max_depth: usize,
) -> Resolution {
    let mut resolver = Resolver::new(loader, manifest, max_depth);
    let addresses = resolver.resolve_dir(root, "", 0);
    Resolution {
        addresses,
        diagnostics: resolver.into_diagnostics(),
    }
}

fn canonical(dir: &Path) -> PathBuf {
    std::fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::address::is_module_address;
    use crate::core::parser::{FsLoader, MemoryLoader};
    use crate::core::types::{ConfigModule, ManifestEntry};

    const ROOT: &str = "/cfg";

    fn entry(key: &str, dir: &str) -> ManifestEntry {
        ManifestEntry {
            key: key.to_string(),
            source: None,
            version: None,
            dir: dir.to_string(),
        }
    }

    /// root: two resources, modules `network` and `app`;
    /// network: one resource, module `subnet`; subnet: one resource;
    /// app: one resource.
    fn tree() -> (MemoryLoader, Manifest) {
        let loader = MemoryLoader::new()
            .with(
                ROOT,
                ConfigModule::default()
                    .resource("aws_instance", "web")
                    .resource("aws_eip", "ip")
                    .call("network", "./modules/network")
                    .call("app", "./modules/app"),
            )
            .with(
                "/cfg/modules/network",
                ConfigModule::default()
                    .resource("aws_vpc", "main")
                    .call("subnet", "../subnet"),
            )
            .with(
                "/cfg/modules/subnet",
                ConfigModule::default().resource("aws_subnet", "private"),
            )
            .with(
                "/cfg/modules/app",
                ConfigModule::default().resource("aws_lb", "front"),
            );
        let manifest = Manifest::new(
            ROOT,
            vec![
                entry("", "."),
                entry("network", "modules/network"),
                entry("network.subnet", "modules/subnet"),
                entry("app", "modules/app"),
            ],
        );
        (loader, manifest)
    }

    #[test]
    fn test_tt007_no_module_calls() {
        let loader = MemoryLoader::new().with(
            ROOT,
            ConfigModule::default()
                .resource("b_kind", "two")
                .resource("a_kind", "one"),
        );
        let manifest = Manifest::empty(ROOT);
        let r = resolve_manifest(&loader, Path::new(ROOT), &manifest, 5);
        assert_eq!(r.addresses, vec!["a_kind.one", "b_kind.two"]);
        assert!(r.diagnostics.is_empty());
        assert!(!r.addresses.iter().any(|a| is_module_address(a)));
    }

    #[test]
    fn test_tt007_depth_zero() {
        let (loader, manifest) = tree();
        let r = resolve_manifest(&loader, Path::new(ROOT), &manifest, 0);
        assert_eq!(
            r.addresses,
            vec![
                "aws_eip.ip",
                "aws_instance.web",
                "module.app",
                "module.network",
            ]
        );
        assert!(r.diagnostics.is_empty());
    }

    #[test]
    fn test_tt007_depth_one() {
        let (loader, manifest) = tree();
        let r = resolve_manifest(&loader, Path::new(ROOT), &manifest, 1);
        assert_eq!(
            r.addresses,
            vec![
                "aws_eip.ip",
                "aws_instance.web",
                "module.app",
                "module.app.aws_lb.front",
                "module.network",
                "module.network.aws_vpc.main",
                "module.network.module.subnet",
            ]
        );
    }

    #[test]
    fn test_tt007_full_depth() {
        let (loader, manifest) = tree();
        let r = resolve_manifest(&loader, Path::new(ROOT), &manifest, 10);
        assert_eq!(
            r.addresses,
            vec![
                "aws_eip.ip",
                "aws_instance.web",
                "module.app",
                "module.app.aws_lb.front",
                "module.network",
                "module.network.aws_vpc.main",
                "module.network.module.subnet",
                "module.network.module.subnet.aws_subnet.private",
            ]
        );
        assert!(r.diagnostics.is_empty());
    }

    #[test]
    fn test_tt007_resources_precede_modules() {
        let (loader, manifest) = tree();
        let r = resolve_manifest(&loader, Path::new(ROOT), &manifest, 10);
        let first_module = r
            .addresses
            .iter()
            .position(|a| a.starts_with("module."))
            .unwrap();
        assert!(r.addresses[..first_module]
            .iter()
            .all(|a| !a.starts_with("module.")));
        assert!(r.addresses[first_module..]
            .iter()
            .all(|a| a.starts_with("module.")));
    }

    #[test]
    fn test_tt007_deterministic() {
        let (loader, manifest) = tree();
        let a = resolve_manifest(&loader, Path::new(ROOT), &manifest, 3);
        let b = resolve_manifest(&loader, Path::new(ROOT), &manifest, 3);
        assert_eq!(a, b);
    }

    #[test]
    fn test_tt007_manifest_miss() {
        let loader = MemoryLoader::new().with(
            ROOT,
            ConfigModule::default().call("orphan", "./orphan"),
        );
        let manifest = Manifest::empty(ROOT);
        let r = resolve_manifest(&loader, Path::new(ROOT), &manifest, 5);
        assert_eq!(r.addresses, vec!["module.orphan"]);
        assert_eq!(r.diagnostics.len(), 1);
        assert_eq!(r.diagnostics[0].message, "no source dir found for orphan");
        assert!(!r.diagnostics[0].is_error());
    }

    #[test]
    fn test_tt007_miss_does_not_block_siblings() {
        let (loader, mut manifest) = tree();
        manifest.entries.shift_remove("app");
        let r = resolve_manifest(&loader, Path::new(ROOT), &manifest, 1);
        assert!(r.addresses.contains(&"module.app".to_string()));
        assert!(!r.addresses.iter().any(|a| a.starts_with("module.app.")));
        assert!(r
            .addresses
            .contains(&"module.network.aws_vpc.main".to_string()));
        assert_eq!(r.diagnostics.len(), 1);
    }

    #[test]
    fn test_tt007_load_error_keeps_going() {
        let (loader, mut manifest) = tree();
        manifest.entries.insert("app".to_string(), entry("app", "modules/gone"));
        let r = resolve_manifest(&loader, Path::new(ROOT), &manifest, 1);
        assert!(r.addresses.contains(&"module.app".to_string()));
        assert!(r.addresses.contains(&"module.network".to_string()));
        assert!(r.has_errors());
    }

    #[test]
    fn test_tt007_unused_manifest_entry() {
        let (loader, mut manifest) = tree();
        manifest
            .entries
            .insert("never.called".to_string(), entry("never.called", "x"));
        let r = resolve_manifest(&loader, Path::new(ROOT), &manifest, 10);
        assert!(r.diagnostics.is_empty());
    }

    #[test]
    fn test_tt007_cycle_guard() {
        let loader = MemoryLoader::new()
            .with(ROOT, ConfigModule::default().call("loop", "./loop"))
            .with(
                "/cfg/loop",
                ConfigModule::default()
                    .resource("null_resource", "x")
                    .call("back", ".."),
            );
        let manifest = Manifest::new(
            ROOT,
            vec![entry("loop", "loop"), entry("loop.back", "loop")],
        );
        let r = resolve_manifest(&loader, Path::new(ROOT), &manifest, 50);
        assert_eq!(
            r.addresses,
            vec![
                "module.loop",
                "module.loop.module.back",
                "module.loop.null_resource.x",
            ]
        );
        assert_eq!(r.diagnostics.len(), 1);
        assert!(r.diagnostics[0].message.contains("cycle"));
    }

    #[test]
    fn test_tt007_same_dir_twice_is_not_a_cycle() {
        let loader = MemoryLoader::new()
            .with(
                ROOT,
                ConfigModule::default()
                    .call("blue", "./svc")
                    .call("green", "./svc"),
            )
            .with("/cfg/svc", ConfigModule::default().resource("aws_ecs_service", "this"));
        let manifest = Manifest::new(ROOT, vec![entry("blue", "svc"), entry("green", "svc")]);
        let r = resolve_manifest(&loader, Path::new(ROOT), &manifest, 1);
        assert_eq!(
            r.addresses,
            vec![
                "module.blue",
                "module.blue.aws_ecs_service.this",
                "module.green",
                "module.green.aws_ecs_service.this",
            ]
        );
        assert!(r.diagnostics.is_empty());
    }

    #[test]
    fn test_tt007_module_name_ending_in_module_misses_manifest() {
        let loader = MemoryLoader::new()
            .with(ROOT, ConfigModule::default().call("vpc_module", "./vpc"))
            .with(
                "/cfg/vpc",
                ConfigModule::default().call("subnet", "./subnet"),
            )
            .with(
                "/cfg/vpc/subnet",
                ConfigModule::default().resource("aws_subnet", "a"),
            );
        let manifest = Manifest::new(
            ROOT,
            vec![
                entry("vpc_module", "vpc"),
                entry("vpc_module.subnet", "vpc/subnet"),
            ],
        );
        let r = resolve_manifest(&loader, Path::new(ROOT), &manifest, 2);
        assert_eq!(
            r.addresses,
            vec!["module.vpc_module", "module.vpc_module.module.subnet"]
        );
        assert_eq!(r.diagnostics.len(), 1);
        assert_eq!(r.diagnostics[0].message, "no source dir found for vpc_subnet");
    }

    #[test]
    fn test_tt007_resolve_dir_with_prefix() {
        let (loader, manifest) = tree();
        let mut resolver = Resolver::new(&loader, &manifest, 2);
        let out = resolver.resolve_dir(Path::new("/cfg/modules/network"), "module.network.", 1);
        assert_eq!(
            out,
            vec![
                "module.network.aws_vpc.main",
                "module.network.module.subnet",
                "module.network.module.subnet.aws_subnet.private",
            ]
        );
        assert!(resolver.into_diagnostics().is_empty());
    }

    #[test]
    fn test_tt007_filesystem_tree() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::write(
            root.join("main.tf"),
            r#"
resource "aws_instance" "web" {}
module "network" {
  source = "./modules/network"
}
"#,
        )
        .unwrap();
        std::fs::create_dir_all(root.join("modules/network")).unwrap();
        std::fs::write(
            root.join("modules/network/main.tf"),
            r#"resource "aws_vpc" "main" {}"#,
        )
        .unwrap();
        let manifest = Manifest::new(root, vec![entry("network", "modules/network")]);

        let r = resolve_manifest(&FsLoader, root, &manifest, 1);
        assert_eq!(
            r.addresses,
            vec![
                "aws_instance.web",
                "module.network",
                "module.network.aws_vpc.main",
            ]
        );
        assert!(r.diagnostics.is_empty());
    }
}
