//! TT-003: Address grammar.
//!
//! An address is a chain of `kind.name` pairs joined by `.`, where every
//! `module.<name>` pair nests the remainder one level deeper:
//! `module.network.module.subnet.aws_subnet.private`.

/// Kind segment that introduces a nested module.
pub const MODULE_KIND: &str = "module";

const MODULE_SEGMENT: &str = "module.";

/// Address of a module call made under `prefix`.
pub fn module_address(prefix: &str, name: &str) -> String {
    format!("{}{}{}", prefix, MODULE_SEGMENT, name)
}

/// Address of a managed resource declared under `prefix`.
pub fn resource_address(prefix: &str, kind: &str, name: &str) -> String {
    format!("{}{}.{}", prefix, kind, name)
}

/// Prefix for everything declared inside the module at `address`.
pub fn child_prefix(address: &str) -> String {
    format!("{}.", address)
}

/// Manifest key for a module address: the names without `module.` markers.
///
/// `module.network.module.subnet` becomes `network.subnet`. Every
/// occurrence of `module.` is removed, including one ending a module name,
/// so `module.vpc_module.module.subnet` maps to `vpc_subnet`.
pub fn manifest_key(address: &str) -> String {
    address.replace(MODULE_SEGMENT, "")
}

/// Depth used by the state filter: `dots / 2 + 1`.
///
/// `aws_instance.web` and `module.net` are depth 1,
/// `module.net.aws_vpc.main` is depth 2.
pub fn depth(address: &str) -> usize {
    address.matches('.').count() / 2 + 1
}

/// Every module address implied by a flat address, outermost first.
///
/// Walks the segments pairwise and stops at the first pair that is not
/// `module.<name>`. Malformed input yields fewer (or odd) prefixes, never
/// an error.
pub fn module_prefixes(address: &str) -> Vec<String> {
    let parts: Vec<&str> = address.split('.').collect();
    let mut prefixes = Vec::new();
    let mut current = String::new();

    for pair in parts.chunks(2) {
        match pair {
            [kind, name] if *kind == MODULE_KIND => {
                if !current.is_empty() {
                    current.push('.');
                }
                current.push_str(MODULE_SEGMENT);
                current.push_str(name);
                prefixes.push(current.clone());
            }
            _ => break,
        }
    }

    prefixes
}

/// True when the address names a module rather than a resource.
#[cfg(test)]
pub(crate) fn is_module_address(address: &str) -> bool {
    let parts: Vec<&str> = address.split('.').collect();
    parts.len() >= 2 && parts.len() % 2 == 0 && parts[parts.len() - 2] == MODULE_KIND
}
