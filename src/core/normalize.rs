//! TT-006: Normalization and ordering of address lists.

use super::types::Address;

/// Trim every entry and drop the ones that end up empty. Order is kept.
pub fn normalize<S: AsRef<str>>(lines: &[S]) -> Vec<Address> {
    lines
        .iter()
        .map(|l| l.as_ref().trim())
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// `normalize`, then byte-order sort and drop duplicates.
pub fn cleanup_and_sort<S: AsRef<str>>(lines: &[S]) -> Vec<Address> {
    let mut out = normalize(lines);
    out.sort();
    out.dedup();
    out
}
