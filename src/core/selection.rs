//! TT-009: Selection input and output — sentinel, target prefixing, argv.

use super::normalize::normalize;
use super::types::Address;

/// Synthetic choice meaning "no targeting, operate on everything".
pub const ALL_MARKER: &str = "<all>";

/// Default prefix turning an address into a targeting flag.
pub const DEFAULT_PREFIX: &str = "-target=";

/// Choices offered to the operator: the sentinel, then every address.
pub fn with_sentinel(addresses: &[Address]) -> Vec<String> {
    let mut names = Vec::with_capacity(addresses.len() + 1);
    names.push(ALL_MARKER.to_string());
    names.extend(addresses.iter().cloned());
    names
}

/// Turn the chooser's raw output into targets.
///
/// The sentinel anywhere in the selection wins and yields no targets at all.
/// Otherwise each selected address gets `prefix` prepended.
pub fn apply_selection<S: AsRef<str>>(selected: &[S], prefix: &str) -> Vec<String> {
    let selected = normalize(selected);
    if selected.iter().any(|s| s == ALL_MARKER) {
        return Vec::new();
    }
    selected
        .into_iter()
        .map(|s| format!("{}{}", prefix, s))
        .collect()
}

/// Argument vector for the downstream command: `[command, ...args, ...targets]`.
pub fn exec_args(command: &str, user_args: &[String], targets: &[String]) -> Vec<String> {
    let mut args = Vec::with_capacity(1 + user_args.len() + targets.len());
    args.push(command.to_string());
    args.extend(user_args.iter().cloned());
    args.extend(targets.iter().cloned());
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tt009_with_sentinel() {
        let addrs = vec!["aws_instance.web".to_string(), "module.net".to_string()];
        assert_eq!(
            with_sentinel(&addrs),
            vec!["<all>", "aws_instance.web", "module.net"]
        );
    }

    #[test]
    fn test_tt009_apply_prefix() {
        let selected = vec!["aws_instance.web", "module.net", ""];
        assert_eq!(
            apply_selection(&selected, DEFAULT_PREFIX),
            vec!["-target=aws_instance.web", "-target=module.net"]
        );
    }

    #[test]
    fn test_tt009_sentinel_alone() {
        assert!(apply_selection(&["<all>"], DEFAULT_PREFIX).is_empty());
    }

    #[test]
    fn test_tt009_sentinel_with_others() {
        let first = vec!["<all>", "aws_instance.web"];
        let last = vec!["aws_instance.web", "module.net", " <all> "];
        assert!(apply_selection(&first, DEFAULT_PREFIX).is_empty());
        assert!(apply_selection(&last, DEFAULT_PREFIX).is_empty());
    }

    #[test]
    fn test_tt009_empty_prefix() {
        assert_eq!(apply_selection(&["module.net\n"], ""), vec!["module.net"]);
    }

    #[test]
    fn test_tt009_exec_args() {
        let args = exec_args(
            "terraform",
            &["apply".to_string(), "-auto-approve".to_string()],
            &["-target=module.net".to_string()],
        );
        assert_eq!(
            args,
            vec!["terraform", "apply", "-auto-approve", "-target=module.net"]
        );
    }

    #[test]
    fn test_tt009_exec_args_no_targets() {
        assert_eq!(
            exec_args("terraform", &["plan".to_string()], &[]),
            vec!["terraform", "plan"]
        );
    }
}
