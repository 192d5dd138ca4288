//! Rule id → shell command line
//!
//! A rule id names a script in the rule directory, optionally followed by
//! argument tokens (`"proxy.sh proxy"`).

use shell_escape::escape;
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Split a rule id into its script name and argument tokens
fn split_rule(rule: &str) -> (&str, &str) {
    let rule = rule.trim();
    match rule.split_once(char::is_whitespace) {
        Some((script, args)) => (script, args.trim()),
        None => (rule, ""),
    }
}

/// Path of the script a rule id runs
pub fn script_path(rule_dir: &Path, rule: &str) -> PathBuf {
    rule_dir.join(split_rule(rule).0)
}

/// Build the command line that runs `rule` from `rule_dir`.
///
/// The script path is shell-escaped so rule directories with spaces work;
/// trailing tokens are passed through to the shell untouched.
pub fn command_line(rule_dir: &Path, rule: &str) -> String {
    let (script, args) = split_rule(rule);
    let path = rule_dir.join(script);
    let escaped = escape(Cow::Owned(path.to_string_lossy().into_owned()));

    if args.is_empty() {
        escaped.into_owned()
    } else {
        format!("{escaped} {args}")
    }
}
