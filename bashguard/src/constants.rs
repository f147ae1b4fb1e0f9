//! Shared constants and lazily-built regex patterns.

use regex::Regex;
use rustc_hash::FxHashSet;
use std::sync::OnceLock;

/// Configuration file looked up next to the analyzed script (or in the cwd).
pub const CONFIG_FILENAME: &str = ".bashguard.toml";

/// Variable assigned by a bare `read` with no arguments.
pub const DEFAULT_READ_VARIABLE: &str = "REPLY";

/// Separator used to build scope-qualified variable names.
/// Shell identifiers cannot contain `.`, so the qualifier never collides.
pub const SCOPE_QUALIFIER: char = '.';

/// Suffix inserted before the extension of auto-fixed output files.
pub const DEFAULT_FIXED_SUFFIX: &str = "_fixed";

/// Environment variables treated as attacker-influenced taint sources.
pub fn tainted_env_vars() -> &'static FxHashSet<&'static str> {
    static SET: OnceLock<FxHashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| {
        ["USER", "HOME", "PATH", "SHELL", "TERM", "DISPLAY"]
            .into_iter()
            .collect()
    })
}

/// Positional and special parameters whose expansion is always tainted.
pub fn special_parameters() -> &'static FxHashSet<&'static str> {
    static SET: OnceLock<FxHashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| {
        ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9", "@", "*"]
            .into_iter()
            .collect()
    })
}

/// Common system commands excluded from the direct command injection check.
/// A tainted variable sharing one of these names is overwhelmingly a false
/// positive from the recursive descent, not an injection.
pub fn safe_commands() -> &'static FxHashSet<&'static str> {
    static SET: OnceLock<FxHashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| {
        [
            "awk", "basename", "bash", "cat", "cd", "chmod", "chown", "command", "cp", "curl",
            "cut", "date", "dirname", "echo", "env", "exec", "exit", "export", "find", "grep",
            "head", "kill", "local", "ls", "mkdir", "mv", "printf", "pwd", "read", "return", "rm",
            "sed", "set", "sh", "shift", "sleep", "sort", "tail", "tar", "test", "touch", "tr",
            "trap", "true", "uniq", "unset", "wait", "wc", "wget", "which",
        ]
        .into_iter()
        .collect()
    })
}

/// Regex extracting `$name` / `${name}` expansion tokens from raw text.
///
/// # Panics
///
/// Panics if the regex pattern is invalid.
#[allow(clippy::expect_used)]
pub fn expansion_token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\$\{?([A-Za-z0-9_@*#?!]+)\}?").expect("Invalid expansion token regex")
    })
}

/// Regex matching an argument that is *exactly* one bare expansion
/// (`$name` or `${name}`), used by the interpreter `-c` detector.
///
/// # Panics
///
/// Panics if the regex pattern is invalid.
#[allow(clippy::expect_used)]
pub fn exact_expansion_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\$(?:([A-Za-z_][A-Za-z0-9_]*)|\{([A-Za-z_][A-Za-z0-9_]*)\})$")
            .expect("Invalid exact expansion regex")
    })
}

/// Character class of the maximal token the quote fixer wraps, anchored at
/// the `$` that begins the expansion.
///
/// # Panics
///
/// Panics if the regex pattern is invalid.
#[allow(clippy::expect_used)]
pub fn quote_token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[$A-Za-z0-9_*#@]+").expect("Invalid quote token regex"))
}

/// Builds the numeric-comparison guard regex for one index variable, e.g.
/// `$i -eq` or `-ne $i`. Such accesses are ordinary quoting issues, not
/// subscript injection.
///
/// # Panics
///
/// Panics if the variable name produces an invalid pattern (it cannot: names
/// are restricted to `\w` characters by the extractor).
#[must_use]
#[allow(clippy::expect_used)]
pub fn numeric_guard_re(name: &str) -> Regex {
    let escaped = regex::escape(name);
    Regex::new(&format!(
        r"(?x)
        -(?:eq|ne|lt|le|gt|ge)\s+\$\{{?{escaped}\b |
        \$\{{?{escaped}\}}?\s+-(?:eq|ne|lt|le|gt|ge)\b"
    ))
    .expect("Invalid numeric guard regex")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_list_is_fixed() {
        assert!(tainted_env_vars().contains("USER"));
        assert!(tainted_env_vars().contains("DISPLAY"));
        assert!(!tainted_env_vars().contains("LANG"));
    }

    #[test]
    fn special_parameters_cover_positionals() {
        assert!(special_parameters().contains("0"));
        assert!(special_parameters().contains("9"));
        assert!(special_parameters().contains("@"));
        assert!(!special_parameters().contains("10"));
    }

    #[test]
    fn expansion_token_re_extracts_names() {
        let names: Vec<&str> = expansion_token_re()
            .captures_iter("eval \"$cmd\" ${other} plain")
            .filter_map(|c| c.get(1).map(|m| m.as_str()))
            .collect();
        assert_eq!(names, vec!["cmd", "other"]);
    }

    #[test]
    fn exact_expansion_re_rejects_mixed_strings() {
        assert!(exact_expansion_re().is_match("$cmd"));
        assert!(exact_expansion_re().is_match("${cmd}"));
        assert!(!exact_expansion_re().is_match("echo $cmd"));
        assert!(!exact_expansion_re().is_match("$cmd extra"));
    }

    #[test]
    fn numeric_guard_matches_adjacent_comparisons() {
        let re = numeric_guard_re("i");
        assert!(re.is_match("[ $i -eq 0 ]"));
        assert!(re.is_match("[ 0 -ne $i ]"));
        assert!(!re.is_match("echo ${arr[$i]}"));
    }
}
