//! Continuation folding for control-format indices.
//!
//! Long field values are wrapped across lines that start with whitespace:
//!
//! ```text
//! Depends: R (>= 3.5.0), methods, stats,
//!         utils
//! ```
//!
//! [`normalize`] merges every such line into the field it continues and
//! removes parenthesized version constraints, so each field ends up on a
//! single line and only bare package names remain.

use crate::FormatError;
use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

/// Matches version constraints like `(>= 2.10)` or `(>=1.0-3)`.
fn version_constraint() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\([ >=0-9.-]*\)").expect("version constraint pattern"))
}

/// Remove every version constraint from a line.
pub fn strip_constraints(line: &str) -> Cow<'_, str> {
    version_constraint().replace_all(line, "")
}

fn is_continuation(line: &str) -> bool {
    line.starts_with([' ', '\t'])
}

/// Fold continuation lines and strip version constraints.
///
/// Blank (or whitespace-only) lines are kept as empty lines, since they
/// separate records. The output is joined with `\n` and has no trailing
/// newline.
pub fn normalize(raw: &str) -> Result<String, FormatError> {
    let mut lines: Vec<String> = Vec::new();

    for (idx, line) in raw.lines().enumerate() {
        if line.trim().is_empty() {
            lines.push(String::new());
            continue;
        }

        let stripped = strip_constraints(line);

        if !is_continuation(line) {
            lines.push(stripped.into_owned());
            continue;
        }

        let Some(previous) = lines.last_mut().filter(|prev| !prev.is_empty()) else {
            return Err(FormatError::OrphanContinuation { line: idx + 1 });
        };

        // A constraint wrapped across the break only matches once merged.
        let merged = format!("{} {}", previous.trim_end(), stripped.trim());
        *previous = strip_constraints(&merged).into_owned();
    }

    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_lines_pass_through() {
        let out = normalize("Package: A\nVersion: 1.0\n").unwrap();
        assert_eq!(out, "Package: A\nVersion: 1.0");
    }

    #[test]
    fn test_continuation_appended_with_space() {
        let out = normalize("Depends: methods, stats,\n        utils\n").unwrap();
        assert_eq!(out, "Depends: methods, stats, utils");
    }

    #[test]
    fn test_tab_continuation() {
        let out = normalize("Imports: a,\n\tb\n").unwrap();
        assert_eq!(out, "Imports: a, b");
    }

    #[test]
    fn test_multiple_continuations() {
        let raw = "Depends: a,\n  b,\n  c\nLicense: MIT\n";
        assert_eq!(normalize(raw).unwrap(), "Depends: a, b, c\nLicense: MIT");
    }

    #[test]
    fn test_constraints_removed_from_both_lines() {
        let raw = "Depends: R (>= 3.5.0), Rcpp (>= 1.0-3),\n        methods (>= 2.0)\n";
        let out = normalize(raw).unwrap();
        assert!(!out.contains('('));
        assert!(!out.contains(">="));
        assert!(out.starts_with("Depends: R , Rcpp , methods"));
    }

    #[test]
    fn test_constraint_split_across_lines() {
        let out = normalize("Depends: Rcpp (>=\n        1.0.5), utils\n").unwrap();
        assert_eq!(out, "Depends: Rcpp , utils");
    }

    #[test]
    fn test_non_version_parentheses_kept() {
        let out = normalize("Title: Tools (Extra)\n").unwrap();
        assert_eq!(out, "Title: Tools (Extra)");
    }

    #[test]
    fn test_blank_lines_preserved() {
        let out = normalize("Package: A\n\nPackage: B\n").unwrap();
        assert_eq!(out, "Package: A\n\nPackage: B");
    }

    #[test]
    fn test_whitespace_only_line_is_separator() {
        let out = normalize("Package: A\n   \nPackage: B\n").unwrap();
        assert_eq!(out, "Package: A\n\nPackage: B");
    }

    #[test]
    fn test_crlf_input() {
        let out = normalize("Package: A\r\nDepends: B,\r\n    C\r\n").unwrap();
        assert_eq!(out, "Package: A\nDepends: B, C");
    }

    #[test]
    fn test_leading_continuation_is_error() {
        let err = normalize("    Depends: A\nPackage: B\n").unwrap_err();
        assert_eq!(err, FormatError::OrphanContinuation { line: 1 });
    }

    #[test]
    fn test_continuation_after_blank_is_error() {
        let err = normalize("Package: A\n\n    B\n").unwrap_err();
        assert_eq!(err, FormatError::OrphanContinuation { line: 3 });
    }

    #[test]
    fn test_cran_stanza_snapshot() {
        let raw = "\
Package: abc
Version: 2.2.1
Depends: R (>= 2.10), abc.data, nnet, quantreg, MASS,
        locfit
License: GPL-3
NeedsCompilation: no
";
        insta::assert_snapshot!(normalize(raw).unwrap(), @r"
        Package: abc
        Version: 2.2.1
        Depends: R , abc.data, nnet, quantreg, MASS, locfit
        License: GPL-3
        NeedsCompilation: no
        ");
    }
}
