//! Dot-delimited key paths.
//!
//! A path such as `"a.b.c"` is a navigation convention over nested documents:
//! `a` is looked up at the top level, `b` inside the document stored under
//! `a`, and `c` names the leaf. Paths are not a stored structure.

use crate::error::{DocError, Result};

/// Separator between path segments.
pub const SEPARATOR: char = '.';

/// Nesting limit for key paths, XML elements and serialized value trees.
///
/// Matches serde_json's recursion limit, which refuses a 128th nested
/// container. Key paths and serialized trees therefore stay strictly below
/// it, so JSON written by this crate always parses back.
pub const MAX_DEPTH: usize = 128;

/// Split a path on `.`.
///
/// An empty path yields a single zero-length segment, and consecutive dots
/// yield empty segments; use [`validate_path`] to reject those.
///
/// ```
/// use jsondata_core::path::split;
/// assert_eq!(split("a.b.c"), vec!["a", "b", "c"]);
/// assert_eq!(split(""), vec![""]);
/// ```
pub fn split(path: &str) -> Vec<&str> {
    path.split(SEPARATOR).collect()
}

/// Re-join segments with `.`.
pub fn join<S: AsRef<str>>(segments: &[S]) -> String {
    let mut out = String::new();
    for (i, segment) in segments.iter().enumerate() {
        if i > 0 {
            out.push(SEPARATOR);
        }
        out.push_str(segment.as_ref());
    }
    out
}

/// True when the path addresses a nested key.
pub fn is_nested(path: &str) -> bool {
    path.contains(SEPARATOR)
}

/// Split a path into its first segment and the joined remainder.
///
/// Returns `None` for the remainder when the path has a single segment.
pub fn split_first(path: &str) -> (&str, Option<&str>) {
    match path.split_once(SEPARATOR) {
        Some((head, rest)) => (head, Some(rest)),
        None => (path, None),
    }
}

/// Reject empty or whitespace-only keys.
pub fn validate_key(key: &str) -> Result<()> {
    if key.trim().is_empty() {
        return Err(DocError::invalid_key(
            key,
            "keys must not be empty or whitespace-only",
        ));
    }
    Ok(())
}

/// Validate every segment of a nested path and its depth.
///
/// A path of `n` segments builds `n` nested documents, so at most
/// `MAX_DEPTH - 1` segments are accepted.
pub fn validate_path(path: &str) -> Result<()> {
    let segments = split(path);
    if segments.len() >= MAX_DEPTH {
        return Err(DocError::DepthLimit(MAX_DEPTH));
    }
    for segment in segments {
        if segment.trim().is_empty() {
            return Err(DocError::invalid_key(
                path,
                "path segments must not be empty or whitespace-only",
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_simple() {
        assert_eq!(split("a.b.c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn split_single_segment() {
        assert_eq!(split("foo"), vec!["foo"]);
    }

    #[test]
    fn split_empty_is_one_empty_segment() {
        assert_eq!(split(""), vec![""]);
    }

    #[test]
    fn split_consecutive_dots() {
        assert_eq!(split("a..b"), vec!["a", "", "b"]);
    }

    #[test]
    fn join_is_inverse_of_split() {
        for path in ["a", "a.b", "x.y.z", "", "a..b"] {
            assert_eq!(join(&split(path)), path);
        }
    }

    #[test]
    fn split_first_head_and_rest() {
        assert_eq!(split_first("a.b.c"), ("a", Some("b.c")));
        assert_eq!(split_first("a"), ("a", None));
    }

    #[test]
    fn is_nested_checks_for_dot() {
        assert!(is_nested("a.b"));
        assert!(!is_nested("ab"));
    }

    #[test]
    fn validate_key_rejects_blank() {
        assert!(validate_key("").is_err());
        assert!(validate_key("   ").is_err());
        assert!(validate_key("a.b").is_ok());
    }

    #[test]
    fn validate_path_rejects_empty_segment() {
        let err = validate_path("a..b").unwrap_err();
        assert!(matches!(err, DocError::InvalidKey { .. }));
        assert!(validate_path(".a").is_err());
        assert!(validate_path("a. ").is_err());
    }

    #[test]
    fn validate_path_enforces_depth() {
        let deep = vec!["k"; MAX_DEPTH].join(".");
        assert!(matches!(
            validate_path(&deep),
            Err(DocError::DepthLimit(MAX_DEPTH))
        ));
        let ok = vec!["k"; MAX_DEPTH - 1].join(".");
        assert!(validate_path(&ok).is_ok());
    }
}
