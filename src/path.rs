//! # Backend Path Rules
//!
//! Validation and normalization of backend paths and version strings.
//!
//! A backend path always starts with [`SEP`] and only contains characters
//! from `[A-Za-z0-9/._-]`. A path ending on [`SEP`] is a *sub-path* and
//! denotes a directory; a file path never ends on [`SEP`].
//!
//! All functions are pure. Every interface calls them before touching a
//! backend.
//!
//! ```rust
//! use anystore::path;
//!
//! assert_eq!(path::check_path("//sub//file.txt", false).unwrap(), "/sub/file.txt");
//! assert_eq!(path::join("/sub", &["", "file.txt"]).unwrap(), "/sub/file.txt");
//! assert_eq!(path::split("/sub/file.txt").unwrap(), ("/sub/".to_string(), "file.txt".to_string()));
//! ```

use crate::{Result, StoreError};

/// Separator of backend paths.
pub const SEP: char = '/';

fn is_path_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '/' | '.' | '_' | '-')
}

fn is_version_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')
}

/// Validate a backend path and collapse consecutive separators.
///
/// With `allow_sub_path` a trailing separator is accepted and preserved.
///
/// # Errors
///
/// - [`StoreError::InvalidPath`] if the path does not start with `/`,
///   ends on `/` while sub-paths are not allowed, or contains characters
///   outside `[A-Za-z0-9/._-]`
pub fn check_path(path: &str, allow_sub_path: bool) -> Result<String> {
    if !path.starts_with(SEP) {
        return Err(StoreError::InvalidPath {
            path: path.to_string(),
            reason: "must start with '/'",
        });
    }
    if !allow_sub_path && path.ends_with(SEP) {
        return Err(StoreError::InvalidPath {
            path: path.to_string(),
            reason: "must not end on '/'",
        });
    }
    if !path.chars().all(is_path_char) {
        return Err(StoreError::InvalidPath {
            path: path.to_string(),
            reason: "does not match '[A-Za-z0-9/._-]+'",
        });
    }

    let segments: Vec<&str> = path.split(SEP).filter(|s| !s.is_empty()).collect();
    let mut normalized = format!("{SEP}{}", segments.join("/"));
    if path.ends_with(SEP) && !normalized.ends_with(SEP) {
        normalized.push(SEP);
    }
    Ok(normalized)
}

/// Validate a version string.
///
/// # Errors
///
/// - [`StoreError::InvalidVersion`] if the version is empty or contains
///   characters outside `[A-Za-z0-9._-]`
pub fn check_version(version: &str) -> Result<String> {
    if version.is_empty() {
        return Err(StoreError::InvalidVersion {
            version: String::new(),
            reason: "must not be empty",
        });
    }
    if !version.chars().all(is_version_char) {
        return Err(StoreError::InvalidVersion {
            version: version.to_string(),
            reason: "does not match '[A-Za-z0-9._-]+'",
        });
    }
    Ok(version.to_string())
}

/// Join parts onto a (sub-)path.
///
/// Empty parts are skipped. The result is validated as a sub-path, so a
/// trailing separator on the last part is kept.
///
/// # Errors
///
/// - [`StoreError::InvalidPath`] if `base` or the joined path is invalid
pub fn join(base: &str, parts: &[&str]) -> Result<String> {
    let base = check_path(base, true)?;
    let mut joined = base;
    for part in parts.iter().filter(|p| !p.is_empty()) {
        joined.push(SEP);
        joined.push_str(part);
    }
    check_path(&joined, true)
}

/// Split a path into its root (with trailing separator) and basename.
///
/// The basename is empty if `path` is a sub-path.
///
/// # Errors
///
/// - [`StoreError::InvalidPath`] if `path` is invalid
pub fn split(path: &str) -> Result<(String, String)> {
    let path = check_path(path, true)?;
    // a valid path always contains at least one separator
    let idx = path.rfind(SEP).unwrap_or(0);
    let root = path[..=idx].to_string();
    let basename = path[idx + 1..].to_string();
    Ok((root, basename))
}

/// Last segment of a path (empty for sub-paths).
pub(crate) fn basename(path: &str) -> &str {
    path.rsplit(SEP).next().unwrap_or(path)
}

/// Number of separators in a path.
pub(crate) fn depth(path: &str) -> usize {
    path.matches(SEP).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_path_requires_leading_separator() {
        let err = check_path("relative/path", false).unwrap_err();
        assert!(matches!(err, StoreError::InvalidPath { .. }));
        assert!(check_path("", true).is_err());
    }

    #[test]
    fn check_path_rejects_sub_path_unless_allowed() {
        assert!(check_path("/sub/", false).is_err());
        assert_eq!(check_path("/sub/", true).unwrap(), "/sub/");
        assert_eq!(check_path("/", true).unwrap(), "/");
        assert!(check_path("/", false).is_err());
    }

    #[test]
    fn check_path_rejects_invalid_characters() {
        for path in ["/with space", "/ümlaut", "/a:b", "/a\\b", "/star*"] {
            assert!(
                matches!(check_path(path, true), Err(StoreError::InvalidPath { .. })),
                "{path}"
            );
        }
    }

    #[test]
    fn check_path_collapses_separators() {
        assert_eq!(check_path("//a///b.txt", false).unwrap(), "/a/b.txt");
        assert_eq!(check_path("//a//", true).unwrap(), "/a/");
        assert_eq!(check_path("///", true).unwrap(), "/");
    }

    #[test]
    fn check_version_rules() {
        assert_eq!(check_version("1.0.0").unwrap(), "1.0.0");
        assert_eq!(check_version("1.0.0-rc_1").unwrap(), "1.0.0-rc_1");
        assert!(matches!(
            check_version(""),
            Err(StoreError::InvalidVersion { .. })
        ));
        assert!(check_version("1/0").is_err());
        assert!(check_version("1 0").is_err());
    }

    #[test]
    fn join_skips_empty_parts() {
        assert_eq!(join("/", &["file.txt"]).unwrap(), "/file.txt");
        assert_eq!(join("/sub", &["file.txt"]).unwrap(), "/sub/file.txt");
        assert_eq!(join("//sub//", &["/", "", "/file.txt"]).unwrap(), "/sub/file.txt");
        assert_eq!(join("/sub/", &[]).unwrap(), "/sub/");
        assert_eq!(join("/a", &["b", "c/"]).unwrap(), "/a/b/c/");
    }

    #[test]
    fn join_validates() {
        assert!(join("sub", &["file.txt"]).is_err());
        assert!(join("/sub", &["bad name"]).is_err());
    }

    #[test]
    fn split_returns_root_and_basename() {
        assert_eq!(split("/").unwrap(), ("/".into(), "".into()));
        assert_eq!(split("/file.txt").unwrap(), ("/".into(), "file.txt".into()));
        assert_eq!(split("/sub/").unwrap(), ("/sub/".into(), "".into()));
        assert_eq!(
            split("/sub//file.txt").unwrap(),
            ("/sub/".into(), "file.txt".into())
        );
    }

    #[test]
    fn basename_and_depth() {
        assert_eq!(basename("/a/b/c.txt"), "c.txt");
        assert_eq!(basename("/a/"), "");
        assert_eq!(depth("/a/b/c.txt"), 3);
        assert_eq!(depth("/"), 1);
    }
}
