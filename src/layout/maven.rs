//! Legacy Maven-style layout.

use regex::Regex;

use super::PathLayout;
use crate::path::{self, SEP};
use crate::{Result, StoreError, VersionedEntry};

#[derive(Debug, Clone)]
enum ExtensionRule {
    Literal(String),
    Pattern(Regex),
}

impl ExtensionRule {
    /// Length of the extension (without dot) the rule recognizes at the end of `name`.
    fn matched_len(&self, name: &str) -> Option<usize> {
        match self {
            ExtensionRule::Literal(ext) => name
                .ends_with(&format!(".{ext}"))
                .then_some(ext.len()),
            ExtensionRule::Pattern(re) => re
                .captures(name)
                .and_then(|caps| caps.get(1))
                .map(|m| m.len()),
        }
    }
}

/// Files nested in a directory named after their base name:
/// `<root>/<base>/<version>/<base>-<version><ext>`.
///
/// The extension of a file name is the text after its last dot, unless one
/// of the custom extensions matches. Custom extensions are plain suffixes
/// such as `tar.gz` or, with `regex` enabled, regular expressions anchored
/// at the end of the name. If several custom extensions match, the one
/// listed last wins. A leading dot never starts an extension, so the base
/// name is never empty.
///
/// ```rust
/// use anystore::{MavenLayout, PathLayout};
///
/// let plain = MavenLayout::default();
/// assert_eq!(
///     plain.resolve("/file.tar.gz", "1.0.0").unwrap(),
///     "/file.tar/1.0.0/file.tar-1.0.0.gz"
/// );
///
/// let custom = MavenLayout::new(["tar.gz"], false).unwrap();
/// assert_eq!(
///     custom.resolve("/file.tar.gz", "1.0.0").unwrap(),
///     "/file/1.0.0/file-1.0.0.tar.gz"
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct MavenLayout {
    extensions: Vec<String>,
    regex: bool,
    rules: Vec<ExtensionRule>,
}

impl MavenLayout {
    /// Create a layout with custom extensions.
    ///
    /// # Errors
    ///
    /// - [`StoreError::InvalidPattern`] if `regex` is set and an extension
    ///   does not compile
    pub fn new<I, S>(extensions: I, regex: bool) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let extensions: Vec<String> = extensions.into_iter().map(Into::into).collect();
        let rules = extensions
            .iter()
            .map(|ext| {
                if regex {
                    Regex::new(&format!(r"\.({ext})$"))
                        .map(ExtensionRule::Pattern)
                        .map_err(|e| StoreError::InvalidPattern {
                            pattern: ext.clone(),
                            reason: e.to_string(),
                        })
                } else {
                    Ok(ExtensionRule::Literal(ext.clone()))
                }
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            extensions,
            regex,
            rules,
        })
    }

    /// Configured custom extensions.
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Whether custom extensions are regular expressions.
    pub fn is_regex(&self) -> bool {
        self.regex
    }

    /// Split a file name into base name and extension (with leading dot,
    /// or empty).
    pub fn split_ext<'a>(&self, name: &'a str) -> (&'a str, &'a str) {
        // skip the first character so the base name is never empty
        let tail = name.get(1..).unwrap_or_default();
        let custom = self
            .rules
            .iter()
            .filter_map(|rule| rule.matched_len(tail))
            .last();
        let ext_len = custom.unwrap_or_else(|| fallback_ext_len(name));
        if ext_len == 0 {
            return (name, "");
        }
        name.split_at(name.len() - ext_len - 1)
    }
}

/// Length of the text after the last dot, ignoring leading dots.
fn fallback_ext_len(name: &str) -> usize {
    let stripped = name.trim_start_matches('.');
    match stripped.rfind('.') {
        Some(idx) => stripped.len() - idx - 1,
        None => 0,
    }
}

impl PathLayout for MavenLayout {
    fn resolve(&self, path: &str, version: &str) -> Result<String> {
        let path = path::check_path(path, false)?;
        let version = path::check_version(version)?;
        let (root, name) = path::split(&path)?;
        let (base, ext) = self.split_ext(&name);
        path::join(&root, &[base, &version, &format!("{base}-{version}{ext}")])
    }

    fn listing_root(&self, path: &str) -> Result<String> {
        let path = path::check_path(path, false)?;
        let (root, name) = path::split(&path)?;
        let (base, _) = self.split_ext(&name);
        Ok(format!("{}{SEP}", path::join(&root, &[base])?))
    }

    fn depth_offset(&self) -> usize {
        2
    }

    fn parse(&self, physical: &str) -> Option<VersionedEntry> {
        let tokens: Vec<&str> = physical.split(SEP).collect();
        let [parents @ .., base, version, name] = tokens.as_slice() else {
            return None;
        };
        if parents.is_empty() || base.is_empty() || version.is_empty() {
            return None;
        }
        let ext = name.strip_prefix(&format!("{base}-{version}"))?;
        let root = format!("{}{SEP}", parents.join("/"));
        Some(VersionedEntry::new(format!("{root}{base}{ext}"), *version, physical))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(layout: &MavenLayout, path: &str, version: &str) -> String {
        layout.resolve(path, version).unwrap()
    }

    #[test]
    fn plain_layout_splits_last_dot() {
        let layout = MavenLayout::default();
        assert_eq!(resolve(&layout, "/file.txt", "1.0.0"), "/file/1.0.0/file-1.0.0.txt");
        assert_eq!(
            resolve(&layout, "/file.tar.gz", "1.0.0"),
            "/file.tar/1.0.0/file.tar-1.0.0.gz"
        );
        assert_eq!(
            resolve(&layout, "/sub/file.txt", "2.0"),
            "/sub/file/2.0/file-2.0.txt"
        );
    }

    #[test]
    fn leading_dot_is_not_an_extension() {
        let layout = MavenLayout::default();
        assert_eq!(resolve(&layout, "/.tar", "1.0.0"), "/.tar/1.0.0/.tar-1.0.0");
        assert_eq!(resolve(&layout, "/tar", "1.0.0"), "/tar/1.0.0/tar-1.0.0");
        assert_eq!(
            resolve(&layout, "/.file.foo", "1.0.0"),
            "/.file/1.0.0/.file-1.0.0.foo"
        );
    }

    #[test]
    fn custom_literal_extension() {
        let layout = MavenLayout::new(["tar.gz"], false).unwrap();
        assert_eq!(
            resolve(&layout, "/file.tar.gz", "1.0.0"),
            "/file/1.0.0/file-1.0.0.tar.gz"
        );
        assert_eq!(
            resolve(&layout, "/.tar.gz", "1.0.0"),
            "/.tar/1.0.0/.tar-1.0.0.gz"
        );
        assert_eq!(resolve(&layout, "/tar.gz", "1.0.0"), "/tar/1.0.0/tar-1.0.0.gz");
        assert_eq!(resolve(&layout, "/file.txt", "1.0.0"), "/file/1.0.0/file-1.0.0.txt");
    }

    #[test]
    fn custom_regex_extensions() {
        let layout = MavenLayout::new([r"\d+.tar.gz"], true).unwrap();
        assert_eq!(
            resolve(&layout, "/file.0.tar.gz", "1.0.0"),
            "/file/1.0.0/file-1.0.0.0.tar.gz"
        );

        let layout = MavenLayout::new([r"(\d+.)?tar.gz"], true).unwrap();
        assert_eq!(
            resolve(&layout, "/file.99.tar.gz", "1.0.0"),
            "/file/1.0.0/file-1.0.0.99.tar.gz"
        );
        assert_eq!(
            resolve(&layout, "/file.tar.gz", "1.0.0"),
            "/file/1.0.0/file-1.0.0.tar.gz"
        );

        let layout = MavenLayout::new([r"tar.\d+"], true).unwrap();
        assert_eq!(resolve(&layout, "/file.tar.0", "1.0"), "/file/1.0/file-1.0.tar.0");
        assert_eq!(
            resolve(&layout, "/file.zip.0", "1.0"),
            "/file.zip/1.0/file.zip-1.0.0"
        );
    }

    #[test]
    fn later_extension_rule_wins() {
        let layout = MavenLayout::new([r"prediction.\d+.tar.gz", r"truth.tar.gz"], true).unwrap();
        assert_eq!(
            resolve(&layout, "/file.prediction.99.tar.gz", "1.0.0"),
            "/file/1.0.0/file-1.0.0.prediction.99.tar.gz"
        );
        assert_eq!(
            resolve(&layout, "/file.truth.tar.gz", "1.0.0"),
            "/file/1.0.0/file-1.0.0.truth.tar.gz"
        );

        // both rules match, the one listed last decides
        let layout = MavenLayout::new(["tar.gz", "gz"], false).unwrap();
        assert_eq!(layout.split_ext("file.tar.gz"), ("file.tar", ".gz"));
        let layout = MavenLayout::new(["gz", "tar.gz"], false).unwrap();
        assert_eq!(layout.split_ext("file.tar.gz"), ("file", ".tar.gz"));
    }

    #[test]
    fn invalid_regex_is_rejected() {
        let err = MavenLayout::new(["[a-"], true).unwrap_err();
        assert!(matches!(err, StoreError::InvalidPattern { .. }));
        // the same text is fine as a literal suffix
        assert!(MavenLayout::new(["[a-"], false).is_ok());
    }

    #[test]
    fn round_trip_for_any_valid_version() {
        let layouts = [
            MavenLayout::default(),
            MavenLayout::new(["tar.gz"], false).unwrap(),
            MavenLayout::new([r"(\d+.)?tar.gz", "zip"], true).unwrap(),
        ];
        let paths = [
            "/file.txt",
            "/file.tar.gz",
            "/sub/file.99.tar.gz",
            "/.sub/.file.foo",
            "/a/b/noext",
            "/file.",
        ];
        let versions = ["1.0.0", "1.0.0-rc1", "abc", "2.0", "1-0"];
        for layout in &layouts {
            for path in paths {
                for version in versions {
                    let physical = layout.resolve(path, version).unwrap();
                    assert_eq!(
                        layout.entry(&physical),
                        Some(VersionedEntry::new(path, version, physical.as_str())),
                        "{layout:?} {physical}"
                    );
                }
            }
        }
    }

    #[test]
    fn foreign_paths_are_rejected() {
        let layout = MavenLayout::default();
        // default layout entry
        assert_eq!(layout.entry("/1.0.0/file.txt"), None);
        // base name does not match the directory
        assert_eq!(layout.entry("/file/1.0.0/other-1.0.0.txt"), None);
        // version directory does not match the file name
        assert_eq!(layout.entry("/file/2.0.0/file-1.0.0.txt"), None);
        // extension would be split differently
        assert_eq!(layout.entry("/file/1.0.0/file-1.0.0.tar.gz"), None);
    }

    #[test]
    fn listing_root_is_base_directory() {
        let layout = MavenLayout::new(["tar.gz"], false).unwrap();
        assert_eq!(layout.listing_root("/sub/file.tar.gz").unwrap(), "/sub/file/");
        assert_eq!(layout.listing_root("/file.txt").unwrap(), "/file/");
    }
}
