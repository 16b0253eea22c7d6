//! # PathLayout Trait
//!
//! Strategy trait for mapping a logical `(path, version)` pair to a
//! physical backend path and back.
//!
//! ## Responsibility
//! - Resolve a logical path and version to the physical path
//! - Recover the logical path and version from a physical listing entry
//! - Tell the listing protocol where and how deep versioned files live
//!
//! ## Dependencies
//! - [`path`](crate::path) rules for validation and joining
//!
//! ## Layouts
//!
//! | Layout | Physical path |
//! |--------|---------------|
//! | [`DefaultLayout`] | `<root>/<version>/<name>` |
//! | [`MavenLayout`] | `<root>/<base>/<version>/<base>-<version><ext>` |
//!
//! ```rust
//! use anystore::{DefaultLayout, PathLayout, VersionedEntry};
//!
//! let layout = DefaultLayout;
//! let physical = layout.resolve("/sub/file.txt", "1.0.0").unwrap();
//! assert_eq!(physical, "/sub/1.0.0/file.txt");
//! assert_eq!(
//!     layout.entry(&physical),
//!     Some(VersionedEntry::new("/sub/file.txt", "1.0.0", "/sub/1.0.0/file.txt"))
//! );
//! ```

mod maven;

pub use maven::MavenLayout;

use crate::path::{self, SEP};
use crate::{Result, VersionedEntry};

// ============================================================================
// Trait Definition
// ============================================================================

/// Strategy trait for versioned path layouts.
///
/// # Round Trip
///
/// For every valid path and version,
/// `entry(&resolve(path, version)?) == Some((path, version))` must hold.
/// [`entry`](Self::entry) enforces this by re-resolving whatever
/// [`parse`](Self::parse) recovers, so physical paths that do not belong to
/// the layout are never reported.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync`.
///
/// # Object Safety
///
/// This trait is object-safe, interfaces hold a `Box<dyn PathLayout>`.
pub trait PathLayout: Send + Sync + std::fmt::Debug {
    /// Physical path of `version` of the logical file `path`.
    ///
    /// # Errors
    ///
    /// - [`StoreError::InvalidPath`](crate::StoreError::InvalidPath) if
    ///   `path` is not a valid file path
    /// - [`StoreError::InvalidVersion`](crate::StoreError::InvalidVersion)
    ///   if `version` is invalid
    fn resolve(&self, path: &str, version: &str) -> Result<String>;

    /// Sub-path to list when searching all versions of the file `path`.
    ///
    /// # Errors
    ///
    /// - [`StoreError::InvalidPath`](crate::StoreError::InvalidPath) if
    ///   `path` is not a valid file path
    fn listing_root(&self, path: &str) -> Result<String>;

    /// Number of separators a versioned file directly below a sub-path has,
    /// on top of the separators of the sub-path itself.
    fn depth_offset(&self) -> usize;

    /// Recover logical path and version from a physical path.
    ///
    /// The returned entry keeps `physical` as its backend path.
    ///
    /// Returns `None` if the physical path cannot be part of the layout.
    fn parse(&self, physical: &str) -> Option<VersionedEntry>;

    /// Like [`parse`](Self::parse), but only accepts physical paths that
    /// resolve back to themselves.
    fn entry(&self, physical: &str) -> Option<VersionedEntry> {
        let entry = self.parse(physical)?;
        match self.resolve(&entry.path, &entry.version) {
            Ok(resolved) if resolved == physical => Some(entry),
            _ => None,
        }
    }
}

impl<T: PathLayout + ?Sized> PathLayout for Box<T> {
    fn resolve(&self, path: &str, version: &str) -> Result<String> {
        (**self).resolve(path, version)
    }

    fn listing_root(&self, path: &str) -> Result<String> {
        (**self).listing_root(path)
    }

    fn depth_offset(&self) -> usize {
        (**self).depth_offset()
    }

    fn parse(&self, physical: &str) -> Option<VersionedEntry> {
        (**self).parse(physical)
    }
}

// ============================================================================
// Default Layout
// ============================================================================

/// Version as a directory right above the file: `<root>/<version>/<name>`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultLayout;

impl PathLayout for DefaultLayout {
    fn resolve(&self, path: &str, version: &str) -> Result<String> {
        let path = path::check_path(path, false)?;
        let version = path::check_version(version)?;
        let (root, name) = path::split(&path)?;
        path::join(&root, &[&version, &name])
    }

    fn listing_root(&self, path: &str) -> Result<String> {
        let path = path::check_path(path, false)?;
        let (root, _) = path::split(&path)?;
        Ok(root)
    }

    fn depth_offset(&self) -> usize {
        1
    }

    fn parse(&self, physical: &str) -> Option<VersionedEntry> {
        let tokens: Vec<&str> = physical.split(SEP).collect();
        let [parents @ .., version, name] = tokens.as_slice() else {
            return None;
        };
        if parents.is_empty() || version.is_empty() || name.is_empty() {
            return None;
        }
        let root = format!("{}{SEP}", parents.join("/"));
        Some(VersionedEntry::new(format!("{root}{name}"), *version, physical))
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Serializable description of a layout.
///
/// ```rust
/// use anystore::LayoutConfig;
///
/// let config = LayoutConfig::Maven {
///     extensions: vec!["tar.gz".into()],
///     regex: false,
/// };
/// let layout = config.build().unwrap();
/// assert_eq!(
///     layout.resolve("/file.tar.gz", "1.0.0").unwrap(),
///     "/file/1.0.0/file-1.0.0.tar.gz"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "layout", rename_all = "lowercase"))]
pub enum LayoutConfig {
    /// [`DefaultLayout`].
    #[default]
    Default,
    /// [`MavenLayout`] with custom extensions.
    Maven {
        /// Multi-part extensions, e.g. `tar.gz`.
        #[cfg_attr(feature = "serde", serde(default))]
        extensions: Vec<String>,
        /// Treat extensions as regular expressions.
        #[cfg_attr(feature = "serde", serde(default))]
        regex: bool,
    },
}

impl LayoutConfig {
    /// Build the layout strategy.
    ///
    /// # Errors
    ///
    /// - [`StoreError::InvalidPattern`](crate::StoreError::InvalidPattern)
    ///   if an extension regex does not compile
    pub fn build(&self) -> Result<Box<dyn PathLayout>> {
        Ok(match self {
            LayoutConfig::Default => Box::new(DefaultLayout),
            LayoutConfig::Maven { extensions, regex } => {
                Box::new(MavenLayout::new(extensions.iter().cloned(), *regex)?)
            }
        })
    }

    /// Parse a layout description such as
    /// `{"layout":"maven","extensions":["tar.gz"],"regex":false}`.
    ///
    /// # Errors
    ///
    /// - [`StoreError::InvalidConfig`](crate::StoreError::InvalidConfig) if
    ///   the JSON does not describe a layout
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| crate::StoreError::InvalidConfig {
            reason: e.to_string(),
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StoreError;

    #[test]
    fn default_resolve() {
        let layout = DefaultLayout;
        assert_eq!(layout.resolve("/file.txt", "1.0.0").unwrap(), "/1.0.0/file.txt");
        assert_eq!(
            layout.resolve("/a/b/file.tar.gz", "2.0").unwrap(),
            "/a/b/2.0/file.tar.gz"
        );
    }

    #[test]
    fn default_resolve_validates() {
        let layout = DefaultLayout;
        assert!(matches!(
            layout.resolve("file.txt", "1.0.0"),
            Err(StoreError::InvalidPath { .. })
        ));
        assert!(matches!(
            layout.resolve("/sub/", "1.0.0"),
            Err(StoreError::InvalidPath { .. })
        ));
        assert!(matches!(
            layout.resolve("/file.txt", ""),
            Err(StoreError::InvalidVersion { .. })
        ));
    }

    #[test]
    fn default_round_trip() {
        let layout = DefaultLayout;
        for path in ["/f", "/.hidden", "/a/b/c.tar.gz", "/sub/1.0.0"] {
            for version in ["1.0.0", "1.0.0-rc1", "abc", "10"] {
                let physical = layout.resolve(path, version).unwrap();
                assert_eq!(
                    layout.entry(&physical),
                    Some(VersionedEntry::new(path, version, physical.as_str())),
                    "{physical}"
                );
            }
        }
    }

    #[test]
    fn default_parse_rejects_unversioned_file() {
        let layout = DefaultLayout;
        assert_eq!(layout.parse("/file.txt"), None);
        assert_eq!(layout.parse("/"), None);
        assert_eq!(layout.parse("/sub/"), None);
    }

    #[test]
    fn default_listing_root() {
        assert_eq!(DefaultLayout.listing_root("/a/b.txt").unwrap(), "/a/");
        assert_eq!(DefaultLayout.listing_root("/b.txt").unwrap(), "/");
    }

    #[test]
    fn config_builds_layouts() {
        let layout = LayoutConfig::default().build().unwrap();
        assert_eq!(layout.depth_offset(), 1);

        let layout = LayoutConfig::Maven {
            extensions: vec![],
            regex: false,
        }
        .build()
        .unwrap();
        assert_eq!(layout.depth_offset(), 2);
    }

    #[test]
    fn config_rejects_bad_regex() {
        let config = LayoutConfig::Maven {
            extensions: vec!["(".into()],
            regex: true,
        };
        assert!(matches!(
            config.build(),
            Err(StoreError::InvalidPattern { .. })
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn config_from_json() {
        let config =
            LayoutConfig::from_json(r#"{"layout":"maven","extensions":["tar.gz"],"regex":false}"#)
                .unwrap();
        assert_eq!(
            config,
            LayoutConfig::Maven {
                extensions: vec!["tar.gz".into()],
                regex: false
            }
        );
        assert_eq!(
            LayoutConfig::from_json(r#"{"layout":"default"}"#).unwrap(),
            LayoutConfig::Default
        );
        assert!(matches!(
            LayoutConfig::from_json(r#"{"layout":"ivy"}"#),
            Err(StoreError::InvalidConfig { .. })
        ));
    }
}
