//! Multiple versions per path.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::layout::{DefaultLayout, LayoutConfig, MavenLayout, PathLayout};
use crate::path::{self, SEP};
use crate::store::compile_pattern;
use crate::version::{compare_versions, sort_versions};
use crate::{
    ArchiveOptions, Backend, ListOptions, Result, Store, StoreError, TransferOptions,
    VersionedEntry,
};

/// Interface storing multiple versions of a file.
///
/// Where a version ends up on the backend is decided by a [`PathLayout`],
/// fixed at construction.
///
/// ```rust
/// use anystore::{FileSystem, ListOptions, Store, TransferOptions, Versioned, VersionedEntry};
///
/// let host = tempfile::tempdir().unwrap();
/// let store = Store::create(FileSystem::new(host.path(), "repo")).unwrap();
/// store.open().unwrap();
/// let interface = Versioned::new(store);
///
/// let src = host.path().join("src.txt");
/// std::fs::write(&src, "hello").unwrap();
/// for version in ["1.0.0", "2.0.0"] {
///     interface.put_file(&src, "/file.txt", version, TransferOptions::default()).unwrap();
/// }
///
/// assert_eq!(interface.path("/file.txt", "1.0.0").unwrap(), "/1.0.0/file.txt");
/// assert_eq!(interface.latest_version("/file.txt").unwrap(), "2.0.0");
/// assert_eq!(
///     interface.ls("/", &ListOptions::default().latest()).unwrap(),
///     vec![VersionedEntry::new("/file.txt", "2.0.0", "/2.0.0/file.txt")]
/// );
/// ```
#[derive(Debug)]
pub struct Versioned<B: Backend> {
    store: Arc<Store<B>>,
    layout: Arc<dyn PathLayout>,
}

impl<B: Backend> Clone for Versioned<B> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            layout: Arc::clone(&self.layout),
        }
    }
}

impl<B: Backend> Versioned<B> {
    /// Interface with the [`DefaultLayout`].
    pub fn new(store: impl Into<Arc<Store<B>>>) -> Self {
        Self::with_layout(store, Box::new(DefaultLayout))
    }

    /// Interface with a custom layout.
    pub fn with_layout(store: impl Into<Arc<Store<B>>>, layout: Box<dyn PathLayout>) -> Self {
        Self {
            store: store.into(),
            layout: Arc::from(layout),
        }
    }

    /// Interface with the layout described by `config`.
    ///
    /// # Errors
    ///
    /// - [`StoreError::InvalidPattern`] if an extension regex is invalid
    pub fn from_config(store: impl Into<Arc<Store<B>>>, config: &LayoutConfig) -> Result<Self> {
        Ok(Self::with_layout(store, config.build()?))
    }

    /// Interface with the legacy [`MavenLayout`].
    ///
    /// # Errors
    ///
    /// - [`StoreError::InvalidPattern`] if `regex` is set and an extension
    ///   is not a valid regular expression
    pub fn maven<I, S>(store: impl Into<Arc<Store<B>>>, extensions: I, regex: bool) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let layout = MavenLayout::new(extensions, regex)?;
        Ok(Self::with_layout(store, Box::new(layout)))
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<Store<B>> {
        &self.store
    }

    /// The layout strategy.
    pub fn layout(&self) -> &dyn PathLayout {
        self.layout.as_ref()
    }

    /// Physical backend path of a version.
    ///
    /// # Errors
    ///
    /// - [`StoreError::InvalidPath`] if `path` is not a valid file path
    /// - [`StoreError::InvalidVersion`] if `version` is invalid
    pub fn path(&self, path: &str, version: &str) -> Result<String> {
        self.layout.resolve(path, version)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// MD5 checksum of a version.
    pub fn checksum(&self, path: &str, version: &str) -> Result<String> {
        self.store.checksum(&self.path(path, version)?)
    }

    /// Last modification date of a version.
    pub fn date(&self, path: &str, version: &str) -> Result<String> {
        self.store.date(&self.path(path, version)?)
    }

    /// Owner of a version.
    pub fn owner(&self, path: &str, version: &str) -> Result<String> {
        self.store.owner(&self.path(path, version)?)
    }

    /// Check if a version exists.
    pub fn exists(&self, path: &str, version: &str, suppress_backend_errors: bool) -> Result<bool> {
        self.store
            .exists(&self.path(path, version)?, suppress_backend_errors)
    }

    /// List stored versions.
    ///
    /// A sub-path (ending on `/`) lists the versioned files directly below
    /// it, deeper entries are skipped. A file path lists all versions of
    /// that file. Entries are
    /// sorted by path, then by version string. With
    /// `options.latest_version` only the latest version of every path is
    /// kept, compared with [`compare_versions`](crate::compare_versions).
    ///
    /// # Errors
    ///
    /// - [`StoreError::InvalidPath`] if `path` is invalid
    /// - [`StoreError::InvalidPattern`] if the glob pattern is invalid
    /// - [`StoreError::Backend`] if the provider fails, or no version of a
    ///   file path was found, unless errors are suppressed
    pub fn ls(&self, path: &str, options: &ListOptions) -> Result<Vec<VersionedEntry>> {
        let path = path::check_path(path, true)?;
        let pattern = compile_pattern(options.pattern.as_deref())?;
        let raw = ListOptions {
            pattern: None,
            latest_version: false,
            suppress_backend_errors: options.suppress_backend_errors,
        };

        let mut entries: Vec<VersionedEntry> = if path.ends_with(SEP) {
            let depth = path::depth(&path) + self.layout.depth_offset();
            self.store
                .ls(&path, &raw)?
                .iter()
                .filter(|p| path::depth(p) == depth)
                .filter_map(|p| self.layout.entry(p))
                .collect()
        } else {
            let root = self.layout.listing_root(&path)?;
            let entries: Vec<VersionedEntry> = self
                .store
                .ls(&root, &raw)?
                .iter()
                .filter_map(|p| self.layout.entry(p))
                .filter(|e| e.path == path)
                .collect();
            if entries.is_empty() && !options.suppress_backend_errors {
                return Err(StoreError::backend_not_found("ls", &path));
            }
            entries
        };

        if let Some(pattern) = pattern {
            entries.retain(|e| pattern.matches(path::basename(&e.path)));
        }
        entries.sort();

        if options.latest_version {
            entries = latest_per_path(entries);
        }
        Ok(entries)
    }

    /// Versions of a file, ascending.
    ///
    /// # Errors
    ///
    /// - [`StoreError::InvalidPath`] if `path` is not a valid file path
    /// - [`StoreError::Backend`] if no version exists, unless errors are
    ///   suppressed
    pub fn versions(&self, path: &str, suppress_backend_errors: bool) -> Result<Vec<String>> {
        let path = path::check_path(path, false)?;
        let options = ListOptions {
            suppress_backend_errors,
            ..ListOptions::default()
        };
        let mut versions: Vec<String> = self
            .ls(&path, &options)?
            .into_iter()
            .map(|e| e.version)
            .collect();
        sort_versions(&mut versions);
        Ok(versions)
    }

    /// Latest version of a file.
    ///
    /// # Errors
    ///
    /// - [`StoreError::InvalidPath`] if `path` is not a valid file path
    /// - [`StoreError::Backend`] if no version exists
    pub fn latest_version(&self, path: &str) -> Result<String> {
        self.versions(path, false)?
            .pop()
            .ok_or_else(|| StoreError::backend_not_found("latest_version", path))
    }

    // ========================================================================
    // Transfers
    // ========================================================================

    /// Download a version of a file, see [`Store::get_file`].
    pub fn get_file(
        &self,
        src: &str,
        dst: impl AsRef<Path>,
        version: &str,
        options: TransferOptions,
    ) -> Result<PathBuf> {
        self.store.get_file(&self.path(src, version)?, dst, options)
    }

    /// Upload a file as a version, see [`Store::put_file`].
    pub fn put_file(
        &self,
        src: impl AsRef<Path>,
        dst: &str,
        version: &str,
        options: TransferOptions,
    ) -> Result<()> {
        self.store.put_file(src, &self.path(dst, version)?, options)
    }

    /// Copy a file on the backend.
    ///
    /// With `version` set to `None` every version of `src` is copied.
    pub fn copy_file(
        &self,
        src: &str,
        dst: &str,
        version: Option<&str>,
        options: TransferOptions,
    ) -> Result<()> {
        for version in self.selected_versions(src, version)? {
            let src = self.path(src, &version)?;
            let dst = self.path(dst, &version)?;
            self.store.copy_file(&src, &dst, options)?;
        }
        Ok(())
    }

    /// Move a file on the backend.
    ///
    /// With `version` set to `None` every version of `src` is moved.
    pub fn move_file(
        &self,
        src: &str,
        dst: &str,
        version: Option<&str>,
        options: TransferOptions,
    ) -> Result<()> {
        for version in self.selected_versions(src, version)? {
            let src = self.path(src, &version)?;
            let dst = self.path(dst, &version)?;
            self.store.move_file(&src, &dst, options)?;
        }
        Ok(())
    }

    /// Remove a version of a file.
    pub fn remove_file(&self, path: &str, version: &str) -> Result<()> {
        self.store.remove_file(&self.path(path, version)?)
    }

    /// Download and extract a version of an archive, see
    /// [`Store::get_archive`].
    pub fn get_archive(
        &self,
        src: &str,
        dst_root: impl AsRef<Path>,
        version: &str,
        options: &ArchiveOptions,
    ) -> Result<Vec<String>> {
        self.store
            .get_archive(&self.path(src, version)?, dst_root, options)
    }

    /// Pack and upload an archive as a version, see [`Store::put_archive`].
    pub fn put_archive(
        &self,
        src_root: impl AsRef<Path>,
        dst: &str,
        version: &str,
        options: &ArchiveOptions,
    ) -> Result<()> {
        self.store
            .put_archive(src_root, &self.path(dst, version)?, options)
    }

    /// Join parts onto a (sub-)path.
    pub fn join(&self, base: &str, parts: &[&str]) -> Result<String> {
        self.store.join(base, parts)
    }

    /// Split a path into root and basename.
    pub fn split(&self, path: &str) -> Result<(String, String)> {
        self.store.split(path)
    }

    /// Separator of backend paths.
    pub fn sep(&self) -> char {
        self.store.sep()
    }

    fn selected_versions(&self, path: &str, version: Option<&str>) -> Result<Vec<String>> {
        match version {
            Some(version) => Ok(vec![version.to_string()]),
            None => self.versions(path, false),
        }
    }
}

/// Keep the latest version of every path. `entries` must be sorted by path.
fn latest_per_path(entries: Vec<VersionedEntry>) -> Vec<VersionedEntry> {
    entries
        .chunk_by(|a, b| a.path == b.path)
        .filter_map(|group| {
            group
                .iter()
                .max_by(|a, b| compare_versions(&a.version, &b.version))
                .cloned()
        })
        .collect()
}
