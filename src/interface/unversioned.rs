//! One file per path.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::{ArchiveOptions, Backend, ListOptions, Result, Store, TransferOptions};

/// Interface storing a single file per path.
///
/// Logical and physical paths are the same, every call validates the path
/// and forwards to the [`Store`].
///
/// ```rust
/// use anystore::{FileSystem, ListOptions, Store, TransferOptions, Unversioned};
///
/// let host = tempfile::tempdir().unwrap();
/// let store = Store::create(FileSystem::new(host.path(), "repo")).unwrap();
/// store.open().unwrap();
/// let interface = Unversioned::new(store);
///
/// let src = host.path().join("src.txt");
/// std::fs::write(&src, "hello").unwrap();
/// interface.put_file(&src, "/file.txt", TransferOptions::default()).unwrap();
/// assert_eq!(interface.ls("/", &ListOptions::default()).unwrap(), vec!["/file.txt"]);
/// ```
#[derive(Debug)]
pub struct Unversioned<B: Backend> {
    store: Arc<Store<B>>,
}

impl<B: Backend> Clone for Unversioned<B> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<B: Backend> Unversioned<B> {
    /// Interface on top of a store.
    pub fn new(store: impl Into<Arc<Store<B>>>) -> Self {
        Self {
            store: store.into(),
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<Store<B>> {
        &self.store
    }

    /// MD5 checksum of a file, see [`Store::checksum`].
    pub fn checksum(&self, path: &str) -> Result<String> {
        self.store.checksum(path)
    }

    /// Copy a file, see [`Store::copy_file`].
    pub fn copy_file(&self, src: &str, dst: &str, options: TransferOptions) -> Result<()> {
        self.store.copy_file(src, dst, options)
    }

    /// Last modification date, see [`Store::date`].
    pub fn date(&self, path: &str) -> Result<String> {
        self.store.date(path)
    }

    /// Check if a file exists, see [`Store::exists`].
    pub fn exists(&self, path: &str, suppress_backend_errors: bool) -> Result<bool> {
        self.store.exists(path, suppress_backend_errors)
    }

    /// Download and extract an archive, see [`Store::get_archive`].
    pub fn get_archive(
        &self,
        src: &str,
        dst_root: impl AsRef<Path>,
        options: &ArchiveOptions,
    ) -> Result<Vec<String>> {
        self.store.get_archive(src, dst_root, options)
    }

    /// Download a file, see [`Store::get_file`].
    pub fn get_file(
        &self,
        src: &str,
        dst: impl AsRef<Path>,
        options: TransferOptions,
    ) -> Result<PathBuf> {
        self.store.get_file(src, dst, options)
    }

    /// List files, see [`Store::ls`].
    pub fn ls(&self, path: &str, options: &ListOptions) -> Result<Vec<String>> {
        self.store.ls(path, options)
    }

    /// Move a file, see [`Store::move_file`].
    pub fn move_file(&self, src: &str, dst: &str, options: TransferOptions) -> Result<()> {
        self.store.move_file(src, dst, options)
    }

    /// Owner of a file, see [`Store::owner`].
    pub fn owner(&self, path: &str) -> Result<String> {
        self.store.owner(path)
    }

    /// Pack and upload an archive, see [`Store::put_archive`].
    pub fn put_archive(
        &self,
        src_root: impl AsRef<Path>,
        dst: &str,
        options: &ArchiveOptions,
    ) -> Result<()> {
        self.store.put_archive(src_root, dst, options)
    }

    /// Upload a file, see [`Store::put_file`].
    pub fn put_file(&self, src: impl AsRef<Path>, dst: &str, options: TransferOptions) -> Result<()> {
        self.store.put_file(src, dst, options)
    }

    /// Remove a file, see [`Store::remove_file`].
    pub fn remove_file(&self, path: &str) -> Result<()> {
        self.store.remove_file(path)
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FileSystem, StoreError};

    fn interface() -> (tempfile::TempDir, Unversioned<FileSystem>) {
        let host = tempfile::tempdir().unwrap();
        let store = Store::create(FileSystem::new(host.path().join("host"), "repo")).unwrap();
        store.open().unwrap();
        (host, Unversioned::new(store))
    }

    #[test]
    fn ls_with_pattern() {
        let (dir, interface) = interface();
        let src = dir.path().join("src.txt");
        std::fs::write(&src, "x").unwrap();
        for dst in ["/a.txt", "/sub/b.txt", "/sub/c.csv"] {
            interface.put_file(&src, dst, TransferOptions::default()).unwrap();
        }

        assert_eq!(
            interface.ls("/", &ListOptions::default()).unwrap(),
            vec!["/a.txt", "/sub/b.txt", "/sub/c.csv"]
        );
        assert_eq!(
            interface
                .ls("/", &ListOptions::default().pattern("*.txt"))
                .unwrap(),
            vec!["/a.txt", "/sub/b.txt"]
        );
        assert_eq!(
            interface.ls("/sub/", &ListOptions::default()).unwrap(),
            vec!["/sub/b.txt", "/sub/c.csv"]
        );
        assert_eq!(
            interface.ls("/sub/c.csv", &ListOptions::default()).unwrap(),
            vec!["/sub/c.csv"]
        );
    }

    #[test]
    fn shared_store() {
        let (dir, interface) = interface();
        let other = Unversioned::new(Arc::clone(interface.store()));
        let src = dir.path().join("src.txt");
        std::fs::write(&src, "x").unwrap();
        interface.put_file(&src, "/a.txt", TransferOptions::default()).unwrap();
        assert!(other.exists("/a.txt", false).unwrap());
        assert_eq!(other.date("/a.txt").unwrap(), interface.date("/a.txt").unwrap());
    }

    #[test]
    fn invalid_path() {
        let (_dir, interface) = interface();
        assert!(matches!(
            interface.checksum("a.txt"),
            Err(StoreError::InvalidPath { .. })
        ));
        assert!(matches!(
            interface.remove_file("/a.txt/"),
            Err(StoreError::InvalidPath { .. })
        ));
        assert_eq!(interface.sep(), '/');
    }
}
