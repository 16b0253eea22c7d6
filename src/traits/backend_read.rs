//! Read-side capabilities of a storage backend.

use std::path::Path;

use crate::BackendResult;

/// Read operations a storage provider must support.
///
/// All paths are physical backend paths that have already been validated,
/// e.g. `/sub/1.0.0/file.txt`.
///
/// # Error Semantics
///
/// Return any error for genuine failures (transport, authentication, a
/// missing file where one is required). The engine wraps it into
/// [`StoreError::Backend`](crate::StoreError::Backend). "Not found" is never
/// signaled through the error type for [`exists`](Self::exists) and
/// [`ls`](Self::ls).
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync`. Methods use `&self` to allow
/// concurrent access.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn BackendRead`.
pub trait BackendRead: Send + Sync {
    /// MD5 checksum of a file on the backend, as lowercase hex.
    fn checksum(&self, path: &str) -> BackendResult<String>;

    /// Check if a file exists on the backend.
    fn exists(&self, path: &str) -> BackendResult<bool>;

    /// Last modification date as `YYYY-MM-DD`, or an empty string if unknown.
    fn date(&self, path: &str) -> BackendResult<String>;

    /// Owner of a file, or an empty string if unknown.
    fn owner(&self, path: &str) -> BackendResult<String>;

    /// Download a file to a local path.
    ///
    /// The parent of `dst` exists; `dst` itself may be overwritten.
    fn get_file(&self, src: &str, dst: &Path) -> BackendResult<()>;

    /// Flat recursive listing of every file under a sub-path.
    ///
    /// Returns an empty list if `path` does not exist.
    fn ls(&self, path: &str) -> BackendResult<Vec<String>>;
}

impl<T: BackendRead + ?Sized> BackendRead for Box<T> {
    fn checksum(&self, path: &str) -> BackendResult<String> {
        (**self).checksum(path)
    }

    fn exists(&self, path: &str) -> BackendResult<bool> {
        (**self).exists(path)
    }

    fn date(&self, path: &str) -> BackendResult<String> {
        (**self).date(path)
    }

    fn owner(&self, path: &str) -> BackendResult<String> {
        (**self).owner(path)
    }

    fn get_file(&self, src: &str, dst: &Path) -> BackendResult<()> {
        (**self).get_file(src, dst)
    }

    fn ls(&self, path: &str) -> BackendResult<Vec<String>> {
        (**self).ls(path)
    }
}
