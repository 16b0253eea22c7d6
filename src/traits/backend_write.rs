//! Write-side capabilities of a storage backend.

use std::path::Path;

use crate::BackendResult;

/// Write operations a storage provider must support.
///
/// # Native Copy and Move
///
/// [`copy_file`](Self::copy_file) and [`move_file`](Self::move_file) have
/// default implementations returning `Ok(false)`, meaning "not supported".
/// The engine then falls back to get-then-put through a temporary file
/// (and, for moves, a final remove). Override them if the provider can copy
/// or move server-side.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync`.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn BackendWrite`.
pub trait BackendWrite: Send + Sync {
    /// Upload a local file.
    ///
    /// `checksum` is the MD5 of `src`, computed once by the engine. Providers
    /// may attach it as metadata. Missing parent directories are created.
    fn put_file(&self, src: &Path, dst: &str, checksum: &str) -> BackendResult<()>;

    /// Remove a file.
    fn remove_file(&self, path: &str) -> BackendResult<()>;

    /// Copy a file on the backend, returning `Ok(false)` if unsupported.
    fn copy_file(&self, _src: &str, _dst: &str) -> BackendResult<bool> {
        Ok(false)
    }

    /// Move a file on the backend, returning `Ok(false)` if unsupported.
    fn move_file(&self, _src: &str, _dst: &str) -> BackendResult<bool> {
        Ok(false)
    }
}

impl<T: BackendWrite + ?Sized> BackendWrite for Box<T> {
    fn put_file(&self, src: &Path, dst: &str, checksum: &str) -> BackendResult<()> {
        (**self).put_file(src, dst, checksum)
    }

    fn remove_file(&self, path: &str) -> BackendResult<()> {
        (**self).remove_file(path)
    }

    fn copy_file(&self, src: &str, dst: &str) -> BackendResult<bool> {
        (**self).copy_file(src, dst)
    }

    fn move_file(&self, src: &str, dst: &str) -> BackendResult<bool> {
        (**self).move_file(src, dst)
    }
}
