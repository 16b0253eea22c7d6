//! Safe file transfers: checksum skip, atomic staging, validate and roll back.

use std::fs;
use std::path::{Path, PathBuf};

use super::Store;
use crate::checksum::md5_file;
use crate::error::call_backend;
use crate::path;
use crate::{Backend, Result, StoreError, TransferOptions};

/// Name of the staged file inside a temporary directory.
const STAGED_NAME: &str = "~";

impl<B: Backend> Store<B> {
    /// Download a file to `dst` and return the absolute local path.
    ///
    /// Missing parent directories of `dst` are created. The download is
    /// skipped if `dst` already has the checksum of the remote file.
    /// Otherwise the file is staged in a temporary directory next to `dst`
    /// and renamed into place, so an existing `dst` is never left half
    /// written.
    ///
    /// # Errors
    ///
    /// - [`StoreError::InvalidPath`] if `src` is not a valid file path
    /// - [`StoreError::IsADirectory`] if `dst` is a directory
    /// - [`StoreError::NotADirectory`] if a parent of `dst` is a file
    /// - [`StoreError::PermissionDenied`] if `dst` or its parent is not
    ///   writable
    /// - [`StoreError::Backend`] if the provider fails
    /// - [`StoreError::Interrupted`] if `options.validate` is set and the
    ///   local checksum does not match, the local file is removed
    pub fn get_file(
        &self,
        src: &str,
        dst: impl AsRef<Path>,
        options: TransferOptions,
    ) -> Result<PathBuf> {
        self.ensure_open("get_file")?;
        let src = path::check_path(src, false)?;
        let dst = std::path::absolute(dst.as_ref())
            .map_err(|e| StoreError::local("get_file", dst.as_ref(), e))?;

        if dst.is_dir() {
            return Err(StoreError::IsADirectory { path: dst });
        }
        let dst_root = dst.parent().unwrap_or_else(|| Path::new("/")).to_path_buf();
        fs::create_dir_all(&dst_root).map_err(|e| StoreError::local("get_file", &dst_root, e))?;
        if !is_writable(&dst_root) {
            return Err(StoreError::PermissionDenied {
                path: dst_root,
                operation: "get_file",
            });
        }
        if dst.exists() && !is_writable(&dst) {
            return Err(StoreError::PermissionDenied {
                path: dst,
                operation: "get_file",
            });
        }

        if dst.exists() && md5_file(&dst)? == self.checksum(&src)? {
            log::log!(
                options.log_level(),
                "get_file: skipped {src}, {} is up to date",
                dst.display()
            );
            return Ok(dst);
        }

        let tmp = tempfile::tempdir_in(&dst_root)
            .map_err(|e| StoreError::local("get_file", &dst_root, e))?;
        let staged = tmp.path().join(STAGED_NAME);
        call_backend("get_file", || self.backend.get_file(&src, &staged))?;
        fs::rename(&staged, &dst).map_err(|e| StoreError::local("get_file", &dst, e))?;
        log::log!(options.log_level(), "get_file: {src} -> {}", dst.display());

        if options.validate {
            let expected = self.checksum(&src)?;
            self.validate_local(&dst, &expected)?;
        }
        Ok(dst)
    }

    /// Upload a local file to `dst`.
    ///
    /// Nothing is written if `dst` already exists with the checksum of
    /// `src`, so repeated uploads of an unchanged file are free.
    ///
    /// # Errors
    ///
    /// - [`StoreError::InvalidPath`] if `dst` is not a valid file path
    /// - [`StoreError::NotFound`] if `src` does not exist or cannot be
    ///   reached
    /// - [`StoreError::IsADirectory`] if `src` is a directory
    /// - [`StoreError::Backend`] if the provider fails
    /// - [`StoreError::Interrupted`] if `options.validate` is set and the
    ///   remote checksum does not match, the remote file is removed
    pub fn put_file(
        &self,
        src: impl AsRef<Path>,
        dst: &str,
        options: TransferOptions,
    ) -> Result<()> {
        self.ensure_open("put_file")?;
        let dst = path::check_path(dst, false)?;
        let src = src.as_ref();
        let meta = fs::metadata(src).map_err(|e| match e.kind() {
            std::io::ErrorKind::PermissionDenied => StoreError::local("put_file", src, e),
            _ => StoreError::NotFound {
                path: src.to_path_buf(),
            },
        })?;
        if meta.is_dir() {
            return Err(StoreError::IsADirectory {
                path: src.to_path_buf(),
            });
        }

        let checksum = md5_file(src)?;
        if self.exists(&dst, false)? && self.checksum(&dst)? == checksum {
            log::log!(
                options.log_level(),
                "put_file: skipped {}, {dst} is up to date",
                src.display()
            );
            return Ok(());
        }

        call_backend("put_file", || self.backend.put_file(src, &dst, &checksum))?;
        log::log!(options.log_level(), "put_file: {} -> {dst}", src.display());

        if options.validate {
            self.validate_remote(&dst, &checksum)?;
        }
        Ok(())
    }

    /// Copy a file on the backend.
    ///
    /// Does nothing if `src == dst` or `dst` already holds the same content.
    /// Uses the provider's native copy if available, otherwise downloads to
    /// a temporary file and uploads it again.
    ///
    /// # Errors
    ///
    /// - [`StoreError::InvalidPath`] if a path is not a valid file path
    /// - [`StoreError::Backend`] if the provider fails
    /// - [`StoreError::Interrupted`] if `options.validate` is set and the
    ///   checksums differ, `dst` is removed
    pub fn copy_file(&self, src: &str, dst: &str, options: TransferOptions) -> Result<()> {
        self.ensure_open("copy_file")?;
        let src = path::check_path(src, false)?;
        let dst = path::check_path(dst, false)?;

        if src == dst || self.same_content(&src, &dst)? {
            log::log!(options.log_level(), "copy_file: skipped {src}, {dst} is up to date");
            return Ok(());
        }

        if call_backend("copy_file", || self.backend.copy_file(&src, &dst))? {
            log::log!(options.log_level(), "copy_file: {src} -> {dst} (native)");
        } else {
            let unchecked = options.validate(false);
            let tmp = tempfile::tempdir()
                .map_err(|e| StoreError::local("copy_file", std::env::temp_dir(), e))?;
            let staged = self.get_file(&src, tmp.path().join(STAGED_NAME), unchecked)?;
            self.put_file(&staged, &dst, unchecked)?;
            log::log!(options.log_level(), "copy_file: {src} -> {dst}");
        }

        if options.validate {
            let expected = self.checksum(&src)?;
            self.validate_remote(&dst, &expected)?;
        }
        Ok(())
    }

    /// Move a file on the backend.
    ///
    /// If `dst` already holds the same content only `src` is removed. With
    /// `options.validate` the source is removed only after the copy passed
    /// validation, so a failed move never loses the source.
    ///
    /// # Errors
    ///
    /// - [`StoreError::InvalidPath`] if a path is not a valid file path
    /// - [`StoreError::Backend`] if the provider fails
    /// - [`StoreError::Interrupted`] if `options.validate` is set and the
    ///   checksums differ, `dst` is removed and `src` kept
    pub fn move_file(&self, src: &str, dst: &str, options: TransferOptions) -> Result<()> {
        self.ensure_open("move_file")?;
        let src = path::check_path(src, false)?;
        let dst = path::check_path(dst, false)?;

        if src == dst {
            return Ok(());
        }
        if self.same_content(&src, &dst)? {
            log::log!(options.log_level(), "move_file: {dst} is up to date, removing {src}");
            return self.remove_file(&src);
        }

        if options.validate {
            self.copy_file(&src, &dst, options)?;
            return self.remove_file(&src);
        }

        if call_backend("move_file", || self.backend.move_file(&src, &dst))? {
            log::log!(options.log_level(), "move_file: {src} -> {dst} (native)");
            return Ok(());
        }
        self.copy_file(&src, &dst, options)?;
        self.remove_file(&src)?;
        log::log!(options.log_level(), "move_file: {src} -> {dst}");
        Ok(())
    }

    /// Remove a file from the backend.
    ///
    /// # Errors
    ///
    /// - [`StoreError::InvalidPath`] if `path` is not a valid file path
    /// - [`StoreError::Backend`] if the provider fails, e.g. the file does
    ///   not exist
    pub fn remove_file(&self, path: &str) -> Result<()> {
        self.ensure_open("remove_file")?;
        let path = path::check_path(path, false)?;
        call_backend("remove_file", || self.backend.remove_file(&path))?;
        log::debug!("remove_file: {path}");
        Ok(())
    }

    fn same_content(&self, src: &str, dst: &str) -> Result<bool> {
        Ok(self.exists(dst, false)? && self.checksum(src)? == self.checksum(dst)?)
    }

    fn validate_remote(&self, path: &str, expected: &str) -> Result<()> {
        let checksum = self.checksum(path)?;
        if checksum == expected {
            return Ok(());
        }
        self.remove_file(path)?;
        log::warn!("{path} failed validation and was removed from the backend");
        Err(StoreError::Interrupted {
            path: path.to_string(),
            checksum,
            expected: expected.to_string(),
            location: "backend",
        })
    }

    fn validate_local(&self, path: &Path, expected: &str) -> Result<()> {
        let checksum = md5_file(path)?;
        if checksum == expected {
            return Ok(());
        }
        fs::remove_file(path).map_err(|e| StoreError::local("get_file", path, e))?;
        log::warn!(
            "{} failed validation and was removed from the local file system",
            path.display()
        );
        Err(StoreError::Interrupted {
            path: path.display().to_string(),
            checksum,
            expected: expected.to_string(),
            location: "local file system",
        })
    }
}

/// Whether a local file or directory accepts writes.
///
/// Files are opened for appending, directories must accept a new
/// temporary file. Nothing is modified.
fn is_writable(path: &Path) -> bool {
    if path.is_dir() {
        tempfile::tempfile_in(path).is_ok()
    } else {
        fs::OpenOptions::new().append(true).open(path).is_ok()
    }
}
