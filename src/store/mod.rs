//! # Store
//!
//! The transfer engine: every operation on physical backend paths, built on
//! top of a [`Backend`].
//!
//! ## Responsibility
//! - Validate paths before any backend call
//! - Track whether the repository is open
//! - Wrap provider faults into [`StoreError::Backend`]
//! - Safe transfers: checksum skip, atomic staging, validate and roll back
//!
//! ## Usage
//!
//! ```rust
//! use anystore::{FileSystem, ListOptions, Store, TransferOptions};
//!
//! let host = tempfile::tempdir().unwrap();
//! let store = Store::create(FileSystem::new(host.path(), "repo")).unwrap();
//! store.open().unwrap();
//!
//! let src = host.path().join("src.txt");
//! std::fs::write(&src, "hello").unwrap();
//! store.put_file(&src, "/sub/file.txt", TransferOptions::default()).unwrap();
//!
//! assert!(store.exists("/sub/file.txt", false).unwrap());
//! assert_eq!(store.ls("/", &ListOptions::default()).unwrap(), vec!["/sub/file.txt"]);
//! ```

mod archive;
mod transfer;

use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{call_backend, call_backend_or};
use crate::path::{self, SEP};
use crate::{Backend, ListOptions, Result, StoreError};

/// Transfer engine over a single backend repository.
///
/// A store starts closed. Every operation except [`open`](Self::open),
/// [`close`](Self::close) and the pure path helpers fails with
/// [`StoreError::NotOpened`] until the repository is opened. Dropping an open
/// store closes it.
///
/// # Thread Safety
///
/// `Store` is `Send + Sync` whenever the backend is, all methods take
/// `&self`. Concurrent transfers to different paths never interfere, every
/// transfer stages through its own temporary directory.
pub struct Store<B: Backend> {
    backend: B,
    opened: AtomicBool,
}

impl<B: Backend> std::fmt::Debug for Store<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("host", &self.backend.host())
            .field("repository", &self.backend.repository())
            .field("opened", &self.is_opened())
            .finish()
    }
}

impl<B: Backend> Store<B> {
    /// Wrap a backend. The store is not opened yet.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            opened: AtomicBool::new(false),
        }
    }

    /// Create the repository and wrap the backend.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Backend`] if the repository exists already or cannot
    ///   be created
    pub fn create(backend: B) -> Result<Self> {
        call_backend("create", || backend.create())?;
        log::info!(
            "created repository '{}' on '{}'",
            backend.repository(),
            backend.host()
        );
        Ok(Self::new(backend))
    }

    /// Delete the repository with all its content.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Backend`] if the repository cannot be deleted
    pub fn delete(backend: B) -> Result<()> {
        call_backend("delete", || backend.delete())?;
        log::info!(
            "deleted repository '{}' on '{}'",
            backend.repository(),
            backend.host()
        );
        Ok(())
    }

    /// Open the repository. Does nothing if already open.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Backend`] if the repository does not exist or the
    ///   connection fails
    pub fn open(&self) -> Result<()> {
        if self.is_opened() {
            return Ok(());
        }
        call_backend("open", || self.backend.open())?;
        self.opened.store(true, Ordering::SeqCst);
        log::debug!("opened repository '{}'", self.backend.repository());
        Ok(())
    }

    /// Close the repository. Does nothing if not open.
    ///
    /// The store stays open if the provider fails to close.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Backend`] if the provider fails to close
    pub fn close(&self) -> Result<()> {
        if !self.is_opened() {
            return Ok(());
        }
        call_backend("close", || self.backend.close())?;
        self.opened.store(false, Ordering::SeqCst);
        log::debug!("closed repository '{}'", self.backend.repository());
        Ok(())
    }

    /// Whether the repository is open.
    pub fn is_opened(&self) -> bool {
        self.opened.load(Ordering::SeqCst)
    }

    /// The wrapped backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Host of the repository.
    pub fn host(&self) -> &str {
        self.backend.host()
    }

    /// Name of the repository.
    pub fn repository(&self) -> &str {
        self.backend.repository()
    }

    fn ensure_open(&self, operation: &'static str) -> Result<()> {
        if self.is_opened() {
            Ok(())
        } else {
            Err(StoreError::NotOpened { operation })
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// MD5 checksum of a file on the backend.
    ///
    /// # Errors
    ///
    /// - [`StoreError::InvalidPath`] if `path` is not a valid file path
    /// - [`StoreError::Backend`] if the provider fails, e.g. the file does
    ///   not exist
    pub fn checksum(&self, path: &str) -> Result<String> {
        self.ensure_open("checksum")?;
        let path = path::check_path(path, false)?;
        call_backend("checksum", || self.backend.checksum(&path))
    }

    /// Check if a file exists on the backend.
    ///
    /// With `suppress_backend_errors` a provider fault yields `false`.
    ///
    /// # Errors
    ///
    /// - [`StoreError::InvalidPath`] if `path` is not a valid file path
    /// - [`StoreError::Backend`] if the provider fails and errors are not
    ///   suppressed
    pub fn exists(&self, path: &str, suppress_backend_errors: bool) -> Result<bool> {
        self.ensure_open("exists")?;
        let path = path::check_path(path, false)?;
        call_backend_or("exists", suppress_backend_errors, false, || {
            self.backend.exists(&path)
        })
    }

    /// Last modification date of a file as `YYYY-MM-DD`.
    ///
    /// # Errors
    ///
    /// - [`StoreError::InvalidPath`] if `path` is not a valid file path
    /// - [`StoreError::Backend`] if the provider fails
    pub fn date(&self, path: &str) -> Result<String> {
        self.ensure_open("date")?;
        let path = path::check_path(path, false)?;
        call_backend("date", || self.backend.date(&path))
    }

    /// Owner of a file on the backend.
    ///
    /// # Errors
    ///
    /// - [`StoreError::InvalidPath`] if `path` is not a valid file path
    /// - [`StoreError::Backend`] if the provider fails
    pub fn owner(&self, path: &str) -> Result<String> {
        self.ensure_open("owner")?;
        let path = path::check_path(path, false)?;
        call_backend("owner", || self.backend.owner(&path))
    }

    /// List files on the backend.
    ///
    /// A sub-path (ending on `/`) lists every file below it, recursively.
    /// A file path lists the file itself if it exists. The result is sorted
    /// and filtered by `options.pattern` on the basename.
    /// `options.latest_version` has no meaning here and is ignored.
    ///
    /// # Errors
    ///
    /// - [`StoreError::InvalidPath`] if `path` is invalid
    /// - [`StoreError::InvalidPattern`] if the glob pattern is invalid
    /// - [`StoreError::Backend`] if the provider fails, or nothing was
    ///   found for a path other than `/`, unless errors are suppressed
    pub fn ls(&self, path: &str, options: &ListOptions) -> Result<Vec<String>> {
        self.ensure_open("ls")?;
        let path = path::check_path(path, true)?;
        let pattern = compile_pattern(options.pattern.as_deref())?;
        let suppress = options.suppress_backend_errors;

        let mut paths = if path.ends_with(SEP) {
            call_backend_or("ls", suppress, Vec::new(), || self.backend.ls(&path))?
        } else if self.exists(&path, suppress)? {
            vec![path.clone()]
        } else {
            Vec::new()
        };

        if paths.is_empty() {
            if path != "/" && !suppress {
                return Err(StoreError::backend_not_found("ls", &path));
            }
            return Ok(paths);
        }

        paths.sort();
        if let Some(pattern) = pattern {
            paths.retain(|p| pattern.matches(path::basename(p)));
        }
        Ok(paths)
    }

    // ========================================================================
    // Path Helpers
    // ========================================================================

    /// Join parts onto a (sub-)path, see [`path::join`].
    ///
    /// # Errors
    ///
    /// - [`StoreError::InvalidPath`] if the result is invalid
    pub fn join(&self, base: &str, parts: &[&str]) -> Result<String> {
        path::join(base, parts)
    }

    /// Split a path into root and basename, see [`path::split`].
    ///
    /// # Errors
    ///
    /// - [`StoreError::InvalidPath`] if `path` is invalid
    pub fn split(&self, path: &str) -> Result<(String, String)> {
        path::split(path)
    }

    /// Separator of backend paths.
    pub fn sep(&self) -> char {
        SEP
    }
}

impl<B: Backend> Drop for Store<B> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            log::warn!("failed to close repository '{}': {e}", self.backend.repository());
        }
    }
}

/// Compile an optional glob pattern.
pub(crate) fn compile_pattern(pattern: Option<&str>) -> Result<Option<glob::Pattern>> {
    pattern
        .filter(|p| !p.is_empty())
        .map(|p| {
            glob::Pattern::new(p).map_err(|e| StoreError::InvalidPattern {
                pattern: p.to_string(),
                reason: e.to_string(),
            })
        })
        .transpose()
}
