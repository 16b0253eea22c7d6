//! Error types for the AnyStore storage abstraction.

use std::path::PathBuf;

/// Error raised by a concrete backend provider.
///
/// Providers are free to return any error type; the engine wraps it into
/// [`StoreError::Backend`] at the boundary of every capability call.
pub type BackendFault = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type returned by backend capability methods.
pub type BackendResult<T> = std::result::Result<T, BackendFault>;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Storage error type with contextual variants.
///
/// Validation and local precondition errors are never wrapped, so callers can
/// match on them directly. Only failures surfaced by a backend provider end up
/// in [`StoreError::Backend`].
///
/// # Examples
///
/// ```rust
/// use anystore::StoreError;
///
/// let err = StoreError::InvalidVersion {
///     version: String::new(),
///     reason: "must not be empty",
/// };
/// assert_eq!(err.to_string(), "invalid version '': must not be empty");
/// ```
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    // Validation Errors
    /// Backend path violates the path grammar.
    #[error("invalid backend path '{path}': {reason}")]
    InvalidPath {
        /// The rejected path.
        path: String,
        /// Which rule was violated.
        reason: &'static str,
    },

    /// Version string violates the version grammar.
    #[error("invalid version '{version}': {reason}")]
    InvalidVersion {
        /// The rejected version.
        version: String,
        /// Which rule was violated.
        reason: &'static str,
    },

    /// A glob pattern or extension regex could not be compiled.
    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The rejected pattern.
        pattern: String,
        /// Compiler message.
        reason: String,
    },

    /// A layout or repository description could not be parsed.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Parser message.
        reason: String,
    },

    // Local Precondition Errors
    /// Local file or directory does not exist.
    #[error("not found: {path}")]
    NotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// Expected a file but found a directory.
    #[error("is a directory: {path}")]
    IsADirectory {
        /// The offending path.
        path: PathBuf,
    },

    /// Expected a directory but found something else.
    #[error("not a directory: {path}")]
    NotADirectory {
        /// The offending path.
        path: PathBuf,
    },

    /// Caller lacks write access to a local path.
    #[error("{operation}: permission denied: {path}")]
    PermissionDenied {
        /// The path where permission was denied.
        path: PathBuf,
        /// The operation that was denied.
        operation: &'static str,
    },

    // Transfer Errors
    /// Post-transfer validation failed and the written file was removed.
    #[error(
        "interrupted: {path} has checksum '{checksum}' when '{expected}' was expected, \
         the file has been removed from the {location}"
    )]
    Interrupted {
        /// The file that failed validation.
        path: String,
        /// Checksum found after the transfer.
        checksum: String,
        /// Checksum of the transfer source.
        expected: String,
        /// Where the file was removed from.
        location: &'static str,
    },

    /// Archive extension is not one of the supported formats.
    #[error("unsupported archive '{path}', supported extensions are .zip and .tar.gz")]
    UnsupportedArchive {
        /// The archive path.
        path: String,
    },

    /// Archive could not be created or extracted.
    #[error("archive error: {path} ({details})")]
    Archive {
        /// The archive or member path.
        path: PathBuf,
        /// What went wrong.
        details: String,
    },

    // Backend Errors
    /// Operation needs an open repository.
    #[error("{operation}: repository is not open, call open() first")]
    NotOpened {
        /// The operation that was attempted.
        operation: &'static str,
    },

    /// An error raised by the backend provider.
    #[error("{operation}: an error was raised by the backend: {source}")]
    Backend {
        /// The capability call that failed.
        operation: &'static str,
        /// The provider's original error.
        #[source]
        source: BackendFault,
    },

    /// Local I/O error with context.
    #[error("{operation} failed for {path}: {source}")]
    Io {
        /// The operation that failed.
        operation: &'static str,
        /// The path involved in the operation.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    /// Wrap a provider error raised during `operation`.
    pub fn backend(operation: &'static str, source: impl Into<BackendFault>) -> Self {
        StoreError::Backend {
            operation,
            source: source.into(),
        }
    }

    /// Not-found condition re-derived by the engine, reported as a backend error.
    pub(crate) fn backend_not_found(operation: &'static str, path: &str) -> Self {
        let source = std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("no such file or directory: '{path}'"),
        );
        Self::backend(operation, source)
    }

    /// Map a local I/O error to the matching precondition variant.
    pub(crate) fn local(
        operation: &'static str,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => StoreError::NotFound { path },
            std::io::ErrorKind::PermissionDenied => StoreError::PermissionDenied { path, operation },
            std::io::ErrorKind::NotADirectory => StoreError::NotADirectory { path },
            std::io::ErrorKind::IsADirectory => StoreError::IsADirectory { path },
            _ => StoreError::Io {
                operation,
                path,
                source,
            },
        }
    }

    /// Returns `true` if the error signals a missing file, local or remote.
    pub fn is_not_found(&self) -> bool {
        match self {
            StoreError::NotFound { .. } => true,
            StoreError::Backend { source, .. } => source
                .downcast_ref::<std::io::Error>()
                .is_some_and(|e| e.kind() == std::io::ErrorKind::NotFound),
            _ => false,
        }
    }

    /// Returns `true` if the error was raised by the backend provider.
    pub fn is_backend(&self) -> bool {
        matches!(self, StoreError::Backend { .. })
    }
}

/// Run a backend capability call, wrapping any fault.
pub(crate) fn call_backend<T>(
    operation: &'static str,
    f: impl FnOnce() -> BackendResult<T>,
) -> Result<T> {
    f().map_err(|source| StoreError::Backend { operation, source })
}

/// Like [`call_backend`], but substitutes `fallback` for a fault when `suppress` is set.
pub(crate) fn call_backend_or<T>(
    operation: &'static str,
    suppress: bool,
    fallback: T,
    f: impl FnOnce() -> BackendResult<T>,
) -> Result<T> {
    match f() {
        Ok(value) => Ok(value),
        Err(source) if suppress => {
            log::debug!("{operation}: suppressed backend error: {source}");
            Ok(fallback)
        }
        Err(source) => Err(StoreError::Backend { operation, source }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_path_display() {
        let err = StoreError::InvalidPath {
            path: "sub/file".into(),
            reason: "must start with '/'",
        };
        assert_eq!(
            err.to_string(),
            "invalid backend path 'sub/file': must start with '/'"
        );
    }

    #[test]
    fn interrupted_display_names_location() {
        let err = StoreError::Interrupted {
            path: "/file.txt".into(),
            checksum: "aaa".into(),
            expected: "bbb".into(),
            location: "backend",
        };
        let msg = err.to_string();
        assert!(msg.contains("/file.txt"));
        assert!(msg.contains("'aaa'"));
        assert!(msg.contains("'bbb'"));
        assert!(msg.ends_with("removed from the backend"));
    }

    #[test]
    fn unsupported_archive_names_formats() {
        let err = StoreError::UnsupportedArchive {
            path: "/a.rar".into(),
        };
        assert!(err.to_string().contains(".zip"));
        assert!(err.to_string().contains(".tar.gz"));
    }

    #[test]
    fn backend_keeps_source() {
        use std::error::Error;

        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "timeout");
        let err = StoreError::backend("checksum", io);
        assert!(err.is_backend());
        assert!(!err.is_not_found());
        assert_eq!(err.source().unwrap().to_string(), "timeout");
    }

    #[test]
    fn backend_not_found_is_not_found() {
        let err = StoreError::backend_not_found("ls", "/missing.txt");
        assert!(err.is_backend());
        assert!(err.is_not_found());
        assert!(err.to_string().contains("/missing.txt"));
    }

    #[test]
    fn local_maps_io_kinds() {
        let not_found = std::io::Error::new(std::io::ErrorKind::NotFound, "x");
        assert!(matches!(
            StoreError::local("put_file", "/tmp/x", not_found),
            StoreError::NotFound { .. }
        ));

        let denied = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "x");
        assert!(matches!(
            StoreError::local("get_file", "/tmp/x", denied),
            StoreError::PermissionDenied {
                operation: "get_file",
                ..
            }
        ));

        let not_dir = std::io::Error::new(std::io::ErrorKind::NotADirectory, "x");
        assert!(matches!(
            StoreError::local("get_file", "/tmp/x", not_dir),
            StoreError::NotADirectory { .. }
        ));

        let is_dir = std::io::Error::new(std::io::ErrorKind::IsADirectory, "x");
        assert!(matches!(
            StoreError::local("get_file", "/tmp/x", is_dir),
            StoreError::IsADirectory { .. }
        ));

        let other = std::io::Error::new(std::io::ErrorKind::Other, "x");
        assert!(matches!(
            StoreError::local("get_file", "/tmp/x", other),
            StoreError::Io { .. }
        ));
    }

    #[test]
    fn call_backend_wraps_fault() {
        let result: Result<()> = call_backend("remove_file", || Err("boom".into()));
        assert!(matches!(
            result,
            Err(StoreError::Backend {
                operation: "remove_file",
                ..
            })
        ));
    }

    #[test]
    fn call_backend_or_suppresses_only_when_asked() {
        let suppressed = call_backend_or("exists", true, false, || Err("boom".into()));
        assert!(!suppressed.unwrap());

        let raised = call_backend_or("exists", false, false, || Err("boom".into()));
        assert!(raised.unwrap_err().is_backend());
    }
}
