//! Repository-level capabilities of a storage backend.

use crate::BackendResult;

/// Repository lifecycle operations.
///
/// A backend instance addresses one repository on one host. [`create`] and
/// [`delete`] work without an open connection; [`open`] must fail if the
/// repository does not exist.
///
/// [`create`]: Self::create
/// [`delete`]: Self::delete
/// [`open`]: Self::open
pub trait BackendRepo: Send + Sync {
    /// Host address, e.g. a root directory or a server URL.
    fn host(&self) -> &str;

    /// Repository name.
    fn repository(&self) -> &str;

    /// Establish a connection to an existing repository.
    fn open(&self) -> BackendResult<()> {
        Ok(())
    }

    /// Close the connection.
    fn close(&self) -> BackendResult<()> {
        Ok(())
    }

    /// Create the repository. Fails if it exists already.
    fn create(&self) -> BackendResult<()>;

    /// Delete the repository and all its content.
    fn delete(&self) -> BackendResult<()>;
}

impl<T: BackendRepo + ?Sized> BackendRepo for Box<T> {
    fn host(&self) -> &str {
        (**self).host()
    }

    fn repository(&self) -> &str {
        (**self).repository()
    }

    fn open(&self) -> BackendResult<()> {
        (**self).open()
    }

    fn close(&self) -> BackendResult<()> {
        (**self).close()
    }

    fn create(&self) -> BackendResult<()> {
        (**self).create()
    }

    fn delete(&self) -> BackendResult<()> {
        (**self).delete()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named;

    impl BackendRepo for Named {
        fn host(&self) -> &str {
            "host"
        }

        fn repository(&self) -> &str {
            "repo"
        }

        fn create(&self) -> BackendResult<()> {
            Ok(())
        }

        fn delete(&self) -> BackendResult<()> {
            Ok(())
        }
    }

    #[test]
    fn open_close_default_to_noop() {
        let backend = Named;
        assert!(backend.open().is_ok());
        assert!(backend.close().is_ok());
    }

    #[test]
    fn boxed_repo_forwards_names() {
        let backend: Box<dyn BackendRepo> = Box::new(Named);
        assert_eq!(backend.host(), "host");
        assert_eq!(backend.repository(), "repo");
    }
}
