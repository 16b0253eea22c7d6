//! Repository descriptions and a registry of open repositories.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{Backend, FileSystem, Result, Store, StoreError};

/// Store handle shared by the registry and its callers.
pub type SharedStore = Arc<Store<Box<dyn Backend>>>;

/// Known backend providers.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum BackendKind {
    /// [`FileSystem`] backend.
    FileSystem,
}

impl BackendKind {
    /// Name used in configuration, e.g. `file-system`.
    pub fn name(&self) -> &'static str {
        match self {
            BackendKind::FileSystem => "file-system",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BackendKind {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "file-system" => Ok(BackendKind::FileSystem),
            _ => Err(StoreError::InvalidConfig {
                reason: format!("unknown backend '{s}'"),
            }),
        }
    }
}

/// Instantiate a backend for `repository` on `host`.
pub fn connect(kind: BackendKind, host: &str, repository: &str) -> Box<dyn Backend> {
    match kind {
        BackendKind::FileSystem => Box::new(FileSystem::new(host, repository)),
    }
}

/// Where a repository lives and which backend serves it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Repository {
    /// Repository name.
    pub name: String,
    /// Host address.
    pub host: String,
    /// Backend provider.
    pub backend: BackendKind,
}

impl Repository {
    /// Describe a repository.
    pub fn new(name: impl Into<String>, host: impl Into<String>, backend: BackendKind) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            backend,
        }
    }

    /// Instantiate the backend.
    pub fn connect(&self) -> Box<dyn Backend> {
        connect(self.backend, &self.host, &self.name)
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}, {})", self.backend, self.host, self.name)
    }
}

/// Open repositories of an application.
///
/// Construct one registry, pass it where stores are needed, and call
/// [`clear`](Self::clear) (or drop it) on shutdown.
///
/// ```rust
/// use anystore::{BackendKind, Registry, Repository};
///
/// let host = tempfile::tempdir().unwrap();
/// let repo = Repository::new("repo", host.path().to_str().unwrap(), BackendKind::FileSystem);
///
/// let registry = Registry::new();
/// let store = registry.create(&repo).unwrap();
/// assert!(store.is_opened());
/// assert_eq!(registry.available(), vec![repo.clone()]);
///
/// registry.delete(&repo).unwrap();
/// assert!(registry.available().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct Registry {
    stores: Mutex<BTreeMap<Repository, SharedStore>>,
}

impl Registry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn stores(&self) -> MutexGuard<'_, BTreeMap<Repository, SharedStore>> {
        self.stores.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Create a repository and open it.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Backend`] if the repository exists already or
    ///   cannot be created
    pub fn create(&self, repository: &Repository) -> Result<SharedStore> {
        let store = Store::create(repository.connect())?;
        store.open()?;
        let store = Arc::new(store);
        self.stores()
            .insert(repository.clone(), Arc::clone(&store));
        Ok(store)
    }

    /// Open an existing repository, or return the already open store.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Backend`] if the repository does not exist
    pub fn access(&self, repository: &Repository) -> Result<SharedStore> {
        let mut stores = self.stores();
        if let Some(store) = stores.get(repository) {
            return Ok(Arc::clone(store));
        }
        let store = Store::new(repository.connect());
        store.open()?;
        let store = Arc::new(store);
        stores.insert(repository.clone(), Arc::clone(&store));
        Ok(store)
    }

    /// Close and delete a repository with all its content.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Backend`] if the repository cannot be deleted
    pub fn delete(&self, repository: &Repository) -> Result<()> {
        if let Some(store) = self.stores().remove(repository) {
            store.close()?;
        }
        Store::delete(repository.connect())
    }

    /// Open repositories, sorted.
    pub fn available(&self) -> Vec<Repository> {
        self.stores().keys().cloned().collect()
    }

    /// Close every open repository.
    ///
    /// All stores are closed even if one fails, the first error is
    /// returned.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Backend`] if a provider fails to close
    pub fn clear(&self) -> Result<()> {
        let stores = std::mem::take(&mut *self.stores());
        let mut first_error = None;
        for (repository, store) in stores {
            if let Err(e) = store.close() {
                log::warn!("failed to close {repository}: {e}");
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

impl Drop for Registry {
    fn drop(&mut self) {
        // errors are logged by clear
        let _ = self.clear();
    }
}
