//! # anystore
//!
//! Versioned and unversioned file storage over pluggable backends.
//!
//! A backend provider (local disk, object storage, artifact repository)
//! implements a narrow capability interface. On top of it, a [`Store`] runs
//! safe transfers, and interfaces decide how logical paths map to files on
//! the backend.
//!
//! ---
//!
//! ## Quick Start
//!
//! ```rust
//! use anystore::{FileSystem, ListOptions, Store, TransferOptions, Versioned, VersionedEntry};
//!
//! let host = tempfile::tempdir().unwrap();
//! let store = Store::create(FileSystem::new(host.path(), "repo")).unwrap();
//! store.open().unwrap();
//!
//! let interface = Versioned::new(store);
//! let src = host.path().join("local.txt");
//! std::fs::write(&src, "hello").unwrap();
//!
//! interface.put_file(&src, "/a/b.txt", "1.0.0", TransferOptions::default()).unwrap();
//! interface.put_file(&src, "/a/b.txt", "2.0.0", TransferOptions::default()).unwrap();
//!
//! assert_eq!(
//!     interface.ls("/a/b.txt", &ListOptions::default().latest()).unwrap(),
//!     vec![VersionedEntry::new("/a/b.txt", "2.0.0", "/a/2.0.0/b.txt")]
//! );
//! ```
//!
//! ---
//!
//! ## Core Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`Backend`] | Capability interface of a storage provider |
//! | [`Store`] | Transfer engine: validation, checksum skip, staging, rollback |
//! | [`Unversioned`] | One file per path |
//! | [`Versioned`] | Many versions per path, placed by a [`PathLayout`] |
//! | [`StoreError`] | Error type with context |
//! | [`Registry`] | Open repositories of an application |
//!
//! ---
//!
//! ## Layouts
//!
//! ```text
//! DefaultLayout:  /sub/file.txt @ 1.0.0  ->  /sub/1.0.0/file.txt
//! MavenLayout:    /sub/file.txt @ 1.0.0  ->  /sub/file/1.0.0/file-1.0.0.txt
//! ```
//!
//! ---
//!
//! ## Error Handling
//!
//! Invalid paths and versions as well as local precondition failures are
//! reported directly and never reach the backend. Anything the provider
//! raises is wrapped into [`StoreError::Backend`]:
//!
//! ```rust
//! use anystore::StoreError;
//!
//! let err = anystore::path::check_path("relative/path", false).unwrap_err();
//! assert!(matches!(err, StoreError::InvalidPath { .. }));
//! assert!(!err.is_backend());
//! ```
//!
//! ---
//!
//! ## Logging
//!
//! Transfers, skipped transfers and rollbacks are logged through the `log`
//! facade. No logger is installed by this crate.
//!
//! ---
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `serde` | Serialization for [`Repository`], [`LayoutConfig`], [`TransferOptions`], [`VersionedEntry`] |

// Private modules
mod archive;
mod checksum;
mod error;
mod filesystem;
mod interface;
mod layout;
mod registry;
mod store;
mod traits;
mod types;
mod version;

// Public modules
pub mod path;

// Public re-exports - error types
pub use error::{BackendFault, BackendResult, Result, StoreError};

// Public re-exports - backend traits
pub use traits::{Backend, BackendRead, BackendRepo, BackendWrite};

// Public re-exports - engine and interfaces
pub use interface::{Unversioned, Versioned};
pub use store::Store;

// Public re-exports - layouts
pub use layout::{DefaultLayout, LayoutConfig, MavenLayout, PathLayout};

// Public re-exports - option and value types
pub use types::{ArchiveOptions, ListOptions, TransferOptions, VersionedEntry};

// Public re-exports - providers and registry
pub use filesystem::FileSystem;
pub use registry::{BackendKind, Registry, Repository, SharedStore, connect};

// Public re-exports - utilities
pub use archive::ArchiveFormat;
pub use checksum::{md5_bytes, md5_file, md5_reader};
pub use version::{compare_versions, latest, sort_versions};
