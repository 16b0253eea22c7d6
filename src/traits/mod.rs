//! # Backend Traits
//!
//! The capability interface every storage provider implements.
//!
//! ## Trait Layers
//!
//! ```text
//! BackendRead + BackendWrite + BackendRepo = Backend
//! ```
//!
//! | Trait | Methods | Concern |
//! |-------|---------|---------|
//! | [`BackendRead`] | `checksum`, `exists`, `date`, `owner`, `get_file`, `ls` | Queries and downloads |
//! | [`BackendWrite`] | `put_file`, `remove_file`, `copy_file`, `move_file` | Uploads and removal |
//! | [`BackendRepo`] | `host`, `repository`, `open`, `close`, `create`, `delete` | Repository lifecycle |
//!
//! ## Blanket Implementation
//!
//! Implement the three component traits and [`Backend`] comes for free:
//!
//! ```rust
//! use anystore::{Backend, BackendRead, BackendRepo, BackendResult, BackendWrite};
//! use std::path::Path;
//!
//! struct NullBackend;
//!
//! # impl BackendRead for NullBackend {
//! #     fn checksum(&self, _: &str) -> BackendResult<String> { Ok(String::new()) }
//! #     fn exists(&self, _: &str) -> BackendResult<bool> { Ok(false) }
//! #     fn date(&self, _: &str) -> BackendResult<String> { Ok(String::new()) }
//! #     fn owner(&self, _: &str) -> BackendResult<String> { Ok(String::new()) }
//! #     fn get_file(&self, _: &str, _: &Path) -> BackendResult<()> { Ok(()) }
//! #     fn ls(&self, _: &str) -> BackendResult<Vec<String>> { Ok(vec![]) }
//! # }
//! # impl BackendWrite for NullBackend {
//! #     fn put_file(&self, _: &Path, _: &str, _: &str) -> BackendResult<()> { Ok(()) }
//! #     fn remove_file(&self, _: &str) -> BackendResult<()> { Ok(()) }
//! # }
//! # impl BackendRepo for NullBackend {
//! #     fn host(&self) -> &str { "" }
//! #     fn repository(&self) -> &str { "" }
//! #     fn create(&self) -> BackendResult<()> { Ok(()) }
//! #     fn delete(&self) -> BackendResult<()> { Ok(()) }
//! # }
//! fn use_backend<B: Backend>(_backend: &B) {}
//! use_backend(&NullBackend);
//!
//! // Boxed trait objects are backends too
//! let boxed: Box<dyn Backend> = Box::new(NullBackend);
//! use_backend(&boxed);
//! ```
//!
//! ## Thread Safety
//!
//! All traits require `Send + Sync`. Methods take `&self`, providers use
//! interior mutability where they keep state.

mod backend_read;
mod backend_repo;
mod backend_write;

pub use backend_read::BackendRead;
pub use backend_repo::BackendRepo;
pub use backend_write::BackendWrite;

/// A complete storage provider.
///
/// Combines queries ([`BackendRead`]), uploads ([`BackendWrite`]) and the
/// repository lifecycle ([`BackendRepo`]).
///
/// # Blanket Implementation
///
/// Automatically implemented for any type implementing all three component
/// traits. Never implement `Backend` directly.
pub trait Backend: BackendRead + BackendWrite + BackendRepo {}

impl<T: BackendRead + BackendWrite + BackendRepo + ?Sized> Backend for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_is_object_safe() {
        fn _check(_: &dyn Backend) {}
        fn _boxed(b: Box<dyn Backend>) -> impl Backend {
            b
        }
    }
}
