//! # Interfaces
//!
//! Addressing schemes layered on a [`Store`](crate::Store).
//!
//! | Interface | Logical path | Physical path |
//! |-----------|--------------|---------------|
//! | [`Unversioned`] | `/sub/file.txt` | `/sub/file.txt` |
//! | [`Versioned`] (default layout) | `/sub/file.txt`, `1.0.0` | `/sub/1.0.0/file.txt` |
//! | [`Versioned`] (Maven layout) | `/sub/file.txt`, `1.0.0` | `/sub/file/1.0.0/file-1.0.0.txt` |
//!
//! Several interfaces can share one store through an `Arc`.

mod unversioned;
mod versioned;

pub use unversioned::Unversioned;
pub use versioned::Versioned;
