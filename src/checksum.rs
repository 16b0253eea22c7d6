//! MD5 content fingerprints.
//!
//! Used purely for content equality, not for security.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use md5::{Digest, Md5};

use crate::{Result, StoreError};

const CHUNK_SIZE: usize = 64 * 1024;

/// MD5 checksum of a local file as lowercase hex, streamed in chunks.
///
/// # Errors
///
/// - [`StoreError::NotFound`] if the file does not exist
/// - [`StoreError::Io`] for other read failures
pub fn md5_file(path: &Path) -> Result<String> {
    let mut file = File::open(path).map_err(|e| StoreError::local("checksum", path, e))?;
    md5_reader(&mut file).map_err(|e| StoreError::local("checksum", path, e))
}

/// MD5 checksum of everything `reader` yields.
pub fn md5_reader<R: Read + ?Sized>(reader: &mut R) -> io::Result<String> {
    let mut hasher = Md5::new();
    io::copy(&mut BufReader::with_capacity(CHUNK_SIZE, reader), &mut hasher)?;
    Ok(format!("{:x}", hasher.finalize()))
}

/// MD5 checksum of an in-memory buffer.
pub fn md5_bytes(data: &[u8]) -> String {
    format!("{:x}", Md5::digest(data))
}
