//! Reference backend storing files in a local directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::archive::relative_files;
use crate::checksum::md5_file;
use crate::path::SEP;
use crate::{BackendRead, BackendRepo, BackendResult, BackendWrite};

/// Backend for a local or mounted file system.
///
/// The repository lives in `<host>/<repository>/`, the backend path `/a/b`
/// in `<host>/<repository>/a/b`.
///
/// ```rust
/// use anystore::{BackendRepo, FileSystem};
///
/// let host = tempfile::tempdir().unwrap();
/// let backend = FileSystem::new(host.path(), "repo");
/// backend.create().unwrap();
/// assert!(host.path().join("repo").is_dir());
/// backend.open().unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct FileSystem {
    host: String,
    repository: String,
    root: PathBuf,
}

impl FileSystem {
    /// Backend for `repository` below the directory `host`.
    pub fn new(host: impl AsRef<Path>, repository: impl Into<String>) -> Self {
        let host = host.as_ref();
        let repository = repository.into();
        Self {
            host: host.display().to_string(),
            root: host.join(&repository),
            repository,
        }
    }

    /// Local directory of the repository.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn expand(&self, path: &str) -> PathBuf {
        let rel = path.trim_start_matches(SEP);
        if rel.is_empty() {
            return self.root.clone();
        }
        rel.split(SEP)
            .filter(|s| !s.is_empty())
            .fold(self.root.clone(), |acc, part| acc.join(part))
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("no such file or directory: '{}'", path.display()),
    )
}

fn ensure_parent(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) => fs::create_dir_all(parent),
        None => Ok(()),
    }
}

impl BackendRead for FileSystem {
    fn checksum(&self, path: &str) -> BackendResult<String> {
        Ok(md5_file(&self.expand(path))?)
    }

    fn exists(&self, path: &str) -> BackendResult<bool> {
        Ok(self.expand(path).exists())
    }

    fn date(&self, path: &str) -> BackendResult<String> {
        let modified = fs::metadata(self.expand(path))?.modified()?;
        Ok(DateTime::<Local>::from(modified).format("%Y-%m-%d").to_string())
    }

    fn owner(&self, path: &str) -> BackendResult<String> {
        let meta = fs::metadata(self.expand(path))?;
        Ok(owner_name(&meta))
    }

    fn get_file(&self, src: &str, dst: &Path) -> BackendResult<()> {
        let src = self.expand(src);
        if !src.is_file() {
            return Err(not_found(&src).into());
        }
        fs::copy(&src, dst)?;
        Ok(())
    }

    fn ls(&self, path: &str) -> BackendResult<Vec<String>> {
        let local = self.expand(path);
        if local.is_file() {
            return Ok(vec![path.trim_end_matches(SEP).to_string()]);
        }
        let prefix = if path.ends_with(SEP) {
            path.to_string()
        } else {
            format!("{path}{SEP}")
        };
        Ok(relative_files(&local)?
            .into_iter()
            .map(|rel| format!("{prefix}{rel}"))
            .collect())
    }
}

impl BackendWrite for FileSystem {
    fn put_file(&self, src: &Path, dst: &str, _checksum: &str) -> BackendResult<()> {
        let dst = self.expand(dst);
        ensure_parent(&dst)?;
        fs::copy(src, &dst)?;
        Ok(())
    }

    fn remove_file(&self, path: &str) -> BackendResult<()> {
        fs::remove_file(self.expand(path))?;
        Ok(())
    }

    fn copy_file(&self, src: &str, dst: &str) -> BackendResult<bool> {
        let dst = self.expand(dst);
        ensure_parent(&dst)?;
        fs::copy(self.expand(src), &dst)?;
        Ok(true)
    }

    fn move_file(&self, src: &str, dst: &str) -> BackendResult<bool> {
        let src = self.expand(src);
        let dst = self.expand(dst);
        ensure_parent(&dst)?;
        if fs::rename(&src, &dst).is_err() {
            // rename fails across devices
            fs::copy(&src, &dst)?;
            fs::remove_file(&src)?;
        }
        Ok(true)
    }
}

impl BackendRepo for FileSystem {
    fn host(&self) -> &str {
        &self.host
    }

    fn repository(&self) -> &str {
        &self.repository
    }

    fn open(&self) -> BackendResult<()> {
        if !self.root.is_dir() {
            return Err(not_found(&self.root).into());
        }
        Ok(())
    }

    fn create(&self) -> BackendResult<()> {
        if self.root.exists() {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("file exists: '{}'", self.root.display()),
            )
            .into());
        }
        fs::create_dir_all(&self.root)?;
        Ok(())
    }

    fn delete(&self) -> BackendResult<()> {
        fs::remove_dir_all(&self.root)?;
        Ok(())
    }
}

#[cfg(unix)]
fn owner_name(meta: &fs::Metadata) -> String {
    use std::os::unix::fs::MetadataExt;

    uzers::get_user_by_uid(meta.uid())
        .map(|user| user.name().to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(not(unix))]
fn owner_name(_meta: &fs::Metadata) -> String {
    String::new()
}
