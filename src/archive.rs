//! Archive creation and extraction.
//!
//! Supported formats are ZIP and gzip-compressed TAR, chosen by the suffix of
//! the archive name. Member names are relative and `/`-separated.

use std::fs::{self, File};
use std::io;
use std::path::{Component, Path};

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;

use crate::{Result, StoreError};

/// Supported archive formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    /// `.zip`
    Zip,
    /// `.tar.gz`
    TarGz,
}

impl ArchiveFormat {
    /// Pick the format from an archive name.
    ///
    /// # Errors
    ///
    /// - [`StoreError::UnsupportedArchive`] for any other suffix
    pub fn from_path(path: &str) -> Result<Self> {
        if path.ends_with(".zip") {
            Ok(ArchiveFormat::Zip)
        } else if path.ends_with(".tar.gz") {
            Ok(ArchiveFormat::TarGz)
        } else {
            Err(StoreError::UnsupportedArchive {
                path: path.to_string(),
            })
        }
    }

    /// Pack `files` (relative to `src_root`) into `archive`.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`] if a file does not exist
    /// - [`StoreError::Archive`] if a file escapes `src_root` or the archive
    ///   cannot be written
    pub fn create(&self, archive: &Path, src_root: &Path, files: &[String]) -> Result<()> {
        for name in files {
            if !is_relative_inside(Path::new(name)) {
                return Err(StoreError::Archive {
                    path: src_root.join(name),
                    details: "file is not below the source root".into(),
                });
            }
        }
        let out = File::create(archive).map_err(|e| StoreError::local("put_archive", archive, e))?;
        match self {
            ArchiveFormat::Zip => create_zip(out, archive, src_root, files),
            ArchiveFormat::TarGz => create_tar_gz(out, archive, src_root, files),
        }
    }

    /// Unpack `archive` below `dst_root` and return the sorted member names.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Archive`] if the archive is malformed or a member
    ///   would land outside `dst_root`
    pub fn extract(&self, archive: &Path, dst_root: &Path) -> Result<Vec<String>> {
        let file = File::open(archive).map_err(|e| StoreError::local("get_archive", archive, e))?;
        let mut names = match self {
            ArchiveFormat::Zip => extract_zip(file, archive, dst_root)?,
            ArchiveFormat::TarGz => extract_tar_gz(file, archive, dst_root)?,
        };
        names.sort();
        Ok(names)
    }
}

fn archive_error(path: &Path, details: impl std::fmt::Display) -> StoreError {
    StoreError::Archive {
        path: path.to_path_buf(),
        details: details.to_string(),
    }
}

fn open_member(src_root: &Path, name: &str) -> Result<File> {
    let path = src_root.join(name);
    File::open(&path).map_err(|e| StoreError::local("put_archive", path, e))
}

fn create_zip(out: File, archive: &Path, src_root: &Path, files: &[String]) -> Result<()> {
    let mut writer = zip::ZipWriter::new(out);
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated);
    for name in files {
        let mut member = open_member(src_root, name)?;
        writer
            .start_file(name.as_str(), options)
            .map_err(|e| archive_error(archive, e))?;
        io::copy(&mut member, &mut writer).map_err(|e| archive_error(archive, e))?;
    }
    writer.finish().map_err(|e| archive_error(archive, e))?;
    Ok(())
}

fn create_tar_gz(out: File, archive: &Path, src_root: &Path, files: &[String]) -> Result<()> {
    let mut builder = tar::Builder::new(GzEncoder::new(out, Compression::default()));
    for name in files {
        let mut member = open_member(src_root, name)?;
        builder
            .append_file(name, &mut member)
            .map_err(|e| archive_error(archive, e))?;
    }
    builder
        .into_inner()
        .and_then(|encoder| encoder.finish())
        .map_err(|e| archive_error(archive, e))?;
    Ok(())
}

fn extract_zip(file: File, archive: &Path, dst_root: &Path) -> Result<Vec<String>> {
    let mut zip = zip::ZipArchive::new(file).map_err(|e| archive_error(archive, e))?;
    let mut names = Vec::new();
    for i in 0..zip.len() {
        let mut entry = zip.by_index(i).map_err(|e| archive_error(archive, e))?;
        let Some(rel) = entry.enclosed_name().map(|p| p.to_path_buf()) else {
            return Err(archive_error(
                archive,
                format!("member '{}' is outside the destination", entry.name()),
            ));
        };
        let target = dst_root.join(&rel);
        if entry.is_dir() {
            fs::create_dir_all(&target).map_err(|e| StoreError::local("get_archive", &target, e))?;
            continue;
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::local("get_archive", parent, e))?;
        }
        let mut out =
            File::create(&target).map_err(|e| StoreError::local("get_archive", &target, e))?;
        io::copy(&mut entry, &mut out).map_err(|e| archive_error(archive, e))?;
        names.push(to_slash(&rel));
    }
    Ok(names)
}

fn extract_tar_gz(file: File, archive: &Path, dst_root: &Path) -> Result<Vec<String>> {
    let mut tar = tar::Archive::new(GzDecoder::new(file));
    let entries = tar.entries().map_err(|e| archive_error(archive, e))?;
    let mut names = Vec::new();
    for entry in entries {
        let mut entry = entry.map_err(|e| archive_error(archive, e))?;
        let rel = entry
            .path()
            .map_err(|e| archive_error(archive, e))?
            .into_owned();
        if !is_relative_inside(&rel) {
            return Err(archive_error(
                archive,
                format!("member '{}' is outside the destination", rel.display()),
            ));
        }
        let is_file = entry.header().entry_type().is_file();
        entry
            .unpack_in(dst_root)
            .map_err(|e| archive_error(archive, e))?;
        if is_file {
            names.push(to_slash(&rel));
        }
    }
    Ok(names)
}

/// Only normal components, no `..`, no absolute prefix.
fn is_relative_inside(path: &Path) -> bool {
    path.components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
        && path.components().any(|c| matches!(c, Component::Normal(_)))
}

fn to_slash(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Every file below `root`, relative and `/`-separated, sorted.
///
/// Hidden files are included. Returns an empty list if `root` does not exist.
pub(crate) fn relative_files(root: &Path) -> io::Result<Vec<String>> {
    let mut files = Vec::new();
    if root.is_dir() {
        walk(root, root, &mut files)?;
    }
    files.sort();
    Ok(files)
}

fn walk(root: &Path, dir: &Path, acc: &mut Vec<String>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            walk(root, &path, acc)?;
        } else if let Ok(rel) = path.strip_prefix(root) {
            acc.push(to_slash(rel));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn populate(root: &Path) -> Vec<String> {
        fs::create_dir_all(root.join("sub/deep")).unwrap();
        fs::write(root.join("a.txt"), b"a").unwrap();
        fs::write(root.join("sub/b.txt"), b"b").unwrap();
        fs::write(root.join("sub/deep/.hidden"), b"c").unwrap();
        relative_files(root).unwrap()
    }

    #[test]
    fn format_from_suffix() {
        assert_eq!(ArchiveFormat::from_path("/a.zip").unwrap(), ArchiveFormat::Zip);
        assert_eq!(
            ArchiveFormat::from_path("/a.tar.gz").unwrap(),
            ArchiveFormat::TarGz
        );
        for path in ["/a.tar", "/a.gz", "/a.rar", "/a"] {
            assert!(matches!(
                ArchiveFormat::from_path(path),
                Err(StoreError::UnsupportedArchive { .. })
            ));
        }
    }

    #[test]
    fn relative_files_walks_recursively() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            populate(dir.path()),
            vec!["a.txt", "sub/b.txt", "sub/deep/.hidden"]
        );
        assert!(relative_files(&dir.path().join("missing")).unwrap().is_empty());
    }

    #[test]
    fn zip_and_tar_gz_round_trip() {
        for name in ["archive.zip", "archive.tar.gz"] {
            let src = tempfile::tempdir().unwrap();
            let dst = tempfile::tempdir().unwrap();
            let files = populate(src.path());
            let archive = dst.path().join(name);

            let format = ArchiveFormat::from_path(name).unwrap();
            format.create(&archive, src.path(), &files).unwrap();

            let out = dst.path().join("out");
            fs::create_dir(&out).unwrap();
            assert_eq!(format.extract(&archive, &out).unwrap(), files);
            assert_eq!(fs::read(out.join("sub/b.txt")).unwrap(), b"b");
        }
    }

    #[test]
    fn create_rejects_escaping_members() {
        let src = tempfile::tempdir().unwrap();
        let archive = src.path().join("a.zip");
        let err = ArchiveFormat::Zip
            .create(&archive, src.path(), &["../x.txt".to_string()])
            .unwrap_err();
        assert!(matches!(err, StoreError::Archive { .. }));
    }

    #[test]
    fn create_reports_missing_member() {
        let src = tempfile::tempdir().unwrap();
        let archive = src.path().join("a.tar.gz");
        let err = ArchiveFormat::TarGz
            .create(&archive, src.path(), &["missing.txt".to_string()])
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn extract_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("a.zip");
        fs::write(&archive, b"not an archive").unwrap();
        assert!(matches!(
            ArchiveFormat::Zip.extract(&archive, dir.path()),
            Err(StoreError::Archive { .. })
        ));
    }
}
