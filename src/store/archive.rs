//! Archive transfers.

use std::fs;
use std::path::{Path, PathBuf};

use super::Store;
use crate::archive::{ArchiveFormat, relative_files};
use crate::path;
use crate::{ArchiveOptions, Backend, Result, StoreError};

impl<B: Backend> Store<B> {
    /// Download an archive and extract it below `dst_root`.
    ///
    /// `dst_root` is created if missing. Returns the extracted file names,
    /// relative to `dst_root`, `/`-separated and sorted.
    ///
    /// # Errors
    ///
    /// - [`StoreError::InvalidPath`] if `src` is not a valid file path
    /// - [`StoreError::UnsupportedArchive`] if `src` is neither `.zip` nor
    ///   `.tar.gz`
    /// - [`StoreError::NotADirectory`] if `dst_root` is a file
    /// - [`StoreError::NotFound`] if `options.tmp_root` does not exist
    /// - [`StoreError::Backend`] if the provider fails
    /// - [`StoreError::Archive`] if the archive cannot be extracted
    pub fn get_archive(
        &self,
        src: &str,
        dst_root: impl AsRef<Path>,
        options: &ArchiveOptions,
    ) -> Result<Vec<String>> {
        self.ensure_open("get_archive")?;
        let src = path::check_path(src, false)?;
        let format = ArchiveFormat::from_path(&src)?;
        let dst_root = dst_root.as_ref();
        if dst_root.exists() && !dst_root.is_dir() {
            return Err(StoreError::NotADirectory {
                path: dst_root.to_path_buf(),
            });
        }
        fs::create_dir_all(dst_root).map_err(|e| StoreError::local("get_archive", dst_root, e))?;

        let tmp = staging_dir("get_archive", options.tmp_root.as_deref())?;
        let local = tmp.path().join(path::basename(&src));
        let local = self.get_file(&src, &local, options.transfer)?;
        let files = format.extract(&local, dst_root)?;
        log::log!(
            options.transfer.log_level(),
            "get_archive: {src} -> {} ({} files)",
            dst_root.display(),
            files.len()
        );
        Ok(files)
    }

    /// Pack files below `src_root` into an archive and upload it to `dst`.
    ///
    /// `options.files` selects files relative to `src_root`, by default every
    /// file below it is included.
    ///
    /// # Errors
    ///
    /// - [`StoreError::InvalidPath`] if `dst` is not a valid file path
    /// - [`StoreError::UnsupportedArchive`] if `dst` is neither `.zip` nor
    ///   `.tar.gz`
    /// - [`StoreError::NotFound`] if `src_root`, a selected file or
    ///   `options.tmp_root` does not exist
    /// - [`StoreError::NotADirectory`] if `src_root` is a file
    /// - [`StoreError::Archive`] if a selected file is not below `src_root`
    /// - [`StoreError::Backend`] if the provider fails
    pub fn put_archive(
        &self,
        src_root: impl AsRef<Path>,
        dst: &str,
        options: &ArchiveOptions,
    ) -> Result<()> {
        self.ensure_open("put_archive")?;
        let dst = path::check_path(dst, false)?;
        let format = ArchiveFormat::from_path(&dst)?;
        let src_root = src_root.as_ref();
        let meta =
            fs::metadata(src_root).map_err(|e| StoreError::local("put_archive", src_root, e))?;
        if !meta.is_dir() {
            return Err(StoreError::NotADirectory {
                path: src_root.to_path_buf(),
            });
        }

        let files = match &options.files {
            Some(files) => files.clone(),
            None => relative_files(src_root)
                .map_err(|e| StoreError::local("put_archive", src_root, e))?,
        };

        let tmp = staging_dir("put_archive", options.tmp_root.as_deref())?;
        let archive = tmp.path().join(path::basename(&dst));
        format.create(&archive, src_root, &files)?;
        self.put_file(&archive, &dst, options.transfer)?;
        log::log!(
            options.transfer.log_level(),
            "put_archive: {} ({} files) -> {dst}",
            src_root.display(),
            files.len()
        );
        Ok(())
    }
}

/// Fresh temporary directory below `tmp_root`, which must exist.
fn staging_dir(operation: &'static str, tmp_root: Option<&Path>) -> Result<tempfile::TempDir> {
    let root: PathBuf = match tmp_root {
        Some(root) => {
            if !root.exists() {
                return Err(StoreError::NotFound {
                    path: root.to_path_buf(),
                });
            }
            root.to_path_buf()
        }
        None => std::env::temp_dir(),
    };
    tempfile::tempdir_in(&root).map_err(|e| StoreError::local(operation, root, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FileSystem;

    fn setup() -> (tempfile::TempDir, Store<FileSystem>, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::create(FileSystem::new(dir.path().join("host"), "repo")).unwrap();
        store.open().unwrap();
        let src = dir.path().join("src");
        fs::create_dir_all(src.join("sub")).unwrap();
        fs::write(src.join("a.txt"), "a").unwrap();
        fs::write(src.join("sub/b.txt"), "b").unwrap();
        (dir, store, src)
    }

    #[test]
    fn round_trip_all_files() {
        let (dir, store, src) = setup();
        for name in ["/archive.zip", "/archive.tar.gz"] {
            store
                .put_archive(&src, name, &ArchiveOptions::default())
                .unwrap();
            let out = dir.path().join(format!("out{name}"));
            let files = store
                .get_archive(name, &out, &ArchiveOptions::default())
                .unwrap();
            assert_eq!(files, vec!["a.txt", "sub/b.txt"]);
            assert_eq!(fs::read_to_string(out.join("sub/b.txt")).unwrap(), "b");
        }
    }

    #[test]
    fn selected_files_only() {
        let (dir, store, src) = setup();
        let options = ArchiveOptions::default().files(["sub/b.txt"]);
        store.put_archive(&src, "/a.zip", &options).unwrap();
        let files = store
            .get_archive("/a.zip", dir.path().join("out"), &ArchiveOptions::default())
            .unwrap();
        assert_eq!(files, vec!["sub/b.txt"]);
    }

    #[test]
    fn unsupported_archive_fails_before_backend() {
        let (_dir, store, src) = setup();
        assert!(matches!(
            store.put_archive(&src, "/a.rar", &ArchiveOptions::default()),
            Err(StoreError::UnsupportedArchive { .. })
        ));
        assert!(!store.exists("/a.rar", false).unwrap());
    }

    #[test]
    fn local_preconditions() {
        let (dir, store, src) = setup();
        assert!(matches!(
            store.put_archive(dir.path().join("missing"), "/a.zip", &ArchiveOptions::default()),
            Err(StoreError::NotFound { .. })
        ));
        assert!(matches!(
            store.put_archive(src.join("a.txt"), "/a.zip", &ArchiveOptions::default()),
            Err(StoreError::NotADirectory { .. })
        ));
        assert!(matches!(
            store.put_archive(
                &src,
                "/a.zip",
                &ArchiveOptions::default().files(["missing.txt"])
            ),
            Err(StoreError::NotFound { .. })
        ));

        let missing_tmp = ArchiveOptions::default().tmp_root(dir.path().join("no-tmp"));
        assert!(matches!(
            store.put_archive(&src, "/a.zip", &missing_tmp),
            Err(StoreError::NotFound { .. })
        ));
        assert!(!dir.path().join("no-tmp").exists());

        store
            .put_archive(&src, "/a.zip", &ArchiveOptions::default())
            .unwrap();
        assert!(matches!(
            store.get_archive("/a.zip", src.join("a.txt"), &ArchiveOptions::default()),
            Err(StoreError::NotADirectory { .. })
        ));
    }

    #[test]
    fn custom_tmp_root() {
        let (dir, store, src) = setup();
        let tmp = dir.path().join("tmp");
        fs::create_dir(&tmp).unwrap();
        let options = ArchiveOptions::default().tmp_root(&tmp);
        store.put_archive(&src, "/a.tar.gz", &options).unwrap();
        store
            .get_archive("/a.tar.gz", dir.path().join("out"), &options)
            .unwrap();
        // staging directories are cleaned up
        assert_eq!(fs::read_dir(&tmp).unwrap().count(), 0);
    }
}
