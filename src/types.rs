//! Option and value types shared by the store and the interfaces.

use std::path::PathBuf;

/// Flags controlling a single transfer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TransferOptions {
    /// Re-check the checksum after the transfer and roll back on mismatch.
    pub validate: bool,
    /// Log transfers at `info` instead of `debug` level.
    pub verbose: bool,
}

impl TransferOptions {
    /// Options with validation enabled.
    pub const VALIDATE: Self = Self {
        validate: true,
        verbose: false,
    };

    /// Set the validation flag.
    pub fn validate(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    /// Set the verbosity flag.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub(crate) fn log_level(&self) -> log::Level {
        if self.verbose {
            log::Level::Info
        } else {
            log::Level::Debug
        }
    }
}

/// Options of a listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// Keep only the latest version of every path (versioned listings).
    pub latest_version: bool,
    /// Glob pattern matched against the basename, e.g. `*.txt`.
    pub pattern: Option<String>,
    /// Return an empty list instead of raising a backend error.
    pub suppress_backend_errors: bool,
}

impl ListOptions {
    /// Keep only the latest version of every path.
    pub fn latest(mut self) -> Self {
        self.latest_version = true;
        self
    }

    /// Filter basenames by a glob pattern.
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Suppress backend errors.
    pub fn suppress(mut self) -> Self {
        self.suppress_backend_errors = true;
        self
    }
}

/// Options of an archive transfer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveOptions {
    /// Files to include, relative to the source root. `None` packs every
    /// file below the root.
    pub files: Option<Vec<String>>,
    /// Existing directory for the staging directory. Defaults to the
    /// system temp location.
    pub tmp_root: Option<PathBuf>,
    /// Flags of the underlying file transfer.
    pub transfer: TransferOptions,
}

impl ArchiveOptions {
    /// Pack only the given files.
    pub fn files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.files = Some(files.into_iter().map(Into::into).collect());
        self
    }

    /// Stage below the given existing directory.
    pub fn tmp_root(mut self, tmp_root: impl Into<PathBuf>) -> Self {
        self.tmp_root = Some(tmp_root.into());
        self
    }

    /// Set the flags of the underlying file transfer.
    pub fn transfer(mut self, transfer: TransferOptions) -> Self {
        self.transfer = transfer;
        self
    }
}

/// A stored version of a logical path.
///
/// Entries order by logical path, then by version string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VersionedEntry {
    /// Logical path, e.g. `/sub/file.txt`.
    pub path: String,
    /// Version, e.g. `1.0.0`.
    pub version: String,
    /// Path on the backend, e.g. `/sub/1.0.0/file.txt`.
    pub physical: String,
}

impl VersionedEntry {
    /// Create an entry.
    pub fn new(
        path: impl Into<String>,
        version: impl Into<String>,
        physical: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            version: version.into(),
            physical: physical.into(),
        }
    }
}

impl<P, V, X> From<(P, V, X)> for VersionedEntry
where
    P: Into<String>,
    V: Into<String>,
    X: Into<String>,
{
    fn from((path, version, physical): (P, V, X)) -> Self {
        Self::new(path, version, physical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transfer_options_default_is_quiet_and_unvalidated() {
        let opts = TransferOptions::default();
        assert!(!opts.validate);
        assert_eq!(opts.log_level(), log::Level::Debug);
        assert_eq!(opts.verbose(true).log_level(), log::Level::Info);
        assert!(TransferOptions::VALIDATE.validate);
    }

    #[test]
    fn list_options_builders() {
        let opts = ListOptions::default().latest().pattern("*.txt").suppress();
        assert!(opts.latest_version);
        assert_eq!(opts.pattern.as_deref(), Some("*.txt"));
        assert!(opts.suppress_backend_errors);
    }

    #[test]
    fn archive_options_builders() {
        let opts = ArchiveOptions::default()
            .files(["a.txt", "sub/b.txt"])
            .tmp_root("/tmp")
            .transfer(TransferOptions::VALIDATE);
        assert_eq!(opts.files.unwrap(), vec!["a.txt", "sub/b.txt"]);
        assert_eq!(opts.tmp_root.unwrap(), PathBuf::from("/tmp"));
        assert!(opts.transfer.validate);
    }

    fn entry(path: &str, version: &str) -> VersionedEntry {
        VersionedEntry::new(path, version, format!("/{version}{path}"))
    }

    #[test]
    fn entries_sort_by_path_then_version_string() {
        let mut entries = vec![
            entry("/b.txt", "1.0.0"),
            entry("/a.txt", "2.0.0"),
            entry("/a.txt", "10.0.0"),
        ];
        entries.sort();
        assert_eq!(
            entries,
            vec![
                entry("/a.txt", "10.0.0"),
                entry("/a.txt", "2.0.0"),
                entry("/b.txt", "1.0.0"),
            ]
        );
        assert_eq!(
            VersionedEntry::from(("/a.txt", "1.0.0", "/1.0.0/a.txt")),
            entry("/a.txt", "1.0.0")
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn transfer_options_from_partial_json() {
        let opts: TransferOptions = serde_json::from_str(r#"{"validate":true}"#).unwrap();
        assert!(opts.validate);
        assert!(!opts.verbose);
    }
}
