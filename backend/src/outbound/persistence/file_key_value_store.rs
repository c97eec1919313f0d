//! Directory-backed key-value medium: one `<key>.json` file per key.

use std::io;
use std::path::{Path, PathBuf};

use camino::Utf8PathBuf;
use cap_std::{ambient_authority, fs::Dir};
use tracing::debug;

use super::atomic_io::write_atomic;
use super::key_value::{KeyValueError, KeyValueStore, validate_key};

/// Key-value medium stored as files in a single directory.
///
/// All access goes through a capability handle to the directory, so keys can
/// never address files outside it.
#[derive(Debug)]
pub struct FileKeyValueStore {
    dir: Dir,
    root: PathBuf,
}

impl FileKeyValueStore {
    /// Open `root`, creating it and any missing parents.
    ///
    /// # Errors
    ///
    /// Returns [`KeyValueError::Open`] when the directory cannot be created
    /// or opened.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, KeyValueError> {
        let root = root.into();
        let open_failure = |err: io::Error| KeyValueError::Open {
            path: root.clone(),
            message: err.to_string(),
        };
        Dir::create_ambient_dir_all(&root, ambient_authority()).map_err(open_failure)?;
        let dir = Dir::open_ambient_dir(&root, ambient_authority()).map_err(open_failure)?;
        debug!(path = %root.display(), "opened key-value directory");
        Ok(Self { dir, root })
    }

    /// Directory holding the entries.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn file_name(key: &str) -> Result<Utf8PathBuf, KeyValueError> {
        validate_key(key)?;
        Ok(Utf8PathBuf::from(format!("{key}.json")))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, KeyValueError> {
        let file = Self::file_name(key)?;
        match self.dir.read_to_string(&file) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(KeyValueError::Read {
                key: key.to_owned(),
                message: err.to_string(),
            }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), KeyValueError> {
        let file = Self::file_name(key)?;
        write_atomic(&self.dir, key, &file, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn temp() -> TempDir {
        TempDir::new().expect("create temp dir")
    }

    #[rstest]
    fn open_creates_missing_directories(temp: TempDir) {
        let root = temp.path().join("nested").join("data");

        let store = FileKeyValueStore::open(&root).expect("open creates directories");

        assert!(root.is_dir());
        assert_eq!(store.root(), root.as_path());
    }

    #[rstest]
    fn values_are_stored_as_json_files(temp: TempDir) {
        let store = FileKeyValueStore::open(temp.path()).expect("open store");

        store.set("dashboard_users", "[]").expect("set succeeds");

        let on_disk = std::fs::read_to_string(temp.path().join("dashboard_users.json"))
            .expect("file written");
        assert_eq!(on_disk, "[]");
        assert_eq!(store.get("dashboard_users"), Ok(Some("[]".to_owned())));
    }

    #[rstest]
    fn missing_keys_read_as_none(temp: TempDir) {
        let store = FileKeyValueStore::open(temp.path()).expect("open store");
        assert_eq!(store.get("dashboard_current_user"), Ok(None));
    }

    #[rstest]
    fn values_survive_reopening(temp: TempDir) {
        FileKeyValueStore::open(temp.path())
            .expect("open store")
            .set("k", "first")
            .expect("set succeeds");

        let reopened = FileKeyValueStore::open(temp.path()).expect("reopen store");

        assert_eq!(reopened.get("k"), Ok(Some("first".to_owned())));
    }

    #[rstest]
    fn keys_cannot_escape_the_directory(temp: TempDir) {
        let store = FileKeyValueStore::open(temp.path().join("data")).expect("open store");

        let err = store.set("../outside", "x").expect_err("escaping key");

        assert!(matches!(err, KeyValueError::InvalidKey { .. }));
        assert!(!temp.path().join("outside.json").exists());
    }

    #[rstest]
    fn open_reports_paths_that_are_files(temp: TempDir) {
        let file = temp.path().join("occupied");
        std::fs::write(&file, "x").expect("create file");

        let err = FileKeyValueStore::open(&file).expect_err("cannot open a file as a directory");

        assert!(matches!(err, KeyValueError::Open { ref path, .. } if *path == file));
    }
}
