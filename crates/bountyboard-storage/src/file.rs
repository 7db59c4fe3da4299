//! File-backed key-value store.

use std::path::{Path, PathBuf};

use crate::KeyValueStore;
use crate::error::{Result, StorageError};

/// Extension appended to every key file.
const FILE_EXTENSION: &str = "json";

/// Stores each key as `<data_dir>/<key>.json`.
///
/// Writes go to a sibling temp file first and are renamed into place, so a
/// reader never observes a half-written value.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`. The directory is created lazily on the
    /// first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the key files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        let name = file_name_for(key)?;
        Ok(self.dir.join(format!("{}.{}", name, FILE_EXTENSION)))
    }
}

/// Map a key to a file stem. Bytes outside `[A-Za-z0-9._~-]` are
/// percent-encoded (`%` included), so distinct keys never share a file.
fn file_name_for(key: &str) -> Result<String> {
    if key.is_empty() || key == "." || key == ".." {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(urlencoding::encode(key).into_owned())
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        let io_err = |source| StorageError::Io {
            key: key.to_string(),
            source,
        };

        std::fs::create_dir_all(&self.dir).map_err(io_err)?;

        let tmp = path.with_extension(format!("{}.tmp", FILE_EXTENSION));
        std::fs::write(&tmp, value).map_err(io_err)?;
        std::fs::rename(&tmp, &path).map_err(io_err)?;

        tracing::trace!(key, path = %path.display(), "stored value");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_key_is_none() {
        let temp = tempdir().unwrap();
        let store = FileStore::new(temp.path());
        assert!(store.get("nothing").unwrap().is_none());
    }

    #[test]
    fn test_set_get_remove() {
        let temp = tempdir().unwrap();
        let store = FileStore::new(temp.path().join("nested"));

        store.set("bountyboard-auth", r#"{"a":1}"#).unwrap();
        assert_eq!(
            store.get("bountyboard-auth").unwrap().as_deref(),
            Some(r#"{"a":1}"#)
        );
        assert!(temp.path().join("nested/bountyboard-auth.json").exists());

        store.remove("bountyboard-auth").unwrap();
        assert!(store.get("bountyboard-auth").unwrap().is_none());

        // Removing twice is fine
        store.remove("bountyboard-auth").unwrap();
    }

    #[test]
    fn test_overwrite_replaces_value() {
        let temp = tempdir().unwrap();
        let store = FileStore::new(temp.path());
        store.set("k", "one").unwrap();
        store.set("k", "two").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("two"));
        assert!(!temp.path().join("k.json.tmp").exists());
    }

    #[test]
    fn test_key_encoding() {
        let store = FileStore::new("/data");
        let path = store.path_for("winners/../b:1").unwrap();
        assert_eq!(path, PathBuf::from("/data/winners%2F..%2Fb%3A1.json"));
        assert_eq!(
            store.path_for("bountyboard-auth").unwrap(),
            PathBuf::from("/data/bountyboard-auth.json")
        );
        assert!(matches!(
            store.path_for(".."),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(store.path_for("").is_err());
    }

    #[test]
    fn test_keys_differing_in_unsafe_chars_get_distinct_files() {
        let store = FileStore::new("/data");
        let keys = [
            "winners-team/alpha",
            "winners-team:alpha",
            "winners-team_alpha",
            "winners-team%2Falpha",
        ];
        let paths: std::collections::HashSet<_> =
            keys.iter().map(|k| store.path_for(k).unwrap()).collect();
        assert_eq!(paths.len(), keys.len());
    }

    #[test]
    fn test_similar_keys_do_not_share_values() {
        let temp = tempdir().unwrap();
        let store = FileStore::new(temp.path());
        store.set("team/alpha", "slash").unwrap();
        store.set("team:alpha", "colon").unwrap();

        assert_eq!(store.get("team/alpha").unwrap().as_deref(), Some("slash"));
        store.remove("team:alpha").unwrap();
        assert_eq!(store.get("team/alpha").unwrap().as_deref(), Some("slash"));
    }
}
