//! Key/value backends that hold the session between runs

use crate::{CoreError, CoreResult};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// String key/value storage behind a [`SessionStore`](crate::SessionStore).
///
/// Operations are synchronous and atomic per key only. Implementations must
/// treat removing an absent key as success.
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> CoreResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> CoreResult<()>;
    fn remove(&self, key: &str) -> CoreResult<()>;
}

/// In-process storage; contents are lost when the last clone is dropped.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> CoreResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| CoreError::storage_error("memory storage lock poisoned"))
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> CoreResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> CoreResult<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use super::SessionStorage;
    use crate::{CoreError, CoreResult};
    use std::collections::BTreeMap;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;
    use tracing::{debug, warn};

    /// Storage persisted as a flat JSON object in a single file.
    ///
    /// The file is re-read on every access so separate processes observe each
    /// other's writes. A missing file reads as empty.
    #[derive(Debug)]
    pub struct FileStorage {
        path: PathBuf,
        write_lock: Mutex<()>,
    }

    impl FileStorage {
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self {
                path: path.into(),
                write_lock: Mutex::new(()),
            }
        }

        /// Storage file `session.json` inside `dir`
        pub fn in_dir(dir: impl AsRef<Path>) -> Self {
            Self::new(dir.as_ref().join("session.json"))
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        fn read_all(&self) -> CoreResult<BTreeMap<String, String>> {
            match std::fs::read_to_string(&self.path) {
                Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
                Ok(content) => serde_json::from_str(&content).map_err(|e| {
                    CoreError::serialization_error(format!(
                        "{} is not a valid session file: {e}",
                        self.path.display()
                    ))
                }),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
                Err(e) => Err(e.into()),
            }
        }

        fn write_all(&self, entries: &BTreeMap<String, String>) -> CoreResult<()> {
            if let Some(parent) = self.path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let tmp = self.path.with_extension("json.tmp");
            std::fs::write(&tmp, serde_json::to_string_pretty(entries)?)?;
            std::fs::rename(&tmp, &self.path)?;
            debug!(path = %self.path.display(), keys = entries.len(), "Wrote session file");
            Ok(())
        }

        fn update(&self, f: impl FnOnce(&mut BTreeMap<String, String>) -> bool) -> CoreResult<()> {
            let _guard = self
                .write_lock
                .lock()
                .map_err(|_| CoreError::storage_error("file storage lock poisoned"))?;
            // An unparseable file is replaced rather than blocking every
            // later login and logout
            let (mut entries, discarded) = match self.read_all() {
                Ok(entries) => (entries, false),
                Err(CoreError::Serialization { message }) => {
                    warn!(%message, "Discarding unreadable session file");
                    (BTreeMap::new(), true)
                }
                Err(e) => return Err(e),
            };
            if f(&mut entries) || discarded {
                self.write_all(&entries)?;
            }
            Ok(())
        }
    }

    impl SessionStorage for FileStorage {
        fn get(&self, key: &str) -> CoreResult<Option<String>> {
            Ok(self.read_all()?.remove(key))
        }

        fn set(&self, key: &str, value: &str) -> CoreResult<()> {
            self.update(|entries| {
                entries.insert(key.to_string(), value.to_string());
                true
            })
        }

        fn remove(&self, key: &str) -> CoreResult<()> {
            self.update(|entries| entries.remove(key).is_some())
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::storage::StorageTestSuite;

    #[test]
    fn memory_storage_contract() {
        StorageTestSuite::new(MemoryStorage::new()).run_all_tests();
    }

    #[test]
    fn memory_storage_clones_share_entries() {
        let storage = MemoryStorage::new();
        let clone = storage.clone();
        storage.set("k", "v").unwrap();
        assert_eq!(clone.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn file_storage_contract() {
        let dir = tempfile::tempdir().unwrap();
        StorageTestSuite::new(FileStorage::in_dir(dir.path())).run_all_tests();
    }

    #[test]
    fn file_storage_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        FileStorage::in_dir(dir.path())
            .set("access_token", "tok1")
            .unwrap();

        let reopened = FileStorage::in_dir(dir.path());
        assert_eq!(
            reopened.get("access_token").unwrap().as_deref(),
            Some("tok1")
        );
    }

    #[test]
    fn file_storage_missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested").join("session.json"));
        assert_eq!(storage.get("access_token").unwrap(), None);
        storage.remove("access_token").unwrap();
        assert!(!storage.path().exists());
    }

    #[test]
    fn file_storage_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::in_dir(dir.path());
        std::fs::write(storage.path(), "not json").unwrap();
        assert!(matches!(
            storage.get("access_token"),
            Err(CoreError::Serialization { .. })
        ));
    }

    #[test]
    fn file_storage_write_replaces_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::in_dir(dir.path());
        std::fs::write(storage.path(), "{truncated").unwrap();

        storage.set("access_token", "tok").unwrap();
        assert_eq!(storage.get("access_token").unwrap().as_deref(), Some("tok"));
    }

    #[test]
    fn file_storage_remove_replaces_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::in_dir(dir.path());
        std::fs::write(storage.path(), "{truncated").unwrap();

        storage.remove("access_token").unwrap();
        assert_eq!(storage.get("access_token").unwrap(), None);
        assert_eq!(storage.get("user").unwrap(), None);
    }

    #[test]
    fn session_recovers_from_corrupt_file() {
        use crate::{SessionStore, UserProfile};

        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::in_dir(dir.path());
        let path = storage.path().to_path_buf();
        let session = SessionStore::new(storage);
        let user = UserProfile {
            id: 3,
            username: "carol".to_string(),
            email: "c@x.com".to_string(),
            role: "member".to_string(),
            created_at: "2024-01-01T00:00:00".to_string(),
        };

        std::fs::write(&path, "{truncated").unwrap();
        session.clear_session().unwrap();
        assert!(session.session().is_empty());

        std::fs::write(&path, "{truncated").unwrap();
        session.set_session("tok", &user).unwrap();
        assert_eq!(session.token().as_deref(), Some("tok"));
        assert_eq!(session.user(), Some(user));
    }
}
