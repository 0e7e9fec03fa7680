//! Durable key-value storage backends.
//!
//! The rest of the crate only sees [`SaveStore`]: get/set/delete/has/flush on
//! string keys with no further semantics. Three backends:
//! - [`MemoryStore`] for tests and headless runs,
//! - [`FileStore`] for native builds, one file per key with write-rename so a
//!   crash mid-write cannot corrupt an existing save,
//! - `LocalStorageStore` on wasm32, backed by browser LocalStorage.

use std::collections::HashMap;
use std::io;

use crate::error::SaveError;

/// The single key under which the current session snapshot is persisted.
pub const SAVE_KEY: &str = "SavedGameData";

/// Minimal durable key-value storage.
///
/// Every operation can fail (a backend may be unreachable), and no failure
/// here is allowed to take the process down; callers log and fall back.
pub trait SaveStore {
    fn get(&self, key: &str) -> Result<Option<String>, SaveError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), SaveError>;
    fn delete(&mut self, key: &str) -> Result<(), SaveError>;

    fn has(&self, key: &str) -> Result<bool, SaveError> {
        Ok(self.get(key)?.is_some())
    }

    /// Push buffered writes to durable storage. Default no-op for backends
    /// that persist on every `set`.
    fn flush(&mut self) -> Result<(), SaveError> {
        Ok(())
    }
}

/// In-memory store. Nothing survives the process; useful for tests and for
/// running without persistence.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SaveStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, SaveError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SaveError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), SaveError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// File-backed store: each key is a `<key>.json` file under a base directory.
#[cfg(not(target_arch = "wasm32"))]
pub use file_store::FileStore;

#[cfg(not(target_arch = "wasm32"))]
mod file_store {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;
    use std::path::{Path, PathBuf};

    #[derive(Debug)]
    pub struct FileStore {
        dir: PathBuf,
    }

    impl FileStore {
        /// Open a store rooted at `dir`, creating the directory if needed.
        pub fn new(dir: impl Into<PathBuf>) -> Result<Self, SaveError> {
            let dir = dir.into();
            fs::create_dir_all(&dir)?;
            Ok(Self { dir })
        }

        fn key_path(&self, key: &str) -> PathBuf {
            self.dir.join(format!("{key}.json"))
        }

        /// Write-rename: write to `<path>.tmp`, sync, then rename over the
        /// final path. A crash before the rename leaves the old file intact.
        fn atomic_write(path: &Path, data: &str) -> io::Result<()> {
            let tmp = path.with_extension("json.tmp");
            let mut file = File::create(&tmp)?;
            file.write_all(data.as_bytes())?;
            file.sync_all()?;
            fs::rename(&tmp, path)?;
            Ok(())
        }
    }

    impl SaveStore for FileStore {
        fn get(&self, key: &str) -> Result<Option<String>, SaveError> {
            match fs::read_to_string(self.key_path(key)) {
                Ok(text) => Ok(Some(text)),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e.into()),
            }
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), SaveError> {
            Self::atomic_write(&self.key_path(key), value)?;
            Ok(())
        }

        fn delete(&mut self, key: &str) -> Result<(), SaveError> {
            match fs::remove_file(self.key_path(key)) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            }
        }
    }
}

/// Browser LocalStorage store (wasm32 only).
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;

#[cfg(target_arch = "wasm32")]
mod local_storage {
    use super::*;
    use web_sys::Storage;

    #[derive(Debug, Default)]
    pub struct LocalStorageStore;

    impl LocalStorageStore {
        pub fn new() -> Self {
            Self
        }

        fn storage() -> Result<Storage, SaveError> {
            web_sys::window()
                .and_then(|w| w.local_storage().ok())
                .flatten()
                .ok_or_else(|| {
                    SaveError::Store(io::Error::other("LocalStorage unavailable"))
                })
        }
    }

    impl SaveStore for LocalStorageStore {
        fn get(&self, key: &str) -> Result<Option<String>, SaveError> {
            Self::storage()?
                .get_item(key)
                .map_err(|_| SaveError::Store(io::Error::other("LocalStorage read failed")))
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), SaveError> {
            Self::storage()?
                .set_item(key, value)
                .map_err(|_| SaveError::Store(io::Error::other("LocalStorage write failed")))
        }

        fn delete(&mut self, key: &str) -> Result<(), SaveError> {
            Self::storage()?
                .remove_item(key)
                .map_err(|_| SaveError::Store(io::Error::other("LocalStorage delete failed")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get(SAVE_KEY).unwrap(), None);
        assert!(!store.has(SAVE_KEY).unwrap());

        store.set(SAVE_KEY, "blob").unwrap();
        assert_eq!(store.get(SAVE_KEY).unwrap().as_deref(), Some("blob"));
        assert!(store.has(SAVE_KEY).unwrap());

        store.set(SAVE_KEY, "newer blob").unwrap();
        assert_eq!(store.get(SAVE_KEY).unwrap().as_deref(), Some("newer blob"));

        store.delete(SAVE_KEY).unwrap();
        assert_eq!(store.get(SAVE_KEY).unwrap(), None);
        // Deleting a missing key is fine.
        store.delete(SAVE_KEY).unwrap();
    }

    #[cfg(not(target_arch = "wasm32"))]
    mod file_store_tests {
        use super::*;
        use std::fs;
        use std::path::PathBuf;

        /// Unique temp directory per test.
        fn test_dir(name: &str) -> PathBuf {
            let dir = std::env::temp_dir().join(format!("scene_session_store_{name}"));
            let _ = fs::remove_dir_all(&dir);
            dir
        }

        #[test]
        fn test_file_store_round_trip() {
            let dir = test_dir("round_trip");
            let mut store = FileStore::new(&dir).unwrap();

            assert_eq!(store.get(SAVE_KEY).unwrap(), None);
            store.set(SAVE_KEY, "{\"v\":1}").unwrap();
            store.flush().unwrap();
            assert_eq!(store.get(SAVE_KEY).unwrap().as_deref(), Some("{\"v\":1}"));

            // No temp file left behind after the rename.
            assert!(!dir.join("SavedGameData.json.tmp").exists());

            store.delete(SAVE_KEY).unwrap();
            assert_eq!(store.get(SAVE_KEY).unwrap(), None);
            let _ = fs::remove_dir_all(&dir);
        }

        #[test]
        fn test_file_store_overwrite() {
            let dir = test_dir("overwrite");
            let mut store = FileStore::new(&dir).unwrap();

            store.set(SAVE_KEY, "first").unwrap();
            store.set(SAVE_KEY, "second").unwrap();
            assert_eq!(store.get(SAVE_KEY).unwrap().as_deref(), Some("second"));
            let _ = fs::remove_dir_all(&dir);
        }

        #[test]
        fn test_file_store_survives_reopen() {
            let dir = test_dir("reopen");
            {
                let mut store = FileStore::new(&dir).unwrap();
                store.set(SAVE_KEY, "persisted").unwrap();
            }
            let store = FileStore::new(&dir).unwrap();
            assert_eq!(store.get(SAVE_KEY).unwrap().as_deref(), Some("persisted"));
            let _ = fs::remove_dir_all(&dir);
        }

        #[test]
        fn test_file_store_delete_missing_is_ok() {
            let dir = test_dir("delete_missing");
            let mut store = FileStore::new(&dir).unwrap();
            store.delete("never_written").unwrap();
            let _ = fs::remove_dir_all(&dir);
        }
    }
}
