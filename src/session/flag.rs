//! Flag store trait and its in-memory and file-backed implementations.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Errors raised by a flag store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing file could not be read or written.
    #[error("IO error on {path}: {source}")]
    Io {
        /// File being accessed.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },

    /// The backing file does not contain a JSON object of strings.
    #[error("Corrupt flag file {path}: {source}")]
    Corrupt {
        /// File being parsed.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },
}

/// Key/value store scoped to a browsing session.
pub trait SessionFlagStore: Send + Sync + std::fmt::Debug {
    /// Read a value.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove a value. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Whether a key is present.
    fn contains(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.get(key)?.is_some())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Process-lifetime store.
///
/// Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryFlagStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryFlagStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionFlagStore for MemoryFlagStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(lock(&self.entries).get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        lock(&self.entries).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        lock(&self.entries).remove(key);
        Ok(())
    }
}

/// Store persisted as a JSON object in a single file.
///
/// The file is read on every access, so several widget instances pointed at
/// the same file observe each other's writes. A missing file is an empty
/// store.
#[derive(Debug)]
pub struct FileFlagStore {
    path: PathBuf,
    write_guard: Mutex<()>,
}

impl FileFlagStore {
    /// Use the file at `path`; it is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_guard: Mutex::new(()),
        }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<HashMap<String, String>, StoreError> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(HashMap::new());
        }
        serde_json::from_slice(&raw).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, entries: &HashMap<String, String>) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_vec_pretty(entries).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, json).map_err(io_err)
    }

    fn update(&self, f: impl FnOnce(&mut HashMap<String, String>)) -> Result<(), StoreError> {
        let _guard = lock(&self.write_guard);
        let mut entries = self.load()?;
        f(&mut entries);
        self.save(&entries)
    }
}

impl SessionFlagStore for FileFlagStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.update(|entries| {
            entries.remove(key);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_roundtrip() {
        let store = MemoryFlagStore::new();
        assert!(store.is_empty());

        store.set("chatSessionActive", "true").unwrap();
        assert_eq!(store.get("chatSessionActive").unwrap().as_deref(), Some("true"));
        assert!(store.contains("chatSessionActive").unwrap());

        store.remove("chatSessionActive").unwrap();
        assert!(!store.contains("chatSessionActive").unwrap());

        // removing twice is fine
        store.remove("chatSessionActive").unwrap();
    }

    #[test]
    fn memory_store_clones_share_entries() {
        let store = MemoryFlagStore::new();
        let other = store.clone();
        store.set("k", "v").unwrap();
        assert_eq!(other.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn file_store_survives_new_instance() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("session.json");

        let first = FileFlagStore::new(&path);
        assert!(first.get("chatSessionActive").unwrap().is_none());
        first.set("chatSessionActive", "true").unwrap();

        let second = FileFlagStore::new(&path);
        assert!(second.contains("chatSessionActive").unwrap());

        second.remove("chatSessionActive").unwrap();
        assert!(!first.contains("chatSessionActive").unwrap());
    }

    #[test]
    fn file_store_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();

        let store = FileFlagStore::new(&path);
        assert!(matches!(
            store.get("chatSessionActive"),
            Err(StoreError::Corrupt { .. })
        ));
    }

    #[test]
    fn empty_file_is_empty_store() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let store = FileFlagStore::new(file.path());
        assert!(store.get("anything").unwrap().is_none());
    }
}
