//! Key-value persistence for the wallet state.
//!
//! The wallet keeps two entries: the balance under [`BALANCE_KEY`] as a
//! decimal string and the history under [`HISTORY_KEY`] as a JSON array.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// The key of the persisted balance
pub const BALANCE_KEY: &str = "solde";
/// The key of the persisted history
pub const HISTORY_KEY: &str = "historique";

/// Possible errors to occur while reading or writing persisted state
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Could not access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("The stored data is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

/// A string-to-string store
///
/// Writes must be durable once `set` returned; the wallet does not batch them.
pub trait KeyValueStore {
    /// The value stored under `key`, if any
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing what was there
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// A store that lives as long as the process does
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// A store backed by a single JSON object on disk
///
/// The whole file is rewritten on every `set`.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Opens the store at `path`
    ///
    /// A missing file is an empty store; it is created on the first write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => serde_json::from_str(&content)?,
            Err(error) if error.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(StorageError::Io { path, source }),
        };
        tracing::debug!(path = %path.display(), entries = entries.len(), "opened wallet store");

        Ok(Self { path, entries })
    }

    /// The file backing the store
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StorageError::Io {
                path: parent.to_owned(),
                source,
            })?;
        }

        let content = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, content).map_err(|source| StorageError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_owned(), value.to_owned());
        self.flush()?;
        tracing::debug!(key, path = %self.path.display(), "persisted wallet entry");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get(BALANCE_KEY).unwrap(), None);

        store.set(BALANCE_KEY, "120000").unwrap();
        store.set(BALANCE_KEY, "125000").unwrap();
        assert_eq!(store.get(BALANCE_KEY).unwrap().as_deref(), Some("125000"));
    }

    #[test]
    fn file_store_survives_reopening() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("wallet.json");

        let mut store = FileStore::open(&path).unwrap();
        assert_eq!(store.get(HISTORY_KEY).unwrap(), None);
        store.set(BALANCE_KEY, "99.5").unwrap();
        store.set(HISTORY_KEY, "[]").unwrap();

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get(BALANCE_KEY).unwrap().as_deref(), Some("99.5"));
        assert_eq!(store.get(HISTORY_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wallet.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(FileStore::open(&path), Err(StorageError::Json(_))));
    }
}
