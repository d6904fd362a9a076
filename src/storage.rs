//! Storage
//!
//! Durable key-value backends the cart snapshot is written to. One backend
//! instance stands for one profile: everything stored under a key survives
//! until it is overwritten.

use std::{
    cell::RefCell,
    fs, io,
    path::{Path, PathBuf},
    rc::Rc,
};

use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::warn;

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// IO error reading or writing a stored value
    #[error("storage io error: {0}")]
    Io(#[from] io::Error),

    /// Key contains characters the backend cannot store
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
}

/// A durable string key-value store. Values live until overwritten.
pub trait Storage {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-process storage.
///
/// Clones share the same entries, so a clone kept aside observes every write
/// made through the original.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<FxHashMap<String, String>>>,
}

impl MemoryStorage {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Check if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());

        Ok(())
    }
}

/// Storage backed by a directory, one file per key.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Use `dir` as the storage directory. It is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The storage directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));

        if valid {
            Ok(self.dir.join(format!("{key}.json")))
        } else {
            Err(StorageError::InvalidKey(key.to_string()))
        }
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)?) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let staging = path.with_extension("json.tmp");

        fs::create_dir_all(&self.dir)?;

        // Write aside then rename so a reader never sees a half-written value.
        fs::write(&staging, value)?;

        if let Err(err) = fs::rename(&staging, &path) {
            if let Err(cleanup) = fs::remove_file(&staging) {
                warn!(path = %staging.display(), "failed to remove staging file: {cleanup}");
            }

            return Err(err.into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn memory_storage_round_trips_values() -> TestResult {
        let mut storage = MemoryStorage::new();

        assert_eq!(storage.get("cart")?, None);

        storage.set("cart", "{}")?;
        assert_eq!(storage.get("cart")?.as_deref(), Some("{}"));

        storage.set("cart", "[]")?;
        assert_eq!(storage.get("cart")?.as_deref(), Some("[]"));
        assert_eq!(storage.len(), 1);
        assert!(!storage.is_empty());

        Ok(())
    }

    #[test]
    fn memory_storage_clones_share_entries() -> TestResult {
        let mut storage = MemoryStorage::new();
        let observer = storage.clone();

        storage.set("cart", "value")?;

        assert_eq!(observer.get("cart")?.as_deref(), Some("value"));

        Ok(())
    }

    #[test]
    fn file_storage_round_trips_values() -> TestResult {
        let dir = tempfile::tempdir()?;
        let mut storage = FileStorage::new(dir.path().join("profile"));

        assert_eq!(storage.get("satchel.cart")?, None);

        storage.set("satchel.cart", "{\"lines\":[]}")?;
        assert_eq!(
            storage.get("satchel.cart")?.as_deref(),
            Some("{\"lines\":[]}")
        );
        assert!(storage.dir().join("satchel.cart.json").exists());
        assert!(!storage.dir().join("satchel.cart.json.tmp").exists());

        Ok(())
    }

    #[test]
    fn failed_file_write_leaves_no_staging_file() -> TestResult {
        let dir = tempfile::tempdir()?;
        let mut storage = FileStorage::new(dir.path());

        // A non-empty directory where the value file belongs makes the rename fail.
        fs::create_dir_all(dir.path().join("satchel.cart.json").join("occupied"))?;

        assert!(matches!(
            storage.set("satchel.cart", "{}"),
            Err(StorageError::Io(_))
        ));
        assert!(!dir.path().join("satchel.cart.json.tmp").exists());

        Ok(())
    }

    #[test]
    fn file_storage_rejects_path_like_keys() -> TestResult {
        let dir = tempfile::tempdir()?;
        let storage = FileStorage::new(dir.path());

        for key in ["", "../escape", "a/b", ".hidden"] {
            assert!(
                matches!(storage.get(key), Err(StorageError::InvalidKey(_))),
                "key {key:?} should be rejected"
            );
        }

        Ok(())
    }
}
