//! Key-value persistence.
//!
//! This module provides:
//!
//! - [`KeyValueStore`] — The storage capability: string values under string keys.
//!
//! - [`MemoryStore`] — In-process store, optionally with a size quota.
//!
//! - [`FileStore`] — Store backed by a single JSON file on disk.
//!
//! - [`Storable`] / [`load`] / [`save`] — Types persisted under a fixed key.
//!
//! - [`load_json`] / [`save_json`] — Typed JSON helpers over any store.
//!
//! - [`PersistenceError`] / [`StorageError`] — Error types for persistence operations.
//!
//! # Example
//!
//! ```
//! # use serde::{Serialize, Deserialize};
//! use briefing_core::persistence::{MemoryStore, Storable, load, save};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct Notes {
//!     lines: Vec<String>,
//! }
//!
//! impl Storable for Notes {
//!     fn storage_key() -> &'static str {
//!         "notes"
//!     }
//! }
//!
//! let store = MemoryStore::new();
//! save(&store, &Notes { lines: vec!["hello".into()] }).unwrap();
//! let restored: Option<Notes> = load(&store).unwrap();
//! assert_eq!(restored.unwrap().lines, vec!["hello".to_string()]);
//! ```

use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Error raised by a [`KeyValueStore`].
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Underlying I/O failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Writing the value would exceed the store's capacity.
    #[error("quota exceeded writing '{key}' ({needed} bytes, limit {limit})")]
    Quota {
        /// Key being written.
        key: String,
        /// Bytes the store would hold after the write.
        needed: usize,
        /// Capacity in bytes.
        limit: usize,
    },

    /// The backing data could not be read as a key-value map.
    #[error("corrupt store: {0}")]
    Corrupt(String),

    /// The store is not reachable.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Error type for typed persistence operations.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// Reading or writing the store failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// String key-value storage.
///
/// Implementations must be safe to share between threads. Writes to one key
/// are last-writer-wins.
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Storable
// ─────────────────────────────────────────────────────────────────────────────

/// A type persisted under a fixed key.
pub trait Storable {
    /// Stable key the value is stored under.
    fn storage_key() -> &'static str;
}

/// Reads and deserializes the JSON value stored under `key`.
///
/// # Errors
///
/// Returns an error if the store fails or the value is not valid JSON for `T`.
pub fn load_json<T: DeserializeOwned>(
    store: &(impl KeyValueStore + ?Sized),
    key: &str,
) -> Result<Option<T>, PersistenceError> {
    match store.get(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Serializes `value` as JSON and stores it under `key`.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn save_json<T: Serialize + ?Sized>(
    store: &(impl KeyValueStore + ?Sized),
    key: &str,
    value: &T,
) -> Result<(), PersistenceError> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)?;
    Ok(())
}

/// Loads a [`Storable`] value from its storage key.
///
/// # Errors
///
/// See [`load_json`].
pub fn load<T: Storable + DeserializeOwned>(
    store: &(impl KeyValueStore + ?Sized),
) -> Result<Option<T>, PersistenceError> {
    load_json(store, T::storage_key())
}

/// Saves a [`Storable`] value under its storage key.
///
/// # Errors
///
/// See [`save_json`].
pub fn save<T: Storable + Serialize>(
    store: &(impl KeyValueStore + ?Sized),
    value: &T,
) -> Result<(), PersistenceError> {
    save_json(store, T::storage_key(), value)
}

// ─────────────────────────────────────────────────────────────────────────────
// MemoryStore
// ─────────────────────────────────────────────────────────────────────────────

/// In-process key-value store.
///
/// An optional quota bounds the total size of keys and values, mimicking
/// browser storage limits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStore {
    /// Creates an empty, unbounded store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store holding at most `bytes` of keys and values.
    #[must_use]
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            quota: Some(bytes),
        }
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write();
        if let Some(limit) = self.quota {
            let others: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = others + key.len() + value.len();
            if needed > limit {
                return Err(StorageError::Quota {
                    key: key.to_string(),
                    needed,
                    limit,
                });
            }
        }
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.write().remove(key);
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// FileStore
// ─────────────────────────────────────────────────────────────────────────────

/// Key-value store persisted as one JSON object file.
///
/// A missing file reads as an empty store. Every write rewrites the whole
/// file through a temporary file in the same directory, so readers never see
/// a partially written map.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Creates a store backed by the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(BTreeMap::new());
            }
            Err(err) => return Err(err.into()),
        };
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&raw).map_err(|err| {
            StorageError::Corrupt(format!("{}: {err}", self.path.display()))
        })
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir)?;

        let contents = serde_json::to_vec_pretty(map)
            .map_err(|err| StorageError::Corrupt(err.to_string()))?;
        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        tmp.write_all(&contents)?;
        tmp.flush()?;
        tmp.persist(&self.path).map_err(|err| err.error)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_map()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock();
        let mut map = self.read_map()?;
        map.insert(key.to_string(), value.to_string());
        self.write_map(&map)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock();
        let mut map = self.read_map()?;
        if map.remove(key).is_some() {
            self.write_map(&map)?;
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// FailingStore for Testing
// ─────────────────────────────────────────────────────────────────────────────

/// In-memory store whose reads and writes can be made to fail on demand.
#[cfg(any(test, feature = "test-utils"))]
#[derive(Debug, Default)]
pub struct FailingStore {
    inner: MemoryStore,
    fail_reads: std::sync::atomic::AtomicBool,
    fail_writes: std::sync::atomic::AtomicBool,
}

#[cfg(any(test, feature = "test-utils"))]
impl FailingStore {
    /// Creates an empty store that does not fail.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent reads fail (or succeed again).
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads
            .store(fail, std::sync::atomic::Ordering::SeqCst);
    }

    /// Makes subsequent writes and removals fail (or succeed again).
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes
            .store(fail, std::sync::atomic::Ordering::SeqCst);
    }

    /// Reads the underlying value, bypassing failure injection.
    #[must_use]
    pub fn peek(&self, key: &str) -> Option<String> {
        self.inner.entries.read().get(key).cloned()
    }

    fn writes_fail(&self) -> bool {
        self.fail_writes.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl KeyValueStore for FailingStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.fail_reads.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(StorageError::Unavailable(format!("read of '{key}' refused")));
        }
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.writes_fail() {
            return Err(StorageError::Quota {
                key: key.to_string(),
                needed: key.len() + value.len(),
                limit: 0,
            });
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        if self.writes_fail() {
            return Err(StorageError::Unavailable(format!("removal of '{key}' refused")));
        }
        self.inner.remove(key)
    }
}
