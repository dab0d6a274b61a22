//! Client-side key/value storage (port) plus in-process implementations

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::StorageError;

/// Durable (or session-scoped) string key/value storage.
///
/// Callers treat every write as best effort: an `Err` is logged and dropped.
pub trait ClientStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;

    /// Reads and removes `key`. Implementations holding a lock do both under
    /// it, so only one caller ever sees the value.
    fn take_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let value = self.get_item(key)?;
        if value.is_some() {
            self.remove_item(key)?;
        }
        Ok(value)
    }
}

/// Process-local storage; also used for the ephemeral session marker.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: RwLock::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl ClientStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.entries.write().remove(key);
        Ok(())
    }

    fn take_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.write().remove(key))
    }
}

/// Namespaces every key under a prefix, so one backing store can hold the
/// selections of many users.
#[derive(Clone)]
pub struct ScopedStorage {
    prefix: String,
    inner: Arc<dyn ClientStorage>,
}

impl ScopedStorage {
    pub fn new(prefix: impl Into<String>, inner: Arc<dyn ClientStorage>) -> Self {
        Self {
            prefix: prefix.into(),
            inner,
        }
    }

    fn key(&self, key: &str) -> String {
        format!("{}:{}", self.prefix, key)
    }
}

impl ClientStorage for ScopedStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get_item(&self.key(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner.set_item(&self.key(key), value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove_item(&self.key(key))
    }

    fn take_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.take_item(&self.key(key))
    }
}
