//! Durable clinic display-name cache
//!
//! Read speculatively before a clinic fetch completes and written after every
//! successful fetch or rename. Display only: nothing here decides access or
//! pause state, and entries are allowed to be stale.

use std::collections::BTreeMap;
use std::sync::Arc;

use clinic_shared::constants::CLINIC_NAME_CACHE_KEY;
use tracing::{debug, warn};

use crate::domain::TenantId;
use crate::repositories::ClientStorage;

#[derive(Clone)]
pub struct ClinicNameCache {
    storage: Arc<dyn ClientStorage>,
}

impl ClinicNameCache {
    pub fn new(storage: Arc<dyn ClientStorage>) -> Self {
        Self { storage }
    }

    pub fn get(&self, id: &TenantId) -> Option<String> {
        self.read_all().remove(id.as_str())
    }

    pub fn put(&self, id: &TenantId, name: &str) {
        self.put_many(std::iter::once((id, name)));
    }

    /// Entries with an empty name are skipped; unchanged maps are not rewritten.
    pub fn put_many<'a, I>(&self, entries: I)
    where
        I: IntoIterator<Item = (&'a TenantId, &'a str)>,
    {
        let mut names = self.read_all();
        let mut changed = false;

        for (id, name) in entries {
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            if names.get(id.as_str()).map(String::as_str) != Some(name) {
                names.insert(id.as_str().to_string(), name.to_string());
                changed = true;
            }
        }

        if !changed {
            return;
        }

        match serde_json::to_string(&names) {
            Ok(json) => {
                if let Err(e) = self.storage.set_item(CLINIC_NAME_CACHE_KEY, &json) {
                    warn!("Failed to persist clinic name cache: {}", e);
                }
            }
            Err(e) => warn!("Failed to serialize clinic name cache: {}", e),
        }
    }

    fn read_all(&self) -> BTreeMap<String, String> {
        let raw = match self.storage.get_item(CLINIC_NAME_CACHE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return BTreeMap::new(),
            Err(e) => {
                warn!("Failed to read clinic name cache: {}", e);
                return BTreeMap::new();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            debug!("Ignoring unreadable clinic name cache: {}", e);
            BTreeMap::new()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::repositories::MemoryStorage;

    struct BrokenStorage;

    impl ClientStorage for BrokenStorage {
        fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("disabled".to_string()))
        }
        fn set_item(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("quota exceeded".to_string()))
        }
        fn remove_item(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("disabled".to_string()))
        }
    }

    #[test]
    fn test_put_then_get() {
        let storage = Arc::new(MemoryStorage::new());
        let cache = ClinicNameCache::new(storage.clone());

        cache.put(&TenantId::new("c1"), "  Smile Studio ");
        assert_eq!(cache.get(&TenantId::new("c1")).as_deref(), Some("Smile Studio"));
        assert!(cache.get(&TenantId::new("c2")).is_none());

        // a second cache over the same storage sees the entry (reload)
        let reloaded = ClinicNameCache::new(storage);
        assert_eq!(reloaded.get(&TenantId::new("c1")).as_deref(), Some("Smile Studio"));
    }

    #[test]
    fn test_empty_names_are_ignored() {
        let cache = ClinicNameCache::new(Arc::new(MemoryStorage::new()));
        cache.put(&TenantId::new("c1"), "   ");
        assert!(cache.get(&TenantId::new("c1")).is_none());
    }

    #[test]
    fn test_corrupt_payload_reads_as_empty() {
        let storage = Arc::new(MemoryStorage::with_entries([(CLINIC_NAME_CACHE_KEY, "{not json")]));
        let cache = ClinicNameCache::new(storage);
        assert!(cache.get(&TenantId::new("c1")).is_none());

        cache.put(&TenantId::new("c1"), "Smile Studio");
        assert_eq!(cache.get(&TenantId::new("c1")).as_deref(), Some("Smile Studio"));
    }

    #[test]
    fn test_storage_failures_are_swallowed() {
        let cache = ClinicNameCache::new(Arc::new(BrokenStorage));
        cache.put(&TenantId::new("c1"), "Smile Studio");
        assert!(cache.get(&TenantId::new("c1")).is_none());
    }
}
