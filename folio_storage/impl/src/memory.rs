use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use anyhow::anyhow;
use folio_storage_contracts::{validate_key, StorageLock, StorageQuotaExceeded, StorageService};

/// Keeps values in process memory. Used for dry runs and tests.
#[derive(Debug, Clone)]
pub struct MemoryStorageService {
    values: Arc<Mutex<HashMap<String, String>>>,
    /// One lock for all keys, shared by clones.
    write_lock: Arc<tokio::sync::Mutex<()>>,
    quota: usize,
}

impl MemoryStorageService {
    pub fn new(quota: usize) -> Self {
        Self {
            values: Default::default(),
            write_lock: Default::default(),
            quota,
        }
    }

    pub fn unlimited() -> Self {
        Self::new(usize::MAX)
    }

    fn with_values<T>(
        &self,
        f: impl FnOnce(&mut HashMap<String, String>) -> T,
    ) -> anyhow::Result<T> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| anyhow!("Memory storage lock is poisoned"))?;
        Ok(f(&mut values))
    }
}

impl Default for MemoryStorageService {
    fn default() -> Self {
        Self::unlimited()
    }
}

impl StorageService for MemoryStorageService {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        validate_key(key)?;
        self.with_values(|values| values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        validate_key(key)?;
        if value.len() > self.quota {
            return Err(StorageQuotaExceeded {
                size: value.len(),
                quota: self.quota,
            }
            .into());
        }
        self.with_values(|values| {
            values.insert(key.into(), value.into());
        })
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        validate_key(key)?;
        self.with_values(|values| {
            values.remove(key);
        })
    }

    async fn lock(&self, key: &str) -> anyhow::Result<StorageLock> {
        validate_key(key)?;
        let guard = Arc::clone(&self.write_lock).lock_owned().await;
        Ok(StorageLock::new(guard))
    }
}
