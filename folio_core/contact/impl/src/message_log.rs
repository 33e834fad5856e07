use std::sync::Arc;

use anyhow::Context;
use folio_core_contact_contracts::message_log::MessageLogService;
use folio_models::contact::ContactMessageRecord;
use folio_storage_contracts::{StorageLock, StorageService};
use tokio::sync::Mutex;

/// Keeps the log as one JSON array under a single storage key.
#[derive(Debug, Clone)]
pub struct MessageLogServiceImpl<Storage> {
    storage: Storage,
    config: MessageLogServiceConfig,
    write_lock: Arc<Mutex<()>>,
}

#[derive(Debug, Clone)]
pub struct MessageLogServiceConfig {
    pub key: Arc<str>,
    pub capacity: usize,
}

impl<Storage> MessageLogServiceImpl<Storage> {
    pub fn new(storage: Storage, config: MessageLogServiceConfig) -> Self {
        Self {
            storage,
            config,
            write_lock: Default::default(),
        }
    }
}

impl<Storage: StorageService> MessageLogServiceImpl<Storage> {
    /// Excludes writers in other processes sharing the same storage.
    async fn lock_storage(&self) -> anyhow::Result<StorageLock> {
        self.storage
            .lock(&self.config.key)
            .await
            .context("Failed to lock message log")
    }

    async fn read(&self) -> anyhow::Result<Vec<ContactMessageRecord>> {
        let blob = self
            .storage
            .get(&self.config.key)
            .await
            .context("Failed to read message log")?;

        match blob {
            Some(blob) => serde_json::from_str(&blob).context("Failed to deserialize message log"),
            None => Ok(Vec::new()),
        }
    }
}

impl<Storage: StorageService> MessageLogService for MessageLogServiceImpl<Storage> {
    #[tracing::instrument(skip_all, fields(id = %record.id))]
    async fn append(&self, record: ContactMessageRecord) -> anyhow::Result<()> {
        let _lock = self.write_lock.lock().await;
        let _storage_lock = self.lock_storage().await?;

        let mut records = self.read().await?;
        records.push(record);
        let overflow = records.len().saturating_sub(self.config.capacity);
        let records = records.split_off(overflow);

        let blob = serde_json::to_string(&records).context("Failed to serialize message log")?;
        self.storage
            .set(&self.config.key, &blob)
            .await
            .context("Failed to write message log")
    }

    #[tracing::instrument(skip_all)]
    async fn list(&self) -> anyhow::Result<Vec<ContactMessageRecord>> {
        self.read().await
    }

    #[tracing::instrument(skip_all)]
    async fn clear(&self) -> anyhow::Result<()> {
        let _lock = self.write_lock.lock().await;
        let _storage_lock = self.lock_storage().await?;

        self.storage
            .remove(&self.config.key)
            .await
            .context("Failed to clear message log")
    }
}
