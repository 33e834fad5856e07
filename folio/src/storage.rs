use folio_config::StorageConfig;
use folio_storage_impl::{FileStorageService, FileStorageServiceConfig, MemoryStorageService};

/// Open the message storage directory
pub async fn connect(config: &StorageConfig) -> anyhow::Result<FileStorageService> {
    FileStorageService::open(FileStorageServiceConfig {
        root: config.path.clone(),
        quota: config.quota,
    })
    .await
}

/// Storage that is discarded when the process exits
pub fn ephemeral(config: &StorageConfig) -> MemoryStorageService {
    MemoryStorageService::new(config.quota)
}
