use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::{Duration, SystemTime},
};

use anyhow::{anyhow, Context};
use folio_storage_contracts::{validate_key, StorageLock, StorageQuotaExceeded, StorageService};
use tracing::{trace, warn};

const LOCK_RETRY_INTERVAL: Duration = Duration::from_millis(10);

/// Lock files older than this belong to a process that died while holding them.
const LOCK_STALE_AFTER: Duration = Duration::from_secs(30);

const LOCK_WAIT_TIMEOUT: Duration = Duration::from_secs(10);

/// Stores every key in its own file below a root directory.
#[derive(Debug, Clone)]
pub struct FileStorageService {
    config: Arc<FileStorageServiceConfig>,
    tmp_counter: Arc<AtomicU64>,
}

#[derive(Debug)]
pub struct FileStorageServiceConfig {
    pub root: PathBuf,
    pub quota: usize,
}

impl FileStorageService {
    /// Creates the root directory if necessary.
    pub async fn open(config: FileStorageServiceConfig) -> anyhow::Result<Self> {
        tokio::fs::create_dir_all(&config.root)
            .await
            .with_context(|| {
                format!(
                    "Failed to create storage directory at {}",
                    config.root.display()
                )
            })?;

        Ok(Self {
            config: config.into(),
            tmp_counter: Default::default(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.config.root
    }

    fn lock_path(&self, key: &str) -> anyhow::Result<PathBuf> {
        validate_key(key)?;
        Ok(self.config.root.join(format!(".{key}.lock")))
    }

    /// Creates the lock file, failing with `AlreadyExists` if it is taken.
    async fn try_create_lock(path: &Path) -> std::io::Result<()> {
        tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .await
            .map(drop)
    }

    async fn is_lock_stale(path: &Path) -> bool {
        let Ok(metadata) = tokio::fs::metadata(path).await else {
            return false;
        };
        metadata
            .modified()
            .ok()
            .and_then(|modified| SystemTime::now().duration_since(modified).ok())
            .is_some_and(|age| age > LOCK_STALE_AFTER)
    }

    fn path(&self, key: &str) -> anyhow::Result<PathBuf> {
        validate_key(key)?;
        Ok(self.config.root.join(key))
    }
}

impl StorageService for FileStorageService {
    #[tracing::instrument(skip(self))]
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let path = self.path(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => {
                Err(err).with_context(|| format!("Failed to read {}", path.display()))
            }
        }
    }

    #[tracing::instrument(skip(self, value), fields(size = value.len()))]
    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let path = self.path(key)?;

        if value.len() > self.config.quota {
            return Err(StorageQuotaExceeded {
                size: value.len(),
                quota: self.config.quota,
            }
            .into());
        }

        let n = self.tmp_counter.fetch_add(1, Ordering::Relaxed);
        let tmp = self
            .config
            .root
            .join(format!(".{key}.{}.{n}.tmp", std::process::id()));

        tokio::fs::write(&tmp, value)
            .await
            .with_context(|| format!("Failed to write {}", tmp.display()))?;

        if let Err(err) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(err).with_context(|| format!("Failed to replace {}", path.display()));
        }

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        let path = self.path(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => {
                Err(err).with_context(|| format!("Failed to remove {}", path.display()))
            }
        }
    }

    #[tracing::instrument(skip(self))]
    async fn lock(&self, key: &str) -> anyhow::Result<StorageLock> {
        let path = self.lock_path(key)?;
        let deadline = tokio::time::Instant::now() + LOCK_WAIT_TIMEOUT;

        loop {
            match Self::try_create_lock(&path).await {
                Ok(()) => {
                    trace!("Acquired storage lock");
                    return Ok(StorageLock::new(LockFile(path)));
                }
                Err(err) if err.kind() == ErrorKind::AlreadyExists => {}
                Err(err) => {
                    return Err(err)
                        .with_context(|| format!("Failed to create {}", path.display()));
                }
            }

            if Self::is_lock_stale(&path).await {
                warn!(path = %path.display(), "Removing stale storage lock");
                let _ = tokio::fs::remove_file(&path).await;
                continue;
            }

            if tokio::time::Instant::now() >= deadline {
                return Err(anyhow!(
                    "Timed out waiting for storage lock {}",
                    path.display()
                ));
            }
            tokio::time::sleep(LOCK_RETRY_INTERVAL).await;
        }
    }
}

/// Removes the lock file when dropped.
#[derive(Debug)]
struct LockFile(PathBuf);

impl Drop for LockFile {
    fn drop(&mut self) {
        if let Err(err) = std::fs::remove_file(&self.0) {
            warn!(path = %self.0.display(), %err, "Failed to release storage lock");
        }
    }
}
