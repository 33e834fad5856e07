use std::{any::Any, fmt, future::Future};

use thiserror::Error;

/// A persistent key-value store for text blobs.
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait StorageService: Send + Sync + 'static {
    /// Reads the value stored under `key`.
    fn get(&self, key: &str) -> impl Future<Output = anyhow::Result<Option<String>>> + Send;

    /// Creates or replaces the value stored under `key`.
    ///
    /// Fails with [`StorageQuotaExceeded`] if the value does not fit.
    fn set(&self, key: &str, value: &str) -> impl Future<Output = anyhow::Result<()>> + Send;

    /// Removes the value stored under `key`.
    ///
    /// Does nothing if the key does not exist.
    fn remove(&self, key: &str) -> impl Future<Output = anyhow::Result<()>> + Send;

    /// Waits for an exclusive lock on `key`, shared with every other handle on
    /// the same storage, including handles in other processes.
    ///
    /// The lock is released when the returned guard is dropped.
    fn lock(&self, key: &str) -> impl Future<Output = anyhow::Result<StorageLock>> + Send;
}

/// Guard returned by [`StorageService::lock`].
#[must_use = "the lock is released when the guard is dropped"]
pub struct StorageLock(Option<Box<dyn Any + Send + Sync>>);

impl StorageLock {
    pub fn new(guard: impl Any + Send + Sync) -> Self {
        Self(Some(Box::new(guard)))
    }

    /// A guard that holds nothing.
    pub fn unlocked() -> Self {
        Self(None)
    }
}

impl fmt::Debug for StorageLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StorageLock")
            .field(&self.0.is_some())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Storage quota exceeded: {size} bytes do not fit into {quota} bytes.")]
pub struct StorageQuotaExceeded {
    pub size: usize,
    pub quota: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid storage key {0:?}.")]
pub struct InvalidStorageKey(pub String);

/// Keys may only contain ASCII letters, digits, `_`, `-` and `.`, and must not
/// start with a dot.
pub fn validate_key(key: &str) -> Result<(), InvalidStorageKey> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'.'));
    valid
        .then_some(())
        .ok_or_else(|| InvalidStorageKey(key.into()))
}

#[cfg(feature = "mock")]
impl MockStorageService {
    pub fn with_get(mut self, key: String, result: Option<String>) -> Self {
        self.expect_get()
            .once()
            .with(mockall::predicate::eq(key))
            .return_once(|_| Box::pin(std::future::ready(Ok(result))));
        self
    }

    pub fn with_get_error(mut self, key: String) -> Self {
        self.expect_get()
            .once()
            .with(mockall::predicate::eq(key))
            .return_once(|_| {
                Box::pin(std::future::ready(Err(anyhow::anyhow!(
                    "storage is not available"
                ))))
            });
        self
    }

    pub fn with_set(mut self, key: String, value: String) -> Self {
        self.expect_set()
            .once()
            .with(mockall::predicate::eq(key), mockall::predicate::eq(value))
            .return_once(|_, _| Box::pin(std::future::ready(Ok(()))));
        self
    }

    pub fn with_set_quota_exceeded(mut self, key: String, quota: usize) -> Self {
        self.expect_set()
            .once()
            .with(mockall::predicate::eq(key), mockall::predicate::always())
            .return_once(move |_, value| {
                let err = StorageQuotaExceeded {
                    size: value.len(),
                    quota,
                };
                Box::pin(std::future::ready(Err(err.into())))
            });
        self
    }

    pub fn with_lock(mut self, key: String) -> Self {
        self.expect_lock()
            .once()
            .with(mockall::predicate::eq(key))
            .return_once(|_| Box::pin(std::future::ready(Ok(StorageLock::unlocked()))));
        self
    }

    pub fn with_remove(mut self, key: String) -> Self {
        self.expect_remove()
            .once()
            .with(mockall::predicate::eq(key))
            .return_once(|_| Box::pin(std::future::ready(Ok(()))));
        self
    }
}
