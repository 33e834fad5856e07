use std::future::Future;

use folio_models::contact::ContactMessageRecord;

/// Bounded, append-only log of submitted messages. Once the capacity is
/// reached, every append evicts the oldest record.
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait MessageLogService: Send + Sync + 'static {
    fn append(
        &self,
        record: ContactMessageRecord,
    ) -> impl Future<Output = anyhow::Result<()>> + Send;

    /// Returns all records, oldest first.
    fn list(&self) -> impl Future<Output = anyhow::Result<Vec<ContactMessageRecord>>> + Send;

    /// Removes all records.
    fn clear(&self) -> impl Future<Output = anyhow::Result<()>> + Send;
}

#[cfg(feature = "mock")]
impl MockMessageLogService {
    pub fn with_append(mut self, record: ContactMessageRecord) -> Self {
        self.expect_append()
            .once()
            .with(mockall::predicate::eq(record))
            .return_once(|_| Box::pin(std::future::ready(Ok(()))));
        self
    }

    pub fn with_append_error(mut self, record: ContactMessageRecord) -> Self {
        self.expect_append()
            .once()
            .with(mockall::predicate::eq(record))
            .return_once(|_| {
                Box::pin(std::future::ready(Err(anyhow::anyhow!(
                    "storage is not available"
                ))))
            });
        self
    }
}
