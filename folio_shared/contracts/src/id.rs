use chrono::{DateTime, Utc};
use folio_models::contact::ContactMessageId;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait IdService: Send + Sync + 'static {
    /// Derives a message id from the creation time.
    ///
    /// Ids are strictly increasing, even if the clock stalls or goes backwards.
    fn generate_message_id(&self, now: DateTime<Utc>) -> ContactMessageId;
}

#[cfg(feature = "mock")]
impl MockIdService {
    pub fn with_generate_message_id(mut self, now: DateTime<Utc>, id: ContactMessageId) -> Self {
        self.expect_generate_message_id()
            .once()
            .with(mockall::predicate::eq(now))
            .return_const(id);
        self
    }
}
