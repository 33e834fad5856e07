use std::sync::{
    atomic::{AtomicI64, Ordering},
    Arc,
};

use chrono::{DateTime, Utc};
use folio_models::contact::ContactMessageId;
use folio_shared_contracts::id::IdService;

#[derive(Debug, Clone, Default)]
pub struct IdServiceImpl {
    last: Arc<AtomicI64>,
}

impl IdService for IdServiceImpl {
    #[tracing::instrument(skip(self), ret(level = "trace"))]
    fn generate_message_id(&self, now: DateTime<Utc>) -> ContactMessageId {
        let millis = now.timestamp_millis();
        let previous = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(millis.max(last.saturating_add(1)))
            })
            .unwrap_or_else(|last| last);
        millis.max(previous.saturating_add(1)).into()
    }
}
