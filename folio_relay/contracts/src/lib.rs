use std::future::Future;

use folio_models::contact::{ContactEmailAddress, ContactMessage};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Third-party message relay that forwards contact messages by email.
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait RelayService: Send + Sync + 'static {
    /// Makes a single delivery attempt. Callers must treat any error as final
    /// for this attempt.
    fn send(
        &self,
        service_id: &str,
        template_id: &str,
        message: &RelayMessage,
    ) -> impl Future<Output = Result<(), RelayDeliveryError>> + Send;
}

/// Template parameters of a relayed message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayMessage {
    pub from_name: String,
    pub from_email: String,
    pub subject: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_email: Option<String>,
}

impl RelayMessage {
    pub fn new(message: &ContactMessage, to_email: Option<&ContactEmailAddress>) -> Self {
        Self {
            from_name: message.author.name.to_string(),
            from_email: message.author.email.to_string(),
            subject: message.subject.to_string(),
            message: message.content.to_string(),
            to_email: to_email.map(ToString::to_string),
        }
    }
}

#[derive(Debug, Error)]
pub enum RelayDeliveryError {
    #[error("The relay rejected the message with status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(feature = "mock")]
impl MockRelayService {
    pub fn with_send(
        mut self,
        service_id: String,
        template_id: String,
        message: RelayMessage,
        result: Result<(), RelayDeliveryError>,
    ) -> Self {
        self.expect_send()
            .once()
            .with(
                mockall::predicate::eq(service_id),
                mockall::predicate::eq(template_id),
                mockall::predicate::eq(message),
            )
            .return_once(|_, _, _| Box::pin(std::future::ready(result)));
        self
    }

    /// Accepts any number of messages.
    pub fn with_send_any(mut self) -> Self {
        self.expect_send()
            .returning(|_, _, _| Box::pin(std::future::ready(Ok(()))));
        self
    }
}
