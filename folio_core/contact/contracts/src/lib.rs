use std::future::Future;

use folio_models::{
    contact::{ContactFormInput, ContactValidationError},
    status::StatusMessage,
};

pub mod message_log;
pub mod surface;

pub trait ContactService: Send + Sync + 'static {
    /// Validates the form input, tries to deliver the message through the
    /// relay, keeps a local backup and reports the result on the status
    /// surface.
    ///
    /// Only one submission runs at a time; a submission started while
    /// another one is in flight returns [`SubmissionOutcome::Busy`] without
    /// side effects.
    fn submit(&self, input: ContactFormInput) -> impl Future<Output = SubmissionAttempt> + Send;
}

/// Result of a single submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionAttempt {
    pub outcome: SubmissionOutcome,
    /// The last status shown to the user, `None` if the submission was rejected
    /// as busy.
    pub status: Option<StatusMessage>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// Delivered by the relay, or saved locally if the relay is disabled.
    Success,
    /// The relay failed. The form is left intact so the user can retry.
    DeliveryFailed,
    ValidationFailed(ContactValidationError),
    /// Another submission is still in flight.
    Busy,
}

impl SubmissionOutcome {
    pub fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}
