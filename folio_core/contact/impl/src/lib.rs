use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use folio_core_contact_contracts::{
    message_log::MessageLogService,
    surface::{ContactForm, StatusSurface},
    ContactService, SubmissionAttempt, SubmissionOutcome,
};
use folio_models::{
    contact::{ContactEmailAddress, ContactFormInput, ContactMessage, ContactMessageRecord},
    status::StatusMessage,
};
use folio_relay_contracts::{RelayMessage, RelayService};
use folio_shared_contracts::{id::IdService, time::TimeService};
use tracing::{debug, info, warn};

use crate::status_line::StatusLine;

pub mod message_log;
mod status_line;

#[cfg(test)]
mod tests;

pub const VALIDATION_FAILED: &str = "Please fill all fields correctly";
pub const SENDING: &str = "Sending your message...";
pub const DELIVERED: &str = "Message sent successfully! I'll get back to you soon.";
pub const SAVED: &str = "Message saved!";
pub const DELIVERY_FAILED: &str = "Failed to send message. Please try again or contact directly.";

#[derive(Debug, Clone)]
pub struct ContactServiceImpl<Relay, MessageLog, Id, Time, Status, Form> {
    /// `None` keeps messages in the local log only.
    relay: Option<Relay>,
    message_log: MessageLog,
    id: Id,
    time: Time,
    status: Arc<StatusLine<Status>>,
    form: Form,
    config: ContactServiceConfig,
    in_flight: Arc<AtomicBool>,
}

#[derive(Debug, Clone)]
pub struct ContactServiceConfig {
    pub service_id: Arc<str>,
    pub template_id: Arc<str>,
    /// Fixed destination address added to every message.
    pub recipient: Option<ContactEmailAddress>,
    pub status_clear_delay: Duration,
}

impl<Relay, MessageLog, Id, Time, Status, Form>
    ContactServiceImpl<Relay, MessageLog, Id, Time, Status, Form>
where
    Status: StatusSurface,
{
    pub fn new(
        relay: Option<Relay>,
        message_log: MessageLog,
        id: Id,
        time: Time,
        status: Status,
        form: Form,
        config: ContactServiceConfig,
    ) -> Self {
        Self {
            relay,
            message_log,
            id,
            time,
            status: Arc::new(StatusLine::new(status)),
            form,
            config,
            in_flight: Default::default(),
        }
    }

    fn show(&self, status: StatusMessage) -> StatusMessage {
        self.status.show(status, self.config.status_clear_delay)
    }
}

impl<Relay, MessageLog, Id, Time, Status, Form> ContactService
    for ContactServiceImpl<Relay, MessageLog, Id, Time, Status, Form>
where
    Relay: RelayService,
    MessageLog: MessageLogService,
    Id: IdService,
    Time: TimeService,
    Status: StatusSurface,
    Form: ContactForm,
{
    #[tracing::instrument(skip_all)]
    async fn submit(&self, input: ContactFormInput) -> SubmissionAttempt {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            debug!("Rejecting submission while another one is in flight");
            return SubmissionAttempt {
                outcome: SubmissionOutcome::Busy,
                status: None,
            };
        };

        let message = match ContactMessage::try_from(&input) {
            Ok(message) => message,
            Err(err) => {
                debug!(%err, "Contact form validation failed");
                let status = self.show(StatusMessage::error(VALIDATION_FAILED));
                return SubmissionAttempt {
                    outcome: SubmissionOutcome::ValidationFailed(err),
                    status: Some(status),
                };
            }
        };

        self.show(StatusMessage::sending(SENDING));
        self.form.set_busy(true);

        let now = self.time.now();
        let record = ContactMessageRecord {
            message,
            to_email: self.config.recipient.clone(),
            timestamp: now,
            id: self.id.generate_message_id(now),
        };
        let message_id = record.id;

        let delivered = match &self.relay {
            Some(relay) => {
                let relay_message = RelayMessage::new(&record.message, record.to_email.as_ref());
                match relay
                    .send(
                        &self.config.service_id,
                        &self.config.template_id,
                        &relay_message,
                    )
                    .await
                {
                    Ok(()) => {
                        info!(%message_id, "Contact message delivered");
                        true
                    }
                    Err(err) => {
                        warn!(%message_id, error = %err, "Failed to deliver contact message");
                        false
                    }
                }
            }
            None => true,
        };

        if let Err(err) = self.message_log.append(record).await {
            warn!(
                event = "contact_backup_failed",
                %message_id,
                error = %format!("{err:#}"),
                "Failed to store contact message locally"
            );
        }

        self.form.set_busy(false);

        let (outcome, status) = if delivered {
            self.form.reset();
            let text = if self.relay.is_some() { DELIVERED } else { SAVED };
            (SubmissionOutcome::Success, StatusMessage::success(text))
        } else {
            (
                SubmissionOutcome::DeliveryFailed,
                StatusMessage::error(DELIVERY_FAILED),
            )
        };

        SubmissionAttempt {
            outcome,
            status: Some(self.show(status)),
        }
    }
}

/// Marks a submission as in flight until dropped.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
