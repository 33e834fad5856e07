use folio_core_contact_contracts::{
    message_log::MessageLogService, surface::MockContactForm, ContactService, SubmissionOutcome,
};
use folio_demo::contact::{numbered, ANA};
use folio_models::contact::ContactFormInput;
use folio_relay_contracts::{MockRelayService, RelayDeliveryError};
use folio_shared_impl::{id::IdServiceImpl, time::TimeServiceImpl};
use folio_storage_impl::MemoryStorageService;
use folio_utils::assert_matches;
use pretty_assertions::assert_eq;

use super::{any_form, config, RecordingStatus};
use crate::{
    message_log::{MessageLogServiceConfig, MessageLogServiceImpl},
    ContactServiceImpl,
};

type Log = MessageLogServiceImpl<MemoryStorageService>;

type Sut = ContactServiceImpl<
    MockRelayService,
    Log,
    IdServiceImpl,
    TimeServiceImpl,
    RecordingStatus,
    MockContactForm,
>;

fn setup(relay: MockRelayService) -> (Sut, Log) {
    let log = MessageLogServiceImpl::new(
        MemoryStorageService::default(),
        MessageLogServiceConfig {
            key: "portfolio_messages".into(),
            capacity: 50,
        },
    );
    let sut = Sut::new(
        Some(relay),
        log.clone(),
        IdServiceImpl::default(),
        TimeServiceImpl,
        RecordingStatus::default(),
        any_form(),
        config(),
    );
    (sut, log)
}

fn failing_relay() -> MockRelayService {
    let mut relay = MockRelayService::new();
    relay.expect_send().returning(|_, _, _| {
        Box::pin(std::future::ready(Err(RelayDeliveryError::Other(
            anyhow::anyhow!("connection refused"),
        ))))
    });
    relay
}

#[tokio::test]
async fn log_keeps_the_latest_fifty() {
    // Arrange
    let (sut, log) = setup(MockRelayService::new().with_send_any());

    // Act
    for n in 0..51 {
        let result = sut.submit(numbered(n)).await;
        assert_eq!(result.outcome, SubmissionOutcome::Success);
    }

    // Assert
    let records = log.list().await.unwrap();
    assert_eq!(records.len(), 50);
    assert_eq!(records[0].message.author.name.as_str(), "Sender 1");
    assert_eq!(records[49].message.author.name.as_str(), "Sender 50");
    assert!(records
        .iter()
        .all(|r| r.message.author.name.as_str() != "Sender 0"));
    assert!(records.windows(2).all(|w| w[0].id < w[1].id));
}

#[tokio::test]
async fn failed_deliveries_are_kept() {
    // Arrange
    let (sut, log) = setup(failing_relay());

    // Act
    for n in 0..3 {
        let result = sut.submit(numbered(n)).await;
        assert_eq!(result.outcome, SubmissionOutcome::DeliveryFailed);
    }

    // Assert
    assert_eq!(log.list().await.unwrap().len(), 3);
}

#[tokio::test]
async fn rejected_input_leaves_log_untouched() {
    // Arrange
    let (sut, log) = setup(MockRelayService::new().with_send_any());
    sut.submit(ANA.clone()).await;
    let before = log.list().await.unwrap();

    let mut inputs = [
        ContactFormInput::FROM_NAME,
        ContactFormInput::FROM_EMAIL,
        ContactFormInput::SUBJECT,
        ContactFormInput::MESSAGE,
    ]
    .map(|field| {
        let mut input = ANA.clone();
        input.set(field, "");
        input
    })
    .to_vec();
    for email in ["plainaddress", "a@b", "a b@c.d", "@x.com", "ana@x.", " ana@x.com"] {
        let mut input = ANA.clone();
        input.set(ContactFormInput::FROM_EMAIL, email);
        inputs.push(input);
    }
    inputs.push(ContactFormInput::default());

    // Act
    for input in inputs {
        let result = sut.submit(input).await;
        assert_matches!(result.outcome, SubmissionOutcome::ValidationFailed(_));
    }

    // Assert
    assert_eq!(log.list().await.unwrap(), before);
}
