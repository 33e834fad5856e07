use std::{
    io,
    sync::{Arc, Mutex},
};

use folio_core_contact_contracts::{
    message_log::MockMessageLogService, surface::MockContactForm, ContactService,
    SubmissionAttempt, SubmissionOutcome,
};
use folio_demo::{
    contact::{ANA, ANA_MESSAGE, BAD_EMAIL, RECIPIENT},
    NOW, NOW_MILLIS, SERVICE_ID, TEMPLATE_ID,
};
use folio_models::{
    contact::{ContactFormInput, ContactValidationError},
    status::StatusMessage,
};
use folio_relay_contracts::{MockRelayService, RelayDeliveryError, RelayMessage};
use folio_shared_contracts::{id::MockIdService, time::MockTimeService};
use pretty_assertions::assert_eq;
use tracing_subscriber::util::SubscriberInitExt;

use super::{ana_record, config, RecordingStatus, StatusEvent, Sut};
use crate::{DELIVERED, DELIVERY_FAILED, SAVED, SENDING, VALIDATION_FAILED};

fn relay_ok() -> MockRelayService {
    MockRelayService::new().with_send(
        SERVICE_ID.into(),
        TEMPLATE_ID.into(),
        RelayMessage::new(&ANA_MESSAGE, None),
        Ok(()),
    )
}

fn relay_rejected() -> MockRelayService {
    MockRelayService::new().with_send(
        SERVICE_ID.into(),
        TEMPLATE_ID.into(),
        RelayMessage::new(&ANA_MESSAGE, None),
        Err(RelayDeliveryError::Rejected {
            status: 400,
            body: "The service ID is invalid".into(),
        }),
    )
}

fn clock() -> (MockIdService, MockTimeService) {
    (
        MockIdService::new().with_generate_message_id(*NOW, NOW_MILLIS.into()),
        MockTimeService::new().with_now(*NOW),
    )
}

#[tokio::test]
async fn ok() {
    // Arrange
    let (id, time) = clock();
    let message_log = MockMessageLogService::new().with_append(ana_record());
    let form = MockContactForm::new().with_submission(true);
    let status = RecordingStatus::default();

    let sut = Sut::new(
        Some(relay_ok()),
        message_log,
        id,
        time,
        status.clone(),
        form,
        config(),
    );

    // Act
    let result = sut.submit(ANA.clone()).await;

    // Assert
    assert_eq!(
        result,
        SubmissionAttempt {
            outcome: SubmissionOutcome::Success,
            status: Some(StatusMessage::success(DELIVERED)),
        }
    );
    assert_eq!(
        status.events(),
        [
            StatusEvent::Show(StatusMessage::sending(SENDING)),
            StatusEvent::Show(StatusMessage::success(DELIVERED)),
        ]
    );
}

#[tokio::test]
async fn ok_with_recipient() {
    // Arrange
    let (id, time) = clock();
    let relay = MockRelayService::new().with_send(
        SERVICE_ID.into(),
        TEMPLATE_ID.into(),
        RelayMessage::new(&ANA_MESSAGE, Some(&RECIPIENT)),
        Ok(()),
    );
    let mut record = ana_record();
    record.to_email = Some(RECIPIENT.clone());
    let message_log = MockMessageLogService::new().with_append(record);
    let form = MockContactForm::new().with_submission(true);

    let mut config = config();
    config.recipient = Some(RECIPIENT.clone());

    let sut = Sut::new(
        Some(relay),
        message_log,
        id,
        time,
        RecordingStatus::default(),
        form,
        config,
    );

    // Act
    let result = sut.submit(ANA.clone()).await;

    // Assert
    assert_eq!(result.outcome, SubmissionOutcome::Success);
}

#[tokio::test]
async fn invalid_email() {
    // Arrange
    let status = RecordingStatus::default();

    let sut = Sut::new(
        Some(MockRelayService::new()),
        MockMessageLogService::new(),
        MockIdService::new(),
        MockTimeService::new(),
        status.clone(),
        MockContactForm::new(),
        config(),
    );

    // Act
    let result = sut.submit(BAD_EMAIL.clone()).await;

    // Assert
    assert_eq!(
        result,
        SubmissionAttempt {
            outcome: SubmissionOutcome::ValidationFailed(ContactValidationError::Email),
            status: Some(StatusMessage::error(VALIDATION_FAILED)),
        }
    );
    assert_eq!(
        status.events(),
        [StatusEvent::Show(StatusMessage::error(VALIDATION_FAILED))]
    );
}

#[tokio::test]
async fn blank_fields() {
    for (field, expected) in [
        (ContactFormInput::FROM_NAME, ContactValidationError::Name),
        (ContactFormInput::FROM_EMAIL, ContactValidationError::Email),
        (ContactFormInput::SUBJECT, ContactValidationError::Subject),
        (ContactFormInput::MESSAGE, ContactValidationError::Content),
    ] {
        // Arrange
        let mut input = ANA.clone();
        input.set(field, "  \t ");

        let sut = Sut::new(
            Some(MockRelayService::new()),
            MockMessageLogService::new(),
            MockIdService::new(),
            MockTimeService::new(),
            RecordingStatus::default(),
            MockContactForm::new(),
            config(),
        );

        // Act
        let result = sut.submit(input).await;

        // Assert
        assert_eq!(
            result.outcome,
            SubmissionOutcome::ValidationFailed(expected),
            "{field}"
        );
    }
}

#[tokio::test]
async fn delivery_failed() {
    // Arrange
    let (id, time) = clock();
    let message_log = MockMessageLogService::new().with_append(ana_record());
    let form = MockContactForm::new().with_submission(false);
    let status = RecordingStatus::default();

    let sut = Sut::new(
        Some(relay_rejected()),
        message_log,
        id,
        time,
        status.clone(),
        form,
        config(),
    );

    // Act
    let result = sut.submit(ANA.clone()).await;

    // Assert
    assert_eq!(
        result,
        SubmissionAttempt {
            outcome: SubmissionOutcome::DeliveryFailed,
            status: Some(StatusMessage::error(DELIVERY_FAILED)),
        }
    );
    assert_eq!(
        status.events(),
        [
            StatusEvent::Show(StatusMessage::sending(SENDING)),
            StatusEvent::Show(StatusMessage::error(DELIVERY_FAILED)),
        ]
    );
}

#[tokio::test]
async fn delivery_and_backup_failed() {
    // Arrange
    let (id, time) = clock();
    let message_log = MockMessageLogService::new().with_append_error(ana_record());
    let form = MockContactForm::new().with_submission(false);

    let sut = Sut::new(
        Some(relay_rejected()),
        message_log,
        id,
        time,
        RecordingStatus::default(),
        form,
        config(),
    );

    // Act
    let result = sut.submit(ANA.clone()).await;

    // Assert
    assert_eq!(result.outcome, SubmissionOutcome::DeliveryFailed);
}

#[tokio::test]
async fn backup_failure_is_not_reported() {
    // Arrange
    let (id, time) = clock();
    let message_log = MockMessageLogService::new().with_append_error(ana_record());
    let form = MockContactForm::new().with_submission(true);

    let sut = Sut::new(
        Some(relay_ok()),
        message_log,
        id,
        time,
        RecordingStatus::default(),
        form,
        config(),
    );

    // Act
    let result = sut.submit(ANA.clone()).await;

    // Assert
    assert_eq!(
        result,
        SubmissionAttempt {
            outcome: SubmissionOutcome::Success,
            status: Some(StatusMessage::success(DELIVERED)),
        }
    );
}

#[tokio::test]
async fn backup_failure_is_logged() {
    // Arrange
    let logs = LogBuffer::default();
    let _subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_writer({
            let logs = logs.clone();
            move || logs.clone()
        })
        .finish()
        .set_default();

    let (id, time) = clock();
    let message_log = MockMessageLogService::new().with_append_error(ana_record());
    let form = MockContactForm::new().with_submission(true);

    let sut = Sut::new(
        Some(relay_ok()),
        message_log,
        id,
        time,
        RecordingStatus::default(),
        form,
        config(),
    );

    // Act
    sut.submit(ANA.clone()).await;

    // Assert
    let warning = logs
        .lines()
        .into_iter()
        .find(|line| line.contains("event=\"contact_backup_failed\""))
        .unwrap();
    assert!(warning.contains("WARN"), "{warning}");
    assert!(
        warning.contains(&format!("message_id={NOW_MILLIS}")),
        "{warning}"
    );
    assert!(warning.contains("storage is not available"), "{warning}");
}

#[tokio::test]
async fn local_only() {
    // Arrange
    let (id, time) = clock();
    let message_log = MockMessageLogService::new().with_append(ana_record());
    let form = MockContactForm::new().with_submission(true);
    let status = RecordingStatus::default();

    let sut = Sut::new(
        None,
        message_log,
        id,
        time,
        status.clone(),
        form,
        config(),
    );

    // Act
    let result = sut.submit(ANA.clone()).await;

    // Assert
    assert_eq!(
        result,
        SubmissionAttempt {
            outcome: SubmissionOutcome::Success,
            status: Some(StatusMessage::success(SAVED)),
        }
    );
    assert_eq!(
        status.events(),
        [
            StatusEvent::Show(StatusMessage::sending(SENDING)),
            StatusEvent::Show(StatusMessage::success(SAVED)),
        ]
    );
}

#[tokio::test]
async fn busy_while_in_flight() {
    // Arrange
    let (started_tx, started_rx) = tokio::sync::oneshot::channel::<()>();
    let (release_tx, release_rx) = tokio::sync::oneshot::channel::<()>();

    let mut relay = MockRelayService::new();
    relay.expect_send().once().return_once(move |_, _, _| {
        let _ = started_tx.send(());
        Box::pin(async move {
            let _ = release_rx.await;
            Ok::<_, RelayDeliveryError>(())
        })
    });

    let (id, time) = clock();
    let message_log = MockMessageLogService::new().with_append(ana_record());
    let form = MockContactForm::new().with_submission(true);
    let status = RecordingStatus::default();

    let sut = Arc::new(Sut::new(
        Some(relay),
        message_log,
        id,
        time,
        status.clone(),
        form,
        config(),
    ));

    let first = tokio::spawn({
        let sut = Arc::clone(&sut);
        async move { sut.submit(ANA.clone()).await }
    });
    started_rx.await.unwrap();

    // Act
    let second = sut.submit(ANA.clone()).await;

    // Assert
    assert_eq!(
        second,
        SubmissionAttempt {
            outcome: SubmissionOutcome::Busy,
            status: None,
        }
    );
    assert_eq!(
        status.events(),
        [StatusEvent::Show(StatusMessage::sending(SENDING))]
    );

    release_tx.send(()).unwrap();
    assert_eq!(first.await.unwrap().outcome, SubmissionOutcome::Success);
}

#[tokio::test]
async fn accepts_next_submission_after_completion() {
    // Arrange
    let sut = Sut::new(
        Some(MockRelayService::new()),
        MockMessageLogService::new(),
        MockIdService::new(),
        MockTimeService::new(),
        RecordingStatus::default(),
        MockContactForm::new(),
        config(),
    );

    // Act
    let first = sut.submit(BAD_EMAIL.clone()).await;
    let second = sut.submit(BAD_EMAIL.clone()).await;

    // Assert
    assert_eq!(first, second);
    assert_eq!(
        second.outcome,
        SubmissionOutcome::ValidationFailed(ContactValidationError::Email)
    );
}

/// Collects formatted log output.
#[derive(Debug, Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.0.lock().unwrap())
            .lines()
            .map(Into::into)
            .collect()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
