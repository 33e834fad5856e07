use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use folio_core_contact_contracts::{
    message_log::MockMessageLogService,
    surface::{MockContactForm, StatusSurface},
};
use folio_demo::{contact::ANA_MESSAGE, NOW, NOW_MILLIS, SERVICE_ID, TEMPLATE_ID};
use folio_models::{contact::ContactMessageRecord, status::StatusMessage};
use folio_relay_contracts::MockRelayService;
use folio_shared_contracts::{id::MockIdService, time::MockTimeService};

use crate::{ContactServiceConfig, ContactServiceImpl};

mod properties;
mod submit;

type Sut = ContactServiceImpl<
    MockRelayService,
    MockMessageLogService,
    MockIdService,
    MockTimeService,
    RecordingStatus,
    MockContactForm,
>;

const CLEAR_DELAY: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq)]
enum StatusEvent {
    Show(StatusMessage),
    Hide,
}

/// Status surface that remembers everything shown on it.
#[derive(Debug, Clone, Default)]
struct RecordingStatus(Arc<Mutex<Vec<StatusEvent>>>);

impl RecordingStatus {
    fn events(&self) -> Vec<StatusEvent> {
        self.0.lock().unwrap().clone()
    }
}

impl StatusSurface for RecordingStatus {
    fn show(&self, status: &StatusMessage) {
        self.0
            .lock()
            .unwrap()
            .push(StatusEvent::Show(status.clone()));
    }

    fn hide(&self) {
        self.0.lock().unwrap().push(StatusEvent::Hide);
    }
}

fn config() -> ContactServiceConfig {
    ContactServiceConfig {
        service_id: SERVICE_ID.into(),
        template_id: TEMPLATE_ID.into(),
        recipient: None,
        status_clear_delay: CLEAR_DELAY,
    }
}

fn ana_record() -> ContactMessageRecord {
    ContactMessageRecord {
        message: ANA_MESSAGE.clone(),
        to_email: None,
        timestamp: *NOW,
        id: NOW_MILLIS.into(),
    }
}

/// A form that accepts any number of busy toggles and resets.
fn any_form() -> MockContactForm {
    let mut form = MockContactForm::new();
    form.expect_set_busy().return_const(());
    form.expect_reset().return_const(());
    form
}
