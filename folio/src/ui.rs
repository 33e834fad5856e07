use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex, PoisonError,
};

use folio_core_contact_contracts::surface::{ContactForm, StatusSurface};
use folio_models::{contact::ContactFormInput, status::StatusMessage};
use tracing::debug;

/// Prints every status to stdout and remembers the visible one.
#[derive(Debug, Clone, Default)]
pub struct TerminalStatus {
    current: Arc<Mutex<Option<StatusMessage>>>,
}

impl TerminalStatus {
    pub fn current(&self) -> Option<StatusMessage> {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl StatusSurface for TerminalStatus {
    fn show(&self, status: &StatusMessage) {
        println!("[{}] {}", status.kind, status.text);
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = Some(status.clone());
    }

    fn hide(&self) {
        debug!("Status hidden");
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

/// Form fields filled from command line arguments.
#[derive(Debug, Clone, Default)]
pub struct TerminalForm {
    input: Arc<Mutex<ContactFormInput>>,
    busy: Arc<AtomicBool>,
}

impl TerminalForm {
    pub fn new(input: ContactFormInput) -> Self {
        Self {
            input: Arc::new(Mutex::new(input)),
            busy: Default::default(),
        }
    }

    /// The current field values.
    pub fn input(&self) -> ContactFormInput {
        self.input
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

impl ContactForm for TerminalForm {
    fn set_busy(&self, busy: bool) {
        debug!(busy, "Form busy state changed");
        self.busy.store(busy, Ordering::Release);
    }

    fn reset(&self) {
        *self.input.lock().unwrap_or_else(PoisonError::into_inner) = ContactFormInput::default();
    }
}
