use std::{
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use folio_core_contact_contracts::surface::StatusSurface;
use folio_models::status::StatusMessage;

/// Wraps a [`StatusSurface`] and hides terminal statuses after a delay.
///
/// Every status shown bumps a generation counter, so a pending hide never
/// removes a status that was shown after the one it was scheduled for.
#[derive(Debug)]
pub(crate) struct StatusLine<S> {
    surface: S,
    generation: Mutex<u64>,
}

impl<S: StatusSurface> StatusLine<S> {
    pub(crate) fn new(surface: S) -> Self {
        Self {
            surface,
            generation: Mutex::new(0),
        }
    }

    pub(crate) fn show(
        self: &Arc<Self>,
        status: StatusMessage,
        clear_after: Duration,
    ) -> StatusMessage {
        let generation = {
            let mut generation = self
                .generation
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            *generation += 1;
            self.surface.show(&status);
            *generation
        };

        if status.kind.is_terminal() {
            let this = Arc::clone(self);
            tokio::spawn(async move {
                tokio::time::sleep(clear_after).await;
                this.hide_if_current(generation);
            });
        }

        status
    }

    fn hide_if_current(&self, generation: u64) {
        let current = self
            .generation
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if *current == generation {
            self.surface.hide();
        }
    }
}
