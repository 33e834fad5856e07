use folio_models::status::StatusMessage;

/// The visible status line next to the contact form.
pub trait StatusSurface: Send + Sync + 'static {
    /// Replaces the current status.
    fn show(&self, status: &StatusMessage);

    /// Hides the current status.
    fn hide(&self);
}

/// The contact form's input fields and submit control.
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ContactForm: Send + Sync + 'static {
    /// Disables the submit control and shows a busy indicator, or undoes that.
    fn set_busy(&self, busy: bool);

    /// Clears all input fields.
    fn reset(&self);
}

#[cfg(feature = "mock")]
impl MockContactForm {
    /// Expects one busy cycle of a submission that passed validation, followed
    /// by a reset if `reset` is set.
    pub fn with_submission(mut self, reset: bool) -> Self {
        let mut seq = mockall::Sequence::new();
        self.expect_set_busy()
            .once()
            .with(mockall::predicate::eq(true))
            .in_sequence(&mut seq)
            .return_const(());
        self.expect_set_busy()
            .once()
            .with(mockall::predicate::eq(false))
            .in_sequence(&mut seq)
            .return_const(());
        self.expect_reset().times(usize::from(reset)).return_const(());
        self
    }
}
