use anyhow::bail;
use clap::Args;
use folio_config::Config;
use folio_core_contact_contracts::{ContactService, SubmissionOutcome};
use folio_models::contact::ContactFormInput;
use folio_storage_contracts::StorageService;
use tracing::info;

use crate::{environment, storage, ui::TerminalForm};

#[derive(Debug, Args)]
pub struct SubmitCommand {
    /// The sender's name
    #[arg(long)]
    name: String,
    /// The sender's email address
    #[arg(long)]
    email: String,
    /// The subject line
    #[arg(long)]
    subject: String,
    /// The message body
    #[arg(long)]
    message: String,
    /// Keep the local backup in memory instead of the storage directory
    #[arg(long)]
    dry_run: bool,
}

impl SubmitCommand {
    pub async fn invoke(self, config: Config) -> anyhow::Result<()> {
        let input = ContactFormInput::new(self.name, self.email, self.subject, self.message);

        if self.dry_run {
            info!("Dry run, the local backup is discarded on exit");
            submit(&config, storage::ephemeral(&config.storage), input).await
        } else {
            let storage = storage::connect(&config.storage).await?;
            submit(&config, storage, input).await
        }
    }
}

async fn submit(
    config: &Config,
    storage: impl StorageService,
    input: ContactFormInput,
) -> anyhow::Result<()> {
    let form = TerminalForm::new(input);
    let contact = environment::contact(config, storage, form.clone())?;

    let attempt = contact.submit(form.input()).await;

    match attempt.outcome {
        SubmissionOutcome::Success => Ok(()),
        SubmissionOutcome::DeliveryFailed => bail!("The relay did not accept the message"),
        SubmissionOutcome::ValidationFailed(err) => bail!("Invalid input: {err}"),
        SubmissionOutcome::Busy => bail!("Another submission is still in flight"),
    }
}
