use anyhow::Context;
use clap::Subcommand;
use folio_config::Config;
use folio_models::contact::ContactEmailAddress;
use folio_relay_contracts::{RelayMessage, RelayService};
use tracing::info;

use crate::relay;

#[derive(Debug, Subcommand)]
pub enum RelayCommand {
    /// Test relay deliverability
    Test { recipient: String },
}

impl RelayCommand {
    pub async fn invoke(self, config: Config) -> anyhow::Result<()> {
        match self {
            RelayCommand::Test { recipient } => test(config, recipient).await,
        }
    }
}

async fn test(config: Config, recipient: String) -> anyhow::Result<()> {
    let recipient =
        ContactEmailAddress::try_new(recipient).context("Invalid recipient email address")?;
    let relay = relay::connect(&config.relay)?.context("The relay is disabled")?;

    let message = RelayMessage {
        from_name: "folio".into(),
        from_email: recipient.to_string(),
        subject: "Relay Deliverability Test".into(),
        message: "Relay deliverability seems to be working!".into(),
        to_email: Some(recipient.to_string()),
    };
    relay
        .send(&config.relay.service_id, &config.relay.template_id, &message)
        .await?;

    info!(%recipient, "Test message accepted by the relay");
    Ok(())
}
