use anyhow::Context;
use clap::Subcommand;
use folio_config::Config;
use folio_core_contact_contracts::message_log::MessageLogService;
use folio_models::contact::ContactMessageRecord;
use tracing::info;

use crate::{environment, storage};

#[derive(Debug, Subcommand)]
pub enum MessagesCommand {
    /// List stored messages, oldest first
    #[command(aliases(["ls", "l"]))]
    List {
        /// Print the raw records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete all stored messages
    Clear,
}

impl MessagesCommand {
    pub async fn invoke(self, config: Config) -> anyhow::Result<()> {
        match self {
            MessagesCommand::List { json } => list(&config, json).await,
            MessagesCommand::Clear => clear(&config).await,
        }
    }
}

async fn list(config: &Config, json: bool) -> anyhow::Result<()> {
    let storage = storage::connect(&config.storage).await?;
    let records = environment::message_log(config, storage).list().await?;

    if json {
        let out =
            serde_json::to_string_pretty(&records).context("Failed to serialize messages")?;
        println!("{out}");
        return Ok(());
    }

    if records.is_empty() {
        println!("No stored messages");
    }
    for record in &records {
        println!("{}", format_record(record));
    }

    Ok(())
}

async fn clear(config: &Config) -> anyhow::Result<()> {
    let storage = storage::connect(&config.storage).await?;
    environment::message_log(config, storage).clear().await?;
    info!("Cleared stored messages");
    Ok(())
}

fn format_record(record: &ContactMessageRecord) -> String {
    let message = &record.message;
    let mut out = format!(
        "#{} {} {} <{}>\nSubject: {}\n",
        record.id,
        record.timestamp.to_rfc3339(),
        message.author.name,
        message.author.email,
        message.subject,
    );
    if let Some(to_email) = &record.to_email {
        out.push_str(&format!("To: {}\n", to_email));
    }
    for line in message.content.lines() {
        out.push_str("  ");
        out.push_str(line);
        out.push('\n');
    }
    out
}
