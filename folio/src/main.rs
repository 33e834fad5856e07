use std::path::PathBuf;

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use folio::commands::{messages::MessagesCommand, relay::RelayCommand, submit::SubmitCommand};
use folio_config::DEFAULT_CONFIG_PATH;
use folio_utils::folio_version;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Command::Completion { shell } = cli.command {
        clap_complete::generate(
            shell,
            &mut Cli::command(),
            env!("CARGO_BIN_NAME"),
            &mut std::io::stdout(),
        );
        return Ok(());
    }

    init_tracing();

    let paths = std::iter::once(PathBuf::from(DEFAULT_CONFIG_PATH))
        .chain(cli.config)
        .collect::<Vec<_>>();
    let config = folio_config::load(&paths).context("Failed to load config")?;

    match cli.command {
        Command::Submit(command) => command.invoke(config).await?,
        Command::Messages { command } => command.invoke(config).await?,
        Command::Relay { command } => command.invoke(config).await?,
        Command::CheckConfig { verbose } => {
            verbose.then(|| println!("{config:#?}"));
        }
        Command::Completion { .. } => unreachable!(),
    }

    Ok(())
}

#[derive(Debug, Parser)]
#[command(version = folio_version())]
struct Cli {
    /// Additional config files, applied on top of the bundled defaults
    #[arg(short, long, env = "FOLIO_CONFIG", value_delimiter = ',')]
    config: Vec<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Submit a contact message
    #[command(aliases(["send", "s"]))]
    Submit(SubmitCommand),
    /// Inspect the local message backup
    #[command(aliases(["msg", "m"]))]
    Messages {
        #[command(subcommand)]
        command: MessagesCommand,
    },
    /// Test the message relay
    #[command(aliases(["r"]))]
    Relay {
        #[command(subcommand)]
        command: RelayCommand,
    },
    /// Validate configuration
    CheckConfig {
        /// Print a debug representation of the config
        #[arg(short, long)]
        verbose: bool,
    },
    /// Generate shell completions
    Completion {
        /// The shell to generate completions for
        #[clap(value_enum)]
        shell: Shell,
    },
}

fn init_tracing() {
    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    #[cfg(tracing_pretty)]
    let fmt_layer = fmt_layer.pretty();

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(EnvFilter::from_default_env()))
        .init();
}
