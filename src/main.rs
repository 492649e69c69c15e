//! Qabot - FAQ answering and text summarization CLI
//!
#![doc = "Main entry point for the Qabot application."]

use anyhow::Result;
use dotenv::dotenv;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use qabot::cli::{Cli, Commands};
use qabot::commands;
use qabot::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Credentials may live in a .env file next to the working directory
    dotenv().ok();

    let cli = Cli::parse_args();
    init_tracing(cli.verbose);

    let config = Config::load(&cli.config, &cli)?;

    let command = cli.command.unwrap_or(Commands::Chat);

    // Listing history needs no credential
    let validation = match command {
        Commands::History { .. } => config.validate_settings(),
        _ => config.validate(),
    };
    if let Err(e) = validation {
        commands::print_credential_help(&config, &e);
        std::process::exit(1);
    }

    match command {
        Commands::Chat => {
            commands::chat::run_chat(config).await?;
        }
        Commands::Ask { question } => {
            tracing::info!("Running one-shot question");
            commands::oneshot::run_ask(config, &question).await?;
        }
        Commands::Summarize { file, text } => {
            tracing::info!("Running one-shot summary");
            commands::oneshot::run_summarize(config, file.as_deref(), text).await?;
        }
        Commands::History { command } => {
            commands::history::handle_history(&config, command)?;
        }
    }

    Ok(())
}

/// Initialize tracing/logging
///
/// Logs go to stderr so they never mix with replies on stdout.
fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "qabot=debug" } else { "qabot=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
