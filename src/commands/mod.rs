/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint:

- `chat`: Interactive numbered menu
- `oneshot`: Single `ask` / `summarize` exchanges
- `history`: Listing the conversation log

The handlers own all terminal output; the library pieces they drive
(`session`, `dispatcher`, `storage`) do none.
*/

use crate::config::{credential_env_hint, Config};
use crate::dispatcher::Dispatcher;
use crate::error::{as_qabot_error, Result, QabotError};
use crate::providers::create_provider;
use crate::session::{Session, TurnOutcome};
use crate::storage::HistoryStore;
use colored::Colorize;

pub mod chat;
pub mod history;
pub mod oneshot;

/// Build the session for a validated configuration
///
/// # Errors
///
/// Returns error if the provider cannot be created or the history
/// directory cannot be prepared
pub fn build_session(config: &Config) -> Result<Session> {
    let provider = create_provider(config)?;
    let dispatcher = Dispatcher::new(provider, config.generation_params());
    let store = HistoryStore::new_with_path(&config.history.file)?;
    Ok(Session::new(dispatcher, store))
}

/// Message shown to the user for a failed turn
///
/// # Examples
///
/// ```
/// use qabot::commands::describe_turn_error;
/// use qabot::error::QabotError;
///
/// let err: anyhow::Error = QabotError::InvalidInput("Question cannot be empty".into()).into();
/// assert_eq!(describe_turn_error(&err), "Question cannot be empty!");
/// ```
pub fn describe_turn_error(err: &anyhow::Error) -> String {
    match as_qabot_error(err) {
        Some(QabotError::InvalidInput(message)) => format!("{}!", message),
        Some(QabotError::RateLimited(_)) => format!(
            "The provider reported a rate limit or quota problem. Try again later.\n{:#}",
            err
        ),
        Some(e) if e.is_api() => format!("Failed to get a response: {:#}", err),
        _ => format!("{:#}", err),
    }
}

/// Print the instructions for supplying a credential
pub fn print_credential_help(config: &Config, err: &anyhow::Error) {
    eprintln!("\n{} {:#}", "✗".red(), err);

    if as_qabot_error(err).map(|e| matches!(e, QabotError::MissingCredentials(_))) == Some(true)
    {
        let var = credential_env_hint(&config.provider.provider_type);
        eprintln!("\nTo set your API key:");
        eprintln!("  Windows:   set {}=your_api_key_here", var);
        eprintln!("  Mac/Linux: export {}=your_api_key_here", var);
        eprintln!("\nOr add it to a .env file in the working directory.");
    }
}

/// Print warnings about the history side of a completed turn
pub(crate) fn report_history(outcome: &TurnOutcome) {
    match &outcome.history {
        Ok(append) => {
            if let Some(moved) = &append.quarantined {
                eprintln!(
                    "{}",
                    format!(
                        "Warning: the history file was unreadable and has been moved to {}; a new log was started.",
                        moved.display()
                    )
                    .yellow()
                );
            }
        }
        Err(e) => {
            eprintln!(
                "{}",
                format!("Warning: could not save this exchange to history: {:#}", e).yellow()
            );
        }
    }
}
