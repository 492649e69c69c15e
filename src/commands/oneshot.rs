//! One-shot `ask` and `summarize` commands.

use super::{build_session, report_history};
use crate::config::Config;
use crate::error::{Result, QabotError};
use crate::mode::Mode;
use anyhow::Context;
use std::io::Read;
use std::path::Path;

/// Answer a single question and print the reply
///
/// # Errors
///
/// Returns error if the question is blank or the provider call fails;
/// nothing is logged in either case
pub async fn run_ask(config: Config, question: &[String]) -> Result<()> {
    let question = question.join(" ");
    run_once(&config, Mode::Faq, &question).await
}

/// Summarize text from an argument, a file, or stdin
///
/// # Errors
///
/// Returns error if the input cannot be read, is blank, or the provider
/// call fails
pub async fn run_summarize(
    config: Config,
    file: Option<&Path>,
    text: Option<String>,
) -> Result<()> {
    let text = match (file, text) {
        (Some(path), _) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        (None, Some(text)) => text,
        (None, None) => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read text from stdin")?;
            buf
        }
    };

    run_once(&config, Mode::Summary, &text).await
}

async fn run_once(config: &Config, mode: Mode, text: &str) -> Result<()> {
    // Reject blank input before any provider or history setup.
    if text.trim().is_empty() {
        let what = match mode {
            Mode::Faq => "Question",
            Mode::Summary => "Text",
        };
        return Err(QabotError::InvalidInput(format!("{} cannot be empty", what)).into());
    }

    let session = build_session(config)?;
    let outcome = session.handle_turn(mode, text).await?;

    println!("{}", outcome.record.output);
    report_history(&outcome);

    Ok(())
}
