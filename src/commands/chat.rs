//! Interactive menu handler.
//!
//! Drives `session::transition` with input read through rustyline and
//! prints every result; the state machine itself stays I/O free.

use super::{describe_turn_error, history, report_history};
use crate::config::Config;
use crate::error::{QabotError, Result};
use crate::mode::Mode;
use crate::session::{
    transition, LineOutcome, MenuChoice, MultilineInput, Session, SessionEvent, SessionState,
};
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

const RULE_WIDTH: usize = 60;

/// Start the interactive menu
///
/// # Errors
///
/// Returns error if the session cannot be built or the terminal fails;
/// per-turn API and storage errors are printed and the loop continues
pub async fn run_chat(config: Config) -> Result<()> {
    tracing::info!("Starting interactive menu");

    let session = super::build_session(&config)?;
    let mut rl = DefaultEditor::new().map_err(QabotError::Readline)?;

    print_welcome_banner(&config);

    let mut state = SessionState::MainMenu;
    while !state.is_terminal() {
        let event = match state {
            SessionState::MainMenu => {
                print_menu();
                SessionEvent::Selected(read_menu_choice(&mut rl)?)
            }
            SessionState::AwaitingFaqInput | SessionState::AwaitingSummaryInput => {
                let mode = match state.mode() {
                    Some(mode) => mode,
                    None => break,
                };
                let input = match mode {
                    Mode::Faq => {
                        print_section("FAQ MODE - Ask Your Question");
                        read_question(&mut rl)?
                    }
                    Mode::Summary => {
                        print_section("SUMMARIZATION MODE - Enter Text to Summarize");
                        read_multiline(&mut rl)?
                    }
                };
                match input {
                    Some(text) => {
                        run_turn(&session, mode, &text).await;
                        SessionEvent::Completed
                    }
                    None => {
                        println!("{}", "Cancelled.".yellow());
                        SessionEvent::Cancelled
                    }
                }
            }
            SessionState::ViewingHistory => {
                show_history(&session, config.history.preview_chars);
                SessionEvent::Completed
            }
            SessionState::Exiting => break,
        };

        let next = transition(state, event);
        tracing::debug!(from = ?state, to = ?next, "Session transition");
        state = next;
    }

    print_goodbye(&config);
    Ok(())
}

/// Dispatch and display one turn
async fn run_turn(session: &Session, mode: Mode, text: &str) {
    println!("\n{} {}", mode.colored_tag(), mode.progress_message());

    match session.handle_turn(mode, text).await {
        Ok(outcome) => {
            print_response(&outcome.record.output);
            report_history(&outcome);
        }
        Err(e) => {
            tracing::debug!("Turn failed: {:#}", e);
            println!("\n{} {}", "✗".red(), describe_turn_error(&e).red());
        }
    }
}

fn show_history(session: &Session, preview_chars: usize) {
    let records = match session.history() {
        Ok(records) => records,
        Err(e) => {
            println!(
                "{}",
                format!("Warning: {:#}. Showing an empty history.", e).yellow()
            );
            Vec::new()
        }
    };

    print!("{}", history::format_history(&records, preview_chars));
}

/// Read a menu choice, re-prompting until it is valid
///
/// Ctrl-C / Ctrl-D select Exit.
fn read_menu_choice(rl: &mut DefaultEditor) -> Result<MenuChoice> {
    loop {
        match rl.readline("\nEnter your choice (1-4): ") {
            Ok(line) => match MenuChoice::parse(&line) {
                Some(choice) => return Ok(choice),
                None => println!("{}", "Invalid choice. Please enter 1, 2, 3, or 4.".red()),
            },
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                return Ok(MenuChoice::Exit)
            }
            Err(e) => return Err(QabotError::Readline(e).into()),
        }
    }
}

/// Read a single-line question; `None` when the user backs out
fn read_question(rl: &mut DefaultEditor) -> Result<Option<String>> {
    match rl.readline("\nYour question: ") {
        Ok(line) => {
            let _ = rl.add_history_entry(line.as_str());
            Ok(Some(line))
        }
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
        Err(e) => Err(QabotError::Readline(e).into()),
    }
}

/// Read text terminated by a blank line; `None` on CANCEL or Ctrl-C
fn read_multiline(rl: &mut DefaultEditor) -> Result<Option<String>> {
    println!("\nPaste or type the text you want to summarize.");
    println!("(Finish with an empty line, or type 'CANCEL' to go back)\n");

    let mut input = MultilineInput::new();
    loop {
        match rl.readline("") {
            Ok(line) => match input.feed(&line) {
                LineOutcome::Continue => {}
                LineOutcome::Finished(text) => return Ok(Some(text)),
                LineOutcome::Cancelled => return Ok(None),
            },
            Err(ReadlineError::Eof) => return Ok(Some(input.finish())),
            Err(ReadlineError::Interrupted) => return Ok(None),
            Err(e) => return Err(QabotError::Readline(e).into()),
        }
    }
}

fn print_welcome_banner(config: &Config) {
    println!("\n{}", "=".repeat(RULE_WIDTH));
    println!("{}", "  Qabot - FAQ Answering & Text Summarization".bold());
    println!("{}", "=".repeat(RULE_WIDTH));
    println!("\nThis chatbot can help you with:");
    println!("  1. Answering frequently asked questions");
    println!("  2. Summarizing long texts");
    println!(
        "\nProvider: {} ({})",
        config.provider.provider_type.cyan(),
        config.active_model()
    );
    println!(
        "All conversations are saved to '{}'",
        config.history.file.display()
    );
    println!("{}\n", "=".repeat(RULE_WIDTH));
}

fn print_menu() {
    println!("\n{}", "-".repeat(RULE_WIDTH));
    println!("{}", "MAIN MENU".bold());
    println!("{}", "-".repeat(RULE_WIDTH));
    for choice in MenuChoice::ALL {
        println!("{}", choice);
    }
    println!("{}", "-".repeat(RULE_WIDTH));
}

fn print_section(title: &str) {
    println!("\n{}", "=".repeat(RULE_WIDTH));
    println!("{}", title.bold());
    println!("{}", "=".repeat(RULE_WIDTH));
}

fn print_response(reply: &str) {
    println!("\n{}", "=".repeat(RULE_WIDTH));
    println!("{}", "AI RESPONSE:".green().bold());
    println!("{}", "=".repeat(RULE_WIDTH));
    println!("\n{}\n", reply);
    println!("{}", "=".repeat(RULE_WIDTH));
}

fn print_goodbye(config: &Config) {
    println!("\n{}", "=".repeat(RULE_WIDTH));
    println!("Thank you for using Qabot!");
    println!(
        "Your chat history has been saved to '{}'",
        config.history.file.display()
    );
    println!("{}\n", "=".repeat(RULE_WIDTH));
}
