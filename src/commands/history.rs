use crate::cli::HistoryCommand;
use crate::config::Config;
use crate::error::Result;
use crate::storage::{preview, ConversationRecord, HistoryStore};
use colored::Colorize;
use prettytable::{format, Table};
use std::fmt::Write as _;

/// Handle history commands
pub fn handle_history(config: &Config, command: HistoryCommand) -> Result<()> {
    let store = HistoryStore::new_with_path(&config.history.file)?;

    match command {
        HistoryCommand::List { limit, json } => {
            let records = match store.list_all() {
                Ok(records) => records,
                Err(e) => {
                    eprintln!(
                        "{}",
                        format!("Warning: {:#}. Showing an empty history.", e).yellow()
                    );
                    Vec::new()
                }
            };
            let records = most_recent(records, limit);

            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
                return Ok(());
            }

            if records.is_empty() {
                println!("{}", "No conversation history yet.".yellow());
                return Ok(());
            }

            let mut table = Table::new();
            table.set_format(*format::consts::FORMAT_BORDERS_ONLY);

            table.add_row(prettytable::row![
                "#".bold(),
                "Timestamp".bold(),
                "Mode".bold(),
                "Input".bold(),
                "Output".bold()
            ]);

            let preview_chars = config.history.preview_chars;
            for (index, record) in records.iter().enumerate() {
                table.add_row(prettytable::row![
                    (index + 1).to_string().cyan(),
                    record.timestamp,
                    record.mode.colored_tag(),
                    preview(&record.input, preview_chars),
                    preview(&record.output, preview_chars)
                ]);
            }

            println!("\nConversation History ({}):", store.path().display());
            table.printstd();
            println!();
        }
    }

    Ok(())
}

/// Keep the last `limit` records, still oldest first
fn most_recent(
    mut records: Vec<ConversationRecord>,
    limit: Option<usize>,
) -> Vec<ConversationRecord> {
    if let Some(limit) = limit {
        if records.len() > limit {
            records.drain(..records.len() - limit);
        }
    }
    records
}

/// Render the history listing shown from the interactive menu
///
/// # Examples
///
/// ```
/// use qabot::commands::history::format_history;
///
/// assert!(format_history(&[], 200).contains("No conversation history yet."));
/// ```
pub fn format_history(records: &[ConversationRecord], preview_chars: usize) -> String {
    let mut out = String::new();
    let rule = "=".repeat(60);

    let _ = writeln!(out, "\n{}", rule);
    let _ = writeln!(out, "{}", "CONVERSATION HISTORY".bold());
    let _ = writeln!(out, "{}", rule);

    if records.is_empty() {
        let _ = writeln!(out, "\nNo conversation history yet.");
        return out;
    }

    for (index, record) in records.iter().enumerate() {
        let _ = writeln!(
            out,
            "\n[{}] {} - {}",
            index + 1,
            record.timestamp,
            record.mode.colored_tag()
        );
        let _ = writeln!(out, "User: {}", preview(&record.input, preview_chars));
        let _ = writeln!(out, "AI: {}", preview(&record.output, preview_chars));
        let _ = writeln!(out, "{}", "-".repeat(60));
    }

    let _ = writeln!(out, "\nTotal conversations: {}", records.len());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::Mode;

    fn records(n: usize) -> Vec<ConversationRecord> {
        (0..n)
            .map(|i| ConversationRecord::new(Mode::Faq, format!("q{}", i), format!("a{}", i)))
            .collect()
    }

    #[test]
    fn test_most_recent_keeps_tail_in_order() {
        let kept = most_recent(records(5), Some(2));
        let inputs: Vec<&str> = kept.iter().map(|r| r.input.as_str()).collect();
        assert_eq!(inputs, vec!["q3", "q4"]);
    }

    #[test]
    fn test_most_recent_without_limit() {
        assert_eq!(most_recent(records(3), None).len(), 3);
        assert_eq!(most_recent(records(3), Some(10)).len(), 3);
    }

    #[test]
    fn test_format_history_numbers_entries() {
        let text = format_history(&records(2), 200);
        assert!(text.contains("[1]"));
        assert!(text.contains("[2]"));
        assert!(text.contains("User: q1"));
        assert!(text.contains("Total conversations: 2"));
    }

    #[test]
    fn test_format_history_truncates_for_display_only() {
        let long = "x".repeat(300);
        let record = ConversationRecord::new(Mode::Summary, long.clone(), "short");
        let text = format_history(std::slice::from_ref(&record), 200);

        assert!(text.contains(&format!("User: {}...", "x".repeat(200))));
        assert!(!text.contains(&long));
        assert_eq!(record.input.len(), 300);
    }

    #[test]
    fn test_handle_history_list_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.history.file = dir.path().join("h.json");

        let result = handle_history(
            &config,
            HistoryCommand::List {
                limit: None,
                json: false,
            },
        );
        assert!(result.is_ok());
    }
}
