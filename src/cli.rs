//! Command-line interface definition for Qabot
//!
//! This module defines the CLI structure using clap's derive API,
//! providing the interactive menu plus one-shot ask, summarize and
//! history commands.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Qabot - FAQ answering and text summarization from the terminal
///
/// Every successful exchange is appended to a local JSON history file.
#[derive(Parser, Debug, Clone)]
#[command(name = "qabot")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, default_value = "config/config.yaml")]
    pub config: String,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Override the provider from config (gemini, openai)
    #[arg(short, long, global = true)]
    pub provider: Option<String>,

    /// Override the model of the active provider
    #[arg(short, long, global = true)]
    pub model: Option<String>,

    /// Override the history log location
    #[arg(long, global = true)]
    pub history_file: Option<PathBuf>,

    /// Command to execute; defaults to the interactive menu
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands for Qabot
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the interactive menu
    Chat,

    /// Ask a single question and print the answer
    Ask {
        /// The question; multiple words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },

    /// Summarize text given inline, from a file, or from stdin
    Summarize {
        /// Read the text to summarize from this file
        #[arg(short, long, conflicts_with = "text")]
        file: Option<PathBuf>,

        /// Text to summarize
        text: Option<String>,
    },

    /// Inspect the conversation history
    History {
        /// History subcommand
        #[command(subcommand)]
        command: HistoryCommand,
    },
}

/// History subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum HistoryCommand {
    /// List logged exchanges, oldest first
    List {
        /// Only show the most recent N entries
        #[arg(short, long)]
        limit: Option<usize>,

        /// Print the records as a JSON array instead of a table
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: "config/config.yaml".to_string(),
            verbose: false,
            provider: None,
            model: None,
            history_file: None,
            command: None,
        }
    }
}
