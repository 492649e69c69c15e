//! Qabot - FAQ answering and text summarization library
//!
//! This library provides the pieces behind the `qabot` CLI: a prompt
//! dispatcher over a generative text API, a JSON conversation log, and an
//! I/O-free model of the interactive menu.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `providers`: Generative API abstraction and implementations (Gemini, OpenAI)
//! - `dispatcher`: Builds a request from a mode and user text, normalizes the reply
//! - `storage`: Append-only JSON history log
//! - `session`: Menu state machine and one conversational turn
//! - `mode`: FAQ and summary modes with their fixed instructions
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli` / `commands`: Command-line interface and terminal handlers
//!
//! # Example
//!
//! ```no_run
//! use qabot::{Config, Mode};
//! use qabot::commands::build_session;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/config.yaml", &Default::default())?;
//!     config.validate()?;
//!
//!     let session = build_session(&config)?;
//!     let outcome = session.handle_turn(Mode::Faq, "What is 2+2?").await?;
//!     println!("{}", outcome.record.output);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod mode;
pub mod providers;
pub mod session;
pub mod storage;

// Re-export commonly used types
pub use config::Config;
pub use dispatcher::Dispatcher;
pub use error::{QabotError, Result};
pub use mode::Mode;
pub use session::Session;
pub use storage::{ConversationRecord, HistoryStore};
