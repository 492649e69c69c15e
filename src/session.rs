//! Interactive session model
//!
//! The menu loop is described here without any terminal I/O:
//!
//! - `SessionState` and the pure `transition` function drive the menu
//! - `MultilineInput` collects pasted text line by line
//! - `Session` runs one turn: dispatch, then log on success
//!
//! `commands::chat` supplies the terminal around these pieces.

use crate::dispatcher::Dispatcher;
use crate::error::Result;
use crate::mode::Mode;
use crate::storage::{AppendOutcome, ConversationRecord, HistoryStore};
use std::fmt;

/// Where the interactive session currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Showing the numbered menu
    MainMenu,
    /// Waiting for a question
    AwaitingFaqInput,
    /// Waiting for text to summarize
    AwaitingSummaryInput,
    /// Printing the history log
    ViewingHistory,
    /// Leaving the session; terminal
    Exiting,
}

impl SessionState {
    /// True once the session has ended
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Exiting)
    }

    /// Dispatch mode collected in this state, if any
    pub fn mode(&self) -> Option<Mode> {
        match self {
            Self::AwaitingFaqInput => Some(Mode::Faq),
            Self::AwaitingSummaryInput => Some(Mode::Summary),
            _ => None,
        }
    }
}

/// Numbered main menu entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    /// 1) Ask FAQ
    AskFaq,
    /// 2) Summarize text
    Summarize,
    /// 3) View history
    ViewHistory,
    /// 4) Exit
    Exit,
}

impl MenuChoice {
    /// All entries in menu order
    pub const ALL: [MenuChoice; 4] = [
        MenuChoice::AskFaq,
        MenuChoice::Summarize,
        MenuChoice::ViewHistory,
        MenuChoice::Exit,
    ];

    /// Parse the user's menu selection ("1".."4")
    ///
    /// # Examples
    ///
    /// ```
    /// use qabot::session::MenuChoice;
    ///
    /// assert_eq!(MenuChoice::parse(" 2 "), Some(MenuChoice::Summarize));
    /// assert_eq!(MenuChoice::parse("5"), None);
    /// ```
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Self::AskFaq),
            "2" => Some(Self::Summarize),
            "3" => Some(Self::ViewHistory),
            "4" => Some(Self::Exit),
            _ => None,
        }
    }

    /// Menu number
    pub fn number(&self) -> u8 {
        match self {
            Self::AskFaq => 1,
            Self::Summarize => 2,
            Self::ViewHistory => 3,
            Self::Exit => 4,
        }
    }

    /// Menu label
    pub fn label(&self) -> &'static str {
        match self {
            Self::AskFaq => "Ask a FAQ question",
            Self::Summarize => "Summarize text",
            Self::ViewHistory => "View conversation history",
            Self::Exit => "Exit",
        }
    }

    fn target(&self) -> SessionState {
        match self {
            Self::AskFaq => SessionState::AwaitingFaqInput,
            Self::Summarize => SessionState::AwaitingSummaryInput,
            Self::ViewHistory => SessionState::ViewingHistory,
            Self::Exit => SessionState::Exiting,
        }
    }
}

impl fmt::Display for MenuChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.number(), self.label())
    }
}

/// Inputs that move the session between states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A menu entry was selected
    Selected(MenuChoice),
    /// The current state's action finished (successfully or with a shown error)
    Completed,
    /// The user abandoned the current input
    Cancelled,
}

/// Compute the next state
///
/// Menu selections only count in `MainMenu`; every other non-terminal
/// state goes back to `MainMenu` once its action completes or is
/// cancelled. `Exiting` never changes.
pub fn transition(state: SessionState, event: SessionEvent) -> SessionState {
    match (state, event) {
        (SessionState::Exiting, _) => SessionState::Exiting,
        (SessionState::MainMenu, SessionEvent::Selected(choice)) => choice.target(),
        (SessionState::MainMenu, _) => SessionState::MainMenu,
        (_, SessionEvent::Completed | SessionEvent::Cancelled) => SessionState::MainMenu,
        (current, SessionEvent::Selected(_)) => current,
    }
}

/// Result of feeding one line to `MultilineInput`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// Keep reading
    Continue,
    /// A blank line ended the input
    Finished(String),
    /// The user typed CANCEL
    Cancelled,
}

/// Collects multi-line text terminated by a blank line
///
/// Leading blank lines are skipped so the terminator cannot arrive
/// before any text. A line reading `CANCEL` (any case) abandons input.
#[derive(Debug, Default)]
pub struct MultilineInput {
    lines: Vec<String>,
}

impl MultilineInput {
    /// Start collecting
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one line as typed (without its newline)
    pub fn feed(&mut self, line: &str) -> LineOutcome {
        if line.trim().eq_ignore_ascii_case("cancel") {
            self.lines.clear();
            return LineOutcome::Cancelled;
        }

        if line.trim().is_empty() {
            if self.lines.is_empty() {
                return LineOutcome::Continue;
            }
            return LineOutcome::Finished(self.take());
        }

        self.lines.push(line.trim_end().to_string());
        LineOutcome::Continue
    }

    /// Text collected so far; used when input ends without a blank line
    pub fn finish(mut self) -> String {
        self.take()
    }

    fn take(&mut self) -> String {
        std::mem::take(&mut self.lines).join("\n")
    }
}

/// Outcome of a successful turn
#[derive(Debug)]
pub struct TurnOutcome {
    /// The exchange as it was (or should have been) logged
    pub record: ConversationRecord,
    /// Result of appending the record to the history log
    pub history: Result<AppendOutcome>,
}

/// One process-wide session: a dispatcher plus the history log it feeds
pub struct Session {
    dispatcher: Dispatcher,
    store: HistoryStore,
}

impl Session {
    /// Create a session
    pub fn new(dispatcher: Dispatcher, store: HistoryStore) -> Self {
        Self { dispatcher, store }
    }

    /// Dispatcher in use
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// History log in use
    pub fn store(&self) -> &HistoryStore {
        &self.store
    }

    /// Run one exchange
    ///
    /// On success exactly one record is appended. A failed append does not
    /// fail the turn; it is reported through `TurnOutcome::history`.
    ///
    /// # Errors
    ///
    /// Returns the dispatcher's error; nothing is logged in that case
    pub async fn handle_turn(&self, mode: Mode, user_text: &str) -> Result<TurnOutcome> {
        let reply = self.dispatcher.dispatch(mode, user_text).await?;
        let record = ConversationRecord::new(mode, user_text.trim(), reply);

        let history = self.store.append(&record);
        if let Err(e) = &history {
            tracing::warn!("Failed to log exchange: {:#}", e);
        }

        Ok(TurnOutcome { record, history })
    }

    /// Every logged record, oldest first
    pub fn history(&self) -> Result<Vec<ConversationRecord>> {
        self.store.list_all()
    }
}
