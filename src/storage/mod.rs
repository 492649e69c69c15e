use crate::error::{Result, QabotError};
use anyhow::Context;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub mod types;
pub use types::{now_iso8601, preview, ConversationRecord};

/// Append-only JSON log of conversation records
///
/// The whole log is a single JSON array. Every append reads the array,
/// pushes one record and rewrites the file through a temp file + rename,
/// so a failed write leaves the previous contents in place. There is no
/// locking; one running instance per log file is assumed.
pub struct HistoryStore {
    path: PathBuf,
}

/// What `HistoryStore::append` did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppendOutcome {
    /// Number of records in the log after the append
    pub total_records: usize,
    /// Where an unreadable log was moved before starting a fresh one
    pub quarantined: Option<PathBuf>,
}

impl HistoryStore {
    /// Create a store backed by the given file
    ///
    /// The file itself is created lazily on the first append; the parent
    /// directory is created now.
    ///
    /// # Examples
    ///
    /// ```
    /// use qabot::storage::HistoryStore;
    ///
    /// let dir = std::env::temp_dir().join("qabot-doc-example");
    /// let store = HistoryStore::new_with_path(dir.join("history.json")).unwrap();
    /// assert!(store.path().ends_with("history.json"));
    /// ```
    pub fn new_with_path<P: Into<PathBuf>>(path: P) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .context("Failed to create parent directory for history file")
                .map_err(|e| QabotError::Storage(format!("{:#}", e)))?;
        }

        Ok(Self { path })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every record in insertion order
    ///
    /// A missing (or whitespace-only) file is an empty history.
    ///
    /// # Errors
    ///
    /// Returns `QabotError::Storage` if the file cannot be read or does not
    /// hold a JSON array of records
    pub fn list_all(&self) -> Result<Vec<ConversationRecord>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("History file {} does not exist yet", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(QabotError::Storage(format!(
                    "Failed to read history file {}: {}",
                    self.path.display(),
                    e
                ))
                .into())
            }
        };

        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&contents).map_err(|e| {
            QabotError::Storage(format!(
                "History file {} contains malformed JSON: {}",
                self.path.display(),
                e
            ))
            .into()
        })
    }

    /// Append one record to the log
    ///
    /// If the existing log cannot be parsed it is renamed aside (see
    /// `AppendOutcome::quarantined`) and a fresh array is started.
    ///
    /// # Errors
    ///
    /// Returns `QabotError::Storage` if the unreadable log cannot be moved
    /// aside or the new array cannot be written
    pub fn append(&self, record: &ConversationRecord) -> Result<AppendOutcome> {
        let mut quarantined = None;

        let mut records = match self.list_all() {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!("Starting a fresh history log: {:#}", e);
                quarantined = Some(self.quarantine()?);
                Vec::new()
            }
        };

        records.push(record.clone());
        self.write_all(&records)?;

        tracing::debug!(
            "Appended {} record to {} ({} total)",
            record.mode,
            self.path.display(),
            records.len()
        );

        Ok(AppendOutcome {
            total_records: records.len(),
            quarantined,
        })
    }

    fn write_all(&self, records: &[ConversationRecord]) -> Result<()> {
        let json = serde_json::to_string_pretty(records)
            .map_err(|e| QabotError::Storage(format!("Failed to serialize history: {}", e)))?;

        let tmp_path = sibling_path(&self.path, ".tmp");
        fs::write(&tmp_path, json).map_err(|e| {
            QabotError::Storage(format!(
                "Failed to write history file {}: {}",
                tmp_path.display(),
                e
            ))
        })?;

        fs::rename(&tmp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            QabotError::Storage(format!(
                "Failed to replace history file {}: {}",
                self.path.display(),
                e
            ))
        })?;

        Ok(())
    }

    /// Move an unreadable log out of the way, returning its new location
    fn quarantine(&self) -> Result<PathBuf> {
        let mut target = sibling_path(&self.path, ".corrupt");
        if target.exists() {
            let stamp = chrono::Local::now().format("%Y%m%d%H%M%S");
            target = sibling_path(&self.path, &format!(".corrupt-{}", stamp));
        }

        fs::rename(&self.path, &target).map_err(|e| {
            QabotError::Storage(format!(
                "Failed to move unreadable history file {} aside: {}",
                self.path.display(),
                e
            ))
        })?;

        tracing::warn!(
            "Moved unreadable history file {} to {}",
            self.path.display(),
            target.display()
        );

        Ok(target)
    }
}

/// `path` with `suffix` appended to its file name
fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(suffix);
    path.with_file_name(name)
}
