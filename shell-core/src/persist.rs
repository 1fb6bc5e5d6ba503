//! Command history persistence.
//!
//! The only durable state is an optional history log, stored as versioned JSON.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tokio::fs;
use tracing::debug;

use crate::history::CommandHistory;

/// Errors from persistence operations.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

/// Current history file version.
const HISTORY_VERSION: u32 = 1;

/// A saved history log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedHistory {
    /// Format version for compatibility checking.
    pub version: u32,

    /// Seconds since the Unix epoch when the log was written.
    pub saved_at: String,

    /// Commands in the order they were typed.
    pub commands: Vec<String>,
}

impl SavedHistory {
    pub fn new(commands: Vec<String>) -> Self {
        Self {
            version: HISTORY_VERSION,
            saved_at: now_timestamp(),
            commands,
        }
    }

    pub fn from_history(history: &CommandHistory) -> Self {
        Self::new(history.commands())
    }

    /// Rebuild a history, keeping at most the newest `limit` commands.
    pub fn into_history(self, limit: usize) -> CommandHistory {
        CommandHistory::from_commands(self.commands, limit)
    }

    /// Save to a JSON file.
    pub async fn save_json(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).await?;
        debug!(path = %path.display(), commands = self.commands.len(), "history saved");
        Ok(())
    }

    /// Load from a JSON file.
    pub async fn load_json(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let content = fs::read_to_string(path).await?;
        let saved: Self = serde_json::from_str(&content)?;

        if saved.version != HISTORY_VERSION {
            return Err(PersistError::VersionMismatch {
                expected: HISTORY_VERSION,
                found: saved.version,
            });
        }

        Ok(saved)
    }
}

fn now_timestamp() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}", now.as_secs())
}
