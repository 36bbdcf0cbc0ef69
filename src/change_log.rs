//! Append-only change log.
//!
//! Every recorded configuration change lands in `changes.jsonl` inside
//! the app's data directory, whether or not a migration file was
//! generated for it. One JSON object per line.

use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::ChangeRecord;
use crate::storage::Storage;
use crate::Result;

/// A single change log entry.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChangeLogEntry {
    /// ISO 8601 timestamp when the change was recorded
    pub timestamp: DateTime<Utc>,

    /// App directory the change was recorded against
    pub app_path: String,

    /// User who recorded the change
    pub user: String,

    /// The change itself
    pub change: ChangeRecord,
}

impl ChangeLogEntry {
    pub fn new(app_path: String, change: ChangeRecord) -> Self {
        Self {
            timestamp: Utc::now(),
            app_path,
            user: current_user(),
            change,
        }
    }
}

/// Append a change to the log.
pub fn append(storage: &Storage, entry: &ChangeLogEntry) -> Result<()> {
    let json = serde_json::to_string(entry)?;
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(storage.change_log_path())?;
    writeln!(file, "{}", json)?;
    Ok(())
}

/// Read log entries, newest last. `limit` keeps only the most recent
/// entries when set.
pub fn read(storage: &Storage, limit: Option<usize>) -> Result<Vec<ChangeLogEntry>> {
    let path = storage.change_log_path();
    if !path.exists() {
        return Ok(Vec::new());
    }

    let reader = BufReader::new(std::fs::File::open(path)?);
    let mut entries = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        entries.push(serde_json::from_str(&line)?);
    }

    if let Some(limit) = limit {
        let skip = entries.len().saturating_sub(limit);
        entries.drain(..skip);
    }
    Ok(entries)
}

/// Get the current user's username.
fn current_user() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string())
}
