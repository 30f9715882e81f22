//! JSONL (JSON Lines) query history
//!
//! Provides append-only logging of executed queries to `.delve/history.jsonl`

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};

/// One executed query
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueryRecord {
    /// ISO 8601 timestamp of when the query was submitted
    pub timestamp: DateTime<Utc>,
    /// The query text as typed
    pub query: String,
}

impl QueryRecord {
    /// Create a record for `query`, stamped with the current time.
    #[must_use]
    pub fn new(query: &str) -> Self {
        Self {
            timestamp: Utc::now(),
            query: query.to_string(),
        }
    }
}

/// Append-only query history
///
/// Each line of `history.jsonl` is a JSON object representing one query.
pub struct HistoryLog {
    history_path: PathBuf,
}

impl HistoryLog {
    /// Create a history log under `dir` (typically `.delve`), creating the
    /// directory if needed.
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();

        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create history directory: {}", dir.display()))?;

        Ok(Self {
            history_path: dir.join("history.jsonl"),
        })
    }

    /// Append one record to the history file.
    pub fn append(&self, record: &QueryRecord) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.history_path)
            .with_context(|| {
                format!("Failed to open history file: {}", self.history_path.display())
            })?;

        let json = serde_json::to_string(record).context("Failed to serialize query record")?;
        writeln!(file, "{json}").context("Failed to write to history file")?;

        Ok(())
    }

    /// Read all records in chronological order.
    ///
    /// A history file that does not exist yet reads as empty.
    pub fn read_all(&self) -> Result<Vec<QueryRecord>> {
        if !self.history_path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.history_path).with_context(|| {
            format!("Failed to read history file: {}", self.history_path.display())
        })?;

        let mut records = Vec::new();

        for (line_num, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }

            let record: QueryRecord = serde_json::from_str(line)
                .with_context(|| format!("Failed to parse line {} as JSON", line_num + 1))?;

            records.push(record);
        }

        Ok(records)
    }

    /// The last `count` records, oldest first.
    pub fn recent(&self, count: usize) -> Result<Vec<QueryRecord>> {
        let mut records = self.read_all()?;
        let skip = records.len().saturating_sub(count);
        Ok(records.split_off(skip))
    }

    /// Get the path to the history file
    #[must_use]
    pub fn history_path(&self) -> &Path {
        &self.history_path
    }
}
