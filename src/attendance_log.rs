//! Attendance scratch pad
//!
//! A local JSON file of attendance marks, kept independently of the remote
//! API. One entry per employee per day; marking the same employee again on
//! the same day replaces the earlier status.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::analytics::dashboard::AttendanceOverview;
use crate::records::{AttendanceRecord, AttendanceStatus, RecordId};

/// Errors reading or writing the attendance log
#[derive(Error, Debug)]
pub enum AttendanceLogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed attendance log: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type AttendanceLogResult<T> = Result<T, AttendanceLogError>;

/// One employee's mark for one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub employee_id: RecordId,
    pub employee_name: String,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub marked_at: DateTime<Utc>,
}

impl LogEntry {
    /// The entry in the shape the REST API stores attendance
    pub fn to_record(&self) -> AttendanceRecord {
        AttendanceRecord {
            id: None,
            employee_id: Some(self.employee_id.clone()),
            employee_name: self.employee_name.clone(),
            date: Some(self.date.format("%Y-%m-%d").to_string()),
            status: Some(self.status),
            created_at: Some(self.marked_at.to_rfc3339()),
            extra: serde_json::Map::new(),
        }
    }
}

/// File-backed attendance log
#[derive(Debug)]
pub struct AttendanceLog {
    path: PathBuf,
    entries: Vec<LogEntry>,
}

impl AttendanceLog {
    /// Open the log at `path`; a missing file is an empty log
    pub fn open(path: impl AsRef<Path>) -> AttendanceLogResult<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No attendance log yet, starting empty");
            return Ok(Self {
                path,
                entries: Vec::new(),
            });
        }

        let content = std::fs::read_to_string(&path)?;
        let entries: Vec<LogEntry> = if content.trim().is_empty() {
            Vec::new()
        } else {
            serde_json::from_str(&content)?
        };

        tracing::debug!(path = %path.display(), entries = entries.len(), "Attendance log opened");
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record a mark, replacing any earlier one for the same employee and day
    pub fn mark(
        &mut self,
        employee_id: impl Into<RecordId>,
        employee_name: impl Into<String>,
        date: NaiveDate,
        status: AttendanceStatus,
    ) -> &LogEntry {
        let entry = LogEntry {
            employee_id: employee_id.into(),
            employee_name: employee_name.into(),
            date,
            status,
            marked_at: Utc::now(),
        };

        let existing = self
            .entries
            .iter()
            .position(|e| e.employee_id == entry.employee_id && e.date == date);

        let index = match existing {
            Some(index) => {
                self.entries[index] = entry;
                index
            }
            None => {
                self.entries.push(entry);
                self.entries.len() - 1
            }
        };
        &self.entries[index]
    }

    /// Entries marked for one day, in marking order
    pub fn for_date(&self, date: NaiveDate) -> Vec<&LogEntry> {
        self.entries.iter().filter(|e| e.date == date).collect()
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Present/absent summary for one day
    pub fn overview(&self, date: NaiveDate) -> AttendanceOverview {
        let records: Vec<AttendanceRecord> =
            self.for_date(date).into_iter().map(LogEntry::to_record).collect();
        AttendanceOverview::for_date(&records, &date.format("%Y-%m-%d").to_string())
    }

    /// Write the log back to its file, creating parent directories
    pub fn save(&self) -> AttendanceLogResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, content)?;

        tracing::debug!(path = %self.path.display(), entries = self.entries.len(), "Attendance log saved");
        Ok(())
    }
}
