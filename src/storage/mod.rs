//! Storage module for persisting crawl tasks
//!
//! This module handles all database operations for the engine, including:
//! - SQLite database initialization and schema management
//! - Crawl task status and summary persistence
//! - Broken link records

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{StorageError, StorageResult, TaskStore};

/// Lifecycle status of a crawl task
///
/// Tasks are created `Pending`, move to `InProgress` when a run starts, and
/// end in exactly one of `Success` or `Failed`. The engine never revisits a
/// task after the terminal write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    Pending,
    InProgress,
    Success,
    Failed,
}

impl TaskStatus {
    /// Converts the status to its database string representation
    pub fn to_db_string(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Success => "success",
            TaskStatus::Failed => "failed",
        }
    }

    /// Parses a status from its database string representation
    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(TaskStatus::Pending),
            "in_progress" => Some(TaskStatus::InProgress),
            "success" => Some(TaskStatus::Success),
            "failed" => Some(TaskStatus::Failed),
            _ => None,
        }
    }

    /// Returns true for `Success` and `Failed`
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Success | TaskStatus::Failed)
    }
}

/// Represents a crawl task in the database
#[derive(Debug, Clone)]
pub struct TaskRecord {
    pub id: i64,
    pub url: String,
    pub status: TaskStatus,
    pub html_version: Option<String>,
    pub page_title: Option<String>,
    pub h1_count: Option<u32>,
    pub h2_count: Option<u32>,
    pub h3_count: Option<u32>,
    pub internal_links: Option<u32>,
    pub external_links: Option<u32>,
    pub broken_links: Option<u32>,
    pub has_login_form: Option<bool>,
    pub created_at: String,
}

/// The accumulated result of one successful run
///
/// Written to the store in a single call together with the `Success` status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSummary {
    pub html_version: String,
    pub page_title: String,
    pub h1_count: u32,
    pub h2_count: u32,
    pub h3_count: u32,
    pub internal_links: u32,
    pub external_links: u32,
    pub broken_links: u32,
    pub has_login_form: bool,
}

/// Represents a recorded broken link
#[derive(Debug, Clone)]
pub struct BrokenLinkRecord {
    pub id: i64,
    pub task_id: i64,
    pub url: String,
    pub status_code: u16,
    pub created_at: String,
}
