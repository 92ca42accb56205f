//! Storage traits and error types

use crate::storage::{BrokenLinkRecord, PageSummary, TaskRecord, TaskStatus};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Task not found: {0}")]
    TaskNotFound(i64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for the persistence collaborator behind the crawl engine
///
/// The engine only ever reads a task's URL at start and writes status,
/// summary, and broken-link rows as a run progresses. Each call is atomic
/// from the engine's point of view; no transaction spans multiple calls.
/// Implementations do not need to be thread-safe themselves, the engine
/// serializes access behind a mutex.
pub trait TaskStore {
    // ===== Task CRUD =====

    /// Creates a new task with status `Pending`
    ///
    /// # Returns
    ///
    /// The ID of the newly created task
    fn create_task(&mut self, url: &str) -> StorageResult<i64>;

    /// Gets a task by ID
    fn get_task(&self, task_id: i64) -> StorageResult<Option<TaskRecord>>;

    /// Lists all tasks, newest first
    fn list_tasks(&self) -> StorageResult<Vec<TaskRecord>>;

    /// Deletes a task and its broken-link records
    fn delete_task(&mut self, task_id: i64) -> StorageResult<()>;

    // ===== Run-facing operations =====

    /// Loads the URL for a task, or None if the task does not exist
    fn load_task_url(&self, task_id: i64) -> StorageResult<Option<String>>;

    /// Updates the status of a task
    fn set_status(&mut self, task_id: i64, status: TaskStatus) -> StorageResult<()>;

    /// Writes the final summary and the `Success` status in one update
    ///
    /// Keeping both in a single statement makes the terminal transition
    /// atomic with respect to readers of the task row.
    fn write_summary(&mut self, task_id: i64, summary: &PageSummary) -> StorageResult<()>;

    /// Appends an immutable broken-link record, timestamped now
    fn append_broken_link(&mut self, task_id: i64, url: &str, status_code: u16)
        -> StorageResult<()>;

    /// Lists broken-link records for a task, oldest first
    fn list_broken_links(&self, task_id: i64) -> StorageResult<Vec<BrokenLinkRecord>>;
}
