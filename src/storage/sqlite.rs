//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the TaskStore trait.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{StorageResult, TaskStore};
use crate::storage::{BrokenLinkRecord, PageSummary, TaskRecord, TaskStatus};
use crate::CrawlError;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    pub fn new(path: &Path) -> Result<Self, CrawlError> {
        let conn = Connection::open(path)?;

        // Configure SQLite for better performance
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self, CrawlError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    fn task_from_row(row: &Row<'_>) -> rusqlite::Result<TaskRecord> {
        Ok(TaskRecord {
            id: row.get(0)?,
            url: row.get(1)?,
            status: TaskStatus::from_db_string(&row.get::<_, String>(2)?)
                .unwrap_or(TaskStatus::Pending),
            html_version: row.get(3)?,
            page_title: row.get(4)?,
            h1_count: row.get(5)?,
            h2_count: row.get(6)?,
            h3_count: row.get(7)?,
            internal_links: row.get(8)?,
            external_links: row.get(9)?,
            broken_links: row.get(10)?,
            has_login_form: row.get(11)?,
            created_at: row.get(12)?,
        })
    }
}

const TASK_COLUMNS: &str = "id, url, status, html_version, page_title, h1_count, h2_count, \
                            h3_count, internal_links, external_links, broken_links, \
                            has_login_form, created_at";

impl TaskStore for SqliteStorage {
    fn create_task(&mut self, url: &str) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO crawl_tasks (url, status, created_at) VALUES (?1, ?2, ?3)",
            params![url, TaskStatus::Pending.to_db_string(), now],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_task(&self, task_id: i64) -> StorageResult<Option<TaskRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM crawl_tasks WHERE id = ?1",
            TASK_COLUMNS
        ))?;

        let task = stmt
            .query_row(params![task_id], Self::task_from_row)
            .optional()?;

        Ok(task)
    }

    fn list_tasks(&self) -> StorageResult<Vec<TaskRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM crawl_tasks ORDER BY id DESC",
            TASK_COLUMNS
        ))?;

        let tasks = stmt
            .query_map([], Self::task_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(tasks)
    }

    fn delete_task(&mut self, task_id: i64) -> StorageResult<()> {
        self.conn
            .execute("DELETE FROM crawl_tasks WHERE id = ?1", params![task_id])?;
        Ok(())
    }

    fn load_task_url(&self, task_id: i64) -> StorageResult<Option<String>> {
        let url = self
            .conn
            .query_row(
                "SELECT url FROM crawl_tasks WHERE id = ?1",
                params![task_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(url)
    }

    fn set_status(&mut self, task_id: i64, status: TaskStatus) -> StorageResult<()> {
        self.conn.execute(
            "UPDATE crawl_tasks SET status = ?1 WHERE id = ?2",
            params![status.to_db_string(), task_id],
        )?;
        Ok(())
    }

    fn write_summary(&mut self, task_id: i64, summary: &PageSummary) -> StorageResult<()> {
        self.conn.execute(
            "UPDATE crawl_tasks SET
                status = ?1,
                html_version = ?2, page_title = ?3,
                h1_count = ?4, h2_count = ?5, h3_count = ?6,
                internal_links = ?7, external_links = ?8, broken_links = ?9,
                has_login_form = ?10
             WHERE id = ?11",
            params![
                TaskStatus::Success.to_db_string(),
                summary.html_version,
                summary.page_title,
                summary.h1_count,
                summary.h2_count,
                summary.h3_count,
                summary.internal_links,
                summary.external_links,
                summary.broken_links,
                summary.has_login_form,
                task_id
            ],
        )?;
        Ok(())
    }

    fn append_broken_link(
        &mut self,
        task_id: i64,
        url: &str,
        status_code: u16,
    ) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO broken_links (crawl_task_id, url, status_code, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![task_id, url, status_code, now],
        )?;
        Ok(())
    }

    fn list_broken_links(&self, task_id: i64) -> StorageResult<Vec<BrokenLinkRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, crawl_task_id, url, status_code, created_at
             FROM broken_links WHERE crawl_task_id = ?1 ORDER BY id ASC",
        )?;

        let links = stmt
            .query_map(params![task_id], |row| {
                Ok(BrokenLinkRecord {
                    id: row.get(0)?,
                    task_id: row.get(1)?,
                    url: row.get(2)?,
                    status_code: row.get(3)?,
                    created_at: row.get(4)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(links)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> SqliteStorage {
        SqliteStorage::new_in_memory().unwrap()
    }

    #[test]
    fn test_create_and_get_task() {
        let mut store = storage();
        let id = store.create_task("https://example.com").unwrap();

        let task = store.get_task(id).unwrap().unwrap();
        assert_eq!(task.url, "https://example.com");
        assert_eq!(task.status, TaskStatus::Pending);
        assert!(task.page_title.is_none());
    }

    #[test]
    fn test_get_missing_task() {
        let store = storage();
        assert!(store.get_task(42).unwrap().is_none());
        assert!(store.load_task_url(42).unwrap().is_none());
    }

    #[test]
    fn test_load_task_url() {
        let mut store = storage();
        let id = store.create_task("https://example.com/page").unwrap();
        let url = store.load_task_url(id).unwrap();
        assert_eq!(url.as_deref(), Some("https://example.com/page"));
    }

    #[test]
    fn test_set_status() {
        let mut store = storage();
        let id = store.create_task("https://example.com").unwrap();

        store.set_status(id, TaskStatus::InProgress).unwrap();
        let task = store.get_task(id).unwrap().unwrap();
        assert_eq!(task.status, TaskStatus::InProgress);

        store.set_status(id, TaskStatus::Failed).unwrap();
        let task = store.get_task(id).unwrap().unwrap();
        assert_eq!(task.status, TaskStatus::Failed);
    }

    #[test]
    fn test_write_summary_sets_success_and_fields() {
        let mut store = storage();
        let id = store.create_task("https://example.com").unwrap();

        let summary = PageSummary {
            html_version: "HTML5 or unknown".to_string(),
            page_title: "Home".to_string(),
            h1_count: 1,
            h2_count: 2,
            h3_count: 3,
            internal_links: 4,
            external_links: 5,
            broken_links: 1,
            has_login_form: true,
        };
        store.write_summary(id, &summary).unwrap();

        let task = store.get_task(id).unwrap().unwrap();
        assert_eq!(task.status, TaskStatus::Success);
        assert_eq!(task.page_title.as_deref(), Some("Home"));
        assert_eq!(task.h1_count, Some(1));
        assert_eq!(task.internal_links, Some(4));
        assert_eq!(task.broken_links, Some(1));
        assert_eq!(task.has_login_form, Some(true));
    }

    #[test]
    fn test_broken_links_roundtrip() {
        let mut store = storage();
        let id = store.create_task("https://example.com").unwrap();

        store
            .append_broken_link(id, "https://evil.test/b", 404)
            .unwrap();
        store
            .append_broken_link(id, "https://example.com/gone", 410)
            .unwrap();

        let links = store.list_broken_links(id).unwrap();
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].url, "https://evil.test/b");
        assert_eq!(links[0].status_code, 404);
        assert_eq!(links[0].task_id, id);
        assert!(!links[0].created_at.is_empty());
    }

    #[test]
    fn test_delete_task_cascades_broken_links() {
        let mut store = storage();
        let id = store.create_task("https://example.com").unwrap();
        store
            .append_broken_link(id, "https://evil.test/b", 404)
            .unwrap();

        store.delete_task(id).unwrap();
        assert!(store.get_task(id).unwrap().is_none());
        assert!(store.list_broken_links(id).unwrap().is_empty());
    }

    #[test]
    fn test_list_tasks_newest_first() {
        let mut store = storage();
        let first = store.create_task("https://a.example").unwrap();
        let second = store.create_task("https://b.example").unwrap();

        let tasks = store.list_tasks().unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].id, second);
        assert_eq!(tasks[1].id, first);
    }
}
