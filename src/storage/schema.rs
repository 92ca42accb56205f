//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the pagesift database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Tracked crawl tasks, one row per analyzed base URL
CREATE TABLE IF NOT EXISTS crawl_tasks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT NOT NULL,
    status TEXT NOT NULL,
    html_version TEXT,
    page_title TEXT,
    h1_count INTEGER,
    h2_count INTEGER,
    h3_count INTEGER,
    internal_links INTEGER,
    external_links INTEGER,
    broken_links INTEGER,
    has_login_form INTEGER,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_crawl_tasks_status ON crawl_tasks(status);

-- Broken links discovered while checking a task's page
CREATE TABLE IF NOT EXISTS broken_links (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    crawl_task_id INTEGER NOT NULL REFERENCES crawl_tasks(id) ON DELETE CASCADE,
    url TEXT NOT NULL,
    status_code INTEGER NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_broken_links_task ON broken_links(crawl_task_id);
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
