//! Task store trait and `SQLite` implementation.

use crate::error::Result;
use crate::tasks::models::Task;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// How long a connection waits on a locked database before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Columns selected for every task query, in [`SqliteTaskStore::parse_task`] order.
const TASK_COLUMNS: &str = "id, title, description, completed, labels";

/// Trait for task storage operations.
///
/// Operations that reference a missing task return `None` or `false`.
/// All methods may fail with database errors.
#[allow(clippy::missing_errors_doc)]
pub trait TaskStore {
    /// Create a new task without labels.
    fn create_task(&self, title: &str, description: Option<&str>, completed: bool) -> Result<Task>;

    /// Get a task by ID.
    fn get_task(&self, id: i64) -> Result<Option<Task>>;

    /// Replace every field of a task.
    fn update_task(&self, id: i64, update: &TaskUpdate) -> Result<Option<Task>>;

    /// Replace only the labels of a task.
    fn set_labels(&self, id: i64, labels: Option<&str>) -> Result<Option<Task>>;

    /// Delete a task by ID.
    fn delete_task(&self, id: i64) -> Result<bool>;

    /// List all tasks in creation order.
    fn list_tasks(&self) -> Result<Vec<Task>>;

    /// Count stored tasks.
    fn count_tasks(&self) -> Result<usize>;
}

/// Full replacement values for a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskUpdate {
    /// New title.
    pub title: String,
    /// New description.
    pub description: Option<String>,
    /// New completion flag.
    pub completed: bool,
    /// New labels, already resolved by the label policy.
    pub labels: Option<String>,
}

/// SQLite-based task store.
///
/// Each operation opens a new connection to the database file, so the store
/// is cheap to clone and safe to move onto blocking threads.
#[derive(Debug, Clone)]
pub struct SqliteTaskStore {
    db_path: PathBuf,
}

impl SqliteTaskStore {
    /// Create a new `SQLite` task store at the given database path.
    ///
    /// The `tasks` table is created if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self> {
        let store = Self { db_path: db_path.as_ref().to_path_buf() };
        store.init_schema()?;
        Ok(store)
    }

    /// Get the database path.
    #[must_use]
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Open a connection to the database.
    fn open(&self) -> Result<Connection> {
        if let Some(parent) = self.db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(&self.db_path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        Ok(conn)
    }

    /// Initialize the database schema.
    fn init_schema(&self) -> Result<()> {
        let conn = self.open()?;

        // AUTOINCREMENT keeps ids of deleted rows from being handed out again.
        conn.execute_batch(
            r"
            CREATE TABLE IF NOT EXISTS tasks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                description TEXT,
                completed INTEGER NOT NULL DEFAULT 0,
                labels TEXT
            );
            ",
        )?;

        Ok(())
    }

    /// Parse a task from a row.
    fn parse_task(row: &rusqlite::Row) -> rusqlite::Result<Task> {
        Ok(Task {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            completed: row.get(3)?,
            labels: row.get(4)?,
        })
    }
}

impl TaskStore for SqliteTaskStore {
    fn create_task(&self, title: &str, description: Option<&str>, completed: bool) -> Result<Task> {
        let conn = self.open()?;
        let task = conn.query_row(
            &format!(
                "INSERT INTO tasks (title, description, completed) VALUES (?1, ?2, ?3)
                 RETURNING {TASK_COLUMNS}"
            ),
            params![title, description, completed],
            Self::parse_task,
        )?;
        tracing::debug!(id = task.id, "task created");
        Ok(task)
    }

    fn get_task(&self, id: i64) -> Result<Option<Task>> {
        let conn = self.open()?;
        let task = conn
            .query_row(
                &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
                params![id],
                Self::parse_task,
            )
            .optional()?;
        Ok(task)
    }

    fn update_task(&self, id: i64, update: &TaskUpdate) -> Result<Option<Task>> {
        let conn = self.open()?;
        let task = conn
            .query_row(
                &format!(
                    "UPDATE tasks SET title = ?1, description = ?2, completed = ?3, labels = ?4
                     WHERE id = ?5
                     RETURNING {TASK_COLUMNS}"
                ),
                params![update.title, update.description, update.completed, update.labels, id],
                Self::parse_task,
            )
            .optional()?;
        Ok(task)
    }

    fn set_labels(&self, id: i64, labels: Option<&str>) -> Result<Option<Task>> {
        let conn = self.open()?;
        let task = conn
            .query_row(
                &format!("UPDATE tasks SET labels = ?1 WHERE id = ?2 RETURNING {TASK_COLUMNS}"),
                params![labels, id],
                Self::parse_task,
            )
            .optional()?;
        Ok(task)
    }

    fn delete_task(&self, id: i64) -> Result<bool> {
        let conn = self.open()?;
        let rows = conn.execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    fn list_tasks(&self) -> Result<Vec<Task>> {
        let conn = self.open()?;
        let mut stmt = conn.prepare(&format!("SELECT {TASK_COLUMNS} FROM tasks ORDER BY id ASC"))?;
        let tasks = stmt.query_map([], Self::parse_task)?.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(tasks)
    }

    fn count_tasks(&self) -> Result<usize> {
        let conn = self.open()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM tasks", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }
}
