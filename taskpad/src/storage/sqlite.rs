//! SQLite-backed implementation of [`TaskBackend`].
//!
//! The canonical persistence backend: one `todos` table with an
//! auto-incrementing id. The connection is guarded by a [`tokio`] mutex so
//! the blocking `rusqlite` calls never overlap.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use rusqlite::{Connection, params};
use tokio::sync::Mutex;

use taskpad_model::{NewTask, Priority, Task, TaskId, TaskStatus};

use super::{StorageError, TaskBackend};

/// Relational backend storing tasks in an embedded SQLite database.
pub struct SqliteBackend {
    conn: Mutex<Connection>,
}

impl SqliteBackend {
    /// Opens (creating if necessary) the database at `path`.
    ///
    /// Parent directories are created first so a fresh data dir works.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the directory or database cannot be
    /// created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path: PathBuf = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(&path)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Opens a private in-memory database, for tests.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the in-memory database cannot be opened.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

/// Maps one `todos` row to a [`Task`].
///
/// `completed` is stored as 0/1 and reconstructed into a boolean here.
fn row_to_task(row: &rusqlite::Row<'_>) -> rusqlite::Result<Task> {
    let priority: String = row.get(3)?;
    let status: String = row.get(4)?;
    let completed: i64 = row.get(5)?;
    Ok(Task {
        id: TaskId::from_i64(row.get(0)?),
        title: row.get(1)?,
        due_date: row.get(2)?,
        priority: Priority::from_str(&priority).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
        })?,
        status: TaskStatus::from_str(&status).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
        })?,
        completed: completed != 0,
    })
}

impl TaskBackend for SqliteBackend {
    async fn initialize(&self) -> Result<(), StorageError> {
        let conn = self.conn.lock().await;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS todos (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                date TEXT,
                priority TEXT,
                status TEXT,
                completed INTEGER
            );",
        )?;
        Ok(())
    }

    async fn load_all(&self) -> Result<Vec<Task>, StorageError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT id, title, date, priority, status, completed FROM todos ORDER BY id ASC",
        )?;
        let tasks = stmt
            .query_map([], row_to_task)?
            .collect::<rusqlite::Result<Vec<Task>>>()?;
        Ok(tasks)
    }

    async fn insert(&self, new: &NewTask) -> Result<Task, StorageError> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO todos (title, date, priority, status, completed)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                new.title,
                new.due_date,
                new.priority.to_string(),
                new.status.to_string(),
                i64::from(new.completed),
            ],
        )?;
        let id = TaskId::from_i64(conn.last_insert_rowid());
        Ok(new.clone().into_task(id))
    }

    async fn update_completion(&self, id: TaskId, completed: bool) -> Result<(), StorageError> {
        let conn = self.conn.lock().await;
        let status = TaskStatus::from_completed(completed);
        let affected = conn.execute(
            "UPDATE todos SET completed = ?1, status = ?2 WHERE id = ?3",
            params![i64::from(completed), status.to_string(), id.as_i64()],
        )?;
        if affected == 0 {
            return Err(StorageError::TaskNotFound(id));
        }
        Ok(())
    }
}
