//! Durable storage boundary for the task list.
//!
//! Defines the [`TaskBackend`] trait the task store writes through, plus
//! three interchangeable implementations:
//! - [`SqliteBackend`] — embedded relational database (canonical)
//! - [`JsonFileBackend`] — single serialized JSON blob (legacy/alternate)
//! - [`MemoryBackend`] — in-memory store for testing
//!
//! Callers must not need to know which backend is active: for the same
//! operation sequence every backend yields the same task list contents in
//! the same storage-insertion order.

pub mod json;
pub mod memory;
pub mod sqlite;

pub use json::JsonFileBackend;
pub use memory::MemoryBackend;
pub use sqlite::SqliteBackend;

use taskpad_model::{NewTask, Task, TaskId};

/// Errors that can occur inside a storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("storage i/o failed: {0}")]
    Io(#[from] std::io::Error),

    /// A database operation failed.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The persisted blob could not be encoded or decoded.
    #[error(transparent)]
    Codec(#[from] taskpad_model::codec::CodecError),

    /// No persisted record matches the given id.
    #[error("no stored task with id {0}")]
    TaskNotFound(TaskId),
}

/// Trait for durable, restart-surviving storage of the task list.
///
/// All methods are async: the task store suspends at each call but never
/// runs two of its own operations concurrently, so implementations only
/// need to serialize access to their own connection or file.
pub trait TaskBackend: Send + Sync {
    /// Ensures the storage structure exists. Idempotent; safe to call on
    /// every startup.
    fn initialize(&self) -> impl std::future::Future<Output = Result<(), StorageError>> + Send;

    /// Returns every persisted task in stable storage-insertion order.
    ///
    /// Returns an empty list if nothing has been persisted yet.
    fn load_all(&self) -> impl std::future::Future<Output = Result<Vec<Task>, StorageError>> + Send;

    /// Persists a new record atomically, assigns it an id, and returns the
    /// full task. Either the whole record is stored or none of it.
    fn insert(
        &self,
        new: &NewTask,
    ) -> impl std::future::Future<Output = Result<Task, StorageError>> + Send;

    /// Persists a new completion flag and the correspondingly derived
    /// status for the record matching `id`.
    ///
    /// Returns [`StorageError::TaskNotFound`] if no such record exists.
    fn update_completion(
        &self,
        id: TaskId,
        completed: bool,
    ) -> impl std::future::Future<Output = Result<(), StorageError>> + Send;
}
