//! JSON-blob implementation of [`TaskBackend`].
//!
//! The legacy/alternate backend: the whole task list lives in one file as a
//! serialized JSON array (the key-value layout of the original
//! application). Writes go through a temp file and an atomic rename so a
//! crash mid-write never leaves a partial record observable.
//!
//! Ids are wall-clock milliseconds, bumped past the current maximum when
//! two inserts land in the same millisecond, so they stay unique and
//! monotonic within the file.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::sync::Mutex;

use taskpad_model::codec;
use taskpad_model::{NewTask, Task, TaskId};

use super::{StorageError, TaskBackend};

/// File-based backend storing the task list as a single JSON blob.
pub struct JsonFileBackend {
    path: PathBuf,
    /// Serializes read-modify-write cycles on the blob.
    file_lock: Mutex<()>,
}

impl JsonFileBackend {
    /// Creates a backend reading and writing the blob at `path`.
    ///
    /// The file is not touched until the first write; a missing file reads
    /// as an empty task list.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file_lock: Mutex::new(()),
        }
    }

    /// Returns the current wall-clock time in milliseconds since epoch.
    fn now_ms() -> i64 {
        i64::try_from(
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_millis(),
        )
        .unwrap_or(i64::MAX)
    }

    /// Reads the whole blob; a missing file is an empty list.
    fn read_list(path: &Path) -> Result<Vec<Task>, StorageError> {
        match std::fs::read_to_string(path) {
            Ok(blob) => Ok(codec::decode_list(&blob)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Rewrites the whole blob atomically: write a temp file, then rename
    /// it over the target.
    fn write_list(path: &Path, tasks: &[Task]) -> Result<(), StorageError> {
        let blob = codec::encode_list(tasks)?;
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, blob)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }
}

impl TaskBackend for JsonFileBackend {
    async fn initialize(&self) -> Result<(), StorageError> {
        // An existing blob is left untouched; only the parent directory is
        // guaranteed here so the first write can succeed.
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    async fn load_all(&self) -> Result<Vec<Task>, StorageError> {
        let _guard = self.file_lock.lock().await;
        Self::read_list(&self.path)
    }

    async fn insert(&self, new: &NewTask) -> Result<Task, StorageError> {
        let _guard = self.file_lock.lock().await;
        let mut tasks = Self::read_list(&self.path)?;
        let max_id = tasks.iter().map(|t| t.id.as_i64()).max().unwrap_or(0);
        let id = TaskId::from_i64(Self::now_ms().max(max_id + 1));
        let task = new.clone().into_task(id);
        tasks.push(task.clone());
        Self::write_list(&self.path, &tasks)?;
        Ok(task)
    }

    async fn update_completion(&self, id: TaskId, completed: bool) -> Result<(), StorageError> {
        let _guard = self.file_lock.lock().await;
        let mut tasks = Self::read_list(&self.path)?;
        let Some(task) = tasks.iter_mut().find(|t| t.id == id) else {
            return Err(StorageError::TaskNotFound(id));
        };
        task.set_completed(completed);
        Self::write_list(&self.path, &tasks)
    }
}
