//! In-memory implementation of [`TaskBackend`] for testing.
//!
//! Not persistent -- all data is lost when the process exits. Ids are
//! sequential from 1, matching the relational backend's assignment scheme.

use tokio::sync::Mutex;

use taskpad_model::{NewTask, Task, TaskId};

use super::{StorageError, TaskBackend};

/// Backend state: the stored list plus the next id to hand out.
struct MemoryInner {
    tasks: Vec<Task>,
    next_id: i64,
}

/// In-memory task storage with sequential id assignment.
pub struct MemoryBackend {
    inner: Mutex<MemoryInner>,
}

impl MemoryBackend {
    /// Creates a new, empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MemoryInner {
                tasks: Vec::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskBackend for MemoryBackend {
    async fn initialize(&self) -> Result<(), StorageError> {
        Ok(())
    }

    async fn load_all(&self) -> Result<Vec<Task>, StorageError> {
        Ok(self.inner.lock().await.tasks.clone())
    }

    async fn insert(&self, new: &NewTask) -> Result<Task, StorageError> {
        let mut inner = self.inner.lock().await;
        let id = TaskId::from_i64(inner.next_id);
        inner.next_id += 1;
        let task = new.clone().into_task(id);
        inner.tasks.push(task.clone());
        Ok(task)
    }

    async fn update_completion(&self, id: TaskId, completed: bool) -> Result<(), StorageError> {
        let mut inner = self.inner.lock().await;
        let Some(task) = inner.tasks.iter_mut().find(|t| t.id == id) else {
            return Err(StorageError::TaskNotFound(id));
        };
        task.set_completed(completed);
        Ok(())
    }
}
