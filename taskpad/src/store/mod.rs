//! In-memory task store: the single place mutations are applied.
//!
//! `TaskStore` owns the authoritative task list for the running session
//! and writes every mutation through its storage backend before touching
//! the in-memory state, so a failed write never leaves a phantom task or a
//! stale counter behind. Every operation takes `&mut self`; two operations
//! can therefore never interleave their read-modify-write sequences.

use taskpad_model::{MAX_TASK_TITLE_LENGTH, NewTask, Priority, Task, TaskId};

use crate::counter::{IncompleteCounter, recompute};
use crate::seed::SeedClient;
use crate::storage::{StorageError, TaskBackend};

/// Errors that can occur during task store operations.
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    /// Task title cannot be empty.
    #[error("task title cannot be empty")]
    TitleEmpty,

    /// Task title exceeds the maximum length.
    #[error("task title too long (max 256 characters)")]
    TitleTooLong,

    /// No task with the given id is in the list.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// A mutation was attempted before `load` completed.
    #[error("task store used before load()")]
    NotLoaded,

    /// The storage backend failed; the in-memory list is unchanged.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Owns the in-memory task list and the derived incomplete-count.
///
/// Generic over the storage backend, which is selected once at startup;
/// nothing here depends on which backend is active.
pub struct TaskStore<B: TaskBackend> {
    backend: B,
    tasks: Vec<Task>,
    loaded: bool,
    counter: IncompleteCounter,
    seed: Option<SeedClient>,
}

impl<B: TaskBackend> TaskStore<B> {
    /// Creates a store over the given backend. Call [`load`](Self::load)
    /// before any mutation.
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            tasks: Vec::new(),
            loaded: false,
            counter: IncompleteCounter::new(),
            seed: None,
        }
    }

    /// Enables the one-time remote seed for first runs with no persisted
    /// records.
    #[must_use]
    pub fn with_seed(mut self, seed: SeedClient) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Initializes storage and replaces the in-memory list wholesale with
    /// the persisted records, then publishes the recomputed counter.
    ///
    /// On a first run (zero persisted records) with seeding enabled, the
    /// seed document is fetched once and inserted through the backend; a
    /// failed fetch is logged and leaves the list empty. Seeding can never
    /// trigger again once any record is persisted.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::Storage`] if the backend cannot be initialized
    /// or read. Seed fetch failures are not errors.
    pub async fn load(&mut self) -> Result<(), TaskError> {
        self.backend.initialize().await?;
        let mut tasks = self.backend.load_all().await?;

        if tasks.is_empty() && let Some(seed) = &self.seed {
            match seed.fetch().await {
                Ok(entries) => {
                    for new in &entries {
                        self.backend.insert(new).await?;
                    }
                    tasks = self.backend.load_all().await?;
                    tracing::info!(count = tasks.len(), "seeded task list from remote");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "seed fetch failed, starting with an empty task list");
                }
            }
        }

        self.tasks = tasks;
        self.loaded = true;
        self.counter.publish(recompute(&self.tasks));
        Ok(())
    }

    /// Creates a new task: validates the title, persists the record, then
    /// prepends it (most-recent-first) and publishes the recomputed
    /// counter. Returns the task with its backend-assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::TitleEmpty`] or [`TaskError::TitleTooLong`]
    /// before any persistence call, [`TaskError::NotLoaded`] if `load` has
    /// not completed, or [`TaskError::Storage`] if the write fails (the
    /// in-memory list is left unchanged).
    pub async fn create(
        &mut self,
        title: &str,
        due_date: Option<String>,
        priority: Priority,
    ) -> Result<Task, TaskError> {
        self.ensure_loaded()?;
        if title.is_empty() {
            return Err(TaskError::TitleEmpty);
        }
        if title.chars().count() > MAX_TASK_TITLE_LENGTH {
            return Err(TaskError::TitleTooLong);
        }

        let new = NewTask::new(title, due_date, priority);
        let task = self.backend.insert(&new).await?;
        self.tasks.insert(0, task.clone());
        self.counter.publish(recompute(&self.tasks));

        tracing::debug!(id = %task.id, "task created");
        Ok(task)
    }

    /// Flips the completion flag of the task with `id`: persists the new
    /// flag and derived status first, then applies the same change to the
    /// in-memory copy and publishes the recomputed counter. All other
    /// fields are untouched. Returns the updated task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::TaskNotFound`] if the id is absent (no state
    /// change), [`TaskError::NotLoaded`] if `load` has not completed, or
    /// [`TaskError::Storage`] if the write fails (the in-memory list is
    /// left unchanged; no optimistic update is retained).
    pub async fn toggle_completion(&mut self, id: TaskId) -> Result<Task, TaskError> {
        self.ensure_loaded()?;
        let idx = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(TaskError::TaskNotFound(id))?;
        let completed = !self.tasks[idx].completed;

        self.backend.update_completion(id, completed).await?;

        self.tasks[idx].set_completed(completed);
        self.counter.publish(recompute(&self.tasks));

        tracing::debug!(id = %id, completed, "task completion toggled");
        Ok(self.tasks[idx].clone())
    }

    /// The current in-memory task list, most-recent-first for tasks
    /// created this session.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// The derived incomplete-count publisher.
    #[must_use]
    pub fn counter(&self) -> &IncompleteCounter {
        &self.counter
    }

    fn ensure_loaded(&self) -> Result<(), TaskError> {
        if self.loaded {
            Ok(())
        } else {
            Err(TaskError::NotLoaded)
        }
    }
}
