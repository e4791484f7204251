//! Core task types for Taskpad.
//!
//! Defines the [`Task`] entity persisted by the storage backends, the
//! [`NewTask`] record used before an id has been assigned, and the fixed
//! enums for priority and completion status. The `status`/`completed` pair
//! is always written through [`Task::set_completed`] so the two fields can
//! never disagree.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Maximum allowed task title length in characters.
pub const MAX_TASK_TITLE_LENGTH: usize = 256;

/// Unique identifier for a task, assigned by the storage backend.
///
/// The SQLite backend uses the auto-incremented rowid; the JSON file
/// backend uses wall-clock milliseconds bumped past the current maximum.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct TaskId(i64);

impl TaskId {
    /// Creates a `TaskId` from a raw integer.
    #[must_use]
    pub const fn from_i64(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw integer value.
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when parsing a [`Priority`] from text fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown priority {0:?} (expected low, medium, or high)")]
pub struct ParsePriorityError(String);

/// Task priority, fixed to three levels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Default priority for new tasks.
    #[default]
    Low,
    /// Middle priority.
    Medium,
    /// Highest priority.
    High,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

impl FromStr for Priority {
    type Err = ParsePriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(ParsePriorityError(other.to_string())),
        }
    }
}

/// Error returned when parsing a [`TaskStatus`] from text fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown status {0:?} (expected to-do or done)")]
pub struct ParseStatusError(String);

/// Completion status of a task.
///
/// Kept in lock-step with the boolean `completed` flag: `Done` iff
/// `completed == true`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Task is open.
    #[serde(rename = "to-do")]
    Todo,
    /// Task has been completed.
    #[serde(rename = "done")]
    Done,
}

impl TaskStatus {
    /// Derives the status from a completion flag.
    #[must_use]
    pub const fn from_completed(completed: bool) -> Self {
        if completed { Self::Done } else { Self::Todo }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Todo => write!(f, "to-do"),
            Self::Done => write!(f, "done"),
        }
    }
}

impl FromStr for TaskStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "to-do" => Ok(Self::Todo),
            "done" => Ok(Self::Done),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

/// A to-do item as stored and rendered.
///
/// `id` is immutable after creation. `status` and `completed` always agree;
/// mutate them only through [`set_completed`](Self::set_completed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Backend-assigned identifier, unique within the store.
    pub id: TaskId,
    /// Task title, non-empty.
    pub title: String,
    /// Optional due date in `YYYY-MM-DD` form. Not validated.
    #[serde(rename = "date")]
    pub due_date: Option<String>,
    /// Task priority.
    pub priority: Priority,
    /// Status derived from `completed`.
    pub status: TaskStatus,
    /// Authoritative completion flag.
    pub completed: bool,
}

impl Task {
    /// Sets the completion flag and the derived status together.
    pub fn set_completed(&mut self, completed: bool) {
        self.completed = completed;
        self.status = TaskStatus::from_completed(completed);
    }
}

/// A task record before the storage backend has assigned an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    /// Task title, non-empty.
    pub title: String,
    /// Optional due date in `YYYY-MM-DD` form.
    pub due_date: Option<String>,
    /// Task priority.
    pub priority: Priority,
    /// Status derived from `completed`.
    pub status: TaskStatus,
    /// Completion flag. `false` for user-created tasks; seeded tasks may
    /// arrive already completed.
    pub completed: bool,
}

impl NewTask {
    /// Builds a record for a freshly created task: open, not completed.
    #[must_use]
    pub fn new(title: impl Into<String>, due_date: Option<String>, priority: Priority) -> Self {
        Self {
            title: title.into(),
            due_date,
            priority,
            status: TaskStatus::Todo,
            completed: false,
        }
    }

    /// Attaches a backend-assigned id, producing the full [`Task`].
    #[must_use]
    pub fn into_task(self, id: TaskId) -> Task {
        Task {
            id,
            title: self.title,
            due_date: self.due_date,
            priority: self.priority,
            status: self.status,
            completed: self.completed,
        }
    }
}
