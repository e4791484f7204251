//! One-time remote seeding of an empty task list.
//!
//! On a first run with nothing persisted, the store fetches a fixed
//! todo-list document over HTTP and maps each entry into a task. The fetch
//! happens at most once (its absence-of-records trigger can only fire on
//! first run), is never retried, and its failure is never fatal: the list
//! simply starts empty.

use std::time::Duration;

use serde::Deserialize;

use taskpad_model::{NewTask, Priority, TaskStatus};

/// Default seed endpoint returning `{ "todos": [ { id, todo, completed } ] }`.
pub const DEFAULT_SEED_URL: &str = "https://dummyjson.com/todos";

/// Timeout applied to the single seed request.
const SEED_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that can occur during the one-time seed fetch.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    /// The HTTP request failed or returned a non-success status.
    #[error("seed request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The response body was not a valid seed document.
    #[error("seed response parse failed: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Response body of the seed endpoint.
#[derive(Debug, Deserialize)]
struct SeedDocument {
    todos: Vec<SeedTodo>,
}

/// One entry of the seed document.
#[derive(Debug, Deserialize)]
struct SeedTodo {
    /// Remote id, unused; the local backend assigns its own.
    #[allow(dead_code)]
    id: i64,
    todo: String,
    completed: bool,
}

/// Maps a seed entry to a local task record: `priority` defaults to low,
/// the due date to none, and `status` is derived from `completed`.
fn map_todo(todo: SeedTodo) -> NewTask {
    NewTask {
        title: todo.todo,
        due_date: None,
        priority: Priority::Low,
        status: TaskStatus::from_completed(todo.completed),
        completed: todo.completed,
    }
}

/// HTTP client for the seed endpoint.
pub struct SeedClient {
    client: reqwest::Client,
    url: String,
}

impl SeedClient {
    /// Creates a client for the given endpoint URL.
    ///
    /// # Errors
    ///
    /// Returns [`SeedError`] if the underlying HTTP client cannot be built.
    pub fn new(url: impl Into<String>) -> Result<Self, SeedError> {
        let client = reqwest::Client::builder().timeout(SEED_TIMEOUT).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Performs the single GET and maps the document into task records, in
    /// document order.
    ///
    /// # Errors
    ///
    /// Returns [`SeedError`] on a network failure, non-success status, or
    /// unparseable body. Callers log the error and continue with an empty
    /// list; there is no retry.
    pub async fn fetch(&self) -> Result<Vec<NewTask>, SeedError> {
        let body = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        let doc: SeedDocument = serde_json::from_str(&body)?;
        Ok(doc.todos.into_iter().map(map_todo).collect())
    }
}
