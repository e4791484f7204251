//! Integration tests for the task store over real backends.
//!
//! Validates the observable contract of the core:
//! - counter always matches the post-mutation task list
//! - toggle is an involution and never touches other fields
//! - write failures leave the in-memory list and counter unchanged
//! - state survives a restart (new store over the same storage)

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::path::PathBuf;

use taskpad::seed::SeedClient;
use taskpad::storage::{JsonFileBackend, SqliteBackend, StorageError, TaskBackend};
use taskpad::store::{TaskError, TaskStore};
use taskpad_model::{NewTask, Priority, Task, TaskId, TaskStatus};

/// Creates a unique path under the temp dir for each test.
fn temp_path(name: &str, ext: &str) -> PathBuf {
    let dir = std::env::temp_dir().join("taskpad-integ-store");
    dir.join(format!("{name}-{}.{ext}", std::process::id()))
}

/// A backend whose writes always fail, for error-path tests.
struct FailingBackend;

impl TaskBackend for FailingBackend {
    async fn initialize(&self) -> Result<(), StorageError> {
        Ok(())
    }

    async fn load_all(&self) -> Result<Vec<Task>, StorageError> {
        Ok(vec![
            NewTask::new("pre-existing", None, Priority::Low).into_task(TaskId::from_i64(1)),
        ])
    }

    async fn insert(&self, _new: &NewTask) -> Result<Task, StorageError> {
        Err(StorageError::Io(std::io::Error::other("disk full")))
    }

    async fn update_completion(&self, _id: TaskId, _completed: bool) -> Result<(), StorageError> {
        Err(StorageError::Io(std::io::Error::other("disk full")))
    }
}

// ---------------------------------------------------------------------------
// Core flow against SQLite
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_then_toggle_full_flow() {
    let backend = SqliteBackend::open_in_memory().expect("open");
    let mut store = TaskStore::new(backend);
    store.load().await.expect("load");

    let task = store
        .create("Buy milk", Some("2025-06-01".to_string()), Priority::High)
        .await
        .expect("create");
    assert_eq!(store.tasks().len(), 1);
    assert_eq!(store.counter().current(), 1);

    let done = store.toggle_completion(task.id).await.expect("toggle");
    assert!(done.completed);
    assert_eq!(done.status, TaskStatus::Done);
    assert_eq!(store.counter().current(), 0);

    let back = store.toggle_completion(task.id).await.expect("toggle back");
    assert_eq!(back, task);
    assert_eq!(store.counter().current(), 1);
}

#[tokio::test]
async fn counter_subscriber_sees_final_value_of_each_operation() {
    let backend = SqliteBackend::open_in_memory().expect("open");
    let mut store = TaskStore::new(backend);
    store.load().await.expect("load");

    let mut rx = store.counter().subscribe();

    store.create("A", None, Priority::Low).await.expect("A");
    rx.changed().await.expect("notified");
    assert_eq!(*rx.borrow(), 1);

    store.create("B", None, Priority::Low).await.expect("B");
    rx.changed().await.expect("notified");
    assert_eq!(*rx.borrow(), 2);
}

#[tokio::test]
async fn state_survives_restart_on_sqlite() {
    let path = temp_path("restart-sqlite", "db");
    let _ = std::fs::remove_file(&path);

    let id = {
        let mut store = TaskStore::new(SqliteBackend::open(&path).expect("open"));
        store.load().await.expect("load");
        let a = store.create("keep", None, Priority::Medium).await.expect("create");
        store.create("other", None, Priority::Low).await.expect("create");
        store.toggle_completion(a.id).await.expect("toggle");
        a.id
    };

    // "Restart": a fresh store over the same database file.
    let mut store = TaskStore::new(SqliteBackend::open(&path).expect("reopen"));
    store.load().await.expect("reload");

    assert_eq!(store.tasks().len(), 2);
    let kept = store.tasks().iter().find(|t| t.id == id).expect("kept task");
    assert!(kept.completed);
    assert_eq!(kept.status, TaskStatus::Done);
    assert_eq!(kept.priority, Priority::Medium);
    assert_eq!(store.counter().current(), 1);

    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn state_survives_restart_on_json_blob() {
    let path = temp_path("restart-json", "json");
    let _ = std::fs::remove_file(&path);

    {
        let mut store = TaskStore::new(JsonFileBackend::new(&path));
        store.load().await.expect("load");
        let task = store.create("blob task", None, Priority::Low).await.expect("create");
        store.toggle_completion(task.id).await.expect("toggle");
    }

    let mut store = TaskStore::new(JsonFileBackend::new(&path));
    store.load().await.expect("reload");
    assert_eq!(store.tasks().len(), 1);
    assert!(store.tasks()[0].completed);
    assert_eq!(store.counter().current(), 0);

    let _ = std::fs::remove_file(&path);
}

// ---------------------------------------------------------------------------
// Failure paths
// ---------------------------------------------------------------------------

#[tokio::test]
async fn failed_insert_leaves_list_and_counter_unchanged() {
    let mut store = TaskStore::new(FailingBackend);
    store.load().await.expect("load");
    assert_eq!(store.tasks().len(), 1);
    assert_eq!(store.counter().current(), 1);

    let err = store
        .create("doomed", None, Priority::Low)
        .await
        .expect_err("insert should fail");
    assert!(matches!(err, TaskError::Storage(_)));

    // No phantom task, no stale counter.
    assert_eq!(store.tasks().len(), 1);
    assert_eq!(store.tasks()[0].title, "pre-existing");
    assert_eq!(store.counter().current(), 1);
}

#[tokio::test]
async fn failed_update_retains_no_optimistic_toggle() {
    let mut store = TaskStore::new(FailingBackend);
    store.load().await.expect("load");
    let id = store.tasks()[0].id;

    let err = store
        .toggle_completion(id)
        .await
        .expect_err("update should fail");
    assert!(matches!(err, TaskError::Storage(_)));

    assert!(!store.tasks()[0].completed);
    assert_eq!(store.tasks()[0].status, TaskStatus::Todo);
    assert_eq!(store.counter().current(), 1);
}

#[tokio::test]
async fn load_with_no_records_and_failing_seed_yields_empty_store() {
    // Port 9 (discard) refuses connections; the fetch fails fast and is
    // swallowed by load().
    let seed = SeedClient::new("http://127.0.0.1:9/todos").expect("build client");
    let backend = SqliteBackend::open_in_memory().expect("open");
    let mut store = TaskStore::new(backend).with_seed(seed);

    store.load().await.expect("load despite seed failure");
    assert!(store.tasks().is_empty());
    assert_eq!(store.counter().current(), 0);
}
