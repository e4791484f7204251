//! Backend equivalence tests.
//!
//! The task store must not need to know which backend is active: the same
//! operation sequence against SQLite, the JSON blob, and the in-memory
//! backend yields the same task list contents in the same order. Ids are
//! excluded from the comparison: the assignment scheme is the one
//! documented per-backend divergence.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::path::PathBuf;

use taskpad::storage::{JsonFileBackend, MemoryBackend, SqliteBackend, TaskBackend};
use taskpad::store::TaskStore;
use taskpad_model::{Priority, Task};

/// Creates a unique blob path for each test.
fn temp_blob(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join("taskpad-integ-equiv");
    dir.join(format!("{name}-{}.json", std::process::id()))
}

/// Everything observable about a task except its backend-assigned id.
fn fingerprint(task: &Task) -> (String, Option<String>, String, String, bool) {
    (
        task.title.clone(),
        task.due_date.clone(),
        task.priority.to_string(),
        task.status.to_string(),
        task.completed,
    )
}

/// Runs the shared operation script against a backend and returns the
/// resulting in-memory list (after a reload, so persisted state is what is
/// compared) plus the final counter value.
async fn run_script<B: TaskBackend>(backend: B) -> (Vec<Task>, usize) {
    let mut store = TaskStore::new(backend);
    store.load().await.expect("load");

    store
        .create("Buy milk", Some("2025-06-01".to_string()), Priority::High)
        .await
        .expect("create 1");
    let second = store
        .create("Water plants", None, Priority::Low)
        .await
        .expect("create 2");
    store
        .create("Call the bank", Some("2025-07-15".to_string()), Priority::Medium)
        .await
        .expect("create 3");
    store
        .toggle_completion(second.id)
        .await
        .expect("toggle second");

    store.load().await.expect("reload");
    let tasks = store.tasks().to_vec();
    let count = store.counter().current();
    (tasks, count)
}

#[tokio::test]
async fn same_script_same_list_on_every_backend() {
    let blob = temp_blob("script");
    let _ = std::fs::remove_file(&blob);

    let (sqlite_tasks, sqlite_count) =
        run_script(SqliteBackend::open_in_memory().expect("open")).await;
    let (json_tasks, json_count) = run_script(JsonFileBackend::new(&blob)).await;
    let (memory_tasks, memory_count) = run_script(MemoryBackend::new()).await;

    let sqlite_fp: Vec<_> = sqlite_tasks.iter().map(fingerprint).collect();
    let json_fp: Vec<_> = json_tasks.iter().map(fingerprint).collect();
    let memory_fp: Vec<_> = memory_tasks.iter().map(fingerprint).collect();

    assert_eq!(sqlite_fp, json_fp);
    assert_eq!(sqlite_fp, memory_fp);

    assert_eq!(sqlite_count, 2);
    assert_eq!(json_count, 2);
    assert_eq!(memory_count, 2);

    let _ = std::fs::remove_file(&blob);
}

#[tokio::test]
async fn load_all_order_is_insertion_order_everywhere() {
    let blob = temp_blob("order");
    let _ = std::fs::remove_file(&blob);

    async fn titles_after_reload<B: TaskBackend>(backend: B) -> Vec<String> {
        let mut store = TaskStore::new(backend);
        store.load().await.expect("load");
        for title in ["first", "second", "third"] {
            store.create(title, None, Priority::Low).await.expect("create");
        }
        store.load().await.expect("reload");
        store.tasks().iter().map(|t| t.title.clone()).collect()
    }

    let expected = ["first", "second", "third"];
    assert_eq!(
        titles_after_reload(SqliteBackend::open_in_memory().expect("open")).await,
        expected
    );
    assert_eq!(titles_after_reload(JsonFileBackend::new(&blob)).await, expected);
    assert_eq!(titles_after_reload(MemoryBackend::new()).await, expected);

    let _ = std::fs::remove_file(&blob);
}

#[tokio::test]
async fn insert_load_all_round_trip_includes_assigned_id() {
    let blob = temp_blob("roundtrip");
    let _ = std::fs::remove_file(&blob);

    async fn check<B: TaskBackend>(backend: B) {
        backend.initialize().await.expect("init");
        let inserted = backend
            .insert(&taskpad_model::NewTask::new(
                "Round trip",
                Some("2025-06-01".to_string()),
                Priority::High,
            ))
            .await
            .expect("insert");
        let loaded = backend.load_all().await.expect("load");
        assert_eq!(loaded, vec![inserted]);
    }

    check(SqliteBackend::open_in_memory().expect("open")).await;
    check(JsonFileBackend::new(&blob)).await;
    check(MemoryBackend::new()).await;

    let _ = std::fs::remove_file(&blob);
}
