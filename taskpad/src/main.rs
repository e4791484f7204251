//! Taskpad — local-first to-do list.
//!
//! Thin CLI over the task store: every subcommand loads the store (seeding
//! on a true first run), applies at most one mutation, and renders the
//! result. All state lives in the configured storage backend.
//!
//! ```bash
//! # Add a task
//! cargo run --bin taskpad -- add "Buy milk" --due 2025-06-01 --priority high
//!
//! # Toggle it done (ids come from `list`)
//! cargo run --bin taskpad -- toggle 1
//!
//! # Show the list and the badge count
//! cargo run --bin taskpad -- list
//! cargo run --bin taskpad -- count
//!
//! # Use the legacy JSON blob backend instead of SQLite
//! TASKPAD_BACKEND=json cargo run --bin taskpad -- list
//! ```

use std::path::Path;

use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;

use taskpad::config::{AppConfig, BackendKind, CliArgs, Command};
use taskpad::counter::format_badge;
use taskpad::seed::SeedClient;
use taskpad::storage::{JsonFileBackend, SqliteBackend, TaskBackend};
use taskpad::store::{TaskError, TaskStore};
use taskpad_model::Task;

#[tokio::main]
async fn main() {
    let cli = CliArgs::parse();

    // Load config from CLI args + config file + env vars + defaults.
    let config = match AppConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            std::process::exit(1);
        }
    };

    // Initialize logging with the resolved log level. The guard must be
    // held until shutdown so buffered file logs are flushed.
    let _log_guard = init_logging(&config.log_level, cli.log_file.as_deref());

    if let Err(e) = run(cli.command, &config).await {
        tracing::error!(error = %e, "command failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Initialize logging to stderr, or to a file when `--log-file` is given.
///
/// Returns a [`WorkerGuard`] for the file case; it must be held until
/// shutdown to ensure all buffered log entries are flushed.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let Some(log_path) = file_path else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
        return None;
    };

    let log_dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}

/// Builds the configured backend and dispatches the subcommand through it.
async fn run(command: Command, config: &AppConfig) -> Result<(), TaskError> {
    match config.backend {
        BackendKind::Sqlite => {
            let backend = SqliteBackend::open(config.db_path())?;
            dispatch(command, make_store(backend, config)).await
        }
        BackendKind::Json => {
            let backend = JsonFileBackend::new(config.blob_path());
            dispatch(command, make_store(backend, config)).await
        }
    }
}

/// Wraps a backend in a task store, attaching the seed client when
/// first-run seeding is enabled.
fn make_store<B: TaskBackend>(backend: B, config: &AppConfig) -> TaskStore<B> {
    let store = TaskStore::new(backend);
    if !config.seed_enabled {
        return store;
    }
    match SeedClient::new(config.seed_url.clone()) {
        Ok(seed) => store.with_seed(seed),
        Err(e) => {
            tracing::warn!(error = %e, "seed client unavailable, skipping first-run seed");
            store
        }
    }
}

/// Loads the store, applies the subcommand, and prints the outcome.
async fn dispatch<B: TaskBackend>(
    command: Command,
    mut store: TaskStore<B>,
) -> Result<(), TaskError> {
    store.load().await?;

    match command {
        Command::Add {
            title,
            due,
            priority,
        } => {
            let task = store.create(&title, due, priority).await?;
            println!("Added task {}: {}", task.id, task.title);
        }
        Command::Toggle { id } => {
            let task = store
                .toggle_completion(taskpad_model::TaskId::from_i64(id))
                .await?;
            println!("Task {} is now {}", task.id, task.status);
        }
        Command::List => {
            for task in store.tasks() {
                println!("{}", render_line(task));
            }
        }
        Command::Count => {
            println!("{}", format_badge(store.counter().current()));
        }
    }

    tracing::debug!(incomplete = store.counter().current(), "command complete");
    Ok(())
}

/// One list line: checkbox, id, title, then priority and due date.
fn render_line(task: &Task) -> String {
    let marker = if task.completed { "x" } else { " " };
    let due = task.due_date.as_deref().unwrap_or("-");
    format!(
        "[{marker}] {:>4}  {}  ({}, due {due})",
        task.id.as_i64(),
        task.title,
        task.priority
    )
}
