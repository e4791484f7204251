//! Configuration system for Taskpad.
//!
//! Supports layered configuration with the following priority (highest first):
//! 1. CLI arguments
//! 2. Environment variables (via clap `env` attribute)
//! 3. TOML config file (`~/.config/taskpad/config.toml`)
//! 4. Compiled defaults
//!
//! Missing config file is not an error (defaults are used). An explicit
//! `--config` path that doesn't exist is an error.

use std::path::{Path, PathBuf};

use crate::seed::DEFAULT_SEED_URL;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),
}

/// Which persistence backend stores the task list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Embedded SQLite database (canonical).
    #[default]
    Sqlite,
    /// Single JSON blob file (legacy/alternate).
    Json,
}

// ---------------------------------------------------------------------------
// TOML file structs (all fields Option for partial overrides)
// ---------------------------------------------------------------------------

/// Top-level TOML config file structure.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ConfigFile {
    storage: StorageFileConfig,
    seed: SeedFileConfig,
}

/// `[storage]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct StorageFileConfig {
    backend: Option<BackendKind>,
    data_dir: Option<PathBuf>,
}

/// `[seed]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct SeedFileConfig {
    url: Option<String>,
    enabled: Option<bool>,
}

// ---------------------------------------------------------------------------
// CLI arguments
// ---------------------------------------------------------------------------

/// Subcommands exposed by the `taskpad` binary.
#[derive(clap::Subcommand, Debug, Clone)]
pub enum Command {
    /// Add a new task.
    Add {
        /// Task title (required, non-empty).
        title: String,
        /// Due date in `YYYY-MM-DD` form.
        #[arg(long)]
        due: Option<String>,
        /// Task priority (low, medium, or high).
        #[arg(long, default_value_t = taskpad_model::Priority::Low)]
        priority: taskpad_model::Priority,
    },
    /// Toggle a task between to-do and done.
    Toggle {
        /// Id of the task to toggle.
        id: i64,
    },
    /// List all tasks, most recent first.
    List,
    /// Print the incomplete-task count as the badge renders it.
    Count,
}

/// CLI arguments for the `taskpad` binary.
#[derive(clap::Parser, Debug)]
#[command(version, about = "Local-first to-do list")]
pub struct CliArgs {
    /// What to do.
    #[command(subcommand)]
    pub command: Command,

    /// Persistence backend to use.
    #[arg(long, value_enum, env = "TASKPAD_BACKEND")]
    pub backend: Option<BackendKind>,

    /// Directory holding the task database / blob.
    #[arg(long, env = "TASKPAD_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Path to config file (default: `~/.config/taskpad/config.toml`).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Seed endpoint URL for first runs.
    #[arg(long, env = "TASKPAD_SEED_URL")]
    pub seed_url: Option<String>,

    /// Disable the one-time remote seed on first run.
    #[arg(long)]
    pub no_seed: bool,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", env = "TASKPAD_LOG")]
    pub log_level: String,

    /// Write logs to this file instead of stderr.
    #[arg(long, env = "TASKPAD_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Resolved configuration
// ---------------------------------------------------------------------------

/// Fully resolved application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Which backend stores the task list.
    pub backend: BackendKind,
    /// Directory holding the database / blob.
    pub data_dir: PathBuf,
    /// Seed endpoint URL.
    pub seed_url: String,
    /// Whether first-run seeding is enabled.
    pub seed_enabled: bool,
    /// Log level filter string.
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Sqlite,
            data_dir: default_data_dir(),
            seed_url: DEFAULT_SEED_URL.to_string(),
            seed_enabled: true,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration by merging CLI args, env vars, and a TOML file.
    ///
    /// If `--config` is given and the file does not exist, returns an error.
    /// If no `--config` is given, the default path is tried and a missing
    /// file is treated as empty config.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the explicit config file cannot be read
    /// or parsed.
    pub fn load(cli: &CliArgs) -> Result<Self, ConfigError> {
        let file = load_config_file(cli.config.as_deref())?;
        Ok(Self::resolve(cli, &file))
    }

    /// Resolve an `AppConfig` from CLI args and a parsed config file.
    ///
    /// Priority: CLI > file > default.
    #[must_use]
    fn resolve(cli: &CliArgs, file: &ConfigFile) -> Self {
        let defaults = Self::default();

        Self {
            backend: cli
                .backend
                .or(file.storage.backend)
                .unwrap_or(defaults.backend),
            data_dir: cli
                .data_dir
                .clone()
                .or_else(|| file.storage.data_dir.clone())
                .unwrap_or(defaults.data_dir),
            seed_url: cli
                .seed_url
                .clone()
                .or_else(|| file.seed.url.clone())
                .unwrap_or(defaults.seed_url),
            seed_enabled: if cli.no_seed {
                false
            } else {
                file.seed.enabled.unwrap_or(defaults.seed_enabled)
            },
            log_level: cli.log_level.clone(),
        }
    }

    /// Path of the SQLite database inside the data directory.
    #[must_use]
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("todos.db")
    }

    /// Path of the JSON blob inside the data directory.
    #[must_use]
    pub fn blob_path(&self) -> PathBuf {
        self.data_dir.join("todos.json")
    }
}

/// Default data directory: the platform data dir, or the current directory
/// when none can be determined.
fn default_data_dir() -> PathBuf {
    dirs::data_dir().map_or_else(|| PathBuf::from("."), |d| d.join("taskpad"))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Load and parse a TOML config file.
fn load_config_file(explicit_path: Option<&Path>) -> Result<ConfigFile, ConfigError> {
    let path = if let Some(p) = explicit_path {
        let contents = std::fs::read_to_string(p).map_err(|e| ConfigError::ReadFile {
            path: p.to_path_buf(),
            source: e,
        })?;
        return Ok(toml::from_str(&contents)?);
    } else {
        let Some(config_dir) = dirs::config_dir() else {
            return Ok(ConfigFile::default());
        };
        config_dir.join("taskpad").join("config.toml")
    };

    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ConfigFile::default()),
        Err(e) => Err(ConfigError::ReadFile { path, source: e }),
    }
}
