use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{ServerConfig, StorageConfig, StorageKind, DEFAULT_PORT};

const VERSION: &str = env!("TASKER_VERSION");

#[derive(Parser)]
#[command(
    name = "tasker",
    version = VERSION,
    about = "Task-management REST API and CLI",
    after_help = "\
STORAGE:
  sqlite (default)  --db <path>, created by `tasker init` or on `tasker serve`
  json              --data-file <path>, missing or empty file means no tasks
  memory            lost on exit; useful with `serve` for demos

TASK IDS:
  Tasks are numbered TASK-001, TASK-002, ... The counter resumes after the
  highest id already stored, so restarts never reuse an id.

PARTIAL UPDATES:
  `task update` only changes the fields you pass. An empty value means
  \"leave unchanged\"; a title of only whitespace is rejected.

EXIT CODES:
  0  Success
  1  Error (validation, not found, storage, configuration)"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Storage backend
    #[arg(long, global = true, value_enum, env = "TASKER_STORAGE", default_value = "sqlite")]
    pub storage: StorageKind,

    /// SQLite database path
    #[arg(long, global = true, env = "TASKER_DB", default_value = crate::config::DEFAULT_DB_PATH)]
    pub db: PathBuf,

    /// JSON data file path
    #[arg(long, global = true, env = "TASKER_DATA_FILE", default_value = crate::config::DEFAULT_DATA_FILE)]
    pub data_file: PathBuf,
}

impl Cli {
    pub fn storage_config(&self) -> StorageConfig {
        StorageConfig {
            kind: self.storage,
            db_path: self.db.clone(),
            data_file: self.data_file.clone(),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the REST API
    #[command(after_help = "\
ROUTES:
  GET    /             health check
  GET    /tasks        list tasks (newest first)
  GET    /tasks/{id}   fetch one task
  POST   /tasks        create a task            (201)
  PUT    /tasks/{id}   partially update a task  (200)
  DELETE /tasks/{id}   delete a task            (204)

Stops gracefully on Ctrl+C or SIGTERM.")]
    Serve(ServeArgs),

    /// Create the storage location
    Init,

    /// Add a handful of sample tasks
    Seed,

    /// Task management
    #[command(subcommand)]
    Task(TaskCommands),
}

#[derive(clap::Args)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long, env = "HOST", default_value = crate::config::DEFAULT_HOST)]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Allowed CORS origin (repeatable, or comma-separated in the env var)
    #[arg(
        long = "cors-origin",
        env = "TASKER_CORS_ORIGINS",
        value_delimiter = ',',
        default_values = crate::config::DEFAULT_CORS_ORIGINS
    )]
    pub cors_origins: Vec<String>,
}

impl ServeArgs {
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            host: self.host.clone(),
            port: self.port,
            cors_origins: self.cors_origins.clone(),
        }
    }
}

#[derive(Subcommand)]
pub enum TaskCommands {
    /// List all tasks, newest first
    List,
    /// Show task details
    Show {
        /// Task ID (e.g. TASK-001)
        id: String,
    },
    /// Create a task
    Add {
        /// Task title
        title: String,
        #[arg(long)]
        description: Option<String>,
        /// TODO | "In Progress" | Done (default TODO)
        #[arg(long)]
        status: Option<String>,
        /// Low | Medium | High (default Medium)
        #[arg(long)]
        priority: Option<String>,
    },
    /// Change some fields of a task
    Update {
        /// Task ID
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        priority: Option<String>,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },
}
