//! Process wiring: which backend to open and where the server listens.
//!
//! Values come from CLI flags, falling back to environment variables (a `.env`
//! file is honoured) and then to the defaults below.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::ValueEnum;

use crate::db::SqliteTaskStore;
use crate::error::TaskerError;
use crate::store::{JsonFileTaskStore, MemoryTaskStore, TaskStore};

pub const DEFAULT_DB_PATH: &str = "tasker.db";
pub const DEFAULT_DATA_FILE: &str = "data.json";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_CORS_ORIGINS: [&str; 2] = ["http://localhost:5173", "http://localhost:5174"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum StorageKind {
    /// Process-local; contents are lost on exit
    Memory,
    /// Pretty-printed JSON array in a flat file
    Json,
    /// SQLite database
    #[default]
    Sqlite,
}

impl StorageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Json => "json",
            Self::Sqlite => "sqlite",
        }
    }
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub kind: StorageKind,
    pub db_path: PathBuf,
    pub data_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            kind: StorageKind::default(),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
        }
    }
}

impl StorageConfig {
    /// Human-readable location of the configured backend.
    pub fn location(&self) -> String {
        match self.kind {
            StorageKind::Memory => ":memory:".to_string(),
            StorageKind::Json => self.data_file.display().to_string(),
            StorageKind::Sqlite => self.db_path.display().to_string(),
        }
    }

    /// Open the configured backend. With `create`, a missing SQLite database is
    /// created; otherwise it is a `NOT_INITIALIZED` error.
    pub fn open_store(&self, create: bool) -> Result<Box<dyn TaskStore>, TaskerError> {
        let store: Box<dyn TaskStore> = match self.kind {
            StorageKind::Memory => Box::new(MemoryTaskStore::new()),
            StorageKind::Json => Box::new(JsonFileTaskStore::open(&self.data_file)?),
            StorageKind::Sqlite if create => Box::new(SqliteTaskStore::init(&self.db_path)?),
            StorageKind::Sqlite => Box::new(SqliteTaskStore::open(&self.db_path)?),
        };
        tracing::debug!(storage = self.kind.as_str(), location = %self.location(), "store opened");
        Ok(store)
    }

    /// Create the backing file or database if it does not exist yet.
    pub fn init_store(&self) -> Result<(), TaskerError> {
        match self.kind {
            StorageKind::Memory => {}
            StorageKind::Json => {
                JsonFileTaskStore::init(&self.data_file)?;
            }
            StorageKind::Sqlite => {
                SqliteTaskStore::init(&self.db_path)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect(),
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> Result<SocketAddr, TaskerError> {
        let raw = if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        };
        raw.parse()
            .map_err(|e| TaskerError::config(format!("invalid server address {raw}: {e}")))
    }
}
