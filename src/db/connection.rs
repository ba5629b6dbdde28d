use std::fs;
use std::path::Path;

use rusqlite::Connection;

use crate::error::TaskerError;

use super::migrations;

/// Open an existing database. Returns error if not initialized.
pub fn open_db(path: &Path) -> Result<Connection, TaskerError> {
    if !path.exists() {
        return Err(TaskerError::not_initialized(&path.display().to_string()));
    }
    let conn = Connection::open(path)?;
    configure_connection(&conn)?;
    migrations::run_migrations(&conn)?;
    Ok(conn)
}

/// Initialize the database: create directories, database, and run migrations.
pub fn init_db(path: &Path) -> Result<Connection, TaskerError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let conn = Connection::open(path)?;
    configure_connection(&conn)?;
    migrations::run_migrations(&conn)?;
    tracing::info!(path = %path.display(), "database ready");
    Ok(conn)
}

/// In-memory database with the schema applied; used by tests.
pub fn open_in_memory() -> Result<Connection, TaskerError> {
    let conn = Connection::open_in_memory()?;
    migrations::run_migrations(&conn)?;
    Ok(conn)
}

fn configure_connection(conn: &Connection) -> Result<(), TaskerError> {
    conn.execute_batch(
        "PRAGMA journal_mode=WAL;
         PRAGMA busy_timeout=5000;",
    )?;
    Ok(())
}
