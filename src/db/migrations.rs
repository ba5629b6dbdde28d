use rusqlite::Connection;

use crate::error::TaskerError;

pub fn run_migrations(conn: &Connection) -> Result<(), TaskerError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS tasks (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL CHECK (length(trim(title)) > 0),
            description TEXT NOT NULL DEFAULT '',
            status TEXT NOT NULL DEFAULT 'TODO'
                CHECK (status IN ('TODO', 'In Progress', 'Done')),
            priority TEXT NOT NULL DEFAULT 'Medium'
                CHECK (priority IN ('Low', 'Medium', 'High')),
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            CHECK (created_at <= updated_at)
        );

        CREATE INDEX IF NOT EXISTS idx_tasks_created_at ON tasks(created_at);
        ",
    )?;
    Ok(())
}
