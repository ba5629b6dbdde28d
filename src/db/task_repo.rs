use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use parking_lot::Mutex;
use rusqlite::types::Type;
use rusqlite::{params, Connection, TransactionBehavior};

use crate::db::connection;
use crate::error::TaskerError;
use crate::models::{Priority, Task, TaskInput, TaskStatus};
use crate::reconciler;
use crate::store::TaskStore;

const TASK_COLUMNS: &str = "id, title, description, status, priority, created_at, updated_at";

pub fn create_task(conn: &Connection, task: &Task) -> Result<Task, TaskerError> {
    let sql = format!(
        "INSERT INTO tasks (id, title, description, status, priority, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         RETURNING {TASK_COLUMNS}"
    );
    let created = conn.query_row(
        &sql,
        params![
            task.id,
            task.title,
            task.description,
            task.status.as_str(),
            task.priority.as_str(),
            format_timestamp(&task.created_at),
            format_timestamp(&task.updated_at),
        ],
        row_to_task,
    )?;
    Ok(created)
}

pub fn get_task_by_id(conn: &Connection, id: &str) -> Result<Task, TaskerError> {
    conn.query_row(
        &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
        params![id],
        row_to_task,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => TaskerError::task_not_found(id),
        _ => TaskerError::from(e),
    })
}

/// Newest first; rowid breaks ties between tasks created in the same microsecond.
pub fn list_tasks(conn: &Connection) -> Result<Vec<Task>, TaskerError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks ORDER BY created_at DESC, rowid DESC"
    ))?;
    let tasks = stmt
        .query_map([], row_to_task)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(tasks)
}

/// Overwrite the mutable columns in one statement and return the stored row.
pub fn update_task(conn: &Connection, id: &str, task: &Task) -> Result<Task, TaskerError> {
    let sql = format!(
        "UPDATE tasks
         SET title = ?1, description = ?2, status = ?3, priority = ?4, updated_at = ?5
         WHERE id = ?6
         RETURNING {TASK_COLUMNS}"
    );
    conn.query_row(
        &sql,
        params![
            task.title,
            task.description,
            task.status.as_str(),
            task.priority.as_str(),
            format_timestamp(&task.updated_at),
            id,
        ],
        row_to_task,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => TaskerError::task_not_found(id),
        _ => TaskerError::from(e),
    })
}

/// Apply a partial update: empty input fields keep the stored column.
///
/// Runs in an immediate transaction so that the `updated_at` read and the
/// write cannot interleave with another writer on the same database file.
pub fn merge_task(
    conn: &mut Connection,
    id: &str,
    input: &TaskInput,
    at: DateTime<Utc>,
) -> Result<Task, TaskerError> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let existing = get_task_by_id(&tx, id)?;
    let updated_at = reconciler::advance_updated_at(existing.updated_at, at);
    let sql = format!(
        "UPDATE tasks
         SET title = COALESCE(NULLIF(?1, ''), title),
             description = COALESCE(NULLIF(?2, ''), description),
             status = COALESCE(NULLIF(?3, ''), status),
             priority = COALESCE(NULLIF(?4, ''), priority),
             updated_at = ?5
         WHERE id = ?6
         RETURNING {TASK_COLUMNS}"
    );
    let merged = tx.query_row(
        &sql,
        params![
            input.title,
            input.description,
            input.status,
            input.priority,
            format_timestamp(&updated_at),
            id,
        ],
        row_to_task,
    )?;
    tx.commit()?;
    Ok(merged)
}

pub fn delete_task(conn: &Connection, id: &str) -> Result<(), TaskerError> {
    let affected = conn.execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
    if affected == 0 {
        return Err(TaskerError::task_not_found(id));
    }
    Ok(())
}

/// Fixed-width RFC 3339 so that text ordering matches time ordering.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn row_to_task(row: &rusqlite::Row) -> rusqlite::Result<Task> {
    let status: String = row.get(3)?;
    let priority: String = row.get(4)?;
    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        status: TaskStatus::from_str(&status)
            .ok_or_else(|| conversion_error(3, format!("unknown status '{status}'")))?,
        priority: Priority::from_str(&priority)
            .ok_or_else(|| conversion_error(4, format!("unknown priority '{priority}'")))?,
        created_at: parse_timestamp(row, 5)?,
        updated_at: parse_timestamp(row, 6)?,
    })
}

fn parse_timestamp(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn conversion_error(idx: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, message.into())
}

/// [`TaskStore`] over a single SQLite connection.
pub struct SqliteTaskStore {
    conn: Mutex<Connection>,
}

impl SqliteTaskStore {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    pub fn open(path: &Path) -> Result<Self, TaskerError> {
        Ok(Self::new(connection::open_db(path)?))
    }

    pub fn init(path: &Path) -> Result<Self, TaskerError> {
        Ok(Self::new(connection::init_db(path)?))
    }

    pub fn in_memory() -> Result<Self, TaskerError> {
        Ok(Self::new(connection::open_in_memory()?))
    }
}

impl TaskStore for SqliteTaskStore {
    fn get_all(&self) -> Result<Vec<Task>, TaskerError> {
        list_tasks(&self.conn.lock())
    }

    fn get_by_id(&self, id: &str) -> Result<Task, TaskerError> {
        get_task_by_id(&self.conn.lock(), id)
    }

    fn insert(&self, task: Task) -> Result<Task, TaskerError> {
        create_task(&self.conn.lock(), &task)
    }

    fn replace(&self, id: &str, task: Task) -> Result<Task, TaskerError> {
        update_task(&self.conn.lock(), id, &task)
    }

    fn apply_update(&self, id: &str, input: &TaskInput, at: DateTime<Utc>) -> Result<Task, TaskerError> {
        merge_task(&mut self.conn.lock(), id, input, at)
    }

    fn remove(&self, id: &str) -> Result<(), TaskerError> {
        delete_task(&self.conn.lock(), id)
    }
}
