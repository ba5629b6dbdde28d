//! Storage contract for tasks and its in-process backends.
//!
//! The SQLite backend lives in [`crate::db`]; the backend is chosen when the
//! process is wired up (see [`crate::config::StorageConfig::open_store`]).

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileTaskStore;
pub use memory::MemoryTaskStore;

use chrono::{DateTime, Utc};

use crate::error::TaskerError;
use crate::models::{Task, TaskInput};
use crate::reconciler;

/// Persistence capabilities the reconciler needs.
///
/// Every backend reports a missing id as [`ErrorCode::TaskNotFound`](crate::error::ErrorCode)
/// and any other failure as a storage error.
pub trait TaskStore: Send + Sync {
    /// All tasks, newest first.
    fn get_all(&self) -> Result<Vec<Task>, TaskerError>;

    fn get_by_id(&self, id: &str) -> Result<Task, TaskerError>;

    /// Persist a new task and return it as stored.
    fn insert(&self, task: Task) -> Result<Task, TaskerError>;

    /// Overwrite the task stored under `id`; `id` and `created_at` are kept.
    fn replace(&self, id: &str, task: Task) -> Result<Task, TaskerError>;

    /// Merge the non-empty fields of validated `input` into the stored task and
    /// return the result. Read and write happen in one critical section, so
    /// concurrent partial updates to different fields all survive.
    fn apply_update(&self, id: &str, input: &TaskInput, at: DateTime<Utc>) -> Result<Task, TaskerError>;

    fn remove(&self, id: &str) -> Result<(), TaskerError>;
}

impl<T: TaskStore + ?Sized> TaskStore for Box<T> {
    fn get_all(&self) -> Result<Vec<Task>, TaskerError> {
        (**self).get_all()
    }

    fn get_by_id(&self, id: &str) -> Result<Task, TaskerError> {
        (**self).get_by_id(id)
    }

    fn insert(&self, task: Task) -> Result<Task, TaskerError> {
        (**self).insert(task)
    }

    fn replace(&self, id: &str, task: Task) -> Result<Task, TaskerError> {
        (**self).replace(id, task)
    }

    fn apply_update(&self, id: &str, input: &TaskInput, at: DateTime<Utc>) -> Result<Task, TaskerError> {
        (**self).apply_update(id, input, at)
    }

    fn remove(&self, id: &str) -> Result<(), TaskerError> {
        (**self).remove(id)
    }
}

/// Shared mutation rules for the vector-backed stores.
pub(crate) fn replace_in(tasks: &mut [Task], id: &str, task: Task) -> Result<Task, TaskerError> {
    let slot = tasks
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or_else(|| TaskerError::task_not_found(id))?;
    slot.title = task.title;
    slot.description = task.description;
    slot.status = task.status;
    slot.priority = task.priority;
    slot.updated_at = task.updated_at;
    Ok(slot.clone())
}

/// Merge against the current vector contents; callers hold the write lock.
pub(crate) fn update_in(
    tasks: &mut [Task],
    id: &str,
    input: &TaskInput,
    at: DateTime<Utc>,
) -> Result<Task, TaskerError> {
    let slot = tasks
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or_else(|| TaskerError::task_not_found(id))?;
    *slot = reconciler::merge(slot, input, at);
    Ok(slot.clone())
}

pub(crate) fn insert_into(tasks: &mut Vec<Task>, task: Task) -> Result<Task, TaskerError> {
    if tasks.iter().any(|t| t.id == task.id) {
        return Err(TaskerError::storage(format!("duplicate task id: {}", task.id)));
    }
    tasks.push(task.clone());
    Ok(task)
}

pub(crate) fn remove_from(tasks: &mut Vec<Task>, id: &str) -> Result<(), TaskerError> {
    let index = tasks
        .iter()
        .position(|t| t.id == id)
        .ok_or_else(|| TaskerError::task_not_found(id))?;
    tasks.remove(index);
    Ok(())
}

/// Insertion order is creation order, so newest first is the reverse.
pub(crate) fn newest_first(tasks: &[Task]) -> Vec<Task> {
    tasks.iter().rev().cloned().collect()
}
