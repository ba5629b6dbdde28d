use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use super::{insert_into, newest_first, remove_from, replace_in, update_in, TaskStore};
use crate::error::TaskerError;
use crate::models::{Task, TaskInput};

/// Process-local store. Reads share the lock; mutations take it exclusively.
#[derive(Debug, Default)]
pub struct MemoryTaskStore {
    tasks: RwLock<Vec<Task>>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tasks in creation order.
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks: RwLock::new(tasks),
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.read().is_empty()
    }
}

impl TaskStore for MemoryTaskStore {
    fn get_all(&self) -> Result<Vec<Task>, TaskerError> {
        Ok(newest_first(&self.tasks.read()))
    }

    fn get_by_id(&self, id: &str) -> Result<Task, TaskerError> {
        self.tasks
            .read()
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| TaskerError::task_not_found(id))
    }

    fn insert(&self, task: Task) -> Result<Task, TaskerError> {
        insert_into(&mut self.tasks.write(), task)
    }

    fn replace(&self, id: &str, task: Task) -> Result<Task, TaskerError> {
        replace_in(&mut self.tasks.write(), id, task)
    }

    fn apply_update(&self, id: &str, input: &TaskInput, at: DateTime<Utc>) -> Result<Task, TaskerError> {
        update_in(&mut self.tasks.write(), id, input, at)
    }

    fn remove(&self, id: &str) -> Result<(), TaskerError> {
        remove_from(&mut self.tasks.write(), id)
    }
}
