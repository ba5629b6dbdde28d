//! Validation and merge rules for task create/update requests.
//!
//! [`TaskService`] is the single entry point callers use: it validates input in
//! full before touching storage, asks the [`IdGenerator`] for ids on create,
//! and hands partial updates to [`TaskStore::apply_update`], which merges them
//! with [`merge`] inside the store's own critical section.

use chrono::{DateTime, Duration, SubsecRound, Utc};

use crate::error::{FieldErrors, TaskerError};
use crate::ids::IdGenerator;
use crate::models::{Priority, Task, TaskInput, TaskStatus};
use crate::store::TaskStore;

pub const TITLE_REQUIRED: &str = "title is required";
pub const TITLE_BLANK: &str = "title cannot be empty or whitespace only";
pub const STATUS_INVALID: &str = "status must be one of: TODO, In Progress, Done";
pub const PRIORITY_INVALID: &str = "priority must be one of: Low, Medium, High";

/// Current time at the precision every backend can store.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

pub fn validate_create(input: &TaskInput) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if input.title.trim().is_empty() {
        errors.insert("title".into(), TITLE_REQUIRED.into());
    }
    check_enums(input, &mut errors);
    errors
}

/// Empty fields mean "leave unchanged", so only provided values are checked.
pub fn validate_update(input: &TaskInput) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if !input.title.is_empty() && input.title.trim().is_empty() {
        errors.insert("title".into(), TITLE_BLANK.into());
    }
    check_enums(input, &mut errors);
    errors
}

fn check_enums(input: &TaskInput, errors: &mut FieldErrors) {
    if !input.status.is_empty() && TaskStatus::from_str(&input.status).is_none() {
        errors.insert("status".into(), STATUS_INVALID.into());
    }
    if !input.priority.is_empty() && Priority::from_str(&input.priority).is_none() {
        errors.insert("priority".into(), PRIORITY_INVALID.into());
    }
}

fn ensure_valid(errors: FieldErrors) -> Result<(), TaskerError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(TaskerError::validation(errors))
    }
}

/// Apply the non-empty fields of a validated `input` onto `existing`.
///
/// `id` and `created_at` are never touched; `updated_at` always moves forward.
pub fn merge(existing: &Task, input: &TaskInput, at: DateTime<Utc>) -> Task {
    let mut merged = existing.clone();
    if !input.title.is_empty() {
        merged.title = input.title.clone();
    }
    if !input.description.is_empty() {
        merged.description = input.description.clone();
    }
    if let Some(status) = TaskStatus::from_str(&input.status) {
        merged.status = status;
    }
    if let Some(priority) = Priority::from_str(&input.priority) {
        merged.priority = priority;
    }
    merged.updated_at = advance_updated_at(existing.updated_at, at);
    merged
}

/// `at`, or one microsecond past `previous` when the clock has not moved.
pub fn advance_updated_at(previous: DateTime<Utc>, at: DateTime<Utc>) -> DateTime<Utc> {
    if at > previous {
        at
    } else {
        previous + Duration::microseconds(1)
    }
}

/// Build a new task from validated create input.
pub fn build(id: String, input: &TaskInput, at: DateTime<Utc>) -> Task {
    Task {
        id,
        title: input.title.clone(),
        description: input.description.clone(),
        status: TaskStatus::from_str(&input.status).unwrap_or_default(),
        priority: Priority::from_str(&input.priority).unwrap_or_default(),
        created_at: at,
        updated_at: at,
    }
}

pub struct TaskService<S> {
    store: S,
    ids: IdGenerator,
}

impl<S: TaskStore> TaskService<S> {
    pub fn new(store: S, ids: IdGenerator) -> Self {
        Self { store, ids }
    }

    /// Wire a service whose id counter starts past everything already stored.
    pub fn open(store: S) -> Result<Self, TaskerError> {
        let existing = store.get_all()?;
        let ids = IdGenerator::from_tasks(&existing);
        tracing::info!(
            existing = existing.len(),
            next_id = ?ids.peek(),
            "id generator initialized"
        );
        Ok(Self::new(store, ids))
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn ids(&self) -> &IdGenerator {
        &self.ids
    }

    pub fn list_tasks(&self) -> Result<Vec<Task>, TaskerError> {
        self.store.get_all()
    }

    pub fn get_task(&self, id: &str) -> Result<Task, TaskerError> {
        self.store.get_by_id(id)
    }

    pub fn create_task(&self, input: &TaskInput) -> Result<Task, TaskerError> {
        ensure_valid(validate_create(input))?;
        let task = build(self.ids.next_id()?, input, now());
        let stored = self.store.insert(task)?;
        tracing::debug!(id = %stored.id, "task created");
        Ok(stored)
    }

    pub fn update_task(&self, id: &str, input: &TaskInput) -> Result<Task, TaskerError> {
        ensure_valid(validate_update(input))?;
        let stored = self.store.apply_update(id, input, now())?;
        tracing::debug!(id = %stored.id, "task updated");
        Ok(stored)
    }

    pub fn delete_task(&self, id: &str) -> Result<(), TaskerError> {
        self.store.remove(id)?;
        tracing::debug!(id, "task deleted");
        Ok(())
    }
}
