use parking_lot::Mutex;

use crate::error::TaskerError;
use crate::models::Task;

pub const ID_PREFIX: &str = "TASK-";

/// Hands out `TASK-NNN` identifiers. The counter is only touched under its lock,
/// so concurrent creates never receive the same id.
#[derive(Debug)]
pub struct IdGenerator {
    /// `None` once every `u64` suffix has been handed out.
    next: Mutex<Option<u64>>,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(next: u64) -> Self {
        Self {
            next: Mutex::new(Some(next.max(1))),
        }
    }

    /// Seed the counter past every `TASK-<digits>` id already in storage.
    pub fn from_tasks(existing: &[Task]) -> Self {
        let highest = existing
            .iter()
            .filter_map(|t| parse_suffix(&t.id))
            .max()
            .unwrap_or(0);
        Self {
            next: Mutex::new(highest.checked_add(1)),
        }
    }

    /// Consumes one sequence value, even if the caller later discards the id.
    pub fn next_id(&self) -> Result<String, TaskerError> {
        let mut next = self.next.lock();
        let current = next.ok_or_else(|| TaskerError::storage("task id sequence exhausted"))?;
        *next = current.checked_add(1);
        Ok(format_id(current))
    }

    /// The value the next call to `next_id` will use, if any remain.
    pub fn peek(&self) -> Option<u64> {
        *self.next.lock()
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn format_id(n: u64) -> String {
    format!("{ID_PREFIX}{n:03}")
}

/// Numeric suffix of a `TASK-<digits>` id; anything else yields `None`.
pub fn parse_suffix(id: &str) -> Option<u64> {
    let digits = id.strip_prefix(ID_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
