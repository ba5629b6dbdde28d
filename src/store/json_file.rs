use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Deserialize;

use super::{insert_into, newest_first, remove_from, replace_in, update_in, TaskStore};
use crate::error::TaskerError;
use crate::models::{Priority, Task, TaskInput, TaskStatus};
use crate::reconciler;

/// Tasks kept in memory and mirrored to a pretty-printed JSON array.
///
/// Every mutation rewrites the whole file while holding the write lock; the
/// in-memory copy only changes once the write has succeeded.
#[derive(Debug)]
pub struct JsonFileTaskStore {
    path: PathBuf,
    tasks: RwLock<Vec<Task>>,
}

/// On-disk shape. Older files (hand-written or seeded) may lack timestamps or
/// carry blank enum fields.
#[derive(Debug, Deserialize)]
struct FileRecord {
    id: String,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    priority: String,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl FileRecord {
    fn into_task(self, loaded_at: DateTime<Utc>) -> Result<Task, TaskerError> {
        let status = if self.status.is_empty() {
            TaskStatus::default()
        } else {
            TaskStatus::from_str(&self.status).ok_or_else(|| {
                TaskerError::storage(format!("task {}: bad status '{}'", self.id, self.status))
            })?
        };
        let priority = if self.priority.is_empty() {
            Priority::default()
        } else {
            Priority::from_str(&self.priority).ok_or_else(|| {
                TaskerError::storage(format!("task {}: bad priority '{}'", self.id, self.priority))
            })?
        };
        let created_at = self.created_at.unwrap_or(loaded_at);
        let updated_at = self.updated_at.unwrap_or(created_at).max(created_at);
        Ok(Task {
            id: self.id,
            title: self.title,
            description: self.description,
            status,
            priority,
            created_at,
            updated_at,
        })
    }
}

impl JsonFileTaskStore {
    /// Load `path`. A missing or empty file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, TaskerError> {
        let path = path.into();
        let tasks = load(&path)?;
        tracing::debug!(path = %path.display(), count = tasks.len(), "loaded task file");
        Ok(Self {
            path,
            tasks: RwLock::new(tasks),
        })
    }

    /// Create the file (and parent directories) with an empty array if absent.
    pub fn init(path: impl Into<PathBuf>) -> Result<Self, TaskerError> {
        let path = path.into();
        if !path.exists() {
            save(&path, &[])?;
        }
        Self::open(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn mutate<T>(
        &self,
        apply: impl FnOnce(&mut Vec<Task>) -> Result<T, TaskerError>,
    ) -> Result<T, TaskerError> {
        let mut guard = self.tasks.write();
        let mut staged = guard.clone();
        let out = apply(&mut staged)?;
        save(&self.path, &staged)?;
        *guard = staged;
        Ok(out)
    }
}

fn load(path: &Path) -> Result<Vec<Task>, TaskerError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    let records: Vec<FileRecord> = serde_json::from_str(&content)?;
    let loaded_at = reconciler::now();
    records
        .into_iter()
        .map(|r| r.into_task(loaded_at))
        .collect()
}

fn save(path: &Path, tasks: &[Task]) -> Result<(), TaskerError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(tasks)?;
    let staging = path.with_extension("json.tmp");
    fs::write(&staging, content)?;
    fs::rename(&staging, path)?;
    Ok(())
}

impl TaskStore for JsonFileTaskStore {
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
        self.mutate(|tasks| insert_into(tasks, task))
    }

    fn replace(&self, id: &str, task: Task) -> Result<Task, TaskerError> {
        self.mutate(|tasks| replace_in(tasks, id, task))
    }

    fn apply_update(&self, id: &str, input: &TaskInput, at: DateTime<Utc>) -> Result<Task, TaskerError> {
        self.mutate(|tasks| update_in(tasks, id, input, at))
    }

    fn remove(&self, id: &str) -> Result<(), TaskerError> {
        self.mutate(|tasks| remove_from(tasks, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample(id: &str) -> Task {
        let now = reconciler::now();
        Task {
            id: id.to_string(),
            title: format!("title {id}"),
            description: String::new(),
            status: TaskStatus::Todo,
            priority: Priority::Medium,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_missing_and_empty_files_are_empty_stores() {
        let dir = TempDir::new().unwrap();
        let missing = JsonFileTaskStore::open(dir.path().join("nope.json")).unwrap();
        assert!(missing.get_all().unwrap().is_empty());

        let empty_path = dir.path().join("empty.json");
        fs::write(&empty_path, "").unwrap();
        let empty = JsonFileTaskStore::open(&empty_path).unwrap();
        assert!(empty.get_all().unwrap().is_empty());
    }

    #[test]
    fn test_mutations_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.json");
        let store = JsonFileTaskStore::open(&path).unwrap();
        store.insert(sample("TASK-001")).unwrap();
        store.insert(sample("TASK-002")).unwrap();
        store.remove("TASK-001").unwrap();

        let reopened = JsonFileTaskStore::open(&path).unwrap();
        let ids: Vec<_> = reopened.get_all().unwrap().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["TASK-002"]);
    }

    #[test]
    fn test_partial_update_is_written_through() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.json");
        let store = JsonFileTaskStore::open(&path).unwrap();
        store.insert(sample("TASK-001")).unwrap();
        store
            .apply_update("TASK-001", &TaskInput::default().with_status("Done"), reconciler::now())
            .unwrap();
        store
            .apply_update("TASK-001", &TaskInput::default().with_priority("High"), reconciler::now())
            .unwrap();

        let reopened = JsonFileTaskStore::open(&path).unwrap().get_by_id("TASK-001").unwrap();
        assert_eq!(reopened.title, "title TASK-001");
        assert_eq!(reopened.status, TaskStatus::Done);
        assert_eq!(reopened.priority, Priority::High);
    }

    #[test]
    fn test_legacy_records_without_timestamps_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.json");
        fs::write(
            &path,
            r#"[{"id":"TASK-001","title":"Old","description":"d","status":"Done","priority":"High"},
                {"id":"TASK-002","title":"Blank enums","status":"","priority":""}]"#,
        )
        .unwrap();
        let store = JsonFileTaskStore::open(&path).unwrap();
        let old = store.get_by_id("TASK-001").unwrap();
        assert_eq!(old.status, TaskStatus::Done);
        assert_eq!(old.priority, Priority::High);
        assert!(old.created_at <= old.updated_at);

        let blank = store.get_by_id("TASK-002").unwrap();
        assert_eq!(blank.status, TaskStatus::Todo);
        assert_eq!(blank.priority, Priority::Medium);
    }

    #[test]
    fn test_invalid_status_in_file_is_a_storage_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, r#"[{"id":"TASK-001","title":"x","status":"Bogus"}]"#).unwrap();
        let err = JsonFileTaskStore::open(&path).unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::StorageError);
    }

    #[test]
    fn test_failed_lookup_leaves_file_untouched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.json");
        let store = JsonFileTaskStore::init(&path).unwrap();
        store.insert(sample("TASK-001")).unwrap();
        let before = fs::read_to_string(&path).unwrap();

        assert!(store.remove("TASK-404").unwrap_err().is_not_found());
        assert_eq!(fs::read_to_string(&path).unwrap(), before);
    }
}
