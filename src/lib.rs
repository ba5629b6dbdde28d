//! `tasker`: a task-management REST API with sequential `TASK-NNN` ids and
//! field-level partial updates over pluggable storage.

#![deny(rustdoc::broken_intra_doc_links)]

pub mod api;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod ids;
pub mod models;
pub mod output;
pub mod reconciler;
pub mod store;

pub use error::{ErrorCode, TaskerError};
pub use ids::IdGenerator;
pub use models::{Priority, Task, TaskInput, TaskStatus};
pub use reconciler::TaskService;
pub use store::TaskStore;
