pub mod commands;
pub mod init;
pub mod seed;
pub mod serve;
pub mod task;

pub use commands::*;

use crate::config::StorageConfig;
use crate::error::TaskerError;
use crate::reconciler::TaskService;
use crate::store::TaskStore;

/// Open the configured store and bootstrap the id counter from it.
pub fn open_service(
    storage: &StorageConfig,
    create: bool,
) -> Result<TaskService<Box<dyn TaskStore>>, TaskerError> {
    TaskService::open(storage.open_store(create)?)
}
