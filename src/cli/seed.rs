use serde_json::json;

use crate::config::StorageConfig;
use crate::error::TaskerError;
use crate::models::TaskInput;
use crate::output;

/// (title, description, status, priority)
const SAMPLE_TASKS: [(&str, &str, &str, &str); 5] = [
    (
        "Setup project repository",
        "Initialize the repository with basic project structure and configuration files",
        "Done",
        "High",
    ),
    (
        "Design database schema",
        "Create the database schema for tasks, users, and project assignments",
        "In Progress",
        "High",
    ),
    (
        "Implement user authentication",
        "Add login/logout functionality with JWT token-based authentication",
        "TODO",
        "High",
    ),
    (
        "Create task CRUD API",
        "Implement create, read, update, and delete endpoints for task management",
        "In Progress",
        "Medium",
    ),
    (
        "Write unit tests",
        "Add comprehensive unit tests for all API endpoints and business logic",
        "TODO",
        "Low",
    ),
];

pub fn sample_inputs() -> Vec<TaskInput> {
    SAMPLE_TASKS
        .iter()
        .map(|(title, description, status, priority)| {
            TaskInput::titled(*title)
                .with_description(*description)
                .with_status(*status)
                .with_priority(*priority)
        })
        .collect()
}

pub fn run(storage: &StorageConfig, json_output: bool) -> i32 {
    match run_inner(storage, json_output) {
        Ok(code) => code,
        Err(e) => output::report_error(&e, json_output),
    }
}

fn run_inner(storage: &StorageConfig, json_output: bool) -> Result<i32, TaskerError> {
    let service = super::open_service(storage, true)?;
    let mut created = Vec::new();
    for input in sample_inputs() {
        created.push(service.create_task(&input)?);
    }

    if json_output {
        output::json::print(&output::json::success(json!({
            "created": created.iter().map(output::json::task_json).collect::<Vec<_>>()
        })));
    } else {
        println!("Seeded {} tasks into {}", created.len(), storage.location());
        output::text::print_task_list(&created);
    }
    Ok(0)
}
