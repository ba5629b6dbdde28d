use serde_json::json;

use crate::cli::commands::TaskCommands;
use crate::config::StorageConfig;
use crate::error::TaskerError;
use crate::models::TaskInput;
use crate::output;

pub fn run(cmd: TaskCommands, storage: &StorageConfig, json_output: bool) -> i32 {
    let result = match cmd {
        TaskCommands::List => run_list(storage, json_output),
        TaskCommands::Show { id } => run_show(&id, storage, json_output),
        TaskCommands::Add {
            title,
            description,
            status,
            priority,
        } => {
            let input = input_from(Some(title), description, status, priority);
            run_add(&input, storage, json_output)
        }
        TaskCommands::Update {
            id,
            title,
            description,
            status,
            priority,
        } => {
            let input = input_from(title, description, status, priority);
            run_update(&id, &input, storage, json_output)
        }
        TaskCommands::Delete { id } => run_delete(&id, storage, json_output),
    };
    match result {
        Ok(code) => code,
        Err(e) => output::report_error(&e, json_output),
    }
}

/// Flags that were not given become empty strings, i.e. "not provided".
fn input_from(
    title: Option<String>,
    description: Option<String>,
    status: Option<String>,
    priority: Option<String>,
) -> TaskInput {
    TaskInput {
        title: title.unwrap_or_default(),
        description: description.unwrap_or_default(),
        status: status.unwrap_or_default(),
        priority: priority.unwrap_or_default(),
    }
}

fn run_list(storage: &StorageConfig, json_output: bool) -> Result<i32, TaskerError> {
    let service = super::open_service(storage, false)?;
    let tasks = service.list_tasks()?;
    if json_output {
        output::json::print(&output::json::success(output::json::task_list_json(&tasks)));
    } else {
        output::text::print_task_list(&tasks);
    }
    Ok(0)
}

fn run_show(id: &str, storage: &StorageConfig, json_output: bool) -> Result<i32, TaskerError> {
    let service = super::open_service(storage, false)?;
    let task = service.get_task(id)?;
    if json_output {
        output::json::print(&output::json::success(json!({
            "task": output::json::task_json(&task)
        })));
    } else {
        output::text::print_task(&task);
    }
    Ok(0)
}

fn run_add(input: &TaskInput, storage: &StorageConfig, json_output: bool) -> Result<i32, TaskerError> {
    let service = super::open_service(storage, false)?;
    let task = service.create_task(input)?;
    if json_output {
        output::json::print(&output::json::success(json!({
            "task": output::json::task_json(&task)
        })));
    } else {
        println!("Added task: {} ({})", task.title, task.id);
    }
    Ok(0)
}

fn run_update(
    id: &str,
    input: &TaskInput,
    storage: &StorageConfig,
    json_output: bool,
) -> Result<i32, TaskerError> {
    let service = super::open_service(storage, false)?;
    let task = service.update_task(id, input)?;
    if json_output {
        output::json::print(&output::json::success(json!({
            "task": output::json::task_json(&task)
        })));
    } else {
        println!("Updated task: {} ({})", task.title, task.id);
    }
    Ok(0)
}

fn run_delete(id: &str, storage: &StorageConfig, json_output: bool) -> Result<i32, TaskerError> {
    let service = super::open_service(storage, false)?;
    service.delete_task(id)?;
    if json_output {
        output::json::print(&output::json::success(json!({
            "deleted": { "id": id }
        })));
    } else {
        println!("Deleted task: {id}");
    }
    Ok(0)
}
