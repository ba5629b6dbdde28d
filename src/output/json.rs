use serde_json::{json, Value};

use crate::error::TaskerError;
use crate::models::Task;

pub fn success(data: Value) -> Value {
    json!({
        "success": true,
        "data": data
    })
}

pub fn error(err: &TaskerError) -> Value {
    let mut body = json!({
        "code": err.code.as_str(),
        "message": err.message
    });
    if !err.details.is_empty() {
        body["details"] = json!(err.details);
    }
    json!({
        "success": false,
        "error": body
    })
}

/// Same field names as the HTTP API.
pub fn task_json(t: &Task) -> Value {
    json!({
        "id": t.id,
        "title": t.title,
        "description": t.description,
        "status": t.status.as_str(),
        "priority": t.priority.as_str(),
        "created_at": t.created_at,
        "updated_at": t.updated_at
    })
}

pub fn task_list_json(tasks: &[Task]) -> Value {
    json!({
        "tasks": tasks.iter().map(task_json).collect::<Vec<_>>(),
        "total": tasks.len()
    })
}

pub fn print(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("Error: failed to render JSON: {e}"),
    }
}
