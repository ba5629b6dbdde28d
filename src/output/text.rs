use crate::error::TaskerError;
use crate::models::Task;

pub fn print_task(t: &Task) {
    println!("Task: {} ({})", t.title, t.id);
    if !t.description.is_empty() {
        println!("  Description: {}", t.description);
    }
    println!("  Status: {}", t.status.as_str());
    println!("  Priority: {}", t.priority.as_str());
    println!("  Created: {}", t.created_at.to_rfc3339());
    println!("  Updated: {}", t.updated_at.to_rfc3339());
}

pub fn print_task_list(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }
    for t in tasks {
        println!(
            "  {:<9} [{}] {} ({})",
            t.id,
            t.status.as_str(),
            t.title,
            t.priority.as_str()
        );
    }
}

pub fn print_error(err: &TaskerError) {
    eprintln!("Error: {}", err.message);
    for (field, message) in &err.details {
        eprintln!("  {field}: {message}");
    }
}
