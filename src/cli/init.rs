use serde_json::json;

use crate::config::StorageConfig;
use crate::output;

pub fn run(storage: &StorageConfig, json_output: bool) -> i32 {
    match storage.init_store() {
        Ok(()) => {
            let location = storage.location();
            if json_output {
                output::json::print(&output::json::success(json!({
                    "storage": storage.kind.as_str(),
                    "path": location
                })));
            } else {
                println!("Initialized {} storage at {location}", storage.kind.as_str());
            }
            0
        }
        Err(e) => output::report_error(&e, json_output),
    }
}
