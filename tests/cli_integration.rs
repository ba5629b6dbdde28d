#[allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

// ─── helpers ───────────────────────────────────────────────────────

struct TestEnv {
    dir: TempDir,
    storage: &'static str,
}

impl TestEnv {
    fn new() -> Self {
        Self::with_storage("sqlite")
    }

    fn with_storage(storage: &'static str) -> Self {
        let dir = TempDir::new().expect("create tempdir");
        Self { dir, storage }
    }

    fn db_path(&self) -> PathBuf {
        self.dir.path().join("tasker.db")
    }

    fn data_file(&self) -> PathBuf {
        self.dir.path().join("data.json")
    }

    #[allow(deprecated)]
    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("tasker").expect("binary");
        cmd.current_dir(self.dir.path())
            .env_remove("TASKER_STORAGE")
            .env_remove("TASKER_DB")
            .env_remove("TASKER_DATA_FILE")
            .env_remove("RUST_LOG")
            .args(["--storage", self.storage])
            .arg("--db")
            .arg(self.db_path())
            .arg("--data-file")
            .arg(self.data_file());
        cmd
    }

    fn run_json(&self, args: &[&str]) -> Value {
        let mut a: Vec<&str> = args.to_vec();
        a.push("--json");
        let output = self.cmd().args(&a).output().expect("run");
        let stdout = String::from_utf8_lossy(&output.stdout);
        serde_json::from_str(&stdout)
            .unwrap_or_else(|e| panic!("parse JSON failed: {e}\nstdout: {stdout}"))
    }

    fn run_ok(&self, args: &[&str]) -> Value {
        let v = self.run_json(args);
        assert_eq!(v["success"], true, "expected success=true: {v}");
        v
    }

    fn run_err(&self, args: &[&str]) -> Value {
        let v = self.run_json(args);
        assert_eq!(v["success"], false, "expected success=false: {v}");
        v
    }

    fn add(&self, title: &str) -> String {
        let v = self.run_ok(&["task", "add", title]);
        v["data"]["task"]["id"].as_str().unwrap().to_string()
    }
}

// ─── 1. init ───────────────────────────────────────────────────────

#[test]
fn test_init_sqlite() {
    let env = TestEnv::new();
    let v = env.run_ok(&["init"]);
    assert_eq!(v["data"]["storage"], "sqlite");
    assert!(v["data"]["path"].as_str().unwrap().ends_with("tasker.db"));
    assert!(env.db_path().exists());
}

#[test]
fn test_init_idempotent() {
    let env = TestEnv::new();
    env.run_ok(&["init"]);
    env.add("survives re-init");
    env.run_ok(&["init"]);
    let v = env.run_ok(&["task", "list"]);
    assert_eq!(v["data"]["total"], 1);
}

#[test]
fn test_init_required_before_task_commands() {
    let env = TestEnv::new();
    let v = env.run_err(&["task", "list"]);
    assert_eq!(v["error"]["code"], "NOT_INITIALIZED");
}

#[test]
fn test_init_json_creates_empty_array() {
    let env = TestEnv::with_storage("json");
    env.run_ok(&["init"]);
    let content = fs::read_to_string(env.data_file()).unwrap();
    let parsed: Value = serde_json::from_str(&content).unwrap();
    assert_eq!(parsed, serde_json::json!([]));
}

// ─── 2. task add / show / list ─────────────────────────────────────

#[test]
fn test_task_add_defaults() {
    let env = TestEnv::new();
    env.run_ok(&["init"]);
    let v = env.run_ok(&["task", "add", "First task"]);
    let task = &v["data"]["task"];
    assert_eq!(task["id"], "TASK-001");
    assert_eq!(task["status"], "TODO");
    assert_eq!(task["priority"], "Medium");
    assert_eq!(task["created_at"], task["updated_at"]);
}

#[test]
fn test_task_add_with_fields() {
    let env = TestEnv::new();
    env.run_ok(&["init"]);
    let v = env.run_ok(&[
        "task", "add", "Ship it", "--description", "release", "--status", "In Progress", "--priority", "High",
    ]);
    let task = &v["data"]["task"];
    assert_eq!(task["description"], "release");
    assert_eq!(task["status"], "In Progress");
    assert_eq!(task["priority"], "High");
}

#[test]
fn test_task_add_validation_error() {
    let env = TestEnv::new();
    env.run_ok(&["init"]);
    let v = env.run_err(&["task", "add", "  ", "--status", "Bogus"]);
    assert_eq!(v["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(v["error"]["details"]["title"], "title is required");
    assert_eq!(
        v["error"]["details"]["status"],
        "status must be one of: TODO, In Progress, Done"
    );
    let v = env.run_ok(&["task", "list"]);
    assert_eq!(v["data"]["total"], 0);
}

#[test]
fn test_ids_continue_across_invocations() {
    let env = TestEnv::new();
    env.run_ok(&["init"]);
    assert_eq!(env.add("one"), "TASK-001");
    assert_eq!(env.add("two"), "TASK-002");
    env.run_ok(&["task", "delete", "TASK-002"]);
    // The counter restarts from the highest stored id.
    assert_eq!(env.add("three"), "TASK-002");
    assert_eq!(env.add("four"), "TASK-003");
}

#[test]
fn test_task_show_and_list() {
    let env = TestEnv::new();
    env.run_ok(&["init"]);
    let id = env.add("Show me");
    env.add("Newer");

    let v = env.run_ok(&["task", "show", &id]);
    assert_eq!(v["data"]["task"]["title"], "Show me");

    let v = env.run_ok(&["task", "list"]);
    let tasks = v["data"]["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0]["title"], "Newer");
    assert_eq!(tasks[1]["title"], "Show me");
}

#[test]
fn test_task_show_not_found() {
    let env = TestEnv::new();
    env.run_ok(&["init"]);
    let v = env.run_err(&["task", "show", "TASK-404"]);
    assert_eq!(v["error"]["code"], "TASK_NOT_FOUND");
}

// ─── 3. task update ────────────────────────────────────────────────

#[test]
fn test_task_update_partial() {
    let env = TestEnv::new();
    env.run_ok(&["init"]);
    let id = env.add("A");
    let created = env.run_ok(&["task", "show", &id]);

    let v = env.run_ok(&["task", "update", &id, "--status", "Done"]);
    let task = &v["data"]["task"];
    assert_eq!(task["title"], "A");
    assert_eq!(task["status"], "Done");
    assert_eq!(task["created_at"], created["data"]["task"]["created_at"]);
    assert_ne!(task["updated_at"], created["data"]["task"]["updated_at"]);
}

#[test]
fn test_task_update_blank_title_rejected() {
    let env = TestEnv::new();
    env.run_ok(&["init"]);
    let id = env.add("Keep");
    let v = env.run_err(&["task", "update", &id, "--title", "   "]);
    assert_eq!(
        v["error"]["details"]["title"],
        "title cannot be empty or whitespace only"
    );
    let v = env.run_ok(&["task", "update", &id, "--title", ""]);
    assert_eq!(v["data"]["task"]["title"], "Keep");
}

#[test]
fn test_task_update_not_found() {
    let env = TestEnv::new();
    env.run_ok(&["init"]);
    let v = env.run_err(&["task", "update", "does-not-exist", "--title", "x"]);
    assert_eq!(v["error"]["code"], "TASK_NOT_FOUND");
}

// ─── 4. task delete ────────────────────────────────────────────────

#[test]
fn test_task_delete_twice() {
    let env = TestEnv::new();
    env.run_ok(&["init"]);
    let id = env.add("Gone soon");
    let v = env.run_ok(&["task", "delete", &id]);
    assert_eq!(v["data"]["deleted"]["id"], id.as_str());
    let v = env.run_err(&["task", "delete", &id]);
    assert_eq!(v["error"]["code"], "TASK_NOT_FOUND");
}

// ─── 5. seed ───────────────────────────────────────────────────────

#[test]
fn test_seed_creates_sample_tasks() {
    let env = TestEnv::new();
    let v = env.run_ok(&["seed"]);
    let created = v["data"]["created"].as_array().unwrap();
    assert_eq!(created.len(), 5);
    assert_eq!(created[0]["id"], "TASK-001");
    assert_eq!(created[0]["status"], "Done");
    assert_eq!(created[4]["id"], "TASK-005");
    assert_eq!(created[4]["priority"], "Low");

    assert_eq!(env.add("after seed"), "TASK-006");
}

// ─── 6. json backend ───────────────────────────────────────────────

#[test]
fn test_json_backend_persists_to_file() {
    let env = TestEnv::with_storage("json");
    let id = env.add("In a file");
    env.run_ok(&["task", "update", &id, "--priority", "High"]);

    let content = fs::read_to_string(env.data_file()).unwrap();
    let parsed: Value = serde_json::from_str(&content).unwrap();
    assert_eq!(parsed[0]["id"], "TASK-001");
    assert_eq!(parsed[0]["priority"], "High");
}

#[test]
fn test_json_backend_bootstraps_from_legacy_file() {
    let env = TestEnv::with_storage("json");
    fs::write(
        env.data_file(),
        r#"[{"id":"TASK-005","title":"Legacy","description":"","status":"TODO","priority":"Low"}]"#,
    )
    .unwrap();
    assert_eq!(env.add("next"), "TASK-006");
}

#[test]
fn test_corrupt_data_file_reports_generic_storage_error() {
    let env = TestEnv::with_storage("json");
    fs::write(env.data_file(), "{not json").unwrap();

    let v = env.run_err(&["task", "list"]);
    assert_eq!(v["error"]["code"], "STORAGE_ERROR");
    assert_eq!(v["error"]["message"], "storage operation failed");

    env.cmd()
        .args(["task", "list"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error: storage operation failed"));
}

// ─── 7. text output / help ─────────────────────────────────────────

#[test]
fn test_text_output() {
    let env = TestEnv::new();
    env.cmd().arg("init").assert().success();
    env.cmd()
        .args(["task", "add", "Plain output"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added task: Plain output (TASK-001)"));
    env.cmd()
        .args(["task", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("TASK-001"))
        .stdout(predicate::str::contains("[TODO]"));
    env.cmd()
        .args(["task", "show", "TASK-404"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("task not found"));
}

#[test]
fn test_empty_list_message() {
    let env = TestEnv::new();
    env.cmd().arg("init").assert().success();
    env.cmd()
        .args(["task", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No tasks found."));
}

#[test]
fn test_help_mentions_routes() {
    let env = TestEnv::new();
    env.cmd()
        .args(["serve", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("POST   /tasks"));
}
