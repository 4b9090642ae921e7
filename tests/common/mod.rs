//! Common test utilities for taskweave integration tests.
//!
//! Provides `TestEnv` for isolated test environments that don't touch the
//! user's real data or config directories.

#![allow(dead_code)]

use assert_cmd::Command;
pub use tempfile::TempDir;

/// A test environment with isolated data storage.
///
/// The `tw()` method returns a `Command` that sets `TW_DATA_DIR` to a
/// per-environment temp directory and points `TW_CONFIG` at a nonexistent
/// file so the user's config never leaks in. Per-invocation env vars keep
/// tests parallel-safe.
pub struct TestEnv {
    pub data_dir: TempDir,
}

impl TestEnv {
    /// Create a new test environment with an isolated data directory.
    pub fn new() -> Self {
        Self {
            data_dir: TempDir::new().unwrap(),
        }
    }

    /// Create a new test environment and initialize storage.
    pub fn init() -> Self {
        let env = Self::new();
        env.tw().arg("init").assert().success();
        env
    }

    /// Get a Command for the tw binary with isolated data directory.
    pub fn tw(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_tw"));
        cmd.env("TW_DATA_DIR", self.data_dir.path());
        cmd.env("TW_CONFIG", self.data_dir.path().join("no-config.toml"));
        cmd
    }

    /// Get the path to the data directory.
    pub fn data_path(&self) -> &std::path::Path {
        self.data_dir.path()
    }

    /// Create a project and return its id.
    pub fn create_project(&self, name: &str) -> String {
        let output = self
            .tw()
            .args(["project", "create", name])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
        json["id"].as_str().unwrap().to_string()
    }

    /// Parse a command's stdout as JSON.
    pub fn json_output(&self, args: &[&str]) -> serde_json::Value {
        let output = self
            .tw()
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&output).unwrap()
    }

    /// Append raw task rows to tasks.jsonl, bypassing the CLI.
    ///
    /// Used to stage dependency shapes (dangling refs, cycles) the normal
    /// generate flow would repair away.
    pub fn write_raw_tasks(&self, rows: &[serde_json::Value]) {
        use std::io::Write;
        let path = self.data_dir.path().join("tasks.jsonl");
        let mut file = std::fs::OpenOptions::new()
            .append(true)
            .open(path)
            .unwrap();
        for row in rows {
            writeln!(file, "{}", row).unwrap();
        }
    }

    /// A raw task row with the given id, status, and dependencies.
    pub fn raw_task(id: &str, project_id: &str, title: &str, status: &str, deps: &[&str]) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "title": title,
            "description": "",
            "status": status,
            "priority": "medium",
            "dependencies": deps,
            "estimated_time": "1 hour",
            "project_id": project_id,
            "created_at": "2026-01-01T00:00:00Z",
            "updated_at": "2026-01-01T00:00:00Z",
        })
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
