//! Integration tests for init and project CRUD via the CLI.

mod common;

use common::TestEnv;
use predicates::prelude::*;

#[test]
fn test_init_creates_storage() {
    let env = TestEnv::new();

    env.tw()
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"initialized\":true"));

    assert!(env.data_path().join("projects.jsonl").exists());
    assert!(env.data_path().join("tasks.jsonl").exists());
}

#[test]
fn test_init_already_initialized() {
    let env = TestEnv::init();

    env.tw()
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"initialized\":false"));
}

#[test]
fn test_init_human_readable() {
    let env = TestEnv::new();

    env.tw()
        .args(["init", "-H"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized taskweave"));
}

#[test]
fn test_commands_require_init() {
    let env = TestEnv::new();

    env.tw()
        .args(["project", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not initialized"));
}

#[test]
fn test_project_create_json() {
    let env = TestEnv::init();

    env.tw()
        .args(["project", "create", "My app"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\":\"My app\""))
        .stdout(predicate::str::contains("\"status\":\"active\""));
}

#[test]
fn test_project_create_human() {
    let env = TestEnv::init();

    env.tw()
        .args(["-H", "project", "create", "My app"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created project"))
        .stdout(predicate::str::contains("\"My app\""));
}

#[test]
fn test_project_list() {
    let env = TestEnv::init();
    env.create_project("First");
    env.create_project("Second");

    let json = env.json_output(&["project", "list"]);
    let projects = json["projects"].as_array().unwrap();
    assert_eq!(projects.len(), 2);
    assert_eq!(projects[0]["name"], "First");
    assert_eq!(projects[1]["name"], "Second");
}

#[test]
fn test_project_list_empty() {
    let env = TestEnv::init();

    env.tw()
        .args(["-H", "project", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0 project(s)"));
}
