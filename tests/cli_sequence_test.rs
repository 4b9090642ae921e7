//! Integration tests for the execution animation planner.

mod common;

use common::TestEnv;
use predicates::prelude::*;

#[test]
fn test_sequence_plans_two_hop_path() {
    let env = TestEnv::init();
    let project = env.create_project("App");
    env.write_raw_tasks(&[
        TestEnv::raw_task("tw-aaaa", &project, "Setup tooling", "ready", &[]),
        TestEnv::raw_task("tw-bbbb", &project, "Write tests", "ready", &["tw-aaaa"]),
    ]);

    let json = env.json_output(&["sequence", &project]);
    assert_eq!(json["started"], true);
    // First ready task in input order wins the tie-break.
    assert_eq!(json["target_task"], "tw-aaaa");
    assert_eq!(json["branch"], "branch-0");
    assert_eq!(json["root_edge"], "root->branch-0");
    assert_eq!(json["task_edge"], "branch-0->tw-aaaa");
}

#[test]
fn test_sequence_step_timeline() {
    let env = TestEnv::init();
    let project = env.create_project("App");
    env.write_raw_tasks(&[TestEnv::raw_task(
        "tw-aaaa", &project, "Setup tooling", "ready", &[],
    )]);

    let json = env.json_output(&["sequence", &project]);
    let steps = json["steps"].as_array().unwrap();
    assert_eq!(steps.len(), 5);

    // Default timing: 3s edge travel, 2s glow; the clear fires at the start
    // of the last edge animation plus travel plus glow.
    let offsets: Vec<u64> = steps.iter().map(|s| s["at_ms"].as_u64().unwrap()).collect();
    assert_eq!(offsets, vec![0, 3000, 3000, 6000, 8000]);
    assert_eq!(steps[0]["action"], "animate_root_edge");
    assert_eq!(steps[4]["action"], "clear");
}

#[test]
fn test_sequence_no_ready_task() {
    // Everything blocked: the sequence never starts.
    let env = TestEnv::init();
    let project = env.create_project("App");
    env.write_raw_tasks(&[
        TestEnv::raw_task("tw-aaaa", &project, "First", "ready", &["tw-bbbb"]),
        TestEnv::raw_task("tw-bbbb", &project, "Second", "ready", &["tw-aaaa"]),
    ]);

    let json = env.json_output(&["sequence", &project]);
    assert_eq!(json["started"], false);
    assert_eq!(json["reason"], "no ready task");
}

#[test]
fn test_sequence_empty_project() {
    let env = TestEnv::init();
    let project = env.create_project("App");

    let json = env.json_output(&["sequence", &project]);
    assert_eq!(json["started"], false);
}

#[test]
fn test_sequence_skips_completed_tasks() {
    let env = TestEnv::init();
    let project = env.create_project("App");
    env.write_raw_tasks(&[
        TestEnv::raw_task("tw-aaaa", &project, "Setup tooling", "completed", &[]),
        TestEnv::raw_task("tw-bbbb", &project, "Write tests", "ready", &["tw-aaaa"]),
    ]);

    let json = env.json_output(&["sequence", &project]);
    assert_eq!(json["started"], true);
    assert_eq!(json["target_task"], "tw-bbbb");
}

#[test]
fn test_sequence_human_output() {
    let env = TestEnv::init();
    let project = env.create_project("App");
    env.write_raw_tasks(&[TestEnv::raw_task(
        "tw-aaaa", &project, "Setup tooling", "ready", &[],
    )]);

    env.tw()
        .args(["-H", "sequence", &project])
        .assert()
        .success()
        .stdout(predicate::str::contains("Execution path: root -> branch-0 -> tw-aaaa"))
        .stdout(predicate::str::contains("t+3000ms"));
}
