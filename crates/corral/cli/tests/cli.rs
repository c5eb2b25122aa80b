//! `corralctl` end to end

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

const FIXTURE: &str = r#"{
    "cluster_name": "cluster1",
    "environments": [{
        "environment_id": {
            "account_id": "123456789012",
            "cluster": "cluster1",
            "environment_name": "web"
        },
        "environment_type": "SingleTask",
        "deployment_method": "ReplaceAfterTerminate",
        "environment_health": "HEALTHY",
        "environment_status": "ACTIVE",
        "active_environment_revision_id": "1",
        "created_time": "2024-01-01T00:00:00Z",
        "last_updated_time": "2024-01-01T00:00:00Z"
    }],
    "revisions": [{
        "environment_id": {
            "account_id": "123456789012",
            "cluster": "cluster1",
            "environment_name": "web"
        },
        "environment_revision_id": "1",
        "task_definition": "arn:::::task:1",
        "created_time": "2024-01-01T00:00:00Z"
    }],
    "instances": [{ "container_instance_arn": "ci-1", "status": "ACTIVE" }]
}"#;

fn corralctl() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_corralctl"));
    cmd.env_remove("RUST_LOG")
        .env_remove("CORRAL_LOG_LEVEL")
        .env_remove("CORRAL_LOG_JSON")
        .env_remove("CORRAL_CONFIG");
    cmd
}

#[test]
fn json_logs_stay_off_the_result_stream() {
    let mut fixture = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    fixture.write_all(FIXTURE.as_bytes()).unwrap();

    let assert = corralctl()
        .args(["--json", "--output", "json", "reconcile", "--passes", "2", "--fixture"])
        .arg(fixture.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Fixture loaded"));

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let results: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["successful_actions"], 1);
    assert_eq!(results[0]["failed_actions"], 0);
    assert_eq!(results[1]["successful_actions"], 0);
    assert_eq!(results[1]["failed_actions"], 0);
}

#[test]
fn lists_builtin_strategies() {
    corralctl()
        .arg("strategies")
        .assert()
        .success()
        .stdout(predicate::str::contains("ReplaceAfterTerminate"));
}

#[test]
fn unknown_environment_is_an_error() {
    let mut fixture = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    fixture.write_all(FIXTURE.as_bytes()).unwrap();

    corralctl()
        .args(["reconcile", "--environment", "worker", "--fixture"])
        .arg(fixture.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no matching environment"));
}
