// ABOUTME: Integration tests for the berth CLI.
// ABOUTME: Validates --help output, configuration errors and cluster no-ops.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn berth_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("berth"));
    for var in ["DOCKER_HOST", "BERTH_CLUSTER_ENDPOINT", "BERTH_NAMESPACE", "BERTH_BACKEND"] {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn help_shows_commands() {
    berth_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("create"))
        .stdout(predicate::str::contains("exec"))
        .stdout(predicate::str::contains("--backend"));
}

#[test]
fn missing_explicit_config_fails() {
    let temp_dir = tempfile::tempdir().unwrap();

    berth_cmd()
        .current_dir(temp_dir.path())
        .args(["--config", "absent.yml", "list"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("configuration file not found"));
}

#[test]
fn invalid_config_is_reported() {
    let temp_dir = tempfile::tempdir().unwrap();
    fs::write(
        temp_dir.path().join("berth.yml"),
        "docker:\n  url: ftp://nowhere\n",
    )
    .unwrap();

    berth_cmd()
        .current_dir(temp_dir.path())
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid configuration"));
}

#[test]
fn cluster_pause_is_reported_as_unsupported() {
    let temp_dir = tempfile::tempdir().unwrap();

    // No cluster is contacted for a no-op, so the endpoint need not exist.
    berth_cmd()
        .current_dir(temp_dir.path())
        .args(["--backend", "kubernetes", "pause", "web"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not supported"));
}

#[test]
fn malformed_env_flag_is_rejected() {
    berth_cmd()
        .args(["create", "web", "nginx", "-e", "NOEQUALS"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("KEY=VALUE"));
}

#[test]
fn unreachable_engine_is_an_error() {
    let temp_dir = tempfile::tempdir().unwrap();
    let socket = temp_dir.path().join("missing.sock");

    berth_cmd()
        .current_dir(temp_dir.path())
        .env("DOCKER_HOST", format!("unix://{}", socket.display()))
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("docker internal error"));
}
