// ABOUTME: Integration tests for the springship CLI commands.
// ABOUTME: Validates --help output, init behavior, and config errors surfaced by deploy.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn springship_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("springship"));
    cmd.env_remove("SPRINGSHIP_ENV")
        .env_remove("SPRINGSHIP_ACCESS_TOKEN");
    cmd
}

#[test]
fn help_shows_commands() {
    springship_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("deploy"))
        .stdout(predicate::str::contains("endpoints"))
        .stdout(predicate::str::contains("--environment"));
}

#[test]
fn init_creates_config_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("springship.yml");

    springship_cmd()
        .current_dir(temp_dir.path())
        .args(["init", "--service", "orders"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created springship.yml"));

    assert!(config_path.exists(), "springship.yml should be created");
    let content = fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("services:"), "Config should list services");
    assert!(content.contains("orders:"), "Config should use the given service");
}

#[test]
fn init_refuses_to_overwrite_existing_config() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("springship.yml");

    fs::write(&config_path, "existing: config").unwrap();

    springship_cmd()
        .current_dir(temp_dir.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    assert_eq!(fs::read_to_string(&config_path).unwrap(), "existing: config");
}

#[test]
fn deploy_without_config_fails() {
    let temp_dir = tempfile::tempdir().unwrap();

    springship_cmd()
        .current_dir(temp_dir.path())
        .arg("deploy")
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration file not found"));
}

#[test]
fn deploy_without_token_fails_before_any_request() {
    let temp_dir = tempfile::tempdir().unwrap();
    fs::write(
        temp_dir.path().join("springship.yml"),
        "name: shop\ntarget: { subscription: s, resource_group: rg }\nservices:\n  api: {}\n",
    )
    .unwrap();

    springship_cmd()
        .current_dir(temp_dir.path())
        .arg("deploy")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no access token"));
}

#[test]
fn unknown_service_is_reported_as_json() {
    let temp_dir = tempfile::tempdir().unwrap();
    fs::write(
        temp_dir.path().join("springship.yml"),
        "name: shop\ntarget: { subscription: s, resource_group: rg }\nservices:\n  api: {}\n",
    )
    .unwrap();

    springship_cmd()
        .current_dir(temp_dir.path())
        .args(["--json", "endpoints", "web"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(r#""event":"error""#))
        .stderr(predicate::str::contains("unknown service: web"));
}
