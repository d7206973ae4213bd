//! Integration tests for the `provisioner` binary.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn provisioner(dir: &TempDir) -> Command {
    let mut cmd = Command::new(cargo_bin("provisioner"));
    cmd.current_dir(dir.path()).env("NO_COLOR", "1");
    cmd
}

#[test]
fn cli_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    provisioner(&temp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Provision this host"))
        .stdout(predicate::str::contains("plan"));
    Ok(())
}

#[test]
fn cli_shows_version() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    provisioner(&temp)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn plan_lists_steps_without_root() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    provisioner(&temp)
        .arg("plan")
        .assert()
        .success()
        .stdout(predicate::str::contains("Installing system packages"))
        .stdout(predicate::str::contains("(pull-model) best-effort"))
        .stdout(predicate::str::contains("(register-service) fatal"));
    Ok(())
}

#[test]
fn plan_json_is_machine_readable() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let output = provisioner(&temp).args(["plan", "--json"]).output()?;
    assert!(output.status.success());

    let steps: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    let steps = steps.as_array().ok_or("expected an array")?;
    assert_eq!(steps.len(), 11);
    assert_eq!(steps[0]["name"], "install-packages");
    assert_eq!(steps[0]["fatality"], "fatal");
    assert_eq!(steps[10]["index"], 11);
    Ok(())
}

#[test]
fn unit_prints_descriptor_for_user() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    provisioner(&temp)
        .args(["unit", "--user", "deploy"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("[Unit]\n"))
        .stdout(predicate::str::contains("User=deploy\n"))
        .stdout(predicate::str::contains(
            "ExecStart=/opt/cupom-api/venv/bin/uvicorn main:app --host 0.0.0.0 --port 8000\n",
        ));
    Ok(())
}

#[test]
fn unit_follows_config_in_working_directory() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    fs::write(
        temp.path().join("provisioner.yml"),
        "app:\n  port: 9000\npaths:\n  install_dir: /srv/cupom\n",
    )?;
    provisioner(&temp)
        .args(["unit", "--user", "deploy"])
        .assert()
        .success()
        .stdout(predicate::str::contains("WorkingDirectory=/srv/cupom\n"))
        .stdout(predicate::str::contains("--port 9000"));
    Ok(())
}

#[test]
fn invalid_config_fails() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    fs::write(temp.path().join("provisioner.yml"), "app:\n  port: 0\n")?;
    provisioner(&temp)
        .args(["unit", "--user", "deploy"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("app.port"));
    Ok(())
}

#[test]
fn missing_explicit_config_fails() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    provisioner(&temp)
        .args(["plan", "--config", "absent.yml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration not found"));
    Ok(())
}

#[test]
fn run_without_root_asks_for_sudo() -> Result<(), Box<dyn std::error::Error>> {
    if provisioner::host::is_elevated() {
        // Would really provision this machine.
        return Ok(());
    }
    let temp = TempDir::new()?;
    provisioner(&temp)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("sudo"))
        .stdout(predicate::str::contains("==>").not());
    Ok(())
}

#[test]
fn dry_run_still_requires_root() -> Result<(), Box<dyn std::error::Error>> {
    if provisioner::host::is_elevated() {
        return Ok(());
    }
    let temp = TempDir::new()?;
    provisioner(&temp)
        .args(["run", "--dry-run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("sudo"));
    Ok(())
}

#[test]
fn completions_for_bash() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    provisioner(&temp)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("provisioner"));
    Ok(())
}
