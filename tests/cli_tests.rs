use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A command isolated from the user's cf session and config files
fn doctor_cmd(cf_home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_cf-doctor"));
    cmd.current_dir(cf_home)
        .env("CF_HOME", cf_home)
        .env_remove("CF_DOCTOR_CF_BINARY")
        .env_remove("RUST_LOG");
    cmd
}

fn write_session(home: &Path, target: &str) {
    let dir = home.join(".cf");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join("config.json"),
        format!(
            r#"{{
  "Target": "{}",
  "AccessToken": "bearer stored-token",
  "SSLDisabled": false,
  "OrganizationFields": {{ "GUID": "org-guid", "Name": "acme" }},
  "SpaceFields": {{ "GUID": "space-guid", "Name": "dev" }}
}}"#,
            target
        ),
    )
    .unwrap();
}

#[test]
fn test_cli_help() {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_cf-doctor"));
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "scanning and reporting about anomalies",
        ));
}

#[test]
fn test_cli_version() {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_cf-doctor"));
    let expected = format!("cf-doctor {}", env!("CARGO_PKG_VERSION"));
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(expected));
}

#[test]
fn test_doctor_help() {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_cf-doctor"));
    cmd.arg("doctor")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("report anomalies"));
}

#[test]
fn test_doctor_takes_no_arguments() {
    let home = TempDir::new().unwrap();
    doctor_cmd(home.path())
        .arg("doctor")
        .arg("--all")
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_doctor_requires_login() {
    let home = TempDir::new().unwrap();
    doctor_cmd(home.path())
        .arg("doctor")
        .assert()
        .code(5)
        .stdout(predicate::str::contains("doctor: time to triage cloudfoundry"))
        .stderr(predicate::str::contains(
            "doctor cannot work without being logged in to CF",
        ));
}

#[test]
fn test_json_doctor_output_has_no_text_header() {
    let home = TempDir::new().unwrap();
    doctor_cmd(home.path())
        .arg("--format")
        .arg("json")
        .arg("doctor")
        .assert()
        .code(5)
        .stdout(predicate::str::contains("time to triage").not());
}

#[test]
fn test_json_format_flag_is_accepted() {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_cf-doctor"));
    cmd.arg("--format").arg("json").arg("--help").assert().success();
}

#[test]
fn test_config_path_subcommand() {
    let home = TempDir::new().unwrap();
    doctor_cmd(home.path())
        .arg("config")
        .arg("path")
        .assert()
        .success()
        .stdout(predicate::str::contains(".cf-doctor.toml"));
}

#[test]
fn test_config_show_uses_explicit_file() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("doctor.toml");
    std::fs::write(&config, "[thresholds]\ncpu_percent = 72.5\n").unwrap();

    doctor_cmd(home.path())
        .arg("--config")
        .arg(&config)
        .arg("config")
        .arg("get")
        .arg("thresholds.cpu_percent")
        .assert()
        .success()
        .stdout(predicate::str::contains("thresholds.cpu_percent = 72.5"));
}

#[test]
fn test_config_get_unknown_key() {
    let home = TempDir::new().unwrap();
    doctor_cmd(home.path())
        .arg("config")
        .arg("get")
        .arg("thresholds.nope")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Configuration key not found"));
}

#[test]
fn test_config_init_local_refuses_overwrite() {
    let home = TempDir::new().unwrap();
    doctor_cmd(home.path())
        .args(["config", "init", "--local"])
        .assert()
        .success();
    assert!(home.path().join("cf-doctor.toml").exists());

    doctor_cmd(home.path())
        .args(["config", "init", "--local"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_invalid_config_file_is_a_config_error() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("broken.toml");
    std::fs::write(&config, "thresholds = 1").unwrap();

    doctor_cmd(home.path())
        .arg("--config")
        .arg(&config)
        .arg("doctor")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Failed to parse configuration"));
}

#[cfg(unix)]
#[test]
fn test_unreachable_platform_aborts_with_platform_error() {
    use std::os::unix::fs::PermissionsExt;

    let home = TempDir::new().unwrap();
    // Port 9 (discard) is closed on test machines, so the first API call fails fast
    write_session(home.path(), "http://127.0.0.1:9");

    let fake_cf = home.path().join("fake-cf");
    std::fs::write(&fake_cf, "#!/bin/sh\necho \"bearer fresh-token\"\n").unwrap();
    std::fs::set_permissions(&fake_cf, std::fs::Permissions::from_mode(0o755)).unwrap();

    doctor_cmd(home.path())
        .arg("--cf-binary")
        .arg(&fake_cf)
        .arg("--quiet")
        .arg("doctor")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Failed to list apps"));
}
