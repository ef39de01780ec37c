use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;
use tempfile::TempDir;

/// Команда с изолированным файлом сессии и недоступным endpoint'ом
fn kcloud(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("kcloud").unwrap();
    cmd.current_dir(home.path())
        .env("HOME", home.path())
        .env("KCLOUD_SESSION_FILE", home.path().join("session.json"))
        .env("KCLOUD_ENDPOINT", "http://127.0.0.1:9")
        .env("KCLOUD_QUERY_RETRIES", "0")
        .env_remove("KCLOUD_ENV")
        .env_remove("XDG_CONFIG_HOME");
    cmd
}

#[test]
fn help_lists_commands() {
    let home = TempDir::new().unwrap();
    kcloud(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("bills"))
        .stdout(predicate::str::contains("login"));
}

#[test]
fn config_example_prints_toml() {
    let home = TempDir::new().unwrap();
    kcloud(&home)
        .args(["config", "example"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[server]"))
        .stdout(predicate::str::contains("[client]"));
}

#[test]
fn config_example_refuses_to_overwrite() {
    let home = TempDir::new().unwrap();
    let target = home.path().join("out.toml");
    std::fs::write(&target, "# mine").unwrap();

    kcloud(&home)
        .args(["config", "example", "--output"])
        .arg(&target)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
    assert_eq!(std::fs::read_to_string(&target).unwrap(), "# mine");
}

#[test]
fn config_show_reflects_env_overrides() {
    let home = TempDir::new().unwrap();
    kcloud(&home)
        .args(["config", "show"])
        .env("KCLOUD_PORT", "9123")
        .assert()
        .success()
        .stdout(predicate::str::contains("port = 9123"))
        .stdout(predicate::str::contains("# source: defaults"));
}

#[test]
fn config_validate_rejects_bad_endpoint() {
    let home = TempDir::new().unwrap();
    kcloud(&home)
        .args(["config", "validate"])
        .env("KCLOUD_ENDPOINT", "ftp://example.org")
        .assert()
        .failure()
        .stdout(predicate::str::contains("validation failed"));
}

#[test]
fn login_whoami_logout_roundtrip() {
    let home = TempDir::new().unwrap();

    kcloud(&home)
        .args(["whoami", "--offline"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Not logged in"));

    kcloud(&home)
        .args(["login", "--principal", "alice-principal"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged in as"));
    assert!(home.path().join("session.json").exists());

    kcloud(&home)
        .args(["whoami", "--offline"])
        .assert()
        .success()
        .stdout(predicate::str::contains("alice-principal"));

    kcloud(&home).arg("logout").assert().success();
    assert!(!home.path().join("session.json").exists());
}

#[test]
fn queries_require_login() {
    let home = TempDir::new().unwrap();
    kcloud(&home)
        .args(["bills", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not logged in"));
}

#[test]
fn form_validation_runs_before_any_request() {
    let home = TempDir::new().unwrap();
    kcloud(&home)
        .args(["login", "--principal", "bob"])
        .assert()
        .success();

    kcloud(&home)
        .args(["habits", "add", "Read", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Goal must be a positive whole number"));

    kcloud(&home)
        .args(["plans", "add", "  "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please enter a plan title"));
}
