use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn prints_version() {
    Command::cargo_bin("hn-pager")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn prints_help() {
    Command::cargo_bin("hn-pager")
        .unwrap()
        .arg("-h")
        .assert()
        .success()
        .stdout(predicate::str::contains("--debug").and(predicate::str::contains("--config")));
}

#[test]
fn rejects_unknown_arguments() {
    Command::cargo_bin("hn-pager")
        .unwrap()
        .arg("--frobnicate")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown argument: --frobnicate"));
}

#[test]
fn config_flag_requires_a_path() {
    Command::cargo_bin("hn-pager")
        .unwrap()
        .arg("--config")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--config needs a path"));
}

#[test]
fn unreadable_config_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "ui: [broken").unwrap();
    Command::cargo_bin("hn-pager")
        .unwrap()
        .arg("--config")
        .arg(&path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to parse config file"));
}

#[test]
fn missing_config_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("hn-pager")
        .unwrap()
        .arg("--config")
        .arg(dir.path().join("absent.yaml"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to read config file"));
}
