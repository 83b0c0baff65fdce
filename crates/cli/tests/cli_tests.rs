use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("sahpaathi").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Backend for the SAHPAATHI tutoring assistant"));
}

#[test]
fn test_cli_serve_help() {
    let mut cmd = Command::cargo_bin("sahpaathi").unwrap();
    cmd.arg("serve").arg("--help").assert().success().stdout(predicate::str::contains("port"));
}

#[test]
fn test_cli_sessions_without_database_prints_empty_list() {
    let mut cmd = Command::cargo_bin("sahpaathi").unwrap();
    cmd.env_remove("SAHPAATHI_DATABASE_URL")
        .env_remove("DATABASE_URL")
        .arg("sessions")
        .assert()
        .success()
        .stdout(predicate::str::contains("[]"));
}
