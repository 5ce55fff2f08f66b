//! Argument-parsing tests; none of these reach a database

use assert_cmd::Command;
use predicates::prelude::*;

fn todoctl() -> Command {
    let mut cmd = Command::cargo_bin("todoctl").unwrap();
    // Keep a developer's .env from leaking into assertions
    cmd.env_remove("DATABASE_URL").env_remove("RUST_LOG");
    cmd
}

// === Help output ===

#[test]
fn test_top_level_help() {
    todoctl()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("lists"))
        .stdout(predicate::str::contains("tasks"))
        .stdout(predicate::str::contains("subtasks"))
        .stdout(predicate::str::contains("schema"));
}

#[test]
fn test_lists_reorder_help() {
    todoctl()
        .args(["lists", "reorder", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("unknown IDs are skipped"));
}

#[test]
fn test_tasks_update_help() {
    todoctl()
        .args(["tasks", "update", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--completed"))
        .stdout(predicate::str::contains("--description"));
}

#[test]
fn test_subtasks_by_task_help() {
    todoctl()
        .args(["subtasks", "by-task", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Task ID"));
}

// === Argument validation ===

#[test]
fn test_invalid_uuid_is_rejected() {
    todoctl()
        .args(["lists", "get", "not-a-uuid"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value 'not-a-uuid'"));
}

#[test]
fn test_missing_name_is_rejected() {
    todoctl()
        .args(["tasks", "create", "6f1c2b1e-7a52-4d0e-9a44-1b1f3f0c6a11"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("<NAME>"));
}

#[test]
fn test_unknown_subcommand() {
    todoctl()
        .args(["lists", "archive"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

// === Completions ===

#[test]
fn test_completions_need_no_database() {
    todoctl()
        .args(["completions", "bash"])
        .env("DB_PORT", "not-a-port")
        .assert()
        .success()
        .stdout(predicate::str::contains("todoctl"));
}

// === Configuration ===

#[test]
fn test_invalid_port_fails_before_connecting() {
    todoctl()
        .args(["lists", "all"])
        .env("DB_PORT", "not-a-port")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid database configuration"));
}

#[test]
fn test_database_url_flag_bypasses_db_fields() {
    todoctl()
        .args(["--database-url", "not a url", "lists", "all"])
        .env("DB_PORT", "not-a-port")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid database configuration").not())
        .stderr(predicate::str::contains("malformed DATABASE_URL"));
}
