use assert_cmd::Command;
use predicates::prelude::*;

fn docmigrate() -> Command {
    let mut cmd = Command::cargo_bin("docmigrate").unwrap();
    cmd.env_remove("MONGODB_URI")
        .env_remove("DOCMIGRATE_COMMON_DB")
        .env_remove("DOCMIGRATE_ORDER_DB")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_help() {
    docmigrate()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Provision MongoDB collections and unique indexes"));
}

#[test]
fn test_cli_apply_help() {
    docmigrate()
        .args(["apply", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("memory"));
}

#[test]
fn test_cli_plan_lists_operations() {
    docmigrate()
        .arg("plan")
        .assert()
        .success()
        .stdout(predicate::str::contains("2025.08.01.01"))
        .stdout(predicate::str::contains("\"orderNumber\""))
        .stdout(predicate::str::contains("pp_common_db_stage"));
}

#[test]
fn test_cli_plan_uses_context_overrides() {
    docmigrate()
        .env("DOCMIGRATE_ORDER_DB", "order_service_prod")
        .arg("plan")
        .assert()
        .success()
        .stdout(predicate::str::contains("order_service_prod"))
        .stdout(predicate::str::contains("order_service_dev").not());
}

#[test]
fn test_cli_rejects_invalid_context_name() {
    docmigrate()
        .env("DOCMIGRATE_COMMON_DB", "bad.name")
        .arg("plan")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid database name"));
}

#[test]
fn test_cli_apply_memory_reports_completion() {
    docmigrate()
        .args(["apply", "--memory"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Collections created successfully"))
        .stdout(predicate::str::contains("\"created\""));
}

#[test]
fn test_cli_verify_memory_fails_on_empty_store() {
    docmigrate()
        .args(["verify", "--memory"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not fully applied"));
}

#[test]
fn test_cli_apply_requires_mongodb_uri() {
    docmigrate()
        .arg("apply")
        .assert()
        .failure()
        .stderr(predicate::str::contains("MONGODB_URI"));
}

#[test]
fn test_cli_default_log_level_hides_debug() {
    docmigrate()
        .args(["apply", "--memory"])
        .assert()
        .success()
        .stderr(predicate::str::contains("memory: collection created").not());
}

#[test]
fn test_cli_rust_log_enables_debug() {
    docmigrate()
        .env("RUST_LOG", "debug")
        .args(["apply", "--memory"])
        .assert()
        .success()
        .stderr(predicate::str::contains("memory: collection created"));
}
