//! Smoke tests: basic CLI plumbing.

mod common;

use common::TestEnv;
use predicates::prelude::*;

#[test]
fn help_runs() {
    let env = TestEnv::new();
    env.cfm()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("record"));
}

#[test]
fn system_init_creates_storage() {
    let env = TestEnv::new();
    env.cfm()
        .args(["system", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"initialized\":true"));

    // Data landed under the isolated data dir, not in the app tree.
    assert!(env.data_dir.path().read_dir().unwrap().next().is_some());
}

#[test]
fn system_status_before_init() {
    let env = TestEnv::new();
    env.cfm()
        .args(["system", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"initialized\":false"));
}

#[test]
fn system_status_after_records() {
    let env = TestEnv::init();
    env.cfm().args(["record", "a/b/c", "1"]).assert().success();

    env.cfm()
        .args(["system", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"recorded-changes\":1"))
        .stdout(predicate::str::contains("\"pending-messages\":1"));
}

#[test]
fn app_flag_must_point_at_existing_directory() {
    let env = TestEnv::new();
    env.cfm()
        .args(["--app", "/nonexistent/path", "system", "status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}
