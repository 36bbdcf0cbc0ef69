//! Integration tests for the `cfm config` commands.

mod common;

use common::TestEnv;
use predicates::prelude::*;

#[test]
fn config_get_unset_key() {
    let env = TestEnv::init();
    env.cfm()
        .args(["config", "get", "migration-module", "--human"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(unset)"));
}

#[test]
fn config_set_then_get() {
    let env = TestEnv::init();
    env.cfm()
        .args(["config", "set", "migration-module", "Acme_Migrations"])
        .assert()
        .success();

    env.cfm()
        .args(["config", "get", "migration-module"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Acme_Migrations"));
}

#[test]
fn config_set_persists_across_invocations() {
    let env = TestEnv::init();
    env.cfm()
        .args(["config", "set", "generate-migrations", "true"])
        .assert()
        .success();

    env.cfm()
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"value\":true"))
        .stdout(predicate::str::contains("\"source\":\"session\""));
}

#[test]
fn config_unset_removes_value() {
    let env = TestEnv::init();
    env.cfm()
        .args(["config", "set", "migration-resource", "acme_setup"])
        .assert()
        .success();
    env.cfm()
        .args(["config", "unset", "migration-resource"])
        .assert()
        .success();

    env.cfm()
        .args(["config", "get", "migration-resource", "--human"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(unset)"));
}

#[test]
fn config_rejects_unknown_key() {
    let env = TestEnv::init();
    env.cfm()
        .args(["config", "set", "editor", "nvim"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown config key"));
}

#[test]
fn config_rejects_non_boolean_generate_flag() {
    let env = TestEnv::init();
    env.cfm()
        .args(["config", "set", "generate-migrations", "maybe"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected a boolean"));
}

#[test]
fn config_rejects_module_without_vendor_prefix() {
    let env = TestEnv::init();
    env.cfm()
        .args(["config", "set", "migration-module", "nonamespace"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Vendor_Name"));
}
