//! Common test utilities for confmig integration tests.
//!
//! Provides `TestEnv` for isolated test environments that don't pollute
//! the user's `~/.local/share/confmig/` directory.

#![allow(dead_code)]

use assert_cmd::Command;
use std::path::{Path, PathBuf};
pub use tempfile::TempDir;

/// A test environment with isolated data storage.
///
/// Each `TestEnv` creates two temporary directories:
/// - `app_dir`: Acts as the host application root
/// - `data_dir`: Holds confmig's data (via `CFM_DATA_DIR` env var)
///
/// The `cfm()` method returns a `Command` that sets `CFM_DATA_DIR`
/// per-invocation, making tests parallel-safe.
pub struct TestEnv {
    pub app_dir: TempDir,
    pub data_dir: TempDir,
}

impl TestEnv {
    /// Create a new test environment with isolated directories.
    pub fn new() -> Self {
        Self {
            app_dir: TempDir::new().unwrap(),
            data_dir: TempDir::new().unwrap(),
        }
    }

    /// Create a new test environment and initialize confmig.
    pub fn init() -> Self {
        let env = Self::new();
        env.cfm().args(["system", "init"]).assert().success();
        env
    }

    /// Get a Command for the cfm binary with isolated data directory.
    pub fn cfm(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_cfm"));
        cmd.current_dir(self.app_dir.path());
        cmd.env("CFM_DATA_DIR", self.data_dir.path());
        cmd
    }

    /// Get the path to the app directory.
    pub fn path(&self) -> &Path {
        self.app_dir.path()
    }

    /// Write a migration-module descriptor into the app tree.
    ///
    /// `version` of `None` leaves the version node empty (fresh module).
    pub fn seed_module(&self, module: &str, active: bool, version: Option<&str>) {
        let etc = self.path().join("etc/modules");
        std::fs::create_dir_all(&etc).unwrap();
        let xml = format!(
            "<config>\n    <modules>\n        <{module}>\n            <active>{active}</active>\n            <codePool>local</codePool>\n            <version>{version}</version>\n        </{module}>\n    </modules>\n</config>\n",
            version = version.unwrap_or(""),
        );
        std::fs::write(etc.join(format!("{}.xml", module)), xml).unwrap();
    }

    /// Enable migration generation for the seeded module.
    pub fn enable_generation(&self, module: &str, resource: &str) {
        for (key, value) in [
            ("generate-migrations", "true"),
            ("migration-module", module),
            ("migration-resource", resource),
        ] {
            self.cfm()
                .args(["config", "set", key, value])
                .assert()
                .success();
        }
    }

    /// Directory where generated migration scripts land.
    pub fn migration_dir(&self, module: &str, resource: &str) -> PathBuf {
        let mut dir = self.path().join("code/local");
        for segment in module.split('_') {
            dir.push(segment);
        }
        dir.join("data").join(resource)
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
