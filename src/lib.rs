//! Confmig - records admin configuration changes as versioned setup-script migrations.
//!
//! This library provides the core functionality for the `cfm` CLI tool:
//! version bumping, migration script synthesis, descriptor management,
//! change logging, and notification messages.

pub mod change_log;
pub mod cli;
pub mod commands;
pub mod config;
pub mod descriptor;
pub mod emitter;
pub mod messages;
pub mod models;
pub mod sink;
pub mod storage;
pub mod version;

/// Test utilities for isolated test environments.
#[cfg(test)]
pub(crate) mod test_utils {
    use std::path::Path;
    use tempfile::TempDir;

    use crate::storage::Storage;

    /// Test environment with an isolated app tree and data directory.
    ///
    /// Storage-layer and command-layer unit tests use this through the
    /// `*_with_data_dir` DI methods; integration tests under `tests/` use
    /// per-subprocess `CFM_DATA_DIR` env vars instead.
    pub struct TestEnv {
        /// Simulated host application directory
        pub app_dir: TempDir,
        /// Isolated data storage directory
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

        /// Get the path to the simulated app directory.
        pub fn path(&self) -> &Path {
            self.app_dir.path()
        }

        /// Get the path to the isolated data directory.
        pub fn data_path(&self) -> &Path {
            self.data_dir.path()
        }

        /// Initialize storage for this test environment.
        pub fn init_storage(&self) -> Storage {
            Storage::init_with_data_dir(self.path(), self.data_path()).unwrap()
        }

        /// Open storage for this test environment.
        pub fn open_storage(&self) -> Storage {
            Storage::open_with_data_dir(self.path(), self.data_path()).unwrap()
        }
    }

    impl Default for TestEnv {
        fn default() -> Self {
            Self::new()
        }
    }
}

/// Library-level error type for confmig operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Not initialized: run `cfm system init` first")]
    NotInitialized,

    #[error("Migration module not available: {0}")]
    DescriptorUnavailable(String),

    #[error("Invalid version string: {0}")]
    VersionParse(String),

    #[error("Could not create directory {path}: {source}")]
    DirectoryCreate {
        path: String,
        source: std::io::Error,
    },

    #[error("Could not write migration file {path}: {source}")]
    FileWrite {
        path: String,
        source: std::io::Error,
    },

    #[error("Could not write descriptor {path}: {source}")]
    DescriptorWrite {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for confmig operations.
pub type Result<T> = std::result::Result<T, Error>;
