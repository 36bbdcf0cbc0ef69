//! Storage layer for confmig data.
//!
//! Each target app gets its own data directory under
//! `~/.local/share/confmig/<app-hash>/` holding:
//! - `changes.jsonl` - append-only log of every recorded change
//! - `messages.jsonl` - pending notification messages
//! - `config.kdl` - session-level tool configuration
//!
//! The base directory can be overridden with the `CFM_DATA_DIR`
//! environment variable (used by integration tests for isolation) or
//! passed explicitly through the `*_with_data_dir` methods.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::config::ConfmigConfig;
use crate::{Error, Result};

/// Environment variable that overrides the base data directory.
pub const DATA_DIR_ENV: &str = "CFM_DATA_DIR";

const CHANGE_LOG_FILE: &str = "changes.jsonl";
const MESSAGES_FILE: &str = "messages.jsonl";
const CONFIG_FILE: &str = "config.kdl";

/// Storage manager for a single target app.
pub struct Storage {
    /// Root directory for this app's data
    pub root: PathBuf,
}

impl Storage {
    /// Open storage for the given app path.
    pub fn open(app_path: &Path) -> Result<Self> {
        Self::open_with_data_dir(app_path, &base_data_dir()?)
    }

    /// Initialize storage for a new app path.
    pub fn init(app_path: &Path) -> Result<Self> {
        Self::init_with_data_dir(app_path, &base_data_dir()?)
    }

    /// Check if storage exists for the given app path.
    pub fn exists(app_path: &Path) -> Result<bool> {
        Ok(storage_dir(app_path, &base_data_dir()?)?.exists())
    }

    /// Open storage rooted at an explicit base data directory.
    pub fn open_with_data_dir(app_path: &Path, data_dir: &Path) -> Result<Self> {
        let root = storage_dir(app_path, data_dir)?;
        if !root.exists() {
            return Err(Error::NotInitialized);
        }
        Ok(Self { root })
    }

    /// Initialize storage rooted at an explicit base data directory.
    pub fn init_with_data_dir(app_path: &Path, data_dir: &Path) -> Result<Self> {
        let root = storage_dir(app_path, data_dir)?;
        fs::create_dir_all(&root)?;

        for file in [CHANGE_LOG_FILE, MESSAGES_FILE] {
            let path = root.join(file);
            if !path.exists() {
                File::create(&path)?;
            }
        }

        Ok(Self { root })
    }

    /// Path of the append-only change log.
    pub fn change_log_path(&self) -> PathBuf {
        self.root.join(CHANGE_LOG_FILE)
    }

    /// Path of the notification message store.
    pub fn messages_path(&self) -> PathBuf {
        self.root.join(MESSAGES_FILE)
    }

    /// Path of the session config file.
    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    /// Read the session config; empty config when the file is absent.
    pub fn read_config(&self) -> Result<ConfmigConfig> {
        read_config_file(&self.config_path())
    }

    /// Write the session config.
    pub fn write_config(&self, config: &ConfmigConfig) -> Result<()> {
        fs::write(self.config_path(), config.to_kdl().to_string())?;
        Ok(())
    }

    /// Read the system-level config from `~/.config/confmig/config.kdl`.
    pub fn read_system_config() -> Result<ConfmigConfig> {
        let Some(config_dir) = dirs::config_dir() else {
            return Ok(ConfmigConfig::default());
        };
        read_config_file(&config_dir.join("confmig").join(CONFIG_FILE))
    }
}

fn read_config_file(path: &Path) -> Result<ConfmigConfig> {
    if !path.exists() {
        return Ok(ConfmigConfig::default());
    }
    let text = fs::read_to_string(path)?;
    let doc = text
        .parse::<kdl::KdlDocument>()
        .map_err(|e| Error::Other(format!("Malformed config {}: {}", path.display(), e)))?;
    Ok(ConfmigConfig::from_kdl(&doc))
}

/// Base data directory: `CFM_DATA_DIR` override or the XDG data dir.
fn base_data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return Ok(PathBuf::from(dir));
    }
    let data_dir = dirs::data_dir()
        .ok_or_else(|| Error::Other("Could not determine data directory".to_string()))?;
    Ok(data_dir.join("confmig"))
}

/// Storage directory for an app: a short hash of the canonical app
/// path keeps unrelated installations apart.
fn storage_dir(app_path: &Path, data_dir: &Path) -> Result<PathBuf> {
    let canonical = app_path
        .canonicalize()
        .map_err(|e| Error::Other(format!("Could not canonicalize app path: {}", e)))?;

    let mut hasher = Sha256::new();
    hasher.update(canonical.to_string_lossy().as_bytes());
    let hash_hex = format!("{:x}", hasher.finalize());

    Ok(data_dir.join(&hash_hex[..12]))
}
