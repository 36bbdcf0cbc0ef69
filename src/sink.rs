//! Migration script sinks.
//!
//! A [`ScriptSink`] receives finished migration script bodies and puts
//! them where the host platform's setup mechanism will find them. The
//! file-backed implementation writes into the module's data directory,
//! creating it on first use.

use std::fs;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Destination seam for generated migration scripts.
pub trait ScriptSink {
    /// Write a script body under the given file name.
    ///
    /// Returns the full path of the written file.
    fn write_script(&self, file_name: &str, contents: &str) -> Result<PathBuf>;

    /// Location description for display.
    fn location(&self) -> String;
}

/// Sink that writes into the migration module's setup-data directory:
/// `<app>/code/<codePool>/<Module>/<Name>/data/<resource>/`.
pub struct ModuleDirSink {
    directory: PathBuf,
}

impl ModuleDirSink {
    /// Build the sink for a module in a given code pool and resource.
    ///
    /// The module identifier's underscore separates vendor and name into
    /// two path segments, matching the host platform's code layout.
    pub fn new(app_dir: &Path, code_pool: &str, module: &str, resource: &str) -> Self {
        let mut directory = app_dir.join("code").join(code_pool);
        for segment in module.split('_') {
            directory.push(segment);
        }
        directory.push("data");
        directory.push(resource);
        Self { directory }
    }

    /// The directory scripts are written into.
    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

impl ScriptSink for ModuleDirSink {
    fn write_script(&self, file_name: &str, contents: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.directory).map_err(|source| Error::DirectoryCreate {
            path: self.directory.display().to_string(),
            source,
        })?;

        let path = self.directory.join(file_name);
        fs::write(&path, contents).map_err(|source| Error::FileWrite {
            path: path.display().to_string(),
            source,
        })?;

        Ok(path)
    }

    fn location(&self) -> String {
        self.directory.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_name_splits_into_path_segments() {
        let sink = ModuleDirSink::new(
            Path::new("/app"),
            "local",
            "Acme_Migrations",
            "acme_migrations_setup",
        );
        assert_eq!(
            sink.directory(),
            Path::new("/app/code/local/Acme/Migrations/data/acme_migrations_setup")
        );
    }

    #[test]
    fn test_write_creates_directory_and_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let sink = ModuleDirSink::new(dir.path(), "local", "Acme_Migrations", "setup");
        let path = sink
            .write_script("data-install-0.0.1.php", "<?php\n")
            .unwrap();
        assert!(path.exists());
        assert_eq!(std::fs::read_to_string(path).unwrap(), "<?php\n");
    }
}
