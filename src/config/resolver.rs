//! Unified precedence resolution for tool configuration.
//!
//! Precedence (highest to lowest):
//! 1. CLI flags (passed at runtime)
//! 2. Session config.kdl (`~/.local/share/confmig/<app-hash>/config.kdl`)
//! 3. System config.kdl (`~/.config/confmig/config.kdl`)
//! 4. Built-in defaults

use crate::config::ConfmigConfig;
use crate::storage::Storage;
use crate::Result;

/// Tracks where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSource {
    /// Value from CLI flag
    CliFlag,
    /// Value from session-level config
    Session,
    /// Value from system-level config
    System,
    /// Built-in default value
    Default,
}

impl std::fmt::Display for ValueSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueSource::CliFlag => write!(f, "cli"),
            ValueSource::Session => write!(f, "session"),
            ValueSource::System => write!(f, "system"),
            ValueSource::Default => write!(f, "default"),
        }
    }
}

/// A resolved value with its source.
#[derive(Debug, Clone)]
pub struct Resolved<T> {
    pub value: T,
    pub source: ValueSource,
}

impl<T> Resolved<T> {
    pub fn new(value: T, source: ValueSource) -> Self {
        Self { value, source }
    }
}

/// Fully resolved settings with source tracking.
#[derive(Debug, Clone)]
pub struct ResolvedSettings {
    /// Whether migration files are generated
    pub generate_migrations: Resolved<bool>,
    /// Migration module identifier, if configured
    pub migration_module: Option<Resolved<String>>,
    /// Migration resource name, if configured
    pub migration_resource: Option<Resolved<String>>,
}

impl Default for ResolvedSettings {
    fn default() -> Self {
        Self {
            generate_migrations: Resolved::new(false, ValueSource::Default),
            migration_module: None,
            migration_resource: None,
        }
    }
}

impl ResolvedSettings {
    pub fn generate_migrations(&self) -> bool {
        self.generate_migrations.value
    }

    pub fn migration_module(&self) -> Option<&str> {
        self.migration_module.as_ref().map(|r| r.value.as_str())
    }

    pub fn migration_resource(&self) -> Option<&str> {
        self.migration_resource.as_ref().map(|r| r.value.as_str())
    }
}

/// CLI overrides for configuration resolution.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub generate_migrations: Option<bool>,
    pub migration_module: Option<String>,
    pub migration_resource: Option<String>,
}

impl ConfigOverrides {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Resolve settings with the full precedence chain, reading the
/// session and system config files.
pub fn resolve(storage: &Storage, overrides: &ConfigOverrides) -> Result<ResolvedSettings> {
    let system = Storage::read_system_config()?;
    let session = storage.read_config()?;
    Ok(resolve_layers(&system, &session, overrides))
}

/// Resolve against an explicit pair of configs, bypassing file reads.
pub fn resolve_layers(
    system: &ConfmigConfig,
    session: &ConfmigConfig,
    overrides: &ConfigOverrides,
) -> ResolvedSettings {
    let mut result = ResolvedSettings::default();

    if let Some(generate) = overrides.generate_migrations {
        result.generate_migrations = Resolved::new(generate, ValueSource::CliFlag);
    } else if let Some(generate) = session.generate_migrations {
        result.generate_migrations = Resolved::new(generate, ValueSource::Session);
    } else if let Some(generate) = system.generate_migrations {
        result.generate_migrations = Resolved::new(generate, ValueSource::System);
    }
    // else: remains Default (false)

    if let Some(ref module) = overrides.migration_module {
        result.migration_module = Some(Resolved::new(module.clone(), ValueSource::CliFlag));
    } else if let Some(ref module) = session.migration_module {
        result.migration_module = Some(Resolved::new(module.clone(), ValueSource::Session));
    } else if let Some(ref module) = system.migration_module {
        result.migration_module = Some(Resolved::new(module.clone(), ValueSource::System));
    }
    // else: remains None (no default module)

    if let Some(ref resource) = overrides.migration_resource {
        result.migration_resource = Some(Resolved::new(resource.clone(), ValueSource::CliFlag));
    } else if let Some(ref resource) = session.migration_resource {
        result.migration_resource = Some(Resolved::new(resource.clone(), ValueSource::Session));
    } else if let Some(ref resource) = system.migration_resource {
        result.migration_resource = Some(Resolved::new(resource.clone(), ValueSource::System));
    }

    result
}
