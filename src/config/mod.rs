//! Tool configuration for confmig.
//!
//! Two KDL files control behavior:
//! - System: `~/.config/confmig/config.kdl`
//! - Session: `~/.local/share/confmig/<app-hash>/config.kdl`
//!
//! Keys:
//! - `generate-migrations` - whether to emit migration files at all
//! - `migration-module` - identifier of the target migration module
//! - `migration-resource` - setup resource subdirectory of that module
//!
//! Precedence: CLI flag > session config > system config > defaults.
//! Use the [`resolver`] module for unified precedence resolution.

pub mod resolver;
pub mod schema;

pub use resolver::{resolve, ConfigOverrides, Resolved, ResolvedSettings, ValueSource};
pub use schema::ConfmigConfig;
