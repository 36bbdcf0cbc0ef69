//! CLI argument definitions for confmig.

use clap::{Parser, Subcommand};

/// Confmig - records admin configuration changes as versioned setup-script migrations.
///
/// Point it at a host app directory, then call `cfm record` from the
/// platform's config-save hook whenever a value actually changed.
#[derive(Parser, Debug)]
#[command(name = "cfm")]
#[command(author, version, about = "Record configuration changes as versioned migrations", long_about = None)]
pub struct Cli {
    /// Output in human-readable format instead of JSON
    #[arg(short = 'H', long = "human", global = true)]
    pub human_readable: bool,

    /// Target host app directory. Defaults to the current directory.
    /// Can also be set via the CFM_APP environment variable.
    #[arg(short = 'C', long = "app", global = true, env = "CFM_APP")]
    pub app_path: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Record a configuration change (log it, generate a migration if enabled)
    Record {
        /// Dotted configuration key (e.g., web/secure/base_url)
        path: String,

        /// New value
        value: String,

        /// Scope kind of the change
        #[arg(long, default_value = "default")]
        scope: String,

        /// Numeric identifier of the scope instance
        #[arg(long, default_value_t = 0)]
        scope_id: i64,

        /// Print the migration script that would be written, with no side effects
        #[arg(long)]
        dry_run: bool,
    },

    /// List or clear pending notification messages
    Messages {
        /// Only show messages of this kind
        #[arg(long, default_value = "migration")]
        kind: String,

        /// Remove the listed messages after showing them
        #[arg(long)]
        clear: bool,
    },

    /// Change log commands
    Log {
        #[command(subcommand)]
        command: LogCommands,
    },

    /// Tool configuration commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// System management commands
    System {
        #[command(subcommand)]
        command: SystemCommands,
    },
}

/// Change log subcommands
#[derive(Subcommand, Debug)]
pub enum LogCommands {
    /// Show recorded changes, oldest first
    Show {
        /// Only show the most recent N entries
        #[arg(long)]
        limit: Option<usize>,
    },
}

/// Configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Get a session config value
    Get {
        /// Key: generate-migrations, migration-module, or migration-resource
        key: String,
    },

    /// Set a session config value
    Set {
        /// Key: generate-migrations, migration-module, or migration-resource
        key: String,

        /// Value to set
        value: String,
    },

    /// Remove a session config value
    Unset {
        /// Key to remove
        key: String,
    },

    /// List resolved configuration with value sources
    List,
}

/// System subcommands
#[derive(Subcommand, Debug)]
pub enum SystemCommands {
    /// Initialize confmig for an app directory
    Init,

    /// Show storage location, build info, and resolved settings
    Status,
}
