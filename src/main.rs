//! Confmig CLI - records admin configuration changes as versioned migrations.

use std::env;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use confmig::cli::{Cli, Commands, ConfigCommands, LogCommands, SystemCommands};
use confmig::commands::{self, Output};
use confmig::models::ChangeRecord;
use confmig::Result;

fn main() {
    let cli = Cli::parse();
    let human = cli.human_readable;

    // Determine app path: --app flag > CFM_APP env (clap) > cwd
    let app_path = resolve_app_path(cli.app_path, human);

    match run_command(cli.command, &app_path) {
        Ok(output) => output.print(human),
        Err(e) => {
            if human {
                eprintln!("Error: {}", e);
            } else {
                eprintln!("{}", serde_json::json!({ "error": e.to_string() }));
            }
            process::exit(1);
        }
    }
}

/// Resolve the app path; an explicit path must exist and is used literally.
fn resolve_app_path(explicit_path: Option<PathBuf>, human: bool) -> PathBuf {
    match explicit_path {
        Some(path) => {
            if !path.exists() {
                if human {
                    eprintln!("Error: Specified app path does not exist: {}", path.display());
                } else {
                    eprintln!(
                        "{}",
                        serde_json::json!({
                            "error": format!("Specified app path does not exist: {}", path.display())
                        })
                    );
                }
                process::exit(1);
            }
            path
        }
        None => env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

fn run_command(command: Commands, app_path: &std::path::Path) -> Result<Output> {
    match command {
        Commands::Record {
            path,
            value,
            scope,
            scope_id,
            dry_run,
        } => commands::record(
            app_path,
            ChangeRecord::with_scope(path, value, scope, scope_id),
            dry_run,
        ),
        Commands::Messages { kind, clear } => commands::show_messages(app_path, &kind, clear),
        Commands::Log { command } => match command {
            LogCommands::Show { limit } => commands::show_log(app_path, limit),
        },
        Commands::Config { command } => match command {
            ConfigCommands::Get { key } => commands::config_get(app_path, &key),
            ConfigCommands::Set { key, value } => commands::config_set(app_path, &key, &value),
            ConfigCommands::Unset { key } => commands::config_unset(app_path, &key),
            ConfigCommands::List => commands::config_list(app_path),
        },
        Commands::System { command } => match command {
            SystemCommands::Init => commands::system_init(app_path),
            SystemCommands::Status => commands::system_status(app_path),
        },
    }
}
