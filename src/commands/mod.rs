//! Command implementations for the confmig CLI.
//!
//! Each command returns an [`Output`] that the binary prints either as
//! JSON (default) or in human-readable form.

use std::path::Path;

use serde_json::json;

use crate::change_log::{self, ChangeLogEntry};
use crate::config::{self, ConfigOverrides, ConfmigConfig};
use crate::descriptor::{DescriptorStore, FileDescriptorStore};
use crate::emitter::{self, GeneratedMigration, MigrationEmitter};
use crate::messages;
use crate::models::{ChangeRecord, Notification};
use crate::sink::ModuleDirSink;
use crate::storage::Storage;
use crate::{Error, Result};

/// Command output in both machine- and human-readable form.
#[derive(Debug)]
pub struct Output {
    pub json: serde_json::Value,
    pub human: String,
}

impl Output {
    pub fn new(json: serde_json::Value, human: impl Into<String>) -> Self {
        Self {
            json,
            human: human.into(),
        }
    }

    /// Print the output in the requested format.
    pub fn print(&self, human: bool) {
        if human {
            println!("{}", self.human);
        } else {
            println!("{}", self.json);
        }
    }
}

/// Record a configuration change: log it, optionally generate a
/// migration file, and queue a notification message.
pub fn record(app_path: &Path, change: ChangeRecord, dry_run: bool) -> Result<Output> {
    let statement = emitter::render_setup_statement(&change);

    if dry_run {
        let script = emitter::render_migration_script(&change);
        let json = json!({
            "dry_run": true,
            "statement": statement,
            "script": script.clone(),
        });
        return Ok(Output::new(json, script));
    }

    let storage = Storage::open(app_path)?;
    record_with_storage(app_path, &storage, change, statement)
}

/// Record against an explicit storage handle (DI seam for tests).
fn record_with_storage(
    app_path: &Path,
    storage: &Storage,
    change: ChangeRecord,
    statement: String,
) -> Result<Output> {
    // The change log captures every record attempt, generated or not.
    change_log::append(
        storage,
        &ChangeLogEntry::new(app_path.display().to_string(), change.clone()),
    )?;

    let settings = config::resolve(storage, &ConfigOverrides::new())?;
    let generated = if settings.generate_migrations() {
        Some(generate_migration(app_path, &settings, &change)?)
    } else {
        None
    };

    let message = match &generated {
        Some(g) => Notification::generated(
            change.clone(),
            statement.clone(),
            g.previous,
            g.current,
            g.file_name.clone(),
        ),
        None => Notification::logged(change.clone(), statement.clone()),
    };
    messages::append(storage, &message)?;

    let human = match &generated {
        Some(g) => format!(
            "Recorded {} = {:?} ({} {})\nGenerated {}",
            change.path,
            change.value,
            change.scope,
            change.scope_id,
            g.path.display()
        ),
        None => format!(
            "Recorded {} = {:?} ({} {})",
            change.path, change.value, change.scope, change.scope_id
        ),
    };

    Ok(Output::new(
        json!({
            "recorded": true,
            "statement": statement,
            "migration": generated.as_ref().map(|g| json!({
                "previous": g.previous.map(|v| v.to_string()),
                "current": g.current.to_string(),
                "file": g.file_name,
                "path": g.path.display().to_string(),
            })),
        }),
        human,
    ))
}

fn generate_migration(
    app_path: &Path,
    settings: &config::ResolvedSettings,
    change: &ChangeRecord,
) -> Result<GeneratedMigration> {
    let module = settings.migration_module().ok_or_else(|| {
        Error::InvalidInput(
            "generate-migrations is enabled but migration-module is not set".to_string(),
        )
    })?;
    let resource = settings.migration_resource().ok_or_else(|| {
        Error::InvalidInput(
            "generate-migrations is enabled but migration-resource is not set".to_string(),
        )
    })?;

    let store = FileDescriptorStore::new(app_path);
    // The code pool decides where scripts live, so the descriptor is
    // consulted before the sink can be built.
    let descriptor = store.load(module)?.ok_or_else(|| {
        Error::DescriptorUnavailable(format!(
            "no descriptor for {} at {}",
            module,
            store.location(module)
        ))
    })?;

    let sink = ModuleDirSink::new(app_path, &descriptor.code_pool, module, resource);
    MigrationEmitter::new(&store, &sink, module).generate(change)
}

/// List pending messages of a kind, optionally draining them.
pub fn show_messages(app_path: &Path, kind: &str, clear: bool) -> Result<Output> {
    let storage = Storage::open(app_path)?;
    let listed = messages::list(&storage, Some(kind))?;
    if clear {
        messages::clear(&storage, Some(kind))?;
    }

    let mut human = String::new();
    for message in &listed {
        human.push_str(&message.statement);
        if let Some(ref file) = message.file {
            human.push_str(&format!("  [{}]", file));
        }
        human.push('\n');
    }
    if listed.is_empty() {
        human.push_str("No pending messages");
    }

    Ok(Output::new(
        json!({
            "kind": kind,
            "count": listed.len(),
            "cleared": clear,
            "messages": listed,
        }),
        human.trim_end().to_string(),
    ))
}

/// Show recorded changes from the log.
pub fn show_log(app_path: &Path, limit: Option<usize>) -> Result<Output> {
    let storage = Storage::open(app_path)?;
    let entries = change_log::read(&storage, limit)?;

    let mut human = String::new();
    for entry in &entries {
        human.push_str(&format!(
            "{}  {} = {:?} ({} {})\n",
            entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
            entry.change.path,
            entry.change.value,
            entry.change.scope,
            entry.change.scope_id,
        ));
    }
    if entries.is_empty() {
        human.push_str("No recorded changes");
    }

    Ok(Output::new(
        json!({
            "count": entries.len(),
            "entries": entries,
        }),
        human.trim_end().to_string(),
    ))
}

/// Get a session config value.
pub fn config_get(app_path: &Path, key: &str) -> Result<Output> {
    let storage = Storage::open(app_path)?;
    let config = storage.read_config()?;
    let value = config_value(&config, key)?;
    let human = value.clone().unwrap_or_else(|| "(unset)".to_string());

    Ok(Output::new(json!({ "key": key, "value": value }), human))
}

/// Set a session config value.
pub fn config_set(app_path: &Path, key: &str, value: &str) -> Result<Output> {
    let storage = Storage::open(app_path)?;
    let mut config = storage.read_config()?;

    match key {
        "generate-migrations" => {
            config.generate_migrations = Some(parse_bool(value)?);
        }
        "migration-module" => {
            config.migration_module = Some(value.to_string());
        }
        "migration-resource" => {
            config.migration_resource = Some(value.to_string());
        }
        _ => return Err(unknown_key(key)),
    }

    config
        .validate()
        .map_err(Error::InvalidInput)?;
    storage.write_config(&config)?;

    Ok(Output::new(
        json!({ "key": key, "value": value, "set": true }),
        format!("{} = {}", key, value),
    ))
}

/// Remove a session config value.
pub fn config_unset(app_path: &Path, key: &str) -> Result<Output> {
    let storage = Storage::open(app_path)?;
    let mut config = storage.read_config()?;

    match key {
        "generate-migrations" => config.generate_migrations = None,
        "migration-module" => config.migration_module = None,
        "migration-resource" => config.migration_resource = None,
        _ => return Err(unknown_key(key)),
    }

    storage.write_config(&config)?;
    Ok(Output::new(
        json!({ "key": key, "unset": true }),
        format!("{} unset", key),
    ))
}

/// List resolved configuration with value sources.
pub fn config_list(app_path: &Path) -> Result<Output> {
    let storage = Storage::open(app_path)?;
    let resolved = config::resolve(&storage, &ConfigOverrides::new())?;

    let module = resolved.migration_module();
    let resource = resolved.migration_resource();
    let human = format!(
        "generate-migrations = {} ({})\nmigration-module = {} ({})\nmigration-resource = {} ({})",
        resolved.generate_migrations(),
        resolved.generate_migrations.source,
        module.unwrap_or("(unset)"),
        resolved
            .migration_module
            .as_ref()
            .map(|r| r.source.to_string())
            .unwrap_or_else(|| "-".to_string()),
        resource.unwrap_or("(unset)"),
        resolved
            .migration_resource
            .as_ref()
            .map(|r| r.source.to_string())
            .unwrap_or_else(|| "-".to_string()),
    );

    Ok(Output::new(
        json!({
            "generate-migrations": {
                "value": resolved.generate_migrations(),
                "source": resolved.generate_migrations.source.to_string(),
            },
            "migration-module": module,
            "migration-resource": resource,
        }),
        human,
    ))
}

/// Initialize confmig for an app directory.
pub fn system_init(app_path: &Path) -> Result<Output> {
    let storage = Storage::init(app_path)?;
    Ok(Output::new(
        json!({
            "initialized": true,
            "app": app_path.display().to_string(),
            "data": storage.root.display().to_string(),
        }),
        format!("Initialized confmig data at {}", storage.root.display()),
    ))
}

/// Show storage location, build info, and resolved settings.
pub fn system_status(app_path: &Path) -> Result<Output> {
    let initialized = Storage::exists(app_path)?;
    let mut status = json!({
        "app": app_path.display().to_string(),
        "initialized": initialized,
        "build": {
            "timestamp": env!("CFM_BUILD_TIMESTAMP"),
            "commit": env!("CFM_GIT_COMMIT"),
        },
    });

    let mut human = format!(
        "App: {}\nInitialized: {}",
        app_path.display(),
        initialized
    );

    if initialized {
        let storage = Storage::open(app_path)?;
        let resolved = config::resolve(&storage, &ConfigOverrides::new())?;
        let pending = messages::list(&storage, None)?.len();
        let changes = change_log::read(&storage, None)?.len();

        status["data"] = json!(storage.root.display().to_string());
        status["generate-migrations"] = json!(resolved.generate_migrations());
        status["migration-module"] = json!(resolved.migration_module());
        status["pending-messages"] = json!(pending);
        status["recorded-changes"] = json!(changes);

        human.push_str(&format!(
            "\nData: {}\nGenerate migrations: {}\nRecorded changes: {}\nPending messages: {}",
            storage.root.display(),
            resolved.generate_migrations(),
            changes,
            pending,
        ));
    }

    Ok(Output::new(status, human))
}

fn config_value(config: &ConfmigConfig, key: &str) -> Result<Option<String>> {
    match key {
        "generate-migrations" => Ok(config.generate_migrations.map(|b| b.to_string())),
        "migration-module" => Ok(config.migration_module.clone()),
        "migration-resource" => Ok(config.migration_resource.clone()),
        _ => Err(unknown_key(key)),
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(Error::InvalidInput(format!(
            "expected a boolean, got {:?}",
            value
        ))),
    }
}

fn unknown_key(key: &str) -> Error {
    Error::InvalidInput(format!(
        "unknown config key {:?} (expected generate-migrations, migration-module, or migration-resource)",
        key
    ))
}
