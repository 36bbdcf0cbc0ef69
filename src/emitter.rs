//! Versioned migration emission.
//!
//! This module turns a [`ChangeRecord`] plus the migration module's
//! stored version into a setup-script migration file: it renders the
//! data-carrying `setConfigData` statement, wraps it in the fixed
//! setup boilerplate, names the file after the version transition, and
//! drives the descriptor read-bump-write through injected seams.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, OnceLock};

use crate::descriptor::DescriptorStore;
use crate::models::ChangeRecord;
use crate::sink::ScriptSink;
use crate::version::{self, SetupVersion};
use crate::{Error, Result};

/// Fixed boilerplate surrounding the data-carrying statement. Owned by
/// the host platform's setup-script convention, not derived.
const SCRIPT_HEADER: &str = "<?php\n\n$installer = $this;\n$installer->startSetup();\n";
const SCRIPT_FOOTER: &str = "$installer->endSetup();\n";
const STATEMENT_OPEN: &str = "$installer->setConfigData(";
const STATEMENT_CLOSE: &str = ");";

/// Escape a value for embedding in a single-quoted script argument.
///
/// Backslashes and single quotes are the only characters that can
/// terminate the argument early; both are prefixed with a backslash.
fn escape_argument(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if c == '\\' || c == '\'' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Render the single data-carrying statement for a change.
///
/// Arguments appear in fixed order: path, value, scope, scope id.
pub fn render_setup_statement(change: &ChangeRecord) -> String {
    let args = [
        change.path.as_str(),
        change.value.as_str(),
        change.scope.as_str(),
        &change.scope_id.to_string(),
    ]
    .map(|a| format!("'{}'", escape_argument(a)))
    .join(", ");
    format!("{}{}{}", STATEMENT_OPEN, args, STATEMENT_CLOSE)
}

/// Parse a rendered setup statement back into its change record.
///
/// Exact inverse of [`render_setup_statement`]; used to inspect
/// existing migrations and to verify that escaping is reversible.
pub fn parse_setup_statement(statement: &str) -> Result<ChangeRecord> {
    let inner = statement
        .trim()
        .strip_prefix(STATEMENT_OPEN)
        .and_then(|s| s.strip_suffix(STATEMENT_CLOSE))
        .ok_or_else(|| Error::InvalidInput(format!("not a setup statement: {}", statement)))?;

    let args = split_quoted_arguments(inner)?;
    if args.len() != 4 {
        return Err(Error::InvalidInput(format!(
            "expected 4 statement arguments, got {}",
            args.len()
        )));
    }

    let scope_id = args[3]
        .parse::<i64>()
        .map_err(|_| Error::InvalidInput(format!("scope id is not an integer: {}", args[3])))?;

    Ok(ChangeRecord {
        path: args[0].clone(),
        value: args[1].clone(),
        scope: args[2].clone(),
        scope_id,
    })
}

/// Split `'a', 'b', ...` into unescaped argument values.
fn split_quoted_arguments(inner: &str) -> Result<Vec<String>> {
    let mut args = Vec::new();
    let mut chars = inner.chars().peekable();

    loop {
        // Skip separators between arguments.
        while matches!(chars.peek(), Some(' ') | Some(',')) {
            chars.next();
        }
        match chars.next() {
            None => break,
            Some('\'') => {}
            Some(c) => {
                return Err(Error::InvalidInput(format!(
                    "expected quoted argument, found {:?}",
                    c
                )));
            }
        }

        let mut arg = String::new();
        loop {
            match chars.next() {
                Some('\\') => match chars.next() {
                    Some(c) => arg.push(c),
                    None => {
                        return Err(Error::InvalidInput(
                            "unterminated escape in statement".to_string(),
                        ));
                    }
                },
                Some('\'') => break,
                Some(c) => arg.push(c),
                None => {
                    return Err(Error::InvalidInput(
                        "unterminated argument in statement".to_string(),
                    ));
                }
            }
        }
        args.push(arg);
    }

    Ok(args)
}

/// Render a complete migration script body for a change.
pub fn render_migration_script(change: &ChangeRecord) -> String {
    format!(
        "{}{}\n{}",
        SCRIPT_HEADER,
        render_setup_statement(change),
        SCRIPT_FOOTER
    )
}

/// File name for a migration given the version transition.
///
/// No previous version marks an install migration; otherwise an
/// upgrade between the two explicit versions.
pub fn migration_file_name(previous: Option<&SetupVersion>, current: &SetupVersion) -> String {
    match previous {
        None => format!("data-install-{}.php", current),
        Some(prev) => format!("data-upgrade-{}-{}.php", prev, current),
    }
}

/// Outcome of a successful migration generation.
#[derive(Debug, Clone)]
pub struct GeneratedMigration {
    /// Version before the bump; None for an install migration
    pub previous: Option<SetupVersion>,
    /// Version the migration carries
    pub current: SetupVersion,
    /// File name of the migration script
    pub file_name: String,
    /// Full path the script was written to
    pub path: PathBuf,
}

/// Emits versioned migration files through injected descriptor and
/// script seams.
pub struct MigrationEmitter<'a> {
    store: &'a dyn DescriptorStore,
    sink: &'a dyn ScriptSink,
    module: String,
}

impl<'a> MigrationEmitter<'a> {
    pub fn new(store: &'a dyn DescriptorStore, sink: &'a dyn ScriptSink, module: &str) -> Self {
        Self {
            store,
            sink,
            module: module.to_string(),
        }
    }

    /// Generate a migration file for a change and persist the bumped
    /// version.
    ///
    /// The whole read-bump-write runs under a process-wide lock keyed
    /// on the module id, so two concurrent changes cannot both bump
    /// from the same previous version. The script is written before
    /// the descriptor: a failed file write never leaves the version
    /// bumped with no file behind it.
    pub fn generate(&self, change: &ChangeRecord) -> Result<GeneratedMigration> {
        let lock = module_lock(&self.module);
        let _guard = lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut descriptor = self.store.load(&self.module)?.ok_or_else(|| {
            Error::DescriptorUnavailable(format!(
                "no descriptor for {} at {}",
                self.module,
                self.store.location(&self.module)
            ))
        })?;
        if !descriptor.active {
            return Err(Error::DescriptorUnavailable(format!(
                "module {} is not active",
                self.module
            )));
        }

        let bump = version::bump(descriptor.version);
        let file_name = migration_file_name(bump.previous.as_ref(), &bump.current);
        let path = self
            .sink
            .write_script(&file_name, &render_migration_script(change))?;

        descriptor.version = Some(bump.current);
        self.store.store(&descriptor)?;

        Ok(GeneratedMigration {
            previous: bump.previous,
            current: bump.current,
            file_name,
            path,
        })
    }
}

/// Per-module generation locks, keyed by module id.
fn module_lock(module: &str) -> Arc<Mutex<()>> {
    static LOCKS: OnceLock<Mutex<HashMap<String, Arc<Mutex<()>>>>> = OnceLock::new();
    let registry = LOCKS.get_or_init(|| Mutex::new(HashMap::new()));
    let mut map = registry
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    map.entry(module.to_string())
        .or_insert_with(|| Arc::new(Mutex::new(())))
        .clone()
}
