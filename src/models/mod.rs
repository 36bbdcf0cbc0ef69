//! Data models for confmig entities.
//!
//! This module defines the core data structures:
//! - `ChangeRecord` - One detected configuration mutation
//! - `Notification` - A message about a recorded change, kept for later display

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::version::SetupVersion;

/// Message kind under which migration notifications are stored.
pub const MIGRATION_MESSAGE_KIND: &str = "migration";

/// One detected configuration mutation.
///
/// Produced once per observed settings change and consumed immediately;
/// it is not retained beyond the invocation that recorded it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    /// Dotted configuration key (e.g., "web/secure/base_url")
    pub path: String,

    /// New value
    pub value: String,

    /// Scope kind (e.g., "default", "website", "store")
    pub scope: String,

    /// Numeric identifier of the scope instance
    pub scope_id: i64,
}

impl ChangeRecord {
    /// Create a change record for the default scope.
    pub fn new(path: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            value: value.into(),
            scope: "default".to_string(),
            scope_id: 0,
        }
    }

    /// Create a change record with an explicit scope.
    pub fn with_scope(
        path: impl Into<String>,
        value: impl Into<String>,
        scope: impl Into<String>,
        scope_id: i64,
    ) -> Self {
        Self {
            path: path.into(),
            value: value.into(),
            scope: scope.into(),
            scope_id,
        }
    }
}

/// A message about a recorded change, stored append-only and retrieved
/// by kind for later display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    /// Message kind (currently always "migration")
    pub kind: String,

    /// The rendered setup statement for this change
    pub statement: String,

    /// The change this message describes
    pub change: ChangeRecord,

    /// Version before the bump; None when no migration file was generated
    /// or when the migration was an install
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_version: Option<SetupVersion>,

    /// Version assigned to the generated migration, if one was generated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_version: Option<SetupVersion>,

    /// File name of the generated migration, if one was generated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Create a migration notification for a change that was only logged.
    pub fn logged(change: ChangeRecord, statement: String) -> Self {
        Self {
            kind: MIGRATION_MESSAGE_KIND.to_string(),
            statement,
            change,
            previous_version: None,
            current_version: None,
            file: None,
            created_at: Utc::now(),
        }
    }

    /// Create a migration notification for a change with a generated file.
    pub fn generated(
        change: ChangeRecord,
        statement: String,
        previous_version: Option<SetupVersion>,
        current_version: SetupVersion,
        file: String,
    ) -> Self {
        Self {
            kind: MIGRATION_MESSAGE_KIND.to_string(),
            statement,
            change,
            previous_version,
            current_version: Some(current_version),
            file: Some(file),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_record_defaults_to_default_scope() {
        let change = ChangeRecord::new("general/store_information/name", "Acme");
        assert_eq!(change.scope, "default");
        assert_eq!(change.scope_id, 0);
    }

    #[test]
    fn test_change_record_serializes_scope_id_as_number() {
        let change = ChangeRecord::with_scope("a/b/c", "1", "store", 3);
        let json = serde_json::to_value(&change).unwrap();
        assert_eq!(json["scope_id"], 3);
        assert_eq!(json["scope"], "store");
    }

    #[test]
    fn test_notification_kind_is_migration() {
        let change = ChangeRecord::new("a/b/c", "1");
        let msg = Notification::logged(change, "stmt".to_string());
        assert_eq!(msg.kind, MIGRATION_MESSAGE_KIND);
        assert!(msg.file.is_none());
    }
}
