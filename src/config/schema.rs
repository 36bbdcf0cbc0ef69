//! KDL schema for config.kdl.
//!
//! ```kdl
//! generate-migrations #true
//! migration-module "Acme_Migrations"
//! migration-resource "acme_migrations_setup"
//! ```

use kdl::{KdlDocument, KdlEntry, KdlNode, KdlValue};
use serde::{Deserialize, Serialize};

/// Tool configuration, all fields optional so that session and system
/// files can each set a subset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfmigConfig {
    /// Whether migration files are generated at all
    pub generate_migrations: Option<bool>,

    /// Identifier of the migration module (e.g., "Acme_Migrations")
    pub migration_module: Option<String>,

    /// Setup resource subdirectory of the migration module
    pub migration_resource: Option<String>,
}

impl ConfmigConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the config values.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(ref module) = self.migration_module {
            if module.is_empty() || !module.contains('_') {
                return Err(format!(
                    "migration-module must look like Vendor_Name, got {:?}",
                    module
                ));
            }
        }
        if let Some(ref resource) = self.migration_resource {
            if resource.is_empty() {
                return Err("migration-resource must not be empty".to_string());
            }
        }
        Ok(())
    }

    /// Parse config from a KDL document. Unknown nodes are ignored.
    pub fn from_kdl(doc: &KdlDocument) -> Self {
        let mut config = Self::new();

        if let Some(node) = doc.get("generate-migrations") {
            if let Some(entry) = node.entries().first() {
                if let Some(b) = entry.value().as_bool() {
                    config.generate_migrations = Some(b);
                }
            }
        }

        if let Some(node) = doc.get("migration-module") {
            if let Some(entry) = node.entries().first() {
                if let Some(s) = entry.value().as_string() {
                    config.migration_module = Some(s.to_string());
                }
            }
        }

        if let Some(node) = doc.get("migration-resource") {
            if let Some(entry) = node.entries().first() {
                if let Some(s) = entry.value().as_string() {
                    config.migration_resource = Some(s.to_string());
                }
            }
        }

        config
    }

    /// Convert config to a KDL document.
    pub fn to_kdl(&self) -> KdlDocument {
        let mut doc = KdlDocument::new();

        if let Some(generate) = self.generate_migrations {
            let mut node = KdlNode::new("generate-migrations");
            node.push(KdlEntry::new(KdlValue::Bool(generate)));
            doc.nodes_mut().push(node);
        }

        if let Some(ref module) = self.migration_module {
            let mut node = KdlNode::new("migration-module");
            node.push(KdlEntry::new(KdlValue::String(module.clone())));
            doc.nodes_mut().push(node);
        }

        if let Some(ref resource) = self.migration_resource {
            let mut node = KdlNode::new("migration-resource");
            node.push(KdlEntry::new(KdlValue::String(resource.clone())));
            doc.nodes_mut().push(node);
        }

        doc
    }

    /// Merge another config into this one.
    /// Values from `other` override values in `self` if they are Some.
    pub fn merge(&mut self, other: &ConfmigConfig) {
        if other.generate_migrations.is_some() {
            self.generate_migrations = other.generate_migrations;
        }
        if other.migration_module.is_some() {
            self.migration_module = other.migration_module.clone();
        }
        if other.migration_resource.is_some() {
            self.migration_resource = other.migration_resource.clone();
        }
    }
}
