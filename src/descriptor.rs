//! Migration-module descriptor handling.
//!
//! The host platform tracks each module in a small XML descriptor at
//! `<app>/etc/modules/<Module_Name>.xml`:
//!
//! ```xml
//! <config>
//!     <modules>
//!         <Acme_Migrations>
//!             <active>true</active>
//!             <codePool>local</codePool>
//!             <version>0.0.3</version>
//!         </Acme_Migrations>
//!     </modules>
//! </config>
//! ```
//!
//! The grammar is owned by the platform and fixed in shape, so this
//! module reads the three known tags directly and writes the document
//! back literally. Tag values never contain markup.

use std::fs;
use std::path::{Path, PathBuf};

use crate::version::SetupVersion;
use crate::{Error, Result};

/// Module metadata tracked by the host platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    /// Module identifier (e.g., "Acme_Migrations")
    pub module: String,
    /// Whether the module is marked active
    pub active: bool,
    /// Code pool the module lives in (e.g., "local")
    pub code_pool: String,
    /// Current version; None before the first migration
    pub version: Option<SetupVersion>,
}

impl Descriptor {
    /// Parse a descriptor document for the named module.
    ///
    /// Returns `Ok(None)` if the document has no node for the module.
    pub fn from_xml(module: &str, xml: &str) -> Result<Option<Self>> {
        let Some(body) = tag_body(xml, module) else {
            return Ok(None);
        };

        let active = matches!(tag_body(body, "active"), Some(v) if v.trim() == "true");
        let code_pool = tag_body(body, "codePool")
            .map(|v| v.trim().to_string())
            .unwrap_or_else(|| "local".to_string());
        let version = match tag_body(body, "version").map(str::trim) {
            None | Some("") => None,
            Some(v) => Some(SetupVersion::parse(v)?),
        };

        Ok(Some(Self {
            module: module.to_string(),
            active,
            code_pool,
            version,
        }))
    }

    /// Render the descriptor back into its XML document.
    pub fn to_xml(&self) -> String {
        let version = self
            .version
            .map(|v| v.to_string())
            .unwrap_or_default();
        format!(
            "<config>\n    <modules>\n        <{module}>\n            <active>{active}</active>\n            <codePool>{pool}</codePool>\n            <version>{version}</version>\n        </{module}>\n    </modules>\n</config>\n",
            module = self.module,
            active = self.active,
            pool = self.code_pool,
        )
    }
}

/// Extract the text between `<tag>` and `</tag>`, if present.
fn tag_body<'a>(xml: &'a str, tag: &str) -> Option<&'a str> {
    let open = format!("<{}>", tag);
    let close = format!("</{}>", tag);
    let start = xml.find(&open)? + open.len();
    let end = xml[start..].find(&close)? + start;
    Some(&xml[start..end])
}

/// Persistence seam for module descriptors.
///
/// Injected into the emitter so that version state is never reached
/// through ambient lookup.
pub trait DescriptorStore {
    /// Load the descriptor for a module; `Ok(None)` if the module has
    /// no descriptor at all.
    fn load(&self, module: &str) -> Result<Option<Descriptor>>;

    /// Persist an updated descriptor.
    fn store(&self, descriptor: &Descriptor) -> Result<()>;

    /// Location description for error messages and display.
    fn location(&self, module: &str) -> String;
}

/// Descriptor store backed by `<app>/etc/modules/<Module>.xml`.
pub struct FileDescriptorStore {
    app_dir: PathBuf,
}

impl FileDescriptorStore {
    pub fn new(app_dir: impl Into<PathBuf>) -> Self {
        Self {
            app_dir: app_dir.into(),
        }
    }

    /// Path to the descriptor file for a module.
    pub fn descriptor_path(&self, module: &str) -> PathBuf {
        self.app_dir
            .join("etc")
            .join("modules")
            .join(format!("{}.xml", module))
    }
}

impl DescriptorStore for FileDescriptorStore {
    fn load(&self, module: &str) -> Result<Option<Descriptor>> {
        let path = self.descriptor_path(module);
        if !path.exists() {
            return Ok(None);
        }
        let xml = fs::read_to_string(&path)?;
        Descriptor::from_xml(module, &xml)
    }

    fn store(&self, descriptor: &Descriptor) -> Result<()> {
        let path = self.descriptor_path(&descriptor.module);
        write_descriptor(&path, &descriptor.to_xml())
    }

    fn location(&self, module: &str) -> String {
        self.descriptor_path(module).display().to_string()
    }
}

fn write_descriptor(path: &Path, xml: &str) -> Result<()> {
    fs::write(path, xml).map_err(|source| Error::DescriptorWrite {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<config>
    <modules>
        <Acme_Migrations>
            <active>true</active>
            <codePool>local</codePool>
            <version>0.0.3</version>
        </Acme_Migrations>
    </modules>
</config>
"#;

    #[test]
    fn test_parse_full_descriptor() {
        let d = Descriptor::from_xml("Acme_Migrations", SAMPLE)
            .unwrap()
            .unwrap();
        assert!(d.active);
        assert_eq!(d.code_pool, "local");
        assert_eq!(d.version.unwrap().to_string(), "0.0.3");
    }

    #[test]
    fn test_parse_missing_module_is_none() {
        let d = Descriptor::from_xml("Other_Module", SAMPLE).unwrap();
        assert!(d.is_none());
    }

    #[test]
    fn test_parse_empty_version_is_none() {
        let xml = SAMPLE.replace("<version>0.0.3</version>", "<version></version>");
        let d = Descriptor::from_xml("Acme_Migrations", &xml).unwrap().unwrap();
        assert!(d.version.is_none());
    }

    #[test]
    fn test_parse_missing_version_tag_is_none() {
        let xml = SAMPLE.replace("<version>0.0.3</version>", "");
        let d = Descriptor::from_xml("Acme_Migrations", &xml).unwrap().unwrap();
        assert!(d.version.is_none());
    }

    #[test]
    fn test_parse_inactive_module() {
        let xml = SAMPLE.replace("<active>true</active>", "<active>false</active>");
        let d = Descriptor::from_xml("Acme_Migrations", &xml).unwrap().unwrap();
        assert!(!d.active);
    }

    #[test]
    fn test_malformed_version_is_an_error() {
        let xml = SAMPLE.replace("0.0.3", "0.0");
        assert!(Descriptor::from_xml("Acme_Migrations", &xml).is_err());
    }

    #[test]
    fn test_render_round_trips() {
        let d = Descriptor {
            module: "Acme_Migrations".to_string(),
            active: true,
            code_pool: "community".to_string(),
            version: Some(SetupVersion::new(1, 2, 3)),
        };
        let parsed = Descriptor::from_xml("Acme_Migrations", &d.to_xml())
            .unwrap()
            .unwrap();
        assert_eq!(parsed, d);
    }

    #[test]
    fn test_file_store_load_missing_is_none() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = FileDescriptorStore::new(dir.path());
        assert!(store.load("Acme_Migrations").unwrap().is_none());
    }

    #[test]
    fn test_file_store_round_trips() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("etc/modules")).unwrap();
        let store = FileDescriptorStore::new(dir.path());
        let d = Descriptor {
            module: "Acme_Migrations".to_string(),
            active: true,
            code_pool: "local".to_string(),
            version: Some(SetupVersion::INITIAL),
        };
        store.store(&d).unwrap();
        assert_eq!(store.load("Acme_Migrations").unwrap().unwrap(), d);
    }
}
