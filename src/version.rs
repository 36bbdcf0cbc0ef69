//! Setup-script version numbers.
//!
//! Migration files are versioned with a three-field dotted version
//! (`major.minor.patch`). Each bump increments the patch field; a field
//! that reaches [`FIELD_BASE`] resets to 0 and carries into the next
//! higher field. The major field is never wrapped.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A field that reaches this value resets to 0 and carries; the largest
/// single-field value after a bump is therefore 9.
pub const FIELD_BASE: u32 = 10;

/// A three-field setup version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct SetupVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl SetupVersion {
    /// The version assigned to the first-ever migration.
    pub const INITIAL: SetupVersion = SetupVersion {
        major: 0,
        minor: 0,
        patch: 1,
    };

    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parse a version string of exactly three dot-separated
    /// non-negative integers. Anything else is a [`Error::VersionParse`].
    pub fn parse(s: &str) -> Result<Self> {
        let fields: Vec<&str> = s.split('.').collect();
        if fields.len() != 3 {
            return Err(Error::VersionParse(format!(
                "expected three dot-separated fields, got: {}",
                s
            )));
        }

        let mut parsed = [0u32; 3];
        for (i, field) in fields.iter().enumerate() {
            parsed[i] = field.parse::<u32>().map_err(|_| {
                Error::VersionParse(format!("field {:?} is not a non-negative integer", field))
            })?;
        }

        Ok(Self::new(parsed[0], parsed[1], parsed[2]))
    }

    /// Return the version that follows this one.
    ///
    /// Increments patch; carries into minor and then major when a field
    /// reaches [`FIELD_BASE`]. Major is left unbounded.
    pub fn next(&self) -> Self {
        let mut next = *self;
        next.patch += 1;
        if next.patch == FIELD_BASE {
            next.patch = 0;
            next.minor += 1;
            if next.minor == FIELD_BASE {
                next.minor = 0;
                next.major += 1;
            }
        }
        next
    }
}

impl fmt::Display for SetupVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for SetupVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<SetupVersion> for String {
    fn from(v: SetupVersion) -> String {
        v.to_string()
    }
}

impl TryFrom<String> for SetupVersion {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

/// Result of bumping a module's version for a new migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionBump {
    /// The version before the bump; `None` for an install migration.
    pub previous: Option<SetupVersion>,
    /// The version the new migration carries.
    pub current: SetupVersion,
}

impl VersionBump {
    /// True when the bump starts a fresh version history.
    pub fn is_install(&self) -> bool {
        self.previous.is_none()
    }
}

/// Compute the next version from a possibly-absent previous one.
///
/// No previous version means an install migration at
/// [`SetupVersion::INITIAL`]; otherwise the previous version is
/// incremented with carry.
pub fn bump(previous: Option<SetupVersion>) -> VersionBump {
    match previous {
        None => VersionBump {
            previous: None,
            current: SetupVersion::INITIAL,
        },
        Some(prev) => VersionBump {
            previous: Some(prev),
            current: prev.next(),
        },
    }
}
