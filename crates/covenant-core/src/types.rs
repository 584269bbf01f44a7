//! Core types for Covenant
//!
//! This module defines the fundamental value types shared by the catalog,
//! the resolver and the service layer:
//! - Intents
//! - Rule severities
//! - Identifiers, timestamps and fingerprints

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a rule in the catalog
pub type RuleId = String;

/// Normalized action category a command maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Generate,
    Refactor,
    Review,
}

impl Intent {
    /// All intents, in declaration order
    pub const ALL: [Intent; 3] = [Intent::Generate, Intent::Refactor, Intent::Review];

    /// Stable lowercase identifier (`generate`, `refactor`, `review`)
    pub fn as_str(self) -> &'static str {
        match self {
            Intent::Generate => "generate",
            Intent::Refactor => "refactor",
            Intent::Review => "review",
        }
    }

    /// Human-readable label used in the contract heading
    pub fn label(self) -> &'static str {
        match self {
            Intent::Generate => "CODE GENERATION",
            Intent::Refactor => "CODE REFACTORING",
            Intent::Review => "CODE REVIEW",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Intent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "generate" => Ok(Intent::Generate),
            "refactor" => Ok(Intent::Refactor),
            "review" => Ok(Intent::Review),
            other => Err(format!("unknown intent: {other}")),
        }
    }
}

/// Rule severity
///
/// Only `error` rules can block a resolution; `warn` outranks `info` when
/// two conflicting rules meet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warn,
    Info,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warn => "warn",
            Severity::Info => "info",
        }
    }

    pub fn is_error(self) -> bool {
        matches!(self, Severity::Error)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Timestamp type alias
pub type Timestamp = DateTime<Utc>;

/// Create a timestamp for the current moment
///
/// Only the service layer calls this; the resolver never reads the clock.
pub fn now() -> Timestamp {
    Utc::now()
}

/// Blake3 digest of a contract, hex encoded
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Hash arbitrary bytes
    pub fn of(bytes: &[u8]) -> Self {
        Self(blake3::hash(bytes).to_hex().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
