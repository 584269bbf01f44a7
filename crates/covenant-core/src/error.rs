//! Error types for Covenant Core
//!
//! This module defines the infrastructure errors of the crate: loading,
//! parsing and validating catalogs, project files and configuration.
//! A blocked resolution is *not* an error; see [`crate::result::ResolveResult`].
//! We use `thiserror` for ergonomic error definitions with automatic Display/Error implementations.

use thiserror::Error;

/// Result type alias for Covenant operations
pub type Result<T> = std::result::Result<T, CovenantError>;

/// Main error type for Covenant operations
#[derive(Error, Debug)]
pub enum CovenantError {
    /// Catalog validation errors
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// JSON serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parse errors
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        source: Box<CovenantError>,
    },
}

/// Errors raised while validating a catalog snapshot
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Duplicate {kind} id: {id}")]
    DuplicateId { kind: &'static str, id: String },

    #[error("Ruleset {ruleset} references unknown rule {rule}")]
    UnknownRulesetRule { ruleset: String, rule: String },

    #[error("Rule {rule} declares a conflict with unknown rule {other}")]
    UnknownConflict { rule: String, other: String },

    #[error("Rule {0} declares a conflict with itself")]
    SelfConflict(String),

    #[error("Stack preset {preset} defaults to unknown ruleset {ruleset}")]
    UnknownDefaultRuleset { preset: String, ruleset: String },

    #[error("Command {command} selects unknown template {template}")]
    UnknownTemplate { command: String, template: String },

    #[error("Unsupported catalog format: {0}")]
    UnsupportedFormat(String),
}

/// Errors related to configuration files and project definitions
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Duplicate project id: {0}")]
    DuplicateProject(String),

    #[error("Missing required setting: {0}")]
    MissingSetting(String),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

impl CovenantError {
    /// Add context to an error
    pub fn context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to a Result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add lazy context to a Result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<CovenantError>,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.into().context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.into().context(f()))
    }
}
