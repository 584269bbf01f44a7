//! CLI configuration
//!
//! Sources, lowest precedence first: built-in defaults, `covenant.toml`,
//! `COVENANT_*` environment variables (a `.env` file is honored), then
//! command-line flags.

use covenant_core::error::{ConfigError, Result, ResultExt};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "covenant.toml";

pub const ENV_CATALOG: &str = "COVENANT_CATALOG";
pub const ENV_PROJECTS: &str = "COVENANT_PROJECTS";
pub const ENV_AUDIT_LOG: &str = "COVENANT_AUDIT_LOG";
pub const ENV_LOG: &str = "COVENANT_LOG";

const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

/// Main CLI configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Catalog file; the built-in catalog when unset
    pub catalog: Option<PathBuf>,

    /// Projects file
    pub projects: Option<PathBuf>,

    /// JSON Lines audit log; attempts are not persisted when unset
    pub audit_log: Option<PathBuf>,

    /// Default log level when `RUST_LOG` is not set
    pub log_level: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            catalog: None,
            projects: None,
            audit_log: None,
            log_level: "info".to_string(),
        }
    }
}

impl CliConfig {
    pub fn with_catalog(mut self, path: impl Into<PathBuf>) -> Self {
        self.catalog = Some(path.into());
        self
    }

    pub fn with_projects(mut self, path: impl Into<PathBuf>) -> Self {
        self.projects = Some(path.into());
        self
    }

    pub fn with_audit_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.audit_log = Some(path.into());
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self =
            toml::from_str(&content).with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// Explicit file, else `covenant.toml` if present, else defaults
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => Self::from_file(DEFAULT_CONFIG_FILE),
            None => Ok(Self::default()),
        }
    }

    /// Apply `COVENANT_*` overrides read through `lookup`
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = non_empty(ENV_CATALOG) {
            self.catalog = Some(v.into());
        }
        if let Some(v) = non_empty(ENV_PROJECTS) {
            self.projects = Some(v.into());
        }
        if let Some(v) = non_empty(ENV_AUDIT_LOG) {
            self.audit_log = Some(v.into());
        }
        if let Some(v) = non_empty(ENV_LOG) {
            self.log_level = v;
        }
        self
    }

    /// Apply overrides from the process environment
    pub fn with_process_env(self) -> Self {
        self.with_env(|key| std::env::var(key).ok())
    }

    pub fn validate(&self) -> Result<()> {
        let level = self.log_level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::InvalidValue {
                key: "log_level".to_string(),
                value: self.log_level.clone(),
            }
            .into());
        }
        Ok(())
    }

    /// The projects file, which commands that resolve require
    pub fn projects_path(&self) -> Result<&Path> {
        self.projects
            .as_deref()
            .ok_or_else(|| ConfigError::MissingSetting("projects".to_string()).into())
    }
}
