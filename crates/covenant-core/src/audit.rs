//! Audit log of resolution attempts
//!
//! Every attempt, compiled or blocked, becomes one [`AuditEntry`]. Sinks are
//! pluggable through [`AuditSink`]: [`MemoryAuditLog`] keeps entries in a
//! buffer, [`JsonlAuditLog`] appends one JSON object per line to a file.

use crate::error::{Result, ResultExt};
use crate::result::{BlockReason, BlockedResolution, ResolvedContract};
use crate::types::{Fingerprint, RuleId, Timestamp};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Outcome recorded for an attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditStatus {
    Ok,
    Blocked,
}

/// One resolution attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub id: Uuid,

    pub recorded_at: Timestamp,

    pub project_id: String,

    pub command_id: String,

    pub status: AuditStatus,

    /// Id stamped onto the compiled contract
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_id: Option<Uuid>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<Fingerprint>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub applied_rules: Vec<RuleId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<BlockReason>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AuditEntry {
    /// Entry for a stamped contract
    pub fn compiled(contract: &ResolvedContract, fingerprint: Fingerprint, at: Timestamp) -> Self {
        Self {
            id: Uuid::new_v4(),
            recorded_at: at,
            project_id: contract.project_id.clone(),
            command_id: contract.command_id.clone(),
            status: AuditStatus::Ok,
            contract_id: contract.id,
            fingerprint: Some(fingerprint),
            applied_rules: contract
                .metadata
                .applied_rules
                .iter()
                .map(|r| r.id.clone())
                .collect(),
            reason: None,
            message: None,
        }
    }

    /// Entry for a blocked attempt
    pub fn blocked(
        project_id: impl Into<String>,
        command_id: impl Into<String>,
        blocked: &BlockedResolution,
        at: Timestamp,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            recorded_at: at,
            project_id: project_id.into(),
            command_id: command_id.into(),
            status: AuditStatus::Blocked,
            contract_id: None,
            fingerprint: None,
            applied_rules: Vec::new(),
            reason: Some(blocked.reason),
            message: Some(blocked.message.clone()),
        }
    }
}

/// Destination for audit entries
pub trait AuditSink: Send + Sync {
    /// Persist one entry
    fn record(&self, entry: &AuditEntry) -> Result<()>;
}

/// In-memory audit log
#[derive(Debug, Default)]
pub struct MemoryAuditLog {
    entries: Mutex<Vec<AuditEntry>>,
}

impl MemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all entries, oldest first
    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl AuditSink for MemoryAuditLog {
    fn record(&self, entry: &AuditEntry) -> Result<()> {
        self.entries.lock().push(entry.clone());
        Ok(())
    }
}

/// Append-only JSON Lines audit log
#[derive(Debug)]
pub struct JsonlAuditLog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonlAuditLog {
    /// Log to `path`, creating parent directories as needed
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating audit directory {}", parent.display()))?;
        }
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every entry back; malformed lines are skipped
    pub fn read_all(&self) -> Result<Vec<AuditEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("reading audit log {}", self.path.display()))?;

        Ok(content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| match serde_json::from_str(line) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!(path = %self.path.display(), error = %e, "skipping malformed audit line");
                    None
                }
            })
            .collect())
    }
}

impl AuditSink for JsonlAuditLog {
    fn record(&self, entry: &AuditEntry) -> Result<()> {
        let mut line = serde_json::to_string(entry)?;
        line.push('\n');

        let _guard = self.write_lock.lock();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("opening audit log {}", self.path.display()))?;
        file.write_all(line.as_bytes())
            .with_context(|| format!("writing audit log {}", self.path.display()))?;
        Ok(())
    }
}
