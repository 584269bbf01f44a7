//! Resolution outcomes
//!
//! A resolution either yields a [`ResolvedContract`] or a
//! [`BlockedResolution`]. Both are ordinary values: "blocked" is an expected
//! outcome, not an error. Serialized, the union carries a `status` tag of
//! `"ok"` or `"blocked"`.

use crate::catalog::ConstraintMap;
use crate::types::{Fingerprint, Intent, RuleId, Severity, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Fixed stop conditions embedded in every contract
pub const STOP_CONDITIONS: [&str; 2] = [
    "Stop and ask for clarification if the request is ambiguous or would require violating a rule.",
    "Stop and report if the change cannot be completed within the constraints above.",
];

/// Outcome of a resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ResolveResult {
    Ok(ResolvedContract),
    Blocked(BlockedResolution),
}

impl ResolveResult {
    pub fn is_ok(&self) -> bool {
        matches!(self, ResolveResult::Ok(_))
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, ResolveResult::Blocked(_))
    }

    pub fn contract(&self) -> Option<&ResolvedContract> {
        match self {
            ResolveResult::Ok(contract) => Some(contract),
            ResolveResult::Blocked(_) => None,
        }
    }

    pub fn blocked(&self) -> Option<&BlockedResolution> {
        match self {
            ResolveResult::Ok(_) => None,
            ResolveResult::Blocked(blocked) => Some(blocked),
        }
    }
}

impl From<BlockedResolution> for ResolveResult {
    fn from(blocked: BlockedResolution) -> Self {
        ResolveResult::Blocked(blocked)
    }
}

/// A rule that made it into the contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedRule {
    pub id: RuleId,
    pub severity: Severity,
}

/// Contract metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractMetadata {
    pub stack_preset_id: String,

    /// Applied rules, ascending by id
    pub applied_rules: Vec<AppliedRule>,

    /// Compiled constraints in merge order
    pub constraints: ConstraintMap,

    pub stop_conditions: Vec<String>,
}

/// A compiled instruction contract
///
/// The resolver leaves `id` and `generated_at` unset; the consumer stamps
/// them with [`ResolvedContract::stamp`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedContract {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<Timestamp>,

    pub project_id: String,

    pub command_id: String,

    pub intent_id: Intent,

    pub contract: String,

    pub metadata: ContractMetadata,
}

impl ResolvedContract {
    /// Whether id or timestamp have been filled in
    pub fn is_stamped(&self) -> bool {
        self.id.is_some() || self.generated_at.is_some()
    }

    /// Fill in the identity fields
    pub fn stamp(mut self, id: Uuid, generated_at: Timestamp) -> Self {
        self.id = Some(id);
        self.generated_at = Some(generated_at);
        self
    }

    /// Ids of the applied rules, ascending
    pub fn applied_rule_ids(&self) -> Vec<&str> {
        self.metadata
            .applied_rules
            .iter()
            .map(|r| r.id.as_str())
            .collect()
    }

    /// Blake3 digest of the contract content, ignoring id and timestamp
    ///
    /// The digest covers the JSON form. Every map in a contract is
    /// string-keyed, so serializing it never fails.
    pub fn fingerprint(&self) -> Fingerprint {
        let unstamped = ResolvedContract {
            id: None,
            generated_at: None,
            ..self.clone()
        };
        let bytes = serde_json::to_vec(&unstamped).unwrap_or_default();
        Fingerprint::of(&bytes)
    }
}

/// Why a resolution was blocked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockReason {
    UnknownCommand,
    MissingProject,
    ConflictingRules,
    InvalidConfiguration,
}

impl BlockReason {
    pub fn as_str(self) -> &'static str {
        match self {
            BlockReason::UnknownCommand => "unknown_command",
            BlockReason::MissingProject => "missing_project",
            BlockReason::ConflictingRules => "conflicting_rules",
            BlockReason::InvalidConfiguration => "invalid_configuration",
        }
    }
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An unresolvable pair of error-severity rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    /// Lexicographically smaller id
    pub a: RuleId,
    pub b: RuleId,
    pub reason: String,
}

impl Conflict {
    pub fn between_errors(a: impl Into<String>, b: impl Into<String>) -> Self {
        let (a, b) = (a.into(), b.into());
        let reason = format!("Rules {a} and {b} are both errors and conflict with each other");
        Self { a, b, reason }
    }
}

/// A terminal, non-error outcome: no contract could be compiled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockedResolution {
    pub reason: BlockReason,

    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conflicts: Option<Vec<Conflict>>,
}

impl BlockedResolution {
    pub fn new(reason: BlockReason, message: impl Into<String>) -> Self {
        Self {
            reason,
            message: message.into(),
            conflicts: None,
        }
    }

    pub fn missing_project(project_id: &str) -> Self {
        Self::new(
            BlockReason::MissingProject,
            format!("Project not found: {project_id}"),
        )
    }

    pub fn unknown_command(command_id: &str) -> Self {
        Self::new(
            BlockReason::UnknownCommand,
            format!("Unknown command: {command_id}"),
        )
    }

    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::new(BlockReason::InvalidConfiguration, message)
    }

    pub fn conflicting_rules(conflicts: Vec<Conflict>) -> Self {
        let pairs: Vec<String> = conflicts
            .iter()
            .map(|c| format!("{} <-> {}", c.a, c.b))
            .collect();
        Self {
            reason: BlockReason::ConflictingRules,
            message: format!("Conflicting error rules: {}", pairs.join(", ")),
            conflicts: Some(conflicts),
        }
    }
}

impl fmt::Display for BlockedResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.reason, self.message)
    }
}
