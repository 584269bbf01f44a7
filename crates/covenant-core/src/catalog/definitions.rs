//! Catalog entry definitions
//!
//! Plain data shapes for rules, rulesets, stack presets and commands. They
//! carry no behavior beyond small builder helpers; the catalog treats them
//! as static input.

use crate::types::{Intent, RuleId, Severity};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Constraint map: key order is the insertion order
pub type ConstraintMap = Map<String, Value>;

/// Template selector used when a command does not name one
pub const DEFAULT_TEMPLATE: &str = "default";

/// A single directive with a severity and intent applicability
///
/// # Examples
///
/// ```
/// use covenant_core::catalog::RuleDefinition;
/// use covenant_core::types::{Intent, Severity};
///
/// let rule = RuleDefinition::new("no-new-dependencies", Severity::Error)
///     .with_directive("Do not add new third-party dependencies.")
///     .with_intents([Intent::Generate, Intent::Refactor])
///     .conflicts_with("allow-experimental-packages");
///
/// assert!(rule.applies_to(Intent::Generate));
/// assert!(!rule.applies_to(Intent::Review));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleDefinition {
    /// Unique identifier
    pub id: RuleId,

    /// Short human-readable title
    pub title: String,

    #[serde(default)]
    pub description: String,

    pub severity: Severity,

    /// Intents this rule applies to
    #[serde(alias = "intents")]
    pub applies_to: BTreeSet<Intent>,

    /// Text fragment injected into the contract
    pub directive: String,

    /// Rules this one cannot coexist with (symmetric)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conflicts_with: Vec<RuleId>,

    /// Constraint overrides merged on top of the stack preset baseline
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub contributes_constraints: ConstraintMap,
}

impl RuleDefinition {
    /// Create a rule that applies to every intent, titled after its id
    pub fn new(id: impl Into<String>, severity: Severity) -> Self {
        let id = id.into();
        Self {
            title: id.clone(),
            id,
            description: String::new(),
            severity,
            applies_to: Intent::ALL.into_iter().collect(),
            directive: String::new(),
            conflicts_with: Vec::new(),
            contributes_constraints: Map::new(),
        }
    }

    pub fn with_directive(mut self, directive: impl Into<String>) -> Self {
        self.directive = directive.into();
        self
    }

    /// Replace the applicable intents
    pub fn with_intents(mut self, intents: impl IntoIterator<Item = Intent>) -> Self {
        self.applies_to = intents.into_iter().collect();
        self
    }

    pub fn conflicts_with(mut self, other: impl Into<String>) -> Self {
        self.conflicts_with.push(other.into());
        self
    }

    pub fn contributes(mut self, key: impl Into<String>, value: Value) -> Self {
        self.contributes_constraints.insert(key.into(), value);
        self
    }

    pub fn applies_to(&self, intent: Intent) -> bool {
        self.applies_to.contains(&intent)
    }

    /// Whether this rule itself declares a conflict with `other`
    pub fn declares_conflict_with(&self, other: &str) -> bool {
        self.conflicts_with.iter().any(|id| id == other)
    }
}

/// A named bundle of mandatory and optional rule ids
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RulesetDefinition {
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Mandatory rules, enabled unless toggled off
    #[serde(default)]
    pub rule_ids: Vec<RuleId>,

    /// Optional rules, disabled unless toggled on
    #[serde(default)]
    pub optional_rule_ids: Vec<RuleId>,
}

impl RulesetDefinition {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            description: String::new(),
            rule_ids: Vec::new(),
            optional_rule_ids: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_rule(mut self, rule_id: impl Into<String>) -> Self {
        self.rule_ids.push(rule_id.into());
        self
    }

    pub fn with_optional_rule(mut self, rule_id: impl Into<String>) -> Self {
        self.optional_rule_ids.push(rule_id.into());
        self
    }

    /// Every rule id referenced by this ruleset, mandatory first
    pub fn referenced_rules(&self) -> impl Iterator<Item = &RuleId> {
        self.rule_ids.iter().chain(self.optional_rule_ids.iter())
    }
}

/// Baseline configuration for a technology stack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackPresetDefinition {
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub description: String,

    pub default_ruleset_id: String,

    #[serde(default)]
    pub constraints: ConstraintMap,
}

impl StackPresetDefinition {
    pub fn new(id: impl Into<String>, default_ruleset_id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            description: String::new(),
            default_ruleset_id: default_ruleset_id.into(),
            constraints: Map::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_constraint(mut self, key: impl Into<String>, value: Value) -> Self {
        self.constraints.insert(key.into(), value);
        self
    }
}

/// A user-facing command mapped to exactly one intent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandDefinition {
    pub id: String,

    pub name: String,

    pub intent: Intent,

    /// Contract template selector
    #[serde(default = "default_template")]
    pub template: String,
}

fn default_template() -> String {
    DEFAULT_TEMPLATE.to_string()
}

impl CommandDefinition {
    pub fn new(id: impl Into<String>, intent: Intent) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            intent,
            template: default_template(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }
}

/// Raw catalog content as read from a document, before validation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogDocument {
    #[serde(default)]
    pub rules: Vec<RuleDefinition>,

    #[serde(default)]
    pub rulesets: Vec<RulesetDefinition>,

    #[serde(default)]
    pub stack_presets: Vec<StackPresetDefinition>,

    #[serde(default)]
    pub commands: Vec<CommandDefinition>,
}
