//! Catalog - indexed, validated snapshot of rules, rulesets, stack presets and commands
//!
//! Catalog documents are flat lists. [`Catalog::from_document`] turns them into
//! id-keyed arenas, validates every cross reference once, and prebuilds the
//! [`ConflictGraph`]. After construction the catalog is immutable and can be
//! shared freely between concurrent resolutions.
//!
//! # Examples
//!
//! ```
//! use covenant_core::catalog::{Catalog, CatalogDocument, RuleDefinition, RulesetDefinition};
//! use covenant_core::types::Severity;
//!
//! let document = CatalogDocument {
//!     rules: vec![RuleDefinition::new("no-new-dependencies", Severity::Error)],
//!     rulesets: vec![RulesetDefinition::new("base").with_rule("no-new-dependencies")],
//!     ..Default::default()
//! };
//!
//! let catalog = Catalog::from_document(document)?;
//! assert!(catalog.rule("no-new-dependencies").is_some());
//! # Ok::<(), covenant_core::CatalogError>(())
//! ```

pub mod definitions;
pub mod graph;
pub mod loader;

pub use definitions::{
    CatalogDocument, CommandDefinition, ConstraintMap, RuleDefinition, RulesetDefinition,
    StackPresetDefinition, DEFAULT_TEMPLATE,
};
pub use graph::ConflictGraph;
pub use loader::{load_catalog, parse_catalog, CatalogFormat};

use crate::error::CatalogError;
use crate::resolver::render::ContractTemplate;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// Validated, id-indexed catalog snapshot
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    rules: BTreeMap<String, RuleDefinition>,
    rulesets: BTreeMap<String, RulesetDefinition>,
    stack_presets: BTreeMap<String, StackPresetDefinition>,
    commands: BTreeMap<String, CommandDefinition>,
    conflicts: ConflictGraph,
}

fn index<T>(
    kind: &'static str,
    items: Vec<T>,
    id_of: impl Fn(&T) -> &str,
) -> Result<BTreeMap<String, T>, CatalogError> {
    let mut map = BTreeMap::new();
    for item in items {
        match map.entry(id_of(&item).to_string()) {
            Entry::Occupied(entry) => {
                return Err(CatalogError::DuplicateId {
                    kind,
                    id: entry.key().clone(),
                })
            }
            Entry::Vacant(entry) => {
                entry.insert(item);
            }
        }
    }
    Ok(map)
}

impl Catalog {
    /// Index and validate a catalog document
    ///
    /// # Errors
    ///
    /// - duplicate ids within one kind of entry
    /// - a rule conflicting with itself or with an unknown rule
    /// - a ruleset referencing an unknown rule
    /// - a stack preset defaulting to an unknown ruleset
    /// - a command selecting an unknown contract template
    pub fn from_document(document: CatalogDocument) -> Result<Self, CatalogError> {
        let rules = index("rule", document.rules, |r| r.id.as_str())?;
        let rulesets = index("ruleset", document.rulesets, |r| r.id.as_str())?;
        let stack_presets = index("stack preset", document.stack_presets, |p| p.id.as_str())?;
        let commands = index("command", document.commands, |c| c.id.as_str())?;

        for rule in rules.values() {
            for other in &rule.conflicts_with {
                if *other == rule.id {
                    return Err(CatalogError::SelfConflict(rule.id.clone()));
                }
                if !rules.contains_key(other) {
                    return Err(CatalogError::UnknownConflict {
                        rule: rule.id.clone(),
                        other: other.clone(),
                    });
                }
            }
        }

        for ruleset in rulesets.values() {
            if let Some(missing) = ruleset.referenced_rules().find(|id| !rules.contains_key(*id)) {
                return Err(CatalogError::UnknownRulesetRule {
                    ruleset: ruleset.id.clone(),
                    rule: missing.clone(),
                });
            }
        }

        for preset in stack_presets.values() {
            if !rulesets.contains_key(&preset.default_ruleset_id) {
                return Err(CatalogError::UnknownDefaultRuleset {
                    preset: preset.id.clone(),
                    ruleset: preset.default_ruleset_id.clone(),
                });
            }
        }

        for command in commands.values() {
            if ContractTemplate::select(&command.template).is_none() {
                return Err(CatalogError::UnknownTemplate {
                    command: command.id.clone(),
                    template: command.template.clone(),
                });
            }
        }

        let conflicts = ConflictGraph::from_rules(rules.values());

        Ok(Self {
            rules,
            rulesets,
            stack_presets,
            commands,
            conflicts,
        })
    }

    pub fn rule(&self, id: &str) -> Option<&RuleDefinition> {
        self.rules.get(id)
    }

    pub fn ruleset(&self, id: &str) -> Option<&RulesetDefinition> {
        self.rulesets.get(id)
    }

    pub fn stack_preset(&self, id: &str) -> Option<&StackPresetDefinition> {
        self.stack_presets.get(id)
    }

    pub fn command(&self, id: &str) -> Option<&CommandDefinition> {
        self.commands.get(id)
    }

    /// All rules, ascending by id
    pub fn rules(&self) -> impl Iterator<Item = &RuleDefinition> {
        self.rules.values()
    }

    /// All rulesets, ascending by id
    pub fn rulesets(&self) -> impl Iterator<Item = &RulesetDefinition> {
        self.rulesets.values()
    }

    /// All stack presets, ascending by id
    pub fn stack_presets(&self) -> impl Iterator<Item = &StackPresetDefinition> {
        self.stack_presets.values()
    }

    /// All commands, ascending by id
    pub fn commands(&self) -> impl Iterator<Item = &CommandDefinition> {
        self.commands.values()
    }

    pub fn conflict_graph(&self) -> &ConflictGraph {
        &self.conflicts
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Flatten back into a document, every list ascending by id
    pub fn to_document(&self) -> CatalogDocument {
        CatalogDocument {
            rules: self.rules.values().cloned().collect(),
            rulesets: self.rulesets.values().cloned().collect(),
            stack_presets: self.stack_presets.values().cloned().collect(),
            commands: self.commands.values().cloned().collect(),
        }
    }
}

impl TryFrom<CatalogDocument> for Catalog {
    type Error = CatalogError;

    fn try_from(document: CatalogDocument) -> Result<Self, Self::Error> {
        Self::from_document(document)
    }
}
