//! Candidate selection: ruleset + toggles -> candidate rule ids

use crate::catalog::RulesetDefinition;
use crate::project::RuleToggles;
use crate::types::RuleId;
use std::collections::BTreeSet;

/// Mandatory rules plus every optional rule toggled exactly `true`
///
/// Mandatory rules are included here even when toggled off; the active-rule
/// filter applies that override.
pub fn build_candidates(ruleset: &RulesetDefinition, toggles: &RuleToggles) -> BTreeSet<RuleId> {
    let mut candidates: BTreeSet<RuleId> = ruleset.rule_ids.iter().cloned().collect();
    candidates.extend(
        ruleset
            .optional_rule_ids
            .iter()
            .filter(|id| toggles.get(*id) == Some(&true))
            .cloned(),
    );
    candidates
}
