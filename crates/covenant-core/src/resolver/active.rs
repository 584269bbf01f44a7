//! Active rule filter
//!
//! Intersects candidates with the catalog, applies toggle overrides and
//! intent applicability, and fixes the ascending-id order every later
//! tie-break depends on.

use crate::catalog::RuleDefinition;
use crate::project::RuleToggles;
use crate::types::{Intent, RuleId};
use std::collections::BTreeSet;

/// Select the rules that take part in conflict resolution
///
/// A rule is active when it is a candidate, is not toggled `false` (toggles
/// win over ruleset membership) and applies to `intent`. The result is
/// sorted ascending by id regardless of the input order.
pub fn select_active<'a>(
    rules: impl IntoIterator<Item = &'a RuleDefinition>,
    candidates: &BTreeSet<RuleId>,
    toggles: &RuleToggles,
    intent: Intent,
) -> Vec<&'a RuleDefinition> {
    let mut active: Vec<&RuleDefinition> = rules
        .into_iter()
        .filter(|rule| candidates.contains(&rule.id))
        .filter(|rule| toggles.get(&rule.id) != Some(&false))
        .filter(|rule| rule.applies_to(intent))
        .collect();
    active.sort_by(|a, b| a.id.cmp(&b.id));
    active
}
