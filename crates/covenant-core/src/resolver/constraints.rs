//! Constraint compilation

use crate::catalog::{ConstraintMap, RuleDefinition, StackPresetDefinition};

/// Preset baseline overlaid with each rule's contributions
///
/// `resolved` is expected in ascending-id order; the last contribution to a
/// key wins. Overwritten keys keep their first position, new keys append.
pub fn compile_constraints(
    stack_preset: &StackPresetDefinition,
    resolved: &[&RuleDefinition],
) -> ConstraintMap {
    let mut constraints = stack_preset.constraints.clone();
    for rule in resolved {
        for (key, value) in &rule.contributes_constraints {
            constraints.insert(key.clone(), value.clone());
        }
    }
    constraints
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Severity;
    use serde_json::json;

    fn preset() -> StackPresetDefinition {
        StackPresetDefinition::new("nextjs-app-router", "starter")
            .with_constraint("x", json!(1))
            .with_constraint("styling", json!("tailwind"))
    }

    #[test]
    fn test_later_rule_wins() {
        let two = RuleDefinition::new("rule-a", Severity::Warn).contributes("x", json!(2));
        let three = RuleDefinition::new("rule-b", Severity::Warn).contributes("x", json!(3));

        let constraints = compile_constraints(&preset(), &[&two, &three]);
        assert_eq!(constraints["x"], json!(3));
    }

    #[test]
    fn test_key_order_preserved() {
        let rule = RuleDefinition::new("rule-a", Severity::Info)
            .contributes("requireTests", json!(true))
            .contributes("x", json!(9));

        let constraints = compile_constraints(&preset(), &[&rule]);
        let keys: Vec<_> = constraints.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["x", "styling", "requireTests"]);
        assert_eq!(constraints["x"], json!(9));
    }

    #[test]
    fn test_no_rules_is_baseline() {
        let constraints = compile_constraints(&preset(), &[]);
        assert_eq!(constraints, preset().constraints);
    }

    #[test]
    fn test_empty_everything() {
        let bare = StackPresetDefinition::new("bare", "starter");
        assert!(compile_constraints(&bare, &[]).is_empty());
    }
}
