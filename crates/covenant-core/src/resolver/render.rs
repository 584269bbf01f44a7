//! Contract text rendering
//!
//! Contracts are produced from a fixed template with `{{PLACEHOLDER}}`
//! slots. Placeholders are substituted in a single pass, so directive or
//! constraint text that happens to contain `{{...}}` is copied verbatim.

use crate::catalog::{ConstraintMap, RuleDefinition, DEFAULT_TEMPLATE};
use crate::result::STOP_CONDITIONS;
use crate::types::Intent;
use serde_json::Value;

/// Rules fallback line
pub const NO_RULES: &str = "- No specific rules applied.";

/// Constraints fallback line
pub const NO_CONSTRAINTS: &str = "- No specific constraints applied.";

const DEFAULT_BODY: &str = "\
# {{INTENT_LABEL}} CONTRACT

You are performing a {{INTENT_LABEL}} task. Follow every rule below.

## Rules
{{RULES}}

## Constraints
{{CONSTRAINTS}}

## Context
Stack: {{STACK}}

## Stop Conditions
{{STOP_CONDITIONS}}
";

/// A named contract template
#[derive(Debug, PartialEq, Eq)]
pub struct ContractTemplate {
    pub name: &'static str,
    body: &'static str,
}

static TEMPLATES: [ContractTemplate; 1] = [ContractTemplate {
    name: DEFAULT_TEMPLATE,
    body: DEFAULT_BODY,
}];

impl ContractTemplate {
    /// Look a template up by its selector
    pub fn select(name: &str) -> Option<&'static ContractTemplate> {
        TEMPLATES.iter().find(|t| t.name == name)
    }

    /// The template used when a command names none
    pub fn default_template() -> &'static ContractTemplate {
        &TEMPLATES[0]
    }

    /// Fill the template
    pub fn fill(
        &self,
        intent: Intent,
        resolved: &[&RuleDefinition],
        constraints: &ConstraintMap,
        stack_name: &str,
    ) -> String {
        substitute(self.body, |placeholder| match placeholder {
            "INTENT_LABEL" => Some(intent.label().to_string()),
            "RULES" => Some(rule_lines(resolved)),
            "CONSTRAINTS" => Some(constraint_lines(constraints)),
            "STACK" => Some(stack_name.to_string()),
            "STOP_CONDITIONS" => Some(stop_lines()),
            _ => None,
        })
    }
}

/// Render a contract with the default template
///
/// # Examples
///
/// ```
/// use covenant_core::catalog::ConstraintMap;
/// use covenant_core::resolver::render::render;
/// use covenant_core::types::Intent;
///
/// let text = render(Intent::Review, &[], &ConstraintMap::new(), "Rust service");
/// assert!(text.contains("CODE REVIEW"));
/// assert!(text.contains("- No specific rules applied."));
/// assert!(text.contains("Stack: Rust service"));
/// ```
pub fn render(
    intent: Intent,
    resolved: &[&RuleDefinition],
    constraints: &ConstraintMap,
    stack_name: &str,
) -> String {
    ContractTemplate::default_template().fill(intent, resolved, constraints, stack_name)
}

fn rule_lines(resolved: &[&RuleDefinition]) -> String {
    if resolved.is_empty() {
        return NO_RULES.to_string();
    }
    resolved
        .iter()
        .map(|rule| format!("- {}", rule.directive))
        .collect::<Vec<_>>()
        .join("\n")
}

fn constraint_lines(constraints: &ConstraintMap) -> String {
    if constraints.is_empty() {
        return NO_CONSTRAINTS.to_string();
    }
    constraints
        .iter()
        .map(|(key, value)| format!("- {key}: {}", display_value(value)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn stop_lines() -> String {
    STOP_CONDITIONS
        .iter()
        .map(|line| format!("- {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Strings bare, everything else as compact JSON
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn substitute(body: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(body.len() * 2);
    let mut rest = body;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let name = &after[..end];
                match lookup(name) {
                    Some(value) => out.push_str(&value),
                    None => {
                        out.push_str("{{");
                        out.push_str(name);
                        out.push_str("}}");
                    }
                }
                rest = &after[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Severity;
    use serde_json::json;

    #[test]
    fn test_intent_labels() {
        let empty = ConstraintMap::new();
        for (intent, label) in [
            (Intent::Generate, "CODE GENERATION"),
            (Intent::Refactor, "CODE REFACTORING"),
            (Intent::Review, "CODE REVIEW"),
        ] {
            assert!(render(intent, &[], &empty, "x").contains(label));
        }
    }

    #[test]
    fn test_fallback_lines() {
        let text = render(Intent::Generate, &[], &ConstraintMap::new(), "Next.js");
        assert!(text.contains("## Rules\n- No specific rules applied.\n"));
        assert!(text.contains("## Constraints\n- No specific constraints applied.\n"));
        for stop in STOP_CONDITIONS {
            assert!(text.contains(&format!("- {stop}")));
        }
    }

    #[test]
    fn test_rule_and_constraint_bullets() {
        let a = RuleDefinition::new("a", Severity::Error).with_directive("Do not add dependencies.");
        let b = RuleDefinition::new("b", Severity::Warn).with_directive("Keep changes readable.");
        let mut constraints = ConstraintMap::new();
        constraints.insert("preferServerComponents".into(), json!(true));
        constraints.insert("styling".into(), json!("tailwind"));
        constraints.insert("limits".into(), json!({"files": 3}));

        let text = render(Intent::Generate, &[&a, &b], &constraints, "Next.js App Router");

        assert!(text.contains("- Do not add dependencies.\n- Keep changes readable.\n"));
        assert!(text.contains(
            "- preferServerComponents: true\n- styling: tailwind\n- limits: {\"files\":3}\n"
        ));
        assert!(text.contains("Stack: Next.js App Router\n"));
        assert!(!text.contains("No specific"));
    }

    #[test]
    fn test_placeholders_in_input_not_expanded() {
        let rule = RuleDefinition::new("a", Severity::Info).with_directive("Mention {{STACK}} literally.");
        let text = render(Intent::Review, &[&rule], &ConstraintMap::new(), "Rust");
        assert!(text.contains("- Mention {{STACK}} literally."));
    }

    #[test]
    fn test_select() {
        assert!(ContractTemplate::select("default").is_some());
        assert!(ContractTemplate::select("fancy").is_none());
        assert_eq!(ContractTemplate::default_template().name, "default");
    }

    #[test]
    fn test_substitute_leaves_unknown() {
        let out = substitute("a {{X}} b {{Y}} {{", |n| (n == "X").then(|| "1".to_string()));
        assert_eq!(out, "a 1 b {{Y}} {{");
    }
}
