//! Property tests for the resolver over generated catalogs and toggles

use covenant_core::catalog::{
    Catalog, CatalogDocument, CommandDefinition, RuleDefinition, RulesetDefinition,
    StackPresetDefinition,
};
use covenant_core::{
    load_context, resolve, Intent, ProjectConfig, ProjectRegistry, ResolveRequest, Severity,
};
use proptest::prelude::*;
use proptest::test_runner::Config;
use serde_json::json;

const IDS: [&str; 6] = ["alpha", "bravo", "charlie", "delta", "echo", "foxtrot"];

fn severity() -> impl Strategy<Value = Severity> {
    prop_oneof![Just(Severity::Error), Just(Severity::Warn), Just(Severity::Info)]
}

fn intent() -> impl Strategy<Value = Intent> {
    prop_oneof![Just(Intent::Generate), Just(Intent::Refactor), Just(Intent::Review)]
}

/// Per rule: severity, conflict partner index (if any), contributed value, mandatory flag
fn rule_specs() -> impl Strategy<Value = Vec<(Severity, Option<usize>, Option<i64>, bool)>> {
    prop::collection::vec(
        (
            severity(),
            prop::option::of(0..IDS.len()),
            prop::option::of(-5_i64..5),
            any::<bool>(),
        ),
        IDS.len(),
    )
}

fn build(
    specs: &[(Severity, Option<usize>, Option<i64>, bool)],
    command_intent: Intent,
) -> Catalog {
    let mut rules = Vec::new();
    let mut ruleset = RulesetDefinition::new("generated");

    for (i, (severity, partner, value, mandatory)) in specs.iter().enumerate() {
        let mut rule = RuleDefinition::new(IDS[i], *severity).with_directive(format!("Directive {i}"));
        if let Some(p) = partner.filter(|p| *p != i) {
            rule = rule.conflicts_with(IDS[p]);
        }
        if let Some(v) = value {
            rule = rule.contributes("shared", json!(v));
        }
        rules.push(rule);
        ruleset = if *mandatory {
            ruleset.with_rule(IDS[i])
        } else {
            ruleset.with_optional_rule(IDS[i])
        };
    }

    Catalog::from_document(CatalogDocument {
        rules,
        rulesets: vec![ruleset],
        stack_presets: vec![StackPresetDefinition::new("preset", "generated")
            .with_constraint("shared", json!(100))
            .with_constraint("baseline", json!(true))],
        commands: vec![CommandDefinition::new("run", command_intent)],
    })
    .unwrap()
}

fn project(toggles: &[Option<bool>]) -> ProjectRegistry {
    let mut project = ProjectConfig::new("p", "preset", "generated");
    for (i, toggle) in toggles.iter().enumerate() {
        if let Some(enabled) = toggle {
            project = project.with_toggle(IDS[i], *enabled);
        }
    }
    ProjectRegistry::from_projects(vec![project]).unwrap()
}

proptest! {
    #![proptest_config(Config::with_cases(128))]

    #[test]
    fn resolution_is_deterministic(
        specs in rule_specs(),
        toggles in prop::collection::vec(prop::option::of(any::<bool>()), IDS.len()),
        command_intent in intent(),
    ) {
        let catalog = build(&specs, command_intent);
        let projects = project(&toggles);
        let request = ResolveRequest::new("p", "run").with_input("anything");

        let loaded = load_context(&catalog, &projects, &request).unwrap();
        let first = resolve(&request, &loaded.context());
        let second = resolve(&request, &loaded.context());

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn resolved_contracts_are_well_formed(
        specs in rule_specs(),
        toggles in prop::collection::vec(prop::option::of(any::<bool>()), IDS.len()),
    ) {
        let catalog = build(&specs, Intent::Generate);
        let projects = project(&toggles);
        let request = ResolveRequest::new("p", "run");
        let loaded = load_context(&catalog, &projects, &request).unwrap();

        let result = resolve(&request, &loaded.context());

        if let Some(contract) = result.contract() {
            prop_assert!(!contract.is_stamped());

            let ids = contract.applied_rule_ids();
            let mut sorted = ids.clone();
            sorted.sort();
            prop_assert_eq!(&ids, &sorted);

            for id in &ids {
                let i = IDS.iter().position(|x| x == id).unwrap();
                prop_assert_ne!(toggles[i], Some(false));
            }

            // No two surviving rules conflict.
            let graph = catalog.conflict_graph();
            for (n, a) in ids.iter().enumerate() {
                for b in &ids[n + 1..] {
                    prop_assert!(!graph.conflicts(a, b));
                }
            }

            // The last applied contributor owns the shared key.
            let expected = ids
                .iter()
                .rev()
                .find_map(|id| catalog.rule(id).unwrap().contributes_constraints.get("shared").cloned())
                .unwrap_or(json!(100));
            prop_assert_eq!(&contract.metadata.constraints["shared"], &expected);

            let keys: Vec<_> = contract.metadata.constraints.keys().cloned().collect();
            prop_assert_eq!(keys, vec!["shared".to_string(), "baseline".to_string()]);
        }
    }
}
