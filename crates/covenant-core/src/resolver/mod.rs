//! Resolver - pure compilation of a request into a contract
//!
//! Pipeline, leaves first:
//!
//! 1. [`build_candidates`]: ruleset + toggles -> candidate ids
//! 2. [`select_active`]: candidates -> id-sorted active rules for the intent
//! 3. [`resolve_conflicts`]: greedy severity tie-breaks, or block
//! 4. [`compile_constraints`]: preset baseline + rule contributions
//! 5. [`render`]: fixed template -> contract text
//!
//! [`resolve`] runs the whole pipeline. It reads nothing but its arguments:
//! no I/O, no clock, no randomness, no logging. Identical inputs give
//! identical results, down to JSON key order.

pub mod active;
pub mod candidates;
pub mod conflict;
pub mod constraints;
pub mod render;

pub use active::select_active;
pub use candidates::build_candidates;
pub use conflict::{resolve_conflicts, settle, ConflictResolution, PairOutcome};
pub use constraints::compile_constraints;
pub use render::{render, ContractTemplate};

use crate::catalog::{Catalog, CommandDefinition, RulesetDefinition, StackPresetDefinition};
use crate::project::{ProjectConfig, ResolveRequest};
use crate::result::{
    AppliedRule, BlockedResolution, ContractMetadata, ResolveResult, ResolvedContract,
    STOP_CONDITIONS,
};

/// Everything a resolution reads, already looked up and validated
#[derive(Debug, Clone, Copy)]
pub struct ResolutionContext<'a> {
    pub project: &'a ProjectConfig,
    pub command: &'a CommandDefinition,
    pub ruleset: &'a RulesetDefinition,
    pub stack_preset: &'a StackPresetDefinition,
    pub catalog: &'a Catalog,
}

/// Compile `request` into a contract, or explain why not
///
/// The returned contract has neither id nor timestamp; stamping is the
/// caller's job.
///
/// # Examples
///
/// ```
/// use covenant_core::catalog::Catalog;
/// use covenant_core::project::{ProjectConfig, ProjectRegistry, ResolveRequest};
/// use covenant_core::{load_context, resolve};
///
/// let catalog = Catalog::builtin().unwrap();
/// let projects = ProjectRegistry::from_projects(vec![
///     ProjectConfig::new("web", "nextjs-app-router", "starter"),
/// ])
/// .unwrap();
///
/// let request = ResolveRequest::new("web", "create-component");
/// let loaded = load_context(&catalog, &projects, &request).unwrap();
/// let result = resolve(&request, &loaded.context());
/// assert!(result.is_ok());
/// ```
pub fn resolve(request: &ResolveRequest, ctx: &ResolutionContext<'_>) -> ResolveResult {
    let intent = ctx.command.intent;
    let toggles = &ctx.project.rule_toggles;

    let candidates = build_candidates(ctx.ruleset, toggles);
    let active = select_active(ctx.catalog.rules(), &candidates, toggles, intent);

    let resolved = match resolve_conflicts(&active, ctx.catalog.conflict_graph()) {
        ConflictResolution::Resolved(rules) => rules,
        ConflictResolution::Blocked(conflicts) => {
            return BlockedResolution::conflicting_rules(conflicts).into();
        }
    };

    let constraints = compile_constraints(ctx.stack_preset, &resolved);
    let template = ContractTemplate::select(&ctx.command.template)
        .unwrap_or_else(ContractTemplate::default_template);
    let contract = template.fill(intent, &resolved, &constraints, &ctx.stack_preset.name);

    ResolveResult::Ok(ResolvedContract {
        id: None,
        generated_at: None,
        project_id: request.project_id.clone(),
        command_id: request.command_id.clone(),
        intent_id: intent,
        contract,
        metadata: ContractMetadata {
            stack_preset_id: ctx.stack_preset.id.clone(),
            applied_rules: resolved
                .iter()
                .map(|rule| AppliedRule {
                    id: rule.id.clone(),
                    severity: rule.severity,
                })
                .collect(),
            constraints,
            stop_conditions: STOP_CONDITIONS.iter().map(|s| s.to_string()).collect(),
        },
    })
}
