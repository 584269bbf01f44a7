//! Conflict resolution between active rules
//!
//! A greedy, pairwise reduction over the id-sorted active list. For each
//! conflicting pair `(a, b)` with `a < b`:
//!
//! | a \ b     | error   | warn    | info    |
//! |-----------|---------|---------|---------|
//! | **error** | block   | drop b  | drop b  |
//! | **warn**  | drop a  | drop b  | drop b  |
//! | **info**  | drop a  | drop a  | drop b  |
//!
//! Dropped rules take no part in later pairs. Any error/error pair blocks
//! the whole resolution; nothing is partially resolved.

use crate::catalog::{ConflictGraph, RuleDefinition};
use crate::result::Conflict;
use crate::types::Severity;

/// Outcome of the conflict scan
#[derive(Debug, Clone, PartialEq)]
pub enum ConflictResolution<'a> {
    /// Surviving rules, ascending by id
    Resolved(Vec<&'a RuleDefinition>),
    /// Every error/error pair found, in scan order
    Blocked(Vec<Conflict>),
}

/// What to do with a conflicting pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairOutcome {
    /// Both rules are errors: record the conflict, keep both
    Block,
    /// Drop the rule with the smaller id
    DropFirst,
    /// Drop the rule with the larger id
    DropSecond,
}

/// Tie-break for a conflicting pair, `first` having the smaller id
pub fn settle(first: Severity, second: Severity) -> PairOutcome {
    use Severity::{Error, Info, Warn};

    match (first, second) {
        (Error, Error) => PairOutcome::Block,
        (Error, Warn | Info) => PairOutcome::DropSecond,
        (Warn | Info, Error) => PairOutcome::DropFirst,
        (Warn, Info) => PairOutcome::DropSecond,
        (Info, Warn) => PairOutcome::DropFirst,
        (Warn, Warn) | (Info, Info) => PairOutcome::DropSecond,
    }
}

fn in_conflict(graph: &ConflictGraph, a: &RuleDefinition, b: &RuleDefinition) -> bool {
    graph.conflicts(&a.id, &b.id)
        || a.declares_conflict_with(&b.id)
        || b.declares_conflict_with(&a.id)
}

/// Reduce an id-sorted active list to a conflict-free one, or block
///
/// `active` must already be sorted ascending by id (see
/// [`select_active`](super::active::select_active)). Declarations are read
/// from `graph` and, for rules outside it, from the rules themselves.
pub fn resolve_conflicts<'a>(
    active: &[&'a RuleDefinition],
    graph: &ConflictGraph,
) -> ConflictResolution<'a> {
    let mut dropped = vec![false; active.len()];
    let mut conflicts = Vec::new();

    for i in 0..active.len() {
        for j in (i + 1)..active.len() {
            if dropped[i] {
                break;
            }
            if dropped[j] {
                continue;
            }

            let (a, b) = (active[i], active[j]);
            if !in_conflict(graph, a, b) {
                continue;
            }

            match settle(a.severity, b.severity) {
                PairOutcome::Block => conflicts.push(Conflict::between_errors(&a.id, &b.id)),
                PairOutcome::DropFirst => dropped[i] = true,
                PairOutcome::DropSecond => dropped[j] = true,
            }
        }
    }

    if !conflicts.is_empty() {
        return ConflictResolution::Blocked(conflicts);
    }

    ConflictResolution::Resolved(
        active
            .iter()
            .zip(dropped)
            .filter(|(_, dropped)| !dropped)
            .map(|(rule, _)| *rule)
            .collect(),
    )
}
