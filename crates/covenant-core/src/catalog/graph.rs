//! Conflict graph between rules
//!
//! `conflictsWith` declarations are a sparse, symmetric relation. The graph
//! is built once per catalog load so the resolver only has to ask
//! "do these two rules conflict?" during its pairwise scan.

use super::definitions::RuleDefinition;
use petgraph::graph::{NodeIndex, UnGraph};
use std::collections::HashMap;

/// Undirected graph of declared rule conflicts
///
/// # Invariants
///
/// - One node per rule id
/// - At most one edge per unordered pair, whichever side declared it
/// - No self loops
#[derive(Debug, Clone, Default)]
pub struct ConflictGraph {
    graph: UnGraph<String, ()>,
    node_map: HashMap<String, NodeIndex>,
}

impl ConflictGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph for a set of rules
    ///
    /// Declarations naming a rule outside the set are ignored; catalog
    /// validation rejects those before this point.
    pub fn from_rules<'a>(rules: impl IntoIterator<Item = &'a RuleDefinition>) -> Self {
        let rules: Vec<&RuleDefinition> = rules.into_iter().collect();
        let mut graph = Self::new();

        for rule in &rules {
            graph.add_rule(&rule.id);
        }
        for rule in &rules {
            for other in &rule.conflicts_with {
                graph.add_conflict(&rule.id, other);
            }
        }

        graph
    }

    fn add_rule(&mut self, id: &str) -> NodeIndex {
        if let Some(idx) = self.node_map.get(id) {
            return *idx;
        }
        let idx = self.graph.add_node(id.to_string());
        self.node_map.insert(id.to_string(), idx);
        idx
    }

    /// Record a conflict between two known rules
    ///
    /// Returns `false` when either id is unknown or both ids are the same.
    pub fn add_conflict(&mut self, a: &str, b: &str) -> bool {
        if a == b {
            return false;
        }
        match (self.node_map.get(a), self.node_map.get(b)) {
            (Some(&ia), Some(&ib)) => {
                self.graph.update_edge(ia, ib, ());
                true
            }
            _ => false,
        }
    }

    /// Whether `a` and `b` are declared as conflicting, in either direction
    pub fn conflicts(&self, a: &str, b: &str) -> bool {
        match (self.node_map.get(a), self.node_map.get(b)) {
            (Some(&ia), Some(&ib)) => self.graph.find_edge(ia, ib).is_some(),
            _ => false,
        }
    }

    /// Rules conflicting with `id`, sorted
    pub fn neighbors(&self, id: &str) -> Vec<&str> {
        let Some(&idx) = self.node_map.get(id) else {
            return Vec::new();
        };
        let mut out: Vec<&str> = self
            .graph
            .neighbors(idx)
            .map(|n| self.graph[n].as_str())
            .collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    pub fn conflict_count(&self) -> usize {
        self.graph.edge_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Severity;

    fn rules() -> Vec<RuleDefinition> {
        vec![
            RuleDefinition::new("a", Severity::Warn).conflicts_with("b"),
            RuleDefinition::new("b", Severity::Warn).conflicts_with("a"),
            RuleDefinition::new("c", Severity::Info).conflicts_with("a"),
            RuleDefinition::new("d", Severity::Info),
        ]
    }

    #[test]
    fn test_conflicts_are_symmetric() {
        let graph = ConflictGraph::from_rules(&rules());

        assert!(graph.conflicts("a", "b"));
        assert!(graph.conflicts("b", "a"));
        assert!(graph.conflicts("a", "c"));
        assert!(graph.conflicts("c", "a"));
        assert!(!graph.conflicts("b", "c"));
        assert!(!graph.conflicts("a", "d"));
    }

    #[test]
    fn test_double_declaration_is_one_edge() {
        let graph = ConflictGraph::from_rules(&rules());
        assert_eq!(graph.conflict_count(), 2);
        assert_eq!(graph.neighbors("b"), vec!["a"]);
        assert_eq!(graph.neighbors("c"), vec!["a"]);
    }

    #[test]
    fn test_neighbors_sorted() {
        let graph = ConflictGraph::from_rules(&rules());
        assert_eq!(graph.neighbors("a"), vec!["b", "c"]);
        assert!(graph.neighbors("d").is_empty());
        assert!(graph.neighbors("missing").is_empty());
    }

    #[test]
    fn test_unknown_and_self_edges_ignored() {
        let rules = vec![RuleDefinition::new("a", Severity::Error)
            .conflicts_with("a")
            .conflicts_with("ghost")];
        let graph = ConflictGraph::from_rules(&rules);
        assert_eq!(graph.conflict_count(), 0);
        assert!(!graph.conflicts("a", "ghost"));
    }
}
