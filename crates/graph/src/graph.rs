//! Dependency graph of test names using petgraph.
//!
//! Edges point from a parent test to the tests that depend on it, so walking
//! outgoing edges yields dependents and walking incoming edges yields parents.

use crate::traversal::compute_transitive_closure;
use petgraph::Direction;
use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;
use tracing::trace;

/// Parent -> dependents mapping between test names.
///
/// Names are opaque and compared by exact string equality. Neither cycles nor
/// references to tests that are never registered are rejected here; see
/// [`DependencyGraph::validate`] for an explicit check.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// The directed graph of test names.
    graph: DiGraph<String, ()>,
    /// Map from test names to node indices.
    name_to_node: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
    /// Create a new empty dependency graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from `(parent, dependents)` pairs.
    ///
    /// Dependents keep their declaration order. A dependent listed twice for
    /// the same parent is stored once.
    pub fn from_pairs<I, P, D, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (P, D)>,
        P: AsRef<str>,
        D: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut graph = Self::new();
        for (parent, dependents) in pairs {
            graph.add_dependents(parent.as_ref(), dependents);
        }
        graph
    }

    /// Declare `dependents` as depending on `parent`.
    pub fn add_dependents<D, S>(&mut self, parent: &str, dependents: D)
    where
        D: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let parent_index = self.add_test(parent);
        for dependent in dependents {
            let dependent_index = self.add_test(dependent.as_ref());
            self.graph.update_edge(parent_index, dependent_index, ());
        }
    }

    fn add_test(&mut self, name: &str) -> NodeIndex {
        if let Some(&node) = self.name_to_node.get(name) {
            return node;
        }

        let node = self.graph.add_node(name.to_string());
        self.name_to_node.insert(name.to_string(), node);
        trace!(test = %name, "Added dependency graph node");
        node
    }

    /// Number of distinct test names mentioned in the graph.
    #[must_use]
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    /// Whether no test names were declared at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Check if a test name appears in the graph, as parent or dependent.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.name_to_node.contains_key(name)
    }

    fn neighbors(&self, name: &str, direction: Direction) -> Vec<&str> {
        let Some(&index) = self.name_to_node.get(name) else {
            return Vec::new();
        };

        // petgraph yields the most recently added edge first
        let mut names: Vec<&str> = self
            .graph
            .neighbors_directed(index, direction)
            .map(|neighbor| self.graph[neighbor].as_str())
            .collect();
        names.reverse();
        names
    }

    /// Direct dependents of `name`, in declaration order.
    #[must_use]
    pub fn dependents(&self, name: &str) -> Vec<&str> {
        self.neighbors(name, Direction::Outgoing)
    }

    /// Direct parents of `name`: every test whose dependents list contains it.
    #[must_use]
    pub fn parents(&self, name: &str) -> Vec<&str> {
        self.neighbors(name, Direction::Incoming)
    }

    /// Every test transitively depending on `name`.
    #[must_use]
    pub fn descendants(&self, name: &str) -> Vec<&str> {
        compute_transitive_closure(name, |current| self.dependents(current))
    }

    /// Every direct or transitive parent of `name`.
    #[must_use]
    pub fn ancestors(&self, name: &str) -> Vec<&str> {
        compute_transitive_closure(name, |current| self.parents(current))
    }

    /// Check if the graph has cycles, self-references included.
    #[must_use]
    pub fn has_cycles(&self) -> bool {
        is_cyclic_directed(&self.graph)
    }

    /// The declared `(parent, dependents)` pairs for every test with dependents.
    #[must_use]
    pub fn pairs(&self) -> Vec<(&str, Vec<&str>)> {
        self.graph
            .node_indices()
            .map(|index| self.graph[index].as_str())
            .map(|name| (name, self.dependents(name)))
            .filter(|(_, dependents)| !dependents.is_empty())
            .collect()
    }

    pub(crate) fn inner(&self) -> &DiGraph<String, ()> {
        &self.graph
    }
}
