//! Validation utilities for dependency graphs.
//!
//! Declaring a graph never validates it; these checks are opt-in and are used
//! by [`crate::FailureTracker::define_graph_strict`] and for diagnostics.

use crate::{DependencyGraph, Error};
use petgraph::algo::tarjan_scc;

/// Result of graph validation.
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether the graph is valid (no cycles, no self-references).
    pub is_valid: bool,
    /// List of validation errors, if any.
    pub errors: Vec<Error>,
}

impl ValidationResult {
    /// Create a valid result.
    #[must_use]
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            errors: vec![],
        }
    }

    /// Create an invalid result with errors.
    #[must_use]
    pub fn invalid(errors: Vec<Error>) -> Self {
        Self {
            is_valid: false,
            errors,
        }
    }
}

impl DependencyGraph {
    /// Validate the graph structure.
    ///
    /// Checks for:
    /// - Tests listed as their own dependent
    /// - Cycles spanning two or more tests
    ///
    /// References to tests that are never registered cannot be detected here,
    /// since tests are registered after the graph is declared.
    #[must_use]
    pub fn validate(&self) -> ValidationResult {
        let graph = self.inner();
        let mut errors = Vec::new();

        for index in graph.node_indices() {
            if graph.contains_edge(index, index) {
                errors.push(Error::cycle(format!(
                    "test '{}' depends on itself",
                    graph[index]
                )));
            }
        }

        for component in tarjan_scc(graph) {
            if component.len() < 2 {
                continue;
            }
            let mut names: Vec<&str> = component.iter().map(|&i| graph[i].as_str()).collect();
            names.sort_unstable();
            errors.push(Error::cycle(format!(
                "tests {} depend on each other",
                names
                    .iter()
                    .map(|name| format!("'{name}'"))
                    .collect::<Vec<_>>()
                    .join(", ")
            )));
        }

        if errors.is_empty() {
            ValidationResult::valid()
        } else {
            ValidationResult::invalid(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_empty_graph() {
        let graph = DependencyGraph::new();
        let result = graph.validate();
        assert!(result.is_valid);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_validate_valid_graph() {
        let graph = DependencyGraph::from_pairs([("Root", vec!["A", "B"]), ("A", vec!["C"])]);
        let result = graph.validate();
        assert!(result.is_valid);
    }

    #[test]
    fn test_validate_cyclic_graph() {
        let graph = DependencyGraph::from_pairs([("B", vec!["A"]), ("A", vec!["B"])]);
        let result = graph.validate();
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(
            result.errors[0].to_string(),
            "Cycle detected in dependency graph: tests 'A', 'B' depend on each other"
        );
    }

    #[test]
    fn test_validate_self_reference() {
        let graph = DependencyGraph::from_pairs([("Lonely", vec!["Lonely"])]);
        let result = graph.validate();
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].to_string().contains("'Lonely' depends on itself"));
    }
}
