//! Failure tracking with eager propagation to dependent tests.

use crate::{DependencyGraph, Result};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Active tracker configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackerConfig {
    /// Dependency-based skipping is active.
    ///
    /// Forced on whenever a non-empty graph is declared.
    pub fail_fast: bool,
}

/// Configuration overrides applied by [`FailureTracker::configure`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PartialConfig {
    /// Override for [`TrackerConfig::fail_fast`].
    pub fail_fast: Option<bool>,
}

impl PartialConfig {
    /// Overrides carrying only a fail-fast value.
    #[must_use]
    pub fn fail_fast(fail_fast: bool) -> Self {
        Self {
            fail_fast: Some(fail_fast),
        }
    }
}

impl TrackerConfig {
    /// Apply `overrides` on top of the default configuration.
    #[must_use]
    pub fn from_defaults(overrides: PartialConfig) -> Self {
        let defaults = Self::default();
        Self {
            fail_fast: overrides.fail_fast.unwrap_or(defaults.fail_fast),
        }
    }
}

/// Tracks failed tests and decides which tests must be skipped.
///
/// The failure set only grows until [`FailureTracker::reset`]: a later pass
/// never clears an earlier failure.
#[derive(Debug, Clone, Default)]
pub struct FailureTracker {
    graph: DependencyGraph,
    failures: HashSet<String>,
    config: TrackerConfig,
}

impl FailureTracker {
    /// Create a tracker with an empty graph and the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the dependency graph with `(parent, dependents)` pairs.
    ///
    /// The previous graph is discarded, not merged. Declaring a non-empty
    /// graph turns fail-fast on. Cycles and self-references are accepted; a
    /// warning is logged for them.
    pub fn define_graph<I, P, D, S>(&mut self, graph: I)
    where
        I: IntoIterator<Item = (P, D)>,
        P: AsRef<str>,
        D: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let graph = DependencyGraph::from_pairs(graph);
        let validation = graph.validate();
        for error in &validation.errors {
            warn!(%error, "Accepting dependency graph with a cycle");
        }
        self.set_graph(graph);
    }

    /// Like [`FailureTracker::define_graph`], but rejects cyclic graphs.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::CycleDetected`] if a test depends on itself,
    /// directly or transitively. The tracker is left untouched in that case.
    pub fn define_graph_strict<I, P, D, S>(&mut self, graph: I) -> Result<()>
    where
        I: IntoIterator<Item = (P, D)>,
        P: AsRef<str>,
        D: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let graph = DependencyGraph::from_pairs(graph);
        let validation = graph.validate();
        if let Some(error) = validation.errors.into_iter().next() {
            return Err(error);
        }
        self.set_graph(graph);
        Ok(())
    }

    /// Install an already built graph.
    pub fn set_graph(&mut self, graph: DependencyGraph) {
        if !graph.is_empty() {
            self.config.fail_fast = true;
        }
        debug!(
            tests = graph.len(),
            fail_fast = self.config.fail_fast,
            "Dependency graph defined"
        );
        self.graph = graph;
    }

    /// Merge `overrides` over the default configuration.
    ///
    /// The currently active configuration is not consulted.
    pub fn configure(&mut self, overrides: PartialConfig) {
        self.config = TrackerConfig::from_defaults(overrides);
        debug!(fail_fast = self.config.fail_fast, "Tracker configured");
    }

    /// Record the outcome of a test.
    ///
    /// A failure marks `name` and every test transitively depending on it as
    /// failed. Returns the dependents newly marked by that propagation. A pass
    /// changes nothing.
    pub fn record_result(&mut self, name: &str, passed: bool) -> Vec<String> {
        if passed {
            debug!(test = %name, "Test passed");
            return Vec::new();
        }

        self.failures.insert(name.to_string());

        let propagated: Vec<String> = self
            .graph
            .descendants(name)
            .into_iter()
            .filter(|dependent| self.failures.insert((*dependent).to_string()))
            .map(str::to_string)
            .collect();

        if self.config.fail_fast {
            let dependents = self.graph.dependents(name);
            if !dependents.is_empty() {
                info!(test = %name, "{}", fail_fast_message(name, &dependents));
            }
        }
        debug!(test = %name, propagated = propagated.len(), "Test failed");

        propagated
    }

    /// Whether a direct or transitive parent of `name` has failed.
    #[must_use]
    pub fn should_skip(&self, name: &str) -> bool {
        self.graph
            .ancestors(name)
            .into_iter()
            .any(|parent| self.failures.contains(parent))
    }

    /// Whether `name` failed, directly or by propagation.
    #[must_use]
    pub fn has_failed(&self, name: &str) -> bool {
        self.failures.contains(name)
    }

    /// Direct parents of `name` that have failed, in declaration order.
    #[must_use]
    pub fn failed_parents(&self, name: &str) -> Vec<String> {
        self.graph
            .parents(name)
            .into_iter()
            .filter(|parent| self.failures.contains(*parent))
            .map(str::to_string)
            .collect()
    }

    /// Sorted snapshot of the failure set.
    #[must_use]
    pub fn failures(&self) -> Vec<String> {
        let mut failures: Vec<String> = self.failures.iter().cloned().collect();
        failures.sort_unstable();
        failures
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> TrackerConfig {
        self.config
    }

    /// The declared dependency graph.
    #[must_use]
    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Clear failures and the graph, and restore the default configuration.
    pub fn reset(&mut self) {
        self.failures.clear();
        self.graph = DependencyGraph::new();
        self.config = TrackerConfig::default();
        debug!("Tracker reset");
    }
}

fn fail_fast_message(name: &str, dependents: &[&str]) -> String {
    format!(
        "Test \"{name}\" failed. Skipping dependent tests: {}",
        dependents.join(", ")
    )
}
