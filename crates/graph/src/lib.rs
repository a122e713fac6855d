//! Test dependency graph and failure propagation for smart-tests.
//!
//! This crate owns the "which tests must be skipped" engine: a directed graph
//! of parent test names to their dependents, the set of tests known to have
//! failed, and the fail-fast flag.
//!
//! Failure is propagated eagerly: when a test is reported as failed, every
//! test reachable from it through the graph is marked failed at once. Skip
//! checks then only look at parents that are already in the failure set.
//!
//! # Key Types
//!
//! - [`DependencyGraph`]: parent -> dependents mapping backed by petgraph
//! - [`FailureTracker`]: graph + failure set + configuration
//! - [`TrackerConfig`] / [`PartialConfig`]: the fail-fast configuration
//!
//! # Example
//!
//! ```
//! use smart_tests_graph::FailureTracker;
//!
//! let mut tracker = FailureTracker::new();
//! tracker.define_graph([("Parent", vec!["Child1", "Child2"])]);
//!
//! tracker.record_result("Parent", false);
//!
//! assert!(tracker.should_skip("Child1"));
//! assert!(tracker.should_skip("Child2"));
//! assert!(!tracker.should_skip("Unrelated"));
//! ```

mod error;
mod graph;
mod tracker;
mod traversal;
mod validation;

pub use error::{Error, Result};
pub use graph::DependencyGraph;
pub use tracker::{FailureTracker, PartialConfig, TrackerConfig};
pub use traversal::compute_transitive_closure;
pub use validation::ValidationResult;
