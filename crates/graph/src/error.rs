//! Error types for dependency graph operations.

use miette::Diagnostic;
use thiserror::Error;

/// Result type for dependency graph operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when declaring a dependency graph.
///
/// The permissive operations of [`crate::FailureTracker`] never fail; these
/// errors are only produced by the strict variants.
#[derive(Error, Debug, Clone, Diagnostic)]
pub enum Error {
    /// A dependency cycle was detected in the graph.
    #[error("Cycle detected in dependency graph: {message}")]
    #[diagnostic(
        code(smart_tests_graph::cycle),
        help("remove one of the edges so that no test depends on itself")
    )]
    CycleDetected {
        /// Human-readable description of the cycle.
        message: String,
    },
}

impl Error {
    /// Create a cycle error with a message
    pub fn cycle(message: impl Into<String>) -> Self {
        Self::CycleDetected {
            message: message.into(),
        }
    }
}
