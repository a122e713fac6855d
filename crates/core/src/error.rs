//! Error types for the smart-tests-core crate

use miette::Diagnostic;
use std::path::Path;
use thiserror::Error;

/// Main error type for sessions, variables and settings
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// Invalid settings value
    #[error("Configuration error: {message}")]
    #[diagnostic(
        code(smart_tests::config),
        help("Check the smart-tests settings file and SMART_TESTS_* environment variables")
    )]
    Configuration {
        /// Error message describing the configuration issue
        message: String,
    },

    /// I/O error while reading settings
    #[error("I/O {operation} failed{}", path.as_ref().map_or(String::new(), |p| format!(": {}", p.display())))]
    #[diagnostic(
        code(smart_tests::io),
        help("Check file permissions and ensure the path exists")
    )]
    Io {
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
        /// Path that caused the error, if available
        path: Option<Box<Path>>,
        /// Operation that failed (e.g., "read")
        operation: String,
    },

    /// A value could not be (de)serialized
    #[error("Serialization error: {message}")]
    #[diagnostic(code(smart_tests::serialization))]
    Serialization {
        /// Error message describing the serialization issue
        message: String,
    },

    /// Dependency graph error
    #[error(transparent)]
    #[diagnostic(transparent)]
    Graph(#[from] smart_tests_graph::Error),

    /// Test execution or host runner error
    #[error(transparent)]
    #[diagnostic(transparent)]
    Hooks(#[from] smart_tests_hooks::Error),
}

impl Error {
    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an I/O error with path context
    #[must_use]
    pub fn io(source: std::io::Error, path: impl AsRef<Path>, operation: impl Into<String>) -> Self {
        Self::Io {
            source,
            path: Some(path.as_ref().into()),
            operation: operation.into(),
        }
    }

    /// Create a serialization error
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }
}

/// Result type for smart-tests-core operations
pub type Result<T> = std::result::Result<T, Error>;
