//! Error types for the smart-tests-hooks crate

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for test bodies, hooks and host runners
#[derive(Error, Debug, Clone, Diagnostic)]
pub enum Error {
    /// A test body, hook or predicate reported a failure
    #[error("Test failed: {message}")]
    #[diagnostic(code(smart_tests_hooks::test::failed))]
    TestFailed {
        /// The failure message
        message: String,
    },

    /// The host runner rejected an operation
    #[error("Host runner error: {message}")]
    #[diagnostic(code(smart_tests_hooks::host))]
    Host {
        /// The error message describing the host failure
        message: String,
    },
}

impl Error {
    /// Create a test failure with a message
    pub fn failed(message: impl Into<String>) -> Self {
        Self::TestFailed {
            message: message.into(),
        }
    }

    /// Create a host runner error with a message
    pub fn host(message: impl Into<String>) -> Self {
        Self::Host {
            message: message.into(),
        }
    }
}

/// Result type for smart-tests-hooks operations
pub type Result<T> = std::result::Result<T, Error>;
