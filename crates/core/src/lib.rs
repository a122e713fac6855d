//! Test sessions, gated registration and persistent variables for smart-tests.
//!
//! A [`TestSession`] owns everything that lives for one run: the failure
//! tracker with its dependency graph, and the variable store. Tests are
//! registered through a [`Registrar`], which wraps each body so that its run
//! condition and dependencies are checked before any hook runs.
//!
//! # Example
//!
//! ```
//! use smart_tests_core::{InProcessRunner, TestSession};
//! use smart_tests_hooks::Error;
//!
//! # futures::executor::block_on(async {
//! let session = TestSession::new();
//! session.define_graph([("Parent test", vec!["Child test"])]);
//!
//! let runner = InProcessRunner::new();
//! session.install(&*runner);
//! let registrar = session.registrar(runner.clone());
//!
//! registrar.test("Parent test", || async { Err(Error::failed("expected true")) }).unwrap();
//! registrar.test("Child test", || async { Ok(()) }).unwrap();
//!
//! let report = runner.run().await;
//! assert!(report.outcome("Child test").is_some_and(|o| o.is_skipped()));
//! # });
//! ```

pub mod error;
pub mod registrar;
pub mod session;
pub mod settings;
pub mod tracing;
pub mod variables;

pub use error::{Error, Result};
pub use registrar::Registrar;
pub use session::TestSession;
pub use settings::{FAIL_FAST_ENV, Settings};
pub use variables::{VariableStore, Variables};

pub use smart_tests_graph::{PartialConfig, TrackerConfig};
pub use smart_tests_hooks::{HostRunner, InProcessRunner, RunReport, TestOptions, TestOutcome};
