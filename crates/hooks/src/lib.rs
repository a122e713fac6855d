//! Conditional gating and per-test hook sequencing for smart-tests.
//!
//! This crate wraps a test body so that, when the host runner invokes it,
//! the following happens in strict order:
//!
//! 1. The optional run condition is evaluated; `false` skips the test.
//! 2. The dependency check is consulted; a failed parent skips the test.
//! 3. The optional `before` hook runs, then the body.
//! 4. The optional `after` hook runs.
//!
//! The crate knows nothing about dependency graphs. The dependency check is
//! an opaque [`SkipCheck`] supplied by the caller, and the host runner is
//! reached only through the [`HostRunner`] capability trait.
//!
//! [`InProcessRunner`] is a sequential reference host implementing
//! [`HostRunner`].
//!
//! # Example
//!
//! ```
//! use smart_tests_hooks::{test_fn, wrap_test, HostRunner, InProcessRunner, RunMode, TestOptions};
//!
//! # futures::executor::block_on(async {
//! let runner = InProcessRunner::new();
//! let options = TestOptions::new().run_if(|| async { Ok(false) });
//! let body = wrap_test(options, None, test_fn(|| async { Ok(()) }));
//! runner.register_test("gated", RunMode::Normal, body).unwrap();
//!
//! let report = runner.run().await;
//! assert!(report.outcome("gated").is_some_and(|o| o.is_skipped()));
//! # });
//! ```

mod error;
mod executor;
mod gate;
mod host;
mod runner;
mod types;

pub use error::{Error, Result};
pub use executor::{Disposition, RUN_CONDITION_SKIP_REASON, SkipCheck, execute_test, wrap_test};
pub use gate::Gate;
pub use host::{AfterEachHook, BeforeEachHook, HostRunner, TestContext};
pub use runner::InProcessRunner;
pub use types::{
    HookStage, RegisteredFn, RunMode, RunReport, TestFn, TestOptions, TestOutcome, TestReport,
    registered_fn, test_fn,
};
