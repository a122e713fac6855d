//! Capability interface to the host test runner
//!
//! The engine never talks to a concrete runner. Everything it needs from the
//! host (registering tests, skipping the running test, lifecycle hooks) goes
//! through [`HostRunner`].

use crate::types::{RegisteredFn, RunMode, TestReport};
use crate::Result;
use std::fmt;
use std::sync::Arc;

/// Hook called before every test, with the running test's context
pub type BeforeEachHook = Arc<dyn Fn(&TestContext) + Send + Sync>;

/// Hook called after every test that started, with its outcome
pub type AfterEachHook = Arc<dyn Fn(&TestReport) + Send + Sync>;

/// The narrow set of host runner primitives the engine relies on
pub trait HostRunner: Send + Sync {
    /// Register a test body under `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the host cannot accept registrations right now.
    fn register_test(&self, name: &str, mode: RunMode, body: RegisteredFn) -> Result<()>;

    /// Mark the currently running test `name` as skipped.
    ///
    /// The test must be reported as skipped, neither passed nor failed, even
    /// if its body returns normally afterwards.
    fn skip_current(&self, name: &str, reason: &str);

    /// Register a hook that runs before every test.
    fn on_before_each(&self, hook: BeforeEachHook);

    /// Register a hook that runs after every test.
    fn on_after_each(&self, hook: AfterEachHook);
}

/// Handle given to a running test and to before-each hooks
#[derive(Clone)]
pub struct TestContext {
    name: String,
    host: Arc<dyn HostRunner>,
}

impl TestContext {
    /// Context for the running test `name`
    pub fn new(name: impl Into<String>, host: Arc<dyn HostRunner>) -> Self {
        Self {
            name: name.into(),
            host,
        }
    }

    /// Name of the running test
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Skip the running test through the host's skip primitive
    pub fn skip(&self, reason: &str) {
        self.host.skip_current(&self.name, reason);
    }

    /// The host running this test
    #[must_use]
    pub fn host(&self) -> &Arc<dyn HostRunner> {
        &self.host
    }
}

impl fmt::Debug for TestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestContext")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
