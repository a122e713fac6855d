//! Type definitions for test callbacks, options and outcomes

use crate::Result;
use crate::gate::Gate;
use crate::host::TestContext;
use futures::FutureExt;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// A test body or a per-test hook.
///
/// Called once per run; the returned future is awaited before the next step
/// starts.
pub type TestFn = Arc<dyn Fn() -> BoxFuture<'static, Result<()>> + Send + Sync>;

/// The callback a host runner stores for a registered test.
pub type RegisteredFn = Arc<dyn Fn(TestContext) -> BoxFuture<'static, Result<()>> + Send + Sync>;

/// Wrap an async closure into a [`TestFn`].
pub fn test_fn<F, Fut>(f: F) -> TestFn
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    Arc::new(move || f().boxed())
}

/// Wrap an async closure taking the running test's context into a [`RegisteredFn`].
pub fn registered_fn<F, Fut>(f: F) -> RegisteredFn
where
    F: Fn(TestContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    Arc::new(move |ctx| f(ctx).boxed())
}

/// Per-test options: a run condition plus optional before/after hooks
#[derive(Clone, Default)]
pub struct TestOptions {
    /// Condition deciding whether the test runs at all
    pub run_if: Gate,
    /// Hook run right before the test body
    pub before: Option<TestFn>,
    /// Hook run right after the test body
    pub after: Option<TestFn>,
}

impl TestOptions {
    /// Options with no condition and no hooks
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Only run the test when `predicate` resolves to `true`
    #[must_use]
    pub fn run_if<F, Fut>(mut self, predicate: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<bool>> + Send + 'static,
    {
        self.run_if = Gate::new(predicate);
        self
    }

    /// Run `hook` before the test body
    #[must_use]
    pub fn before<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        self.before = Some(test_fn(hook));
        self
    }

    /// Run `hook` after the test body
    #[must_use]
    pub fn after<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        self.after = Some(test_fn(hook));
        self
    }
}

impl fmt::Debug for TestOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestOptions")
            .field("run_if", &self.run_if)
            .field("before", &self.before.is_some())
            .field("after", &self.after.is_some())
            .finish()
    }
}

/// Step of the per-test sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookStage {
    /// The `before` hook
    Before,
    /// The test body
    Body,
    /// The `after` hook
    After,
}

impl fmt::Display for HookStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Before => write!(f, "before"),
            Self::Body => write!(f, "body"),
            Self::After => write!(f, "after"),
        }
    }
}

/// How a test was registered with the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Runs normally
    #[default]
    Normal,
    /// Never runs, reported as skipped
    Skip,
    /// Exclusive: when any test is `Only`, all others are skipped
    Only,
}

/// Final status of a single test
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum TestOutcome {
    /// The test ran and succeeded
    Passed,
    /// The test ran and failed
    Failed {
        /// The error reported by the test
        message: String,
    },
    /// The test did not run (or stopped itself through the skip primitive)
    Skipped {
        /// Why the test was skipped
        reason: String,
    },
}

impl TestOutcome {
    /// Whether the test passed
    #[must_use]
    pub fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    /// Whether the test failed
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Whether the test was skipped
    #[must_use]
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }
}

impl fmt::Display for TestOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Passed => write!(f, "passed"),
            Self::Failed { message } => write!(f, "failed: {message}"),
            Self::Skipped { reason } => write!(f, "skipped: {reason}"),
        }
    }
}

/// Result of one test as seen by after-each hooks and the final report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestReport {
    /// Name of the test
    pub name: String,
    /// What happened
    #[serde(flatten)]
    pub outcome: TestOutcome,
}

/// Results of a whole run, in execution order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// One entry per registered test
    pub tests: Vec<TestReport>,
}

impl RunReport {
    /// Look up the outcome of a test by name
    #[must_use]
    pub fn outcome(&self, name: &str) -> Option<&TestOutcome> {
        self.tests
            .iter()
            .find(|report| report.name == name)
            .map(|report| &report.outcome)
    }

    /// Number of passed tests
    #[must_use]
    pub fn passed(&self) -> usize {
        self.count(TestOutcome::is_passed)
    }

    /// Number of failed tests
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(TestOutcome::is_failed)
    }

    /// Number of skipped tests
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(TestOutcome::is_skipped)
    }

    fn count(&self, predicate: impl Fn(&TestOutcome) -> bool) -> usize {
        self.tests
            .iter()
            .filter(|report| predicate(&report.outcome))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_serialization() {
        let report = TestReport {
            name: "Child".to_string(),
            outcome: TestOutcome::Skipped {
                reason: "dependency \"Parent\" failed".to_string(),
            },
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "Child",
                "status": "skipped",
                "reason": "dependency \"Parent\" failed",
            })
        );

        let deserialized: TestReport = serde_json::from_value(json).unwrap();
        assert_eq!(deserialized, report);
    }

    #[test]
    fn test_run_report_counts() {
        let report = RunReport {
            tests: vec![
                TestReport {
                    name: "a".to_string(),
                    outcome: TestOutcome::Passed,
                },
                TestReport {
                    name: "b".to_string(),
                    outcome: TestOutcome::Failed {
                        message: "boom".to_string(),
                    },
                },
                TestReport {
                    name: "c".to_string(),
                    outcome: TestOutcome::Skipped {
                        reason: "runIf".to_string(),
                    },
                },
                TestReport {
                    name: "d".to_string(),
                    outcome: TestOutcome::Passed,
                },
            ],
        };

        assert_eq!(report.passed(), 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.skipped(), 1);
        assert_eq!(report.outcome("b").map(ToString::to_string), Some("failed: boom".to_string()));
        assert!(report.outcome("missing").is_none());
    }

    #[test]
    fn test_options_debug_shows_presence() {
        let options = TestOptions::new().before(|| async { Ok(()) });
        let debug = format!("{options:?}");
        assert!(debug.contains("before: true"));
        assert!(debug.contains("after: false"));
    }

    #[test]
    fn test_hook_stage_display() {
        assert_eq!(HookStage::Before.to_string(), "before");
        assert_eq!(HookStage::Body.to_string(), "body");
        assert_eq!(HookStage::After.to_string(), "after");
    }
}
