//! Sequential in-process host runner
//!
//! A minimal [`HostRunner`] that runs registered tests one at a time, in
//! registration order, and reports each as passed, failed or skipped. It is
//! the reference host for the engine and what the integration tests drive.

use crate::host::{AfterEachHook, BeforeEachHook, HostRunner, TestContext};
use crate::types::{RegisteredFn, RunMode, RunReport, TestOutcome, TestReport};
use crate::{Error, Result};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

struct RegisteredTest {
    name: String,
    mode: RunMode,
    body: RegisteredFn,
}

#[derive(Default)]
struct RunnerState {
    tests: Vec<RegisteredTest>,
    before_each: Vec<BeforeEachHook>,
    after_each: Vec<AfterEachHook>,
    running: bool,
    skip_requests: HashMap<String, String>,
}

/// Runs registered tests sequentially, one test and its hooks at a time
#[derive(Default)]
pub struct InProcessRunner {
    state: Mutex<RunnerState>,
}

impl InProcessRunner {
    /// Create a runner with no tests and no lifecycle hooks
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn state(&self) -> MutexGuard<'_, RunnerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of tests waiting to run
    #[must_use]
    pub fn pending_tests(&self) -> usize {
        self.state().tests.len()
    }

    /// Run every registered test and return the report.
    ///
    /// Registered tests are consumed; lifecycle hooks stay installed for the
    /// next run. When any test is registered as [`RunMode::Only`], every other
    /// test is reported as skipped without running hooks.
    pub async fn run(self: &Arc<Self>) -> RunReport {
        let (tests, before_each, after_each) = {
            let mut state = self.state();
            state.running = true;
            (
                std::mem::take(&mut state.tests),
                state.before_each.clone(),
                state.after_each.clone(),
            )
        };

        let exclusive = tests.iter().any(|test| test.mode == RunMode::Only);
        let host: Arc<dyn HostRunner> = Arc::clone(self) as Arc<dyn HostRunner>;
        let mut report = RunReport::default();

        for test in tests {
            if let Some(reason) = static_skip_reason(test.mode, exclusive) {
                info!(test = %test.name, %reason, "Test not run");
                report.tests.push(TestReport {
                    name: test.name,
                    outcome: TestOutcome::Skipped {
                        reason: reason.to_string(),
                    },
                });
                continue;
            }

            let outcome = self.run_one(&host, &test, &before_each).await;
            debug!(test = %test.name, %outcome, "Test finished");

            let test_report = TestReport {
                name: test.name,
                outcome,
            };
            for hook in &after_each {
                hook(&test_report);
            }
            report.tests.push(test_report);
        }

        self.state().running = false;
        info!(
            passed = report.passed(),
            failed = report.failed(),
            skipped = report.skipped(),
            "Run finished"
        );
        report
    }

    async fn run_one(
        &self,
        host: &Arc<dyn HostRunner>,
        test: &RegisteredTest,
        before_each: &[BeforeEachHook],
    ) -> TestOutcome {
        self.state().skip_requests.remove(&test.name);
        let ctx = TestContext::new(&test.name, Arc::clone(host));

        for hook in before_each {
            hook(&ctx);
        }
        if let Some(reason) = self.take_skip_request(&test.name) {
            return TestOutcome::Skipped { reason };
        }

        let result = (test.body)(ctx).await;
        if let Some(reason) = self.take_skip_request(&test.name) {
            return TestOutcome::Skipped { reason };
        }

        match result {
            Ok(()) => TestOutcome::Passed,
            Err(error) => TestOutcome::Failed {
                message: error.to_string(),
            },
        }
    }

    fn take_skip_request(&self, name: &str) -> Option<String> {
        self.state().skip_requests.remove(name)
    }
}

fn static_skip_reason(mode: RunMode, exclusive: bool) -> Option<&'static str> {
    match mode {
        RunMode::Skip => Some("registered as skipped"),
        RunMode::Normal if exclusive => Some("another test is registered as only"),
        RunMode::Normal | RunMode::Only => None,
    }
}

impl HostRunner for InProcessRunner {
    fn register_test(&self, name: &str, mode: RunMode, body: RegisteredFn) -> Result<()> {
        let mut state = self.state();
        if state.running {
            return Err(Error::host(format!(
                "cannot register test '{name}' while a run is in progress"
            )));
        }

        debug!(test = %name, ?mode, "Registered test");
        state.tests.push(RegisteredTest {
            name: name.to_string(),
            mode,
            body,
        });
        Ok(())
    }

    fn skip_current(&self, name: &str, reason: &str) {
        self.state()
            .skip_requests
            .insert(name.to_string(), reason.to_string());
    }

    fn on_before_each(&self, hook: BeforeEachHook) {
        self.state().before_each.push(hook);
    }

    fn on_after_each(&self, hook: AfterEachHook) {
        self.state().after_each.push(hook);
    }
}
