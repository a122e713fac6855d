//! The test session: failure tracker, variables and host lifecycle hooks
//!
//! A [`TestSession`] is created once per run and handed (by clone) to every
//! registration and hook. Clones share the same tracker and variable store.

use crate::registrar::Registrar;
use crate::settings::Settings;
use crate::variables::Variables;
use crate::Result;
use serde_json::Value;
use smart_tests_graph::{FailureTracker, PartialConfig, TrackerConfig};
use smart_tests_hooks::{HostRunner, TestContext, TestOutcome, TestReport};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

/// Shared state of one test run
#[derive(Debug, Clone, Default)]
pub struct TestSession {
    tracker: Arc<Mutex<FailureTracker>>,
    variables: Variables,
}

impl TestSession {
    /// Create a session with an empty graph, no failures and no variables
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session configured from `settings`.
    ///
    /// The configuration is applied first, so a non-empty dependency map
    /// still forces fail-fast on.
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        let session = Self::new();
        session.configure(settings.tracker_config());
        session.define_graph(&settings.dependencies);
        session
    }

    fn tracker(&self) -> MutexGuard<'_, FailureTracker> {
        self.tracker.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the dependency graph. See [`FailureTracker::define_graph`].
    pub fn define_graph<I, P, D, S>(&self, graph: I)
    where
        I: IntoIterator<Item = (P, D)>,
        P: AsRef<str>,
        D: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tracker().define_graph(graph);
    }

    /// Replace the dependency graph, rejecting cycles.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Graph`] if the graph contains a cycle; the
    /// previous graph is kept.
    pub fn define_graph_strict<I, P, D, S>(&self, graph: I) -> Result<()>
    where
        I: IntoIterator<Item = (P, D)>,
        P: AsRef<str>,
        D: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tracker().define_graph_strict(graph)?;
        Ok(())
    }

    /// Merge `overrides` over the default configuration
    pub fn configure(&self, overrides: PartialConfig) {
        self.tracker().configure(overrides);
    }

    /// The active configuration
    #[must_use]
    pub fn config(&self) -> TrackerConfig {
        self.tracker().config()
    }

    /// Clear the graph and failures and restore the default configuration.
    ///
    /// Variables survive unless `reset_variables` is set.
    pub fn reset(&self, reset_variables: bool) {
        self.tracker().reset();
        if reset_variables {
            self.variables.clear();
        }
        debug!(reset_variables, "Session reset");
    }

    /// Record the outcome of `name`, returning the dependents newly marked
    /// as failed.
    pub fn record_result(&self, name: &str, passed: bool) -> Vec<String> {
        self.tracker().record_result(name, passed)
    }

    /// Whether some direct or transitive parent of `name` has failed
    #[must_use]
    pub fn should_skip(&self, name: &str) -> bool {
        self.tracker().should_skip(name)
    }

    /// Whether `name` is in the failure set
    #[must_use]
    pub fn has_failed(&self, name: &str) -> bool {
        self.tracker().has_failed(name)
    }

    /// Sorted snapshot of the failure set
    #[must_use]
    pub fn failures(&self) -> Vec<String> {
        self.tracker().failures()
    }

    /// Why `name` must be skipped, naming the first failed parent.
    ///
    /// Falls back to the nearest failed ancestor when no direct parent has
    /// failed, which happens when the graph was replaced after the failure.
    #[must_use]
    pub fn skip_reason(&self, name: &str) -> Option<String> {
        let tracker = self.tracker();
        if !tracker.should_skip(name) {
            return None;
        }

        let culprit = tracker.failed_parents(name).into_iter().next().or_else(|| {
            tracker
                .graph()
                .ancestors(name)
                .into_iter()
                .find(|ancestor| tracker.has_failed(ancestor))
                .map(str::to_string)
        })?;
        Some(skip_message(name, &culprit))
    }

    /// Why `name` must be skipped, considering direct parents only
    #[must_use]
    pub fn direct_skip_reason(&self, name: &str) -> Option<String> {
        self.tracker()
            .failed_parents(name)
            .first()
            .map(|parent| skip_message(name, parent))
    }

    /// Get `key` when `value` is `None`, otherwise set it and return it
    pub fn variable(&self, key: &str, value: Option<Value>) -> Option<Value> {
        match value {
            Some(value) => {
                self.variables.add(key, value.clone());
                Some(value)
            }
            None => self.variables.get(key),
        }
    }

    /// Handle to this session's variables
    #[must_use]
    pub fn variables(&self) -> Variables {
        self.variables.clone()
    }

    /// Register the session's lifecycle hooks with `host`.
    ///
    /// After each test that started, its outcome is recorded in the tracker.
    /// Anything other than a pass counts as a failure, so a test skipped at
    /// run time (false run condition, failed parent, explicit skip) gates its
    /// own dependents too. Tests the host never starts, such as those
    /// registered as [`RunMode::Skip`](smart_tests_hooks::RunMode::Skip),
    /// reach no hook and are not recorded.
    ///
    /// The hooks do not gate anything themselves: run conditions and
    /// dependency checks apply only to tests registered through
    /// [`TestSession::registrar`].
    pub fn install(&self, host: &dyn HostRunner) {
        host.on_before_each(Arc::new(|ctx: &TestContext| {
            debug!(test = %ctx.name(), "Starting test");
        }));

        let session = self.clone();
        host.on_after_each(Arc::new(move |report: &TestReport| {
            session.record_report(report);
        }));
    }

    fn record_report(&self, report: &TestReport) {
        let passed = report.outcome.is_passed();
        if let TestOutcome::Skipped { reason } = &report.outcome {
            debug!(test = %report.name, %reason, "Recording skipped test as not passed");
        }

        let propagated = self.record_result(&report.name, passed);
        if !propagated.is_empty() {
            info!(
                test = %report.name,
                dependents = ?propagated,
                "Marked dependents of failed test as failed"
            );
        }
    }

    /// A registrar that wraps tests with this session's gates and registers
    /// them with `host`
    #[must_use]
    pub fn registrar(&self, host: Arc<dyn HostRunner>) -> Registrar {
        Registrar::new(self.clone(), host)
    }
}

fn skip_message(name: &str, parent: &str) -> String {
    format!("Skipping test \"{name}\" because its dependency \"{parent}\" failed")
}
