//! Registration of gated tests with a host runner

use crate::session::TestSession;
use crate::Result;
use smart_tests_hooks::{
    HostRunner, RunMode, SkipCheck, TestFn, TestOptions, test_fn, wrap_test,
};
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

/// Registers tests with a host, wrapping each one with its run condition,
/// the session's dependency gate and its before/after hooks.
pub struct Registrar {
    session: TestSession,
    host: Arc<dyn HostRunner>,
}

impl Registrar {
    /// Registrar for `session` registering with `host`
    #[must_use]
    pub fn new(session: TestSession, host: Arc<dyn HostRunner>) -> Self {
        Self { session, host }
    }

    /// Register a gated test with no options.
    ///
    /// # Errors
    ///
    /// Returns an error if the host rejects the registration.
    pub fn test<F, Fut>(&self, name: &str, body: F) -> Result<()>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = smart_tests_hooks::Result<()>> + Send + 'static,
    {
        self.test_with(name, TestOptions::default(), body)
    }

    /// Register a gated test with a run condition and hooks.
    ///
    /// # Errors
    ///
    /// Returns an error if the host rejects the registration.
    pub fn test_with<F, Fut>(&self, name: &str, options: TestOptions, body: F) -> Result<()>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = smart_tests_hooks::Result<()>> + Send + 'static,
    {
        self.register(name, RunMode::Normal, options, test_fn(body))
    }

    /// Register a test the host must skip.
    ///
    /// # Errors
    ///
    /// Returns an error if the host rejects the registration.
    pub fn skip<F, Fut>(&self, name: &str, body: F) -> Result<()>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = smart_tests_hooks::Result<()>> + Send + 'static,
    {
        self.skip_with(name, TestOptions::default(), body)
    }

    /// Register a test the host must skip, keeping its options.
    ///
    /// # Errors
    ///
    /// Returns an error if the host rejects the registration.
    pub fn skip_with<F, Fut>(&self, name: &str, options: TestOptions, body: F) -> Result<()>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = smart_tests_hooks::Result<()>> + Send + 'static,
    {
        self.register(name, RunMode::Skip, options, test_fn(body))
    }

    /// Register an exclusive test.
    ///
    /// # Errors
    ///
    /// Returns an error if the host rejects the registration.
    pub fn only<F, Fut>(&self, name: &str, body: F) -> Result<()>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = smart_tests_hooks::Result<()>> + Send + 'static,
    {
        self.only_with(name, TestOptions::default(), body)
    }

    /// Register an exclusive test with a run condition and hooks.
    ///
    /// # Errors
    ///
    /// Returns an error if the host rejects the registration.
    pub fn only_with<F, Fut>(&self, name: &str, options: TestOptions, body: F) -> Result<()>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = smart_tests_hooks::Result<()>> + Send + 'static,
    {
        self.register(name, RunMode::Only, options, test_fn(body))
    }

    /// Register a test gated on its direct parents only.
    ///
    /// The test records its own pass or failure in the session, so its
    /// dependents are gated even when the session hooks are not installed.
    ///
    /// # Errors
    ///
    /// Returns an error if the host rejects the registration.
    pub fn dependent<F, Fut>(&self, name: &str, body: F) -> Result<()>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = smart_tests_hooks::Result<()>> + Send + 'static,
    {
        let session = self.session.clone();
        let skip_check: SkipCheck = Arc::new(move |test: &str| session.direct_skip_reason(test));

        let body = test_fn(body);
        let session = self.session.clone();
        let owner = name.to_string();
        let recording = test_fn(move || {
            let body = Arc::clone(&body);
            let session = session.clone();
            let owner = owner.clone();
            async move {
                let result = body().await;
                session.record_result(&owner, result.is_ok());
                result
            }
        });

        debug!(test = %name, "Registering dependent test");
        let wrapped = wrap_test(TestOptions::default(), Some(skip_check), recording);
        self.host.register_test(name, RunMode::Normal, wrapped)?;
        Ok(())
    }

    fn register(&self, name: &str, mode: RunMode, options: TestOptions, body: TestFn) -> Result<()> {
        let session = self.session.clone();
        let skip_check: SkipCheck = Arc::new(move |test: &str| session.skip_reason(test));

        debug!(test = %name, ?mode, ?options, "Registering test");
        let wrapped = wrap_test(options, Some(skip_check), body);
        self.host.register_test(name, mode, wrapped)?;
        Ok(())
    }
}
