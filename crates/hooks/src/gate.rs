//! Conditional gate deciding whether a test body runs at all

use crate::Result;
use futures::FutureExt;
use futures::future::BoxFuture;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

type PredicateFn = Arc<dyn Fn() -> BoxFuture<'static, Result<bool>> + Send + Sync>;

/// An optional run condition.
///
/// A gate without a predicate always opens. A predicate may suspend, for
/// example when it depends on asynchronous host state.
#[derive(Clone, Default)]
pub struct Gate {
    predicate: Option<PredicateFn>,
}

impl Gate {
    /// A gate guarded by `predicate`
    pub fn new<F, Fut>(predicate: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<bool>> + Send + 'static,
    {
        Self {
            predicate: Some(Arc::new(move || predicate().boxed())),
        }
    }

    /// A gate that always opens
    #[must_use]
    pub fn always() -> Self {
        Self::default()
    }

    /// Whether a predicate is attached
    #[must_use]
    pub fn is_conditional(&self) -> bool {
        self.predicate.is_some()
    }

    /// Evaluate the gate for `test`.
    ///
    /// # Errors
    ///
    /// Returns whatever error the predicate produced; callers treat it as an
    /// ordinary test failure.
    pub async fn evaluate(&self, test: &str) -> Result<bool> {
        let Some(predicate) = &self.predicate else {
            return Ok(true);
        };

        let open = predicate().await?;
        debug!(test = %test, open, "Evaluated run condition");
        Ok(open)
    }
}

impl fmt::Debug for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gate")
            .field("conditional", &self.is_conditional())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_gate_without_predicate_opens() {
        let gate = Gate::always();
        assert!(!gate.is_conditional());
        assert!(gate.evaluate("any").await.unwrap());
    }

    #[tokio::test]
    async fn test_gate_follows_predicate() {
        assert!(Gate::new(|| async { Ok(true) }).evaluate("t").await.unwrap());
        assert!(!Gate::new(|| async { Ok(false) }).evaluate("t").await.unwrap());
    }

    #[tokio::test]
    async fn test_gate_awaits_suspending_predicate() {
        let gate = Gate::new(|| async {
            tokio::task::yield_now().await;
            Ok(true)
        });
        assert!(gate.evaluate("t").await.unwrap());
    }

    #[tokio::test]
    async fn test_gate_evaluates_predicate_each_time() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let gate = Gate::new(move || {
            let counter = Arc::clone(&counter);
            async move { Ok(counter.fetch_add(1, Ordering::SeqCst) == 0) }
        });

        assert!(gate.evaluate("t").await.unwrap());
        assert!(!gate.evaluate("t").await.unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_gate_propagates_predicate_error() {
        let gate = Gate::new(|| async { Err(Error::failed("env lookup failed")) });
        let err = gate.evaluate("t").await.unwrap_err();
        assert!(matches!(err, Error::TestFailed { .. }));
    }
}
