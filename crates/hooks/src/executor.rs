//! Per-test execution: run condition, dependency gate, then before/body/after

use crate::host::TestContext;
use crate::types::{HookStage, RegisteredFn, TestFn, TestOptions};
use crate::Result;
use futures::FutureExt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Decides whether a test must be skipped because of its dependencies.
///
/// Returns the skip reason, or `None` when the test may run.
pub type SkipCheck = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Skip reason reported when a run condition evaluates to `false`
pub const RUN_CONDITION_SKIP_REASON: &str = "run condition evaluated to false";

/// Whether a wrapped test got past its gates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Gates passed and the before/body/after sequence ran
    Ran,
    /// A gate closed and the host skip primitive was invoked
    Skipped,
}

/// Execute one test in strict order.
///
/// 1. The run condition; `false` skips the test.
/// 2. The dependency check; a reason skips the test.
/// 3. The `before` hook, then the body if `before` succeeded.
/// 4. The `after` hook, whenever step 3 was reached.
///
/// A skip never runs any hook. Errors are returned verbatim: the first error
/// of `before` or the body wins over an `after` error, which is only logged
/// in that case.
///
/// # Errors
///
/// Returns the error of the run condition, the `before` hook, the body or
/// the `after` hook.
pub async fn execute_test(
    ctx: &TestContext,
    options: &TestOptions,
    skip_check: Option<&SkipCheck>,
    body: &TestFn,
) -> Result<Disposition> {
    let name = ctx.name();

    if !options.run_if.evaluate(name).await? {
        info!(test = %name, "Skipping test because its run condition is false");
        ctx.skip(RUN_CONDITION_SKIP_REASON);
        return Ok(Disposition::Skipped);
    }

    if let Some(reason) = skip_check.and_then(|check| check(name)) {
        info!(test = %name, %reason, "Skipping test");
        ctx.skip(&reason);
        return Ok(Disposition::Skipped);
    }

    let mut outcome = run_stage(name, HookStage::Before, options.before.as_ref()).await;
    if outcome.is_ok() {
        outcome = run_stage(name, HookStage::Body, Some(body)).await;
    }
    let cleanup = run_stage(name, HookStage::After, options.after.as_ref()).await;

    match (outcome, cleanup) {
        (Err(primary), Err(cleanup_error)) => {
            warn!(
                test = %name,
                error = %cleanup_error,
                "After hook failed following an earlier failure"
            );
            Err(primary)
        }
        (Err(error), Ok(())) | (Ok(()), Err(error)) => Err(error),
        (Ok(()), Ok(())) => Ok(Disposition::Ran),
    }
}

async fn run_stage(name: &str, stage: HookStage, hook: Option<&TestFn>) -> Result<()> {
    let Some(hook) = hook else {
        return Ok(());
    };

    debug!(test = %name, %stage, "Running test stage");
    let result = hook().await;
    if let Err(error) = &result {
        debug!(test = %name, %stage, %error, "Test stage failed");
    }
    result
}

/// Build the callback handed to the host for a wrapped test.
pub fn wrap_test(options: TestOptions, skip_check: Option<SkipCheck>, body: TestFn) -> RegisteredFn {
    Arc::new(move |ctx: TestContext| {
        let options = options.clone();
        let skip_check = skip_check.clone();
        let body = Arc::clone(&body);
        async move {
            execute_test(&ctx, &options, skip_check.as_ref(), &body)
                .await
                .map(|_| ())
        }
        .boxed()
    })
}
