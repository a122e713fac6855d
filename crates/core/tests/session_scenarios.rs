//! End-to-end runs of gated tests through the in-process runner

#![allow(clippy::unwrap_used)]

use serde_json::json;
use smart_tests_core::{InProcessRunner, Registrar, Settings, TestOptions, TestOutcome, TestSession};
use smart_tests_hooks::Error;
use std::sync::{Arc, Mutex};

fn harness() -> (TestSession, Arc<InProcessRunner>, Registrar) {
    let session = TestSession::new();
    let runner = InProcessRunner::new();
    session.install(&*runner);
    let registrar = session.registrar(runner.clone());
    (session, runner, registrar)
}

fn fail(message: &'static str) -> impl Fn() -> futures::future::Ready<smart_tests_hooks::Result<()>> {
    move || futures::future::ready(Err(Error::failed(message)))
}

fn pass() -> impl Fn() -> futures::future::Ready<smart_tests_hooks::Result<()>> {
    || futures::future::ready(Ok::<(), Error>(()))
}

#[tokio::test]
async fn failed_parent_skips_its_dependents() {
    let (session, runner, registrar) = harness();
    session.define_graph([("Parent", vec!["Child1", "Child2"])]);

    registrar.test("Parent", fail("expected true")).unwrap();
    registrar.test("Child1", pass()).unwrap();
    registrar.test("Child2", pass()).unwrap();
    registrar.test("Unrelated", pass()).unwrap();

    let report = runner.run().await;

    assert!(report.outcome("Parent").unwrap().is_failed());
    assert_eq!(
        report.outcome("Child1"),
        Some(&TestOutcome::Skipped {
            reason: "Skipping test \"Child1\" because its dependency \"Parent\" failed"
                .to_string()
        })
    );
    assert!(report.outcome("Child2").unwrap().is_skipped());
    assert_eq!(report.outcome("Unrelated"), Some(&TestOutcome::Passed));

    assert!(session.should_skip("Child1"));
    assert!(session.should_skip("Child2"));
    assert!(!session.should_skip("Unrelated"));
}

#[tokio::test]
async fn failure_propagates_transitively() {
    let (session, runner, registrar) = harness();
    session.define_graph([("Root", vec!["A"]), ("A", vec!["B"])]);

    registrar.test("Root", pass()).unwrap();
    registrar.test("A", fail("A broke")).unwrap();
    registrar.test("B", pass()).unwrap();

    let report = runner.run().await;

    assert_eq!(report.outcome("Root"), Some(&TestOutcome::Passed));
    assert!(report.outcome("A").unwrap().is_failed());
    assert!(report.outcome("B").unwrap().is_skipped());
    assert!(session.should_skip("B"));
    assert!(!session.should_skip("Root"));
    assert_eq!(session.failures(), vec!["A".to_string(), "B".to_string()]);
}

#[tokio::test]
async fn false_run_condition_runs_no_hooks() {
    let (_session, runner, registrar) = harness();
    let calls = Arc::new(Mutex::new(Vec::<&'static str>::new()));

    let record = |stage: &'static str| {
        let calls = Arc::clone(&calls);
        move || {
            calls.lock().unwrap().push(stage);
            futures::future::ready(Ok::<(), Error>(()))
        }
    };
    let options = TestOptions::new()
        .run_if(|| async { Ok(false) })
        .before(record("before"))
        .after(record("after"));

    registrar
        .test_with("Conditional", options, record("body"))
        .unwrap();

    let report = runner.run().await;

    assert!(report.outcome("Conditional").unwrap().is_skipped());
    assert!(calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn hooks_wrap_the_body_in_order() {
    let (_session, runner, registrar) = harness();
    let calls = Arc::new(Mutex::new(Vec::<&'static str>::new()));

    let record = |stage: &'static str| {
        let calls = Arc::clone(&calls);
        move || {
            calls.lock().unwrap().push(stage);
            futures::future::ready(Ok::<(), Error>(()))
        }
    };
    let options = TestOptions::new()
        .run_if(|| async { Ok(true) })
        .before(record("before"))
        .after(record("after"));

    registrar.test_with("Hooked", options, record("body")).unwrap();

    let report = runner.run().await;

    assert_eq!(report.outcome("Hooked"), Some(&TestOutcome::Passed));
    assert_eq!(*calls.lock().unwrap(), vec!["before", "body", "after"]);
}

#[tokio::test]
async fn parent_skipped_by_run_condition_gates_dependents() {
    let (session, runner, registrar) = harness();
    session.define_graph([("Parent", vec!["Child"])]);

    let options = TestOptions::new().run_if(|| async { Ok(false) });
    registrar.test_with("Parent", options, pass()).unwrap();
    registrar.test("Child", pass()).unwrap();

    let report = runner.run().await;

    assert_eq!(
        report.outcome("Parent"),
        Some(&TestOutcome::Skipped {
            reason: "run condition evaluated to false".to_string()
        })
    );
    assert_eq!(
        report.outcome("Child"),
        Some(&TestOutcome::Skipped {
            reason: "Skipping test \"Child\" because its dependency \"Parent\" failed"
                .to_string()
        })
    );
    assert!(session.has_failed("Parent"));
}

#[tokio::test]
async fn parent_registered_as_skipped_does_not_gate_dependents() {
    let (session, runner, registrar) = harness();
    session.define_graph([("Parent", vec!["Child"])]);

    registrar.skip("Parent", fail("never runs")).unwrap();
    registrar.test("Child", pass()).unwrap();

    let report = runner.run().await;

    assert!(report.outcome("Parent").unwrap().is_skipped());
    assert_eq!(report.outcome("Child"), Some(&TestOutcome::Passed));
    assert!(!session.has_failed("Parent"));
}

#[tokio::test]
async fn cyclic_graph_terminates() {
    let (session, runner, registrar) = harness();
    session.define_graph([("A", vec!["B"]), ("B", vec!["A"])]);

    registrar.test("A", fail("A broke")).unwrap();
    registrar.test("B", pass()).unwrap();

    let report = runner.run().await;

    assert!(report.outcome("A").unwrap().is_failed());
    assert!(report.outcome("B").unwrap().is_skipped());
    assert!(session.should_skip("A"));
    assert!(session.should_skip("B"));
}

#[test]
fn variables_survive_plain_reset_only() {
    let session = TestSession::new();

    session.variable("x", Some(json!(1)));
    assert_eq!(session.variable("x", None), Some(json!(1)));

    session.reset(false);
    assert_eq!(session.variable("x", None), Some(json!(1)));

    session.reset(true);
    assert_eq!(session.variable("x", None), None);
}

#[tokio::test]
async fn variables_persist_across_tests() {
    let (session, runner, registrar) = harness();

    let variables = session.variables();
    registrar
        .test("writer", move || {
            variables.add("username", "testuser");
            futures::future::ready(Ok::<(), Error>(()))
        })
        .unwrap();

    let variables = session.variables();
    registrar
        .test("reader", move || {
            let result = match variables.get("username") {
                Some(value) if value == json!("testuser") => Ok(()),
                other => Err(Error::failed(format!("unexpected username {other:?}"))),
            };
            futures::future::ready(result)
        })
        .unwrap();

    let report = runner.run().await;

    assert_eq!(report.passed(), 2);
}

#[tokio::test]
async fn session_from_settings_gates_dependents() {
    let settings = Settings::from_toml_str(
        r#"
[dependencies]
"Login" = ["View profile"]
"#,
    )
    .unwrap();
    let session = TestSession::from_settings(&settings);
    let runner = InProcessRunner::new();
    session.install(&*runner);
    let registrar = session.registrar(runner.clone());

    registrar.test("Login", fail("bad password")).unwrap();
    registrar.test("View profile", pass()).unwrap();

    let report = runner.run().await;

    assert_eq!(report.failed(), 1);
    assert_eq!(report.skipped(), 1);
    assert!(session.config().fail_fast);
}
