//! Tests for concurrent plan execution.
//!
//! These tests verify that:
//! 1. Every session is closed, including after a failed write
//! 2. All failures are collected before reporting, in plan order
//! 3. Output of successful targets stays on disk when a sibling fails

mod helpers;

use helpers::{Event, FakeEngine, RecordingReporter, create_project, default_config};
use libuild_bundler::{BuildExecutor, BuildTarget, Error, compile_plan};
use libuild_config::ModuleFormat;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn reports_each_target_then_the_aggregate() {
    let project = create_project(r#"{"name":"demo"}"#, "export const a = 1;");
    let config = default_config(project.path());
    let plan = compile_plan(&config);

    let engine = Arc::new(FakeEngine::default());
    let reporter = Arc::new(RecordingReporter::default());
    let results = BuildExecutor::new(engine.clone())
        .with_reporter(reporter.clone())
        .execute(&plan, &config)
        .await
        .expect("build should succeed");

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.success));

    let mut lines = reporter.lines();
    assert_eq!(lines.pop().as_deref(), Some("demo build succeeded"));
    lines.sort();
    assert_eq!(
        lines,
        vec![
            "demo - node-cjs/demo.cjs exported",
            "demo - node/demo.js exported"
        ]
    );

    assert!(project.path().join("dist/node/demo.js").is_file());
    assert!(project.path().join("dist/node-cjs/demo.cjs").is_file());
}

#[tokio::test]
async fn results_follow_plan_order_not_completion_order() {
    let project = create_project(r#"{"name":"demo"}"#, "export const a = 1;");
    let mut config = default_config(project.path());
    config.targets = vec![ModuleFormat::Esm, ModuleFormat::Cjs, ModuleFormat::Umd];
    let plan = compile_plan(&config);

    let engine = Arc::new(FakeEngine {
        delay: vec![(BuildTarget::Esm, Duration::from_millis(50))],
        ..Default::default()
    });
    let results = BuildExecutor::new(engine)
        .execute(&plan, &config)
        .await
        .expect("build should succeed");

    let targets: Vec<_> = results.iter().map(|r| r.target).collect();
    assert_eq!(
        targets,
        vec![BuildTarget::Esm, BuildTarget::Cjs, BuildTarget::Umd]
    );
}

#[tokio::test]
async fn every_session_is_closed_after_a_failed_write() {
    let project = create_project(r#"{"name":"demo"}"#, "export const a = 1;");
    let config = default_config(project.path());
    let plan = compile_plan(&config);

    let engine = Arc::new(FakeEngine::failing(vec![BuildTarget::Esm, BuildTarget::Cjs]));
    let report = BuildExecutor::new(engine.clone()).run(&plan, &config).await;

    assert!(!report.is_success());
    assert_eq!(engine.count(|e| matches!(e, Event::Opened(_))), 2);
    assert_eq!(engine.count(|e| matches!(e, Event::Closed(_))), 2);
}

#[tokio::test]
async fn collects_every_failure_in_plan_order() {
    let project = create_project(r#"{"name":"demo"}"#, "export const a = 1;");
    let mut config = default_config(project.path());
    config.targets = vec![ModuleFormat::Esm, ModuleFormat::Cjs, ModuleFormat::Umd];
    let plan = compile_plan(&config);

    let engine = Arc::new(FakeEngine {
        fail: vec![BuildTarget::Umd, BuildTarget::Esm],
        delay: vec![(BuildTarget::Esm, Duration::from_millis(30))],
        ..Default::default()
    });
    let reporter = Arc::new(RecordingReporter::default());
    let err = BuildExecutor::new(engine)
        .with_reporter(reporter.clone())
        .execute(&plan, &config)
        .await
        .unwrap_err();

    assert_eq!(
        err.failed_targets(),
        vec![BuildTarget::Esm, BuildTarget::Umd]
    );
    let message = err.to_string();
    assert!(message.contains("2 target(s)"), "{message}");
    assert!(message.contains("could not resolve entry"), "{message}");
    assert!(matches!(err, Error::Build(_)));

    // The surviving target still reported, but no aggregate success line.
    assert_eq!(reporter.lines(), vec!["demo - node-cjs/demo.cjs exported"]);
}

#[tokio::test]
async fn successful_siblings_keep_their_output() {
    let project = create_project(r#"{"name":"demo"}"#, "export const a = 1;");
    let config = default_config(project.path());
    let plan = compile_plan(&config);

    let engine = Arc::new(FakeEngine::failing(vec![BuildTarget::Cjs]));
    let report = BuildExecutor::new(engine).run(&plan, &config).await;

    assert_eq!(report.failures.len(), 1);
    assert!(report.results[0].success);
    assert!(!report.results[1].success);
    assert!(project.path().join("dist/node/demo.js").is_file());
    assert!(!project.path().join("dist/node-cjs/demo.cjs").exists());
}

#[tokio::test]
async fn empty_plan_is_a_no_op() {
    let project = create_project(r#"{"name":"demo"}"#, "export const a = 1;");
    let config = default_config(project.path());

    let engine = Arc::new(FakeEngine::default());
    let reporter = Arc::new(RecordingReporter::default());
    let results = BuildExecutor::new(engine.clone())
        .with_reporter(reporter.clone())
        .execute(&[], &config)
        .await
        .expect("empty plan succeeds");

    assert!(results.is_empty());
    assert!(engine.events().is_empty());
    assert!(reporter.lines().is_empty());
    assert!(!project.path().join("dist").exists());
}
