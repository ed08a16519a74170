//! Session lifecycle, failure evidence and report tests
//!
//! Drives the runner with fake sessions so every exit path of a test can be
//! exercised without a browser.

mod common;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use async_trait::async_trait;
use tempfile::TempDir;

use common::{screenshots_for, FakeFactory, FAKE_PNG};
use flair_common::{ArtifactDirs, RunConfig};
use flair_e2e::error::ensure;
use flair_e2e::{
    Driver, E2eError, OutcomeHook, Phase, Status, TestCase, TestOutcome, TestRunner,
};

fn config_in(dir: &TempDir) -> Arc<RunConfig> {
    Arc::new(RunConfig {
        dirs: ArtifactDirs::under(dir.path()),
        ..Default::default()
    })
}

fn passing(name: &str) -> TestCase {
    TestCase::new(name, |_ctx, session| {
        Box::pin(async move { session.goto("https://flair.test/dashboard").await })
    })
}

fn failing(name: &str) -> TestCase {
    TestCase::new(name, |_ctx, _session| {
        Box::pin(async move { ensure(false, "supplier row missing") })
    })
}

#[tokio::test]
async fn passing_test_closes_session_without_evidence() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir);
    let factory = FakeFactory::new();
    let journal = factory.journal.clone();
    let mut runner = TestRunner::new(factory, config.clone()).unwrap();

    let suite = runner.run_all(&[passing("test_ok")]).await;

    assert_eq!(suite.passed, 1);
    assert_eq!(journal.acquired(), 1);
    assert_eq!(journal.closed(), 1);
    assert!(screenshots_for(&config.dirs.screenshots, "test_ok").is_empty());
    assert!(suite.results[0].evidence.is_none());
}

#[tokio::test]
async fn failing_body_captures_exactly_one_screenshot() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir);
    let factory = FakeFactory::new();
    let journal = factory.journal.clone();
    let mut runner = TestRunner::new(factory, config.clone()).unwrap();

    let suite = runner.run_all(&[failing("test_create_supplier")]).await;
    let result = &suite.results[0];

    assert_eq!(result.status, Status::Failed);
    assert_eq!(result.phase, Phase::Call);
    assert!(result.error.as_deref().unwrap().contains("supplier row missing"));

    let shots = screenshots_for(&config.dirs.screenshots, "test_create_supplier");
    assert_eq!(shots.len(), 1);
    assert_eq!(std::fs::read(&shots[0]).unwrap(), FAKE_PNG);
    assert_eq!(result.evidence.as_ref(), Some(&shots[0]));

    // Screenshot is taken before the session is released
    let actions = journal.actions();
    let shot = actions.iter().position(|a| a == "screenshot #1").unwrap();
    let close = actions.iter().position(|a| a == "close #1").unwrap();
    assert!(shot < close);
    assert_eq!(journal.closed(), 1);
}

#[tokio::test]
async fn panicking_body_still_releases_session() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir);
    let factory = FakeFactory::new();
    let journal = factory.journal.clone();
    let mut runner = TestRunner::new(factory, config.clone()).unwrap();

    let case = TestCase::new("test_panics", |_ctx, _session| {
        Box::pin(async move {
            let modal_open = true;
            assert!(!modal_open, "unexpected modal");
            Ok(())
        })
    });
    let suite = runner.run_all(&[case]).await;

    assert_eq!(suite.failed, 1);
    assert!(suite.results[0].error.as_deref().unwrap().contains("unexpected modal"));
    assert_eq!(journal.closed(), 1);
    assert_eq!(screenshots_for(&config.dirs.screenshots, "test_panics").len(), 1);
}

#[tokio::test]
async fn setup_failure_is_an_error_without_evidence() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir);
    let factory = FakeFactory {
        fail_launch: true,
        ..Default::default()
    };
    let journal = factory.journal.clone();
    let mut runner = TestRunner::new(factory, config.clone()).unwrap();

    let suite = runner.run_all(&[failing("test_never_started")]).await;
    let result = &suite.results[0];

    assert_eq!(result.status, Status::Error);
    assert_eq!(result.phase, Phase::Setup);
    assert!(result.error.as_deref().unwrap().contains("failed to start"));
    assert_eq!(journal.closed(), 0);
    assert!(screenshots_for(&config.dirs.screenshots, "test_never_started").is_empty());
}

#[tokio::test]
async fn screenshot_failure_does_not_mask_test_failure() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir);
    let factory = FakeFactory {
        fail_screenshot: true,
        ..Default::default()
    };
    let journal = factory.journal.clone();
    let mut runner = TestRunner::new(factory, config.clone()).unwrap();

    let suite = runner.run_all(&[failing("test_flaky_capture")]).await;
    let result = &suite.results[0];

    assert_eq!(result.status, Status::Failed);
    assert!(result.error.as_deref().unwrap().contains("supplier row missing"));
    assert!(result.evidence.is_none());
    assert_eq!(journal.closed(), 1);
}

#[tokio::test]
async fn teardown_error_reported_when_body_passed() {
    let dir = tempfile::tempdir().unwrap();
    let factory = FakeFactory {
        fail_close: true,
        ..Default::default()
    };
    let mut runner = TestRunner::new(factory, config_in(&dir)).unwrap();

    let suite = runner.run_all(&[passing("test_ok"), failing("test_bad")]).await;

    assert_eq!(suite.results[0].status, Status::Error);
    assert_eq!(suite.results[0].phase, Phase::Teardown);
    // The body failure is the one worth reporting
    assert_eq!(suite.results[1].status, Status::Failed);
    assert_eq!(suite.results[1].phase, Phase::Call);
}

#[tokio::test]
async fn each_test_gets_its_own_session_in_turn() {
    let dir = tempfile::tempdir().unwrap();
    let factory = FakeFactory::new();
    let journal = factory.journal.clone();
    let mut runner = TestRunner::new(factory, config_in(&dir)).unwrap();

    let first = passing("test_first");
    let second = TestCase::new("test_second", |_ctx, session| {
        Box::pin(async move {
            let url = session.current_url().await?;
            ensure(url == "about:blank", format!("inherited state from a prior test: {}", url))
        })
    });

    let suite = runner.run_all(&[first, second]).await;

    assert_eq!(suite.passed, 2, "{:?}", suite.results);
    // The first session is released before the second one exists
    let lifecycle: Vec<String> = journal
        .actions()
        .into_iter()
        .filter(|a| a.starts_with("acquire") || a.starts_with("close"))
        .collect();
    assert_eq!(lifecycle, vec!["acquire #1", "close #1", "acquire #2", "close #2"]);
}

#[tokio::test]
async fn tag_and_name_selection() {
    let dir = tempfile::tempdir().unwrap();
    let factory = FakeFactory::new();
    let journal = factory.journal.clone();
    let mut runner = TestRunner::new(factory, config_in(&dir)).unwrap();
    let cases = vec![passing("test_smoke").tagged("smoke"), passing("test_other")];

    let tagged = runner.run_tagged(&cases, "smoke").await;
    assert_eq!(tagged.total, 1);
    assert_eq!(tagged.results[0].name, "test_smoke");

    let named = runner.run_named(&cases, "test_other").await.unwrap();
    assert_eq!(named.results[0].name, "test_other");

    assert!(matches!(
        runner.run_named(&cases, "test_missing").await,
        Err(E2eError::TestNotFound(_))
    ));
    assert_eq!(journal.acquired(), 2);
}

/// Records every outcome it is shown
struct PhaseRecorder(Arc<Mutex<Vec<(String, Phase, Status, bool)>>>);

#[async_trait]
impl OutcomeHook for PhaseRecorder {
    async fn observe(&self, outcome: &TestOutcome, session: Option<&dyn Driver>) -> Option<PathBuf> {
        self.0.lock().unwrap().push((
            outcome.name.clone(),
            outcome.phase,
            outcome.status,
            session.is_some(),
        ));
        None
    }
}

#[tokio::test]
async fn hooks_see_each_phase_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut runner = TestRunner::new(FakeFactory::new(), config_in(&dir))
        .unwrap()
        .with_hook(Box::new(PhaseRecorder(seen.clone())));

    runner.run_all(&[failing("test_bad")]).await;

    let seen = seen.lock().unwrap().clone();
    assert_eq!(
        seen,
        vec![
            ("test_bad".to_string(), Phase::Setup, Status::Passed, true),
            ("test_bad".to_string(), Phase::Call, Status::Failed, true),
            ("test_bad".to_string(), Phase::Teardown, Status::Passed, false),
        ]
    );
}

#[tokio::test]
async fn report_lists_every_test_and_links_evidence() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir);
    let mut runner = TestRunner::new(FakeFactory::new(), config.clone()).unwrap();

    let suite = runner.run_all(&[passing("test_ok"), failing("test_bad")]).await;

    assert!(suite.report.starts_with(&config.dirs.reports));
    let name = suite.report.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("flair_test_report_") && name.ends_with(".html"));

    let html = std::fs::read_to_string(&suite.report).unwrap();
    assert!(html.contains("test_ok"));
    assert!(html.contains("test_bad"));
    let evidence = suite.results[1].evidence.as_ref().unwrap();
    assert!(html.contains(&evidence.to_string_lossy().to_string()));
}
