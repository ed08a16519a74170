//! Test runner: session lifecycle, outcome hooks and reporting

use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use chrono::Local;
use futures::future::BoxFuture;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use flair_common::RunConfig;

use crate::api::SourcingApi;
use crate::error::{E2eError, E2eResult};
use crate::hooks::{FailureEvidence, OutcomeHook, Phase, Status, TestOutcome};
use crate::report::{Report, ReportFinalizer};
use crate::session::{Driver, Session, SessionFactory};

/// Body of a test: drives the session it is handed
pub type TestFn = Box<
    dyn for<'a> Fn(&'a TestContext, &'a mut dyn Session) -> BoxFuture<'a, E2eResult<()>>
        + Send
        + Sync,
>;

/// A named test with its body
pub struct TestCase {
    pub name: String,
    pub tags: Vec<String>,
    body: TestFn,
}

impl TestCase {
    pub fn new<F>(name: impl Into<String>, body: F) -> Self
    where
        F: for<'a> Fn(&'a TestContext, &'a mut dyn Session) -> BoxFuture<'a, E2eResult<()>>
            + Send
            + Sync
            + 'static,
    {
        Self {
            name: name.into(),
            tags: Vec::new(),
            body: Box::new(body),
        }
    }

    pub fn tagged(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }
}

/// Shared, read-only state every test can reach
pub struct TestContext {
    config: Arc<RunConfig>,
    api: SourcingApi,
}

impl TestContext {
    pub fn new(config: Arc<RunConfig>) -> Self {
        let api = SourcingApi::new(&config.api);
        Self { config, api }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Verification client; degrades silently when the backend is absent
    pub fn api(&self) -> &SourcingApi {
        &self.api
    }

    /// UI base URL. Errors loudly when unset, unlike the verification client.
    pub fn base_url(&self) -> E2eResult<&str> {
        Ok(self.config.require_base_url()?)
    }
}

/// Result of running a single test
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    pub name: String,
    pub status: Status,
    /// Phase that decided the status
    pub phase: Phase,
    pub duration_ms: u64,
    pub error: Option<String>,
    pub evidence: Option<PathBuf>,
}

impl TestResult {
    pub fn success(&self) -> bool {
        self.status == Status::Passed
    }
}

/// Result of running a set of tests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSuiteResult {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub errored: usize,
    pub duration_ms: u64,
    pub results: Vec<TestResult>,
    pub report: PathBuf,
}

/// Runs tests one after another, each in a fresh session
pub struct TestRunner<F: SessionFactory> {
    factory: F,
    context: TestContext,
    hooks: Vec<Box<dyn OutcomeHook>>,
    report: Report,
}

impl<F: SessionFactory> TestRunner<F> {
    /// Prepare the artifact directories and reserve this run's report.
    /// Failure screenshots are captured by default.
    pub fn new(factory: F, config: Arc<RunConfig>) -> E2eResult<Self> {
        config.dirs.ensure()?;
        let report = ReportFinalizer::configure(&config.dirs, Local::now())?;
        let evidence = FailureEvidence::new(config.dirs.screenshots.clone());

        Ok(Self {
            factory,
            context: TestContext::new(config),
            hooks: vec![Box::new(evidence)],
            report,
        })
    }

    /// Register an additional outcome hook
    pub fn with_hook(mut self, hook: Box<dyn OutcomeHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    pub fn context(&self) -> &TestContext {
        &self.context
    }

    pub fn report(&self) -> &Report {
        &self.report
    }

    /// Run every case
    pub async fn run_all(&mut self, cases: &[TestCase]) -> TestSuiteResult {
        let selected: Vec<&TestCase> = cases.iter().collect();
        self.run_cases(&selected).await
    }

    /// Run cases carrying `tag`
    pub async fn run_tagged(&mut self, cases: &[TestCase], tag: &str) -> TestSuiteResult {
        let selected: Vec<&TestCase> = cases
            .iter()
            .filter(|c| c.tags.iter().any(|t| t == tag))
            .collect();
        self.run_cases(&selected).await
    }

    /// Run a single case by name
    pub async fn run_named(&mut self, cases: &[TestCase], name: &str) -> E2eResult<TestSuiteResult> {
        let case = cases
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| E2eError::TestNotFound(name.to_string()))?;
        Ok(self.run_cases(&[case]).await)
    }

    pub async fn run_cases(&mut self, cases: &[&TestCase]) -> TestSuiteResult {
        let start = Instant::now();
        let mut results = Vec::with_capacity(cases.len());

        info!("Running {} test(s)...", cases.len());

        for case in cases {
            results.push(self.run_case(case).await);
        }

        let count = |status: Status| results.iter().filter(|r| r.status == status).count();
        let passed = count(Status::Passed);
        let failed = count(Status::Failed);
        let errored = count(Status::Error);
        let duration_ms = start.elapsed().as_millis() as u64;

        info!("");
        info!(
            "Test Results: {} passed, {} failed, {} errors ({} ms)",
            passed, failed, errored, duration_ms
        );
        info!("Report written to: {}", self.report.path().display());

        TestSuiteResult {
            total: cases.len(),
            passed,
            failed,
            errored,
            duration_ms,
            results,
            report: self.report.path().to_path_buf(),
        }
    }

    /// Acquire a session, run the body, and close the session on every path
    pub async fn run_case(&mut self, case: &TestCase) -> TestResult {
        let start = Instant::now();
        debug!("Running test: {}", case.name);

        let mut session = match self.factory.acquire().await {
            Ok(session) => session,
            Err(e) => {
                let outcome = TestOutcome::error(&case.name, Phase::Setup, start.elapsed(), e.to_string());
                let evidence = self.notify(&outcome, None).await;
                return self.finish(outcome, evidence, start);
            }
        };
        let setup = TestOutcome::passed(&case.name, Phase::Setup, start.elapsed());
        self.notify(&setup, Some(&session as &dyn Driver)).await;

        let call_start = Instant::now();
        let body = (case.body)(&self.context, &mut session);
        let call = match AssertUnwindSafe(body).catch_unwind().await {
            Ok(Ok(())) => TestOutcome::passed(&case.name, Phase::Call, call_start.elapsed()),
            Ok(Err(e)) => TestOutcome::failed(&case.name, Phase::Call, call_start.elapsed(), e.to_string()),
            Err(panic) => TestOutcome::failed(
                &case.name,
                Phase::Call,
                call_start.elapsed(),
                E2eError::Panicked(panic_message(panic.as_ref())).to_string(),
            ),
        };
        let evidence = self.notify(&call, Some(&session as &dyn Driver)).await;

        let teardown_start = Instant::now();
        let teardown = match session.close().await {
            Ok(()) => TestOutcome::passed(&case.name, Phase::Teardown, teardown_start.elapsed()),
            Err(e) => TestOutcome::error(&case.name, Phase::Teardown, teardown_start.elapsed(), e.to_string()),
        };
        self.notify(&teardown, None).await;

        // A failing body outranks a teardown error
        let decisive = if call.status != Status::Passed || teardown.status == Status::Passed {
            call
        } else {
            teardown
        };
        self.finish(decisive, evidence, start)
    }

    async fn notify(&self, outcome: &TestOutcome, session: Option<&dyn Driver>) -> Option<PathBuf> {
        let mut evidence = None;
        for hook in &self.hooks {
            if let Some(path) = hook.observe(outcome, session).await {
                evidence.get_or_insert(path);
            }
        }
        evidence
    }

    fn finish(&mut self, outcome: TestOutcome, evidence: Option<PathBuf>, start: Instant) -> TestResult {
        let result = TestResult {
            name: outcome.name,
            status: outcome.status,
            phase: outcome.phase,
            duration_ms: start.elapsed().as_millis() as u64,
            error: outcome.message,
            evidence,
        };

        match result.status {
            Status::Passed => info!("✓ {} ({} ms)", result.name, result.duration_ms),
            _ => error!(
                "✗ {} [{} {}] - {}",
                result.name,
                result.phase,
                result.status,
                result.error.as_deref().unwrap_or("unknown error")
            ),
        }

        if let Err(e) = self.report.record(result.clone()) {
            warn!("Could not update report {}: {}", self.report.path().display(), e);
        }
        result
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
