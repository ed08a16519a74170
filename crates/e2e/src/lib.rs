//! FLAIR E2E Test Framework
//!
//! This crate drives the FLAIR web application through Chrome and reports
//! pass/fail per test:
//! - Opens a fresh browser session per test and always closes it
//! - Captures a screenshot when a test body fails
//! - Writes one HTML report per run
//! - Cross-checks created data through the read-only sourcing API
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    E2E Test Runner (Rust)                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  TestRunner                                                 │
//! │    ├── ReportFinalizer::configure() -> Report (once)        │
//! │    ├── SessionFactory::acquire() -> Session (per test)      │
//! │    ├── TestCase body(ctx, session)                          │
//! │    ├── OutcomeHook::observe(outcome) -> evidence            │
//! │    └── Session::close() (every exit path)                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Workflows (login, sourcing, approval)                      │
//! │    └── Page objects (LoginPage, SourcingPage)               │
//! │          └── Driver (goto, click, fill, text, screenshot)   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  SourcingApi (GET /api/item-sourcing, never errors)         │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod api;
pub mod chrome;
pub mod data;
pub mod error;
pub mod hooks;
pub mod pages;
pub mod report;
pub mod runner;
pub mod session;
pub mod suites;
pub mod workflows;

pub use api::SourcingApi;
pub use chrome::{ChromeLauncher, ChromeSession};
pub use error::{E2eError, E2eResult};
pub use hooks::{FailureEvidence, OutcomeHook, Phase, Status, TestOutcome};
pub use report::{Report, ReportFinalizer};
pub use runner::{TestCase, TestContext, TestResult, TestRunner, TestSuiteResult};
pub use session::{Driver, Locator, Session, SessionFactory};
