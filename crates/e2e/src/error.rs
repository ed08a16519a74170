//! Error types for E2E testing

use thiserror::Error;

#[derive(Error, Debug)]
pub enum E2eError {
    #[error("Browser session failed to start: {0}")]
    SessionStart(String),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Timeout after {seconds}s waiting for: {what}")]
    Timeout { what: String, seconds: u64 },

    #[error("Assertion failed: {0}")]
    AssertionFailed(String),

    #[error("Test not found: {0}")]
    TestNotFound(String),

    #[error("Test panicked: {0}")]
    Panicked(String),

    #[error("Configuration error: {0}")]
    Config(#[from] flair_common::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl From<chromiumoxide::error::CdpError> for E2eError {
    fn from(e: chromiumoxide::error::CdpError) -> Self {
        E2eError::Browser(e.to_string())
    }
}

pub type E2eResult<T> = Result<T, E2eError>;

/// Fail the current test with an assertion error unless `cond` holds
pub fn ensure(cond: bool, message: impl Into<String>) -> E2eResult<()> {
    if cond {
        Ok(())
    } else {
        Err(E2eError::AssertionFailed(message.into()))
    }
}
