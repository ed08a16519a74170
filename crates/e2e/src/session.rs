//! Browser session seam
//!
//! Page objects talk to a [`Driver`]; the runner owns a [`Session`] per test
//! and obtains it from a [`SessionFactory`]. The Chrome implementation lives
//! in [`crate::chrome`].

use std::fmt;
use std::path::Path;
use async_trait::async_trait;

use crate::error::E2eResult;

/// How to find an element on the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    Css(String),
    XPath(String),
}

impl Locator {
    pub fn css(selector: impl Into<String>) -> Self {
        Locator::Css(selector.into())
    }

    pub fn xpath(expr: impl Into<String>) -> Self {
        Locator::XPath(expr.into())
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Css(s) => write!(f, "css={}", s),
            Locator::XPath(s) => write!(f, "xpath={}", s),
        }
    }
}

/// Browser interactions used by page objects. Element lookups wait up to
/// the configured explicit timeout before failing.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Navigate to an absolute URL
    async fn goto(&self, url: &str) -> E2eResult<()>;

    async fn click(&self, locator: &Locator) -> E2eResult<()>;

    /// Clear an input and type `value` into it
    async fn fill(&self, locator: &Locator, value: &str) -> E2eResult<()>;

    /// Visible text of an element
    async fn text(&self, locator: &Locator) -> E2eResult<String>;

    /// Wait until the element is present
    async fn wait_for(&self, locator: &Locator) -> E2eResult<()>;

    async fn current_url(&self) -> E2eResult<String>;

    /// PNG bytes of the current viewport
    async fn screenshot(&self) -> E2eResult<Vec<u8>>;
}

/// A browser session owned by exactly one test
#[async_trait]
pub trait Session: Driver {
    /// Directory that receives automatic downloads
    fn download_dir(&self) -> &Path;

    /// Release the underlying browser. Called exactly once by the runner.
    async fn close(&mut self) -> E2eResult<()>;
}

/// Opens a fresh session for each test
#[async_trait]
pub trait SessionFactory: Send + Sync {
    type Session: Session + 'static;

    async fn acquire(&self) -> E2eResult<Self::Session>;
}
