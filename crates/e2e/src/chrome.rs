//! Chrome sessions over the DevTools protocol

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::browser::{
    SetDownloadBehaviorBehavior, SetDownloadBehaviorParams,
};
use chromiumoxide::element::Element;
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::page::{Page, ScreenshotParams};
use futures::StreamExt;
use tempfile::TempDir;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use flair_common::RunConfig;

use crate::error::{E2eError, E2eResult};
use crate::session::{Driver, Locator, Session, SessionFactory};

/// Poll interval for explicit waits
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Clears an input and notifies framework listeners
const CLEAR_INPUT_JS: &str =
    "function() { this.value = ''; this.dispatchEvent(new Event('input', { bubbles: true })); }";

/// Launches one Chrome instance per acquired session
pub struct ChromeLauncher {
    config: Arc<RunConfig>,
}

impl ChromeLauncher {
    pub fn new(config: Arc<RunConfig>) -> Self {
        Self { config }
    }

    /// Extra command-line switches for the configured window mode
    pub fn launch_args(config: &RunConfig) -> Vec<String> {
        if config.headless {
            vec![format!(
                "--window-size={},{}",
                config.window.width, config.window.height
            )]
        } else {
            vec!["--start-maximized".to_string()]
        }
    }

    fn browser_config(&self, profile_dir: &Path) -> E2eResult<BrowserConfig> {
        let mut builder = BrowserConfig::builder()
            .user_data_dir(profile_dir)
            .viewport(Option::<Viewport>::None)
            .request_timeout(self.config.wait_timeout());

        if !self.config.headless {
            builder = builder.with_head();
        }
        if let Some(exe) = &self.config.chrome_executable {
            builder = builder.chrome_executable(exe);
        }
        for arg in Self::launch_args(&self.config) {
            builder = builder.arg(arg);
        }

        builder.build().map_err(E2eError::SessionStart)
    }
}

/// Chrome profile preferences: automatic downloads into `download_dir`
pub fn profile_preferences(download_dir: &Path) -> serde_json::Value {
    serde_json::json!({
        "download": {
            "default_directory": download_dir.to_string_lossy(),
            "prompt_for_download": false,
        },
        "safebrowsing": {
            "enabled": true,
        },
    })
}

/// Write the `Default/Preferences` file of a fresh profile
pub fn write_profile(profile_dir: &Path, download_dir: &Path) -> E2eResult<PathBuf> {
    let default_dir = profile_dir.join("Default");
    std::fs::create_dir_all(&default_dir)?;
    let path = default_dir.join("Preferences");
    std::fs::write(&path, serde_json::to_vec_pretty(&profile_preferences(download_dir))?)?;
    Ok(path)
}

#[async_trait]
impl SessionFactory for ChromeLauncher {
    type Session = ChromeSession;

    async fn acquire(&self) -> E2eResult<ChromeSession> {
        let download_dir = self.config.dirs.downloads.clone();
        std::fs::create_dir_all(&download_dir)
            .map_err(|e| E2eError::SessionStart(format!("cannot create download dir: {}", e)))?;

        // A throwaway profile per session keeps cookies and storage from leaking
        let profile = tempfile::Builder::new()
            .prefix("flair-profile-")
            .tempdir()
            .map_err(|e| E2eError::SessionStart(format!("cannot create profile dir: {}", e)))?;
        write_profile(profile.path(), &download_dir)
            .map_err(|e| E2eError::SessionStart(format!("cannot write profile: {}", e)))?;

        let browser_config = self.browser_config(profile.path())?;

        info!("Launching Chrome (headless: {})", self.config.headless);
        let (mut browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| E2eError::SessionStart(format!("failed to launch Chrome: {}", e)))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("CDP handler error: {}", e);
                }
            }
        });

        match open_page(&browser, &download_dir).await {
            Ok(page) => Ok(ChromeSession {
                browser,
                page,
                handler: handler_task,
                download_dir,
                wait_timeout: self.config.wait_timeout(),
                closed: false,
                exited: false,
                profile,
            }),
            Err(e) => {
                let _ = browser.close().await;
                let _ = browser.wait().await;
                handler_task.abort();
                Err(E2eError::SessionStart(e.to_string()))
            }
        }
    }
}

async fn open_page(browser: &Browser, download_dir: &Path) -> E2eResult<Page> {
    let behavior = SetDownloadBehaviorParams::builder()
        .behavior(SetDownloadBehaviorBehavior::Allow)
        .download_path(download_dir.to_string_lossy().to_string())
        .build()
        .map_err(E2eError::Browser)?;
    browser.execute(behavior).await?;

    Ok(browser.new_page("about:blank").await?)
}

/// One Chrome process with a single page, owned by one test
pub struct ChromeSession {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
    download_dir: PathBuf,
    wait_timeout: Duration,
    closed: bool,
    exited: bool,
    // Dropped last, after the browser has released it
    profile: TempDir,
}

impl ChromeSession {
    /// The underlying page, for interactions page objects do not cover
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Throwaway profile directory; removed when the session drops
    pub fn profile_dir(&self) -> &Path {
        self.profile.path()
    }

    /// Whether the Chrome process has been reaped by [`Session::close`]
    pub fn has_exited(&self) -> bool {
        self.exited
    }

    async fn find(&self, locator: &Locator) -> E2eResult<Element> {
        let deadline = Instant::now() + self.wait_timeout;
        loop {
            let found = match locator {
                Locator::Css(selector) => self.page.find_element(selector.as_str()).await,
                Locator::XPath(expr) => self.page.find_xpath(expr.as_str()).await,
            };

            match found {
                Ok(element) => return Ok(element),
                Err(e) if Instant::now() >= deadline => {
                    debug!("Lookup of {} gave up: {}", locator, e);
                    return Err(E2eError::Timeout {
                        what: locator.to_string(),
                        seconds: self.wait_timeout.as_secs(),
                    });
                }
                Err(_) => tokio::time::sleep(POLL_INTERVAL).await,
            }
        }
    }
}

#[async_trait]
impl Driver for ChromeSession {
    async fn goto(&self, url: &str) -> E2eResult<()> {
        debug!("goto {}", url);
        self.page.goto(url).await?;
        Ok(())
    }

    async fn click(&self, locator: &Locator) -> E2eResult<()> {
        debug!("click {}", locator);
        let element = self.find(locator).await?;
        element.scroll_into_view().await?;
        element.click().await?;
        Ok(())
    }

    async fn fill(&self, locator: &Locator, value: &str) -> E2eResult<()> {
        debug!("fill {}", locator);
        let element = self.find(locator).await?;
        element.click().await?;
        element.call_js_fn(CLEAR_INPUT_JS, false).await?;
        element.type_str(value).await?;
        Ok(())
    }

    async fn text(&self, locator: &Locator) -> E2eResult<String> {
        let element = self.find(locator).await?;
        let text = element.inner_text().await?.unwrap_or_default();
        Ok(text.trim().to_string())
    }

    async fn wait_for(&self, locator: &Locator) -> E2eResult<()> {
        self.find(locator).await.map(|_| ())
    }

    async fn current_url(&self) -> E2eResult<String> {
        Ok(self.page.url().await?.unwrap_or_default())
    }

    async fn screenshot(&self) -> E2eResult<Vec<u8>> {
        Ok(self.page.screenshot(ScreenshotParams::builder().build()).await?)
    }
}

#[async_trait]
impl Session for ChromeSession {
    fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    async fn close(&mut self) -> E2eResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        let result = self.browser.close().await;
        match self.browser.wait().await {
            Ok(status) => {
                debug!("Chrome exited: {:?}", status);
                self.exited = true;
            }
            Err(e) => warn!("Waiting for Chrome to exit failed: {}", e),
        }
        self.handler.abort();
        info!("Chrome session closed");

        result.map(|_| ()).map_err(E2eError::from)
    }
}

impl Drop for ChromeSession {
    fn drop(&mut self) {
        if !self.closed {
            // chromiumoxide kills the child process when `Browser` drops
            warn!("Chrome session dropped without close()");
            self.handler.abort();
        }
    }
}
