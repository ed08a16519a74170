//! In-process fake browser for runner and page-object tests

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use async_trait::async_trait;

use flair_e2e::{Driver, E2eError, E2eResult, Locator, Session, SessionFactory};

/// Smallest valid PNG signature plus a marker; enough for file checks
pub const FAKE_PNG: &[u8] = b"\x89PNG\r\n\x1a\nfake";

/// Everything the fake sessions did, shared with the test
#[derive(Default)]
pub struct Journal {
    pub actions: Mutex<Vec<String>>,
    pub acquired: AtomicUsize,
    pub closed: AtomicUsize,
}

impl Journal {
    pub fn actions(&self) -> Vec<String> {
        self.actions.lock().unwrap().clone()
    }

    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    fn push(&self, entry: String) {
        self.actions.lock().unwrap().push(entry);
    }
}

/// A browser tab that records actions instead of performing them
pub struct FakeSession {
    pub id: usize,
    journal: Arc<Journal>,
    history: Mutex<Vec<String>>,
    texts: Vec<(Locator, String)>,
    missing: Vec<Locator>,
    fail_screenshot: bool,
    fail_close: bool,
    download_dir: PathBuf,
}

impl FakeSession {
    pub fn new(journal: Arc<Journal>) -> Self {
        Self {
            id: 0,
            journal,
            history: Mutex::new(Vec::new()),
            texts: Vec::new(),
            missing: Vec::new(),
            fail_screenshot: false,
            fail_close: false,
            download_dir: PathBuf::from("downloads"),
        }
    }

    /// Give `locator` some visible text
    pub fn with_text(mut self, locator: Locator, text: &str) -> Self {
        self.texts.push((locator, text.to_string()));
        self
    }

    /// Make lookups of `locator` fail
    pub fn without(mut self, locator: Locator) -> Self {
        self.missing.push(locator);
        self
    }

    fn lookup(&self, locator: &Locator) -> E2eResult<()> {
        if self.missing.contains(locator) {
            return Err(E2eError::ElementNotFound(locator.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl Driver for FakeSession {
    async fn goto(&self, url: &str) -> E2eResult<()> {
        self.history.lock().unwrap().push(url.to_string());
        self.journal.push(format!("goto {}", url));
        Ok(())
    }

    async fn click(&self, locator: &Locator) -> E2eResult<()> {
        self.lookup(locator)?;
        self.journal.push(format!("click {}", locator));
        Ok(())
    }

    async fn fill(&self, locator: &Locator, value: &str) -> E2eResult<()> {
        self.lookup(locator)?;
        self.journal.push(format!("fill {} = {}", locator, value));
        Ok(())
    }

    async fn text(&self, locator: &Locator) -> E2eResult<String> {
        self.lookup(locator)?;
        self.texts
            .iter()
            .find(|(l, _)| l == locator)
            .map(|(_, t)| t.clone())
            .ok_or_else(|| E2eError::ElementNotFound(locator.to_string()))
    }

    async fn wait_for(&self, locator: &Locator) -> E2eResult<()> {
        self.lookup(locator)
    }

    async fn current_url(&self) -> E2eResult<String> {
        Ok(self
            .history
            .lock()
            .unwrap()
            .last()
            .cloned()
            .unwrap_or_else(|| "about:blank".to_string()))
    }

    async fn screenshot(&self) -> E2eResult<Vec<u8>> {
        if self.fail_screenshot {
            return Err(E2eError::Browser("screenshot target closed".to_string()));
        }
        self.journal.push(format!("screenshot #{}", self.id));
        Ok(FAKE_PNG.to_vec())
    }
}

#[async_trait]
impl Session for FakeSession {
    fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    async fn close(&mut self) -> E2eResult<()> {
        self.journal.closed.fetch_add(1, Ordering::SeqCst);
        self.journal.push(format!("close #{}", self.id));
        if self.fail_close {
            return Err(E2eError::Browser("browser already gone".to_string()));
        }
        Ok(())
    }
}

/// Hands out numbered fake sessions
#[derive(Default)]
pub struct FakeFactory {
    pub journal: Arc<Journal>,
    pub fail_launch: bool,
    pub fail_screenshot: bool,
    pub fail_close: bool,
}

impl FakeFactory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionFactory for FakeFactory {
    type Session = FakeSession;

    async fn acquire(&self) -> E2eResult<FakeSession> {
        if self.fail_launch {
            return Err(E2eError::SessionStart("chrome binary not found".to_string()));
        }
        let id = self.journal.acquired.fetch_add(1, Ordering::SeqCst) + 1;
        self.journal.push(format!("acquire #{}", id));
        let mut session = FakeSession::new(self.journal.clone());
        session.id = id;
        session.fail_screenshot = self.fail_screenshot;
        session.fail_close = self.fail_close;
        Ok(session)
    }
}

/// Screenshot files in `dir` whose names start with `{test_name}_`
pub fn screenshots_for(dir: &Path, test_name: &str) -> Vec<PathBuf> {
    let prefix = format!("{}_", test_name);
    match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                let name = p.file_name().unwrap().to_string_lossy().to_string();
                name.starts_with(&prefix) && name.ends_with(".png")
            })
            .collect(),
        Err(_) => Vec::new(),
    }
}
