//! Outcome hooks and failure evidence
//!
//! The runner reports every finished phase of a test to each registered
//! [`OutcomeHook`]. Hooks are observers: they cannot fail and cannot change
//! the outcome they are shown.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use async_trait::async_trait;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::session::Driver;

/// Sortable second-resolution stamp used in artifact file names
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Which part of a test produced an outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Setup,
    Call,
    Teardown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Passed,
    Failed,
    Error,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Setup => write!(f, "setup"),
            Phase::Call => write!(f, "call"),
            Phase::Teardown => write!(f, "teardown"),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Passed => write!(f, "passed"),
            Status::Failed => write!(f, "failed"),
            Status::Error => write!(f, "error"),
        }
    }
}

/// Result of one phase of one test
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestOutcome {
    pub name: String,
    pub phase: Phase,
    pub status: Status,
    pub duration: Duration,
    pub message: Option<String>,
}

impl TestOutcome {
    pub fn passed(name: &str, phase: Phase, duration: Duration) -> Self {
        Self {
            name: name.to_string(),
            phase,
            status: Status::Passed,
            duration,
            message: None,
        }
    }

    pub fn failed(name: &str, phase: Phase, duration: Duration, message: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            phase,
            status: Status::Failed,
            duration,
            message: Some(message.into()),
        }
    }

    pub fn error(name: &str, phase: Phase, duration: Duration, message: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            phase,
            status: Status::Error,
            duration,
            message: Some(message.into()),
        }
    }
}

/// Observer invoked after each test phase
#[async_trait]
pub trait OutcomeHook: Send + Sync {
    /// Inspect an outcome. `session` is the test's browser if one was opened.
    /// Returns the path of any artifact produced for the report.
    async fn observe(&self, outcome: &TestOutcome, session: Option<&dyn Driver>) -> Option<PathBuf>;
}

/// Saves a screenshot when the body of a test fails
pub struct FailureEvidence {
    dir: PathBuf,
}

impl FailureEvidence {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Only failures of the test body are evidenced
    pub fn should_capture(outcome: &TestOutcome) -> bool {
        outcome.phase == Phase::Call && outcome.status == Status::Failed
    }

    async fn capture(&self, test_name: &str, session: &dyn Driver) -> std::io::Result<PathBuf> {
        let png = session
            .screenshot()
            .await
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

        std::fs::create_dir_all(&self.dir)?;
        write_new_file(&self.dir, &evidence_stem(test_name, Local::now()), "png", &png)
    }
}

#[async_trait]
impl OutcomeHook for FailureEvidence {
    async fn observe(&self, outcome: &TestOutcome, session: Option<&dyn Driver>) -> Option<PathBuf> {
        if !Self::should_capture(outcome) {
            return None;
        }
        let session = session?;

        match self.capture(&outcome.name, session).await {
            Ok(path) => {
                info!("Saved failure screenshot: {}", path.display());
                Some(path)
            }
            Err(e) => {
                warn!("Could not capture screenshot for {}: {}", outcome.name, e);
                None
            }
        }
    }
}

/// `{test_name}_{YYYYMMDD_HHMMSS}` with path separators and spaces replaced
pub fn evidence_stem(test_name: &str, at: DateTime<Local>) -> String {
    let safe: String = test_name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | ' ' => '_',
            c => c,
        })
        .collect();
    format!("{}_{}", safe, at.format(TIMESTAMP_FORMAT))
}

/// Create `{stem}.{ext}` in `dir` without touching existing files. When the
/// name is taken, `{stem}_1.{ext}`, `{stem}_2.{ext}`, ... are tried.
pub fn write_new_file(dir: &Path, stem: &str, ext: &str, contents: &[u8]) -> std::io::Result<PathBuf> {
    create_new_file(dir, stem, ext, |file| file.write_all(contents))
}

/// Reserve a fresh name as [`write_new_file`] does and fill it with `write`.
/// A file that could not be written completely is removed again.
fn create_new_file<F>(dir: &Path, stem: &str, ext: &str, write: F) -> std::io::Result<PathBuf>
where
    F: FnOnce(&mut File) -> std::io::Result<()>,
{
    let mut attempt = 0u32;
    loop {
        let name = if attempt == 0 {
            format!("{}.{}", stem, ext)
        } else {
            format!("{}_{}.{}", stem, attempt, ext)
        };
        let path = dir.join(name);

        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut file) => {
                let written = write(&mut file).and_then(|_| file.sync_all());
                drop(file);
                return match written {
                    Ok(()) => Ok(path),
                    Err(e) => {
                        let _ = std::fs::remove_file(&path);
                        Err(e)
                    }
                };
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => attempt += 1,
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use test_case::test_case;

    #[test_case(Phase::Call, Status::Failed => true)]
    #[test_case(Phase::Call, Status::Passed => false)]
    #[test_case(Phase::Call, Status::Error => false)]
    #[test_case(Phase::Setup, Status::Failed => false)]
    #[test_case(Phase::Setup, Status::Error => false)]
    #[test_case(Phase::Teardown, Status::Failed => false)]
    fn test_capture_only_on_call_failure(phase: Phase, status: Status) -> bool {
        let outcome = TestOutcome {
            name: "t".into(),
            phase,
            status,
            duration: Duration::ZERO,
            message: None,
        };
        FailureEvidence::should_capture(&outcome)
    }

    #[test]
    fn test_evidence_stem_format() {
        let at = Local.with_ymd_and_hms(2026, 3, 4, 5, 6, 7).unwrap();
        assert_eq!(
            evidence_stem("test_flair_end_to_end", at),
            "test_flair_end_to_end_20260304_050607"
        );
        assert_eq!(evidence_stem("suite/case one", at), "suite_case_one_20260304_050607");
    }

    #[test]
    fn test_write_new_file_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let first = write_new_file(dir.path(), "shot", "png", b"one").unwrap();
        let second = write_new_file(dir.path(), "shot", "png", b"two").unwrap();

        assert_eq!(first.file_name().unwrap(), "shot.png");
        assert_eq!(second.file_name().unwrap(), "shot_1.png");
        assert_eq!(std::fs::read(first).unwrap(), b"one");
        assert_eq!(std::fs::read(second).unwrap(), b"two");
    }

    #[test]
    fn test_partial_write_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = create_new_file(dir.path(), "test_bad_20260304_050607", "png", |file| {
            file.write_all(b"\x89PN")?;
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"))
        })
        .unwrap_err();

        assert_eq!(err.to_string(), "disk full");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
