//! Run configuration
//!
//! A [`RunConfig`] is assembled once per process (defaults, then an optional
//! TOML file, then `FLAIR_*` environment variables) and is read-only after
//! that. Callers share it behind an `Arc`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Error, Result};
use crate::DEFAULT_CONFIG_FILE;

/// Default FLAIR environment under test
pub const DEFAULT_BASE_URL: &str = "https://test.techignitebusiness.com:7012/";

/// Default explicit wait, in seconds
pub const DEFAULT_WAIT_TIMEOUT_SECS: u64 = 10;

/// Default timeout for verification API calls, in seconds
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 10;

pub const ENV_BASE_URL: &str = "FLAIR_BASE_URL";
pub const ENV_WAIT_TIMEOUT: &str = "FLAIR_WAIT_TIMEOUT";
pub const ENV_HEADLESS: &str = "FLAIR_HEADLESS";
pub const ENV_CHROME_PATH: &str = "FLAIR_CHROME_PATH";
pub const ENV_API_BASE_URL: &str = "FLAIR_API_BASE_URL";
pub const ENV_API_TOKEN: &str = "FLAIR_API_TOKEN";

/// Process-wide harness configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Base URL of the FLAIR UI
    pub base_url: String,

    /// Explicit wait applied to element lookups
    pub wait_timeout_secs: u64,

    /// Launch the browser without a visible window
    pub headless: bool,

    /// Window geometry forced in headless mode
    pub window: WindowSize,

    /// Chrome binary (None = auto-detect)
    pub chrome_executable: Option<PathBuf>,

    /// Artifact directories
    pub dirs: ArtifactDirs,

    /// Read-only verification API
    pub api: ApiConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            wait_timeout_secs: DEFAULT_WAIT_TIMEOUT_SECS,
            headless: false,
            window: WindowSize::default(),
            chrome_executable: None,
            dirs: ArtifactDirs::default(),
            api: ApiConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSize {
    pub width: u32,
    pub height: u32,
}

impl Default for WindowSize {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

/// Output directories, created on demand under the run root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactDirs {
    pub downloads: PathBuf,
    pub screenshots: PathBuf,
    pub reports: PathBuf,
}

impl Default for ArtifactDirs {
    fn default() -> Self {
        Self {
            downloads: PathBuf::from("downloads"),
            screenshots: PathBuf::from("screenshots"),
            reports: PathBuf::from("reports"),
        }
    }
}

impl ArtifactDirs {
    /// Standard layout under `root`
    pub fn under(root: &Path) -> Self {
        Self::default().rooted(root)
    }

    /// Resolve relative directories against `root`
    pub fn rooted(&self, root: &Path) -> Self {
        let resolve = |p: &Path| {
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                root.join(p)
            }
        };
        Self {
            downloads: resolve(&self.downloads),
            screenshots: resolve(&self.screenshots),
            reports: resolve(&self.reports),
        }
    }

    /// Create all directories that do not exist yet
    pub fn ensure(&self) -> Result<()> {
        for dir in [&self.downloads, &self.screenshots, &self.reports] {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }
}

/// Verification API settings. An absent base URL disables the client.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: Option<String>,
    pub token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            token: None,
            timeout_secs: DEFAULT_API_TIMEOUT_SECS,
        }
    }
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ApiConfig {
    pub fn is_configured(&self) -> bool {
        self.base_url
            .as_deref()
            .map(|u| !u.trim().is_empty())
            .unwrap_or(false)
    }
}

impl RunConfig {
    /// Load configuration: defaults, then a TOML file, then the process
    /// environment. Relative directories are resolved against `root`.
    ///
    /// An explicit `path` must exist. Without one, `flair.toml` in `root`
    /// is read when present.
    pub fn load(path: Option<&Path>, root: &Path) -> Result<Self> {
        Self::load_with(path, root, |key| std::env::var(key).ok())
    }

    /// [`RunConfig::load`] with environment lookups going through `lookup`
    pub fn load_with<F>(path: Option<&Path>, root: &Path, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = match path {
            Some(p) if !p.exists() => return Err(Error::ConfigNotFound(p.to_path_buf())),
            Some(p) => Some(p.to_path_buf()),
            None => Some(root.join(DEFAULT_CONFIG_FILE)).filter(|p| p.exists()),
        };

        let mut config = match file {
            Some(p) => {
                debug!("Loading config from {}", p.display());
                let content = std::fs::read_to_string(&p)?;
                toml::from_str(&content)?
            }
            None => Self::default(),
        };

        config.apply_env(lookup)?;
        config.dirs = config.dirs.rooted(root);
        config.validate()?;
        Ok(config)
    }

    /// Apply `FLAIR_*` overrides from `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.base_url = url;
        }
        if let Some(raw) = lookup(ENV_WAIT_TIMEOUT) {
            self.wait_timeout_secs = raw.trim().parse().map_err(|_| {
                Error::InvalidConfig(format!("{} must be an integer, got '{}'", ENV_WAIT_TIMEOUT, raw))
            })?;
        }
        if let Some(raw) = lookup(ENV_HEADLESS) {
            self.headless = parse_bool(&raw).ok_or_else(|| {
                Error::InvalidConfig(format!("{} must be a boolean, got '{}'", ENV_HEADLESS, raw))
            })?;
        }
        if let Some(path) = lookup(ENV_CHROME_PATH).filter(|p| !p.trim().is_empty()) {
            self.chrome_executable = Some(PathBuf::from(path));
        }
        if let Some(url) = lookup(ENV_API_BASE_URL) {
            self.api.base_url = Some(url).filter(|u| !u.trim().is_empty());
        }
        if let Some(token) = lookup(ENV_API_TOKEN) {
            self.api.token = Some(token).filter(|t| !t.trim().is_empty());
        }
        Ok(())
    }

    /// Check the settings every run needs. The UI base URL is checked
    /// separately by [`RunConfig::require_base_url`] when a test asks for it.
    pub fn validate(&self) -> Result<()> {
        if self.wait_timeout_secs == 0 {
            return Err(Error::InvalidConfig("wait_timeout_secs must be > 0".to_string()));
        }
        if self.window.width == 0 || self.window.height == 0 {
            return Err(Error::InvalidConfig(format!(
                "window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            )));
        }
        if self.api.timeout_secs == 0 {
            return Err(Error::InvalidConfig("api.timeout_secs must be > 0".to_string()));
        }
        Ok(())
    }

    /// The UI base URL, failing loudly when it is unset or malformed
    pub fn require_base_url(&self) -> Result<&str> {
        let url = self.base_url.trim();
        if url.is_empty() {
            return Err(Error::MissingSetting(ENV_BASE_URL.to_string()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(Error::InvalidConfig(format!(
                "base URL must start with http:// or https://, got '{}'",
                url
            )));
        }
        Ok(url)
    }

    /// Absolute URL for an application path
    pub fn page_url(&self, path: &str) -> Result<String> {
        let base = self.require_base_url()?;
        Ok(join_url(base, path))
    }

    pub fn wait_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.wait_timeout_secs)
    }
}

/// Join a base URL and a path with exactly one slash between them
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    if path.is_empty() {
        return format!("{}/", base);
    }
    format!("{}/{}", base, path.trim_start_matches('/'))
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
