//! FLAIR Common Library
//!
//! Run configuration, error types and the read-only sourcing records shared
//! by the FLAIR end-to-end harness.

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{ApiConfig, ArtifactDirs, RunConfig, WindowSize};
pub use error::{Error, Result};
pub use types::*;

/// Harness version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default config file looked up in the run root
pub const DEFAULT_CONFIG_FILE: &str = "flair.toml";

/// Default run root: the current working directory
pub fn default_run_root() -> std::path::PathBuf {
    std::env::current_dir().unwrap_or_else(|_| std::path::PathBuf::from("."))
}
