//! Configuration loading
//!
//! Settings resolve in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! Command-line and environment handling live in the binary (clap); this
//! module covers the file layer and the resolution helper.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// File-level configuration for the Hifier server
#[derive(Debug, Clone, Deserialize, Default)]
pub struct FileConfig {
    /// HTTP listen port
    pub port: Option<u16>,

    /// SQLite database path
    pub database_path: Option<String>,

    /// Endpoint of the query-normalization service
    pub normalizer_url: Option<String>,

    /// Search debounce window in milliseconds
    pub search_debounce_ms: Option<u64>,
}

impl FileConfig {
    /// Load configuration from a TOML file.
    ///
    /// A missing file is not an error: all settings have defaults and the
    /// file layer is optional.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(FileConfig::default());
        }

        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Invalid config file {}: {}", path.display(), e)))
    }
}

/// Resolve a single setting through the priority chain.
///
/// `cli` and `env_var` are consulted before `file_value`; `default` is the
/// compiled fallback.
pub fn resolve_setting<T: Clone>(
    cli: Option<T>,
    env_var: Option<T>,
    file_value: Option<T>,
    default: T,
) -> T {
    cli.or(env_var).or(file_value).unwrap_or(default)
}
