//! Storage configuration for the visits data file
//!
//! Values come from environment variables (an optional `.env` file is loaded
//! by the binary before this runs):
//! - `VITALS_DATA_FILE`: path of the data file (default `patients.txt`)
//! - `VITALS_REWRITE_FORMAT`: `lines` or `legacy` (default `lines`)

use std::env;
use std::path::PathBuf;

use thiserror::Error;
use tracing::info;

use crate::line_format::RewriteFormat;

/// Environment variable naming the data file
pub const DATA_FILE_ENV: &str = "VITALS_DATA_FILE";

/// Environment variable selecting the rewrite format
pub const REWRITE_FORMAT_ENV: &str = "VITALS_REWRITE_FORMAT";

/// Data file used when nothing is configured
pub const DEFAULT_DATA_FILE: &str = "patients.txt";

/// Configuration error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Unknown value for the rewrite format
    #[error("Unsupported rewrite format: {0} (expected 'lines' or 'legacy')")]
    UnsupportedRewriteFormat(String),
}

/// Storage configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// Path of the data file
    pub data_file: PathBuf,
    /// Format used when the data file is rewritten after a bulk delete
    pub rewrite_format: RewriteFormat,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            rewrite_format: RewriteFormat::default(),
        }
    }
}

impl StorageConfig {
    /// Create a new storage configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_file = lookup(DATA_FILE_ENV)
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE));

        let rewrite_format = match lookup(REWRITE_FORMAT_ENV) {
            Some(value) => value.parse::<RewriteFormat>()?,
            None => RewriteFormat::default(),
        };

        info!(
            "Storage configuration: data_file={}, rewrite_format={}",
            data_file.display(),
            rewrite_format
        );

        Ok(StorageConfig {
            data_file,
            rewrite_format,
        })
    }
}
