//! Runtime configuration read from the process environment.
//!
//! # Invariants
//! - Missing variables fall back to defaults; malformed ones are errors.
//! - `page_size` is normalized exactly like `PageRequest::of`.

use crate::logging::default_log_level;
use crate::page::normalize_page_size;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "DSCATALOG_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "DSCATALOG_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "DSCATALOG_LOG_DIR";
pub const ENV_PAGE_SIZE: &str = "DSCATALOG_PAGE_SIZE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidNumber { key: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidNumber { key, value } => {
                write!(f, "{key} must be a non-negative integer, got `{value}`")
            }
        }
    }
}

impl Error for ConfigError {}

/// Catalog runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    /// SQLite file; `None` selects an in-memory database.
    pub db_path: Option<PathBuf>,
    pub log_level: String,
    /// Rolling log directory; `None` disables file logging.
    pub log_dir: Option<PathBuf>,
    pub page_size: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            log_level: default_log_level().to_string(),
            log_dir: None,
            page_size: normalize_page_size(None),
        }
    }
}

impl CatalogConfig {
    /// Reads `DSCATALOG_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let page_size = match non_blank(ENV_PAGE_SIZE) {
            Some(raw) => {
                let parsed = raw
                    .trim()
                    .parse::<u32>()
                    .map_err(|_| ConfigError::InvalidNumber {
                        key: ENV_PAGE_SIZE,
                        value: raw.clone(),
                    })?;
                normalize_page_size(Some(parsed))
            }
            None => defaults.page_size,
        };

        Ok(Self {
            db_path: non_blank(ENV_DB_PATH).map(PathBuf::from),
            log_level: non_blank(ENV_LOG_LEVEL).unwrap_or(defaults.log_level),
            log_dir: non_blank(ENV_LOG_DIR).map(PathBuf::from),
            page_size,
        })
    }
}
