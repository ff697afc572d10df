//! Process configuration for the migration entry point.
//!
//! Values come from environment variables; `from_lookup` accepts any key
//! source so callers and tests do not have to touch the real environment.

use crate::logging::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "RETAIL_DB_PATH";
pub const ENV_FILE_CUSTOMER: &str = "STORAGE_FILE_CUSTOMER";
pub const ENV_FILE_INVOICE: &str = "STORAGE_FILE_INVOICE";
pub const ENV_FILE_PRODUCT: &str = "STORAGE_FILE_PRODUCT";
pub const ENV_FILE_SALE: &str = "STORAGE_FILE_SALE";
pub const ENV_LOG_LEVEL: &str = "RETAIL_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "RETAIL_LOG_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing(key) => write!(f, "missing required setting `{key}`"),
        }
    }
}

impl Error for ConfigError {}

/// Legacy export file per entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFiles {
    pub customers: PathBuf,
    pub invoices: PathBuf,
    pub products: PathBuf,
    pub sales: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub sources: SourceFiles,
    pub log_level: String,
    /// Logging stays off when unset.
    pub log_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration from `lookup`; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let require = |key: &'static str| get(key).map(PathBuf::from).ok_or(ConfigError::Missing(key));

        Ok(Self {
            db_path: require(ENV_DB_PATH)?,
            sources: SourceFiles {
                customers: require(ENV_FILE_CUSTOMER)?,
                invoices: require(ENV_FILE_INVOICE)?,
                products: require(ENV_FILE_PRODUCT)?,
                sales: require(ENV_FILE_SALE)?,
            },
            log_level: get(ENV_LOG_LEVEL).unwrap_or_else(|| default_log_level().to_string()),
            log_dir: get(ENV_LOG_DIR).map(PathBuf::from),
        })
    }
}
