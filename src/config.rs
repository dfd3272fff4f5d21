//! Configuration
//!
//! Settings come from CLI flags, falling back to environment variables (a
//! `.env` file is loaded first when present).

use std::path::PathBuf;

use clap::Args;
use rusty_money::iso::{AED, Currency, EUR, GBP, PKR, SAR, USD};
use thiserror::Error;

use crate::{images::ImageResolver, storage::FileStore};

/// Errors raised while interpreting configuration values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The currency code is not one the shop supports.
    #[error("unknown currency code: {0}")]
    UnknownCurrency(String),
}

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, Args)]
pub struct LoggingConfig {
    /// Log filter (trace, debug, info, warn, error, or directives)
    #[arg(long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Local storage settings.
#[derive(Debug, Clone, Args)]
pub struct StorageConfig {
    /// Directory holding the cart and session slots
    #[arg(long, env = "STOREFRONT_DATA_DIR", default_value = ".storefront")]
    pub data_dir: PathBuf,
}

impl StorageConfig {
    /// File store rooted at the data directory.
    pub fn file_store(&self) -> FileStore {
        FileStore::new(&self.data_dir)
    }
}

/// Shop settings.
#[derive(Debug, Clone, Args)]
pub struct ShopConfig {
    /// Backend base URL, used to resolve relative image paths
    #[arg(long, env = "BACKEND_URL", default_value = "http://localhost:5000")]
    pub backend_url: String,

    /// ISO 4217 currency code prices are expressed in
    #[arg(long, env = "STOREFRONT_CURRENCY", default_value = "PKR")]
    pub currency: String,
}

impl ShopConfig {
    /// Look up the configured currency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownCurrency`] for codes the shop does not
    /// sell in.
    pub fn currency(&self) -> Result<&'static Currency, ConfigError> {
        let code = self.currency.trim().to_ascii_uppercase();

        let currency = match code.as_str() {
            "PKR" => PKR,
            "USD" => USD,
            "GBP" => GBP,
            "EUR" => EUR,
            "AED" => AED,
            "SAR" => SAR,
            _ => return Err(ConfigError::UnknownCurrency(code)),
        };

        Ok(currency)
    }

    /// Image resolver for the backend URL.
    pub fn image_resolver(&self) -> ImageResolver {
        ImageResolver::new(&self.backend_url)
    }
}

/// All storefront settings.
#[derive(Debug, Clone, Args)]
pub struct StorefrontConfig {
    /// Local storage settings.
    #[command(flatten)]
    pub storage: StorageConfig,

    /// Shop settings.
    #[command(flatten)]
    pub shop: ShopConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}
