use std::env;

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Required environment variable {0} is not set")]
    MissingVar(&'static str),
    #[error("Invalid value for {var}: {message}")]
    InvalidValue { var: &'static str, message: String },
}

/// Startup configuration for the worker. Every option is required; a missing or malformed value is a fatal
/// configuration error rather than a silent default, because a worker pointed at the wrong store or topic would
/// quietly eat the queue.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// SQLite URL for the work-item, marker and secret tables.
    pub database_url: String,
    /// Bounded batch size for one processing pass.
    pub batch_size: u32,
    /// Name of the downstream order-received topic.
    pub order_topic: String,
    /// Name of the self-addressed continuation topic.
    pub continuation_topic: String,
    /// Shopify Admin API version segment, e.g. "2024-04".
    pub shopify_api_version: String,
}

impl WorkerConfig {
    pub fn try_from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&'static str) -> Option<String>) -> Result<Self, ConfigError> {
        let require = |var: &'static str| lookup(var).ok_or(ConfigError::MissingVar(var));
        let database_url = require("SIW_DATABASE_URL")?;
        let batch_size = require("SIW_BATCH_SIZE")?
            .parse::<u32>()
            .map_err(|e| ConfigError::InvalidValue { var: "SIW_BATCH_SIZE", message: e.to_string() })?;
        if batch_size == 0 {
            return Err(ConfigError::InvalidValue {
                var: "SIW_BATCH_SIZE",
                message: "batch size must be at least 1".to_string(),
            });
        }
        let order_topic = require("SIW_ORDER_TOPIC")?;
        let continuation_topic = require("SIW_CONTINUATION_TOPIC")?;
        let shopify_api_version = require("SIW_SHOPIFY_API_VERSION")?;
        Ok(Self { database_url, batch_size, order_topic, continuation_topic, shopify_api_version })
    }
}
