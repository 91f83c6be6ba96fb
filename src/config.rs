//! Environment configuration.
//!
//! Read once at startup and threaded into the engine by value; the pure
//! modules never touch the environment themselves. Secrets are required,
//! everything else has a default.

use std::env;

use thiserror::Error;

use crate::tags::TagDateFormat;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    MissingVar(&'static str),
    #[error("Invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },
}

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Shared secret for webhook HMAC verification.
    pub webhook_secret: String,
    /// Shop root URL, e.g. `https://example.myshopify.com`.
    pub shop_url: String,
    /// Admin API access token.
    pub access_token: String,
    /// Admin API version segment.
    pub api_version: String,
    /// Seconds after order creation during which update events may still
    /// trigger automated mutation.
    pub order_update_window_secs: i64,
    /// Canonical rendering for delivery-date tags.
    pub tag_date_format: TagDateFormat,
    /// Listen address for the webhook server.
    pub bind_addr: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            webhook_secret: required("SHOPIFY_WEBHOOK_SECRET")?,
            shop_url: required("SHOPIFY_SHOP_URL")?,
            access_token: required("SHOPIFY_ACCESS_TOKEN")?,
            api_version: env::var("SHOPIFY_API_VERSION")
                .unwrap_or_else(|_| "2024-01".to_string()),
            order_update_window_secs: window_from_env()?,
            tag_date_format: format_from_env()?,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
        })
    }
}

fn required(var: &'static str) -> Result<String, ConfigError> {
    env::var(var)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::MissingVar(var))
}

fn window_from_env() -> Result<i64, ConfigError> {
    const VAR: &str = "ORDER_UPDATE_WINDOW_SECS";
    match env::var(VAR) {
        Ok(raw) => raw
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|secs| *secs >= 0)
            .ok_or(ConfigError::InvalidValue { var: VAR, value: raw }),
        Err(_) => Ok(300),
    }
}

fn format_from_env() -> Result<TagDateFormat, ConfigError> {
    const VAR: &str = "TAG_DATE_FORMAT";
    match env::var(VAR) {
        Ok(raw) => TagDateFormat::from_config(&raw)
            .ok_or(ConfigError::InvalidValue { var: VAR, value: raw }),
        Err(_) => Ok(TagDateFormat::DayMonthYear),
    }
}
