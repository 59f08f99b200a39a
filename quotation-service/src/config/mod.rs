//! Configuration module for quotation-service.

use service_core::config as core_config;
use service_core::error::AppError;
use service_core::observability::LogFormat;
use std::env;

#[derive(Debug, Clone)]
pub struct QuotationConfig {
    pub common: core_config::Config,
    pub service_name: String,
    pub service_version: String,
    pub log_level: String,
    pub log_format: LogFormat,
    /// Currency label stamped on new quotations. Display only.
    pub currency: String,
}

impl QuotationConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;

        let currency = env::var("QUOTATION_CURRENCY").unwrap_or_else(|_| "INR".to_string());
        if currency.trim().is_empty() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "QUOTATION_CURRENCY must not be empty"
            )));
        }

        Ok(Self {
            common,
            service_name: env::var("SERVICE_NAME")
                .unwrap_or_else(|_| "quotation-service".to_string()),
            service_version: env::var("SERVICE_VERSION")
                .unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            log_format: env::var("LOG_FORMAT")
                .map(|s| LogFormat::from_string(&s))
                .unwrap_or(LogFormat::Json),
            currency: currency.trim().to_uppercase(),
        })
    }
}
