use crate::config::HandlerConfig;
use crate::utils::error::{Result, ScanTransferError};
use std::env;

impl HandlerConfig {
    /// Reads the Lambda function's environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`HandlerConfig::from_env`] over an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = HandlerConfig::default();

        let delete_source_after_transfer = match non_empty("DELETE_SOURCE_AFTER_TRANSFER") {
            Some(value) => parse_flag("DELETE_SOURCE_AFTER_TRANSFER", &value)?,
            None => defaults.delete_source_after_transfer,
        };

        Ok(Self {
            quarantine_bucket: non_empty("QUARANTINE_BUCKET"),
            notification_topic_arn: non_empty("NOTIFICATION_TOPIC_ARN"),
            secret_prefix: non_empty("TARGET_SECRET_PREFIX").unwrap_or(defaults.secret_prefix),
            timestamped_suppliers: non_empty("TIMESTAMPED_SUPPLIERS")
                .map(|v| parse_list(&v))
                .unwrap_or(defaults.timestamped_suppliers),
            support_url: non_empty("SUPPORT_URL").unwrap_or(defaults.support_url),
            alert_signature: non_empty("ALERT_SIGNATURE").unwrap_or(defaults.alert_signature),
            delete_source_after_transfer,
        })
    }
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_flag(field: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(ScanTransferError::InvalidConfigValue {
            field: field.to_string(),
            value: other.to_string(),
            reason: "Expected true/false, 1/0 or yes/no".to_string(),
        }),
    }
}
