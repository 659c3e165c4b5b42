#[cfg(feature = "cli")]
pub mod cli;
pub mod lambda;
pub mod toml_config;

use crate::core::routing::DEFAULT_SECRET_PREFIX;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_s3_bucket_name, validate_sns_topic_arn, validate_url,
    Validate,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SUPPORT_URL: &str =
    "https://github.com/ministryofjustice/data-platform-support/issues";
pub const DEFAULT_ALERT_SIGNATURE: &str = "Analytical Platform Team";

/// Settings the scan result handler needs, however they were loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerConfig {
    #[serde(default)]
    pub quarantine_bucket: Option<String>,
    #[serde(default)]
    pub notification_topic_arn: Option<String>,
    #[serde(default = "default_secret_prefix")]
    pub secret_prefix: String,
    #[serde(default = "default_timestamped_suppliers")]
    pub timestamped_suppliers: Vec<String>,
    #[serde(default = "default_support_url")]
    pub support_url: String,
    #[serde(default = "default_alert_signature")]
    pub alert_signature: String,
    #[serde(default)]
    pub delete_source_after_transfer: bool,
}

fn default_secret_prefix() -> String {
    DEFAULT_SECRET_PREFIX.to_string()
}

fn default_timestamped_suppliers() -> Vec<String> {
    vec!["essex-police".to_string()]
}

fn default_support_url() -> String {
    DEFAULT_SUPPORT_URL.to_string()
}

fn default_alert_signature() -> String {
    DEFAULT_ALERT_SIGNATURE.to_string()
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            quarantine_bucket: None,
            notification_topic_arn: None,
            secret_prefix: default_secret_prefix(),
            timestamped_suppliers: default_timestamped_suppliers(),
            support_url: default_support_url(),
            alert_signature: default_alert_signature(),
            delete_source_after_transfer: false,
        }
    }
}

impl Validate for HandlerConfig {
    fn validate(&self) -> Result<()> {
        // Presence is checked when an infected file arrives.
        if let Some(bucket) = &self.quarantine_bucket {
            validate_s3_bucket_name("quarantine_bucket", bucket)?;
        }
        if let Some(arn) = &self.notification_topic_arn {
            validate_sns_topic_arn("notification_topic_arn", arn)?;
        }

        validate_non_empty_string("secret_prefix", &self.secret_prefix)?;
        validate_url("support_url", &self.support_url)?;

        for supplier in &self.timestamped_suppliers {
            validate_non_empty_string("timestamped_suppliers", supplier)?;
        }

        tracing::debug!("Handler configuration validation passed");
        Ok(())
    }
}
