use crate::config::HandlerConfig;
use crate::utils::error::{Result, ScanTransferError};
use crate::utils::validation::{validate_path, Validate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Configuration for replaying scan events against local directories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayConfig {
    #[serde(default)]
    pub handler: HandlerConfig,
    pub local: LocalConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalConfig {
    /// One sub-directory per bucket lives under this root.
    pub root: PathBuf,
    /// JSON-lines file receiving published notifications.
    pub outbox: Option<PathBuf>,
    #[serde(default)]
    pub secrets: HashMap<String, String>,
}

impl ReplayConfig {
    /// Loads the replay configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ScanTransferError::Io)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ScanTransferError::ConfigParse {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Substitutes environment variables such as `${TOPIC_ARN}`.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ScanTransferError::ConfigParse {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl Validate for ReplayConfig {
    fn validate(&self) -> Result<()> {
        self.handler.validate()?;

        validate_path("local.root", &self.local.root.to_string_lossy())?;
        if let Some(outbox) = &self.local.outbox {
            validate_path("local.outbox", &outbox.to_string_lossy())?;
        }

        Ok(())
    }
}
