use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanTransferError {
    #[error("Invalid scan event: {message}")]
    InvalidEvent { message: String },

    #[error("Invalid object key '{key}': {reason}")]
    InvalidObjectKey { key: String, reason: String },

    #[error("Invalid target location '{value}' in secret {secret_id}")]
    InvalidTargetLocation { secret_id: String, value: String },

    #[error("Missing configuration: {field}")]
    MissingConfig { field: String },

    #[error("Invalid configuration value for {field} ('{value}'): {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration parse error: {message}")]
    ConfigParse { message: String },

    #[error("Object not found: s3://{bucket}/{key}")]
    ObjectNotFound { bucket: String, key: String },

    #[error("Object store operation failed: {message}")]
    ObjectStore { message: String },

    #[error("Secret not found: {secret_id}")]
    SecretNotFound { secret_id: String },

    #[error("Secret lookup failed for {secret_id}: {message}")]
    SecretStore { secret_id: String, message: String },

    #[error("Notification failed: {message}")]
    Notification { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Event,
    Config,
    Storage,
    Secrets,
    Notification,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ScanTransferError {
    pub fn invalid_event(message: impl Into<String>) -> Self {
        Self::InvalidEvent {
            message: message.into(),
        }
    }

    pub fn object_store(message: impl Into<String>) -> Self {
        Self::ObjectStore {
            message: message.into(),
        }
    }

    pub fn notification(message: impl Into<String>) -> Self {
        Self::Notification {
            message: message.into(),
        }
    }

    pub fn missing_config(field: impl Into<String>) -> Self {
        Self::MissingConfig {
            field: field.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidEvent { .. } | Self::InvalidObjectKey { .. } => ErrorCategory::Event,
            Self::InvalidTargetLocation { .. }
            | Self::SecretNotFound { .. }
            | Self::SecretStore { .. } => ErrorCategory::Secrets,
            Self::MissingConfig { .. }
            | Self::InvalidConfigValue { .. }
            | Self::ConfigParse { .. } => ErrorCategory::Config,
            Self::ObjectNotFound { .. } | Self::ObjectStore { .. } => ErrorCategory::Storage,
            Self::Notification { .. } => ErrorCategory::Notification,
            Self::Io(_) | Self::Serialization(_) => ErrorCategory::System,
        }
    }

    /// Maps to the replay CLI's exit code.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ObjectStore { .. } | Self::SecretStore { .. } | Self::Notification { .. } => {
                ErrorSeverity::Medium
            }
            Self::InvalidEvent { .. }
            | Self::InvalidObjectKey { .. }
            | Self::ObjectNotFound { .. }
            | Self::Serialization(_) => ErrorSeverity::High,
            Self::InvalidTargetLocation { .. }
            | Self::SecretNotFound { .. }
            | Self::MissingConfig { .. }
            | Self::InvalidConfigValue { .. }
            | Self::ConfigParse { .. }
            | Self::Io(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::InvalidEvent { .. } => {
                "Check that the event is a GuardDuty Malware Protection scan result".to_string()
            }
            Self::InvalidObjectKey { .. } => {
                "Uploads must be placed under a '<supplier>/' prefix".to_string()
            }
            Self::InvalidTargetLocation { secret_id, .. } => format!(
                "Set {} to '<bucket>' or '<bucket>/<prefix>'",
                secret_id
            ),
            Self::SecretNotFound { secret_id } => {
                format!("Create the secret {} for this supplier", secret_id)
            }
            Self::SecretStore { .. } => {
                "Check the function's secretsmanager:GetSecretValue permissions".to_string()
            }
            Self::MissingConfig { field } => format!("Set {} in the environment or config file", field),
            Self::InvalidConfigValue { field, .. } => format!("Fix the value of {}", field),
            Self::ConfigParse { .. } => "Check the configuration file syntax".to_string(),
            Self::ObjectNotFound { .. } => {
                "The object may already have been moved; check the source bucket".to_string()
            }
            Self::ObjectStore { .. } => {
                "Check bucket policies and the function's S3 permissions".to_string()
            }
            Self::Notification { .. } => {
                "Check the topic ARN and the function's sns:Publish permission".to_string()
            }
            Self::Io(_) => "Check file paths and permissions".to_string(),
            Self::Serialization(_) => "Check that the input is valid JSON".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Event => format!("The scan event could not be processed: {}", self),
            ErrorCategory::Config => format!("Configuration problem: {}", self),
            ErrorCategory::Storage => format!("Could not move the object: {}", self),
            ErrorCategory::Secrets => format!("Could not resolve the target bucket: {}", self),
            ErrorCategory::Notification => format!("Could not send the alert: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScanTransferError>;
