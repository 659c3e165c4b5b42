use crate::utils::error::{Result, ScanTransferError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// `detail.scanStatus` of a GuardDuty Malware Protection for S3 event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanStatus {
    Completed,
    AccessDenied,
    Failed,
    Unsupported,
    Other(String),
    Missing,
}

impl ScanStatus {
    pub fn from_wire(value: Option<&str>) -> Self {
        match value {
            Some("COMPLETED") => Self::Completed,
            Some("ACCESS_DENIED") => Self::AccessDenied,
            Some("FAILED") => Self::Failed,
            Some("UNSUPPORTED") => Self::Unsupported,
            Some(other) => Self::Other(other.to_string()),
            None => Self::Missing,
        }
    }

    /// Statuses where GuardDuty gave up on the object.
    pub fn is_unscanned(&self) -> bool {
        matches!(self, Self::AccessDenied | Self::Failed | Self::Unsupported)
    }
}

impl fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => f.write_str("COMPLETED"),
            Self::AccessDenied => f.write_str("ACCESS_DENIED"),
            Self::Failed => f.write_str("FAILED"),
            Self::Unsupported => f.write_str("UNSUPPORTED"),
            Self::Other(value) => f.write_str(value),
            Self::Missing => f.write_str("None"),
        }
    }
}

/// `detail.scanResultDetails.scanResultStatus`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanResultStatus {
    NoThreatsFound,
    ThreatsFound,
    Other(String),
    Missing,
}

impl ScanResultStatus {
    pub fn from_wire(value: Option<&str>) -> Self {
        match value {
            Some("NO_THREATS_FOUND") => Self::NoThreatsFound,
            Some("THREATS_FOUND") => Self::ThreatsFound,
            Some(other) => Self::Other(other.to_string()),
            None => Self::Missing,
        }
    }
}

impl fmt::Display for ScanResultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoThreatsFound => f.write_str("NO_THREATS_FOUND"),
            Self::ThreatsFound => f.write_str("THREATS_FOUND"),
            Self::Other(value) => f.write_str(value),
            Self::Missing => f.write_str("None"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Threat {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawEvent {
    #[serde(default)]
    detail: RawDetail,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDetail {
    scan_status: Option<String>,
    #[serde(default)]
    scan_result_details: Option<RawScanResultDetails>,
    #[serde(default)]
    s3_object_details: Option<RawObjectDetails>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawScanResultDetails {
    scan_result_status: Option<String>,
    #[serde(default)]
    threats: Option<Vec<Threat>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawObjectDetails {
    bucket_name: Option<String>,
    object_key: Option<String>,
}

/// The parts of a scan result event the handler acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanEvent {
    pub scan_status: ScanStatus,
    pub scan_result_status: ScanResultStatus,
    pub threats: Vec<Threat>,
    pub bucket_name: Option<String>,
    pub object_key: Option<String>,
}

impl ScanEvent {
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        if !value.is_object() {
            return Err(ScanTransferError::invalid_event(
                "event payload must be a JSON object",
            ));
        }

        let raw: RawEvent = serde_json::from_value(value)
            .map_err(|e| ScanTransferError::invalid_event(e.to_string()))?;

        let details = raw.detail.scan_result_details.unwrap_or_default();
        let object = raw.detail.s3_object_details.unwrap_or_default();

        Ok(Self {
            scan_status: ScanStatus::from_wire(raw.detail.scan_status.as_deref()),
            scan_result_status: ScanResultStatus::from_wire(details.scan_result_status.as_deref()),
            threats: details.threats.unwrap_or_default(),
            bucket_name: object.bucket_name,
            object_key: object.object_key,
        })
    }

    /// Bucket and key, both required before anything is moved.
    pub fn object_location(&self) -> Result<(&str, &str)> {
        let bucket = self
            .bucket_name
            .as_deref()
            .filter(|b| !b.is_empty())
            .ok_or_else(|| ScanTransferError::invalid_event("missing s3ObjectDetails.bucketName"))?;
        let key = self
            .object_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ScanTransferError::invalid_event("missing s3ObjectDetails.objectKey"))?;
        Ok((bucket, key))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Outcome {
    Transferred {
        source_bucket: String,
        source_key: String,
        target_bucket: String,
        target_key: String,
    },
    Quarantined {
        source_bucket: String,
        key: String,
        quarantine_bucket: String,
        threats: Vec<Threat>,
    },
    Unscanned {
        status: String,
        bucket: Option<String>,
        key: Option<String>,
    },
    Ignored {
        scan_status: String,
        scan_result_status: String,
    },
}

/// What the handler would do for an event, without doing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Plan {
    Transfer {
        source_bucket: String,
        source_key: String,
        target_bucket: String,
        target_key: String,
        delete_source: bool,
    },
    Quarantine {
        source_bucket: String,
        key: String,
        quarantine_bucket: String,
        notify_topic: String,
    },
    Nothing {
        reason: String,
    },
}

/// Lambda proxy-style response: `body` holds a JSON-encoded string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl HandlerResponse {
    pub fn ok(message: &str) -> Self {
        Self::with_message(200, message)
    }

    pub fn error(message: &str) -> Self {
        Self::with_message(500, message)
    }

    fn with_message(status_code: u16, message: &str) -> Self {
        // A string always serializes; keep the raw text as a last resort anyway.
        let body = serde_json::to_string(message).unwrap_or_else(|_| message.to_string());
        Self { status_code, body }
    }
}
