#![allow(dead_code)]

use async_trait::async_trait;
use scan_transfer::core::{CopyAcl, Notifier, ObjectStore, SecretStore};
use scan_transfer::{HandlerConfig, Result, ScanResultHandler, ScanTransferError};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Copy {
        from: (String, String),
        to: (String, String),
        acl: CopyAcl,
    },
    Delete {
        bucket: String,
        key: String,
    },
}

/// Records every call; a copy fails when `fail_copies` is set.
#[derive(Clone, Default)]
pub struct RecordingStore {
    pub calls: Arc<Mutex<Vec<StoreCall>>>,
    pub fail_copies: bool,
}

impl RecordingStore {
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for RecordingStore {
    async fn copy_object(
        &self,
        source_bucket: &str,
        source_key: &str,
        target_bucket: &str,
        target_key: &str,
        acl: CopyAcl,
    ) -> Result<()> {
        if self.fail_copies {
            return Err(ScanTransferError::object_store("AccessDenied"));
        }
        self.calls.lock().unwrap().push(StoreCall::Copy {
            from: (source_bucket.to_string(), source_key.to_string()),
            to: (target_bucket.to_string(), target_key.to_string()),
            acl,
        });
        Ok(())
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        self.calls.lock().unwrap().push(StoreCall::Delete {
            bucket: bucket.to_string(),
            key: key.to_string(),
        });
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct MapSecrets {
    pub secrets: HashMap<String, String>,
}

impl MapSecrets {
    pub fn with(pairs: &[(&str, &str)]) -> Self {
        Self {
            secrets: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

#[async_trait]
impl SecretStore for MapSecrets {
    async fn secret_string(&self, secret_id: &str) -> Result<String> {
        self.secrets
            .get(secret_id)
            .cloned()
            .ok_or_else(|| ScanTransferError::SecretNotFound {
                secret_id: secret_id.to_string(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Published {
    pub topic: String,
    pub subject: String,
    pub message: String,
}

#[derive(Clone, Default)]
pub struct RecordingNotifier {
    pub published: Arc<Mutex<Vec<Published>>>,
}

impl RecordingNotifier {
    pub fn published(&self) -> Vec<Published> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn publish(&self, topic: &str, subject: &str, message: &str) -> Result<()> {
        self.published.lock().unwrap().push(Published {
            topic: topic.to_string(),
            subject: subject.to_string(),
            message: message.to_string(),
        });
        Ok(())
    }
}

pub const TOPIC_ARN: &str = "arn:aws:sns:eu-west-2:123456789012:malware-alerts";

pub fn test_config() -> HandlerConfig {
    HandlerConfig {
        quarantine_bucket: Some("ingestion-quarantine".to_string()),
        notification_topic_arn: Some(TOPIC_ARN.to_string()),
        ..HandlerConfig::default()
    }
}

pub struct Harness {
    pub store: RecordingStore,
    pub notifier: RecordingNotifier,
    pub handler: ScanResultHandler<RecordingStore, MapSecrets, RecordingNotifier>,
}

pub fn harness(secrets: MapSecrets, config: HandlerConfig) -> Harness {
    harness_with_store(RecordingStore::default(), secrets, config)
}

pub fn harness_with_store(
    store: RecordingStore,
    secrets: MapSecrets,
    config: HandlerConfig,
) -> Harness {
    let notifier = RecordingNotifier::default();
    let handler = ScanResultHandler::new(store.clone(), secrets, notifier.clone(), config);
    Harness {
        store,
        notifier,
        handler,
    }
}

/// A GuardDuty Malware Protection scan result as delivered by EventBridge.
pub fn scan_event(scan_status: &str, result_status: Option<&str>, bucket: &str, key: &str) -> Value {
    let mut scan_result_details = json!({ "threats": null });
    if let Some(status) = result_status {
        scan_result_details["scanResultStatus"] = json!(status);
    }
    if result_status == Some("THREATS_FOUND") {
        scan_result_details["threats"] = json!([{ "name": "EICAR-Test-File (not a virus)" }]);
    }

    json!({
        "version": "0",
        "id": "72c7d362-737a-6dce-fc78-9e27a0171419",
        "detail-type": "GuardDuty Malware Protection Object Scan Result",
        "source": "aws.guardduty",
        "account": "123456789012",
        "time": "2024-06-10T06:13:20Z",
        "region": "eu-west-2",
        "resources": [],
        "detail": {
            "schemaVersion": "1.0",
            "scanStatus": scan_status,
            "resourceType": "S3_OBJECT",
            "s3ObjectDetails": {
                "bucketName": bucket,
                "objectKey": key,
                "eTag": "ASIAI44QH8DHBEXAMPLE",
                "versionId": "d41d8cd98f00b204e9800998ecf8427e",
                "s3Throttled": false
            },
            "scanResultDetails": scan_result_details
        }
    })
}
