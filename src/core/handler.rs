use crate::config::HandlerConfig;
use crate::core::routing::{
    destination_key, is_timestamped, target_secret_id, ObjectPath, TargetLocation,
};
use crate::core::{
    CopyAcl, HandlerResponse, Notifier, ObjectStore, Outcome, Plan, ScanEvent, ScanResultStatus,
    ScanStatus, SecretStore,
};
use crate::utils::error::{Result, ScanTransferError};
use chrono::{DateTime, Utc};

pub const ALERT_SUBJECT: &str = "🚨 Malware Detection Alert";

/// Routes GuardDuty scan results: clean files go to the supplier's target
/// bucket, infected files to quarantine.
pub struct ScanResultHandler<O: ObjectStore, S: SecretStore, N: Notifier> {
    objects: O,
    secrets: S,
    notifier: N,
    config: HandlerConfig,
}

struct Transfer {
    source_bucket: String,
    source_key: String,
    target_bucket: String,
    target_key: String,
}

impl<O: ObjectStore, S: SecretStore, N: Notifier> ScanResultHandler<O, S, N> {
    pub fn new(objects: O, secrets: S, notifier: N, config: HandlerConfig) -> Self {
        Self {
            objects,
            secrets,
            notifier,
            config,
        }
    }

    /// Entry point for one invocation: never fails, errors become a 500.
    pub async fn handle_value(
        &self,
        payload: serde_json::Value,
        now: DateTime<Utc>,
    ) -> HandlerResponse {
        tracing::info!(event = %payload, "Received event");

        let event = match ScanEvent::from_value(payload) {
            Ok(event) => event,
            Err(e) => return error_response(&e),
        };

        let result = self.handle(&event, now).await;
        respond(&result, &event)
    }

    pub async fn handle(&self, event: &ScanEvent, now: DateTime<Utc>) -> Result<Outcome> {
        tracing::info!(
            scan_status = %event.scan_status,
            scan_result_status = %event.scan_result_status,
            bucket = event.bucket_name.as_deref().unwrap_or("None"),
            object_key = event.object_key.as_deref().unwrap_or("None"),
            "Processing scan result"
        );

        match (&event.scan_status, &event.scan_result_status) {
            (ScanStatus::Completed, ScanResultStatus::NoThreatsFound) => {
                self.transfer_clean(event, now).await
            }
            (ScanStatus::Completed, ScanResultStatus::ThreatsFound) => {
                self.quarantine_infected(event).await
            }
            (ScanStatus::Completed, other) => {
                tracing::warn!("Unknown scan result status: {}", other);
                Ok(ignored(event))
            }
            (status, _) if status.is_unscanned() => Ok(self.record_unscanned(event)),
            (status, _) => {
                tracing::warn!("Unknown scan status: {}", status);
                Ok(ignored(event))
            }
        }
    }

    /// Resolves what [`handle`](Self::handle) would do. Reads the target
    /// secret for clean files but moves nothing.
    pub async fn plan(&self, event: &ScanEvent, now: DateTime<Utc>) -> Result<Plan> {
        match (&event.scan_status, &event.scan_result_status) {
            (ScanStatus::Completed, ScanResultStatus::NoThreatsFound) => {
                let transfer = self.resolve_transfer(event, now).await?;
                Ok(Plan::Transfer {
                    source_bucket: transfer.source_bucket,
                    source_key: transfer.source_key,
                    target_bucket: transfer.target_bucket,
                    target_key: transfer.target_key,
                    delete_source: self.config.delete_source_after_transfer,
                })
            }
            (ScanStatus::Completed, ScanResultStatus::ThreatsFound) => {
                let (bucket, key) = event.object_location()?;
                Ok(Plan::Quarantine {
                    source_bucket: bucket.to_string(),
                    key: key.to_string(),
                    quarantine_bucket: self.quarantine_bucket()?.to_string(),
                    notify_topic: self.notification_topic()?.to_string(),
                })
            }
            (status, result) => Ok(Plan::Nothing {
                reason: format!("scan status {}, result {}", status, result),
            }),
        }
    }

    async fn resolve_transfer(&self, event: &ScanEvent, now: DateTime<Utc>) -> Result<Transfer> {
        let (bucket, key) = event.object_location()?;
        let path = ObjectPath::parse(key)?;
        tracing::info!(
            supplier = %path.supplier,
            file_name = %path.file_name,
            "Resolved object path"
        );

        let secret_id = target_secret_id(&self.config.secret_prefix, &path.supplier);
        let secret = self.secrets.secret_string(&secret_id).await?;
        let target = TargetLocation::parse(&secret_id, &secret)?;

        let landing_timestamp = is_timestamped(&path.supplier, &self.config.timestamped_suppliers)
            .then(|| now.timestamp());
        let target_key = destination_key(&path, &target, landing_timestamp);
        if target.bucket == bucket && target_key == key {
            return Err(ScanTransferError::InvalidTargetLocation {
                secret_id,
                value: secret,
            });
        }

        Ok(Transfer {
            source_bucket: bucket.to_string(),
            source_key: key.to_string(),
            target_bucket: target.bucket,
            target_key,
        })
    }

    async fn transfer_clean(&self, event: &ScanEvent, now: DateTime<Utc>) -> Result<Outcome> {
        let transfer = self.resolve_transfer(event, now).await?;

        self.objects
            .copy_object(
                &transfer.source_bucket,
                &transfer.source_key,
                &transfer.target_bucket,
                &transfer.target_key,
                CopyAcl::BucketOwnerFullControl,
            )
            .await?;
        tracing::info!(
            "Successfully copied {} to {}/{}",
            transfer.source_key,
            transfer.target_bucket,
            transfer.target_key
        );

        if self.config.delete_source_after_transfer {
            self.objects
                .delete_object(&transfer.source_bucket, &transfer.source_key)
                .await?;
            tracing::info!(
                "Removed {} from {}",
                transfer.source_key,
                transfer.source_bucket
            );
        }

        Ok(Outcome::Transferred {
            source_bucket: transfer.source_bucket,
            source_key: transfer.source_key,
            target_bucket: transfer.target_bucket,
            target_key: transfer.target_key,
        })
    }

    async fn quarantine_infected(&self, event: &ScanEvent) -> Result<Outcome> {
        let (bucket, key) = event.object_location()?;
        // Both settings are checked before anything moves.
        let quarantine_bucket = self.quarantine_bucket()?;
        let topic = self.notification_topic()?;
        if quarantine_bucket == bucket {
            return Err(ScanTransferError::InvalidConfigValue {
                field: "QUARANTINE_BUCKET".to_string(),
                value: quarantine_bucket.to_string(),
                reason: "Quarantine bucket must differ from the scanned bucket".to_string(),
            });
        }

        let threat_names: Vec<&str> = event.threats.iter().map(|t| t.name.as_str()).collect();
        tracing::warn!(
            bucket,
            object_key = key,
            threats = ?threat_names,
            "Processing infected file"
        );

        self.objects
            .copy_object(bucket, key, quarantine_bucket, key, CopyAcl::Inherit)
            .await?;
        self.objects.delete_object(bucket, key).await?;
        tracing::info!("Moved {} to quarantine bucket {}", key, quarantine_bucket);

        self.notifier
            .publish(topic, ALERT_SUBJECT, &self.alert_message(key))
            .await?;
        tracing::info!("Infected file processing completed");

        Ok(Outcome::Quarantined {
            source_bucket: bucket.to_string(),
            key: key.to_string(),
            quarantine_bucket: quarantine_bucket.to_string(),
            threats: event.threats.clone(),
        })
    }

    fn record_unscanned(&self, event: &ScanEvent) -> Outcome {
        tracing::warn!(
            scan_status = %event.scan_status,
            bucket = event.bucket_name.as_deref().unwrap_or("None"),
            object_key = event.object_key.as_deref().unwrap_or("None"),
            "Object was not scanned; leaving it in place"
        );

        Outcome::Unscanned {
            status: event.scan_status.to_string(),
            bucket: event.bucket_name.clone(),
            key: event.object_key.clone(),
        }
    }

    pub fn alert_message(&self, key: &str) -> String {
        format!(
            "Automated Malware Protection has detected malware in the file '{}'. \n\n\
             This file has NOT been transferred, please contact us via Support: \n{} \n\n\
             Many thanks, {}.",
            key, self.config.support_url, self.config.alert_signature
        )
    }

    fn quarantine_bucket(&self) -> Result<&str> {
        self.config
            .quarantine_bucket
            .as_deref()
            .ok_or_else(|| ScanTransferError::missing_config("QUARANTINE_BUCKET"))
    }

    fn notification_topic(&self) -> Result<&str> {
        self.config
            .notification_topic_arn
            .as_deref()
            .ok_or_else(|| ScanTransferError::missing_config("NOTIFICATION_TOPIC_ARN"))
    }
}

fn ignored(event: &ScanEvent) -> Outcome {
    Outcome::Ignored {
        scan_status: event.scan_status.to_string(),
        scan_result_status: event.scan_result_status.to_string(),
    }
}

/// Maps a handling result onto the function's response contract.
pub fn respond(result: &Result<Outcome>, event: &ScanEvent) -> HandlerResponse {
    match result {
        Ok(_) => HandlerResponse::ok(&format!(
            "Successfully processed scan status: {}, result: {}",
            event.scan_status, event.scan_result_status
        )),
        Err(e) => error_response(e),
    }
}

fn error_response(e: &ScanTransferError) -> HandlerResponse {
    tracing::error!(
        category = ?e.category(),
        severity = ?e.severity(),
        "Error processing event: {}",
        e
    );
    HandlerResponse::error(&format!("Error processing event: {}", e))
}
