use crate::core::{CopyAcl, Notifier, ObjectStore, SecretStore};
use crate::utils::error::{Result, ScanTransferError};
use async_trait::async_trait;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_s3::types::ObjectCannedAcl;
use aws_sdk_s3::Client as S3Client;
use aws_sdk_secretsmanager::Client as SecretsManagerClient;
use aws_sdk_sns::Client as SnsClient;

/// `CopySource` value: bucket plus the URL-encoded key, slashes kept.
pub fn copy_source(bucket: &str, key: &str) -> String {
    let encoded: Vec<_> = key.split('/').map(urlencoding::encode).collect();
    format!("{}/{}", bucket, encoded.join("/"))
}

#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: S3Client,
}

impl S3ObjectStore {
    pub fn new(client: S3Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn copy_object(
        &self,
        source_bucket: &str,
        source_key: &str,
        target_bucket: &str,
        target_key: &str,
        acl: CopyAcl,
    ) -> Result<()> {
        let mut request = self
            .client
            .copy_object()
            .copy_source(copy_source(source_bucket, source_key))
            .bucket(target_bucket)
            .key(target_key);
        if acl == CopyAcl::BucketOwnerFullControl {
            request = request.acl(ObjectCannedAcl::BucketOwnerFullControl);
        }

        request.send().await.map_err(|err| {
            if err.code() == Some("NoSuchKey") {
                return ScanTransferError::ObjectNotFound {
                    bucket: source_bucket.to_string(),
                    key: source_key.to_string(),
                };
            }
            ScanTransferError::object_store(format!(
                "failed to copy s3://{}/{} to s3://{}/{}: {}",
                source_bucket,
                source_key,
                target_bucket,
                target_key,
                DisplayErrorContext(&err)
            ))
        })?;

        Ok(())
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| {
                ScanTransferError::object_store(format!(
                    "failed to delete s3://{}/{}: {}",
                    bucket,
                    key,
                    DisplayErrorContext(&err)
                ))
            })?;

        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct SecretsManagerStore {
    client: SecretsManagerClient,
}

impl SecretsManagerStore {
    pub fn new(client: SecretsManagerClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SecretStore for SecretsManagerStore {
    async fn secret_string(&self, secret_id: &str) -> Result<String> {
        let output = self
            .client
            .get_secret_value()
            .secret_id(secret_id)
            .send()
            .await
            .map_err(|err| {
                let not_found = err
                    .as_service_error()
                    .map(|e| e.is_resource_not_found_exception())
                    .unwrap_or(false);
                if not_found {
                    ScanTransferError::SecretNotFound {
                        secret_id: secret_id.to_string(),
                    }
                } else {
                    ScanTransferError::SecretStore {
                        secret_id: secret_id.to_string(),
                        message: aws_sdk_secretsmanager::error::DisplayErrorContext(&err)
                            .to_string(),
                    }
                }
            })?;

        output
            .secret_string()
            .map(str::to_string)
            .ok_or_else(|| ScanTransferError::SecretStore {
                secret_id: secret_id.to_string(),
                message: "secret has no string value".to_string(),
            })
    }
}

#[derive(Debug, Clone)]
pub struct SnsNotifier {
    client: SnsClient,
}

impl SnsNotifier {
    pub fn new(client: SnsClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Notifier for SnsNotifier {
    async fn publish(&self, topic: &str, subject: &str, message: &str) -> Result<()> {
        let output = self
            .client
            .publish()
            .topic_arn(topic)
            .subject(subject)
            .message(message)
            .send()
            .await
            .map_err(|err| {
                ScanTransferError::notification(format!(
                    "failed to publish to {}: {}",
                    topic,
                    aws_sdk_sns::error::DisplayErrorContext(&err)
                ))
            })?;

        tracing::info!(
            topic,
            message_id = output.message_id().unwrap_or("unknown"),
            "Notification published"
        );
        Ok(())
    }
}
