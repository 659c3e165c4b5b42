use crate::core::{CopyAcl, Notifier, ObjectStore, SecretStore};
use crate::utils::error::{Result, ScanTransferError};
use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// Buckets as directories: `s3://bucket/key` lives at `<root>/bucket/key`.
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn object_path(&self, bucket: &str, key: &str) -> Result<PathBuf> {
        let relative = Path::new(bucket).join(key);
        let escapes = bucket.contains('/')
            || relative
                .components()
                .any(|c| !matches!(c, Component::Normal(_)));
        if escapes {
            return Err(ScanTransferError::object_store(format!(
                "refusing path outside the local root: {}/{}",
                bucket, key
            )));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn copy_object(
        &self,
        source_bucket: &str,
        source_key: &str,
        target_bucket: &str,
        target_key: &str,
        _acl: CopyAcl,
    ) -> Result<()> {
        let source = self.object_path(source_bucket, source_key)?;
        let target = self.object_path(target_bucket, target_key)?;
        if source == target {
            // S3 rejects this with InvalidRequest; fs::copy would truncate the file.
            return Err(ScanTransferError::object_store(format!(
                "cannot copy {}/{} onto itself",
                source_bucket, source_key
            )));
        }

        if !tokio::fs::try_exists(&source).await? {
            return Err(ScanTransferError::ObjectNotFound {
                bucket: source_bucket.to_string(),
                key: source_key.to_string(),
            });
        }

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::copy(&source, &target).await?;
        tracing::debug!("Copied {} to {}", source.display(), target.display());
        Ok(())
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        let path = self.object_path(bucket, key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            // S3 DeleteObject succeeds on missing keys too.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StaticSecretStore {
    secrets: HashMap<String, String>,
}

impl StaticSecretStore {
    pub fn new(secrets: HashMap<String, String>) -> Self {
        Self { secrets }
    }
}

#[async_trait]
impl SecretStore for StaticSecretStore {
    async fn secret_string(&self, secret_id: &str) -> Result<String> {
        self.secrets
            .get(secret_id)
            .cloned()
            .ok_or_else(|| ScanTransferError::SecretNotFound {
                secret_id: secret_id.to_string(),
            })
    }
}

#[derive(Debug, Serialize)]
struct OutboxEntry<'a> {
    topic: &'a str,
    subject: &'a str,
    message: &'a str,
    published_at: String,
}

/// Appends notifications to a JSON-lines file, or just logs them.
#[derive(Debug, Clone, Default)]
pub struct OutboxNotifier {
    outbox: Option<PathBuf>,
}

impl OutboxNotifier {
    pub fn new(outbox: Option<PathBuf>) -> Self {
        Self { outbox }
    }
}

#[async_trait]
impl Notifier for OutboxNotifier {
    async fn publish(&self, topic: &str, subject: &str, message: &str) -> Result<()> {
        tracing::info!(topic, subject, "Publishing notification");

        let Some(outbox) = &self.outbox else {
            tracing::info!("{}", message);
            return Ok(());
        };

        let entry = OutboxEntry {
            topic,
            subject,
            message,
            published_at: Utc::now().to_rfc3339(),
        };
        let mut line = serde_json::to_string(&entry)?;
        line.push('\n');

        if let Some(parent) = outbox.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(outbox)
            .await
            .map_err(|e| ScanTransferError::notification(format!("{}: {}", outbox.display(), e)))?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}
