use crate::utils::error::Result;
use async_trait::async_trait;

/// Canned ACL applied to a copied object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyAcl {
    /// Keep whatever the target bucket defaults to.
    Inherit,
    BucketOwnerFullControl,
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn copy_object(
        &self,
        source_bucket: &str,
        source_key: &str,
        target_bucket: &str,
        target_key: &str,
        acl: CopyAcl,
    ) -> Result<()>;

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()>;
}

#[async_trait]
pub trait SecretStore: Send + Sync {
    async fn secret_string(&self, secret_id: &str) -> Result<String>;
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn publish(&self, topic: &str, subject: &str, message: &str) -> Result<()>;
}
