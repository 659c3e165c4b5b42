use crate::utils::error::{Result, ScanTransferError};
use crate::utils::validation::validate_s3_bucket_name;
use serde::Serialize;

pub const DEFAULT_SECRET_PREFIX: &str = "ingestion/sftp";

/// An ingestion object key split as `<supplier>/<relative path>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectPath {
    pub key: String,
    pub supplier: String,
    pub relative: String,
    pub file_name: String,
}

impl ObjectPath {
    pub fn parse(key: &str) -> Result<Self> {
        let invalid = |reason: &str| ScanTransferError::InvalidObjectKey {
            key: key.to_string(),
            reason: reason.to_string(),
        };

        let (supplier, relative) = key
            .split_once('/')
            .ok_or_else(|| invalid("key has no supplier prefix"))?;

        if supplier.is_empty() {
            return Err(invalid("supplier segment is empty"));
        }

        // Nested folders under the supplier are flattened to the file name.
        let file_name = relative.rsplit('/').next().unwrap_or(relative);
        if file_name.is_empty() {
            return Err(invalid("key does not name a file"));
        }

        Ok(Self {
            key: key.to_string(),
            supplier: supplier.to_string(),
            relative: relative.to_string(),
            file_name: file_name.to_string(),
        })
    }
}

/// Target bucket and optional key prefix, stored in a secret as `bucket[/prefix]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetLocation {
    pub bucket: String,
    pub prefix: Option<String>,
}

impl TargetLocation {
    pub fn parse(secret_id: &str, value: &str) -> Result<Self> {
        let value = value.trim();
        let (bucket, prefix) = match value.split_once('/') {
            Some((bucket, prefix)) => (bucket, Some(prefix.trim_end_matches('/'))),
            None => (value, None),
        };

        if validate_s3_bucket_name("target bucket", bucket).is_err() {
            return Err(ScanTransferError::InvalidTargetLocation {
                secret_id: secret_id.to_string(),
                value: value.to_string(),
            });
        }

        Ok(Self {
            bucket: bucket.to_string(),
            prefix: prefix.filter(|p| !p.is_empty()).map(str::to_string),
        })
    }
}

pub fn target_secret_id(prefix: &str, supplier: &str) -> String {
    format!("{}/{}/target-bucket", prefix.trim_end_matches('/'), supplier)
}

/// Key the clean object lands under in the target bucket.
///
/// With a prefix the supplier's folder layout is dropped and only the file
/// name is kept. Without one the original key is reused. Timestamped
/// suppliers get a `file_land_timestamp=<epoch>` partition in either case.
pub fn destination_key(
    path: &ObjectPath,
    target: &TargetLocation,
    landing_timestamp: Option<i64>,
) -> String {
    match (&target.prefix, landing_timestamp) {
        (Some(prefix), None) => format!("{}/{}", prefix, path.file_name),
        (Some(prefix), Some(ts)) => {
            format!("{}/file_land_timestamp={}/{}", prefix, ts, path.file_name)
        }
        (None, None) => path.key.clone(),
        (None, Some(ts)) => format!("file_land_timestamp={}/{}", ts, path.file_name),
    }
}

pub fn is_timestamped(supplier: &str, timestamped_suppliers: &[String]) -> bool {
    timestamped_suppliers.iter().any(|s| s == supplier)
}
