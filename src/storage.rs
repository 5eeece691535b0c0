//! Storage manager: S3 buckets and uploads.

use crate::error::{Error, Result};
use crate::governance::Governance;
use crate::provider::{BucketSummary, ObjectBody, ObjectStoreApi};
use std::path::Path;
use std::sync::Arc;

/// Access policy applied right after a bucket is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketAccess {
    /// Full public access block (default)
    Private,
    /// Public access block removed
    Public,
}

impl BucketAccess {
    pub fn from_public_flag(public: bool) -> Self {
        if public {
            BucketAccess::Public
        } else {
            BucketAccess::Private
        }
    }
}

/// Object key for an uploaded file: its base name.
pub fn object_key(path: &Path) -> Option<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
}

pub struct StorageManager {
    storage: Arc<dyn ObjectStoreApi>,
    governance: Governance,
    region: String,
}

impl StorageManager {
    pub fn new(
        storage: Arc<dyn ObjectStoreApi>,
        governance: Governance,
        region: impl Into<String>,
    ) -> Self {
        Self {
            storage,
            governance,
            region: region.into(),
        }
    }

    /// Create a tagged bucket. Returns the (lower-cased) bucket name.
    pub async fn create_bucket(&self, name: &str, access: BucketAccess) -> Result<String> {
        let name = name.trim().to_lowercase();

        self.storage.create_bucket(&name, &self.region).await?;
        self.storage
            .put_bucket_tags(&name, &self.governance.mandatory_tags())
            .await?;

        match access {
            BucketAccess::Private => self.storage.block_public_access(&name).await?,
            BucketAccess::Public => self.storage.allow_public_access(&name).await?,
        }

        tracing::info!(bucket = %name, ?access, "Bucket ready");
        Ok(name)
    }

    /// Buckets carrying this tool's creator tag.
    pub async fn list_buckets(&self) -> Result<Vec<BucketSummary>> {
        let buckets = self.storage.list_buckets().await?;
        let mut managed = Vec::new();

        for bucket in buckets {
            match self.storage.get_bucket_tags(&bucket.name).await {
                Ok(Some(tags)) if self.governance.is_managed(&tags) => managed.push(bucket),
                Ok(_) => {}
                Err(e) => {
                    tracing::debug!(
                        bucket = %bucket.name,
                        error = %e,
                        "Skipping bucket with unreadable tags"
                    );
                }
            }
        }

        Ok(managed)
    }

    /// Stream a local file into a managed bucket under its base name.
    pub async fn upload_file(&self, bucket: &str, path: &Path) -> Result<String> {
        if !path.is_file() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }
        let key = object_key(path).ok_or_else(|| Error::FileNotFound(path.to_path_buf()))?;

        self.upload(bucket, &key, ObjectBody::File(path.to_path_buf()))
            .await?;
        Ok(key)
    }

    /// Upload a body into a managed bucket under the given key.
    pub async fn upload(&self, bucket: &str, key: &str, body: ObjectBody) -> Result<()> {
        self.ensure_managed(bucket).await?;
        self.storage.put_object(bucket, key, body).await
    }

    async fn ensure_managed(&self, bucket: &str) -> Result<()> {
        let tags = self.storage.get_bucket_tags(bucket).await?.unwrap_or_default();
        self.governance.ensure_managed("bucket", bucket, &tags)
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn governance(&self) -> &Governance {
        &self.governance
    }
}
