//! S3 backend.

use super::sdk_error;
use crate::error::{Error, Result};
use crate::governance::ResourceTags;
use crate::provider::{BucketSummary, ObjectBody, ObjectStoreApi};
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_s3::error::ProvideErrorMetadata;
use aws_sdk_s3::primitives::{ByteStream, DateTimeFormat};
use aws_sdk_s3::types::{
    BucketLocationConstraint, CreateBucketConfiguration, PublicAccessBlockConfiguration, Tag,
    Tagging,
};
use aws_sdk_s3::Client;

/// Region where S3 rejects an explicit location constraint.
const DEFAULT_LOCATION: &str = "us-east-1";

pub struct S3Backend {
    client: Client,
}

impl S3Backend {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: Client::new(config),
        }
    }
}

#[async_trait]
impl ObjectStoreApi for S3Backend {
    async fn create_bucket(&self, name: &str, region: &str) -> Result<()> {
        let mut request = self.client.create_bucket().bucket(name);

        if region != DEFAULT_LOCATION {
            request = request.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::from(region))
                    .build(),
            );
        }

        request.send().await.map_err(sdk_error("CreateBucket"))?;

        tracing::info!(bucket = name, region, "Created bucket");
        Ok(())
    }

    async fn put_bucket_tags(&self, name: &str, tags: &ResourceTags) -> Result<()> {
        let build_error =
            |e: aws_sdk_s3::error::BuildError| Error::provider("PutBucketTagging", e.to_string());

        let tag_set = tags
            .iter()
            .map(|(key, value)| Tag::builder().key(key).value(value).build())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(build_error)?;

        let tagging = Tagging::builder()
            .set_tag_set(Some(tag_set))
            .build()
            .map_err(build_error)?;

        self.client
            .put_bucket_tagging()
            .bucket(name)
            .tagging(tagging)
            .send()
            .await
            .map_err(sdk_error("PutBucketTagging"))?;

        Ok(())
    }

    async fn get_bucket_tags(&self, name: &str) -> Result<Option<ResourceTags>> {
        match self.client.get_bucket_tagging().bucket(name).send().await {
            Ok(resp) => Ok(Some(ResourceTags::from_pairs(
                resp.tag_set().iter().map(|tag| (tag.key(), tag.value())),
            ))),
            Err(err) if err.code() == Some("NoSuchTagSet") => Ok(None),
            Err(err) => Err(sdk_error("GetBucketTagging")(err)),
        }
    }

    async fn block_public_access(&self, name: &str) -> Result<()> {
        self.client
            .put_public_access_block()
            .bucket(name)
            .public_access_block_configuration(
                PublicAccessBlockConfiguration::builder()
                    .block_public_acls(true)
                    .ignore_public_acls(true)
                    .block_public_policy(true)
                    .restrict_public_buckets(true)
                    .build(),
            )
            .send()
            .await
            .map_err(sdk_error("PutPublicAccessBlock"))?;

        Ok(())
    }

    async fn allow_public_access(&self, name: &str) -> Result<()> {
        self.client
            .delete_public_access_block()
            .bucket(name)
            .send()
            .await
            .map_err(sdk_error("DeletePublicAccessBlock"))?;

        tracing::warn!(bucket = name, "Removed public access block");
        Ok(())
    }

    async fn list_buckets(&self) -> Result<Vec<BucketSummary>> {
        let resp = self
            .client
            .list_buckets()
            .send()
            .await
            .map_err(sdk_error("ListBuckets"))?;

        Ok(resp
            .buckets()
            .iter()
            .filter_map(|bucket| {
                Some(BucketSummary {
                    name: bucket.name()?.to_string(),
                    created_at: bucket
                        .creation_date()
                        .and_then(|d| d.fmt(DateTimeFormat::DateTime).ok()),
                })
            })
            .collect())
    }

    async fn put_object(&self, bucket: &str, key: &str, body: ObjectBody) -> Result<()> {
        let stream = match body {
            ObjectBody::File(path) => ByteStream::from_path(&path)
                .await
                .map_err(|e| Error::provider("PutObject", e.to_string()))?,
            ObjectBody::Bytes(bytes) => ByteStream::from(bytes),
        };

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(stream)
            .send()
            .await
            .map_err(sdk_error("PutObject"))?;

        tracing::info!(bucket, key, "Uploaded object");
        Ok(())
    }
}
