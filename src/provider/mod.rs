//! Provider seam.
//!
//! Each remote service the managers talk to is described by an async trait.
//! The AWS SDK implementations live in [`aws`]; tests substitute in-memory
//! fakes. Managers hold `Arc<dyn ...>` handles bundled in [`CloudClients`].

pub mod aws;
mod types;

use crate::error::Result;
use crate::governance::ResourceTags;
use async_trait::async_trait;
use std::sync::Arc;

pub use types::{
    bare_zone_id, BucketSummary, CallerIdentity, ChangeAction, HostedZone, InstanceFilter,
    InstanceState, InstanceSummary, LaunchRequest, ObjectBody, RecordChange, RecordSet,
};

/// Virtual machine API (EC2)
#[async_trait]
pub trait ComputeApi: Send + Sync {
    /// List instances matching the filter
    async fn describe_instances(&self, filter: &InstanceFilter) -> Result<Vec<InstanceSummary>>;

    /// Fetch a single instance, `None` when it does not exist
    async fn describe_instance(&self, instance_id: &str) -> Result<Option<InstanceSummary>>;

    /// Launch exactly one instance and return its id
    async fn run_instance(&self, request: &LaunchRequest) -> Result<String>;

    async fn start_instance(&self, instance_id: &str) -> Result<()>;

    async fn stop_instance(&self, instance_id: &str) -> Result<()>;

    async fn terminate_instance(&self, instance_id: &str) -> Result<()>;
}

/// Parameter lookup (SSM Parameter Store)
#[async_trait]
pub trait ParameterStore: Send + Sync {
    /// Value of the named parameter, `None` when it has no value
    async fn get_parameter(&self, name: &str) -> Result<Option<String>>;
}

/// DNS API (Route53)
#[async_trait]
pub trait DnsApi: Send + Sync {
    async fn create_hosted_zone(
        &self,
        name: &str,
        caller_reference: &str,
        comment: &str,
    ) -> Result<HostedZone>;

    async fn list_hosted_zones(&self) -> Result<Vec<HostedZone>>;

    /// Fetch a zone by bare id, `None` when it does not exist
    async fn get_hosted_zone(&self, zone_id: &str) -> Result<Option<HostedZone>>;

    async fn list_zone_tags(&self, zone_id: &str) -> Result<ResourceTags>;

    async fn add_zone_tags(&self, zone_id: &str, tags: &ResourceTags) -> Result<()>;

    /// Apply one change to the zone's record sets
    async fn change_record(&self, zone_id: &str, change: &RecordChange) -> Result<()>;

    async fn list_records(&self, zone_id: &str) -> Result<Vec<RecordSet>>;
}

/// Object storage API (S3)
#[async_trait]
pub trait ObjectStoreApi: Send + Sync {
    /// Create a bucket in the given region
    async fn create_bucket(&self, name: &str, region: &str) -> Result<()>;

    async fn put_bucket_tags(&self, name: &str, tags: &ResourceTags) -> Result<()>;

    /// Bucket tags, `None` when the bucket has no tag set
    async fn get_bucket_tags(&self, name: &str) -> Result<Option<ResourceTags>>;

    /// Put a public access block with every flag enabled
    async fn block_public_access(&self, name: &str) -> Result<()>;

    /// Remove the bucket's public access block
    async fn allow_public_access(&self, name: &str) -> Result<()>;

    async fn list_buckets(&self) -> Result<Vec<BucketSummary>>;

    async fn put_object(&self, bucket: &str, key: &str, body: ObjectBody) -> Result<()>;
}

/// Caller identity (STS)
#[async_trait]
pub trait IdentityApi: Send + Sync {
    async fn caller_identity(&self) -> Result<CallerIdentity>;
}

/// Handles to every provider service.
#[derive(Clone)]
pub struct CloudClients {
    pub compute: Arc<dyn ComputeApi>,
    pub parameters: Arc<dyn ParameterStore>,
    pub dns: Arc<dyn DnsApi>,
    pub storage: Arc<dyn ObjectStoreApi>,
    pub identity: Arc<dyn IdentityApi>,
}
