//! Shared test utilities for the platform-cli test suite.
//!
//! This module provides:
//! - `FakeCloud`, an in-memory implementation of every provider trait
//! - A call log for asserting which remote operations ran
//! - Seeding helpers for resources created outside the tool
//! - `platform()` builders wiring the fake into the managers
//!
//! # Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::*;
//! ```

#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use platform_cli::config::Config;
use platform_cli::error::{Error, Result};
use platform_cli::governance::{ResourceTags, TAG_NAME};
use platform_cli::platform::Platform;
use platform_cli::provider::{
    BucketSummary, CallerIdentity, ChangeAction, CloudClients, ComputeApi, DnsApi, HostedZone,
    IdentityApi, InstanceFilter, InstanceState, InstanceSummary, LaunchRequest, ObjectBody,
    ObjectStoreApi, ParameterStore, RecordChange, RecordSet,
};

/// Image id the fake parameter store resolves to.
pub const FAKE_IMAGE_ID: &str = "ami-0fake1234567890";
/// Account the fake identity reports.
pub const FAKE_ACCOUNT: &str = "123456789012";

// ============================================================================
// Fake Cloud
// ============================================================================

#[derive(Debug, Clone)]
pub struct FakeZone {
    pub zone: HostedZone,
    pub tags: ResourceTags,
    pub records: Vec<RecordSet>,
}

#[derive(Debug, Clone)]
pub struct FakeBucket {
    pub name: String,
    pub region: String,
    pub tags: Option<ResourceTags>,
    /// `Some(true)` once opened up, `Some(false)` once blocked
    pub public: Option<bool>,
    /// Uploaded `(key, size)` pairs
    pub objects: Vec<(String, u64)>,
}

/// In-memory AWS account.
#[derive(Debug)]
pub struct FakeCloud {
    pub instances: RwLock<Vec<InstanceSummary>>,
    pub zones: RwLock<Vec<FakeZone>>,
    pub buckets: RwLock<Vec<FakeBucket>>,
    pub image_id: RwLock<Option<String>>,
    calls: RwLock<Vec<String>>,
    next_id: AtomicU32,
}

impl Default for FakeCloud {
    fn default() -> Self {
        Self {
            instances: RwLock::new(Vec::new()),
            zones: RwLock::new(Vec::new()),
            buckets: RwLock::new(Vec::new()),
            image_id: RwLock::new(Some(FAKE_IMAGE_ID.to_string())),
            calls: RwLock::new(Vec::new()),
            next_id: AtomicU32::new(1),
        }
    }
}

impl FakeCloud {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Every remote operation, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.read().len()
    }

    pub fn count_calls(&self, operation: &str) -> usize {
        self.calls.read().iter().filter(|c| *c == operation).count()
    }

    fn record(&self, operation: &str) {
        self.calls.write().push(operation.to_string());
    }

    fn next_id(&self) -> u32 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    // ------------------------------------------------------------------------
    // Seeding
    // ------------------------------------------------------------------------

    pub fn seed_instance(&self, instance_id: &str, state: InstanceState, tags: ResourceTags) {
        self.instances.write().push(InstanceSummary {
            instance_id: instance_id.to_string(),
            name: tags.name().map(str::to_string),
            state,
            instance_type: "t3.micro".to_string(),
            public_ip: None,
            tags,
        });
    }

    pub fn seed_zone(&self, zone_id: &str, name: &str, tags: ResourceTags) {
        self.zones.write().push(FakeZone {
            zone: HostedZone {
                id: zone_id.to_string(),
                name: format!("{}.", name.trim_end_matches('.')),
                record_count: 2,
            },
            tags,
            records: Vec::new(),
        });
    }

    pub fn seed_record(&self, zone_id: &str, name: &str, ttl: i64, values: &[&str]) {
        let mut zones = self.zones.write();
        if let Some(zone) = zones.iter_mut().find(|z| z.zone.id == zone_id) {
            zone.records.push(RecordSet {
                name: name.to_string(),
                record_type: "A".to_string(),
                ttl,
                values: values.iter().map(|v| v.to_string()).collect(),
            });
        }
    }

    pub fn seed_bucket(&self, name: &str, tags: Option<ResourceTags>) {
        self.buckets.write().push(FakeBucket {
            name: name.to_string(),
            region: "us-east-1".to_string(),
            tags,
            public: None,
            objects: Vec::new(),
        });
    }

    // ------------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------------

    pub fn instance(&self, instance_id: &str) -> Option<InstanceSummary> {
        self.instances
            .read()
            .iter()
            .find(|i| i.instance_id == instance_id)
            .cloned()
    }

    pub fn zone(&self, zone_id: &str) -> Option<FakeZone> {
        self.zones.read().iter().find(|z| z.zone.id == zone_id).cloned()
    }

    pub fn bucket(&self, name: &str) -> Option<FakeBucket> {
        self.buckets.read().iter().find(|b| b.name == name).cloned()
    }

    fn set_state(
        &self,
        operation: &'static str,
        instance_id: &str,
        state: InstanceState,
    ) -> Result<()> {
        let mut instances = self.instances.write();
        let instance = instances
            .iter_mut()
            .find(|i| i.instance_id == instance_id)
            .ok_or_else(|| Error::provider(operation, "InvalidInstanceID.NotFound"))?;
        instance.state = state;
        Ok(())
    }
}

#[async_trait]
impl ComputeApi for FakeCloud {
    async fn describe_instances(&self, filter: &InstanceFilter) -> Result<Vec<InstanceSummary>> {
        self.record("DescribeInstances");
        Ok(self
            .instances
            .read()
            .iter()
            .filter(|i| filter.matches(i))
            .cloned()
            .collect())
    }

    async fn describe_instance(&self, instance_id: &str) -> Result<Option<InstanceSummary>> {
        self.record("DescribeInstance");
        Ok(self.instance(instance_id))
    }

    async fn run_instance(&self, request: &LaunchRequest) -> Result<String> {
        self.record("RunInstances");
        let instance_id = format!("i-{:017x}", self.next_id());
        self.instances.write().push(InstanceSummary {
            instance_id: instance_id.clone(),
            name: request.tags.get(TAG_NAME).map(str::to_string),
            state: InstanceState::Pending,
            instance_type: request.instance_type.clone(),
            public_ip: None,
            tags: request.tags.clone(),
        });
        Ok(instance_id)
    }

    async fn start_instance(&self, instance_id: &str) -> Result<()> {
        self.record("StartInstances");
        self.set_state("StartInstances", instance_id, InstanceState::Running)
    }

    async fn stop_instance(&self, instance_id: &str) -> Result<()> {
        self.record("StopInstances");
        self.set_state("StopInstances", instance_id, InstanceState::Stopped)
    }

    async fn terminate_instance(&self, instance_id: &str) -> Result<()> {
        self.record("TerminateInstances");
        self.set_state("TerminateInstances", instance_id, InstanceState::Terminated)
    }
}

#[async_trait]
impl ParameterStore for FakeCloud {
    async fn get_parameter(&self, _name: &str) -> Result<Option<String>> {
        self.record("GetParameter");
        Ok(self.image_id.read().clone())
    }
}

#[async_trait]
impl DnsApi for FakeCloud {
    async fn create_hosted_zone(
        &self,
        name: &str,
        _caller_reference: &str,
        _comment: &str,
    ) -> Result<HostedZone> {
        self.record("CreateHostedZone");
        let zone = HostedZone {
            id: format!("Z{:08}", self.next_id()),
            name: format!("{}.", name.trim_end_matches('.')),
            record_count: 2,
        };
        self.zones.write().push(FakeZone {
            zone: zone.clone(),
            tags: ResourceTags::new(),
            records: Vec::new(),
        });
        Ok(zone)
    }

    async fn list_hosted_zones(&self) -> Result<Vec<HostedZone>> {
        self.record("ListHostedZones");
        Ok(self.zones.read().iter().map(|z| z.zone.clone()).collect())
    }

    async fn get_hosted_zone(&self, zone_id: &str) -> Result<Option<HostedZone>> {
        self.record("GetHostedZone");
        Ok(self.zone(zone_id).map(|z| z.zone))
    }

    async fn list_zone_tags(&self, zone_id: &str) -> Result<ResourceTags> {
        self.record("ListTagsForResource");
        self.zone(zone_id)
            .map(|z| z.tags)
            .ok_or_else(|| Error::provider("ListTagsForResource", "NoSuchHostedZone"))
    }

    async fn add_zone_tags(&self, zone_id: &str, tags: &ResourceTags) -> Result<()> {
        self.record("ChangeTagsForResource");
        let mut zones = self.zones.write();
        let zone = zones
            .iter_mut()
            .find(|z| z.zone.id == zone_id)
            .ok_or_else(|| Error::provider("ChangeTagsForResource", "NoSuchHostedZone"))?;
        for (key, value) in tags.iter() {
            zone.tags.insert(key, value);
        }
        Ok(())
    }

    async fn change_record(&self, zone_id: &str, change: &RecordChange) -> Result<()> {
        self.record("ChangeResourceRecordSets");
        let mut zones = self.zones.write();
        let zone = zones
            .iter_mut()
            .find(|z| z.zone.id == zone_id)
            .ok_or_else(|| Error::provider("ChangeResourceRecordSets", "NoSuchHostedZone"))?;

        let same_set = |r: &RecordSet| {
            r.name == change.record.name && r.record_type == change.record.record_type
        };

        match change.action {
            ChangeAction::Upsert => {
                zone.records.retain(|r| !same_set(r));
                zone.records.push(change.record.clone());
            }
            ChangeAction::Delete => {
                let before = zone.records.len();
                zone.records.retain(|r| r != &change.record);
                if zone.records.len() == before {
                    return Err(Error::provider(
                        "ChangeResourceRecordSets",
                        "InvalidChangeBatch: record set not found",
                    ));
                }
            }
        }
        Ok(())
    }

    async fn list_records(&self, zone_id: &str) -> Result<Vec<RecordSet>> {
        self.record("ListResourceRecordSets");
        let zone = self
            .zone(zone_id)
            .ok_or_else(|| Error::provider("ListResourceRecordSets", "NoSuchHostedZone"))?;

        let mut records = vec![RecordSet {
            name: zone.zone.name.clone(),
            record_type: "NS".to_string(),
            ttl: 172800,
            values: vec!["ns-1.awsdns-00.com.".to_string()],
        }];
        records.extend(zone.records);
        Ok(records)
    }
}

#[async_trait]
impl ObjectStoreApi for FakeCloud {
    async fn create_bucket(&self, name: &str, region: &str) -> Result<()> {
        self.record("CreateBucket");
        if self.bucket(name).is_some() {
            return Err(Error::provider("CreateBucket", "BucketAlreadyOwnedByYou"));
        }
        self.buckets.write().push(FakeBucket {
            name: name.to_string(),
            region: region.to_string(),
            tags: None,
            public: None,
            objects: Vec::new(),
        });
        Ok(())
    }

    async fn put_bucket_tags(&self, name: &str, tags: &ResourceTags) -> Result<()> {
        self.record("PutBucketTagging");
        self.with_bucket("PutBucketTagging", name, |b| b.tags = Some(tags.clone()))
    }

    async fn get_bucket_tags(&self, name: &str) -> Result<Option<ResourceTags>> {
        self.record("GetBucketTagging");
        self.bucket(name)
            .map(|b| b.tags)
            .ok_or_else(|| Error::provider("GetBucketTagging", "NoSuchBucket"))
    }

    async fn block_public_access(&self, name: &str) -> Result<()> {
        self.record("PutPublicAccessBlock");
        self.with_bucket("PutPublicAccessBlock", name, |b| b.public = Some(false))
    }

    async fn allow_public_access(&self, name: &str) -> Result<()> {
        self.record("DeletePublicAccessBlock");
        self.with_bucket("DeletePublicAccessBlock", name, |b| b.public = Some(true))
    }

    async fn list_buckets(&self) -> Result<Vec<BucketSummary>> {
        self.record("ListBuckets");
        Ok(self
            .buckets
            .read()
            .iter()
            .map(|b| BucketSummary {
                name: b.name.clone(),
                created_at: Some("2024-01-01T00:00:00Z".to_string()),
            })
            .collect())
    }

    async fn put_object(&self, bucket: &str, key: &str, body: ObjectBody) -> Result<()> {
        self.record("PutObject");
        let size = body.len_hint().unwrap_or_default();
        self.with_bucket("PutObject", bucket, |b| b.objects.push((key.to_string(), size)))
    }
}

impl FakeCloud {
    fn with_bucket<F>(&self, operation: &'static str, name: &str, f: F) -> Result<()>
    where
        F: FnOnce(&mut FakeBucket),
    {
        let mut buckets = self.buckets.write();
        let bucket = buckets
            .iter_mut()
            .find(|b| b.name == name)
            .ok_or_else(|| Error::provider(operation, "NoSuchBucket"))?;
        f(bucket);
        Ok(())
    }
}

#[async_trait]
impl IdentityApi for FakeCloud {
    async fn caller_identity(&self) -> Result<CallerIdentity> {
        self.record("GetCallerIdentity");
        Ok(CallerIdentity {
            account: FAKE_ACCOUNT.to_string(),
            arn: format!("arn:aws:iam::{}:user/student", FAKE_ACCOUNT),
        })
    }
}

// ============================================================================
// Builders
// ============================================================================

/// Provider handles that all point at the same fake.
pub fn clients(cloud: &Arc<FakeCloud>) -> CloudClients {
    CloudClients {
        compute: cloud.clone(),
        parameters: cloud.clone(),
        dns: cloud.clone(),
        storage: cloud.clone(),
        identity: cloud.clone(),
    }
}

/// Managers over the fake with default configuration
/// (`CreatedBy=platform-cli`, `Owner=student`).
pub fn platform(cloud: &Arc<FakeCloud>) -> Platform {
    platform_with(cloud, &Config::default())
}

pub fn platform_with(cloud: &Arc<FakeCloud>, config: &Config) -> Platform {
    Platform::from_clients(config, clients(cloud))
}

/// Tags this tool attaches under the default configuration.
pub fn managed_tags() -> ResourceTags {
    ResourceTags::from_pairs([("CreatedBy", "platform-cli"), ("Owner", "student")])
}

/// Tags of something created by another tool.
pub fn foreign_tags() -> ResourceTags {
    ResourceTags::from_pairs([("CreatedBy", "terraform"), ("Owner", "ops")])
}
