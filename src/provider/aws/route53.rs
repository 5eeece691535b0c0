//! Route53 backend.

use super::sdk_error;
use crate::error::{Error, Result};
use crate::governance::ResourceTags;
use crate::provider::{bare_zone_id, ChangeAction, DnsApi, HostedZone, RecordChange, RecordSet};
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_route53::types::{
    Change, ChangeAction as SdkChangeAction, ChangeBatch, HostedZone as SdkHostedZone,
    HostedZoneConfig, ResourceRecord, ResourceRecordSet, ResourceTagSet, RrType, Tag,
    TagResourceType,
};
use aws_sdk_route53::Client;

pub struct Route53Backend {
    client: Client,
}

impl Route53Backend {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: Client::new(config),
        }
    }

    fn zone(zone: &SdkHostedZone) -> HostedZone {
        HostedZone {
            id: bare_zone_id(zone.id()).to_string(),
            name: zone.name().to_string(),
            record_count: zone.resource_record_set_count().unwrap_or_default(),
        }
    }

    fn record_set(change: &RecordChange) -> Result<ResourceRecordSet> {
        let build_error = |e: aws_sdk_route53::error::BuildError| {
            Error::provider("ChangeResourceRecordSets", e.to_string())
        };

        let records = change
            .record
            .values
            .iter()
            .map(|value| ResourceRecord::builder().value(value).build())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(build_error)?;

        ResourceRecordSet::builder()
            .name(&change.record.name)
            .r#type(RrType::from(change.record.record_type.as_str()))
            .ttl(change.record.ttl)
            .set_resource_records(Some(records))
            .build()
            .map_err(build_error)
    }
}

#[async_trait]
impl DnsApi for Route53Backend {
    async fn create_hosted_zone(
        &self,
        name: &str,
        caller_reference: &str,
        comment: &str,
    ) -> Result<HostedZone> {
        let resp = self
            .client
            .create_hosted_zone()
            .name(name)
            .caller_reference(caller_reference)
            .hosted_zone_config(
                HostedZoneConfig::builder()
                    .comment(comment)
                    .private_zone(false)
                    .build(),
            )
            .send()
            .await
            .map_err(sdk_error("CreateHostedZone"))?;

        let zone: Option<SdkHostedZone> = resp.hosted_zone.into();
        zone.as_ref()
            .map(Self::zone)
            .ok_or_else(|| Error::provider("CreateHostedZone", "zone created but no id returned"))
    }

    async fn list_hosted_zones(&self) -> Result<Vec<HostedZone>> {
        let resp = self
            .client
            .list_hosted_zones()
            .send()
            .await
            .map_err(sdk_error("ListHostedZones"))?;

        Ok(resp.hosted_zones().iter().map(Self::zone).collect())
    }

    async fn get_hosted_zone(&self, zone_id: &str) -> Result<Option<HostedZone>> {
        match self.client.get_hosted_zone().id(zone_id).send().await {
            Ok(resp) => {
                let zone: Option<SdkHostedZone> = resp.hosted_zone.into();
                Ok(zone.as_ref().map(Self::zone))
            }
            Err(err)
                if err
                    .as_service_error()
                    .map(|e| e.is_no_such_hosted_zone())
                    .unwrap_or(false) =>
            {
                Ok(None)
            }
            Err(err) => Err(sdk_error("GetHostedZone")(err)),
        }
    }

    async fn list_zone_tags(&self, zone_id: &str) -> Result<ResourceTags> {
        let resp = self
            .client
            .list_tags_for_resource()
            .resource_type(TagResourceType::Hostedzone)
            .resource_id(zone_id)
            .send()
            .await
            .map_err(sdk_error("ListTagsForResource"))?;

        let tag_set: Option<ResourceTagSet> = resp.resource_tag_set.into();
        Ok(ResourceTags::from_pairs(
            tag_set
                .as_ref()
                .map(|set| set.tags())
                .unwrap_or_default()
                .iter()
                .filter_map(|tag| Some((tag.key()?, tag.value()?))),
        ))
    }

    async fn add_zone_tags(&self, zone_id: &str, tags: &ResourceTags) -> Result<()> {
        let mut request = self
            .client
            .change_tags_for_resource()
            .resource_type(TagResourceType::Hostedzone)
            .resource_id(zone_id);

        for (key, value) in tags.iter() {
            request = request.add_tags(Tag::builder().key(key).value(value).build());
        }

        request
            .send()
            .await
            .map_err(sdk_error("ChangeTagsForResource"))?;

        tracing::debug!(zone_id, "Tagged hosted zone");
        Ok(())
    }

    async fn change_record(&self, zone_id: &str, change: &RecordChange) -> Result<()> {
        let action = match change.action {
            ChangeAction::Upsert => SdkChangeAction::Upsert,
            ChangeAction::Delete => SdkChangeAction::Delete,
        };

        let batch = Change::builder()
            .action(action)
            .resource_record_set(Self::record_set(change)?)
            .build()
            .and_then(|change| ChangeBatch::builder().changes(change).build())
            .map_err(|e| Error::provider("ChangeResourceRecordSets", e.to_string()))?;

        self.client
            .change_resource_record_sets()
            .hosted_zone_id(zone_id)
            .change_batch(batch)
            .send()
            .await
            .map_err(sdk_error("ChangeResourceRecordSets"))?;

        tracing::info!(
            zone_id,
            action = change.action.as_str(),
            name = %change.record.name,
            "Changed record set"
        );
        Ok(())
    }

    async fn list_records(&self, zone_id: &str) -> Result<Vec<RecordSet>> {
        let resp = self
            .client
            .list_resource_record_sets()
            .hosted_zone_id(zone_id)
            .send()
            .await
            .map_err(sdk_error("ListResourceRecordSets"))?;

        Ok(resp
            .resource_record_sets()
            .iter()
            .map(|set| RecordSet {
                name: set.name().to_string(),
                record_type: set.r#type().as_str().to_string(),
                ttl: set.ttl().unwrap_or_default(),
                values: set
                    .resource_records()
                    .iter()
                    .map(|r| r.value().to_string())
                    .collect(),
            })
            .collect())
    }
}
