//! EC2 backend.

use super::sdk_error;
use crate::error::{Error, Result};
use crate::governance::ResourceTags;
use crate::provider::{ComputeApi, InstanceFilter, InstanceState, InstanceSummary, LaunchRequest};
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_ec2::error::ProvideErrorMetadata;
use aws_sdk_ec2::types::{Filter, Instance, InstanceType, ResourceType, Tag, TagSpecification};
use aws_sdk_ec2::Client;

const NOT_FOUND_CODE: &str = "InvalidInstanceID.NotFound";

pub struct Ec2Backend {
    client: Client,
}

impl Ec2Backend {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: Client::new(config),
        }
    }

    fn summarize(instance: &Instance) -> InstanceSummary {
        let tags = ResourceTags::from_pairs(
            instance
                .tags()
                .iter()
                .filter_map(|tag| Some((tag.key()?, tag.value()?))),
        );

        InstanceSummary {
            instance_id: instance.instance_id().unwrap_or_default().to_string(),
            name: tags.name().map(str::to_string),
            state: instance
                .state()
                .and_then(|s| s.name())
                .map(|n| InstanceState::parse(n.as_str()))
                .unwrap_or_else(|| InstanceState::Unknown("unknown".to_string())),
            instance_type: instance
                .instance_type()
                .map(|t| t.as_str().to_string())
                .unwrap_or_default(),
            public_ip: instance.public_ip_address().map(str::to_string),
            tags,
        }
    }
}

#[async_trait]
impl ComputeApi for Ec2Backend {
    async fn describe_instances(&self, filter: &InstanceFilter) -> Result<Vec<InstanceSummary>> {
        let mut request = self.client.describe_instances();

        if let Some(ref created_by) = filter.created_by {
            request = request.filters(
                Filter::builder()
                    .name("tag:CreatedBy")
                    .values(created_by)
                    .build(),
            );
        }

        if !filter.states.is_empty() {
            let mut states = Filter::builder().name("instance-state-name");
            for state in &filter.states {
                states = states.values(state.as_str());
            }
            request = request.filters(states.build());
        }

        let resp = request
            .send()
            .await
            .map_err(sdk_error("DescribeInstances"))?;

        Ok(resp
            .reservations()
            .iter()
            .flat_map(|r| r.instances())
            .map(Self::summarize)
            .collect())
    }

    async fn describe_instance(&self, instance_id: &str) -> Result<Option<InstanceSummary>> {
        let resp = match self
            .client
            .describe_instances()
            .instance_ids(instance_id)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(err) if err.code() == Some(NOT_FOUND_CODE) => return Ok(None),
            Err(err) => return Err(sdk_error("DescribeInstances")(err)),
        };

        Ok(resp
            .reservations()
            .iter()
            .flat_map(|r| r.instances())
            .find(|i| i.instance_id() == Some(instance_id))
            .map(Self::summarize))
    }

    async fn run_instance(&self, request: &LaunchRequest) -> Result<String> {
        let tags: Vec<Tag> = request
            .tags
            .iter()
            .map(|(key, value)| Tag::builder().key(key).value(value).build())
            .collect();

        let resp = self
            .client
            .run_instances()
            .image_id(&request.image_id)
            .instance_type(InstanceType::from(request.instance_type.as_str()))
            .key_name(&request.key_name)
            .min_count(1)
            .max_count(1)
            .tag_specifications(
                TagSpecification::builder()
                    .resource_type(ResourceType::Instance)
                    .set_tags(Some(tags))
                    .build(),
            )
            .send()
            .await
            .map_err(sdk_error("RunInstances"))?;

        let instance_id = resp
            .instances()
            .first()
            .and_then(|i| i.instance_id())
            .map(str::to_string)
            .ok_or_else(|| Error::provider("RunInstances", "response contained no instance"))?;

        tracing::info!(
            instance_id = %instance_id,
            image_id = %request.image_id,
            instance_type = %request.instance_type,
            "Launched EC2 instance"
        );
        Ok(instance_id)
    }

    async fn start_instance(&self, instance_id: &str) -> Result<()> {
        self.client
            .start_instances()
            .instance_ids(instance_id)
            .send()
            .await
            .map_err(sdk_error("StartInstances"))?;

        tracing::info!(instance_id, "Started instance");
        Ok(())
    }

    async fn stop_instance(&self, instance_id: &str) -> Result<()> {
        self.client
            .stop_instances()
            .instance_ids(instance_id)
            .send()
            .await
            .map_err(sdk_error("StopInstances"))?;

        tracing::info!(instance_id, "Stopped instance");
        Ok(())
    }

    async fn terminate_instance(&self, instance_id: &str) -> Result<()> {
        self.client
            .terminate_instances()
            .instance_ids(instance_id)
            .send()
            .await
            .map_err(sdk_error("TerminateInstances"))?;

        tracing::info!(instance_id, "Terminated instance");
        Ok(())
    }
}
