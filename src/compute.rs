//! Compute manager: EC2 instance lifecycle behind guardrails.
//!
//! | Operation | Guardrail |
//! |-----------|-----------|
//! | `create` | instance type allow-list (checked before any remote call), managed-instance quota |
//! | `list` | only instances tagged `CreatedBy=<creator>`, terminated ones hidden |
//! | `start` / `stop` | instance must be managed |
//! | `terminate` | instance must be managed and owned by the configured owner |

use crate::error::{Error, Result};
use crate::governance::{Governance, TAG_NAME};
use crate::provider::{
    ComputeApi, InstanceFilter, InstanceState, InstanceSummary, LaunchRequest, ParameterStore,
};
use std::sync::Arc;

/// Instance sizes users may launch.
pub const ALLOWED_INSTANCE_TYPES: [&str; 2] = ["t3.micro", "t3.small"];

/// Maximum number of managed instances that may exist at once.
pub const MAX_INSTANCES: usize = 2;

/// Public parameter holding the latest Amazon Linux 2 image id.
pub const IMAGE_PARAMETER: &str = "/aws/service/ami-amazon-linux-latest/amzn2-ami-hvm-x86_64-gp2";

pub const DEFAULT_INSTANCE_TYPE: &str = "t3.micro";
pub const DEFAULT_INSTANCE_NAME: &str = "my-server";

/// Check a requested size against the allow-list.
pub fn validate_instance_type(instance_type: &str) -> Result<()> {
    if ALLOWED_INSTANCE_TYPES.contains(&instance_type) {
        Ok(())
    } else {
        Err(Error::InstanceTypeNotAllowed {
            requested: instance_type.to_string(),
            allowed: ALLOWED_INSTANCE_TYPES.iter().map(|t| t.to_string()).collect(),
        })
    }
}

/// Result of a successful launch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Launched {
    pub instance_id: String,
    pub image_id: String,
}

pub struct ComputeManager {
    compute: Arc<dyn ComputeApi>,
    parameters: Arc<dyn ParameterStore>,
    governance: Governance,
}

impl ComputeManager {
    pub fn new(
        compute: Arc<dyn ComputeApi>,
        parameters: Arc<dyn ParameterStore>,
        governance: Governance,
    ) -> Self {
        Self {
            compute,
            parameters,
            governance,
        }
    }

    /// Resolve the newest base image id for the configured region.
    pub async fn resolve_image(&self) -> Result<String> {
        let image_id = self
            .parameters
            .get_parameter(IMAGE_PARAMETER)
            .await?
            .ok_or_else(|| Error::ImageNotFound(IMAGE_PARAMETER.to_string()))?;

        tracing::debug!(image_id = %image_id, "Resolved base image");
        Ok(image_id)
    }

    /// Launch one tagged instance.
    pub async fn create(
        &self,
        name: &str,
        key_name: &str,
        instance_type: &str,
    ) -> Result<Launched> {
        validate_instance_type(instance_type)?;

        let current = self.count_active().await?;
        if current >= MAX_INSTANCES {
            return Err(Error::QuotaExceeded {
                limit: MAX_INSTANCES,
                current,
            });
        }

        let image_id = self.resolve_image().await?;

        let mut tags = self.governance.mandatory_tags();
        tags.insert(TAG_NAME, name);

        let request = LaunchRequest {
            image_id: image_id.clone(),
            instance_type: instance_type.to_string(),
            key_name: key_name.to_string(),
            tags,
        };

        let instance_id = self.compute.run_instance(&request).await?;

        tracing::info!(
            instance_id = %instance_id,
            name,
            instance_type,
            "Instance is being created"
        );
        Ok(Launched {
            instance_id,
            image_id,
        })
    }

    /// Managed instances that are not terminated.
    pub async fn list(&self) -> Result<Vec<InstanceSummary>> {
        let filter = InstanceFilter::created_by(self.governance.created_by());
        let instances = self.compute.describe_instances(&filter).await?;

        Ok(instances
            .into_iter()
            .filter(|i| self.governance.is_managed(&i.tags) && !i.state.is_terminated())
            .collect())
    }

    pub async fn start(&self, instance_id: &str) -> Result<()> {
        self.managed_instance(instance_id).await?;
        self.compute.start_instance(instance_id).await
    }

    pub async fn stop(&self, instance_id: &str) -> Result<()> {
        self.managed_instance(instance_id).await?;
        self.compute.stop_instance(instance_id).await
    }

    /// Terminate permanently; refused unless the caller's identity owns the instance.
    pub async fn terminate(&self, instance_id: &str) -> Result<()> {
        let instance = self.managed_instance(instance_id).await?;
        self.governance.ensure_owned("instance", instance_id, &instance.tags)?;

        self.compute.terminate_instance(instance_id).await
    }

    /// Fetch an instance and verify it was created by this tool.
    pub async fn managed_instance(&self, instance_id: &str) -> Result<InstanceSummary> {
        let instance = self
            .compute
            .describe_instance(instance_id)
            .await?
            .ok_or_else(|| Error::InstanceNotFound(instance_id.to_string()))?;

        self.governance
            .ensure_managed("instance", instance_id, &instance.tags)?;
        Ok(instance)
    }

    async fn count_active(&self) -> Result<usize> {
        let filter = InstanceFilter::created_by(self.governance.created_by())
            .with_states(InstanceState::ACTIVE);
        let instances = self.compute.describe_instances(&filter).await?;

        Ok(instances.iter().filter(|i| filter.matches(i)).count())
    }

    pub fn governance(&self) -> &Governance {
        &self.governance
    }
}
