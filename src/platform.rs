//! The set of managers a process works with.

use crate::compute::ComputeManager;
use crate::config::Config;
use crate::dns::DnsManager;
use crate::error::Result;
use crate::governance::Governance;
use crate::provider::{aws, CallerIdentity, CloudClients, IdentityApi};
use crate::storage::StorageManager;
use std::sync::Arc;

/// Managers sharing one configuration and one set of provider handles.
pub struct Platform {
    pub compute: ComputeManager,
    pub dns: DnsManager,
    pub storage: StorageManager,
    identity: Arc<dyn IdentityApi>,
    governance: Governance,
    region: String,
}

impl Platform {
    /// Build managers on top of the AWS SDK clients.
    pub async fn connect(config: &Config) -> Self {
        let clients = aws::connect(&config.aws).await;
        Self::from_clients(config, clients)
    }

    /// Build managers on top of arbitrary provider handles.
    pub fn from_clients(config: &Config, clients: CloudClients) -> Self {
        let governance = Governance::from_config(&config.tags);

        Self {
            compute: ComputeManager::new(clients.compute, clients.parameters, governance.clone()),
            dns: DnsManager::new(clients.dns, governance.clone())
                .with_parent_domain(config.dns.domain.clone()),
            storage: StorageManager::new(
                clients.storage,
                governance.clone(),
                config.aws.region.clone(),
            ),
            identity: clients.identity,
            governance,
            region: config.aws.region.clone(),
        }
    }

    /// Account and ARN of the configured credentials.
    pub async fn caller_identity(&self) -> Result<CallerIdentity> {
        self.identity.caller_identity().await
    }

    pub fn governance(&self) -> &Governance {
        &self.governance
    }

    pub fn region(&self) -> &str {
        &self.region
    }
}
