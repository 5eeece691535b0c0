//! DNS manager: Route53 hosted zones and A records.
//!
//! Record names are always built by [`fqdn`], so callers pass only the
//! subdomain label. Adds use `UPSERT`, which makes them idempotent.

use crate::error::{Error, Result};
use crate::governance::Governance;
use crate::provider::{ChangeAction, DnsApi, HostedZone, RecordChange, RecordSet};
use std::sync::Arc;

/// Comment attached to every zone created by this tool.
pub const ZONE_COMMENT: &str = "Managed by platform-cli";

/// TTL of every record written by this tool.
pub const RECORD_TTL: i64 = 300;

/// Record type managed by this tool.
pub const RECORD_TYPE: &str = "A";

/// Build a fully-qualified, dot-terminated record name.
///
/// ```
/// use platform_cli::dns::fqdn;
///
/// assert_eq!(fqdn("app", "project.com"), "app.project.com.");
/// assert_eq!(fqdn("app", "project.com."), "app.project.com.");
/// ```
pub fn fqdn(subdomain: &str, domain: &str) -> String {
    let subdomain = subdomain.trim().trim_matches('.');
    let domain = domain.trim().trim_matches('.');

    if subdomain.is_empty() {
        format!("{}.", domain)
    } else {
        format!("{}.{}.", subdomain, domain)
    }
}

/// Caller reference Route53 uses to deduplicate zone creation requests.
pub fn caller_reference(domain: &str, unix_seconds: i64) -> String {
    format!("{}-{}", domain, unix_seconds)
}

pub struct DnsManager {
    dns: Arc<dyn DnsApi>,
    governance: Governance,
    parent_domain: Option<String>,
}

impl DnsManager {
    pub fn new(dns: Arc<dyn DnsApi>, governance: Governance) -> Self {
        Self {
            dns,
            governance,
            parent_domain: None,
        }
    }

    /// Use a fixed parent domain instead of the zone's own name.
    pub fn with_parent_domain(mut self, domain: Option<String>) -> Self {
        self.parent_domain = domain.filter(|d| !d.trim().is_empty());
        self
    }

    /// Create a public hosted zone and tag it. Returns the bare zone id.
    pub async fn create_zone(&self, domain: &str) -> Result<HostedZone> {
        let domain = domain.trim();
        let reference = caller_reference(domain, chrono::Utc::now().timestamp());
        let zone = self
            .dns
            .create_hosted_zone(domain, &reference, ZONE_COMMENT)
            .await?;

        self.dns
            .add_zone_tags(&zone.id, &self.governance.mandatory_tags())
            .await?;

        tracing::info!(zone_id = %zone.id, domain, "Created hosted zone");
        Ok(zone)
    }

    /// Zones carrying this tool's creator tag. Zones whose tags cannot be read are skipped.
    pub async fn list_zones(&self) -> Result<Vec<HostedZone>> {
        let zones = self.dns.list_hosted_zones().await?;
        let mut managed = Vec::new();

        for zone in zones {
            match self.dns.list_zone_tags(&zone.id).await {
                Ok(tags) if self.governance.is_managed(&tags) => managed.push(zone),
                Ok(_) => {}
                Err(e) => {
                    tracing::debug!(
                        zone_id = %zone.id,
                        error = %e,
                        "Skipping zone with unreadable tags"
                    );
                }
            }
        }

        Ok(managed)
    }

    /// Upsert an A record `subdomain -> ip`. Returns the record name written.
    pub async fn add_record(&self, zone_id: &str, subdomain: &str, ip: &str) -> Result<String> {
        self.change(ChangeAction::Upsert, zone_id, subdomain, ip).await
    }

    /// Delete the A record `subdomain -> ip`. Returns the record name removed.
    pub async fn delete_record(&self, zone_id: &str, subdomain: &str, ip: &str) -> Result<String> {
        self.change(ChangeAction::Delete, zone_id, subdomain, ip).await
    }

    /// Delete a record set as listed by [`Self::list_records`].
    ///
    /// Route53 only accepts a delete that matches the live set exactly, so the
    /// listed TTL and every value are sent back unchanged.
    pub async fn delete_record_named(
        &self,
        zone_id: &str,
        record: &RecordSet,
    ) -> Result<String> {
        if record.record_type != RECORD_TYPE {
            return Err(Error::InvalidInput(format!(
                "Only {} records can be deleted, got {}",
                RECORD_TYPE, record.record_type
            )));
        }
        if record.values.is_empty() {
            return Err(Error::InvalidInput(format!("Record {} has no values", record.name)));
        }

        self.managed_zone(zone_id).await?;
        let record = RecordSet {
            name: format!("{}.", record.name.trim().trim_end_matches('.')),
            record_type: RECORD_TYPE.to_string(),
            ttl: record.ttl,
            values: record.values.iter().map(|v| v.trim().to_string()).collect(),
        };
        self.submit(ChangeAction::Delete, zone_id, record).await
    }

    /// A records of a managed zone.
    pub async fn list_records(&self, zone_id: &str) -> Result<Vec<RecordSet>> {
        self.managed_zone(zone_id).await?;

        let records = self.dns.list_records(zone_id).await?;
        Ok(records
            .into_iter()
            .filter(|r| r.record_type == RECORD_TYPE)
            .collect())
    }

    /// Fully-qualified name a subdomain resolves to in the given zone.
    pub fn record_name(&self, zone: &HostedZone, subdomain: &str) -> String {
        let domain = self.parent_domain.as_deref().unwrap_or(&zone.name);
        fqdn(subdomain, domain)
    }

    async fn change(
        &self,
        action: ChangeAction,
        zone_id: &str,
        subdomain: &str,
        ip: &str,
    ) -> Result<String> {
        let zone = self.managed_zone(zone_id).await?;
        let record = RecordSet {
            name: self.record_name(&zone, subdomain),
            record_type: RECORD_TYPE.to_string(),
            ttl: RECORD_TTL,
            values: vec![ip.trim().to_string()],
        };
        self.submit(action, zone_id, record).await
    }

    async fn submit(
        &self,
        action: ChangeAction,
        zone_id: &str,
        record: RecordSet,
    ) -> Result<String> {
        let name = record.name.clone();
        let change = RecordChange { action, record };

        self.dns.change_record(zone_id, &change).await?;
        tracing::info!(zone_id, record = %name, action = action.as_str(), "Changed record");
        Ok(name)
    }

    /// Fetch a zone and verify it was created by this tool.
    async fn managed_zone(&self, zone_id: &str) -> Result<HostedZone> {
        let tags = self.dns.list_zone_tags(zone_id).await?;
        self.governance.ensure_managed("zone", zone_id, &tags)?;

        self.dns
            .get_hosted_zone(zone_id)
            .await?
            .ok_or_else(|| Error::ZoneNotFound(zone_id.to_string()))
    }

    pub fn governance(&self) -> &Governance {
        &self.governance
    }
}
