//! DNS commands - Route53 zones and A records

use super::CommandContext;
use anyhow::Result;
use clap::{Parser, Subcommand};

/// DNS subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum DnsCommand {
    /// Create a public hosted zone
    CreateZone(CreateZoneArgs),

    /// List hosted zones created by this tool
    ListZones,

    /// List A records of a managed zone
    ListRecords(ZoneArgs),

    /// Create or update an A record
    AddRecord(RecordArgs),

    /// Delete an A record
    DeleteRecord(RecordArgs),
}

/// Arguments for the create-zone command
#[derive(Parser, Debug, Clone)]
pub struct CreateZoneArgs {
    /// Domain name (e.g. project.com)
    pub domain: String,
}

/// Arguments naming a zone
#[derive(Parser, Debug, Clone)]
pub struct ZoneArgs {
    /// Hosted zone id
    pub zone_id: String,
}

/// Arguments for record changes
#[derive(Parser, Debug, Clone)]
pub struct RecordArgs {
    /// Hosted zone id
    pub zone_id: String,

    /// Subdomain label (e.g. app)
    pub subdomain: String,

    /// IPv4 address the record points to
    pub ip: String,
}

impl DnsCommand {
    /// Execute the dns command
    pub async fn execute(&self, ctx: &mut CommandContext) -> Result<i32> {
        let platform = ctx.platform().await;
        let dns = &platform.dns;

        match self {
            DnsCommand::CreateZone(args) => {
                let zone = ctx
                    .with_spinner(
                        &format!("Creating zone for {}...", args.domain),
                        dns.create_zone(&args.domain),
                    )
                    .await?;

                if ctx.output.is_json() {
                    ctx.output.json(&zone);
                } else {
                    ctx.output
                        .success(&format!("Zone created! ID: {}", zone.id));
                    ctx.output.info("Tags successfully added");
                }
            }
            DnsCommand::ListZones => {
                let zones = ctx
                    .with_spinner("Listing zones...", dns.list_zones())
                    .await?;

                if ctx.output.is_json() {
                    ctx.output.json(&zones);
                } else {
                    ctx.output.section("Hosted zones");
                    let rows: Vec<Vec<String>> = zones
                        .iter()
                        .map(|z| vec![z.id.clone(), z.name.clone(), z.record_count.to_string()])
                        .collect();
                    ctx.output.table(&["Zone ID", "Name", "Records"], &rows);
                }
            }
            DnsCommand::ListRecords(args) => {
                let records = ctx
                    .with_spinner("Listing records...", dns.list_records(&args.zone_id))
                    .await?;

                if ctx.output.is_json() {
                    ctx.output.json(&records);
                } else {
                    ctx.output.section(&format!("A records in {}", args.zone_id));
                    let rows: Vec<Vec<String>> = records
                        .iter()
                        .map(|r| vec![r.name.clone(), r.values.join(", "), r.ttl.to_string()])
                        .collect();
                    ctx.output.table(&["Name", "Value", "TTL"], &rows);
                }
            }
            DnsCommand::AddRecord(args) => {
                let name = ctx
                    .with_spinner(
                        &format!("Adding record {} -> {}...", args.subdomain, args.ip),
                        dns.add_record(&args.zone_id, &args.subdomain, &args.ip),
                    )
                    .await?;
                report_record(ctx, "added", &name, &args.ip);
            }
            DnsCommand::DeleteRecord(args) => {
                let name = ctx
                    .with_spinner(
                        &format!("Deleting record {} -> {}...", args.subdomain, args.ip),
                        dns.delete_record(&args.zone_id, &args.subdomain, &args.ip),
                    )
                    .await?;
                report_record(ctx, "deleted", &name, &args.ip);
            }
        }

        Ok(0)
    }
}

fn report_record(ctx: &CommandContext, verb: &str, name: &str, ip: &str) {
    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "record": name,
            "value": ip,
            "status": verb,
        }));
    } else {
        ctx.output
            .success(&format!("Record {} -> {} {}", name, ip, verb));
    }
}
