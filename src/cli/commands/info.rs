//! Info command - verify credentials and show tag configuration

use super::CommandContext;
use anyhow::{Context, Result};
use clap::Parser;

/// Arguments for the info command
#[derive(Parser, Debug, Clone, Default)]
pub struct InfoArgs {}

impl InfoArgs {
    /// Execute the info command
    pub async fn execute(&self, ctx: &mut CommandContext) -> Result<i32> {
        let platform = ctx.platform().await;
        let identity = ctx
            .with_spinner("Checking credentials...", platform.caller_identity())
            .await
            .context("Connection failed")?;

        let governance = platform.governance();

        if ctx.output.is_json() {
            ctx.output.json(&serde_json::json!({
                "account": identity.account,
                "arn": identity.arn,
                "region": platform.region(),
                "created_by": governance.created_by(),
                "owner": governance.owner(),
            }));
            return Ok(0);
        }

        ctx.output.success("Connection successful!");
        ctx.output.field("Account ID", &identity.account);
        ctx.output.field("User ARN", &identity.arn);
        ctx.output.field("Region", platform.region());

        ctx.output.section("Current Tag Configuration");
        ctx.output.field("CreatedBy", governance.created_by());
        ctx.output.field("Owner", governance.owner());
        Ok(0)
    }
}
