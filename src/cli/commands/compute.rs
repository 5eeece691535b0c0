//! Compute commands - EC2 instance lifecycle
//!
//! Implements `create`, `list`, `stop`, `start` and `terminate`.

use super::CommandContext;
use crate::cli::prompt;
use anyhow::Result;
use clap::{Parser, Subcommand};
use platform_cli::compute::{self, DEFAULT_INSTANCE_NAME, DEFAULT_INSTANCE_TYPE};
use platform_cli::provider::InstanceSummary;

/// Compute subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ComputeCommand {
    /// Launch a new instance
    Create(CreateArgs),

    /// List instances created by this tool
    List,

    /// Stop a managed instance
    Stop(InstanceArgs),

    /// Start a managed instance
    Start(InstanceArgs),

    /// Terminate a managed instance you own
    Terminate(TerminateArgs),
}

/// Arguments for the create command
#[derive(Parser, Debug, Clone)]
pub struct CreateArgs {
    /// SSH key pair name
    #[arg(long)]
    pub key: String,

    /// Instance type (t3.micro or t3.small)
    #[arg(long = "type", default_value = DEFAULT_INSTANCE_TYPE)]
    pub instance_type: String,

    /// Value of the Name tag
    #[arg(long, default_value = DEFAULT_INSTANCE_NAME)]
    pub name: String,
}

/// Arguments naming a single instance
#[derive(Parser, Debug, Clone)]
pub struct InstanceArgs {
    /// Instance id (i-...)
    pub instance_id: String,
}

/// Arguments for the terminate command
#[derive(Parser, Debug, Clone)]
pub struct TerminateArgs {
    /// Instance id (i-...)
    pub instance_id: String,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

impl ComputeCommand {
    /// Execute the compute command
    pub async fn execute(&self, ctx: &mut CommandContext) -> Result<i32> {
        match self {
            ComputeCommand::Create(args) => create(args, ctx).await,
            ComputeCommand::List => list(ctx).await,
            ComputeCommand::Stop(args) => {
                let platform = ctx.platform().await;
                ctx.with_spinner(
                    &format!("Stopping {}...", args.instance_id),
                    platform.compute.stop(&args.instance_id),
                )
                .await?;
                ctx.output
                    .success(&format!("Stopping {}", args.instance_id));
                Ok(0)
            }
            ComputeCommand::Start(args) => {
                let platform = ctx.platform().await;
                ctx.with_spinner(
                    &format!("Starting {}...", args.instance_id),
                    platform.compute.start(&args.instance_id),
                )
                .await?;
                ctx.output
                    .success(&format!("Starting {}", args.instance_id));
                Ok(0)
            }
            ComputeCommand::Terminate(args) => terminate(args, ctx).await,
        }
    }
}

async fn create(args: &CreateArgs, ctx: &mut CommandContext) -> Result<i32> {
    // Refuse disallowed sizes before touching the network.
    compute::validate_instance_type(&args.instance_type)?;

    let platform = ctx.platform().await;
    ctx.output.info(&format!(
        "Launching {} named '{}'",
        args.instance_type, args.name
    ));

    let launched = ctx
        .with_spinner(
            "Launching instance...",
            platform
                .compute
                .create(&args.name, &args.key, &args.instance_type),
        )
        .await?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "instance_id": launched.instance_id,
            "image_id": launched.image_id,
            "instance_type": args.instance_type,
            "name": args.name,
        }));
    } else {
        ctx.output.field("AMI", &launched.image_id);
        ctx.output.success(&format!(
            "Instance {} is being created",
            launched.instance_id
        ));
    }
    Ok(0)
}

async fn list(ctx: &mut CommandContext) -> Result<i32> {
    let platform = ctx.platform().await;
    let instances = ctx
        .with_spinner("Listing instances...", platform.compute.list())
        .await?;

    if ctx.output.is_json() {
        ctx.output.json(&instances);
        return Ok(0);
    }

    ctx.output.section("Instances");
    ctx.output.table(
        &["ID", "Name", "State", "Type", "Public IP"],
        &instances.iter().map(instance_row).collect::<Vec<_>>(),
    );
    Ok(0)
}

async fn terminate(args: &TerminateArgs, ctx: &mut CommandContext) -> Result<i32> {
    let platform = ctx.platform().await;

    // Guardrails run before the prompt.
    let instance = platform.compute.managed_instance(&args.instance_id).await?;
    platform
        .compute
        .governance()
        .ensure_owned("instance", &args.instance_id, &instance.tags)?;

    ctx.output.warning(&format!(
        "TERMINATING {}. Data will be lost.",
        args.instance_id
    ));
    if !prompt::confirm("Are you sure?", args.yes)? {
        ctx.output.warning("Aborted");
        return Ok(1);
    }

    ctx.with_spinner(
        &format!("Terminating {}...", args.instance_id),
        platform.compute.terminate(&args.instance_id),
    )
    .await?;
    ctx.output.success("Instance terminated");
    Ok(0)
}

fn instance_row(instance: &InstanceSummary) -> Vec<String> {
    vec![
        instance.instance_id.clone(),
        instance.name.clone().unwrap_or_else(|| "-".to_string()),
        instance.state.to_string(),
        instance.instance_type.clone(),
        instance.public_ip.clone().unwrap_or_else(|| "-".to_string()),
    ]
}
