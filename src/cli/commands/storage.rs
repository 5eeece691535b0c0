//! Storage commands - S3 buckets and uploads

use super::CommandContext;
use crate::cli::prompt;
use anyhow::Result;
use clap::{Parser, Subcommand};
use platform_cli::storage::BucketAccess;
use std::path::PathBuf;

/// Storage subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum StorageCommand {
    /// Create a tagged bucket (private unless --public)
    CreateBucket(CreateBucketArgs),

    /// List buckets created by this tool
    List,

    /// Upload a local file into a managed bucket
    Upload(UploadArgs),
}

/// Arguments for the create-bucket command
#[derive(Parser, Debug, Clone)]
pub struct CreateBucketArgs {
    /// Bucket name (lower-cased before use)
    pub name: String,

    /// Remove the public access block (dangerous)
    #[arg(long)]
    pub public: bool,

    /// Skip the confirmation prompt for --public
    #[arg(long, short = 'y')]
    pub yes: bool,
}

/// Arguments for the upload command
#[derive(Parser, Debug, Clone)]
pub struct UploadArgs {
    /// Target bucket
    pub bucket: String,

    /// Local file; stored under its base name
    pub file: PathBuf,
}

impl StorageCommand {
    /// Execute the storage command
    pub async fn execute(&self, ctx: &mut CommandContext) -> Result<i32> {
        match self {
            StorageCommand::CreateBucket(args) => create_bucket(args, ctx).await,
            StorageCommand::List => list(ctx).await,
            StorageCommand::Upload(args) => upload(args, ctx).await,
        }
    }
}

async fn create_bucket(args: &CreateBucketArgs, ctx: &mut CommandContext) -> Result<i32> {
    let access = BucketAccess::from_public_flag(args.public);

    if access == BucketAccess::Public {
        ctx.output.warning(&format!(
            "You are about to make bucket '{}' PUBLIC.",
            args.name.to_lowercase()
        ));
        if !prompt::confirm("Are you absolutely sure?", args.yes)? {
            ctx.output.warning("Operation cancelled");
            return Ok(1);
        }
    }

    let platform = ctx.platform().await;
    let name = ctx
        .with_spinner(
            &format!("Creating bucket {}...", args.name),
            platform.storage.create_bucket(&args.name, access),
        )
        .await?;

    let label = match access {
        BucketAccess::Public => "Public",
        BucketAccess::Private => "Private",
    };

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "bucket": name,
            "access": label.to_lowercase(),
            "region": platform.region(),
        }));
    } else {
        ctx.output
            .success(&format!("Bucket '{}' created ({})", name, label));
    }
    Ok(0)
}

async fn list(ctx: &mut CommandContext) -> Result<i32> {
    let platform = ctx.platform().await;
    let buckets = ctx
        .with_spinner("Listing buckets...", platform.storage.list_buckets())
        .await?;

    if ctx.output.is_json() {
        ctx.output.json(&buckets);
        return Ok(0);
    }

    ctx.output.section("Buckets");
    let rows: Vec<Vec<String>> = buckets
        .iter()
        .map(|b| {
            vec![
                b.name.clone(),
                b.created_at.clone().unwrap_or_else(|| "-".to_string()),
            ]
        })
        .collect();
    ctx.output.table(&["Bucket Name", "Creation Date"], &rows);
    Ok(0)
}

async fn upload(args: &UploadArgs, ctx: &mut CommandContext) -> Result<i32> {
    if !args.file.is_file() {
        // Reported before any client is built.
        return Err(platform_cli::error::Error::FileNotFound(args.file.clone()).into());
    }

    let platform = ctx.platform().await;
    let key = ctx
        .with_spinner(
            &format!("Uploading '{}'...", args.file.display()),
            platform.storage.upload_file(&args.bucket, &args.file),
        )
        .await?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "bucket": args.bucket,
            "key": key,
        }));
    } else {
        ctx.output
            .success(&format!("File uploaded to s3://{}/{}", args.bucket, key));
    }
    Ok(0)
}
