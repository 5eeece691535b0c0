//! Serve command - run the web form

use super::CommandContext;
use anyhow::{Context, Result};
use clap::Parser;
use platform_cli::web::{WebConfig, WebServer};

/// Arguments for the serve command
#[derive(Parser, Debug, Clone)]
pub struct ServeArgs {
    /// Address to listen on (defaults to the configured web.bind)
    #[arg(long, env = "PLATFORM_BIND")]
    pub bind: Option<String>,
}

impl ServeArgs {
    /// Execute the serve command
    pub async fn execute(&self, ctx: &mut CommandContext) -> Result<i32> {
        let bind = self
            .bind
            .clone()
            .unwrap_or_else(|| ctx.config.web.bind.clone());
        let web_config = WebConfig::from_bind(&bind)?;

        let platform = ctx.platform().await;
        let server = WebServer::new(web_config, platform).context("Failed to build web form")?;

        ctx.output.banner("PLATFORM-CLI WEB FORM");
        ctx.output.field("Listening", &format!("http://{}", bind));
        ctx.output.field("Owner", &ctx.config.tags.owner);
        ctx.output.field("Region", &ctx.config.aws.region);
        ctx.output.flush();

        server
            .run_with_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
            })
            .await
            .with_context(|| format!("Web server on {} failed", bind))?;

        Ok(0)
    }
}
