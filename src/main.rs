//! platform-cli - governed self-service for EC2, Route53 and S3
//!
//! This is the main entry point for the platform-cli binary.

mod cli;

use anyhow::Result;
use cli::commands::CommandContext;
use cli::{Cli, Commands};
use platform_cli::config::Config;
use platform_cli::error::Error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Application version information
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    // A missing .env file is not an error
    let dotenv = dotenvy::dotenv();

    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    if let Ok(path) = dotenv {
        tracing::debug!(path = %path.display(), "Loaded .env");
    }

    // Display version if verbose
    if cli.verbosity() >= 2 {
        eprintln!("platform-cli v{}", VERSION);
    }

    let exit_code = match run(&cli).await {
        Ok(code) => code,
        Err(e) => {
            let output =
                cli::output::OutputFormatter::new(!cli.no_color, cli.is_json(), cli.verbosity());
            output.error(&format!("{:#}", e));
            if let Some(hint) = hint_for(&e) {
                output.hint(&hint);
            }
            1
        }
    };

    std::process::exit(exit_code);
}

async fn run(cli: &Cli) -> Result<i32> {
    if let Commands::Completions(args) = &cli.command {
        if args.instructions {
            cli::completions::print_installation_instructions(args.shell);
        } else {
            cli::completions::generate_completions(args.shell);
        }
        return Ok(0);
    }

    // Load configuration
    let config = Config::load(cli.config.as_ref())?;
    tracing::debug!(?config, "Loaded configuration");

    // Create command context
    let mut ctx = CommandContext::new(cli, config);

    // Execute the appropriate command
    match &cli.command {
        Commands::Info(args) => args.execute(&mut ctx).await,
        Commands::Compute(cmd) => cmd.execute(&mut ctx).await,
        Commands::Dns(cmd) => cmd.execute(&mut ctx).await,
        Commands::Storage(cmd) => cmd.execute(&mut ctx).await,
        #[cfg(feature = "web")]
        Commands::Serve(args) => args.execute(&mut ctx).await,
        Commands::Completions(_) => Ok(0),
    }
}

/// Suggest a next step for guardrail refusals
fn hint_for(err: &anyhow::Error) -> Option<String> {
    let err = err.downcast_ref::<Error>().filter(|e| e.is_guardrail())?;
    match err {
        Error::InstanceTypeNotAllowed { allowed, .. } => {
            Some(format!("Pass --type with one of: {}", allowed.join(", ")))
        }
        Error::QuotaExceeded { .. } => {
            Some(
                "Terminate an instance with `platform-cli compute terminate <ID>` first"
                    .to_string(),
            )
        }
        Error::NotManaged { .. } | Error::OwnershipMismatch { .. } => Some(
            "Only resources created by this tool and owned by TAG_OWNER can be changed".to_string(),
        ),
        _ => None,
    }
}

/// Initialize logging based on verbosity level
fn init_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(verbosity >= 3))
        .with(env_filter)
        .init();
}
