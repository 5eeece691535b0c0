//! # platform-cli - Governed AWS self-service
//!
//! A restricted, tag-enforcing front end over EC2, Route53 and S3. Developers
//! create machines, DNS records and buckets through a CLI or a small web form;
//! every resource is tagged with a fixed creator and owner identity and every
//! destructive operation refuses resources it did not create.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌───────────────────────────┐   ┌───────────────────────────┐
//! │   CLI (clap, dialoguer)   │   │  Web form (axum, jinja)   │
//! └─────────────┬─────────────┘   └─────────────┬─────────────┘
//!               └───────────────┬───────────────┘
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          Platform                            │
//! │   ComputeManager   │   DnsManager   │   StorageManager       │
//! │            (Governance: CreatedBy / Owner guardrails)        │
//! └─────────────────────────────┬───────────────────────────────┘
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  provider traits: ComputeApi, ParameterStore, DnsApi,        │
//! │                   ObjectStoreApi, IdentityApi                │
//! └─────────────────────────────┬───────────────────────────────┘
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │      provider::aws (EC2, SSM, Route53, S3, STS SDK clients)  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use platform_cli::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load(None)?;
//!     let platform = Platform::connect(&config).await;
//!
//!     let launched = platform.compute.create("web-1", "my-key", "t3.micro").await?;
//!     println!("{}", launched.instance_id);
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod prelude {
    //! Convenient re-exports of commonly used types.

    pub use crate::compute::{ComputeManager, Launched};
    pub use crate::config::Config;
    pub use crate::dns::{fqdn, DnsManager};
    pub use crate::error::{Error, Result};
    pub use crate::governance::{Governance, ResourceTags};
    pub use crate::platform::Platform;
    pub use crate::provider::CloudClients;
    pub use crate::storage::{BucketAccess, StorageManager};
}

// ============================================================================
// Core Modules
// ============================================================================

/// Error types and result aliases.
pub mod error;

/// Configuration loading from files, `.env` and the environment.
pub mod config;

/// Governance tags (`CreatedBy`, `Owner`) and the guardrail checks built on them.
pub mod governance;

// ============================================================================
// Providers
// ============================================================================

/// Async traits for every remote service plus their AWS SDK implementations.
///
/// Managers never talk to the SDK directly; they hold `Arc<dyn ...>` handles
/// so tests can substitute in-memory fakes.
pub mod provider;

// ============================================================================
// Managers
// ============================================================================

/// EC2 instance lifecycle: allow-list, quota, image lookup, ownership checks.
pub mod compute;

/// Route53 hosted zones and A records.
pub mod dns;

/// S3 buckets, public-access policy and uploads.
pub mod storage;

/// All managers built from one configuration.
pub mod platform;

// ============================================================================
// Web Form
// ============================================================================

/// HTML form front end served by axum.
#[cfg(feature = "web")]
pub mod web;

// ============================================================================
// Version Information
// ============================================================================

/// Returns the current version of platform-cli.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
