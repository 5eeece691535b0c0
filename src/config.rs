//! Configuration module for platform-cli
//!
//! Handles loading configuration from multiple sources, later ones winning:
//! - Default values
//! - The first configuration file found among: `--config`, `PLATFORM_CONFIG`,
//!   `./platform-cli.toml`, `~/.platform-cli.toml`
//! - `.env` file and environment variables

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Region used when nothing else is configured.
pub const DEFAULT_REGION: &str = "us-east-1";
/// Creator identity used when `TAG_CREATED_BY` is unset.
pub const DEFAULT_CREATED_BY: &str = "platform-cli";
/// Owner identity used when `TAG_OWNER` is unset.
pub const DEFAULT_OWNER: &str = "student";
/// Default bind address of the web form.
pub const DEFAULT_BIND: &str = "127.0.0.1:8501";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// AWS credentials and region
    pub aws: AwsConfig,

    /// Governance tag values
    pub tags: TagsConfig,

    /// DNS settings
    pub dns: DnsConfig,

    /// Web form settings
    pub web: WebConfig,
}

/// AWS credentials and region.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AwsConfig {
    /// Access key id; when absent the default credential chain is used
    pub access_key_id: Option<String>,

    /// Secret access key
    pub secret_access_key: Option<String>,

    /// Region for every client
    pub region: String,
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            access_key_id: None,
            secret_access_key: None,
            region: DEFAULT_REGION.to_string(),
        }
    }
}

impl fmt::Debug for AwsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwsConfig")
            .field("access_key_id", &self.access_key_id)
            .field(
                "secret_access_key",
                &self.secret_access_key.as_ref().map(|_| "***"),
            )
            .field("region", &self.region)
            .finish()
    }
}

impl AwsConfig {
    /// Static credentials, when both halves are configured.
    pub fn static_credentials(&self) -> Option<(&str, &str)> {
        match (&self.access_key_id, &self.secret_access_key) {
            (Some(key), Some(secret)) if !key.is_empty() && !secret.is_empty() => {
                Some((key.as_str(), secret.as_str()))
            }
            _ => None,
        }
    }
}

/// Governance tag values attached to every created resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TagsConfig {
    /// Value of the `CreatedBy` tag
    pub created_by: String,

    /// Value of the `Owner` tag
    pub owner: String,
}

impl Default for TagsConfig {
    fn default() -> Self {
        Self {
            created_by: DEFAULT_CREATED_BY.to_string(),
            owner: DEFAULT_OWNER.to_string(),
        }
    }
}

/// DNS settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DnsConfig {
    /// Parent domain appended to record names; the zone name is used when unset
    pub domain: Option<String>,
}

/// Web form settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// Address the form is served on
    pub bind: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from all sources
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        let mut config = Config::default();

        if let Some(path) = config_path.filter(|p| !p.exists()) {
            tracing::warn!(
                path = %path.display(),
                "Config file not found; using defaults and environment"
            );
        }

        for path in Self::get_config_paths(config_path) {
            if path.exists() {
                config = Self::from_file(&path)?;
                break;
            }
        }

        config.apply_env_overrides();
        Ok(config)
    }

    /// Get the list of configuration file paths to check, most specific first
    fn get_config_paths(explicit_path: Option<&PathBuf>) -> Vec<PathBuf> {
        if let Some(path) = explicit_path {
            return vec![path.clone()];
        }

        let mut paths = Vec::new();

        if let Ok(env_config) = std::env::var("PLATFORM_CONFIG") {
            paths.push(PathBuf::from(env_config));
        }

        paths.push(PathBuf::from("platform-cli.toml"));

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".platform-cli.toml"));
        }

        paths
    }

    /// Parse a configuration file; the format follows the extension
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        let config = match extension {
            "yml" | "yaml" => serde_yaml::from_str(&content)?,
            "json" => serde_json::from_str(&content)?,
            _ => toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?,
        };

        Ok(config)
    }

    /// Apply overrides from the process environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable source. Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = get("AWS_ACCESS_KEY_ID") {
            self.aws.access_key_id = Some(key);
        }
        if let Some(secret) = get("AWS_SECRET_ACCESS_KEY") {
            self.aws.secret_access_key = Some(secret);
        }
        if let Some(region) = get("AWS_REGION").or_else(|| get("AWS_DEFAULT_REGION")) {
            self.aws.region = region;
        }
        if let Some(created_by) = get("TAG_CREATED_BY") {
            self.tags.created_by = created_by;
        }
        if let Some(owner) = get("TAG_OWNER") {
            self.tags.owner = owner;
        }
        if let Some(domain) = get("DNS_DOMAIN") {
            self.dns.domain = Some(domain);
        }
        if let Some(bind) = get("PLATFORM_BIND") {
            self.web.bind = bind;
        }
    }
}
