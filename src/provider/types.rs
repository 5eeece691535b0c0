//! Plain data exchanged across the provider seam.

use crate::governance::ResourceTags;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// EC2 instance state as reported by the provider
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum InstanceState {
    Pending,
    Running,
    ShuttingDown,
    Terminated,
    Stopping,
    Stopped,
    Unknown(String),
}

impl InstanceState {
    /// States counted against the instance quota.
    pub const ACTIVE: [InstanceState; 4] = [
        InstanceState::Pending,
        InstanceState::Running,
        InstanceState::Stopping,
        InstanceState::Stopped,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::ShuttingDown => "shutting-down",
            Self::Terminated => "terminated",
            Self::Stopping => "stopping",
            Self::Stopped => "stopped",
            Self::Unknown(other) => other,
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "pending" => Self::Pending,
            "running" => Self::Running,
            "shutting-down" => Self::ShuttingDown,
            "terminated" => Self::Terminated,
            "stopping" => Self::Stopping,
            "stopped" => Self::Stopped,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn is_terminated(&self) -> bool {
        matches!(self, Self::Terminated)
    }
}

impl fmt::Display for InstanceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for InstanceState {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<InstanceState> for String {
    fn from(state: InstanceState) -> Self {
        state.as_str().to_string()
    }
}

/// Summary of an EC2 instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceSummary {
    pub instance_id: String,
    pub name: Option<String>,
    pub state: InstanceState,
    pub instance_type: String,
    pub public_ip: Option<String>,
    pub tags: ResourceTags,
}

/// Server-side filter for instance listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstanceFilter {
    /// Only instances whose `CreatedBy` tag has this value
    pub created_by: Option<String>,
    /// Only instances in one of these states (empty means any)
    pub states: Vec<InstanceState>,
}

impl InstanceFilter {
    pub fn created_by(value: impl Into<String>) -> Self {
        Self {
            created_by: Some(value.into()),
            states: Vec::new(),
        }
    }

    pub fn with_states(mut self, states: impl IntoIterator<Item = InstanceState>) -> Self {
        self.states = states.into_iter().collect();
        self
    }

    /// Client-side evaluation, used where the provider cannot filter.
    pub fn matches(&self, instance: &InstanceSummary) -> bool {
        let creator_ok = match &self.created_by {
            Some(expected) => instance.tags.created_by() == Some(expected.as_str()),
            None => true,
        };
        let state_ok = self.states.is_empty() || self.states.contains(&instance.state);
        creator_ok && state_ok
    }
}

/// Parameters of a single-instance launch
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchRequest {
    pub image_id: String,
    pub instance_type: String,
    pub key_name: String,
    pub tags: ResourceTags,
}

/// Route53 hosted zone; `id` has the `/hostedzone/` prefix stripped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostedZone {
    pub id: String,
    pub name: String,
    pub record_count: i64,
}

/// Strip the `/hostedzone/` path prefix Route53 puts on zone ids.
pub fn bare_zone_id(id: &str) -> &str {
    id.rsplit('/').next().unwrap_or(id)
}

/// DNS change action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeAction {
    Upsert,
    Delete,
}

impl ChangeAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upsert => "UPSERT",
            Self::Delete => "DELETE",
        }
    }
}

/// A DNS resource record set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSet {
    pub name: String,
    pub record_type: String,
    pub ttl: i64,
    pub values: Vec<String>,
}

/// A single change against a hosted zone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordChange {
    pub action: ChangeAction,
    pub record: RecordSet,
}

/// S3 bucket listing entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketSummary {
    pub name: String,
    pub created_at: Option<String>,
}

/// Identity behind the configured credentials
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerIdentity {
    pub account: String,
    pub arn: String,
}

/// Body of an object upload.
///
/// Files are streamed from disk by the SDK; form uploads hand over the
/// multipart field buffer as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectBody {
    File(PathBuf),
    Bytes(Bytes),
}

impl ObjectBody {
    pub fn len_hint(&self) -> Option<u64> {
        match self {
            ObjectBody::File(path) => std::fs::metadata(path).ok().map(|m| m.len()),
            ObjectBody::Bytes(bytes) => Some(bytes.len() as u64),
        }
    }
}
