//! Governance tags and guardrails.
//!
//! Every resource this tool creates carries two tags:
//!
//! | Key | Value |
//! |-----|-------|
//! | `CreatedBy` | configured creator identity (`TAG_CREATED_BY`) |
//! | `Owner` | configured owner identity (`TAG_OWNER`) |
//!
//! Listing filters on `CreatedBy`; lifecycle operations refuse resources whose
//! `CreatedBy` differs, and termination additionally refuses a foreign `Owner`.

use crate::config::TagsConfig;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Tag key holding the creator identity.
pub const TAG_CREATED_BY: &str = "CreatedBy";
/// Tag key holding the owner identity.
pub const TAG_OWNER: &str = "Owner";
/// Tag key holding the display name of an instance.
pub const TAG_NAME: &str = "Name";

/// Key/value tags read from a provider resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceTags(BTreeMap<String, String>);

impl ResourceTags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(key, value)` pairs; later keys overwrite earlier ones.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn created_by(&self) -> Option<&str> {
        self.get(TAG_CREATED_BY)
    }

    pub fn owner(&self) -> Option<&str> {
        self.get(TAG_OWNER)
    }

    pub fn name(&self) -> Option<&str> {
        self.get(TAG_NAME)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The process-wide identity used to tag and filter resources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Governance {
    created_by: String,
    owner: String,
}

impl Governance {
    pub fn new(created_by: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            created_by: created_by.into(),
            owner: owner.into(),
        }
    }

    pub fn from_config(tags: &TagsConfig) -> Self {
        Self::new(&tags.created_by, &tags.owner)
    }

    pub fn created_by(&self) -> &str {
        &self.created_by
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// The mandatory tags, in the order they are attached.
    pub fn mandatory_tags(&self) -> ResourceTags {
        ResourceTags::from_pairs([
            (TAG_CREATED_BY, self.created_by.as_str()),
            (TAG_OWNER, self.owner.as_str()),
        ])
    }

    /// Whether the resource was created by this tool's identity.
    pub fn is_managed(&self, tags: &ResourceTags) -> bool {
        tags.created_by() == Some(self.created_by.as_str())
    }

    /// Refuse resources not created by this tool.
    pub fn ensure_managed(&self, kind: &'static str, id: &str, tags: &ResourceTags) -> Result<()> {
        if self.is_managed(tags) {
            Ok(())
        } else {
            Err(Error::NotManaged {
                kind,
                id: id.to_string(),
                creator: self.created_by.clone(),
            })
        }
    }

    /// Refuse resources owned by anyone but the configured owner.
    pub fn ensure_owned(&self, kind: &'static str, id: &str, tags: &ResourceTags) -> Result<()> {
        match tags.owner() {
            Some(owner) if owner == self.owner => Ok(()),
            other => Err(Error::OwnershipMismatch {
                kind,
                id: id.to_string(),
                expected: self.owner.clone(),
                actual: other.unwrap_or_default().to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn governance() -> Governance {
        Governance::new("platform-cli", "student")
    }

    #[test]
    fn test_mandatory_tags() {
        let tags = governance().mandatory_tags();
        assert_eq!(tags.len(), 2);
        assert_eq!(tags.created_by(), Some("platform-cli"));
        assert_eq!(tags.owner(), Some("student"));
    }

    #[test]
    fn test_is_managed() {
        let gov = governance();
        assert!(gov.is_managed(&ResourceTags::from_pairs([("CreatedBy", "platform-cli")])));
        assert!(!gov.is_managed(&ResourceTags::from_pairs([("CreatedBy", "terraform")])));
        assert!(!gov.is_managed(&ResourceTags::new()));
    }

    #[test]
    fn test_ensure_managed_error() {
        let err = governance()
            .ensure_managed("zone", "Z123", &ResourceTags::new())
            .unwrap_err();
        assert!(matches!(err, Error::NotManaged { kind: "zone", .. }));
    }

    #[test]
    fn test_ensure_owned() {
        let gov = governance();
        let mine = ResourceTags::from_pairs([("Owner", "student")]);
        let theirs = ResourceTags::from_pairs([("Owner", "mallory")]);

        assert!(gov.ensure_owned("instance", "i-1", &mine).is_ok());
        match gov.ensure_owned("instance", "i-1", &theirs) {
            Err(Error::OwnershipMismatch { actual, expected, .. }) => {
                assert_eq!(actual, "mallory");
                assert_eq!(expected, "student");
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(gov.ensure_owned("instance", "i-1", &ResourceTags::new()).is_err());
    }

    #[test]
    fn test_from_config() {
        let gov = Governance::from_config(&TagsConfig::default());
        assert_eq!(gov.created_by(), "platform-cli");
        assert_eq!(gov.owner(), "student");
    }
}
