//! Error types for platform-cli.
//!
//! Every failure is either a guardrail refusing the request before (or
//! instead of) a remote call, or an AWS API error surfaced verbatim.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for platform-cli operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for platform-cli.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Guardrail Errors
    // ========================================================================
    /// Requested instance size is outside the allow-list.
    #[error("Instance type '{requested}' is not allowed (allowed: {})", allowed.join(", "))]
    InstanceTypeNotAllowed {
        /// Requested instance type
        requested: String,
        /// Permitted instance types
        allowed: Vec<String>,
    },

    /// The managed instance quota is already used up.
    #[error("Limit of {limit} instances reached ({current} active)")]
    QuotaExceeded {
        /// Maximum number of managed instances
        limit: usize,
        /// Instances currently counted against the limit
        current: usize,
    },

    /// Resource exists but was not created by this tool.
    #[error("{kind} '{id}' is not managed by {creator}")]
    NotManaged {
        /// Resource kind (instance, zone, bucket)
        kind: &'static str,
        /// Resource identifier
        id: String,
        /// Configured creator identity
        creator: String,
    },

    /// Resource belongs to a different owner.
    #[error("Not authorized: {kind} '{id}' is owned by '{actual}', not '{expected}'")]
    OwnershipMismatch {
        /// Resource kind
        kind: &'static str,
        /// Resource identifier
        id: String,
        /// Configured owner
        expected: String,
        /// Owner tag found on the resource (empty when missing)
        actual: String,
    },

    // ========================================================================
    // Lookup Errors
    // ========================================================================
    /// The base image parameter did not resolve to an image id.
    #[error("No base image found at parameter '{0}'")]
    ImageNotFound(String),

    /// Instance id does not exist.
    #[error("Instance '{0}' not found")]
    InstanceNotFound(String),

    /// Hosted zone id does not exist.
    #[error("Hosted zone '{0}' not found")]
    ZoneNotFound(String),

    // ========================================================================
    // Input Errors
    // ========================================================================
    /// Local file to upload does not exist.
    #[error("File '{}' not found", .0.display())]
    FileNotFound(PathBuf),

    /// Invalid user input that does not fit a more specific variant.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // ========================================================================
    // Provider Errors
    // ========================================================================
    /// AWS API call failed.
    #[error("AWS error during {operation}: {message}")]
    Provider {
        /// Name of the remote operation
        operation: &'static str,
        /// Provider message, verbatim
        message: String,
    },
}

impl Error {
    /// Wrap a provider error message for the named operation.
    pub fn provider(operation: &'static str, message: impl Into<String>) -> Self {
        Error::Provider {
            operation,
            message: message.into(),
        }
    }

    /// Whether this error was raised by a guardrail rather than the provider.
    pub fn is_guardrail(&self) -> bool {
        matches!(
            self,
            Error::InstanceTypeNotAllowed { .. }
                | Error::QuotaExceeded { .. }
                | Error::NotManaged { .. }
                | Error::OwnershipMismatch { .. }
        )
    }

    /// Whether this error denotes a missing resource.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::ImageNotFound(_)
                | Error::InstanceNotFound(_)
                | Error::ZoneNotFound(_)
                | Error::FileNotFound(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_type_message_lists_allowed() {
        let err = Error::InstanceTypeNotAllowed {
            requested: "m5.large".to_string(),
            allowed: vec!["t3.micro".to_string(), "t3.small".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Instance type 'm5.large' is not allowed (allowed: t3.micro, t3.small)"
        );
        assert!(err.is_guardrail());
    }

    #[test]
    fn test_ownership_message() {
        let err = Error::OwnershipMismatch {
            kind: "instance",
            id: "i-123".to_string(),
            expected: "student".to_string(),
            actual: "someone".to_string(),
        };
        assert!(err.to_string().starts_with("Not authorized"));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_provider_message_is_verbatim() {
        let err = Error::provider("RunInstances", "UnauthorizedOperation: nope");
        assert_eq!(
            err.to_string(),
            "AWS error during RunInstances: UnauthorizedOperation: nope"
        );
        assert!(!err.is_guardrail());
    }

    #[test]
    fn test_not_found_classification() {
        assert!(Error::ZoneNotFound("Z1".into()).is_not_found());
        assert!(Error::FileNotFound(PathBuf::from("/nope")).is_not_found());
        assert!(!Error::InvalidInput("x".into()).is_not_found());
    }
}
