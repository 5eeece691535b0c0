//! AWS SDK backends for the provider traits.
//!
//! Credentials come from the loaded [`AwsConfig`]: when both halves of a
//! static key pair are configured they are used directly, otherwise the
//! standard AWS credential chain applies:
//!
//! 1. Environment variables (`AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`)
//! 2. AWS credentials file (`~/.aws/credentials`)
//! 3. IAM instance profile / ECS task role
//!
//! The region is always taken from the configuration. Loading the SDK
//! configuration makes no network calls.

mod ec2;
mod route53;
mod s3;
mod ssm;
mod sts;

pub use ec2::Ec2Backend;
pub use route53::Route53Backend;
pub use s3::S3Backend;
pub use ssm::SsmBackend;
pub use sts::StsBackend;

use super::CloudClients;
use crate::config::AwsConfig;
use crate::error::Error;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_ec2::config::{Credentials, Region};
use aws_sdk_ec2::error::DisplayErrorContext;
use std::sync::Arc;

/// Provider name recorded on static credentials.
const CREDENTIALS_PROVIDER: &str = "platform-cli";

/// Build the shared SDK configuration
pub async fn load_sdk_config(aws: &AwsConfig) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(aws.region.clone()));

    if let Some((key, secret)) = aws.static_credentials() {
        loader = loader.credentials_provider(Credentials::new(
            key,
            secret,
            None,
            None,
            CREDENTIALS_PROVIDER,
        ));
    }

    loader.load().await
}

/// Create SDK-backed handles for every provider service
pub async fn connect(aws: &AwsConfig) -> CloudClients {
    let sdk_config = load_sdk_config(aws).await;

    tracing::debug!(
        region = %aws.region,
        static_credentials = aws.static_credentials().is_some(),
        "Loaded AWS configuration"
    );

    CloudClients {
        compute: Arc::new(Ec2Backend::new(&sdk_config)),
        parameters: Arc::new(SsmBackend::new(&sdk_config)),
        dns: Arc::new(Route53Backend::new(&sdk_config)),
        storage: Arc::new(S3Backend::new(&sdk_config)),
        identity: Arc::new(StsBackend::new(&sdk_config)),
    }
}

/// Map an SDK error into [`Error::Provider`], keeping the full error chain.
pub(crate) fn sdk_error<E>(operation: &'static str) -> impl FnOnce(E) -> Error
where
    E: std::error::Error,
{
    move |err| Error::provider(operation, DisplayErrorContext(&err).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_sdk_config_uses_configured_region() {
        let aws = AwsConfig {
            access_key_id: Some("AKIDEXAMPLE".to_string()),
            secret_access_key: Some("secret".to_string()),
            region: "eu-central-1".to_string(),
        };
        let sdk_config = load_sdk_config(&aws).await;
        assert_eq!(
            sdk_config.region().map(|r| r.as_ref()),
            Some("eu-central-1")
        );
        assert!(sdk_config.credentials_provider().is_some());
    }

    #[test]
    fn test_sdk_error_keeps_message() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "connection reset");
        let err = sdk_error("ListBuckets")(io);
        assert!(err.to_string().contains("connection reset"));
        assert!(err.to_string().contains("ListBuckets"));
    }
}
