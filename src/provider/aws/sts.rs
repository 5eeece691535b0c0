//! STS backend.

use super::sdk_error;
use crate::error::Result;
use crate::provider::{CallerIdentity, IdentityApi};
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_sts::Client;

pub struct StsBackend {
    client: Client,
}

impl StsBackend {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: Client::new(config),
        }
    }
}

#[async_trait]
impl IdentityApi for StsBackend {
    async fn caller_identity(&self) -> Result<CallerIdentity> {
        let resp = self
            .client
            .get_caller_identity()
            .send()
            .await
            .map_err(sdk_error("GetCallerIdentity"))?;

        Ok(CallerIdentity {
            account: resp.account().unwrap_or_default().to_string(),
            arn: resp.arn().unwrap_or_default().to_string(),
        })
    }
}
