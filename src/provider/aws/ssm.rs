//! SSM Parameter Store backend.

use super::sdk_error;
use crate::error::Result;
use crate::provider::ParameterStore;
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_ssm::Client;

pub struct SsmBackend {
    client: Client,
}

impl SsmBackend {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: Client::new(config),
        }
    }
}

#[async_trait]
impl ParameterStore for SsmBackend {
    async fn get_parameter(&self, name: &str) -> Result<Option<String>> {
        let resp = match self.client.get_parameter().name(name).send().await {
            Ok(resp) => resp,
            Err(err)
                if err
                    .as_service_error()
                    .map(|e| e.is_parameter_not_found())
                    .unwrap_or(false) =>
            {
                return Ok(None)
            }
            Err(err) => return Err(sdk_error("GetParameter")(err)),
        };

        Ok(resp
            .parameter()
            .and_then(|p| p.value())
            .filter(|v| !v.is_empty())
            .map(str::to_string))
    }
}
