//! ECS implementation of the binding engine's [`Transport`].

use crate::client::AwsClient;
use crate::config::SdkConfig;
use crate::error::AwsResult;
use async_trait::async_trait;
use ecsctl_binding::{Transport, TransportError};

pub const SERVICE: &str = "ecs";
pub const TARGET_PREFIX: &str = "AmazonEC2ContainerServiceV20141113";

/// Sends ECS operations over the JSON 1.1 protocol.
#[derive(Debug, Clone)]
pub struct EcsTransport {
    client: AwsClient,
}

impl EcsTransport {
    pub fn new(config: &SdkConfig) -> AwsResult<Self> {
        Ok(Self {
            client: AwsClient::new(config)?,
        })
    }

    fn target(operation: &str) -> String {
        format!("{}.{}", TARGET_PREFIX, operation)
    }
}

#[async_trait]
impl Transport for EcsTransport {
    fn endpoint(&self) -> String {
        self.client.endpoint(SERVICE)
    }

    async fn send(&self, operation: &str, body: String) -> Result<String, TransportError> {
        match self
            .client
            .json_request(SERVICE, &Self::target(operation), &body)
            .await
        {
            Ok(response) => Ok(response.body),
            Err(e) if e.is_name_resolution() => Err(TransportError::NameResolution {
                endpoint: self.endpoint(),
                source: Box::new(e.with_action(operation)),
            }),
            Err(e) => Err(TransportError::Remote(Box::new(e.with_action(operation)))),
        }
    }
}
