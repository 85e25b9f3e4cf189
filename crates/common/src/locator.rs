//! Service/environment resolution
//!
//! Every resource lives under a service connection and one of its
//! environments. The locator resolves that pair into a set of typed
//! resource services.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::api::ApiClient;
use crate::error::{Error, Result};
use crate::services::{HttpNetworkAclService, HttpPublicIpService, NetworkAclService, PublicIpService};
use crate::types::{Environment, ServiceConnection};

const CLOUDCA_SERVICE_TYPE: &str = "cloudca";

/// Typed resource services for one service/environment pair
#[derive(Clone)]
pub struct Resources {
    pub network_acls: Arc<dyn NetworkAclService>,
    pub public_ips: Arc<dyn PublicIpService>,
}

impl std::fmt::Debug for Resources {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resources").finish_non_exhaustive()
    }
}

/// Resolves a service code and environment name into typed services
#[async_trait]
pub trait ResourceLocator: Send + Sync {
    async fn resources(&self, service_code: &str, environment_name: &str) -> Result<Resources>;
}

/// cloud.ca API client
#[derive(Debug, Clone)]
pub struct CcaClient {
    api: Arc<ApiClient>,
}

impl CcaClient {
    pub fn new(api_url: &str, api_key: &str) -> Result<Self> {
        Ok(Self {
            api: Arc::new(ApiClient::new(api_url, api_key)?),
        })
    }

    pub async fn service_connections(&self) -> Result<Vec<ServiceConnection>> {
        self.api.get("services/connections").await
    }

    pub async fn environments(&self) -> Result<Vec<Environment>> {
        self.api.get("environments").await
    }

    async fn find_service_connection(&self, service_code: &str) -> Result<ServiceConnection> {
        self.service_connections()
            .await?
            .into_iter()
            .find(|c| c.service_code == service_code)
            .ok_or_else(|| Error::UnknownService(service_code.to_string()))
    }

    async fn find_environment(
        &self,
        connection: &ServiceConnection,
        environment_name: &str,
    ) -> Result<Environment> {
        self.environments()
            .await?
            .into_iter()
            .find(|e| e.name == environment_name && e.service_connection.id == connection.id)
            .ok_or_else(|| Error::UnknownEnvironment {
                service_code: connection.service_code.clone(),
                environment: environment_name.to_string(),
            })
    }
}

#[async_trait]
impl ResourceLocator for CcaClient {
    async fn resources(&self, service_code: &str, environment_name: &str) -> Result<Resources> {
        let connection = self.find_service_connection(service_code).await?;

        if !connection.service_type.is_empty()
            && !connection.service_type.eq_ignore_ascii_case(CLOUDCA_SERVICE_TYPE)
        {
            return Err(Error::UnsupportedServiceType {
                service_code: service_code.to_string(),
                service_type: connection.service_type,
            });
        }

        let environment = self.find_environment(&connection, environment_name).await?;
        debug!(
            "Resolved {}/{} to environment {}",
            service_code, environment_name, environment.id
        );

        Ok(Resources {
            network_acls: Arc::new(HttpNetworkAclService::new(
                self.api.clone(),
                service_code,
                environment_name,
            )),
            public_ips: Arc::new(HttpPublicIpService::new(
                self.api.clone(),
                service_code,
                environment_name,
            )),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    async fn directory(server: &MockServer, service_type: &str) {
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v1/services/connections");
                then.status(200).json_body(json!({"data": [
                    {"id": "conn-1", "serviceCode": "compute-on", "name": "Compute ON", "type": service_type},
                    {"id": "conn-2", "serviceCode": "objects", "name": "Objects", "type": "swift"}
                ]}));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v1/environments");
                then.status(200).json_body(json!({"data": [
                    {"id": "env-1", "name": "dev", "serviceConnection": {"id": "conn-1", "serviceCode": "compute-on"}},
                    {"id": "env-2", "name": "prod", "serviceConnection": {"id": "conn-2", "serviceCode": "objects"}}
                ]}));
            })
            .await;
    }

    #[tokio::test]
    async fn test_resolves_service_and_environment() {
        let server = MockServer::start_async().await;
        directory(&server, "CloudCA").await;
        let acl_mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/v1/services/compute-on/dev/networkacls/acl-1");
                then.status(200).json_body(json!({
                    "data": {"id": "acl-1", "name": "web-acl", "description": "allow web", "vpcId": "vpc-1"}
                }));
            })
            .await;

        let client = CcaClient::new(&server.url("/v1"), "secret").unwrap();
        let resources = client.resources("compute-on", "dev").await.unwrap();
        let acl = resources.network_acls.get("acl-1").await.unwrap();

        acl_mock.assert_async().await;
        assert_eq!(acl.vpc_id, "vpc-1");
    }

    #[tokio::test]
    async fn test_unknown_service_code() {
        let server = MockServer::start_async().await;
        directory(&server, "cloudca").await;

        let client = CcaClient::new(&server.url("/v1"), "secret").unwrap();
        let err = client.resources("nope", "dev").await.unwrap_err();
        assert!(matches!(err, Error::UnknownService(ref code) if code == "nope"));
    }

    #[tokio::test]
    async fn test_environment_must_belong_to_service() {
        let server = MockServer::start_async().await;
        directory(&server, "cloudca").await;

        let client = CcaClient::new(&server.url("/v1"), "secret").unwrap();
        let err = client.resources("compute-on", "prod").await.unwrap_err();
        assert!(matches!(err, Error::UnknownEnvironment { .. }));
    }

    #[tokio::test]
    async fn test_non_cloudca_service_rejected() {
        let server = MockServer::start_async().await;
        directory(&server, "cloudca").await;

        let client = CcaClient::new(&server.url("/v1"), "secret").unwrap();
        let err = client.resources("objects", "prod").await.unwrap_err();
        assert!(matches!(err, Error::UnsupportedServiceType { .. }));
    }
}
