//! Typed resource services scoped to one service/environment pair

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::api::ApiClient;
use crate::error::{Error, Result};
use crate::types::{NetworkAcl, PublicIp};

/// Network ACL operations
#[async_trait]
pub trait NetworkAclService: Send + Sync {
    async fn get(&self, id: &str) -> Result<NetworkAcl>;

    async fn create(&self, acl: &NetworkAcl) -> Result<NetworkAcl>;

    async fn delete(&self, id: &str) -> Result<bool>;
}

/// Public IP operations
///
/// cloud.ca names the lifecycle of an address acquire/release; those are
/// aliases of create/delete.
#[async_trait]
pub trait PublicIpService: Send + Sync {
    async fn get(&self, id: &str) -> Result<PublicIp>;

    async fn create(&self, ip: &PublicIp) -> Result<PublicIp>;

    async fn delete(&self, id: &str) -> Result<bool>;

    async fn acquire(&self, ip: &PublicIp) -> Result<PublicIp> {
        self.create(ip).await
    }

    async fn release(&self, id: &str) -> Result<bool> {
        self.delete(id).await
    }
}

/// CRUD over one entity collection under `services/<code>/<env>/<entity>`
#[derive(Debug, Clone)]
pub struct EntityService {
    api: Arc<ApiClient>,
    root: String,
    kind: &'static str,
}

impl EntityService {
    pub fn new(
        api: Arc<ApiClient>,
        service_code: &str,
        environment_name: &str,
        entity: &str,
        kind: &'static str,
    ) -> Self {
        Self {
            api,
            root: format!("services/{}/{}/{}", service_code, environment_name, entity),
            kind,
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, id: &str) -> Result<T> {
        self.api
            .get(&format!("{}/{}", self.root, id))
            .await
            .map_err(|e| self.not_found(e, id))
    }

    pub async fn create<B: Serialize + Sync, T: DeserializeOwned>(&self, body: &B) -> Result<T> {
        self.api.post(&self.root, body).await
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        self.api
            .delete(&format!("{}/{}", self.root, id))
            .await
            .map_err(|e| self.not_found(e, id))?;
        Ok(true)
    }

    fn not_found(&self, err: Error, id: &str) -> Error {
        if err.is_not_found() {
            Error::NotFound {
                kind: self.kind.to_string(),
                id: id.to_string(),
            }
        } else {
            err
        }
    }
}

/// HTTP-backed network ACL service
#[derive(Debug, Clone)]
pub struct HttpNetworkAclService {
    entity: EntityService,
}

impl HttpNetworkAclService {
    pub fn new(api: Arc<ApiClient>, service_code: &str, environment_name: &str) -> Self {
        Self {
            entity: EntityService::new(
                api,
                service_code,
                environment_name,
                "networkacls",
                "network ACL",
            ),
        }
    }
}

#[async_trait]
impl NetworkAclService for HttpNetworkAclService {
    async fn get(&self, id: &str) -> Result<NetworkAcl> {
        self.entity.get(id).await
    }

    async fn create(&self, acl: &NetworkAcl) -> Result<NetworkAcl> {
        self.entity.create(acl).await
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        self.entity.delete(id).await
    }
}

/// HTTP-backed public IP service
#[derive(Debug, Clone)]
pub struct HttpPublicIpService {
    entity: EntityService,
}

impl HttpPublicIpService {
    pub fn new(api: Arc<ApiClient>, service_code: &str, environment_name: &str) -> Self {
        Self {
            entity: EntityService::new(
                api,
                service_code,
                environment_name,
                "publicipaddresses",
                "public IP",
            ),
        }
    }
}

#[async_trait]
impl PublicIpService for HttpPublicIpService {
    async fn get(&self, id: &str) -> Result<PublicIp> {
        self.entity.get(id).await
    }

    async fn create(&self, ip: &PublicIp) -> Result<PublicIp> {
        self.entity.create(ip).await
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        self.entity.delete(id).await
    }
}
