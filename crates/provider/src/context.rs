//! Configured provider context handed to every resource operation

use std::sync::Arc;

use cloudca_common::{CcaClient, ResourceLocator, Resources, Result};

use crate::config::ProviderConfig;
use crate::state::{require_string_attr, DynamicValue};

#[derive(Clone)]
pub struct ProviderContext {
    locator: Arc<dyn ResourceLocator>,
}

impl ProviderContext {
    pub fn new(locator: Arc<dyn ResourceLocator>) -> Self {
        Self { locator }
    }

    /// Context backed by the cloud.ca HTTP API
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        let client = CcaClient::new(&config.api_url, &config.api_key)?;
        Ok(Self::new(Arc::new(client)))
    }

    /// Resolve the typed services for the service/environment named in `state`
    pub async fn resources_for(&self, state: &DynamicValue) -> anyhow::Result<Resources> {
        let service_code = require_string_attr(state, "service_code")?;
        let environment_name = require_string_attr(state, "environment_name")?;
        Ok(self.locator.resources(&service_code, &environment_name).await?)
    }
}
