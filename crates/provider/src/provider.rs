//! cloud.ca Terraform Provider Implementation
//!
//! Dispatches provider operations to the resource handlers.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{anyhow, bail, Result};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

use cloudca_common::ResourceLocator;

use crate::config::ProviderConfig;
use crate::context::ProviderContext;
use crate::resources::{network_acl::NetworkAclResource, public_ip::PublicIpResource, Resource};
use crate::schema::{self, Schema};
use crate::state::{get_optional_string_attr, make_state, string_value, DynamicValue, ID_ATTR};

/// Error reported back to Terraform
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub summary: String,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
}

impl Diagnostic {
    pub fn error(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            detail: detail.into(),
            attribute: None,
        }
    }

    pub fn with_attribute(mut self, attribute: &str) -> Self {
        self.attribute = Some(attribute.to_string());
        self
    }
}

/// Full provider schema
#[derive(Debug, Clone, Serialize)]
pub struct ProviderSchema {
    pub provider: Schema,
    pub resource_schemas: BTreeMap<&'static str, Schema>,
}

/// Outcome of planning a resource change
#[derive(Debug, Clone, PartialEq)]
pub struct PlanResult {
    pub planned_state: DynamicValue,
    /// Force-new attributes whose value changed
    pub requires_replace: Vec<String>,
}

/// cloud.ca Terraform Provider
#[derive(Clone, Default)]
pub struct CloudcaProvider {
    /// Set once the provider block has been configured
    context: Arc<RwLock<Option<ProviderContext>>>,
}

impl CloudcaProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider that is already configured with the given locator
    pub fn with_locator(locator: Arc<dyn ResourceLocator>) -> Self {
        Self {
            context: Arc::new(RwLock::new(Some(ProviderContext::new(locator)))),
        }
    }

    async fn get_context(&self) -> Result<ProviderContext> {
        self.context
            .read()
            .await
            .clone()
            .ok_or_else(|| anyhow!("provider is not configured"))
    }

    pub fn schema(&self) -> ProviderSchema {
        ProviderSchema {
            provider: schema::provider_schema(),
            resource_schemas: [
                (NetworkAclResource::type_name(), NetworkAclResource::schema()),
                (PublicIpResource::type_name(), PublicIpResource::schema()),
            ]
            .into_iter()
            .collect(),
        }
    }

    fn resource_schema(&self, type_name: &str) -> Result<Schema> {
        match type_name {
            "cloudca_network_acl" => Ok(NetworkAclResource::schema()),
            "cloudca_public_ip" => Ok(PublicIpResource::schema()),
            _ => Err(unknown_type(type_name)),
        }
    }

    pub async fn configure(&self, config: &DynamicValue) -> Vec<Diagnostic> {
        info!("ConfigureProvider called");

        let context = ProviderConfig::from_value(config)
            .and_then(|config| {
                info!("Using cloud.ca API at {}", config.api_url);
                ProviderContext::from_config(&config)
            });

        match context {
            Ok(context) => {
                *self.context.write().await = Some(context);
                vec![]
            }
            Err(e) => {
                error!("Failed to configure provider: {}", e);
                vec![Diagnostic::error("Failed to configure the cloud.ca provider", e.to_string())]
            }
        }
    }

    /// Report required attributes that are missing from `config`
    pub fn validate_resource_config(
        &self,
        type_name: &str,
        config: &DynamicValue,
    ) -> Result<Vec<Diagnostic>> {
        debug!("ValidateResourceConfig called for {}", type_name);

        let schema = self.resource_schema(type_name)?;
        Ok(schema
            .required()
            .filter(|attr| get_optional_string_attr(config, attr).is_none())
            .map(|attr| {
                Diagnostic::error(
                    "Missing required argument",
                    format!("The argument \"{}\" is required, but no definition was found.", attr),
                )
                .with_attribute(attr)
            })
            .collect())
    }

    pub fn plan_resource_change(
        &self,
        type_name: &str,
        prior: &DynamicValue,
        proposed: &DynamicValue,
    ) -> Result<PlanResult> {
        debug!("PlanResourceChange called for {}", type_name);

        let schema = self.resource_schema(type_name)?;

        // Destroy
        if proposed.is_null() {
            return Ok(PlanResult {
                planned_state: DynamicValue::Null,
                requires_replace: vec![],
            });
        }

        // Create
        if prior.is_null() {
            return Ok(PlanResult {
                planned_state: without_computed(&schema, proposed),
                requires_replace: vec![],
            });
        }

        let requires_replace: Vec<String> = schema
            .force_new()
            .filter(|attr| prior.get(attr) != proposed.get(attr))
            .map(str::to_string)
            .collect();

        let planned_state = if requires_replace.is_empty() {
            prior.clone()
        } else {
            without_computed(&schema, proposed)
        };

        Ok(PlanResult {
            planned_state,
            requires_replace,
        })
    }

    pub async fn apply_resource_change(
        &self,
        type_name: &str,
        prior: &DynamicValue,
        planned: &DynamicValue,
    ) -> Result<DynamicValue> {
        info!("ApplyResourceChange called for {}", type_name);

        let ctx = self.get_context().await?;

        match (prior.is_null(), planned.is_null()) {
            // Create
            (true, false) => {
                let state = match type_name {
                    "cloudca_network_acl" => NetworkAclResource::create(&ctx, planned).await?,
                    "cloudca_public_ip" => PublicIpResource::create(&ctx, planned).await?,
                    _ => return Err(unknown_type(type_name)),
                };
                if state.id().is_empty() {
                    bail!("{} disappeared immediately after creation", type_name);
                }
                Ok(state)
            }
            // Delete
            (false, true) => {
                match type_name {
                    "cloudca_network_acl" => NetworkAclResource::delete(&ctx, prior).await?,
                    "cloudca_public_ip" => PublicIpResource::delete(&ctx, prior).await?,
                    _ => return Err(unknown_type(type_name)),
                }
                Ok(DynamicValue::Null)
            }
            // Update
            (false, false) => {
                self.resource_schema(type_name)?;
                bail!(
                    "{} does not support in-place updates; every argument forces a new resource",
                    type_name
                )
            }
            // No change
            (true, true) => Ok(DynamicValue::Null),
        }
    }

    /// Refresh `state`; `None` means the remote resource is gone
    pub async fn read_resource(
        &self,
        type_name: &str,
        state: &DynamicValue,
    ) -> Result<Option<DynamicValue>> {
        info!("ReadResource called for {}", type_name);

        let ctx = self.get_context().await?;

        let new_state = match type_name {
            "cloudca_network_acl" => NetworkAclResource::read(&ctx, state).await?,
            "cloudca_public_ip" => PublicIpResource::read(&ctx, state).await?,
            _ => return Err(unknown_type(type_name)),
        };

        if new_state.id().is_empty() {
            Ok(None)
        } else {
            Ok(Some(new_state))
        }
    }

    /// Import by `<service_code>/<environment_name>/<id>`
    pub async fn import_resource_state(&self, type_name: &str, import_id: &str) -> Result<DynamicValue> {
        info!("ImportResourceState called for {} with ID {}", type_name, import_id);

        let parts: Vec<&str> = import_id.split('/').collect();
        let (service_code, environment_name, id) = match parts.as_slice() {
            [service_code, environment_name, id]
                if !service_code.is_empty() && !environment_name.is_empty() && !id.is_empty() =>
            {
                (*service_code, *environment_name, *id)
            }
            _ => bail!(
                "invalid import id \"{}\", expected <service_code>/<environment_name>/<id>",
                import_id
            ),
        };

        let initial_state = make_state(vec![
            (ID_ATTR, string_value(id)),
            ("service_code", string_value(service_code)),
            ("environment_name", string_value(environment_name)),
        ]);

        self.read_resource(type_name, &initial_state)
            .await?
            .ok_or_else(|| anyhow!("cannot import non-existent remote object {} {}", type_name, id))
    }
}

fn unknown_type(type_name: &str) -> anyhow::Error {
    anyhow!("unknown resource type \"{}\"", type_name)
}

/// Proposed state with computed attributes left for apply to fill in
fn without_computed(schema: &Schema, proposed: &DynamicValue) -> DynamicValue {
    schema
        .computed()
        .fold(proposed.clone(), |state, attr| state.with_attr(attr, DynamicValue::Null))
}
