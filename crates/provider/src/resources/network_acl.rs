//! Network ACL Resource handler for Terraform

use anyhow::{anyhow, Result};
use tracing::{info, warn};

use cloudca_common::NetworkAcl;

use crate::context::ProviderContext;
use crate::schema::{self, Schema};
use crate::state::{require_string_attr, string_value, DynamicValue, ID_ATTR};
use super::Resource;

pub struct NetworkAclResource;

#[async_trait::async_trait]
impl Resource for NetworkAclResource {
    fn type_name() -> &'static str {
        "cloudca_network_acl"
    }

    fn schema() -> Schema {
        schema::network_acl_schema()
    }

    async fn create(ctx: &ProviderContext, config: &DynamicValue) -> Result<DynamicValue> {
        let acl = NetworkAcl {
            id: String::new(),
            name: require_string_attr(config, "name")?,
            description: require_string_attr(config, "description")?,
            vpc_id: require_string_attr(config, "vpc_id")?,
        };
        let resources = ctx.resources_for(config).await?;

        let created = resources
            .network_acls
            .create(&acl)
            .await
            .map_err(|e| anyhow!("Error creating the new network ACL {}: {}", acl.name, e))?;
        info!("Created network ACL {} ({})", acl.name, created.id);

        let state = config.with_attr(ID_ATTR, string_value(created.id));
        Self::read(ctx, &state).await
    }

    async fn read(ctx: &ProviderContext, state: &DynamicValue) -> Result<DynamicValue> {
        let id = state.id();
        if id.is_empty() {
            return Ok(state.cleared());
        }
        let resources = ctx.resources_for(state).await?;

        let acl = match resources.network_acls.get(&id).await {
            Ok(acl) => acl,
            Err(e) if e.is_not_found() => {
                warn!("Network ACL {} not found, removing from state", id);
                return Ok(state.cleared());
            }
            Err(e) => return Err(e.into()),
        };

        Ok(state
            .with_attr("name", string_value(acl.name))
            .with_attr("description", string_value(acl.description))
            .with_attr("vpc_id", string_value(acl.vpc_id)))
    }

    async fn delete(ctx: &ProviderContext, state: &DynamicValue) -> Result<()> {
        let id = state.id();
        if id.is_empty() {
            return Ok(());
        }
        let resources = ctx.resources_for(state).await?;

        match resources.network_acls.delete(&id).await {
            Ok(_) => {
                info!("Deleted network ACL {}", id);
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                warn!("Network ACL {} already gone", id);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}
