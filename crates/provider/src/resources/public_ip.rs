//! Public IP Resource handler for Terraform

use anyhow::{anyhow, Result};
use tracing::{info, warn};

use cloudca_common::PublicIp;

use crate::context::ProviderContext;
use crate::schema::{self, Schema};
use crate::state::{require_string_attr, string_value, DynamicValue, ID_ATTR};
use super::Resource;

pub struct PublicIpResource;

#[async_trait::async_trait]
impl Resource for PublicIpResource {
    fn type_name() -> &'static str {
        "cloudca_public_ip"
    }

    fn schema() -> Schema {
        schema::public_ip_schema()
    }

    async fn create(ctx: &ProviderContext, config: &DynamicValue) -> Result<DynamicValue> {
        let request = PublicIp {
            vpc_id: require_string_attr(config, "vpc_id")?,
            ..Default::default()
        };
        let resources = ctx.resources_for(config).await?;

        let acquired = resources
            .public_ips
            .acquire(&request)
            .await
            .map_err(|e| anyhow!("Error acquiring the new public ip: {}", e))?;
        info!("Acquired public IP {} in VPC {}", acquired.id, request.vpc_id);

        let state = config.with_attr(ID_ATTR, string_value(acquired.id));
        Self::read(ctx, &state).await
    }

    async fn read(ctx: &ProviderContext, state: &DynamicValue) -> Result<DynamicValue> {
        let id = state.id();
        if id.is_empty() {
            return Ok(state.cleared());
        }
        let resources = ctx.resources_for(state).await?;

        let ip = match resources.public_ips.get(&id).await {
            Ok(ip) => ip,
            Err(e) if e.is_not_found() => {
                warn!("Public IP with id='{}' was not found", id);
                return Ok(state.cleared());
            }
            Err(e) => return Err(e.into()),
        };

        Ok(state
            .with_attr("vpc_id", string_value(ip.vpc_id))
            .with_attr("ip_address", string_value(ip.ip_address)))
    }

    async fn delete(ctx: &ProviderContext, state: &DynamicValue) -> Result<()> {
        let id = state.id();
        if id.is_empty() {
            return Ok(());
        }
        let resources = ctx.resources_for(state).await?;

        match resources.public_ips.release(&id).await {
            Ok(_) => {
                info!("Released public IP {}", id);
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                warn!("Public IP {} already released", id);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}
