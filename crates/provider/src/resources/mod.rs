//! Resource Implementations
//!
//! Implements the create/read/delete lifecycle for each resource type.
//! There is no update: every input attribute forces a new resource.

pub mod network_acl;
pub mod public_ip;

use anyhow::Result;
use crate::context::ProviderContext;
use crate::schema::Schema;
use crate::state::DynamicValue;

/// Trait for resource operations
#[async_trait::async_trait]
pub trait Resource {
    /// Resource type name
    fn type_name() -> &'static str;

    /// Attribute schema
    fn schema() -> Schema;

    /// Create a new resource and return its refreshed state
    async fn create(ctx: &ProviderContext, config: &DynamicValue) -> Result<DynamicValue>;

    /// Read an existing resource; a vanished resource comes back with an empty `id`
    async fn read(ctx: &ProviderContext, state: &DynamicValue) -> Result<DynamicValue>;

    /// Delete a resource; deleting one that no longer exists succeeds
    async fn delete(ctx: &ProviderContext, state: &DynamicValue) -> Result<()>;
}

