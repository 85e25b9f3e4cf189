//! cloud.ca Common Library
//!
//! API client, resource records and the service/environment locator shared
//! by the cloud.ca Terraform provider.

pub mod api;
pub mod error;
pub mod locator;
pub mod services;
pub mod types;

// Re-export commonly used types
pub use api::{ApiClient, DEFAULT_API_URL};
pub use error::{Error, Result};
pub use locator::{CcaClient, ResourceLocator, Resources};
pub use services::{NetworkAclService, PublicIpService};
pub use types::*;
