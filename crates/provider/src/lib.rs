//! cloud.ca Terraform Provider
//!
//! This crate implements the cloud.ca resources (network ACLs and public
//! IPs) on top of the `cloudca-common` API client.

pub mod config;
pub mod context;
pub mod provider;
pub mod resources;
pub mod schema;
pub mod state;

pub use config::ProviderConfig;
pub use context::ProviderContext;
pub use provider::{CloudcaProvider, Diagnostic, PlanResult, ProviderSchema};
pub use state::DynamicValue;
