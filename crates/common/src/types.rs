//! Core types for the cloud.ca API

use serde::{Deserialize, Serialize};

/// Network ACL attached to a VPC
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkAcl {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub vpc_id: String,
}

/// Public IP address acquired for a VPC
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicIp {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ip_address: String,
    pub vpc_id: String,
    /// Network the address is currently bound to, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub purposes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub instances: Vec<InstanceRef>,
}

/// Instance reference embedded in public IP records
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceRef {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Service connection registered with the organization
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceConnection {
    pub id: String,
    pub service_code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub service_type: String,
}

/// Environment scoped to a service connection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub service_connection: ServiceConnectionRef,
}

/// Minimal service connection reference carried by an environment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceConnectionRef {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub service_code: String,
}

/// Single error entry of an API response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorEntry {
    #[serde(default, alias = "errorCode")]
    pub code: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub context: Option<serde_json::Value>,
}

/// Envelope wrapping every cloud.ca API response
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<ApiErrorEntry>,
}
