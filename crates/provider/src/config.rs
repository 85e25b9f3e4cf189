//! Provider configuration

use serde::{Deserialize, Serialize};

use cloudca_common::{Error, Result, DEFAULT_API_URL};

use crate::state::{get_optional_string_attr, DynamicValue};

pub const API_URL_ENV: &str = "CLOUDCA_API_URL";
pub const API_KEY_ENV: &str = "CLOUDCA_API_KEY";

/// Settings from the `provider "cloudca"` block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// cloud.ca API endpoint
    pub api_url: String,

    /// API key sent with every request
    #[serde(skip_serializing)]
    pub api_key: String,
}

impl ProviderConfig {
    /// Build from the provider block, falling back to the process environment
    pub fn from_value(value: &DynamicValue) -> Result<Self> {
        Self::from_value_with_env(value, |key| std::env::var(key).ok())
    }

    pub fn from_value_with_env(
        value: &DynamicValue,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let lookup = |attr: &str, var: &str| {
            get_optional_string_attr(value, attr).or_else(|| env(var).filter(|v| !v.is_empty()))
        };

        let api_url = lookup("api_url", API_URL_ENV).unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_key = lookup("api_key", API_KEY_ENV).ok_or_else(|| {
            Error::InvalidConfig(format!("api_key must be set in the provider block or {}", API_KEY_ENV))
        })?;

        Ok(Self { api_url, api_key })
    }
}
