//! Terraform State Management
//!
//! Handles encoding and decoding of Terraform state using msgpack.

use std::collections::BTreeMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Attribute holding the resource identifier
pub const ID_ATTR: &str = "id";

/// Dynamic value that can be encoded/decoded from Terraform state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DynamicValue {
    #[default]
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    List(Vec<DynamicValue>),
    Map(BTreeMap<String, DynamicValue>),
}

impl DynamicValue {
    pub fn is_null(&self) -> bool {
        matches!(self, DynamicValue::Null)
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            DynamicValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, DynamicValue>> {
        match self {
            DynamicValue::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&DynamicValue> {
        self.as_map()?.get(key)
    }

    /// Returns a copy with `key` set; a non-map value becomes a single-entry map
    pub fn with_attr(&self, key: &str, value: DynamicValue) -> DynamicValue {
        let mut map = self.as_map().cloned().unwrap_or_default();
        map.insert(key.to_string(), value);
        DynamicValue::Map(map)
    }

    /// Resource identifier, empty when unset
    pub fn id(&self) -> String {
        get_string_attr(self, ID_ATTR)
    }

    /// Returns a copy with the identifier cleared, marking the resource as gone
    pub fn cleared(&self) -> DynamicValue {
        self.with_attr(ID_ATTR, string_value(""))
    }
}

/// Attribute lookup failures
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AttributeError {
    #[error("missing required attribute \"{0}\"")]
    Missing(String),
}

/// Wire encoding of state and configuration documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum StateFormat {
    /// JSON text
    #[default]
    Json,
    /// MessagePack, as Terraform encodes DynamicValue
    Msgpack,
}

impl StateFormat {
    pub fn decode(self, data: &[u8]) -> Result<DynamicValue> {
        match self {
            StateFormat::Json if data.iter().all(u8::is_ascii_whitespace) => Ok(DynamicValue::Null),
            StateFormat::Json => Ok(serde_json::from_slice(data)?),
            StateFormat::Msgpack => decode_dynamic_value(data),
        }
    }

    pub fn encode(self, value: &DynamicValue) -> Result<Vec<u8>> {
        match self {
            StateFormat::Json => {
                let mut bytes = serde_json::to_vec_pretty(value)?;
                bytes.push(b'\n');
                Ok(bytes)
            }
            StateFormat::Msgpack => encode_dynamic_value(value),
        }
    }
}

/// Decode a Terraform DynamicValue from msgpack bytes
pub fn decode_dynamic_value(data: &[u8]) -> Result<DynamicValue> {
    if data.is_empty() {
        return Ok(DynamicValue::Null);
    }
    Ok(rmp_serde::from_slice(data)?)
}

/// Encode a value to Terraform DynamicValue bytes
pub fn encode_dynamic_value(value: &DynamicValue) -> Result<Vec<u8>> {
    Ok(rmp_serde::to_vec(value)?)
}

/// Helper to extract a string attribute from a DynamicValue
pub fn get_string_attr(value: &DynamicValue, key: &str) -> String {
    value.get(key)
        .and_then(|v| v.as_string())
        .unwrap_or("")
        .to_string()
}

/// Helper to extract an optional string attribute from a DynamicValue
pub fn get_optional_string_attr(value: &DynamicValue, key: &str) -> Option<String> {
    value.get(key)
        .and_then(|v| match v {
            DynamicValue::String(s) if !s.is_empty() => Some(s.clone()),
            _ => None,
        })
}

/// Helper to extract a string attribute that must be present and non-empty
pub fn require_string_attr(value: &DynamicValue, key: &str) -> Result<String, AttributeError> {
    get_optional_string_attr(value, key).ok_or_else(|| AttributeError::Missing(key.to_string()))
}

/// Create a DynamicValue map with the given attributes
pub fn make_state(attrs: Vec<(&str, DynamicValue)>) -> DynamicValue {
    let map = attrs
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect();
    DynamicValue::Map(map)
}

/// Create a string DynamicValue
pub fn string_value(s: impl Into<String>) -> DynamicValue {
    DynamicValue::String(s.into())
}

/// Create a null DynamicValue
pub fn null_value() -> DynamicValue {
    DynamicValue::Null
}
