//! Resource and provider schemas

use std::collections::BTreeMap;

use serde::Serialize;

/// Attribute value type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    String,
}

/// Single schema attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    #[serde(rename = "type")]
    pub kind: AttributeType,
    pub description: &'static str,
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    pub force_new: bool,
    pub sensitive: bool,
}

impl Attribute {
    /// Required string that forces a new resource when changed
    pub fn required_force_new(description: &'static str) -> Self {
        Self {
            kind: AttributeType::String,
            description,
            required: true,
            optional: false,
            computed: false,
            force_new: true,
            sensitive: false,
        }
    }

    pub fn optional(description: &'static str) -> Self {
        Self {
            required: false,
            optional: true,
            force_new: false,
            ..Self::required_force_new(description)
        }
    }

    pub fn computed(description: &'static str) -> Self {
        Self {
            required: false,
            computed: true,
            force_new: false,
            ..Self::required_force_new(description)
        }
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }
}

/// Schema of a resource or of the provider block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schema {
    pub version: i64,
    pub attributes: BTreeMap<&'static str, Attribute>,
}

impl Schema {
    pub fn new(attributes: Vec<(&'static str, Attribute)>) -> Self {
        Self {
            version: 0,
            attributes: attributes.into_iter().collect(),
        }
    }

    /// Resource schema; adds the computed `id` attribute
    pub fn resource(attributes: Vec<(&'static str, Attribute)>) -> Self {
        let mut schema = Self::new(attributes);
        schema
            .attributes
            .insert("id", Attribute::computed("Identifier assigned by cloud.ca"));
        schema
    }

    pub fn required(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.attributes
            .iter()
            .filter(|(_, attr)| attr.required)
            .map(|(name, _)| *name)
    }

    pub fn force_new(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.attributes
            .iter()
            .filter(|(_, attr)| attr.force_new)
            .map(|(name, _)| *name)
    }

    pub fn computed(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.attributes
            .iter()
            .filter(|(_, attr)| attr.computed)
            .map(|(name, _)| *name)
    }
}

/// Provider block schema
pub fn provider_schema() -> Schema {
    Schema::new(vec![
        (
            "api_url",
            Attribute::optional("cloud.ca API URL; defaults to CLOUDCA_API_URL or the public endpoint"),
        ),
        (
            "api_key",
            Attribute::optional("cloud.ca API key; defaults to CLOUDCA_API_KEY").sensitive(),
        ),
    ])
}

pub fn network_acl_schema() -> Schema {
    Schema::resource(vec![
        ("service_code", Attribute::required_force_new("A cloudca service code")),
        (
            "environment_name",
            Attribute::required_force_new("Name of environment where the network ACL should be created"),
        ),
        ("name", Attribute::required_force_new("Name of network ACL")),
        ("description", Attribute::required_force_new("Description of network ACL")),
        ("vpc_id", Attribute::required_force_new("Id of the VPC")),
    ])
}

pub fn public_ip_schema() -> Schema {
    Schema::resource(vec![
        ("service_code", Attribute::required_force_new("A cloudca service code")),
        (
            "environment_name",
            Attribute::required_force_new("Name of environment where the public IP should be created"),
        ),
        ("vpc_id", Attribute::required_force_new("Id of the VPC")),
        ("ip_address", Attribute::computed("Public IP address acquired for the VPC")),
    ])
}
