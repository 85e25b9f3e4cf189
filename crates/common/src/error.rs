//! Error types for the cloud.ca client

use thiserror::Error;

use crate::types::ApiErrorEntry;

/// Result type alias using the cloud.ca Error
pub type Result<T> = std::result::Result<T, Error>;

/// cloud.ca error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("cloud.ca API returned status {status}: {}", summarize(.errors))]
    Api { status: u16, errors: Vec<ApiErrorEntry> },

    #[error("Resource not found: {kind} with id {id}")]
    NotFound { kind: String, id: String },

    #[error("Unknown service code: {0}")]
    UnknownService(String),

    #[error("Unknown environment {environment} for service {service_code}")]
    UnknownEnvironment {
        service_code: String,
        environment: String,
    },

    #[error("Unsupported service type {service_type} for service {service_code}")]
    UnsupportedServiceType {
        service_code: String,
        service_type: String,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Malformed API response: {0}")]
    MalformedResponse(String),
}

impl Error {
    /// True when the remote side reported that the resource does not exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::NotFound { .. } => true,
            Error::Api { status, .. } => *status == 404,
            _ => false,
        }
    }

    /// HTTP status of an API failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::NotFound { .. } => Some(404),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

fn summarize(errors: &[ApiErrorEntry]) -> String {
    if errors.is_empty() {
        return "no error details".to_string();
    }
    errors
        .iter()
        .map(|e| match &e.code {
            Some(code) => format!("[{}] {}", code, e.message),
            None => e.message.clone(),
        })
        .collect::<Vec<_>>()
        .join("; ")
}
