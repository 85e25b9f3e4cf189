//! HTTP client for the cloud.ca REST API

use std::time::Duration;

use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::ApiResponse;

/// Default cloud.ca API endpoint
pub const DEFAULT_API_URL: &str = "https://api.cloud.ca/v1";

const API_KEY_HEADER: &str = "MC-Api-Key";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Low-level client that speaks the cloud.ca response envelope
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::InvalidConfig("api_key must not be empty".to_string()));
        }

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("terraform-provider-cloudca/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET a path and return the envelope's data
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let builder = self.request(Method::GET, path);
        self.execute::<T>(builder)
            .await?
            .ok_or_else(|| Error::MalformedResponse(format!("GET {} returned no data", path)))
    }

    /// POST a JSON body and return the envelope's data
    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let builder = self.request(Method::POST, path).json(body);
        self.execute::<T>(builder)
            .await?
            .ok_or_else(|| Error::MalformedResponse(format!("POST {} returned no data", path)))
    }

    /// DELETE a path; any response body is ignored
    pub async fn delete(&self, path: &str) -> Result<()> {
        let builder = self.request(Method::DELETE, path);
        match self.execute::<serde_json::Value>(builder).await {
            Ok(_) | Err(Error::Serialization(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        debug!("{} {}", method, url);
        self.http
            .request(method, url)
            .header(API_KEY_HEADER, &self.api_key)
    }

    async fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<Option<T>> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        debug!("API response status: {}", status);

        if !status.is_success() {
            let errors = serde_json::from_slice::<ApiResponse<serde_json::Value>>(&body)
                .map(|envelope| envelope.errors)
                .unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                errors,
            });
        }

        if body.is_empty() {
            return Ok(None);
        }

        let envelope: ApiResponse<T> = serde_json::from_slice(&body)?;
        Ok(envelope.data)
    }
}
