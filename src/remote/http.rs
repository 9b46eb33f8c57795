//! remote::http
//!
//! HTTP component service implementation over reqwest.
//!
//! # Design
//!
//! Component URIs are scheme-less (`site.test/_components/button`); the
//! service prepends its configured scheme before issuing the request. URIs
//! that already carry a scheme pass through untouched, which is what tests
//! against a local server rely on.
//!
//! Error mapping is uniform across the three fetch kinds:
//! - connection/transport failures become `RemoteError::Network`
//! - 404 becomes `RemoteError::NotFound`
//! - any other non-success status becomes `RemoteError::Api`
//! - a body with the wrong shape becomes `RemoteError::Decode`

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use tracing::debug;

use super::traits::{ComponentService, RemoteError};
use crate::core::types::DataObject;
use crate::schema::Schema;

/// Default scheme prepended to scheme-less URIs.
const DEFAULT_SCHEME: &str = "https";

/// HTTP implementation of the component service.
#[derive(Debug, Clone)]
pub struct HttpComponentService {
    /// HTTP client for making requests
    client: Client,
    /// Scheme prepended to scheme-less URIs
    scheme: String,
}

impl HttpComponentService {
    /// Create a service that fetches over HTTPS.
    pub fn new() -> Self {
        Self::with_scheme(DEFAULT_SCHEME)
    }

    /// Create a service with an explicit scheme (e.g. `http` for local
    /// development servers).
    pub fn with_scheme(scheme: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            scheme: scheme.into(),
        }
    }

    fn request_url(&self, target: &str) -> String {
        if target.starts_with("http://") || target.starts_with("https://") {
            target.to_string()
        } else {
            format!("{}://{}", self.scheme, target)
        }
    }

    fn json_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    async fn get_checked(
        &self,
        target: &str,
        headers: HeaderMap,
    ) -> Result<Response, RemoteError> {
        let url = self.request_url(target);
        debug!(%url, "remote fetch");

        let response = self
            .client
            .get(&url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(RemoteError::NotFound(target.to_string()));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(RemoteError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }

    async fn get_json(&self, target: &str) -> Result<Value, RemoteError> {
        let response = self.get_checked(target, Self::json_headers()).await?;
        response
            .json()
            .await
            .map_err(|e| RemoteError::Decode(e.to_string()))
    }
}

impl Default for HttpComponentService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ComponentService for HttpComponentService {
    async fn fetch_object(&self, uri: &str) -> Result<DataObject, RemoteError> {
        match self.get_json(uri).await? {
            Value::Object(data) => Ok(data),
            _ => Err(RemoteError::Decode(format!(
                "expected a JSON object at {uri}"
            ))),
        }
    }

    async fn fetch_schema(&self, uri: &str) -> Result<Schema, RemoteError> {
        let value = self.get_json(uri).await?;
        Schema::from_value(value)
            .ok_or_else(|| RemoteError::Decode(format!("expected a JSON object at {uri}")))
    }

    async fn fetch_text(&self, path: &str) -> Result<String, RemoteError> {
        let response = self.get_checked(path, HeaderMap::new()).await?;
        response
            .text()
            .await
            .map_err(|e| RemoteError::Decode(e.to_string()))
    }
}
