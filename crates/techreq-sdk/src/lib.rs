//! # Techreq SDK - The Kit
//!
//! Async client for the technical-requirements REST backend.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use techreq_sdk::TechReqClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), techreq_sdk::Error> {
//!     let client = TechReqClient::new("http://localhost:8080");
//!
//!     let products = client.list_products().await?;
//!     println!("{} products on the server", products.len());
//!
//!     let sets = client.list_sets().await?;
//!     println!("{} sets on the server", sets.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Endpoints
//!
//! ```text
//! GET    /technical-requirements/products
//! POST   /technical-requirements/products
//! PUT    /technical-requirements/products/{id}
//! DELETE /technical-requirements/products/{id}
//! GET    /technical-requirements/sets
//! POST   /technical-requirements/sets
//! PUT    /technical-requirements/sets/{id}
//! DELETE /technical-requirements/sets/{id}
//! GET    /technical-requirements/products/{id}/indicators
//! POST   /technical-requirements/products/{id}/indicators
//! DELETE /technical-requirements/products/{id}/indicators
//! GET    /technical-requirements/products/{id}/characteristics
//! PUT    /technical-requirements/products/{id}/characteristics
//! ```

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error};

use techreq_core::{
    Characteristic, Indicator, IndicatorDraft, IndicatorId, Product, ProductId, ProductSet, SetId,
};

/// Path prefix of every endpoint.
pub const BASE_PATH: &str = "/technical-requirements";

/// Request timeout used unless the caller picks another one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

// =============================================================================
// ERROR TYPE
// =============================================================================

/// Errors from the techreq SDK.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed (connection, timeout, body decoding).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Server answered with a non-success status.
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Client configuration was rejected before any request was sent.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// HTTP status of a server-side failure, if that is what this is.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Server { status, .. } => Some(*status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the server reported the resource as missing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND.as_u16())
    }
}

// =============================================================================
// REQUEST BODIES
// =============================================================================

/// Body of `POST /products/{id}/indicators`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddIndicatorsRequest {
    pub indicators: Vec<IndicatorDraft>,
}

/// Body of `DELETE /products/{id}/indicators`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteIndicatorsRequest {
    pub indicator_ids: Vec<IndicatorId>,
}

/// Body of `PUT /products/{id}/characteristics`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetCharacteristicsRequest {
    pub characteristics: Vec<Characteristic>,
}

// =============================================================================
// CLIENT
// =============================================================================

/// HTTP client for the technical-requirements backend.
#[derive(Debug, Clone)]
pub struct TechReqClient {
    base_url: String,
    client: reqwest::Client,
}

impl TechReqClient {
    /// Create a client for the server at `base_url` (without the
    /// `/technical-requirements` prefix).
    ///
    /// ```rust,ignore
    /// let client = TechReqClient::new("http://localhost:8080");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base(base_url.into()),
            client: reqwest::Client::builder()
                .timeout(DEFAULT_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }

    /// Create a client with a custom timeout and optional bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the API key contains invalid header
    /// characters, or [`Error::Http`] if the HTTP client fails to build.
    pub fn with_options(
        base_url: impl Into<String>,
        api_key: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, Error> {
        use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};

        let mut headers = HeaderMap::new();
        if let Some(key) = api_key {
            let value = HeaderValue::from_str(&format!("Bearer {}", key))
                .map_err(|e| Error::Config(format!("Invalid API key header: {}", e)))?;
            headers.insert(AUTHORIZATION, value);
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;
        Ok(Self {
            base_url: normalize_base(base_url.into()),
            client,
        })
    }

    /// Server root this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // -------------------------------------------------------------------------
    // Products
    // -------------------------------------------------------------------------

    pub async fn list_products(&self) -> Result<Vec<Product>, Error> {
        self.send_json(self.request(Method::GET, "/products")).await
    }

    pub async fn create_product(&self, product: &Product) -> Result<Product, Error> {
        self.send_json(self.request(Method::POST, "/products").json(product))
            .await
    }

    pub async fn update_product(&self, product: &Product) -> Result<Product, Error> {
        let path = format!("/products/{}", product.id);
        self.send_json(self.request(Method::PUT, &path).json(product))
            .await
    }

    pub async fn delete_product(&self, id: &ProductId) -> Result<(), Error> {
        let path = format!("/products/{}", id);
        self.send_empty(self.request(Method::DELETE, &path)).await
    }

    // -------------------------------------------------------------------------
    // Sets
    // -------------------------------------------------------------------------

    pub async fn list_sets(&self) -> Result<Vec<ProductSet>, Error> {
        self.send_json(self.request(Method::GET, "/sets")).await
    }

    pub async fn create_set(&self, set: &ProductSet) -> Result<ProductSet, Error> {
        self.send_json(self.request(Method::POST, "/sets").json(set))
            .await
    }

    pub async fn update_set(&self, set: &ProductSet) -> Result<ProductSet, Error> {
        let path = format!("/sets/{}", set.id);
        self.send_json(self.request(Method::PUT, &path).json(set))
            .await
    }

    pub async fn delete_set(&self, id: &SetId) -> Result<(), Error> {
        let path = format!("/sets/{}", id);
        self.send_empty(self.request(Method::DELETE, &path)).await
    }

    // -------------------------------------------------------------------------
    // Indicators and characteristics
    // -------------------------------------------------------------------------

    pub async fn list_indicators(&self, product: &ProductId) -> Result<Vec<Indicator>, Error> {
        let path = format!("/products/{}/indicators", product);
        self.send_json(self.request(Method::GET, &path)).await
    }

    /// Upload new indicators. The server answers with the stored indicators.
    pub async fn add_indicators(
        &self,
        product: &ProductId,
        indicators: Vec<IndicatorDraft>,
    ) -> Result<Vec<Indicator>, Error> {
        let path = format!("/products/{}/indicators", product);
        let body = AddIndicatorsRequest { indicators };
        self.send_json(self.request(Method::POST, &path).json(&body))
            .await
    }

    pub async fn delete_indicators(
        &self,
        product: &ProductId,
        indicator_ids: Vec<IndicatorId>,
    ) -> Result<(), Error> {
        let path = format!("/products/{}/indicators", product);
        let body = DeleteIndicatorsRequest { indicator_ids };
        self.send_empty(self.request(Method::DELETE, &path).json(&body))
            .await
    }

    pub async fn get_characteristics(
        &self,
        product: &ProductId,
    ) -> Result<Vec<Characteristic>, Error> {
        let path = format!("/products/{}/characteristics", product);
        self.send_json(self.request(Method::GET, &path)).await
    }

    pub async fn set_characteristics(
        &self,
        product: &ProductId,
        characteristics: Vec<Characteristic>,
    ) -> Result<(), Error> {
        let path = format!("/products/{}/characteristics", product);
        let body = SetCharacteristicsRequest { characteristics };
        self.send_empty(self.request(Method::PUT, &path).json(&body))
            .await
    }

    // -------------------------------------------------------------------------
    // Plumbing
    // -------------------------------------------------------------------------

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}{}", self.base_url, BASE_PATH, path);
        debug!(%method, %url, "request");
        self.client.request(method, url)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, Error> {
        let response = checked(request.send().await).await?;
        let bytes = response.bytes().await.map_err(log_transport)?;
        serde_json::from_slice(&bytes).map_err(|e| {
            error!(error = %e, "response body is not the expected JSON");
            Error::Json(e)
        })
    }

    async fn send_empty(&self, request: RequestBuilder) -> Result<(), Error> {
        checked(request.send().await).await.map(|_| ())
    }
}

/// Turn transport failures and non-success statuses into logged errors.
async fn checked(
    sent: Result<reqwest::Response, reqwest::Error>,
) -> Result<reqwest::Response, Error> {
    let response = sent.map_err(log_transport)?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().to_string();
    let message = response.text().await.unwrap_or_default();
    error!(status = status.as_u16(), %url, %message, "server rejected request");
    Err(Error::Server {
        status: status.as_u16(),
        message,
    })
}

fn log_transport(e: reqwest::Error) -> Error {
    error!(error = %e, "transport failure");
    Error::Http(e)
}

fn normalize_base(base_url: String) -> String {
    base_url.trim_end_matches('/').to_owned()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = TechReqClient::new("http://localhost:8080/");
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn invalid_api_key_is_rejected() {
        let result = TechReqClient::with_options("http://localhost", Some("bad\nkey"), DEFAULT_TIMEOUT);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn delete_body_uses_camel_case() {
        let body = DeleteIndicatorsRequest {
            indicator_ids: vec![IndicatorId::from("a")],
        };
        let json = serde_json::to_string(&body).unwrap_or_default();
        assert_eq!(json, r#"{"indicatorIds":["a"]}"#);
    }

    #[test]
    fn not_found_is_detected() {
        let err = Error::Server {
            status: 404,
            message: String::new(),
        };
        assert!(err.is_not_found());
        assert!(!Error::Config(String::new()).is_not_found());
    }
}
