//! # HTTP Client Utilities
//!
//! Shared HTTP client for source adapters.
//!
//! This module provides a reusable HTTP client wrapper with:
//! - A bounded per-request deadline
//! - JSON deserialization
//! - Classification of failures into [`SourceError`] kinds
//!
//! # Examples
//!
//! ```ignore
//! use product_aggregator::infrastructure::sources::http_client::HttpClient;
//!
//! let client = HttpClient::new(2000)?;
//! let products: Vec<Product> = client
//!     .get_with_params(&source_id, "http://test-server.com/products", &params)
//!     .await?;
//! ```

use crate::domain::value_objects::SourceId;
use crate::infrastructure::sources::error::{MAX_BODY_EXCERPT, SourceError, SourceResult};
use reqwest::{Client, IntoUrl, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// HTTP client wrapper for source adapters.
///
/// Cloning is cheap; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    timeout_ms: u64,
}

impl HttpClient {
    /// Creates a new HTTP client whose requests expire after `timeout_ms`.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::Unavailable` tagged with an empty source id if the
    /// underlying client cannot be built (e.g. TLS backend failure).
    pub fn new(timeout_ms: u64) -> SourceResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| {
                SourceError::unavailable(
                    SourceId::default(),
                    format!("failed to create HTTP client: {e}"),
                )
            })?;

        Ok(Self { client, timeout_ms })
    }

    /// Returns the configured timeout in milliseconds.
    #[inline]
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Makes a GET request and deserializes the JSON response.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::Unavailable` if the request fails or times out,
    /// `SourceError::BadStatus` on a non-2xx status and `SourceError::Decode`
    /// if the body does not deserialize into `T`.
    pub async fn get<T: DeserializeOwned>(
        &self,
        source_id: &SourceId,
        url: impl IntoUrl,
    ) -> SourceResult<T> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(source_id, &e))?;

        self.handle_response(source_id, response).await
    }

    /// Makes a GET request with query parameters and deserializes the JSON
    /// response.
    ///
    /// # Errors
    ///
    /// Same as [`HttpClient::get`].
    pub async fn get_with_params<T: DeserializeOwned, P: serde::Serialize + ?Sized>(
        &self,
        source_id: &SourceId,
        url: impl IntoUrl,
        params: &P,
    ) -> SourceResult<T> {
        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(source_id, &e))?;

        self.handle_response(source_id, response).await
    }

    /// Checks the status and decodes the body.
    ///
    /// The body is read in full before decoding so that a transport failure
    /// mid-body stays `Unavailable` and only a shape mismatch is `Decode`.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        source_id: &SourceId,
        response: Response,
    ) -> SourceResult<T> {
        let status = response.status();

        if !status.is_success() {
            let error_body = read_excerpt(response).await;
            return Err(SourceError::bad_status(
                source_id.clone(),
                status.as_u16(),
                error_body,
            ));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| self.map_reqwest_error(source_id, &e))?;

        serde_json::from_slice(&body).map_err(|e| {
            SourceError::decode(source_id.clone(), format!("failed to parse response: {e}"))
        })
    }

    fn map_reqwest_error(&self, source_id: &SourceId, error: &reqwest::Error) -> SourceError {
        if error.is_timeout() {
            SourceError::timeout(source_id.clone(), self.timeout_ms)
        } else if error.is_connect() {
            SourceError::unavailable(source_id.clone(), format!("connection failed: {error}"))
        } else {
            SourceError::unavailable(source_id.clone(), format!("HTTP request failed: {error}"))
        }
    }
}

/// Reads at most a little over [`MAX_BODY_EXCERPT`] bytes of an error body.
async fn read_excerpt(mut response: Response) -> String {
    let mut body = Vec::new();
    while body.len() <= MAX_BODY_EXCERPT {
        match response.chunk().await {
            Ok(Some(chunk)) => body.extend_from_slice(&chunk),
            Ok(None) | Err(_) => break,
        }
    }
    body.truncate(MAX_BODY_EXCERPT + 1);
    String::from_utf8_lossy(&body).into_owned()
}
