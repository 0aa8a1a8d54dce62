//! HTTP wrapper for AI service requests.

use crate::error::{Error, Result, format_api_error};
use reqwest::StatusCode;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Serialize, de::DeserializeOwned};
use std::time::Duration;

/// Header-based authentication (e.g. `x-api-key: {key}`).
#[derive(Clone)]
pub(crate) struct AuthConfig {
    pub(crate) header: String,
    pub(crate) key: String,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("header", &self.header)
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Thin reqwest wrapper that injects auth headers and maps failures into
/// the crate error taxonomy.
#[derive(Debug)]
pub(crate) struct HttpClient {
    client: reqwest::Client,
    base_url: String,
    auth: AuthConfig,
}

impl HttpClient {
    pub(crate) fn new(
        base_url: impl Into<String>,
        auth: AuthConfig,
        timeout: Duration,
        connect_timeout: Duration,
        extra_headers: HeaderMap,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .default_headers(extra_headers)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: base_url.into(),
            auth,
        }
    }

    /// Build per-request headers including authentication.
    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let name = reqwest::header::HeaderName::try_from(self.auth.header.as_str())
            .map_err(|_| Error::Config(format!("invalid auth header name `{}`", self.auth.header)))?;
        let value = HeaderValue::from_str(&self.auth.key)
            .map_err(|_| Error::authentication("API key contains invalid header characters"))?;
        headers.insert(name, value);

        Ok(headers)
    }

    /// POST a JSON body and deserialize the JSON response.
    pub(crate) async fn post_json<T: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<R> {
        let url = format!("{}{path}", self.base_url);
        let headers = self.build_headers()?;

        let response = self
            .client
            .post(&url)
            .headers(headers)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                message: format_api_error(&text),
            });
        }

        serde_json::from_str(&text).map_err(|e| Error::Api {
            status: status.as_u16(),
            message: format!("failed to parse response: {e}"),
        })
    }

    /// GET a path and report only the response status.
    ///
    /// Transport failures surface as errors; any HTTP status, success or
    /// not, is returned to the caller to interpret.
    pub(crate) async fn get_status(&self, path: &str) -> Result<StatusCode> {
        let url = format!("{}{path}", self.base_url);
        let headers = self.build_headers()?;

        let response = self.client.get(&url).headers(headers).send().await?;
        Ok(response.status())
    }
}
