//! Client configuration.

use crate::auth::EnvResolver;
use crate::error::{Error, Result};
use std::time::Duration;
use url::Url;

/// Default API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
/// Model used when neither the config nor the environment names one.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

const DEFAULT_MAX_TOKENS: u32 = 4096;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Options recognized when constructing an AI client.
///
/// Unset fields fall back to the environment (`ANTHROPIC_API_URL`,
/// `ANTHROPIC_MODEL`) and then to crate defaults.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL override, e.g. a proxy.
    pub base_url: Option<String>,
    /// Model identifier override.
    pub model: Option<String>,
    /// Token cap for completion requests.
    pub max_tokens: u32,
    /// Overall request timeout.
    pub timeout: Duration,
    /// Connection timeout.
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            model: None,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Set a custom base URL (for proxies or local servers).
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the model identifier.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Validate the configuration at the boundary.
    ///
    /// A configured base URL must parse as an absolute http(s) URL.
    pub fn validate(&self) -> Result<()> {
        if let Some(base_url) = &self.base_url {
            let parsed = Url::parse(base_url)
                .map_err(|e| Error::Config(format!("invalid base URL `{base_url}`: {e}")))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(Error::Config(format!(
                    "base URL `{base_url}` must use http or https"
                )));
            }
        }
        Ok(())
    }

    /// Base URL after merging the environment, trailing slash trimmed.
    #[must_use]
    pub fn resolved_base_url(&self) -> String {
        self.base_url
            .clone()
            .or_else(EnvResolver::api_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string()
    }

    /// Model after merging the environment.
    #[must_use]
    pub fn resolved_model(&self) -> String {
        self.model
            .clone()
            .or_else(EnvResolver::model)
            .unwrap_or_else(|| DEFAULT_MODEL.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(ClientConfig::default().validate().is_ok());
    }

    #[test]
    fn https_base_url_accepted() {
        let config = ClientConfig::default().with_base_url("https://proxy.internal:8443");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn relative_base_url_rejected() {
        let config = ClientConfig::default().with_base_url("api.anthropic.com/v1");
        let err = config.validate().expect_err("must fail");
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn non_http_scheme_rejected() {
        let config = ClientConfig::default().with_base_url("ftp://api.anthropic.com");
        let err = config.validate().expect_err("must fail");
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn explicit_overrides_win() {
        let config = ClientConfig::default()
            .with_base_url("https://proxy.internal/")
            .with_model("claude-haiku-4-5");
        assert_eq!(config.resolved_base_url(), "https://proxy.internal");
        assert_eq!(config.resolved_model(), "claude-haiku-4-5");
    }
}
