//! Messages API client and the service seam consumers program against.

use super::config::ClientConfig;
use super::http::{AuthConfig, HttpClient};
use crate::error::Result;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};

const API_VERSION: &str = "2023-06-01";

/// Operations the rest of the application needs from the AI service.
///
/// The session slot stores this trait object, so tests can install fakes
/// and alternative transports can be swapped in without touching callers.
#[async_trait]
pub trait AiService: Send + Sync + std::fmt::Debug {
    /// Model this session sends requests to.
    fn model(&self) -> &str;

    /// Lightweight connectivity check, run once at session construction.
    ///
    /// `Ok(false)` means the service answered but refused us (bad key,
    /// suspended account); an `Err` means it could not be reached at all.
    async fn test_connection(&self) -> Result<bool>;

    /// Non-streaming completion request.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;
}

/// Client for the Messages API, bound to one credential at construction.
#[derive(Debug)]
pub struct AiClient {
    http: HttpClient,
    model: String,
}

impl AiClient {
    /// Construct a client from validated configuration and a secret.
    ///
    /// Rebinding to a different credential means constructing a new client.
    pub fn new(config: &ClientConfig, secret: impl Into<String>) -> Result<Self> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        headers.insert("anthropic-version", HeaderValue::from_static(API_VERSION));

        let http = HttpClient::new(
            config.resolved_base_url(),
            AuthConfig {
                header: "x-api-key".to_string(),
                key: secret.into(),
            },
            config.timeout,
            config.connect_timeout,
            headers,
        );

        Ok(Self {
            http,
            model: config.resolved_model(),
        })
    }
}

#[async_trait]
impl AiService for AiClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn test_connection(&self) -> Result<bool> {
        let status = self.http.get_status("/v1/models?limit=1").await?;
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "connectivity probe refused");
        }
        Ok(status.is_success())
    }

    async fn complete(&self, mut request: CompletionRequest) -> Result<CompletionResponse> {
        if request.model.is_empty() {
            request.model = self.model.clone();
        }
        tracing::debug!(
            model = %request.model,
            messages = request.messages.len(),
            "messages request"
        );
        self.http.post_json("/v1/messages", &request).await
    }
}

/// Non-streaming request to the Messages API.
#[derive(Debug, Serialize)]
pub struct CompletionRequest {
    /// Empty means "use the session's configured model".
    #[serde(skip_serializing_if = "String::is_empty")]
    pub model: String,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    pub messages: Vec<ApiMessage>,
}

impl CompletionRequest {
    /// Single-turn user request against the session's model.
    pub fn user(text: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            model: String::new(),
            max_tokens,
            system: None,
            messages: vec![ApiMessage {
                role: "user".to_string(),
                content: text.into(),
            }],
        }
    }
}

/// A single message in a completion request.
#[derive(Debug, Serialize)]
pub struct ApiMessage {
    pub role: String,
    pub content: String,
}

/// Response from the Messages API.
#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    pub id: String,
    pub model: String,
    pub content: Vec<ResponseBlock>,
    pub stop_reason: Option<String>,
    #[serde(default)]
    pub usage: Usage,
}

impl CompletionResponse {
    /// Concatenated text content of the response.
    #[must_use]
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|block| match block {
                ResponseBlock::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// Content block in a response.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum ResponseBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "thinking")]
    Thinking { thinking: String },
    #[serde(rename = "tool_use")]
    ToolUse {
        id: String,
        name: String,
        input: serde_json::Value,
    },
}

/// Token usage reported by the service.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub input_tokens: u32,
    #[serde(default)]
    pub output_tokens: u32,
}
