//! Crate-wide error taxonomy.
//!
//! Every error that can reach a user carries a [`ErrorCategory`] and a
//! concrete remediation via [`Error::resolution`]. Connection failures are
//! kept distinct from initialization failures so callers can retry the
//! former without re-running setup.

use thiserror::Error;

/// Broad classification of a user-facing failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Required configuration is missing or invalid.
    Configuration,
    /// A credential is present but unusable.
    Authentication,
    /// The remote service could not be reached or refused the probe.
    Connection,
    /// Session construction failed, or the session was used before setup.
    Initialization,
}

impl ErrorCategory {
    /// Stable lowercase name, used in log fields.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::Authentication => "authentication",
            Self::Connection => "connection",
            Self::Initialization => "initialization",
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    /// One or more required environment variables are unset.
    #[error("Missing required environment variables: {}", .0.join(", "))]
    MissingEnvVars(Vec<String>),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("{0}")]
    Authentication(String),

    /// The connectivity probe failed. Transient; callers may retry.
    #[error("{message}")]
    Connection {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The session was requested before a successful `initialize()`.
    #[error("AI session not initialized")]
    NotInitialized,

    /// Session construction failed for a reason other than the probe.
    #[error("{message}")]
    Initialization {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The service answered with a non-success status.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication(message.into())
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
            source: None,
        }
    }

    pub fn connection_with(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Connection {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn initialization_with(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Initialization {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Category this error is reported under.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingEnvVars(_) | Self::Config(_) => ErrorCategory::Configuration,
            Self::Authentication(_) => ErrorCategory::Authentication,
            Self::Connection { .. } | Self::Api { .. } | Self::Http(_) => {
                ErrorCategory::Connection
            }
            Self::NotInitialized | Self::Initialization { .. } => ErrorCategory::Initialization,
        }
    }

    /// Human-actionable remediation shown alongside the message.
    #[must_use]
    pub fn resolution(&self) -> &'static str {
        match self {
            Self::MissingEnvVars(_) | Self::Config(_) => {
                "Set the required environment variables in your shell or .env file, then try again."
            }
            Self::Authentication(_) => {
                "Set the ANTHROPIC_API_KEY environment variable to a valid API key."
            }
            Self::Connection { .. } | Self::Api { .. } | Self::Http(_) => {
                "Check your internet connection and API key, then try again."
            }
            Self::NotInitialized => {
                "Call SessionManager::initialize() before requesting the session."
            }
            Self::Initialization { .. } => {
                "Check your authentication and internet connection, then try again."
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Pull a readable message out of an API error body.
///
/// Bodies are usually JSON like `{"error": {"message": "..."}}` but plain
/// text does occur on proxies and gateways.
#[must_use]
pub fn format_api_error(body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(msg) = json
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
        {
            return msg.to_string();
        }
        if let Some(msg) = json.get("error").and_then(|e| e.as_str()) {
            return msg.to_string();
        }
        if let Some(msg) = json.get("message").and_then(|m| m.as_str()) {
            return msg.to_string();
        }
    }
    body.trim().to_string()
}
