//! Authentication types.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Scheme a credential authorizes with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Bearer,
}

impl TokenKind {
    /// Scheme prefix used in the `Authorization` header.
    #[must_use]
    pub fn scheme(self) -> &'static str {
        match self {
            Self::Bearer => "Bearer",
        }
    }
}

/// How a credential was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMethod {
    /// Static API key from the environment.
    ApiKey,
}

/// A resolved secret plus the metadata used to authorize requests.
///
/// Immutable once created. Never persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    secret: String,
    kind: TokenKind,
    /// Expiry in milliseconds since epoch. 0 means the credential does not
    /// expire (API keys).
    expires_at: u64,
    scope: String,
}

impl Credential {
    /// Create a non-expiring API-key credential.
    pub fn api_key(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            kind: TokenKind::Bearer,
            expires_at: 0,
            scope: "anthropic.api".to_string(),
        }
    }

    #[must_use]
    pub fn secret(&self) -> &str {
        &self.secret
    }

    #[must_use]
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    #[must_use]
    pub fn expires_at(&self) -> u64 {
        self.expires_at
    }

    #[must_use]
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Whether the credential has expired. Non-expiring credentials
    /// (`expires_at == 0`) never expire.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        if self.expires_at == 0 {
            return false;
        }
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        now >= self.expires_at
    }

    /// Header value in `"<scheme> <secret>"` form, e.g. `Bearer abc`.
    #[must_use]
    pub fn authorization_header(&self) -> String {
        format!("{} {}", self.kind.scheme(), self.secret)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("secret", &"[REDACTED]")
            .field("kind", &self.kind)
            .field("expires_at", &self.expires_at)
            .field("scope", &self.scope)
            .finish()
    }
}

/// Authentication lifecycle state.
///
/// `Authenticated` and `Failed` are terminal for one attempt; re-running
/// [`super::AuthManager::initialize`] moves back through `Authenticating`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AuthState {
    #[default]
    Uninitialized,
    Authenticating,
    Authenticated(Credential),
    Failed(String),
}

/// Outcome of one authentication attempt. Not retried automatically.
#[derive(Debug, Clone)]
pub enum AuthOutcome {
    Success {
        credential: Credential,
        method: AuthMethod,
    },
    Failure {
        reason: String,
        method: AuthMethod,
    },
}

impl AuthOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Failure reason, if this outcome is a failure.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { reason, .. } => Some(reason),
        }
    }
}
