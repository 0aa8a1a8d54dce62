//! Authentication manager - owns the credential for the life of the process.

use super::env::{CredentialResolver, EnvResolver};
use super::types::{AuthMethod, AuthOutcome, AuthState, Credential};

/// Drives credential resolution and holds the result.
///
/// Resolver failures are an expected, reportable outcome here:
/// [`AuthManager::initialize`] returns them in the [`AuthOutcome`] instead
/// of propagating. Construct one instance at startup and pass it by
/// reference to consumers.
pub struct AuthManager<R = EnvResolver> {
    resolver: R,
    state: AuthState,
}

impl AuthManager<EnvResolver> {
    /// Manager backed by the process environment.
    #[must_use]
    pub fn new() -> Self {
        Self::with_resolver(EnvResolver)
    }
}

impl Default for AuthManager<EnvResolver> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: CredentialResolver> AuthManager<R> {
    #[must_use]
    pub fn with_resolver(resolver: R) -> Self {
        Self {
            resolver,
            state: AuthState::Uninitialized,
        }
    }

    /// Run one authentication attempt.
    ///
    /// Re-invocation runs the machine again and overwrites the previous
    /// result, it never merges.
    pub fn initialize(&mut self) -> AuthOutcome {
        tracing::info!("initializing authentication");
        self.state = AuthState::Authenticating;

        match self.resolver.resolve() {
            Ok(credential) => {
                self.state = AuthState::Authenticated(credential.clone());
                tracing::info!("authenticated from environment");
                AuthOutcome::Success {
                    credential,
                    method: AuthMethod::ApiKey,
                }
            }
            Err(e) => {
                tracing::error!(category = e.category().name(), error = %e, "authentication failed");
                let reason = e.to_string();
                self.state = AuthState::Failed(reason.clone());
                AuthOutcome::Failure {
                    reason,
                    method: AuthMethod::ApiKey,
                }
            }
        }
    }

    /// The held credential, populated only after a successful attempt.
    #[must_use]
    pub fn credential(&self) -> Option<&Credential> {
        match &self.state {
            AuthState::Authenticated(credential) => Some(credential),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.credential().is_some()
    }

    /// `"<scheme> <secret>"` header value, `None` when unauthenticated.
    #[must_use]
    pub fn authorization_header(&self) -> Option<String> {
        self.credential().map(Credential::authorization_header)
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> &AuthState {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};

    struct FixedResolver(Option<Credential>);

    impl CredentialResolver for FixedResolver {
        fn resolve(&self) -> Result<Credential> {
            self.0
                .clone()
                .ok_or_else(|| Error::MissingEnvVars(vec!["ANTHROPIC_API_KEY".into()]))
        }
    }

    fn failing() -> AuthManager<FixedResolver> {
        AuthManager::with_resolver(FixedResolver(None))
    }

    fn succeeding(secret: &str) -> AuthManager<FixedResolver> {
        AuthManager::with_resolver(FixedResolver(Some(Credential::api_key(secret))))
    }

    #[test]
    fn starts_uninitialized() {
        let manager = AuthManager::new();
        assert_eq!(*manager.state(), AuthState::Uninitialized);
        assert!(!manager.is_authenticated());
        assert!(manager.credential().is_none());
        assert!(manager.authorization_header().is_none());
    }

    #[test]
    fn resolver_failure_becomes_outcome_not_error() {
        let mut manager = failing();
        let outcome = manager.initialize();
        assert!(!outcome.is_success());
        assert!(
            outcome
                .reason()
                .expect("failure carries reason")
                .contains("ANTHROPIC_API_KEY")
        );
        assert!(!manager.is_authenticated());
        assert!(matches!(manager.state(), AuthState::Failed(_)));
    }

    #[test]
    fn success_populates_credential_and_header() {
        let mut manager = succeeding("abc");
        let outcome = manager.initialize();
        assert!(outcome.is_success());
        assert!(manager.is_authenticated());
        assert_eq!(manager.authorization_header().as_deref(), Some("Bearer abc"));
        assert!(matches!(manager.state(), AuthState::Authenticated(_)));
    }

    #[test]
    fn reinitialization_overwrites_previous_attempt() {
        let mut manager = succeeding("first");
        assert!(manager.initialize().is_success());

        manager.resolver = FixedResolver(Some(Credential::api_key("second")));
        assert!(manager.initialize().is_success());
        assert_eq!(
            manager.credential().map(Credential::secret),
            Some("second")
        );
    }

    #[test]
    fn failure_after_success_clears_authentication() {
        let mut manager = succeeding("abc");
        assert!(manager.initialize().is_success());

        manager.resolver = FixedResolver(None);
        assert!(!manager.initialize().is_success());
        assert!(!manager.is_authenticated());
        assert!(manager.authorization_header().is_none());
    }
}
