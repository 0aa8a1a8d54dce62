//! Shared session lifecycle: construct once, probe, then expose.

use super::api::{AiClient, AiService};
use super::config::ClientConfig;
use crate::auth::{CredentialResolver, EnvResolver};
use crate::error::{Error, Result};
use std::sync::Arc;

/// Owns the single live session for the process.
///
/// Construct one instance at startup and pass it by reference; independent
/// instances give tests isolation. Initialization takes `&mut self`, so
/// concurrent initialization attempts are ruled out at compile time, while
/// `get()` is a shared read.
pub struct SessionManager<R = EnvResolver> {
    resolver: R,
    session: Option<Arc<dyn AiService>>,
}

impl SessionManager<EnvResolver> {
    /// Manager backed by the process environment.
    #[must_use]
    pub fn new() -> Self {
        Self::with_resolver(EnvResolver)
    }
}

impl Default for SessionManager<EnvResolver> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: CredentialResolver> SessionManager<R> {
    #[must_use]
    pub fn with_resolver(resolver: R) -> Self {
        Self {
            resolver,
            session: None,
        }
    }

    /// Resolve credentials, construct the client, and verify connectivity
    /// before storing and returning the session.
    ///
    /// Credential and construction failures are initialization errors with
    /// the cause preserved. A failed probe is a connection error instead,
    /// worth retrying; the slot stays empty on every failure path.
    /// Re-initialization overwrites the slot, it never merges; sessions
    /// already handed out stay usable.
    pub async fn initialize(&mut self, config: ClientConfig) -> Result<Arc<dyn AiService>> {
        tracing::info!("initializing AI session");

        let credential = self
            .resolver
            .resolve()
            .map_err(|e| Error::initialization_with("failed to resolve AI credentials", e))?;

        let client = AiClient::new(&config, credential.secret())
            .map_err(|e| Error::initialization_with("failed to construct AI client", e))?;

        self.install(Arc::new(client)).await
    }

    /// Probe the given service and store it in the session slot on success.
    async fn install(&mut self, service: Arc<dyn AiService>) -> Result<Arc<dyn AiService>> {
        tracing::debug!("testing connection to AI service");
        match service.test_connection().await {
            Ok(true) => {}
            Ok(false) => {
                return Err(Error::connection("failed to connect to the AI service"));
            }
            Err(e) => {
                return Err(Error::connection_with(
                    "failed to connect to the AI service",
                    e,
                ));
            }
        }

        tracing::info!(model = service.model(), "AI session ready");
        self.session = Some(Arc::clone(&service));
        Ok(service)
    }

    /// The live session.
    ///
    /// Calling this before a successful [`SessionManager::initialize`] is a
    /// programming error and fails loudly rather than returning an empty
    /// value.
    pub fn get(&self) -> Result<Arc<dyn AiService>> {
        self.session.clone().ok_or(Error::NotInitialized)
    }

    /// Non-throwing presence check of the session slot.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.session.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Credential;
    use super::super::api::{CompletionRequest, CompletionResponse};
    use async_trait::async_trait;

    #[derive(Debug)]
    struct FakeService {
        probe: Result<bool>,
    }

    impl FakeService {
        fn reachable() -> Arc<dyn AiService> {
            Arc::new(Self { probe: Ok(true) })
        }

        fn refused() -> Arc<dyn AiService> {
            Arc::new(Self { probe: Ok(false) })
        }

        fn unreachable() -> Arc<dyn AiService> {
            Arc::new(Self {
                probe: Err(Error::connection("dns failure")),
            })
        }
    }

    #[async_trait]
    impl AiService for FakeService {
        fn model(&self) -> &str {
            "fake-model"
        }

        async fn test_connection(&self) -> Result<bool> {
            match &self.probe {
                Ok(ok) => Ok(*ok),
                Err(_) => Err(Error::connection("dns failure")),
            }
        }

        async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse> {
            unimplemented!("not exercised by session tests")
        }
    }

    struct FailingResolver;

    impl CredentialResolver for FailingResolver {
        fn resolve(&self) -> Result<Credential> {
            Err(Error::MissingEnvVars(vec!["ANTHROPIC_API_KEY".into()]))
        }
    }

    #[test]
    fn get_before_initialize_fails_loudly() {
        let manager = SessionManager::new();
        assert!(!manager.is_initialized());
        let err = manager.get().expect_err("must fail");
        assert!(matches!(err, Error::NotInitialized));
    }

    #[tokio::test]
    async fn install_stores_and_returns_same_session() {
        let mut manager = SessionManager::new();
        let session = manager.install(FakeService::reachable()).await.unwrap();

        let first = manager.get().unwrap();
        let second = manager.get().unwrap();
        assert!(Arc::ptr_eq(&session, &first));
        assert!(Arc::ptr_eq(&first, &second));
        assert!(manager.is_initialized());
    }

    #[tokio::test]
    async fn refused_probe_is_connection_error_and_slot_stays_empty() {
        let mut manager = SessionManager::new();
        let err = manager
            .install(FakeService::refused())
            .await
            .expect_err("must fail");
        assert!(matches!(err, Error::Connection { .. }));
        assert!(!manager.is_initialized());
        assert!(manager.get().is_err());
    }

    #[tokio::test]
    async fn probe_transport_failure_is_connection_error_with_cause() {
        let mut manager = SessionManager::new();
        let err = manager
            .install(FakeService::unreachable())
            .await
            .expect_err("must fail");
        match &err {
            Error::Connection { source, .. } => assert!(source.is_some()),
            other => panic!("expected Connection, got {other:?}"),
        }
        assert!(!manager.is_initialized());
    }

    #[tokio::test]
    async fn reinitialization_overwrites_slot() {
        let mut manager = SessionManager::new();
        let first = manager.install(FakeService::reachable()).await.unwrap();
        let second = manager.install(FakeService::reachable()).await.unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        let current = manager.get().unwrap();
        assert!(Arc::ptr_eq(&current, &second));
        // The first session stays usable for existing holders.
        assert_eq!(first.model(), "fake-model");
    }

    #[tokio::test]
    async fn failed_reinitialization_keeps_previous_session() {
        let mut manager = SessionManager::new();
        let first = manager.install(FakeService::reachable()).await.unwrap();

        assert!(manager.install(FakeService::refused()).await.is_err());
        let current = manager.get().unwrap();
        assert!(Arc::ptr_eq(&current, &first));
    }

    #[tokio::test]
    async fn resolver_failure_wraps_as_initialization_with_cause() {
        let mut manager = SessionManager::with_resolver(FailingResolver);
        let err = manager
            .initialize(ClientConfig::default())
            .await
            .expect_err("must fail");

        match &err {
            Error::Initialization { source, .. } => {
                let source = source.as_ref().expect("cause preserved");
                assert!(source.to_string().contains("ANTHROPIC_API_KEY"));
            }
            other => panic!("expected Initialization, got {other:?}"),
        }
        assert!(!manager.is_initialized());
    }
}
