//! Shared AI client session.
//!
//! One session is constructed per run, bound to the resolved credential,
//! probed for connectivity, and then handed out as `Arc<dyn AiService>`.
//!
//! # Example
//!
//! ```ignore
//! use aster::client::{ClientConfig, SessionManager};
//!
//! let mut sessions = SessionManager::new();
//! let session = sessions.initialize(ClientConfig::default()).await?;
//! let reply = session.complete(CompletionRequest::user("hello", 256)).await?;
//! ```

mod api;
mod config;
mod http;
mod session;

pub use api::{
    AiClient, AiService, ApiMessage, CompletionRequest, CompletionResponse, ResponseBlock, Usage,
};
pub use config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use session::SessionManager;
