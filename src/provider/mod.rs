//! Signing session provider - the external boundary of the controller
//!
//! The provider owns pairing transport, session negotiation and request relay.
//! The controller only sees this trait; implementations are injected.
//!
//! # Contract
//!
//! | Call | Returns | Fails with |
//! |------|---------|------------|
//! | `initialize` | `ClientHandle` | `Init` |
//! | `open_pairing` | `Pairing { uri, approval }` | `PairingRejected`, `PairingTimeout` (from `approval`) |
//! | `send_request` | opaque JSON response | `RequestRejected`, `SessionExpired`, `Other` |
//! | `terminate_session` | `()` | `SessionNotFound` |

mod memory;

pub use memory::{ApprovalOutcome, MemoryProvider, ProviderCall};

use crate::core::chain::disconnect;
use crate::session::{ClientHandle, RequiredNamespaces, Session};
use async_trait::async_trait;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors reported by a signing session provider
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("Provider initialization failed: {0}")]
    Init(String),

    #[error("Pairing rejected: {0}")]
    PairingRejected(String),

    #[error("Pairing timed out")]
    PairingTimeout,

    #[error("Request rejected: {0}")]
    RequestRejected(String),

    #[error("Session expired: {0}")]
    SessionExpired(String),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Provider error: {0}")]
    Other(String),
}

/// Client configuration handed to `initialize`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub project_id: String,
}

/// Result of opening a pairing: an optional uri to show, and a future that
/// resolves once the remote wallet approves or rejects.
pub struct Pairing {
    pub uri: Option<String>,
    pub approval: BoxFuture<'static, ProviderResult<Session>>,
}

/// A method call relayed to the wallet over an active session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRequest {
    pub topic: String,
    pub chain_id: String,
    pub method: String,
    pub params: Vec<Value>,
}

/// Reason attached to a session termination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisconnectReason {
    pub code: i64,
    pub message: String,
}

impl Default for DisconnectReason {
    fn default() -> Self {
        Self { code: disconnect::REASON_CODE, message: disconnect::REASON_MESSAGE.into() }
    }
}

#[async_trait]
pub trait SigningSessionProvider: Send + Sync {
    async fn initialize(&self, config: &ClientConfig) -> ProviderResult<ClientHandle>;

    async fn open_pairing(&self, client: &ClientHandle, required: &RequiredNamespaces) -> ProviderResult<Pairing>;

    async fn send_request(&self, client: &ClientHandle, request: &SessionRequest) -> ProviderResult<Value>;

    async fn terminate_session(&self, client: &ClientHandle, topic: &str, reason: &DisconnectReason) -> ProviderResult<()>;
}
