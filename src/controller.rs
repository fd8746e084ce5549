//! SessionController - client, session and account lifecycle
//!
//! # States
//!
//! | State | Client | Session | Account |
//! |-------|--------|---------|---------|
//! | Uninitialized | - | - | - |
//! | Ready | ✓ | - | - |
//! | Connected | ✓ | ✓ | ✓ (derived) |
//!
//! # Transitions
//!
//! ```text
//! Uninitialized ──initialize──▶ Ready ──connect──▶ Connected
//!       ▲                                              │
//!       └──────────────────disconnect──────────────────┘
//! ```
//!
//! `disconnect` clears the client too; `initialize` must run again afterwards.
//! One operation runs at a time: a call made while another is suspended on
//! the provider returns `ControllerError::Busy` without touching state.

use crate::config::AppConfig;
use crate::display::PairingDisplay;
use crate::provider::{DisconnectReason, ProviderError, SessionRequest, SigningSessionProvider};
use crate::request::{Method, Samples, SignRequest};
use crate::session::{required_namespaces, Account, ClientHandle, Session};
use serde::Serialize;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;
use tracing::{debug, info, warn};

pub type ControllerResult<T> = Result<T, ControllerError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControllerError {
    #[error("Client does not exist")]
    NoClient,

    #[error("Session already active: {0}")]
    AlreadyConnected(String),

    #[error("Another operation is in flight")]
    Busy,

    #[error("Session {0} has no eip155 account")]
    NoAccount(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl ControllerError {
    /// Operation invoked in the wrong state
    pub fn is_precondition(&self) -> bool {
        matches!(self, ControllerError::NoClient | ControllerError::AlreadyConnected(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ControllerState {
    Uninitialized,
    Ready,
    Connected,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectOutcome {
    Connected(Account),
    /// Provider returned no pairing uri; still Ready
    NoPairingOffered,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestOutcome {
    Response(Value),
    /// No active session; nothing was sent
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisconnectOutcome {
    Disconnected { topic: String },
    /// Client present but no session; state unchanged
    NoSession,
}

/// Snapshot for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControllerStatus {
    pub state: ControllerState,
    pub client: Option<String>,
    pub topic: Option<String>,
    pub account: Option<String>,
}

#[derive(Default)]
struct Entities {
    client: Option<ClientHandle>,
    session: Option<Session>,
}

impl Entities {
    // A session never outlives its client: reset clears both
    fn state(&self) -> ControllerState {
        match (&self.client, &self.session) {
            (None, _) => ControllerState::Uninitialized,
            (Some(_), None) => ControllerState::Ready,
            (Some(_), Some(_)) => ControllerState::Connected,
        }
    }
}

/// Clears the in-flight flag on drop, including when the operation future is dropped mid-await.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) { self.0.store(false, Ordering::Release); }
}

/// Pairing uri on screen; hidden on drop, so a cancelled `connect` does not leave it up.
struct Shown<'a>(&'a dyn PairingDisplay);

impl<'a> Shown<'a> {
    fn new(display: &'a dyn PairingDisplay, uri: &str) -> Self {
        display.show(uri);
        Self(display)
    }
}

impl Drop for Shown<'_> {
    fn drop(&mut self) { self.0.hide(); }
}

pub struct SessionController {
    config: AppConfig,
    provider: Arc<dyn SigningSessionProvider>,
    display: Arc<dyn PairingDisplay>,
    entities: Mutex<Entities>,
    in_flight: AtomicBool,
}

impl SessionController {
    pub fn new(config: AppConfig, provider: Arc<dyn SigningSessionProvider>, display: Arc<dyn PairingDisplay>) -> Self {
        Self { config, provider, display, entities: Mutex::new(Entities::default()), in_flight: AtomicBool::new(false) }
    }

    pub fn config(&self) -> &AppConfig { &self.config }

    // Observable fields

    pub fn state(&self) -> ControllerState { self.entities().state() }

    pub fn client(&self) -> Option<ClientHandle> { self.entities().client.clone() }

    pub fn session(&self) -> Option<Session> { self.entities().session.clone() }

    /// Recomputed from the session on every call
    pub fn account(&self) -> Option<Account> { self.entities().session.as_ref().and_then(Session::account) }

    pub fn is_busy(&self) -> bool { self.in_flight.load(Ordering::Acquire) }

    pub fn status(&self) -> ControllerStatus {
        let e = self.entities();
        ControllerStatus {
            state: e.state(),
            client: e.client.as_ref().map(|c| c.id().to_string()),
            topic: e.session.as_ref().map(|s| s.topic.clone()),
            account: e.session.as_ref().and_then(Session::account).map(|a| a.address),
        }
    }

    // Operations

    /// Uninitialized → Ready. No provider call when a client already exists.
    pub async fn initialize(&self) -> ControllerResult<ClientHandle> {
        report("initialize", self.initialize_inner().await)
    }

    async fn initialize_inner(&self) -> ControllerResult<ClientHandle> {
        let _op = self.begin()?;
        let existing = self.entities().client.clone();
        if let Some(client) = existing {
            debug!(client = client.id(), "client already initialized");
            return Ok(client);
        }
        let client = self.provider.initialize(&self.config.client_config()).await?;
        self.entities().client = Some(client.clone());
        info!(client = client.id(), "client initialized");
        Ok(client)
    }

    /// Ready → Connected once the wallet approves the pairing.
    pub async fn connect(&self) -> ControllerResult<ConnectOutcome> {
        report("connect", self.connect_inner().await)
    }

    async fn connect_inner(&self) -> ControllerResult<ConnectOutcome> {
        let _op = self.begin()?;
        let client = {
            let e = self.entities();
            if let Some(session) = &e.session {
                return Err(ControllerError::AlreadyConnected(session.topic.clone()));
            }
            e.client.clone().ok_or(ControllerError::NoClient)?
        };

        let required = required_namespaces(&self.config.default_chain);
        let pairing = self.provider.open_pairing(&client, &required).await?;
        let Some(uri) = pairing.uri else {
            info!("provider offered no pairing uri");
            return Ok(ConnectOutcome::NoPairingOffered);
        };

        let shown = Shown::new(self.display.as_ref(), &uri);
        let approved = pairing.approval.await;
        drop(shown);

        let session = approved?;
        let Some(account) = session.account() else {
            // Approved on the wallet side: end it there, it is never installed here
            if let Err(e) = self.provider.terminate_session(&client, &session.topic, &DisconnectReason::default()).await {
                warn!(topic = %session.topic, error = %e, "terminate of unusable session failed");
            }
            return Err(ControllerError::NoAccount(session.topic));
        };
        info!(topic = %session.topic, account = %account, "session connected");
        self.entities().session = Some(session);
        Ok(ConnectOutcome::Connected(account))
    }

    /// Forward a method call over the active session. Without a session this is
    /// a no-op that returns `Skipped`.
    pub async fn request(&self, method: Method, params: Vec<Value>) -> ControllerResult<RequestOutcome> {
        report("request", self.request_inner(method, params).await)
    }

    pub async fn sign(&self, request: SignRequest) -> ControllerResult<RequestOutcome> {
        self.request(request.method(), request.params()).await
    }

    /// Send the demo payload for `method`, built from the active account and
    /// the configured test recipient.
    pub async fn run_sample(&self, method: Method) -> ControllerResult<RequestOutcome> {
        match self.account() {
            Some(account) => self.sign(Samples::new(account.address, &self.config.test_recipient).build(method)).await,
            // Resolves to NoClient or Skipped without reaching the provider
            None => self.request(method, Vec::new()).await,
        }
    }

    async fn request_inner(&self, method: Method, params: Vec<Value>) -> ControllerResult<RequestOutcome> {
        let _op = self.begin()?;
        let (client, session) = {
            let e = self.entities();
            (e.client.clone().ok_or(ControllerError::NoClient)?, e.session.clone())
        };
        let Some(session) = session.filter(|s| s.account().is_some()) else {
            debug!(%method, "no active session, request skipped");
            return Ok(RequestOutcome::Skipped);
        };

        let request = SessionRequest {
            topic: session.topic,
            chain_id: self.config.default_chain.clone(),
            method: method.as_str().into(),
            params,
        };
        let response = self.provider.send_request(&client, &request).await?;
        info!(%method, %response, "response");
        Ok(RequestOutcome::Response(response))
    }

    /// Connected → Uninitialized. State is reset even when the provider fails
    /// to terminate; that failure is returned afterwards.
    pub async fn disconnect(&self) -> ControllerResult<DisconnectOutcome> {
        report("disconnect", self.disconnect_inner().await)
    }

    async fn disconnect_inner(&self) -> ControllerResult<DisconnectOutcome> {
        let _op = self.begin()?;
        let (client, session) = {
            let e = self.entities();
            (e.client.clone().ok_or(ControllerError::NoClient)?, e.session.clone())
        };
        let Some(session) = session else {
            debug!("no session to disconnect");
            return Ok(DisconnectOutcome::NoSession);
        };

        let terminated = self.provider.terminate_session(&client, &session.topic, &DisconnectReason::default()).await;
        self.reset();
        terminated?;
        info!(topic = %session.topic, "session disconnected");
        Ok(DisconnectOutcome::Disconnected { topic: session.topic })
    }

    /// Teardown: hide the display, terminate any session best-effort, clear state.
    ///
    /// Holds the in-flight guard like every operation, so it returns `Busy` while a
    /// `connect` is waiting on approval. Drop that `connect` future first; its
    /// guards release the flag and hide the display.
    pub async fn close(&self) -> ControllerResult<()> {
        let _op = self.begin()?;
        self.display.hide();
        let (client, session) = {
            let e = self.entities();
            (e.client.clone(), e.session.clone())
        };
        if let (Some(client), Some(session)) = (client, session) {
            if let Err(e) = self.provider.terminate_session(&client, &session.topic, &DisconnectReason::default()).await {
                warn!(topic = %session.topic, error = %e, "terminate on close failed");
            }
        }
        self.reset();
        debug!("controller closed");
        Ok(())
    }

    fn reset(&self) {
        *self.entities() = Entities::default();
    }

    fn begin(&self) -> ControllerResult<InFlight<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| InFlight(&self.in_flight))
            .map_err(|_| ControllerError::Busy)
    }

    // State mutations are single assignments, so a poisoned lock still holds consistent data
    fn entities(&self) -> MutexGuard<'_, Entities> {
        self.entities.lock().unwrap_or_else(|p| p.into_inner())
    }
}

fn report<T>(op: &str, result: ControllerResult<T>) -> ControllerResult<T> {
    if let Err(e) = &result {
        warn!(op, error = %e, "operation failed");
    }
    result
}
