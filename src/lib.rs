//! Beeconnect: wallet session lifecycle over an injected signing session provider.
//!
//! # Architecture
//!
//! ```text
//! Presentation (CLI / UI)
//!   │  initialize · connect · request · disconnect
//!   ▼
//! SessionController ── AppConfig (explicit, no globals)
//!   │   state: ClientHandle? · Session? · Account (derived)
//!   │
//!   ├── SigningSessionProvider (pairing, relay, signing: external)
//!   └── PairingDisplay (show / hide pairing uri)
//! ```
//!
//! # Operations
//!
//! | Operation | From | To | Notes |
//! |-----------|------|----|-------|
//! | `initialize()` | Uninitialized | Ready | No-op when a client exists |
//! | `connect()` | Ready | Connected | `NoPairingOffered` when the provider gives no uri |
//! | `request(method, params)` | Connected | Connected | `Skipped` without a session |
//! | `disconnect()` | Connected | Uninitialized | Resets even if terminate fails |
//!
//! # Features
//!
//! - `native` - tokio runtime, tracing subscriber and the `beeconnect` CLI
//!
//! # Usage
//!
//! ```ignore
//! use beeconnect::{AppConfig, MemoryProvider, SessionController, TracingDisplay, Method};
//! use std::sync::Arc;
//!
//! let controller = SessionController::new(
//!     AppConfig::from_env(),
//!     Arc::new(MemoryProvider::new()),
//!     Arc::new(TracingDisplay),
//! );
//! controller.initialize().await?;
//! controller.connect().await?;
//! controller.run_sample(Method::PersonalSign).await?;
//! controller.disconnect().await?;
//! ```

pub mod config;
pub mod controller;
pub mod core;
pub mod display;
pub mod provider;
pub mod request;
pub mod session;

#[cfg(feature = "native")]
pub mod logging;

pub use config::{AppConfig, ConfigError};
pub use controller::{
    ConnectOutcome, ControllerError, ControllerResult, ControllerState, ControllerStatus,
    DisconnectOutcome, RequestOutcome, SessionController,
};
pub use display::{PairingDisplay, TerminalDisplay, TracingDisplay};
pub use provider::{
    ApprovalOutcome, ClientConfig, DisconnectReason, MemoryProvider, Pairing, ProviderCall,
    ProviderError, ProviderResult, SessionRequest, SigningSessionProvider,
};
pub use request::{Method, Samples, SignRequest, Transaction, TypedData};
pub use session::{Account, ClientHandle, Session, SessionNamespace};
