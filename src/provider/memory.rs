//! MemoryProvider - in-process loopback provider
//!
//! Approves pairings locally with a configured account, answers requests with
//! a canned response and records every call. Drives the CLI demo and the tests.

use super::{
    ClientConfig, DisconnectReason, Pairing, ProviderError, ProviderResult, SessionRequest,
    SigningSessionProvider,
};
use crate::core::chain::eip155;
use crate::session::{ClientHandle, RequiredNamespaces, Session, SessionNamespace};
use async_trait::async_trait;
use futures::channel::oneshot;
use futures::FutureExt;
use serde_json::{json, Value};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard};

/// How the wallet side answers a pairing proposal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApprovalOutcome {
    /// Approve with these CAIP-10 accounts in the `eip155` namespace
    Approve(Vec<String>),
    Reject(String),
    Timeout,
}

/// One recorded provider call
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderCall {
    Initialize { project_id: String },
    OpenPairing { client: String, required: RequiredNamespaces },
    SendRequest { client: String, request: SessionRequest },
    Terminate { client: String, topic: String, reason: DisconnectReason },
}

#[derive(Clone)]
pub struct MemoryProvider {
    inner: Arc<Mutex<MemoryState>>,
}

struct MemoryState {
    next_client: u64,
    next_topic: u64,
    topic: Option<String>,
    uri: Option<String>,
    approval: ApprovalOutcome,
    gate: Option<oneshot::Receiver<()>>,
    init_error: Option<ProviderError>,
    request_error: Option<ProviderError>,
    terminate_error: Option<ProviderError>,
    response: Option<Value>,
    active: BTreeSet<String>,
    calls: Vec<ProviderCall>,
}

impl Default for MemoryProvider {
    fn default() -> Self { Self::new() }
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MemoryState {
                next_client: 0,
                next_topic: 0,
                topic: None,
                uri: Some("wc:memory@2?relay-protocol=loopback".into()),
                approval: ApprovalOutcome::Approve(vec![format!("{}:0x0000000000000000000000000000000000000001", eip155::DEFAULT_CHAIN)]),
                gate: None,
                init_error: None,
                request_error: None,
                terminate_error: None,
                response: None,
                active: BTreeSet::new(),
                calls: Vec::new(),
            })),
        }
    }

    /// Approve pairings with a single CAIP-10 account
    pub fn with_account(self, caip10: impl Into<String>) -> Self {
        self.state().approval = ApprovalOutcome::Approve(vec![caip10.into()]);
        self
    }
    pub fn with_approval(self, outcome: ApprovalOutcome) -> Self { self.state().approval = outcome; self }
    /// Fixed topic for approved sessions (generated otherwise)
    pub fn with_topic(self, topic: impl Into<String>) -> Self { self.state().topic = Some(topic.into()); self }
    /// Pairing uri to offer; `None` models a provider that offers no pairing
    pub fn with_uri(self, uri: Option<String>) -> Self { self.state().uri = uri; self }
    pub fn with_response(self, response: Value) -> Self { self.state().response = Some(response); self }
    pub fn fail_init(self, error: ProviderError) -> Self { self.state().init_error = Some(error); self }
    pub fn fail_requests(self, error: ProviderError) -> Self { self.state().request_error = Some(error); self }
    pub fn fail_terminate(self, error: ProviderError) -> Self { self.state().terminate_error = Some(error); self }

    /// Hold the next approval until the returned sender fires (or is dropped).
    pub fn gate_approval(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.state().gate = Some(rx);
        tx
    }

    pub fn calls(&self) -> Vec<ProviderCall> { self.state().calls.clone() }

    pub fn init_calls(&self) -> usize {
        self.state().calls.iter().filter(|c| matches!(c, ProviderCall::Initialize { .. })).count()
    }

    pub fn requests(&self) -> Vec<SessionRequest> {
        self.state()
            .calls
            .iter()
            .filter_map(|c| match c {
                ProviderCall::SendRequest { request, .. } => Some(request.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn is_active(&self, topic: &str) -> bool { self.state().active.contains(topic) }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.inner.lock().unwrap_or_else(|p| p.into_inner())
    }
}

#[async_trait]
impl SigningSessionProvider for MemoryProvider {
    async fn initialize(&self, config: &ClientConfig) -> ProviderResult<ClientHandle> {
        let mut state = self.state();
        state.calls.push(ProviderCall::Initialize { project_id: config.project_id.clone() });
        if let Some(e) = state.init_error.clone() { return Err(e); }
        state.next_client += 1;
        Ok(ClientHandle::new(format!("memory-client-{}", state.next_client)))
    }

    async fn open_pairing(&self, client: &ClientHandle, required: &RequiredNamespaces) -> ProviderResult<Pairing> {
        let mut state = self.state();
        state.calls.push(ProviderCall::OpenPairing { client: client.id().into(), required: required.clone() });
        state.next_topic += 1;
        let topic = state.topic.clone().unwrap_or_else(|| format!("topic-{}", state.next_topic));
        let outcome = state.approval.clone();
        let gate = state.gate.take();
        let methods = required.get(eip155::NAMESPACE).map(|ns| ns.methods.clone()).unwrap_or_default();
        let events = required.get(eip155::NAMESPACE).map(|ns| ns.events.clone()).unwrap_or_default();
        let inner = self.inner.clone();

        let approval = async move {
            if let Some(gate) = gate { let _ = gate.await; }
            match outcome {
                ApprovalOutcome::Approve(accounts) => {
                    inner.lock().unwrap_or_else(|p| p.into_inner()).active.insert(topic.clone());
                    Ok(Session::new(topic).with_namespace(eip155::NAMESPACE, SessionNamespace { accounts, methods, events }))
                }
                ApprovalOutcome::Reject(reason) => Err(ProviderError::PairingRejected(reason)),
                ApprovalOutcome::Timeout => Err(ProviderError::PairingTimeout),
            }
        }
        .boxed();

        Ok(Pairing { uri: state.uri.clone(), approval })
    }

    async fn send_request(&self, client: &ClientHandle, request: &SessionRequest) -> ProviderResult<Value> {
        let mut state = self.state();
        state.calls.push(ProviderCall::SendRequest { client: client.id().into(), request: request.clone() });
        if let Some(e) = state.request_error.clone() { return Err(e); }
        if !state.active.contains(&request.topic) { return Err(ProviderError::SessionExpired(request.topic.clone())); }
        Ok(state.response.clone().unwrap_or_else(|| json!({"method": request.method, "result": "0x"})))
    }

    async fn terminate_session(&self, client: &ClientHandle, topic: &str, reason: &DisconnectReason) -> ProviderResult<()> {
        let mut state = self.state();
        state.calls.push(ProviderCall::Terminate { client: client.id().into(), topic: topic.into(), reason: reason.clone() });
        if let Some(e) = state.terminate_error.clone() { return Err(e); }
        if !state.active.remove(topic) { return Err(ProviderError::SessionNotFound(topic.into())); }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::required_namespaces;

    #[tokio::test]
    async fn approval_activates_topic_and_terminate_removes_it() {
        let provider = MemoryProvider::new().with_topic("t1").with_account("eip155:1001:0xABCDEF");
        let client = provider.initialize(&ClientConfig::default()).await.expect("client");
        let pairing = provider.open_pairing(&client, &required_namespaces("eip155:1001")).await.expect("pairing");
        assert!(pairing.uri.is_some());
        let session = pairing.approval.await.expect("session");
        assert_eq!(session.topic, "t1");
        assert!(provider.is_active("t1"));
        provider.terminate_session(&client, "t1", &DisconnectReason::default()).await.expect("terminate");
        assert!(!provider.is_active("t1"));
        assert_eq!(
            provider.terminate_session(&client, "t1", &DisconnectReason::default()).await,
            Err(ProviderError::SessionNotFound("t1".into()))
        );
    }

    #[tokio::test]
    async fn requests_on_unknown_topic_expire() {
        let provider = MemoryProvider::new();
        let client = provider.initialize(&ClientConfig::default()).await.expect("client");
        let request = SessionRequest { topic: "gone".into(), chain_id: "eip155:1001".into(), method: "personal_sign".into(), params: vec![] };
        assert_eq!(provider.send_request(&client, &request).await, Err(ProviderError::SessionExpired("gone".into())));
        assert_eq!(provider.requests().len(), 1);
    }

    #[tokio::test]
    async fn rejected_pairing_surfaces_from_approval() {
        let provider = MemoryProvider::new().with_approval(ApprovalOutcome::Reject("user declined".into()));
        let client = provider.initialize(&ClientConfig::default()).await.expect("client");
        let pairing = provider.open_pairing(&client, &required_namespaces("eip155:1001")).await.expect("pairing");
        assert_eq!(pairing.approval.await, Err(ProviderError::PairingRejected("user declined".into())));
    }
}
