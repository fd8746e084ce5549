//! Session model - client handle, negotiated session, derived account
//!
//! ```text
//! ClientHandle ──(open pairing + approval)──▶ Session ──(first eip155 account)──▶ Account
//! ```
//!
//! `Account` is never stored: it is recomputed from the `Session` on every read.

mod account;

pub use account::Account;

use crate::core::chain::eip155;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Opaque handle to an initialized provider client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientHandle(String);

impl ClientHandle {
    pub fn new(id: impl Into<String>) -> Self { Self(id.into()) }
    pub fn id(&self) -> &str { &self.0 }
}

/// Accounts, methods and events granted for one namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionNamespace {
    pub accounts: Vec<String>,
    #[serde(default)]
    pub methods: Vec<String>,
    #[serde(default)]
    pub events: Vec<String>,
}

/// A negotiated wallet session, identified by its topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub topic: String,
    pub namespaces: BTreeMap<String, SessionNamespace>,
}

impl Session {
    pub fn new(topic: impl Into<String>) -> Self {
        Self { topic: topic.into(), namespaces: BTreeMap::new() }
    }

    pub fn with_namespace(mut self, name: impl Into<String>, namespace: SessionNamespace) -> Self {
        self.namespaces.insert(name.into(), namespace);
        self
    }

    /// First account of the `eip155` namespace, if the wallet granted one.
    pub fn account(&self) -> Option<Account> {
        self.namespaces
            .get(eip155::NAMESPACE)
            .and_then(|ns| ns.accounts.first())
            .and_then(|id| Account::parse(id))
    }
}

/// Namespace requirements sent with a pairing proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalNamespace {
    pub chains: Vec<String>,
    pub methods: Vec<String>,
    pub events: Vec<String>,
}

impl ProposalNamespace {
    /// Fixed EVM proposal: the four signing methods and both change events on `chain`.
    pub fn eip155(chain: &str) -> Self {
        Self {
            chains: vec![chain.into()],
            methods: eip155::METHODS.iter().map(|m| (*m).into()).collect(),
            events: eip155::EVENTS.iter().map(|e| (*e).into()).collect(),
        }
    }
}

pub type RequiredNamespaces = BTreeMap<String, ProposalNamespace>;

/// Required namespaces for a proposal scoped to a single EVM chain.
pub fn required_namespaces(chain: &str) -> RequiredNamespaces {
    let mut required = RequiredNamespaces::new();
    required.insert(eip155::NAMESPACE.into(), ProposalNamespace::eip155(chain));
    required
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn account_is_first_eip155_entry() {
        let session = Session::new("t1").with_namespace(
            "eip155",
            SessionNamespace { accounts: vec!["eip155:1001:0xABCDEF".into(), "eip155:1001:0x123".into()], ..Default::default() },
        );
        assert_eq!(session.account().map(|a| a.address), Some("0xABCDEF".to_string()));
    }

    #[test]
    fn no_account_without_eip155_namespace() {
        let session = Session::new("t1").with_namespace(
            "solana",
            SessionNamespace { accounts: vec!["solana:main:abc".into()], ..Default::default() },
        );
        assert!(session.account().is_none());
        assert!(Session::new("t2").with_namespace("eip155", SessionNamespace::default()).account().is_none());
    }

    #[test]
    fn session_deserializes_without_methods_or_events() {
        let session: Session = serde_json::from_value(json!({
            "topic": "t1",
            "namespaces": {"eip155": {"accounts": ["eip155:1001:0xABCDEF"]}}
        }))
        .expect("session");
        assert_eq!(session.topic, "t1");
        assert_eq!(session.account().expect("account").address(), "0xABCDEF");
    }

    #[test]
    fn proposal_covers_fixed_methods_and_events() {
        let required = required_namespaces("eip155:1001");
        let value = serde_json::to_value(&required).expect("json");
        assert_eq!(
            value,
            json!({"eip155": {
                "chains": ["eip155:1001"],
                "methods": ["personal_sign", "eth_signTransaction", "eth_signTypedData", "eth_sendTransaction"],
                "events": ["chainChanged", "accountsChanged"]
            }})
        );
    }
}
