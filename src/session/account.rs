//! Account - chain-qualified address (CAIP-10: `namespace:reference:address`)

use serde::{Deserialize, Serialize};
use std::fmt;

/// Active account projected from a session's first namespace entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Chain namespace, e.g. `eip155`
    pub namespace: String,
    /// Chain reference within the namespace, e.g. `1001`
    pub reference: String,
    /// Address with the chain prefix stripped
    pub address: String,
}

impl Account {
    /// Parse a CAIP-10 account id. Everything after the second `:` is the address.
    pub fn parse(caip10: &str) -> Option<Self> {
        let mut parts = caip10.splitn(3, ':');
        let namespace = parts.next().filter(|s| !s.is_empty())?;
        let reference = parts.next().filter(|s| !s.is_empty())?;
        let address = parts.next().filter(|s| !s.is_empty())?;
        Some(Self { namespace: namespace.into(), reference: reference.into(), address: address.into() })
    }

    pub fn address(&self) -> &str { &self.address }

    /// `namespace:reference`, the chain id this account lives on
    pub fn chain_id(&self) -> String { format!("{}:{}", self.namespace, self.reference) }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_eip155_account() {
        let account = Account::parse("eip155:1001:0xABCDEF").expect("account");
        assert_eq!(account.namespace, "eip155");
        assert_eq!(account.reference, "1001");
        assert_eq!(account.address(), "0xABCDEF");
        assert_eq!(account.chain_id(), "eip155:1001");
        assert_eq!(account.to_string(), "0xABCDEF");
    }

    #[test]
    fn keeps_colons_inside_address() {
        let account = Account::parse("cosmos:hub:addr:with:colons").expect("account");
        assert_eq!(account.address(), "addr:with:colons");
    }

    #[test]
    fn rejects_incomplete_ids() {
        assert!(Account::parse("").is_none());
        assert!(Account::parse("eip155").is_none());
        assert!(Account::parse("eip155:1001").is_none());
        assert!(Account::parse("eip155:1001:").is_none());
        assert!(Account::parse(":1001:0xabc").is_none());
    }
}
