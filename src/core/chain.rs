//! Chain and protocol constants
//!
//! Centralized registry for the namespace, chain, method and event names
//! exchanged with the signing session provider.

/// EIP-155 namespace (EVM chains)
pub mod eip155 {
    pub const NAMESPACE: &str = "eip155";
    pub const DEFAULT_CHAIN: &str = "eip155:1001";

    pub const PERSONAL_SIGN: &str = "personal_sign";
    pub const SIGN_TRANSACTION: &str = "eth_signTransaction";
    pub const SIGN_TYPED_DATA: &str = "eth_signTypedData";
    pub const SEND_TRANSACTION: &str = "eth_sendTransaction";

    pub const METHODS: &[&str] = &[PERSONAL_SIGN, SIGN_TRANSACTION, SIGN_TYPED_DATA, SEND_TRANSACTION];

    pub const CHAIN_CHANGED: &str = "chainChanged";
    pub const ACCOUNTS_CHANGED: &str = "accountsChanged";

    pub const EVENTS: &[&str] = &[CHAIN_CHANGED, ACCOUNTS_CHANGED];
}

/// Session termination reason sent on disconnect
pub mod disconnect {
    pub const REASON_CODE: i64 = 600;
    pub const REASON_MESSAGE: &str = "Disconnected";
}

/// Wallet picker defaults
pub mod wallets {
    pub const RECOMMENDED: &str = "b956da9052132e3dabdcd78feb596d5194c99b7345d8c4bd7a47cabdcb69a25f";
}

/// Environment variables read by `AppConfig::from_env`
pub mod env {
    pub const PROJECT_ID: &str = "BEECONNECT_PROJECT_ID";
    pub const CHAIN: &str = "BEECONNECT_CHAIN";
    pub const TEST_ACCOUNT: &str = "BEECONNECT_TEST_ACCOUNT";
    pub const LOG_JSON: &str = "BEECONNECT_LOG_JSON";
}
