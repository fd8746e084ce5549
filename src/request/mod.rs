//! Signing requests - method names and positional params
//!
//! | Method | Params |
//! |--------|--------|
//! | `personal_sign` | `[message, address]` |
//! | `eth_signTransaction` | `[{from, to, data, value}]` |
//! | `eth_signTypedData` | `[address, {types, primaryType, domain, message}]` |
//! | `eth_sendTransaction` | `[{from, to, data, value, gasLimit}]` |

mod samples;

pub use samples::Samples;

use crate::core::chain::eip155;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Method {
    #[serde(rename = "personal_sign")]
    PersonalSign,
    #[serde(rename = "eth_signTransaction")]
    SignTransaction,
    #[serde(rename = "eth_signTypedData")]
    SignTypedData,
    #[serde(rename = "eth_sendTransaction")]
    SendTransaction,
}

impl Method {
    pub const ALL: [Method; 4] = [Method::PersonalSign, Method::SignTransaction, Method::SignTypedData, Method::SendTransaction];

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::PersonalSign => eip155::PERSONAL_SIGN,
            Method::SignTransaction => eip155::SIGN_TRANSACTION,
            Method::SignTypedData => eip155::SIGN_TYPED_DATA,
            Method::SendTransaction => eip155::SEND_TRANSACTION,
        }
    }

    /// Accepts the wire name or the short CLI alias
    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim() {
            eip155::PERSONAL_SIGN | "sign" => Some(Method::PersonalSign),
            eip155::SIGN_TRANSACTION | "sign-tx" => Some(Method::SignTransaction),
            eip155::SIGN_TYPED_DATA | "sign-typed" => Some(Method::SignTypedData),
            eip155::SEND_TRANSACTION | "send-tx" => Some(Method::SendTransaction),
            _ => None,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// EVM transaction fields, hex-encoded strings as the wallet expects them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub from: String,
    pub to: String,
    pub data: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_limit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedField {
    pub name: String,
    #[serde(rename = "type")]
    pub type_: String,
}

impl TypedField {
    pub fn new(name: &str, type_: &str) -> Self { Self { name: name.into(), type_: type_.into() } }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedDomain {
    pub name: String,
    pub version: String,
    pub chain_id: String,
    pub verifying_contract: String,
}

/// EIP-712 payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedData {
    pub types: BTreeMap<String, Vec<TypedField>>,
    pub primary_type: String,
    pub domain: TypedDomain,
    pub message: Value,
}

/// One of the four requests a session grants
#[derive(Debug, Clone, PartialEq)]
pub enum SignRequest {
    PersonalSign { message: String, address: String },
    SignTransaction(Transaction),
    SignTypedData { address: String, data: TypedData },
    SendTransaction(Transaction),
}

impl SignRequest {
    pub fn method(&self) -> Method {
        match self {
            SignRequest::PersonalSign { .. } => Method::PersonalSign,
            SignRequest::SignTransaction(_) => Method::SignTransaction,
            SignRequest::SignTypedData { .. } => Method::SignTypedData,
            SignRequest::SendTransaction(_) => Method::SendTransaction,
        }
    }

    pub fn params(&self) -> Vec<Value> {
        match self {
            SignRequest::PersonalSign { message, address } => vec![json!(message), json!(address)],
            SignRequest::SignTransaction(tx) | SignRequest::SendTransaction(tx) => vec![json!(tx)],
            SignRequest::SignTypedData { address, data } => vec![json!(address), json!(data)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_names_match_wire_and_aliases() {
        for method in Method::ALL {
            assert_eq!(Method::from_str(method.as_str()), Some(method));
            assert_eq!(serde_json::to_value(method).expect("json"), json!(method.as_str()));
        }
        assert_eq!(Method::from_str("sign-typed"), Some(Method::SignTypedData));
        assert_eq!(Method::from_str("eth_sign"), None);
    }

    #[test]
    fn personal_sign_params_are_message_then_address() {
        let request = SignRequest::PersonalSign { message: "Hello World!".into(), address: "0xABCDEF".into() };
        assert_eq!(request.method(), Method::PersonalSign);
        assert_eq!(request.params(), vec![json!("Hello World!"), json!("0xABCDEF")]);
    }

    #[test]
    fn transaction_omits_absent_gas_limit() {
        let tx = Transaction { from: "0x1".into(), to: "0x2".into(), data: "0x".into(), value: "0x00".into(), gas_limit: None };
        assert_eq!(json!(tx), json!({"from": "0x1", "to": "0x2", "data": "0x", "value": "0x00"}));
        let send = Transaction { gas_limit: Some("0x5208".into()), ..tx };
        assert_eq!(json!(send)["gasLimit"], "0x5208");
    }
}
