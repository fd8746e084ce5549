//! Demo payloads built from the active account and the configured test recipient

use super::{Method, SignRequest, Transaction, TypedData, TypedDomain, TypedField};
use serde_json::json;
use std::collections::BTreeMap;

pub const SAMPLE_MESSAGE: &str = "Hello World!";
const EMPTY_DATA: &str = "0x";
const ZERO_VALUE: &str = "0x00";
const TRANSFER_GAS: &str = "0x5208";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Samples {
    account: String,
    recipient: String,
}

impl Samples {
    pub fn new(account: impl Into<String>, recipient: impl Into<String>) -> Self {
        Self { account: account.into(), recipient: recipient.into() }
    }

    pub fn build(&self, method: Method) -> SignRequest {
        match method {
            Method::PersonalSign => self.personal_sign(),
            Method::SignTransaction => SignRequest::SignTransaction(self.transaction(None)),
            Method::SignTypedData => self.typed_data(),
            Method::SendTransaction => SignRequest::SendTransaction(self.transaction(Some(TRANSFER_GAS))),
        }
    }

    pub fn personal_sign(&self) -> SignRequest {
        SignRequest::PersonalSign { message: SAMPLE_MESSAGE.into(), address: self.account.clone() }
    }

    fn transaction(&self, gas_limit: Option<&str>) -> Transaction {
        Transaction {
            from: self.account.clone(),
            to: self.recipient.clone(),
            data: EMPTY_DATA.into(),
            value: ZERO_VALUE.into(),
            gas_limit: gas_limit.map(Into::into),
        }
    }

    /// "Ether Mail" EIP-712 message from Cow to Bob
    pub fn typed_data(&self) -> SignRequest {
        let mut types = BTreeMap::new();
        types.insert(
            "EIP712Domain".to_string(),
            vec![
                TypedField::new("name", "string"),
                TypedField::new("version", "string"),
                TypedField::new("chainId", "uint256"),
                TypedField::new("verifyingContract", "address"),
            ],
        );
        types.insert("Person".to_string(), vec![TypedField::new("name", "string"), TypedField::new("wallet", "address")]);
        types.insert(
            "Mail".to_string(),
            vec![TypedField::new("from", "Person"), TypedField::new("to", "Person"), TypedField::new("contents", "string")],
        );

        SignRequest::SignTypedData {
            address: self.account.clone(),
            data: TypedData {
                types,
                primary_type: "Mail".into(),
                domain: TypedDomain {
                    name: "Ether Mail".into(),
                    version: "1".into(),
                    chain_id: "1001".into(),
                    verifying_contract: "0xa".into(),
                },
                message: json!({
                    "from": {"name": "Cow", "wallet": self.recipient},
                    "to": {"name": "Bob", "wallet": self.recipient},
                    "contents": "Hello, Bob!"
                }),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_and_send_transactions_differ_only_in_gas() {
        let samples = Samples::new("0xA", "0xB");
        let sign = samples.build(Method::SignTransaction).params();
        let send = samples.build(Method::SendTransaction).params();
        assert_eq!(sign, vec![json!({"from": "0xA", "to": "0xB", "data": "0x", "value": "0x00"})]);
        assert_eq!(send, vec![json!({"from": "0xA", "to": "0xB", "data": "0x", "value": "0x00", "gasLimit": "0x5208"})]);
    }

    #[test]
    fn typed_data_has_eip712_shape() {
        let params = Samples::new("0xA", "0xB").build(Method::SignTypedData).params();
        assert_eq!(params[0], json!("0xA"));
        let payload = &params[1];
        assert_eq!(payload["primaryType"], "Mail");
        assert_eq!(payload["domain"], json!({"name": "Ether Mail", "version": "1", "chainId": "1001", "verifyingContract": "0xa"}));
        assert_eq!(payload["types"]["Mail"][0], json!({"name": "from", "type": "Person"}));
        assert_eq!(payload["types"]["EIP712Domain"].as_array().map(Vec::len), Some(4));
        assert_eq!(payload["message"]["to"]["wallet"], "0xB");
        assert_eq!(payload["message"]["contents"], "Hello, Bob!");
    }

    #[test]
    fn every_method_has_a_sample() {
        let samples = Samples::new("0xA", "0xB");
        for method in Method::ALL {
            assert_eq!(samples.build(method).method(), method);
        }
    }
}
