//! The `{senderAddress, types}` filter `watchPending`/`watchConfirmed` apply to every candidate
//! transaction (spec §4.8).

use starknet_client_primitives::ContractAddress;
use starknet_client_rpc_types::transaction::{Tx, TxV3};

/// Leaving both fields `None` matches every transaction.
#[derive(Debug, Clone, Default)]
pub struct TxFilter {
    pub sender_address: Option<ContractAddress>,
    pub types: Option<Vec<String>>,
}

impl TxFilter {
    pub fn matches(&self, tx: &Tx) -> bool {
        if let Some(expected) = self.sender_address {
            if sender_address_of(tx) != Some(expected) {
                return false;
            }
        }
        if let Some(types) = &self.types {
            match type_tag_of(tx) {
                Some(tag) if types.iter().any(|t| t == &tag) => {}
                _ => return false,
            }
        }
        true
    }
}

/// `DEPLOY_ACCOUNT` has no sender (the deployed contract isn't the sender of its own deployment),
/// so it never matches a `sender_address` filter.
fn sender_address_of(tx: &Tx) -> Option<ContractAddress> {
    match tx {
        Tx::V3(TxV3::Invoke(invoke)) => Some(invoke.sender_address),
        Tx::V3(TxV3::Declare(declare)) => Some(declare.sender_address),
        Tx::V3(TxV3::DeployAccount(_)) => None,
        Tx::Legacy(value) => {
            value.get("sender_address").and_then(|v| v.as_str()).and_then(|s| s.parse().ok())
        }
    }
}

fn type_tag_of(tx: &Tx) -> Option<String> {
    match tx {
        Tx::V3(TxV3::Invoke(_)) => Some("INVOKE".to_string()),
        Tx::V3(TxV3::Declare(_)) => Some("DECLARE".to_string()),
        Tx::V3(TxV3::DeployAccount(_)) => Some("DEPLOY_ACCOUNT".to_string()),
        Tx::Legacy(value) => value.get("type").and_then(|v| v.as_str()).map(String::from),
    }
}

#[cfg(test)]
mod tests {
    use starknet_client_primitives::Felt252;
    use starknet_client_rpc_types::transaction::TxWithHash;

    use super::*;

    fn invoke_tx(sender: &str) -> Tx {
        let json = serde_json::json!({
            "type": "INVOKE",
            "sender_address": sender,
            "calldata": [],
            "nonce": "0x0",
            "resource_bounds": {
                "l1_gas": {"max_amount": "0x0", "max_price_per_unit": "0x0"},
                "l2_gas": {"max_amount": "0x0", "max_price_per_unit": "0x0"},
                "l1_data_gas": {"max_amount": "0x0", "max_price_per_unit": "0x0"},
            },
            "tip": "0x0",
            "paymaster_data": [],
            "account_deployment_data": [],
            "nonce_data_availability_mode": "L1",
            "fee_data_availability_mode": "L1",
            "signature": [],
            "transaction_hash": "0x1",
        });
        let with_hash: TxWithHash = serde_json::from_value(json).unwrap();
        with_hash.transaction
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert!(TxFilter::default().matches(&invoke_tx("0x1")));
    }

    #[test]
    fn sender_filter_rejects_other_senders() {
        let filter = TxFilter {
            sender_address: Some("0x1".parse().unwrap()),
            types: None,
        };
        assert!(filter.matches(&invoke_tx("0x1")));
        assert!(!filter.matches(&invoke_tx("0x2")));
    }

    #[test]
    fn type_filter_rejects_other_types() {
        let filter = TxFilter { sender_address: None, types: Some(vec!["DECLARE".to_string()]) };
        assert!(!filter.matches(&invoke_tx("0x1")));

        let filter = TxFilter { sender_address: None, types: Some(vec!["INVOKE".to_string()]) };
        assert!(filter.matches(&invoke_tx("0x1")));
    }

    #[test]
    fn deploy_account_never_matches_a_sender_filter() {
        let json = serde_json::json!({
            "type": "DEPLOY_ACCOUNT",
            "class_hash": "0x1",
            "contract_address_salt": "0x1",
            "constructor_calldata": [],
            "nonce": "0x0",
            "resource_bounds": {
                "l1_gas": {"max_amount": "0x0", "max_price_per_unit": "0x0"},
                "l2_gas": {"max_amount": "0x0", "max_price_per_unit": "0x0"},
                "l1_data_gas": {"max_amount": "0x0", "max_price_per_unit": "0x0"},
            },
            "tip": "0x0",
            "paymaster_data": [],
            "nonce_data_availability_mode": "L1",
            "fee_data_availability_mode": "L1",
            "signature": [],
            "transaction_hash": "0x1",
        });
        let with_hash: TxWithHash = serde_json::from_value(json).unwrap();
        let filter = TxFilter { sender_address: Some("0x1".parse().unwrap()), types: None };
        assert!(!filter.matches(&with_hash.transaction));
        let _ = Felt252::ZERO;
    }
}
