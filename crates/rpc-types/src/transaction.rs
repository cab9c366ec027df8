//! Transaction wire types. Scoped to the v3 transaction record (spec §3 "Transaction v3 record");
//! pre-v3 transactions the node may still return over history-reading RPC calls decode into the
//! [`Tx::Legacy`] catch-all rather than a fully typed shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use starknet_client_primitives::fee::{DataAvailabilityMode, ResourceBoundsSet};
use starknet_client_primitives::{ContractAddress, Felt252};

/// The resource-bounds mapping as it appears on the wire: `{l1_gas, l2_gas, l1_data_gas}`, each
/// `{max_amount, max_price_per_unit}` hex-encoded (spec §3, §4.6).
pub type RpcResourceBounds = ResourceBoundsSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvokeTxV3 {
    pub sender_address: ContractAddress,
    pub calldata: Vec<Felt252>,
    pub nonce: Felt252,
    pub resource_bounds: RpcResourceBounds,
    #[serde(with = "starknet_client_serde_utils::felt_hex")]
    pub tip: u128,
    pub paymaster_data: Vec<Felt252>,
    pub account_deployment_data: Vec<Felt252>,
    pub nonce_data_availability_mode: DataAvailabilityMode,
    pub fee_data_availability_mode: DataAvailabilityMode,
    pub signature: Vec<Felt252>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclareTxV3 {
    pub sender_address: ContractAddress,
    pub class_hash: Felt252,
    pub compiled_class_hash: Felt252,
    pub nonce: Felt252,
    pub resource_bounds: RpcResourceBounds,
    #[serde(with = "starknet_client_serde_utils::felt_hex")]
    pub tip: u128,
    pub paymaster_data: Vec<Felt252>,
    pub account_deployment_data: Vec<Felt252>,
    pub nonce_data_availability_mode: DataAvailabilityMode,
    pub fee_data_availability_mode: DataAvailabilityMode,
    pub signature: Vec<Felt252>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployAccountTxV3 {
    pub class_hash: Felt252,
    pub contract_address_salt: Felt252,
    pub constructor_calldata: Vec<Felt252>,
    pub nonce: Felt252,
    pub resource_bounds: RpcResourceBounds,
    #[serde(with = "starknet_client_serde_utils::felt_hex")]
    pub tip: u128,
    pub paymaster_data: Vec<Felt252>,
    pub nonce_data_availability_mode: DataAvailabilityMode,
    pub fee_data_availability_mode: DataAvailabilityMode,
    pub signature: Vec<Felt252>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TxV3 {
    #[serde(rename = "INVOKE")]
    Invoke(InvokeTxV3),
    #[serde(rename = "DECLARE")]
    Declare(DeclareTxV3),
    #[serde(rename = "DEPLOY_ACCOUNT")]
    DeployAccount(DeployAccountTxV3),
}

/// A transaction as returned by the node: a typed v3 record when `version == "0x3"`, or the raw
/// JSON for any older transaction version.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Tx {
    V3(TxV3),
    Legacy(Value),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxWithHash {
    pub transaction_hash: Felt252,
    #[serde(flatten)]
    pub transaction: Tx,
}

/// Execution status of a transaction once it has a receipt (spec §4.8 `track`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionStatus {
    Succeeded,
    Reverted,
}

/// Result of `starknet_getTransactionStatus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FinalityStatus {
    Received,
    Candidate,
    PreConfirmed,
    AcceptedOnL2,
    AcceptedOnL1,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionStatus {
    pub finality_status: FinalityStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_status: Option<ExecutionStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_v3_invoke() {
        let json = serde_json::json!({
            "type": "INVOKE",
            "transaction_hash": "0x1",
            "sender_address": "0x2",
            "calldata": ["0x3"],
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
        });
        let tx: TxWithHash = serde_json::from_value(json).unwrap();
        assert!(matches!(tx.transaction, Tx::V3(TxV3::Invoke(_))));
    }

    #[test]
    fn falls_back_to_legacy_for_unknown_version() {
        let json = serde_json::json!({"type": "INVOKE", "version": "0x1", "max_fee": "0x0"});
        let tx: Tx = serde_json::from_value(json).unwrap();
        assert!(matches!(tx, Tx::Legacy(_)));
    }
}
