//! Request bodies for `starknet_add{Invoke,Declare,DeployAccount}Transaction` and
//! `starknet_estimateFee`/`simulateTransactions` — the "broadcasted" transaction shapes, which
//! add a `signature` the confirmed-transaction DTOs in [`crate::transaction`] don't carry before
//! submission. Scoped to v3 (spec §3, §4.7).

use serde::{Deserialize, Serialize};
use starknet_client_primitives::fee::DataAvailabilityMode;
use starknet_client_primitives::{ContractAddress, Felt252};

use crate::transaction::RpcResourceBounds;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BroadcastedInvokeTxV3 {
    pub r#type: &'static str,
    pub version: &'static str,
    pub sender_address: ContractAddress,
    pub calldata: Vec<Felt252>,
    pub signature: Vec<Felt252>,
    pub nonce: Felt252,
    pub resource_bounds: RpcResourceBounds,
    #[serde(with = "starknet_client_serde_utils::felt_hex")]
    pub tip: u128,
    pub paymaster_data: Vec<Felt252>,
    pub account_deployment_data: Vec<Felt252>,
    pub nonce_data_availability_mode: DataAvailabilityMode,
    pub fee_data_availability_mode: DataAvailabilityMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_query: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BroadcastedDeclareTxV3 {
    pub r#type: &'static str,
    pub version: &'static str,
    pub sender_address: ContractAddress,
    pub compiled_class_hash: Felt252,
    /// The Sierra contract class, passed through as opaque JSON — `crates/abi` is the one
    /// component that knows how to build and hash this payload.
    pub contract_class: serde_json::Value,
    pub signature: Vec<Felt252>,
    pub nonce: Felt252,
    pub resource_bounds: RpcResourceBounds,
    #[serde(with = "starknet_client_serde_utils::felt_hex")]
    pub tip: u128,
    pub paymaster_data: Vec<Felt252>,
    pub account_deployment_data: Vec<Felt252>,
    pub nonce_data_availability_mode: DataAvailabilityMode,
    pub fee_data_availability_mode: DataAvailabilityMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_query: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BroadcastedDeployAccountTxV3 {
    pub r#type: &'static str,
    pub version: &'static str,
    pub class_hash: Felt252,
    pub contract_address_salt: Felt252,
    pub constructor_calldata: Vec<Felt252>,
    pub signature: Vec<Felt252>,
    pub nonce: Felt252,
    pub resource_bounds: RpcResourceBounds,
    #[serde(with = "starknet_client_serde_utils::felt_hex")]
    pub tip: u128,
    pub paymaster_data: Vec<Felt252>,
    pub nonce_data_availability_mode: DataAvailabilityMode,
    pub fee_data_availability_mode: DataAvailabilityMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_query: Option<bool>,
}

/// Any one of the three broadcastable transaction shapes, for calls that accept a mixed batch
/// (`estimateFee`, `simulateTransactions`). Untagged: the three structs are distinguishable by
/// their field sets alone (`sender_address`+`calldata` vs. `class_hash`+`compiled_class_hash`
/// vs. `constructor_calldata`), so no extra discriminant is needed beyond each struct's own
/// `type` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum BroadcastedTx {
    Invoke(BroadcastedInvokeTxV3),
    Declare(BroadcastedDeclareTxV3),
    DeployAccount(BroadcastedDeployAccountTxV3),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvokeTxResponse {
    pub transaction_hash: Felt252,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclareTxResponse {
    pub transaction_hash: Felt252,
    pub class_hash: Felt252,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployAccountTxResponse {
    pub transaction_hash: Felt252,
    pub contract_address: ContractAddress,
}
