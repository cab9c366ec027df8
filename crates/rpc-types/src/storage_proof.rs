//! `starknet_getStorageProof` wire types. The Merkle node encoding (binary/edge nodes, hashed
//! siblings) is not otherwise interpreted anywhere in this client, so proof nodes are kept as
//! opaque JSON, the same treatment [`crate::trace::FunctionInvocation`] gives its unspecified
//! nested fields — callers that need to walk the trie verify it against the node's own rules,
//! this client only needs to carry the proof through.

use serde::{Deserialize, Serialize};
use starknet_client_primitives::{ContractAddress, Felt252};

use crate::block::BlockId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractStorageKeys {
    pub contract_address: ContractAddress,
    pub storage_keys: Vec<Felt252>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetStorageProofParams {
    pub block_id: BlockId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_hashes: Option<Vec<Felt252>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_addresses: Option<Vec<ContractAddress>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contracts_storage_keys: Option<Vec<ContractStorageKeys>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalRoots {
    pub contracts_tree_root: Felt252,
    pub classes_tree_root: Felt252,
    pub block_hash: Felt252,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetStorageProofResponse {
    pub classes_proof: Vec<serde_json::Value>,
    pub contracts_proof: ContractsProof,
    pub contracts_storage_proofs: Vec<Vec<serde_json::Value>>,
    pub global_roots: GlobalRoots,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractsProof {
    pub nodes: Vec<serde_json::Value>,
    pub contract_leaves_data: Vec<ContractLeafData>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractLeafData {
    pub nonce: Felt252,
    pub class_hash: Felt252,
}
