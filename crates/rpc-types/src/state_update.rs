//! `starknet_getStateUpdate` wire types.

use serde::{Deserialize, Serialize};
use starknet_client_primitives::{ContractAddress, Felt252};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageEntry {
    pub key: Felt252,
    pub value: Felt252,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractStorageDiffItem {
    pub address: ContractAddress,
    pub storage_entries: Vec<StorageEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployedContractItem {
    pub address: ContractAddress,
    pub class_hash: Felt252,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaredClassItem {
    pub class_hash: Felt252,
    pub compiled_class_hash: Felt252,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonceUpdate {
    pub contract_address: ContractAddress,
    pub nonce: Felt252,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplacedClassItem {
    pub contract_address: ContractAddress,
    pub class_hash: Felt252,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StateDiff {
    #[serde(default)]
    pub storage_diffs: Vec<ContractStorageDiffItem>,
    #[serde(default)]
    pub deprecated_declared_classes: Vec<Felt252>,
    #[serde(default)]
    pub declared_classes: Vec<DeclaredClassItem>,
    #[serde(default)]
    pub deployed_contracts: Vec<DeployedContractItem>,
    #[serde(default)]
    pub replaced_classes: Vec<ReplacedClassItem>,
    #[serde(default)]
    pub nonces: Vec<NonceUpdate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateUpdate {
    pub block_hash: Felt252,
    pub old_root: Felt252,
    pub new_root: Felt252,
    pub state_diff: StateDiff,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingStateUpdate {
    pub old_root: Felt252,
    pub state_diff: StateDiff,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MaybePendingStateUpdate {
    Pending(PendingStateUpdate),
    Update(StateUpdate),
}
