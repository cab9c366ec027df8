//! Block and block-id wire types for `starknet_getBlockWith{TxHashes,Txs,Receipts}` and friends.

use serde::{Deserialize, Serialize};
use starknet_client_primitives::{ContractAddress, Felt252};

use crate::receipt::TxReceiptWithHash;
use crate::transaction::TxWithHash;

/// Identifies a block by hash, number, or one of the two pending tags the Starknet RPC spec
/// recognises.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockId {
    #[serde(rename = "block_hash")]
    Hash(Felt252),
    #[serde(rename = "block_number")]
    Number(u64),
    Latest,
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BlockStatus {
    Pending,
    AcceptedOnL2,
    AcceptedOnL1,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum L1DataAvailabilityMode {
    #[serde(rename = "CALLDATA")]
    Calldata,
    #[serde(rename = "BLOB")]
    Blob,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResourcePrice {
    #[serde(with = "starknet_client_serde_utils::felt_hex")]
    pub price_in_wei: u128,
    #[serde(with = "starknet_client_serde_utils::felt_hex")]
    pub price_in_fri: u128,
}

/// Fields shared by every block header shape (confirmed, pending, and tx-hash-only variants).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockHeader {
    pub parent_hash: Felt252,
    pub timestamp: u64,
    pub sequencer_address: ContractAddress,
    pub l1_gas_price: ResourcePrice,
    pub l2_gas_price: ResourcePrice,
    pub l1_data_gas_price: ResourcePrice,
    pub l1_da_mode: L1DataAvailabilityMode,
    pub starknet_version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmedBlockHeader {
    #[serde(flatten)]
    pub header: BlockHeader,
    pub block_hash: Felt252,
    pub block_number: u64,
    pub new_root: Felt252,
    pub status: BlockStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockWithTxHashes {
    #[serde(flatten)]
    pub header: ConfirmedBlockHeader,
    pub transactions: Vec<Felt252>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingBlockWithTxHashes {
    #[serde(flatten)]
    pub header: BlockHeader,
    pub transactions: Vec<Felt252>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MaybePendingBlockWithTxHashes {
    Pending(PendingBlockWithTxHashes),
    Block(BlockWithTxHashes),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockWithTxs {
    #[serde(flatten)]
    pub header: ConfirmedBlockHeader,
    pub transactions: Vec<TxWithHash>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingBlockWithTxs {
    #[serde(flatten)]
    pub header: BlockHeader,
    pub transactions: Vec<TxWithHash>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MaybePendingBlockWithTxs {
    Pending(PendingBlockWithTxs),
    Block(BlockWithTxs),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockWithReceipts {
    #[serde(flatten)]
    pub header: ConfirmedBlockHeader,
    pub transactions: Vec<TxReceiptWithHash>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingBlockWithReceipts {
    #[serde(flatten)]
    pub header: BlockHeader,
    pub transactions: Vec<TxReceiptWithHash>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MaybePendingBlockWithReceipts {
    Pending(PendingBlockWithReceipts),
    Block(BlockWithReceipts),
}

/// Result of `starknet_blockHashAndNumber`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHashAndNumber {
    pub block_hash: Felt252,
    pub block_number: u64,
}

/// Result of `starknet_syncing`: either `false` (not syncing) or a sync-status object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SyncingStatus {
    NotSyncing(bool),
    Syncing(SyncStatus),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncStatus {
    pub starting_block_hash: Felt252,
    pub starting_block_num: u64,
    pub current_block_hash: Felt252,
    pub current_block_num: u64,
    pub highest_block_hash: Felt252,
    pub highest_block_num: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_id_tags_match_wire_spec() {
        assert_eq!(serde_json::to_value(BlockId::Latest).unwrap(), "latest");
        assert_eq!(serde_json::to_value(BlockId::Pending).unwrap(), "pending");
        let by_number = serde_json::to_value(BlockId::Number(5)).unwrap();
        assert_eq!(by_number["block_number"], 5);
    }

    #[test]
    fn syncing_status_decodes_bool_or_object() {
        let not_syncing: SyncingStatus = serde_json::from_str("false").unwrap();
        assert_eq!(not_syncing, SyncingStatus::NotSyncing(false));
    }
}
