//! `watchPending` (spec §4.8): a lazy stream of not-yet-confirmed transactions, deduplicated by
//! hash. Polling mode repeatedly reads the pending block; WebSocket mode rides
//! `starknet_subscribePendingTransactions` and falls back to `getTransactionByHash` when the
//! node only sent a hash.

use std::collections::VecDeque;
use std::sync::Arc;

use futures::Stream;
use starknet_client_provider::Provider;
use starknet_client_rpc_types::block::{BlockId, MaybePendingBlockWithTxs};
use starknet_client_rpc_types::subscription::PendingTransactionsNotification;
use starknet_client_rpc_types::transaction::TxWithHash;
use starknet_client_transport::{Transport, WsTransport};

use crate::config::StreamConfig;
use crate::dedup::SeenState;
use crate::error::{is_transient_lookup_failure, StreamError};
use crate::filter::TxFilter;

fn transactions_of(block: MaybePendingBlockWithTxs) -> Vec<TxWithHash> {
    match block {
        MaybePendingBlockWithTxs::Pending(pending) => pending.transactions,
        MaybePendingBlockWithTxs::Block(block) => block.transactions,
    }
}

struct PollState<T: Transport> {
    provider: Arc<Provider<T>>,
    filter: TxFilter,
    seen: SeenState,
    config: StreamConfig,
    queue: VecDeque<TxWithHash>,
}

/// Polls `starknet_getBlockWithTxs(pending)` every `config.poll_interval`, yielding each new
/// transaction that matches `filter` at most once.
pub fn watch_pending<T: Transport>(
    provider: Arc<Provider<T>>,
    filter: TxFilter,
    config: StreamConfig,
) -> impl Stream<Item = Result<TxWithHash, StreamError>> {
    let seen = SeenState::new(config.max_seen_transactions);
    let state = PollState { provider, filter, seen, config, queue: VecDeque::new() };
    futures::stream::unfold(state, |mut state| async move {
        loop {
            if let Some(tx) = state.queue.pop_front() {
                return Some((Ok(tx), state));
            }

            tokio::time::sleep(state.config.poll_interval).await;
            match state.provider.get_block_with_txs(BlockId::Pending).await {
                Ok(block) => {
                    for tx in transactions_of(block) {
                        if !state.filter.matches(&tx.transaction) {
                            continue;
                        }
                        if state.seen.insert_if_new(tx.transaction_hash) {
                            state.queue.push_back(tx);
                        }
                    }
                }
                Err(error) => {
                    tracing::warn!(%error, "watch_pending: poll failed, retrying");
                    return Some((Err(StreamError::from(error)), state));
                }
            }
        }
    })
}

struct WsState {
    provider: Arc<Provider<WsTransport>>,
    filter: TxFilter,
    seen: SeenState,
    subscription:
        starknet_client_provider::Subscription<PendingTransactionsNotification>,
}

/// WebSocket variant: subscribes once, then resolves hash-only notifications via
/// `getTransactionByHash`, ignoring the pending-receipt-not-found codes a node may race against
/// its own notification (spec §4.8).
pub async fn watch_pending_ws(
    provider: Arc<Provider<WsTransport>>,
    filter: TxFilter,
    config: StreamConfig,
) -> Result<impl Stream<Item = Result<TxWithHash, StreamError>>, StreamError> {
    let sender_address = filter.sender_address.map(|address| vec![address]);
    let subscription = provider.subscribe_pending_transactions(sender_address).await?;
    let seen = SeenState::new(config.max_seen_transactions);
    let state = WsState { provider, filter, seen, subscription };
    Ok(futures::stream::unfold(state, |mut state| async move {
        use futures::StreamExt;
        use starknet_client_provider::SubscriptionEvent;

        loop {
            let event = match state.subscription.next().await {
                Some(Ok(event)) => event,
                Some(Err(error)) => return Some((Err(StreamError::from(error)), state)),
                None => return None,
            };

            let notification = match event {
                SubscriptionEvent::Reorg(_) => continue,
                SubscriptionEvent::Payload(notification) => notification,
            };

            let tx = match notification {
                PendingTransactionsNotification::Full(tx) => tx,
                PendingTransactionsNotification::Hash(hash) => {
                    match state.provider.get_transaction_by_hash(hash).await {
                        Ok(tx) => tx,
                        Err(error) if is_transient_lookup_failure(&error) => continue,
                        Err(error) => return Some((Err(StreamError::from(error)), state)),
                    }

                }
            };

            if !state.filter.matches(&tx.transaction) {
                continue;
            }
            if state.seen.insert_if_new(tx.transaction_hash) {
                return Some((Ok(tx), state));
            }
        }
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use futures::StreamExt;
    use serde_json::{json, Value};
    use starknet_client_rpc_types::{JsonRpcRequest, JsonRpcResponse};

    use super::*;

    /// Replays `blocks` in order for `starknet_getBlockWithTxs`, repeating the last one once
    /// exhausted.
    struct StubTransport {
        blocks: Mutex<VecDeque<Value>>,
    }

    #[async_trait]
    impl Transport for StubTransport {
        async fn request(&self, req: JsonRpcRequest) -> JsonRpcResponse {
            let mut blocks = self.blocks.lock().unwrap();
            let result = if blocks.len() > 1 {
                blocks.pop_front().unwrap()
            } else {
                blocks.front().cloned().unwrap_or_else(|| json!({
                    "parent_hash": "0x0", "timestamp": 0, "sequencer_address": "0x0",
                    "l1_gas_price": {"price_in_wei": "0x0", "price_in_fri": "0x0"},
                    "l2_gas_price": {"price_in_wei": "0x0", "price_in_fri": "0x0"},
                    "l1_data_gas_price": {"price_in_wei": "0x0", "price_in_fri": "0x0"},
                    "l1_da_mode": "CALLDATA", "starknet_version": "0.13.3",
                    "transactions": [],
                }))
            };
            JsonRpcResponse::Success { jsonrpc: Default::default(), id: req.id, result }
        }

        async fn request_batch(&self, reqs: Vec<JsonRpcRequest>) -> Vec<JsonRpcResponse> {
            let mut out = Vec::with_capacity(reqs.len());
            for req in reqs {
                out.push(self.request(req).await);
            }
            out
        }
    }

    fn pending_block_with(hashes: &[&str]) -> Value {
        let transactions: Vec<Value> = hashes
            .iter()
            .map(|hash| {
                json!({
                    "type": "INVOKE",
                    "transaction_hash": hash,
                    "sender_address": "0x1",
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
                })
            })
            .collect();
        json!({
            "parent_hash": "0x0", "timestamp": 0, "sequencer_address": "0x0",
            "l1_gas_price": {"price_in_wei": "0x0", "price_in_fri": "0x0"},
            "l2_gas_price": {"price_in_wei": "0x0", "price_in_fri": "0x0"},
            "l1_data_gas_price": {"price_in_wei": "0x0", "price_in_fri": "0x0"},
            "l1_da_mode": "CALLDATA", "starknet_version": "0.13.3",
            "transactions": transactions,
        })
    }

    #[tokio::test(start_paused = true)]
    async fn new_transactions_are_yielded_once_each() {
        let blocks = VecDeque::from(vec![
            pending_block_with(&["0x1", "0x2"]),
            pending_block_with(&["0x1", "0x2", "0x3"]),
        ]);
        let provider = Arc::new(Provider::new(StubTransport { blocks: Mutex::new(blocks) }));
        let config = StreamConfig { poll_interval: std::time::Duration::from_millis(1), ..Default::default() };
        let stream = watch_pending(provider, TxFilter::default(), config);
        tokio::pin!(stream);

        let first = stream.next().await.unwrap().unwrap();
        let second = stream.next().await.unwrap().unwrap();
        let third = stream.next().await.unwrap().unwrap();
        let hashes: Vec<_> = [first, second, third].iter().map(|tx| tx.transaction_hash).collect();
        assert_eq!(hashes.len(), 3);
        assert_eq!(hashes[2], starknet_client_primitives::Felt252::from_hex("0x3").unwrap());
    }
}
