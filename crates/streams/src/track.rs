//! `track(txHash)` (spec §4.8): polls a single transaction's receipt to terminal `confirmed` or
//! `dropped`, yielding `pending` updates in between.

use std::sync::Arc;

use futures::Stream;
use starknet_client_primitives::Felt252;
use starknet_client_provider::Provider;
use starknet_client_rpc_types::receipt::TxReceiptWithHash;
use starknet_client_rpc_types::transaction::{TransactionStatus, TxWithHash};
use starknet_client_transport::Transport;

use crate::config::StreamConfig;
use crate::error::{is_transient_lookup_failure, StreamError};

/// `pending`/`confirmed`/`dropped` as described in spec §4.8 `track`. `Confirmed` and `Dropped`
/// are terminal: the stream yields at most one of either, as its last item.
#[derive(Debug, Clone)]
pub enum TrackEvent {
    Pending { poll_count: u32, status: Option<TransactionStatus> },
    Confirmed { receipt: TxReceiptWithHash, confirmations: u64, transaction: Option<TxWithHash> },
    Dropped { reason: String },
}

struct TrackState<T: Transport> {
    provider: Arc<Provider<T>>,
    tx_hash: Felt252,
    confirmations: u64,
    config: StreamConfig,
    poll_count: u32,
    done: bool,
}

/// Polls `starknet_getTransactionReceipt` every `config.poll_interval` until the transaction has
/// at least `confirmations` blocks behind it, or `config.max_pending_polls` is exhausted.
pub fn track<T: Transport>(
    provider: Arc<Provider<T>>,
    tx_hash: Felt252,
    confirmations: u64,
    config: StreamConfig,
) -> impl Stream<Item = Result<TrackEvent, StreamError>> {
    let state = TrackState {
        provider,
        tx_hash,
        confirmations: confirmations.max(1),
        config,
        poll_count: 0,
        done: false,
    };
    futures::stream::unfold(state, |mut state| async move {
        if state.done {
            return None;
        }

        if let Some(max_polls) = state.config.max_pending_polls {
            if state.poll_count >= max_polls {
                state.done = true;
                let reason = format!("exceeded max_pending_polls ({max_polls})");
                return Some((Ok(TrackEvent::Dropped { reason }), state));
            }
        }

        tokio::time::sleep(state.config.poll_interval).await;
        state.poll_count += 1;

        match state.provider.get_transaction_receipt(state.tx_hash).await {
            Ok(receipt) => match receipt.block_number {
                None => {
                    let status = state.provider.get_transaction_status(state.tx_hash).await.ok();
                    Some((Ok(TrackEvent::Pending { poll_count: state.poll_count, status }), state))
                }
                Some(block_number) => {
                    let chain_head = match state.provider.block_number().await {
                        Ok(head) => head,
                        Err(error) => {
                            state.done = true;
                            return Some((Err(StreamError::from(error)), state));
                        }
                    };
                    let observed_confirmations = chain_head.saturating_sub(block_number) + 1;
                    if observed_confirmations < state.confirmations {
                        let status = state.provider.get_transaction_status(state.tx_hash).await.ok();
                        return Some((
                            Ok(TrackEvent::Pending { poll_count: state.poll_count, status }),
                            state,
                        ));
                    }
                    let transaction = state.provider.get_transaction_by_hash(state.tx_hash).await.ok();
                    state.done = true;
                    Some((
                        Ok(TrackEvent::Confirmed {
                            receipt,
                            confirmations: observed_confirmations,
                            transaction,
                        }),
                        state,
                    ))
                }
            },
            Err(error) if is_transient_lookup_failure(&error) => {
                let status = state.provider.get_transaction_status(state.tx_hash).await.ok();
                Some((Ok(TrackEvent::Pending { poll_count: state.poll_count, status }), state))
            }
            Err(error) => {
                state.done = true;
                Some((Err(StreamError::from(error)), state))
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use futures::StreamExt;
    use serde_json::{json, Value};
    use starknet_client_rpc_types::envelope::JsonRpcError;
    use starknet_client_rpc_types::{JsonRpcRequest, JsonRpcResponse};

    use super::*;

    struct StubTransport {
        receipts: Mutex<std::collections::VecDeque<Result<Value, (i64, &'static str)>>>,
        chain_head: u64,
    }

    #[async_trait]
    impl Transport for StubTransport {
        async fn request(&self, req: JsonRpcRequest) -> JsonRpcResponse {
            match req.method.as_str() {
                "starknet_getTransactionReceipt" => {
                    let mut receipts = self.receipts.lock().unwrap();
                    match receipts.pop_front().unwrap() {
                        Ok(result) => {
                            JsonRpcResponse::Success { jsonrpc: Default::default(), id: req.id, result }
                        }
                        Err((code, message)) => JsonRpcResponse::Error {
                            jsonrpc: Default::default(),
                            id: req.id,
                            error: JsonRpcError { code, message: message.to_string(), data: None },
                        },
                    }
                }
                "starknet_blockNumber" => {
                    JsonRpcResponse::Success { jsonrpc: Default::default(), id: req.id, result: json!(self.chain_head) }
                }
                "starknet_getTransactionStatus" => JsonRpcResponse::Error {
                    jsonrpc: Default::default(),
                    id: req.id,
                    error: JsonRpcError { code: 29, message: "transaction hash not found".to_string(), data: None },
                },
                "starknet_getTransactionByHash" => JsonRpcResponse::Error {
                    jsonrpc: Default::default(),
                    id: req.id,
                    error: JsonRpcError { code: 29, message: "transaction hash not found".to_string(), data: None },
                },
                other => panic!("unexpected method {other}"),
            }
        }

        async fn request_batch(&self, reqs: Vec<JsonRpcRequest>) -> Vec<JsonRpcResponse> {
            let mut out = Vec::with_capacity(reqs.len());
            for req in reqs {
                out.push(self.request(req).await);
            }
            out
        }
    }

    fn receipt_json(block_number: Option<u64>) -> Value {
        let mut value = json!({
            "transaction_hash": "0x1",
            "type": "INVOKE",
            "execution_status": "SUCCEEDED",
            "finality_status": "ACCEPTED_ON_L2",
            "actual_fee": {"amount": "0x1", "unit": "WEI"},
            "messages_sent": [],
            "events": [],
            "execution_resources": {},
        });
        if let Some(block_number) = block_number {
            value["block_number"] = json!(block_number);
            value["block_hash"] = json!("0x2");
        }
        value
    }

    fn config() -> StreamConfig {
        StreamConfig { poll_interval: std::time::Duration::from_millis(1), ..Default::default() }
    }

    #[tokio::test(start_paused = true)]
    async fn terminal_not_found_error_is_treated_as_pending_and_then_confirms() {
        let transport = StubTransport {
            receipts: Mutex::new(std::collections::VecDeque::from(vec![
                Err((29, "transaction hash not found")),
                Ok(receipt_json(Some(10))),
            ])),
            chain_head: 10,
        };
        let provider = Arc::new(Provider::new(transport));
        let stream = track(provider, Felt252::from_hex("0x1").unwrap(), 1, config());
        tokio::pin!(stream);

        let first = stream.next().await.unwrap().unwrap();
        assert!(matches!(first, TrackEvent::Pending { poll_count: 1, .. }));

        let second = stream.next().await.unwrap().unwrap();
        match second {
            TrackEvent::Confirmed { confirmations, .. } => assert_eq!(confirmations, 1),
            other => panic!("expected Confirmed, got {other:?}"),
        }

        assert!(stream.next().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn exceeding_max_pending_polls_drops_the_stream() {
        let transport = StubTransport {
            receipts: Mutex::new(std::collections::VecDeque::from(vec![
                Err((29, "transaction hash not found")),
                Err((29, "transaction hash not found")),
            ])),
            chain_head: 10,
        };
        let provider = Arc::new(Provider::new(transport));
        let config = StreamConfig { max_pending_polls: Some(2), ..config() };
        let stream = track(provider, Felt252::from_hex("0x1").unwrap(), 1, config);
        tokio::pin!(stream);

        let _ = stream.next().await.unwrap().unwrap();
        let _ = stream.next().await.unwrap().unwrap();
        let third = stream.next().await.unwrap().unwrap();
        assert!(matches!(third, TrackEvent::Dropped { .. }));
        assert!(stream.next().await.is_none());
    }
}
