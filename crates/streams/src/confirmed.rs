//! `watchConfirmed` (spec §4.8): a lazy stream of transactions once they clear `confirmations`
//! blocks. Cursor math is shared between the polling and WebSocket variants; only how a "new
//! head" tick arrives differs.

use std::collections::VecDeque;
use std::sync::Arc;

use futures::Stream;
use starknet_client_primitives::Felt252;
use starknet_client_provider::{Provider, ProviderError};
use starknet_client_rpc_types::block::{BlockId, MaybePendingBlockWithTxs};
use starknet_client_rpc_types::transaction::TxWithHash;
use starknet_client_transport::{Transport, WsTransport};

use crate::config::StreamConfig;
use crate::dedup::SeenState;
use crate::error::StreamError;
use crate::filter::TxFilter;

#[derive(Debug, Clone)]
pub struct ConfirmedEvent {
    pub transaction: TxWithHash,
    pub block_number: u64,
    pub block_hash: Felt252,
    pub confirmations: u64,
}

/// The cursor/dedup state shared by the polling and WebSocket entry points (spec §4.8 steps 1-5).
struct ConfirmedCore {
    filter: TxFilter,
    confirmations: u64,
    from_block: Option<u64>,
    cursor: Option<u64>,
    seen: SeenState,
}

impl ConfirmedCore {
    fn new(filter: TxFilter, confirmations: u64, from_block: Option<u64>, max_seen: usize) -> Self {
        Self {
            filter,
            confirmations: confirmations.max(1),
            from_block,
            cursor: from_block,
            seen: SeenState::new(max_seen),
        }
    }

    fn reset_for_reorg(&mut self, starting_block_number: u64) {
        self.cursor = Some(self.from_block.unwrap_or(0).max(starting_block_number));
        self.seen.clear();
    }

    async fn advance<T: Transport>(
        &mut self,
        provider: &Provider<T>,
    ) -> Result<Vec<ConfirmedEvent>, ProviderError> {
        let chain_head = provider.block_number().await?;
        let confirmed_head = match chain_head.checked_sub(self.confirmations - 1) {
            Some(head) => head,
            None => return Ok(Vec::new()),
        };

        let start_block = self.cursor.unwrap_or(confirmed_head);
        if start_block > confirmed_head {
            return Ok(Vec::new());
        }

        let mut events = Vec::new();
        for block_number in start_block..=confirmed_head {
            let block = provider.get_block_with_txs(BlockId::Number(block_number)).await?;
            let MaybePendingBlockWithTxs::Block(block) = block else {
                continue;
            };
            let confirmations = chain_head.saturating_sub(block.header.block_number) + 1;
            for tx in block.transactions {
                if !self.filter.matches(&tx.transaction) {
                    continue;
                }
                if !self.seen.insert_if_new(tx.transaction_hash) {
                    continue;
                }
                events.push(ConfirmedEvent {
                    transaction: tx,
                    block_number: block.header.block_number,
                    block_hash: block.header.block_hash,
                    confirmations,
                });
            }
        }
        self.cursor = Some(confirmed_head + 1);
        Ok(events)
    }
}

struct PollState<T: Transport> {
    provider: Arc<Provider<T>>,
    core: ConfirmedCore,
    config: StreamConfig,
    queue: VecDeque<ConfirmedEvent>,
}

/// Polls `starknet_blockNumber`/`starknet_getBlockWithTxs` every `config.poll_interval`.
pub fn watch_confirmed<T: Transport>(
    provider: Arc<Provider<T>>,
    filter: TxFilter,
    confirmations: u64,
    from_block: Option<u64>,
    config: StreamConfig,
) -> impl Stream<Item = Result<ConfirmedEvent, StreamError>> {
    let core = ConfirmedCore::new(filter, confirmations, from_block, config.max_seen_transactions);
    let state = PollState { provider, core, config, queue: VecDeque::new() };
    futures::stream::unfold(state, |mut state| async move {
        loop {
            if let Some(event) = state.queue.pop_front() {
                return Some((Ok(event), state));
            }

            tokio::time::sleep(state.config.poll_interval).await;
            match state.core.advance(&state.provider).await {
                Ok(events) => state.queue.extend(events),
                Err(error) => {
                    tracing::warn!(%error, "watch_confirmed: poll failed, retrying");
                    return Some((Err(StreamError::from(error)), state));
                }
            }
        }
    })
}

struct WsState {
    provider: Arc<Provider<WsTransport>>,
    core: ConfirmedCore,
    subscription: starknet_client_provider::Subscription<
        starknet_client_rpc_types::subscription::NewHeadsNotification,
    >,
    queue: VecDeque<ConfirmedEvent>,
}

/// WebSocket variant: a new-heads subscription drives each advance; a reorg notification on that
/// same subscription resets the cursor and clears dedup state instead of advancing (spec §4.8).
pub async fn watch_confirmed_ws(
    provider: Arc<Provider<WsTransport>>,
    filter: TxFilter,
    confirmations: u64,
    from_block: Option<u64>,
    config: StreamConfig,
) -> Result<impl Stream<Item = Result<ConfirmedEvent, StreamError>>, StreamError> {
    let subscription = provider.subscribe_new_heads().await?;
    let core = ConfirmedCore::new(filter, confirmations, from_block, config.max_seen_transactions);
    let state = WsState { provider, core, subscription, queue: VecDeque::new() };
    Ok(futures::stream::unfold(state, |mut state| async move {
        use futures::StreamExt;
        use starknet_client_provider::SubscriptionEvent;

        loop {
            if let Some(event) = state.queue.pop_front() {
                return Some((Ok(event), state));
            }

            match state.subscription.next().await {
                Some(Ok(SubscriptionEvent::Payload(_head))) => {
                    match state.core.advance(&state.provider).await {
                        Ok(events) => state.queue.extend(events),
                        Err(error) => return Some((Err(StreamError::from(error)), state)),
                    }
                }
                Some(Ok(SubscriptionEvent::Reorg(reorg))) => {
                    state.core.reset_for_reorg(reorg.starting_block_number);
                }
                Some(Err(error)) => return Some((Err(StreamError::from(error)), state)),
                None => return None,
            }
        }
    }))
}
