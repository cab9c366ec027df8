//! WebSocket-only event subscriptions (spec §4.5 "WebSocket-only subscriptions", §6, §9).
//!
//! Each `subscribe_*` call issues the matching `starknet_subscribe*` request and returns a stream
//! of decoded notifications. A reorg can arrive on any subscription in place of its usual payload
//! (spec §9); it is recognised structurally via [`is_reorg_payload`] and surfaced as
//! [`SubscriptionEvent::Reorg`] instead of failing to decode as the subscription's normal type.

use futures::Stream;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use starknet_client_primitives::{ContractAddress, Felt252};
use starknet_client_rpc_types::subscription::{
    is_reorg_payload, EventsNotification, NewHeadsNotification, NewTransactionReceiptsNotification,
    PendingTransactionsNotification, ReorgNotification, SubscriptionKind, TransactionStatusNotification,
};
use starknet_client_transport::WsTransport;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_stream::StreamExt;

use crate::client::Provider;
use crate::error::ProviderError;

/// One notification from a subscription: its usual typed payload, or a reorg that replaced it.
#[derive(Debug, Clone)]
pub enum SubscriptionEvent<T> {
    Payload(T),
    Reorg(ReorgNotification),
}

/// An open subscription: the id the node assigned it, and the decoded notification stream.
///
/// Rust has no async `Drop`, so letting this go out of scope only stops local delivery — call
/// [`Subscription::unsubscribe`] to also tell the node to stop sending (spec §4.5).
pub struct Subscription<T> {
    id: Value,
    stream: std::pin::Pin<Box<dyn Stream<Item = Result<SubscriptionEvent<T>, ProviderError>> + Send>>,
}

impl<T> Subscription<T> {
    pub fn id(&self) -> &Value {
        &self.id
    }
}

impl<T> Stream for Subscription<T> {
    type Item = Result<SubscriptionEvent<T>, ProviderError>;

    fn poll_next(
        mut self: std::pin::Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Option<Self::Item>> {
        self.stream.as_mut().poll_next(cx)
    }
}

fn decode<T: DeserializeOwned>(raw: Value) -> Result<SubscriptionEvent<T>, ProviderError> {
    if is_reorg_payload(&raw) {
        let reorg: ReorgNotification =
            serde_json::from_value(raw).map_err(|e| ProviderError::Decode(e.to_string()))?;
        return Ok(SubscriptionEvent::Reorg(reorg));
    }
    let payload: T = serde_json::from_value(raw).map_err(|e| ProviderError::Decode(e.to_string()))?;
    Ok(SubscriptionEvent::Payload(payload))
}

impl Provider<WsTransport> {
    async fn subscribe<T: DeserializeOwned + Send + 'static>(
        &self,
        kind: SubscriptionKind,
    ) -> Result<Subscription<T>, ProviderError> {
        let id: Value = self.send(kind.method(), kind.params()).await?;
        let subscription_id = match &id {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        let rx = self.transport().listen(subscription_id).await;
        let stream = UnboundedReceiverStream::new(rx).map(decode::<T>);
        Ok(Subscription { id, stream: Box::pin(stream) })
    }

    pub async fn subscribe_new_heads(&self) -> Result<Subscription<NewHeadsNotification>, ProviderError> {
        self.subscribe(SubscriptionKind::NewHeads).await
    }

    pub async fn subscribe_events(
        &self,
        from_address: Option<ContractAddress>,
        keys: Option<Vec<Vec<Felt252>>>,
    ) -> Result<Subscription<EventsNotification>, ProviderError> {
        self.subscribe(SubscriptionKind::Events { from_address, keys }).await
    }

    pub async fn subscribe_transaction_status(
        &self,
        transaction_hash: Felt252,
    ) -> Result<Subscription<TransactionStatusNotification>, ProviderError> {
        self.subscribe(SubscriptionKind::TransactionStatus { transaction_hash }).await
    }

    pub async fn subscribe_pending_transactions(
        &self,
        sender_address: Option<Vec<ContractAddress>>,
    ) -> Result<Subscription<PendingTransactionsNotification>, ProviderError> {
        self.subscribe(SubscriptionKind::PendingTransactions { sender_address }).await
    }

    pub async fn subscribe_new_transaction_receipts(
        &self,
        sender_address: Option<Vec<ContractAddress>>,
    ) -> Result<Subscription<NewTransactionReceiptsNotification>, ProviderError> {
        self.subscribe(SubscriptionKind::NewTransactionReceipts { sender_address }).await
    }

    /// Tells the node to stop a subscription. Takes the id returned by the `subscribe_*` call
    /// that opened it, or [`Subscription::id`].
    pub async fn unsubscribe(&self, subscription_id: Value) -> Result<bool, ProviderError> {
        self.send("starknet_unsubscribe", json!([subscription_id])).await
    }
}
