//! `starknet-client`: the single-import facade over this workspace's transport, provider,
//! account, and transaction-stream layers (spec §2 dataflow: "application value → C3 encode →
//! C7 wraps into a call → C6 lays out `__execute__` calldata → crypto signs → C7 submits via C5 →
//! C4 carries the request → receipt polling/streaming via C8").
//!
//! [`Client<HttpTransport>`] and [`Client<WsTransport>`] are the two concrete entry points;
//! everything else in this crate is a thin pass-through to `starknet-client-provider`,
//! `starknet-client-account`, and `starknet-client-streams` so a caller only needs one
//! dependency.

pub mod error;

use std::sync::Arc;

use futures::Stream;
use starknet_client_account::{Account, DeclarePayload, DeployAccountPayload, ExecutionDetails, Signer};
use starknet_client_hash::Call;
use starknet_client_primitives::{ClassHash, ContractAddress, Felt252};
use starknet_client_provider::Provider;
use starknet_client_rpc_types::fee::FeeEstimate;
use starknet_client_rpc_types::transaction::TxWithHash;
use starknet_client_streams::{ConfirmedEvent, StreamConfig, StreamError, TrackEvent, TxFilter};
use starknet_client_transport::{
    FallbackConfig, FallbackTransport, HttpConfig, HttpTransport, Transport, WsConfig, WsTransport,
};
use url::Url;

pub use error::ClientError;

// Re-exported so a caller who only depends on this crate still has everything needed to build a
// request: primitives, the ABI/hash layers, and the lower-level types the facade methods return.
pub use starknet_client_abi as abi;
pub use starknet_client_account as account;
pub use starknet_client_hash as hash;
pub use starknet_client_primitives as primitives;
pub use starknet_client_provider as provider;
pub use starknet_client_rpc_types as rpc_types;
pub use starknet_client_streams as streams;
pub use starknet_client_transport as transport;

/// A Starknet client bound to one transport: a provider for reads, an optional account for
/// writes, and the stream configuration `watch_pending`/`watch_confirmed`/`track` use.
pub struct Client<T: Transport> {
    provider: Arc<Provider<T>>,
    account: Option<Account<T>>,
    stream_config: StreamConfig,
}

impl<T: Transport> Client<T> {
    pub fn from_provider(provider: Provider<T>) -> Self {
        Self { provider: Arc::new(provider), account: None, stream_config: StreamConfig::default() }
    }

    pub fn provider(&self) -> &Arc<Provider<T>> {
        &self.provider
    }

    /// Attaches a local signer as this client's account. Use [`Account::new`] directly (via
    /// [`Client::provider`]) for a counterfactual address not yet known at construction time.
    pub fn with_account(mut self, address: ContractAddress, signer: impl Signer + 'static) -> Self {
        self.account = Some(Account::new(Arc::clone(&self.provider), address, signer));
        self
    }

    pub fn with_stream_config(mut self, config: StreamConfig) -> Self {
        self.stream_config = config;
        self
    }

    pub fn account(&self) -> Result<&Account<T>, ClientError> {
        self.account.as_ref().ok_or(ClientError::NoAccount)
    }

    pub async fn execute(&self, calls: Vec<Call>, details: ExecutionDetails) -> Result<Felt252, ClientError> {
        Ok(self.account()?.execute(calls, details).await?)
    }

    pub async fn estimate_invoke_fee(
        &self,
        calls: Vec<Call>,
        details: ExecutionDetails,
        skip_validate: bool,
    ) -> Result<FeeEstimate, ClientError> {
        Ok(self.account()?.estimate_invoke_fee(calls, details, skip_validate).await?)
    }

    pub async fn declare(
        &self,
        payload: DeclarePayload,
        details: ExecutionDetails,
    ) -> Result<(Felt252, ClassHash), ClientError> {
        Ok(self.account()?.declare(payload, details).await?)
    }

    pub async fn deploy_account(
        &self,
        payload: DeployAccountPayload,
        details: ExecutionDetails,
    ) -> Result<(Felt252, ContractAddress), ClientError> {
        Ok(self.account()?.deploy_account(payload, details).await?)
    }

    pub fn sign_message(&self, hash: Felt252) -> Result<(Felt252, Felt252), ClientError> {
        Ok(self.account()?.sign_message(hash)?)
    }

    pub fn watch_pending(&self, filter: TxFilter) -> impl Stream<Item = Result<TxWithHash, StreamError>> {
        starknet_client_streams::watch_pending(
            Arc::clone(&self.provider),
            filter,
            self.stream_config.clone(),
        )
    }

    pub fn watch_confirmed(
        &self,
        filter: TxFilter,
        confirmations: u64,
        from_block: Option<u64>,
    ) -> impl Stream<Item = Result<ConfirmedEvent, StreamError>> {
        starknet_client_streams::watch_confirmed(
            Arc::clone(&self.provider),
            filter,
            confirmations,
            from_block,
            self.stream_config.clone(),
        )
    }

    pub fn track(&self, tx_hash: Felt252, confirmations: u64) -> impl Stream<Item = Result<TrackEvent, StreamError>> {
        starknet_client_streams::track(
            Arc::clone(&self.provider),
            tx_hash,
            confirmations,
            self.stream_config.clone(),
        )
    }
}

impl Client<HttpTransport> {
    pub fn http(url: Url) -> Self {
        Self::http_with_config(url, HttpConfig::default())
    }

    pub fn http_with_config(url: Url, config: HttpConfig) -> Self {
        Self::from_provider(Provider::new(HttpTransport::with_config(url, config)))
    }
}

impl Client<FallbackTransport> {
    pub fn fallback(transports: Vec<Arc<dyn Transport>>) -> Self {
        Self::fallback_with_config(transports, FallbackConfig::default())
    }

    pub fn fallback_with_config(transports: Vec<Arc<dyn Transport>>, config: FallbackConfig) -> Self {
        Self::from_provider(Provider::new(FallbackTransport::with_config(transports, config)))
    }
}

impl Client<WsTransport> {
    pub async fn connect_ws(url: Url) -> Result<Self, ClientError> {
        Self::connect_ws_with_config(url, WsConfig::default()).await
    }

    pub async fn connect_ws_with_config(url: Url, config: WsConfig) -> Result<Self, ClientError> {
        let transport = WsTransport::connect_with_config(url, config).await?;
        Ok(Self::from_provider(Provider::new(transport)))
    }

    pub async fn watch_pending_ws(
        &self,
        filter: TxFilter,
    ) -> Result<impl Stream<Item = Result<TxWithHash, StreamError>>, ClientError> {
        Ok(starknet_client_streams::watch_pending_ws(
            Arc::clone(&self.provider),
            filter,
            self.stream_config.clone(),
        )
        .await?)
    }

    pub async fn watch_confirmed_ws(
        &self,
        filter: TxFilter,
        confirmations: u64,
        from_block: Option<u64>,
    ) -> Result<impl Stream<Item = Result<ConfirmedEvent, StreamError>>, ClientError> {
        Ok(starknet_client_streams::watch_confirmed_ws(
            Arc::clone(&self.provider),
            filter,
            confirmations,
            from_block,
            self.stream_config.clone(),
        )
        .await?)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use futures::StreamExt;
    use serde_json::json;
    use starknet_client_rpc_types::{JsonRpcRequest, JsonRpcResponse};

    use super::*;

    #[test]
    fn http_client_has_no_account_until_one_is_attached() {
        let client = Client::http(Url::parse("http://localhost:5050").unwrap());
        assert!(client.account().is_err());

        let client = client.with_account(
            ContractAddress::new(Felt252::from_hex("0xabc").unwrap()).unwrap(),
            starknet_client_account::LocalSigner::new(Felt252::from_u64(1)),
        );
        assert!(client.account().is_ok());
    }

    /// Always answers `starknet_getBlockWithTxs` with one pending invoke transaction, regardless
    /// of which block id was asked for.
    struct StubTransport;

    #[async_trait]
    impl Transport for StubTransport {
        async fn request(&self, req: JsonRpcRequest) -> JsonRpcResponse {
            let result = json!({
                "parent_hash": "0x0", "timestamp": 0, "sequencer_address": "0x0",
                "l1_gas_price": {"price_in_wei": "0x0", "price_in_fri": "0x0"},
                "l2_gas_price": {"price_in_wei": "0x0", "price_in_fri": "0x0"},
                "l1_data_gas_price": {"price_in_wei": "0x0", "price_in_fri": "0x0"},
                "l1_da_mode": "CALLDATA", "starknet_version": "0.13.3",
                "transactions": [{
                    "type": "INVOKE",
                    "transaction_hash": "0x1",
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
                    "version": "0x3",
                }],
            });
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

    #[tokio::test(start_paused = true)]
    async fn watch_pending_forwards_through_to_the_stream_layer() {
        let config = StreamConfig { poll_interval: std::time::Duration::from_millis(1), ..Default::default() };
        let client = Client::from_provider(Provider::new(StubTransport)).with_stream_config(config);
        let stream = client.watch_pending(TxFilter::default());
        tokio::pin!(stream);

        let first = stream.next().await.unwrap().unwrap();
        assert_eq!(first.transaction_hash, Felt252::from_hex("0x1").unwrap());
    }
}
