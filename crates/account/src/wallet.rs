//! Browser-wallet account (spec §4.7 `WalletAccount`, §6 "Browser-wallet protocol"). The SWO
//! itself is consumed, not defined here (spec's Non-goals) — this module only defines the trait
//! boundary a real wallet adapter (e.g. a `wasm-bindgen` binding over `window.starknet`) would
//! implement, and the account logic that sits on top of it.

use async_trait::async_trait;
use serde_json::{json, Value};
use starknet_client_hash::Call;
use starknet_client_primitives::chain::ChainId;
use starknet_client_primitives::{ContractAddress, Felt252};
use starknet_client_provider::Provider;
use starknet_client_transport::Transport;

use crate::error::AccountError;

/// A wallet event the SWO can push at any time (spec §6 `accountsChanged`, `networkChanged`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletEvent {
    AccountsChanged(Vec<ContractAddress>),
    NetworkChanged(ChainId),
}

/// The trait boundary an injected Starknet Window Object adapter implements: a single typed
/// request channel plus a broadcast of wallet-initiated events.
///
/// The spec's `on(event, handler)` / `off(event, handler)` pair is a JS event-emitter idiom;
/// the idiomatic Rust equivalent is a broadcast channel the caller subscribes to and stops
/// listening to simply by dropping the receiver, so `off` has no separate method here.
#[async_trait]
pub trait StarknetWindowObject: Send + Sync {
    /// Issues `request({type, params})` (spec §6) and returns the raw JSON result.
    async fn request(&self, request_type: &str, params: Value) -> Result<Value, AccountError>;

    /// Subscribes to wallet-pushed events (spec §6 `on`).
    fn subscribe(&self) -> tokio::sync::broadcast::Receiver<WalletEvent>;
}

fn call_to_wallet_json(call: &Call) -> Value {
    json!({
        "contract_address": call.to,
        "entry_point": call.entrypoint,
        "calldata": call.calldata,
    })
}

fn transaction_hash_from(response: Value) -> Result<Felt252, AccountError> {
    let hex = response
        .get("transaction_hash")
        .and_then(Value::as_str)
        .ok_or_else(|| AccountError::WalletRequestFailed("missing transaction_hash".to_string()))?;
    Felt252::from_hex(hex)
        .map_err(|e| AccountError::WalletRequestFailed(format!("invalid transaction_hash: {e}")))
}

/// An account whose writes are authorized by an injected browser wallet instead of a local
/// signer (spec §4.7 "`WalletAccount` delegates writes to an injected SWO"). Reads still go
/// through the RPC provider.
pub struct WalletAccount<T: Transport, W: StarknetWindowObject> {
    provider: std::sync::Arc<Provider<T>>,
    wallet: std::sync::Arc<W>,
}

impl<T: Transport, W: StarknetWindowObject> WalletAccount<T, W> {
    pub fn new(provider: std::sync::Arc<Provider<T>>, wallet: std::sync::Arc<W>) -> Self {
        Self { provider, wallet }
    }

    pub fn provider(&self) -> &Provider<T> {
        &self.provider
    }

    /// `wallet_requestAccounts` (spec §6): the address the wallet currently has selected.
    pub async fn address(&self) -> Result<ContractAddress, AccountError> {
        let response = self.wallet.request("wallet_requestAccounts", Value::Null).await?;
        let addresses: Vec<ContractAddress> = serde_json::from_value(response)
            .map_err(|e| AccountError::WalletRequestFailed(e.to_string()))?;
        addresses
            .into_iter()
            .next()
            .ok_or_else(|| AccountError::WalletRequestFailed("wallet returned no accounts".to_string()))
    }

    /// `wallet_requestChainId` (spec §6): the chain the wallet is currently connected to.
    pub async fn chain_id(&self) -> Result<ChainId, AccountError> {
        let response = self.wallet.request("wallet_requestChainId", Value::Null).await?;
        let hex = response
            .as_str()
            .ok_or_else(|| AccountError::WalletRequestFailed("chain id was not a string".to_string()))?;
        Felt252::from_hex(hex)
            .map(ChainId::from)
            .map_err(|e| AccountError::WalletRequestFailed(e.to_string()))
    }

    /// Translates a multicall into the wallet's request shape and submits it via
    /// `wallet_addInvokeTransaction` (spec §4.7, §6). The wallet signs; no local key is involved.
    pub async fn execute(&self, calls: Vec<Call>) -> Result<Felt252, AccountError> {
        let params = json!({ "calls": calls.iter().map(call_to_wallet_json).collect::<Vec<_>>() });
        let response = self.wallet.request("wallet_addInvokeTransaction", params).await?;
        transaction_hash_from(response)
    }

    /// `wallet_signTypedData` (spec §6): hands a SNIP-12 typed-data document to the wallet for
    /// signing, rather than hashing and signing it locally.
    pub async fn sign_typed_data(&self, typed_data: Value) -> Result<Value, AccountError> {
        self.wallet.request("wallet_signTypedData", typed_data).await
    }

    /// Subscribes to wallet-pushed `accountsChanged`/`networkChanged` events (spec §6). Dropping
    /// the returned receiver is the equivalent of `off`.
    pub fn events(&self) -> tokio::sync::broadcast::Receiver<WalletEvent> {
        self.wallet.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use starknet_client_rpc_types::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
    use tokio::sync::broadcast;

    use super::*;

    struct StubWallet {
        addresses: Vec<ContractAddress>,
        tx_hash: Felt252,
        events: broadcast::Sender<WalletEvent>,
    }

    #[async_trait]
    impl StarknetWindowObject for StubWallet {
        async fn request(&self, request_type: &str, _params: Value) -> Result<Value, AccountError> {
            match request_type {
                "wallet_requestAccounts" => Ok(serde_json::to_value(&self.addresses).unwrap()),
                "wallet_addInvokeTransaction" => {
                    Ok(json!({ "transaction_hash": self.tx_hash.to_hex() }))
                }
                other => Err(AccountError::WalletRequestFailed(format!("unexpected request {other}"))),
            }
        }

        fn subscribe(&self) -> broadcast::Receiver<WalletEvent> {
            self.events.subscribe()
        }
    }

    struct NoopTransport;

    #[async_trait]
    impl Transport for NoopTransport {
        async fn request(&self, req: JsonRpcRequest) -> JsonRpcResponse {
            JsonRpcResponse::error(
                req.id,
                JsonRpcError { code: -32601, message: "unused in this test".to_string(), data: None },
            )
        }

        async fn request_batch(&self, reqs: Vec<JsonRpcRequest>) -> Vec<JsonRpcResponse> {
            let mut out = Vec::with_capacity(reqs.len());
            for req in reqs {
                out.push(self.request(req).await);
            }
            out
        }
    }

    fn wallet_account(addresses: Vec<ContractAddress>, tx_hash: Felt252) -> WalletAccount<NoopTransport, StubWallet> {
        let (tx, _rx) = broadcast::channel(16);
        let wallet = Arc::new(StubWallet { addresses, tx_hash, events: tx });
        let provider = Arc::new(Provider::new(NoopTransport));
        WalletAccount::new(provider, wallet)
    }

    #[tokio::test]
    async fn address_returns_the_wallets_first_account() {
        let address = ContractAddress::new(Felt252::from_hex("0x1").unwrap()).unwrap();
        let account = wallet_account(vec![address], Felt252::ZERO);
        assert_eq!(account.address().await.unwrap(), address);
    }

    #[tokio::test]
    async fn address_fails_when_the_wallet_has_no_accounts() {
        let account = wallet_account(vec![], Felt252::ZERO);
        assert!(account.address().await.is_err());
    }

    #[tokio::test]
    async fn execute_decodes_the_wallets_transaction_hash() {
        let expected = Felt252::from_hex("0xbeef").unwrap();
        let account = wallet_account(vec![], expected);
        let call = Call {
            to: ContractAddress::new(Felt252::from_u64(1)).unwrap(),
            entrypoint: "transfer".to_string(),
            calldata: vec![],
        };
        assert_eq!(account.execute(vec![call]).await.unwrap(), expected);
    }

    #[tokio::test]
    async fn events_are_forwarded_to_subscribers() {
        let account = wallet_account(vec![], Felt252::ZERO);
        let mut events = account.events();
        account
            .wallet
            .events
            .send(WalletEvent::NetworkChanged(ChainId::mainnet()))
            .unwrap();
        assert_eq!(events.recv().await.unwrap(), WalletEvent::NetworkChanged(ChainId::mainnet()));
    }
}
