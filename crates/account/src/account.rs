//! Local-signer account (spec §4.7): builds, hashes, signs, and submits v3 transactions against
//! any [`Transport`] through a [`Provider`].

use std::sync::Arc;

use starknet_client_hash::{
    compute_address, encode_execute_calldata, hash_declare_v3, hash_deploy_account_v3,
    hash_invoke_v3, Call, DeclareV3, DeployAccountV3, InvokeV3, TxVersion,
};
use starknet_client_primitives::chain::ChainId;
use starknet_client_primitives::{ClassHash, ContractAddress, Felt252};
use starknet_client_provider::Provider;
use starknet_client_rpc_types::block::BlockId;
use starknet_client_rpc_types::broadcasted::{
    BroadcastedDeclareTxV3, BroadcastedDeployAccountTxV3, BroadcastedInvokeTxV3, BroadcastedTx,
};
use starknet_client_rpc_types::fee::{FeeEstimate, SimulationFlag};
use starknet_client_transport::Transport;
use tokio::sync::OnceCell;

use crate::details::{ExecutionDetails, ResolvedDetails};
use crate::error::AccountError;
use crate::signer::Signer;

/// A Sierra class plus the class hash and compiled-class hash `crates/abi` derived from it —
/// this crate only moves the payload, it does not compute either hash itself.
#[derive(Debug, Clone)]
pub struct DeclarePayload {
    pub contract_class: serde_json::Value,
    pub class_hash: ClassHash,
    pub compiled_class_hash: Felt252,
}

/// Constructor arguments for a not-yet-deployed account. `Account::address` must already equal
/// [`compute_address`] over these three fields plus the deployer (always `ContractAddress::ZERO`
/// for self-deploying accounts) — callers derive that address before constructing the `Account`.
#[derive(Debug, Clone)]
pub struct DeployAccountPayload {
    pub class_hash: ClassHash,
    pub constructor_calldata: Vec<Felt252>,
    pub contract_address_salt: Felt252,
}

/// A Starknet account backed by a local [`Signer`]. Generic over the transport so the same
/// account logic runs over HTTP, WebSocket, or a fallback chain.
pub struct Account<T: Transport> {
    address: ContractAddress,
    signer: Box<dyn Signer>,
    provider: Arc<Provider<T>>,
    chain_id: OnceCell<ChainId>,
}

impl<T: Transport> Account<T> {
    pub fn new(provider: Arc<Provider<T>>, address: ContractAddress, signer: impl Signer + 'static) -> Self {
        Self { address, signer: Box::new(signer), provider, chain_id: OnceCell::new() }
    }

    pub fn address(&self) -> ContractAddress {
        self.address
    }

    async fn chain_id(&self) -> Result<ChainId, AccountError> {
        self.chain_id
            .get_or_try_init(|| async { self.provider.chain_id().await.map_err(AccountError::from) })
            .await
            .map(|chain_id| *chain_id)
    }

    /// Fetches the pending nonce (spec §4.7: "fetch nonce via `starknet_getNonce` on cache-miss").
    /// Always hits the node — callers that want to pin a nonce across several calls should set
    /// [`ExecutionDetails::nonce`] explicitly instead of relying on caching here.
    pub async fn nonce(&self) -> Result<Felt252, AccountError> {
        Ok(self.provider.get_nonce(BlockId::Pending, self.address).await?)
    }

    async fn resolve_nonce(&self, details: &ExecutionDetails) -> Result<Felt252, AccountError> {
        match details.nonce {
            Some(nonce) => Ok(nonce),
            None => self.nonce().await,
        }
    }

    fn build_invoke(
        &self,
        calls: &[Call],
        nonce: Felt252,
        resolved: &ResolvedDetails,
    ) -> InvokeV3 {
        InvokeV3 {
            sender_address: self.address,
            calldata: encode_execute_calldata(calls),
            nonce,
            resource_bounds: resolved.resource_bounds,
            tip: resolved.tip,
            paymaster_data: resolved.paymaster_data.clone(),
            nonce_data_availability_mode: resolved.nonce_data_availability_mode,
            fee_data_availability_mode: resolved.fee_data_availability_mode,
            account_deployment_data: resolved.account_deployment_data.clone(),
        }
    }

    fn invoke_to_broadcast(
        &self,
        tx: &InvokeV3,
        signature: Vec<Felt252>,
        is_query: Option<bool>,
    ) -> BroadcastedInvokeTxV3 {
        BroadcastedInvokeTxV3 {
            r#type: "INVOKE",
            version: "0x3",
            sender_address: tx.sender_address,
            calldata: tx.calldata.clone(),
            signature,
            nonce: tx.nonce,
            resource_bounds: tx.resource_bounds,
            tip: tx.tip as u128,
            paymaster_data: tx.paymaster_data.clone(),
            account_deployment_data: tx.account_deployment_data.clone(),
            nonce_data_availability_mode: tx.nonce_data_availability_mode,
            fee_data_availability_mode: tx.fee_data_availability_mode,
            is_query,
        }
    }

    /// Signs and submits a multicall (spec §4.7 `execute`). Returns the transaction hash the
    /// node assigned it.
    pub async fn execute(
        &self,
        calls: Vec<Call>,
        details: ExecutionDetails,
    ) -> Result<Felt252, AccountError> {
        let chain_id = self.chain_id().await?;
        let nonce = self.resolve_nonce(&details).await?;
        let resolved = details.resolve();
        let tx = self.build_invoke(&calls, nonce, &resolved);

        let hash = hash_invoke_v3(&tx, chain_id, TxVersion::Execute);
        let (r, s) = self.signer.sign(hash)?;
        let broadcast = self.invoke_to_broadcast(&tx, vec![r, s], None);

        let response = self.provider.add_invoke_transaction(broadcast).await?;
        Ok(response.transaction_hash)
    }

    /// Estimates the fee for a multicall without submitting it (spec §4.7 `estimateInvokeFee`).
    /// The query-version hash and an empty signature keep this from being mistaken for, or
    /// chargeable as, a real submission; `skip_validate` maps to the `SKIP_VALIDATE` simulation
    /// flag.
    pub async fn estimate_invoke_fee(
        &self,
        calls: Vec<Call>,
        details: ExecutionDetails,
        skip_validate: bool,
    ) -> Result<FeeEstimate, AccountError> {
        let chain_id = self.chain_id().await?;
        let nonce = self.resolve_nonce(&details).await?;
        let resolved = details.resolve();
        let tx = self.build_invoke(&calls, nonce, &resolved);
        let _ = hash_invoke_v3(&tx, chain_id, TxVersion::Query);
        let broadcast = self.invoke_to_broadcast(&tx, vec![], Some(true));

        let flags =
            if skip_validate { vec![SimulationFlag::SkipValidate] } else { Vec::new() };
        let estimates = self
            .provider
            .estimate_fee(vec![BroadcastedTx::Invoke(broadcast)], flags, BlockId::Pending)
            .await?;
        estimates.into_iter().next().ok_or(AccountError::EmptyFeeEstimate)
    }

    /// Signs and submits a `DECLARE` (spec §4.7 `declare`). Returns `(transaction_hash,
    /// class_hash)`.
    pub async fn declare(
        &self,
        payload: DeclarePayload,
        details: ExecutionDetails,
    ) -> Result<(Felt252, ClassHash), AccountError> {
        let chain_id = self.chain_id().await?;
        let nonce = self.resolve_nonce(&details).await?;
        let resolved = details.resolve();

        let tx = DeclareV3 {
            sender_address: self.address,
            class_hash: payload.class_hash,
            compiled_class_hash: payload.compiled_class_hash,
            nonce,
            resource_bounds: resolved.resource_bounds,
            tip: resolved.tip,
            paymaster_data: resolved.paymaster_data.clone(),
            nonce_data_availability_mode: resolved.nonce_data_availability_mode,
            fee_data_availability_mode: resolved.fee_data_availability_mode,
            account_deployment_data: resolved.account_deployment_data.clone(),
        };
        let hash = hash_declare_v3(&tx, chain_id, TxVersion::Execute);
        let (r, s) = self.signer.sign(hash)?;

        let broadcast = BroadcastedDeclareTxV3 {
            r#type: "DECLARE",
            version: "0x3",
            sender_address: tx.sender_address,
            compiled_class_hash: tx.compiled_class_hash,
            contract_class: payload.contract_class,
            signature: vec![r, s],
            nonce: tx.nonce,
            resource_bounds: tx.resource_bounds,
            tip: tx.tip as u128,
            paymaster_data: tx.paymaster_data,
            account_deployment_data: tx.account_deployment_data,
            nonce_data_availability_mode: tx.nonce_data_availability_mode,
            fee_data_availability_mode: tx.fee_data_availability_mode,
            is_query: None,
        };

        let response = self.provider.add_declare_transaction(broadcast).await?;
        Ok((response.transaction_hash, ClassHash::from(response.class_hash)))
    }

    /// Signs and submits a `DEPLOY_ACCOUNT` (spec §4.7 `deployAccount`). The nonce is always
    /// zero — an account contract has no nonce until it exists. `Account::address` must already
    /// be the address these constructor arguments derive to, computed ahead of time with
    /// [`compute_address`]; this method does not re-derive or validate it.
    pub async fn deploy_account(
        &self,
        payload: DeployAccountPayload,
        details: ExecutionDetails,
    ) -> Result<(Felt252, ContractAddress), AccountError> {
        let chain_id = self.chain_id().await?;
        let resolved = details.resolve();

        let tx = DeployAccountV3 {
            class_hash: payload.class_hash,
            constructor_calldata: payload.constructor_calldata,
            contract_address_salt: payload.contract_address_salt,
            nonce: Felt252::ZERO,
            resource_bounds: resolved.resource_bounds,
            tip: resolved.tip,
            paymaster_data: resolved.paymaster_data.clone(),
            nonce_data_availability_mode: resolved.nonce_data_availability_mode,
            fee_data_availability_mode: resolved.fee_data_availability_mode,
        };
        let hash = hash_deploy_account_v3(&tx, self.address, chain_id, TxVersion::Execute);
        let (r, s) = self.signer.sign(hash)?;

        let broadcast = BroadcastedDeployAccountTxV3 {
            r#type: "DEPLOY_ACCOUNT",
            version: "0x3",
            class_hash: tx.class_hash.as_felt(),
            contract_address_salt: tx.contract_address_salt,
            constructor_calldata: tx.constructor_calldata,
            signature: vec![r, s],
            nonce: tx.nonce,
            resource_bounds: tx.resource_bounds,
            tip: tx.tip as u128,
            paymaster_data: tx.paymaster_data,
            nonce_data_availability_mode: tx.nonce_data_availability_mode,
            fee_data_availability_mode: tx.fee_data_availability_mode,
            is_query: None,
        };

        let response = self.provider.add_deploy_account_transaction(broadcast).await?;
        Ok((response.transaction_hash, response.contract_address))
    }

    /// Signs an already-hashed message (spec §4.7 `signMessage`: "not specified further here").
    /// Hashing a SNIP-12 typed-data structure into this felt is outside this crate's scope —
    /// callers that need that hash compute it themselves and pass it in.
    pub fn sign_message(&self, typed_data_hash: Felt252) -> Result<(Felt252, Felt252), AccountError> {
        Ok(self.signer.sign(typed_data_hash)?)
    }
}

/// Addresses an account will be deployed to before it exists on chain (spec §4.6 "Contract
/// address derivation"). A thin wrapper so callers don't have to import `crates/hash` directly
/// just to construct a [`DeployAccountPayload`]/[`Account`] pair.
pub fn counterfactual_address(
    class_hash: ClassHash,
    salt: Felt252,
    constructor_calldata: &[Felt252],
) -> Result<ContractAddress, AccountError> {
    Ok(compute_address(class_hash, salt, constructor_calldata, ContractAddress::ZERO)?)
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use serde_json::Value;
    use starknet_client_rpc_types::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};

    use crate::signer::LocalSigner;

    use super::*;

    struct StubTransport {
        responses: Vec<(&'static str, Value)>,
    }

    #[async_trait]
    impl Transport for StubTransport {
        async fn request(&self, req: JsonRpcRequest) -> JsonRpcResponse {
            match self.responses.iter().find(|(method, _)| *method == req.method) {
                Some((_, result)) => {
                    JsonRpcResponse::Success { jsonrpc: Default::default(), id: req.id, result: result.clone() }
                }
                None => JsonRpcResponse::error(
                    req.id,
                    JsonRpcError { code: -32601, message: format!("no stub for {}", req.method), data: None },
                ),
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

    fn account_with(responses: Vec<(&'static str, Value)>) -> Account<StubTransport> {
        let provider = Arc::new(Provider::new(StubTransport { responses }));
        let address = ContractAddress::new(Felt252::from_hex("0xabc").unwrap()).unwrap();
        Account::new(provider, address, LocalSigner::new(Felt252::from_u64(1)))
    }

    fn call() -> Call {
        Call {
            to: ContractAddress::new(Felt252::from_u64(0x1)).unwrap(),
            entrypoint: "transfer".to_string(),
            calldata: vec![Felt252::from_u64(1)],
        }
    }

    #[tokio::test]
    async fn execute_submits_a_signed_invoke_and_returns_the_hash() {
        let account = account_with(vec![
            ("starknet_chainId", serde_json::json!(starknet_client_primitives::chain::ChainId::sepolia().as_felt())),
            ("starknet_getNonce", serde_json::json!(Felt252::from_u64(0))),
            (
                "starknet_addInvokeTransaction",
                serde_json::json!({ "transaction_hash": Felt252::from_hex("0xdead").unwrap() }),
            ),
        ]);

        let hash = account.execute(vec![call()], ExecutionDetails::default()).await.unwrap();
        assert_eq!(hash, Felt252::from_hex("0xdead").unwrap());
    }

    #[tokio::test]
    async fn execute_uses_an_explicit_nonce_override_without_fetching_one() {
        let account = account_with(vec![
            ("starknet_chainId", serde_json::json!(starknet_client_primitives::chain::ChainId::sepolia().as_felt())),
            (
                "starknet_addInvokeTransaction",
                serde_json::json!({ "transaction_hash": Felt252::from_hex("0x1").unwrap() }),
            ),
        ]);

        let details = ExecutionDetails { nonce: Some(Felt252::from_u64(9)), ..Default::default() };
        let result = account.execute(vec![call()], details).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn estimate_invoke_fee_returns_network_error_when_the_node_sends_no_estimates() {
        let account = account_with(vec![
            ("starknet_chainId", serde_json::json!(starknet_client_primitives::chain::ChainId::sepolia().as_felt())),
            ("starknet_getNonce", serde_json::json!(Felt252::from_u64(0))),
            ("starknet_estimateFee", serde_json::json!([])),
        ]);

        let result = account.estimate_invoke_fee(vec![call()], ExecutionDetails::default(), false).await;
        assert!(matches!(result, Err(AccountError::EmptyFeeEstimate)));
    }

    #[test]
    fn counterfactual_address_is_deterministic() {
        let class_hash = ClassHash::from(Felt252::from_hex("0x1234").unwrap());
        let salt = Felt252::from_u64(1);
        let a = counterfactual_address(class_hash, salt, &[]).unwrap();
        let b = counterfactual_address(class_hash, salt, &[]).unwrap();
        assert_eq!(a, b);
    }
}
