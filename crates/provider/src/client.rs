//! `Provider<T>`: one async method per Starknet JSON-RPC call (spec §4.5), generic over any
//! [`Transport`] so the same method surface works over HTTP, WebSocket, or a [`FallbackTransport`].
//!
//! [`FallbackTransport`]: starknet_client_transport::FallbackTransport

use std::sync::atomic::{AtomicU64, Ordering};

use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use starknet_client_primitives::chain::ChainId;
use starknet_client_primitives::{ClassHash, ContractAddress, Felt252};
use starknet_client_rpc_types::block::{
    BlockHashAndNumber, BlockId, MaybePendingBlockWithReceipts, MaybePendingBlockWithTxHashes,
    MaybePendingBlockWithTxs, SyncingStatus,
};
use starknet_client_rpc_types::broadcasted::{
    BroadcastedDeclareTxV3, BroadcastedDeployAccountTxV3, BroadcastedInvokeTxV3, BroadcastedTx,
    DeclareTxResponse, DeployAccountTxResponse, InvokeTxResponse,
};
use starknet_client_rpc_types::call::{CallResponse, FunctionCall};
use starknet_client_rpc_types::envelope::{JsonRpcRequest, RequestId};
use starknet_client_rpc_types::event::{EventFilterWithPage, GetEventsResponse};
use starknet_client_rpc_types::fee::{FeeEstimate, SimulationFlag};
use starknet_client_rpc_types::message::{MessageStatus, MsgFromL1};
use starknet_client_rpc_types::state_update::MaybePendingStateUpdate;
use starknet_client_rpc_types::storage_proof::{GetStorageProofParams, GetStorageProofResponse};
use starknet_client_rpc_types::trace::{BlockTransactionTrace, SimulatedTransaction, TransactionTrace};
use starknet_client_rpc_types::transaction::{TransactionStatus, TxWithHash};
use starknet_client_rpc_types::receipt::TxReceiptWithHash;
use starknet_client_transport::Transport;

use crate::error::ProviderError;

/// A Starknet JSON-RPC provider: the method surface of spec §4.5 bound to a concrete transport.
pub struct Provider<T: Transport> {
    transport: T,
    next_id: AtomicU64,
}

impl<T: Transport> Provider<T> {
    pub fn new(transport: T) -> Self {
        Self { transport, next_id: AtomicU64::new(1) }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub(crate) fn next_id(&self) -> RequestId {
        RequestId::Number(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    pub(crate) async fn send<R: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<R, ProviderError> {
        let req = JsonRpcRequest::new(self.next_id(), method, params);
        let result = self.transport.request(req).await.into_result()?;
        serde_json::from_value(result).map_err(|e| ProviderError::Decode(e.to_string()))
    }

    /// The JSON-RPC spec version the node implements.
    pub async fn spec_version(&self) -> Result<String, ProviderError> {
        self.send("starknet_specVersion", Value::Null).await
    }

    /// The chain id the node is serving, as reported on the wire.
    pub async fn chain_id(&self) -> Result<ChainId, ProviderError> {
        let felt: Felt252 = self.send("starknet_chainId", Value::Null).await?;
        Ok(ChainId::from(felt))
    }

    pub async fn block_number(&self) -> Result<u64, ProviderError> {
        self.send("starknet_blockNumber", Value::Null).await
    }

    pub async fn block_hash_and_number(&self) -> Result<BlockHashAndNumber, ProviderError> {
        self.send("starknet_blockHashAndNumber", Value::Null).await
    }

    pub async fn syncing(&self) -> Result<SyncingStatus, ProviderError> {
        self.send("starknet_syncing", Value::Null).await
    }

    pub async fn get_block_with_tx_hashes(
        &self,
        block_id: BlockId,
    ) -> Result<MaybePendingBlockWithTxHashes, ProviderError> {
        self.send("starknet_getBlockWithTxHashes", json!([block_id])).await
    }

    pub async fn get_block_with_txs(
        &self,
        block_id: BlockId,
    ) -> Result<MaybePendingBlockWithTxs, ProviderError> {
        self.send("starknet_getBlockWithTxs", json!([block_id])).await
    }

    pub async fn get_block_with_receipts(
        &self,
        block_id: BlockId,
    ) -> Result<MaybePendingBlockWithReceipts, ProviderError> {
        self.send("starknet_getBlockWithReceipts", json!([block_id])).await
    }

    pub async fn get_state_update(
        &self,
        block_id: BlockId,
    ) -> Result<MaybePendingStateUpdate, ProviderError> {
        self.send("starknet_getStateUpdate", json!([block_id])).await
    }

    pub async fn get_storage_at(
        &self,
        contract_address: ContractAddress,
        key: Felt252,
        block_id: BlockId,
    ) -> Result<Felt252, ProviderError> {
        self.send("starknet_getStorageAt", json!([contract_address, key, block_id])).await
    }

    pub async fn get_nonce(
        &self,
        block_id: BlockId,
        contract_address: ContractAddress,
    ) -> Result<Felt252, ProviderError> {
        self.send("starknet_getNonce", json!([block_id, contract_address])).await
    }

    /// The contract class, passed through as opaque JSON — `crates/abi` is the one component that
    /// knows how to parse and hash a Sierra class.
    pub async fn get_class(
        &self,
        block_id: BlockId,
        class_hash: ClassHash,
    ) -> Result<Value, ProviderError> {
        self.send("starknet_getClass", json!([block_id, class_hash])).await
    }

    pub async fn get_class_hash_at(
        &self,
        block_id: BlockId,
        contract_address: ContractAddress,
    ) -> Result<ClassHash, ProviderError> {
        self.send("starknet_getClassHashAt", json!([block_id, contract_address])).await
    }

    pub async fn get_class_at(
        &self,
        block_id: BlockId,
        contract_address: ContractAddress,
    ) -> Result<Value, ProviderError> {
        self.send("starknet_getClassAt", json!([block_id, contract_address])).await
    }

    pub async fn get_block_transaction_count(&self, block_id: BlockId) -> Result<u64, ProviderError> {
        self.send("starknet_getBlockTransactionCount", json!([block_id])).await
    }

    pub async fn call(
        &self,
        request: FunctionCall,
        block_id: BlockId,
    ) -> Result<Vec<Felt252>, ProviderError> {
        let response: CallResponse = self.send("starknet_call", json!([request, block_id])).await?;
        Ok(response.result)
    }

    pub async fn estimate_fee(
        &self,
        request: Vec<BroadcastedTx>,
        simulation_flags: Vec<SimulationFlag>,
        block_id: BlockId,
    ) -> Result<Vec<FeeEstimate>, ProviderError> {
        self.send("starknet_estimateFee", json!([request, simulation_flags, block_id])).await
    }

    pub async fn estimate_message_fee(
        &self,
        message: MsgFromL1,
        block_id: BlockId,
    ) -> Result<FeeEstimate, ProviderError> {
        self.send("starknet_estimateMessageFee", json!([message, block_id])).await
    }

    pub async fn get_transaction_by_hash(
        &self,
        transaction_hash: Felt252,
    ) -> Result<TxWithHash, ProviderError> {
        self.send("starknet_getTransactionByHash", json!([transaction_hash])).await
    }

    pub async fn get_transaction_by_block_id_and_index(
        &self,
        block_id: BlockId,
        index: u64,
    ) -> Result<TxWithHash, ProviderError> {
        self.send("starknet_getTransactionByBlockIdAndIndex", json!([block_id, index])).await
    }

    pub async fn get_transaction_status(
        &self,
        transaction_hash: Felt252,
    ) -> Result<TransactionStatus, ProviderError> {
        self.send("starknet_getTransactionStatus", json!([transaction_hash])).await
    }

    pub async fn get_messages_status(
        &self,
        transaction_hash: Felt252,
    ) -> Result<Vec<MessageStatus>, ProviderError> {
        self.send("starknet_getMessagesStatus", json!([transaction_hash])).await
    }

    pub async fn get_transaction_receipt(
        &self,
        transaction_hash: Felt252,
    ) -> Result<TxReceiptWithHash, ProviderError> {
        self.send("starknet_getTransactionReceipt", json!([transaction_hash])).await
    }

    /// The one method with object (rather than positional) params on the wire (spec §6).
    pub async fn get_events(
        &self,
        filter: EventFilterWithPage,
    ) -> Result<GetEventsResponse, ProviderError> {
        self.send("starknet_getEvents", json!({ "filter": filter })).await
    }

    pub async fn get_storage_proof(
        &self,
        params: GetStorageProofParams,
    ) -> Result<GetStorageProofResponse, ProviderError> {
        self.send(
            "starknet_getStorageProof",
            json!([
                params.block_id,
                params.class_hashes,
                params.contract_addresses,
                params.contracts_storage_keys,
            ]),
        )
        .await
    }

    pub async fn add_invoke_transaction(
        &self,
        invoke_transaction: BroadcastedInvokeTxV3,
    ) -> Result<InvokeTxResponse, ProviderError> {
        self.send("starknet_addInvokeTransaction", json!({ "invoke_transaction": invoke_transaction }))
            .await
    }

    pub async fn add_declare_transaction(
        &self,
        declare_transaction: BroadcastedDeclareTxV3,
    ) -> Result<DeclareTxResponse, ProviderError> {
        self.send(
            "starknet_addDeclareTransaction",
            json!({ "declare_transaction": declare_transaction }),
        )
        .await
    }

    pub async fn add_deploy_account_transaction(
        &self,
        deploy_account_transaction: BroadcastedDeployAccountTxV3,
    ) -> Result<DeployAccountTxResponse, ProviderError> {
        self.send(
            "starknet_addDeployAccountTransaction",
            json!({ "deploy_account_transaction": deploy_account_transaction }),
        )
        .await
    }

    pub async fn simulate_transactions(
        &self,
        block_id: BlockId,
        transactions: Vec<BroadcastedTx>,
        simulation_flags: Vec<SimulationFlag>,
    ) -> Result<Vec<SimulatedTransaction>, ProviderError> {
        self.send(
            "starknet_simulateTransactions",
            json!([block_id, transactions, simulation_flags]),
        )
        .await
    }

    pub async fn trace_transaction(
        &self,
        transaction_hash: Felt252,
    ) -> Result<TransactionTrace, ProviderError> {
        self.send("starknet_traceTransaction", json!([transaction_hash])).await
    }

    pub async fn trace_block_transactions(
        &self,
        block_id: BlockId,
    ) -> Result<Vec<BlockTransactionTrace>, ProviderError> {
        self.send("starknet_traceBlockTransactions", json!([block_id])).await
    }
}
