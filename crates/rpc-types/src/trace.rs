//! `starknet_traceTransaction` / `traceBlockTransactions` / `simulateTransactions` wire types.
//!
//! The nested call-tree (`FunctionInvocation`) is the same shape across every transaction kind
//! and isn't specified further than "opaque, pass it through" by spec §4.5 — callers that need
//! structured access to nested calls read `calls`/`result`/`calldata` directly; everything else
//! is preserved as JSON via `serde_json::Value` so an unrecognized node field never breaks
//! decoding.

use serde::{Deserialize, Serialize};
use starknet_client_primitives::{ClassHash, ContractAddress, Felt252};

use crate::fee::FeeEstimate;
use crate::receipt::{ExecutionResources, MessageToL1};
use crate::state_update::StateDiff;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallType {
    Call,
    Delegate,
    LibraryCall,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryPointType {
    External,
    L1Handler,
    Constructor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionInvocation {
    pub contract_address: ContractAddress,
    pub entry_point_selector: Felt252,
    pub calldata: Vec<Felt252>,
    pub caller_address: ContractAddress,
    pub class_hash: Option<ClassHash>,
    pub entry_point_type: EntryPointType,
    pub call_type: CallType,
    #[serde(default)]
    pub result: Vec<Felt252>,
    #[serde(default)]
    pub calls: Vec<FunctionInvocation>,
    #[serde(default)]
    pub events: Vec<serde_json::Value>,
    #[serde(default)]
    pub messages: Vec<MessageToL1>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InvokeTransactionTrace {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validate_invocation: Option<FunctionInvocation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execute_invocation: Option<FunctionInvocation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee_transfer_invocation: Option<FunctionInvocation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_diff: Option<StateDiff>,
    pub execution_resources: ExecutionResources,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TransactionTrace {
    #[serde(rename = "INVOKE")]
    Invoke(InvokeTransactionTrace),
    #[serde(rename = "DECLARE")]
    Declare(InvokeTransactionTrace),
    #[serde(rename = "DEPLOY_ACCOUNT")]
    DeployAccount(InvokeTransactionTrace),
    #[serde(rename = "L1_HANDLER")]
    L1Handler(InvokeTransactionTrace),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulatedTransaction {
    pub transaction_trace: TransactionTrace,
    pub fee_estimation: FeeEstimate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockTransactionTrace {
    pub transaction_hash: Felt252,
    pub trace_root: TransactionTrace,
}
