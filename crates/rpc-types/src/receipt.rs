//! Transaction receipt wire types for `starknet_getTransactionReceipt` and
//! `starknet_getBlockWithReceipts` (spec §4.8 `track`).

use serde::{Deserialize, Serialize};
use starknet_client_primitives::{ContractAddress, Felt252};

use crate::event::Event;
use crate::transaction::{ExecutionStatus, FinalityStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeePayment {
    #[serde(with = "starknet_client_serde_utils::felt_hex")]
    pub amount: u128,
    pub unit: PriceUnit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PriceUnit {
    Wei,
    Fri,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageToL1 {
    pub from_address: ContractAddress,
    pub to_address: Felt252,
    pub payload: Vec<Felt252>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExecutionResources {
    #[serde(default, with = "starknet_client_serde_utils::felt_hex_u64")]
    pub l1_gas: u64,
    #[serde(default, with = "starknet_client_serde_utils::felt_hex_u64")]
    pub l1_data_gas: u64,
    #[serde(default, with = "starknet_client_serde_utils::felt_hex_u64")]
    pub l2_gas: u64,
}

/// The transaction's execution outcome: `SUCCEEDED`, or `REVERTED` with the revert reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "execution_status")]
pub enum ExecutionResult {
    #[serde(rename = "SUCCEEDED")]
    Succeeded,
    #[serde(rename = "REVERTED")]
    Reverted { revert_reason: String },
}

impl ExecutionResult {
    pub fn status(&self) -> ExecutionStatus {
        match self {
            Self::Succeeded => ExecutionStatus::Succeeded,
            Self::Reverted { .. } => ExecutionStatus::Reverted,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptCommon {
    pub actual_fee: FeePayment,
    pub finality_status: FinalityStatus,
    pub messages_sent: Vec<MessageToL1>,
    pub events: Vec<Event>,
    pub execution_resources: ExecutionResources,
    #[serde(flatten)]
    pub execution_result: ExecutionResult,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TxReceipt {
    #[serde(rename = "INVOKE")]
    Invoke(ReceiptCommon),
    #[serde(rename = "L1_HANDLER")]
    L1Handler(ReceiptCommon),
    #[serde(rename = "DECLARE")]
    Declare(ReceiptCommon),
    #[serde(rename = "DEPLOY")]
    Deploy(DeployReceipt),
    #[serde(rename = "DEPLOY_ACCOUNT")]
    DeployAccount(DeployReceipt),
}

impl TxReceipt {
    pub fn common(&self) -> &ReceiptCommon {
        match self {
            Self::Invoke(r) | Self::L1Handler(r) | Self::Declare(r) => r,
            Self::Deploy(r) | Self::DeployAccount(r) => &r.common,
        }
    }

    pub fn execution_result(&self) -> &ExecutionResult {
        &self.common().execution_result
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployReceipt {
    #[serde(flatten)]
    pub common: ReceiptCommon,
    pub contract_address: ContractAddress,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceiptWithHash {
    pub transaction_hash: Felt252,
    /// Absent for a receipt belonging to a not-yet-included (pre-confirmed) transaction
    /// (spec §4.8 `track`: "Right branch ... with `block_number` numeric").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_hash: Option<Felt252>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
    #[serde(flatten)]
    pub receipt: TxReceipt,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_invoke_receipt() {
        let json = serde_json::json!({
            "type": "INVOKE",
            "transaction_hash": "0x1",
            "actual_fee": {"amount": "0x5", "unit": "WEI"},
            "finality_status": "ACCEPTED_ON_L2",
            "messages_sent": [],
            "events": [],
            "execution_resources": {"l1_gas": "0x1", "l1_data_gas": "0x0", "l2_gas": "0x2"},
            "execution_status": "SUCCEEDED",
        });
        let receipt: TxReceiptWithHash = serde_json::from_value(json).unwrap();
        assert!(matches!(receipt.receipt, TxReceipt::Invoke(_)));
        assert_eq!(receipt.receipt.execution_result(), &ExecutionResult::Succeeded);
    }

    #[test]
    fn decodes_reverted_execution_result() {
        let json = serde_json::json!({
            "type": "INVOKE",
            "transaction_hash": "0x1",
            "actual_fee": {"amount": "0x0", "unit": "WEI"},
            "finality_status": "ACCEPTED_ON_L2",
            "messages_sent": [],
            "events": [],
            "execution_resources": {"l1_gas": "0x0", "l1_data_gas": "0x0", "l2_gas": "0x0"},
            "execution_status": "REVERTED",
            "revert_reason": "insufficient balance",
        });
        let receipt: TxReceiptWithHash = serde_json::from_value(json).unwrap();
        assert_eq!(receipt.receipt.execution_result().status(), ExecutionStatus::Reverted);
    }
}
