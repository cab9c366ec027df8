//! `starknet_estimateFee` / `starknet_estimateMessageFee` wire types.

use serde::{Deserialize, Serialize};

use crate::receipt::PriceUnit;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeEstimate {
    #[serde(with = "starknet_client_serde_utils::felt_hex_u64")]
    pub l1_gas_consumed: u64,
    #[serde(with = "starknet_client_serde_utils::felt_hex")]
    pub l1_gas_price: u128,
    #[serde(with = "starknet_client_serde_utils::felt_hex_u64")]
    pub l2_gas_consumed: u64,
    #[serde(with = "starknet_client_serde_utils::felt_hex")]
    pub l2_gas_price: u128,
    #[serde(with = "starknet_client_serde_utils::felt_hex_u64")]
    pub l1_data_gas_consumed: u64,
    #[serde(with = "starknet_client_serde_utils::felt_hex")]
    pub l1_data_gas_price: u128,
    #[serde(with = "starknet_client_serde_utils::felt_hex")]
    pub overall_fee: u128,
    pub unit: PriceUnit,
}

/// `SKIP_VALIDATE` / `SKIP_FEE_CHARGE` simulation flags accepted by `estimateFee`/
/// `simulateTransactions` (spec §6 `skipValidate`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SimulationFlag {
    SkipValidate,
    SkipFeeCharge,
}
