//! Resource bounds and data-availability mode types (spec §3 "Transaction v3 record").

use serde::{Deserialize, Serialize};

/// One resource's limits within a v3 transaction's `resource_bounds`. Both fields are `0x`-hex
/// encoded on the wire, matching the Starknet RPC spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResourceBounds {
    /// The maximum amount of this resource the transaction may consume, as a felt-sized `u64`.
    #[serde(with = "starknet_client_serde_utils::felt_hex_u64")]
    pub max_amount: u64,
    /// The maximum price per unit of this resource, as a felt-sized `u128`.
    #[serde(with = "starknet_client_serde_utils::felt_hex")]
    pub max_price_per_unit: u128,
}

impl ResourceBounds {
    pub const ZERO: Self = Self { max_amount: 0, max_price_per_unit: 0 };

    pub fn new(max_amount: u64, max_price_per_unit: u128) -> Self {
        Self { max_amount, max_price_per_unit }
    }
}

/// The three resource-bounds slots carried by every v3 transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResourceBoundsSet {
    pub l1_gas: ResourceBounds,
    pub l2_gas: ResourceBounds,
    pub l1_data_gas: ResourceBounds,
}

impl ResourceBoundsSet {
    pub const ZERO: Self = Self {
        l1_gas: ResourceBounds::ZERO,
        l2_gas: ResourceBounds::ZERO,
        l1_data_gas: ResourceBounds::ZERO,
    };
}

/// Data-availability mode for nonce or fee. `L1 = 0`, `L2 = 1`; packed as
/// `(nonce_mode << 32) | fee_mode` when computing a v3 transaction hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DataAvailabilityMode {
    #[default]
    #[serde(rename = "L1")]
    L1,
    #[serde(rename = "L2")]
    L2,
}

impl DataAvailabilityMode {
    pub fn as_u32(&self) -> u32 {
        match self {
            Self::L1 => 0,
            Self::L2 => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn da_mode_encodes_l1_as_zero() {
        assert_eq!(DataAvailabilityMode::L1.as_u32(), 0);
        assert_eq!(DataAvailabilityMode::L2.as_u32(), 1);
    }
}
