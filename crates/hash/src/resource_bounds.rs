//! Packs a v3 transaction's `resource_bounds`/`tip` into the single felt `hash_invoke_v3` and
//! friends fold into their domain (spec §4.6).

use starknet_client_primitives::cairo::short_string;
use starknet_client_primitives::fee::{DataAvailabilityMode, ResourceBounds, ResourceBoundsSet};
use starknet_client_primitives::Felt252;

use crate::poseidon::poseidon_many;

/// `(max_amount << 128) | max_price_per_unit` folded into one felt. `max_amount` is a felt-sized
/// `u64` and `max_price_per_unit` a felt-sized `u128`, so the packed value never exceeds 192
/// bits and always fits the field.
fn pack_bounds(bounds: &ResourceBounds) -> Felt252 {
    let packed = (num_bigint::BigUint::from(bounds.max_amount) << 128)
        + num_bigint::BigUint::from(bounds.max_price_per_unit);
    Felt252::from_biguint(packed).expect("packed resource bounds always fit in a felt")
}

/// `H([short("L1_GAS"), l1_packed, short("L2_GAS"), l2_packed, short("L1_DATA"),
/// l1_data_packed, tip])`.
pub fn tip_and_resource_hash(bounds: &ResourceBoundsSet, tip: u64) -> Felt252 {
    let elements = [
        short_string("L1_GAS").expect("valid short string"),
        pack_bounds(&bounds.l1_gas),
        short_string("L2_GAS").expect("valid short string"),
        pack_bounds(&bounds.l2_gas),
        short_string("L1_DATA").expect("valid short string"),
        pack_bounds(&bounds.l1_data_gas),
        Felt252::from_u64(tip),
    ];
    poseidon_many(&elements)
}

/// `(nonce_da_mode << 32) | fee_da_mode`.
pub fn pack_da_modes(nonce_mode: DataAvailabilityMode, fee_mode: DataAvailabilityMode) -> Felt252 {
    let packed = ((nonce_mode.as_u32() as u64) << 32) | (fee_mode.as_u32() as u64);
    Felt252::from_u64(packed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_resource_bounds_and_zero_tip_match_golden_vector() {
        let hash = tip_and_resource_hash(&ResourceBoundsSet::ZERO, 0);
        assert_eq!(
            hash.to_hex(),
            "0x242e62a3c414ea95d9a8b5034e6535cec5dd5fe65f5c0e07bf7c1aba75a0df7"
        );
    }

    #[test]
    fn da_modes_pack_l1_as_zero() {
        let packed = pack_da_modes(DataAvailabilityMode::L1, DataAvailabilityMode::L1);
        assert_eq!(packed, Felt252::ZERO);
    }

    #[test]
    fn da_modes_pack_nonce_mode_into_high_bits() {
        let packed = pack_da_modes(DataAvailabilityMode::L2, DataAvailabilityMode::L1);
        assert_eq!(packed, Felt252::from_u64(1u64 << 32));
    }
}
