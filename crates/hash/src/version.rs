//! Transaction version discriminant (spec §4.6): real submission uses `version = 3`; fee
//! estimation / simulation reuses the same hash function with `version = 2^128 + 3` so a node
//! can distinguish an estimate from a transaction it must actually execute.

use starknet_client_primitives::Felt252;

/// Which variant of a v3 hash to compute. Kept as a discriminant rather than duplicating each
/// `hash_*_v3` function so query and execute hashing can never drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TxVersion {
    #[default]
    Execute,
    Query,
}

impl TxVersion {
    const BASE: u64 = 3;

    pub fn as_felt(&self) -> Felt252 {
        match self {
            Self::Execute => Felt252::from_u64(Self::BASE),
            Self::Query => {
                let offset = num_bigint::BigUint::from(1u8) << 128;
                Felt252::from_biguint(offset + num_bigint::BigUint::from(Self::BASE))
                    .expect("query version offset fits in a felt")
            }
        }
    }
}
