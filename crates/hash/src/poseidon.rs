//! Thin wrapper over `starknet-crypto`'s Poseidon hash, matching the `H = poseidon_many`
//! notation used throughout spec §4.6.

use starknet_client_primitives::Felt252;

pub fn poseidon_many(felts: &[Felt252]) -> Felt252 {
    let raw: Vec<_> = felts.iter().map(Felt252::raw).collect();
    Felt252::from(starknet_crypto::poseidon_hash_many(&raw))
}
