//! Pedersen hash-chain (`compute_hash_on_elements`), used for contract-address derivation: the
//! only v3 hash domain that still uses Pedersen rather than Poseidon.

use starknet_client_primitives::Felt252;

/// `pedersen(...pedersen(pedersen(0, e0), e1)..., en-1)` folded, then hashed once more against
/// the element count. Matches the chain formula `starknet.js`/`cairo-lang` use for both contract
/// addresses and legacy (pre-v3) transaction hashes.
pub fn pedersen_chain(elements: &[Felt252]) -> Felt252 {
    let mut acc = Felt252::ZERO;
    for element in elements {
        acc = Felt252::from(starknet_crypto::pedersen_hash(&acc.raw(), &element.raw()));
    }
    let len = Felt252::from_u64(elements.len() as u64);
    Felt252::from(starknet_crypto::pedersen_hash(&acc.raw(), &len.raw()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_chain_hashes_zero_with_zero_length() {
        let hashed = pedersen_chain(&[]);
        let expected = Felt252::from(starknet_crypto::pedersen_hash(
            &Felt252::ZERO.raw(),
            &Felt252::ZERO.raw(),
        ));
        assert_eq!(hashed, expected);
    }

    #[test]
    fn chain_is_order_sensitive() {
        let a = Felt252::from_u64(1);
        let b = Felt252::from_u64(2);
        assert_ne!(pedersen_chain(&[a, b]), pedersen_chain(&[b, a]));
    }
}
