//! Contract address derivation (spec §4.6 "Contract address derivation").

use num_bigint::BigUint;
use starknet_client_primitives::cairo::short_string;
use starknet_client_primitives::{ClassHash, ContractAddress, Felt252};

use crate::error::HashError;
use crate::pedersen::pedersen_chain;

fn address_bound() -> BigUint {
    (BigUint::from(1u8) << 251) - BigUint::from(256u16)
}

/// `(pedersen_chain([prefix_address, deployer, salt, classHash, pedersen_chain(calldata)]))
/// mod ADDRESS_BOUND`. Matches `starknet.js`'s `hash.calculateContractAddressFromHash`.
pub fn compute_address(
    class_hash: ClassHash,
    salt: Felt252,
    constructor_calldata: &[Felt252],
    deployer: ContractAddress,
) -> Result<ContractAddress, HashError> {
    let prefix = short_string("STARKNET_CONTRACT_ADDRESS").expect("valid short string");
    let calldata_hash = pedersen_chain(constructor_calldata);

    let elements = [prefix, deployer.as_felt(), salt, class_hash.as_felt(), calldata_hash];
    let raw = pedersen_chain(&elements);

    let reduced = raw.to_biguint() % address_bound();
    let felt = Felt252::from_biguint(reduced).expect("reduced address fits in a felt");
    ContractAddress::new(felt).map_err(HashError::from)
}
