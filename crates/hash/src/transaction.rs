//! v3 transaction hashing (spec §4.6). `H = poseidon_many` throughout.

use starknet_client_primitives::cairo::short_string;
use starknet_client_primitives::fee::{DataAvailabilityMode, ResourceBoundsSet};
use starknet_client_primitives::{ChainId, ClassHash, ContractAddress, Felt252};

use crate::poseidon::poseidon_many;
use crate::resource_bounds::{pack_da_modes, tip_and_resource_hash};
use crate::version::TxVersion;

/// `{sender_address, calldata, nonce, resource_bounds, tip, paymaster_data, nonce_da_mode,
/// fee_da_mode, account_deployment_data}` (spec §3 "Transaction v3 record").
#[derive(Debug, Clone)]
pub struct InvokeV3 {
    pub sender_address: ContractAddress,
    pub calldata: Vec<Felt252>,
    pub nonce: Felt252,
    pub resource_bounds: ResourceBoundsSet,
    pub tip: u64,
    pub paymaster_data: Vec<Felt252>,
    pub nonce_data_availability_mode: DataAvailabilityMode,
    pub fee_data_availability_mode: DataAvailabilityMode,
    pub account_deployment_data: Vec<Felt252>,
}

/// Invoke plus `{class_hash, compiled_class_hash}`.
#[derive(Debug, Clone)]
pub struct DeclareV3 {
    pub sender_address: ContractAddress,
    pub class_hash: ClassHash,
    pub compiled_class_hash: Felt252,
    pub nonce: Felt252,
    pub resource_bounds: ResourceBoundsSet,
    pub tip: u64,
    pub paymaster_data: Vec<Felt252>,
    pub nonce_data_availability_mode: DataAvailabilityMode,
    pub fee_data_availability_mode: DataAvailabilityMode,
    pub account_deployment_data: Vec<Felt252>,
}

/// Replaces `sender` with `{class_hash, constructor_calldata, contract_address_salt}`.
#[derive(Debug, Clone)]
pub struct DeployAccountV3 {
    pub class_hash: ClassHash,
    pub constructor_calldata: Vec<Felt252>,
    pub contract_address_salt: Felt252,
    pub nonce: Felt252,
    pub resource_bounds: ResourceBoundsSet,
    pub tip: u64,
    pub paymaster_data: Vec<Felt252>,
    pub nonce_data_availability_mode: DataAvailabilityMode,
    pub fee_data_availability_mode: DataAvailabilityMode,
}

fn da_modes(tx_nonce_mode: DataAvailabilityMode, tx_fee_mode: DataAvailabilityMode) -> Felt252 {
    pack_da_modes(tx_nonce_mode, tx_fee_mode)
}

/// `H([prefix_invoke, version, sender, tip_and_resource_hash, H(paymaster_data), chainId, nonce,
/// da_modes, H(account_deployment_data), H(calldata)])`.
pub fn hash_invoke_v3(tx: &InvokeV3, chain_id: ChainId, version: TxVersion) -> Felt252 {
    let elements = [
        short_string("invoke").expect("valid short string"),
        version.as_felt(),
        tx.sender_address.as_felt(),
        tip_and_resource_hash(&tx.resource_bounds, tx.tip),
        poseidon_many(&tx.paymaster_data),
        chain_id.as_felt(),
        tx.nonce,
        da_modes(tx.nonce_data_availability_mode, tx.fee_data_availability_mode),
        poseidon_many(&tx.account_deployment_data),
        poseidon_many(&tx.calldata),
    ];
    poseidon_many(&elements)
}

/// `H([prefix_declare, version, sender, tip_and_resource_hash, H(paymaster_data), chainId,
/// nonce, da_modes, H(account_deployment_data), class_hash, compiled_class_hash])`.
pub fn hash_declare_v3(tx: &DeclareV3, chain_id: ChainId, version: TxVersion) -> Felt252 {
    let elements = [
        short_string("declare").expect("valid short string"),
        version.as_felt(),
        tx.sender_address.as_felt(),
        tip_and_resource_hash(&tx.resource_bounds, tx.tip),
        poseidon_many(&tx.paymaster_data),
        chain_id.as_felt(),
        tx.nonce,
        da_modes(tx.nonce_data_availability_mode, tx.fee_data_availability_mode),
        poseidon_many(&tx.account_deployment_data),
        tx.class_hash.as_felt(),
        tx.compiled_class_hash,
    ];
    poseidon_many(&elements)
}

/// `H([prefix_deploy_account, version, contractAddress, tip_and_resource_hash,
/// H(paymaster_data), chainId, nonce, da_modes, H(constructor_calldata), class_hash, salt])`.
pub fn hash_deploy_account_v3(
    tx: &DeployAccountV3,
    contract_address: ContractAddress,
    chain_id: ChainId,
    version: TxVersion,
) -> Felt252 {
    let elements = [
        short_string("deploy_account").expect("valid short string"),
        version.as_felt(),
        contract_address.as_felt(),
        tip_and_resource_hash(&tx.resource_bounds, tx.tip),
        poseidon_many(&tx.paymaster_data),
        chain_id.as_felt(),
        tx.nonce,
        da_modes(tx.nonce_data_availability_mode, tx.fee_data_availability_mode),
        poseidon_many(&tx.constructor_calldata),
        tx.class_hash.as_felt(),
        tx.contract_address_salt,
    ];
    poseidon_many(&elements)
}

#[cfg(test)]
mod tests {
    use starknet_client_primitives::fee::ResourceBounds;

    use super::*;

    fn sample_invoke() -> InvokeV3 {
        InvokeV3 {
            sender_address: ContractAddress::new(Felt252::from_hex("0x1").unwrap()).unwrap(),
            calldata: vec![Felt252::from_u64(1), Felt252::from_u64(2)],
            nonce: Felt252::from_u64(5),
            resource_bounds: ResourceBoundsSet {
                l1_gas: ResourceBounds::new(100, 1000),
                l2_gas: ResourceBounds::ZERO,
                l1_data_gas: ResourceBounds::ZERO,
            },
            tip: 0,
            paymaster_data: vec![],
            nonce_data_availability_mode: DataAvailabilityMode::L1,
            fee_data_availability_mode: DataAvailabilityMode::L1,
            account_deployment_data: vec![],
        }
    }

    #[test]
    fn invoke_hash_is_deterministic() {
        let tx = sample_invoke();
        let chain = ChainId::mainnet();
        let a = hash_invoke_v3(&tx, chain, TxVersion::Execute);
        let b = hash_invoke_v3(&tx, chain, TxVersion::Execute);
        assert_eq!(a, b);
    }

    #[test]
    fn invoke_hash_changes_with_nonce() {
        let mut tx = sample_invoke();
        let chain = ChainId::mainnet();
        let a = hash_invoke_v3(&tx, chain, TxVersion::Execute);
        tx.nonce = Felt252::from_u64(6);
        let b = hash_invoke_v3(&tx, chain, TxVersion::Execute);
        assert_ne!(a, b);
    }

    #[test]
    fn query_version_produces_a_different_hash_than_execute() {
        let tx = sample_invoke();
        let chain = ChainId::mainnet();
        let execute = hash_invoke_v3(&tx, chain, TxVersion::Execute);
        let query = hash_invoke_v3(&tx, chain, TxVersion::Query);
        assert_ne!(execute, query);
    }

    #[test]
    fn declare_and_deploy_account_hashes_are_deterministic() {
        let declare = DeclareV3 {
            sender_address: ContractAddress::new(Felt252::from_hex("0x1").unwrap()).unwrap(),
            class_hash: ClassHash::from(Felt252::from_hex("0x2").unwrap()),
            compiled_class_hash: Felt252::from_hex("0x3").unwrap(),
            nonce: Felt252::from_u64(1),
            resource_bounds: ResourceBoundsSet::ZERO,
            tip: 0,
            paymaster_data: vec![],
            nonce_data_availability_mode: DataAvailabilityMode::L1,
            fee_data_availability_mode: DataAvailabilityMode::L1,
            account_deployment_data: vec![],
        };
        let chain = ChainId::sepolia();
        assert_eq!(
            hash_declare_v3(&declare, chain, TxVersion::Execute),
            hash_declare_v3(&declare, chain, TxVersion::Execute)
        );

        let deploy = DeployAccountV3 {
            class_hash: ClassHash::from(Felt252::from_hex("0x2").unwrap()),
            constructor_calldata: vec![],
            contract_address_salt: Felt252::from_u64(7),
            nonce: Felt252::from_u64(1),
            resource_bounds: ResourceBoundsSet::ZERO,
            tip: 0,
            paymaster_data: vec![],
            nonce_data_availability_mode: DataAvailabilityMode::L1,
            fee_data_availability_mode: DataAvailabilityMode::L1,
        };
        let address = ContractAddress::new(Felt252::from_hex("0x9").unwrap()).unwrap();
        assert_eq!(
            hash_deploy_account_v3(&deploy, address, chain, TxVersion::Execute),
            hash_deploy_account_v3(&deploy, address, chain, TxVersion::Execute)
        );
    }
}
