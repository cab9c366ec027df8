//! Starknet v3 transaction hashing, resource-bounds/DA-mode packing, `__execute__` calldata
//! layout, and Pedersen contract-address derivation (spec §4.6).

pub mod address;
pub mod calldata;
pub mod error;
pub mod pedersen;
pub mod poseidon;
pub mod resource_bounds;
pub mod transaction;
pub mod version;

pub use address::compute_address;
pub use calldata::{encode_execute_calldata, Call, EXECUTE_SELECTOR_HEX};
pub use error::HashError;
pub use resource_bounds::{pack_da_modes, tip_and_resource_hash};
pub use transaction::{
    hash_declare_v3, hash_deploy_account_v3, hash_invoke_v3, DeclareV3, DeployAccountV3, InvokeV3,
};
pub use version::TxVersion;
