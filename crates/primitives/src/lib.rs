//! Core scalar types for interacting with a Starknet-compatible node: field elements, branded
//! address types, `Uint256`, Cairo short strings, selector computation and resource-bounds /
//! data-availability types shared by the ABI codec, transport, hash and account crates.

mod address;
mod error;
mod felt;
mod uint256;

pub mod cairo;
pub mod chain;
pub mod fee;

pub use address::{ClassHash, ContractAddress, StorageKey};
pub use error::{AddressError, FeltError};
pub use felt::Felt252;
pub use uint256::Uint256;

pub use starknet_client_primitives_macro::{address, felt};

/// Re-exported for crates that need to interoperate with `starknet-crypto` / `starknet-types-core`
/// directly (hashing, signature verification).
pub use starknet_types_core::felt::Felt as RawFelt;
