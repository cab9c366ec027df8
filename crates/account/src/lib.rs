//! Execution-layer accounts (spec §4.7): [`Account`] builds, hashes, signs, and submits v3
//! transactions through a local [`Signer`]; [`WalletAccount`] delegates the same writes to an
//! injected browser wallet and only reads through the provider.

pub mod account;
pub mod details;
pub mod error;
pub mod signer;
pub mod wallet;

pub use account::{counterfactual_address, Account, DeclarePayload, DeployAccountPayload};
pub use details::ExecutionDetails;
pub use error::{AccountError, SignerError};
pub use signer::{LocalSigner, Signer};
pub use wallet::{StarknetWindowObject, WalletAccount, WalletEvent};
