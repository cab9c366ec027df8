//! Error kinds for ABI parsing and codec operations (spec §7).

use starknet_client_primitives::Felt252;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AbiError {
    #[error("invalid abi: {0}")]
    InvalidAbi(String),

    #[error("function not found: {0}")]
    FunctionNotFound(String),

    #[error("event not found for selector {0:#x}")]
    EventNotFoundBySelector(Felt252),

    #[error("event not found: {0}")]
    EventNotFound(String),

    #[error("invalid args: {0}")]
    InvalidArgs(String),

    #[error("encode error: {0}")]
    EncodeError(String),

    #[error("decode error: {0}")]
    DecodeError(String),
}
