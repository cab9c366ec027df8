use thiserror::Error;

/// Errors produced when constructing a [`crate::Felt252`] from an untrusted representation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeltError {
    /// The hex string could not be parsed (bad prefix, non-hex digit, etc).
    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    /// The value was negative, or was `>= P` where `P = 2^251 + 17*2^192 + 1`.
    #[error("value out of range for a felt: {0}")]
    Overflow(String),

    /// The value was not an integer (e.g. a non-integral float was supplied).
    #[error("value is not an integer: {0}")]
    NotInteger(String),
}

/// Errors produced when constructing a branded address type ([`crate::ContractAddress`],
/// [`crate::ClassHash`], [`crate::StorageKey`]).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// The underlying felt failed validation.
    #[error(transparent)]
    Felt(#[from] FeltError),

    /// A `ContractAddress` must satisfy `value < 2^251 - 256`.
    #[error("contract address {0} is not below the address bound (2^251 - 256)")]
    OutOfBounds(String),
}
