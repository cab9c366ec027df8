use starknet_client_hash::HashError;
use starknet_client_provider::ProviderError;

/// Everything building, signing, or submitting a transaction through an [`crate::Account`] or
/// [`crate::WalletAccount`] can fail with (spec §7).
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Hash(#[from] HashError),

    #[error(transparent)]
    Signer(#[from] SignerError),

    /// `estimateFee`/`simulateTransactions` returned no estimates for a request that submitted
    /// at least one transaction (spec §4.7 `estimateInvokeFee`, `NETWORK_ERROR`).
    #[error("node returned no fee estimate")]
    EmptyFeeEstimate,

    /// A write was attempted through a [`crate::WalletAccount`] with no connected wallet, or
    /// through an [`crate::Account`] with no signer capable of producing the requested signature
    /// (spec §7 `ACCOUNT_REQUIRED`).
    #[error("no signer or wallet is available to authorize this action")]
    AccountRequired,

    /// The wallet (SWO) rejected a request or returned malformed data (spec §6, §7).
    #[error("wallet request failed: {0}")]
    WalletRequestFailed(String),
}

/// A key or signing operation failed (spec §7, "STARK-curve ECDSA" treated as an opaque
/// dependency — this only wraps whatever `starknet-crypto` reports).
#[derive(Debug, thiserror::Error)]
pub enum SignerError {
    #[error("signing failed: {0}")]
    SigningFailed(String),
}
