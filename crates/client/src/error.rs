use starknet_client_account::AccountError;
use starknet_client_provider::ProviderError;
use starknet_client_streams::StreamError;
use starknet_client_transport::TransportError;

/// The client facade's error type: every lower-layer error folds into this so callers who don't
/// need to distinguish layers can use one type end to end.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Account(#[from] AccountError),

    #[error(transparent)]
    Stream(#[from] StreamError),

    #[error("no account is configured on this client")]
    NoAccount,
}
