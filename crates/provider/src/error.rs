use starknet_client_rpc_types::JsonRpcError;

/// Everything a provider call can fail with: the node returned a JSON-RPC error object (which
/// already subsumes transport failures — `crates/transport` turns those into an error response
/// rather than throwing, spec §4.4), or the result didn't decode into the type the caller asked
/// for.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderError {
    #[error(transparent)]
    Rpc(#[from] JsonRpcError),

    #[error("failed to decode provider response: {0}")]
    Decode(String),
}

impl ProviderError {
    pub fn code(&self) -> Option<i64> {
        match self {
            Self::Rpc(err) => Some(err.code),
            Self::Decode(_) => None,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Rpc(err) => &err.message,
            Self::Decode(msg) => msg,
        }
    }
}
