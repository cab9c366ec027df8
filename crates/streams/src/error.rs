use starknet_client_provider::ProviderError;
use starknet_client_rpc_types::error_code::StarknetErrorCode;

/// Everything a transaction stream can fail with (spec §7 `TRANSACTION_STREAM_ERROR`) — any
/// provider error that isn't one of the pending-receipt codes `track` treats as non-terminal.
#[derive(Debug, thiserror::Error)]
#[error("transaction stream failed: {0}")]
pub struct StreamError(#[from] pub ProviderError);

/// A lookup miss a node can race against its own notification or a not-yet-bound receipt: one of
/// `BLOCK_NOT_FOUND`/`INVALID_TRANSACTION_HASH`/`TRANSACTION_HASH_NOT_FOUND`, or a message that
/// says as much (spec §4.8 `watchPending`, `track`).
pub(crate) fn is_transient_lookup_failure(error: &ProviderError) -> bool {
    match error {
        ProviderError::Rpc(rpc_error) => {
            StarknetErrorCode::is_pending_receipt_code(rpc_error.code)
                || StarknetErrorCode::message_suggests_pending(&rpc_error.message)
        }
        ProviderError::Decode(_) => false,
    }
}
