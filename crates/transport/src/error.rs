//! Transport-level errors. These never escape `request`/`request_batch` as `Result::Err` — per
//! spec §4.4 both are non-throwing and instead map failures into a `JsonRpcResponse::Error`. This
//! type exists for the pieces that *do* need to fail loudly: connecting a [`crate::ws::WsTransport`]
//! and the terminal "all transports failed" case of [`crate::fallback::FallbackTransport`].

use starknet_client_rpc_types::JsonRpcError;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("websocket is not connected")]
    NotConnected,

    #[error("all transports failed")]
    AllTransportsFailed,
}

impl TransportError {
    /// Maps any transport failure to the `InternalError` shape the provider layer expects to see
    /// in place of a result (spec §4.4: "network errors ... are mapped to
    /// `{error:{code: InternalError, message}}`").
    pub fn into_jsonrpc_error(self) -> JsonRpcError {
        JsonRpcError {
            code: starknet_client_rpc_types::envelope::jsonrpc_code::INTERNAL_ERROR,
            message: self.to_string(),
            data: None,
        }
    }
}
