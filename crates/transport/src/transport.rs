//! The common interface every transport (HTTP, WebSocket, fallback) implements.

use async_trait::async_trait;
use starknet_client_rpc_types::{JsonRpcRequest, JsonRpcResponse};

/// Sends JSON-RPC requests and returns responses. Never returns `Err` for a network or protocol
/// failure — those are mapped into a `JsonRpcResponse::Error` (spec §4.4's "non-throwing"
/// contract) so callers always get a response to match against the request id.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn request(&self, req: JsonRpcRequest) -> JsonRpcResponse;

    async fn request_batch(&self, reqs: Vec<JsonRpcRequest>) -> Vec<JsonRpcResponse>;
}
