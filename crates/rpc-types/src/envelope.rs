//! The JSON-RPC 2.0 envelope (spec §4.4, §6): `{jsonrpc, id, method, params}` requests and
//! `{jsonrpc, id, result}` / `{jsonrpc, id, error}` responses.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A JSON-RPC id: either a monotonically assigned integer or a caller-supplied string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    Number(u64),
    String(String),
}

impl From<u64> for RequestId {
    fn from(value: u64) -> Self {
        Self::Number(value)
    }
}

/// A single JSON-RPC 2.0 request, `{jsonrpc: "2.0", id, method, params}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: JsonRpcVersion,
    pub id: RequestId,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    pub fn new(id: impl Into<RequestId>, method: impl Into<String>, params: Value) -> Self {
        let params = if params.is_null() { None } else { Some(params) };
        Self { jsonrpc: JsonRpcVersion, id: id.into(), method: method.into(), params }
    }
}

/// The literal string `"2.0"`; a unit struct so it (de)serializes without allocating and rejects
/// any other protocol version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JsonRpcVersion;

impl Serialize for JsonRpcVersion {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str("2.0")
    }
}

impl<'de> Deserialize<'de> for JsonRpcVersion {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        if s == "2.0" {
            Ok(Self)
        } else {
            Err(serde::de::Error::custom(format!("unsupported jsonrpc version: {s}")))
        }
    }
}

/// A JSON-RPC 2.0 response: either `{jsonrpc, id, result}` or `{jsonrpc, id, error}`.
///
/// Never panics or throws on a well-formed node response — a `RPC_ERROR` node response decodes
/// into `JsonRpcResponse::Error`, it is the transport's/provider's job to turn that into a typed
/// `Result::Err` (spec §4.4: "non-throwing").
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum JsonRpcResponse {
    Success { jsonrpc: JsonRpcVersion, id: RequestId, result: Value },
    Error { jsonrpc: JsonRpcVersion, id: RequestId, error: JsonRpcError },
}

impl JsonRpcResponse {
    pub fn id(&self) -> &RequestId {
        match self {
            Self::Success { id, .. } => id,
            Self::Error { id, .. } => id,
        }
    }

    pub fn into_result(self) -> Result<Value, JsonRpcError> {
        match self {
            Self::Success { result, .. } => Ok(result),
            Self::Error { error, .. } => Err(error),
        }
    }

    /// Builds a synthetic `InternalError` response for a request id that went unanswered
    /// (`matchBatchResponses`, spec §4.4).
    pub fn missing(id: RequestId) -> Self {
        Self::error(
            id,
            JsonRpcError {
                code: jsonrpc_code::INTERNAL_ERROR,
                message: "no response received for this request id".to_string(),
                data: None,
            },
        )
    }

    /// Builds an error response for a given id. Transports use this to turn a network/protocol
    /// failure into a response rather than propagating a `Result::Err` (spec §4.4).
    pub fn error(id: RequestId, error: JsonRpcError) -> Self {
        Self::Error { jsonrpc: JsonRpcVersion, id, error }
    }
}

/// A JSON-RPC error object, `{code, message, data?}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[error("rpc error {code}: {message}")]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Reserved JSON-RPC transport-level codes (spec §6), kept as plain consts so transports can
/// construct a [`JsonRpcError`] without a magic number.
pub mod jsonrpc_code {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_omits_null_params() {
        let req = JsonRpcRequest::new(1u64, "starknet_chainId", Value::Null);
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("params").is_none());
    }

    #[test]
    fn response_decodes_success_and_error() {
        let ok: JsonRpcResponse =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":1,"result":"0x1"}"#).unwrap();
        assert!(matches!(ok, JsonRpcResponse::Success { .. }));

        let err: JsonRpcResponse = serde_json::from_str(
            r#"{"jsonrpc":"2.0","id":1,"error":{"code":24,"message":"Block not found"}}"#,
        )
        .unwrap();
        assert!(matches!(err, JsonRpcResponse::Error { .. }));
    }

    #[test]
    fn missing_response_is_internal_error() {
        let resp = JsonRpcResponse::missing(RequestId::Number(7));
        match resp.into_result() {
            Err(err) => assert_eq!(err.code, jsonrpc_code::INTERNAL_ERROR),
            Ok(_) => panic!("expected error"),
        }
    }
}
