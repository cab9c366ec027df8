//! `matchBatchResponses` (spec §4.4): reorders a response array to positionally match the
//! request array, synthesising an `InternalError` for any request id left unanswered.

use std::collections::HashMap;

use starknet_client_rpc_types::envelope::RequestId;
use starknet_client_rpc_types::{JsonRpcRequest, JsonRpcResponse};

pub fn match_batch_responses(
    requests: &[JsonRpcRequest],
    responses: Vec<JsonRpcResponse>,
) -> Vec<JsonRpcResponse> {
    let mut by_id: HashMap<RequestId, JsonRpcResponse> =
        responses.into_iter().map(|r| (r.id().clone(), r)).collect();

    requests
        .iter()
        .map(|req| by_id.remove(&req.id).unwrap_or_else(|| JsonRpcResponse::missing(req.id.clone())))
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;

    #[test]
    fn reorders_out_of_order_responses() {
        let requests = vec![
            JsonRpcRequest::new(1u64, "a", Value::Null),
            JsonRpcRequest::new(2u64, "b", Value::Null),
        ];
        let responses: Vec<JsonRpcResponse> = serde_json::from_value(serde_json::json!([
            {"jsonrpc": "2.0", "id": 2, "result": "b"},
            {"jsonrpc": "2.0", "id": 1, "result": "a"},
        ]))
        .unwrap();

        let matched = match_batch_responses(&requests, responses);
        assert_eq!(matched[0].id(), &RequestId::Number(1));
        assert_eq!(matched[1].id(), &RequestId::Number(2));
    }

    #[test]
    fn synthesises_internal_error_for_missing_id() {
        let requests = vec![JsonRpcRequest::new(1u64, "a", Value::Null)];
        let matched = match_batch_responses(&requests, vec![]);
        assert!(matches!(matched[0], JsonRpcResponse::Error { .. }));
    }
}
