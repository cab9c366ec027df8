//! HTTP transport: single requests, explicit batches, and automatic batch coalescing with
//! retry/timeout (spec §4.4).

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use reqwest::{Client, Url};
use serde_json::Value;
use starknet_client_rpc_types::envelope::RequestId;
use starknet_client_rpc_types::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
use starknet_client_tasks::TaskSpawner;
use tokio::sync::{oneshot, Mutex, Notify};

use crate::batch::match_batch_responses;
use crate::config::{HttpConfig, RetryConfig};
use crate::error::TransportError;
use crate::transport::Transport;

struct PendingBatch {
    items: Mutex<Vec<(JsonRpcRequest, oneshot::Sender<JsonRpcResponse>)>>,
    flush: Notify,
}

/// A plain HTTP JSON-RPC transport, optionally coalescing concurrent `request` calls into
/// batches (spec §4.4 "Auto-batching").
pub struct HttpTransport {
    client: Client,
    url: Url,
    config: HttpConfig,
    batch: Option<Arc<PendingBatch>>,
    spawner: Option<TaskSpawner>,
}

impl HttpTransport {
    pub fn new(url: Url) -> Self {
        Self::with_config(url, HttpConfig::default())
    }

    pub fn with_config(url: Url, config: HttpConfig) -> Self {
        let batch = config
            .batch
            .map(|_| Arc::new(PendingBatch { items: Mutex::new(Vec::new()), flush: Notify::new() }));
        let spawner = config.batch.is_some().then(TaskSpawner::new);
        Self { client: Client::new(), url, config, batch, spawner }
    }

    async fn send_raw(&self, body: &Value) -> Result<Value, TransportError> {
        let attempt = || async {
            let response = self
                .client
                .post(self.url.clone())
                .json(body)
                .timeout(self.config.timeout)
                .send()
                .await?
                .error_for_status()?;
            response.json::<Value>().await.map_err(TransportError::from)
        };

        attempt.retry(&retry_builder(&self.config.retry)).await
    }

    async fn send_one(&self, req: JsonRpcRequest) -> JsonRpcResponse {
        let id = req.id.clone();
        let body = serde_json::to_value(&req).expect("JsonRpcRequest always serializes");
        match self.send_raw(&body).await {
            Ok(value) => decode_response(value, &id),
            Err(err) => JsonRpcResponse::error(id, err.into_jsonrpc_error()),
        }
    }

    async fn send_batch_now(&self, reqs: Vec<JsonRpcRequest>) -> Vec<JsonRpcResponse> {
        if reqs.is_empty() {
            return Vec::new();
        }
        let body = serde_json::to_value(&reqs).expect("batch always serializes");
        match self.send_raw(&body).await {
            Ok(Value::Array(values)) => {
                let responses: Vec<JsonRpcResponse> = values
                    .into_iter()
                    .filter_map(|v| serde_json::from_value(v).ok())
                    .collect();
                match_batch_responses(&reqs, responses)
            }
            Ok(other) => {
                tracing::warn!(?other, "expected a json array for a batch response");
                reqs.iter().map(|r| JsonRpcResponse::missing(r.id.clone())).collect()
            }
            Err(err) => {
                let error = err.into_jsonrpc_error();
                reqs.iter().map(|r| JsonRpcResponse::error(r.id.clone(), error.clone())).collect()
            }
        }
    }

    async fn enqueue(&self, batch: Arc<PendingBatch>, req: JsonRpcRequest) -> JsonRpcResponse {
        let batch_config = self.config.batch.expect("enqueue only called when batching is enabled");
        let (tx, rx) = oneshot::channel();

        let is_first_in_window = {
            let mut items = batch.items.lock().await;
            items.push((req, tx));
            let is_first = items.len() == 1;
            if items.len() >= batch_config.max_size {
                batch.flush.notify_one();
            }
            is_first
        };

        if is_first_in_window {
            let client = self.client.clone();
            let url = self.url.clone();
            let retry = self.config.retry;
            let timeout = self.config.timeout;
            let wait = batch_config.wait;
            let batch = batch.clone();
            if let Some(spawner) = &self.spawner {
                spawner.spawn(async move {
                    tokio::select! {
                        _ = tokio::time::sleep(wait) => {}
                        _ = batch.flush.notified() => {}
                    }
                    flush_window(client, url, timeout, retry, batch).await;
                });
            }
        }

        rx.await.unwrap_or_else(|_| {
            JsonRpcResponse::error(
                RequestId::Number(0),
                JsonRpcError { code: -32603, message: "batch window dropped before flush".to_string(), data: None },
            )
        })
    }
}

async fn flush_window(client: Client, url: Url, timeout: Duration, retry: RetryConfig, batch: Arc<PendingBatch>) {
    let drained = std::mem::take(&mut *batch.items.lock().await);
    if drained.is_empty() {
        return;
    }
    let (reqs, senders): (Vec<_>, Vec<_>) = drained.into_iter().unzip();

    let body = serde_json::to_value(&reqs).expect("batch always serializes");
    let attempt = || async {
        let response = client
            .post(url.clone())
            .json(&body)
            .timeout(timeout)
            .send()
            .await?
            .error_for_status()?;
        response.json::<Value>().await.map_err(TransportError::from)
    };

    let responses = match attempt.retry(&retry_builder(&retry)).await {
        Ok(Value::Array(values)) => {
            let decoded: Vec<JsonRpcResponse> =
                values.into_iter().filter_map(|v| serde_json::from_value(v).ok()).collect();
            match_batch_responses(&reqs, decoded)
        }
        Ok(_) => reqs.iter().map(|r| JsonRpcResponse::missing(r.id.clone())).collect(),
        Err(err) => {
            let error = err.into_jsonrpc_error();
            reqs.iter().map(|r| JsonRpcResponse::error(r.id.clone(), error.clone())).collect()
        }
    };

    for (sender, response) in senders.into_iter().zip(responses.into_iter()) {
        let _ = sender.send(response);
    }
}

fn retry_builder(retry: &RetryConfig) -> ExponentialBuilder {
    ExponentialBuilder::default().with_max_times(retry.retries).with_min_delay(retry.retry_delay)
}

fn decode_response(value: Value, id: &RequestId) -> JsonRpcResponse {
    serde_json::from_value(value).unwrap_or_else(|e| {
        JsonRpcResponse::error(
            id.clone(),
            JsonRpcError { code: -32700, message: format!("malformed response: {e}"), data: None },
        )
    })
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(&self, req: JsonRpcRequest) -> JsonRpcResponse {
        match &self.batch {
            Some(batch) => self.enqueue(batch.clone(), req).await,
            None => self.send_one(req).await,
        }
    }

    async fn request_batch(&self, reqs: Vec<JsonRpcRequest>) -> Vec<JsonRpcResponse> {
        self.send_batch_now(reqs).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn single_request_decodes_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0", "id": 1, "result": "0x534e5f4d41494e"
            })))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(Url::parse(&server.uri()).unwrap());
        let response = transport.request(JsonRpcRequest::new(1u64, "starknet_chainId", Value::Null)).await;
        assert!(matches!(response, JsonRpcResponse::Success { .. }));
    }

    #[tokio::test]
    async fn non_2xx_status_maps_to_internal_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST")).and(path("/")).respond_with(ResponseTemplate::new(500)).mount(&server).await;

        let transport = HttpTransport::with_config(
            Url::parse(&server.uri()).unwrap(),
            HttpConfig { retry: RetryConfig { retries: 0, retry_delay: Duration::from_millis(1) }, ..Default::default() },
        );
        let response = transport.request(JsonRpcRequest::new(1u64, "starknet_chainId", Value::Null)).await;
        assert!(matches!(response, JsonRpcResponse::Error { .. }));
    }

    #[tokio::test]
    async fn concurrent_requests_are_coalesced_into_one_batch() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"jsonrpc": "2.0", "id": 1, "result": "a"},
                {"jsonrpc": "2.0", "id": 2, "result": "b"},
            ])))
            .mount(&server)
            .await;

        let transport = Arc::new(HttpTransport::with_config(
            Url::parse(&server.uri()).unwrap(),
            HttpConfig { batch: Some(crate::config::BatchConfig { wait: Duration::from_millis(20), max_size: 10 }), ..Default::default() },
        ));

        let t1 = transport.clone();
        let t2 = transport.clone();
        let (r1, r2) = tokio::join!(
            t1.request(JsonRpcRequest::new(1u64, "a", Value::Null)),
            t2.request(JsonRpcRequest::new(2u64, "b", Value::Null)),
        );
        assert!(matches!(r1, JsonRpcResponse::Success { .. }));
        assert!(matches!(r2, JsonRpcResponse::Success { .. }));
    }
}
