//! Wraps an ordered list of transports, retrying each in turn and optionally promoting the
//! best-performing one to the head of the list (spec §4.4 "Fallback transport").

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use starknet_client_rpc_types::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
use tokio::sync::Mutex;

use crate::transport::Transport;

struct Ranked {
    transport: Arc<dyn Transport>,
    successes: AtomicU64,
    failures: AtomicU64,
}

/// `FallbackTransport` configuration: how many times to retry each sub-transport before moving
/// on, the delay between those retries, and whether to re-rank by observed success rate.
#[derive(Debug, Clone, Copy)]
pub struct FallbackConfig {
    pub retry_count: usize,
    pub retry_delay: Duration,
    pub rank: bool,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self { retry_count: 1, retry_delay: Duration::from_millis(200), rank: false }
    }
}

pub struct FallbackTransport {
    transports: Mutex<Vec<Ranked>>,
    config: FallbackConfig,
}

impl FallbackTransport {
    pub fn new(transports: Vec<Arc<dyn Transport>>) -> Self {
        Self::with_config(transports, FallbackConfig::default())
    }

    pub fn with_config(transports: Vec<Arc<dyn Transport>>, config: FallbackConfig) -> Self {
        let transports = transports
            .into_iter()
            .map(|transport| Ranked { transport, successes: AtomicU64::new(0), failures: AtomicU64::new(0) })
            .collect();
        Self { transports: Mutex::new(transports), config }
    }

    async fn try_request(&self, req: &JsonRpcRequest) -> Result<JsonRpcResponse, ()> {
        let snapshot: Vec<Arc<dyn Transport>> =
            self.transports.lock().await.iter().map(|r| r.transport.clone()).collect();

        for (index, transport) in snapshot.iter().enumerate() {
            for attempt in 0..=self.config.retry_count {
                let response = transport.request(req.clone()).await;
                let ok = !matches!(response, JsonRpcResponse::Error { .. });
                self.record(index, ok).await;
                if ok {
                    if self.config.rank {
                        self.promote(index).await;
                    }
                    return Ok(response);
                }
                if attempt < self.config.retry_count {
                    tokio::time::sleep(self.config.retry_delay).await;
                }
            }
        }
        Err(())
    }

    async fn record(&self, index: usize, ok: bool) {
        let transports = self.transports.lock().await;
        if let Some(ranked) = transports.get(index) {
            if ok {
                ranked.successes.fetch_add(1, Ordering::Relaxed);
            } else {
                ranked.failures.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Moves the transport at `index` to the front of the list if it now has a strictly better
    /// success rate than the current head.
    async fn promote(&self, index: usize) {
        let mut transports = self.transports.lock().await;
        if index == 0 || index >= transports.len() {
            return;
        }
        let success_rate = |r: &Ranked| {
            let s = r.successes.load(Ordering::Relaxed) as f64;
            let f = r.failures.load(Ordering::Relaxed) as f64;
            if s + f == 0.0 {
                0.0
            } else {
                s / (s + f)
            }
        };
        if success_rate(&transports[index]) > success_rate(&transports[0]) {
            let promoted = transports.remove(index);
            transports.insert(0, promoted);
        }
    }
}

fn all_failed_response(req: &JsonRpcRequest) -> JsonRpcResponse {
    JsonRpcResponse::error(
        req.id.clone(),
        JsonRpcError { code: -32603, message: "All transports failed".to_string(), data: None },
    )
}

#[async_trait]
impl Transport for FallbackTransport {
    async fn request(&self, req: JsonRpcRequest) -> JsonRpcResponse {
        match self.try_request(&req).await {
            Ok(response) => response,
            Err(()) => all_failed_response(&req),
        }
    }

    async fn request_batch(&self, reqs: Vec<JsonRpcRequest>) -> Vec<JsonRpcResponse> {
        let mut out = Vec::with_capacity(reqs.len());
        for req in reqs {
            out.push(self.request(req).await);
        }
        out
    }
}
