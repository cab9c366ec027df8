//! WebSocket transport: persistent connection, id-correlated request/response, subscription
//! routing, keep-alive, and auto-reconnect with a resubscribe hook (spec §4.4).

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use starknet_client_rpc_types::envelope::RequestId;
use starknet_client_rpc_types::subscription::SubscriptionNotification;
use starknet_client_rpc_types::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
use starknet_client_tasks::TaskSpawner;
use tokio::net::TcpStream;
use tokio::sync::{broadcast, mpsc, oneshot, Mutex};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use url::Url;

use crate::config::WsConfig;
use crate::error::TransportError;
use crate::transport::Transport;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WriteHalf = futures_util::stream::SplitSink<WsStream, Message>;

struct Shared {
    url: Url,
    config: WsConfig,
    write: Mutex<Option<WriteHalf>>,
    pending: Mutex<HashMap<RequestId, oneshot::Sender<JsonRpcResponse>>>,
    subscriptions: Mutex<HashMap<String, mpsc::UnboundedSender<Value>>>,
    next_id: AtomicU64,
    reconnected: broadcast::Sender<()>,
    spawner: TaskSpawner,
    start: Instant,
    /// Milliseconds since `start` at the last received message, used by the keep-alive task to
    /// detect a half-open socket that stops receiving traffic without ever erroring on write.
    last_seen_millis: AtomicU64,
}

fn touch(shared: &Shared) {
    let elapsed = shared.start.elapsed().as_millis() as u64;
    shared.last_seen_millis.store(elapsed, Ordering::Relaxed);
}

/// A reconnecting WebSocket JSON-RPC transport. Construct with [`WsTransport::connect`], which
/// establishes the first connection and starts the reader/keep-alive/reconnect tasks.
#[derive(Clone)]
pub struct WsTransport {
    shared: Arc<Shared>,
}

impl WsTransport {
    pub async fn connect(url: Url) -> Result<Self, TransportError> {
        Self::connect_with_config(url, WsConfig::default()).await
    }

    pub async fn connect_with_config(url: Url, config: WsConfig) -> Result<Self, TransportError> {
        let (reconnected, _) = broadcast::channel(16);
        let shared = Arc::new(Shared {
            url,
            config,
            write: Mutex::new(None),
            pending: Mutex::new(HashMap::new()),
            subscriptions: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            reconnected,
            spawner: TaskSpawner::new(),
            start: Instant::now(),
            last_seen_millis: AtomicU64::new(0),
        });

        establish(&shared).await?;
        spawn_keep_alive(shared.clone());

        Ok(Self { shared })
    }

    /// A stream of `subscription_id → result` notifications for a subscription created by a
    /// prior `request()` call returning that id.
    pub async fn listen(&self, subscription_id: impl Into<String>) -> mpsc::UnboundedReceiver<Value> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.shared.subscriptions.lock().await.insert(subscription_id.into(), tx);
        rx
    }

    /// Fires every time the connection is re-established after a drop, so callers can
    /// resubscribe (spec §4.4 "reconnected hook").
    pub fn reconnected(&self) -> broadcast::Receiver<()> {
        self.shared.reconnected.subscribe()
    }

    fn next_id(&self) -> RequestId {
        RequestId::Number(self.shared.next_id.fetch_add(1, Ordering::Relaxed))
    }
}

async fn establish(shared: &Arc<Shared>) -> Result<(), TransportError> {
    let (stream, _) = connect_async(shared.url.as_str()).await?;
    let (write, read) = stream.split();
    *shared.write.lock().await = Some(write);
    touch(shared);

    let reader_shared = shared.clone();
    shared.spawner.spawn(async move {
        read_loop(reader_shared, read).await;
    });

    Ok(())
}

async fn read_loop(
    shared: Arc<Shared>,
    mut read: futures_util::stream::SplitStream<WsStream>,
) {
    while let Some(message) = read.next().await {
        match message {
            Ok(Message::Text(text)) => {
                touch(&shared);
                handle_text(&shared, &text).await;
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => touch(&shared),
            Err(_) => break,
        }
    }

    tracing::warn!("websocket connection dropped, scheduling reconnect");
    *shared.write.lock().await = None;
    reconnect(shared).await;
}

async fn handle_text(shared: &Arc<Shared>, text: &str) {
    if let Ok(notification) = serde_json::from_str::<SubscriptionNotification>(text) {
        if notification.method == "starknet_subscription" {
            let id = notification.params.subscription_id.to_string();
            let subscriptions = shared.subscriptions.lock().await;
            if let Some(tx) = subscriptions.get(&id) {
                let _ = tx.send(notification.params.result);
            }
            return;
        }
    }

    if let Ok(response) = serde_json::from_str::<JsonRpcResponse>(text) {
        let mut pending = shared.pending.lock().await;
        if let Some(sender) = pending.remove(response.id()) {
            let _ = sender.send(response);
        }
    }
}

async fn reconnect(shared: Arc<Shared>) {
    let mut attempt = 0usize;
    loop {
        if let Some(max) = shared.config.max_reconnect_attempts {
            if attempt >= max {
                tracing::error!("giving up reconnecting after {attempt} attempts");
                return;
            }
        }
        tokio::time::sleep(shared.config.reconnect_delay).await;
        attempt += 1;

        match establish(&shared).await {
            Ok(()) => {
                let _ = shared.reconnected.send(());
                return;
            }
            Err(err) => tracing::warn!(%err, attempt, "reconnect attempt failed"),
        }
    }
}

fn spawn_keep_alive(shared: Arc<Shared>) {
    shared.spawner.spawn(async move {
        let mut interval = tokio::time::interval(shared.config.keep_alive_interval);
        loop {
            interval.tick().await;

            let now_millis = shared.start.elapsed().as_millis() as u64;
            let last_seen_millis = shared.last_seen_millis.load(Ordering::Relaxed);
            let since_last_seen = Duration::from_millis(now_millis.saturating_sub(last_seen_millis));

            if since_last_seen >= shared.config.keep_alive_interval * 2 {
                tracing::warn!(?since_last_seen, "no traffic in 2x the keep-alive interval, forcing reconnect");
                *shared.write.lock().await = None;
                reconnect(shared.clone()).await;
                continue;
            }

            let mut write = shared.write.lock().await;
            if let Some(sink) = write.as_mut() {
                if sink.send(Message::Ping(Vec::new())).await.is_err() {
                    tracing::warn!("keep-alive ping failed, connection likely dead");
                }
            }
        }
    });
}

#[async_trait]
impl Transport for WsTransport {
    async fn request(&self, req: JsonRpcRequest) -> JsonRpcResponse {
        let id = req.id.clone();
        let (tx, rx) = oneshot::channel();
        self.shared.pending.lock().await.insert(id.clone(), tx);

        let body = match serde_json::to_string(&req) {
            Ok(body) => body,
            Err(e) => return JsonRpcResponse::error(id, JsonRpcError { code: -32700, message: e.to_string(), data: None }),
        };

        let sent = {
            let mut write = self.shared.write.lock().await;
            match write.as_mut() {
                Some(sink) => sink.send(Message::Text(body)).await.is_ok(),
                None => false,
            }
        };

        if !sent {
            self.shared.pending.lock().await.remove(&id);
            return JsonRpcResponse::error(
                id,
                TransportError::NotConnected.into_jsonrpc_error(),
            );
        }

        match tokio::time::timeout(self.shared.config.request_timeout, rx).await {
            Ok(Ok(response)) => response,
            Ok(Err(_)) | Err(_) => {
                self.shared.pending.lock().await.remove(&id);
                JsonRpcResponse::error(id, TransportError::Timeout(self.shared.config.request_timeout).into_jsonrpc_error())
            }
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

impl WsTransport {
    /// Assigns the next monotonic id before delegating to [`Transport::request`], mirroring the
    /// "`id` is auto-assigned monotonically if absent" rule (spec §4.4) for callers that built a
    /// request without one.
    pub async fn request_with_auto_id(&self, method: impl Into<String>, params: Value) -> JsonRpcResponse {
        let req = JsonRpcRequest::new(self.next_id(), method, params);
        self.request(req).await
    }
}

#[cfg(test)]
mod tests {
    use tokio::net::TcpListener;
    use tokio_tungstenite::accept_async;

    use super::*;

    async fn local_listener() -> (TcpListener, Url) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        (listener, Url::parse(&format!("ws://{addr}")).unwrap())
    }

    #[tokio::test]
    async fn requests_are_correlated_by_id_even_when_answered_out_of_order() {
        let (listener, url) = local_listener().await;

        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = accept_async(stream).await.unwrap();

            let mut requests = Vec::new();
            while requests.len() < 2 {
                if let Some(Ok(Message::Text(text))) = ws.next().await {
                    requests.push(serde_json::from_str::<JsonRpcRequest>(&text).unwrap());
                }
            }

            // answer in reverse order to prove the client matches on id, not arrival order
            for req in requests.iter().rev() {
                let body = serde_json::json!({"jsonrpc": "2.0", "id": req.id, "result": req.method}).to_string();
                ws.send(Message::Text(body)).await.unwrap();
            }

            let _ = ws.next().await;
        });

        let transport = WsTransport::connect(url).await.unwrap();
        let (r1, r2) = tokio::join!(
            transport.request(JsonRpcRequest::new(1u64, "method_one", Value::Null)),
            transport.request(JsonRpcRequest::new(2u64, "method_two", Value::Null)),
        );

        assert_eq!(r1.into_result().unwrap(), Value::String("method_one".to_string()));
        assert_eq!(r2.into_result().unwrap(), Value::String("method_two".to_string()));
    }

    #[tokio::test]
    async fn subscription_notifications_are_routed_to_listeners_by_id() {
        let (listener, url) = local_listener().await;

        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = accept_async(stream).await.unwrap();

            // give the client a chance to register its listener before the push arrives
            tokio::time::sleep(Duration::from_millis(50)).await;
            let notification = serde_json::json!({
                "jsonrpc": "2.0",
                "method": "starknet_subscription",
                "params": {"subscription": 7, "result": {"hello": "world"}},
            });
            ws.send(Message::Text(notification.to_string())).await.unwrap();

            let _ = ws.next().await;
        });

        let transport = WsTransport::connect(url).await.unwrap();
        let mut rx = transport.listen("7").await;

        let payload = tokio::time::timeout(Duration::from_secs(1), rx.recv()).await.unwrap().unwrap();
        assert_eq!(payload, serde_json::json!({"hello": "world"}));
    }

    #[tokio::test]
    async fn an_unexpected_close_triggers_reconnect_and_the_new_connection_serves_requests() {
        let (listener, url) = local_listener().await;

        tokio::spawn(async move {
            // first connection: accept the handshake, then drop it to simulate a dead socket
            let (stream, _) = listener.accept().await.unwrap();
            drop(accept_async(stream).await.unwrap());

            // second connection: answer one request, then hold the socket open
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = accept_async(stream).await.unwrap();
            if let Some(Ok(Message::Text(text))) = ws.next().await {
                let req: JsonRpcRequest = serde_json::from_str(&text).unwrap();
                let body = serde_json::json!({"jsonrpc": "2.0", "id": req.id, "result": "ok"}).to_string();
                ws.send(Message::Text(body)).await.unwrap();
            }
            let _ = ws.next().await;
        });

        let config = WsConfig { reconnect_delay: Duration::from_millis(10), ..Default::default() };
        let transport = WsTransport::connect_with_config(url, config).await.unwrap();

        let mut reconnected = transport.reconnected();
        tokio::time::timeout(Duration::from_secs(2), reconnected.recv()).await.unwrap().unwrap();

        let response = transport.request(JsonRpcRequest::new(1u64, "starknet_chainId", Value::Null)).await;
        assert!(matches!(response, JsonRpcResponse::Success { .. }));
    }
}
