//! JSON-RPC transports: auto-batching HTTP, reconnecting WebSocket, and a ranked fallback
//! wrapper over both (spec §4.4).

pub mod batch;
pub mod config;
pub mod error;
pub mod fallback;
pub mod http;
pub mod transport;
pub mod ws;

pub use batch::match_batch_responses;
pub use config::{BatchConfig, HttpConfig, RetryConfig, WsConfig};
pub use error::TransportError;
pub use fallback::{FallbackConfig, FallbackTransport};
pub use http::HttpTransport;
pub use transport::Transport;
pub use ws::WsTransport;
