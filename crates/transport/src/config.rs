//! Tunables for the HTTP and WebSocket transports (spec §4.4).

use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct RetryConfig {
    pub retries: usize,
    pub retry_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self { retries: 3, retry_delay: Duration::from_millis(200) }
    }
}

/// Auto-batching window: concurrent `request` calls arriving within `wait` are coalesced into a
/// single batch, flushed early once `max_size` is reached.
#[derive(Debug, Clone, Copy)]
pub struct BatchConfig {
    pub wait: Duration,
    pub max_size: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { wait: Duration::from_millis(10), max_size: 20 }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct HttpConfig {
    pub timeout: Duration,
    pub retry: RetryConfig,
    pub batch: Option<BatchConfig>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout: Duration::from_secs(30), retry: RetryConfig::default(), batch: None }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct WsConfig {
    pub reconnect_delay: Duration,
    pub max_reconnect_attempts: Option<usize>,
    pub keep_alive_interval: Duration,
    pub request_timeout: Duration,
}

impl Default for WsConfig {
    fn default() -> Self {
        Self {
            reconnect_delay: Duration::from_secs(1),
            max_reconnect_attempts: None,
            keep_alive_interval: Duration::from_secs(30),
            request_timeout: Duration::from_secs(30),
        }
    }
}
