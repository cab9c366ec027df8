//! Tunables shared by the three streams (spec §3 "Configuration knobs"). Every field has a
//! sensible default; callers override only what they need.

use std::time::Duration;

/// `watchPending`/`watchConfirmed` polling cadence when no WebSocket transport is in play.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Dedup FIFO cap (spec §3 `maxSeenTransactions`, default 20 000).
pub const DEFAULT_MAX_SEEN_TRANSACTIONS: usize = 20_000;

#[derive(Debug, Clone)]
pub struct StreamConfig {
    pub poll_interval: Duration,
    pub max_seen_transactions: usize,
    /// `track`'s poll budget: once reached, the stream emits `dropped` and terminates rather
    /// than polling forever (spec §4.8 `track`, `maxPendingPolls`). `None` polls indefinitely.
    pub max_pending_polls: Option<u32>,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_seen_transactions: DEFAULT_MAX_SEEN_TRANSACTIONS,
            max_pending_polls: None,
        }
    }
}
