//! Lazy transaction streams built on top of `Provider`: `watchPending`, `watchConfirmed`, and
//! `track` (spec §4.8). Each has a polling entry point that works over any [`Transport`] and, for
//! `WsTransport`, a WebSocket entry point that rides the matching subscription instead of a
//! timer.
//!
//! [`Transport`]: starknet_client_transport::Transport

pub mod confirmed;
pub mod config;
pub mod dedup;
pub mod error;
pub mod filter;
pub mod pending;
pub mod track;

pub use confirmed::{watch_confirmed, watch_confirmed_ws, ConfirmedEvent};
pub use config::StreamConfig;
pub use dedup::SeenState;
pub use error::StreamError;
pub use filter::TxFilter;
pub use pending::{watch_pending, watch_pending_ws};
pub use track::{track, TrackEvent};
