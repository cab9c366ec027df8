//! Schema-typed Starknet JSON-RPC provider: one async method per node call (spec §4.5), generic
//! over any [`Transport`](starknet_client_transport::Transport), plus a WebSocket-only event
//! subscription surface.
//!
//! Rust's per-method function signatures already give each call its own concrete parameter and
//! return type, so there is no separate runtime schema registry here — the type checker is the
//! schema.

pub mod client;
pub mod error;
pub mod subscriptions;

pub use client::Provider;
pub use error::ProviderError;
pub use subscriptions::{Subscription, SubscriptionEvent};
