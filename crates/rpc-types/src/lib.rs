//! Wire DTOs for the JSON-RPC envelope and the Starknet method surface: blocks, transactions,
//! receipts, events, state updates, fee estimates, traces and subscription payloads.
//!
//! Types here model the wire format only; they carry no behaviour beyond `serde` (de)serialization
//! and the handful of structural helpers (`ContinuationToken`, `StarknetErrorCode`) a transport or
//! provider needs to interpret a response.

pub mod block;
pub mod broadcasted;
pub mod call;
pub mod envelope;
pub mod error_code;
pub mod event;
pub mod fee;
pub mod message;
pub mod receipt;
pub mod state_update;
pub mod storage_proof;
pub mod subscription;
pub mod trace;
pub mod transaction;

pub use call::{CallResponse, FunctionCall};
pub use envelope::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
pub use error_code::StarknetErrorCode;
pub use event::ContinuationToken;
pub use message::{EthAddress, MessageStatus, MsgFromL1};
