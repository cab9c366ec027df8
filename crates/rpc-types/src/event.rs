//! Event wire types and the `getEvents` continuation-token pagination helper (spec §4.5, and
//! the supplemented paging feature in SPEC_FULL §2).

use std::fmt;
use std::num::ParseIntError;

use serde::{Deserialize, Serialize};
use starknet_client_primitives::{ContractAddress, Felt252};

use crate::block::BlockId;

/// An event as it appears embedded in a transaction receipt: no block/transaction metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub from_address: ContractAddress,
    pub keys: Vec<Felt252>,
    pub data: Vec<Felt252>,
}

/// An event as returned by `starknet_getEvents`: the embedded event plus the block/transaction
/// it was emitted in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmittedEvent {
    #[serde(flatten)]
    pub event: Event,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_hash: Option<Felt252>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
    pub transaction_hash: Felt252,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_block: Option<BlockId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_block: Option<BlockId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<ContractAddress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keys: Option<Vec<Vec<Felt252>>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultPageRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continuation_token: Option<String>,
    pub chunk_size: u64,
}

/// Body of a `starknet_getEvents` request: `{filter: {...fields, ...page}}` (spec §6: object
/// params for this one method).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventFilterWithPage {
    #[serde(flatten)]
    pub filter: EventFilter,
    #[serde(flatten)]
    pub page: ResultPageRequest,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetEventsResponse {
    pub events: Vec<EmittedEvent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continuation_token: Option<String>,
}

/// A parsed `getEvents` continuation token: `block_n,txn_n,event_n` in hex, comma-separated.
///
/// The Starknet RPC spec leaves the token's format implementation-defined; this mirrors the
/// format emitted by Starknet full nodes so the client can resume a paged query across process
/// restarts without treating the token as opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContinuationToken {
    pub block_n: u64,
    pub txn_n: u64,
    pub event_n: u64,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ContinuationTokenError {
    #[error("malformed continuation token")]
    InvalidToken,
    #[error("malformed continuation token field: {0}")]
    ParseFailed(#[from] ParseIntError),
}

impl ContinuationToken {
    pub fn parse(token: &str) -> Result<Self, ContinuationTokenError> {
        let parts: Vec<&str> = token.split(',').collect();
        let [block_n, txn_n, event_n] = parts[..]
            .try_into()
            .map_err(|_| ContinuationTokenError::InvalidToken)?;
        Ok(Self {
            block_n: u64::from_str_radix(block_n, 16)?,
            txn_n: u64::from_str_radix(txn_n, 16)?,
            event_n: u64::from_str_radix(event_n, 16)?,
        })
    }
}

impl fmt::Display for ContinuationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x},{:x},{:x}", self.block_n, self.txn_n, self.event_n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn continuation_token_round_trips() {
        let token = ContinuationToken { block_n: 10, txn_n: 2, event_n: 7 };
        assert_eq!(ContinuationToken::parse(&token.to_string()).unwrap(), token);
    }

    #[test]
    fn rejects_malformed_token() {
        assert_eq!(ContinuationToken::parse("1,2"), Err(ContinuationTokenError::InvalidToken));
        assert!(matches!(
            ContinuationToken::parse("zz,2,3"),
            Err(ContinuationTokenError::ParseFailed(_))
        ));
    }
}
