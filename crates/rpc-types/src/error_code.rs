//! Starknet node-level JSON-RPC error codes consumed by the streams crate to classify a
//! `getTransactionReceipt`/`getTransactionByHash` failure as transient (spec §6, §7).

/// A subset of the Starknet RPC error codes the client distinguishes by number rather than by
/// matching the human-readable message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StarknetErrorCode(pub i64);

impl StarknetErrorCode {
    pub const CONTRACT_NOT_FOUND: Self = Self(20);
    pub const BLOCK_NOT_FOUND: Self = Self(24);
    pub const INVALID_TRANSACTION_HASH: Self = Self(25);
    pub const TRANSACTION_HASH_NOT_FOUND: Self = Self(29);

    /// Codes the transaction-stream poller treats as "receipt not yet available", not a terminal
    /// failure (spec §4.8 `track`).
    pub fn is_pending_receipt_code(code: i64) -> bool {
        matches!(code, 24 | 25 | 29)
    }

    /// Message-based fallback for nodes that return a generic error code with a descriptive
    /// message instead of one of the codes above (spec §4.8: `"not found"`/`"not received"`/
    /// `"pending"`).
    pub fn message_suggests_pending(message: &str) -> bool {
        let lower = message.to_ascii_lowercase();
        lower.contains("not found") || lower.contains("not received") || lower.contains("pending")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_pending_receipt_codes() {
        assert!(StarknetErrorCode::is_pending_receipt_code(24));
        assert!(StarknetErrorCode::is_pending_receipt_code(25));
        assert!(StarknetErrorCode::is_pending_receipt_code(29));
        assert!(!StarknetErrorCode::is_pending_receipt_code(20));
    }

    #[test]
    fn classifies_pending_message() {
        assert!(StarknetErrorCode::message_suggests_pending("Transaction hash not found"));
        assert!(StarknetErrorCode::message_suggests_pending("still pending"));
        assert!(!StarknetErrorCode::message_suggests_pending("contract reverted"));
    }
}
