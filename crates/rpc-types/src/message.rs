//! `starknet_estimateMessageFee` wire types: a synthetic L1-to-L2 message to price.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use starknet_client_primitives::{ContractAddress, Felt252};

/// A 20-byte Ethereum address, `0x`-hex encoded on the wire. Scoped to this one DTO; an L1
/// sender address is never branded or validated beyond its fixed length elsewhere in this
/// client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EthAddress([u8; 20]);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EthAddressError {
    #[error("ethereum address must be 20 bytes, got {0}")]
    WrongLength(usize),
    #[error("invalid hex in ethereum address")]
    InvalidHex,
}

impl FromStr for EthAddress {
    type Err = EthAddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
        let bytes = hex::decode(digits).map_err(|_| EthAddressError::InvalidHex)?;
        let array: [u8; 20] =
            bytes.try_into().map_err(|b: Vec<u8>| EthAddressError::WrongLength(b.len()))?;
        Ok(Self(array))
    }
}

impl fmt::Display for EthAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl Serialize for EthAddress {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for EthAddress {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// A message from L1, as submitted to `starknet_estimateMessageFee`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgFromL1 {
    pub from_address: EthAddress,
    pub to_address: ContractAddress,
    pub entry_point_selector: Felt252,
    pub payload: Vec<Felt252>,
}

/// One entry of `starknet_getMessagesStatus`'s response: the L2 handler transaction an L1
/// message produced, and how far it got.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageStatus {
    pub transaction_hash: Felt252,
    pub finality_status: crate::transaction::FinalityStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eth_address_round_trips_through_hex() {
        let addr = EthAddress::from_str("0x00000000000000000000000000000000000001").unwrap();
        assert_eq!(addr.to_string(), "0x0000000000000000000000000000000000000001");
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(matches!(EthAddress::from_str("0x01"), Err(EthAddressError::WrongLength(_))));
    }
}
