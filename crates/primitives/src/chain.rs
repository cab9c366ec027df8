//! Chain identifiers, represented as the short-string encoding of the chain's name
//! (e.g. `SN_MAIN`, `SN_SEPOLIA`), matching how Starknet nodes report `chainId`.

use std::fmt;
use std::str::FromStr;

use crate::cairo::ShortString;
use crate::error::FeltError;
use crate::Felt252;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(Felt252);

impl ChainId {
    pub const MAINNET_NAME: &'static str = "SN_MAIN";
    pub const SEPOLIA_NAME: &'static str = "SN_SEPOLIA";

    pub fn from_short_string(name: &str) -> Result<Self, FeltError> {
        let short = ShortString::try_from_str(name)
            .map_err(|e| FeltError::InvalidHex(e.to_string()))?;
        Ok(Self(short.to_felt()))
    }

    pub fn mainnet() -> Self {
        Self::from_short_string(Self::MAINNET_NAME).expect("valid short string")
    }

    pub fn sepolia() -> Self {
        Self::from_short_string(Self::SEPOLIA_NAME).expect("valid short string")
    }

    pub fn as_felt(&self) -> Felt252 {
        self.0
    }
}

impl From<Felt252> for ChainId {
    fn from(value: Felt252) -> Self {
        Self(value)
    }
}

impl FromStr for ChainId {
    type Err = FeltError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with("0x") {
            Felt252::from_hex(s).map(Self)
        } else {
            Self::from_short_string(s)
        }
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mainnet_chain_id_is_short_string_of_name() {
        let id = ChainId::mainnet();
        assert_eq!(id.as_felt(), crate::cairo::short_string("SN_MAIN").unwrap());
    }
}
