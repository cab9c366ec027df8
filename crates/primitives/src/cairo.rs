//! Cairo short strings and selector computation.

use sha3::{Digest, Keccak256};

use crate::Felt252;

/// A Cairo short string: at most 31 ASCII bytes, encoded as the big-endian unsigned integer of
/// its UTF-8 bytes. Used both for ABI `shortstring` values and for hash domain-separator
/// constants (`"invoke"`, `"L1_GAS"`, `"STARKNET_CONTRACT_ADDRESS"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShortString {
    data: [u8; 31],
    len: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShortStringError {
    #[error("short string must be at most 31 bytes, got {0}")]
    TooLong(usize),
    #[error("short string must be ASCII")]
    NotAscii,
}

impl ShortString {
    pub const fn new() -> Self {
        Self { data: [0; 31], len: 0 }
    }

    pub fn try_from_str(s: &str) -> Result<Self, ShortStringError> {
        if s.len() > 31 {
            return Err(ShortStringError::TooLong(s.len()));
        }
        if !s.is_ascii() {
            return Err(ShortStringError::NotAscii);
        }
        let mut data = [0u8; 31];
        data[..s.len()].copy_from_slice(s.as_bytes());
        Ok(Self { data, len: s.len() as u8 })
    }

    /// Const-evaluable constructor for use in `const` contexts. Panics on invalid input, mirroring
    /// the non-fallible const constructors the rest of the crate exposes for compile-time literals.
    pub const fn from_ascii(s: &str) -> Self {
        let bytes = s.as_bytes();
        let len = bytes.len();
        assert!(len <= 31, "string is too long to be a Cairo short string");

        let mut data = [0u8; 31];
        let mut i = 0;
        while i < len {
            let b = bytes[i];
            assert!(b.is_ascii(), "invalid ASCII character in string");
            data[i] = b;
            i += 1;
        }
        Self { data, len: len as u8 }
    }

    pub const fn as_bytes(&self) -> &[u8] {
        // SAFETY: `len` is always <= 31, the length of `data`.
        unsafe { std::slice::from_raw_parts(self.data.as_ptr(), self.len as usize) }
    }

    pub const fn as_str(&self) -> &str {
        // SAFETY: only ASCII bytes are ever stored.
        unsafe { core::str::from_utf8_unchecked(self.as_bytes()) }
    }

    /// The big-endian unsigned integer of the UTF-8 bytes, as a validated felt. Always succeeds:
    /// 31 bytes is 248 bits, comfortably below the 251-bit field.
    pub fn to_felt(&self) -> Felt252 {
        let mut buf = [0u8; 32];
        buf[32 - self.len as usize..].copy_from_slice(self.as_bytes());
        Felt252::from_bytes_be(&buf).expect("short string always fits in a felt")
    }
}

impl Default for ShortString {
    fn default() -> Self {
        Self::new()
    }
}

/// Big-endian unsigned integer of `s`'s UTF-8 bytes, interpreted as a felt. `s` must be at most
/// 31 bytes.
pub fn short_string(s: &str) -> Result<Felt252, ShortStringError> {
    ShortString::try_from_str(s).map(|s| s.to_felt())
}

/// Keccak-256 of `data`, interpreted big-endian.
pub fn sn_keccak(data: &[u8]) -> Felt252 {
    let digest = Keccak256::digest(data);
    // Mask off the top 6 bits so the hash always fits in a felt before selector masking; this
    // matches how `sn_keccak` is defined across the Starknet ecosystem (keccak256 output with
    // the top bits cleared, not just the low 250 bits after Felt construction).
    let mut bytes: [u8; 32] = digest.into();
    bytes[0] &= 0x03;
    Felt252::from_bytes_be(&bytes).expect("masked keccak digest always fits in a felt")
}

/// `selector = sn_keccak(utf8(name)) mod 2^250`: the 250-bit function/event identifier.
pub fn compute_selector(name: &str) -> Felt252 {
    let hash = sn_keccak(name.as_bytes());
    let mask = (num_bigint::BigUint::from(1u8) << 250) - num_bigint::BigUint::from(1u8);
    let masked = hash.to_biguint() & mask;
    Felt252::from_biguint(masked).expect("masked selector always fits in a felt")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transfer_selector_matches_starknet_js() {
        let selector = compute_selector("transfer");
        assert_eq!(
            selector.to_hex(),
            "0x83afd3f4caedc6eebf44246fe54e38c95e3179a5ec9ea81740eca5b482d12e"
        );
    }

    #[test]
    fn execute_selector_matches_starknet_js() {
        let selector = compute_selector("__execute__");
        assert_eq!(
            selector.to_hex(),
            "0x15d40a3d6ca2ac30f4031e42be28da9b056fef9bb7357ac5e85627ee876e5ad"
        );
    }

    #[test]
    fn contract_class_v0_1_0_short_string() {
        let felt = short_string("CONTRACT_CLASS_V0.1.0").unwrap();
        assert_eq!(felt.to_hex(), "0x434f4e54524143545f434c4153535f56302e312e30");
    }

    #[test]
    fn rejects_long_strings() {
        assert!(matches!(
            ShortString::try_from_str(&"a".repeat(32)),
            Err(ShortStringError::TooLong(32))
        ));
    }
}
