use std::fmt;
use std::str::FromStr;

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::Signed;
use starknet_types_core::felt::Felt as RawFelt;

use crate::error::FeltError;

/// The Stark field prime, `2^251 + 17*2^192 + 1`.
fn stark_prime() -> BigUint {
    (BigUint::from(1u8) << 251) + (BigUint::from(17u8) << 192) + BigUint::from(1u8)
}

/// A field element of the Starknet prime field: an integer in `[0, P)` where
/// `P = 2^251 + 17*2^192 + 1`.
///
/// Every [`Felt252`] that reaches application code has already been validated against `P`;
/// there is no constructor that can produce an out-of-range value.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Felt252(RawFelt);

impl Felt252 {
    pub const ZERO: Self = Self(RawFelt::ZERO);
    pub const ONE: Self = Self(RawFelt::ONE);
    pub const TWO: Self = Self(RawFelt::TWO);
    pub const THREE: Self = Self(RawFelt::THREE);

    /// Builds a `Felt252` from a raw value known ahead of time to already be in range.
    ///
    /// Used by the `felt!`/`address!` compile-time macros, and internally wherever a value was
    /// just produced by a reduction (`mod P`) and is reconstructing the branded type. Not part
    /// of the public validated-construction surface.
    pub const fn from_raw_unchecked(limbs: [u64; 4]) -> Self {
        Self(RawFelt::from_raw(limbs))
    }

    pub(crate) const fn from_raw(inner: RawFelt) -> Self {
        Self(inner)
    }

    pub(crate) const fn inner(&self) -> &RawFelt {
        &self.0
    }

    pub(crate) const fn into_inner(self) -> RawFelt {
        self.0
    }

    /// Parses a `0x`/`0X`-prefixed (or bare) hex string into a validated felt.
    pub fn from_hex(s: &str) -> Result<Self, FeltError> {
        let digits = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(FeltError::InvalidHex(s.to_string()));
        }
        let value = BigUint::parse_bytes(digits.as_bytes(), 16)
            .ok_or_else(|| FeltError::InvalidHex(s.to_string()))?;
        Self::from_biguint(value)
    }

    /// Parses a base-10 string into a validated felt. A leading `-` is rejected with
    /// [`FeltError::Overflow`] since felts are non-negative.
    pub fn from_dec_str(s: &str) -> Result<Self, FeltError> {
        let value = BigInt::from_str(s).map_err(|_| FeltError::NotInteger(s.to_string()))?;
        Self::from_bigint(&value)
    }

    /// Builds a felt from an arbitrary-precision signed integer, rejecting negatives and
    /// values `>= P`.
    pub fn from_bigint(value: &BigInt) -> Result<Self, FeltError> {
        if value.is_negative() {
            return Err(FeltError::Overflow(value.to_string()));
        }
        let (_, magnitude) = value.to_bytes_be();
        Self::from_biguint(BigUint::from_bytes_be(&magnitude))
    }

    /// Builds a felt from an arbitrary-precision non-negative integer, rejecting values `>= P`.
    pub fn from_biguint(value: BigUint) -> Result<Self, FeltError> {
        if value >= stark_prime() {
            return Err(FeltError::Overflow(format!("0x{}", value.to_str_radix(16))));
        }
        let mut bytes = [0u8; 32];
        let be = value.to_bytes_be();
        bytes[32 - be.len()..].copy_from_slice(&be);
        Ok(Self(RawFelt::from_bytes_be(&bytes)))
    }

    /// Builds a felt from a 32-byte big-endian representation, rejecting values `>= P`.
    pub fn from_bytes_be(bytes: &[u8; 32]) -> Result<Self, FeltError> {
        Self::from_biguint(BigUint::from_bytes_be(bytes))
    }

    /// Builds a felt directly from a `u64`; always succeeds since `u64::MAX < P`.
    pub fn from_u64(value: u64) -> Self {
        Self(RawFelt::from(value))
    }

    /// Builds a felt directly from a `u128`; always succeeds since `u128::MAX < P`.
    pub fn from_u128(value: u128) -> Self {
        Self(RawFelt::from(value))
    }

    /// Returns `true` if `value` is a syntactically valid felt representation (non-negative,
    /// `< P`), without constructing one.
    pub fn is_valid_biguint(value: &BigUint) -> bool {
        *value < stark_prime()
    }

    pub fn is_zero(&self) -> bool {
        self.0 == RawFelt::ZERO
    }

    pub fn equals(&self, other: &Self) -> bool {
        self == other
    }

    /// Lowercase, `0x`-prefixed, unpadded hex representation.
    pub fn to_hex(&self) -> String {
        format!("{:#x}", self.0)
    }

    pub fn to_biguint(&self) -> BigUint {
        BigUint::from_bytes_be(&self.to_bytes())
    }

    pub fn to_bigint(&self) -> BigInt {
        BigInt::from_biguint(Sign::Plus, self.to_biguint())
    }

    /// 32-byte big-endian representation.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.to_bytes_be()
    }

    pub fn to_u64(&self) -> Option<u64> {
        let bytes = self.to_bytes();
        if bytes[..24].iter().any(|&b| b != 0) {
            return None;
        }
        Some(u64::from_be_bytes(bytes[24..].try_into().unwrap()))
    }

    pub fn to_u128(&self) -> Option<u128> {
        let bytes = self.to_bytes();
        if bytes[..16].iter().any(|&b| b != 0) {
            return None;
        }
        Some(u128::from_be_bytes(bytes[16..].try_into().unwrap()))
    }

    pub fn raw(&self) -> RawFelt {
        self.0
    }
}

impl From<RawFelt> for Felt252 {
    fn from(value: RawFelt) -> Self {
        Self(value)
    }
}

impl From<Felt252> for RawFelt {
    fn from(value: Felt252) -> Self {
        value.0
    }
}

impl From<u64> for Felt252 {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl From<u128> for Felt252 {
    fn from(value: u128) -> Self {
        Self::from_u128(value)
    }
}

impl From<bool> for Felt252 {
    fn from(value: bool) -> Self {
        if value { Self::ONE } else { Self::ZERO }
    }
}

impl FromStr for Felt252 {
    type Err = FeltError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with("0x") || s.starts_with("0X") {
            Self::from_hex(s)
        } else {
            Self::from_dec_str(s)
        }
    }
}

impl fmt::Debug for Felt252 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Felt252({})", self.to_hex())
    }
}

impl fmt::Display for Felt252 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::LowerHex for Felt252 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl serde::Serialize for Felt252 {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> serde::Deserialize<'de> for Felt252 {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}
