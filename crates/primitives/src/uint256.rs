use std::fmt;

use num_bigint::BigUint;

use crate::error::FeltError;
use crate::Felt252;

/// A 256-bit unsigned integer, represented on the wire as the Cairo `u256` struct: the pair
/// `(low, high)` such that `value = low + high * 2^128`, low limb first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Uint256 {
    low: u128,
    high: u128,
}

impl Uint256 {
    pub const ZERO: Self = Self { low: 0, high: 0 };
    pub const MAX: Self = Self { low: u128::MAX, high: u128::MAX };

    pub fn new(low: u128, high: u128) -> Self {
        Self { low, high }
    }

    pub fn low(&self) -> u128 {
        self.low
    }

    pub fn high(&self) -> u128 {
        self.high
    }

    /// Splits a value into its Cairo wire representation: `(low, high)` felts, low-first.
    ///
    /// Named in the plural (`toFelts`, not `toFelt`) because a `u256` always serializes to
    /// exactly two felts.
    pub fn to_felts(&self) -> [Felt252; 2] {
        [Felt252::from_u128(self.low), Felt252::from_u128(self.high)]
    }

    /// Reassembles a `Uint256` from its two-felt wire representation. Fails if either limb does
    /// not fit in 128 bits (the limb felts must themselves already be `< 2^128`, which is an ABI
    /// invariant for well-formed `u256` values).
    pub fn from_felts(low: Felt252, high: Felt252) -> Result<Self, FeltError> {
        let low = low.to_u128().ok_or_else(|| FeltError::Overflow(low.to_hex()))?;
        let high = high.to_u128().ok_or_else(|| FeltError::Overflow(high.to_hex()))?;
        Ok(Self { low, high })
    }

    pub fn to_biguint(&self) -> BigUint {
        (BigUint::from(self.high) << 128) + BigUint::from(self.low)
    }

    pub fn from_biguint(value: &BigUint) -> Result<Self, FeltError> {
        if value.bits() > 256 {
            return Err(FeltError::Overflow(format!("0x{}", value.to_str_radix(16))));
        }
        let mask = (BigUint::from(1u8) << 128) - BigUint::from(1u8);
        let low = biguint_to_u128(&(value & &mask));
        let high = biguint_to_u128(&(value >> 128));
        Ok(Self { low, high })
    }
}

fn biguint_to_u128(value: &BigUint) -> u128 {
    let bytes = value.to_bytes_be();
    let mut buf = [0u8; 16];
    buf[16 - bytes.len()..].copy_from_slice(&bytes);
    u128::from_be_bytes(buf)
}

impl From<u128> for Uint256 {
    fn from(value: u128) -> Self {
        Self { low: value, high: 0 }
    }
}

impl fmt::Display for Uint256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_biguint())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_low_only() {
        let v = Uint256::from(10u128.pow(18) as u128);
        let [low, high] = v.to_felts();
        assert_eq!(low, Felt252::from_u128(10u128.pow(18)));
        assert!(high.is_zero());
    }

    #[test]
    fn split_spans_high_limb() {
        let value = (BigUint::from(1u8) << 128) + BigUint::from(1u8);
        let v = Uint256::from_biguint(&value).unwrap();
        assert_eq!(v.low(), 1);
        assert_eq!(v.high(), 1);
    }

    #[test]
    fn round_trip_felts() {
        let v = Uint256::new(42, 7);
        let [low, high] = v.to_felts();
        assert_eq!(Uint256::from_felts(low, high).unwrap(), v);
    }

    #[test]
    fn round_trip_biguint() {
        let value = BigUint::from(u128::MAX) * BigUint::from(3u8) + BigUint::from(9u8);
        let v = Uint256::from_biguint(&value).unwrap();
        assert_eq!(v.to_biguint(), value);
    }

    #[test]
    fn rejects_overflow() {
        let value = BigUint::from(1u8) << 256;
        assert!(Uint256::from_biguint(&value).is_err());
    }
}
