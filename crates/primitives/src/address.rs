use std::fmt;
use std::str::FromStr;

use num_bigint::BigUint;

use crate::error::{AddressError, FeltError};
use crate::Felt252;

/// `2^251 - 256`: the upper bound a [`ContractAddress`] must stay below.
fn address_bound() -> BigUint {
    (BigUint::from(1u8) << 251) - BigUint::from(256u16)
}

macro_rules! felt_newtype {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct $name(Felt252);

        impl $name {
            pub const ZERO: Self = Self(Felt252::ZERO);

            /// Builds this branded type from an already-validated felt, with no further checks.
            pub const fn from_raw_unchecked(limbs: [u64; 4]) -> Self {
                Self(Felt252::from_raw_unchecked(limbs))
            }

            pub fn as_felt(&self) -> Felt252 {
                self.0
            }
        }

        impl From<Felt252> for $name {
            fn from(value: Felt252) -> Self {
                Self(value)
            }
        }

        impl From<$name> for Felt252 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl std::ops::Deref for $name {
            type Target = Felt252;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = FeltError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Felt252::from_str(s).map(Self)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0.to_hex())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0.to_hex())
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                self.0.serialize(serializer)
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                Felt252::deserialize(deserializer).map(Self)
            }
        }
    };
}

felt_newtype!(ClassHash, "The canonical hash identifying a declared contract class.");
felt_newtype!(StorageKey, "A key into a contract's storage tree.");

/// A Starknet contract address: a felt constrained to `value < 2^251 - 256`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ContractAddress(Felt252);

impl ContractAddress {
    pub const ZERO: Self = Self(Felt252::ZERO);

    /// Validates `felt < 2^251 - 256` and brands it as a `ContractAddress`.
    pub fn new(felt: Felt252) -> Result<Self, AddressError> {
        if felt.to_biguint() >= address_bound() {
            return Err(AddressError::OutOfBounds(felt.to_hex()));
        }
        Ok(Self(felt))
    }

    /// Builds this branded type from a value already known to satisfy the address bound (e.g.
    /// the output of [`crate::ContractAddress::new`]-equivalent address-derivation math in the
    /// hash crate, which reduces modulo the same bound before handing back a felt).
    pub const fn from_raw_unchecked(limbs: [u64; 4]) -> Self {
        Self(Felt252::from_raw_unchecked(limbs))
    }

    pub fn as_felt(&self) -> Felt252 {
        self.0
    }
}

impl TryFrom<Felt252> for ContractAddress {
    type Error = AddressError;

    fn try_from(value: Felt252) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ContractAddress> for Felt252 {
    fn from(value: ContractAddress) -> Self {
        value.0
    }
}

impl std::ops::Deref for ContractAddress {
    type Target = Felt252;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromStr for ContractAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(Felt252::from_str(s)?)
    }
}

impl fmt::Debug for ContractAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContractAddress({})", self.0.to_hex())
    }
}

impl fmt::Display for ContractAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}

impl serde::Serialize for ContractAddress {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> serde::Deserialize<'de> for ContractAddress {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let felt = Felt252::deserialize(deserializer)?;
        Self::new(felt).map_err(serde::de::Error::custom)
    }
}
