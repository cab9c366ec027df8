//! The Cairo type graph (spec §3 "Cairo type graph") and the dynamically-typed value tree the
//! codec encodes/decodes against it.
//!
//! Rust's static type system can express individual contract calls through generated, fully
//! typed bindings, but the general-purpose codec this crate centers on operates against ABIs
//! only known at runtime, so [`CairoType`] and [`CairoValue`] stand in for the dynamic type/value
//! pair a host-language-agnostic codec needs.

use num_bigint::{BigInt, BigUint};
use starknet_client_primitives::{ContractAddress, Felt252, Uint256};

/// A node in the Cairo type graph (spec §3). Struct/enum references are resolved lazily against
/// an [`crate::schema::Abi`]'s `structs`/`enums` maps at encode/decode time, not at parse time
/// (spec §4.2: "fail at the encode/decode site, not at parse").
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CairoType {
    Felt252,
    Bool,
    Uint(u16),
    Int(u16),
    U256,
    ByteArray,
    ContractAddress,
    ClassHash,
    StorageKey,
    EthAddress,
    ShortString,
    Array(Box<CairoType>),
    Span(Box<CairoType>),
    Tuple(Vec<CairoType>),
    Option(Box<CairoType>),
    /// A named struct, resolved against `Abi::structs` by this qualified path.
    Struct(String),
    /// A named enum, resolved against `Abi::enums` by this qualified path.
    Enum(String),
}

impl CairoType {
    /// Parses a Cairo type string as it appears in an ABI `type` field, e.g.
    /// `"core::array::Array::<core::felt252>"`, `"(core::felt252, core::integer::u256)"`.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();

        if let Some(inner) = strip_generic(raw, "core::array::Array::<") {
            return CairoType::Array(Box::new(CairoType::parse(inner)));
        }
        if let Some(inner) = strip_generic(raw, "core::array::Span::<") {
            return CairoType::Span(Box::new(CairoType::parse(inner)));
        }
        if let Some(inner) = strip_generic(raw, "core::option::Option::<") {
            return CairoType::Option(Box::new(CairoType::parse(inner)));
        }
        if raw.starts_with('(') && raw.ends_with(')') {
            let inner = &raw[1..raw.len() - 1];
            if inner.trim().is_empty() {
                return CairoType::Tuple(Vec::new());
            }
            return CairoType::Tuple(split_top_level(inner).iter().map(|s| CairoType::parse(s)).collect());
        }

        match raw {
            "core::felt252" | "felt252" => CairoType::Felt252,
            "core::bool" => CairoType::Bool,
            "core::integer::u8" => CairoType::Uint(8),
            "core::integer::u16" => CairoType::Uint(16),
            "core::integer::u32" => CairoType::Uint(32),
            "core::integer::u64" => CairoType::Uint(64),
            "core::integer::u128" => CairoType::Uint(128),
            "core::integer::i8" => CairoType::Int(8),
            "core::integer::i16" => CairoType::Int(16),
            "core::integer::i32" => CairoType::Int(32),
            "core::integer::i64" => CairoType::Int(64),
            "core::integer::i128" => CairoType::Int(128),
            "core::integer::u256" | "core::integer::u256::u256" => CairoType::U256,
            "core::byte_array::ByteArray" => CairoType::ByteArray,
            "core::starknet::contract_address::ContractAddress" => CairoType::ContractAddress,
            "core::starknet::class_hash::ClassHash" => CairoType::ClassHash,
            "core::starknet::storage_access::StorageAddress" => CairoType::StorageKey,
            "core::starknet::eth_address::EthAddress" => CairoType::EthAddress,
            "core::shortstring" | "felt252_short_string" => CairoType::ShortString,
            other => CairoType::Struct(other.to_string()),
        }
    }
}

fn strip_generic<'a>(raw: &'a str, prefix: &str) -> Option<&'a str> {
    raw.strip_prefix(prefix).and_then(|rest| rest.strip_suffix('>'))
}

/// Splits `a, (b, c), d` into `["a", "(b, c)", "d"]`, respecting nested parens/angle brackets.
fn split_top_level(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '(' | '<' => depth += 1,
            ')' | '>' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(s[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    let last = s[start..].trim();
    if !last.is_empty() {
        parts.push(last);
    }
    parts
}

/// A dynamically-typed Cairo value, encoded/decoded against a [`CairoType`].
#[derive(Debug, Clone, PartialEq)]
pub enum CairoValue {
    Felt(Felt252),
    Bool(bool),
    Uint(BigUint),
    Int(BigInt),
    U256(Uint256),
    ByteArray(String),
    ContractAddress(ContractAddress),
    ShortString(String),
    Array(Vec<CairoValue>),
    Tuple(Vec<CairoValue>),
    /// Struct member values, in declaration order.
    Struct(Vec<CairoValue>),
    /// `(variant_index, payload)`; unit variants carry no payload.
    Enum(usize, Option<Box<CairoValue>>),
    Option(std::option::Option<Box<CairoValue>>),
}

impl From<Felt252> for CairoValue {
    fn from(value: Felt252) -> Self {
        CairoValue::Felt(value)
    }
}

impl From<u64> for CairoValue {
    fn from(value: u64) -> Self {
        CairoValue::Uint(BigUint::from(value))
    }
}

impl From<u128> for CairoValue {
    fn from(value: u128) -> Self {
        CairoValue::Uint(BigUint::from(value))
    }
}

impl From<bool> for CairoValue {
    fn from(value: bool) -> Self {
        CairoValue::Bool(value)
    }
}

impl From<ContractAddress> for CairoValue {
    fn from(value: ContractAddress) -> Self {
        CairoValue::ContractAddress(value)
    }
}

impl From<Uint256> for CairoValue {
    fn from(value: Uint256) -> Self {
        CairoValue::U256(value)
    }
}
