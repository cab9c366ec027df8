//! Calldata, output and event encoding against a resolved [`Abi`] (spec §4.3).

use std::collections::HashMap;

use num_bigint::{BigInt, BigUint};
use starknet_client_primitives::{ContractAddress, Felt252, Uint256};

use crate::error::AbiError;
use crate::schema::{Abi, AbiEvent, AbiFunction, EventMemberKind, EventShape};
use crate::types::{CairoType, CairoValue};

/// Arguments to `encodeCalldata`: either positional, in ABI declaration order, or named by input
/// identifier (spec §4.3: "object form fails `INVALID_ARGS` if any input name is missing").
#[derive(Debug, Clone)]
pub enum CallArgs {
    Positional(Vec<CairoValue>),
    Named(HashMap<String, CairoValue>),
}

/// The result of decoding a function's outputs: the asymmetric unwrap rule of spec §4.3.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedOutput {
    Null,
    Scalar(CairoValue),
    Many(Vec<CairoValue>),
}

/// A cursor over a felt slice, advanced as the codec decodes nested types (spec §4.3 "decoding
/// mirrors encoding with a read cursor").
pub struct FeltReader<'a> {
    felts: &'a [Felt252],
    pos: usize,
}

impl<'a> FeltReader<'a> {
    pub fn new(felts: &'a [Felt252]) -> Self {
        Self { felts, pos: 0 }
    }

    pub fn next(&mut self) -> Result<Felt252, AbiError> {
        let felt = self
            .felts
            .get(self.pos)
            .ok_or_else(|| AbiError::DecodeError("unexpected end of calldata".to_string()))?;
        self.pos += 1;
        Ok(*felt)
    }

    pub fn next_usize(&mut self) -> Result<usize, AbiError> {
        let felt = self.next()?;
        felt.to_u64()
            .map(|v| v as usize)
            .ok_or_else(|| AbiError::DecodeError(format!("length felt out of range: {}", felt.to_hex())))
    }
}

/// Encodes a function call's arguments into the felt sequence Starknet expects as `calldata`.
pub fn encode_calldata(abi: &Abi, fn_name: &str, args: CallArgs) -> Result<Vec<Felt252>, AbiError> {
    let func = abi.function(fn_name)?;
    let ordered = order_args(func, args)?;

    let mut out = Vec::new();
    for ((_, ty), value) in func.inputs.iter().zip(ordered.iter()) {
        encode_value(ty, value, abi, &mut out)?;
    }
    Ok(out)
}

fn order_args(func: &AbiFunction, args: CallArgs) -> Result<Vec<CairoValue>, AbiError> {
    match args {
        CallArgs::Positional(values) => {
            if values.len() != func.inputs.len() {
                return Err(AbiError::InvalidArgs(format!(
                    "{} expects {} args, got {}",
                    func.name,
                    func.inputs.len(),
                    values.len()
                )));
            }
            Ok(values)
        }
        CallArgs::Named(mut map) => {
            let mut ordered = Vec::with_capacity(func.inputs.len());
            for (name, _) in &func.inputs {
                let value = map
                    .remove(name)
                    .ok_or_else(|| AbiError::InvalidArgs(format!("missing argument: {name}")))?;
                ordered.push(value);
            }
            Ok(ordered)
        }
    }
}

/// Decodes a felt sequence into a function's input values, in declaration order. Used to decode
/// calldata back into values (e.g. when inspecting a pending `__execute__` call); always returns
/// an array regardless of arity, unlike output decoding (spec §4.3).
pub fn decode_calldata(abi: &Abi, fn_name: &str, felts: &[Felt252]) -> Result<Vec<CairoValue>, AbiError> {
    let func = abi.function(fn_name)?;
    let mut reader = FeltReader::new(felts);
    let mut out = Vec::with_capacity(func.inputs.len());
    for (_, ty) in &func.inputs {
        out.push(decode_value(ty, &mut reader, abi)?);
    }
    Ok(out)
}

/// Decodes a function's outputs, applying the output-boundary unwrap rule: 0 outputs → `Null`,
/// 1 output → `Scalar`, 2+ → `Many` (spec §4.3).
pub fn decode_outputs(abi: &Abi, fn_name: &str, felts: &[Felt252]) -> Result<DecodedOutput, AbiError> {
    let func = abi.function(fn_name)?;
    let mut reader = FeltReader::new(felts);
    let mut values = Vec::with_capacity(func.outputs.len());
    for ty in &func.outputs {
        values.push(decode_value(ty, &mut reader, abi)?);
    }
    match values.len() {
        0 => Ok(DecodedOutput::Null),
        1 => Ok(DecodedOutput::Scalar(values.into_iter().next().unwrap())),
        _ => Ok(DecodedOutput::Many(values)),
    }
}

fn range_check(value: &BigUint, bits: u16) -> Result<(), AbiError> {
    let max = (BigUint::from(1u8) << bits) - BigUint::from(1u8);
    if *value > max {
        return Err(AbiError::EncodeError(format!("value {value} exceeds u{bits} range")));
    }
    Ok(())
}

pub fn encode_value(
    ty: &CairoType,
    value: &CairoValue,
    abi: &Abi,
    out: &mut Vec<Felt252>,
) -> Result<(), AbiError> {
    match (ty, value) {
        (CairoType::Felt252, CairoValue::Felt(f)) => out.push(*f),
        (CairoType::ShortString, CairoValue::ShortString(s)) => {
            out.push(starknet_client_primitives::cairo::short_string(s).map_err(|e| AbiError::EncodeError(e.to_string()))?)
        }
        (CairoType::ContractAddress, CairoValue::ContractAddress(addr)) => out.push(addr.as_felt()),
        (CairoType::ContractAddress, CairoValue::Felt(f)) => out.push(*f),
        (CairoType::ClassHash, CairoValue::Felt(f)) | (CairoType::StorageKey, CairoValue::Felt(f)) => out.push(*f),
        (CairoType::EthAddress, CairoValue::Felt(f)) => out.push(*f),
        (CairoType::Bool, CairoValue::Bool(b)) => out.push(if *b { Felt252::ONE } else { Felt252::ZERO }),
        (CairoType::Uint(bits), CairoValue::Uint(v)) => {
            range_check(v, *bits)?;
            out.push(Felt252::from_biguint(v.clone()).map_err(|e| AbiError::EncodeError(e.to_string()))?);
        }
        (CairoType::Int(bits), CairoValue::Int(v)) => {
            let felt = signed_to_felt(v, *bits)?;
            out.push(felt);
        }
        (CairoType::U256, CairoValue::U256(v)) => out.extend(v.to_felts()),
        (CairoType::Array(elem_ty), CairoValue::Array(items)) | (CairoType::Span(elem_ty), CairoValue::Array(items)) => {
            out.push(Felt252::from_u64(items.len() as u64));
            for item in items {
                encode_value(elem_ty, item, abi, out)?;
            }
        }
        (CairoType::Tuple(elem_tys), CairoValue::Tuple(items)) => {
            if elem_tys.len() != items.len() {
                return Err(AbiError::EncodeError("tuple arity mismatch".to_string()));
            }
            for (ty, item) in elem_tys.iter().zip(items.iter()) {
                encode_value(ty, item, abi, out)?;
            }
        }
        (CairoType::Option(inner_ty), CairoValue::Option(inner)) => match inner {
            Some(v) => {
                out.push(Felt252::ZERO);
                encode_value(inner_ty, v, abi, out)?;
            }
            None => out.push(Felt252::ONE),
        },
        (CairoType::ByteArray, CairoValue::ByteArray(s)) => encode_byte_array(s, out),
        (CairoType::Struct(name), CairoValue::Struct(members)) => {
            let def = abi
                .structs
                .get(name)
                .ok_or_else(|| AbiError::EncodeError(format!("unresolved struct: {name}")))?;
            if def.members.len() != members.len() {
                return Err(AbiError::EncodeError(format!("struct {name} arity mismatch")));
            }
            for ((_, member_ty), value) in def.members.iter().zip(members.iter()) {
                encode_value(member_ty, value, abi, out)?;
            }
        }
        (CairoType::Enum(name), CairoValue::Enum(idx, payload)) => {
            let def = abi
                .enums
                .get(name)
                .ok_or_else(|| AbiError::EncodeError(format!("unresolved enum: {name}")))?;
            let (_, variant_ty) = def
                .variants
                .get(*idx)
                .ok_or_else(|| AbiError::InvalidArgs(format!("enum {name} has no variant {idx}")))?;
            out.push(Felt252::from_u64(*idx as u64));
            match (variant_ty, payload) {
                (Some(vt), Some(v)) => encode_value(vt, v, abi, out)?,
                (None, None) => {}
                _ => return Err(AbiError::InvalidArgs(format!("enum {name} variant {idx} payload mismatch"))),
            }
        }
        _ => return Err(AbiError::EncodeError(format!("type/value mismatch encoding {ty:?}"))),
    }
    Ok(())
}

pub fn decode_value(ty: &CairoType, reader: &mut FeltReader<'_>, abi: &Abi) -> Result<CairoValue, AbiError> {
    match ty {
        CairoType::Felt252 => Ok(CairoValue::Felt(reader.next()?)),
        CairoType::ShortString => {
            let felt = reader.next()?;
            let bytes = felt.to_bytes();
            let s = match bytes.iter().position(|b| *b != 0) {
                Some(start) => String::from_utf8_lossy(&bytes[start..]).into_owned(),
                None => String::new(),
            };
            Ok(CairoValue::ShortString(s))
        }
        CairoType::ContractAddress => Ok(CairoValue::ContractAddress(ContractAddress::from(reader.next()?))),
        CairoType::ClassHash | CairoType::StorageKey | CairoType::EthAddress => Ok(CairoValue::Felt(reader.next()?)),
        CairoType::Bool => {
            let felt = reader.next()?;
            Ok(CairoValue::Bool(!felt.is_zero()))
        }
        CairoType::Uint(_) => Ok(CairoValue::Uint(reader.next()?.to_biguint())),
        CairoType::Int(bits) => Ok(CairoValue::Int(felt_to_signed(reader.next()?, *bits))),
        CairoType::U256 => {
            let low = reader.next()?;
            let high = reader.next()?;
            let u256 = Uint256::from_felts(low, high).map_err(|e| AbiError::DecodeError(e.to_string()))?;
            Ok(CairoValue::U256(u256))
        }
        CairoType::Array(elem_ty) | CairoType::Span(elem_ty) => {
            let len = reader.next_usize()?;
            let mut items = Vec::with_capacity(len);
            for _ in 0..len {
                items.push(decode_value(elem_ty, reader, abi)?);
            }
            Ok(CairoValue::Array(items))
        }
        CairoType::Tuple(elem_tys) => {
            let mut items = Vec::with_capacity(elem_tys.len());
            for ty in elem_tys {
                items.push(decode_value(ty, reader, abi)?);
            }
            Ok(CairoValue::Tuple(items))
        }
        CairoType::Option(inner_ty) => {
            let tag = reader.next_usize()?;
            match tag {
                0 => Ok(CairoValue::Option(Some(Box::new(decode_value(inner_ty, reader, abi)?)))),
                1 => Ok(CairoValue::Option(None)),
                other => Err(AbiError::DecodeError(format!("invalid Option tag: {other}"))),
            }
        }
        CairoType::ByteArray => decode_byte_array(reader),
        CairoType::Struct(name) => {
            let def = abi
                .structs
                .get(name)
                .ok_or_else(|| AbiError::DecodeError(format!("unresolved struct: {name}")))?;
            let mut members = Vec::with_capacity(def.members.len());
            for (_, member_ty) in &def.members {
                members.push(decode_value(member_ty, reader, abi)?);
            }
            Ok(CairoValue::Struct(members))
        }
        CairoType::Enum(name) => {
            let def = abi
                .enums
                .get(name)
                .ok_or_else(|| AbiError::DecodeError(format!("unresolved enum: {name}")))?;
            let idx = reader.next_usize()?;
            let (_, variant_ty) = def
                .variants
                .get(idx)
                .ok_or_else(|| AbiError::DecodeError(format!("enum {name} has no variant {idx}")))?;
            let payload = match variant_ty {
                Some(vt) => Some(Box::new(decode_value(vt, reader, abi)?)),
                None => None,
            };
            Ok(CairoValue::Enum(idx, payload))
        }
    }
}

fn signed_to_felt(value: &BigInt, bits: u16) -> Result<Felt252, AbiError> {
    let half = BigInt::from(1u8) << (bits - 1);
    if *value < -half.clone() || *value >= half {
        return Err(AbiError::EncodeError(format!("value {value} exceeds i{bits} range")));
    }
    Felt252::from_bigint(value).map_err(|e| AbiError::EncodeError(e.to_string()))
}

fn felt_to_signed(felt: Felt252, bits: u16) -> BigInt {
    let value = felt.to_bigint();
    let half = BigInt::from(1u8) << (bits - 1);
    let modulus = BigInt::from(1u8) << bits;
    if value >= half {
        value - modulus
    } else {
        value
    }
}

fn encode_byte_array(s: &str, out: &mut Vec<Felt252>) {
    let bytes = s.as_bytes();
    let full_chunks = bytes.chunks_exact(31);
    let remainder = full_chunks.remainder();
    let chunks: Vec<&[u8]> = bytes.chunks_exact(31).collect();

    out.push(Felt252::from_u64(chunks.len() as u64));
    for chunk in &chunks {
        out.push(felt_from_be_bytes(chunk));
    }
    out.push(felt_from_be_bytes(remainder));
    out.push(Felt252::from_u64(remainder.len() as u64));
}

fn decode_byte_array(reader: &mut FeltReader<'_>) -> Result<CairoValue, AbiError> {
    let num_full_words = reader.next_usize()?;
    let mut bytes = Vec::new();
    for _ in 0..num_full_words {
        let felt = reader.next()?;
        bytes.extend_from_slice(&felt.to_bytes()[1..]);
    }
    let pending_word = reader.next()?;
    let pending_len = reader.next_usize()?;
    let pending_bytes = &pending_word.to_bytes()[32 - pending_len..];
    bytes.extend_from_slice(pending_bytes);

    String::from_utf8(bytes)
        .map(CairoValue::ByteArray)
        .map_err(|e| AbiError::DecodeError(format!("invalid utf-8 in ByteArray: {e}")))
}

fn felt_from_be_bytes(chunk: &[u8]) -> Felt252 {
    let mut buf = [0u8; 32];
    buf[32 - chunk.len()..].copy_from_slice(chunk);
    Felt252::from_bytes_be(&buf).expect("31-byte chunk always fits in a felt")
}

/// Decodes an emitted event against its ABI definition (spec §4.3 "Event decoding").
pub struct DecodedEvent {
    pub name: String,
    pub args: Vec<(String, CairoValue)>,
}

pub fn decode_event(abi: &Abi, keys: &[Felt252], data: &[Felt252]) -> Result<DecodedEvent, AbiError> {
    let selector = *keys.first().ok_or_else(|| AbiError::DecodeError("event has no selector key".to_string()))?;
    let event = abi.event_by_selector(selector)?;
    decode_event_shape(abi, event, &keys[1..], data)
}

fn decode_event_shape(
    abi: &Abi,
    event: &AbiEvent,
    key_felts: &[Felt252],
    data: &[Felt252],
) -> Result<DecodedEvent, AbiError> {
    match &event.shape {
        EventShape::Struct(members) => {
            let mut key_reader = FeltReader::new(key_felts);
            let mut data_reader = FeltReader::new(data);
            let mut args = Vec::with_capacity(members.len());
            for (name, ty, kind) in members {
                let value = match kind {
                    EventMemberKind::Key => decode_value(ty, &mut key_reader, abi)?,
                    EventMemberKind::Data => decode_value(ty, &mut data_reader, abi)?,
                };
                args.push((name.clone(), value));
            }
            Ok(DecodedEvent { name: event.name.clone(), args })
        }
        EventShape::Enum(routes) => {
            let variant_selector = *key_felts
                .first()
                .ok_or_else(|| AbiError::DecodeError(format!("enum event {} missing variant key", event.name)))?;
            let (variant_name, _) = routes
                .iter()
                .find(|(name, _)| starknet_client_primitives::cairo::compute_selector(name) == variant_selector)
                .ok_or_else(|| AbiError::EventNotFoundBySelector(variant_selector))?;
            let nested = abi.event(variant_name)?;
            decode_event_shape(abi, nested, &key_felts[1..], data)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::parse_abi;

    fn erc20_abi() -> Abi {
        let raw = serde_json::json!([
            {
                "type": "function",
                "name": "transfer",
                "inputs": [
                    {"name": "recipient", "type": "core::starknet::contract_address::ContractAddress"},
                    {"name": "amount", "type": "core::integer::u256"}
                ],
                "outputs": [{"type": "core::bool"}],
                "state_mutability": "external"
            },
            {
                "type": "event",
                "name": "Transfer",
                "kind": "struct",
                "members": [
                    {"name": "from", "type": "core::starknet::contract_address::ContractAddress", "kind": "key"},
                    {"name": "to", "type": "core::starknet::contract_address::ContractAddress", "kind": "key"},
                    {"name": "value", "type": "core::integer::u256", "kind": "data"}
                ]
            }
        ]);
        parse_abi(&raw).unwrap()
    }

    #[test]
    fn encodes_transfer_calldata() {
        let abi = erc20_abi();
        let recipient = ContractAddress::from(Felt252::from_u64(0xdead));
        let args = CallArgs::Positional(vec![
            CairoValue::ContractAddress(recipient),
            CairoValue::U256(Uint256::new(1000, 0)),
        ]);
        let encoded = encode_calldata(&abi, "transfer", args).unwrap();
        assert_eq!(encoded, vec![recipient.as_felt(), Felt252::from_u128(1000), Felt252::ZERO]);
    }

    #[test]
    fn named_args_require_every_input() {
        let abi = erc20_abi();
        let mut named = HashMap::new();
        named.insert("recipient".to_string(), CairoValue::Felt(Felt252::ONE));
        let err = encode_calldata(&abi, "transfer", CallArgs::Named(named)).unwrap_err();
        assert!(matches!(err, AbiError::InvalidArgs(_)));
    }

    #[test]
    fn decodes_bool_output_as_scalar() {
        let abi = erc20_abi();
        let decoded = decode_outputs(&abi, "transfer", &[Felt252::ONE]).unwrap();
        assert_eq!(decoded, DecodedOutput::Scalar(CairoValue::Bool(true)));
    }

    #[test]
    fn byte_array_round_trips() {
        let mut out = Vec::new();
        let s = "a short cairo byte array, just under two chunks long!!";
        encode_byte_array(s, &mut out);
        let mut reader = FeltReader::new(&out);
        let decoded = decode_byte_array(&mut reader).unwrap();
        assert_eq!(decoded, CairoValue::ByteArray(s.to_string()));
    }

    #[test]
    fn decodes_transfer_event() {
        let abi = erc20_abi();
        let from = ContractAddress::from(Felt252::from_u64(1));
        let to = ContractAddress::from(Felt252::from_u64(2));
        let keys = vec![abi.event("Transfer").unwrap().selector, from.as_felt(), to.as_felt()];
        let data = Uint256::new(500, 0).to_felts().to_vec();
        let decoded = decode_event(&abi, &keys, &data).unwrap();
        assert_eq!(decoded.name, "Transfer");
        assert_eq!(decoded.args[2].1, CairoValue::U256(Uint256::new(500, 0)));
    }
}
