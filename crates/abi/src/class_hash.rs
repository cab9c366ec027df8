//! Sierra and compiled (CASM) class-hash derivation (spec §4.3 "Class-hash derivation"),
//! structured after the Poseidon hashing style of katana's own Sierra class hashing
//! (`compute_sierra_class_hash` / `entrypoints_hash`), computed directly from `starknet-crypto`
//! rather than through a CASM-conversion crate since only hashing, not conversion, is needed here.

use starknet_client_primitives::cairo::short_string;
use starknet_client_primitives::Felt252;
use starknet_crypto::PoseidonHasher;

use crate::error::AbiError;

/// One entry point: `(selector, function_idx)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryPoint {
    pub selector: Felt252,
    pub function_idx: u64,
}

#[derive(Debug, Clone, Default)]
pub struct EntryPointsByType {
    pub external: Vec<EntryPoint>,
    pub l1_handler: Vec<EntryPoint>,
    pub constructor: Vec<EntryPoint>,
}

fn poseidon_many(felts: &[Felt252]) -> Felt252 {
    let raw: Vec<_> = felts.iter().map(Felt252::raw).collect();
    Felt252::from(starknet_crypto::poseidon_hash_many(&raw))
}

fn entrypoints_hash(entrypoints: &[EntryPoint]) -> Felt252 {
    let mut hasher = PoseidonHasher::new();
    for entry in entrypoints {
        hasher.update(entry.selector.raw());
        hasher.update(Felt252::from_u64(entry.function_idx).raw());
    }
    Felt252::from(hasher.finalize())
}

/// `poseidon_many([H("CONTRACT_CLASS_V0.1.0"), H_ep(EXTERNAL), H_ep(L1_HANDLER),
/// H_ep(CONSTRUCTOR), poseidon_many(abi-bytes-as-felts), poseidon_many(sierra_program)])`.
pub fn compute_sierra_class_hash(
    abi: &str,
    entry_points: &EntryPointsByType,
    sierra_program: &[Felt252],
) -> Result<Felt252, AbiError> {
    let abi_hash = poseidon_many(&abi_bytes_as_felts(abi));
    let program_hash = poseidon_many(sierra_program);

    let header =
        short_string("CONTRACT_CLASS_V0.1.0").map_err(|e| AbiError::EncodeError(e.to_string()))?;

    Ok(poseidon_many(&[
        header,
        entrypoints_hash(&entry_points.external),
        entrypoints_hash(&entry_points.l1_handler),
        entrypoints_hash(&entry_points.constructor),
        abi_hash,
        program_hash,
    ]))
}

/// Chunks the ABI's UTF-8 bytes into 31-byte big-endian felts, matching the `ByteArray`-style
/// packing the rest of the codec uses for arbitrary byte strings.
fn abi_bytes_as_felts(abi: &str) -> Vec<Felt252> {
    abi.as_bytes()
        .chunks(31)
        .map(|chunk| {
            let mut buf = [0u8; 32];
            buf[32 - chunk.len()..].copy_from_slice(chunk);
            Felt252::from_bytes_be(&buf).expect("31-byte chunk always fits in a felt")
        })
        .collect()
}

/// CASM bytecode, optionally partitioned into hashing segments.
pub struct CasmBytecode<'a> {
    pub bytecode: &'a [Felt252],
    pub segment_lengths: Option<&'a [usize]>,
}

/// Compiled-class (CASM) hash: segment tree hash when `bytecode_segment_lengths` is present,
/// else a flat `poseidon_many(bytecode)` (spec §4.3).
pub fn compute_compiled_class_hash(casm: &CasmBytecode<'_>) -> Result<Felt252, AbiError> {
    let header =
        short_string("COMPILED_CLASS_V1").map_err(|e| AbiError::EncodeError(e.to_string()))?;

    let bytecode_hash = match casm.segment_lengths {
        Some(lengths) => hash_segments(casm.bytecode, lengths)?,
        None => poseidon_many(casm.bytecode),
    };

    Ok(poseidon_many(&[header, bytecode_hash]))
}

/// Builds the segment hash tree bottom-up: leaves are `poseidon_many` of each segment's felts,
/// internal nodes are `poseidon(length, left, right)` pairing segments two at a time.
fn hash_segments(bytecode: &[Felt252], lengths: &[usize]) -> Result<Felt252, AbiError> {
    if lengths.iter().sum::<usize>() != bytecode.len() {
        return Err(AbiError::DecodeError(
            "bytecode_segment_lengths does not cover the full bytecode".to_string(),
        ));
    }

    let mut offset = 0;
    let mut nodes: Vec<(usize, Felt252)> = Vec::with_capacity(lengths.len());
    for &len in lengths {
        let segment = &bytecode[offset..offset + len];
        nodes.push((len, poseidon_many(segment)));
        offset += len;
    }

    while nodes.len() > 1 {
        let mut next = Vec::with_capacity(nodes.len().div_ceil(2));
        let mut iter = nodes.into_iter();
        while let Some((left_len, left)) = iter.next() {
            match iter.next() {
                Some((right_len, right)) => {
                    let combined_len = left_len + right_len;
                    let node = poseidon_many(&[Felt252::from_u64(combined_len as u64), left, right]);
                    next.push((combined_len, node));
                }
                None => next.push((left_len, left)),
            }
        }
        nodes = next;
    }

    Ok(nodes.into_iter().next().map(|(_, h)| h).unwrap_or(Felt252::ZERO))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_short_strings_match_spec_constants() {
        assert_eq!(
            short_string("CONTRACT_CLASS_V0.1.0").unwrap().to_hex(),
            "0x434f4e54524143545f434c4153535f56302e312e30"
        );
        assert_eq!(
            short_string("COMPILED_CLASS_V1").unwrap().to_hex(),
            "0x434f4d50494c45445f434c4153535f5631"
        );
    }

    #[test]
    fn sierra_class_hash_is_deterministic() {
        let entry_points = EntryPointsByType {
            external: vec![EntryPoint { selector: Felt252::from_u64(1), function_idx: 0 }],
            l1_handler: vec![],
            constructor: vec![],
        };
        let program = vec![Felt252::from_u64(1), Felt252::from_u64(2)];
        let a = compute_sierra_class_hash("[]", &entry_points, &program).unwrap();
        let b = compute_sierra_class_hash("[]", &entry_points, &program).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn flat_and_segmented_bytecode_hash_match_when_single_segment() {
        let bytecode = vec![Felt252::from_u64(1), Felt252::from_u64(2), Felt252::from_u64(3)];
        let flat = compute_compiled_class_hash(&CasmBytecode { bytecode: &bytecode, segment_lengths: None }).unwrap();
        let segmented = compute_compiled_class_hash(&CasmBytecode {
            bytecode: &bytecode,
            segment_lengths: Some(&[3]),
        })
        .unwrap();
        assert_eq!(flat, segmented);
    }

    #[test]
    fn rejects_mismatched_segment_lengths() {
        let bytecode = vec![Felt252::from_u64(1)];
        let result = compute_compiled_class_hash(&CasmBytecode {
            bytecode: &bytecode,
            segment_lengths: Some(&[2]),
        });
        assert!(result.is_err());
    }
}
