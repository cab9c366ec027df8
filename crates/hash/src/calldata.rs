//! `__execute__` calldata layout (spec §4.6): encodes a list of calls into the flat calldata an
//! account contract's `__execute__` entrypoint expects.

use starknet_client_primitives::cairo::compute_selector;
use starknet_client_primitives::{ContractAddress, Felt252};

/// The selector `__execute__` must resolve to; every account execution targets this entrypoint.
pub const EXECUTE_SELECTOR_HEX: &str =
    "0x015d40a3d6ca2ac30f4031e42be28da9b056fef9bb7357ac5e85627ee876e5ad";

/// One call within a multicall: the target contract, the entrypoint name (hashed to a selector
/// at encode time), and its positional calldata.
#[derive(Debug, Clone)]
pub struct Call {
    pub to: ContractAddress,
    pub entrypoint: String,
    pub calldata: Vec<Felt252>,
}

/// `[n, to1, selector(e1), off1, len1, ..., sum(lens), ...flattened calldata]`, offsets
/// cumulative over the flattened calldata (spec §4.6 "`__execute__` calldata layout").
pub fn encode_execute_calldata(calls: &[Call]) -> Vec<Felt252> {
    let mut header = Vec::with_capacity(1 + calls.len() * 4);
    header.push(Felt252::from_u64(calls.len() as u64));

    let mut offset = 0u64;
    for call in calls {
        let selector = compute_selector(&call.entrypoint);
        header.push(call.to.as_felt());
        header.push(selector);
        header.push(Felt252::from_u64(offset));
        header.push(Felt252::from_u64(call.calldata.len() as u64));
        offset += call.calldata.len() as u64;
    }
    header.push(Felt252::from_u64(offset));

    for call in calls {
        header.extend(call.calldata.iter().copied());
    }
    header
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn execute_selector_constant_matches_golden_vector() {
        assert_eq!(compute_selector("__execute__").to_hex(), {
            let expected = Felt252::from_hex(EXECUTE_SELECTOR_HEX).unwrap();
            expected.to_hex()
        });
    }

    #[test]
    fn single_call_layout() {
        let call = Call {
            to: ContractAddress::new(Felt252::from_u64(0xabc)).unwrap(),
            entrypoint: "transfer".to_string(),
            calldata: vec![Felt252::from_u64(1), Felt252::from_u64(2)],
        };
        let encoded = encode_execute_calldata(std::slice::from_ref(&call));

        assert_eq!(encoded[0], Felt252::from_u64(1));
        assert_eq!(encoded[1], call.to.as_felt());
        assert_eq!(encoded[2], compute_selector("transfer"));
        assert_eq!(encoded[3], Felt252::ZERO);
        assert_eq!(encoded[4], Felt252::from_u64(2));
        assert_eq!(encoded[5], Felt252::from_u64(2));
        assert_eq!(encoded[6], Felt252::from_u64(1));
        assert_eq!(encoded[7], Felt252::from_u64(2));
    }

    #[test]
    fn multi_call_offsets_are_cumulative() {
        let calls = vec![
            Call {
                to: ContractAddress::new(Felt252::from_u64(1)).unwrap(),
                entrypoint: "a".to_string(),
                calldata: vec![Felt252::from_u64(10)],
            },
            Call {
                to: ContractAddress::new(Felt252::from_u64(2)).unwrap(),
                entrypoint: "b".to_string(),
                calldata: vec![Felt252::from_u64(20), Felt252::from_u64(21)],
            },
        ];
        let encoded = encode_execute_calldata(&calls);

        // header: n, (to1, sel1, off1, len1), (to2, sel2, off2, len2), total_len
        assert_eq!(encoded[0], Felt252::from_u64(2));
        assert_eq!(encoded[3], Felt252::ZERO); // off1
        assert_eq!(encoded[4], Felt252::from_u64(1)); // len1
        assert_eq!(encoded[7], Felt252::from_u64(1)); // off2
        assert_eq!(encoded[8], Felt252::from_u64(2)); // len2
        assert_eq!(encoded[9], Felt252::from_u64(3)); // total_len
        assert_eq!(encoded[10], Felt252::from_u64(10));
        assert_eq!(encoded[11], Felt252::from_u64(20));
        assert_eq!(encoded[12], Felt252::from_u64(21));
    }
}
