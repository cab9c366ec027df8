//! `starknet_call` wire types.

use serde::{Deserialize, Serialize};
use starknet_client_primitives::{ContractAddress, Felt252};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub contract_address: ContractAddress,
    pub entry_point_selector: Felt252,
    pub calldata: Vec<Felt252>,
}

/// `starknet_call`'s result: the raw felt array the entrypoint returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallResponse {
    pub result: Vec<Felt252>,
}
