//! Per-call execution overrides (spec §4.7: "fetch nonce on cache-miss, merge resource bounds
//! with defaults"). Every field left `None` gets a zero-cost default filled in at build time.

use starknet_client_primitives::fee::{DataAvailabilityMode, ResourceBoundsSet};
use starknet_client_primitives::Felt252;

/// Overrides for a single `execute`/`declare`/`deployAccount`/`estimateInvokeFee` call. Leaving
/// everything `None` submits with a freshly fetched nonce, zeroed resource bounds (fine for fee
/// estimation, not for a real submission against a node that enforces them), no tip, and L1 data
/// availability — callers that need resource bounds for a real submission should set them from a
/// prior fee estimate.
#[derive(Debug, Clone, Default)]
pub struct ExecutionDetails {
    pub nonce: Option<Felt252>,
    pub resource_bounds: Option<ResourceBoundsSet>,
    pub tip: Option<u64>,
    pub paymaster_data: Option<Vec<Felt252>>,
    pub account_deployment_data: Option<Vec<Felt252>>,
    pub nonce_data_availability_mode: Option<DataAvailabilityMode>,
    pub fee_data_availability_mode: Option<DataAvailabilityMode>,
}

/// The same fields as [`ExecutionDetails`], fully resolved — what actually gets hashed and sent.
#[derive(Debug, Clone)]
pub struct ResolvedDetails {
    pub resource_bounds: ResourceBoundsSet,
    pub tip: u64,
    pub paymaster_data: Vec<Felt252>,
    pub account_deployment_data: Vec<Felt252>,
    pub nonce_data_availability_mode: DataAvailabilityMode,
    pub fee_data_availability_mode: DataAvailabilityMode,
}

impl ExecutionDetails {
    pub fn resolve(&self) -> ResolvedDetails {
        ResolvedDetails {
            resource_bounds: self.resource_bounds.unwrap_or(ResourceBoundsSet::ZERO),
            tip: self.tip.unwrap_or(0),
            paymaster_data: self.paymaster_data.clone().unwrap_or_default(),
            account_deployment_data: self.account_deployment_data.clone().unwrap_or_default(),
            nonce_data_availability_mode: self
                .nonce_data_availability_mode
                .unwrap_or(DataAvailabilityMode::L1),
            fee_data_availability_mode: self
                .fee_data_availability_mode
                .unwrap_or(DataAvailabilityMode::L1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_details_resolve_to_zeroed_defaults() {
        let resolved = ExecutionDetails::default().resolve();
        assert_eq!(resolved.resource_bounds, ResourceBoundsSet::ZERO);
        assert_eq!(resolved.tip, 0);
        assert!(resolved.paymaster_data.is_empty());
        assert_eq!(resolved.nonce_data_availability_mode, DataAvailabilityMode::L1);
    }

    #[test]
    fn explicit_overrides_are_kept() {
        let details = ExecutionDetails { tip: Some(7), ..Default::default() };
        assert_eq!(details.resolve().tip, 7);
    }
}
