use starknet_client_primitives::AddressError;

#[derive(Debug, Clone, thiserror::Error)]
pub enum HashError {
    #[error("derived contract address is invalid: {0}")]
    InvalidAddress(#[from] AddressError),
}
