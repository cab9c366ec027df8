//! Transaction-hash signing (spec §4.7, §7). STARK-curve ECDSA itself is treated as an opaque
//! dependency here — this module only adapts `starknet-crypto`'s functions to this crate's felt
//! type, the way `crates/hash` adapts `starknet-crypto`'s Poseidon/Pedersen hashers.

use starknet_client_primitives::Felt252;

use crate::error::SignerError;

/// Anything able to produce a STARK-curve signature over a transaction or message hash, and to
/// report the public key the resulting signature verifies against.
///
/// [`crate::Account`] is generic over this so a hardware wallet or remote signing service can
/// stand in for [`LocalSigner`] without changing how transactions are built or submitted.
pub trait Signer: Send + Sync {
    fn public_key(&self) -> Felt252;

    fn sign(&self, hash: Felt252) -> Result<(Felt252, Felt252), SignerError>;
}

/// Signs with a private key held in process memory.
pub struct LocalSigner {
    private_key: Felt252,
}

impl LocalSigner {
    pub fn new(private_key: Felt252) -> Self {
        Self { private_key }
    }

    pub fn from_hex(private_key_hex: &str) -> Result<Self, starknet_client_primitives::FeltError> {
        Ok(Self::new(Felt252::from_hex(private_key_hex)?))
    }
}

impl Signer for LocalSigner {
    fn public_key(&self) -> Felt252 {
        Felt252::from(starknet_crypto::get_public_key(&self.private_key.raw()))
    }

    fn sign(&self, hash: Felt252) -> Result<(Felt252, Felt252), SignerError> {
        let secret = self.private_key.raw();
        let message = hash.raw();
        let k = starknet_crypto::rfc6979_generate_k(&message, &secret, None);
        let signature = starknet_crypto::sign(&secret, &message, &k)
            .map_err(|e| SignerError::SigningFailed(e.to_string()))?;
        Ok((Felt252::from(signature.r), Felt252::from(signature.s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signing_the_same_hash_twice_is_deterministic() {
        let signer = LocalSigner::new(Felt252::from_u64(12345));
        let hash = Felt252::from_u64(999);
        assert_eq!(signer.sign(hash).unwrap(), signer.sign(hash).unwrap());
    }

    #[test]
    fn signature_changes_with_the_hash() {
        let signer = LocalSigner::new(Felt252::from_u64(12345));
        let a = signer.sign(Felt252::from_u64(1)).unwrap();
        let b = signer.sign(Felt252::from_u64(2)).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn public_key_is_stable_for_a_given_private_key() {
        let signer = LocalSigner::new(Felt252::from_u64(42));
        assert_eq!(signer.public_key(), signer.public_key());
    }
}
