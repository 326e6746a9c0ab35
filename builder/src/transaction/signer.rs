//! The signer capability.
//!
//! Signing is kept behind [`AddressSigner`] because the key may not live
//! in this process (hardware wallet, remote signer, HSM). The builder
//! only ever asks one question: "sign this message for this address".

use std::collections::HashMap;

use thiserror::Error;

use super::types::{Ed25519Signature, Signature};
use crate::address::{Address, AddressKind, Ed25519Address};
use crate::crypto::keys::NovaKeypair;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignerError {
    /// The signer holds no key for this address.
    #[error("no key available for address {0}")]
    UnknownAddress(String),

    /// The signer cannot produce signatures for this kind of address.
    #[error("cannot sign for {0} addresses")]
    UnsupportedAddressKind(AddressKind),

    /// The signing backend itself failed.
    #[error("signing backend failure: {0}")]
    Backend(String),
}

/// Produces a signature over `message` on behalf of `address`.
pub trait AddressSigner {
    fn sign(&self, address: &Address, message: &[u8]) -> Result<Signature, SignerError>;
}

impl<T: AddressSigner + ?Sized> AddressSigner for &T {
    fn sign(&self, address: &Address, message: &[u8]) -> Result<Signature, SignerError> {
        (**self).sign(address, message)
    }
}

// ---------------------------------------------------------------------------
// InMemoryAddressSigner
// ---------------------------------------------------------------------------

/// Holds Ed25519 keypairs in memory, keyed by the identity of the address
/// each one controls.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAddressSigner {
    keys: HashMap<String, NovaKeypair>,
}

impl InMemoryAddressSigner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_keypairs(keypairs: impl IntoIterator<Item = NovaKeypair>) -> Self {
        let mut signer = Self::new();
        for kp in keypairs {
            signer.insert(kp);
        }
        signer
    }

    /// Adds a keypair and returns the address it controls.
    pub fn insert(&mut self, keypair: NovaKeypair) -> Address {
        let address = Address::Ed25519(Ed25519Address::from_public_key(&keypair.public_key()));
        self.keys.insert(address.identity(), keypair);
        address
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl AddressSigner for InMemoryAddressSigner {
    fn sign(&self, address: &Address, message: &[u8]) -> Result<Signature, SignerError> {
        if address.kind() != AddressKind::Ed25519 {
            return Err(SignerError::UnsupportedAddressKind(address.kind()));
        }
        let keypair = self
            .keys
            .get(&address.identity())
            .ok_or_else(|| SignerError::UnknownAddress(address.to_string()))?;

        Ok(Signature::Ed25519(Ed25519Signature {
            public_key: keypair.public_key(),
            signature: keypair.sign(message),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::AliasAddress;

    #[test]
    fn signs_for_known_address() {
        let mut signer = InMemoryAddressSigner::new();
        let addr = signer.insert(NovaKeypair::from_seed(&[1; 32]));
        let sig = signer.sign(&addr, b"message").unwrap();
        assert!(sig.verify(b"message"));
        assert!(!sig.verify(b"other"));
        assert_eq!(
            Address::Ed25519(Ed25519Address::from_public_key(sig.public_key())),
            addr
        );
    }

    #[test]
    fn unknown_address_fails() {
        let signer = InMemoryAddressSigner::from_keypairs([NovaKeypair::from_seed(&[1; 32])]);
        let stranger = Address::Ed25519(Ed25519Address::new([0xEE; 32]));
        assert!(matches!(
            signer.sign(&stranger, b"m"),
            Err(SignerError::UnknownAddress(_))
        ));
    }

    #[test]
    fn alias_addresses_cannot_sign() {
        let signer = InMemoryAddressSigner::new();
        let alias = Address::Alias(AliasAddress::new([1; 32]));
        assert_eq!(
            signer.sign(&alias, b"m"),
            Err(SignerError::UnsupportedAddressKind(AddressKind::Alias))
        );
    }

    #[test]
    fn inserting_same_key_twice_keeps_one_entry() {
        let mut signer = InMemoryAddressSigner::new();
        signer.insert(NovaKeypair::from_seed(&[4; 32]));
        signer.insert(NovaKeypair::from_seed(&[4; 32]));
        assert_eq!(signer.len(), 1);
    }
}
