//! # Key Management
//!
//! Ed25519 keypairs, public keys and signatures as they appear inside
//! signature unlock blocks.
//!
//! Private keys are zeroized on drop by ed25519-dalek and are never
//! printed by `Debug`. Key generation uses `OsRng`.

use ed25519_dalek::{
    Signature as DalekSignature, Signer, SigningKey, Verifier, VerifyingKey, SECRET_KEY_LENGTH,
};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use thiserror::Error;

/// Length of an Ed25519 public key on the wire.
pub const PUBLIC_KEY_LENGTH: usize = 32;

/// Length of an Ed25519 signature on the wire.
pub const SIGNATURE_LENGTH: usize = 64;

/// Errors that can occur during key operations.
///
/// Intentionally vague about *why* something failed; leaking details about
/// key material through error messages is a classic footgun.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("invalid secret key bytes: wrong length or not valid hex")]
    InvalidSecretKey,

    #[error("invalid public key bytes: not a valid Ed25519 point")]
    InvalidPublicKey,

    #[error("invalid signature bytes: expected {SIGNATURE_LENGTH} bytes")]
    InvalidSignature,
}

/// An Ed25519 keypair controlling one `Ed25519` address.
///
/// Does not implement `Serialize`. Exporting secret material should be a
/// deliberate act: use [`NovaKeypair::secret_key_bytes`].
///
/// # Examples
///
/// ```
/// use nova_tx_builder::crypto::keys::NovaKeypair;
///
/// let kp = NovaKeypair::generate();
/// let sig = kp.sign(b"essence digest");
/// assert!(kp.public_key().verify(b"essence digest", &sig));
/// ```
pub struct NovaKeypair {
    signing_key: SigningKey,
}

/// The public half of a keypair. Carried inside every signature unlock
/// block so validators can check the signature without a key lookup.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NovaPublicKey {
    bytes: [u8; PUBLIC_KEY_LENGTH],
}

/// A 64-byte Ed25519 signature.
///
/// Stored as `Vec<u8>` for serde compatibility, but always exactly 64 bytes
/// when produced by [`NovaKeypair::sign`] or [`NovaSignature::from_bytes`].
/// A signature of any other length simply fails verification.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NovaSignature {
    bytes: Vec<u8>,
}

impl NovaKeypair {
    /// Generate a fresh keypair using the OS cryptographic RNG.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Constructs a keypair deterministically from a 32-byte seed.
    ///
    /// **Warning**: a weak seed gives a weak key.
    pub fn from_seed(seed: &[u8; SECRET_KEY_LENGTH]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Reconstruct a keypair from a hex-encoded 32-byte seed.
    pub fn from_hex(hex_str: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(hex_str.trim()).map_err(|_| KeyError::InvalidSecretKey)?;
        let seed: [u8; SECRET_KEY_LENGTH] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| KeyError::InvalidSecretKey)?;
        Ok(Self::from_seed(&seed))
    }

    /// Returns the public key associated with this keypair.
    pub fn public_key(&self) -> NovaPublicKey {
        NovaPublicKey {
            bytes: self.signing_key.verifying_key().to_bytes(),
        }
    }

    /// Sign a message. Deterministic for a given (key, message) pair.
    pub fn sign(&self, message: &[u8]) -> NovaSignature {
        let sig = self.signing_key.sign(message);
        NovaSignature {
            bytes: sig.to_bytes().to_vec(),
        }
    }

    /// Exports the raw 32-byte seed. Handle with extreme care.
    pub fn secret_key_bytes(&self) -> [u8; SECRET_KEY_LENGTH] {
        self.signing_key.to_bytes()
    }
}

impl Clone for NovaKeypair {
    fn clone(&self) -> Self {
        Self::from_seed(&self.signing_key.to_bytes())
    }
}

impl fmt::Debug for NovaKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print secret key material, not even partially.
        write!(f, "NovaKeypair(pub={})", self.public_key().to_hex())
    }
}

impl PartialEq for NovaKeypair {
    fn eq(&self, other: &Self) -> bool {
        self.public_key() == other.public_key()
    }
}

impl Eq for NovaKeypair {}

// ---------------------------------------------------------------------------
// NovaPublicKey
// ---------------------------------------------------------------------------

impl NovaPublicKey {
    /// Create a `NovaPublicKey` from raw bytes without point validation.
    pub fn from_bytes(bytes: [u8; PUBLIC_KEY_LENGTH]) -> Self {
        Self { bytes }
    }

    /// Try to create a `NovaPublicKey` from a byte slice, validating both
    /// the length and that the bytes decode to an Ed25519 point.
    pub fn try_from_slice(slice: &[u8]) -> Result<Self, KeyError> {
        let bytes: [u8; PUBLIC_KEY_LENGTH] =
            slice.try_into().map_err(|_| KeyError::InvalidPublicKey)?;
        VerifyingKey::from_bytes(&bytes).map_err(|_| KeyError::InvalidPublicKey)?;
        Ok(Self { bytes })
    }

    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        &self.bytes
    }

    /// Verify a signature against this public key.
    pub fn verify(&self, message: &[u8], signature: &NovaSignature) -> bool {
        let Ok(verifying_key) = VerifyingKey::from_bytes(&self.bytes) else {
            return false;
        };
        let Some(dalek_sig) = signature.to_dalek_signature() else {
            return false;
        };
        verifying_key.verify(message, &dalek_sig).is_ok()
    }

    /// Hex-encoded representation. 64 characters for 32 bytes.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }
}

impl Hash for NovaPublicKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bytes.hash(state);
    }
}

impl fmt::Display for NovaPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for NovaPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NovaPublicKey({})", &self.to_hex()[..16])
    }
}

// ---------------------------------------------------------------------------
// NovaSignature
// ---------------------------------------------------------------------------

impl NovaSignature {
    /// Create a signature from its raw 64-byte representation.
    pub fn from_bytes(bytes: [u8; SIGNATURE_LENGTH]) -> Self {
        Self {
            bytes: bytes.to_vec(),
        }
    }

    /// Create a signature from a slice, rejecting anything but 64 bytes.
    pub fn try_from_slice(slice: &[u8]) -> Result<Self, KeyError> {
        if slice.len() != SIGNATURE_LENGTH {
            return Err(KeyError::InvalidSignature);
        }
        Ok(Self {
            bytes: slice.to_vec(),
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns `None` if the stored bytes are not exactly 64 bytes long.
    pub fn to_dalek_signature(&self) -> Option<DalekSignature> {
        let arr: [u8; SIGNATURE_LENGTH] = self.bytes.as_slice().try_into().ok()?;
        Some(DalekSignature::from_bytes(&arr))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }
}

impl fmt::Display for NovaSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for NovaSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex_str = self.to_hex();
        if hex_str.len() >= 128 {
            write!(f, "NovaSignature({}...{})", &hex_str[..8], &hex_str[120..])
        } else {
            write!(f, "NovaSignature({})", hex_str)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keypair_sign_verify_roundtrip() {
        let kp = NovaKeypair::generate();
        let msg = b"essence digest";
        let sig = kp.sign(msg);
        assert!(kp.public_key().verify(msg, &sig));
    }

    #[test]
    fn wrong_key_fails_verification() {
        let kp1 = NovaKeypair::generate();
        let kp2 = NovaKeypair::generate();
        let sig = kp1.sign(b"message");
        assert!(!kp2.public_key().verify(b"message", &sig));
    }

    #[test]
    fn deterministic_from_seed() {
        let seed = [42u8; 32];
        let kp1 = NovaKeypair::from_seed(&seed);
        let kp2 = NovaKeypair::from_seed(&seed);
        assert_eq!(kp1.public_key(), kp2.public_key());
        // Ed25519 is deterministic: same key + same message = same signature.
        assert_eq!(kp1.sign(b"m"), kp2.sign(b"m"));
    }

    #[test]
    fn test_roundtrip_hex() {
        let kp = NovaKeypair::generate();
        let restored = NovaKeypair::from_hex(&hex::encode(kp.secret_key_bytes())).unwrap();
        assert_eq!(kp, restored);
    }

    #[test]
    fn test_invalid_hex_rejected() {
        assert!(NovaKeypair::from_hex("deadbeef").is_err());
        assert!(NovaKeypair::from_hex("not-hex-at-all").is_err());
    }

    #[test]
    fn test_public_key_rejects_wrong_length() {
        assert!(NovaPublicKey::try_from_slice(&[0u8; 16]).is_err());
        let kp = NovaKeypair::generate();
        let pk = NovaPublicKey::try_from_slice(kp.public_key().as_bytes()).unwrap();
        assert_eq!(pk, kp.public_key());
    }

    #[test]
    fn test_signature_rejects_wrong_length() {
        assert!(NovaSignature::try_from_slice(&[0u8; 63]).is_err());
        assert!(NovaSignature::try_from_slice(&[0u8; 64]).is_ok());
    }

    #[test]
    fn truncated_signature_does_not_verify() {
        let kp = NovaKeypair::generate();
        let sig = kp.sign(b"msg");
        let truncated = NovaSignature {
            bytes: sig.as_bytes()[..32].to_vec(),
        };
        assert!(!kp.public_key().verify(b"msg", &truncated));
    }

    #[test]
    fn debug_does_not_leak_secret() {
        let kp = NovaKeypair::generate();
        let debug_str = format!("{:?}", kp);
        assert!(debug_str.starts_with("NovaKeypair(pub="));
        assert!(!debug_str.contains(&hex::encode(kp.secret_key_bytes())));
    }
}
