//! # Hashing Utilities
//!
//! BLAKE3 is the only hash the builder needs. It derives `Ed25519`
//! addresses from public keys, turns a canonical essence encoding into
//! the 32-byte signing message, and produces transaction and message ids.

/// Length of every digest produced by this module.
pub const HASH_LENGTH: usize = 32;

/// Compute the BLAKE3 hash of the input data.
///
/// # Example
///
/// ```
/// use nova_tx_builder::crypto::blake3_hash;
///
/// let hash = blake3_hash(b"NOVA protocol");
/// assert_eq!(hash.len(), 32);
/// ```
pub fn blake3_hash(data: &[u8]) -> [u8; HASH_LENGTH] {
    *blake3::hash(data).as_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blake3_deterministic() {
        assert_eq!(blake3_hash(b"abc"), blake3_hash(b"abc"));
        assert_ne!(blake3_hash(b"abc"), blake3_hash(b"abd"));
    }

    #[test]
    fn test_empty_input() {
        // BLAKE3 of the empty string is a well-known constant.
        assert_eq!(
            hex::encode(blake3_hash(b"")),
            "af1349b9f5f9a1a6a0404dea36dcc9499bcb25c9adc112b7cc9a93cae41f3262"
        );
    }
}
