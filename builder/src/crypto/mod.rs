//! # Cryptographic Primitives
//!
//! Thin, type-safe wrappers around audited implementations:
//!
//! - **Ed25519** (`ed25519-dalek`) for input signatures.
//! - **BLAKE3** for address derivation, signing messages and ids.
//!
//! The builder never signs with these directly. Signing goes through the
//! `AddressSigner` capability so hardware or remote signers can slot in.

pub mod hash;
pub mod keys;

pub use hash::blake3_hash;
pub use keys::{KeyError, NovaKeypair, NovaPublicKey, NovaSignature};
