//! # Addresses
//!
//! An [`Address`] names whoever may spend an output. It is a closed sum
//! type over the address kinds the protocol knows, each wrapping a fixed
//! 32-byte hash:
//!
//! ```text
//! Ed25519  kind 0x00   BLAKE3(ed25519 public key)
//! Alias    kind 0x08   alias id (controlled by an alias output, not a key)
//! ```
//!
//! Two renderings exist. [`Address::identity`] is the lowercase hex of
//! `kind || hash`: stable, network independent, and the key the unlock
//! assembler deduplicates on. Bech32 (`nova1...`) is what humans see.

use std::fmt;
use std::str::FromStr;

use bech32::{Bech32, Hrp};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::config::ADDRESS_HRP;
use crate::crypto::hash::blake3_hash;
use crate::crypto::keys::NovaPublicKey;

/// Length of the hash carried by every address kind.
pub const ADDRESS_HASH_LENGTH: usize = 32;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("bech32 decode error: {0}")]
    Bech32Decode(String),

    #[error("invalid HRP: expected '{expected}', got '{got}'")]
    InvalidHrp { expected: String, got: String },

    #[error("invalid address data length: expected {expected} bytes, got {got}")]
    InvalidDataLength { expected: usize, got: usize },

    #[error("unknown address kind byte: 0x{0:02x}")]
    UnknownKind(u8),
}

// ---------------------------------------------------------------------------
// AddressKind
// ---------------------------------------------------------------------------

/// Discriminant of an [`Address`], also its first byte on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddressKind {
    Ed25519,
    Alias,
}

impl AddressKind {
    pub fn type_byte(self) -> u8 {
        match self {
            Self::Ed25519 => 0x00,
            Self::Alias => 0x08,
        }
    }

    pub fn from_type_byte(byte: u8) -> Result<Self, AddressError> {
        match byte {
            0x00 => Ok(Self::Ed25519),
            0x08 => Ok(Self::Alias),
            other => Err(AddressError::UnknownKind(other)),
        }
    }
}

impl fmt::Display for AddressKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ed25519 => write!(f, "Ed25519"),
            Self::Alias => write!(f, "Alias"),
        }
    }
}

// ---------------------------------------------------------------------------
// Concrete kinds
// ---------------------------------------------------------------------------

/// An address controlled by a single Ed25519 key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ed25519Address([u8; ADDRESS_HASH_LENGTH]);

impl Ed25519Address {
    pub fn new(hash: [u8; ADDRESS_HASH_LENGTH]) -> Self {
        Self(hash)
    }

    /// Derives the address owned by `public_key`.
    pub fn from_public_key(public_key: &NovaPublicKey) -> Self {
        Self(blake3_hash(public_key.as_bytes()))
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_HASH_LENGTH] {
        &self.0
    }
}

impl fmt::Debug for Ed25519Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519Address({})", hex::encode(self.0))
    }
}

/// An address controlled by an alias output. It can own outputs but can
/// never produce a signature.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct AliasAddress([u8; ADDRESS_HASH_LENGTH]);

impl AliasAddress {
    pub fn new(alias_id: [u8; ADDRESS_HASH_LENGTH]) -> Self {
        Self(alias_id)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_HASH_LENGTH] {
        &self.0
    }
}

impl fmt::Debug for AliasAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AliasAddress({})", hex::encode(self.0))
    }
}

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Address {
    Ed25519(Ed25519Address),
    Alias(AliasAddress),
}

impl Address {
    pub fn kind(&self) -> AddressKind {
        match self {
            Self::Ed25519(_) => AddressKind::Ed25519,
            Self::Alias(_) => AddressKind::Alias,
        }
    }

    pub fn hash(&self) -> &[u8; ADDRESS_HASH_LENGTH] {
        match self {
            Self::Ed25519(addr) => addr.as_bytes(),
            Self::Alias(addr) => addr.as_bytes(),
        }
    }

    /// Returns the Ed25519 address if this is one.
    pub fn as_ed25519(&self) -> Option<&Ed25519Address> {
        match self {
            Self::Ed25519(addr) => Some(addr),
            _ => None,
        }
    }

    /// Wire form: kind byte followed by the 32-byte hash.
    pub fn to_bytes(&self) -> [u8; ADDRESS_HASH_LENGTH + 1] {
        let mut out = [0u8; ADDRESS_HASH_LENGTH + 1];
        out[0] = self.kind().type_byte();
        out[1..].copy_from_slice(self.hash());
        out
    }

    /// Parses the wire form produced by [`Address::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AddressError> {
        if bytes.len() != ADDRESS_HASH_LENGTH + 1 {
            return Err(AddressError::InvalidDataLength {
                expected: ADDRESS_HASH_LENGTH + 1,
                got: bytes.len(),
            });
        }
        let mut hash = [0u8; ADDRESS_HASH_LENGTH];
        hash.copy_from_slice(&bytes[1..]);
        match AddressKind::from_type_byte(bytes[0])? {
            AddressKind::Ed25519 => Ok(Self::Ed25519(Ed25519Address(hash))),
            AddressKind::Alias => Ok(Self::Alias(AliasAddress(hash))),
        }
    }

    /// Stable identity string: two inputs belong to the same owner iff
    /// their owners' identities are equal.
    pub fn identity(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Encodes the address as Bech32 under `hrp`.
    pub fn to_bech32(&self, hrp: &str) -> Result<String, AddressError> {
        let hrp = Hrp::parse(hrp).map_err(|e| AddressError::Bech32Decode(e.to_string()))?;
        bech32::encode::<Bech32>(hrp, &self.to_bytes())
            .map_err(|e| AddressError::Bech32Decode(e.to_string()))
    }

    /// Parses a Bech32 address carrying the `nova` prefix.
    pub fn from_bech32(s: &str) -> Result<Self, AddressError> {
        let (hrp, data) =
            bech32::decode(s).map_err(|e| AddressError::Bech32Decode(e.to_string()))?;
        if hrp.as_str() != ADDRESS_HRP {
            return Err(AddressError::InvalidHrp {
                expected: ADDRESS_HRP.to_string(),
                got: hrp.to_string(),
            });
        }
        Self::from_bytes(&data)
    }
}

impl From<Ed25519Address> for Address {
    fn from(addr: Ed25519Address) -> Self {
        Self::Ed25519(addr)
    }
}

impl From<AliasAddress> for Address {
    fn from(addr: AliasAddress) -> Self {
        Self::Alias(addr)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_bech32(ADDRESS_HRP) {
            Ok(s) => f.write_str(&s),
            Err(_) => f.write_str(&self.identity()),
        }
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bech32(s)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_bech32(&s).map_err(serde::de::Error::custom)
    }
}
