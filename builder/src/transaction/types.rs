//! Core value types of a UTXO transaction.
//!
//! Inputs reference earlier outputs, outputs lock value to an address,
//! and unlock blocks authorize the inputs. None of these types know who
//! owns an input: that association lives in the builder.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::address::Address;
use crate::crypto::keys::{NovaPublicKey, NovaSignature};

/// Length of a transaction id.
pub const TRANSACTION_ID_LENGTH: usize = 32;

/// Length of an [`OutputId`]: transaction id followed by a u16 index.
pub const OUTPUT_ID_LENGTH: usize = TRANSACTION_ID_LENGTH + 2;

// ---------------------------------------------------------------------------
// TransactionId
// ---------------------------------------------------------------------------

/// BLAKE3 digest identifying a transaction. Serialized as hex.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransactionId([u8; TRANSACTION_ID_LENGTH]);

impl TransactionId {
    pub fn new(bytes: [u8; TRANSACTION_ID_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; TRANSACTION_ID_LENGTH] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let mut bytes = [0u8; TRANSACTION_ID_LENGTH];
        hex::decode_to_slice(s, &mut bytes)?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TransactionId({})", self.to_hex())
    }
}

impl Serialize for TransactionId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for TransactionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// OutputId / UtxoInput
// ---------------------------------------------------------------------------

/// Unique identity of an output: creating transaction plus index.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OutputId([u8; OUTPUT_ID_LENGTH]);

impl OutputId {
    pub fn as_bytes(&self) -> &[u8; OUTPUT_ID_LENGTH] {
        &self.0
    }
}

impl fmt::Display for OutputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for OutputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OutputId({})", self)
    }
}

/// A reference to an unspent output being consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UtxoInput {
    pub transaction_id: TransactionId,
    pub output_index: u16,
}

impl UtxoInput {
    pub fn new(transaction_id: TransactionId, output_index: u16) -> Self {
        Self {
            transaction_id,
            output_index,
        }
    }

    /// The identity the builder keys its owner map on.
    pub fn id(&self) -> OutputId {
        let mut bytes = [0u8; OUTPUT_ID_LENGTH];
        bytes[..TRANSACTION_ID_LENGTH].copy_from_slice(self.transaction_id.as_bytes());
        bytes[TRANSACTION_ID_LENGTH..].copy_from_slice(&self.output_index.to_le_bytes());
        OutputId(bytes)
    }
}

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// Locks `amount` base units to `address`, spendable by a signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigLockedSingleOutput {
    pub address: Address,
    pub amount: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Output {
    SigLockedSingle(SigLockedSingleOutput),
}

impl Output {
    pub fn sig_locked_single(address: Address, amount: u64) -> Self {
        Self::SigLockedSingle(SigLockedSingleOutput { address, amount })
    }

    pub fn address(&self) -> &Address {
        match self {
            Self::SigLockedSingle(out) => &out.address,
        }
    }

    pub fn amount(&self) -> u64 {
        match self {
            Self::SigLockedSingle(out) => out.amount,
        }
    }
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// Arbitrary data tagged with an index, so nodes can look it up later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Indexation {
    pub index: Vec<u8>,
    pub data: Vec<u8>,
}

impl Indexation {
    pub fn new(index: impl Into<Vec<u8>>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            index: index.into(),
            data: data.into(),
        }
    }
}

/// Payloads that may ride inside a transaction essence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Payload {
    Indexation(Indexation),
}

impl From<Indexation> for Payload {
    fn from(indexation: Indexation) -> Self {
        Self::Indexation(indexation)
    }
}

// ---------------------------------------------------------------------------
// Signatures & unlock blocks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ed25519Signature {
    pub public_key: NovaPublicKey,
    pub signature: NovaSignature,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Signature {
    Ed25519(Ed25519Signature),
}

impl Signature {
    pub fn public_key(&self) -> &NovaPublicKey {
        match self {
            Self::Ed25519(sig) => &sig.public_key,
        }
    }

    /// Checks the signature against `message`.
    pub fn verify(&self, message: &[u8]) -> bool {
        match self {
            Self::Ed25519(sig) => sig.public_key.verify(message, &sig.signature),
        }
    }
}

/// Carries an actual signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureUnlockBlock {
    pub signature: Signature,
}

/// Points at an earlier [`SignatureUnlockBlock`] that authorizes the same
/// address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceUnlockBlock {
    pub reference: u16,
}

/// Authorization for one input, positioned 1:1 with the inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UnlockBlock {
    Signature(SignatureUnlockBlock),
    Reference(ReferenceUnlockBlock),
}

impl UnlockBlock {
    pub fn signature(signature: Signature) -> Self {
        Self::Signature(SignatureUnlockBlock { signature })
    }

    pub fn reference(reference: u16) -> Self {
        Self::Reference(ReferenceUnlockBlock { reference })
    }

    pub fn is_signature(&self) -> bool {
        matches!(self, Self::Signature(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::Ed25519Address;

    #[test]
    fn output_id_is_txid_then_le_index() {
        let input = UtxoInput::new(TransactionId::new([0xAA; 32]), 0x0102);
        let id = input.id();
        assert_eq!(&id.as_bytes()[..32], &[0xAA; 32]);
        assert_eq!(&id.as_bytes()[32..], &[0x02, 0x01]);
    }

    #[test]
    fn distinct_indices_give_distinct_ids() {
        let tx = TransactionId::new([1; 32]);
        assert_ne!(UtxoInput::new(tx, 0).id(), UtxoInput::new(tx, 1).id());
    }

    #[test]
    fn transaction_id_hex_roundtrip() {
        let id = TransactionId::new([0x5A; 32]);
        assert_eq!(TransactionId::from_hex(&id.to_hex()).unwrap(), id);
        assert!(TransactionId::from_hex("abcd").is_err());
    }

    #[test]
    fn input_json_uses_hex_transaction_id() {
        let input = UtxoInput::new(TransactionId::new([0x01; 32]), 3);
        let json = serde_json::to_value(input).unwrap();
        assert_eq!(json["transaction_id"], "01".repeat(32));
        assert_eq!(json["output_index"], 3);
    }

    #[test]
    fn unlock_block_json_is_tagged() {
        let json = serde_json::to_value(UnlockBlock::reference(4)).unwrap();
        assert_eq!(json["type"], "reference");
        assert_eq!(json["reference"], 4);
    }

    #[test]
    fn output_accessors() {
        let addr = Address::Ed25519(Ed25519Address::new([2; 32]));
        let out = Output::sig_locked_single(addr, 500);
        assert_eq!(out.amount(), 500);
        assert_eq!(out.address(), &addr);
    }
}
