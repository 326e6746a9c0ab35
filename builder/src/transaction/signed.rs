//! The finished transaction and its encode-and-validate step.
//!
//! [`Transaction::encode`] is the last gate a build passes through. With
//! validation enabled it checks the protocol rules in a fixed order,
//! cheapest first, and reports the first one that fails:
//!
//! 1. input and output counts within limits
//! 2. output indices in range, no input spent twice
//! 3. amounts non-zero, within supply, one output per address
//! 4. indexation payload sizes
//! 5. exactly one unlock block per input
//! 6. unique signatures, references point backwards at a signature
//! 7. every signature verifies against the essence signing message
//!
//! The wire layout is the essence encoding followed by the unlock blocks:
//!
//! ```text
//! u16  unlock block count
//! per block:  0 | 0 | 32B public key | 64B signature      (signature)
//!             1 | u16 reference                          (reference)
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::essence::{write_len_u16, EncodingError, TransactionEssence};
use super::types::{Output, OutputId, Payload, Signature, TransactionId, UnlockBlock};
use crate::config::EncodingParameters;
use crate::crypto::hash::blake3_hash;
use crate::crypto::keys::SIGNATURE_LENGTH;

const UNLOCK_BLOCK_SIGNATURE: u8 = 0;
const UNLOCK_BLOCK_REFERENCE: u8 = 1;
const SIGNATURE_TYPE_ED25519: u8 = 0;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// A protocol rule the transaction breaks. Each variant maps to one check
/// in [`Transaction::encode`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("transaction has {count} inputs, maximum is {max}")]
    InputCount { count: usize, max: usize },

    #[error("transaction has {count} outputs, maximum is {max}")]
    OutputCount { count: usize, max: usize },

    #[error("input references output index {index}, must be below {max}")]
    OutputIndexOutOfRange { index: u16, max: u16 },

    #[error("output {0} is spent more than once")]
    DuplicateInput(OutputId),

    #[error("output {index} has a zero amount")]
    ZeroAmount { index: usize },

    #[error("output {index} amount {amount} exceeds the token supply")]
    AmountExceedsSupply { index: usize, amount: u64 },

    #[error("sum of output amounts exceeds the token supply")]
    TotalExceedsSupply,

    #[error("output {index} pays {address}, which an earlier output already pays")]
    DuplicateOutputAddress { index: usize, address: String },

    #[error("indexation index is {len} bytes, must be 1..={max}")]
    IndexLength { len: usize, max: usize },

    #[error("indexation data is {len} bytes, maximum is {max}")]
    IndexationDataTooLarge { len: usize, max: usize },

    #[error("expected {expected} unlock blocks (one per input), got {got}")]
    UnlockBlockCount { expected: usize, got: usize },

    #[error("unlock block {index} repeats an earlier signature")]
    DuplicateSignature { index: usize },

    #[error("unlock block {index} references {reference}, which is not an earlier signature block")]
    InvalidReference { index: usize, reference: u16 },

    #[error("signature in unlock block {index} does not verify")]
    InvalidSignature { index: usize },

    #[error(transparent)]
    Encoding(#[from] EncodingError),
}

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// An essence together with the unlock blocks that authorize its inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub essence: TransactionEssence,
    pub unlock_blocks: Vec<UnlockBlock>,
}

impl Transaction {
    pub fn new(essence: TransactionEssence, unlock_blocks: Vec<UnlockBlock>) -> Self {
        Self {
            essence,
            unlock_blocks,
        }
    }

    /// Encodes the transaction, first checking it against `params` when
    /// `validate` is set.
    pub fn encode(
        &self,
        validate: bool,
        params: &EncodingParameters,
    ) -> Result<Vec<u8>, ValidationError> {
        if validate {
            self.validate(params)?;
        }
        Ok(self.to_bytes()?)
    }

    /// Raw wire encoding, no protocol checks.
    pub fn to_bytes(&self) -> Result<Vec<u8>, EncodingError> {
        let mut buf = self.essence.encode()?;
        write_len_u16(&mut buf, "unlock blocks", self.unlock_blocks.len())?;
        for (index, block) in self.unlock_blocks.iter().enumerate() {
            match block {
                UnlockBlock::Signature(block) => match &block.signature {
                    Signature::Ed25519(sig) => {
                        let sig_bytes = sig.signature.as_bytes();
                        if sig_bytes.len() != SIGNATURE_LENGTH {
                            return Err(EncodingError::InvalidSignatureLength {
                                index,
                                len: sig_bytes.len(),
                            });
                        }
                        buf.push(UNLOCK_BLOCK_SIGNATURE);
                        buf.push(SIGNATURE_TYPE_ED25519);
                        buf.extend_from_slice(sig.public_key.as_bytes());
                        buf.extend_from_slice(sig_bytes);
                    }
                },
                UnlockBlock::Reference(block) => {
                    buf.push(UNLOCK_BLOCK_REFERENCE);
                    buf.extend_from_slice(&block.reference.to_le_bytes());
                }
            }
        }
        Ok(buf)
    }

    /// BLAKE3 digest of the wire encoding.
    pub fn id(&self) -> Result<TransactionId, EncodingError> {
        Ok(TransactionId::new(blake3_hash(&self.to_bytes()?)))
    }

    /// Runs every protocol check without encoding.
    pub fn validate(&self, params: &EncodingParameters) -> Result<(), ValidationError> {
        let essence = &self.essence;

        // 1. Counts.
        if essence.inputs.len() > params.max_inputs {
            return Err(ValidationError::InputCount {
                count: essence.inputs.len(),
                max: params.max_inputs,
            });
        }
        if essence.outputs.len() > params.max_outputs {
            return Err(ValidationError::OutputCount {
                count: essence.outputs.len(),
                max: params.max_outputs,
            });
        }

        // 2. Inputs.
        let mut spent = HashSet::with_capacity(essence.inputs.len());
        for input in &essence.inputs {
            if input.output_index >= params.max_output_index {
                return Err(ValidationError::OutputIndexOutOfRange {
                    index: input.output_index,
                    max: params.max_output_index,
                });
            }
            if !spent.insert(input.id()) {
                return Err(ValidationError::DuplicateInput(input.id()));
            }
        }

        // 3. Outputs.
        validate_outputs(&essence.outputs, params)?;

        // 4. Payload.
        if let Some(Payload::Indexation(indexation)) = &essence.payload {
            let len = indexation.index.len();
            if len == 0 || len > params.max_index_length {
                return Err(ValidationError::IndexLength {
                    len,
                    max: params.max_index_length,
                });
            }
            if indexation.data.len() > params.max_indexation_data_length {
                return Err(ValidationError::IndexationDataTooLarge {
                    len: indexation.data.len(),
                    max: params.max_indexation_data_length,
                });
            }
        }

        // 5. One unlock block per input.
        if self.unlock_blocks.len() != essence.inputs.len() {
            return Err(ValidationError::UnlockBlockCount {
                expected: essence.inputs.len(),
                got: self.unlock_blocks.len(),
            });
        }

        // 6. Unlock block structure.
        let mut seen_keys = HashSet::new();
        for (index, block) in self.unlock_blocks.iter().enumerate() {
            match block {
                UnlockBlock::Signature(block) => {
                    if !seen_keys.insert(block.signature.public_key().as_bytes()) {
                        return Err(ValidationError::DuplicateSignature { index });
                    }
                }
                UnlockBlock::Reference(block) => {
                    let target = block.reference as usize;
                    let points_back_at_signature = target < index
                        && self.unlock_blocks[target].is_signature();
                    if !points_back_at_signature {
                        return Err(ValidationError::InvalidReference {
                            index,
                            reference: block.reference,
                        });
                    }
                }
            }
        }

        // 7. Signatures, most expensive last.
        let message = essence.signing_message()?;
        for (index, block) in self.unlock_blocks.iter().enumerate() {
            if let UnlockBlock::Signature(block) = block {
                if !block.signature.verify(&message) {
                    return Err(ValidationError::InvalidSignature { index });
                }
            }
        }

        Ok(())
    }
}

fn validate_outputs(outputs: &[Output], params: &EncodingParameters) -> Result<(), ValidationError> {
    let mut total: u64 = 0;
    let mut paid = HashSet::with_capacity(outputs.len());
    for (index, output) in outputs.iter().enumerate() {
        let amount = output.amount();
        if amount == 0 {
            return Err(ValidationError::ZeroAmount { index });
        }
        if amount > params.token_supply {
            return Err(ValidationError::AmountExceedsSupply { index, amount });
        }
        total = total
            .checked_add(amount)
            .filter(|sum| *sum <= params.token_supply)
            .ok_or(ValidationError::TotalExceedsSupply)?;
        if !paid.insert(output.address().identity()) {
            return Err(ValidationError::DuplicateOutputAddress {
                index,
                address: output.address().to_string(),
            });
        }
    }
    Ok(())
}
