//! The transaction essence and its canonical encoding.
//!
//! The essence is everything a signature commits to: inputs, outputs and
//! the optional payload, in insertion order. Its encoding is a fixed
//! little-endian layout so that logically identical essences always
//! produce identical bytes, whatever path built them:
//!
//! ```text
//! u8   essence type (0)
//! u16  input count     then per input:  u8 type (0) | 32B tx id | u16 index
//! u16  output count    then per output: u8 type (0) | 33B address | u64 amount
//! u32  payload length  then the payload bytes (absent payload = length 0)
//! ```
//!
//! The signing message is the BLAKE3 digest of that encoding.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::types::{Indexation, Output, Payload, UtxoInput};
use crate::crypto::hash::{blake3_hash, HASH_LENGTH};

pub(crate) const ESSENCE_TYPE: u8 = 0;
pub(crate) const INPUT_TYPE_UTXO: u8 = 0;
pub(crate) const OUTPUT_TYPE_SIG_LOCKED_SINGLE: u8 = 0;
pub(crate) const PAYLOAD_TYPE_INDEXATION: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    /// A collection or byte string is too long for its length prefix.
    #[error("{field} length {len} does not fit its length prefix")]
    LengthOverflow { field: &'static str, len: usize },

    #[error("signature at unlock block {index} is {len} bytes, expected 64")]
    InvalidSignatureLength { index: usize, len: usize },
}

/// Appends a u16 length prefix, failing if `len` does not fit.
pub(crate) fn write_len_u16(
    buf: &mut Vec<u8>,
    field: &'static str,
    len: usize,
) -> Result<(), EncodingError> {
    let len = u16::try_from(len).map_err(|_| EncodingError::LengthOverflow { field, len })?;
    buf.extend_from_slice(&len.to_le_bytes());
    Ok(())
}

/// Appends a u32 length prefix, failing if `len` does not fit.
pub(crate) fn write_len_u32(
    buf: &mut Vec<u8>,
    field: &'static str,
    len: usize,
) -> Result<(), EncodingError> {
    let len = u32::try_from(len).map_err(|_| EncodingError::LengthOverflow { field, len })?;
    buf.extend_from_slice(&len.to_le_bytes());
    Ok(())
}

// ---------------------------------------------------------------------------
// TransactionEssence
// ---------------------------------------------------------------------------

/// Ordered inputs, ordered outputs and at most one payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionEssence {
    pub inputs: Vec<UtxoInput>,
    pub outputs: Vec<Output>,
    pub payload: Option<Payload>,
}

impl TransactionEssence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canonical byte encoding of the essence.
    pub fn encode(&self) -> Result<Vec<u8>, EncodingError> {
        let mut buf = Vec::with_capacity(
            1 + 2 + self.inputs.len() * 35 + 2 + self.outputs.len() * 42 + 4,
        );

        buf.push(ESSENCE_TYPE);

        write_len_u16(&mut buf, "inputs", self.inputs.len())?;
        for input in &self.inputs {
            buf.push(INPUT_TYPE_UTXO);
            buf.extend_from_slice(input.transaction_id.as_bytes());
            buf.extend_from_slice(&input.output_index.to_le_bytes());
        }

        write_len_u16(&mut buf, "outputs", self.outputs.len())?;
        for output in &self.outputs {
            match output {
                Output::SigLockedSingle(out) => {
                    buf.push(OUTPUT_TYPE_SIG_LOCKED_SINGLE);
                    buf.extend_from_slice(&out.address.to_bytes());
                    buf.extend_from_slice(&out.amount.to_le_bytes());
                }
            }
        }

        match &self.payload {
            Some(payload) => {
                let payload_bytes = encode_payload(payload)?;
                write_len_u32(&mut buf, "payload", payload_bytes.len())?;
                buf.extend_from_slice(&payload_bytes);
            }
            None => buf.extend_from_slice(&0u32.to_le_bytes()),
        }

        Ok(buf)
    }

    /// The 32-byte message every signature unlock block signs.
    pub fn signing_message(&self) -> Result<[u8; HASH_LENGTH], EncodingError> {
        Ok(blake3_hash(&self.encode()?))
    }
}

fn encode_payload(payload: &Payload) -> Result<Vec<u8>, EncodingError> {
    match payload {
        Payload::Indexation(Indexation { index, data }) => {
            let mut buf = Vec::with_capacity(4 + 2 + index.len() + 4 + data.len());
            buf.extend_from_slice(&PAYLOAD_TYPE_INDEXATION.to_le_bytes());
            write_len_u16(&mut buf, "indexation index", index.len())?;
            buf.extend_from_slice(index);
            write_len_u32(&mut buf, "indexation data", data.len())?;
            buf.extend_from_slice(data);
            Ok(buf)
        }
    }
}
