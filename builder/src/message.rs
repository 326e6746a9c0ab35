//! # Messages
//!
//! A message is the envelope a transaction travels in: it names the
//! network, links to the parent messages it approves, carries at most one
//! transaction and a nonce.
//!
//! ## Layout
//!
//! ```text
//! u64  network id
//! u8   parent count, then 32B per parent (sorted, distinct)
//! u32  payload length, then the transaction encoding (0 = no payload)
//! u64  nonce
//! ```
//!
//! The message id is the BLAKE3 digest of that encoding.
//!
//! [`MessageBuilder`] follows the same sticky-error discipline as the
//! transaction builder: an error forwarded into it (see
//! `TransactionBuilder::build_and_swap_to_message_builder`) turns every
//! setter into a no-op and is returned by `build`.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::config::{MAX_PARENTS, NETWORK_ID_MAINNET};
use crate::crypto::hash::{blake3_hash, HASH_LENGTH};
use crate::error::BuilderError;
use crate::transaction::essence::{write_len_u32, EncodingError};
use crate::transaction::Transaction;

// ---------------------------------------------------------------------------
// MessageId
// ---------------------------------------------------------------------------

/// BLAKE3 digest identifying a message. Serialized as hex.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId([u8; HASH_LENGTH]);

impl MessageId {
    pub fn new(bytes: [u8; HASH_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; HASH_LENGTH] {
        &self.0
    }

    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let mut bytes = [0u8; HASH_LENGTH];
        hex::decode_to_slice(s, &mut bytes)?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MessageId({})", self)
    }
}

impl Serialize for MessageId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MessageId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub network_id: u64,
    /// Approved parents, sorted ascending without duplicates.
    pub parents: Vec<MessageId>,
    pub payload: Option<Transaction>,
    pub nonce: u64,
}

impl Message {
    pub fn to_bytes(&self) -> Result<Vec<u8>, EncodingError> {
        let mut buf = Vec::with_capacity(8 + 1 + self.parents.len() * HASH_LENGTH + 4 + 8);
        buf.extend_from_slice(&self.network_id.to_le_bytes());

        let count = u8::try_from(self.parents.len()).map_err(|_| EncodingError::LengthOverflow {
            field: "parents",
            len: self.parents.len(),
        })?;
        buf.push(count);
        for parent in &self.parents {
            buf.extend_from_slice(parent.as_bytes());
        }

        match &self.payload {
            Some(transaction) => {
                let tx_bytes = transaction.to_bytes()?;
                write_len_u32(&mut buf, "message payload", tx_bytes.len())?;
                buf.extend_from_slice(&tx_bytes);
            }
            None => buf.extend_from_slice(&0u32.to_le_bytes()),
        }

        buf.extend_from_slice(&self.nonce.to_le_bytes());
        Ok(buf)
    }

    pub fn id(&self) -> Result<MessageId, EncodingError> {
        Ok(MessageId::new(blake3_hash(&self.to_bytes()?)))
    }
}

// ---------------------------------------------------------------------------
// MessageBuilder
// ---------------------------------------------------------------------------

/// Chainable builder for [`Message`]. Defaults to mainnet, nonce 0 and
/// no payload; at least one parent is required.
#[derive(Debug, Clone)]
pub struct MessageBuilder {
    network_id: u64,
    parents: Vec<MessageId>,
    payload: Option<Transaction>,
    nonce: u64,
    error: Option<BuilderError>,
}

impl Default for MessageBuilder {
    fn default() -> Self {
        Self {
            network_id: NETWORK_ID_MAINNET,
            parents: Vec::new(),
            payload: None,
            nonce: 0,
            error: None,
        }
    }
}

impl MessageBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A builder that already carries `error`; `build` will return it.
    pub fn from_error(error: BuilderError) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }

    pub fn network_id(mut self, network_id: u64) -> Self {
        if self.error.is_none() {
            self.network_id = network_id;
        }
        self
    }

    pub fn parent(mut self, parent: MessageId) -> Self {
        if self.error.is_none() {
            self.parents.push(parent);
        }
        self
    }

    pub fn parents(mut self, parents: impl IntoIterator<Item = MessageId>) -> Self {
        if self.error.is_none() {
            self.parents.extend(parents);
        }
        self
    }

    pub fn payload(mut self, transaction: Transaction) -> Self {
        if self.error.is_none() {
            self.payload = Some(transaction);
        }
        self
    }

    pub fn nonce(mut self, nonce: u64) -> Self {
        if self.error.is_none() {
            self.nonce = nonce;
        }
        self
    }

    pub fn error(&self) -> Option<&BuilderError> {
        self.error.as_ref()
    }

    /// Returns a forwarded error if there is one, otherwise sorts and
    /// de-duplicates the parents and checks there are `1..=MAX_PARENTS`.
    pub fn build(self) -> Result<Message, BuilderError> {
        if let Some(err) = self.error {
            return Err(err);
        }

        let mut parents = self.parents;
        parents.sort_unstable();
        parents.dedup();
        if parents.is_empty() || parents.len() > MAX_PARENTS {
            return Err(BuilderError::InvalidParentCount {
                count: parents.len(),
                max: MAX_PARENTS,
            });
        }

        Ok(Message {
            network_id: self.network_id,
            parents,
            payload: self.payload,
            nonce: self.nonce,
        })
    }
}
