//! Error type surfaced by the transaction and message builders.
//!
//! Accumulation-time failures (`UnsupportedAddressKind`, `Network`) are
//! parked in the builder's sticky slot and come back out of `build`.
//! Everything else is returned by `build` directly.

use thiserror::Error;

use crate::address::AddressKind;
use crate::transaction::essence::EncodingError;
use crate::transaction::query::QueryError;
use crate::transaction::signed::ValidationError;
use crate::transaction::signer::SignerError;
use crate::transaction::types::OutputId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuilderError {
    /// Automated input discovery was asked to look up an address kind it
    /// cannot query.
    #[error("unsupported address type: automated input discovery only supports Ed25519 addresses, got {kind}")]
    UnsupportedAddressKind { kind: AddressKind },

    /// The unspent-output query failed, timed out or was cancelled.
    #[error("network error: {0}")]
    Network(#[from] QueryError),

    #[error("transaction builder error: must supply encoding parameters")]
    MissingParameters,

    #[error("transaction builder error: must supply signer")]
    MissingSigner,

    /// An input reached the unlock assembler without an owning address.
    #[error("no owning address recorded for input {0}")]
    UnknownInputOwner(OutputId),

    #[error("signing failed: {0}")]
    SigningFailed(#[from] SignerError),

    /// The essence could not be turned into its canonical signing message.
    #[error("encoding error: {0}")]
    Encoding(#[from] EncodingError),

    /// The finished transaction was rejected by encode-and-validate.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("message must reference between 1 and {max} distinct parents, got {count}")]
    InvalidParentCount { count: usize, max: usize },
}

pub type BuilderResult<T> = Result<T, BuilderError>;
