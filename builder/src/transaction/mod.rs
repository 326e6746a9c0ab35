//! # Transaction Module
//!
//! Assembly of signed UTXO transactions.
//!
//! ## Architecture
//!
//! ```text
//! types.rs    inputs, outputs, payloads, signatures, unlock blocks
//! essence.rs  the to-be-signed essence and its canonical encoding
//! query.rs    unspent-output lookup capability (+ in-memory source)
//! signer.rs   address signing capability (+ in-memory signer)
//! unlock.rs   one signature per owner, references for the rest
//! signed.rs   the finished Transaction, encode-and-validate
//! builder.rs  TransactionBuilder: accumulate, discover, build
//! ```
//!
//! ## Lifecycle
//!
//! 1. **Accumulate**: `add_input` / `add_output` / `set_payload`, or let
//!    `add_inputs_via_query` discover inputs for an address.
//! 2. **Build**: `build(params, signer)` computes the signing message,
//!    assembles unlock blocks and validates the result.
//! 3. **Wrap**: optionally hand the transaction to a
//!    [`MessageBuilder`](crate::message::MessageBuilder) with
//!    `build_and_swap_to_message_builder`.

pub mod builder;
pub mod essence;
pub mod query;
pub mod signed;
pub mod signer;
pub mod types;
pub mod unlock;

pub use builder::{InputFilter, TransactionBuilder};
pub use essence::{EncodingError, TransactionEssence};
pub use query::{InMemoryOutputSource, QueryError, UnspentOutputQuery};
pub use signed::{Transaction, ValidationError};
pub use signer::{AddressSigner, InMemoryAddressSigner, SignerError};
pub use types::{
    Ed25519Signature, Indexation, Output, OutputId, Payload, ReferenceUnlockBlock, Signature,
    SignatureUnlockBlock, SigLockedSingleOutput, TransactionId, UnlockBlock, UtxoInput,
};
pub use unlock::assemble_unlock_blocks;
