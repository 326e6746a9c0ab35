// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # NOVA Transaction Builder
//!
//! Assembles signed UTXO transactions for the NOVA network: inputs and
//! their owning addresses, outputs and an optional indexation payload go
//! in; a transaction whose unlock blocks carry exactly one signature per
//! owning address comes out, already checked against the protocol rules.
//!
//! ## Architecture
//!
//! - **address**: Ed25519 and Alias addresses, identity strings, Bech32.
//! - **config**: Protocol limits and builder knobs.
//! - **crypto**: Ed25519 keys and BLAKE3 hashing.
//! - **transaction**: Essence, unlock assembly, validation, the builder.
//! - **message**: The envelope a built transaction is handed off to.
//! - **error**: The builder-level error type.
//!
//! ## Example
//!
//! ```rust
//! use nova_tx_builder::config::EncodingParameters;
//! use nova_tx_builder::crypto::NovaKeypair;
//! use nova_tx_builder::transaction::{
//!     InMemoryAddressSigner, Output, TransactionBuilder, TransactionId, UnlockBlock, UtxoInput,
//! };
//!
//! let mut signer = InMemoryAddressSigner::new();
//! let alice = signer.insert(NovaKeypair::from_seed(&[1; 32]));
//! let bob = signer.insert(NovaKeypair::from_seed(&[2; 32]));
//!
//! let tx = TransactionBuilder::new()
//!     .add_input(alice, UtxoInput::new(TransactionId::new([1; 32]), 0))
//!     .add_input(bob, UtxoInput::new(TransactionId::new([2; 32]), 0))
//!     .add_input(alice, UtxoInput::new(TransactionId::new([3; 32]), 0))
//!     .add_output(Output::sig_locked_single(bob, 500))
//!     .build(Some(&EncodingParameters::default()), Some(&signer))
//!     .unwrap();
//!
//! assert!(matches!(tx.unlock_blocks[2], UnlockBlock::Reference(ref r) if r.reference == 0));
//! ```

pub mod address;
pub mod config;
pub mod crypto;
pub mod error;
pub mod message;
pub mod transaction;

pub use address::{Address, AddressKind};
pub use error::{BuilderError, BuilderResult};
pub use message::{Message, MessageBuilder, MessageId};
pub use transaction::{Transaction, TransactionBuilder};
