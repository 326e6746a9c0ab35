//! The unspent-output query capability.
//!
//! Automated input discovery asks a node (or anything else that tracks
//! the ledger) which outputs an Ed25519 address can still spend. The
//! answer is an ordered `Vec`, never a map: the builder appends inputs in
//! exactly the order the query yields them, and that order is part of
//! the signing message.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use thiserror::Error;

use super::types::{Output, OutputId, UtxoInput};
use crate::address::{Address, Ed25519Address};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("unspent-output query was cancelled")]
    Cancelled,

    #[error("unspent-output query timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// The backing service could not answer.
    #[error("unspent-output query failed: {0}")]
    Unavailable(String),
}

/// Lists the unspent outputs owned by an address, in a stable order.
#[async_trait]
pub trait UnspentOutputQuery: Send + Sync {
    async fn unspent_outputs(
        &self,
        address: &Ed25519Address,
    ) -> Result<Vec<(UtxoInput, Output)>, QueryError>;
}

#[async_trait]
impl<T: UnspentOutputQuery + ?Sized> UnspentOutputQuery for Arc<T> {
    async fn unspent_outputs(
        &self,
        address: &Ed25519Address,
    ) -> Result<Vec<(UtxoInput, Output)>, QueryError> {
        (**self).unspent_outputs(address).await
    }
}

// ---------------------------------------------------------------------------
// InMemoryOutputSource
// ---------------------------------------------------------------------------

/// An insertion-ordered unspent-output set held in memory.
///
/// Useful for tests, offline tooling and as a local cache in front of a
/// node. Cloning shares the underlying store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOutputSource {
    outputs: Arc<RwLock<Vec<(UtxoInput, Output)>>>,
}

impl InMemoryOutputSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an unspent output. Re-inserting an existing output id
    /// replaces it in place, keeping its position.
    pub fn insert(&self, input: UtxoInput, output: Output) {
        let mut outputs = self.outputs.write();
        let id = input.id();
        match outputs.iter_mut().find(|(existing, _)| existing.id() == id) {
            Some(slot) => slot.1 = output,
            None => outputs.push((input, output)),
        }
    }

    /// Removes an output, returning it if it was present.
    pub fn spend(&self, id: &OutputId) -> Option<Output> {
        let mut outputs = self.outputs.write();
        let pos = outputs.iter().position(|(input, _)| input.id() == *id)?;
        Some(outputs.remove(pos).1)
    }

    pub fn len(&self) -> usize {
        self.outputs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.read().is_empty()
    }

    /// Sum of all unspent amounts locked to `address`, saturating at
    /// `u64::MAX`.
    pub fn balance(&self, address: &Address) -> u64 {
        self.outputs
            .read()
            .iter()
            .filter(|(_, output)| output.address() == address)
            .fold(0u64, |acc, (_, output)| acc.saturating_add(output.amount()))
    }
}

#[async_trait]
impl UnspentOutputQuery for InMemoryOutputSource {
    async fn unspent_outputs(
        &self,
        address: &Ed25519Address,
    ) -> Result<Vec<(UtxoInput, Output)>, QueryError> {
        let owner = Address::Ed25519(*address);
        Ok(self
            .outputs
            .read()
            .iter()
            .filter(|(_, output)| *output.address() == owner)
            .cloned()
            .collect())
    }
}
