//! Transaction construction via the builder pattern.
//!
//! [`TransactionBuilder`] accumulates an essence (inputs with their owning
//! addresses, outputs, an optional payload) through chainable, by-value
//! calls, then [`TransactionBuilder::build`] signs and validates it in one
//! go:
//!
//! ```text
//! sticky error? -> params? -> signer? -> signing message
//!     -> unlock blocks -> Transaction -> encode(validate = true)
//! ```
//!
//! Accumulation never fails outright. Errors from automated input
//! discovery are parked in a sticky slot (first error wins), every later
//! accumulation call becomes a no-op, and `build` returns the parked error
//! before doing anything else.
//!
//! A builder is consumed by `build`; use a fresh one per transaction.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::essence::TransactionEssence;
use super::query::{QueryError, UnspentOutputQuery};
use super::signed::Transaction;
use super::signer::AddressSigner;
use super::types::{Output, OutputId, Payload, TransactionId, UtxoInput};
use super::unlock::assemble_unlock_blocks;
use crate::address::Address;
use crate::config::{BuilderConfig, EncodingParameters};
use crate::crypto::hash::blake3_hash;
use crate::error::BuilderError;
use crate::message::MessageBuilder;

/// Caller predicate deciding which discovered outputs become inputs.
///
/// It is `FnMut` on purpose: a filter may keep state across calls, such
/// as a running total that stops admitting outputs once a target amount
/// is covered.
pub type InputFilter<'a> = &'a mut (dyn FnMut(&UtxoInput, &Output) -> bool + Send);

// ---------------------------------------------------------------------------
// TransactionBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for signed transactions.
///
/// # Usage
///
/// ```rust
/// use nova_tx_builder::config::EncodingParameters;
/// use nova_tx_builder::crypto::keys::NovaKeypair;
/// use nova_tx_builder::transaction::{
///     InMemoryAddressSigner, Output, TransactionBuilder, TransactionId, UtxoInput,
/// };
///
/// let mut signer = InMemoryAddressSigner::new();
/// let owner = signer.insert(NovaKeypair::from_seed(&[1; 32]));
/// let payee = InMemoryAddressSigner::new().insert(NovaKeypair::from_seed(&[2; 32]));
///
/// let tx = TransactionBuilder::new()
///     .add_input(owner, UtxoInput::new(TransactionId::new([7; 32]), 0))
///     .add_output(Output::sig_locked_single(payee, 1_000))
///     .build(Some(&EncodingParameters::default()), Some(&signer))
///     .unwrap();
/// assert_eq!(tx.unlock_blocks.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TransactionBuilder {
    essence: TransactionEssence,
    owners: HashMap<OutputId, Address>,
    error: Option<BuilderError>,
    config: BuilderConfig,
}

impl TransactionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder with non-default knobs (query timeout).
    pub fn with_config(config: BuilderConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Appends `input`, remembering `address` as the one entitled to spend
    /// it. Spendability is not checked here.
    pub fn add_input(mut self, address: Address, input: UtxoInput) -> Self {
        if self.error.is_some() {
            return self;
        }
        self.push_input(address, input);
        self
    }

    pub fn add_output(mut self, output: Output) -> Self {
        if self.error.is_some() {
            return self;
        }
        self.essence.outputs.push(output);
        self
    }

    /// Sets the payload, replacing any earlier one.
    pub fn set_payload(mut self, payload: impl Into<Payload>) -> Self {
        if self.error.is_some() {
            return self;
        }
        self.essence.payload = Some(payload.into());
        self
    }

    /// Discovers the unspent outputs of `address` through `query` and adds
    /// the ones `filter` admits (all of them without a filter), in the
    /// order the query returns them.
    ///
    /// Only Ed25519 addresses can be looked up; any other kind records
    /// [`BuilderError::UnsupportedAddressKind`] without querying. A query
    /// failure, a timeout (see [`BuilderConfig::query_timeout`]) or a
    /// `true` on `cancel` records [`BuilderError::Network`]. In every
    /// failure case the essence is left exactly as it was.
    ///
    /// A dropped cancel sender means the query can no longer be cancelled;
    /// the timeout still applies.
    pub async fn add_inputs_via_query<Q>(
        mut self,
        address: Address,
        query: &Q,
        mut filter: Option<InputFilter<'_>>,
        cancel: Option<watch::Receiver<bool>>,
    ) -> Self
    where
        Q: UnspentOutputQuery + ?Sized,
    {
        if self.error.is_some() {
            return self;
        }

        let Some(ed25519) = address.as_ed25519() else {
            self.record_error(BuilderError::UnsupportedAddressKind {
                kind: address.kind(),
            });
            return self;
        };

        let timeout = self.config.query_timeout;
        let outcome = tokio::select! {
            biased;
            _ = cancelled(cancel) => Err(QueryError::Cancelled),
            result = tokio::time::timeout(timeout, query.unspent_outputs(ed25519)) => {
                result.unwrap_or(Err(QueryError::Timeout {
                    timeout_ms: millis(timeout),
                }))
            }
        };

        let found = match outcome {
            Ok(found) => found,
            Err(e) => {
                self.record_error(e.into());
                return self;
            }
        };

        let offered = found.len();
        let mut admitted = 0usize;
        for (input, output) in found {
            if let Some(filter) = filter.as_mut() {
                if !filter(&input, &output) {
                    debug!(input = %input.id(), "filter rejected discovered output");
                    continue;
                }
            }
            self.push_input(address, input);
            admitted += 1;
        }

        debug!(address = %address, offered, admitted, "automated input discovery done");
        self
    }

    /// Signs and validates the accumulated essence.
    ///
    /// Checks, in order, each one short-circuiting before the signer or
    /// the encoder is touched: a sticky accumulation error, missing
    /// `params`, missing `signer`. Then the signing message is computed,
    /// one signature is requested per distinct owning address, and the
    /// result goes through `Transaction::encode` with validation on.
    pub fn build(
        self,
        params: Option<&EncodingParameters>,
        signer: Option<&dyn AddressSigner>,
    ) -> Result<Transaction, BuilderError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        let params = params.ok_or(BuilderError::MissingParameters)?;
        let signer = signer.ok_or(BuilderError::MissingSigner)?;

        let message = self.essence.signing_message()?;
        let unlock_blocks =
            assemble_unlock_blocks(&self.essence.inputs, &self.owners, &message, signer)?;
        let transaction = Transaction::new(self.essence, unlock_blocks);

        let bytes = transaction.encode(true, params)?;
        info!(
            id = %TransactionId::new(blake3_hash(&bytes)),
            inputs = transaction.essence.inputs.len(),
            outputs = transaction.essence.outputs.len(),
            signatures = transaction.unlock_blocks.iter().filter(|b| b.is_signature()).count(),
            size = bytes.len(),
            "transaction built"
        );
        Ok(transaction)
    }

    /// Builds the transaction and hands it to a [`MessageBuilder`].
    ///
    /// A build error is not returned here: it is forwarded into the
    /// message builder's sticky slot and comes back out of
    /// `MessageBuilder::build`. On success `hook` sees the transaction
    /// before the handoff, and the message's network id is taken from
    /// `params`.
    pub fn build_and_swap_to_message_builder(
        self,
        params: Option<&EncodingParameters>,
        signer: Option<&dyn AddressSigner>,
        hook: Option<&mut dyn FnMut(&Transaction)>,
    ) -> MessageBuilder {
        match self.build(params, signer) {
            Ok(transaction) => {
                if let Some(hook) = hook {
                    hook(&transaction);
                }
                let builder = MessageBuilder::new().payload(transaction);
                match params {
                    Some(params) => builder.network_id(params.network_id),
                    None => builder,
                }
            }
            Err(err) => MessageBuilder::from_error(err),
        }
    }

    // -- Accessors ----------------------------------------------------------

    pub fn essence(&self) -> &TransactionEssence {
        &self.essence
    }

    /// The address recorded as owner of `id`, if that input was added.
    pub fn owner_of(&self, id: &OutputId) -> Option<&Address> {
        self.owners.get(id)
    }

    /// The sticky accumulation error, if one was recorded.
    pub fn error(&self) -> Option<&BuilderError> {
        self.error.as_ref()
    }

    // -- Internals ----------------------------------------------------------

    fn push_input(&mut self, address: Address, input: UtxoInput) {
        self.owners.insert(input.id(), address);
        self.essence.inputs.push(input);
    }

    fn record_error(&mut self, err: BuilderError) {
        if self.error.is_none() {
            warn!(error = %err, "recording builder error");
            self.error = Some(err);
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Resolves once `signal` reads `true`. Never resolves without a signal or
/// after its sender is gone.
async fn cancelled(signal: Option<watch::Receiver<bool>>) {
    let Some(mut rx) = signal else {
        return std::future::pending().await;
    };
    loop {
        if *rx.borrow_and_update() {
            return;
        }
        if rx.changed().await.is_err() {
            return std::future::pending().await;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::{AddressKind, AliasAddress, Ed25519Address};
    use crate::crypto::keys::NovaKeypair;
    use crate::transaction::query::InMemoryOutputSource;
    use crate::transaction::signed::ValidationError;
    use crate::transaction::signer::{InMemoryAddressSigner, SignerError};
    use crate::transaction::types::{Indexation, Signature, UnlockBlock};
    use async_trait::async_trait;
    use std::cell::Cell;

    /// Counts calls, delegating to an in-memory signer.
    struct CountingSigner {
        inner: InMemoryAddressSigner,
        calls: Cell<usize>,
        fail_on_call: Option<usize>,
    }

    impl CountingSigner {
        fn new(inner: InMemoryAddressSigner) -> Self {
            Self {
                inner,
                calls: Cell::new(0),
                fail_on_call: None,
            }
        }
    }

    impl AddressSigner for CountingSigner {
        fn sign(&self, address: &Address, message: &[u8]) -> Result<Signature, SignerError> {
            let call = self.calls.get();
            self.calls.set(call + 1);
            if self.fail_on_call == Some(call) {
                return Err(SignerError::Backend("refused".into()));
            }
            self.inner.sign(address, message)
        }
    }

    /// A query that never answers.
    struct StalledQuery;

    #[async_trait]
    impl UnspentOutputQuery for StalledQuery {
        async fn unspent_outputs(
            &self,
            _address: &Ed25519Address,
        ) -> Result<Vec<(UtxoInput, Output)>, QueryError> {
            std::future::pending().await
        }
    }

    /// A query that always fails, and panics if reached when it must not be.
    struct FailingQuery {
        must_not_be_called: bool,
    }

    #[async_trait]
    impl UnspentOutputQuery for FailingQuery {
        async fn unspent_outputs(
            &self,
            _address: &Ed25519Address,
        ) -> Result<Vec<(UtxoInput, Output)>, QueryError> {
            assert!(!self.must_not_be_called, "query must not be issued");
            Err(QueryError::Unavailable("node offline".into()))
        }
    }

    fn keyring(seeds: &[u8]) -> (InMemoryAddressSigner, Vec<Address>) {
        let mut signer = InMemoryAddressSigner::new();
        let addresses = seeds
            .iter()
            .map(|s| signer.insert(NovaKeypair::from_seed(&[*s; 32])))
            .collect();
        (signer, addresses)
    }

    fn utxo(tx: u8, index: u16) -> UtxoInput {
        UtxoInput::new(TransactionId::new([tx; 32]), index)
    }

    fn payee() -> Address {
        Address::Ed25519(Ed25519Address::new([0xEE; 32]))
    }

    fn params() -> EncodingParameters {
        EncodingParameters::default()
    }

    fn block_shape(tx: &Transaction) -> Vec<Option<u16>> {
        tx.unlock_blocks
            .iter()
            .map(|b| match b {
                UnlockBlock::Signature(_) => None,
                UnlockBlock::Reference(r) => Some(r.reference),
            })
            .collect()
    }

    // -- Accumulation -------------------------------------------------------

    #[test]
    fn accumulation_preserves_insertion_order() {
        let (_, addrs) = keyring(&[1, 2]);
        let builder = TransactionBuilder::new()
            .add_input(addrs[0], utxo(3, 0))
            .add_input(addrs[1], utxo(1, 0))
            .add_output(Output::sig_locked_single(payee(), 10))
            .add_output(Output::sig_locked_single(addrs[0], 5));

        assert_eq!(builder.essence().inputs, vec![utxo(3, 0), utxo(1, 0)]);
        assert_eq!(builder.essence().outputs[1].amount(), 5);
        assert_eq!(builder.owner_of(&utxo(1, 0).id()), Some(&addrs[1]));
    }

    #[test]
    fn set_payload_last_write_wins() {
        let builder = TransactionBuilder::new()
            .set_payload(Indexation::new(b"first".to_vec(), Vec::new()))
            .set_payload(Indexation::new(b"second".to_vec(), Vec::new()));
        assert_eq!(
            builder.essence().payload,
            Some(Indexation::new(b"second".to_vec(), Vec::new()).into())
        );
    }

    // -- Build preconditions -----------------------------------------------

    #[test]
    fn missing_parameters() {
        let (signer, addrs) = keyring(&[1]);
        let signer = CountingSigner::new(signer);
        let err = TransactionBuilder::new()
            .add_input(addrs[0], utxo(1, 0))
            .build(None, Some(&signer))
            .unwrap_err();
        assert_eq!(err, BuilderError::MissingParameters);
        assert_eq!(signer.calls.get(), 0);
    }

    #[test]
    fn missing_signer() {
        let (_, addrs) = keyring(&[1]);
        let err = TransactionBuilder::new()
            .add_input(addrs[0], utxo(1, 0))
            .build(Some(&params()), None)
            .unwrap_err();
        assert_eq!(err, BuilderError::MissingSigner);
    }

    #[test]
    fn parameters_checked_before_signer() {
        let err = TransactionBuilder::new().build(None, None).unwrap_err();
        assert_eq!(err, BuilderError::MissingParameters);
    }

    // -- Unlock blocks through build ---------------------------------------

    #[test]
    fn scenario_x_y_x() {
        let (signer, addrs) = keyring(&[1, 2]);
        let signer = CountingSigner::new(signer);
        let tx = TransactionBuilder::new()
            .add_input(addrs[0], utxo(1, 0))
            .add_input(addrs[1], utxo(2, 0))
            .add_input(addrs[0], utxo(3, 0))
            .add_output(Output::sig_locked_single(payee(), 100))
            .build(Some(&params()), Some(&signer))
            .unwrap();

        assert_eq!(block_shape(&tx), vec![None, None, Some(0)]);
        assert_eq!(signer.calls.get(), 2);
    }

    #[test]
    fn single_owner_many_inputs() {
        let (signer, addrs) = keyring(&[4]);
        let mut builder = TransactionBuilder::new();
        for i in 0..10 {
            builder = builder.add_input(addrs[0], utxo(i + 1, 0));
        }
        let tx = builder
            .add_output(Output::sig_locked_single(payee(), 1))
            .build(Some(&params()), Some(&signer))
            .unwrap();

        let mut expected = vec![None];
        expected.extend(std::iter::repeat(Some(0)).take(9));
        assert_eq!(block_shape(&tx), expected);
    }

    #[test]
    fn k_distinct_owners_sign_at_first_appearance() {
        let (signer, addrs) = keyring(&[1, 2, 3]);
        let order = [1usize, 1, 0, 2, 0, 1, 2];
        let mut builder = TransactionBuilder::new();
        for (i, owner) in order.iter().enumerate() {
            builder = builder.add_input(addrs[*owner], utxo(i as u8 + 1, 0));
        }
        let tx = builder
            .add_output(Output::sig_locked_single(payee(), 1))
            .build(Some(&params()), Some(&signer))
            .unwrap();

        assert_eq!(
            block_shape(&tx),
            vec![None, Some(0), None, None, Some(2), Some(0), Some(3)]
        );
        assert_eq!(tx.unlock_blocks.len(), tx.essence.inputs.len());
    }

    #[test]
    fn empty_inputs_build_without_signing() {
        let (signer, _) = keyring(&[1]);
        let signer = CountingSigner::new(signer);
        let tx = TransactionBuilder::new()
            .build(Some(&params()), Some(&signer))
            .unwrap();
        assert!(tx.unlock_blocks.is_empty());
        assert_eq!(signer.calls.get(), 0);
    }

    #[test]
    fn signer_failure_on_second_address() {
        let (signer, addrs) = keyring(&[1, 2, 3]);
        let mut signer = CountingSigner::new(signer);
        signer.fail_on_call = Some(1);
        let err = TransactionBuilder::new()
            .add_input(addrs[0], utxo(1, 0))
            .add_input(addrs[1], utxo(2, 0))
            .add_input(addrs[2], utxo(3, 0))
            .add_output(Output::sig_locked_single(payee(), 1))
            .build(Some(&params()), Some(&signer))
            .unwrap_err();
        assert_eq!(
            err,
            BuilderError::SigningFailed(SignerError::Backend("refused".into()))
        );
        assert_eq!(signer.calls.get(), 2);
    }

    #[test]
    fn signing_message_is_idempotent() {
        let (_, addrs) = keyring(&[1, 2]);
        let make = || {
            TransactionBuilder::new()
                .add_input(addrs[0], utxo(1, 0))
                .add_input(addrs[1], utxo(2, 1))
                .add_output(Output::sig_locked_single(payee(), 7))
                .set_payload(Indexation::new(b"tag".to_vec(), b"data".to_vec()))
        };
        let a = make().essence().signing_message().unwrap();
        let b = make().essence().signing_message().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn validation_errors_propagate() {
        let (signer, addrs) = keyring(&[1]);
        let err = TransactionBuilder::new()
            .add_input(addrs[0], utxo(1, 0))
            .add_output(Output::sig_locked_single(payee(), 0))
            .build(Some(&params()), Some(&signer))
            .unwrap_err();
        assert_eq!(
            err,
            BuilderError::Validation(ValidationError::ZeroAmount { index: 0 })
        );
    }

    // -- Automated input discovery -----------------------------------------

    #[tokio::test]
    async fn query_adds_inputs_in_query_order() {
        let (signer, addrs) = keyring(&[1]);
        let source = InMemoryOutputSource::new();
        source.insert(utxo(9, 0), Output::sig_locked_single(addrs[0], 10));
        source.insert(utxo(2, 3), Output::sig_locked_single(addrs[0], 20));
        source.insert(utxo(5, 1), Output::sig_locked_single(payee(), 99));

        let builder = TransactionBuilder::new()
            .add_inputs_via_query(addrs[0], &source, None, None)
            .await;
        assert_eq!(builder.essence().inputs, vec![utxo(9, 0), utxo(2, 3)]);

        let tx = builder
            .add_output(Output::sig_locked_single(payee(), 30))
            .build(Some(&params()), Some(&signer))
            .unwrap();
        assert_eq!(block_shape(&tx), vec![None, Some(0)]);
    }

    #[tokio::test]
    async fn stateful_filter_stops_at_target() {
        let (_, addrs) = keyring(&[1]);
        let source = InMemoryOutputSource::new();
        for i in 0..5u8 {
            source.insert(utxo(i + 1, 0), Output::sig_locked_single(addrs[0], 40));
        }

        let target = 100u64;
        let mut collected = 0u64;
        let mut filter = |_: &UtxoInput, output: &Output| {
            if collected >= target {
                return false;
            }
            collected += output.amount();
            true
        };
        let builder = TransactionBuilder::new()
            .add_inputs_via_query(addrs[0], &source, Some(&mut filter), None)
            .await;

        assert_eq!(builder.essence().inputs.len(), 3);
        assert_eq!(collected, 120);
    }

    #[tokio::test]
    async fn unsupported_kind_is_sticky_and_skips_query() {
        let (signer, addrs) = keyring(&[1]);
        let signer = CountingSigner::new(signer);
        let alias = Address::Alias(AliasAddress::new([3; 32]));
        let query = FailingQuery {
            must_not_be_called: true,
        };

        let builder = TransactionBuilder::new()
            .add_inputs_via_query(alias, &query, None, None)
            .await
            .add_input(addrs[0], utxo(1, 0));
        // Accumulation after the error is a no-op.
        assert!(builder.essence().inputs.is_empty());

        let err = builder.build(Some(&params()), Some(&signer)).unwrap_err();
        assert_eq!(
            err,
            BuilderError::UnsupportedAddressKind {
                kind: AddressKind::Alias
            }
        );
        assert_eq!(signer.calls.get(), 0);
    }

    #[tokio::test]
    async fn query_failure_is_network_error() {
        let (_, addrs) = keyring(&[1]);
        let query = FailingQuery {
            must_not_be_called: false,
        };
        let builder = TransactionBuilder::new()
            .add_input(addrs[0], utxo(1, 0))
            .add_inputs_via_query(addrs[0], &query, None, None)
            .await;

        assert_eq!(builder.essence().inputs, vec![utxo(1, 0)]);
        assert_eq!(
            builder.build(Some(&params()), None).unwrap_err(),
            BuilderError::Network(QueryError::Unavailable("node offline".into()))
        );
    }

    #[tokio::test]
    async fn first_error_wins() {
        let (_, addrs) = keyring(&[1]);
        let alias = Address::Alias(AliasAddress::new([3; 32]));
        let query = FailingQuery {
            must_not_be_called: true,
        };
        let builder = TransactionBuilder::new()
            .add_inputs_via_query(alias, &query, None, None)
            .await
            .add_inputs_via_query(addrs[0], &query, None, None)
            .await;
        assert!(matches!(
            builder.error(),
            Some(BuilderError::UnsupportedAddressKind { .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_query_times_out() {
        let (_, addrs) = keyring(&[1]);
        let builder = TransactionBuilder::with_config(BuilderConfig {
            query_timeout: Duration::from_secs(2),
        })
        .add_inputs_via_query(addrs[0], &StalledQuery, None, None)
        .await;

        assert_eq!(
            builder.error(),
            Some(&BuilderError::Network(QueryError::Timeout { timeout_ms: 2_000 }))
        );
        assert!(builder.essence().inputs.is_empty());
    }

    #[test]
    fn timeout_millis_saturate() {
        assert_eq!(millis(Duration::from_secs(2)), 2_000);
        assert_eq!(millis(Duration::MAX), u64::MAX);
    }

    #[tokio::test]
    async fn cancellation_signal_aborts_query() {
        let (_, addrs) = keyring(&[1]);
        let (tx, rx) = watch::channel(false);
        let cancel = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            let _ = tx.send(true);
            tx
        });

        let builder = TransactionBuilder::new()
            .add_inputs_via_query(addrs[0], &StalledQuery, None, Some(rx))
            .await;
        let _sender = cancel.await.unwrap();

        assert_eq!(
            builder.error(),
            Some(&BuilderError::Network(QueryError::Cancelled))
        );
    }

    #[tokio::test]
    async fn already_cancelled_signal_skips_results() {
        let (_, addrs) = keyring(&[1]);
        let source = InMemoryOutputSource::new();
        source.insert(utxo(1, 0), Output::sig_locked_single(addrs[0], 10));
        let (_tx, rx) = watch::channel(true);

        let builder = TransactionBuilder::new()
            .add_inputs_via_query(addrs[0], &source, None, Some(rx))
            .await;
        assert!(builder.essence().inputs.is_empty());
        assert_eq!(
            builder.error(),
            Some(&BuilderError::Network(QueryError::Cancelled))
        );
    }

    #[tokio::test]
    async fn dropped_cancel_sender_never_cancels() {
        let (_, addrs) = keyring(&[1]);
        let source = InMemoryOutputSource::new();
        source.insert(utxo(1, 0), Output::sig_locked_single(addrs[0], 10));
        let (tx, rx) = watch::channel(false);
        drop(tx);

        let builder = TransactionBuilder::new()
            .add_inputs_via_query(addrs[0], &source, None, Some(rx))
            .await;
        assert!(builder.error().is_none());
        assert_eq!(builder.essence().inputs.len(), 1);
    }

    // -- Message handoff ----------------------------------------------------

    #[test]
    fn swap_invokes_hook_and_forwards_transaction() {
        let (signer, addrs) = keyring(&[1]);
        let mut seen = None;
        let mut hook = |tx: &Transaction| seen = Some(tx.id().unwrap());
        let message = TransactionBuilder::new()
            .add_input(addrs[0], utxo(1, 0))
            .add_output(Output::sig_locked_single(payee(), 1))
            .build_and_swap_to_message_builder(Some(&params()), Some(&signer), Some(&mut hook))
            .parent(crate::message::MessageId::new([1; 32]))
            .build()
            .unwrap();

        let payload = message.payload.as_ref().unwrap();
        assert_eq!(seen, Some(payload.id().unwrap()));
        assert_eq!(message.network_id, params().network_id);
    }

    #[test]
    fn swap_forwards_build_error() {
        let mut called = false;
        let mut hook = |_: &Transaction| called = true;
        let err = TransactionBuilder::new()
            .build_and_swap_to_message_builder(Some(&params()), None, Some(&mut hook))
            .parent(crate::message::MessageId::new([1; 32]))
            .build()
            .unwrap_err();
        assert_eq!(err, BuilderError::MissingSigner);
        assert!(!called);
    }
}
