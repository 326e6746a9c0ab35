//! # Build Plans
//!
//! A build plan is the JSON document `nova-txb build` consumes. It lists
//! the seeds that may sign, explicit inputs, an optional local set of
//! unspent outputs to discover inputs from, the outputs to create and an
//! optional indexation payload:
//!
//! ```json
//! {
//!   "seeds": ["<64 hex chars>"],
//!   "inputs": [{ "address": "nova1...", "transaction_id": "<hex>", "output_index": 0 }],
//!   "utxos": [{ "address": "nova1...", "transaction_id": "<hex>", "output_index": 1, "amount": 500 }],
//!   "discover": [{ "address": "nova1...", "target_amount": 400 }],
//!   "outputs": [{ "address": "nova1...", "amount": 900 }],
//!   "indexation": { "index": "invoice", "data": "#42" }
//! }
//! ```
//!
//! Explicit inputs are added first, in order, then each `discover` entry
//! pulls from `utxos` until its target is covered (all of the address's
//! outputs without a target).

use anyhow::{Context, Result};
use serde::Deserialize;
use tokio::sync::watch;
use tracing::info;

use nova_tx_builder::address::Address;
use nova_tx_builder::config::BuilderConfig;
use nova_tx_builder::crypto::keys::NovaKeypair;
use nova_tx_builder::transaction::{
    InMemoryAddressSigner, InMemoryOutputSource, Indexation, Output, TransactionBuilder, UtxoInput,
};

#[derive(Debug, Clone, Deserialize)]
pub struct BuildPlan {
    /// Hex-encoded 32-byte Ed25519 seeds.
    pub seeds: Vec<String>,
    #[serde(default)]
    pub inputs: Vec<PlanInput>,
    #[serde(default)]
    pub utxos: Vec<PlanUtxo>,
    #[serde(default)]
    pub discover: Vec<PlanDiscovery>,
    pub outputs: Vec<PlanOutput>,
    #[serde(default)]
    pub indexation: Option<PlanIndexation>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlanInput {
    pub address: Address,
    #[serde(flatten)]
    pub input: UtxoInput,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlanUtxo {
    pub address: Address,
    #[serde(flatten)]
    pub input: UtxoInput,
    pub amount: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlanDiscovery {
    pub address: Address,
    /// Stop admitting outputs once this much is covered.
    #[serde(default)]
    pub target_amount: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlanOutput {
    pub address: Address,
    pub amount: u64,
}

/// Index and data as UTF-8 text.
#[derive(Debug, Clone, Deserialize)]
pub struct PlanIndexation {
    pub index: String,
    #[serde(default)]
    pub data: String,
}

impl BuildPlan {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("invalid build plan")
    }

    /// A signer holding every seed in the plan.
    pub fn signer(&self) -> Result<InMemoryAddressSigner> {
        let mut signer = InMemoryAddressSigner::new();
        for (i, seed) in self.seeds.iter().enumerate() {
            let keypair =
                NovaKeypair::from_hex(seed).with_context(|| format!("invalid seed #{i}"))?;
            signer.insert(keypair);
        }
        Ok(signer)
    }

    /// The plan's `utxos` as a queryable source.
    pub fn output_source(&self) -> InMemoryOutputSource {
        let source = InMemoryOutputSource::new();
        for utxo in &self.utxos {
            source.insert(utxo.input, Output::sig_locked_single(utxo.address, utxo.amount));
        }
        source
    }

    /// Replays the plan onto a fresh builder.
    ///
    /// Discovery errors stay in the builder's sticky slot and surface
    /// from `build`, like any other accumulation error.
    pub async fn to_builder(
        &self,
        config: BuilderConfig,
        source: &InMemoryOutputSource,
        cancel: Option<watch::Receiver<bool>>,
    ) -> TransactionBuilder {
        let mut builder = TransactionBuilder::with_config(config);

        for entry in &self.inputs {
            builder = builder.add_input(entry.address, entry.input);
        }

        for discovery in &self.discover {
            let before = builder.essence().inputs.len();
            builder = match discovery.target_amount {
                Some(target) => {
                    let mut covered = 0u64;
                    let mut until_target = |_: &UtxoInput, output: &Output| {
                        if covered >= target {
                            return false;
                        }
                        covered = covered.saturating_add(output.amount());
                        true
                    };
                    builder
                        .add_inputs_via_query(
                            discovery.address,
                            source,
                            Some(&mut until_target),
                            cancel.clone(),
                        )
                        .await
                }
                None => {
                    builder
                        .add_inputs_via_query(discovery.address, source, None, cancel.clone())
                        .await
                }
            };
            info!(
                address = %discovery.address,
                admitted = builder.essence().inputs.len() - before,
                "discovered inputs"
            );
        }

        for output in &self.outputs {
            builder = builder.add_output(Output::sig_locked_single(output.address, output.amount));
        }

        if let Some(indexation) = &self.indexation {
            builder = builder.set_payload(Indexation::new(
                indexation.index.as_bytes(),
                indexation.data.as_bytes(),
            ));
        }

        builder
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nova_tx_builder::address::Ed25519Address;
    use nova_tx_builder::config::EncodingParameters;
    use nova_tx_builder::transaction::{TransactionId, UnlockBlock};

    const SEED: &str = "0101010101010101010101010101010101010101010101010101010101010101";

    fn owner() -> Address {
        let kp = NovaKeypair::from_hex(SEED).unwrap();
        Address::Ed25519(Ed25519Address::from_public_key(&kp.public_key()))
    }

    fn payee() -> Address {
        Address::Ed25519(Ed25519Address::new([0xEE; 32]))
    }

    fn plan_json() -> String {
        serde_json::json!({
            "seeds": [SEED],
            "inputs": [
                { "address": owner(), "transaction_id": "aa".repeat(32), "output_index": 0 }
            ],
            "utxos": [
                { "address": owner(), "transaction_id": "01".repeat(32), "output_index": 0, "amount": 100 },
                { "address": owner(), "transaction_id": "02".repeat(32), "output_index": 0, "amount": 100 },
                { "address": owner(), "transaction_id": "03".repeat(32), "output_index": 0, "amount": 100 }
            ],
            "discover": [ { "address": owner(), "target_amount": 150 } ],
            "outputs": [ { "address": payee(), "amount": 250 } ],
            "indexation": { "index": "invoice", "data": "#42" }
        })
        .to_string()
    }

    #[test]
    fn parses_plan() {
        let plan = BuildPlan::from_json(&plan_json()).unwrap();
        assert_eq!(plan.seeds.len(), 1);
        assert_eq!(plan.inputs[0].input.transaction_id, TransactionId::new([0xAA; 32]));
        assert_eq!(plan.utxos.len(), 3);
        assert_eq!(plan.discover[0].target_amount, Some(150));
        assert_eq!(plan.output_source().balance(&owner()), 300);
    }

    #[test]
    fn optional_sections_default_to_empty() {
        let json = serde_json::json!({ "seeds": [], "outputs": [] }).to_string();
        let plan = BuildPlan::from_json(&json).unwrap();
        assert!(plan.inputs.is_empty() && plan.discover.is_empty());
        assert!(plan.indexation.is_none());
    }

    #[test]
    fn bad_seed_is_reported() {
        let json = serde_json::json!({ "seeds": ["zz"], "outputs": [] }).to_string();
        let plan = BuildPlan::from_json(&json).unwrap();
        let err = plan.signer().unwrap_err();
        assert!(err.to_string().contains("invalid seed #0"));
    }

    #[tokio::test]
    async fn replays_plan_and_builds() {
        let plan = BuildPlan::from_json(&plan_json()).unwrap();
        let source = plan.output_source();
        let builder = plan
            .to_builder(BuilderConfig::default(), &source, None)
            .await;

        // One explicit input, then two discovered ones cover 150.
        assert_eq!(builder.essence().inputs.len(), 3);

        let signer = plan.signer().unwrap();
        let tx = builder
            .build(Some(&EncodingParameters::default()), Some(&signer))
            .unwrap();
        assert!(tx.unlock_blocks[0].is_signature());
        assert!(matches!(tx.unlock_blocks[1], UnlockBlock::Reference(ref r) if r.reference == 0));
        assert!(tx.essence.payload.is_some());
    }
}
