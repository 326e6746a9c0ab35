//! # Protocol Configuration & Constants
//!
//! Every magic number the transaction builder relies on lives here. The
//! limits below are the ones the encoder enforces when it validates a
//! finished transaction; the builder itself never checks them, it only
//! hands them through.
//!
//! [`EncodingParameters`] is the bundle of limits a caller passes to
//! `TransactionBuilder::build`. It derives `serde` so operators can keep
//! one JSON file per network next to their keys.

use std::time::Duration;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Network Identifiers
// ---------------------------------------------------------------------------

/// Mainnet. Mistakes here cost real money.
pub const NETWORK_ID_MAINNET: u64 = 0x4E4F5641; // "NOVA"

/// Testnet.
pub const NETWORK_ID_TESTNET: u64 = 0x4E4F5654; // "NOVT"

/// Devnet. Reset weekly, no promises.
pub const NETWORK_ID_DEVNET: u64 = 0x4E4F5644; // "NOVD"

/// Bech32 human-readable prefix for addresses on every network.
pub const ADDRESS_HRP: &str = "nova";

// ---------------------------------------------------------------------------
// Transaction Limits
// ---------------------------------------------------------------------------

/// Maximum number of inputs a single transaction may spend.
pub const MAX_INPUTS_COUNT: usize = 127;

/// Maximum number of outputs a single transaction may create.
pub const MAX_OUTPUTS_COUNT: usize = 127;

/// Output indices must stay strictly below this bound.
pub const MAX_OUTPUT_INDEX: u16 = 127;

/// Total number of base units in existence. No output, and no sum of
/// outputs, may exceed it.
pub const TOKEN_SUPPLY: u64 = 2_779_530_283_277_761;

/// Maximum length of an indexation payload's index, in bytes.
pub const MAX_INDEX_LENGTH: usize = 64;

/// Maximum length of an indexation payload's data, in bytes.
pub const MAX_INDEXATION_DATA_LENGTH: usize = 32 * 1024;

// ---------------------------------------------------------------------------
// Message Limits
// ---------------------------------------------------------------------------

/// A message must reference at least one and at most this many parents.
pub const MAX_PARENTS: usize = 8;

// ---------------------------------------------------------------------------
// Timing
// ---------------------------------------------------------------------------

/// How long the builder waits for the unspent-output query before giving
/// up and recording a timeout on its sticky error slot.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// EncodingParameters
// ---------------------------------------------------------------------------

/// Limits applied by the encode-and-validate step of a build.
///
/// `Default` yields the mainnet rule set. Individual fields can be
/// tightened for tests or private networks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodingParameters {
    /// Network the transaction is meant for. Not encoded into the
    /// transaction itself; carried so the message stage can reuse it.
    pub network_id: u64,
    pub max_inputs: usize,
    pub max_outputs: usize,
    pub max_output_index: u16,
    pub token_supply: u64,
    pub max_index_length: usize,
    pub max_indexation_data_length: usize,
}

impl Default for EncodingParameters {
    fn default() -> Self {
        Self {
            network_id: NETWORK_ID_MAINNET,
            max_inputs: MAX_INPUTS_COUNT,
            max_outputs: MAX_OUTPUTS_COUNT,
            max_output_index: MAX_OUTPUT_INDEX,
            token_supply: TOKEN_SUPPLY,
            max_index_length: MAX_INDEX_LENGTH,
            max_indexation_data_length: MAX_INDEXATION_DATA_LENGTH,
        }
    }
}

impl EncodingParameters {
    /// Mainnet limits. Same as `Default`.
    pub fn mainnet() -> Self {
        Self::default()
    }

    /// Testnet limits: identical rules, different network id.
    pub fn testnet() -> Self {
        Self {
            network_id: NETWORK_ID_TESTNET,
            ..Self::default()
        }
    }

    /// Devnet limits: identical rules, different network id.
    pub fn devnet() -> Self {
        Self {
            network_id: NETWORK_ID_DEVNET,
            ..Self::default()
        }
    }

    /// Parses parameters from JSON. Missing fields fall back to mainnet
    /// values, so `{}` is a valid document.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

// ---------------------------------------------------------------------------
// BuilderConfig
// ---------------------------------------------------------------------------

/// Knobs for the transaction builder that are not protocol rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuilderConfig {
    /// Upper bound on a single unspent-output query.
    pub query_timeout: Duration,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }
}

/// Returns a friendly name for a network ID, mainly for logging.
pub fn network_name(network_id: u64) -> String {
    match network_id {
        NETWORK_ID_MAINNET => "mainnet".to_string(),
        NETWORK_ID_TESTNET => "testnet".to_string(),
        NETWORK_ID_DEVNET => "devnet".to_string(),
        other => format!("unknown(0x{:08X})", other),
    }
}
