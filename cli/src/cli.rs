//! # CLI Interface
//!
//! Defines the command-line argument structure for `nova-txb` using
//! `clap` derive. Supports three subcommands: `build`, `keygen` and
//! `version`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// NOVA transaction builder.
///
/// Assembles and signs UTXO transactions offline from a JSON build plan,
/// printing the transaction, its encoding and its id.
#[derive(Parser, Debug)]
#[command(
    name = "nova-txb",
    about = "NOVA offline transaction builder",
    version,
    propagate_version = true
)]
pub struct NovaTxbCli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the builder binary.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build and sign a transaction from a plan file.
    Build(BuildArgs),
    /// Generate a fresh Ed25519 seed and print its address.
    Keygen(KeygenArgs),
    /// Print version information and exit.
    Version,
}

/// Arguments for the `build` subcommand.
#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// Path to the build plan (JSON): seeds, inputs, outputs, payload.
    #[arg(long, short = 'p', env = "NOVA_TXB_PLAN")]
    pub plan: PathBuf,

    /// Path to an encoding-parameters file (JSON).
    ///
    /// Missing fields fall back to the defaults of `--network`.
    #[arg(long, env = "NOVA_TXB_PARAMS")]
    pub params: Option<PathBuf>,

    /// Network whose limits apply when no parameters file is given:
    /// mainnet, testnet, or devnet.
    #[arg(long, default_value = "mainnet")]
    pub network: String,

    /// Upper bound, in seconds, on each unspent-output query.
    #[arg(long, env = "NOVA_TXB_QUERY_TIMEOUT", default_value_t = 30)]
    pub query_timeout_secs: u64,

    /// Log output format: pretty or json.
    #[arg(long, env = "NOVA_LOG_FORMAT", default_value = "pretty")]
    pub log_format: String,
}

/// Arguments for the `keygen` subcommand.
#[derive(Parser, Debug)]
pub struct KeygenArgs {
    /// Log output format: pretty or json.
    #[arg(long, env = "NOVA_LOG_FORMAT", default_value = "pretty")]
    pub log_format: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        // Ensures the derive macros produce a valid CLI definition.
        NovaTxbCli::command().debug_assert();
    }

    #[test]
    fn build_defaults() {
        let cli = NovaTxbCli::parse_from(["nova-txb", "build", "--plan", "plan.json"]);
        match cli.command {
            Commands::Build(args) => {
                assert_eq!(args.plan, PathBuf::from("plan.json"));
                assert!(args.params.is_none());
                assert_eq!(args.network, "mainnet");
                assert_eq!(args.query_timeout_secs, 30);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
