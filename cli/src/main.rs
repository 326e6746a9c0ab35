// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # NOVA Transaction Builder CLI
//!
//! Entry point for the `nova-txb` binary. Parses CLI arguments,
//! initializes logging and runs one subcommand:
//!
//! - `build`   : build and sign a transaction from a JSON plan
//! - `keygen`  : generate a seed and print its address
//! - `version` : print build version information

mod cli;
mod logging;
mod plan;

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tokio::sync::watch;

use nova_tx_builder::address::{Address, Ed25519Address};
use nova_tx_builder::config::{
    network_name, BuilderConfig, EncodingParameters, ADDRESS_HRP, NETWORK_ID_MAINNET,
};
use nova_tx_builder::crypto::keys::NovaKeypair;

use cli::{Commands, NovaTxbCli};
use logging::LogFormat;
use plan::BuildPlan;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = NovaTxbCli::parse();

    match cli.command {
        Commands::Build(args) => build_transaction(args).await,
        Commands::Keygen(args) => keygen(args),
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

/// Builds, signs and validates the transaction a plan describes, then
/// prints it as JSON on stdout.
async fn build_transaction(args: cli::BuildArgs) -> Result<()> {
    logging::init_logging(
        "nova_txb=info,nova_tx_builder=info",
        LogFormat::from_str_lossy(&args.log_format),
    );

    let params = load_params(&args)?;
    tracing::info!(
        plan = %args.plan.display(),
        network = %network_name(params.network_id),
        "building transaction"
    );

    let plan_json = std::fs::read_to_string(&args.plan)
        .with_context(|| format!("failed to read plan {}", args.plan.display()))?;
    let plan = BuildPlan::from_json(&plan_json)?;
    let signer = plan.signer()?;
    let source = plan.output_source();

    // Ctrl+C cancels any in-flight unspent-output query.
    let (cancel_tx, cancel_rx) = watch::channel(false);
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, cancelling");
            let _ = cancel_tx.send(true);
        }
    });

    let config = BuilderConfig {
        query_timeout: Duration::from_secs(args.query_timeout_secs),
    };
    let transaction = plan
        .to_builder(config, &source, Some(cancel_rx))
        .await
        .build(Some(&params), Some(&signer))
        .context("failed to build transaction")?;

    let encoded = transaction
        .encode(true, &params)
        .context("failed to encode transaction")?;
    let id = transaction.id().context("failed to compute transaction id")?;

    let report = serde_json::json!({
        "transaction_id": id,
        "transaction": transaction,
        "encoded": hex::encode(&encoded),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    tracing::info!(id = %id, size = encoded.len(), "done");
    Ok(())
}

/// Parameters from `--params` when given, else the `--network` defaults.
fn load_params(args: &cli::BuildArgs) -> Result<EncodingParameters> {
    if let Some(path) = &args.params {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read parameters {}", path.display()))?;
        return EncodingParameters::from_json(&json)
            .with_context(|| format!("invalid parameters in {}", path.display()));
    }
    match args.network.to_lowercase().as_str() {
        "mainnet" => Ok(EncodingParameters::mainnet()),
        "testnet" => Ok(EncodingParameters::testnet()),
        "devnet" => Ok(EncodingParameters::devnet()),
        other => anyhow::bail!("unknown network '{other}': expected mainnet, testnet or devnet"),
    }
}

/// Generates a fresh keypair and prints its seed and address.
fn keygen(args: cli::KeygenArgs) -> Result<()> {
    logging::init_logging("nova_txb=info", LogFormat::from_str_lossy(&args.log_format));

    let keypair = NovaKeypair::generate();
    let address = Address::Ed25519(Ed25519Address::from_public_key(&keypair.public_key()));
    let bech32 = address
        .to_bech32(ADDRESS_HRP)
        .context("failed to encode address")?;

    tracing::info!(address = %bech32, "keypair generated");

    println!("Seed (keep secret) : {}", hex::encode(keypair.secret_key_bytes()));
    println!("Public key         : {}", keypair.public_key().to_hex());
    println!("Address            : {}", bech32);

    Ok(())
}

fn print_version() {
    println!("nova-txb {}", env!("CARGO_PKG_VERSION"));
    println!("network  {}", network_name(NETWORK_ID_MAINNET));
    println!("rustc    {}", rustc_version());
}

/// Returns the Rust compiler version used to build this binary.
fn rustc_version() -> &'static str {
    option_env!("RUSTC_VERSION").unwrap_or("unknown")
}
