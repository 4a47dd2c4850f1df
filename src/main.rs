//! chain-ops command line.
//!
//! ```text
//! chain-ops [--config PATH] decode <payload>
//! chain-ops [--config PATH] sign <payload>          (key from CHAIN_OPS_PRIVATE_KEY)
//! chain-ops [--config PATH] status <hash>
//! chain-ops [--config PATH] wait <hash> [--interval-ms N] [--timeout-secs N]
//! chain-ops [--config PATH] units <amount> --asset ID --network ID
//! ```

use alloy::primitives::U256;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use chain_ops::blockchain::{parse_tx_hash, BlockchainClient, LocalSigner, TransactionSigner};
use chain_ops::config::{load_config, EngineConfig};
use chain_ops::lifecycle::OperationTracker;
use chain_ops::observability::logging::init_logging;
use chain_ops::operation::AmountNormalizer;
use chain_ops::payload;

#[derive(Parser)]
#[command(name = "chain-ops")]
#[command(about = "Decode, sign and track on-chain operations", long_about = None)]
struct Cli {
    /// TOML configuration file; defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode an unsigned payload and print its fields
    Decode { payload: String },
    /// Sign an unsigned payload with the key in CHAIN_OPS_PRIVATE_KEY
    Sign { payload: String },
    /// Resolve the lifecycle state of a transaction
    Status { hash: String },
    /// Block until a transaction reaches a terminal state
    Wait {
        hash: String,
        #[arg(long)]
        interval_ms: Option<u64>,
        #[arg(long)]
        timeout_secs: Option<u64>,
    },
    /// Convert an atomic amount to display units
    Units {
        amount: String,
        #[arg(long)]
        asset: String,
        #[arg(long)]
        network: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => EngineConfig::default(),
    };
    init_logging(&config.observability)?;

    match cli.command {
        Commands::Decode { payload } => {
            let tx = payload::decode(&payload)?;
            println!("{}", serde_json::to_string_pretty(&tx)?);
        }
        Commands::Sign { payload } => {
            let signer = LocalSigner::from_env()?;
            let tx = payload::decode(&payload)?;
            let signed = signer.sign(&tx).await?;
            println!("signer: {}", signer.address());
            println!("hash:   {}", signed.hash);
            println!("raw:    {}", signed.raw);
        }
        Commands::Status { hash } => {
            let hash = parse_tx_hash(&hash)?;
            let tracker = tracker(&config).await?;
            let state = tracker.resolve_hash(hash).await?;
            println!("{}", state);
        }
        Commands::Wait {
            hash,
            interval_ms,
            timeout_secs,
        } => {
            let hash = parse_tx_hash(&hash)?;
            let tracker = tracker(&config).await?;
            let state = tracker
                .wait_for_hash(
                    &hash.to_string(),
                    hash,
                    interval_ms.map(Duration::from_millis),
                    timeout_secs.map(Duration::from_secs),
                )
                .await?;
            println!("{}", state);
        }
        Commands::Units {
            amount,
            asset,
            network,
        } => {
            let amount = U256::from_str_radix(amount.trim(), 10)?;
            let normalizer = AmountNormalizer::new(&config.networks);
            println!("{}", normalizer.to_display_units(&network, &asset, amount));
        }
    }

    Ok(())
}

async fn tracker(
    config: &EngineConfig,
) -> Result<OperationTracker<BlockchainClient>, Box<dyn std::error::Error>> {
    let client = BlockchainClient::new(config.blockchain.clone()).await?;
    tracing::info!(
        rpc_url = %config.blockchain.rpc_url,
        chain_id = config.blockchain.chain_id,
        "Connected to RPC"
    );
    Ok(OperationTracker::<BlockchainClient>::builder()
        .data_source(client)
        .config(config)
        .build()?)
}
