//! `atlas`: drive an Atlas coordinator from the command line.
//!
//! Each invocation loads the world from the state file, runs one command and
//! saves the world again if the command changed it.

use std::path::PathBuf;

use anyhow::Context;
use atlas_compute::{ComputeJob, JobPayload};
use atlas_crypto::NodeWallet;
use atlas_node::{Coordinator, NodeConfig};
use atlas_store::{JsonFileStore, StateStore};
use atlas_types::{PublicKey, TokenAmount, TxHash};
use atlas_utils::{init_logging, LogFormat};
use clap::Parser;

#[derive(Parser)]
#[command(name = "atlas", about = "Atlas energy ledger", version)]
struct Cli {
    /// Path to a TOML configuration file. CLI flags and env vars override
    /// its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// File the world is loaded from and saved to.
    #[arg(long, env = "ATLAS_STATE_FILE")]
    state_file: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "ATLAS_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "ATLAS_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Register a node.
    CreateNode { node_id: String },

    /// Report produced energy.
    SubmitEnergy {
        node_id: String,
        amount_kwh: f64,
        source_id: String,
        /// Hex Ed25519 private key to sign the transaction with.
        #[arg(long)]
        private_key: Option<String>,
    },

    /// Add confirmations to the current tips.
    Confirm {
        #[arg(long, default_value_t = 1)]
        times: u32,
    },

    /// Mint tokens for confirmed contributions.
    Mint,

    /// Queue a compute job.
    SubmitJob {
        job_id: String,
        node_id: String,
        /// Exact decimal, at most six fractional digits.
        token_cost: TokenAmount,
        /// JSON object handed to the job.
        #[arg(long, default_value = "{}")]
        payload: String,
    },

    /// Run the oldest queued job.
    ExecuteJob,

    /// Show token balances.
    Balances,

    /// Show aggregate statistics.
    State,

    /// List registered nodes.
    Nodes,

    /// Delete the state file.
    ClearState,

    /// Check a stored transaction's signature against a public key.
    VerifyTx {
        hash: TxHash,
        /// Hex Ed25519 public key.
        public_key: String,
    },

    /// Print a node wallet, new or derived from a private key.
    Wallet {
        #[arg(long)]
        private_key: Option<String>,
    },
}

impl Command {
    fn mutates(&self) -> bool {
        matches!(
            self,
            Command::CreateNode { .. }
                | Command::SubmitEnergy { .. }
                | Command::Confirm { .. }
                | Command::Mint
                | Command::SubmitJob { .. }
                | Command::ExecuteJob
        )
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<NodeConfig> {
    let mut config = match &cli.config {
        Some(path) => NodeConfig::from_toml_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => NodeConfig::default(),
    };
    if let Some(path) = &cli.state_file {
        config.state_file = path.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    Ok(config)
}

fn parse_key(hex_key: &str) -> anyhow::Result<NodeWallet> {
    let bytes = hex::decode(hex_key.trim()).context("private key is not hex")?;
    let seed: [u8; 32] = bytes
        .try_into()
        .map_err(|b: Vec<u8>| anyhow::anyhow!("private key must be 32 bytes, got {}", b.len()))?;
    Ok(NodeWallet::from_seed(&seed))
}

fn parse_public_key(hex_key: &str) -> anyhow::Result<PublicKey> {
    let bytes = hex::decode(hex_key.trim()).context("public key is not hex")?;
    let key: [u8; 32] = bytes
        .try_into()
        .map_err(|b: Vec<u8>| anyhow::anyhow!("public key must be 32 bytes, got {}", b.len()))?;
    Ok(PublicKey(key))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_logging(config.log_format, &config.log_level)?;

    let store = JsonFileStore::new(&config.state_file);
    tracing::debug!(state_file = %config.state_file.display(), "using state file");

    match &cli.command {
        Command::ClearState => {
            if store.clear()? {
                println!("Removed {}", config.state_file.display());
            } else {
                println!("No state at {}", config.state_file.display());
            }
            return Ok(());
        }
        Command::Wallet { private_key } => {
            let wallet = match private_key {
                Some(key) => parse_key(key)?,
                None => NodeWallet::generate(),
            };
            println!("address:     {}", wallet.address());
            println!("public key:  {}", hex::encode(wallet.public_key().as_bytes()));
            println!("private key: {}", hex::encode(wallet.private_key().0));
            return Ok(());
        }
        _ => {}
    }

    let mut coordinator = Coordinator::from_config(&config);
    coordinator
        .load(&store)
        .with_context(|| format!("loading state from {}", config.state_file.display()))?;

    let mutates = cli.command.mutates();
    run(&mut coordinator, cli.command)?;

    if mutates {
        coordinator
            .save(&store)
            .with_context(|| format!("saving state to {}", config.state_file.display()))?;
    }
    Ok(())
}

fn run(c: &mut Coordinator, command: Command) -> anyhow::Result<()> {
    match command {
        Command::CreateNode { node_id } => {
            if c.register_node(node_id.as_str())? {
                println!("Node {node_id} created");
            } else {
                println!("Node {node_id} already exists");
            }
        }
        Command::SubmitEnergy {
            node_id,
            amount_kwh,
            source_id,
            private_key,
        } => {
            let hash = match private_key {
                Some(key) => {
                    let wallet = parse_key(&key)?;
                    c.submit_signed_energy(&wallet, node_id.as_str(), amount_kwh, &source_id)?
                }
                None => c.submit_energy(node_id.as_str(), amount_kwh, &source_id)?,
            };
            println!("Transaction {hash}");
        }
        Command::Confirm { times } => {
            for _ in 0..times {
                let touched = c.confirm_tick();
                println!("Confirmed {touched} tip(s)");
            }
        }
        Command::Mint => {
            let minted = c.process_minting();
            for contribution in &minted {
                println!(
                    "Minted {} kWh for {} ({})",
                    contribution.amount_kwh,
                    contribution.node_id,
                    contribution.transaction_hash.short(16)
                );
            }
            println!("{} contribution(s) minted", minted.len());
        }
        Command::SubmitJob {
            job_id,
            node_id,
            token_cost,
            payload,
        } => {
            let payload: JobPayload =
                serde_json::from_str(&payload).context("payload must be a JSON object")?;
            let job = ComputeJob::new(job_id.as_str(), node_id.as_str(), token_cost, payload);
            if c.submit_compute_job(job) {
                println!("Job {job_id} queued ({} in queue)", c.queue_length());
            } else {
                println!("Job {job_id} refused");
            }
        }
        Command::ExecuteJob => match c.execute_next_job() {
            Ok(result) => println!("{}", serde_json::to_string_pretty(&result)?),
            Err(err) => println!("{{\"error\": \"{}\"}}", err.code()),
        },
        Command::Balances => {
            if c.balances().is_empty() {
                println!("No balances");
            }
            for (node, amount) in c.balances() {
                println!("{node}: {amount}");
            }
            println!("Total supply: {}", c.total_supply());
        }
        Command::State => println!("{}", c.stats()),
        Command::VerifyTx { hash, public_key } => {
            let public = parse_public_key(&public_key)?;
            let Some(tx) = c.transaction(&hash) else {
                anyhow::bail!("no transaction {hash}");
            };
            if tx.is_signed_by(&public)? {
                println!("Signature valid");
            } else if tx.signature().is_none() {
                println!("Transaction is unsigned");
            } else {
                println!("Signature does not match");
            }
        }
        Command::Nodes => {
            for node in c.nodes() {
                println!("{node}  balance {}", c.balance(node));
            }
        }
        // Stateless; handled before the world is loaded.
        Command::ClearState | Command::Wallet { .. } => {}
    }
    Ok(())
}
