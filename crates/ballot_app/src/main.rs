mod commands;
mod shell;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::BufReader;
use tracing::{error, info, warn};

use ballot_backend::HttpBackend;
use ballot_chain::{ContractArtifact, EthersChainClient, Network, RpcConfigStore};
use ballot_core::config::BallotConfig;
use ballot_core::{classify_error, logging};
use ballot_ui::DashboardService;

use crate::commands::CommandTable;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Tokenized ballot dashboard
#[derive(Parser, Debug)]
#[command(name = "ballot", author, version, about, long_about = None)]
struct Args {
    /// Config file path (defaults to ~/.ballot/config.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Network: mainnet, goerli, sepolia or localhost
    #[arg(long)]
    network: Option<String>,

    /// JSON-RPC endpoint overriding the network default
    #[arg(long)]
    rpc_url: Option<String>,

    /// Faucet backend base URL
    #[arg(long)]
    backend_url: Option<String>,

    /// Log level (RUST_LOG takes precedence)
    #[arg(long)]
    log_level: Option<String>,
}

// ---------------------------------------------------------------------------
// Bootstrap
// ---------------------------------------------------------------------------

/// Config file, then `BALLOT_*` environment, then command-line flags.
fn load_config(args: &Args) -> Result<BallotConfig> {
    let mut config = match &args.config {
        Some(path) => BallotConfig::load_from_path(path)?,
        None => BallotConfig::load()?,
    };
    config.apply_env_overrides();

    if let Some(network) = &args.network {
        config.network = network.clone();
    }
    if let Some(rpc_url) = &args.rpc_url {
        config.rpc_url = Some(rpc_url.clone());
    }
    if let Some(backend_url) = &args.backend_url {
        config.backend_url = backend_url.clone();
    }
    if let Some(level) = &args.log_level {
        config.log_level = level.clone();
    }

    config.validate()?;
    Ok(config)
}

/// Build the dashboard and its chain and backend clients from config.
fn build_service(config: &BallotConfig) -> Result<DashboardService> {
    let network: Network = config
        .network
        .parse()
        .with_context(|| format!("config: unsupported network `{}`", config.network))?;
    if network == Network::Mainnet {
        warn!("connected to mainnet: transactions spend real ether");
    }

    let mut rpc_store = RpcConfigStore::with_defaults();
    rpc_store.set_timeout_secs(config.request_timeout_secs);
    let rpc = rpc_store
        .resolve(network, config.rpc_url.as_deref())
        .context("config: invalid rpc_url")?;

    let token = ContractArtifact::token(config.token_abi_path.as_deref())
        .context("loading token ABI")?;
    let ballot = ContractArtifact::ballot(config.ballot_abi_path.as_deref())
        .context("loading ballot ABI")?;

    let chain = EthersChainClient::new(&rpc, token, ballot)?;
    let backend = HttpBackend::new(
        &config.backend_url,
        Duration::from_secs(config.request_timeout_secs),
    )
    .context("config: invalid backend_url")?;
    info!(backend = %backend.base_url(), "faucet backend configured");

    Ok(DashboardService::new(
        Arc::new(chain),
        Arc::new(backend),
        config.max_proposals,
    ))
}

async fn run(args: Args) -> Result<()> {
    let config = load_config(&args)?;
    let _log_guard = logging::init_logging(&config.log_level)?;
    info!("Starting ballot v{VERSION} on {}", config.network);

    let mut service = build_service(&config)?;
    let table = CommandTable::new();
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();

    shell::run(&mut service, &table, stdin, &mut stdout).await
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let classified = classify_error(&e);
            error!(
                category = ?classified.category,
                severity = ?classified.severity,
                "fatal: {e:#}"
            );
            eprintln!("{}\n  {e:#}", classified.user_message);
            ExitCode::FAILURE
        }
    }
}
