// CLI for the token launchpad
//
// Gathers the launch form from the command line, uses a local keypair as the
// connected wallet and reports the outcome of the launch.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use solana_sdk::signature::{read_keypair_file, Keypair};
use solana_sdk::signer::Signer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use launchpad::{
    hosts, GistHost, ImgBbHost, KeypairWallet, LaunchConfig, LaunchRequest, LaunchWorkflow,
    MetadataPublisher, RpcLedger,
};

#[derive(Parser)]
#[command(name = "launchpad")]
#[command(about = "Launch a Token-2022 token with on-chain metadata", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "launchpad.toml")]
    config: PathBuf,

    /// Override log level
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload the image, publish metadata and create the token
    Launch(LaunchCmd),
}

#[derive(Args)]
struct LaunchCmd {
    /// Token name
    #[arg(long)]
    name: String,

    /// Token symbol, at most 8 bytes
    #[arg(long)]
    symbol: String,

    /// Path to the token image
    #[arg(long)]
    image: PathBuf,

    /// Initial supply in whole tokens
    #[arg(long)]
    supply: u64,

    /// Path to wallet keypair file
    #[arg(long, default_value = "~/.config/solana/id.json")]
    keypair: String,

    /// Validate configuration and input, then exit
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = LaunchConfig::load(&cli.config)?;
    if let Some(log_level) = cli.log_level {
        config.monitoring.log_level = log_level;
    }
    init_logging(&config);

    match cli.command {
        Commands::Launch(cmd) => launch(cmd, config).await,
    }
}

fn init_logging(config: &LaunchConfig) {
    let log_level = config
        .monitoring
        .log_level
        .parse()
        .unwrap_or(tracing::Level::INFO);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("launchpad={}", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Load a keypair from a file path, expanding ~ if needed
fn load_keypair(path: &str) -> Result<Keypair> {
    let expanded_path = if path.starts_with('~') {
        let home = std::env::var("HOME").context("HOME environment variable not set")?;
        path.replacen('~', &home, 1)
    } else {
        path.to_string()
    };

    read_keypair_file(&expanded_path)
        .map_err(|e| anyhow::anyhow!("Wallet not connected: failed to load keypair from {}: {}", expanded_path, e))
}

async fn launch(cmd: LaunchCmd, config: LaunchConfig) -> Result<()> {
    config.validate()?;

    let wallet = load_keypair(&cmd.keypair)?;
    let image = tokio::fs::read(&cmd.image)
        .await
        .with_context(|| format!("Failed to read image {}", cmd.image.display()))?;
    let request = LaunchRequest::new(cmd.name, cmd.symbol, image, cmd.supply)?;

    info!("Wallet: {}", wallet.pubkey());
    info!("RPC URL: {}", config.ledger.rpc_url);

    if cmd.dry_run {
        println!("[OK] Configuration and launch request are valid");
        println!("[INFO] Wallet: {}", wallet.pubkey());
        return Ok(());
    }

    let http = hosts::http_client(config.http.timeout())?;
    let image_host = ImgBbHost::new(
        http.clone(),
        config.image_host.endpoint.clone(),
        config.image_host.api_key.clone(),
    );
    let document_host = GistHost::new(
        http,
        config.document_host.endpoint.clone(),
        config.document_host.token.clone(),
        config.document_host.description.clone(),
        config.document_host.public,
    );
    let ledger = RpcLedger::new(&config.ledger.rpc_url, config.ledger.commitment_config()?)
        .with_confirmation(config.ledger.await_confirmation);

    let metadata = MetadataPublisher::new(Arc::new(document_host))
        .with_description(config.token.description.clone())
        .with_file_name(config.document_host.file_name.clone());
    let workflow = LaunchWorkflow::new(
        Arc::new(image_host),
        metadata,
        Arc::new(ledger),
        Arc::new(KeypairWallet::new(wallet)),
    );

    let report = workflow.launch(&request).await;
    if !report.outcome.is_complete() {
        eprintln!("[ERROR] {}", report.outcome.notification());
        bail!("launch stopped at stage: {}", report.outcome.stage());
    }

    println!("[OK] {}", report.outcome.notification());
    if let Some(receipt) = report.outcome.receipt() {
        println!("  mint:               {}", receipt.mint);
        println!("  associated account: {}", receipt.associated_account);
        println!("  image:              {}", receipt.image_url);
        println!("  metadata:           {}", receipt.metadata_uri);
        println!("  minted base units:  {}", receipt.minted_base_units);
        println!("  mint tx:            {}", receipt.mint_signature);
        println!("  account tx:         {}", receipt.associated_account_signature);
        println!("  mint-to tx:         {}", receipt.mint_to_signature);
    }
    Ok(())
}
