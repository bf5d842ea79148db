// CLI tool for the token sale program
//
// Each command reads identities from an environment file, submits one
// transaction, validates the sale account afterwards and writes any newly
// created identities back to the same file.

mod commands;

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use token_sale_sdk::{env_store::keys, parse_commitment, EnvStore, SdkConfig};

use commands::CommandContext;

#[derive(Parser)]
#[command(name = "token-sale")]
#[command(about = "Token sale CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Environment file holding identities shared between commands
    #[arg(long, global = true, default_value = ".env")]
    env_file: PathBuf,

    /// RPC URL to connect to (falls back to RPC_URL in the env file, then devnet)
    #[arg(long, global = true, env = "RPC_URL")]
    rpc_url: Option<String>,

    /// Commitment for confirmation and reads
    #[arg(long, global = true, default_value = "confirmed")]
    commitment: String,

    /// Seconds to wait for a sent transaction to confirm
    #[arg(long, global = true, default_value_t = 60)]
    confirm_timeout_secs: u64,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the escrow and sale accounts and start the sale
    StartSale(commands::start_sale::StartSaleCmd),

    /// Airdrop tokens from the escrow to the buyer
    Airdrop(commands::airdrop::AirdropCmd),

    /// Decode and print the sale account
    Show(commands::show::ShowCmd),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if cli.verbose { "debug" } else { "info" }),
    )
    .init();

    let env = EnvStore::load(&cli.env_file)
        .with_context(|| format!("Failed to load {}", cli.env_file.display()))?;

    let mut config = SdkConfig::devnet()
        .with_commitment(parse_commitment(&cli.commitment)?)
        .with_confirm_timeout(Duration::from_secs(cli.confirm_timeout_secs));
    if let Some(url) = cli.rpc_url.clone().or_else(|| env.get(keys::RPC_URL)) {
        config = config.with_rpc_url(url);
    }

    log::info!("RPC URL: {}", config.rpc_url);
    log::debug!("Environment file: {}", env.path().display());

    let mut ctx = CommandContext { env, config };

    match cli.command {
        Commands::StartSale(cmd) => commands::start_sale::execute(cmd, &mut ctx).await,
        Commands::Airdrop(cmd) => commands::airdrop::execute(cmd, &ctx).await,
        Commands::Show(cmd) => commands::show::execute(cmd, &ctx).await,
    }
}
