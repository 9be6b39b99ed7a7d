//! Sealdrop - envelope-encrypted file sharing from the command line

use clap::Parser;
use sealdrop_cli::{commands, open_backends, CliConfig, Command, TerminalPassword};
use sealdrop_client::{Identity, Session};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "sealdrop")]
#[command(about = "Envelope-encrypted file storage and sharing over IPFS")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Identity to act as
    #[arg(short, long, global = true, env = "SEALDROP_IDENTITY")]
    identity: Option<Identity>,

    /// Config file (defaults to ./sealdrop.toml when present)
    #[arg(short, long, global = true, env = "SEALDROP_CONFIG")]
    config: Option<PathBuf>,

    /// Directory for the local ledger and key store
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// IPFS API URL
    #[arg(long, global = true)]
    ipfs_url: Option<String>,

    /// Use in-memory storage (for testing, data will not persist)
    #[arg(long, global = true)]
    memory: bool,

    /// Enable debug logging
    #[arg(short, long, global = true, env = "SEALDROP_DEBUG")]
    debug: bool,
}

async fn run(args: Args) -> sealdrop_cli::Result<()> {
    let mut config = CliConfig::load(args.config.as_deref())?;
    if let Some(data_dir) = args.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(ipfs_url) = args.ipfs_url {
        config.ipfs_url = ipfs_url;
    }
    config.use_memory_store |= args.memory;

    let identity = commands::require_identity(args.identity)?;
    let backends = open_backends(&config).await?;
    let session = Session::new(
        identity,
        backends,
        Arc::new(TerminalPassword),
        config.client_config(),
    )?;

    commands::run(args.command, &session).await
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Logs go to stderr; stdout carries command output
    let log_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("sealdrop_cli={0},sealdrop_client={0},sealdrop_core={0}", log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()?;

    if let Err(e) = run(args).await {
        let status = e.exit_status();
        tracing::debug!(status = status.as_str(), "command failed");
        eprintln!("error: {}", e);
        std::process::exit(status.code());
    }
    Ok(())
}
