mod status_cmd;

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use pairline_config::schema::ServerConfig;
use pairline_config::PairlineConfig;
use pairline_gateway::{start_server, GatewayState, Lobby, LobbyPolicy, TracingModerationSink};

#[derive(Parser)]
#[command(name = "pairline")]
#[command(about = "Pairline: random one-to-one video chat matchmaking gateway")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the matchmaking gateway
    Serve {
        /// Port to bind the HTTP/WebSocket server to
        #[arg(short, long)]
        port: Option<u16>,
        /// Address to bind to
        #[arg(short, long)]
        bind: Option<String>,
        /// Config file (defaults to ~/.pairline/config.yaml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Query a running gateway's health endpoint
    Status {
        #[arg(short, long, default_value_t = pairline_config::defaults::DEFAULT_PORT)]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, bind, config } => {
            let path = config.unwrap_or_else(|| {
                pairline_config::config_file_path(&pairline_config::config_dir())
            });
            let config = load_with_overrides(&path, port, bind).await?;
            run_server(config).await?;
        }
        Commands::Status { port } => status_cmd::run(port).await?,
    }

    Ok(())
}

/// Flags win over the file; validation runs on the merged result.
async fn load_with_overrides(path: &Path, port: Option<u16>, bind: Option<String>) -> Result<PairlineConfig> {
    let mut raw = pairline_config::load_config(path).await?;
    if port.is_some() || bind.is_some() {
        let server = raw.server.get_or_insert_with(ServerConfig::default);
        if port.is_some() {
            server.port = port;
        }
        if bind.is_some() {
            server.bind = bind;
        }
    }
    pairline_config::prepare(raw)
}

async fn run_server(config: PairlineConfig) -> Result<()> {
    pairline_logging::init_logger(
        config.log_level(),
        config.log_dir().map(Path::new),
        config.log_json(),
    );

    let addr: SocketAddr = format!("{}:{}", config.bind(), config.port())
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", config.bind(), config.port()))?;

    let policy = LobbyPolicy::from(&config);
    info!(
        %addr,
        requeue_survivor = policy.requeue_survivor,
        report_cooldown_secs = policy.report_cooldown.as_secs(),
        "Starting Pairline gateway"
    );

    let lobby = Lobby::new(policy, Arc::new(TracingModerationSink)).into_shared();
    start_server(addr, GatewayState::new(lobby)).await
}
