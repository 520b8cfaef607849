//! chatrelay binary entry point.
//!
//! Usage:
//! ```bash
//! chatrelay --config chatrelay.toml
//! chatrelay -a 0.0.0.0 -p 8080
//! chatrelay --help
//! ```

use anyhow::{Context, Result};
use chatrelay_server::http::{self, health};
use chatrelay_server::maintenance::spawn_maintenance_task;
use chatrelay_server::{ChatRelay, Config};
use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Config file picked up from the working directory when `--config` is absent.
const DEFAULT_CONFIG_FILE: &str = "chatrelay.toml";

/// In-memory message relay with cursor-based polling.
#[derive(Parser, Debug)]
#[command(name = "chatrelay")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Address to bind to (overrides server.bind_address)
    #[arg(long, short)]
    address: Option<IpAddr>,

    /// Port to listen on (overrides server.bind_address)
    #[arg(long, short)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let bind = resolve_bind_address(&config.server.bind_address, args.address, args.port)?;

    tracing::info!("Starting chatrelay v{}", env!("CARGO_PKG_VERSION"));
    health::init_start_time();

    let relay = Arc::new(ChatRelay::new(config.clone()));
    let maintenance =
        spawn_maintenance_task(relay.rate_limits().clone(), config.maintenance.clone());

    let listener = TcpListener::bind(bind)
        .await
        .with_context(|| format!("Unable to listen on {bind}"))?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    let result = http::serve(relay, listener, shutdown_signal()).await;
    maintenance.abort();
    result.context("HTTP server failed")?;

    tracing::info!("chatrelay stopped");
    Ok(())
}

/// Load configuration from `path`, or from `chatrelay.toml` if present, or defaults.
fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Ok(Config::from_file(path)?),
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            Ok(Config::from_file(Path::new(DEFAULT_CONFIG_FILE))?)
        }
        None => Ok(Config::default()),
    }
}

/// Apply `--address` / `--port` on top of the configured bind address.
fn resolve_bind_address(
    configured: &str,
    address: Option<IpAddr>,
    port: Option<u16>,
) -> Result<SocketAddr> {
    let mut bind: SocketAddr = configured
        .parse()
        .with_context(|| format!("Invalid server.bind_address {configured:?}"))?;
    if let Some(ip) = address {
        bind.set_ip(ip);
    }
    if let Some(port) = port {
        bind.set_port(port);
    }
    Ok(bind)
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => tracing::error!("Unable to listen for shutdown signal: {}", e),
    }
}
