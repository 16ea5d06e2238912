//! Grid proxy server.
//!
//! # Architecture Overview
//!
//! ```text
//!                          ┌──────────────────────────────────────────────┐
//!                          │                  GRID PROXY                  │
//!     Browser request      │  ┌──────────┐   ┌──────────┐   ┌──────────┐  │
//!     ─────────────────────┼─▶│   http   │──▶│ routing  │──▶│ upstream │──┼──▶ Coda API
//!                          │  │  server  │   │  path    │   │  client  │  │    (rows, forms)
//!     JSON + CORS          │  └──────────┘   └──────────┘   └────┬─────┘  │
//!     ◀────────────────────┼───────────────────────────────────────┘       │
//!                          │                                              │
//!                          │  config · security · observability · lifecycle│
//!                          └──────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use grid_proxy::lifecycle::signals::wait_for_signal;
use grid_proxy::lifecycle::startup::prepare;
use grid_proxy::observability::{logging, metrics};
use grid_proxy::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "grid-proxy", version)]
#[command(about = "CORS-enabled JSON proxy for hosted document tables", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let prepared = prepare(args.config.as_deref(), args.bind)?;
    let config = prepared.config;

    logging::init_logging(&config.observability);
    tracing::info!("grid-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        api_base = %config.upstream.api_base,
        max_pages = config.upstream.max_pages,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = HttpServer::new(config, prepared.credential)?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move { wait_for_signal(&shutdown).await });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
