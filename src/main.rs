//! Radix router service.
//!
//! Serves a route table declared in TOML.
//!
//! # Architecture Overview
//!
//! ```text
//!     config.toml ──▶ config (load, validate, build) ──▶ SharedRouter
//!          │                                                 ▲
//!          └── watcher (notify) ── rebuilt Router ───────────┘ publish
//!
//!     Client ──▶ http server (request id, trace, timeout)
//!                   └─▶ dispatch: SharedRouter snapshot → Tree::find
//!                          ├─ Found            → run handler chain
//!                          ├─ NotFound         → 404 JSON
//!                          └─ MethodNotAllowed → 405 JSON
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use radix_router::config::{build_router, load_config, ConfigWatcher, RouterConfig};
use radix_router::http::HttpServer;
use radix_router::lifecycle::{shutdown_signal, Shutdown};
use radix_router::observability::{init_logging, init_metrics};

#[derive(Parser)]
#[command(name = "radix-router")]
#[command(about = "Serve a radix-tree route table declared in TOML", long_about = None)]
struct Args {
    /// Route table to serve. Without it the defaults are used and no routes exist.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Rebuild and republish the route table whenever the file changes.
    #[arg(short, long, requires = "config")]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => RouterConfig::default(),
    };

    init_logging(&config.observability)?;

    tracing::info!("radix-router v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        config = ?args.config,
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let router = build_router(&config)?;

    let (_watcher, updates) = match args.config.as_deref().filter(|_| args.watch) {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (Some(watcher.run()?), updates)
        }
        None => {
            let (_, updates) = mpsc::unbounded_channel();
            (None, updates)
        }
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown.trigger();
    });

    let server = HttpServer::new(config, router);
    server.run(listener, updates, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
