//! metrics-server - in-memory metrics server
//!
//! Usage:
//!     metrics-server [-a host:port]
//!
//! See --help for more options.

use anyhow::{Context, Result};
use clap::Parser;
use rustmetrics::config::{resolve_server_config, LogFormat, Overrides, ServerConfig};
use rustmetrics::server::MetricsServer;
use rustmetrics::storage::{MemStorage, Storage};
use rustmetrics::util::{init_logging, ShutdownSignal};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

/// In-memory metrics server accepting gauge and counter updates.
#[derive(Parser, Debug)]
#[command(name = "metrics-server")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Listen address, host:port [default: localhost:8080]
    #[arg(short, long, env = "ADDRESS", value_name = "HOST:PORT")]
    address: Option<String>,

    /// Path to a YAML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error)
    #[arg(short, long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Override log format
    #[arg(long, value_enum, value_name = "FORMAT")]
    log_format: Option<LogFormat>,

    /// Validate configuration and exit
    #[arg(long)]
    validate: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let overrides = Overrides {
        address: cli.address,
        log_level: cli.log_level,
        log_format: cli.log_format,
        ..Overrides::default()
    };

    let config = match resolve_server_config(cli.config.as_deref(), &overrides) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config.log);

    if cli.validate {
        info!("Configuration is valid");
        println!("Configuration is valid.");
        println!("  Listen address: {}", config.address);
        return Ok(());
    }

    run(config)
}

/// Run the server with the given configuration.
fn run(config: ServerConfig) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    runtime.block_on(async { run_async(config).await })
}

async fn run_async(config: ServerConfig) -> Result<()> {
    let shutdown = ShutdownSignal::new();
    let storage: Arc<dyn Storage> = Arc::new(MemStorage::new());

    let server = MetricsServer::bind(&config.address, storage)
        .await
        .with_context(|| format!("failed to bind metrics server on {}", config.address))?;

    let handle = tokio::spawn(server.run(shutdown.subscribe()));

    info!(address = %config.address, "metrics server is running");
    info!("press Ctrl+C to stop");

    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            info!("received shutdown signal");
        }
        Err(e) => {
            // Without a signal handler the process runs until killed.
            error!(error = %e, "failed to listen for shutdown signal");
            let _ = handle.await;
            return Ok(());
        }
    }

    shutdown.shutdown();
    let _ = handle.await;

    info!("metrics server stopped");
    Ok(())
}
