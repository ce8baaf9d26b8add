//! metrics-agent - samples runtime statistics and pushes them to a
//! metrics server
//!
//! Usage:
//!     metrics-agent [-a host:port] [-p poll_seconds] [-r report_seconds]
//!
//! See --help for more options.

use anyhow::{Context, Result};
use clap::Parser;
use rustmetrics::agent::{Agent, CountingAllocator};
use rustmetrics::config::{resolve_agent_config, AgentConfig, LogFormat, Overrides};
use rustmetrics::util::{init_logging, ShutdownSignal};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info};

#[global_allocator]
static GLOBAL: CountingAllocator = CountingAllocator;

/// Samples runtime statistics and pushes them to a metrics server.
#[derive(Parser, Debug)]
#[command(name = "metrics-agent")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Server address, host:port [default: localhost:8080]
    #[arg(short, long, env = "ADDRESS", value_name = "HOST:PORT")]
    address: Option<String>,

    /// Poll interval in seconds [default: 2]
    #[arg(short, long, env = "POLL_INTERVAL", value_name = "SECONDS")]
    poll_interval: Option<u64>,

    /// Report interval in seconds [default: 10]
    #[arg(short, long, env = "REPORT_INTERVAL", value_name = "SECONDS")]
    report_interval: Option<u64>,

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
        poll_interval: cli.poll_interval.map(Duration::from_secs),
        report_interval: cli.report_interval.map(Duration::from_secs),
        log_level: cli.log_level,
        log_format: cli.log_format,
    };

    // A bad address must stop the agent before it contacts anything.
    let config = match resolve_agent_config(cli.config.as_deref(), &overrides) {
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
        println!("  Server address: {}", config.address);
        println!("  Poll interval: {}", humantime::format_duration(config.poll_interval));
        println!("  Report interval: {}", humantime::format_duration(config.report_interval));
        return Ok(());
    }

    run(config)
}

/// Run the agent with the given configuration.
fn run(config: AgentConfig) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    runtime.block_on(async { run_async(config).await });
    Ok(())
}

async fn run_async(config: AgentConfig) {
    let shutdown = ShutdownSignal::new();
    let agent = Agent::new(config.address, config.poll_interval, config.report_interval);

    let handle = {
        let shutdown = shutdown.clone();
        tokio::spawn(async move { agent.run(&shutdown).await })
    };

    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            info!("received shutdown signal");
        }
        Err(e) => {
            // Without a signal handler the process runs until killed.
            error!(error = %e, "failed to listen for shutdown signal");
            let _ = handle.await;
            return;
        }
    }

    shutdown.shutdown();
    let _ = handle.await;
}
