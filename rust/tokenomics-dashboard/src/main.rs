//! Tokenomics Dashboard
//!
//! HTTP front-end over the tokenomics core: live projections, genesis file
//! generation and local network initialization.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  TOKENOMICS DASHBOARD                       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  POST /api/projection  ──► projection engine (inline)       │
//! │  POST /api/genesis     ──► template patch, file lock held   │
//! │  POST /api/bootstrap   ──► init script, file lock held      │
//! │  GET  /metrics         ──► action counters                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokenomics_core::config::DEFAULT_CONFIG_FILE;
use tokenomics_core::{ConfiguratorConfig, ScriptInvoker};
use tracing::{error, info};

mod api;

use api::{ApiState, Metrics};

/// Tokenomics Dashboard - HTTP front-end for the tokenomics configurator
#[derive(Parser, Debug)]
#[command(name = "tokenomics-dashboard")]
#[command(author = "Tokenomics Configurator Contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "HTTP dashboard for tokenomics projections and genesis generation", long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE, env = "TOKENOMICS_CONFIG")]
    config: PathBuf,

    /// Listen address (overrides the config file)
    #[arg(short, long)]
    listen: Option<String>,

    /// Allow cross-origin requests from any origin
    #[arg(long)]
    cors: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "TOKENOMICS_LOG")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.clone().into()),
        )
        .init();

    info!("📊 Tokenomics Dashboard v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration, then apply CLI overrides
    let config = ConfiguratorConfig::load_or_default(&args.config)?.with_listen_addr(args.listen);
    config.validate()?;

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid listen address {}: {}", config.listen_addr, e))?;

    info!("⚙️  Configuration:");
    info!("   Template: {}", config.template_path.display());
    info!("   Output: {}", config.output_path.display());
    info!("   Init script: {} {}", config.shell, config.init_script.display());
    info!("   Env file: {}", config.env_path.display());

    let invoker = ScriptInvoker::new(config.shell.clone(), &config.init_script, &config.env_path);
    let state = Arc::new(ApiState::new(
        Arc::new(config),
        Arc::new(invoker),
        Arc::new(Metrics::new()),
    ));

    let api_handle = tokio::spawn(api::run_api_server(state, addr, args.cors));

    info!("   Press Ctrl+C to shutdown");

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("🛑 Shutdown signal received");
        }
        result = api_handle => {
            match result {
                Ok(Err(e)) => {
                    error!("HTTP API exited: {}", e);
                    return Err(e);
                }
                other => error!("HTTP API exited: {:?}", other),
            }
        }
    }

    info!("👋 Tokenomics Dashboard shutting down");
    Ok(())
}
