//! Kiln service CLI
//!
//! Runs the compile-and-execute sandbox behind an HTTP API, checks the host
//! toolchain, or writes a starter configuration file.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use kiln::{Sandbox, ToolchainStatus, install_hint};
use tracing::{Level, debug, info};
use tracing_subscriber::EnvFilter;

use crate::api::AppState;
use crate::config::{EXAMPLE_CONFIG, ServerConfig};

mod api;
mod config;
mod report;

#[derive(Parser)]
#[command(name = "kiln")]
#[command(about = "A sandboxed compile-and-execute service for untrusted C code")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP service
    Serve {
        /// Address to listen on (overrides the config file)
        #[arg(short, long)]
        bind: Option<SocketAddr>,
    },

    /// Probe for the configured compiler and report what was found
    Check,

    /// Initialize a new configuration file
    Init {
        /// Output path
        #[arg(short, long, default_value = "kiln.toml")]
        output: PathBuf,

        /// Overwrite existing file
        #[arg(short, long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = if let Some(ref path) = cli.config {
        info!(?path, "loading configuration");
        ServerConfig::from_file(path).context("failed to load configuration")?
    } else {
        debug!("using default configuration");
        ServerConfig::default()
    };

    match cli.command {
        Commands::Serve { bind } => run_serve(config, bind).await,
        Commands::Check => run_check(config).await,
        Commands::Init { output, force } => init_config(&output, force).await,
    }
}

async fn run_serve(config: ServerConfig, bind_override: Option<SocketAddr>) -> Result<()> {
    let addr = bind_override.unwrap_or(config.server.bind);
    let max_concurrency = config.server.max_concurrency;

    let sandbox = Sandbox::new(config.sandbox);

    // Early probe so a misconfigured host shows up in the logs at startup
    // rather than on the first request; a missing compiler is not fatal
    match sandbox.toolchain_status().await {
        ToolchainStatus::Available(toolchain) => {
            info!(path = %toolchain.path.display(), version = %toolchain.version, "toolchain ready");
        }
        ToolchainStatus::Missing => {
            tracing::warn!(hint = install_hint(), "no toolchain found, requests will fail");
        }
    }

    let state = AppState::new(sandbox, max_concurrency);

    info!(%addr, max_concurrency, "starting kiln service");
    api::serve(state, addr, shutdown_signal())
        .await
        .context("server error")?;

    info!("shutdown complete");
    Ok(())
}

async fn run_check(config: ServerConfig) -> Result<()> {
    let sandbox = Sandbox::new(config.sandbox);

    match sandbox.toolchain_status().await {
        ToolchainStatus::Available(toolchain) => {
            println!("Toolchain available");
            println!("  Path:    {}", toolchain.path.display());
            println!("  Version: {}", toolchain.version);
            Ok(())
        }
        ToolchainStatus::Missing => {
            eprintln!("No responsive C compiler found.");
            eprintln!("{}", install_hint());
            std::process::exit(1);
        }
    }
}

async fn init_config(output: &PathBuf, force: bool) -> Result<()> {
    if output.exists() && !force {
        anyhow::bail!(
            "Configuration file already exists at '{}'. Use --force to overwrite.",
            output.display()
        );
    }

    tokio::fs::write(output, EXAMPLE_CONFIG)
        .await
        .context("failed to write configuration file")?;

    println!("Created configuration file at '{}'", output.display());
    Ok(())
}

/// Resolve on SIGINT or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("shutdown signal received");
}
