//! Host supervisor entry point.
//!
//! # Startup Order
//!
//! ```text
//!   config ──▶ logging ──▶ preflight ──▶ data layout ──▶ supervisor ──▶ signals ──▶ run
//!   (file)     (stdout)    (env+socket)  (mkdir)                        (TERM/HUP/INT)
//! ```
//!
//! Preflight and layout failures exit with status 1. A signal that cannot be
//! bound is only a warning.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tokio::runtime::Handle;

use host_supervisor::config::validation::validate_config;
use host_supervisor::config::{
    load_config, ConfigError, EnvironmentConfig, PathsConfig, SupervisorConfig,
};
use host_supervisor::lifecycle::{
    check_environment, ensure_layout, register_shutdown, Preflight, TokioEventLoop,
};
use host_supervisor::observability::configure_logging;
use host_supervisor::Supervisor;

#[derive(Parser)]
#[command(name = "host-supervisor")]
#[command(about = "Host supervisor for Home Assistant add-ons", long_about = None)]
struct Cli {
    /// Optional TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Derive every data directory from this root instead of the configured paths.
    #[arg(long)]
    data_root: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match load_config(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => SupervisorConfig::default(),
    };
    if let Some(root) = &cli.data_root {
        config.paths = PathsConfig::under(root);
        if let Err(errors) = validate_config(&config) {
            eprintln!("{}", ConfigError::Validation(errors));
            return ExitCode::FAILURE;
        }
    }

    if let Err(e) = configure_logging(&config.logging) {
        eprintln!("Failed to initialize logging: {}", e);
        return ExitCode::FAILURE;
    }

    tracing::info!("host-supervisor v{} starting", env!("CARGO_PKG_VERSION"));

    let ready = if config.environment == EnvironmentConfig::default() {
        check_environment()
    } else {
        Preflight::new(&config.environment).check()
    };
    if !ready {
        return ExitCode::FAILURE;
    }

    let config = match ensure_layout(config) {
        Ok(config) => Arc::new(config),
        Err(e) => {
            tracing::error!(error = %e, "Failed to prepare data directories");
            return ExitCode::FAILURE;
        }
    };

    let supervisor = Arc::new(Supervisor::new(config));
    tracing::info!(
        config = %supervisor.config().paths.config.display(),
        backup = %supervisor.config().paths.backup.display(),
        shutdown_timeout_secs = supervisor.config().shutdown.timeout_secs,
        "Data layout ready"
    );

    let bound = register_shutdown(&TokioEventLoop::new(Handle::current()), &supervisor);
    tracing::info!(signals = ?bound, "Shutdown signals registered");

    supervisor.run().await;

    tracing::info!("Shutdown complete");
    ExitCode::SUCCESS
}
