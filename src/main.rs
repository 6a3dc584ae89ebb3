//! reslib server: session-scoped resource leasing over HTTP.
//!
//! Loads configuration, initialises logging and hands over to
//! [`reslib_api::run_server`].

use std::fs::{File, OpenOptions};
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, fmt};

use reslib_core::config::AppConfig;
use reslib_core::error::AppError;

#[tokio::main]
async fn main() {
    let config = match AppConfig::load_from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = init_logging(&config) {
        eprintln!("Failed to initialise logging: {}", e);
        std::process::exit(1);
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        ttl_hours = config.session.ttl_hours,
        "Starting reslib"
    );

    if let Err(e) = reslib_api::run_server(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Initialize tracing. `RUST_LOG` overrides the configured level.
fn init_logging(config: &AppConfig) -> Result<(), AppError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    let json = config.logging.format == "json";

    match &config.logging.file {
        Some(path) => {
            let file = open_log_file(path)?;
            let builder = fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file));
            if json {
                builder.json().with_target(true).init();
            } else {
                builder.with_target(true).init();
            }
        }
        None if json => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        None => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }

    Ok(())
}

fn open_log_file(path: &str) -> Result<File, AppError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| AppError::configuration(format!("Cannot open log file '{}': {}", path, e)))
}
