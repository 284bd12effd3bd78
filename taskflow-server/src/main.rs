//! `TaskFlow` server -- in-memory task API.
//!
//! An axum HTTP server exposing list/create/update/delete over a task
//! collection held in process memory. Tasks do not survive a restart.
//!
//! # Usage
//!
//! ```bash
//! # Run on default address 127.0.0.1:3000
//! cargo run --bin taskflow-server
//!
//! # Run on custom address
//! cargo run --bin taskflow-server -- --bind 0.0.0.0:8080
//!
//! # Or via environment variable
//! TASKFLOW_ADDR=0.0.0.0:8080 cargo run --bin taskflow-server
//! ```

use std::sync::Arc;

use clap::Parser;
use taskflow_server::api::{self, AppState};
use taskflow_server::config::{ServerCliArgs, ServerConfig};

#[tokio::main]
async fn main() {
    let cli = ServerCliArgs::parse();

    let config = match ServerConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            std::process::exit(1);
        }
    };

    // Initialize tracing with the resolved log level.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(addr = %config.bind_addr, "starting taskflow server");

    let state = Arc::new(AppState::new());

    match api::start_server_with_state(&config.bind_addr.to_string(), state).await {
        Ok((bound_addr, handle)) => {
            tracing::info!(addr = %bound_addr, "task server listening");
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "task server task failed");
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to start task server");
            std::process::exit(1);
        }
    }
}
