//! `todos-server` -- in-memory REST backend for the `todos` client.
//!
//! # Usage
//!
//! ```bash
//! # Run on the default address 127.0.0.1:8080
//! cargo run --bin todos-server
//!
//! # Slow every request down to watch busy markers in the client
//! cargo run --bin todos-server -- --latency-ms 800
//! ```

use std::sync::Arc;

use clap::Parser;
use todos_server::config::{ServerCliArgs, ServerConfig};
use todos_server::server::{self, ServerState};
use todos_server::store::TodoStore;

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

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(
        addr = %config.bind_addr,
        latency_ms = config.latency.as_millis(),
        "starting todos server"
    );

    let state = Arc::new(ServerState::with_config(
        TodoStore::new(),
        config.latency,
        config.max_title_len,
    ));

    match server::start_server_with_state(&config.bind_addr, state).await {
        Ok((bound_addr, handle)) => {
            tracing::info!(addr = %bound_addr, "todos server listening");
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "todos server task failed");
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to start todos server");
            std::process::exit(1);
        }
    }
}
