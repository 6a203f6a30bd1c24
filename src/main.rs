//! MindSpace · Stress Assessment Backend
//!
//! - Axum HTTP + WebSocket API for sampling and scoring stress quizzes
//! - Built-in 50-question bank, tiers overridable through TOML
//!
//! Important env variables:
//!   PORT                    : u16 (default 3000)
//!   ASSESSMENT_CONFIG_PATH  : path to TOML config (quiz settings + optional tiers)
//!   LOG_LEVEL               : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT              : "pretty" (default) or "json"

mod telemetry;
mod error;
mod domain;
mod config;
mod bank;
mod assessment;
mod state;
mod protocol;
mod routes;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::config::load_config_from_env;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Config, bank and tier coverage are all checked here; any fault aborts startup.
  let state = load_config_from_env()
    .map_err(error::StartupError::from)
    .and_then(AppState::new)
    .map_err(|e| {
      error!(target: "mindspace_backend", error = %e, "Startup self-check failed");
      e
    })?;
  let state = Arc::new(state);

  let app = build_router(state);

  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "mindspace_backend", %addr, "HTTP server listening");
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;
  info!(target: "mindspace_backend", "Server stopped");
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    error!(target: "mindspace_backend", error = %e, "Failed to listen for shutdown signal");
    std::future::pending::<()>().await;
  }
  info!(target: "mindspace_backend", "Shutdown signal received");
}
