//! SuperLearn · learning assistant backend
//!
//! One binary plays both roles of the demo:
//! - bridge: `/health`, `/learn`, `/quiz`, `/chat`, `/agent-status` for the frontend
//! - agent: `/submit` (enveloped messages) and `/ws` for the bridge or other agents
//!
//! Important env variables:
//!   PORT               : u16 (default 8001)
//!   AGENT_URL          : agent submit endpoint (default "http://localhost:8002/submit")
//!   AGENT_STATUS_URL   : agent liveness URL (default "http://localhost:8002")
//!   AGENT_TIMEOUT_SECS : per-request agent timeout (default 30)
//!   BRIDGE_MODE        : "local" (default) answers in-process, "forward" tries the agent first
//!   OPENAI_API_KEY     : enables mentor replies via OpenAI if present
//!   OPENAI_BASE_URL    : default "https://api.openai.com/v1"
//!   OPENAI_MODEL       : default "gpt-4o-mini"
//!   AGENT_CONFIG_PATH  : path to TOML config (mentor prompt + optional topic catalog)
//!   LOG_LEVEL          : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT         : "pretty" (default) or "json"

mod agent;
mod catalog;
mod composer;
mod config;
mod content;
mod domain;
mod error;
mod lesson;
mod logic;
mod openai;
mod protocol;
mod quiz;
mod routes;
mod state;
mod telemetry;
mod util;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Settings, catalog, composer and agent bridge. Bad config stops us here.
  let state = Arc::new(AppState::from_env()?);
  let addr = SocketAddr::from(([0, 0, 0, 0], state.settings.port));

  let app = build_router(state.clone());

  let listener = TcpListener::bind(addr).await?;
  info!(
    target: "superlearn_backend",
    %addr,
    agent_url = %state.settings.agent_url,
    mode = ?state.settings.bridge_mode,
    "HTTP server listening"
  );
  axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
  info!(target: "superlearn_backend", "Server stopped");
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    warn!(target: "superlearn_backend", error = %e, "Could not listen for Ctrl-C; running until killed");
    std::future::pending::<()>().await;
  }
  info!(target: "superlearn_backend", "Shutdown requested");
}
