//! HTTP + WebSocket frontend.
//!
//! Each WebSocket connection owns one [`LiveSession`](crate::session::LiveSession)
//! and handles its frames one at a time. The `/api/*` routes call a single
//! MCP tool per request with no conversation state.

pub mod protocol;
pub mod rest;
mod routes;
mod ws;

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::Config;
use crate::error::Result;

pub use routes::{router, AppState};

pub async fn serve(config: Config) -> Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let state = Arc::new(AppState::new(config));
    let app = router(state);

    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown requested");
    }
}
