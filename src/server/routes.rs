use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::rest::{self, ExecutorFactory, McpExecutorFactory};
use super::ws::ws_handler;
use crate::config::Config;

pub struct AppState {
    pub config: Config,
    /// Source of the per-request executors behind `/api/*`.
    pub(crate) executors: Arc<dyn ExecutorFactory>,
    /// Open connections by session id.
    connections: RwLock<HashMap<String, DateTime<Utc>>>,
    tool_requests: AtomicU64,
    started: Instant,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let executors = Arc::new(McpExecutorFactory::new(config.clone()));
        Self::with_executors(config, executors)
    }

    pub fn with_executors(config: Config, executors: Arc<dyn ExecutorFactory>) -> Self {
        Self {
            config,
            executors,
            connections: RwLock::new(HashMap::new()),
            tool_requests: AtomicU64::new(0),
            started: Instant::now(),
        }
    }

    pub async fn register(&self, session_id: &str) {
        self.connections
            .write()
            .await
            .insert(session_id.to_string(), Utc::now());
    }

    pub async fn unregister(&self, session_id: &str) {
        self.connections.write().await.remove(session_id);
    }

    pub async fn active_connections(&self) -> usize {
        self.connections.read().await.len()
    }

    pub fn record_tool_request(&self) {
        self.tool_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn tool_requests(&self) -> u64 {
        self.tool_requests.load(Ordering::Relaxed)
    }

    pub fn uptime(&self) -> Duration {
        self.started.elapsed()
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/ws", get(ws_handler))
        .route("/api/jobs/search", post(rest::search_jobs))
        .route("/api/people/search", post(rest::search_people))
        .route("/api/company/info", post(rest::company_info))
        .route("/api/profile/scrape", post(rest::scrape_profile))
        .route("/api/stats", get(rest::stats))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({
        "name": "LinkedIn Scraper AI",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "endpoints": {
            "websocket": "/ws",
            "health": "/health",
            "jobs": "/api/jobs/search",
            "people": "/api/people/search",
            "company": "/api/company/info",
            "profile": "/api/profile/scrape",
            "stats": "/api/stats"
        }
    }))
}

async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "active_connections": state.active_connections().await
    }))
}
