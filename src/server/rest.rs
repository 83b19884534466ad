//! JSON endpoints that run one MCP tool per request, outside any conversation.

use async_trait::async_trait;
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, warn};

use super::routes::AppState;
use crate::config::Config;
use crate::error::{LinkscoutError, Result};
use crate::format::fields::{first_present, first_present_or};
use crate::format::views::{JOB_COMPANY, JOB_DESCRIPTION, JOB_LOCATION, JOB_POSTED, JOB_TITLE, JOB_URL};
use crate::mcp::ToolExecutor;
use crate::models::{COMPANY_INFO_TOOL, JOB_SEARCH_TOOL, PEOPLE_SEARCH_TOOL, PROFILE_SCRAPE_TOOL};
use crate::session::open_executor;

/// Upper bound on `limit` for the search endpoints.
pub const MAX_LIMIT: u32 = 50;
const JOB_DESCRIPTION_CHARS: usize = 200;

type ApiResult = std::result::Result<Json<Value>, (StatusCode, Json<Value>)>;

/// Opens a fresh tool executor for each REST request.
#[async_trait]
pub trait ExecutorFactory: Send + Sync {
    async fn open(&self) -> Result<Box<dyn ToolExecutor>>;
}

/// Spawns the configured MCP server for every request.
pub struct McpExecutorFactory {
    config: Config,
}

impl McpExecutorFactory {
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ExecutorFactory for McpExecutorFactory {
    async fn open(&self) -> Result<Box<dyn ToolExecutor>> {
        Ok(Box::new(open_executor(&self.config).await?))
    }
}

fn default_limit() -> u32 {
    10
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JobSearchRequest {
    pub keywords: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience_level: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PeopleSearchRequest {
    pub keywords: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_company: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CompanyInfoRequest {
    /// Company name or LinkedIn company id.
    pub company_identifier: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProfileScrapeRequest {
    pub profile_url: String,
}

/// Maps a failed tool run to `500 {"detail": ...}`.
fn tool_failed(e: LinkscoutError) -> (StatusCode, Json<Value>) {
    warn!("REST tool call failed: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "detail": e.to_string() })),
    )
}

async fn call_tool<A: Serialize>(state: &AppState, name: &str, arguments: &A) -> Result<Value> {
    state.record_tool_request();
    let arguments = serde_json::to_value(arguments)?;
    info!("REST call to {}", name);

    let executor = state.executors.open().await?;
    let outcome = executor.call(name, &arguments).await;
    if let Err(e) = executor.shutdown().await {
        warn!("Failed to shut down MCP server after {}: {}", name, e);
    }
    outcome
}

/// Search tools answer with a JSON array; anything else is one record or none.
fn into_records(result: Value) -> Vec<Value> {
    match result {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        other => vec![other],
    }
}

/// Fixed-shape job row with placeholders for missing fields.
pub fn job_summary(record: &Value) -> Value {
    let description: String = first_present(record, JOB_DESCRIPTION)
        .unwrap_or_default()
        .chars()
        .take(JOB_DESCRIPTION_CHARS)
        .collect();
    json!({
        "job_id": first_present_or(record, &["job_id"], ""),
        "title": first_present_or(record, JOB_TITLE, "Position title not available"),
        "company": first_present_or(record, JOB_COMPANY, "Company not specified"),
        "location": first_present_or(record, JOB_LOCATION, "Location not specified"),
        "description": description,
        "posted_at": first_present_or(record, JOB_POSTED, ""),
        "job_url": first_present_or(record, JOB_URL, ""),
        "scraped_at": first_present_or(record, &["scraped_at"], ""),
    })
}

pub async fn search_jobs(
    State(state): State<Arc<AppState>>,
    Json(mut request): Json<JobSearchRequest>,
) -> ApiResult {
    request.limit = request.limit.min(MAX_LIMIT);
    let result = call_tool(&state, JOB_SEARCH_TOOL, &request)
        .await
        .map_err(tool_failed)?;

    let jobs: Vec<Value> = into_records(result).iter().map(job_summary).collect();
    Ok(Json(json!({
        "success": true,
        "count": jobs.len(),
        "jobs": jobs
    })))
}

pub async fn search_people(
    State(state): State<Arc<AppState>>,
    Json(mut request): Json<PeopleSearchRequest>,
) -> ApiResult {
    request.limit = request.limit.min(MAX_LIMIT);
    let result = call_tool(&state, PEOPLE_SEARCH_TOOL, &request)
        .await
        .map_err(tool_failed)?;

    let people = into_records(result);
    Ok(Json(json!({
        "success": true,
        "count": people.len(),
        "people": people
    })))
}

pub async fn company_info(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CompanyInfoRequest>,
) -> ApiResult {
    let company = call_tool(&state, COMPANY_INFO_TOOL, &request)
        .await
        .map_err(tool_failed)?;
    Ok(Json(json!({ "success": true, "company": company })))
}

pub async fn scrape_profile(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ProfileScrapeRequest>,
) -> ApiResult {
    let profile = call_tool(&state, PROFILE_SCRAPE_TOOL, &request)
        .await
        .map_err(tool_failed)?;
    Ok(Json(json!({ "success": true, "profile": profile })))
}

pub async fn stats(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "total_requests": state.tool_requests(),
        "uptime_seconds": state.uptime().as_secs(),
        "active_connections": state.active_connections().await,
        "status": "operational"
    }))
}
