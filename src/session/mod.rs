mod conversation;
mod filesystem;
mod snapshot;
mod storage;

pub use conversation::{context_preamble, ConversationSession, SessionOptions};
pub use filesystem::{FilesystemSessionStore, SESSION_EXPIRY_MINUTES};
pub use snapshot::SessionSnapshot;
pub use storage::SessionStore;

use std::time::Duration;
use tracing::info;

use crate::api::GeminiClient;
use crate::config::Config;
use crate::error::Result;
use crate::mcp::McpClient;
use crate::models::Message;
use crate::policy::PolicyExecutor;

/// A session wired to Gemini and a policy-wrapped MCP server.
pub type LiveSession = ConversationSession<GeminiClient, PolicyExecutor<McpClient>>;

/// Builds a session from configuration: model client, MCP server, tool list.
///
/// Every session spawns its own MCP server process.
pub async fn open_session(config: &Config) -> Result<LiveSession> {
    let model = GeminiClient::from_config(config)?;
    let executor = open_executor(config).await?;
    ConversationSession::connect(model, executor, SessionOptions::from_config(config)).await
}

/// Spawns an MCP server and wraps it in the configured retry and rate policy.
pub async fn open_executor(config: &Config) -> Result<PolicyExecutor<McpClient>> {
    let server_path = config.require_mcp_server()?;
    let launch = config.mcp.launch(server_path);
    info!(
        "Starting MCP server: {} {}",
        launch.command,
        launch.args.join(" ")
    );

    let mcp = McpClient::connect(&launch, Duration::from_secs(config.mcp.tool_timeout)).await?;
    Ok(PolicyExecutor::from_config(mcp, &config.policy))
}

/// Keep only the last `keep` messages.
pub fn trim_conversation_history(messages: &mut Vec<Message>, keep: usize) {
    if messages.len() > keep {
        messages.drain(..messages.len() - keep);
    }
}
