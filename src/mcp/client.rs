use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::{Mutex, RwLock};
use tokio::time::{timeout, Duration};
use tracing::{debug, info, warn};

use super::tools::{decode_tool_result, validate_tool_arguments};
use super::types::{InitializeResult, McpToolResult, ToolListResponse};
use super::ToolExecutor;
use crate::error::{LinkscoutError, Result};
use crate::models::ToolDescriptor;

// MCP Protocol constants
const MCP_PROTOCOL_VERSION: &str = "2024-11-05";
const CLIENT_NAME: &str = "linkscout";
const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// How to start an MCP server process.
#[derive(Debug, Clone)]
pub struct McpLaunch {
    pub command: String,
    pub args: Vec<String>,
    pub env: HashMap<String, String>,
}

/// A client bound to exactly one MCP server process over stdio.
pub struct McpClient {
    server: Mutex<McpServer>,
    tools: RwLock<HashMap<String, ToolDescriptor>>,
    tool_timeout: Duration,
}

struct McpServer {
    process: Child,
    stdin: ChildStdin,
    stdout: Lines<BufReader<ChildStdout>>,
    next_id: u64,
}

impl McpClient {
    pub async fn connect(launch: &McpLaunch, tool_timeout: Duration) -> Result<Self> {
        let mut cmd = Command::new(&launch.command);
        cmd.args(&launch.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        // Values are never logged
        for (key, value) in &launch.env {
            debug!("Setting MCP server env var: {} (value hidden)", key);
            cmd.env(key, value);
        }

        let mut process = cmd.spawn().map_err(|e| {
            LinkscoutError::ConfigError(format!(
                "Failed to start MCP server '{}': {}",
                launch.command, e
            ))
        })?;

        let stdin = process
            .stdin
            .take()
            .ok_or_else(|| LinkscoutError::Other("MCP server stdin unavailable".to_string()))?;
        let stdout = process
            .stdout
            .take()
            .ok_or_else(|| LinkscoutError::Other("MCP server stdout unavailable".to_string()))?;

        let mut server = McpServer {
            process,
            stdin,
            stdout: BufReader::new(stdout).lines(),
            next_id: 1,
        };

        let init_params = json!({
            "protocolVersion": MCP_PROTOCOL_VERSION,
            "capabilities": {
                "tools": {}
            },
            "clientInfo": {
                "name": CLIENT_NAME,
                "version": CLIENT_VERSION
            }
        });

        let response = timeout(
            tool_timeout,
            server.send_request("initialize", Some(init_params)),
        )
        .await
        .map_err(|_| LinkscoutError::Timeout)??;
        let init_result: InitializeResult = serde_json::from_value(response)?;

        info!(
            "Connected to MCP server: {} v{} (protocol {})",
            init_result.server_info.name,
            init_result.server_info.version,
            init_result.protocol_version
        );

        server
            .send_notification("notifications/initialized", None)
            .await?;

        let client = Self {
            server: Mutex::new(server),
            tools: RwLock::new(HashMap::new()),
            tool_timeout,
        };
        client.refresh_tools().await?;

        Ok(client)
    }

    /// Re-reads the server's tool list, replacing the cached one.
    pub async fn refresh_tools(&self) -> Result<Vec<ToolDescriptor>> {
        let response = {
            let mut server = self.server.lock().await;
            timeout(self.tool_timeout, server.send_request("tools/list", None))
                .await
                .map_err(|_| LinkscoutError::Timeout)??
        };
        let tool_list: ToolListResponse = serde_json::from_value(response)?;

        let mut tools = self.tools.write().await;
        tools.clear();
        for tool in &tool_list.tools {
            debug!(
                "  - Tool: {} - {}",
                tool.name,
                tool.description.as_deref().unwrap_or_default()
            );
            tools.insert(tool.name.clone(), tool.clone());
        }
        info!(
            "Available tools: {:?}",
            tool_list.tools.iter().map(|t| &t.name).collect::<Vec<_>>()
        );

        Ok(tool_list.tools)
    }

    pub async fn get_tool(&self, tool_name: &str) -> Option<ToolDescriptor> {
        let tools = self.tools.read().await;
        tools.get(tool_name).cloned()
    }

    async fn call_tool_internal(&self, name: &str, arguments: &Value) -> Result<McpToolResult> {
        let params = json!({
            "name": name,
            "arguments": arguments,
        });

        let mut server = self.server.lock().await;
        let response = server.send_request("tools/call", Some(params)).await?;
        Ok(serde_json::from_value(response)?)
    }
}

impl McpServer {
    async fn send_request(&mut self, method: &str, params: Option<Value>) -> Result<Value> {
        let id = self.next_id;
        self.next_id += 1;

        let request = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params.unwrap_or(json!({}))
        });
        self.write_line(&request).await?;

        while let Some(line) = self.stdout.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }

            let response: Value = match serde_json::from_str(&line) {
                Ok(v) => v,
                Err(_) => {
                    debug!("Ignoring non-JSON line from MCP server: {}", line);
                    continue;
                }
            };

            // Responses to abandoned (timed out) requests are skipped here
            if response.get("id") == Some(&json!(id)) {
                if let Some(result) = response.get("result") {
                    return Ok(result.clone());
                } else if let Some(error) = response.get("error") {
                    return Err(LinkscoutError::ToolError(format!("MCP error: {}", error)));
                }
            }
        }

        Err(LinkscoutError::ToolError(
            "No response from MCP server (stream closed)".to_string(),
        ))
    }

    async fn send_notification(&mut self, method: &str, params: Option<Value>) -> Result<()> {
        let notification = json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params.unwrap_or(json!({}))
        });
        self.write_line(&notification).await
    }

    async fn write_line(&mut self, message: &Value) -> Result<()> {
        let mut line = serde_json::to_string(message)?;
        line.push('\n');
        self.stdin.write_all(line.as_bytes()).await?;
        self.stdin.flush().await?;
        Ok(())
    }
}

#[async_trait]
impl ToolExecutor for McpClient {
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>> {
        let tools = self.tools.read().await;
        let mut list: Vec<ToolDescriptor> = tools.values().cloned().collect();
        list.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(list)
    }

    async fn call(&self, name: &str, arguments: &Value) -> Result<Value> {
        let tool = self
            .get_tool(name)
            .await
            .ok_or_else(|| LinkscoutError::ToolError(format!("Tool '{}' not found", name)))?;

        if let Err(validation_errors) = validate_tool_arguments(&tool, arguments) {
            return Err(LinkscoutError::ToolError(format!(
                "Tool '{}' argument validation failed: {}",
                name, validation_errors
            )));
        }

        let result = match timeout(self.tool_timeout, self.call_tool_internal(name, arguments)).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(LinkscoutError::ToolError(format!(
                    "Tool '{}' execution timed out after {} seconds",
                    name,
                    self.tool_timeout.as_secs()
                )))
            }
        };

        decode_tool_result(name, result)
    }

    async fn shutdown(&self) -> Result<()> {
        let mut server = self.server.lock().await;
        if let Err(e) = server.process.kill().await {
            warn!("Failed to stop MCP server process: {}", e);
        }
        Ok(())
    }
}
