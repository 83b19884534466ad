use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use super::defaults::default_tool_timeout;
use super::validation::expand_env_vars;
use crate::mcp::McpLaunch;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct McpConfig {
    #[serde(default)]
    pub server_path: Option<String>,
    /// Interpreter override; inferred from the server path when unset.
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub args: Vec<String>,
    /// Environment for the server process (with ${VAR} expansion)
    #[serde(default)]
    pub env: HashMap<String, String>,
    #[serde(default = "default_tool_timeout")]
    pub tool_timeout: u64,
}

impl Default for McpConfig {
    fn default() -> Self {
        Self {
            server_path: None,
            command: None,
            args: Vec::new(),
            env: HashMap::new(),
            tool_timeout: default_tool_timeout(),
        }
    }
}

impl McpConfig {
    /// `python` for `.py` scripts, `node` for anything else.
    pub fn infer_command(server_path: &str) -> &'static str {
        if Path::new(server_path).extension().and_then(|e| e.to_str()) == Some("py") {
            "python"
        } else {
            "node"
        }
    }

    pub fn launch(&self, server_path: &str) -> McpLaunch {
        let command = self
            .command
            .clone()
            .unwrap_or_else(|| Self::infer_command(server_path).to_string());

        let mut args = vec![server_path.to_string()];
        args.extend(self.args.iter().cloned());

        McpLaunch {
            command,
            args,
            env: expand_env_vars(&self.env),
        }
    }
}
