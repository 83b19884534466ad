mod api;
mod defaults;
mod mcp;
mod policy;
mod server;
mod validation;

use crate::cli::Args;
use crate::error::{LinkscoutError, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub use api::ApiConfig;
pub use defaults::*;
pub use mcp::McpConfig;
pub use policy::PolicyConfig;
pub use server::ServerConfig;
pub use validation::{
    expand_env_var_in_string, expand_env_vars, load_dotenv, parse_dotenv, parse_flag,
};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ModelConfig {
    #[serde(default)]
    pub default_model: Option<String>,
    #[serde(default)]
    pub system_prompt: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub verbose: Option<bool>,
    #[serde(default = "default_history_window")]
    pub history_window: usize,
    #[serde(default = "default_max_tool_rounds")]
    pub max_tool_rounds: usize,
    #[serde(default = "default_preamble_records")]
    pub preamble_records: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            verbose: None,
            history_window: default_history_window(),
            max_tool_rounds: default_max_tool_rounds(),
            preamble_records: default_preamble_records(),
        }
    }
}

/// Contents of `.linkscout.yaml` (or `.yml` / `.json`).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FileConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub mcp: McpConfig,
    #[serde(default)]
    pub policy: PolicyConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Only required once a session is set up, so `--serve` can start without it.
    pub api_key: Option<String>,
    pub api_endpoint: String,
    pub model: String,
    pub system_prompt: Option<String>,
    pub request_timeout: u64,
    pub verbose: bool,
    pub history_window: usize,
    pub max_tool_rounds: usize,
    pub preamble_records: usize,
    pub mcp_server_path: String,
    pub mcp: McpConfig,
    pub policy: PolicyConfig,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env_and_args(args: &Args) -> Result<Self> {
        let file_config = FileConfig::load()?;
        Ok(Self::resolve(args, file_config, |key| env::var(key).ok()))
    }

    /// Merges CLI flags > environment > config file > defaults.
    pub fn resolve<F>(args: &Args, file_config: FileConfig, env_var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = env_var("GEMINI_API_KEY").filter(|key| !key.trim().is_empty());

        let api_endpoint = args
            .api_endpoint
            .clone()
            .or_else(|| env_var("GEMINI_API_ENDPOINT"))
            .or(file_config.api.endpoint)
            .unwrap_or_else(|| DEFAULT_API_ENDPOINT.to_string());

        let model = args
            .model
            .clone()
            .or_else(|| env_var("GEMINI_MODEL"))
            .or(file_config.model.default_model)
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let system_prompt = env_var("AI_SYSTEM_PROMPT").or(file_config.model.system_prompt);

        let request_timeout = env_var("AI_REQUEST_TIMEOUT")
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(file_config.api.request_timeout);

        let verbose = args.verbose
            || env_var("AI_VERBOSE")
                .map(|v| parse_flag(&v))
                .or(file_config.session.verbose)
                .unwrap_or(false);

        let mcp_server_path = args
            .mcp_server
            .clone()
            .or_else(|| env_var("MCP_SERVER_PATH"))
            .or_else(|| file_config.mcp.server_path.clone())
            .unwrap_or_else(|| DEFAULT_MCP_SERVER_PATH.to_string());

        let host = args
            .host
            .clone()
            .or_else(|| env_var("HOST"))
            .or(file_config.server.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = args
            .port
            .or_else(|| env_var("PORT").and_then(|p| p.parse::<u16>().ok()))
            .or(file_config.server.port)
            .unwrap_or(DEFAULT_PORT);

        Config {
            api_key,
            api_endpoint,
            model,
            system_prompt,
            request_timeout,
            verbose,
            history_window: file_config.session.history_window,
            max_tool_rounds: file_config.session.max_tool_rounds,
            preamble_records: file_config.session.preamble_records,
            mcp_server_path,
            mcp: file_config.mcp,
            policy: file_config.policy,
            host,
            port,
        }
    }

    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| LinkscoutError::ConfigError("GEMINI_API_KEY not set".to_string()))
    }

    /// Checks that the MCP server script exists before anything is spawned.
    pub fn require_mcp_server(&self) -> Result<&str> {
        if Path::new(&self.mcp_server_path).exists() {
            Ok(&self.mcp_server_path)
        } else {
            Err(LinkscoutError::ConfigError(format!(
                "MCP server not found at {}",
                self.mcp_server_path
            )))
        }
    }
}

impl FileConfig {
    pub fn load() -> Result<Self> {
        for path in Self::get_config_paths() {
            if path.exists() {
                return Self::load_from(&path)
                    .map_err(|e| LinkscoutError::ConfigError(format!("{:#}", e)));
            }
        }

        Ok(FileConfig::default())
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let is_yaml = matches!(
            path.extension().and_then(|s| s.to_str()),
            Some("yaml") | Some("yml")
        );

        let config = if is_yaml {
            serde_yaml::from_str(&contents).with_context(|| {
                format!("Failed to parse YAML config file: {}", path.display())
            })?
        } else {
            serde_json::from_str(&contents).with_context(|| {
                format!("Failed to parse JSON config file: {}", path.display())
            })?
        };

        Ok(config)
    }

    pub fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".linkscout.yaml"),
            PathBuf::from(".linkscout.yml"),
            PathBuf::from(".linkscout.json"),
        ];

        if let Some(home_dir) = dirs::home_dir() {
            let config_dir = home_dir.join(".config").join("linkscout");
            paths.push(config_dir.join("linkscout.yaml"));
            paths.push(config_dir.join("linkscout.yml"));
            paths.push(config_dir.join("linkscout.json"));
        }

        paths
    }
}
