use serde::{Deserialize, Serialize};

use super::defaults::{default_max_retries, default_retry_delay_ms};

/// Retry and pacing for outbound tool calls.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PolicyConfig {
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    /// 0 disables rate limiting
    #[serde(default)]
    pub min_interval_ms: u64,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            min_interval_ms: 0,
        }
    }
}
