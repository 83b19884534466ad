use serde::{Deserialize, Serialize};

use super::defaults::default_request_timeout;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            request_timeout: default_request_timeout(),
        }
    }
}
