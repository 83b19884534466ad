pub const DEFAULT_API_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-exp";
pub const DEFAULT_MCP_SERVER_PATH: &str = "server.py";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;

pub fn default_request_timeout() -> u64 {
    60
}

pub fn default_history_window() -> usize {
    10
}

pub fn default_max_tool_rounds() -> usize {
    5
}

pub fn default_preamble_records() -> usize {
    3
}

pub fn default_tool_timeout() -> u64 {
    120
}

pub fn default_max_retries() -> u32 {
    3
}

pub fn default_retry_delay_ms() -> u64 {
    1000
}
