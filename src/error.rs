use std::fmt;

#[derive(Debug)]
pub enum LinkscoutError {
    ApiError {
        status: u16,
        message: String,
    },
    ConfigError(String),
    ToolError(String),
    InvalidInput(String),
    ToolLoopExceeded {
        rounds: usize,
    },
    NetworkError(reqwest::Error),
    Timeout,
    IoError(std::io::Error),
    JsonError(serde_json::Error),
    Other(String),
}

impl fmt::Display for LinkscoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkscoutError::ApiError { status, message } => {
                write!(f, "API error (status {}): {}", status, message)
            }
            LinkscoutError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            LinkscoutError::ToolError(msg) => write!(f, "Tool error: {}", msg),
            LinkscoutError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            LinkscoutError::ToolLoopExceeded { rounds } => write!(
                f,
                "Tool loop exceeded: model kept requesting tools after {} rounds",
                rounds
            ),
            LinkscoutError::NetworkError(e) => write!(f, "Network error: {}", e),
            LinkscoutError::Timeout => write!(f, "Request timeout"),
            LinkscoutError::IoError(e) => write!(f, "IO error: {}", e),
            LinkscoutError::JsonError(e) => write!(f, "JSON error: {}", e),
            LinkscoutError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for LinkscoutError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LinkscoutError::NetworkError(e) => Some(e),
            LinkscoutError::IoError(e) => Some(e),
            LinkscoutError::JsonError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for LinkscoutError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LinkscoutError::Timeout
        } else {
            LinkscoutError::NetworkError(err)
        }
    }
}

impl From<std::io::Error> for LinkscoutError {
    fn from(err: std::io::Error) -> Self {
        LinkscoutError::IoError(err)
    }
}

impl From<serde_json::Error> for LinkscoutError {
    fn from(err: serde_json::Error) -> Self {
        LinkscoutError::JsonError(err)
    }
}

impl From<String> for LinkscoutError {
    fn from(msg: String) -> Self {
        LinkscoutError::Other(msg)
    }
}

pub type Result<T> = std::result::Result<T, LinkscoutError>;
