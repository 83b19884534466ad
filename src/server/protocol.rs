//! JSON frames exchanged over `/ws`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Query {
        #[serde(default)]
        query: String,
    },
    Clear,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Thinking,
    Response { content: String },
    Error { message: String },
    SessionId { session_id: String },
}

impl ServerMessage {
    pub fn error(message: impl Into<String>) -> Self {
        ServerMessage::Error {
            message: message.into(),
        }
    }

    pub fn response(content: impl Into<String>) -> Self {
        ServerMessage::Response {
            content: content.into(),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            r#"{"type":"error","message":"Failed to encode message"}"#.to_string()
        })
    }
}

/// Decodes a client frame, or returns the error frame to send back.
pub fn parse_client_message(text: &str) -> Result<ClientMessage, ServerMessage> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| ServerMessage::error(format!("Invalid message: {}", e)))?;

    let message_type = match value.get("type") {
        Some(Value::String(t)) => t.clone(),
        Some(other) => other.to_string(),
        None => "null".to_string(),
    };

    match message_type.as_str() {
        "query" | "clear" => serde_json::from_value(value)
            .map_err(|e| ServerMessage::error(format!("Invalid message: {}", e))),
        _ => Err(ServerMessage::error(format!(
            "Unknown message type: {}",
            message_type
        ))),
    }
}
