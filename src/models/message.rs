use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::tool::ToolCall;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
    Tool,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
            Role::Tool => "tool",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageContent {
    Text {
        text: String,
        /// Grounding appended for the model only, never shown in the transcript.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        context: Option<String>,
    },
    ToolCall(ToolCall),
    ToolResult {
        name: String,
        response: Value,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: MessageContent,
}

impl Message {
    pub fn user(text: impl Into<String>, context: Option<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Text {
                text: text.into(),
                context,
            },
        }
    }

    pub fn model_text(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            content: MessageContent::Text {
                text: text.into(),
                context: None,
            },
        }
    }

    pub fn tool_call(call: ToolCall) -> Self {
        Self {
            role: Role::Model,
            content: MessageContent::ToolCall(call),
        }
    }

    pub fn tool_result(name: impl Into<String>, response: Value) -> Self {
        Self {
            role: Role::Tool,
            content: MessageContent::ToolResult {
                name: name.into(),
                response,
            },
        }
    }

    /// Text as the model sees it: user text followed by any context preamble.
    pub fn model_input_text(&self) -> Option<String> {
        match &self.content {
            MessageContent::Text { text, context } => Some(match context {
                Some(context) => format!("{}{}", text, context),
                None => text.clone(),
            }),
            _ => None,
        }
    }

    /// Text as the user sees it in a transcript.
    pub fn transcript_text(&self) -> Option<&str> {
        match &self.content {
            MessageContent::Text { text, .. } => Some(text),
            _ => None,
        }
    }
}
