use crate::error::{LinkscoutError, Result};
use crate::models::ToolCall;
use serde_json::Value;

pub const EMPTY_REPLY_TEXT: &str = "No tool calls and no content in response";

/// What the model asked for on one turn.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelReply {
    Text(String),
    ToolCalls(Vec<ToolCall>),
}

fn first_candidate_parts(response_json: &Value) -> Result<Option<&Vec<Value>>> {
    let candidates = response_json
        .get("candidates")
        .and_then(|c| c.as_array())
        .ok_or_else(|| LinkscoutError::Other("No candidates in response".to_string()))?;

    let first_candidate = candidates
        .first()
        .ok_or_else(|| LinkscoutError::Other("Empty candidates array".to_string()))?;

    Ok(first_candidate
        .get("content")
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.as_array()))
}

/// Extract function calls from a generateContent response, in part order
pub fn parse_tool_calls(response_json: &Value) -> Result<Option<Vec<ToolCall>>> {
    let Some(parts) = first_candidate_parts(response_json)? else {
        return Ok(None);
    };

    let calls: Vec<ToolCall> = parts
        .iter()
        .filter_map(|part| part.get("functionCall"))
        .filter_map(|call| {
            let name = call.get("name")?.as_str()?.to_string();
            let arguments = call
                .get("args")
                .cloned()
                .filter(|a| !a.is_null())
                .unwrap_or_else(|| Value::Object(Default::default()));
            Some(ToolCall { name, arguments })
        })
        .collect();

    if calls.is_empty() {
        Ok(None)
    } else {
        Ok(Some(calls))
    }
}

/// Extract text content, joining multiple text parts with newlines
pub fn extract_content(response_json: &Value) -> Result<Option<String>> {
    let Some(parts) = first_candidate_parts(response_json)? else {
        return Ok(None);
    };

    let texts: Vec<&str> = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
        .collect();

    if texts.is_empty() {
        Ok(None)
    } else {
        Ok(Some(texts.join("\n")))
    }
}

/// Classify a response: any function call wins over text.
pub fn parse_reply(response_json: &Value) -> Result<ModelReply> {
    if let Some(calls) = parse_tool_calls(response_json)? {
        return Ok(ModelReply::ToolCalls(calls));
    }

    Ok(ModelReply::Text(
        extract_content(response_json)?.unwrap_or_else(|| EMPTY_REPLY_TEXT.to_string()),
    ))
}
