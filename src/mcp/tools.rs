use jsonschema::JSONSchema;
use serde_json::Value;

use super::types::McpToolResult;
use crate::error::{LinkscoutError, Result};
use crate::models::ToolDescriptor;

/// Checks model-supplied arguments against the tool's advertised input schema.
pub fn validate_tool_arguments(tool: &ToolDescriptor, arguments: &Value) -> std::result::Result<(), String> {
    let schema = match JSONSchema::compile(&tool.input_schema) {
        Ok(s) => s,
        Err(e) => return Err(format!("Invalid tool schema: {}", e)),
    };

    if let Err(errors) = schema.validate(arguments) {
        let error_messages: Vec<String> = errors
            .map(|e| format!("{}: {}", e.instance_path, e))
            .collect();
        return Err(error_messages.join("; "));
    }

    Ok(())
}

/// Turns a `tools/call` result into a JSON value.
///
/// Text items are parsed as JSON where possible and kept as strings
/// otherwise; a single item is unwrapped.
pub fn decode_tool_result(tool_name: &str, result: McpToolResult) -> Result<Value> {
    let mut items: Vec<Value> = result.content.into_iter().map(decode_content_item).collect();

    if result.is_error == Some(true) {
        let message = items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join("\n");
        return Err(LinkscoutError::ToolError(format!(
            "Tool '{}' reported an error: {}",
            tool_name, message
        )));
    }

    if items.len() == 1 {
        Ok(items.remove(0))
    } else {
        Ok(Value::Array(items))
    }
}

fn decode_content_item(item: Value) -> Value {
    let is_text = item.get("type").and_then(|t| t.as_str()) == Some("text");
    match item.get("text").and_then(|t| t.as_str()) {
        Some(text) if is_text => {
            serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
        }
        _ => item,
    }
}
