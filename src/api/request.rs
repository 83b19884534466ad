use serde_json::Value;

use super::models::{
    Content, FunctionCall, FunctionDeclaration, FunctionResponse, Part, RequestBody, ToolSet,
};
use crate::models::{Message, MessageContent, ToolDescriptor};

pub fn build_request(
    system_prompt: Option<&str>,
    messages: &[Message],
    tools: &[ToolDescriptor],
) -> RequestBody {
    let declarations = format_tools_for_llm(tools);

    RequestBody {
        contents: messages.iter().map(to_content).collect(),
        tools: if declarations.is_empty() {
            Vec::new()
        } else {
            vec![ToolSet {
                function_declarations: declarations,
            }]
        },
        system_instruction: system_prompt.map(|prompt| Content {
            role: None,
            parts: vec![Part::text(prompt)],
        }),
    }
}

fn to_content(message: &Message) -> Content {
    let part = match &message.content {
        MessageContent::Text { .. } => Part::text(message.model_input_text().unwrap_or_default()),
        MessageContent::ToolCall(call) => Part {
            function_call: Some(FunctionCall {
                name: call.name.clone(),
                args: call.arguments.clone(),
            }),
            ..Default::default()
        },
        MessageContent::ToolResult { name, response } => Part {
            function_response: Some(FunctionResponse {
                name: name.clone(),
                response: response.clone(),
            }),
            ..Default::default()
        },
    };

    Content {
        role: Some(message.role.as_str().to_string()),
        parts: vec![part],
    }
}

pub fn format_tools_for_llm(tools: &[ToolDescriptor]) -> Vec<FunctionDeclaration> {
    tools
        .iter()
        .map(|tool| FunctionDeclaration {
            name: tool.name.clone(),
            description: tool.description.clone().unwrap_or_default(),
            parameters: clean_schema(tool.input_schema.clone()),
        })
        .collect()
}

/// Strips `title` keys, which the function-declaration schema rejects.
pub fn clean_schema(mut schema: Value) -> Value {
    if let Value::Object(map) = &mut schema {
        map.remove("title");
        if let Some(Value::Object(properties)) = map.get_mut("properties") {
            for property in properties.values_mut() {
                *property = clean_schema(property.take());
            }
        }
    }
    schema
}
