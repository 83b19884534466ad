pub mod client;
pub mod models;
pub mod request;
pub mod response;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Message, ToolDescriptor};

pub use client::GeminiClient;
pub use models::RequestBody;
pub use response::ModelReply;

/// A tool-calling chat model.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// One model turn over `messages`, offering `tools` for function calling.
    async fn generate(
        &self,
        system_prompt: Option<&str>,
        messages: &[Message],
        tools: &[ToolDescriptor],
    ) -> Result<ModelReply>;
}
