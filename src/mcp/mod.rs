pub mod client;
pub mod tools;
pub mod types;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::models::ToolDescriptor;

pub use client::{McpClient, McpLaunch};

/// Executes named tools on behalf of the model.
///
/// A failed `call` is an ordinary outcome: the session reports it back to
/// the model instead of aborting the exchange.
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>>;

    async fn call(&self, name: &str, arguments: &Value) -> Result<Value>;

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }
}
