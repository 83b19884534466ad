//! LinkedIn search assistant: a Gemini tool-calling loop over an MCP tool
//! server, with numbered results the user can refer back to ("#2").

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod mcp;
pub mod models;
pub mod policy;
pub mod server;
pub mod session;
pub mod ui;

pub use error::{LinkscoutError, Result};
