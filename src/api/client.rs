use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::request::build_request;
use super::response::{parse_reply, ModelReply};
use super::LanguageModel;
use crate::config::Config;
use crate::error::{LinkscoutError, Result};
use crate::models::{Message, ToolDescriptor};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini `generateContent` client.
pub struct GeminiClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: &str, endpoint: &str, model: &str, timeout_secs: u64) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            API_KEY_HEADER,
            HeaderValue::from_str(api_key)
                .map_err(|e| LinkscoutError::ConfigError(format!("Invalid API key header: {}", e)))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.trim_start_matches("models/").to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.require_api_key()?,
            &config.api_endpoint,
            &config.model,
            config.request_timeout,
        )
    }

    pub fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

#[async_trait]
impl LanguageModel for GeminiClient {
    async fn generate(
        &self,
        system_prompt: Option<&str>,
        messages: &[Message],
        tools: &[ToolDescriptor],
    ) -> Result<ModelReply> {
        let body = build_request(system_prompt, messages, tools);
        debug!(
            model = %self.model,
            messages = messages.len(),
            tools = tools.len(),
            "sending generateContent request"
        );

        let response = self.http.post(self.url()).json(&body).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LinkscoutError::ApiError { status, message });
        }

        let response_text = response.text().await?;
        debug!("raw model response: {}", response_text);
        let response_json: Value = serde_json::from_str(&response_text)?;
        parse_reply(&response_json)
    }
}
