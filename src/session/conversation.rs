use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::api::{LanguageModel, ModelReply};
use crate::config::{
    default_history_window, default_max_tool_rounds, default_preamble_records, Config,
};
use crate::error::{LinkscoutError, Result};
use crate::format::{self, Rendered};
use crate::mcp::ToolExecutor;
use crate::models::{LastResultSet, Message, ResultKind, ToolDescriptor};

#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Number of most recent messages sent to the model on every call.
    pub history_window: usize,
    pub max_tool_rounds: usize,
    /// Records quoted in the context preamble.
    pub preamble_records: usize,
    pub system_prompt: Option<String>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            history_window: default_history_window(),
            max_tool_rounds: default_max_tool_rounds(),
            preamble_records: default_preamble_records(),
            system_prompt: None,
        }
    }
}

impl SessionOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            history_window: config.history_window.max(1),
            max_tool_rounds: config.max_tool_rounds,
            preamble_records: config.preamble_records,
            system_prompt: config.system_prompt.clone(),
        }
    }
}

/// Context appended to a query so the model can resolve "#2" against the
/// previous list.
pub fn context_preamble(last: &LastResultSet, max_records: usize) -> String {
    let records = last.records();
    let excerpt = &records[..records.len().min(max_records)];
    let excerpt = serde_json::to_string_pretty(excerpt).unwrap_or_else(|_| "[]".to_string());
    format!(
        "\n\nContext: User has {} {}(s) from previous query. \
         If they refer to numbers (like '#2' or 'the third one'), use that context.\n\
         Previous results summary: {}",
        records.len(),
        last.kind(),
        excerpt
    )
}

/// One user's conversation with the model and its tools.
///
/// `submit` takes `&mut self`, so calls on one session are serialized by the
/// borrow checker; independent sessions share nothing.
pub struct ConversationSession<M, E> {
    model: M,
    executor: E,
    tools: Vec<ToolDescriptor>,
    history: Vec<Message>,
    last_results: Option<LastResultSet>,
    options: SessionOptions,
}

impl<M: LanguageModel, E: ToolExecutor> ConversationSession<M, E> {
    /// Lists the executor's tools once and keeps them for the session lifetime.
    pub async fn connect(model: M, executor: E, options: SessionOptions) -> Result<Self> {
        let tools = executor.list_tools().await?;
        info!(
            "Session ready with {} tool(s): {}",
            tools.len(),
            tools
                .iter()
                .map(|t| t.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        Ok(Self::new(model, executor, tools, options))
    }

    pub fn new(model: M, executor: E, tools: Vec<ToolDescriptor>, options: SessionOptions) -> Self {
        Self {
            model,
            executor,
            tools,
            history: Vec::new(),
            last_results: None,
            options,
        }
    }

    /// Runs one exchange and returns the final answer.
    ///
    /// Messages produced along the way are staged and only committed once the
    /// model has answered, so a failed exchange leaves the session as it was.
    pub async fn submit(&mut self, query: &str) -> Result<String> {
        let query = query.trim();
        if query.is_empty() {
            return Err(LinkscoutError::InvalidInput(
                "Query cannot be empty".to_string(),
            ));
        }

        let context = self
            .last_results
            .as_ref()
            .filter(|last| !last.is_empty())
            .map(|last| context_preamble(last, self.options.preamble_records));

        let mut pending = vec![Message::user(query, context)];
        let mut decoration: Option<Rendered> = None;
        let mut rounds = 0;

        let answer = loop {
            let window = self.model_window(&pending);
            debug!("Calling model with {} message(s)", window.len());

            let reply = self
                .model
                .generate(self.options.system_prompt.as_deref(), &window, &self.tools)
                .await?;

            let calls = match reply {
                ModelReply::Text(text) => break text,
                ModelReply::ToolCalls(calls) => calls,
            };

            if rounds >= self.options.max_tool_rounds {
                warn!("Model still requesting tools after {} round(s)", rounds);
                return Err(LinkscoutError::ToolLoopExceeded { rounds });
            }
            rounds += 1;

            for call in calls {
                info!("Calling tool {}", call.name);
                debug!("Arguments: {}", call.arguments);

                let response = match self.executor.call(&call.name, &call.arguments).await {
                    Ok(value) => {
                        if let Some(rendered) =
                            format::render(&value, ResultKind::from_tool_name(&call.name))
                        {
                            decoration = Some(rendered);
                        }
                        json!({ "result": value })
                    }
                    Err(e) => {
                        warn!("Tool {} failed: {}", call.name, e);
                        json!({ "error": e.to_string() })
                    }
                };

                let name = call.name.clone();
                pending.push(Message::tool_call(call));
                pending.push(Message::tool_result(name, response));
            }
        };

        let answer = match decoration {
            Some(rendered) => {
                self.last_results = Some(rendered.snapshot);
                format!("{}\n{}", answer, rendered.text)
            }
            None => answer,
        };

        pending.push(Message::model_text(answer.clone()));
        self.history.append(&mut pending);

        Ok(answer)
    }

    /// Forgets the conversation and the numbered results.
    pub fn clear(&mut self) {
        self.history.clear();
        self.last_results = None;
    }

    fn model_window(&self, pending: &[Message]) -> Vec<Message> {
        let window = self.options.history_window;
        let total = self.history.len() + pending.len();
        self.history
            .iter()
            .chain(pending.iter())
            .skip(total.saturating_sub(window))
            .cloned()
            .collect()
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// `(role, text)` pairs as the user saw them, without preambles or tool traffic.
    pub fn transcript(&self) -> Vec<(&'static str, &str)> {
        self.history
            .iter()
            .filter_map(|m| m.transcript_text().map(|text| (m.role.as_str(), text)))
            .collect()
    }

    pub fn last_results(&self) -> Option<&LastResultSet> {
        self.last_results.as_ref()
    }

    pub fn tools(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    /// Restores state saved from an earlier process.
    pub fn restore(&mut self, history: Vec<Message>, last_results: Option<LastResultSet>) {
        self.history = history;
        self.last_results = last_results;
    }

    pub async fn shutdown(&self) -> Result<()> {
        self.executor.shutdown().await
    }
}
