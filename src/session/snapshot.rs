use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{LastResultSet, Message};

/// Saved state of a CLI conversation, restored on the next invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub last_updated: DateTime<Local>,
    pub messages: Vec<Message>,
    #[serde(default)]
    pub last_results: Option<LastResultSet>,
}

impl SessionSnapshot {
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4().to_string(),
            last_updated: Local::now(),
            messages: Vec::new(),
            last_results: None,
        }
    }

    /// Replaces the saved state, keeping at most `history_window` messages.
    pub fn update(
        &mut self,
        messages: &[Message],
        last_results: Option<&LastResultSet>,
        history_window: usize,
    ) {
        self.messages = messages.to_vec();
        super::trim_conversation_history(&mut self.messages, history_window);
        self.last_results = last_results.cloned();
        self.last_updated = Local::now();
    }
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self::new()
    }
}
