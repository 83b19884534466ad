//! Numbered rendering of tool result lists.
//!
//! The rendered text and the returned [`LastResultSet`] are built from the
//! same pass over the records, so item `n` in the text is always
//! `snapshot.records()[n - 1]`.

pub mod fields;
pub mod views;

use serde_json::Value;

use crate::models::{LastResultSet, ResultKind};
pub use views::RecordView;

pub const FOLLOW_UP_HINT: &str =
    "\n💡 You can ask: 'Tell me more about #2' or 'What's the salary for job #3?'\n";

#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub text: String,
    pub snapshot: LastResultSet,
}

/// Renders a tool result as a numbered list.
///
/// Returns `None` for anything other than a non-empty JSON array; callers
/// skip decoration in that case and keep their previous result set.
pub fn render(records: &Value, kind: ResultKind) -> Option<Rendered> {
    let items = records.as_array()?;
    if items.is_empty() {
        return None;
    }

    let mut text = header(items.len(), kind);
    for (index, record) in items.iter().enumerate() {
        text.push_str(&RecordView::from_record(kind, record).block(index + 1));
    }
    text.push_str(FOLLOW_UP_HINT);

    Some(Rendered {
        text,
        snapshot: LastResultSet::new(kind, items.clone()),
    })
}

pub fn header(count: usize, kind: ResultKind) -> String {
    format!("\n📋 Found {} {}(s):\n\n", count, kind)
}
