use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

pub const JOB_SEARCH_TOOL: &str = "search_linkedin_jobs";
pub const PEOPLE_SEARCH_TOOL: &str = "search_people";
pub const COMPANY_INFO_TOOL: &str = "get_company_info";
pub const PROFILE_SCRAPE_TOOL: &str = "scrape_linkedin_profile";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    Job,
    Profile,
    Company,
    Item,
}

impl ResultKind {
    pub fn from_tool_name(tool_name: &str) -> Self {
        match tool_name {
            JOB_SEARCH_TOOL => ResultKind::Job,
            PEOPLE_SEARCH_TOOL => ResultKind::Profile,
            COMPANY_INFO_TOOL => ResultKind::Company,
            _ => ResultKind::Item,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResultKind::Job => "job",
            ResultKind::Profile => "profile",
            ResultKind::Company => "company",
            ResultKind::Item => "item",
        }
    }
}

impl fmt::Display for ResultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The most recent numbered list shown to the user.
///
/// `records[i]` is the record rendered as item `i + 1`. Fields are private and
/// `count` is recomputed on load, so it can never drift from `records`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawLastResultSet")]
pub struct LastResultSet {
    kind: ResultKind,
    records: Vec<Value>,
    count: usize,
}

/// Saved form; any stored `count` is ignored.
#[derive(Deserialize)]
struct RawLastResultSet {
    kind: ResultKind,
    #[serde(default)]
    records: Vec<Value>,
}

impl From<RawLastResultSet> for LastResultSet {
    fn from(raw: RawLastResultSet) -> Self {
        LastResultSet::new(raw.kind, raw.records)
    }
}

impl LastResultSet {
    pub fn new(kind: ResultKind, records: Vec<Value>) -> Self {
        let count = records.len();
        Self {
            kind,
            records,
            count,
        }
    }

    pub fn kind(&self) -> ResultKind {
        self.kind
    }

    pub fn records(&self) -> &[Value] {
        &self.records
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 1-based lookup matching the numbering in the rendered text.
    pub fn get(&self, number: usize) -> Option<&Value> {
        number.checked_sub(1).and_then(|i| self.records.get(i))
    }
}
