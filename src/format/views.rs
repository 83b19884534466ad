use serde_json::Value;

use super::fields::{
    first_present, first_present_or, truncate_chars, FallbackChain, DESCRIPTION_PREVIEW_CHARS,
};
use crate::models::ResultKind;

pub const JOB_TITLE: FallbackChain = &["title"];
pub const JOB_COMPANY: FallbackChain = &["company", "companyName", "company_name"];
pub const JOB_LOCATION: FallbackChain = &["location"];
pub const JOB_POSTED: FallbackChain = &["posted_at"];
pub const JOB_DESCRIPTION: FallbackChain = &["description"];
pub const JOB_URL: FallbackChain = &["job_url"];

pub const PROFILE_NAME: FallbackChain = &["name"];
pub const PROFILE_FIRST_NAME: FallbackChain = &["first_name"];
pub const PROFILE_LAST_NAME: FallbackChain = &["last_name"];
pub const PROFILE_HEADLINE: FallbackChain = &["headline"];
pub const PROFILE_LOCATION: FallbackChain = &["location"];
pub const PROFILE_URL: FallbackChain = &["profile_url", "url"];

pub const COMPANY_NAME: FallbackChain = &["name"];
pub const COMPANY_INDUSTRY: FallbackChain = &["industry"];
pub const COMPANY_SIZE: FallbackChain = &["company_size", "staffCount"];
pub const COMPANY_WEBSITE: FallbackChain = &["website", "companyPageUrl"];

pub const ITEM_LABEL: FallbackChain = &["title", "name"];

const LOCATION_PLACEHOLDER: &str = "Location not specified";
const URL_PLACEHOLDER: &str = "N/A";

#[derive(Debug, Clone, PartialEq)]
pub struct JobView {
    pub title: String,
    pub company: String,
    pub location: String,
    pub posted_at: Option<String>,
    pub description: Option<String>,
    pub url: String,
}

impl JobView {
    pub fn from_record(record: &Value) -> Self {
        Self {
            title: first_present_or(record, JOB_TITLE, "Unknown Position"),
            company: first_present_or(record, JOB_COMPANY, "Company not specified"),
            location: first_present_or(record, JOB_LOCATION, LOCATION_PLACEHOLDER),
            posted_at: first_present(record, JOB_POSTED),
            description: first_present(record, JOB_DESCRIPTION)
                .map(|d| truncate_chars(&d, DESCRIPTION_PREVIEW_CHARS)),
            url: first_present_or(record, JOB_URL, URL_PLACEHOLDER),
        }
    }

    fn block(&self, number: usize) -> String {
        let mut out = format!("{}. **{}**\n", number, self.title);
        out.push_str(&format!("   🏢 Company: {}\n", self.company));
        out.push_str(&format!("   📍 Location: {}\n", self.location));
        if let Some(posted) = &self.posted_at {
            out.push_str(&format!("   🕒 Posted: {}\n", posted));
        }
        if let Some(description) = &self.description {
            out.push_str(&format!("   📝 {}\n", description));
        }
        out.push_str(&format!("   🔗 Apply: {}\n\n", self.url));
        out
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileView {
    pub name: String,
    pub headline: String,
    pub location: String,
    pub url: String,
}

impl ProfileView {
    pub fn from_record(record: &Value) -> Self {
        let name = first_present(record, PROFILE_NAME)
            .or_else(|| {
                let first = first_present(record, PROFILE_FIRST_NAME).unwrap_or_default();
                let last = first_present(record, PROFILE_LAST_NAME).unwrap_or_default();
                let joined = format!("{} {}", first, last).trim().to_string();
                (!joined.is_empty()).then_some(joined)
            })
            .unwrap_or_else(|| "Name not available".to_string());

        Self {
            name,
            headline: first_present_or(record, PROFILE_HEADLINE, "Headline not available"),
            location: first_present_or(record, PROFILE_LOCATION, LOCATION_PLACEHOLDER),
            url: first_present_or(record, PROFILE_URL, URL_PLACEHOLDER),
        }
    }

    fn block(&self, number: usize) -> String {
        let mut out = format!("{}. **{}**\n", number, self.name);
        out.push_str(&format!("   💼 {}\n", self.headline));
        out.push_str(&format!("   📍 {}\n", self.location));
        out.push_str(&format!("   🔗 Profile: {}\n\n", self.url));
        out
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompanyView {
    pub name: String,
    pub industry: String,
    pub size: String,
    pub website: String,
}

impl CompanyView {
    pub fn from_record(record: &Value) -> Self {
        Self {
            name: first_present_or(record, COMPANY_NAME, "Company name not available"),
            industry: first_present_or(record, COMPANY_INDUSTRY, "Industry not specified"),
            size: first_present_or(record, COMPANY_SIZE, "Size not specified"),
            website: first_present_or(record, COMPANY_WEBSITE, URL_PLACEHOLDER),
        }
    }

    fn block(&self, number: usize) -> String {
        let mut out = format!("{}. **{}**\n", number, self.name);
        out.push_str(&format!("   🏢 Industry: {}\n", self.industry));
        out.push_str(&format!("   👥 Size: {} employees\n", self.size));
        out.push_str(&format!("   🌐 Website: {}\n\n", self.website));
        out
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemView {
    pub label: String,
}

impl ItemView {
    pub fn from_record(record: &Value) -> Self {
        let label = first_present(record, ITEM_LABEL).unwrap_or_else(|| match record {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        });
        Self { label }
    }

    fn block(&self, number: usize) -> String {
        format!("{}. {}\n\n", number, self.label)
    }
}

/// A heterogeneous record normalised for display according to its kind.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordView {
    Job(JobView),
    Profile(ProfileView),
    Company(CompanyView),
    Item(ItemView),
}

impl RecordView {
    pub fn from_record(kind: ResultKind, record: &Value) -> Self {
        match kind {
            ResultKind::Job => RecordView::Job(JobView::from_record(record)),
            ResultKind::Profile => RecordView::Profile(ProfileView::from_record(record)),
            ResultKind::Company => RecordView::Company(CompanyView::from_record(record)),
            ResultKind::Item => RecordView::Item(ItemView::from_record(record)),
        }
    }

    /// Numbered block for this record; `number` is 1-based.
    pub fn block(&self, number: usize) -> String {
        match self {
            RecordView::Job(view) => view.block(number),
            RecordView::Profile(view) => view.block(number),
            RecordView::Company(view) => view.block(number),
            RecordView::Item(view) => view.block(number),
        }
    }
}
