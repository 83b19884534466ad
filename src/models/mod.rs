mod message;
mod results;
mod tool;

pub use message::{Message, MessageContent, Role};
pub use results::{
    LastResultSet, ResultKind, COMPANY_INFO_TOOL, JOB_SEARCH_TOOL, PEOPLE_SEARCH_TOOL,
    PROFILE_SCRAPE_TOOL,
};
pub use tool::{ToolCall, ToolDescriptor};
