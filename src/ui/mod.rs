pub mod output;

pub use output::{
    display_banner, display_cleared, display_error, display_goodbye, display_response,
    display_status, prompt,
};
