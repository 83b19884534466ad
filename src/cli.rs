use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "linkscout")]
#[command(
    about = "LinkedIn job, people and company search assistant backed by Gemini and an MCP tool server",
    long_about = None
)]
pub struct Args {
    #[arg(short = 'n', long = "new", help = "Start a new conversation")]
    pub new_conversation: bool,

    #[arg(long = "clear", help = "Clear all saved conversation history")]
    pub clear_history: bool,

    #[arg(long = "serve", help = "Run the HTTP/WebSocket chat server")]
    pub serve: bool,

    #[arg(long = "model", help = "Gemini model name (e.g. gemini-2.0-flash-exp)")]
    pub model: Option<String>,

    #[arg(long = "api-endpoint", help = "Custom Gemini API base URL")]
    pub api_endpoint: Option<String>,

    #[arg(long = "mcp-server", help = "Path to the MCP tool server script")]
    pub mcp_server: Option<String>,

    #[arg(long = "host", help = "Address to bind in --serve mode")]
    pub host: Option<String>,

    #[arg(long = "port", help = "Port to bind in --serve mode")]
    pub port: Option<u16>,

    #[arg(short = 'v', long = "verbose", help = "Verbose logging")]
    pub verbose: bool,

    #[arg(help = "Query to send; starts an interactive chat when omitted")]
    pub command: Vec<String>,
}

impl Args {
    pub fn query(&self) -> Option<String> {
        let query = self.command.join(" ");
        let query = query.trim();
        (!query.is_empty()).then(|| query.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn words_are_joined_into_one_query() {
        let args = Args::parse_from(["linkscout", "find", "rust", "jobs"]);
        assert_eq!(args.query().as_deref(), Some("find rust jobs"));
    }

    #[test]
    fn no_words_means_interactive() {
        let args = Args::parse_from(["linkscout", "-v"]);
        assert!(args.verbose);
        assert!(args.query().is_none());
    }
}
