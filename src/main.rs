use clap::Parser;
use colored::*;
use std::path::Path;
use std::process;
use tracing::{debug, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use linkscout::cli::Args;
use linkscout::config::{load_dotenv, Config};
use linkscout::error::Result;
use linkscout::server;
use linkscout::session::{
    open_session, FilesystemSessionStore, LiveSession, SessionSnapshot, SessionStore,
};
use linkscout::ui;

#[tokio::main]
async fn main() {
    let args = Args::parse();
    load_dotenv(Path::new(".env"));

    // Handle --clear option
    if args.clear_history {
        match FilesystemSessionStore::new().clear_all_sessions() {
            Ok(_) => {
                println!("{}", "All conversation history cleared.".green());
                return;
            }
            Err(e) => {
                eprintln!("{}", format!("Error clearing history: {}", e).red());
                process::exit(1);
            }
        }
    }

    let config = match Config::from_env_and_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "Error:".red(), e);
            process::exit(1);
        }
    };

    init_tracing(config.verbose);
    debug!(
        "Using model {} at {}, MCP server {}",
        config.model, config.api_endpoint, config.mcp_server_path
    );

    let outcome = if args.serve {
        server::serve(config).await
    } else if let Some(query) = args.query() {
        run_once(&config, &query, args.new_conversation).await
    } else {
        run_chat(&config).await
    };

    if let Err(e) = outcome {
        ui::display_error(&e.to_string());
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "linkscout=debug,tower_http=debug"
    } else {
        "linkscout=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Answers one query, continuing the most recent saved conversation.
async fn run_once(config: &Config, query: &str, new_conversation: bool) -> Result<()> {
    let store = FilesystemSessionStore::new();
    let mut snapshot = if new_conversation {
        SessionSnapshot::new()
    } else {
        store.find_recent_session().unwrap_or_default()
    };

    let mut session = open_session(config).await?;
    session.restore(snapshot.messages.clone(), snapshot.last_results.clone());

    let outcome = session.submit(query).await;
    close(&session).await;
    let answer = outcome?;

    ui::display_response(&answer);

    snapshot.update(
        session.history(),
        session.last_results(),
        config.history_window,
    );
    if let Err(e) = store.save_session(&snapshot) {
        warn!("Failed to save session: {}", e);
    }

    Ok(())
}

/// Interactive chat until `quit` or end of input.
async fn run_chat(config: &Config) -> Result<()> {
    let mut session = open_session(config).await?;
    let tool_names: Vec<&str> = session.tools().iter().map(|t| t.name.as_str()).collect();
    ui::display_banner(&tool_names);

    loop {
        let line = match tokio::task::spawn_blocking(ui::prompt).await {
            Ok(Ok(Some(line))) => line,
            Ok(Ok(None)) => break,
            Ok(Err(e)) => {
                close(&session).await;
                return Err(e.into());
            }
            Err(e) => {
                close(&session).await;
                return Err(e.to_string().into());
            }
        };

        match line.to_lowercase().as_str() {
            "quit" | "exit" | "q" => break,
            "clear" => {
                session.clear();
                ui::display_cleared();
                continue;
            }
            "" => continue,
            _ => {}
        }

        match session.submit(&line).await {
            Ok(answer) => ui::display_response(&answer),
            Err(e) => {
                ui::display_error(&e.to_string());
                ui::display_status("Please try again or rephrase your question.");
            }
        }
    }

    ui::display_goodbye();
    close(&session).await;
    Ok(())
}

async fn close(session: &LiveSession) {
    if let Err(e) = session.shutdown().await {
        warn!("Failed to stop MCP server: {}", e);
    }
}
