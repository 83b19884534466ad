use colored::*;
use std::io::{self, Write};

/// Display the assistant's answer
pub fn display_response(content: &str) {
    println!();
    println!("{} {}", "AI:".green().bold(), content.trim_end());
    println!();
}

/// Display an error without leaving the chat
pub fn display_error(error: &str) {
    eprintln!("{} {}", "Error:".red().bold(), error);
}

/// Display a dimmed hint on stderr, such as the retry suggestion after a failed query
pub fn display_status(status: &str) {
    eprintln!("{}", status.dimmed());
}

pub fn display_cleared() {
    println!("\n{}\n", "🔄 Conversation cleared!".yellow());
}

pub fn display_goodbye() {
    println!("\n{}", "👋 Goodbye!".cyan());
}

/// Welcome text for the interactive chat
pub fn display_banner(tool_names: &[&str]) {
    let rule = "=".repeat(80);
    println!("{}", rule.blue());
    println!("{}", "LinkedIn Search Assistant - Conversational Mode".bold());
    println!("{}", rule.blue());
    if !tool_names.is_empty() {
        println!("\n{} {}", "Tools:".dimmed(), tool_names.join(", ").dimmed());
    }
    println!("\n💡 Ask questions and follow up naturally!");
    println!("\nExamples:");
    println!("  • 'Search for Python developer jobs in San Francisco'");
    println!("  • 'Tell me more about job #2'");
    println!("  • 'What's the salary for the first one?'");
    println!("  • 'Get information about Google as a company'");
    println!("  • 'Find machine learning engineers in New York'");
    println!("\n📝 Commands:");
    println!("  • 'clear' - Clear conversation history");
    println!("  • 'quit' or 'exit' - Exit the chat");
    println!("{}", "-".repeat(80).blue());
    println!();
}

/// Prints the input prompt and reads one line. `None` on end of input.
pub fn prompt() -> io::Result<Option<String>> {
    print!("{} ", "You:".cyan().bold());
    io::stdout().flush()?;

    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
