use regex::Regex;
use std::collections::HashMap;
use std::env;
use std::path::Path;
use std::sync::OnceLock;

fn env_ref_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env reference pattern"))
}

/// Expand environment variables in a string using ${VAR_NAME} syntax
///
/// Unknown variables are left as written.
pub fn expand_env_var_in_string(value: &str) -> String {
    env_ref_pattern()
        .replace_all(value, |caps: &regex::Captures| {
            env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
        })
        .into_owned()
}

/// Expand environment variables in a HashMap
pub fn expand_env_vars(env: &HashMap<String, String>) -> HashMap<String, String> {
    env.iter()
        .map(|(key, value)| (key.clone(), expand_env_var_in_string(value)))
        .collect()
}

/// Parses `KEY=VALUE` lines; blank lines and `#` comments are skipped and
/// surrounding quotes are stripped.
pub fn parse_dotenv(contents: &str) -> Vec<(String, String)> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let line = line.strip_prefix("export ").unwrap_or(line);
            let (key, value) = line.split_once('=')?;
            let value = value.trim().trim_matches('"').trim_matches('\'');
            Some((key.trim().to_string(), value.to_string()))
        })
        .collect()
}

/// Loads a `.env` file into the process environment without overriding
/// variables that are already set. Returns whether a file was read.
pub fn load_dotenv(path: &Path) -> bool {
    let Ok(contents) = std::fs::read_to_string(path) else {
        return false;
    };
    for (key, value) in parse_dotenv(&contents) {
        if env::var(&key).is_err() {
            env::set_var(key, value);
        }
    }
    true
}

/// Accepts the usual truthy spellings.
pub fn parse_flag(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "1" | "yes")
}
