use super::snapshot::SessionSnapshot;
use super::storage::SessionStore;
use crate::error::{LinkscoutError, Result};
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const SESSION_EXPIRY_MINUTES: i64 = 30;

/// Stores snapshots as `session-<id>.json` files, by default under
/// `~/.cache/linkscout`.
pub struct FilesystemSessionStore {
    root: Option<PathBuf>,
}

impl FilesystemSessionStore {
    pub fn new() -> Self {
        Self { root: None }
    }

    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(dir.into()),
        }
    }

    fn get_cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = match &self.root {
            Some(dir) => dir.clone(),
            None => dirs::home_dir()
                .ok_or_else(|| {
                    LinkscoutError::ConfigError("Could not determine home directory".to_string())
                })?
                .join(".cache")
                .join("linkscout"),
        };
        if !cache_dir.exists() {
            fs::create_dir_all(&cache_dir)?;
        }
        Ok(cache_dir)
    }

    fn is_session_file(path: &Path) -> bool {
        path.extension().and_then(|e| e.to_str()) == Some("json")
            && path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("session-"))
    }
}

impl SessionStore for FilesystemSessionStore {
    fn find_recent_session(&self) -> Option<SessionSnapshot> {
        let cache_dir = self.get_cache_dir().ok()?;
        let now = Local::now();

        let mut sessions: Vec<(PathBuf, SessionSnapshot)> = fs::read_dir(&cache_dir)
            .ok()?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| Self::is_session_file(path))
            .filter_map(|path| {
                let content = fs::read_to_string(&path).ok()?;
                let snapshot: SessionSnapshot = serde_json::from_str(&content).ok()?;
                Some((path, snapshot))
            })
            .collect();

        // Most recent first
        sessions.sort_by(|a, b| b.1.last_updated.cmp(&a.1.last_updated));

        let (path, snapshot) = sessions.into_iter().next()?;
        let age_minutes = now
            .signed_duration_since(snapshot.last_updated)
            .num_minutes();
        if age_minutes.abs() < SESSION_EXPIRY_MINUTES {
            Some(snapshot)
        } else {
            debug!("Removing expired session {}", snapshot.session_id);
            let _ = fs::remove_file(path);
            None
        }
    }

    fn save_session(&self, snapshot: &SessionSnapshot) -> Result<()> {
        let cache_dir = self.get_cache_dir()?;
        let session_file = cache_dir.join(format!("session-{}.json", snapshot.session_id));
        let content = serde_json::to_string_pretty(snapshot)?;
        fs::write(session_file, content)?;
        Ok(())
    }

    fn clear_all_sessions(&self) -> Result<()> {
        let cache_dir = self.get_cache_dir()?;
        for entry in fs::read_dir(&cache_dir)?.filter_map(|e| e.ok()) {
            let path = entry.path();
            if Self::is_session_file(&path) {
                fs::remove_file(path)?;
            }
        }
        Ok(())
    }
}

impl Default for FilesystemSessionStore {
    fn default() -> Self {
        Self::new()
    }
}
