use super::snapshot::SessionSnapshot;
use crate::error::Result;

/// Trait for session storage backends
pub trait SessionStore: Send + Sync {
    /// Find the most recent snapshot that has not expired
    fn find_recent_session(&self) -> Option<SessionSnapshot>;

    fn save_session(&self, snapshot: &SessionSnapshot) -> Result<()>;

    /// Clear all sessions
    fn clear_all_sessions(&self) -> Result<()>;
}
