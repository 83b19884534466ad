use chrono::Local;
use linkscout::models::{LastResultSet, Message, ResultKind};
use linkscout::session::{context_preamble, FilesystemSessionStore, SessionSnapshot, SessionStore};
use serde_json::{json, Value};
use std::fs;
use tempfile::TempDir;

fn create_test_snapshot(id: &str, age_minutes: i64) -> SessionSnapshot {
    SessionSnapshot {
        session_id: id.to_string(),
        last_updated: Local::now() - chrono::Duration::minutes(age_minutes),
        messages: vec![Message::user("test", None)],
        last_results: None,
    }
}

#[test]
fn test_save_and_find_recent_session() {
    let temp_dir = TempDir::new().unwrap();
    let store = FilesystemSessionStore::with_dir(temp_dir.path());

    store
        .save_session(&create_test_snapshot("test-123", 0))
        .unwrap();

    let found = store.find_recent_session().unwrap();
    assert_eq!(found.session_id, "test-123");
    assert_eq!(found.messages, vec![Message::user("test", None)]);
}

#[test]
fn test_snapshot_keeps_last_results() {
    let temp_dir = TempDir::new().unwrap();
    let store = FilesystemSessionStore::with_dir(temp_dir.path());

    let mut snapshot = create_test_snapshot("with-results", 0);
    let results = LastResultSet::new(
        ResultKind::Job,
        vec![json!({"title": "Backend Engineer"}), json!({"title": "SRE"})],
    );
    snapshot.last_results = Some(results.clone());
    store.save_session(&snapshot).unwrap();

    let found = store.find_recent_session().unwrap();
    assert_eq!(found.last_results, Some(results));
}

#[test]
fn test_tampered_result_count_is_ignored() {
    let temp_dir = TempDir::new().unwrap();
    let store = FilesystemSessionStore::with_dir(temp_dir.path());

    let mut snapshot = create_test_snapshot("tampered", 0);
    snapshot.last_results = Some(LastResultSet::new(
        ResultKind::Job,
        vec![json!({"title": "A"})],
    ));
    store.save_session(&snapshot).unwrap();

    let path = temp_dir.path().join("session-tampered.json");
    let mut saved: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    saved["last_results"]["count"] = json!(5);
    fs::write(&path, serde_json::to_string(&saved).unwrap()).unwrap();

    let found = store.find_recent_session().unwrap();
    let last = found.last_results.unwrap();
    assert_eq!(last.count(), 1);
    assert!(last.get(2).is_none());

    let preamble = context_preamble(&last, 3);
    assert!(preamble.contains("User has 1 job(s)"));
    assert!(preamble.contains("\"A\""));
}

#[test]
fn test_find_recent_session_expired() {
    let temp_dir = TempDir::new().unwrap();
    let store = FilesystemSessionStore::with_dir(temp_dir.path());

    // 60 minutes old
    store
        .save_session(&create_test_snapshot("expired-123", 60))
        .unwrap();

    assert!(store.find_recent_session().is_none());
    // Expired snapshot is removed from disk
    assert!(!temp_dir.path().join("session-expired-123.json").exists());
}

#[test]
fn test_clear_all_sessions() {
    let temp_dir = TempDir::new().unwrap();
    let store = FilesystemSessionStore::with_dir(temp_dir.path());

    store.save_session(&create_test_snapshot("one", 0)).unwrap();
    store.save_session(&create_test_snapshot("two", 0)).unwrap();
    fs::write(temp_dir.path().join("notes.txt"), "keep me").unwrap();

    store.clear_all_sessions().unwrap();

    assert!(store.find_recent_session().is_none());
    assert!(temp_dir.path().join("notes.txt").exists());
}

#[test]
fn test_find_most_recent_session() {
    let temp_dir = TempDir::new().unwrap();
    let store = FilesystemSessionStore::with_dir(temp_dir.path());

    store.save_session(&create_test_snapshot("old", 10)).unwrap();
    store.save_session(&create_test_snapshot("new", 0)).unwrap();

    let found = store.find_recent_session().unwrap();
    assert_eq!(found.session_id, "new");
}

#[test]
fn test_unreadable_files_are_ignored() {
    let temp_dir = TempDir::new().unwrap();
    let store = FilesystemSessionStore::with_dir(temp_dir.path());

    fs::write(temp_dir.path().join("session-broken.json"), "{ nope").unwrap();
    store.save_session(&create_test_snapshot("good", 0)).unwrap();

    assert_eq!(store.find_recent_session().unwrap().session_id, "good");
}

#[test]
fn test_update_trims_to_window() {
    let mut snapshot = SessionSnapshot::new();
    let messages: Vec<Message> = (0..14)
        .map(|i| Message::user(format!("q{}", i), None))
        .collect();

    snapshot.update(&messages, None, 10);

    assert_eq!(snapshot.messages.len(), 10);
    assert_eq!(snapshot.messages[0], Message::user("q4", None));
    assert!(snapshot.last_results.is_none());
}
