use std::thread::sleep;
use std::time::Duration;

use tempfile::TempDir;
use thread_lens::error::StoreError;
use thread_lens::model::{ThreadId, DEFAULT_THREAD_TITLE};
use thread_lens::store::{
    JsonFileHistory, MemoryHistory, SqliteThreadStore, ThreadHistory, ThreadStore,
};

fn ids(store: &SqliteThreadStore) -> Vec<String> {
    store
        .list()
        .unwrap()
        .into_iter()
        .map(|r| r.thread_id.to_string())
        .collect()
}

// ============================================================================
// Thread metadata store
// ============================================================================

#[test]
fn create_then_get_round_trips() {
    let store = SqliteThreadStore::open_in_memory().unwrap();
    let created = store
        .create(&ThreadId::new("t1"), Some("Trip".into()))
        .unwrap();

    let fetched = store.get(&ThreadId::new("t1")).unwrap().unwrap();
    assert_eq!(fetched, created);
    assert_eq!(fetched.title, "Trip");
    assert!(!fetched.is_deleted);
    assert_eq!(fetched.created_at, fetched.last_accessed_at);
}

#[test]
fn missing_title_defaults_to_placeholder() {
    let store = SqliteThreadStore::open_in_memory().unwrap();
    let record = store.create(&ThreadId::new("t1"), None).unwrap();
    assert_eq!(record.title, DEFAULT_THREAD_TITLE);
}

#[test]
fn duplicate_create_is_rejected() {
    let store = SqliteThreadStore::open_in_memory().unwrap();
    store.create(&ThreadId::new("t1"), None).unwrap();

    let err = store.create(&ThreadId::new("t1"), None).unwrap_err();
    assert!(matches!(err, StoreError::Duplicate(ref id) if id == "t1"));
}

#[test]
fn list_orders_by_last_access_and_skips_deleted() {
    let store = SqliteThreadStore::open_in_memory().unwrap();
    for id in ["a", "b", "c"] {
        store.create(&ThreadId::new(id), None).unwrap();
        sleep(Duration::from_millis(2));
    }
    assert_eq!(ids(&store), vec!["c", "b", "a"]);

    assert_eq!(store.touch_last_accessed(&ThreadId::new("a")).unwrap(), 1);
    assert_eq!(ids(&store), vec!["a", "c", "b"]);

    assert_eq!(store.soft_delete(&ThreadId::new("c")).unwrap(), 1);
    assert_eq!(ids(&store), vec!["a", "b"]);
}

#[test]
fn soft_delete_keeps_the_row() {
    let store = SqliteThreadStore::open_in_memory().unwrap();
    store.create(&ThreadId::new("t1"), None).unwrap();
    store.soft_delete(&ThreadId::new("t1")).unwrap();

    let record = store.get(&ThreadId::new("t1")).unwrap().unwrap();
    assert!(record.is_deleted);
    assert!(store.list().unwrap().is_empty());
}

#[test]
fn unknown_ids_are_acknowledged() {
    let store = SqliteThreadStore::open_in_memory().unwrap();
    assert_eq!(store.soft_delete(&ThreadId::new("nope")).unwrap(), 0);
    assert_eq!(store.touch_last_accessed(&ThreadId::new("nope")).unwrap(), 0);
    assert!(store.get(&ThreadId::new("nope")).unwrap().is_none());
}

#[test]
fn database_file_persists_across_opens() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("threads.db");

    {
        let store = SqliteThreadStore::open(&path).unwrap();
        store
            .create(&ThreadId::new("t1"), Some("Kept".into()))
            .unwrap();
    }

    let reopened = SqliteThreadStore::open(&path).unwrap();
    let records = reopened.list().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].title, "Kept");
}

// ============================================================================
// Thread history port
// ============================================================================

fn exercise_history(history: &mut dyn ThreadHistory) {
    assert!(history.read_list().unwrap().is_empty());

    history.append(&ThreadId::new("a")).unwrap();
    history.append(&ThreadId::new("b")).unwrap();
    history.append(&ThreadId::new("a")).unwrap();
    assert_eq!(
        history.read_list().unwrap(),
        vec![ThreadId::new("a"), ThreadId::new("b")]
    );

    history.remove(&ThreadId::new("a")).unwrap();
    history.remove(&ThreadId::new("missing")).unwrap();
    assert_eq!(history.read_list().unwrap(), vec![ThreadId::new("b")]);
}

#[test]
fn memory_history_contract() {
    exercise_history(&mut MemoryHistory::new());
}

#[test]
fn json_file_history_contract() {
    let dir = TempDir::new().unwrap();
    let mut history = JsonFileHistory::new(dir.path().join("history.json"));
    exercise_history(&mut history);

    let reread = JsonFileHistory::new(dir.path().join("history.json"));
    assert_eq!(reread.read_list().unwrap(), vec![ThreadId::new("b")]);
}
