use chrono::Utc;
use thread_lens::model::{
    normalize_title, ConversationEvent, EventId, InvocationId, ThreadId, ThreadRecord,
    ToolStatus, DEFAULT_THREAD_TITLE,
};

#[test]
fn tool_result_defaults() {
    let json = r#"{"type":"tool","id":"m2","content":"ok"}"#;
    let event: ConversationEvent = serde_json::from_str(json).unwrap();
    let result = event.as_tool_result().unwrap();

    assert_eq!(result.status, ToolStatus::Success);
    assert!(result.invocation_id.is_none());
    assert!(result.name.is_none());
}

#[test]
fn blank_tool_call_id_reads_as_absent() {
    let json = r#"{"type":"tool","id":"m2","tool_call_id":"","status":"pending","content":""}"#;
    let event: ConversationEvent = serde_json::from_str(json).unwrap();
    let result = event.as_tool_result().unwrap();

    assert!(result.invocation_id.is_none());
    assert_eq!(result.status, ToolStatus::Pending);
}

#[test]
fn unknown_event_type_is_rejected() {
    let json = r#"{"type":"system","id":"m0","content":"hi"}"#;
    assert!(serde_json::from_str::<ConversationEvent>(json).is_err());
}

#[test]
fn assistant_turn_serializes_with_wire_names() {
    let json = r#"{"type":"ai","id":"m1","content":"hi","tool_calls":[{"id":"a1","name":"search"}]}"#;
    let event: ConversationEvent = serde_json::from_str(json).unwrap();

    let value = serde_json::to_value(&event).unwrap();
    assert_eq!(value["type"], "ai");
    assert_eq!(value["tool_calls"][0]["id"], "a1");
    assert_eq!(event.kind_label(), "ai");
}

#[test]
fn generated_ids_are_unique_uuids() {
    let a = ThreadId::generate();
    let b = ThreadId::generate();
    assert_ne!(a, b);
    assert_eq!(a.as_str().len(), 36);
    assert!(EventId::try_new("  ").is_none());
    assert_eq!(InvocationId::from("a1").as_str(), "a1");
}

#[test]
fn thread_record_title_placeholder() {
    let now = Utc::now();
    let record = ThreadRecord::new(ThreadId::new("t1"), None, now);
    assert_eq!(record.title, DEFAULT_THREAD_TITLE);
    assert_eq!(record.created_at, now);
    assert!(!record.is_deleted);
    assert_eq!(normalize_title(Some("  Plans ".into())), "Plans");
}
