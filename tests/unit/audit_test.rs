//! Tests for audit sink

use prometheus_task_allocator::core::{build_audit_event, AuditSink, InMemoryAuditSink};

#[test]
fn test_in_memory_audit_sink() {
    let mut sink = InMemoryAuditSink::new(10);

    let event = build_audit_event(
        "claim",
        Some("agent-1"),
        "http://example.org/task/t1#it",
        Some("payload".to_string()),
    );

    sink.record(event);
    assert_eq!(sink.events().len(), 1);

    let events = sink.events();
    assert_eq!(events[0].action, "claim");
    assert_eq!(events[0].agent.as_deref(), Some("agent-1"));
    assert_eq!(events[0].subject, "http://example.org/task/t1#it");
}

#[test]
fn test_audit_sink_overflow() {
    let mut sink = InMemoryAuditSink::new(2);

    sink.record(build_audit_event("claim", Some("a"), "t1", None));
    sink.record(build_audit_event("claim", Some("a"), "t2", None));
    sink.record(build_audit_event("claim", Some("a"), "t3", None));

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].subject, "t2"); // First one popped
    assert_eq!(events[1].subject, "t3");
}

#[test]
fn test_build_audit_event() {
    let event = build_audit_event("clean", None, "schedule", Some("result".to_string()));

    assert_eq!(event.action, "clean");
    assert_eq!(event.agent, None);
    assert_eq!(event.subject, "schedule");
    assert_eq!(event.payload, Some("result".to_string()));
    assert!(event.created_at_ms > 0);
    assert_ne!(event.event_id, build_audit_event("clean", None, "schedule", None).event_id);
}
