//! Audit sink implementations.
//!
//! The allocator records one event per claim, publish, release, and clean when
//! a sink is attached.

use std::collections::VecDeque;

use crate::util::clock::now_ms;

/// Audit event structure.
#[derive(Debug, Clone)]
pub struct AuditEvent {
    /// Event identifier.
    pub event_id: String,
    /// Action taken (claim, publish, release, clean).
    pub action: String,
    /// Agent on whose behalf the action ran, if any.
    pub agent: Option<String>,
    /// Task or schedule identifier the action touched.
    pub subject: String,
    /// Timestamp milliseconds.
    pub created_at_ms: u128,
    /// Additional context.
    pub payload: Option<String>,
}

/// Audit sink abstraction.
pub trait AuditSink: Send {
    /// Record an audit event.
    fn record(&mut self, event: AuditEvent);
}

/// In-memory audit sink for testing and dev.
pub struct InMemoryAuditSink {
    events: VecDeque<AuditEvent>,
    max_events: usize,
}

impl InMemoryAuditSink {
    /// Create a new in-memory sink with a bounded buffer.
    pub fn new(max_events: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(max_events),
            max_events,
        }
    }

    /// Retrieve a snapshot of stored events.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.iter().cloned().collect()
    }
}

impl AuditSink for InMemoryAuditSink {
    fn record(&mut self, event: AuditEvent) {
        if self.events.len() >= self.max_events {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }
}

/// Audit sink that forwards events to `tracing` at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&mut self, event: AuditEvent) {
        tracing::info!(
            target: "audit",
            event_id = %event.event_id,
            action = %event.action,
            agent = event.agent.as_deref().unwrap_or("-"),
            subject = %event.subject,
            "audit event"
        );
    }
}

/// Helper to build an audit event from context.
pub fn build_audit_event(
    action: impl Into<String>,
    agent: Option<&str>,
    subject: impl Into<String>,
    payload: Option<String>,
) -> AuditEvent {
    AuditEvent {
        event_id: uuid::Uuid::new_v4().to_string(),
        action: action.into(),
        agent: agent.map(str::to_string),
        subject: subject.into(),
        created_at_ms: now_ms(),
        payload,
    }
}
