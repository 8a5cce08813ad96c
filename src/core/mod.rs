//! Allocation core: facts, store port, queries, and the allocator facade.

pub mod allocator;
pub mod audit;
pub mod error;
pub mod fact;
pub mod iri;
pub mod query;
pub mod registry;
pub mod status;
pub mod store;
pub mod vocab;

pub use allocator::{Allocator, ScheduleOptions};
pub use audit::{build_audit_event, AuditEvent, AuditSink, InMemoryAuditSink, TracingAuditSink};
pub use error::{AllocResult, AllocatorError, AppResult};
pub use fact::{Fact, FactSet};
pub use iri::{document_of, Iri};
pub use query::TaskQuery;
pub use registry::{ScheduleLimits, ScheduleRegistry, SCHEDULE_FRAGMENT};
pub use status::StatusManager;
pub use store::{swap_in_place, FactStore};
pub use vocab::TaskStatus;
