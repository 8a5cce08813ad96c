//! Vocabulary used for task lists and task status facts.

use serde::{Deserialize, Serialize};

/// Namespace shared by every predicate and status the allocator understands.
pub const NS: &str = "https://ns.bergnet.org/boomerang#";

/// Predicate linking a task list to one of its tasks.
pub const HAS_TASK: &str = "https://ns.bergnet.org/boomerang#hasTask";

/// Predicate carrying a task's lifecycle status.
pub const STATUS: &str = "https://ns.bergnet.org/boomerang#status";

/// Status object of an unclaimed task.
pub const CREATED: &str = "https://ns.bergnet.org/boomerang#created";

/// Status object of a task held by an agent's schedule.
pub const ASSIGNED: &str = "https://ns.bergnet.org/boomerang#assigned";

/// Lifecycle status of a task.
///
/// Only `Created` and `Assigned` drive allocation; anything else written by
/// other producers (e.g. a worker marking a task done) is carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Unclaimed, eligible for allocation.
    Created,
    /// Claimed by some agent's current schedule.
    Assigned,
    /// Any other status identifier.
    Other(String),
}

impl TaskStatus {
    /// Resource identifier stored as the object of the status fact.
    pub fn as_iri(&self) -> &str {
        match self {
            Self::Created => CREATED,
            Self::Assigned => ASSIGNED,
            Self::Other(iri) => iri,
        }
    }

    /// Map a status fact object back to a status.
    pub fn from_iri(iri: &str) -> Self {
        match iri {
            CREATED => Self::Created,
            ASSIGNED => Self::Assigned,
            other => Self::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_iri())
    }
}
