//! API-facing request/response models.

use serde::{Deserialize, Serialize};

use crate::core::{AllocResult, Allocator, ScheduleOptions};

/// Request for the next batch of work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRequest {
    /// Agent identity.
    pub agent: String,
}

/// Published schedule for an agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleResponse {
    /// Agent identity.
    pub agent: String,
    /// Schedule list holding the batch.
    pub schedule_iri: String,
    /// Tasks in the batch, retained ones first.
    pub tasks: Vec<String>,
}

/// Outcome of a release or clean call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseResponse {
    /// Number of tasks reset to `created`.
    pub released: usize,
    /// Number of schedule documents deleted.
    pub cleaned: usize,
}

/// Health response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Health {
    /// Healthy flag.
    pub ok: bool,
    /// Agents currently tracked by the registry.
    pub tracked_agents: usize,
}

/// Run one allocation cycle for the requesting agent.
pub async fn schedule_agent(
    allocator: &Allocator,
    req: ScheduleRequest,
) -> AllocResult<ScheduleResponse> {
    let options = ScheduleOptions::for_agent(req.agent);
    let tasks = allocator.schedule(&options).await?;
    Ok(ScheduleResponse {
        schedule_iri: allocator.get_schedule_iri(&options.agent),
        agent: options.agent,
        tasks,
    })
}

/// Full reset: release every assigned task, then delete every schedule.
pub async fn release_all(allocator: &Allocator) -> AllocResult<ReleaseResponse> {
    let released = allocator.release_assigned_tasks().await?;
    let cleaned = allocator.clean().await?;
    Ok(ReleaseResponse { released, cleaned })
}

/// Return a health payload.
pub fn health(allocator: &Allocator) -> Health {
    Health {
        ok: true,
        tracked_agents: allocator.registry().agent_count(),
    }
}
