//! Agent to schedule-list identity mapping.

use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::Mutex;
use uuid::Uuid;

/// Fragment appended to every minted schedule identifier.
pub const SCHEDULE_FRAGMENT: &str = "#schedule";

/// Limits applied to every agent's schedule.
#[derive(Debug, Clone)]
pub struct ScheduleLimits {
    /// Maximum tasks an agent may hold assigned at once.
    pub tasks_per_agent: usize,
    /// Maximum agent identities remembered before the least recently seen is evicted.
    pub max_tracked_agents: NonZeroUsize,
}

impl Default for ScheduleLimits {
    fn default() -> Self {
        Self {
            tasks_per_agent: 5,
            max_tracked_agents: NonZeroUsize::new(1024).unwrap_or(NonZeroUsize::MIN),
        }
    }
}

/// Process-lifetime registry of schedule identifiers per agent.
///
/// Identifiers are random, so a restarted process mints new ones even for
/// agents it has seen before. The registry is bounded; an evicted agent's
/// identifier is kept on a retired list until its document has been cleaned.
pub struct ScheduleRegistry {
    base_iri: String,
    limits: ScheduleLimits,
    agents: Mutex<LruCache<String, String>>,
    retired: Mutex<Vec<String>>,
}

impl ScheduleRegistry {
    /// Create a registry minting identifiers under `base_iri`.
    pub fn new(base_iri: impl Into<String>, limits: ScheduleLimits) -> Self {
        Self {
            base_iri: base_iri.into(),
            agents: Mutex::new(LruCache::new(limits.max_tracked_agents)),
            retired: Mutex::new(Vec::new()),
            limits,
        }
    }

    /// Maximum tasks an agent may hold assigned at once.
    pub const fn tasks_per_agent(&self) -> usize {
        self.limits.tasks_per_agent
    }

    /// Configured limits.
    pub const fn limits(&self) -> &ScheduleLimits {
        &self.limits
    }

    /// Schedule identifier for `agent`, minted on first use and stable afterwards.
    pub fn schedule_iri(&self, agent: &str) -> String {
        let mut agents = self.agents.lock();
        if let Some(iri) = agents.get(agent) {
            return iri.clone();
        }

        let iri = format!(
            "{}{}{}",
            self.base_iri,
            Uuid::new_v4().simple(),
            SCHEDULE_FRAGMENT
        );
        if let Some((evicted_agent, evicted_iri)) = agents.push(agent.to_string(), iri.clone()) {
            tracing::warn!(
                "registry full, evicting agent {} (schedule {})",
                evicted_agent,
                evicted_iri
            );
            self.retired.lock().push(evicted_iri);
        }
        tracing::info!("minted schedule {} for agent {}", iri, agent);
        iri
    }

    /// Whether `agent` currently has a cached identifier.
    pub fn contains(&self, agent: &str) -> bool {
        self.agents.lock().contains(agent)
    }

    /// Number of agents currently cached.
    pub fn agent_count(&self) -> usize {
        self.agents.lock().len()
    }

    /// Every schedule identifier whose document may still exist: cached agents
    /// first, then retired ones.
    pub fn schedule_iris(&self) -> Vec<String> {
        let mut iris: Vec<String> = self.agents.lock().iter().map(|(_, iri)| iri.clone()).collect();
        iris.extend(self.retired.lock().iter().cloned());
        iris
    }

    /// Forget retired identifiers whose documents were removed.
    pub fn forget_retired(&self, removed: &[String]) {
        self.retired.lock().retain(|iri| !removed.contains(iri));
    }
}
