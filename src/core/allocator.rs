//! Allocator facade: plans, claims, and publishes per-agent schedules.

use std::sync::Arc;

use futures::future::{try_join, try_join_all};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::core::iri::document_of;
use crate::core::vocab::HAS_TASK;
use crate::core::{
    build_audit_event, AllocResult, AuditSink, Fact, FactSet, FactStore, ScheduleLimits,
    ScheduleRegistry, StatusManager, TaskQuery, TaskStatus,
};

/// Options for one allocation cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleOptions {
    /// Agent requesting work.
    pub agent: String,
}

impl ScheduleOptions {
    /// Options for `agent`.
    pub fn for_agent(agent: impl Into<String>) -> Self {
        Self {
            agent: agent.into(),
        }
    }
}

/// Candidate sets read for an agent before any write.
struct Plan {
    schedule_iri: String,
    assigned: Vec<String>,
    assignable: Vec<String>,
}

/// Hands out tasks from the master list to agents, bounded by a per-agent quota.
///
/// Each agent owns one schedule list. Tasks already assigned on that list are
/// always carried into the next batch; free slots are filled from the master
/// list's `created` tasks in store order.
pub struct Allocator {
    store: Arc<dyn FactStore>,
    query: TaskQuery,
    status: StatusManager,
    registry: ScheduleRegistry,
    audit: Option<Arc<Mutex<Box<dyn AuditSink>>>>,
}

impl Allocator {
    /// Create an allocator over `store`.
    pub fn new(
        store: Arc<dyn FactStore>,
        task_list_iri: impl Into<String>,
        schedule_base_iri: impl Into<String>,
        limits: ScheduleLimits,
    ) -> Self {
        Self {
            query: TaskQuery::new(Arc::clone(&store), task_list_iri),
            status: StatusManager::new(Arc::clone(&store)),
            registry: ScheduleRegistry::new(schedule_base_iri, limits),
            store,
            audit: None,
        }
    }

    /// Attach an audit sink.
    pub fn with_audit(mut self, audit: Box<dyn AuditSink>) -> Self {
        self.audit = Some(Arc::new(Mutex::new(audit)));
        self
    }

    /// Task list queries used by this allocator.
    pub const fn query(&self) -> &TaskQuery {
        &self.query
    }

    /// Status manager used by this allocator.
    pub const fn status(&self) -> &StatusManager {
        &self.status
    }

    /// Agent identity registry.
    pub const fn registry(&self) -> &ScheduleRegistry {
        &self.registry
    }

    /// Schedule list identifier for `agent`.
    pub fn get_schedule_iri(&self, agent: &str) -> String {
        self.registry.schedule_iri(agent)
    }

    async fn plan(&self, agent: &str) -> AllocResult<Plan> {
        let schedule_iri = self.registry.schedule_iri(agent);
        let (assigned, assignable) = try_join(
            self.query
                .list_task_iris_by_status(&TaskStatus::Assigned, Some(schedule_iri.as_str())),
            self.query.list_task_iris_by_status(&TaskStatus::Created, None),
        )
        .await?;

        Ok(Plan {
            schedule_iri,
            assigned,
            assignable,
        })
    }

    /// Next batch for `agent` without writing anything.
    ///
    /// Tasks still assigned on the agent's schedule come first, followed by
    /// enough `created` tasks to reach the quota.
    pub async fn next(&self, agent: &str) -> AllocResult<Vec<String>> {
        let plan = self.plan(agent).await?;
        let open = self.registry.tasks_per_agent().saturating_sub(plan.assigned.len());

        let mut batch = plan.assigned;
        batch.extend(plan.assignable.into_iter().take(open));
        Ok(batch)
    }

    /// Run one allocation cycle for `options.agent` and return the published batch.
    ///
    /// New tasks are claimed with an atomic `created -> assigned` swap; a task
    /// claimed by another agent in the meantime is skipped and the next
    /// candidate is tried. Returns once the schedule document holds the
    /// whole batch.
    pub async fn schedule(&self, options: &ScheduleOptions) -> AllocResult<Vec<String>> {
        let agent = options.agent.as_str();
        let plan = self.plan(agent).await?;
        let mut batch = plan.assigned;
        let retained = batch.len();

        let (created, assigned) = (TaskStatus::Created, TaskStatus::Assigned);
        let mut candidates = plan.assignable.into_iter();
        loop {
            let open = self.registry.tasks_per_agent().saturating_sub(batch.len());
            let wave: Vec<String> = candidates.by_ref().take(open).collect();
            if wave.is_empty() {
                break;
            }

            let claims = try_join_all(
                wave.iter()
                    .map(|task_iri| self.status.transition(task_iri, &created, &assigned)),
            )
            .await?;

            for (task_iri, claimed) in wave.into_iter().zip(claims) {
                if claimed {
                    self.record_audit("claim", Some(agent), &task_iri, None);
                    batch.push(task_iri);
                } else {
                    tracing::warn!("task {} claimed elsewhere, skipping for {}", task_iri, agent);
                }
            }
        }

        // Every task in the batch is already assigned: retained ones by an
        // earlier cycle, new ones by the claims above. Only links are written.
        let document = self.recreate_list(&plan.schedule_iri).await?;
        self.link_tasks(&document, &plan.schedule_iri, &batch).await?;
        self.record_audit(
            "publish",
            Some(agent),
            &plan.schedule_iri,
            Some(format!("{} tasks", batch.len())),
        );
        tracing::info!(
            "scheduled {} tasks for {} ({} retained, {} new)",
            batch.len(),
            agent,
            retained,
            batch.len() - retained
        );
        Ok(batch)
    }

    /// Replace the document behind `list_iri` with links to `task_iris`.
    ///
    /// Drops the previous snapshot and recreates an empty document, marks every
    /// task assigned, then merges the links concurrently and waits for all of
    /// them. The first failure is returned; writes already made are not undone.
    ///
    /// Status writes rewrite whole task documents, so this must not race with
    /// claims on the same documents; [`Self::schedule`] publishes without it.
    pub async fn create_task_list(&self, task_iris: &[String], list_iri: &str) -> AllocResult<()> {
        let document = self.recreate_list(list_iri).await?;
        self.status
            .set_task_statuses(task_iris, &TaskStatus::Assigned)
            .await?;
        self.link_tasks(&document, list_iri, task_iris).await
    }

    /// Mark `task_iri` assigned and link it from `list_iri`.
    pub async fn add_task_to_list(&self, task_iri: &str, list_iri: &str) -> AllocResult<()> {
        self.status
            .set_task_status(task_iri, &TaskStatus::Assigned)
            .await?;
        self.link_task(&document_of(list_iri)?, list_iri, task_iri).await
    }

    async fn recreate_list(&self, list_iri: &str) -> AllocResult<String> {
        let document = document_of(list_iri)?;
        self.store.delete(&document).await?;
        self.store.add(&document, FactSet::new()).await?;
        Ok(document)
    }

    async fn link_tasks(&self, document: &str, list_iri: &str, task_iris: &[String]) -> AllocResult<()> {
        try_join_all(
            task_iris
                .iter()
                .map(|task_iri| self.link_task(document, list_iri, task_iri)),
        )
        .await?;
        tracing::debug!("published {} tasks to {}", task_iris.len(), list_iri);
        Ok(())
    }

    async fn link_task(&self, document: &str, list_iri: &str, task_iri: &str) -> AllocResult<()> {
        let link: FactSet = std::iter::once(Fact::new(list_iri, HAS_TASK, task_iri)).collect();
        self.store.merge(document, link).await
    }

    /// Drop the links from `list_iri` to any of `task_iris`, leaving other facts.
    async fn unlink_tasks(&self, list_iri: &str, task_iris: &[String]) -> AllocResult<()> {
        let document = document_of(list_iri)?;
        let mut facts = self.store.graph(&document).await?;
        let removed: usize = task_iris
            .iter()
            .map(|task_iri| facts.remove_matching(Some(list_iri), Some(HAS_TASK), Some(task_iri)))
            .sum();
        if removed > 0 {
            self.store.add(&document, facts).await?;
            tracing::debug!("unlinked {} tasks from {}", removed, list_iri);
        }
        Ok(())
    }

    /// Reset every assigned task on the master list back to `created`.
    ///
    /// Not scoped to an agent: all agents lose their in-flight work. Released
    /// tasks are first unlinked from every schedule this process knows about,
    /// so no agent retains them on its next cycle; schedules minted by an
    /// earlier process are not visited. Resets are atomic per task and run
    /// concurrently; a failure leaves the tasks already reset in place.
    /// Follow with [`Self::clean`] to drop the schedule documents as well.
    pub async fn release_assigned_tasks(&self) -> AllocResult<usize> {
        let assigned = self
            .query
            .list_task_iris_by_status(&TaskStatus::Assigned, None)
            .await?;
        if !assigned.is_empty() {
            let schedule_iris = self.registry.schedule_iris();
            try_join_all(
                schedule_iris
                    .iter()
                    .map(|schedule_iri| self.unlink_tasks(schedule_iri, &assigned)),
            )
            .await?;
        }
        let released = self.reset_to_created(&assigned, None).await?;
        tracing::info!("released {} assigned tasks", released);
        Ok(released)
    }

    /// Reset only the assigned tasks on `agent`'s current schedule and drop
    /// them from that schedule.
    pub async fn release_agent_tasks(&self, agent: &str) -> AllocResult<usize> {
        let schedule_iri = self.registry.schedule_iri(agent);
        let assigned = self
            .query
            .list_task_iris_by_status(&TaskStatus::Assigned, Some(schedule_iri.as_str()))
            .await?;
        self.unlink_tasks(&schedule_iri, &assigned).await?;
        let released = self.reset_to_created(&assigned, Some(agent)).await?;
        tracing::info!("released {} tasks held by {}", released, agent);
        Ok(released)
    }

    async fn reset_to_created(&self, task_iris: &[String], agent: Option<&str>) -> AllocResult<usize> {
        let (assigned, created) = (TaskStatus::Assigned, TaskStatus::Created);
        let resets = try_join_all(
            task_iris
                .iter()
                .map(|task_iri| self.status.transition(task_iri, &assigned, &created)),
        )
        .await?;

        let mut released = 0;
        for (task_iri, reset) in task_iris.iter().zip(resets) {
            if reset {
                released += 1;
                self.record_audit("release", agent, task_iri, None);
            } else {
                tracing::warn!("task {} changed status before release, skipping", task_iri);
            }
        }
        Ok(released)
    }

    /// Delete the schedule document of every agent seen by this process.
    ///
    /// Task statuses are left alone; pair with [`Self::release_assigned_tasks`]
    /// for a full reset.
    pub async fn clean(&self) -> AllocResult<usize> {
        let schedule_iris = self.registry.schedule_iris();
        let documents = schedule_iris
            .iter()
            .map(|iri| document_of(iri))
            .collect::<AllocResult<Vec<_>>>()?;

        try_join_all(documents.iter().map(|document| self.store.delete(document))).await?;
        self.registry.forget_retired(&schedule_iris);

        for iri in &schedule_iris {
            self.record_audit("clean", None, iri, None);
        }
        tracing::info!("cleaned {} schedule documents", documents.len());
        Ok(documents.len())
    }

    fn record_audit(&self, action: &str, agent: Option<&str>, subject: &str, payload: Option<String>) {
        if let Some(audit_sink) = &self.audit {
            let mut sink = audit_sink.lock();
            sink.record(build_audit_event(action, agent, subject, payload));
        }
    }
}
