//! Tests for the transport-facing API helpers

use std::sync::Arc;

use prometheus_task_allocator::core::vocab::{HAS_TASK, STATUS};
use prometheus_task_allocator::core::{
    Allocator, Fact, FactSet, FactStore, ScheduleLimits, TaskStatus,
};
use prometheus_task_allocator::infra::InMemoryStore;
use prometheus_task_allocator::runtime::{
    health, release_all, schedule_agent, ScheduleRequest, ScheduleResponse,
};

const LIST: &str = "http://example.org/tasks#list";

async fn allocator_with_tasks(count: usize) -> Allocator {
    let store = Arc::new(InMemoryStore::new());
    let mut links = FactSet::new();
    let mut statuses = FactSet::new();
    for n in 1..=count {
        let task = format!("http://example.org/task#t{n}");
        links.add(Fact::new(LIST, HAS_TASK, task.as_str()));
        statuses.add(Fact::new(task, STATUS, TaskStatus::Created.as_iri()));
    }
    store.add("http://example.org/tasks", links).await.unwrap();
    store.add("http://example.org/task", statuses).await.unwrap();

    let limits = ScheduleLimits {
        tasks_per_agent: 2,
        ..ScheduleLimits::default()
    };
    Allocator::new(store, LIST, "http://example.org/schedules/", limits)
}

#[tokio::test]
async fn test_schedule_agent_response() {
    let allocator = allocator_with_tasks(3).await;
    let response = schedule_agent(
        &allocator,
        ScheduleRequest {
            agent: "worker-1".into(),
        },
    )
    .await
    .unwrap();

    assert_eq!(response.agent, "worker-1");
    assert_eq!(response.schedule_iri, allocator.get_schedule_iri("worker-1"));
    assert_eq!(
        response.tasks,
        vec!["http://example.org/task#t1", "http://example.org/task#t2"]
    );

    let json = serde_json::to_string(&response).unwrap();
    let back: ScheduleResponse = serde_json::from_str(&json).unwrap();
    assert_eq!(back.tasks, response.tasks);
}

#[tokio::test]
async fn test_release_all_resets_everything() {
    let allocator = allocator_with_tasks(3).await;
    for agent in ["a", "b"] {
        schedule_agent(&allocator, ScheduleRequest { agent: agent.into() })
            .await
            .unwrap();
    }

    let outcome = release_all(&allocator).await.unwrap();
    assert_eq!(outcome.released, 3);
    assert_eq!(outcome.cleaned, 2);

    let created = allocator
        .query()
        .list_task_iris_by_status(&TaskStatus::Created, None)
        .await
        .unwrap();
    assert_eq!(created.len(), 3);
}

#[tokio::test]
async fn test_health_counts_tracked_agents() {
    let allocator = allocator_with_tasks(1).await;
    assert_eq!(health(&allocator).tracked_agents, 0);

    schedule_agent(&allocator, ScheduleRequest { agent: "a".into() })
        .await
        .unwrap();
    let status = health(&allocator);
    assert!(status.ok);
    assert_eq!(status.tracked_agents, 1);
}
