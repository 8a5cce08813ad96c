//! Tests for task list queries and status management

use std::sync::Arc;

use prometheus_task_allocator::core::vocab::{HAS_TASK, STATUS};
use prometheus_task_allocator::core::{
    document_of, Fact, FactSet, FactStore, StatusManager, TaskQuery, TaskStatus,
};
use prometheus_task_allocator::infra::InMemoryStore;

const LIST: &str = "http://example.org/tasks#list";
const OTHER_LIST: &str = "http://example.org/other#list";

async fn seeded() -> Arc<InMemoryStore> {
    let store = Arc::new(InMemoryStore::new());
    let list: FactSet = ["t1", "t2", "t3"]
        .iter()
        .map(|n| Fact::new(LIST, HAS_TASK, format!("http://example.org/task/{n}")))
        .collect();
    store.add(&document_of(LIST).unwrap(), list).await.unwrap();

    // t1 and t2 share a document; t9 lives there too but is on no list.
    let shared: FactSet = [
        Fact::new("http://example.org/task/t1", STATUS, TaskStatus::Created.as_iri()),
        Fact::new("http://example.org/task/t2", STATUS, TaskStatus::Assigned.as_iri()),
        Fact::new("http://example.org/task/t9", STATUS, TaskStatus::Created.as_iri()),
    ]
    .into_iter()
    .collect();
    store.add("http://example.org/task", shared).await.unwrap();
    store
}

#[tokio::test]
async fn test_list_task_iris_in_store_order() {
    let store = seeded().await;
    let query = TaskQuery::new(store, LIST);
    assert_eq!(
        query.list_task_iris(LIST).await.unwrap(),
        vec![
            "http://example.org/task/t1",
            "http://example.org/task/t2",
            "http://example.org/task/t3"
        ]
    );
}

#[tokio::test]
async fn test_missing_list_is_empty() {
    let store = seeded().await;
    let query = TaskQuery::new(store, LIST);
    assert!(query.list_task_iris(OTHER_LIST).await.unwrap().is_empty());
    assert!(query.list_tasks(OTHER_LIST).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_tasks_merges_documents() {
    let store = seeded().await;
    let query = TaskQuery::new(store, LIST);
    // All three tasks live in one document, which is read once.
    assert_eq!(query.list_tasks(LIST).await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_status_filter_ignores_unlisted_subjects() {
    let store = seeded().await;
    let query = TaskQuery::new(store, LIST);

    let created = query
        .list_task_iris_by_status(&TaskStatus::Created, None)
        .await
        .unwrap();
    assert_eq!(created, vec!["http://example.org/task/t1"]);

    let assigned = query
        .list_task_iris_by_status(&TaskStatus::Assigned, Some(LIST))
        .await
        .unwrap();
    assert_eq!(assigned, vec!["http://example.org/task/t2"]);
}

#[tokio::test]
async fn test_set_task_statuses_shares_one_write() {
    let store = seeded().await;
    let status = StatusManager::new(store.clone());
    let tasks = vec![
        "http://example.org/task/t1".to_string(),
        "http://example.org/task/t2".to_string(),
        "http://example.org/task/t3".to_string(),
    ];

    status
        .set_task_statuses(&tasks, &TaskStatus::Assigned)
        .await
        .unwrap();

    for task in &tasks {
        assert_eq!(
            status.task_status(task).await.unwrap(),
            Some(TaskStatus::Assigned)
        );
    }
    let shared = store.graph("http://example.org/task").await.unwrap();
    assert_eq!(shared.matching(None, Some(STATUS), None).len(), 4);
}

#[tokio::test]
async fn test_transition_is_conditional() {
    let store = seeded().await;
    let status = StatusManager::new(store);
    let t1 = "http://example.org/task/t1";

    assert!(status
        .transition(t1, &TaskStatus::Created, &TaskStatus::Assigned)
        .await
        .unwrap());
    assert!(!status
        .transition(t1, &TaskStatus::Created, &TaskStatus::Assigned)
        .await
        .unwrap());
    assert_eq!(status.task_status(t1).await.unwrap(), Some(TaskStatus::Assigned));
}

#[tokio::test]
async fn test_malformed_task_iri_is_rejected() {
    let store = seeded().await;
    let status = StatusManager::new(store);
    assert!(status
        .set_task_status("not an iri", &TaskStatus::Created)
        .await
        .is_err());
}
