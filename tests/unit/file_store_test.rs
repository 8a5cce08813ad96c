//! Tests for the file-backed fact store

use std::path::PathBuf;
use std::sync::Arc;

use prometheus_task_allocator::core::vocab::{HAS_TASK, STATUS};
use prometheus_task_allocator::core::{
    Allocator, Fact, FactSet, FactStore, ScheduleLimits, ScheduleOptions, TaskStatus,
};
use prometheus_task_allocator::infra::FileStore;

const DOC: &str = "http://example.org/tasks";
const P: &str = "http://example.org/p";

fn temp_root() -> PathBuf {
    std::env::temp_dir().join(format!("allocator-store-{}", uuid::Uuid::new_v4()))
}

fn set(facts: &[(&str, &str)]) -> FactSet {
    facts.iter().map(|(s, o)| Fact::new(*s, P, *o)).collect()
}

#[tokio::test]
async fn test_documents_survive_reopen() {
    let root = temp_root();
    {
        let store = FileStore::open(&root).await.unwrap();
        store.add(DOC, set(&[("a", "1"), ("b", "2")])).await.unwrap();
        store.merge(DOC, set(&[("c", "3")])).await.unwrap();
    }

    let store = FileStore::open(&root).await.unwrap();
    let facts = store.graph(DOC).await.unwrap();
    assert_eq!(facts, set(&[("a", "1"), ("b", "2"), ("c", "3")]));
    assert_eq!(store.documents().await.unwrap(), vec![DOC.to_string()]);

    std::fs::remove_dir_all(&root).unwrap();
}

#[tokio::test]
async fn test_missing_document_versus_empty() {
    let root = temp_root();
    let store = FileStore::open(&root).await.unwrap();

    assert!(store.match_facts(DOC, None, P, None).await.unwrap().is_none());
    store.add(DOC, FactSet::new()).await.unwrap();
    let found = store.match_facts(DOC, None, P, None).await.unwrap();
    assert_eq!(found, Some(FactSet::new()));

    std::fs::remove_dir_all(&root).unwrap();
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let root = temp_root();
    let store = FileStore::open(&root).await.unwrap();

    store.add(DOC, set(&[("a", "1")])).await.unwrap();
    store.delete(DOC).await.unwrap();
    store.delete(DOC).await.unwrap();
    assert!(store.documents().await.unwrap().is_empty());

    std::fs::remove_dir_all(&root).unwrap();
}

#[tokio::test]
async fn test_long_document_identifiers() {
    let root = temp_root();
    let store = FileStore::open(&root).await.unwrap();
    let long_doc = format!("http://example.org/{}", "segment/".repeat(40));
    assert!(long_doc.len() > 300);

    store.add(&long_doc, set(&[("a", "1")])).await.unwrap();
    store.add(DOC, set(&[("b", "2")])).await.unwrap();

    assert_eq!(store.graph(&long_doc).await.unwrap(), set(&[("a", "1")]));
    assert_eq!(store.graph(DOC).await.unwrap(), set(&[("b", "2")]));
    let mut expected = vec![long_doc.clone(), DOC.to_string()];
    expected.sort();
    assert_eq!(store.documents().await.unwrap(), expected);

    store.delete(&long_doc).await.unwrap();
    assert_eq!(store.documents().await.unwrap(), vec![DOC.to_string()]);

    std::fs::remove_dir_all(&root).unwrap();
}

#[tokio::test]
async fn test_compare_and_swap_persists() {
    let root = temp_root();
    let store = FileStore::open(&root).await.unwrap();
    store.add(DOC, set(&[("a", "old")])).await.unwrap();

    assert!(store.compare_and_swap(DOC, "a", P, "old", "new").await.unwrap());
    assert!(!store.compare_and_swap(DOC, "a", P, "old", "new").await.unwrap());

    let reopened = FileStore::open(&root).await.unwrap();
    assert_eq!(reopened.graph(DOC).await.unwrap(), set(&[("a", "new")]));

    std::fs::remove_dir_all(&root).unwrap();
}

#[tokio::test]
async fn test_schedule_over_file_store() {
    let root = temp_root();
    let store = Arc::new(FileStore::open(&root).await.unwrap());
    let list = "http://example.org/tasks#list";

    let tasks: Vec<String> = (1..=3)
        .map(|n| format!("http://example.org/task/t{n}#it"))
        .collect();
    let links: FactSet = tasks.iter().map(|t| Fact::new(list, HAS_TASK, t.as_str())).collect();
    store.add(DOC, links).await.unwrap();
    for task in &tasks {
        let document = task.trim_end_matches("#it");
        let status: FactSet = [Fact::new(task.as_str(), STATUS, TaskStatus::Created.as_iri())]
            .into_iter()
            .collect();
        store.add(document, status).await.unwrap();
    }

    let limits = ScheduleLimits {
        tasks_per_agent: 2,
        ..ScheduleLimits::default()
    };
    let allocator = Allocator::new(store.clone(), list, "http://example.org/schedules/", limits);
    let batch = allocator
        .schedule(&ScheduleOptions::for_agent("a"))
        .await
        .unwrap();
    assert_eq!(batch, tasks[..2].to_vec());

    let schedule_iri = allocator.get_schedule_iri("a");
    let linked = allocator.query().list_task_iris(&schedule_iri).await.unwrap();
    assert_eq!(linked, batch);
    assert_eq!(
        allocator.status().task_status(&tasks[2]).await.unwrap(),
        Some(TaskStatus::Created)
    );

    assert_eq!(allocator.clean().await.unwrap(), 1);
    std::fs::remove_dir_all(&root).unwrap();
}
