//! Read-only queries over task lists.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::try_join_all;

use crate::core::iri::document_of;
use crate::core::vocab::{HAS_TASK, STATUS};
use crate::core::{AllocResult, FactSet, FactStore, TaskStatus};

/// Lists tasks referenced by task lists, optionally filtered by status.
#[derive(Clone)]
pub struct TaskQuery {
    store: Arc<dyn FactStore>,
    task_list_iri: String,
}

impl TaskQuery {
    /// Create a query helper bound to the master task list.
    pub fn new(store: Arc<dyn FactStore>, task_list_iri: impl Into<String>) -> Self {
        Self {
            store,
            task_list_iri: task_list_iri.into(),
        }
    }

    /// Identifier of the master task list.
    pub fn task_list_iri(&self) -> &str {
        &self.task_list_iri
    }

    /// Task identifiers linked from `list_iri`, in store order.
    ///
    /// A missing list document yields an empty list.
    pub async fn list_task_iris(&self, list_iri: &str) -> AllocResult<Vec<String>> {
        let document = document_of(list_iri)?;
        let links = self
            .store
            .match_facts(&document, Some(list_iri), HAS_TASK, None)
            .await?;

        Ok(links
            .map(|facts| facts.into_iter().map(|f| f.object).collect())
            .unwrap_or_default())
    }

    /// Union of the documents owning every task on `list_iri`.
    ///
    /// Issues one store read per distinct task document.
    pub async fn list_tasks(&self, list_iri: &str) -> AllocResult<FactSet> {
        let task_iris = self.list_task_iris(list_iri).await?;
        self.load_task_documents(&task_iris).await
    }

    /// Tasks on `list_iri` (master list when `None`) whose status is `status`.
    ///
    /// Order follows the merged task documents, which follows list order.
    pub async fn list_task_iris_by_status(
        &self,
        status: &TaskStatus,
        list_iri: Option<&str>,
    ) -> AllocResult<Vec<String>> {
        let list_iri = list_iri.unwrap_or(&self.task_list_iri);
        let task_iris = self.list_task_iris(list_iri).await?;
        let merged = self.load_task_documents(&task_iris).await?;

        // Task documents may hold facts about tasks that are not on this list.
        let listed: HashSet<&str> = task_iris.iter().map(String::as_str).collect();
        let mut seen = HashSet::new();
        let matching: Vec<String> = merged
            .matching(None, Some(STATUS), Some(status.as_iri()))
            .into_iter()
            .map(|f| f.subject)
            .filter(|subject| listed.contains(subject.as_str()))
            .filter(|subject| seen.insert(subject.clone()))
            .collect();

        tracing::debug!(
            "{} of {} tasks on {} have status {}",
            matching.len(),
            task_iris.len(),
            list_iri,
            status
        );
        Ok(matching)
    }

    async fn load_task_documents(&self, task_iris: &[String]) -> AllocResult<FactSet> {
        let mut documents = Vec::with_capacity(task_iris.len());
        for task_iri in task_iris {
            let document = document_of(task_iri)?;
            if !documents.contains(&document) {
                documents.push(document);
            }
        }

        let graphs = try_join_all(documents.iter().map(|d| self.store.graph(d))).await?;
        let mut merged = FactSet::new();
        for graph in &graphs {
            merged.add_all(graph);
        }
        Ok(merged)
    }
}
