//! Task status reads and rewrites.

use std::sync::Arc;

use futures::future::try_join_all;

use crate::core::iri::document_of;
use crate::core::vocab::STATUS;
use crate::core::{AllocResult, Fact, FactStore, TaskStatus};

/// Reads and rewrites the single status fact of a task.
#[derive(Clone)]
pub struct StatusManager {
    store: Arc<dyn FactStore>,
}

impl StatusManager {
    /// Create a status manager over `store`.
    pub fn new(store: Arc<dyn FactStore>) -> Self {
        Self { store }
    }

    /// Current status of `task_iri`, if it has one.
    ///
    /// When stale duplicates exist (written by some other producer) the first
    /// one in store order wins.
    pub async fn task_status(&self, task_iri: &str) -> AllocResult<Option<TaskStatus>> {
        let document = document_of(task_iri)?;
        let facts = self
            .store
            .match_facts(&document, Some(task_iri), STATUS, None)
            .await?;
        Ok(facts
            .and_then(|f| f.iter().next().map(|fact| TaskStatus::from_iri(&fact.object))))
    }

    /// Replace every status fact of `task_iri` with exactly one for `status`.
    ///
    /// Read-modify-write of the whole task document; concurrent writers to the
    /// same document race and the last write wins.
    pub async fn set_task_status(&self, task_iri: &str, status: &TaskStatus) -> AllocResult<()> {
        let document = document_of(task_iri)?;
        self.rewrite_document(&document, &[task_iri], status).await?;
        tracing::debug!("task {} set to {}", task_iri, status);
        Ok(())
    }

    /// Set `status` on many tasks with one rewrite per owning document.
    ///
    /// Documents are rewritten concurrently. Tasks sharing a document are
    /// updated in the same write so they cannot overwrite each other.
    pub async fn set_task_statuses(&self, task_iris: &[String], status: &TaskStatus) -> AllocResult<()> {
        let mut by_document: Vec<(String, Vec<&str>)> = Vec::new();
        for task_iri in task_iris {
            let document = document_of(task_iri)?;
            match by_document.iter_mut().find(|(d, _)| *d == document) {
                Some((_, tasks)) => tasks.push(task_iri.as_str()),
                None => by_document.push((document, vec![task_iri.as_str()])),
            }
        }

        try_join_all(
            by_document
                .iter()
                .map(|(document, tasks)| self.rewrite_document(document, tasks, status)),
        )
        .await?;
        tracing::debug!(
            "{} tasks across {} documents set to {}",
            task_iris.len(),
            by_document.len(),
            status
        );
        Ok(())
    }

    async fn rewrite_document(
        &self,
        document: &str,
        task_iris: &[&str],
        status: &TaskStatus,
    ) -> AllocResult<()> {
        let mut facts = self.store.graph(document).await?;
        for &task_iri in task_iris {
            facts.remove_matching(Some(task_iri), Some(STATUS), None);
            facts.add(Fact::new(task_iri, STATUS, status.as_iri()));
        }
        self.store.add(document, facts).await
    }

    /// Atomically move `task_iri` from `from` to `to`.
    ///
    /// Returns `false` when the task was not solely in `from`, e.g. because
    /// another agent claimed it first.
    pub async fn transition(
        &self,
        task_iri: &str,
        from: &TaskStatus,
        to: &TaskStatus,
    ) -> AllocResult<bool> {
        let document = document_of(task_iri)?;
        let swapped = self
            .store
            .compare_and_swap(&document, task_iri, STATUS, from.as_iri(), to.as_iri())
            .await?;
        if swapped {
            tracing::debug!("task {} moved {} -> {}", task_iri, from, to);
        }
        Ok(swapped)
    }
}
