//! In-memory fact store for development and testing.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::core::{swap_in_place, AllocResult, FactSet, FactStore};

/// Documents held in a process-local map.
///
/// Every operation takes the map lock once, so each call is atomic.
#[derive(Default)]
pub struct InMemoryStore {
    documents: Mutex<HashMap<String, FactSet>>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `document` exists.
    pub fn contains(&self, document: &str) -> bool {
        self.documents.lock().contains_key(document)
    }

    /// Identifiers of every stored document, sorted.
    pub fn documents(&self) -> Vec<String> {
        let mut names: Vec<String> = self.documents.lock().keys().cloned().collect();
        names.sort();
        names
    }

    /// Total number of facts across all documents.
    pub fn fact_count(&self) -> usize {
        self.documents.lock().values().map(FactSet::len).sum()
    }
}

#[async_trait]
impl FactStore for InMemoryStore {
    async fn match_facts(
        &self,
        document: &str,
        subject: Option<&str>,
        predicate: &str,
        object: Option<&str>,
    ) -> AllocResult<Option<FactSet>> {
        Ok(self
            .documents
            .lock()
            .get(document)
            .map(|facts| facts.matching(subject, Some(predicate), object)))
    }

    async fn graph(&self, document: &str) -> AllocResult<FactSet> {
        Ok(self.documents.lock().get(document).cloned().unwrap_or_default())
    }

    async fn add(&self, document: &str, facts: FactSet) -> AllocResult<()> {
        self.documents.lock().insert(document.to_string(), facts);
        Ok(())
    }

    async fn merge(&self, document: &str, facts: FactSet) -> AllocResult<()> {
        self.documents
            .lock()
            .entry(document.to_string())
            .or_default()
            .add_all(&facts);
        Ok(())
    }

    async fn delete(&self, document: &str) -> AllocResult<()> {
        self.documents.lock().remove(document);
        Ok(())
    }

    async fn compare_and_swap(
        &self,
        document: &str,
        subject: &str,
        predicate: &str,
        expected: &str,
        replacement: &str,
    ) -> AllocResult<bool> {
        let mut documents = self.documents.lock();
        Ok(documents
            .get_mut(document)
            .is_some_and(|facts| swap_in_place(facts, subject, predicate, expected, replacement)))
    }
}
