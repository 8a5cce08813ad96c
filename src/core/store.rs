//! Store port consumed by the allocator.

use async_trait::async_trait;

use crate::core::{AllocResult, Fact, FactSet};

/// Document-scoped fact storage.
///
/// Implementations must treat a missing document as empty rather than as an
/// error, and `delete` must be idempotent. Each call is expected to be atomic
/// with respect to the single document it touches; nothing is promised across
/// documents.
#[async_trait]
pub trait FactStore: Send + Sync {
    /// Facts in `document` matching the pattern (`None` is a wildcard).
    /// Returns `None` when the document does not exist.
    async fn match_facts(
        &self,
        document: &str,
        subject: Option<&str>,
        predicate: &str,
        object: Option<&str>,
    ) -> AllocResult<Option<FactSet>>;

    /// Full contents of `document`; empty when it does not exist.
    async fn graph(&self, document: &str) -> AllocResult<FactSet>;

    /// Replace (or create) `document` with exactly `facts`.
    async fn add(&self, document: &str, facts: FactSet) -> AllocResult<()>;

    /// Add `facts` to `document`, creating it if needed.
    async fn merge(&self, document: &str, facts: FactSet) -> AllocResult<()>;

    /// Remove `document`. Removing a missing document succeeds.
    async fn delete(&self, document: &str) -> AllocResult<()>;

    /// Atomically swap `(subject, predicate, expected)` for
    /// `(subject, predicate, replacement)` inside `document`.
    ///
    /// The swap happens only when `expected` is the sole object for
    /// `(subject, predicate)`; every prior `(subject, predicate, *)` fact is
    /// dropped before the replacement is inserted. Returns whether the swap
    /// took place.
    async fn compare_and_swap(
        &self,
        document: &str,
        subject: &str,
        predicate: &str,
        expected: &str,
        replacement: &str,
    ) -> AllocResult<bool>;
}

/// Apply the compare-and-swap rule to an in-memory document.
///
/// Shared by backends that load a whole document, mutate it, and write it back
/// under their own lock.
pub fn swap_in_place(
    facts: &mut FactSet,
    subject: &str,
    predicate: &str,
    expected: &str,
    replacement: &str,
) -> bool {
    let current = facts.matching(Some(subject), Some(predicate), None);
    let only_expected = current.len() == 1 && current.iter().all(|f| f.object == expected);
    if !only_expected {
        return false;
    }
    facts.remove_matching(Some(subject), Some(predicate), None);
    facts.add(Fact::new(subject, predicate, replacement));
    true
}
