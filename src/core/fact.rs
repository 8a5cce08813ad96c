//! Subject-predicate-object facts and ordered fact sets.

use serde::{Deserialize, Serialize};

/// A single subject-predicate-object statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fact {
    /// Resource the statement is about.
    pub subject: String,
    /// Relation identifier.
    pub predicate: String,
    /// Related resource identifier.
    pub object: String,
}

impl Fact {
    /// Build a fact from anything string-like.
    pub fn new(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }

    /// Whether this fact matches a pattern; `None` is a wildcard.
    pub fn matches(&self, subject: Option<&str>, predicate: Option<&str>, object: Option<&str>) -> bool {
        subject.is_none_or(|s| s == self.subject)
            && predicate.is_none_or(|p| p == self.predicate)
            && object.is_none_or(|o| o == self.object)
    }
}

/// Duplicate-free collection of facts kept in insertion order.
///
/// Insertion order is the order a store returns facts in, which is the only
/// ordering the allocator relies on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FactSet {
    facts: Vec<Fact>,
}

impl FactSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a fact unless an equal one is already present. Returns whether it was added.
    pub fn add(&mut self, fact: Fact) -> bool {
        if self.facts.contains(&fact) {
            return false;
        }
        self.facts.push(fact);
        true
    }

    /// Union `other` into this set, keeping this set's order first.
    pub fn add_all(&mut self, other: &Self) {
        for fact in &other.facts {
            self.add(fact.clone());
        }
    }

    /// Facts matching the pattern, in set order.
    pub fn matching(&self, subject: Option<&str>, predicate: Option<&str>, object: Option<&str>) -> Self {
        self.facts
            .iter()
            .filter(|f| f.matches(subject, predicate, object))
            .cloned()
            .collect()
    }

    /// Remove every fact matching the pattern and return how many were removed.
    pub fn remove_matching(
        &mut self,
        subject: Option<&str>,
        predicate: Option<&str>,
        object: Option<&str>,
    ) -> usize {
        let before = self.facts.len();
        self.facts.retain(|f| !f.matches(subject, predicate, object));
        before - self.facts.len()
    }

    /// Whether an equal fact is present.
    pub fn contains(&self, fact: &Fact) -> bool {
        self.facts.contains(fact)
    }

    /// Number of facts.
    pub fn len(&self) -> usize {
        self.facts.len()
    }

    /// Whether the set has no facts.
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    /// Iterate facts in set order.
    pub fn iter(&self) -> std::slice::Iter<'_, Fact> {
        self.facts.iter()
    }
}

impl FromIterator<Fact> for FactSet {
    fn from_iter<I: IntoIterator<Item = Fact>>(iter: I) -> Self {
        let mut set = Self::new();
        for fact in iter {
            set.add(fact);
        }
        set
    }
}

impl IntoIterator for FactSet {
    type Item = Fact;
    type IntoIter = std::vec::IntoIter<Fact>;

    fn into_iter(self) -> Self::IntoIter {
        self.facts.into_iter()
    }
}

impl<'a> IntoIterator for &'a FactSet {
    type Item = &'a Fact;
    type IntoIter = std::slice::Iter<'a, Fact>;

    fn into_iter(self) -> Self::IntoIter {
        self.facts.iter()
    }
}
