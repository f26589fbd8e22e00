//! Insertion-ordered object sets.

use std::collections::HashSet;

use lineage_core::ObjectId;

/// A set of objects that remembers insertion order.
///
/// Used for selections and candidate sets so that every traversal iterates
/// objects in the same order and picks stay deterministic.
#[derive(Clone, Debug, Default)]
pub struct Frontier {
    order: Vec<ObjectId>,
    members: HashSet<ObjectId>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `id`; returns false if it was already present.
    pub fn insert(&mut self, id: ObjectId) -> bool {
        if self.members.insert(id) {
            self.order.push(id);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.members.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.order.iter().copied()
    }

    pub fn as_slice(&self) -> &[ObjectId] {
        &self.order
    }

    /// Split into `(matching, rest)`, keeping order in both halves.
    pub fn partition(&self, mut pred: impl FnMut(ObjectId) -> bool) -> (Frontier, Frontier) {
        let mut matching = Frontier::new();
        let mut rest = Frontier::new();
        for id in self.iter() {
            if pred(id) {
                matching.insert(id);
            } else {
                rest.insert(id);
            }
        }
        (matching, rest)
    }

    /// Set equality, ignoring order.
    pub fn same_members(&self, other: &Frontier) -> bool {
        self.members == other.members
    }

    pub fn is_superset(&self, other: &Frontier) -> bool {
        self.members.is_superset(&other.members)
    }
}

impl Extend<ObjectId> for Frontier {
    fn extend<I: IntoIterator<Item = ObjectId>>(&mut self, iter: I) {
        for id in iter {
            self.insert(id);
        }
    }
}

impl FromIterator<ObjectId> for Frontier {
    fn from_iter<I: IntoIterator<Item = ObjectId>>(iter: I) -> Self {
        let mut frontier = Frontier::new();
        frontier.extend(iter);
        frontier
    }
}
