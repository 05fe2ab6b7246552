//! Context index: context hash -> child list.
//!
//! A denormalized mirror of thought memberships. Child lists are kept in
//! insertion order; readers sort by rank with a stable sort.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::hashing::hash_context;
use crate::types::ContextChild;

/// Context-keyed children index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContextIndex {
    contexts: HashMap<String, Vec<ContextChild>>,
}

impl ContextIndex {
    /// Create a new, empty context index.
    pub fn new() -> Self {
        Self {
            contexts: HashMap::new(),
        }
    }

    /// Children of a context in stored order.
    pub fn get<S: AsRef<str>>(&self, context: &[S]) -> &[ContextChild] {
        self.get_by_key(&hash_context(context))
    }

    /// Children stored under a context key.
    pub fn get_by_key(&self, key: &str) -> &[ContextChild] {
        self.contexts.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Children of a context ordered by rank ascending. Ties keep insertion order.
    pub fn sorted_children<S: AsRef<str>>(&self, context: &[S]) -> Vec<ContextChild> {
        sort_by_rank(self.get(context))
    }

    /// A rank strictly greater than every child of `context`, `0.0` if empty.
    pub fn next_rank<S: AsRef<str>>(&self, context: &[S]) -> f64 {
        self.get(context)
            .iter()
            .map(|c| c.rank)
            .fold(None, |max: Option<f64>, r| Some(max.map_or(r, |m| m.max(r))))
            .map_or(0.0, |max| max + 1.0)
    }

    /// The child following `value` in `context`, by rank.
    pub fn next_sibling<S: AsRef<str>>(
        &self,
        context: &[S],
        value: &str,
        rank: f64,
    ) -> Option<ContextChild> {
        let children = self.sorted_children(context);
        let i = position_of(&children, value, rank)?;
        children.get(i + 1).cloned()
    }

    /// A rank that sorts directly after `value` in `context`.
    ///
    /// The midpoint to the next sibling when there is one, `rank + 1` when
    /// `value` is last, and the next free rank when `value` is not found.
    pub fn rank_after<S: AsRef<str>>(&self, context: &[S], value: &str, rank: f64) -> f64 {
        let children = self.sorted_children(context);
        if children.is_empty() {
            return 0.0;
        }
        match position_of(&children, value, rank) {
            Some(i) => match children.get(i + 1) {
                Some(next) => (children[i].rank + next.rank) / 2.0,
                None => children[i].rank + 1.0,
            },
            None => self.next_rank(context),
        }
    }

    /// The child holding `value` in `context`, if any.
    pub fn find_child<S: AsRef<str>>(&self, context: &[S], value: &str) -> Option<&ContextChild> {
        self.get(context).iter().find(|c| c.has_value(value))
    }

    /// Insert `child`. A child with the same value is replaced where it stands.
    pub fn put_child<S: AsRef<str>>(&mut self, context: &[S], child: ContextChild) {
        let children = self.contexts.entry(hash_context(context)).or_default();
        match children.iter_mut().find(|c| c.has_value(&child.value)) {
            Some(existing) => *existing = child,
            None => children.push(child),
        }
    }

    /// Remove the child holding `value`. Empty entries are purged.
    pub fn remove_child<S: AsRef<str>>(&mut self, context: &[S], value: &str) -> bool {
        let key = hash_context(context);
        let Some(children) = self.contexts.get_mut(&key) else {
            return false;
        };
        let before = children.len();
        children.retain(|c| !c.has_value(value));
        let removed = children.len() != before;
        if children.is_empty() {
            self.contexts.remove(&key);
        }
        removed
    }

    /// Replace the child list under `key`; an empty list deletes the entry.
    pub fn put(&mut self, key: &str, children: Vec<ContextChild>) {
        if children.is_empty() {
            self.contexts.remove(key);
        } else {
            self.contexts.insert(key.to_string(), children);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<ContextChild>)> {
        self.contexts.iter()
    }

    /// Total children across all contexts.
    pub fn child_count(&self) -> usize {
        self.contexts.values().map(Vec::len).sum()
    }

    /// Number of contexts.
    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }
}

/// Stable sort of children by rank.
pub fn sort_by_rank(children: &[ContextChild]) -> Vec<ContextChild> {
    let mut sorted = children.to_vec();
    sorted.sort_by(|a, b| a.rank.total_cmp(&b.rank));
    sorted
}

fn position_of(children: &[ContextChild], value: &str, rank: f64) -> Option<usize> {
    children
        .iter()
        .position(|c| c.has_value(value) && c.rank == rank)
        .or_else(|| children.iter().position(|c| c.has_value(value)))
}
