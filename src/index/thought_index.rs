//! Thought index: value hash -> Thought.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::hashing::hash_thought;
use crate::types::Thought;

/// Value-keyed thought store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThoughtIndex {
    thoughts: HashMap<String, Thought>,
}

impl ThoughtIndex {
    /// Create a new, empty thought index.
    pub fn new() -> Self {
        Self {
            thoughts: HashMap::new(),
        }
    }

    /// Look up a thought by value.
    pub fn get(&self, value: &str) -> Option<&Thought> {
        self.thoughts.get(&hash_thought(value))
    }

    /// Look up a thought by key.
    pub fn get_by_key(&self, key: &str) -> Option<&Thought> {
        self.thoughts.get(key)
    }

    pub fn contains(&self, value: &str) -> bool {
        self.thoughts.contains_key(&hash_thought(value))
    }

    /// Add a membership for `value` in `context`, creating the thought if needed.
    ///
    /// A second membership for the same context is never added; the existing
    /// one takes the new rank. Returns the updated thought.
    pub fn add_membership(
        &mut self,
        value: &str,
        context: &[String],
        rank: f64,
        now: u64,
    ) -> Thought {
        let key = hash_thought(value);
        let updated = match self.thoughts.get(&key) {
            Some(existing) => existing.with_membership(context, rank, now),
            None => Thought::new(value, now).with_membership(context, rank, now),
        };
        self.thoughts.insert(key, updated.clone());
        updated
    }

    /// Remove the membership of `value` in `context`.
    ///
    /// Returns the updated thought, or `None` if it has no memberships left and
    /// was dropped (or never existed).
    pub fn remove_membership(&mut self, value: &str, context: &[String], now: u64) -> Option<Thought> {
        let key = hash_thought(value);
        let updated = self.thoughts.get(&key)?.without_membership(context, now);
        if updated.is_orphan() {
            self.thoughts.remove(&key);
            None
        } else {
            self.thoughts.insert(key, updated.clone());
            Some(updated)
        }
    }

    /// Replace or delete the thought stored under `key`.
    pub fn put(&mut self, key: &str, thought: Option<Thought>) {
        match thought {
            Some(t) if !t.is_orphan() => {
                self.thoughts.insert(key.to_string(), t);
            }
            _ => {
                self.thoughts.remove(key);
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Thought)> {
        self.thoughts.iter()
    }

    /// Total memberships across all thoughts.
    pub fn membership_count(&self) -> usize {
        self.thoughts.values().map(|t| t.contexts.len()).sum()
    }

    /// Number of thoughts.
    pub fn len(&self) -> usize {
        self.thoughts.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.thoughts.is_empty()
    }
}
