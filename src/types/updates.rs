//! Update batches produced by the engines and consumed by persistence.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::thought::{ContextChild, Thought};

/// Replacement ContextView flags: `None` removes the flag.
pub type ContextViewUpdates = BTreeMap<String, Option<bool>>;

/// A full replacement batch for both indices.
///
/// Thought entries map a value hash to the new thought or `None` for deletion.
/// Context entries map a context hash to the full new child list; an empty
/// list deletes the entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Updates {
    pub thoughts: BTreeMap<String, Option<Thought>>,
    pub contexts: BTreeMap<String, Vec<ContextChild>>,
    /// When the batch was computed (Unix epoch microseconds).
    pub stamp: u64,
}

impl Updates {
    /// An empty batch stamped at `stamp`.
    pub fn new(stamp: u64) -> Self {
        Self {
            thoughts: BTreeMap::new(),
            contexts: BTreeMap::new(),
            stamp,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.thoughts.is_empty() && self.contexts.is_empty()
    }

    /// Merge a later batch into this one; later entries win per key.
    pub fn merge(&mut self, later: Updates) {
        self.thoughts.extend(later.thoughts);
        self.contexts.extend(later.contexts);
        self.stamp = self.stamp.max(later.stamp);
    }

    /// Keys of thoughts this batch deletes.
    pub fn deleted_thoughts(&self) -> Vec<&str> {
        self.thoughts
            .iter()
            .filter(|(_, t)| t.is_none())
            .map(|(k, _)| k.as_str())
            .collect()
    }
}
