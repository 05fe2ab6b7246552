//! Per-context expanded/collapsed flags.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::ContextViewUpdates;

/// ContextView flags keyed by context hash.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContextViews {
    views: HashMap<String, bool>,
}

impl ContextViews {
    pub fn new() -> Self {
        Self {
            views: HashMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<bool> {
        self.views.get(key).copied()
    }

    pub fn set(&mut self, key: &str, expanded: bool) {
        self.views.insert(key.to_string(), expanded);
    }

    pub fn remove(&mut self, key: &str) -> Option<bool> {
        self.views.remove(key)
    }

    /// Move the flag at `old_key` to `new_key`, recording the change in `updates`.
    ///
    /// Nothing happens if the keys are equal or there is no flag at `old_key`.
    pub fn relocate(&mut self, old_key: &str, new_key: &str, updates: &mut ContextViewUpdates) {
        if old_key == new_key {
            return;
        }
        if let Some(flag) = self.views.remove(old_key) {
            self.views.insert(new_key.to_string(), flag);
            updates.insert(old_key.to_string(), None);
            updates.insert(new_key.to_string(), Some(flag));
        }
    }

    /// Apply a batch of flag updates.
    pub fn apply(&mut self, updates: &ContextViewUpdates) {
        for (key, flag) in updates {
            match flag {
                Some(f) => self.set(key, *f),
                None => {
                    self.views.remove(key);
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}
