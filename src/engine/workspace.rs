//! Working copy of both indices used while an engine computes a batch.

use std::collections::BTreeSet;

use crate::graph::Outline;
use crate::index::{hash_context, hash_thought, ContextIndex, ThoughtIndex};
use crate::types::{ContextChild, Updates};

/// Private copies of the indices plus the keys touched so far.
///
/// Every change goes to both indices at once, so the working copy satisfies
/// the cross-index invariant after each call.
pub(crate) struct Workspace {
    pub(crate) thoughts: ThoughtIndex,
    pub(crate) contexts: ContextIndex,
    touched_thoughts: BTreeSet<String>,
    touched_contexts: BTreeSet<String>,
    now: u64,
}

impl Workspace {
    pub(crate) fn new(outline: &Outline, now: u64) -> Self {
        Self {
            thoughts: outline.thought_index().clone(),
            contexts: outline.context_index().clone(),
            touched_thoughts: BTreeSet::new(),
            touched_contexts: BTreeSet::new(),
            now,
        }
    }

    /// Place `value` in `context` at `rank` (or re-rank it if already there).
    pub(crate) fn add(&mut self, value: &str, context: &[String], rank: f64) {
        self.thoughts.add_membership(value, context, rank, self.now);
        self.contexts
            .put_child(context, ContextChild::new(value, rank, self.now));
        self.touch(value, context);
    }

    /// Take `value` out of `context`.
    pub(crate) fn remove(&mut self, value: &str, context: &[String]) {
        self.thoughts.remove_membership(value, context, self.now);
        self.contexts.remove_child(context, value);
        self.touch(value, context);
    }

    fn touch(&mut self, value: &str, context: &[String]) {
        self.touched_thoughts.insert(hash_thought(value));
        self.touched_contexts.insert(hash_context(context));
    }

    /// Final state of every touched key as a replacement batch.
    pub(crate) fn into_updates(self) -> Updates {
        let mut updates = Updates::new(self.now);
        for key in self.touched_thoughts {
            let thought = self.thoughts.get_by_key(&key).cloned();
            updates.thoughts.insert(key, thought);
        }
        for key in self.touched_contexts {
            let children = self.contexts.get_by_key(&key).to_vec();
            updates.contexts.insert(key, children);
        }
        updates
    }
}
