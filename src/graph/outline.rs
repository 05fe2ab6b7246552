//! The outline state: both indices, view flags, cursor and edit tracker.
//!
//! Engines read an `Outline` and return batches; applying a batch produces a
//! new `Outline` and leaves the old one untouched.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::engine::{ImportBatch, MoveResult};
use crate::index::{
    hash_context, hash_thought, ContextIndex, ContextViews, RecentlyEdited, ThoughtIndex,
};
use crate::types::{
    path_to_context, ContextChild, ContextViewUpdates, OutlineError, OutlineResult, Path,
    RankedThought, Thought, Updates, PIN_TOKEN, ROOT_TOKEN,
};

use super::traversal::walk_subtree;

/// The complete state of one outline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    pub(crate) thought_index: ThoughtIndex,
    pub(crate) context_index: ContextIndex,
    pub(crate) context_views: ContextViews,
    pub(crate) cursor: Option<Path>,
    pub(crate) recently_edited: RecentlyEdited,
    /// Incremented on every applied batch.
    pub(crate) data_nonce: u64,
}

impl Outline {
    /// Create an empty outline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from pre-existing indices (used by the snapshot reader).
    pub fn from_parts(
        thought_index: ThoughtIndex,
        context_index: ContextIndex,
        context_views: ContextViews,
    ) -> Self {
        Self {
            thought_index,
            context_index,
            context_views,
            ..Self::default()
        }
    }

    pub fn thought_index(&self) -> &ThoughtIndex {
        &self.thought_index
    }

    pub fn context_index(&self) -> &ContextIndex {
        &self.context_index
    }

    pub fn context_views(&self) -> &ContextViews {
        &self.context_views
    }

    pub fn recently_edited(&self) -> &RecentlyEdited {
        &self.recently_edited
    }

    pub fn cursor(&self) -> Option<&Path> {
        self.cursor.as_ref()
    }

    pub fn data_nonce(&self) -> u64 {
        self.data_nonce
    }

    /// Look up a thought by value.
    pub fn thought(&self, value: &str) -> Option<&Thought> {
        self.thought_index.get(value)
    }

    /// Children of `context` ordered by rank.
    pub fn children<S: AsRef<str>>(&self, context: &[S]) -> Vec<ContextChild> {
        self.context_index.sorted_children(context)
    }

    /// Resolve a list of values from the root into a ranked path.
    pub fn resolve<S: AsRef<str>>(&self, values: &[S]) -> Option<Path> {
        let mut context = vec![ROOT_TOKEN.to_string()];
        let mut path = Path::new();
        for (i, value) in values.iter().enumerate() {
            let child = self.context_index.find_child(&context, value.as_ref())?;
            path.push(RankedThought::new(child.value.clone(), child.rank));
            if i == 0 {
                context.clear();
            }
            context.push(child.value.clone());
        }
        Some(path)
    }

    /// Whether the thought at `path` carries the pin attribute.
    pub fn is_pinned(&self, path: &Path) -> bool {
        self.context_index
            .find_child(&path_to_context(path), PIN_TOKEN)
            .is_some()
    }

    /// Set the cursor (the active focus).
    pub fn with_cursor(&self, cursor: Option<Path>) -> Outline {
        let mut next = self.clone();
        next.cursor = cursor;
        next
    }

    /// Set a ContextView flag on `context`.
    pub fn with_context_view<S: AsRef<str>>(&self, context: &[S], expanded: bool) -> Outline {
        let mut next = self.clone();
        next.context_views.set(&hash_context(context), expanded);
        next
    }

    /// Record an edit at `path` in the recently-edited tracker.
    pub fn with_recent_edit(&self, path: &Path, now: u64) -> Outline {
        let mut next = self.clone();
        next.recently_edited.touch(path, now);
        next
    }

    /// Apply a batch of index updates, returning the new outline.
    pub fn apply(&self, updates: &Updates) -> Outline {
        let mut next = self.clone();
        next.apply_in_place(updates, &ContextViewUpdates::new());
        next
    }

    /// Apply the result of a move: indices, view flags, cursor and tracker.
    ///
    /// A failed tracker update keeps the previous tracker.
    pub fn apply_move(&self, result: &MoveResult) -> Outline {
        let mut next = self.clone();
        next.apply_in_place(&result.updates, &result.context_view_updates);
        next.cursor = result.cursor.clone();
        if let Ok(recent) = &result.recently_edited {
            next.recently_edited = recent.clone();
        }
        next
    }

    /// Apply an import batch and focus its first inserted thought.
    pub fn apply_import(&self, batch: &ImportBatch) -> Outline {
        let mut next = self.clone();
        next.apply_in_place(&batch.updates, &ContextViewUpdates::new());
        if let Some(first) = &batch.first_inserted {
            next.cursor = Some(first.clone());
        }
        next
    }

    fn apply_in_place(&mut self, updates: &Updates, views: &ContextViewUpdates) {
        for (key, thought) in &updates.thoughts {
            self.thought_index.put(key, thought.clone());
        }
        for (key, children) in &updates.contexts {
            self.context_index.put(key, children.clone());
        }
        self.context_views.apply(views);
        self.data_nonce += 1;
    }

    /// Total memberships of every descendant below `path` (the path itself excluded).
    pub fn subtree_membership_count(&self, path: &Path) -> usize {
        walk_subtree(&self.context_index, &path_to_context(path)).len()
    }

    /// Check the cross-index invariant and both dedup invariants.
    pub fn verify(&self) -> OutlineResult<()> {
        for (key, thought) in self.thought_index.iter() {
            if *key != hash_thought(&thought.value) {
                return Err(inconsistent(format!(
                    "thought {:?} stored under foreign key {}",
                    thought.value, key
                )));
            }
            if thought.is_orphan() {
                return Err(inconsistent(format!(
                    "thought {:?} has no contexts",
                    thought.value
                )));
            }
            let mut seen = HashSet::new();
            for membership in &thought.contexts {
                if !seen.insert(hash_context(&membership.context)) {
                    return Err(inconsistent(format!(
                        "thought {:?} is in context {:?} twice",
                        thought.value, membership.context
                    )));
                }
                let child = self
                    .context_index
                    .find_child(&membership.context, &thought.value);
                match child {
                    Some(c) if c.rank == membership.rank => {}
                    Some(c) => {
                        return Err(inconsistent(format!(
                            "{:?} in {:?}: thought rank {} but child rank {}",
                            thought.value, membership.context, membership.rank, c.rank
                        )))
                    }
                    None => {
                        return Err(inconsistent(format!(
                            "{:?} claims context {:?} which does not list it",
                            thought.value, membership.context
                        )))
                    }
                }
            }
        }

        for (key, children) in self.context_index.iter() {
            if children.is_empty() {
                return Err(inconsistent(format!("context {} is empty", key)));
            }
            let mut seen = HashSet::new();
            for child in children {
                if !seen.insert(hash_thought(&child.value)) {
                    return Err(inconsistent(format!(
                        "context {} lists {:?} twice",
                        key, child.value
                    )));
                }
                let listed = self.thought_index.get(&child.value).is_some_and(|t| {
                    t.contexts
                        .iter()
                        .any(|m| hash_context(&m.context) == *key && m.rank == child.rank)
                });
                if !listed {
                    return Err(inconsistent(format!(
                        "context {} lists {:?} at rank {} without a matching membership",
                        key, child.value, child.rank
                    )));
                }
            }
        }
        Ok(())
    }

    /// Render the outline as an indented bullet list.
    pub fn render_tree(&self) -> String {
        let mut out = String::new();
        for entry in walk_subtree(&self.context_index, &[ROOT_TOKEN.to_string()]) {
            out.push_str(&"  ".repeat(entry.depth));
            out.push_str("- ");
            out.push_str(&entry.child.value);
            out.push('\n');
        }
        out
    }
}

fn inconsistent(message: String) -> OutlineError {
    OutlineError::Inconsistent(message)
}
