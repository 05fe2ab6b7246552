//! Fluent API for building Outline instances.

use crate::types::{now_micros, ContextChild, ROOT_TOKEN};

use super::Outline;

/// Fluent builder for constructing an Outline.
///
/// Parents are given as value lists from the root; an empty list means the
/// top level.
pub struct OutlineBuilder {
    outline: Outline,
    now: u64,
}

impl OutlineBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            outline: Outline::new(),
            now: now_micros(),
        }
    }

    /// Add `value` under `parent` at `rank`.
    pub fn add(&mut self, parent: &[&str], value: &str, rank: f64) -> &mut Self {
        let context = parent_context(parent);
        self.outline
            .thought_index
            .add_membership(value, &context, rank, self.now);
        self.outline
            .context_index
            .put_child(&context, ContextChild::new(value, rank, self.now));
        self
    }

    /// Add `value` as the last child of `parent`.
    pub fn append(&mut self, parent: &[&str], value: &str) -> &mut Self {
        let rank = self.outline.context_index.next_rank(&parent_context(parent));
        self.add(parent, value, rank)
    }

    /// Set a ContextView flag on the children context of `values`.
    pub fn context_view(&mut self, values: &[&str], expanded: bool) -> &mut Self {
        self.outline = self.outline.with_context_view(values, expanded);
        self
    }

    /// Focus the occurrence at `values`, if it resolves.
    pub fn cursor(&mut self, values: &[&str]) -> &mut Self {
        let path = self.outline.resolve(values);
        self.outline.cursor = path;
        self
    }

    /// Build the final Outline.
    pub fn build(&self) -> Outline {
        self.outline.clone()
    }
}

impl Default for OutlineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn parent_context(parent: &[&str]) -> Vec<String> {
    if parent.is_empty() {
        vec![ROOT_TOKEN.to_string()]
    } else {
        parent.iter().map(|v| v.to_string()).collect()
    }
}
