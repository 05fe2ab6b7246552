//! Depth-first subtree walks over the context index.

use crate::index::ContextIndex;
use crate::types::{ContextChild, ROOT_TOKEN};

/// One visited child in a subtree walk.
#[derive(Debug, Clone)]
pub struct SubtreeEntry {
    /// Context the child is listed under.
    pub context: Vec<String>,
    pub child: ContextChild,
    /// Position among its rank-sorted siblings.
    pub index: usize,
    /// 0 for direct children of the walk root.
    pub depth: usize,
}

impl SubtreeEntry {
    /// The context holding this child's own children.
    pub fn child_context(&self) -> Vec<String> {
        child_context(&self.context, &self.child.value)
    }
}

/// Context of `value`'s children when `value` sits in `context`.
pub fn child_context(context: &[String], value: &str) -> Vec<String> {
    if context.len() == 1 && context[0] == ROOT_TOKEN {
        vec![value.to_string()]
    } else {
        let mut next = context.to_vec();
        next.push(value.to_string());
        next
    }
}

/// Pre-order walk of every descendant under `context`.
///
/// Uses an explicit stack so deep outlines never grow the call stack.
/// Siblings are visited in rank order, each followed by its own subtree.
pub fn walk_subtree(index: &ContextIndex, context: &[String]) -> Vec<SubtreeEntry> {
    let mut visited = Vec::new();
    let mut stack: Vec<SubtreeEntry> = Vec::new();
    push_children(index, context, 0, &mut stack);

    while let Some(entry) = stack.pop() {
        push_children(index, &entry.child_context(), entry.depth + 1, &mut stack);
        visited.push(entry);
    }
    visited
}

fn push_children(index: &ContextIndex, context: &[String], depth: usize, stack: &mut Vec<SubtreeEntry>) {
    let children = index.sorted_children(context);
    for (i, child) in children.into_iter().enumerate().rev() {
        stack.push(SubtreeEntry {
            context: context.to_vec(),
            child,
            index: i,
            depth,
        });
    }
}
