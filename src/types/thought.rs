//! Thought entities and context child descriptors.

use serde::{Deserialize, Serialize};

use crate::index::hashing::{hash_context, hash_thought};

/// One `(context, rank)` location of a thought.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextMembership {
    /// Ancestor values of the parent context.
    pub context: Vec<String>,
    /// Sibling order key within that context.
    pub rank: f64,
}

impl ContextMembership {
    /// Create a membership for the given context and rank.
    pub fn new(context: Vec<String>, rank: f64) -> Self {
        Self { context, rank }
    }

    /// Whether this membership is for `context` (compared by normalized hash).
    pub fn is_in(&self, context: &[String]) -> bool {
        hash_context(&self.context) == hash_context(context)
    }
}

/// A unique normalized text value plus every location it appears in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thought {
    /// The text as first entered.
    pub value: String,
    /// At most one membership per context.
    pub contexts: Vec<ContextMembership>,
    /// Last modification (Unix epoch microseconds).
    pub last_updated: u64,
}

impl Thought {
    /// Create a thought with no memberships yet.
    pub fn new(value: impl Into<String>, last_updated: u64) -> Self {
        Self {
            value: value.into(),
            contexts: Vec::new(),
            last_updated,
        }
    }

    /// The lookup key of this thought.
    pub fn key(&self) -> String {
        hash_thought(&self.value)
    }

    /// Find the membership for a context.
    pub fn membership(&self, context: &[String]) -> Option<&ContextMembership> {
        self.contexts.iter().find(|m| m.is_in(context))
    }

    /// Return a copy with a membership for `context` at `rank`.
    ///
    /// An existing membership for the same context has its rank replaced
    /// rather than being duplicated.
    pub fn with_membership(&self, context: &[String], rank: f64, now: u64) -> Thought {
        let mut thought = self.clone();
        match thought.contexts.iter_mut().find(|m| m.is_in(context)) {
            Some(existing) => existing.rank = rank,
            None => thought
                .contexts
                .push(ContextMembership::new(context.to_vec(), rank)),
        }
        thought.last_updated = now;
        thought
    }

    /// Return a copy without the membership for `context`.
    pub fn without_membership(&self, context: &[String], now: u64) -> Thought {
        let mut thought = self.clone();
        thought.contexts.retain(|m| !m.is_in(context));
        thought.last_updated = now;
        thought
    }

    /// A thought with no memberships is logically deleted.
    pub fn is_orphan(&self) -> bool {
        self.contexts.is_empty()
    }
}

/// A child entry in the context index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextChild {
    /// Child thought value.
    pub value: String,
    /// Sibling order key.
    pub rank: f64,
    /// Last modification (Unix epoch microseconds).
    pub last_updated: u64,
}

impl ContextChild {
    /// Create a child entry.
    pub fn new(value: impl Into<String>, rank: f64, last_updated: u64) -> Self {
        Self {
            value: value.into(),
            rank,
            last_updated,
        }
    }

    /// Whether this child holds the same thought as `value` (normalized).
    pub fn has_value(&self, value: &str) -> bool {
        hash_thought(&self.value) == hash_thought(value)
    }
}
