//! Paths: ranked sequences from the root to one occurrence of a thought.

use serde::{Deserialize, Serialize};

use super::ROOT_TOKEN;
use crate::index::hashing::hash_thought;

/// One segment of a path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedThought {
    pub value: String,
    pub rank: f64,
}

impl RankedThought {
    pub fn new(value: impl Into<String>, rank: f64) -> Self {
        Self {
            value: value.into(),
            rank,
        }
    }

    /// Same thought (normalized value) at the same rank.
    pub fn same_occurrence(&self, other: &RankedThought) -> bool {
        self.rank == other.rank && hash_thought(&self.value) == hash_thought(&other.value)
    }
}

/// Ordered segments from the root down to a specific occurrence.
pub type Path = Vec<RankedThought>;

/// Strip ranks from a path.
pub fn path_to_context(path: &[RankedThought]) -> Vec<String> {
    path.iter().map(|t| t.value.clone()).collect()
}

/// Everything but the last segment.
pub fn context_of<T: Clone>(items: &[T]) -> Vec<T> {
    match items.split_last() {
        Some((_, rest)) => rest.to_vec(),
        None => Vec::new(),
    }
}

/// Parent context of a value list, with the root sentinel for top-level items.
pub fn rooted_context_of(values: &[String]) -> Vec<String> {
    if values.len() > 1 {
        context_of(values)
    } else {
        vec![ROOT_TOKEN.to_string()]
    }
}

/// Last segment of a path.
pub fn head(path: &[RankedThought]) -> Option<&RankedThought> {
    path.last()
}

/// Rank of the last segment, `0.0` for an empty path.
pub fn head_rank(path: &[RankedThought]) -> f64 {
    path.last().map(|t| t.rank).unwrap_or(0.0)
}

/// Whether two paths point at the same occurrence.
pub fn equal_path(a: &[RankedThought], b: &[RankedThought]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.same_occurrence(y))
}

/// Build a path from `(value, rank)` pairs.
pub fn path_from(segments: &[(&str, f64)]) -> Path {
    segments
        .iter()
        .map(|(value, rank)| RankedThought::new(*value, *rank))
        .collect()
}
