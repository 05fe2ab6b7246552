//! Value search over the thought index.

use std::cmp::Ordering;

use crate::graph::Outline;
use crate::index::normalize_value;
use crate::types::{is_reserved, Thought, NOTE_TOKEN, PIN_TOKEN};

/// Default maximum number of matches returned.
pub const DEFAULT_SEARCH_LIMIT: usize = 20;

/// Parameters for a search.
#[derive(Debug, Clone)]
pub struct SearchParams {
    pub query: String,
    pub limit: usize,
}

impl SearchParams {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

/// Result of a search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Matching thoughts, best first.
    pub matches: Vec<Thought>,
    /// Matches before the limit was applied.
    pub total: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum MatchKind {
    Exact,
    Prefix,
    Substring,
}

/// The search engine.
#[derive(Debug, Default)]
pub struct SearchEngine;

impl SearchEngine {
    pub fn new() -> Self {
        Self
    }

    /// Case-insensitive substring search. Exact matches sort first, then
    /// prefix matches, then the rest alphabetically.
    pub fn search(&self, outline: &Outline, params: &SearchParams) -> SearchResult {
        let query = normalize_value(&params.query);
        if query.is_empty() {
            return SearchResult {
                matches: Vec::new(),
                total: 0,
            };
        }

        let mut hits: Vec<(MatchKind, String, &Thought)> = outline
            .thought_index()
            .iter()
            .map(|(_, t)| t)
            .filter(|t| searchable(&t.value))
            .filter_map(|t| {
                let normalized = normalize_value(&t.value);
                let kind = if normalized == query {
                    MatchKind::Exact
                } else if normalized.starts_with(&query) {
                    MatchKind::Prefix
                } else if normalized.contains(&query) {
                    MatchKind::Substring
                } else {
                    return None;
                };
                Some((kind, normalized, t))
            })
            .collect();

        hits.sort_by(|a, b| match a.0.cmp(&b.0) {
            Ordering::Equal => a.1.cmp(&b.1),
            other => other,
        });

        let total = hits.len();
        let matches = hits
            .into_iter()
            .take(params.limit)
            .map(|(_, _, t)| t.clone())
            .collect();
        SearchResult { matches, total }
    }

    /// Whether any thought has `value` (after normalization).
    pub fn exists(&self, outline: &Outline, value: &str) -> bool {
        outline.thought_index().contains(value)
    }
}

fn searchable(value: &str) -> bool {
    !is_reserved(value) && value != NOTE_TOKEN && value != PIN_TOKEN
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::OutlineBuilder;

    #[test]
    fn ranks_exact_then_prefix_then_substring() {
        let outline = OutlineBuilder::new()
            .append(&[], "Apple pie")
            .append(&[], "crab apple")
            .append(&[], "apple")
            .append(&[], "applesauce")
            .append(&[], "pear")
            .build();
        let result = SearchEngine::new().search(&outline, &SearchParams::new("APPLE"));
        let values: Vec<&str> = result.matches.iter().map(|t| t.value.as_str()).collect();
        assert_eq!(values, vec!["apple", "Apple pie", "applesauce", "crab apple"]);
        assert_eq!(result.total, 4);
    }

    #[test]
    fn respects_limit_and_skips_reserved() {
        let outline = OutlineBuilder::new()
            .append(&[], "a1")
            .append(&[], "a2")
            .append(&["a1"], "=pin")
            .build();
        let mut params = SearchParams::new("a");
        params.limit = 1;
        let result = SearchEngine::new().search(&outline, &params);
        assert_eq!(result.matches.len(), 1);
        assert_eq!(result.total, 2);
        assert!(SearchEngine::new().exists(&outline, " A1 "));
    }
}
