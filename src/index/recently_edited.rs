//! Best-effort tracker of recently edited paths.

use serde::{Deserialize, Serialize};

use crate::index::hashing::hash_thought;
use crate::types::{OutlineError, OutlineResult, Path};

/// Default number of paths remembered.
pub const DEFAULT_RECENT_CAPACITY: usize = 100;

/// A recently edited path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentEntry {
    pub path: Path,
    /// Unix epoch microseconds.
    pub last_updated: u64,
}

/// Most-recent-first list of edited paths, bounded by `capacity`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentlyEdited {
    entries: Vec<RecentEntry>,
    capacity: usize,
}

impl RecentlyEdited {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity,
        }
    }

    /// Record an edit at `path`, moving it to the front.
    pub fn touch(&mut self, path: &Path, now: u64) {
        self.entries.retain(|e| !same_values(&e.path, path));
        self.entries.insert(
            0,
            RecentEntry {
                path: path.clone(),
                last_updated: now,
            },
        );
        self.entries.truncate(self.capacity);
    }

    /// Follow a move: every entry at or below `old_path` is re-rooted at `new_path`.
    ///
    /// Returns a new tracker; `self` is untouched.
    pub fn tree_move(&self, old_path: &Path, new_path: &Path, now: u64) -> OutlineResult<Self> {
        if old_path.is_empty() || new_path.is_empty() {
            return Err(OutlineError::RecentlyEdited(
                "cannot move an empty path".to_string(),
            ));
        }
        if new_path.len() > old_path.len() && starts_with(new_path, old_path) {
            return Err(OutlineError::RecentlyEdited(
                "cannot move a path into its own subtree".to_string(),
            ));
        }

        let mut moved = Self::with_capacity(self.capacity);
        for entry in &self.entries {
            let path = if starts_with(&entry.path, old_path) {
                let mut path = new_path.clone();
                path.extend(entry.path[old_path.len()..].iter().cloned());
                path
            } else {
                entry.path.clone()
            };
            if moved.entries.iter().any(|e| same_values(&e.path, &path)) {
                continue;
            }
            let last_updated = if starts_with(&entry.path, old_path) {
                now
            } else {
                entry.last_updated
            };
            moved.entries.push(RecentEntry { path, last_updated });
        }
        Ok(moved)
    }

    /// Change the bound, dropping the oldest entries if needed.
    pub fn resize(&mut self, capacity: usize) {
        self.capacity = capacity;
        self.entries.truncate(capacity);
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn entries(&self) -> &[RecentEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for RecentlyEdited {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_RECENT_CAPACITY)
    }
}

fn starts_with(path: &Path, prefix: &Path) -> bool {
    path.len() >= prefix.len()
        && path
            .iter()
            .zip(prefix)
            .all(|(a, b)| hash_thought(&a.value) == hash_thought(&b.value))
}

fn same_values(a: &Path, b: &Path) -> bool {
    a.len() == b.len() && starts_with(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::path::path_from;

    #[test]
    fn tree_move_rewrites_prefix() {
        let mut recent = RecentlyEdited::default();
        recent.touch(&path_from(&[("a", 0.0), ("b", 0.0), ("c", 1.0)]), 1);
        recent.touch(&path_from(&[("x", 0.0)]), 2);

        let moved = recent
            .tree_move(
                &path_from(&[("a", 0.0), ("b", 0.0)]),
                &path_from(&[("z", 0.0), ("b", 3.0)]),
                5,
            )
            .unwrap();
        let values: Vec<Vec<String>> = moved
            .entries()
            .iter()
            .map(|e| e.path.iter().map(|t| t.value.clone()).collect())
            .collect();
        assert_eq!(values[0], vec!["x"]);
        assert_eq!(values[1], vec!["z", "b", "c"]);
        assert_eq!(moved.entries()[1].last_updated, 5);
    }

    #[test]
    fn capacity_bounds_entries() {
        let mut recent = RecentlyEdited::with_capacity(2);
        for (i, v) in ["a", "b", "c"].iter().enumerate() {
            recent.touch(&path_from(&[(*v, 0.0)]), i as u64);
        }
        assert_eq!(recent.len(), 2);
        assert_eq!(recent.entries()[0].path[0].value, "c");

        recent.resize(1);
        assert_eq!(recent.capacity(), 1);
        assert_eq!(recent.entries()[0].path[0].value, "c");
        assert_eq!(recent.len(), 1);
    }

    #[test]
    fn move_into_own_subtree_is_an_error() {
        let mut recent = RecentlyEdited::default();
        recent.touch(&path_from(&[("a", 0.0), ("b", 0.0)]), 1);
        let result = recent.tree_move(
            &path_from(&[("a", 0.0)]),
            &path_from(&[("a", 0.0), ("b", 0.0), ("a", 2.0)]),
            5,
        );
        assert!(matches!(result, Err(OutlineError::RecentlyEdited(_))));
        // Moving beside itself is fine.
        assert!(recent
            .tree_move(&path_from(&[("a", 0.0)]), &path_from(&[("a", 3.0)]), 5)
            .is_ok());
    }

    #[test]
    fn empty_path_is_an_error() {
        let recent = RecentlyEdited::default();
        assert!(recent.tree_move(&Vec::new(), &path_from(&[("a", 0.0)]), 0).is_err());
    }
}
