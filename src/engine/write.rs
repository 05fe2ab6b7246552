//! Direct edits: insert, delete, rename and pin.

use crate::graph::{walk_subtree, Outline};
use crate::index::hash_thought;
use crate::types::{
    context_of, head, now_micros, path_to_context, rooted_context_of, OutlineError,
    OutlineResult, Path, RankedThought, Updates, PIN_TOKEN, ROOT_TOKEN,
};

use super::moving::relocate_descendants;
use super::workspace::Workspace;

/// Result of an insert.
#[derive(Debug)]
pub struct InsertResult {
    pub updates: Updates,
    /// Path of the inserted (or already present) thought.
    pub path: Path,
    /// The parent already had a child with this value; nothing changed.
    pub existed: bool,
}

/// The write engine.
#[derive(Debug, Default)]
pub struct WriteEngine;

impl WriteEngine {
    pub fn new() -> Self {
        Self
    }

    /// Insert `value` as a child of `parent` (the root when empty).
    ///
    /// Without an explicit rank the value is appended after the last child.
    pub fn insert(
        &self,
        outline: &Outline,
        parent: &Path,
        value: &str,
        rank: Option<f64>,
    ) -> OutlineResult<InsertResult> {
        let context = children_context(parent);
        let mut path = parent.clone();

        if let Some(existing) = outline.context_index().find_child(&context, value) {
            log::debug!("insert of {:?} found existing child at rank {}", value, existing.rank);
            path.push(RankedThought::new(existing.value.clone(), existing.rank));
            return Ok(InsertResult {
                updates: Updates::new(now_micros()),
                path,
                existed: true,
            });
        }

        let rank = rank.unwrap_or_else(|| outline.context_index().next_rank(&context));
        let mut ws = Workspace::new(outline, now_micros());
        ws.add(value, &context, rank);
        path.push(RankedThought::new(value, rank));

        Ok(InsertResult {
            updates: ws.into_updates(),
            path,
            existed: false,
        })
    }

    /// Delete the occurrence at `path` together with its whole subtree.
    pub fn delete(&self, outline: &Outline, path: &Path) -> OutlineResult<Updates> {
        let target = head(path).ok_or(OutlineError::EmptyPath)?;
        let values = path_to_context(path);
        let context = rooted_context_of(&values);
        if outline
            .context_index()
            .find_child(&context, &target.value)
            .is_none()
        {
            return Err(OutlineError::ThoughtNotFound(target.value.clone()));
        }

        let mut ws = Workspace::new(outline, now_micros());
        let descendants = walk_subtree(outline.context_index(), &values);
        for entry in &descendants {
            ws.remove(&entry.child.value, &entry.context);
        }
        ws.remove(&target.value, &context);

        log::debug!(
            "deleted {:?} and {} descendant memberships",
            target.value,
            descendants.len()
        );
        Ok(ws.into_updates())
    }

    /// Change the value at `path`, carrying its subtree along.
    ///
    /// If a sibling already holds the new value the two merge and `existed`
    /// is set.
    pub fn edit(&self, outline: &Outline, path: &Path, new_value: &str) -> OutlineResult<InsertResult> {
        let target = head(path).ok_or(OutlineError::EmptyPath)?;
        let old_values = path_to_context(path);
        let context = rooted_context_of(&old_values);
        if outline
            .context_index()
            .find_child(&context, &target.value)
            .is_none()
        {
            return Err(OutlineError::ThoughtNotFound(target.value.clone()));
        }

        let renamed = hash_thought(&target.value) != hash_thought(new_value);
        let merged = if renamed {
            outline
                .context_index()
                .find_child(&context, new_value)
                .map(|c| c.rank)
        } else {
            None
        };
        let rank = merged.unwrap_or(target.rank);

        let mut ws = Workspace::new(outline, now_micros());
        ws.remove(&target.value, &context);
        ws.add(new_value, &context, rank);

        if renamed {
            let mut new_values = context_of(&old_values);
            new_values.push(new_value.to_string());
            let moved = relocate_descendants(
                outline,
                &mut ws,
                &old_values,
                &new_values,
                &mut |_: &[String], _: &[String]| {},
            );
            log::debug!(
                "renamed {:?} to {:?}, {} descendants relocated",
                target.value,
                new_value,
                moved.len()
            );
        }

        let mut new_path = context_of(path);
        new_path.push(RankedThought::new(new_value, rank));
        Ok(InsertResult {
            updates: ws.into_updates(),
            path: new_path,
            existed: merged.is_some(),
        })
    }

    /// Add or remove the pin attribute that keeps `path` expanded.
    pub fn toggle_pin(&self, outline: &Outline, path: &Path) -> OutlineResult<Updates> {
        if path.is_empty() {
            return Err(OutlineError::EmptyPath);
        }
        let context = path_to_context(path);
        let mut ws = Workspace::new(outline, now_micros());
        if outline.is_pinned(path) {
            ws.remove(PIN_TOKEN, &context);
        } else {
            let rank = outline.context_index().next_rank(&context);
            ws.add(PIN_TOKEN, &context, rank);
        }
        Ok(ws.into_updates())
    }
}

fn children_context(parent: &Path) -> Vec<String> {
    if parent.is_empty() {
        vec![ROOT_TOKEN.to_string()]
    } else {
        path_to_context(parent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::OutlineBuilder;
    use crate::types::path::path_from;

    #[test]
    fn insert_appends_and_adopts_duplicates() {
        let outline = OutlineBuilder::new().append(&[], "a").append(&["a"], "b").build();
        let engine = WriteEngine::new();

        let parent = outline.resolve(&["a"]).unwrap_or_default();
        let result = engine.insert(&outline, &parent, "c", None).unwrap();
        assert!(!result.existed);
        assert_eq!(result.path, path_from(&[("a", 0.0), ("c", 1.0)]));

        let again = engine.insert(&outline, &parent, "B", Some(9.0)).unwrap();
        assert!(again.existed);
        assert!(again.updates.is_empty());
    }

    #[test]
    fn delete_removes_subtree() {
        let outline = OutlineBuilder::new()
            .append(&[], "a")
            .append(&["a"], "b")
            .append(&["a", "b"], "c")
            .append(&[], "d")
            .build();
        let path = outline.resolve(&["a"]).unwrap_or_default();
        let updates = WriteEngine::new().delete(&outline, &path).unwrap();
        let next = outline.apply(&updates);
        assert!(next.thought("a").is_none());
        assert!(next.thought("c").is_none());
        assert!(next.thought("d").is_some());
        assert!(next.verify().is_ok());
    }

    #[test]
    fn edit_carries_subtree() {
        let outline = OutlineBuilder::new()
            .append(&[], "a")
            .append(&["a"], "b")
            .append(&["a", "b"], "c")
            .build();
        let path = outline.resolve(&["a"]).unwrap_or_default();
        let result = WriteEngine::new().edit(&outline, &path, "z").unwrap();
        let next = outline.apply(&result.updates);
        assert!(next.thought("a").is_none());
        assert_eq!(next.children(&["z"]).len(), 1);
        assert_eq!(next.children(&["z", "b"])[0].value, "c");
        assert!(next.verify().is_ok());
    }

    #[test]
    fn pin_toggles() {
        let outline = OutlineBuilder::new().append(&[], "a").build();
        let path = outline.resolve(&["a"]).unwrap_or_default();
        let engine = WriteEngine::new();
        let pinned = outline.apply(&engine.toggle_pin(&outline, &path).unwrap());
        assert!(pinned.is_pinned(&path));
        let unpinned = pinned.apply(&engine.toggle_pin(&pinned, &path).unwrap());
        assert!(!unpinned.is_pinned(&path));
        assert!(unpinned.thought(PIN_TOKEN).is_none());
    }
}
