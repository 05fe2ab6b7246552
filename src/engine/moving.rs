//! Subtree move. Relocates a thought and all of its descendants.

use std::collections::HashMap;

use crate::graph::{walk_subtree, Outline};
use crate::index::{hash_context, hash_thought, RecentlyEdited};
use crate::types::path::equal_path;
use crate::types::{
    context_of, head, now_micros, path_to_context, rooted_context_of, ContextViewUpdates,
    OutlineError, OutlineResult, Path, RankedThought, Updates,
};

use super::effects::{Effect, SyncOptions};
use super::workspace::Workspace;

/// Where one descendant was taken from and put back.
#[derive(Debug, Clone, PartialEq)]
pub struct DescendantRelocation {
    pub value: String,
    pub contexts_old: Vec<Vec<String>>,
    pub contexts_new: Vec<Vec<String>>,
    /// Rank in the last context entered.
    pub rank: f64,
}

/// Everything a move produces. Nothing is applied until the caller does so.
#[derive(Debug)]
pub struct MoveResult {
    pub updates: Updates,
    pub context_view_updates: ContextViewUpdates,
    /// Path of the moved thought with the rank it actually received.
    pub new_path: Path,
    /// Cursor after the move.
    pub cursor: Option<Path>,
    /// The recently-edited tracker after following the move, or why it could not.
    pub recently_edited: OutlineResult<RecentlyEdited>,
    /// Per-descendant relocations in traversal order.
    pub descendants: Vec<DescendantRelocation>,
    /// Deferred persistence and navigation.
    pub effects: Vec<Effect>,
    /// The destination already held the value and the move merged into it.
    pub merged: bool,
}

/// The move engine.
#[derive(Debug, Default)]
pub struct MoveEngine;

impl MoveEngine {
    pub fn new() -> Self {
        Self
    }

    /// Move the occurrence at `old_path` to `new_path`.
    ///
    /// The moved thought keeps its value; only the context and rank of
    /// `new_path` are used. When the destination context already holds the
    /// value and the move crosses contexts, the existing rank is kept and
    /// the two subtrees merge.
    pub fn move_thought(
        &self,
        outline: &Outline,
        old_path: &Path,
        new_path: &Path,
    ) -> OutlineResult<MoveResult> {
        let (Some(old_head), Some(new_head)) = (head(old_path), head(new_path)) else {
            return Err(OutlineError::EmptyPath);
        };
        let now = now_micros();
        let value = old_head.value.clone();

        let old_values = path_to_context(old_path);
        let mut new_values = context_of(&path_to_context(new_path));
        new_values.push(value.clone());

        let old_context = rooted_context_of(&old_values);
        let new_context = rooted_context_of(&new_values);
        let same_context = hash_context(&old_context) == hash_context(&new_context);

        let mut ws = Workspace::new(outline, now);

        let duplicate_rank = if same_context {
            None
        } else {
            outline
                .context_index()
                .find_child(&new_context, &value)
                .map(|c| c.rank)
        };
        let rank = duplicate_rank.unwrap_or(new_head.rank);

        if !same_context {
            ws.remove(&value, &old_context);
        }
        ws.add(&value, &new_context, rank);

        if let Some(existing) = duplicate_rank {
            log::debug!(
                "move of {:?} merges into existing sibling at rank {}",
                value,
                existing
            );
        }

        let mut views = outline.context_views().clone();
        let mut context_view_updates = ContextViewUpdates::new();
        let descendants = if same_context {
            Vec::new()
        } else {
            views.relocate(
                &hash_context(&old_values),
                &hash_context(&new_values),
                &mut context_view_updates,
            );
            relocate_descendants(
                outline,
                &mut ws,
                &old_values,
                &new_values,
                &mut |old: &[String], new: &[String]| {
                    views.relocate(&hash_context(old), &hash_context(new), &mut context_view_updates)
                },
            )
        };

        let mut final_path = context_of(new_path);
        final_path.push(RankedThought::new(value.clone(), rank));

        let editing = outline.cursor().is_some_and(|c| equal_path(c, old_path));
        let cursor = if editing {
            Some(final_path.clone())
        } else {
            outline.cursor().cloned()
        };

        let recently_edited = outline
            .recently_edited()
            .tree_move(old_path, &final_path, now);
        if let Err(e) = &recently_edited {
            log::warn!("recently edited tracker could not follow move: {}", e);
        }

        let updates = ws.into_updates();
        log::debug!(
            "moved {:?}: {} thought updates, {} context updates, {} descendants",
            value,
            updates.thoughts.len(),
            updates.contexts.len(),
            descendants.len()
        );

        let mut effects = vec![Effect::Sync {
            updates: updates.clone(),
            options: SyncOptions::default(),
        }];
        if editing {
            effects.push(Effect::UpdateLocation {
                path: final_path.clone(),
                replace: true,
            });
        }

        Ok(MoveResult {
            updates,
            context_view_updates,
            new_path: final_path,
            cursor,
            recently_edited,
            descendants,
            effects,
            merged: duplicate_rank.is_some(),
        })
    }
}

/// Re-root every descendant of `old_prefix` under `new_prefix`.
///
/// The subtree is read from the pre-move outline. Children entering a
/// context that already had children are appended after them in source
/// order; otherwise they keep their ranks. `on_context` is called with each
/// relocated (old, new) children context.
pub(crate) fn relocate_descendants(
    outline: &Outline,
    ws: &mut Workspace,
    old_prefix: &[String],
    new_prefix: &[String],
    on_context: &mut dyn FnMut(&[String], &[String]),
) -> Vec<DescendantRelocation> {
    let mut bases: HashMap<String, Option<f64>> = HashMap::new();
    let mut ledger: Vec<DescendantRelocation> = Vec::new();
    let mut ledger_pos: HashMap<String, usize> = HashMap::new();

    for entry in walk_subtree(outline.context_index(), old_prefix) {
        let mut context_new = new_prefix.to_vec();
        context_new.extend_from_slice(&entry.context[old_prefix.len()..]);

        let base = *bases.entry(hash_context(&context_new)).or_insert_with(|| {
            let existing = outline.context_index().get(&context_new);
            (!existing.is_empty()).then(|| outline.context_index().next_rank(&context_new))
        });
        let rank = base.map_or(entry.child.rank, |b| b + entry.index as f64);

        let value = &entry.child.value;
        ws.remove(value, &entry.context);
        ws.add(value, &context_new, rank);

        let mut own_new = context_new.clone();
        own_new.push(value.clone());
        on_context(&entry.child_context(), &own_new);

        let key = hash_thought(value);
        match ledger_pos.get(&key) {
            Some(&i) => {
                ledger[i].contexts_old.push(entry.context.clone());
                ledger[i].contexts_new.push(context_new);
                ledger[i].rank = rank;
            }
            None => {
                ledger_pos.insert(key, ledger.len());
                ledger.push(DescendantRelocation {
                    value: value.clone(),
                    contexts_old: vec![entry.context.clone()],
                    contexts_new: vec![context_new],
                    rank,
                });
            }
        }
    }
    ledger
}
