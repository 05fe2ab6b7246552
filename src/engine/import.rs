//! Import pipeline. Turns pasted text into thoughts at a target path.

use crate::graph::{child_context, Outline};
use crate::parse::{count_items, count_notes, parse_import, ImportNode};
use crate::types::{
    context_of, head, now_micros, path_to_context, rooted_context_of, OutlineError,
    OutlineResult, Path, RankedThought, Updates, DEFAULT_RANK_INCREMENT, EM_TOKEN, NOTE_TOKEN,
};

use super::effects::{Effect, SyncOptions};
use super::workspace::Workspace;

/// Caller-side state for an import.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportOptions {
    /// Caret position in the destination value, in characters. `None` means the end.
    pub offset: Option<usize>,
    /// Characters selected after the caret, replaced by a single-line import.
    pub selection_len: usize,
    /// Rank step between imported items when the target is the last sibling.
    pub rank_increment: f64,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            offset: None,
            selection_len: 0,
            rank_increment: DEFAULT_RANK_INCREMENT,
        }
    }
}

/// A single-line import: an in-place edit of the destination value.
#[derive(Debug, Clone, PartialEq)]
pub struct TextEdit {
    pub path: Path,
    pub old_value: String,
    pub new_value: String,
    /// Caret position after the inserted text, in characters.
    pub cursor_offset: usize,
}

/// A structural import.
#[derive(Debug)]
pub struct ImportBatch {
    pub updates: Updates,
    /// Path of the first item placed at the import's top level.
    pub first_inserted: Option<Path>,
    pub effects: Vec<Effect>,
    /// Number of list items parsed (duplicates included).
    pub item_count: usize,
}

/// What an import produced.
#[derive(Debug)]
pub enum ImportOutcome {
    Edit(TextEdit),
    Structural(ImportBatch),
    /// Nothing to import.
    Empty,
}

/// The import engine.
#[derive(Debug, Default)]
pub struct ImportEngine;

impl ImportEngine {
    pub fn new() -> Self {
        Self
    }

    /// Import `raw` at `target`.
    ///
    /// Items land after `target` in its context, or directly under `target`
    /// when it is the reserved `__EM__` sentinel.
    pub fn import_text(
        &self,
        outline: &Outline,
        target: &Path,
        raw: &str,
        options: &ImportOptions,
    ) -> OutlineResult<ImportOutcome> {
        let dest = head(target).ok_or(OutlineError::EmptyPath)?;
        let nodes = parse_import(raw);
        let item_count = count_items(&nodes);

        if item_count == 0 {
            return Ok(ImportOutcome::Empty);
        }
        if item_count == 1 && count_notes(&nodes) == 0 {
            if let Some(text) = first_item(&nodes) {
                return Ok(ImportOutcome::Edit(text_edit(target, &dest.value, text, options)));
            }
        }

        let now = now_micros();
        let is_em = target.len() == 1 && dest.value == EM_TOKEN;
        let (parent, context) = if is_em {
            (target.clone(), vec![EM_TOKEN.to_string()])
        } else {
            (
                context_of(target),
                rooted_context_of(&path_to_context(target)),
            )
        };

        let index = outline.context_index();
        let (start, increment) = if is_em {
            (index.next_rank(&context), options.rank_increment)
        } else {
            let start = index.rank_after(&context, &dest.value, dest.rank);
            let increment = index
                .next_sibling(&context, &dest.value, dest.rank)
                .map_or(options.rank_increment, |next| {
                    (next.rank - start) / item_count as f64
                });
            (start, increment)
        };

        let mut ws = Workspace::new(outline, now);
        let dest_empty = !is_em
            && dest.value.trim().is_empty()
            && index.get(&path_to_context(target)).is_empty();
        if dest_empty {
            log::debug!("replacing empty destination with imported items");
            ws.remove(&dest.value, &context);
        }

        let mut emitter = Emitter {
            ws,
            rank: start,
            increment,
            first_inserted: None,
        };
        emitter.emit(&nodes, &parent, &context, 0);

        let Emitter {
            ws, first_inserted, ..
        } = emitter;
        let updates = ws.into_updates();
        log::debug!(
            "imported {} items: {} thought updates, {} context updates",
            item_count,
            updates.thoughts.len(),
            updates.contexts.len()
        );

        let effects = vec![Effect::Sync {
            updates: updates.clone(),
            options: SyncOptions {
                apply_to_live_state: true,
                force_render: true,
                callback: None,
            },
        }];

        Ok(ImportOutcome::Structural(ImportBatch {
            updates,
            first_inserted,
            effects,
            item_count,
        }))
    }
}

fn first_item(nodes: &[ImportNode]) -> Option<&str> {
    nodes.iter().find_map(|n| match n {
        ImportNode::ListItem(text) => Some(text.as_str()),
        ImportNode::NestedList(children) => first_item(children),
        ImportNode::Note(_) => None,
    })
}

fn text_edit(target: &Path, old_value: &str, text: &str, options: &ImportOptions) -> TextEdit {
    let chars: Vec<char> = old_value.chars().collect();
    let start = options.offset.unwrap_or(chars.len()).min(chars.len());
    let end = start.saturating_add(options.selection_len).min(chars.len());

    let inserted = if old_value.is_empty() {
        text.to_string()
    } else {
        format!(" {}", text)
    };

    let mut new_value: String = chars[..start].iter().collect();
    new_value.push_str(&inserted);
    new_value.extend(&chars[end..]);

    TextEdit {
        path: target.clone(),
        old_value: old_value.to_string(),
        new_value,
        cursor_offset: start + inserted.chars().count(),
    }
}

/// Places parsed nodes into a workspace with one rank cursor for every depth.
struct Emitter {
    ws: Workspace,
    rank: f64,
    increment: f64,
    first_inserted: Option<Path>,
}

impl Emitter {
    fn emit(&mut self, nodes: &[ImportNode], parent: &Path, context: &[String], depth: usize) {
        let mut last: Option<RankedThought> = None;
        for node in nodes {
            match node {
                ImportNode::ListItem(text) => {
                    let item = self.place(context, text);
                    if depth == 0 && self.first_inserted.is_none() {
                        let mut path = parent.clone();
                        path.push(item.clone());
                        self.first_inserted = Some(path);
                    }
                    last = Some(item);
                }
                ImportNode::NestedList(children) => match &last {
                    Some(item) => {
                        let mut child_parent = parent.clone();
                        child_parent.push(item.clone());
                        let child_ctx = child_context(context, &item.value);
                        self.emit(children, &child_parent, &child_ctx, depth + 1);
                    }
                    None => self.emit(children, parent, context, depth),
                },
                ImportNode::Note(text) => match &last {
                    Some(item) => self.note(context, &item.value, text),
                    None => last = Some(self.place(context, text)),
                },
            }
        }
    }

    /// Add `value` to `context` at the cursor rank, or adopt the rank of an
    /// existing same-value child. The cursor advances either way.
    fn place(&mut self, context: &[String], value: &str) -> RankedThought {
        let rank = match self.ws.contexts.find_child(context, value) {
            Some(existing) => existing.rank,
            None => {
                self.ws.add(value, context, self.rank);
                self.rank
            }
        };
        self.rank += self.increment;
        RankedThought::new(value, rank)
    }

    /// Attach `text` as the note of `item`. The rank cursor does not move.
    fn note(&mut self, context: &[String], item: &str, text: &str) {
        let item_ctx = child_context(context, item);
        if self.ws.contexts.find_child(&item_ctx, NOTE_TOKEN).is_none() {
            self.ws.add(NOTE_TOKEN, &item_ctx, self.rank);
        }
        let mut note_ctx = item_ctx;
        note_ctx.push(NOTE_TOKEN.to_string());
        if self.ws.contexts.find_child(&note_ctx, text).is_none() {
            self.ws.add(text, &note_ctx, 0.0);
        }
    }
}
