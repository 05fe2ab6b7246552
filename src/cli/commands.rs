//! CLI command implementations.

use std::path::Path;

use crate::config::OutlineConfig;
use crate::engine::{
    Effect, EffectQueue, ImportEngine, ImportOptions, ImportOutcome, LogNavigator, MoveEngine,
    SearchEngine, SearchParams, SyncOptions, WriteEngine,
};
use crate::format::{SnapshotReader, SnapshotStore, SnapshotWriter};
use crate::graph::Outline;
use crate::types::{
    OutlineError, OutlineResult, Path as OutlinePath, RankedThought, Updates, ROOT_TOKEN,
};

/// Split a `/`-separated path argument into values. An empty string is the root.
pub fn parse_values(arg: &str) -> Vec<String> {
    arg.split('/')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

/// Resolve a `/`-separated path argument against an outline.
pub fn resolve_arg(outline: &Outline, arg: &str) -> OutlineResult<OutlinePath> {
    let values = parse_values(arg);
    outline
        .resolve(&values)
        .ok_or_else(|| OutlineError::ThoughtNotFound(arg.to_string()))
}

fn display_path(path: &[RankedThought]) -> String {
    path.iter()
        .map(|t| t.value.as_str())
        .collect::<Vec<_>>()
        .join("/")
}

fn sync_effect(updates: Updates) -> Effect {
    Effect::Sync {
        updates,
        options: SyncOptions::default(),
    }
}

fn open_store(path: &Path, config: &OutlineConfig) -> OutlineResult<SnapshotStore> {
    let mut store = SnapshotStore::open(path, config.compress)?;
    store.set_recent_capacity(config.recently_edited_capacity);
    Ok(store)
}

/// Run deferred effects against the store.
fn commit(store: &mut SnapshotStore, effects: Vec<Effect>) -> OutlineResult<()> {
    let mut queue = EffectQueue::new();
    queue.schedule_all(effects);
    let report = queue.drain(store, &mut LogNavigator);
    if report.failed > 0 {
        return Err(OutlineError::SyncFailed(report.failed));
    }
    Ok(())
}

/// Create a new empty snapshot file.
pub fn cmd_create(path: &Path, config: &OutlineConfig) -> OutlineResult<()> {
    let writer = SnapshotWriter::new(config.compress);
    writer.write_to_file(&Outline::new(), path)?;
    println!("Created {}", path.display());
    Ok(())
}

/// Display information about a snapshot file.
pub fn cmd_info(path: &Path, json: bool) -> OutlineResult<()> {
    let header = SnapshotReader::read_header(path)?;
    let outline = SnapshotReader::read_from_file(path)?;
    let file_size = std::fs::metadata(path)?.len();
    let top_level = outline.children(&[ROOT_TOKEN]).len();

    if json {
        let info = serde_json::json!({
            "file": path.display().to_string(),
            "version": header.version,
            "compressed": header.is_compressed(),
            "thoughts": outline.thought_index().len(),
            "memberships": outline.thought_index().membership_count(),
            "contexts": outline.context_index().len(),
            "top_level": top_level,
            "recently_edited": outline.recently_edited().len(),
            "file_size": file_size,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&info).unwrap_or_default()
        );
    } else {
        println!("File: {}", path.display());
        println!("Version: {}", header.version);
        println!("Compressed: {}", header.is_compressed());
        println!("Thoughts: {}", outline.thought_index().len());
        println!(
            "Memberships: {}",
            outline.thought_index().membership_count()
        );
        println!("Contexts: {}", outline.context_index().len());
        println!("Top level: {}", top_level);
        println!("Recently edited: {}", outline.recently_edited().len());
        println!("File size: {}", format_size(file_size));
    }
    Ok(())
}

/// Add a thought under a parent path.
pub fn cmd_add(
    path: &Path,
    parent: &str,
    value: &str,
    rank: Option<f64>,
    config: &OutlineConfig,
    json: bool,
) -> OutlineResult<()> {
    let mut store = open_store(path, config)?;
    let parent_path = resolve_arg(store.outline(), parent)?;
    let result = WriteEngine::new().insert(store.outline(), &parent_path, value, rank)?;
    let added = result.path.clone();
    if !result.existed {
        commit(&mut store, vec![sync_effect(result.updates)])?;
        store.record_edit(&added)?;
    }

    if json {
        println!(
            "{}",
            serde_json::json!({
                "path": display_path(&added),
                "rank": added.last().map(|t| t.rank),
                "existed": result.existed,
            })
        );
    } else if result.existed {
        println!("{} already exists", display_path(&added));
    } else {
        println!("Added {}", display_path(&added));
    }
    Ok(())
}

/// Move a thought (with its subtree) under a new parent.
pub fn cmd_move(
    path: &Path,
    source: &str,
    dest_parent: &str,
    rank: Option<f64>,
    config: &OutlineConfig,
    json: bool,
) -> OutlineResult<()> {
    let mut store = open_store(path, config)?;
    let outline = store.outline().clone();
    let old_path = resolve_arg(&outline, source)?;
    let mut new_path = resolve_arg(&outline, dest_parent)?;

    let value = old_path
        .last()
        .map(|t| t.value.clone())
        .ok_or(OutlineError::EmptyPath)?;
    let dest_context = if new_path.is_empty() {
        vec![ROOT_TOKEN.to_string()]
    } else {
        new_path.iter().map(|t| t.value.clone()).collect()
    };
    let rank = rank.unwrap_or_else(|| outline.context_index().next_rank(&dest_context));
    new_path.push(RankedThought::new(value, rank));

    let result = MoveEngine::new().move_thought(&outline, &old_path, &new_path)?;
    store.commit_move(&result)?;
    commit(&mut store, result.effects)?;

    if json {
        println!(
            "{}",
            serde_json::json!({
                "from": display_path(&old_path),
                "to": display_path(&result.new_path),
                "rank": result.new_path.last().map(|t| t.rank),
                "merged": result.merged,
                "descendants": result.descendants.len(),
            })
        );
    } else {
        println!(
            "Moved {} -> {}{}",
            display_path(&old_path),
            display_path(&result.new_path),
            if result.merged { " (merged)" } else { "" }
        );
        if !result.descendants.is_empty() {
            println!("  {} descendants relocated", result.descendants.len());
        }
    }
    Ok(())
}

/// Import text after a target thought.
///
/// An empty target imports at the end of the top level.
pub fn cmd_import(
    path: &Path,
    target: &str,
    text: &str,
    config: &OutlineConfig,
    json: bool,
) -> OutlineResult<()> {
    let mut store = open_store(path, config)?;
    let writer = WriteEngine::new();

    // An empty target imports into a placeholder at the end of the top level.
    // The placeholder is only persisted together with the import replacing it.
    let mut outline = store.outline().clone();
    let mut placeholder: Option<Updates> = None;
    let target_path = if parse_values(target).is_empty() {
        let inserted = writer.insert(&outline, &Vec::new(), "", None)?;
        if !inserted.existed {
            outline = outline.apply(&inserted.updates);
            placeholder = Some(inserted.updates);
        }
        inserted.path
    } else {
        resolve_arg(&outline, target)?
    };

    let options = ImportOptions {
        rank_increment: config.default_rank_increment,
        ..ImportOptions::default()
    };
    let outcome = ImportEngine::new().import_text(&outline, &target_path, text, &options)?;

    match outcome {
        ImportOutcome::Empty => {
            if json {
                println!("{}", serde_json::json!({"imported": 0}));
            } else {
                println!("Nothing to import");
            }
        }
        ImportOutcome::Edit(edit) => {
            let result = writer.edit(&outline, &edit.path, &edit.new_value)?;
            let mut effects: Vec<Effect> = placeholder.into_iter().map(sync_effect).collect();
            effects.push(sync_effect(result.updates));
            commit(&mut store, effects)?;
            store.record_edit(&result.path)?;
            if json {
                println!(
                    "{}",
                    serde_json::json!({
                        "imported": 1,
                        "edited": display_path(&result.path),
                        "value": edit.new_value,
                    })
                );
            } else {
                println!("Edited {} -> {:?}", display_path(&edit.path), edit.new_value);
            }
        }
        ImportOutcome::Structural(batch) => {
            let first = batch.first_inserted.clone();
            let effects: Vec<Effect> = placeholder
                .into_iter()
                .map(sync_effect)
                .chain(batch.effects)
                .collect();
            commit(&mut store, effects)?;
            if let Some(first) = &first {
                store.record_edit(first)?;
            }
            if json {
                println!(
                    "{}",
                    serde_json::json!({
                        "imported": batch.item_count,
                        "first": first.as_deref().map(display_path),
                    })
                );
            } else {
                println!("Imported {} items", batch.item_count);
                if let Some(first) = first {
                    println!("  first: {}", display_path(&first));
                }
            }
        }
    }
    Ok(())
}

/// Delete a thought and its subtree.
pub fn cmd_delete(path: &Path, target: &str, config: &OutlineConfig, json: bool) -> OutlineResult<()> {
    let mut store = open_store(path, config)?;
    let target_path = resolve_arg(store.outline(), target)?;
    let updates = WriteEngine::new().delete(store.outline(), &target_path)?;
    let removed = updates.deleted_thoughts().len();
    commit(&mut store, vec![sync_effect(updates)])?;

    if json {
        println!(
            "{}",
            serde_json::json!({"deleted": display_path(&target_path), "thoughts_removed": removed})
        );
    } else {
        println!(
            "Deleted {} ({} thoughts removed)",
            display_path(&target_path),
            removed
        );
    }
    Ok(())
}

/// Toggle the pin attribute on a thought.
pub fn cmd_pin(path: &Path, target: &str, config: &OutlineConfig, json: bool) -> OutlineResult<()> {
    let mut store = open_store(path, config)?;
    let target_path = resolve_arg(store.outline(), target)?;
    let updates = WriteEngine::new().toggle_pin(store.outline(), &target_path)?;
    commit(&mut store, vec![sync_effect(updates)])?;
    let pinned = store.outline().is_pinned(&target_path);

    if json {
        println!(
            "{}",
            serde_json::json!({"path": display_path(&target_path), "pinned": pinned})
        );
    } else {
        println!(
            "{} {}",
            if pinned { "Pinned" } else { "Unpinned" },
            display_path(&target_path)
        );
    }
    Ok(())
}

/// Print the outline as a tree.
pub fn cmd_show(path: &Path, json: bool) -> OutlineResult<()> {
    let outline = SnapshotReader::read_from_file(path)?;
    if json {
        let tree = tree_json(&outline, &[ROOT_TOKEN.to_string()]);
        println!(
            "{}",
            serde_json::to_string_pretty(&tree).unwrap_or_default()
        );
    } else {
        print!("{}", outline.render_tree());
    }
    Ok(())
}

fn tree_json(outline: &Outline, context: &[String]) -> serde_json::Value {
    let children: Vec<serde_json::Value> = outline
        .children(context)
        .into_iter()
        .map(|child| {
            let below = crate::graph::child_context(context, &child.value);
            serde_json::json!({
                "value": child.value,
                "rank": child.rank,
                "children": tree_json(outline, &below),
            })
        })
        .collect();
    serde_json::Value::Array(children)
}

/// Search thought values.
pub fn cmd_search(path: &Path, query: &str, limit: usize, json: bool) -> OutlineResult<()> {
    let outline = SnapshotReader::read_from_file(path)?;
    let params = SearchParams {
        query: query.to_string(),
        limit,
    };
    let result = SearchEngine::new().search(&outline, &params);

    if json {
        let matches: Vec<serde_json::Value> = result
            .matches
            .iter()
            .map(|t| {
                serde_json::json!({
                    "value": t.value,
                    "contexts": t.contexts.iter().map(|m| m.context.clone()).collect::<Vec<_>>(),
                })
            })
            .collect();
        println!(
            "{}",
            serde_json::json!({"total": result.total, "matches": matches})
        );
    } else {
        println!(
            "{} matches (showing {})",
            result.total,
            result.matches.len()
        );
        for thought in &result.matches {
            println!("  {} ({} contexts)", thought.value, thought.contexts.len());
        }
    }
    Ok(())
}

/// Verify index consistency.
pub fn cmd_check(path: &Path, json: bool) -> OutlineResult<()> {
    let outline = SnapshotReader::read_from_file(path)?;
    let verdict = outline.verify();
    if json {
        println!(
            "{}",
            serde_json::json!({
                "ok": verdict.is_ok(),
                "error": verdict.as_ref().err().map(|e| e.to_string()),
            })
        );
    } else if verdict.is_ok() {
        println!(
            "OK: {} thoughts, {} contexts",
            outline.thought_index().len(),
            outline.context_index().len()
        );
    }
    verdict
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_slash_paths() {
        assert_eq!(parse_values("a / b/c"), vec!["a", "b", "c"]);
        assert!(parse_values("").is_empty());
        assert!(parse_values("/").is_empty());
    }

    #[test]
    fn formats_sizes() {
        assert_eq!(format_size(10), "10 B");
        assert_eq!(format_size(2048), "2.0 KB");
    }
}
