//! File-backed persistence: applies synced batches and writes them through.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::engine::{MoveResult, Persistence, SyncOptions};
use crate::graph::Outline;
use crate::types::{now_micros, OutlineResult, Path as OutlinePath, Updates};

use super::reader::SnapshotReader;
use super::writer::SnapshotWriter;

/// Snapshot-file persistence collaborator.
///
/// Batches may arrive out of order; each key keeps the value from the batch
/// with the newest stamp.
pub struct SnapshotStore {
    path: PathBuf,
    writer: SnapshotWriter,
    outline: Outline,
    /// Stamp of the batch that last wrote each key ("t:" thoughts, "c:" contexts).
    stamps: HashMap<String, u64>,
}

impl SnapshotStore {
    /// Open the snapshot at `path`, or start empty if it does not exist.
    pub fn open(path: &Path, compress: bool) -> OutlineResult<Self> {
        let outline = if path.exists() {
            SnapshotReader::read_from_file(path)?
        } else {
            log::info!("no snapshot at {}, starting empty", path.display());
            Outline::new()
        };
        Ok(Self {
            path: path.to_path_buf(),
            writer: SnapshotWriter::new(compress),
            outline,
            stamps: HashMap::new(),
        })
    }

    /// The persisted outline.
    pub fn outline(&self) -> &Outline {
        &self.outline
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the current outline to disk.
    pub fn save(&self) -> OutlineResult<()> {
        self.writer.write_to_file(&self.outline, &self.path)
    }

    /// Bound the recently edited tracker.
    pub fn set_recent_capacity(&mut self, capacity: usize) {
        self.outline.recently_edited.resize(capacity);
    }

    /// Record an edit at `path` in the persisted tracker.
    pub fn record_edit(&mut self, path: &OutlinePath) -> OutlineResult<()> {
        self.outline.recently_edited.touch(path, now_micros());
        self.save()
    }

    /// Persist the non-index parts of a move: ContextView flags and the
    /// tracker. The index updates travel through `sync`.
    pub fn commit_move(&mut self, result: &MoveResult) -> OutlineResult<()> {
        self.outline.context_views.apply(&result.context_view_updates);
        if let Ok(recent) = &result.recently_edited {
            self.outline.recently_edited = recent.clone();
        }
        self.save()
    }

    /// Drop entries that an already-applied newer batch has written.
    fn fresh_entries(&mut self, updates: &Updates) -> Updates {
        let mut fresh = Updates::new(updates.stamp);
        for (key, thought) in &updates.thoughts {
            if self.claim(format!("t:{}", key), updates.stamp) {
                fresh.thoughts.insert(key.clone(), thought.clone());
            }
        }
        for (key, children) in &updates.contexts {
            if self.claim(format!("c:{}", key), updates.stamp) {
                fresh.contexts.insert(key.clone(), children.clone());
            }
        }
        fresh
    }

    fn claim(&mut self, key: String, stamp: u64) -> bool {
        match self.stamps.get(&key) {
            Some(&seen) if seen > stamp => {
                log::debug!("skipping stale write to {} ({} < {})", key, stamp, seen);
                false
            }
            _ => {
                self.stamps.insert(key, stamp);
                true
            }
        }
    }
}

impl Persistence for SnapshotStore {
    fn sync(&mut self, updates: &Updates, mut options: SyncOptions) -> OutlineResult<()> {
        let fresh = self.fresh_entries(updates);
        if !fresh.is_empty() {
            self.outline = self.outline.apply(&fresh);
            self.save()?;
        }
        log::debug!(
            "synced batch {}: {} thoughts, {} contexts (force_render: {})",
            updates.stamp,
            fresh.thoughts.len(),
            fresh.contexts.len(),
            options.force_render
        );
        options.complete();
        Ok(())
    }
}
