//! Deferred effects and the collaborators that carry them out.
//!
//! Engines never persist or navigate themselves. They return `Effect`s which
//! the caller queues and drains once the new state is in place.

use std::collections::VecDeque;
use std::fmt;

use crate::types::{OutlineResult, Path, Updates};

/// Options passed to the persistence collaborator with each batch.
#[derive(Default)]
pub struct SyncOptions {
    /// Whether the collaborator should also update the live in-memory state.
    pub apply_to_live_state: bool,
    /// Whether a full re-render should follow.
    pub force_render: bool,
    /// Called once the batch is committed.
    pub callback: Option<Box<dyn FnOnce() + Send>>,
}

impl SyncOptions {
    /// Run the completion callback, if any.
    pub fn complete(&mut self) {
        if let Some(callback) = self.callback.take() {
            callback();
        }
    }
}

impl fmt::Debug for SyncOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncOptions")
            .field("apply_to_live_state", &self.apply_to_live_state)
            .field("force_render", &self.force_render)
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

/// Work scheduled to run after a structural result is produced.
#[derive(Debug)]
pub enum Effect {
    /// Persist an update batch.
    Sync {
        updates: Updates,
        options: SyncOptions,
    },
    /// Update externally visible location state.
    UpdateLocation { path: Path, replace: bool },
}

/// Durable storage for update batches.
///
/// Implementations must be idempotent and resolve out-of-order batches with
/// last-write-wins per key.
pub trait Persistence {
    fn sync(&mut self, updates: &Updates, options: SyncOptions) -> OutlineResult<()>;
}

/// Receiver of location changes.
pub trait Navigator {
    fn update_location(&mut self, path: &Path, replace: bool);
}

/// Navigator that only logs.
#[derive(Debug, Default)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn update_location(&mut self, path: &Path, replace: bool) {
        let values: Vec<&str> = path.iter().map(|t| t.value.as_str()).collect();
        log::debug!("location -> {} (replace: {})", values.join("/"), replace);
    }
}

/// Outcome of draining an effect queue.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DrainReport {
    pub applied: usize,
    pub failed: usize,
}

/// FIFO queue of pending effects.
#[derive(Debug, Default)]
pub struct EffectQueue {
    pending: VecDeque<Effect>,
}

impl EffectQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, effect: Effect) {
        self.pending.push_back(effect);
    }

    pub fn schedule_all(&mut self, effects: impl IntoIterator<Item = Effect>) {
        self.pending.extend(effects);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Run every pending effect in order.
    ///
    /// A failing sync is logged and counted; the remaining effects still run.
    pub fn drain(
        &mut self,
        persistence: &mut dyn Persistence,
        navigator: &mut dyn Navigator,
    ) -> DrainReport {
        let mut report = DrainReport::default();
        while let Some(effect) = self.pending.pop_front() {
            match effect {
                Effect::Sync { updates, options } => match persistence.sync(&updates, options) {
                    Ok(()) => report.applied += 1,
                    Err(e) => {
                        log::error!("deferred sync failed: {}", e);
                        report.failed += 1;
                    }
                },
                Effect::UpdateLocation { path, replace } => {
                    navigator.update_location(&path, replace);
                    report.applied += 1;
                }
            }
        }
        report
    }
}
