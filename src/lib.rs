//! Outliner: a multi-context outliner core.
//!
//! Every thought is stored once, keyed by its normalized value, and can
//! appear in any number of contexts. A context index mirrors those
//! memberships as ranked child lists. The move and import engines compute
//! replacement batches against an immutable `Outline` and hand persistence
//! and navigation back to the caller as deferred effects.

pub mod cli;
pub mod config;
pub mod engine;
pub mod format;
pub mod graph;
pub mod index;
pub mod parse;
pub mod types;

// Re-export commonly used types at the crate root
pub use config::OutlineConfig;
pub use engine::{
    DescendantRelocation, DrainReport, Effect, EffectQueue, ImportBatch, ImportEngine,
    ImportOptions, ImportOutcome, InsertResult, LogNavigator, MoveEngine, MoveResult, Navigator,
    Persistence, SearchEngine, SearchParams, SearchResult, SyncOptions, TextEdit, WriteEngine,
};
pub use format::{SnapshotReader, SnapshotStore, SnapshotWriter};
pub use graph::{Outline, OutlineBuilder};
pub use index::{hash_context, hash_thought, ContextIndex, ContextViews, RecentlyEdited, ThoughtIndex};
pub use parse::{parse_import, ImportNode, InputFormat};
pub use types::{
    now_micros, ContextChild, ContextMembership, FileHeader, OutlineError, OutlineResult, Path,
    RankedThought, Thought, Updates, EM_TOKEN, NOTE_TOKEN, PIN_TOKEN, ROOT_TOKEN,
};
