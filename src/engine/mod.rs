//! High-level operations: move, import, direct writes and search.

pub mod effects;
pub mod import;
pub mod moving;
pub mod search;
pub(crate) mod workspace;
pub mod write;

pub use effects::{
    DrainReport, Effect, EffectQueue, LogNavigator, Navigator, Persistence, SyncOptions,
};
pub use import::{ImportBatch, ImportEngine, ImportOptions, ImportOutcome, TextEdit};
pub use moving::{DescendantRelocation, MoveEngine, MoveResult};
pub use search::{SearchEngine, SearchParams, SearchResult, DEFAULT_SEARCH_LIMIT};
pub use write::{InsertResult, WriteEngine};
