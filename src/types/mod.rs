//! All data types for the outliner library.

pub mod error;
pub mod header;
pub mod path;
pub mod thought;
pub mod updates;

pub use error::{OutlineError, OutlineResult};
pub use header::{FileHeader, HEADER_SIZE};
pub use path::{
    context_of, head, head_rank, path_to_context, rooted_context_of, Path, RankedThought,
};
pub use thought::{ContextChild, ContextMembership, Thought};
pub use updates::{ContextViewUpdates, Updates};

/// Root sentinel. Top-level thoughts live in the context `[ROOT_TOKEN]`.
pub const ROOT_TOKEN: &str = "__ROOT__";

/// Reserved top-level sentinel. Importing into `[{EM_TOKEN, 0}]` inserts
/// directly under it instead of next to it.
pub const EM_TOKEN: &str = "__EM__";

/// Reserved child slot holding a thought's note.
pub const NOTE_TOKEN: &str = "=note";

/// Reserved attribute child that keeps a thought expanded.
pub const PIN_TOKEN: &str = "=pin";

/// Magic bytes at the start of every snapshot file.
pub const OUTLINE_MAGIC: [u8; 4] = [0x4F, 0x54, 0x4C, 0x4E]; // "OTLN"

/// Current snapshot format version.
pub const FORMAT_VERSION: u32 = 1;

/// Rank step used between imported siblings when there is no next sibling.
pub const DEFAULT_RANK_INCREMENT: f64 = 1.0;

/// Returns the current time as Unix epoch microseconds.
pub fn now_micros() -> u64 {
    chrono::Utc::now().timestamp_micros() as u64
}

/// Whether a value is one of the reserved tokens that never show up in search.
pub fn is_reserved(value: &str) -> bool {
    value == ROOT_TOKEN || value == EM_TOKEN
}
