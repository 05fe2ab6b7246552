//! Index structures: the thought store, the context index and their companions.

pub mod context_index;
pub mod context_views;
pub mod hashing;
pub mod recently_edited;
pub mod thought_index;

pub use context_index::{sort_by_rank, ContextIndex};
pub use context_views::ContextViews;
pub use hashing::{hash_context, hash_thought, normalize_value};
pub use recently_edited::{RecentEntry, RecentlyEdited, DEFAULT_RECENT_CAPACITY};
pub use thought_index::ThoughtIndex;
