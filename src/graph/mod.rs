//! In-memory outline state: the core data structure.

pub mod builder;
pub mod outline;
pub mod traversal;

pub use builder::OutlineBuilder;
pub use outline::Outline;
pub use traversal::{child_context, walk_subtree, SubtreeEntry};
