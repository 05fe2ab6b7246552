//! Snapshot file I/O and the file-backed persistence collaborator.

pub mod compression;
pub mod reader;
pub mod store;
pub mod writer;

pub use reader::SnapshotReader;
pub use store::SnapshotStore;
pub use writer::{SnapshotBody, SnapshotWriter};
