//! Error types for the outliner library.

use thiserror::Error;

/// All errors that can occur in the outliner library.
#[derive(Error, Debug)]
pub enum OutlineError {
    /// A path with no segments was given where a thought is required.
    #[error("Path is empty")]
    EmptyPath,

    /// No thought is stored under the given value.
    #[error("Thought not found: {0:?}")]
    ThoughtNotFound(String),

    /// The recently-edited tracker could not follow a structural change.
    #[error("Recently edited tracker error: {0}")]
    RecentlyEdited(String),

    /// The two indices disagree with each other.
    #[error("Index inconsistency: {0}")]
    Inconsistent(String),

    /// Deferred syncs failed while draining the effect queue.
    #[error("{0} deferred sync(s) failed")]
    SyncFailed(usize),

    /// Invalid magic bytes in file header.
    #[error("Invalid magic bytes in file header")]
    InvalidMagic,

    /// Unsupported format version.
    #[error("Unsupported format version: {0}")]
    UnsupportedVersion(u32),

    /// File is empty or truncated.
    #[error("File is empty or truncated")]
    Truncated,

    /// The outline does not fit the snapshot header's fields.
    #[error("Snapshot too large: {0}")]
    TooLarge(String),

    /// Compression error.
    #[error("Compression error: {0}")]
    Compression(String),

    /// Snapshot body could not be encoded or decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file could not be parsed or written.
    #[error("Config error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for outliner operations.
pub type OutlineResult<T> = Result<T, OutlineError>;
