//! Reads snapshot files into an in-memory outline.

use std::io::Read;
use std::path::Path;

use crate::graph::Outline;
use crate::types::error::{OutlineError, OutlineResult};
use crate::types::header::{FileHeader, HEADER_SIZE};

use super::compression::decompress_body;
use super::writer::SnapshotBody;

/// Reader for snapshot files.
pub struct SnapshotReader;

impl SnapshotReader {
    /// Read a snapshot file into an Outline.
    pub fn read_from_file(path: &Path) -> OutlineResult<Outline> {
        let data = std::fs::read(path)?;
        let mut cursor = std::io::Cursor::new(data);
        Self::read_from(&mut cursor)
    }

    /// Read only the header of a snapshot file.
    pub fn read_header(path: &Path) -> OutlineResult<FileHeader> {
        let mut file = std::fs::File::open(path)?;
        FileHeader::read_from(&mut file)
    }

    /// Read from any reader into an Outline.
    pub fn read_from(reader: &mut impl Read) -> OutlineResult<Outline> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;

        let header = FileHeader::read_from(&mut data.as_slice())?;
        let start = HEADER_SIZE as usize;
        let end = start
            .checked_add(header.body_len as usize)
            .ok_or(OutlineError::Truncated)?;
        let stored = data.get(start..end).ok_or(OutlineError::Truncated)?;

        let body: SnapshotBody = if header.is_compressed() {
            serde_json::from_slice(&decompress_body(stored)?)?
        } else {
            serde_json::from_slice(stored)?
        };

        if body.thought_index.len() != header.thought_count as usize
            || body.context_index.len() as u64 != header.context_count
        {
            log::warn!(
                "snapshot header counts ({} thoughts, {} contexts) disagree with body ({}, {})",
                header.thought_count,
                header.context_count,
                body.thought_index.len(),
                body.context_index.len()
            );
        }
        Ok(body.into_outline())
    }
}
