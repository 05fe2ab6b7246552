//! Writes snapshot files from an in-memory outline.

use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::graph::Outline;
use crate::index::{ContextIndex, ContextViews, RecentlyEdited, ThoughtIndex};
use crate::types::error::{OutlineError, OutlineResult};
use crate::types::header::FileHeader;

use super::compression::compress_body;

/// Serialized body of a snapshot file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotBody {
    pub thought_index: ThoughtIndex,
    pub context_index: ContextIndex,
    #[serde(default)]
    pub context_views: ContextViews,
    #[serde(default)]
    pub recently_edited: RecentlyEdited,
}

impl SnapshotBody {
    pub fn from_outline(outline: &Outline) -> Self {
        Self {
            thought_index: outline.thought_index().clone(),
            context_index: outline.context_index().clone(),
            context_views: outline.context_views().clone(),
            recently_edited: outline.recently_edited().clone(),
        }
    }

    pub fn into_outline(self) -> Outline {
        let mut outline =
            Outline::from_parts(self.thought_index, self.context_index, self.context_views);
        outline.recently_edited = self.recently_edited;
        outline
    }
}

/// Writer for snapshot files.
pub struct SnapshotWriter {
    compress: bool,
}

impl SnapshotWriter {
    /// Create a new writer; `compress` selects an LZ4 body.
    pub fn new(compress: bool) -> Self {
        Self { compress }
    }

    /// Write an outline to a snapshot file.
    ///
    /// The file is written next to its destination and renamed over it, so a
    /// failed write never leaves a partial snapshot behind.
    pub fn write_to_file(&self, outline: &Outline, path: &Path) -> OutlineResult<()> {
        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = std::path::PathBuf::from(tmp);
        {
            let file = std::fs::File::create(&tmp)?;
            let mut writer = std::io::BufWriter::new(file);
            self.write_to(outline, &mut writer)?;
            writer.flush()?;
        }
        std::fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Write an outline to any writer.
    pub fn write_to(&self, outline: &Outline, writer: &mut impl Write) -> OutlineResult<()> {
        let json = serde_json::to_vec(&SnapshotBody::from_outline(outline))?;
        let body = if self.compress {
            compress_body(&json)
        } else {
            json
        };

        let mut header = FileHeader::new(self.compress);
        header.thought_count = thought_count_field(outline.thought_index().len())?;
        header.context_count = outline.context_index().len() as u64;
        header.body_len = body.len() as u64;
        header.write_to(writer)?;
        writer.write_all(&body)?;

        log::debug!(
            "wrote snapshot: {} thoughts, {} contexts, {} body bytes",
            header.thought_count,
            header.context_count,
            header.body_len
        );
        Ok(())
    }
}

/// Thought count as stored in the header.
fn thought_count_field(len: usize) -> OutlineResult<u32> {
    u32::try_from(len).map_err(|_| {
        OutlineError::TooLarge(format!("{} thoughts exceed the header's 32-bit count", len))
    })
}
