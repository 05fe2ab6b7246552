//! File header for outline snapshot files.

use std::io::{Read, Write};

use crate::types::error::{OutlineError, OutlineResult};
use crate::types::{FORMAT_VERSION, OUTLINE_MAGIC};

/// Flag bit: the body is LZ4-compressed.
pub const FLAG_COMPRESSED: u32 = 0x1;

/// Header of a snapshot file. Fixed size: 32 bytes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FileHeader {
    /// Magic bytes: "OTLN".
    pub magic: [u8; 4],
    /// Format version (currently 1).
    pub version: u32,
    /// Body flags.
    pub flags: u32,
    /// Number of thoughts in the body.
    pub thought_count: u32,
    /// Number of context entries in the body.
    pub context_count: u64,
    /// Length of the body in bytes, as stored.
    pub body_len: u64,
}

/// The fixed size of a FileHeader on disk: 32 bytes.
pub const HEADER_SIZE: u64 = 32;

impl FileHeader {
    /// Create a header with default magic and version.
    pub fn new(compressed: bool) -> Self {
        Self {
            magic: OUTLINE_MAGIC,
            version: FORMAT_VERSION,
            flags: if compressed { FLAG_COMPRESSED } else { 0 },
            thought_count: 0,
            context_count: 0,
            body_len: 0,
        }
    }

    pub fn is_compressed(&self) -> bool {
        self.flags & FLAG_COMPRESSED != 0
    }

    /// Write this header. Writes exactly 32 bytes.
    ///
    /// Layout (all little-endian):
    /// - 0x00..0x04: magic
    /// - 0x04..0x08: version (u32)
    /// - 0x08..0x0C: flags (u32)
    /// - 0x0C..0x10: thought_count (u32)
    /// - 0x10..0x18: context_count (u64)
    /// - 0x18..0x20: body_len (u64)
    pub fn write_to(&self, writer: &mut impl Write) -> OutlineResult<()> {
        writer.write_all(&self.magic)?;
        writer.write_all(&self.version.to_le_bytes())?;
        writer.write_all(&self.flags.to_le_bytes())?;
        writer.write_all(&self.thought_count.to_le_bytes())?;
        writer.write_all(&self.context_count.to_le_bytes())?;
        writer.write_all(&self.body_len.to_le_bytes())?;
        Ok(())
    }

    /// Read a header. Reads exactly 32 bytes.
    pub fn read_from(reader: &mut impl Read) -> OutlineResult<Self> {
        let mut buf = [0u8; HEADER_SIZE as usize];
        reader.read_exact(&mut buf).map_err(|e| {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                OutlineError::Truncated
            } else {
                OutlineError::Io(e)
            }
        })?;

        let magic = [buf[0], buf[1], buf[2], buf[3]];
        if magic != OUTLINE_MAGIC {
            return Err(OutlineError::InvalidMagic);
        }

        let version = u32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]);
        if version != FORMAT_VERSION {
            return Err(OutlineError::UnsupportedVersion(version));
        }

        let flags = u32::from_le_bytes([buf[8], buf[9], buf[10], buf[11]]);
        let thought_count = u32::from_le_bytes([buf[12], buf[13], buf[14], buf[15]]);
        let mut wide = [0u8; 8];
        wide.copy_from_slice(&buf[16..24]);
        let context_count = u64::from_le_bytes(wide);
        wide.copy_from_slice(&buf[24..32]);
        let body_len = u64::from_le_bytes(wide);

        Ok(Self {
            magic,
            version,
            flags,
            thought_count,
            context_count,
            body_len,
        })
    }
}
