//! The fixed 32-byte trailer at the end of every binary plist.
//!
//! Layout (offsets within the trailer):
//!
//! ```text
//! [0..6]   reserved, zero
//! [6]      offset table entry width (1/2/4/8)
//! [7]      object reference width (1/2/4/8)
//! [8..16]  object count, big-endian u64
//! [16..24] root object index, big-endian u64
//! [24..32] byte offset of the offset table, big-endian u64
//! ```

use crate::error::{Error, Result};

/// Magic bytes at the start of the stream.
pub const MAGIC: &[u8; 6] = b"bplist";
/// Format version directly after the magic.
pub const VERSION: &[u8; 2] = b"00";
/// Length of magic plus version.
pub const HEADER_SIZE: usize = 8;
/// Length of the trailer.
pub const SIZE: usize = 32;
/// Smallest well-formed stream: header plus trailer.
pub const MIN_SIZE: usize = HEADER_SIZE + SIZE;

/// Parsed trailer fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trailer {
    /// Width of one offset-table entry in bytes.
    pub offset_size: u8,
    /// Width of one object reference in bytes.
    pub ref_size: u8,
    /// Number of entries in the object table.
    pub num_objects: u64,
    /// Object-table index of the root object.
    pub root_object: u64,
    /// Byte offset where the offset table begins.
    pub offset_table_start: u64,
}

impl Trailer {
    /// Reads the trailer from the final 32 bytes of `data`, validating the
    /// header first.
    ///
    /// Rejects zero object counts and zero widths, those always indicate a
    /// corrupt stream.
    pub fn read(data: &[u8]) -> Result<Trailer> {
        if data.len() < MIN_SIZE {
            return Err(Error::TruncatedBuffer {
                needed: MIN_SIZE,
                available: data.len(),
            });
        }
        if &data[..6] != MAGIC || &data[6..8] != VERSION {
            return Err(Error::MalformedHeader);
        }

        let trailer = &data[data.len() - SIZE..];
        let t = Trailer {
            offset_size: trailer[6],
            ref_size: trailer[7],
            num_objects: read_u64(trailer, 8),
            root_object: read_u64(trailer, 16),
            offset_table_start: read_u64(trailer, 24),
        };

        if t.num_objects == 0 || t.offset_size == 0 || t.ref_size == 0 {
            return Err(Error::MalformedHeader);
        }
        Ok(t)
    }

    /// Appends the 32 trailer bytes to `buf`.
    pub fn write(&self, buf: &mut Vec<u8>) {
        let mut trailer = [0u8; SIZE];
        trailer[6] = self.offset_size;
        trailer[7] = self.ref_size;
        trailer[8..16].copy_from_slice(&self.num_objects.to_be_bytes());
        trailer[16..24].copy_from_slice(&self.root_object.to_be_bytes());
        trailer[24..32].copy_from_slice(&self.offset_table_start.to_be_bytes());
        buf.extend_from_slice(&trailer);
    }
}

fn read_u64(trailer: &[u8], at: usize) -> u64 {
    let mut raw = [0u8; 8];
    raw.copy_from_slice(&trailer[at..at + 8]);
    u64::from_be_bytes(raw)
}
