//! Width selection and big-endian integer packing.
//!
//! Object references and offset-table entries are fixed-width big-endian
//! integers. The width is uniform per stream: the smallest of 1/2/4/8 bytes
//! that fits the object count (references) respectively the total buffer
//! length (offsets). On the read side a 3-byte width is additionally
//! accepted, some writers emit it for offsets.

use crate::error::{Error, Result};

/// Smallest width in {1, 2, 4, 8} such that `n` fits.
///
/// Inclusive thresholds: 255 distinct objects still fit one byte, 256 need
/// two.
pub fn for_count(n: u64) -> u8 {
    if n <= 0xFF {
        1
    } else if n <= 0xFFFF {
        2
    } else if n <= 0xFFFF_FFFF {
        4
    } else {
        8
    }
}

/// Appends `value` to `buf` as a big-endian integer of `size` bytes.
///
/// # Panics
///
/// Panics if `size` is not 1, 2, 4 or 8.
pub fn write_be(buf: &mut Vec<u8>, value: u64, size: u8) {
    match size {
        1 => buf.push(value as u8),
        2 => buf.extend_from_slice(&(value as u16).to_be_bytes()),
        4 => buf.extend_from_slice(&(value as u32).to_be_bytes()),
        8 => buf.extend_from_slice(&value.to_be_bytes()),
        _ => panic!("write width must be 1/2/4/8, got {size}"),
    }
}

/// Writes `value` big-endian into `buf[at..at + size]`.
///
/// Used to back-patch container reference blocks that were reserved before
/// the child objects were written.
///
/// # Panics
///
/// Panics if `size` is not 1, 2, 4 or 8, or the range is out of bounds.
pub fn patch_be(buf: &mut [u8], at: usize, value: u64, size: u8) {
    match size {
        1 => buf[at] = value as u8,
        2 => buf[at..at + 2].copy_from_slice(&(value as u16).to_be_bytes()),
        4 => buf[at..at + 4].copy_from_slice(&(value as u32).to_be_bytes()),
        8 => buf[at..at + 8].copy_from_slice(&value.to_be_bytes()),
        _ => panic!("write width must be 1/2/4/8, got {size}"),
    }
}

/// Reads a big-endian integer of `size` bytes from the start of `bytes`.
pub fn read_be(bytes: &[u8], size: u8) -> Result<u64> {
    let size_usize = usize::from(size);
    if bytes.len() < size_usize {
        return Err(Error::TruncatedBuffer {
            needed: size_usize,
            available: bytes.len(),
        });
    }
    let value = match size {
        1 => u64::from(bytes[0]),
        2 => u64::from(u16::from_be_bytes([bytes[0], bytes[1]])),
        3 => (u64::from(bytes[0]) << 16) | (u64::from(bytes[1]) << 8) | u64::from(bytes[2]),
        4 => u64::from(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])),
        8 => u64::from_be_bytes([
            bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
        ]),
        _ => return Err(Error::UnsupportedWidth(size)),
    };
    Ok(value)
}
