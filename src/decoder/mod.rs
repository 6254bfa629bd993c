//! Binary plist decoder.
//!
//! Reads the trailer and offset table, then resolves object references
//! recursively starting at the declared root, rebuilding a [`Value`] tree.
//!
//! This is a best-effort, non-validating parser. Historically it never
//! surfaced an error: a short buffer, a bad magic, an out-of-range reference
//! or an unknown tag all degrade to [`Value::Null`] at the affected node,
//! and callers cannot distinguish "absent" from "malformed" without external
//! context. The typed failure reasons exist in [`crate::error`] and are
//! logged, but [`decode`] itself never panics and never errors.
//!
//! Shared references are resolved independently per occurrence: two
//! containers pointing at the same object index yield two value-equal but
//! non-aliased results. There is no reference cache across one decode.
//!
//! # Beispiel
//!
//! ```
//! use bplist::{decode, encode, Value};
//!
//! let bytes = encode("answer", &Value::Integer(42));
//! let value = decode(&bytes);
//! assert_eq!(value.lookup("answer"), Some(&Value::Integer(42)));
//!
//! // Malformed input degrades to null instead of raising.
//! assert_eq!(decode(b"not a plist"), Value::Null);
//! ```

use log::{debug, warn};

use crate::error::{Error, Result};
use crate::trailer::Trailer;
use crate::value::{Dictionary, Value};
use crate::{tag, width};

/// Guard against reference cycles in corrupt streams. The encoder cannot
/// produce cycles, so well-formed input never gets near this.
const MAX_DEPTH: usize = 512;

/// Decodes a binary plist buffer, degrading silently on malformed input.
pub fn decode(data: &[u8]) -> Value {
    let decoder = match Decoder::new(data) {
        Ok(decoder) => decoder,
        Err(e) => {
            debug!("not a decodable binary plist ({} bytes): {e}", data.len());
            return Value::Null;
        }
    };
    debug!(
        "parsing binary plist ({} bytes, {} objects, offset width {}, reference width {})",
        data.len(),
        decoder.trailer.num_objects,
        decoder.trailer.offset_size,
        decoder.trailer.ref_size
    );
    decoder.decode_node(decoder.trailer.root_object, 0)
}

struct Decoder<'a> {
    data: &'a [u8],
    trailer: Trailer,
}

impl<'a> Decoder<'a> {
    fn new(data: &'a [u8]) -> Result<Self> {
        let trailer = Trailer::read(data)?;
        Ok(Decoder { data, trailer })
    }

    /// Decodes the object at `index`, collapsing any failure to null.
    fn decode_node(&self, index: u64, depth: usize) -> Value {
        match self.try_decode_node(index, depth) {
            Ok(value) => value,
            Err(e) => {
                debug!("degrading object {index} to null: {e}");
                Value::Null
            }
        }
    }

    fn try_decode_node(&self, index: u64, depth: usize) -> Result<Value> {
        if depth > MAX_DEPTH {
            return Err(Error::RecursionLimitExceeded);
        }
        let position = self.resolve_object(index)?;
        let mut cur = Cursor { data: self.data, pos: position };
        let tag_byte = cur.peek_u8()?;

        match tag::marker(tag_byte) {
            // Sets carry the same payload shape as arrays.
            tag::ARRAY | tag::SET => self.read_array(&mut cur, depth),
            tag::DICT => self.read_dict(&mut cur, depth),
            tag::ASCII => self.read_ascii(&mut cur),
            tag::UNICODE => self.read_unicode(&mut cur),
            tag::UINT => Ok(Value::Integer(self.read_uint(&mut cur)?)),
            tag::REAL => self.read_real(&mut cur),
            tag::DATE => self.read_date(&mut cur),
            tag::DATA => self.read_data(&mut cur),
            tag::NULL => Ok(match tag_byte {
                tag::TRUE => Value::Bool(true),
                tag::FALSE => Value::Bool(false),
                _ => Value::Null,
            }),
            // UID and anything else this codec does not model.
            other => Err(Error::UnknownTag(other)),
        }
    }

    /// Bounds-checks `index` and follows the offset-table entry to the byte
    /// position of the object's tag byte.
    fn resolve_object(&self, index: u64) -> Result<usize> {
        let t = &self.trailer;
        if index >= t.num_objects {
            return Err(Error::OutOfRangeReference { index, count: t.num_objects });
        }
        let entry = t
            .offset_table_start
            .checked_add(index.saturating_mul(u64::from(t.offset_size)))
            .ok_or(Error::OutOfRangeReference { index, count: t.num_objects })?;
        let entry = self.position(entry)?;
        let offset = width::read_be(&self.data[entry..], t.offset_size)?;
        self.position(offset)
    }

    /// Converts a declared byte offset into a checked buffer position.
    fn position(&self, offset: u64) -> Result<usize> {
        if offset >= self.data.len() as u64 {
            return Err(Error::TruncatedBuffer {
                needed: usize::try_from(offset).unwrap_or(usize::MAX),
                available: self.data.len(),
            });
        }
        Ok(offset as usize)
    }

    /// Count from the tag byte's lower nibble, or from the embedded
    /// unsigned-integer object when the nibble is 0xF. Shared by the text,
    /// data, array and dictionary readers; the cursor ends up past the count.
    fn read_count(&self, cur: &mut Cursor<'a>) -> Result<u64> {
        let nibble = tag::count_nibble(cur.read_u8()?);
        if nibble == 0x0F {
            self.read_uint(cur)
        } else {
            Ok(u64::from(nibble))
        }
    }

    /// Reads a `0x1_` unsigned-integer object at the cursor. A non-integer
    /// marker yields 0, the historical "best effort" answer.
    fn read_uint(&self, cur: &mut Cursor<'a>) -> Result<u64> {
        let tag_byte = cur.read_u8()?;
        if tag::marker(tag_byte) != tag::UINT {
            debug!("expected integer object, found tag 0x{tag_byte:02X}");
            return Ok(0);
        }
        let exp = tag::count_nibble(tag_byte);
        if exp > 3 {
            let size = 1u8.checked_shl(u32::from(exp)).unwrap_or(u8::MAX);
            return Err(Error::UnsupportedWidth(size));
        }
        cur.read_be(1 << exp)
    }

    fn read_array(&self, cur: &mut Cursor<'a>, depth: usize) -> Result<Value> {
        let count = self.read_count(cur)?;
        let mut list = Vec::new();
        for _ in 0..count {
            let reference = cur.read_be(self.trailer.ref_size)?;
            // Failures inside a child stay local to that element.
            list.push(self.decode_node(reference, depth + 1));
        }
        Ok(Value::Array(list))
    }

    /// `count` key references followed by `count` value references. A key
    /// that is not a text value aborts the dictionary and returns what was
    /// collected so far.
    fn read_dict(&self, cur: &mut Cursor<'a>, depth: usize) -> Result<Value> {
        let count = self.read_count(cur)?;
        let mut key_refs = Vec::new();
        for _ in 0..count {
            key_refs.push(cur.read_be(self.trailer.ref_size)?);
        }
        let mut map = Dictionary::new();
        for key_ref in key_refs {
            let value_ref = cur.read_be(self.trailer.ref_size)?;
            let key = self.decode_node(key_ref, depth + 1);
            let Value::Text(key) = key else {
                warn!("{} (object {key_ref})", Error::InvalidDictionaryKey);
                return Ok(Value::Dictionary(map));
            };
            map.insert(key, self.decode_node(value_ref, depth + 1));
        }
        Ok(Value::Dictionary(map))
    }

    /// `0x5_`: one byte per character, Latin-1.
    fn read_ascii(&self, cur: &mut Cursor<'a>) -> Result<Value> {
        let count = self.read_count(cur)?;
        let bytes = cur.read_slice(usize::try_from(count).unwrap_or(usize::MAX))?;
        Ok(Value::Text(bytes.iter().map(|&b| char::from(b)).collect()))
    }

    /// `0x6_`: UTF-16BE, count in 16-bit units. Unpaired surrogates are
    /// replaced rather than rejected.
    fn read_unicode(&self, cur: &mut Cursor<'a>) -> Result<Value> {
        let count = usize::try_from(self.read_count(cur)?).unwrap_or(usize::MAX);
        let bytes = cur.read_slice(count.saturating_mul(2))?;
        let units: Vec<u16> = bytes
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        Ok(Value::Text(String::from_utf16_lossy(&units)))
    }

    /// `0x2_`: nibble is log2 of the width. Only 4-byte floats and 8-byte
    /// doubles are supported, everything else decodes as 0.0.
    fn read_real(&self, cur: &mut Cursor<'a>) -> Result<Value> {
        let exp = self.read_count(cur)?;
        let size = 1u64 << exp.min(63);
        let value = match size {
            4 => {
                let bytes = cur.read_slice(4)?;
                f64::from(f32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
            }
            8 => {
                let mut raw = [0u8; 8];
                raw.copy_from_slice(cur.read_slice(8)?);
                f64::from_be_bytes(raw)
            }
            _ => {
                debug!("unsupported real width {size}, defaulting to 0.0");
                0.0
            }
        };
        Ok(Value::Real(value))
    }

    /// `0x33`: an 8-byte double holding Unix-epoch seconds. Any width other
    /// than 8 yields null.
    fn read_date(&self, cur: &mut Cursor<'a>) -> Result<Value> {
        let exp = self.read_count(cur)?;
        if exp != 3 {
            debug!("unsupported date width nibble {exp}, defaulting to null");
            return Ok(Value::Null);
        }
        let mut raw = [0u8; 8];
        raw.copy_from_slice(cur.read_slice(8)?);
        let seconds = f64::from_be_bytes(raw);
        Ok(Value::DateTime(seconds as i64))
    }

    /// `0x4_`: raw bytes, copied out of the buffer.
    fn read_data(&self, cur: &mut Cursor<'a>) -> Result<Value> {
        let count = self.read_count(cur)?;
        let bytes = cur.read_slice(usize::try_from(count).unwrap_or(usize::MAX))?;
        Ok(Value::ByteString(bytes.to_vec()))
    }
}

/// Byte cursor over the object stream.
struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn peek_u8(&self) -> Result<u8> {
        self.data.get(self.pos).copied().ok_or(Error::TruncatedBuffer {
            needed: self.pos + 1,
            available: self.data.len(),
        })
    }

    fn read_u8(&mut self) -> Result<u8> {
        let byte = self.peek_u8()?;
        self.pos += 1;
        Ok(byte)
    }

    fn read_be(&mut self, size: u8) -> Result<u64> {
        let value = width::read_be(&self.data[self.pos..], size)?;
        self.pos += usize::from(size);
        Ok(value)
    }

    fn read_slice(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self.pos.checked_add(len).ok_or(Error::TruncatedBuffer {
            needed: usize::MAX,
            available: self.data.len(),
        })?;
        let slice = self.data.get(self.pos..end).ok_or(Error::TruncatedBuffer {
            needed: end,
            available: self.data.len(),
        })?;
        self.pos = end;
        Ok(slice)
    }
}

#[cfg(test)]
mod tests;
