//! Binary plist encoder.
//!
//! Flattens a [`Value`] tree into the `bplist00` wire format: a linear object
//! table (every object tagged, children referenced by fixed-width table
//! index), an offset table giving each object's byte position, and a 32-byte
//! trailer. The named root property is wrapped into a synthetic one-entry
//! dictionary, so every stream has exactly one top-level dictionary at
//! object index 0.
//!
//! Encoding is infallible for well-formed trees. The single special case is
//! an array whose elements are not all the same variant: it is silently
//! replaced by a diagnostic text value instead of being reported, callers
//! have no error path here.
//!
//! # Beispiel
//!
//! ```
//! use bplist::{encode, Value};
//!
//! let bytes = encode("version", &Value::Integer(2));
//! assert!(bytes.starts_with(b"bplist00"));
//! assert_eq!(&bytes[bytes.len() - 32..][16..24], &0u64.to_be_bytes());
//! ```

use std::mem::discriminant;

use log::debug;

use crate::trailer::Trailer;
use crate::value::Value;
use crate::{tag, width, FastHashMap, FastHashSet};

/// Substituted for an array whose elements are not all one variant type.
///
/// The wording is a historical artefact of the original Qt implementation
/// and is part of the observable contract.
pub const HETEROGENEOUS_ARRAY_ERROR: &str =
    "Error: QVariantList must contain only one variant type";

/// Encodes `value` as a binary plist with a single top-level property
/// called `name`.
pub fn encode(name: &str, value: &Value) -> Vec<u8> {
    let mut seen = FastHashSet::default();
    // Census: the synthetic top dictionary, its key string and everything
    // below. Interned strings count once, matching what gets written.
    let count = 1 + count_string(name, &mut seen) + count_objects(value, &mut seen);
    let ref_size = width::for_count(count);
    debug!("object census {count}, reference width {ref_size}");

    let mut encoder = Encoder {
        buf: b"bplist00".to_vec(),
        offsets: Vec::new(),
        strings: FastHashMap::default(),
        ref_size,
    };

    encoder.begin_object();
    encoder.buf.push(tag::DICT | 1);
    let refs_at = encoder.reserve_refs(2);
    let key = encoder.write_string(name);
    let val = encoder.write_value(value);
    encoder.patch_ref(refs_at, key);
    encoder.patch_ref(refs_at + usize::from(ref_size), val);

    debug_assert_eq!(count, encoder.offsets.len() as u64);
    encoder.finish()
}

struct Encoder<'a> {
    buf: Vec<u8>,
    /// Byte offset of each object's tag byte, in table order.
    offsets: Vec<u64>,
    /// Intern cache: string value to object-table index.
    strings: FastHashMap<&'a str, u64>,
    ref_size: u8,
}

impl<'a> Encoder<'a> {
    /// Records the offset of the object about to be written and returns its
    /// table index.
    fn begin_object(&mut self) -> u64 {
        let index = self.offsets.len() as u64;
        self.offsets.push(self.buf.len() as u64);
        index
    }

    /// Reserves a zeroed block of `n` references and returns its byte
    /// position, to be back-patched once the children have indices.
    fn reserve_refs(&mut self, n: usize) -> usize {
        let at = self.buf.len();
        self.buf.resize(at + n * usize::from(self.ref_size), 0);
        at
    }

    fn patch_ref(&mut self, at: usize, index: u64) {
        width::patch_be(&mut self.buf, at, index, self.ref_size);
    }

    /// Tag byte with inline count, or the 0xF escape plus an embedded
    /// unsigned integer for counts of 15 and up.
    fn write_header(&mut self, marker: u8, count: u64) {
        if count <= tag::MAX_INLINE_COUNT {
            self.buf.push(marker | count as u8);
        } else {
            self.buf.push(marker | 0x0F);
            self.write_uint_payload(count);
        }
    }

    /// `0x1_` tag plus big-endian payload at the smallest width that fits.
    ///
    /// Written inline: used both for integer objects (after `begin_object`)
    /// and for embedded counts (not separately referenceable).
    fn write_uint_payload(&mut self, value: u64) {
        let exp: u8 = if value <= 0xFF {
            0
        } else if value <= 0xFFFF {
            1
        } else if value <= 0xFFFF_FFFF {
            2
        } else {
            3
        };
        self.buf.push(tag::UINT | exp);
        width::write_be(&mut self.buf, value, 1 << exp);
    }

    /// Writes one value and returns its object-table index.
    fn write_value(&mut self, value: &'a Value) -> u64 {
        match value {
            Value::Null => {
                let index = self.begin_object();
                self.buf.push(tag::NULL);
                index
            }
            Value::Bool(b) => {
                let index = self.begin_object();
                self.buf.push(if *b { tag::TRUE } else { tag::FALSE });
                index
            }
            Value::Integer(n) => {
                let index = self.begin_object();
                self.write_uint_payload(*n);
                index
            }
            Value::Real(r) => {
                let index = self.begin_object();
                // Always 8-byte IEEE-754 big-endian, whatever the source
                // numeric subtype was.
                self.buf.push(tag::REAL | 3);
                self.buf.extend_from_slice(&r.to_be_bytes());
                index
            }
            Value::DateTime(seconds) => {
                let index = self.begin_object();
                self.buf.push(tag::DATE | 3);
                self.buf.extend_from_slice(&(*seconds as f64).to_be_bytes());
                index
            }
            Value::ByteString(bytes) => {
                let index = self.begin_object();
                self.write_header(tag::DATA, bytes.len() as u64);
                self.buf.extend_from_slice(bytes);
                index
            }
            Value::Text(s) => self.write_string(s),
            Value::Array(list) => {
                if is_heterogeneous(list) {
                    self.write_string(HETEROGENEOUS_ARRAY_ERROR)
                } else {
                    self.write_array(list)
                }
            }
            Value::Dictionary(map) => self.write_dict(map),
        }
    }

    /// Interned: a repeated string reuses the prior object's index instead
    /// of being re-encoded.
    fn write_string(&mut self, s: &'a str) -> u64 {
        if let Some(&index) = self.strings.get(s) {
            return index;
        }
        let index = self.begin_object();
        self.strings.insert(s, index);

        // Content is re-encoded as UTF-16BE; the count is in 16-bit units.
        let units = s.encode_utf16().count() as u64;
        self.write_header(tag::UNICODE, units);
        for unit in s.encode_utf16() {
            self.buf.extend_from_slice(&unit.to_be_bytes());
        }
        index
    }

    fn write_array(&mut self, list: &'a [Value]) -> u64 {
        let index = self.begin_object();
        self.write_header(tag::ARRAY, list.len() as u64);
        let refs_at = self.reserve_refs(list.len());
        for (i, child) in list.iter().enumerate() {
            let child_index = self.write_value(child);
            self.patch_ref(refs_at + i * usize::from(self.ref_size), child_index);
        }
        index
    }

    /// Two parallel reference blocks: all keys, then all values.
    fn write_dict(&mut self, map: &'a crate::value::Dictionary) -> u64 {
        let index = self.begin_object();
        self.write_header(tag::DICT, map.len() as u64);
        let refs_at = self.reserve_refs(2 * map.len());
        let rs = usize::from(self.ref_size);
        for (i, key) in map.keys().enumerate() {
            let key_index = self.write_string(key);
            self.patch_ref(refs_at + i * rs, key_index);
        }
        for (i, value) in map.values().enumerate() {
            let value_index = self.write_value(value);
            self.patch_ref(refs_at + (map.len() + i) * rs, value_index);
        }
        index
    }

    /// Appends the offset table (exactly one entry per object) and the
    /// trailer.
    fn finish(mut self) -> Vec<u8> {
        let offset_table_start = self.buf.len() as u64;
        let offset_size = width::for_count(offset_table_start);
        for &offset in &self.offsets {
            width::write_be(&mut self.buf, offset, offset_size);
        }

        debug!("actual object count {}", self.offsets.len());
        Trailer {
            offset_size,
            ref_size: self.ref_size,
            num_objects: self.offsets.len() as u64,
            root_object: 0,
            offset_table_start,
        }
        .write(&mut self.buf);
        self.buf
    }
}

/// True when the array's elements are not all the same variant.
fn is_heterogeneous(list: &[Value]) -> bool {
    let mut iter = list.iter();
    match iter.next() {
        Some(first) => {
            let kind = discriminant(first);
            iter.any(|v| discriminant(v) != kind)
        }
        None => false,
    }
}

/// Distinct-object census for one string, honouring interning.
fn count_string<'a>(s: &'a str, seen: &mut FastHashSet<&'a str>) -> u64 {
    u64::from(seen.insert(s))
}

/// Counts the objects `value` will put into the table.
fn count_objects<'a>(value: &'a Value, seen: &mut FastHashSet<&'a str>) -> u64 {
    match value {
        Value::Text(s) => count_string(s, seen),
        Value::Array(list) => {
            if is_heterogeneous(list) {
                count_string(HETEROGENEOUS_ARRAY_ERROR, seen)
            } else {
                1 + list.iter().map(|v| count_objects(v, seen)).sum::<u64>()
            }
        }
        Value::Dictionary(map) => {
            1 + map
                .iter()
                .map(|(k, v)| count_string(k, seen) + count_objects(v, seen))
                .sum::<u64>()
        }
        _ => 1,
    }
}
