use super::*;
use crate::encoder::encode;

/// Builds a stream with 1-byte offsets and references, root object 0.
fn plist(objects: &[&[u8]]) -> Vec<u8> {
    plist_with_root(objects, 0)
}

fn plist_with_root(objects: &[&[u8]], root_object: u64) -> Vec<u8> {
    let mut buf = b"bplist00".to_vec();
    let mut offsets = Vec::new();
    for obj in objects {
        offsets.push(buf.len() as u64);
        buf.extend_from_slice(obj);
    }
    let offset_table_start = buf.len() as u64;
    for &offset in &offsets {
        buf.push(offset as u8);
    }
    Trailer {
        offset_size: 1,
        ref_size: 1,
        num_objects: objects.len() as u64,
        root_object,
        offset_table_start,
    }
    .write(&mut buf);
    buf
}

// ========================================================================
// Malformed input degrades to null
// ========================================================================

#[test]
fn empty_buffer_is_null() {
    assert_eq!(decode(&[]), Value::Null);
}

#[test]
fn short_buffer_is_null() {
    assert_eq!(decode(&[0u8; 39]), Value::Null);
    assert_eq!(decode(b"bplist00"), Value::Null);
}

#[test]
fn bad_magic_is_null() {
    let mut bytes = plist(&[&[0x09]]);
    bytes[0] = b'x';
    assert_eq!(decode(&bytes), Value::Null);
}

#[test]
fn garbage_trailer_is_null() {
    let mut bytes = b"bplist00".to_vec();
    bytes.extend_from_slice(&[0xFF; 32]);
    assert_eq!(decode(&bytes), Value::Null);
}

#[test]
fn truncated_string_payload_is_null() {
    // Claims 200 ASCII bytes, carries two.
    assert_eq!(
        decode(&plist(&[&[0x5F, 0x10, 200, b'h', b'i']])),
        Value::Null
    );
}

#[test]
fn offset_beyond_buffer_is_null() {
    let mut bytes = b"bplist00".to_vec();
    bytes.push(0x09);
    bytes.push(0xF0); // offset entry pointing past the end
    Trailer {
        offset_size: 1,
        ref_size: 1,
        num_objects: 1,
        root_object: 0,
        offset_table_start: 9,
    }
    .write(&mut bytes);
    assert_eq!(decode(&bytes), Value::Null);
}

#[test]
fn root_index_out_of_range_is_null() {
    assert_eq!(decode(&plist_with_root(&[&[0x09]], 7)), Value::Null);
}

// ========================================================================
// Singletons and scalars
// ========================================================================

#[test]
fn singletons() {
    assert_eq!(decode(&plist(&[&[0x09]])), Value::Bool(true));
    assert_eq!(decode(&plist(&[&[0x08]])), Value::Bool(false));
    assert_eq!(decode(&plist(&[&[0x00]])), Value::Null);
    // Fill shares the null marker nibble.
    assert_eq!(decode(&plist(&[&[0x0F]])), Value::Null);
}

#[test]
fn integer_widths() {
    assert_eq!(decode(&plist(&[&[0x10, 0x2A]])), Value::Integer(42));
    assert_eq!(decode(&plist(&[&[0x11, 0x01, 0x00]])), Value::Integer(256));
    assert_eq!(
        decode(&plist(&[&[0x12, 0x00, 0x01, 0x00, 0x00]])),
        Value::Integer(0x1_0000)
    );
    assert_eq!(
        decode(&plist(&[&[0x13, 0, 0, 0, 1, 0, 0, 0, 0]])),
        Value::Integer(1 << 32)
    );
}

#[test]
fn real_double() {
    let mut obj = vec![0x23];
    obj.extend_from_slice(&2.75f64.to_be_bytes());
    assert_eq!(decode(&plist(&[&obj])), Value::Real(2.75));
}

/// Four-byte floats widen to double.
#[test]
fn real_single_precision() {
    let mut obj = vec![0x22];
    obj.extend_from_slice(&1.5f32.to_be_bytes());
    assert_eq!(decode(&plist(&[&obj])), Value::Real(1.5));
}

/// Any width other than 4 or 8 yields the default 0.0.
#[test]
fn real_unsupported_width_is_zero() {
    assert_eq!(decode(&plist(&[&[0x21, 0xAB, 0xCD]])), Value::Real(0.0));
}

#[test]
fn date_unix_seconds() {
    let mut obj = vec![0x33];
    obj.extend_from_slice(&86_400f64.to_be_bytes());
    assert_eq!(decode(&plist(&[&obj])), Value::DateTime(86_400));
}

/// A date whose width nibble is not 3 yields null.
#[test]
fn date_wrong_width_is_null() {
    assert_eq!(decode(&plist(&[&[0x32, 0, 0, 0, 0]])), Value::Null);
}

// ========================================================================
// Strings and data
// ========================================================================

#[test]
fn ascii_string() {
    assert_eq!(
        decode(&plist(&[&[0x52, b'h', b'i']])),
        Value::Text("hi".to_string())
    );
}

/// ASCII strings are Latin-1: every byte maps to the same code point.
#[test]
fn ascii_string_latin1() {
    assert_eq!(
        decode(&plist(&[&[0x52, 0xE9, 0x21]])),
        Value::Text("\u{E9}!".to_string())
    );
}

#[test]
fn unicode_string() {
    assert_eq!(
        decode(&plist(&[&[0x62, 0, b'o', 0, b'k']])),
        Value::Text("ok".to_string())
    );
}

#[test]
fn byte_string() {
    assert_eq!(
        decode(&plist(&[&[0x43, 0xDE, 0xAD, 0xBE]])),
        Value::ByteString(vec![0xDE, 0xAD, 0xBE])
    );
}

/// Count nibble 0xF pulls the true count from an embedded integer object.
#[test]
fn extended_count() {
    let mut obj = vec![0x5F, 0x10, 16];
    obj.extend_from_slice(b"0123456789abcdef");
    assert_eq!(
        decode(&plist(&[&obj])),
        Value::Text("0123456789abcdef".to_string())
    );
}

/// An embedded count whose marker is not an integer reads as 0, the
/// historical best-effort answer.
#[test]
fn extended_count_with_bad_marker_is_zero() {
    assert_eq!(
        decode(&plist(&[&[0x4F, 0x00]])),
        Value::ByteString(Vec::new())
    );
}

// ========================================================================
// Containers
// ========================================================================

#[test]
fn array_of_integers() {
    let bytes = plist(&[&[0xA2, 1, 2], &[0x10, 5], &[0x10, 7]]);
    assert_eq!(
        decode(&bytes),
        Value::Array(vec![Value::Integer(5), Value::Integer(7)])
    );
}

/// Sets carry the same wire shape as arrays and decode to arrays.
#[test]
fn set_decodes_like_array() {
    let bytes = plist(&[&[0xC2, 1, 2], &[0x10, 5], &[0x10, 7]]);
    assert_eq!(
        decode(&bytes),
        Value::Array(vec![Value::Integer(5), Value::Integer(7)])
    );
}

/// A bad element reference degrades that element only.
#[test]
fn out_of_range_element_is_null() {
    let bytes = plist(&[&[0xA2, 1, 9], &[0x10, 5]]);
    assert_eq!(
        decode(&bytes),
        Value::Array(vec![Value::Integer(5), Value::Null])
    );
}

#[test]
fn dictionary_parallel_blocks() {
    let bytes = plist(&[
        &[0xD2, 1, 2, 3, 4],
        &[0x51, b'a'],
        &[0x51, b'b'],
        &[0x10, 1],
        &[0x10, 2],
    ]);
    let mut expected = Dictionary::new();
    expected.insert("a".to_string(), Value::Integer(1));
    expected.insert("b".to_string(), Value::Integer(2));
    assert_eq!(decode(&bytes), Value::Dictionary(expected));
}

/// A non-text key aborts the dictionary, keeping the entries read so far.
#[test]
fn non_text_key_keeps_partial_dictionary() {
    let bytes = plist(&[
        &[0xD2, 1, 3, 2, 4],
        &[0x51, b'a'],
        &[0x10, 1],
        &[0x10, 9], // integer in key position
        &[0x10, 2],
    ]);
    let mut expected = Dictionary::new();
    expected.insert("a".to_string(), Value::Integer(1));
    assert_eq!(decode(&bytes), Value::Dictionary(expected));
}

/// Two containers referencing the same object decode it independently:
/// value-equal, never aliased.
#[test]
fn shared_reference_decoded_twice() {
    let bytes = plist(&[
        &[0xD2, 1, 2, 3, 3],
        &[0x51, b'a'],
        &[0x51, b'b'],
        &[0x10, 7],
    ]);
    let mut expected = Dictionary::new();
    expected.insert("a".to_string(), Value::Integer(7));
    expected.insert("b".to_string(), Value::Integer(7));
    assert_eq!(decode(&bytes), Value::Dictionary(expected));
}

/// A self-referencing array must terminate instead of overflowing the
/// stack; the innermost repetition degrades to null.
#[test]
fn cyclic_reference_terminates() {
    let bytes = plist(&[&[0xA1, 0]]);
    let value = decode(&bytes);
    assert!(matches!(value, Value::Array(_)));
}

#[test]
fn uid_degrades_to_null() {
    assert_eq!(decode(&plist(&[&[0x71, 0x00]])), Value::Null);
}

#[test]
fn root_index_selects_object() {
    let bytes = plist_with_root(&[&[0x08], &[0x09]], 1);
    assert_eq!(decode(&bytes), Value::Bool(true));
}

// ========================================================================
// Widths beyond one byte
// ========================================================================

/// Three-byte offset-table entries are accepted on input.
#[test]
fn three_byte_offset_entries() {
    let mut buf = b"bplist00".to_vec();
    buf.push(0x09); // object 0 at offset 8
    let offset_table_start = buf.len() as u64;
    buf.extend_from_slice(&[0x00, 0x00, 0x08]);
    Trailer {
        offset_size: 3,
        ref_size: 1,
        num_objects: 1,
        root_object: 0,
        offset_table_start,
    }
    .write(&mut buf);
    assert_eq!(decode(&buf), Value::Bool(true));
}

/// Two-byte references round-trip through the encoder once the object
/// count crosses 255.
#[test]
fn two_byte_references_round_trip() {
    let list: Vec<Value> = (0..300).map(|i| Value::Text(format!("entry {i}"))).collect();
    let value = Value::Array(list);
    let bytes = encode("entries", &value);
    let decoded = decode(&bytes);
    assert_eq!(decoded.lookup("entries"), Some(&value));
}
