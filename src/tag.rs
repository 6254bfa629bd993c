//! Object markers of the binary plist wire format.
//!
//! Every object starts with one tag byte: the upper nibble selects the type,
//! the lower nibble carries an inline count of 0–14 (0xF means the true count
//! follows as an embedded unsigned-integer object). The singletons
//! null/false/true/fill occupy the whole byte.

/// Null singleton (whole tag byte).
pub const NULL: u8 = 0x00;
/// Boolean false singleton (whole tag byte).
pub const FALSE: u8 = 0x08;
/// Boolean true singleton (whole tag byte).
pub const TRUE: u8 = 0x09;
/// Fill byte (whole tag byte). Never emitted, skipped on input.
pub const FILL: u8 = 0x0F;
/// Unsigned integer; lower nibble is log2 of the byte width.
pub const UINT: u8 = 0x10;
/// IEEE-754 real; lower nibble is log2 of the byte width.
pub const REAL: u8 = 0x20;
/// Date as an 8-byte real; lower nibble is always 3 (2^3 bytes).
pub const DATE: u8 = 0x30;
/// Raw byte string.
pub const DATA: u8 = 0x40;
/// ASCII (Latin-1) string. Decoded only, the encoder always emits UNICODE.
pub const ASCII: u8 = 0x50;
/// UTF-16BE string; count is in 16-bit units.
pub const UNICODE: u8 = 0x60;
/// UID object. Not supported, decodes to null.
pub const UID: u8 = 0x70;
/// Array of object references.
pub const ARRAY: u8 = 0xA0;
/// Set of object references. Decoded like an array.
pub const SET: u8 = 0xC0;
/// Dictionary: count key references then count value references.
pub const DICT: u8 = 0xD0;

/// Largest count that fits the inline nibble. 0xF is the escape value.
pub const MAX_INLINE_COUNT: u64 = 0x0E;

/// The type nibble of a tag byte.
#[inline]
pub fn marker(tag: u8) -> u8 {
    tag & 0xF0
}

/// The count nibble of a tag byte.
#[inline]
pub fn count_nibble(tag: u8) -> u8 {
    tag & 0x0F
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_und_count_nibble() {
        assert_eq!(marker(0xD1), DICT);
        assert_eq!(count_nibble(0xD1), 1);
        assert_eq!(marker(0x6F), UNICODE);
        assert_eq!(count_nibble(0x6F), 0x0F);
    }

    #[test]
    fn singletons_use_the_whole_byte() {
        assert_eq!(marker(FALSE), NULL);
        assert_eq!(marker(TRUE), NULL);
        assert_eq!(count_nibble(FALSE), 0x08);
        assert_eq!(count_nibble(TRUE), 0x09);
    }

    #[test]
    fn inline_count_boundary() {
        assert_eq!(MAX_INLINE_COUNT, 14);
        assert_eq!(UNICODE | (MAX_INLINE_COUNT as u8), 0x6E);
    }
}
