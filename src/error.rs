//! Central error types for the binary plist codec.
//!
//! The decoder is deliberately best-effort: historically it never surfaced an
//! error to callers, it degraded to a null value at the affected node. These
//! types exist for the internal read paths and the XML writer; the public
//! [`decode`](crate::decode) entry point still collapses every failure to
//! [`Value::Null`](crate::Value::Null), because the rest of the system
//! depends on the decoder never throwing.

use core::fmt;

/// Failure modes of the binary plist read paths.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The buffer does not start with the `bplist00` magic/version bytes.
    MalformedHeader,
    /// The buffer ended before a complete structure could be read.
    TruncatedBuffer {
        /// Bytes the read required.
        needed: usize,
        /// Bytes actually available from the read position.
        available: usize,
    },
    /// An object marker nibble that this codec does not understand.
    UnknownTag(u8),
    /// An object reference outside the object table.
    OutOfRangeReference { index: u64, count: u64 },
    /// An integer/offset/reference width other than the supported 1/2/3/4/8.
    UnsupportedWidth(u8),
    /// A dictionary key object did not decode to a text value.
    InvalidDictionaryKey,
    /// Container nesting exceeded the recursion limit (cyclic references).
    RecursionLimitExceeded,
    /// Writing the XML export failed.
    IoError(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedHeader => write!(f, "unrecognised start sequence, not a bplist00 stream"),
            Self::TruncatedBuffer { needed, available } => {
                write!(f, "truncated buffer: needed {needed} bytes, {available} available")
            }
            Self::UnknownTag(tag) => write!(f, "unknown object tag 0x{tag:02X}"),
            Self::OutOfRangeReference { index, count } => {
                write!(f, "object reference {index} outside object table (count {count})")
            }
            Self::UnsupportedWidth(size) => {
                write!(f, "unsupported integer width {size}, expected 1/2/3/4/8")
            }
            Self::InvalidDictionaryKey => write!(f, "dictionary key is not a text value"),
            Self::RecursionLimitExceeded => write!(f, "container nesting exceeds recursion limit"),
            Self::IoError(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

/// A convenience `Result` type alias using [`Error`].
pub type Result<T> = core::result::Result<T, Error>;
