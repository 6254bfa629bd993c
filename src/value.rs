//! The Value Model: a tagged-variant tree shared by encoder and decoder.
//!
//! Dictionaries use [`IndexMap`] so iteration order is deterministic
//! (insertion order), while `PartialEq` still compares by key/value pairs
//! regardless of order. That is exactly the structural equality the
//! round-trip contract promises: `decode(encode("root", x))` equals `x` by
//! value, never by reference identity.

use indexmap::IndexMap;

/// An ordered mapping from text keys to values. Keys are unique.
pub type Dictionary = IndexMap<String, Value>;

/// A node in the property-list tree.
///
/// Arrays are contractually homogeneous: every element the same variant. The
/// encoder does not fail on a heterogeneous array, it substitutes a
/// diagnostic text value (see [`encoder`](crate::encoder)).
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// The absent/default value. Also what the decoder degrades to on
    /// malformed input.
    #[default]
    Null,
    Bool(bool),
    /// Unsigned 64-bit integer (`0x1_` objects on the wire).
    Integer(u64),
    /// IEEE-754 double (`0x23` on the wire, always 8 bytes).
    Real(f64),
    /// Seconds since the Unix epoch (`0x33` on the wire).
    ///
    /// The real Apple format counts seconds since 2001-01-01; this codec is
    /// internally self-consistent but not interoperable with third-party
    /// bplist readers on dates.
    DateTime(i64),
    ByteString(Vec<u8>),
    Text(String),
    Array(Vec<Value>),
    Dictionary(Dictionary),
}

impl Value {
    /// Looks up `key` in a dictionary value.
    ///
    /// Returns `None` when `self` is not a dictionary or the key is absent,
    /// mirroring the historical `GetValue` behaviour of returning the null
    /// value in both cases.
    pub fn lookup(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Dictionary(map) => map.get(key),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<u64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_real(&self) -> Option<f64> {
        match self {
            Value::Real(r) => Some(*r),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::ByteString(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_dictionary(&self) -> Option<&Dictionary> {
        match self {
            Value::Dictionary(map) => Some(map),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::ByteString(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Array(v)
    }
}

impl From<Dictionary> for Value {
    fn from(v: Dictionary) -> Self {
        Value::Dictionary(v)
    }
}
