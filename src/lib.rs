//! bplist – Apple binary property list ("bplist00") codec
//!
//! Encodes a tree of typed [`Value`]s into the compact binary property-list
//! wire format and decodes such a byte stream back into a tree. The binary
//! format is used to serve API responses alongside JSON/XML; the decoded tree
//! can additionally be re-rendered as a human-readable XML plist for
//! inspection ([`to_xml`]).
//!
//! # Beispiel
//!
//! ```
//! use bplist::{decode, encode, Dictionary, Value};
//!
//! // Encode
//! let mut dict = Dictionary::new();
//! dict.insert("name".to_string(), Value::Text("ok".to_string()));
//! let bytes = encode("root", &Value::Dictionary(dict));
//! assert!(bytes.starts_with(b"bplist00"));
//!
//! // Decode
//! let value = decode(&bytes);
//! let root = value.lookup("root").unwrap();
//! assert_eq!(root.lookup("name"), Some(&Value::Text("ok".to_string())));
//! ```

pub mod decoder;
pub mod encoder;
pub mod error;
pub mod media_type;
pub mod registry;
pub mod tag;
pub mod trailer;
pub mod value;
pub mod width;
pub mod xml;

pub use error::{Error, Result};

/// HashMap mit ahash (schneller, nicht DoS-resistent), für interne
/// Datenstrukturen wie den String-Intern-Cache des Encoders.
pub(crate) type FastHashMap<K, V> = hashbrown::HashMap<K, V, ahash::RandomState>;

/// HashSet mit ahash.
pub(crate) type FastHashSet<K> = hashbrown::HashSet<K, ahash::RandomState>;

// Public API: Value Model
pub use value::{Dictionary, Value};

// Public API: Encoder/Decoder
pub use decoder::decode;
pub use encoder::encode;

// Public API: XML export
pub use xml::{to_xml, to_xml_writer};

// Public API: Serialiser registry
pub use registry::{
    BinaryPlistSerialiser, Serialiser, SerialiserRegistry, XmlPlistSerialiser,
};
