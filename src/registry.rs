//! Serialiser registry: Media Type → serialiser factory.
//!
//! The HTTP layer negotiates a response format from the Accept header and
//! asks this registry for a matching serialiser. Registration is explicit, a
//! `SerialiserRegistry` is built at process start (normally via
//! [`SerialiserRegistry::with_default_serialisers`]) and handed to whoever
//! needs it. There is no global constructor magic and no process-wide
//! mutable state.

use crate::value::{Dictionary, Value};
use crate::{encoder, media_type, xml, FastHashMap};

/// Serialises one named top-level property into a response body.
pub trait Serialiser {
    /// The Content-Type of the produced body.
    fn content_type(&self) -> &'static str;

    /// Serialises the property. Infallible by contract: formats with
    /// internal failure modes degrade to an empty body.
    fn serialise(&self, name: &str, value: &Value) -> Vec<u8>;
}

/// The binary plist wire codec as a response serialiser.
#[derive(Debug, Default, Clone, Copy)]
pub struct BinaryPlistSerialiser;

impl Serialiser for BinaryPlistSerialiser {
    fn content_type(&self) -> &'static str {
        media_type::MEDIA_TYPE_APPLE_BINARY_PLIST
    }

    fn serialise(&self, name: &str, value: &Value) -> Vec<u8> {
        encoder::encode(name, value)
    }
}

/// The human-readable XML plist as a response serialiser.
#[derive(Debug, Default, Clone, Copy)]
pub struct XmlPlistSerialiser;

impl Serialiser for XmlPlistSerialiser {
    fn content_type(&self) -> &'static str {
        media_type::MEDIA_TYPE_XML_PLIST
    }

    fn serialise(&self, name: &str, value: &Value) -> Vec<u8> {
        // Same shape as the binary codec: one named top-level property.
        let mut top = Dictionary::new();
        top.insert(name.to_string(), value.clone());
        match xml::to_xml(&Value::Dictionary(top)) {
            Ok(body) => body.into_bytes(),
            Err(e) => {
                log::warn!("XML plist serialisation failed: {e}");
                Vec::new()
            }
        }
    }
}

type SerialiserFactory = fn() -> Box<dyn Serialiser>;

/// Explicit mapping from Media Type to serialiser constructor.
#[derive(Default)]
pub struct SerialiserRegistry {
    factories: FastHashMap<String, SerialiserFactory>,
}

impl SerialiserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the plist serialisers under their usual Media Types.
    pub fn with_default_serialisers() -> Self {
        let mut registry = Self::new();
        registry.register(media_type::MEDIA_TYPE_BINARY_PLIST, || {
            Box::new(BinaryPlistSerialiser)
        });
        registry.register(media_type::MEDIA_TYPE_APPLE_BINARY_PLIST, || {
            Box::new(BinaryPlistSerialiser)
        });
        registry.register(media_type::MEDIA_TYPE_XML_PLIST, || {
            Box::new(XmlPlistSerialiser)
        });
        registry.register(media_type::MEDIA_TYPE_PLIST, || {
            Box::new(XmlPlistSerialiser)
        });
        registry
    }

    /// Registers `factory` for `content_type`, replacing any previous entry.
    pub fn register(&mut self, content_type: &str, factory: SerialiserFactory) {
        self.factories.insert(content_type.to_string(), factory);
    }

    /// Creates a serialiser for `content_type`, or `None` when the type is
    /// not registered.
    pub fn create(&self, content_type: &str) -> Option<Box<dyn Serialiser>> {
        self.factories.get(content_type).map(|factory| factory())
    }

    pub fn contains(&self, content_type: &str) -> bool {
        self.factories.contains_key(content_type)
    }

    /// Registered Media Types, for Accept-header negotiation.
    pub fn content_types(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }
}
