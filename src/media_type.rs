//! Internet Media Types und Magic Number für Property Lists.
//!
//! Definiert die Kennungen, unter denen die Serialiser registriert werden:
//! - Binary Plist: "application/x-plist", "application/x-apple-binary-plist"
//! - XML Plist: "text/x-apple-plist+xml", "application/plist"
//! - Magic Number: "bplist00" (Magic "bplist" + Version "00")

/// Media Type für das binäre Plist.
pub const MEDIA_TYPE_BINARY_PLIST: &str = "application/x-plist";

/// Apple-spezifischer Media Type für das binäre Plist.
pub const MEDIA_TYPE_APPLE_BINARY_PLIST: &str = "application/x-apple-binary-plist";

/// Media Type für das XML-Plist.
pub const MEDIA_TYPE_XML_PLIST: &str = "text/x-apple-plist+xml";

/// Generischer Media Type für das XML-Plist.
pub const MEDIA_TYPE_PLIST: &str = "application/plist";

/// Magic Number: die ersten acht Oktette eines binären Plists.
pub const MAGIC_NUMBER: [u8; 8] = *b"bplist00";

/// Dateiendung für Property-List-Dateien.
pub const FILE_EXTENSION: &str = ".plist";

/// Prüft, ob ein Byte-Slice mit der bplist00 Magic Number beginnt.
pub fn has_magic_number(data: &[u8]) -> bool {
    data.len() >= 8 && data[..8] == MAGIC_NUMBER
}
