//! Value tree → human-readable XML property list.
//!
//! Re-rendert einen decodierten Baum als lesbares XML-Plist für Logging und
//! Inspektion. This is a debugging/export capability, separate from the
//! binary wire codec itself.
//!
//! Zwei APIs:
//! - `to_xml()`: gibt das Plist als String zurück (Convenience).
//! - `to_xml_writer()`: streamt direkt in `impl Write`.

use std::io::Write;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::DateTime;
use log::warn;

use crate::error::Error;
use crate::value::Value;
use crate::Result;

const DOCTYPE: &str = "<!DOCTYPE plist PUBLIC \"-//Apple//DTD PLIST 1.0//EN\" \
                       \"http://www.apple.com/DTDs/PropertyList-1.0.dtd\">";

/// Renders `value` as an XML property-list document.
pub fn to_xml(value: &Value) -> Result<String> {
    let mut buf = Vec::new();
    to_xml_writer(value, &mut buf)?;
    String::from_utf8(buf).map_err(|_| Error::IoError("XML output is not valid UTF-8".into()))
}

/// Streams the XML property list into a writer, indented four spaces per
/// level.
pub fn to_xml_writer(value: &Value, mut writer: impl Write) -> Result<()> {
    w(&mut writer, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n")?;
    w(&mut writer, DOCTYPE)?;
    w(&mut writer, "\n<plist version=\"1.0\">\n")?;
    write_node(&mut writer, value, 1)?;
    w(&mut writer, "</plist>\n")
}

/// io::Error → Error Konvertierung.
fn io_err(e: std::io::Error) -> Error {
    Error::IoError(e.to_string())
}

fn w(writer: &mut impl Write, s: &str) -> Result<()> {
    writer.write_all(s.as_bytes()).map_err(io_err)
}

fn indent(writer: &mut impl Write, depth: usize) -> Result<()> {
    for _ in 0..depth {
        w(writer, "    ")?;
    }
    Ok(())
}

fn write_node(writer: &mut impl Write, value: &Value, depth: usize) -> Result<()> {
    match value {
        Value::Dictionary(map) => {
            indent(writer, depth)?;
            w(writer, "<dict>\n")?;
            for (key, entry) in map {
                indent(writer, depth + 1)?;
                w(writer, "<key>")?;
                escape_into(writer, key)?;
                w(writer, "</key>\n")?;
                write_node(writer, entry, depth + 1)?;
            }
            indent(writer, depth)?;
            w(writer, "</dict>\n")
        }
        Value::Array(list) => {
            indent(writer, depth)?;
            w(writer, "<array>\n")?;
            for entry in list {
                write_node(writer, entry, depth + 1)?;
            }
            indent(writer, depth)?;
            w(writer, "</array>\n")
        }
        Value::Text(s) => {
            indent(writer, depth)?;
            w(writer, "<string>")?;
            escape_into(writer, s)?;
            w(writer, "</string>\n")
        }
        Value::Integer(n) => {
            indent(writer, depth)?;
            w(writer, &format!("<integer>{n}</integer>\n"))
        }
        Value::Real(r) => {
            // Six fixed decimals, matching the historical renderer.
            indent(writer, depth)?;
            w(writer, &format!("<real>{r:.6}</real>\n"))
        }
        Value::ByteString(bytes) => {
            indent(writer, depth)?;
            w(writer, "<data>")?;
            w(writer, &STANDARD.encode(bytes))?;
            w(writer, "</data>\n")
        }
        Value::DateTime(seconds) => match DateTime::from_timestamp(*seconds, 0) {
            Some(utc) => {
                indent(writer, depth)?;
                w(writer, &format!("<date>{}</date>\n", utc.format("%Y-%m-%dT%H:%M:%SZ")))
            }
            None => {
                // Out-of-range timestamps are skipped like invalid dates
                // always were.
                warn!("date {seconds} outside representable range, skipping");
                Ok(())
            }
        },
        Value::Bool(b) => {
            indent(writer, depth)?;
            w(writer, if *b { "<true/>\n" } else { "<false/>\n" })
        }
        Value::Null => {
            warn!("null value has no XML plist representation, skipping");
            Ok(())
        }
    }
}

/// Escapes `&`, `<` and `>` in element content.
fn escape_into(writer: &mut impl Write, s: &str) -> Result<()> {
    for c in s.chars() {
        match c {
            '&' => w(writer, "&amp;")?,
            '<' => w(writer, "&lt;")?,
            '>' => w(writer, "&gt;")?,
            _ => {
                let mut utf8 = [0u8; 4];
                w(writer, c.encode_utf8(&mut utf8))?;
            }
        }
    }
    Ok(())
}
