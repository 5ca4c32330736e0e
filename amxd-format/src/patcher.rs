//! Patcher JSON payloads carried by the `ptch` chunk
//!
//! The payload is opaque JSON text, usually followed by a single zero byte.
//! Decoding strips that terminator and re-serializes the document with tab
//! indentation. Key order survives through serde_json's `preserve_order`.
//! Numeric values and precision are preserved through `arbitrary_precision`;
//! exponent spelling is normalized (`1e3` becomes `1e+3`).
//!
//! Nesting depth is unbounded: the recursion limit is disabled and
//! `serde_stacker` grows the stack on demand.

use std::io;

use serde::Deserialize;
use serde_json::ser::{Formatter, PrettyFormatter};
use serde_json::Value;

use crate::constants::PATCHER_TERMINATOR;
use crate::error::Result;

/// Output style for re-serialized patcher JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrettyStyle {
    /// UTF-8 text written as-is
    #[default]
    Utf8,
    /// Every character outside printable ASCII escaped as `\uXXXX`
    AsciiEscaped,
}

/// Payload without its trailing terminator, if it has one
pub fn strip_terminator(payload: &[u8]) -> &[u8] {
    match payload.split_last() {
        Some((&PATCHER_TERMINATOR, rest)) => rest,
        _ => payload,
    }
}

/// Copy of `json` ending in exactly one terminator byte.
///
/// A payload that already ends in a terminator is returned unchanged.
pub fn terminated(json: &[u8]) -> Vec<u8> {
    let mut payload = Vec::with_capacity(json.len() + 1);
    payload.extend_from_slice(json);
    if payload.last() != Some(&PATCHER_TERMINATOR) {
        payload.push(PATCHER_TERMINATOR);
    }
    payload
}

/// Parse a patcher payload, ignoring one trailing terminator byte
pub fn parse(payload: &[u8]) -> Result<Value> {
    let mut de = serde_json::Deserializer::from_slice(strip_terminator(payload));
    de.disable_recursion_limit();
    let value = Value::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Ok(value)
}

/// Serialize with tab indentation and a trailing newline
pub fn to_pretty_string(value: &Value, style: PrettyStyle) -> Result<String> {
    let mut out = Vec::new();
    match style {
        PrettyStyle::Utf8 => {
            let formatter = PrettyFormatter::with_indent(b"\t");
            let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
            serde::Serialize::serialize(value, &mut ser)?;
        }
        PrettyStyle::AsciiEscaped => {
            let formatter = AsciiFormatter::new(PrettyFormatter::with_indent(b"\t"));
            let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
            serde::Serialize::serialize(value, &mut ser)?;
        }
    }
    out.push(b'\n');

    // Both formatters only ever emit UTF-8.
    Ok(String::from_utf8(out).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?)
}

/// Pretty formatter that escapes non-ASCII string content
struct AsciiFormatter<'a> {
    inner: PrettyFormatter<'a>,
}

impl<'a> AsciiFormatter<'a> {
    fn new(inner: PrettyFormatter<'a>) -> Self {
        Self { inner }
    }
}

impl Formatter for AsciiFormatter<'_> {
    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_array(writer)
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.inner.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object(writer)
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.inner.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object_value(writer)
    }

    fn write_string_fragment<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        let mut start = 0;
        for (idx, ch) in fragment.char_indices() {
            if (' '..='~').contains(&ch) {
                continue;
            }
            writer.write_all(&fragment.as_bytes()[start..idx])?;
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{:04x}", unit)?;
            }
            start = idx + ch.len_utf8();
        }
        writer.write_all(&fragment.as_bytes()[start..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AmxdError;

    #[test]
    fn test_strip_terminator() {
        assert_eq!(strip_terminator(b"{}\0"), b"{}");
        assert_eq!(strip_terminator(b"{}"), b"{}");
        assert_eq!(strip_terminator(b"{}\0\0"), b"{}\0");
        assert_eq!(strip_terminator(b""), b"");
        assert_eq!(strip_terminator(b"\0"), b"");
    }

    #[test]
    fn test_terminated_appends_once() {
        assert_eq!(terminated(b"{}"), b"{}\0");
        assert_eq!(terminated(b"{}\0"), b"{}\0");
        assert_eq!(terminated(b""), b"\0");
    }

    #[test]
    fn test_parse_accepts_terminated_and_bare() {
        let bare = parse(br#"{"a":1}"#).unwrap();
        let terminated = parse(b"{\"a\":1}\0").unwrap();
        assert_eq!(bare, terminated);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(matches!(parse(b"{invalid}"), Err(AmxdError::Json(_))));
        assert!(matches!(parse(b"\0"), Err(AmxdError::Json(_))));
    }

    #[test]
    fn test_parse_rejects_invalid_utf8() {
        assert!(matches!(parse(b"\"\xff\xfe\""), Err(AmxdError::Json(_))));
    }

    #[test]
    fn test_pretty_uses_tabs_and_trailing_newline() {
        let value = parse(br#"{"a":1}"#).unwrap();
        assert_eq!(
            to_pretty_string(&value, PrettyStyle::Utf8).unwrap(),
            "{\n\t\"a\": 1\n}\n"
        );
    }

    #[test]
    fn test_pretty_preserves_key_order_and_numbers() {
        let value = parse(br#"{"z":1.50,"a":[1e3,12345678901234567890123],"m":{}}"#).unwrap();
        assert_eq!(
            to_pretty_string(&value, PrettyStyle::Utf8).unwrap(),
            "{\n\t\"z\": 1.50,\n\t\"a\": [\n\t\t1e+3,\n\t\t12345678901234567890123\n\t],\n\t\"m\": {}\n}\n"
        );
    }

    #[test]
    fn test_pretty_keeps_number_precision() {
        let value = parse(b"[1.50,-0,0.10,12345678901234567890123,1e-3]").unwrap();
        assert_eq!(
            to_pretty_string(&value, PrettyStyle::Utf8).unwrap(),
            "[\n\t1.50,\n\t-0,\n\t0.10,\n\t12345678901234567890123,\n\t1e-3\n]\n"
        );
    }

    #[test]
    fn test_pretty_normalizes_exponent_spelling() {
        let value = parse(b"[1e3,1E3,1.0E+2]").unwrap();
        assert_eq!(
            to_pretty_string(&value, PrettyStyle::Utf8).unwrap(),
            "[\n\t1e+3,\n\t1e+3,\n\t1.0e+2\n]\n"
        );
    }

    #[test]
    fn test_parse_accepts_deep_nesting() {
        let depth = 500;
        let json = format!("{}{}", "[".repeat(depth), "]".repeat(depth));
        let value = parse(json.as_bytes()).unwrap();

        let mut level = 0;
        let mut current = &value;
        while let Some(inner) = current.as_array().and_then(|items| items.first()) {
            current = inner;
            level += 1;
        }
        assert_eq!(level, depth - 1);
    }

    #[test]
    fn test_parse_rejects_trailing_garbage() {
        assert!(matches!(parse(b"{} {}"), Err(AmxdError::Json(_))));
    }

    #[test]
    fn test_pretty_scalar_document() {
        let value = parse(b"42\0").unwrap();
        assert_eq!(to_pretty_string(&value, PrettyStyle::Utf8).unwrap(), "42\n");
    }

    #[test]
    fn test_ascii_style_escapes_non_ascii() {
        let value = parse("{\"name\":\"Caf\u{e9} \u{1f3b9}\"}".as_bytes()).unwrap();
        assert_eq!(
            to_pretty_string(&value, PrettyStyle::AsciiEscaped).unwrap(),
            "{\n\t\"name\": \"Caf\\u00e9 \\ud83c\\udfb9\"\n}\n"
        );
        assert_eq!(
            to_pretty_string(&value, PrettyStyle::Utf8).unwrap(),
            "{\n\t\"name\": \"Caf\u{e9} \u{1f3b9}\"\n}\n"
        );
    }

    #[test]
    fn test_ascii_style_keeps_standard_escapes() {
        let value = parse(br#"["a\"b\\c\nd"]"#).unwrap();
        assert_eq!(
            to_pretty_string(&value, PrettyStyle::AsciiEscaped).unwrap(),
            "[\n\t\"a\\\"b\\\\c\\nd\"\n]\n"
        );
    }
}
