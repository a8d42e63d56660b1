//! Encoding detection and format-agnostic entry points.
//!
//! The first [`Format::SNIFF_LEN`] bytes decide the codec, compared ASCII
//! case-insensitively after any leading whitespace:
//!
//! | Prefix | Format |
//! |--------|--------|
//! | `<llsd>`, `<?xml`, `<? llsd/xml` | [`Format::Xml`] |
//! | `<? llsd/notatio` | [`Format::Notation`] |
//! | `<? llsd/binary` | [`Format::Binary`] (not supported) |
//! | anything else | [`Format::Json`] |
//!
//! ```rust
//! use serde_llsd::{from_str_any, Format, LlsdValue};
//!
//! assert_eq!(Format::detect(b"<?XML version=\"1.0\"?>"), Format::Xml);
//! assert_eq!(Format::detect(b"[1, 2]"), Format::Json);
//!
//! assert_eq!(from_str_any("<llsd><integer>3</integer></llsd>").unwrap(), LlsdValue::Integer(3));
//! assert_eq!(from_str_any("<? llsd/notation ?>\ni3").unwrap(), LlsdValue::Integer(3));
//! assert_eq!(from_str_any("3").unwrap(), LlsdValue::Integer(3));
//! ```

use crate::options::{JsonOptions, NotationOptions, XmlOptions};
use crate::{json, notation, xml, Error, LlsdValue, Result};
use std::fmt;
use std::io::{self, Read, Seek, SeekFrom};

/// A wire encoding of LLSD.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Format {
    Xml,
    Notation,
    Binary,
    Json,
}

const SIGNATURES: &[(&[u8], Format)] = &[
    (b"<llsd>", Format::Xml),
    (b"<?xml", Format::Xml),
    (b"<? llsd/xml", Format::Xml),
    (b"<? llsd/notatio", Format::Notation),
    (b"<? llsd/binary", Format::Binary),
];

impl Format {
    /// Number of leading bytes inspected by [`Format::detect`].
    pub const SNIFF_LEN: usize = 15;

    /// Picks the encoding of a document from its first bytes.
    #[must_use]
    pub fn detect(prefix: &[u8]) -> Format {
        let start = prefix
            .iter()
            .position(|b| !b.is_ascii_whitespace())
            .unwrap_or(prefix.len());
        let head = &prefix[start..];
        let head = &head[..head.len().min(Self::SNIFF_LEN)];
        SIGNATURES
            .iter()
            .find(|(signature, _)| {
                head.get(..signature.len())
                    .is_some_and(|h| h.eq_ignore_ascii_case(signature))
            })
            .map_or(Format::Json, |(_, format)| *format)
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Format::Xml => "xml",
            Format::Notation => "notation",
            Format::Binary => "binary",
            Format::Json => "json",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn detect_logged(prefix: &[u8]) -> Format {
    let format = Format::detect(prefix);
    tracing::debug!(%format, "detected LLSD encoding");
    format
}

fn binary_unsupported() -> Error {
    Error::unsupported("binary LLSD encoding")
}

/// Parses a document in any supported encoding.
///
/// XML goes through the lenient parser, so malformed XML yields
/// `Ok(LlsdValue::Undefined)`.
///
/// # Errors
///
/// JSON and Notation syntax errors propagate; binary documents give
/// [`Error::Unsupported`].
pub fn from_slice_any(v: &[u8]) -> Result<LlsdValue> {
    match detect_logged(v) {
        Format::Xml => Ok(xml::from_xml_slice(v)),
        Format::Notation => notation::from_notation_slice(v),
        Format::Binary => Err(binary_unsupported()),
        Format::Json => json::from_json_slice(v),
    }
}

pub fn from_str_any(s: &str) -> Result<LlsdValue> {
    from_slice_any(s.as_bytes())
}

/// Sniffs a seekable stream, rewinds it to where it started, then parses it.
pub fn from_reader_any<R: Read + Seek>(mut reader: R) -> Result<LlsdValue> {
    let start = reader.stream_position()?;
    let mut prefix = [0u8; Format::SNIFF_LEN];
    let filled = read_up_to(&mut reader, &mut prefix)?;
    reader.seek(SeekFrom::Start(start))?;

    match detect_logged(&prefix[..filled]) {
        Format::Xml => Ok(xml::from_xml_reader(reader)),
        Format::Notation => notation::from_notation_reader(reader),
        Format::Binary => Err(binary_unsupported()),
        Format::Json => json::from_json_reader(reader),
    }
}

fn read_up_to<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Serializes `value` in `format` with that codec's default options.
pub fn to_format_string(value: &LlsdValue, format: Format) -> Result<String> {
    let mut out = String::new();
    write_format(&mut out, value, format)?;
    Ok(out)
}

pub(crate) fn write_format(out: &mut String, value: &LlsdValue, format: Format) -> Result<()> {
    match format {
        Format::Xml => xml::write_xml(out, value, &XmlOptions::new()),
        Format::Notation => notation::write_notation(out, value, &NotationOptions::new()),
        Format::Binary => Err(binary_unsupported()),
        Format::Json => json::write_json(out, value, &JsonOptions::new()),
    }
}
