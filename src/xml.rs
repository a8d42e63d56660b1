//! The XML encoding, `<llsd>...</llsd>`.
//!
//! Parsing pulls events from [`quick_xml::Reader`] and builds the value
//! tree directly. Serialization streams element text into a `String`.
//!
//! The lenient entry points ([`from_xml_str`], [`from_xml_slice`],
//! [`from_xml_reader`]) never fail: malformed documents produce
//! `Undefined` and a `tracing` warning. Use [`try_from_xml_str`] to see the
//! error instead.
//!
//! ```rust
//! use serde_llsd::{from_xml_str, llsd, to_xml_string, LlsdValue, XmlOptions};
//!
//! let xml = "<llsd><map><key>id</key><integer>7</integer><key>on</key><boolean/></map></llsd>";
//! let value = from_xml_str(xml);
//! assert_eq!(value, llsd!({ "id": 7, "on": false }));
//!
//! let text = to_xml_string(&value, &XmlOptions::new().with_declaration(false)).unwrap();
//! assert_eq!(
//!     text,
//!     "<llsd><map><key>id</key><integer>7</integer><key>on</key><boolean>0</boolean></map></llsd>"
//! );
//!
//! assert_eq!(from_xml_str("<llsd><array>"), LlsdValue::Undefined);
//! ```

use crate::options::{DepthGuard, ParseOptions, XmlOptions};
use crate::text::{decode_base64, encode_base64, epoch, format_date, format_real, parse_date, parse_real};
use crate::types::{Uri, Uuid};
use crate::{Error, LlsdMap, LlsdValue, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io;

pub const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>";

/// Short marker some peers put in front of the document instead of an XML declaration.
pub const XML_MARKER: &str = "<? llsd/xml ?>";

/// Serializes `value` as an `<llsd>` document.
///
/// # Errors
///
/// Fails only when nesting exceeds `options.max_depth`.
pub fn to_xml_string(value: &LlsdValue, options: &XmlOptions) -> Result<String> {
    let mut out = String::with_capacity(256);
    write_xml(&mut out, value, options)?;
    Ok(out)
}

pub fn write_xml(out: &mut String, value: &LlsdValue, options: &XmlOptions) -> Result<()> {
    if options.declaration {
        out.push_str(XML_DECLARATION);
    }
    out.push_str("<llsd>");
    let mut writer = XmlWriter {
        out,
        legacy_backslash_entity: options.legacy_backslash_entity,
        depth: DepthGuard::new(options.max_depth),
    };
    writer.write_value(value)?;
    writer.out.push_str("</llsd>");
    Ok(())
}

struct XmlWriter<'a> {
    out: &'a mut String,
    legacy_backslash_entity: bool,
    depth: DepthGuard,
}

impl XmlWriter<'_> {
    fn write_value(&mut self, value: &LlsdValue) -> Result<()> {
        let tag = value.llsd_type().xml_tag();
        match value {
            LlsdValue::Undefined => self.empty(tag),
            LlsdValue::Boolean(b) => self.element(tag, if *b { "1" } else { "0" }),
            LlsdValue::Integer(i) => self.element(tag, &i.to_string()),
            LlsdValue::Real(r) => self.element(tag, &format_real(*r)),
            LlsdValue::String(s) if s.is_empty() => self.empty(tag),
            LlsdValue::String(s) => self.escaped_element(tag, s),
            LlsdValue::Uuid(u) => self.element(tag, &u.to_string()),
            LlsdValue::Date(d) => self.element(tag, &format_date(d)),
            LlsdValue::Uri(u) if u.is_empty() => self.empty(tag),
            LlsdValue::Uri(u) => self.escaped_element(tag, u.as_str()),
            LlsdValue::Binary(bytes) => {
                self.out.push_str("<binary encoding=\"base64\">");
                self.out.push_str(&encode_base64(bytes));
                self.out.push_str("</binary>");
            }
            LlsdValue::Array(items) if items.is_empty() => self.empty(tag),
            LlsdValue::Array(items) => {
                self.depth.enter()?;
                self.out.push_str("<array>");
                for item in items {
                    self.write_value(item)?;
                }
                self.out.push_str("</array>");
                self.depth.leave();
            }
            LlsdValue::Map(map) if map.is_empty() => self.empty(tag),
            LlsdValue::Map(map) => {
                self.depth.enter()?;
                self.out.push_str("<map>");
                for (key, item) in map.iter() {
                    self.escaped_element("key", key);
                    self.write_value(item)?;
                }
                self.out.push_str("</map>");
                self.depth.leave();
            }
        }
        Ok(())
    }

    fn empty(&mut self, tag: &str) {
        self.out.push('<');
        self.out.push_str(tag);
        self.out.push_str(" />");
    }

    fn element(&mut self, tag: &str, body: &str) {
        self.out.push('<');
        self.out.push_str(tag);
        self.out.push('>');
        self.out.push_str(body);
        self.out.push_str("</");
        self.out.push_str(tag);
        self.out.push('>');
    }

    fn escaped_element(&mut self, tag: &str, body: &str) {
        let mut escaped = String::with_capacity(body.len());
        escape_into(&mut escaped, body, self.legacy_backslash_entity);
        self.element(tag, &escaped);
    }
}

fn escape_into(out: &mut String, text: &str, legacy_backslash_entity: bool) {
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\r' => out.push_str("&#13;"),
            '\\' if legacy_backslash_entity => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
}

/// Parses an XML document, substituting `Undefined` for any failure.
pub fn from_xml_str(s: &str) -> LlsdValue {
    lenient(try_from_xml_str(s))
}

pub fn from_xml_slice(v: &[u8]) -> LlsdValue {
    lenient(try_from_xml_slice(v))
}

pub fn from_xml_reader<R: io::Read>(mut reader: R) -> LlsdValue {
    let mut buf = Vec::new();
    match reader.read_to_end(&mut buf) {
        Ok(_) => from_xml_slice(&buf),
        Err(e) => lenient(Err(e.into())),
    }
}

fn lenient(result: Result<LlsdValue>) -> LlsdValue {
    result.unwrap_or_else(|error| {
        tracing::warn!(%error, "malformed LLSD XML, substituting undefined");
        LlsdValue::Undefined
    })
}

/// Parses an XML document, reporting structural errors.
///
/// # Errors
///
/// Missing `<llsd>` root, unknown or mismatched elements, a `binary`
/// element with a non-base64 encoding or bad base64 body, and truncated
/// input are all errors. Unparseable scalar bodies are not: they become
/// the type's default.
pub fn try_from_xml_str(s: &str) -> Result<LlsdValue> {
    try_from_xml_str_with_options(s, &ParseOptions::default())
}

pub fn try_from_xml_slice(v: &[u8]) -> Result<LlsdValue> {
    let s = std::str::from_utf8(v)
        .map_err(|e| Error::syntax(1, e.valid_up_to(), "document is not valid UTF-8"))?;
    try_from_xml_str(s)
}

pub fn try_from_xml_str_with_options(s: &str, options: &ParseOptions) -> Result<LlsdValue> {
    let mut parser = XmlParser {
        reader: Reader::from_str(strip_marker(s)),
        depth: DepthGuard::new(options.max_depth),
    };
    parser.parse_document()
}

fn strip_marker(s: &str) -> &str {
    let trimmed = s.trim_start();
    match trimmed.get(..XML_MARKER.len()) {
        Some(head) if head.eq_ignore_ascii_case(XML_MARKER) => &trimmed[XML_MARKER.len()..],
        _ => s,
    }
}

struct XmlParser<'a> {
    reader: Reader<&'a [u8]>,
    depth: DepthGuard,
}

/// An element opening: the tag plus whether it was self-closing.
struct Open<'a> {
    start: BytesStart<'a>,
    empty: bool,
}

impl<'a> XmlParser<'a> {
    fn error(&self, msg: &str) -> Error {
        Error::syntax(1, self.reader.buffer_position() as usize, msg)
    }

    fn read(&mut self) -> Result<Event<'a>> {
        self.reader
            .read_event()
            .map_err(|e| self.error(&e.to_string()))
    }

    /// Next event that is not whitespace, a comment, or a processing instruction.
    fn next_significant(&mut self) -> Result<Event<'a>> {
        loop {
            match self.read()? {
                Event::Text(t) if t.iter().all(u8::is_ascii_whitespace) => {}
                Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
                other => return Ok(other),
            }
        }
    }

    fn parse_document(&mut self) -> Result<LlsdValue> {
        match self.next_significant()? {
            Event::Start(e) if e.local_name().as_ref() == b"llsd" => {}
            Event::Empty(e) if e.local_name().as_ref() == b"llsd" => return Ok(LlsdValue::Undefined),
            Event::Eof => return Err(Error::unexpected_eof("<llsd>")),
            _ => return Err(self.error("expected <llsd> root element")),
        }
        let value = match self.next_open("llsd")? {
            Some(open) => self.parse_element(open)?,
            None => return Ok(LlsdValue::Undefined),
        };
        match self.next_significant()? {
            Event::End(e) if e.local_name().as_ref() == b"llsd" => Ok(value),
            Event::Eof => Err(Error::unexpected_eof("</llsd>")),
            _ => Err(self.error("expected </llsd> after the root value")),
        }
    }

    /// Reads the next element opening, or `None` at the end tag of `parent`.
    fn next_open(&mut self, parent: &str) -> Result<Option<Open<'a>>> {
        match self.next_significant()? {
            Event::Start(start) => Ok(Some(Open { start, empty: false })),
            Event::Empty(start) => Ok(Some(Open { start, empty: true })),
            Event::End(e) if e.local_name().as_ref() == parent.as_bytes() => Ok(None),
            Event::End(_) => Err(self.error(&format!("mismatched end tag inside <{}>", parent))),
            Event::Eof => Err(Error::unexpected_eof("an element")),
            _ => Err(self.error("unexpected text between elements")),
        }
    }

    fn parse_element(&mut self, open: Open<'a>) -> Result<LlsdValue> {
        let name = open.start.local_name();
        let tag = std::str::from_utf8(name.as_ref()).unwrap_or_default().to_string();
        let value = match tag.as_str() {
            "undef" => {
                self.read_text(&open)?;
                LlsdValue::Undefined
            }
            "boolean" => {
                let text = self.read_text(&open)?;
                LlsdValue::Boolean(LlsdValue::String(text.trim().to_string()).as_boolean())
            }
            "integer" => LlsdValue::Integer(self.read_text(&open)?.trim().parse().unwrap_or(0)),
            "real" => LlsdValue::Real(parse_real(&self.read_text(&open)?).unwrap_or(0.0)),
            "string" => LlsdValue::String(self.read_text(&open)?),
            "uuid" => LlsdValue::Uuid(Uuid::parse_str(&self.read_text(&open)?).unwrap_or_default()),
            "date" => LlsdValue::Date(parse_date(&self.read_text(&open)?).unwrap_or_else(epoch)),
            "uri" => LlsdValue::Uri(Uri::parse(self.read_text(&open)?.trim()).unwrap_or_default()),
            "binary" => self.parse_binary(&open)?,
            "array" => self.parse_array(&open)?,
            "map" => self.parse_map(&open)?,
            _ => return Err(self.error(&format!("unknown element <{}>", tag))),
        };
        Ok(value)
    }

    fn parse_binary(&mut self, open: &Open<'a>) -> Result<LlsdValue> {
        let encoding = open
            .start
            .try_get_attribute("encoding")
            .map_err(|e| self.error(&e.to_string()))?;
        if let Some(attr) = encoding {
            let encoding = attr.unescape_value().map_err(|e| self.error(&e.to_string()))?;
            if encoding != "base64" {
                return Err(Error::unsupported(&format!("binary encoding '{}'", encoding)));
            }
        }
        let body = self.read_text(open)?;
        decode_base64(&body)
            .map(LlsdValue::Binary)
            .map_err(|_| self.error("invalid base64 in <binary>"))
    }

    fn parse_array(&mut self, open: &Open<'a>) -> Result<LlsdValue> {
        let mut items = Vec::new();
        if open.empty {
            return Ok(LlsdValue::Array(items));
        }
        self.depth.enter()?;
        while let Some(child) = self.next_open("array")? {
            items.push(self.parse_element(child)?);
        }
        self.depth.leave();
        Ok(LlsdValue::Array(items))
    }

    fn parse_map(&mut self, open: &Open<'a>) -> Result<LlsdValue> {
        let mut map = LlsdMap::new();
        if open.empty {
            return Ok(LlsdValue::Map(map));
        }
        self.depth.enter()?;
        while let Some(key) = self.next_open("map")? {
            if key.start.local_name().as_ref() != b"key" {
                return Err(self.error("expected <key> inside <map>"));
            }
            let name = self.read_text(&key)?;
            let value = match self.next_open("map")? {
                Some(child) => self.parse_element(child)?,
                None => return Err(self.error("<key> without a value")),
            };
            map.insert(name, value);
        }
        self.depth.leave();
        Ok(LlsdValue::Map(map))
    }

    /// Collects the text body of `open`, consuming its end tag.
    fn read_text(&mut self, open: &Open<'a>) -> Result<String> {
        let mut text = String::new();
        if open.empty {
            return Ok(text);
        }
        loop {
            match self.read()? {
                Event::Text(t) => {
                    let unescaped = t.unescape().map_err(|e| self.error(&e.to_string()))?;
                    text.push_str(&unescaped);
                }
                Event::CData(c) => text.push_str(&String::from_utf8_lossy(&c.into_inner())),
                Event::Comment(_) | Event::PI(_) => {}
                Event::End(_) => return Ok(text),
                Event::Eof => return Err(Error::unexpected_eof("an end tag")),
                _ => return Err(self.error("unexpected element inside a scalar")),
            }
        }
    }
}
