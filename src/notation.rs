//! The Notation encoding: a compact text form with one-character type tags.
//!
//! | Tag | Value |
//! |-----|-------|
//! | `!` | undefined |
//! | `1` `t` `true` `T` `TRUE` / `0` `f` `false` `F` `FALSE` | boolean |
//! | `i-12` | integer |
//! | `r3.25` | real |
//! | `u6c2e0b4e-5a0b-4c52-9c6b-62b2a1f43f7d` | UUID |
//! | `'text'` `"text"` `s(4)"text"` | string |
//! | `l"http://..."` | URI |
//! | `d"2008-01-01T00:00:00Z"` | date |
//! | `b64"AAEC"` | binary |
//! | `[v, v]` / `{'key':v}` | array / map |
//!
//! Whitespace between tokens is insignificant and a trailing comma before a
//! closing delimiter is accepted.
//!
//! ```rust
//! use serde_llsd::{from_notation_str, llsd, to_notation_string, LlsdValue};
//!
//! let value = from_notation_str("{'name':'Ahern', 'pos':[r128, r64.5, i22]}").unwrap();
//! assert_eq!(value, llsd!({ "name": "Ahern", "pos": [128.0, 64.5, 22] }));
//! assert_eq!(
//!     to_notation_string(&value).unwrap(),
//!     "{'name':'Ahern','pos':[r128,r64.5,i22]}"
//! );
//! assert_eq!(from_notation_str("i-489234").unwrap(), LlsdValue::Integer(-489234));
//! ```

use crate::options::{DepthGuard, NotationOptions, ParseOptions};
use crate::text::{decode_base64, encode_base64, format_date, format_real, parse_date, parse_real};
use crate::types::{Uri, Uuid};
use crate::{Error, LlsdMap, LlsdValue, Result};
use std::io;

/// Header line recognized by the format dispatcher.
pub const NOTATION_HEADER: &str = "<? llsd/notation ?>";

pub fn to_notation_string(value: &LlsdValue) -> Result<String> {
    to_notation_string_with_options(value, &NotationOptions::new())
}

/// Serializes with newlines and two-space indentation around containers.
pub fn to_notation_string_pretty(value: &LlsdValue) -> Result<String> {
    to_notation_string_with_options(value, &NotationOptions::pretty())
}

pub fn to_notation_string_with_options(
    value: &LlsdValue,
    options: &NotationOptions,
) -> Result<String> {
    let mut out = String::with_capacity(128);
    write_notation(&mut out, value, options)?;
    Ok(out)
}

/// Appends the Notation form of `value` to `out`.
pub fn write_notation(out: &mut String, value: &LlsdValue, options: &NotationOptions) -> Result<()> {
    if options.header {
        out.push_str(NOTATION_HEADER);
        out.push('\n');
    }
    let mut writer = NotationWriter {
        out,
        pretty: options.pretty,
        indent: options.indent,
        depth: DepthGuard::new(options.max_depth),
    };
    writer.write_value(value)
}

struct NotationWriter<'a> {
    out: &'a mut String,
    pretty: bool,
    indent: usize,
    depth: DepthGuard,
}

impl NotationWriter<'_> {
    fn write_value(&mut self, value: &LlsdValue) -> Result<()> {
        match value {
            LlsdValue::Undefined => self.out.push('!'),
            LlsdValue::Boolean(b) => self.out.push(if *b { 't' } else { 'f' }),
            LlsdValue::Integer(i) => {
                self.out.push('i');
                self.out.push_str(&i.to_string());
            }
            LlsdValue::Real(r) => {
                self.out.push('r');
                self.out.push_str(&format_real(*r));
            }
            LlsdValue::String(s) => write_quoted(self.out, s, '\''),
            LlsdValue::Uuid(u) => {
                self.out.push('u');
                self.out.push_str(&u.to_string());
            }
            LlsdValue::Date(d) => {
                self.out.push('d');
                write_quoted(self.out, &format_date(d), '"');
            }
            LlsdValue::Uri(u) => {
                self.out.push('l');
                write_quoted(self.out, u.as_str(), '"');
            }
            LlsdValue::Binary(bytes) => {
                self.out.push_str("b64\"");
                self.out.push_str(&encode_base64(bytes));
                self.out.push('"');
            }
            LlsdValue::Array(items) => {
                self.depth.enter()?;
                self.out.push('[');
                for (i, item) in items.iter().enumerate() {
                    self.separator(i);
                    self.write_value(item)?;
                }
                self.close(']', items.is_empty());
                self.depth.leave();
            }
            LlsdValue::Map(map) => {
                self.depth.enter()?;
                self.out.push('{');
                for (i, (key, item)) in map.iter().enumerate() {
                    self.separator(i);
                    write_quoted(self.out, key, '\'');
                    self.out.push(':');
                    self.write_value(item)?;
                }
                self.close('}', map.is_empty());
                self.depth.leave();
            }
        }
        Ok(())
    }

    fn separator(&mut self, index: usize) {
        if index > 0 {
            self.out.push(',');
        }
        if self.pretty {
            self.newline(self.depth.depth());
        }
    }

    fn close(&mut self, delim: char, empty: bool) {
        if self.pretty && !empty {
            self.newline(self.depth.depth() - 1);
        }
        self.out.push(delim);
    }

    fn newline(&mut self, level: usize) {
        self.out.push('\n');
        self.out
            .extend(std::iter::repeat(' ').take(level * self.indent));
    }
}

fn write_quoted(out: &mut String, s: &str, quote: char) {
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\x07' => out.push_str("\\a"),
            '\x08' => out.push_str("\\b"),
            '\x0C' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\x0B' => out.push_str("\\v"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_ascii_control() => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push(quote);
}

pub fn from_notation_str(s: &str) -> Result<LlsdValue> {
    from_notation_slice(s.as_bytes())
}

/// Parses Notation text, skipping a leading `<? ... ?>` header.
///
/// The document holds exactly one value; only whitespace may follow it.
///
/// # Errors
///
/// Malformed tokens and trailing content give [`Error::Syntax`], truncated
/// input [`Error::UnexpectedEof`], and the raw `b(N)` and base16 binary
/// forms [`Error::Unsupported`].
pub fn from_notation_slice(v: &[u8]) -> Result<LlsdValue> {
    from_notation_slice_with_options(v, &ParseOptions::default())
}

pub fn from_notation_str_with_options(s: &str, options: &ParseOptions) -> Result<LlsdValue> {
    from_notation_slice_with_options(s.as_bytes(), options)
}

pub fn from_notation_slice_with_options(v: &[u8], options: &ParseOptions) -> Result<LlsdValue> {
    let mut parser = Parser::new(v, options.max_depth);
    parser.skip_header();
    let value = parser.parse_value()?;
    parser.skip_whitespace();
    if parser.peek_byte().is_some() {
        return Err(parser.error("unexpected content after the value"));
    }
    Ok(value)
}

pub fn from_notation_reader<R: io::Read>(mut reader: R) -> Result<LlsdValue> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    from_notation_slice(&buf)
}

struct Parser<'a> {
    input: &'a [u8],
    position: usize,
    line: usize,
    column: usize,
    depth: DepthGuard,
}

impl<'a> Parser<'a> {
    fn new(input: &'a [u8], max_depth: usize) -> Self {
        Parser {
            input,
            position: 0,
            line: 1,
            column: 1,
            depth: DepthGuard::new(max_depth),
        }
    }

    fn peek_byte(&self) -> Option<u8> {
        self.input.get(self.position).copied()
    }

    fn next_byte(&mut self) -> Option<u8> {
        let b = self.peek_byte()?;
        self.position += 1;
        if b == b'\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(b)
    }

    fn remaining(&self) -> &'a [u8] {
        &self.input[self.position..]
    }

    fn advance(&mut self, n: usize) {
        for _ in 0..n {
            self.next_byte();
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek_byte(), Some(b) if b.is_ascii_whitespace()) {
            self.next_byte();
        }
    }

    fn skip_header(&mut self) {
        self.skip_whitespace();
        if self.remaining().starts_with(b"<?") {
            if let Some(end) = self.remaining().windows(2).position(|w| w == b"?>") {
                self.advance(end + 2);
            }
        }
    }

    fn error(&self, msg: &str) -> Error {
        Error::syntax(self.line, self.column, msg)
    }

    /// A syntax error, or an EOF error when the input ran out first.
    fn invalid(&self, msg: &str, expected: &str) -> Error {
        if self.position >= self.input.len() {
            Error::unexpected_eof(expected)
        } else {
            self.error(msg)
        }
    }

    fn accept(&mut self, word: &[u8]) -> bool {
        if self.remaining().starts_with(word) {
            self.advance(word.len());
            true
        } else {
            false
        }
    }

    fn expect(&mut self, b: u8) -> Result<()> {
        match self.next_byte() {
            Some(found) if found == b => Ok(()),
            Some(found) => Err(self.error(&format!(
                "expected '{}', found '{}'",
                b as char,
                found as char
            ))),
            None => Err(Error::unexpected_eof(&format!("'{}'", b as char))),
        }
    }

    fn parse_value(&mut self) -> Result<LlsdValue> {
        self.skip_whitespace();
        let Some(tag) = self.next_byte() else {
            return Err(Error::unexpected_eof("a value"));
        };
        match tag {
            b'!' => Ok(LlsdValue::Undefined),
            b'1' => Ok(LlsdValue::Boolean(true)),
            b'0' => Ok(LlsdValue::Boolean(false)),
            b't' => {
                self.accept(b"rue");
                Ok(LlsdValue::Boolean(true))
            }
            b'T' => {
                self.accept(b"RUE");
                Ok(LlsdValue::Boolean(true))
            }
            b'f' => {
                self.accept(b"alse");
                Ok(LlsdValue::Boolean(false))
            }
            b'F' => {
                self.accept(b"ALSE");
                Ok(LlsdValue::Boolean(false))
            }
            b'i' => self.parse_integer(),
            b'r' => self.parse_real(),
            b'u' => self.parse_uuid(),
            b'b' => self.parse_binary(),
            b's' => self.parse_sized_string().map(LlsdValue::String),
            b'\'' | b'"' => self.parse_quoted(tag).map(LlsdValue::String),
            b'l' => self.parse_uri(),
            b'd' => self.parse_date(),
            b'[' => self.parse_array(),
            b'{' => self.parse_map(),
            other => Err(self.error(&format!("unexpected character '{}'", other as char))),
        }
    }

    fn take_while(&mut self, pred: impl Fn(u8) -> bool) -> &'a str {
        let start = self.position;
        while matches!(self.peek_byte(), Some(b) if pred(b)) {
            self.next_byte();
        }
        // The predicates only admit ASCII.
        std::str::from_utf8(&self.input[start..self.position]).unwrap_or_default()
    }

    fn parse_integer(&mut self) -> Result<LlsdValue> {
        let text = self.take_while(|b| b.is_ascii_digit() || b == b'-');
        text.parse::<i32>()
            .map(LlsdValue::Integer)
            .map_err(|_| self.invalid(&format!("invalid integer '{}'", text), "an integer"))
    }

    fn parse_real(&mut self) -> Result<LlsdValue> {
        let text = self.take_while(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'+' | b'-'));
        parse_real(text)
            .map(LlsdValue::Real)
            .ok_or_else(|| self.invalid(&format!("invalid real '{}'", text), "a real"))
    }

    fn parse_uuid(&mut self) -> Result<LlsdValue> {
        let Some(raw) = self.remaining().get(..Uuid::TEXT_LEN) else {
            return Err(Error::unexpected_eof("a 36-character UUID"));
        };
        let hyphenated = raw.iter().enumerate().all(|(i, b)| match i {
            8 | 13 | 18 | 23 => *b == b'-',
            _ => b.is_ascii_hexdigit(),
        });
        if !hyphenated {
            return Err(self.error("invalid UUID"));
        }
        let uuid = std::str::from_utf8(raw)
            .ok()
            .and_then(Uuid::parse_str)
            .ok_or_else(|| self.error("invalid UUID"))?;
        self.advance(Uuid::TEXT_LEN);
        Ok(LlsdValue::Uuid(uuid))
    }

    fn parse_binary(&mut self) -> Result<LlsdValue> {
        if self.peek_byte() == Some(b'(') {
            return Err(Error::unsupported("length-prefixed raw binary"));
        }
        if self.accept(b"16") {
            return Err(Error::unsupported("base16 binary"));
        }
        if !self.accept(b"64") {
            return Err(self.invalid("expected binary encoding 'b64'", "a binary encoding"));
        }
        let quote = self.open_quote()?;
        let body = self.parse_quoted(quote)?;
        decode_base64(&body)
            .map(LlsdValue::Binary)
            .map_err(|_| self.error("invalid base64 in binary value"))
    }

    fn parse_sized_string(&mut self) -> Result<String> {
        self.expect(b'(')?;
        let digits = self.take_while(|b| b.is_ascii_digit());
        let len: usize = digits
            .parse()
            .map_err(|_| self.invalid("invalid string length", "a string length"))?;
        self.expect(b')')?;
        let quote = self.open_quote()?;
        let Some(raw) = self.remaining().get(..len) else {
            return Err(Error::unexpected_eof(&format!("{} string bytes", len)));
        };
        let text = String::from_utf8_lossy(raw).into_owned();
        self.advance(len);
        self.expect(quote)?;
        Ok(text)
    }

    fn open_quote(&mut self) -> Result<u8> {
        match self.next_byte() {
            Some(q @ (b'"' | b'\'')) => Ok(q),
            Some(other) => Err(self.error(&format!("expected a quote, found '{}'", other as char))),
            None => Err(Error::unexpected_eof("a quote")),
        }
    }

    /// Reads up to the closing `quote`; the opening quote is already consumed.
    fn parse_quoted(&mut self, quote: u8) -> Result<String> {
        let mut bytes = Vec::new();
        loop {
            let Some(b) = self.next_byte() else {
                return Err(Error::unexpected_eof(&format!("closing {}", quote as char)));
            };
            if b == quote {
                break;
            }
            if b != b'\\' {
                bytes.push(b);
                continue;
            }
            let Some(escaped) = self.next_byte() else {
                return Err(Error::unexpected_eof("an escape sequence"));
            };
            bytes.push(match escaped {
                b'a' => 0x07,
                b'b' => 0x08,
                b'f' => 0x0C,
                b'n' => b'\n',
                b'r' => b'\r',
                b't' => b'\t',
                b'v' => 0x0B,
                b'x' => self.parse_hex_byte()?,
                other => other,
            });
        }
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn parse_hex_byte(&mut self) -> Result<u8> {
        let Some(raw) = self.remaining().get(..2) else {
            return Err(Error::unexpected_eof("two hex digits"));
        };
        let byte = std::str::from_utf8(raw)
            .ok()
            .and_then(|hex| u8::from_str_radix(hex, 16).ok())
            .ok_or_else(|| self.error("invalid \\x escape"))?;
        self.advance(2);
        Ok(byte)
    }

    fn parse_uri(&mut self) -> Result<LlsdValue> {
        let quote = self.open_quote()?;
        let text = self.parse_quoted(quote)?;
        if text.is_empty() {
            return Ok(LlsdValue::Uri(Uri::empty()));
        }
        Uri::parse(&text)
            .map(LlsdValue::Uri)
            .ok_or_else(|| self.error(&format!("invalid URI '{}'", text)))
    }

    fn parse_date(&mut self) -> Result<LlsdValue> {
        let quote = self.open_quote()?;
        let text = self.parse_quoted(quote)?;
        parse_date(&text)
            .map(LlsdValue::Date)
            .ok_or_else(|| self.error(&format!("invalid date '{}'", text)))
    }

    fn parse_array(&mut self) -> Result<LlsdValue> {
        self.depth.enter()?;
        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek_byte() {
                Some(b']') => {
                    self.next_byte();
                    break;
                }
                None => return Err(Error::unexpected_eof("']'")),
                Some(_) => {}
            }
            items.push(self.parse_value()?);
            if self.end_of_element(b']')? {
                break;
            }
        }
        self.depth.leave();
        Ok(LlsdValue::Array(items))
    }

    fn parse_map(&mut self) -> Result<LlsdValue> {
        self.depth.enter()?;
        let mut map = LlsdMap::new();
        loop {
            self.skip_whitespace();
            let key = match self.next_byte() {
                Some(b'}') => break,
                Some(q @ (b'\'' | b'"')) => self.parse_quoted(q)?,
                Some(b's') => self.parse_sized_string()?,
                Some(other) => {
                    return Err(self.error(&format!(
                        "map keys must be strings, found '{}'",
                        other as char
                    )))
                }
                None => return Err(Error::unexpected_eof("'}'")),
            };
            self.skip_whitespace();
            self.expect(b':')?;
            let value = self.parse_value()?;
            map.insert(key, value);
            if self.end_of_element(b'}')? {
                break;
            }
        }
        self.depth.leave();
        Ok(LlsdValue::Map(map))
    }

    /// Consumes `,` or `close`; returns `true` on `close`.
    fn end_of_element(&mut self, close: u8) -> Result<bool> {
        self.skip_whitespace();
        match self.next_byte() {
            Some(b',') => Ok(false),
            Some(b) if b == close => Ok(true),
            Some(other) => Err(self.error(&format!(
                "expected ',' or '{}', found '{}'",
                close as char,
                other as char
            ))),
            None => Err(Error::unexpected_eof(&format!("',' or '{}'", close as char))),
        }
    }
}
