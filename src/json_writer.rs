//! Streaming JSON writer with a validating state machine.
//!
//! [`JsonWriter`] appends JSON text to an in-memory buffer one token at a
//! time. Each nesting level tracks whether it is the document root, an
//! array, or an object, and whether an object is waiting for a property
//! name or for that property's value. Any call the grammar does not allow
//! in the current state fails immediately with [`Error::WriterState`], so
//! the buffer can never hold structurally invalid JSON.
//!
//! ## Examples
//!
//! ```rust
//! use serde_llsd::JsonWriter;
//!
//! let mut writer = JsonWriter::new();
//! writer.write_object_start().unwrap();
//! writer.write_property_name("pos").unwrap();
//! writer.write_array_start().unwrap();
//! writer.write_f64(1.0).unwrap();
//! writer.write_i32(2).unwrap();
//! writer.write_array_end().unwrap();
//! writer.write_object_end().unwrap();
//! assert_eq!(writer.as_str(), r#"{"pos":[1.0,2]}"#);
//!
//! // Closing an object that was never opened is rejected on the spot.
//! let mut bad = JsonWriter::new();
//! assert!(bad.write_object_end().is_err());
//! ```

use crate::text::format_real;
use crate::{Error, Result};
use std::fmt::Write as _;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Scope {
    Root,
    Array,
    Object,
}

#[derive(Clone, Copy, Debug)]
struct Context {
    scope: Scope,
    count: usize,
    /// Object only: a property name was written and its value is pending.
    expecting_value: bool,
    /// Object only: widest property name so far, for pretty alignment.
    padding: usize,
}

impl Context {
    fn new(scope: Scope) -> Self {
        Context {
            scope,
            count: 0,
            expecting_value: false,
            padding: 0,
        }
    }
}

/// Token-level JSON writer.
#[derive(Debug)]
pub struct JsonWriter {
    output: String,
    stack: Vec<Context>,
    complete: bool,
    pretty: bool,
    indent: usize,
}

impl Default for JsonWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::with_buffer(String::with_capacity(256))
    }

    /// Writes pretty-printed JSON with `indent` spaces per level.
    #[must_use]
    pub fn pretty(indent: usize) -> Self {
        let mut writer = Self::new();
        writer.pretty = true;
        writer.indent = indent;
        writer
    }

    /// Appends to an existing buffer, e.g. one taken from a
    /// [`BufferPool`](crate::BufferPool). Existing contents are kept.
    #[must_use]
    pub fn with_buffer(output: String) -> Self {
        JsonWriter {
            output,
            stack: vec![Context::new(Scope::Root)],
            complete: false,
            pretty: false,
            indent: 4,
        }
    }

    pub(crate) fn set_pretty(&mut self, pretty: bool, indent: usize) {
        self.pretty = pretty;
        self.indent = indent;
    }

    /// Clears the buffer and returns to the initial state.
    pub fn reset(&mut self) {
        self.output.clear();
        self.stack.clear();
        self.stack.push(Context::new(Scope::Root));
        self.complete = false;
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.output
    }

    /// Returns `true` once one complete JSON value has been written.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.output
    }

    pub fn write_null(&mut self) -> Result<()> {
        self.before_value()?;
        self.output.push_str("null");
        self.after_value();
        Ok(())
    }

    pub fn write_bool(&mut self, value: bool) -> Result<()> {
        self.before_value()?;
        self.output.push_str(if value { "true" } else { "false" });
        self.after_value();
        Ok(())
    }

    pub fn write_i32(&mut self, value: i32) -> Result<()> {
        self.write_i64(i64::from(value))
    }

    pub fn write_i64(&mut self, value: i64) -> Result<()> {
        self.before_value()?;
        let _ = write!(self.output, "{}", value);
        self.after_value();
        Ok(())
    }

    pub fn write_u64(&mut self, value: u64) -> Result<()> {
        self.before_value()?;
        let _ = write!(self.output, "{}", value);
        self.after_value();
        Ok(())
    }

    /// Writes a real so that it reads back as a real: integral values get a
    /// trailing `.0`. NaN and the infinities have no JSON form and are
    /// written as `null`.
    pub fn write_f64(&mut self, value: f64) -> Result<()> {
        if !value.is_finite() {
            return self.write_null();
        }
        self.before_value()?;
        let text = format_real(value);
        self.output.push_str(&text);
        if !text.contains(['.', 'E']) {
            self.output.push_str(".0");
        }
        self.after_value();
        Ok(())
    }

    pub fn write_str(&mut self, value: &str) -> Result<()> {
        self.before_value()?;
        write_escaped(&mut self.output, value);
        self.after_value();
        Ok(())
    }

    pub fn write_property_name(&mut self, name: &str) -> Result<()> {
        let top = self.top();
        if top.scope != Scope::Object {
            return Err(Error::writer_state("property name outside of an object"));
        }
        if top.expecting_value {
            return Err(Error::writer_state(
                "property name while a property value is expected",
            ));
        }

        let count = top.count;
        if count > 0 {
            self.output.push(',');
        }
        self.newline_indent(self.stack.len() - 1);
        write_escaped(&mut self.output, name);

        let width = name.chars().count();
        let mut pad = 0;
        if let Some(top) = self.stack.last_mut() {
            top.expecting_value = true;
            top.padding = top.padding.max(width);
            pad = top.padding - width + 1;
        }
        if self.pretty {
            self.output.extend(std::iter::repeat(' ').take(pad));
            self.output.push_str(": ");
        } else {
            self.output.push(':');
        }
        Ok(())
    }

    pub fn write_array_start(&mut self) -> Result<()> {
        self.before_value()?;
        self.output.push('[');
        self.stack.push(Context::new(Scope::Array));
        Ok(())
    }

    pub fn write_array_end(&mut self) -> Result<()> {
        if self.top().scope != Scope::Array {
            return Err(Error::writer_state("array end without matching array start"));
        }
        self.close(']');
        Ok(())
    }

    pub fn write_object_start(&mut self) -> Result<()> {
        self.before_value()?;
        self.output.push('{');
        self.stack.push(Context::new(Scope::Object));
        Ok(())
    }

    pub fn write_object_end(&mut self) -> Result<()> {
        let top = self.top();
        if top.scope != Scope::Object {
            return Err(Error::writer_state("object end without matching object start"));
        }
        if top.expecting_value {
            return Err(Error::writer_state(
                "object end while a property value is expected",
            ));
        }
        self.close('}');
        Ok(())
    }

    fn top(&self) -> Context {
        // The root context is never popped.
        self.stack.last().copied().unwrap_or(Context::new(Scope::Root))
    }

    /// Validates that a value may start here and writes its separator.
    fn before_value(&mut self) -> Result<()> {
        if self.complete {
            return Err(Error::writer_state(
                "a complete JSON value has already been written",
            ));
        }
        let top = self.top();
        match top.scope {
            Scope::Root => {}
            Scope::Object if !top.expecting_value => {
                return Err(Error::writer_state("value where a property name is expected"));
            }
            Scope::Object => {}
            Scope::Array => {
                if top.count > 0 {
                    self.output.push(',');
                }
                self.newline_indent(self.stack.len() - 1);
            }
        }
        Ok(())
    }

    fn after_value(&mut self) {
        match self.stack.last_mut() {
            Some(top) if top.scope == Scope::Array => top.count += 1,
            Some(top) if top.scope == Scope::Object => {
                top.expecting_value = false;
                top.count += 1;
            }
            _ => self.complete = true,
        }
    }

    fn close(&mut self, delimiter: char) {
        let closed = self.stack.pop().map_or(0, |c| c.count);
        if closed > 0 {
            self.newline_indent(self.stack.len() - 1);
        }
        self.output.push(delimiter);
        self.after_value();
    }

    fn newline_indent(&mut self, level: usize) {
        if self.pretty {
            self.output.push('\n');
            self.output
                .extend(std::iter::repeat(' ').take(level * self.indent));
        }
    }
}

/// Appends `value` as a quoted JSON string.
///
/// `\n \r \t \f \b`, quote and backslash use short escapes; everything
/// outside printable ASCII becomes `\uXXXX` per UTF-16 unit, upper-case hex.
pub(crate) fn write_escaped(out: &mut String, value: &str) {
    out.push('"');
    for unit in value.encode_utf16() {
        match unit {
            0x0A => out.push_str("\\n"),
            0x0D => out.push_str("\\r"),
            0x09 => out.push_str("\\t"),
            0x0C => out.push_str("\\f"),
            0x08 => out.push_str("\\b"),
            0x22 => out.push_str("\\\""),
            0x5C => out.push_str("\\\\"),
            32..=126 => out.push(char::from(unit as u8)),
            _ => {
                let _ = write!(out, "\\u{:04X}", unit);
            }
        }
    }
    out.push('"');
}
