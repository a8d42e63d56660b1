//! JSON encoding of LLSD values.
//!
//! Serialization has two routes that produce identical text:
//!
//! - the fast path ([`write_json`], [`to_json_string`]) walks the value tree
//!   straight into a [`JsonWriter`];
//! - the tree path ([`to_json_tree`]) builds an ordered
//!   [`serde_json::Value`] first, for callers that want to inspect or merge
//!   JSON before writing it with [`write_json_tree`].
//!
//! Parsing always goes through the ordered tree, then [`from_json_tree`]
//! maps each node onto the value model.
//!
//! ## Type mapping
//!
//! | LLSD | JSON |
//! |------|------|
//! | `Undefined` | `null` |
//! | `Boolean` | `true` / `false` |
//! | `Integer` | integer literal |
//! | `Real` | number with `.` or `E` (`3.0`, never `3`) |
//! | `String`, `Uuid`, `Date`, `Uri` | string |
//! | `Binary` | array of byte values |
//! | `Array` / `Map` | array / object |
//!
//! Reading maps back: an empty JSON string becomes `Undefined`; integer
//! literals outside `i32` become 8-byte big-endian `Binary` (see
//! [`LlsdValue::from_long`]) or `Real` when they exceed 64 bits.
//!
//! ## Examples
//!
//! ```rust
//! use serde_llsd::{from_json_str, llsd, to_json_string, JsonOptions, LlsdValue};
//!
//! let value = llsd!({ "region": "Ahern", "pos": [128.0, 64, 22.5] });
//! let json = to_json_string(&value, &JsonOptions::new()).unwrap();
//! assert_eq!(json, r#"{"region":"Ahern","pos":[128.0,64,22.5]}"#);
//!
//! assert_eq!(from_json_str(&json).unwrap(), value);
//! assert_eq!(from_json_str(r#""""#).unwrap(), LlsdValue::Undefined);
//! ```

use crate::json_writer::JsonWriter;
use crate::options::{DefaultsMode, DepthGuard, JsonOptions, ParseOptions};
use crate::{Error, LlsdMap, LlsdValue, Result};
use serde::Deserialize;
use serde_json::{Map as JsonMap, Number as JsonNumber, Value as JsonValue};
use std::io;

/// Serializes `value` to a JSON string.
///
/// # Errors
///
/// Fails only when nesting exceeds `options.max_depth`.
pub fn to_json_string(value: &LlsdValue, options: &JsonOptions) -> Result<String> {
    let mut out = String::with_capacity(256);
    write_json(&mut out, value, options)?;
    Ok(out)
}

pub fn to_json_vec(value: &LlsdValue, options: &JsonOptions) -> Result<Vec<u8>> {
    to_json_string(value, options).map(String::into_bytes)
}

/// Appends the JSON form of `value` to `out` without building a tree.
///
/// On error `out` keeps whatever was written before the failure.
pub fn write_json(out: &mut String, value: &LlsdValue, options: &JsonOptions) -> Result<()> {
    let mut writer = JsonWriter::with_buffer(std::mem::take(out));
    writer.set_pretty(options.pretty, options.indent);
    let mut guard = DepthGuard::new(options.max_depth);
    let result = write_value(&mut writer, value, options.defaults, &mut guard);
    *out = writer.into_inner();
    result
}

fn write_value(
    writer: &mut JsonWriter,
    value: &LlsdValue,
    defaults: DefaultsMode,
    guard: &mut DepthGuard,
) -> Result<()> {
    match value {
        LlsdValue::Undefined => writer.write_null(),
        LlsdValue::Boolean(b) => writer.write_bool(*b),
        LlsdValue::Integer(i) => writer.write_i32(*i),
        LlsdValue::Real(r) => writer.write_f64(*r),
        LlsdValue::String(s) => writer.write_str(s),
        LlsdValue::Uuid(_) | LlsdValue::Date(_) | LlsdValue::Uri(_) => {
            writer.write_str(&value.as_string())
        }
        LlsdValue::Binary(bytes) => {
            writer.write_array_start()?;
            for b in bytes {
                writer.write_i32(i32::from(*b))?;
            }
            writer.write_array_end()
        }
        LlsdValue::Array(arr) => {
            guard.enter()?;
            writer.write_array_start()?;
            for element in arr {
                write_value(writer, element, defaults, guard)?;
            }
            writer.write_array_end()?;
            guard.leave();
            Ok(())
        }
        LlsdValue::Map(map) => {
            guard.enter()?;
            writer.write_object_start()?;
            for (key, element) in map.iter() {
                if !defaults.preserves() && element.is_default() {
                    continue;
                }
                writer.write_property_name(key)?;
                write_value(writer, element, defaults, guard)?;
            }
            writer.write_object_end()?;
            guard.leave();
            Ok(())
        }
    }
}

/// Builds the ordered JSON tree for `value`.
///
/// # Examples
///
/// ```rust
/// use serde_llsd::{json::to_json_tree, llsd, DefaultsMode};
///
/// let value = llsd!({ "on": false, "bytes": (vec![1u8, 2]) });
/// let tree = to_json_tree(&value, DefaultsMode::Omit).unwrap();
/// assert_eq!(tree, serde_json::json!({ "bytes": [1, 2] }));
/// ```
pub fn to_json_tree(value: &LlsdValue, defaults: DefaultsMode) -> Result<JsonValue> {
    let mut guard = DepthGuard::new(crate::options::DEFAULT_MAX_DEPTH);
    build_tree(value, defaults, &mut guard)
}

fn build_tree(value: &LlsdValue, defaults: DefaultsMode, guard: &mut DepthGuard) -> Result<JsonValue> {
    Ok(match value {
        LlsdValue::Undefined => JsonValue::Null,
        LlsdValue::Boolean(b) => JsonValue::Bool(*b),
        LlsdValue::Integer(i) => JsonValue::Number(JsonNumber::from(*i)),
        LlsdValue::Real(r) => JsonNumber::from_f64(*r).map_or(JsonValue::Null, JsonValue::Number),
        LlsdValue::String(s) => JsonValue::String(s.clone()),
        LlsdValue::Uuid(_) | LlsdValue::Date(_) | LlsdValue::Uri(_) => {
            JsonValue::String(value.as_string())
        }
        LlsdValue::Binary(bytes) => JsonValue::Array(
            bytes
                .iter()
                .map(|b| JsonValue::Number(JsonNumber::from(*b)))
                .collect(),
        ),
        LlsdValue::Array(arr) => {
            guard.enter()?;
            let items = arr
                .iter()
                .map(|v| build_tree(v, defaults, guard))
                .collect::<Result<Vec<_>>>()?;
            guard.leave();
            JsonValue::Array(items)
        }
        LlsdValue::Map(map) => {
            guard.enter()?;
            let mut object = JsonMap::with_capacity(map.len());
            for (key, element) in map.iter() {
                if !defaults.preserves() && element.is_default() {
                    continue;
                }
                object.insert(key.clone(), build_tree(element, defaults, guard)?);
            }
            guard.leave();
            JsonValue::Object(object)
        }
    })
}

/// Writes a JSON tree through `writer`, applying this crate's escaping and
/// real formatting.
pub fn write_json_tree(writer: &mut JsonWriter, tree: &JsonValue) -> Result<()> {
    match tree {
        JsonValue::Null => writer.write_null(),
        JsonValue::Bool(b) => writer.write_bool(*b),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                writer.write_i64(i)
            } else if let Some(u) = n.as_u64() {
                writer.write_u64(u)
            } else {
                writer.write_f64(n.as_f64().unwrap_or(0.0))
            }
        }
        JsonValue::String(s) => writer.write_str(s),
        JsonValue::Array(items) => {
            writer.write_array_start()?;
            for item in items {
                write_json_tree(writer, item)?;
            }
            writer.write_array_end()
        }
        JsonValue::Object(object) => {
            writer.write_object_start()?;
            for (key, item) in object {
                writer.write_property_name(key)?;
                write_json_tree(writer, item)?;
            }
            writer.write_object_end()
        }
    }
}

/// Maps an ordered JSON tree onto the value model.
pub fn from_json_tree(tree: &JsonValue) -> Result<LlsdValue> {
    let mut guard = DepthGuard::new(crate::options::DEFAULT_MAX_DEPTH);
    map_tree(tree, &mut guard)
}

fn map_tree(tree: &JsonValue, guard: &mut DepthGuard) -> Result<LlsdValue> {
    Ok(match tree {
        JsonValue::Null => LlsdValue::Undefined,
        JsonValue::Bool(b) => LlsdValue::Boolean(*b),
        JsonValue::Number(n) => map_number(n),
        JsonValue::String(s) if s.is_empty() => LlsdValue::Undefined,
        JsonValue::String(s) => LlsdValue::String(s.clone()),
        JsonValue::Array(items) => {
            guard.enter()?;
            let values = items
                .iter()
                .map(|item| map_tree(item, guard))
                .collect::<Result<Vec<_>>>()?;
            guard.leave();
            LlsdValue::Array(values)
        }
        JsonValue::Object(object) => {
            guard.enter()?;
            let mut map = LlsdMap::with_capacity(object.len());
            for (key, item) in object {
                map.insert(key.clone(), map_tree(item, guard)?);
            }
            guard.leave();
            LlsdValue::Map(map)
        }
    })
}

fn map_number(n: &JsonNumber) -> LlsdValue {
    if let Some(i) = n.as_i64() {
        i32::try_from(i).map_or_else(|_| LlsdValue::from_long(i), LlsdValue::Integer)
    } else if let Some(u) = n.as_u64() {
        LlsdValue::from_u_long(u)
    } else {
        LlsdValue::Real(n.as_f64().unwrap_or(0.0))
    }
}

/// Parses JSON text into a value.
///
/// # Errors
///
/// Returns [`Error::Syntax`] with the line and column of malformed input,
/// [`Error::UnexpectedEof`] for truncated input, and [`Error::DepthLimit`]
/// when nesting exceeds the default bound.
pub fn from_json_str(s: &str) -> Result<LlsdValue> {
    from_json_str_with_options(s, &ParseOptions::default())
}

/// Parses JSON text, bounding nesting at `options.max_depth`.
pub fn from_json_str_with_options(s: &str, options: &ParseOptions) -> Result<LlsdValue> {
    from_json_slice_with_options(s.as_bytes(), options)
}

pub fn from_json_slice(v: &[u8]) -> Result<LlsdValue> {
    from_json_slice_with_options(v, &ParseOptions::default())
}

pub fn from_json_slice_with_options(v: &[u8], options: &ParseOptions) -> Result<LlsdValue> {
    check_nesting(v, options.max_depth)?;
    let mut de = serde_json::Deserializer::from_slice(v);
    // Nesting is already bounded by `check_nesting`, which honors limits above 128.
    de.disable_recursion_limit();
    let tree = JsonValue::deserialize(&mut de).map_err(map_json_error)?;
    de.end().map_err(map_json_error)?;

    let mut guard = DepthGuard::new(options.max_depth);
    map_tree(&tree, &mut guard)
}

pub fn from_json_reader<R: io::Read>(mut reader: R) -> Result<LlsdValue> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    from_json_slice(&buf)
}

/// Fails once brackets outside string literals nest deeper than `limit`.
fn check_nesting(v: &[u8], limit: usize) -> Result<()> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for &b in v {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'[' | b'{' => {
                depth += 1;
                if depth > limit {
                    return Err(Error::depth_limit(limit));
                }
            }
            b']' | b'}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    Ok(())
}

fn map_json_error(err: serde_json::Error) -> Error {
    use serde_json::error::Category;
    match err.classify() {
        Category::Eof => Error::unexpected_eof("a complete JSON value"),
        Category::Io => Error::io(&err.to_string()),
        Category::Syntax | Category::Data => Error::syntax(err.line(), err.column(), &err.to_string()),
    }
}
