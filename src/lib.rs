//! # serde_llsd
//!
//! LLSD (Linden Lab Structured Data) values and their three text encodings:
//! JSON, XML and Notation.
//!
//! ## What is LLSD?
//!
//! LLSD is the self-describing data model used by virtual-world protocols to
//! carry messages between viewers and simulators. A value is one of eleven
//! types: undefined, boolean, integer, real, string, UUID, date, URI, binary,
//! array and map. Peers are loosely typed, so every value converts to every
//! scalar type without failing (see [`LlsdValue`]).
//!
//! ## Key Features
//!
//! - **Dynamic values**: [`LlsdValue`] with total `as_*` conversions and the
//!   [`llsd!`] literal macro
//! - **Three encodings**: JSON ([`json`]), XML ([`xml`]) and Notation
//!   ([`notation`]), plus sniffing with [`from_slice_any`]
//! - **Serde Compatible**: [`to_value`] and [`from_value`] bridge any
//!   `#[derive(Serialize, Deserialize)]` type onto the value model
//! - **Bounded recursion**: every parser and serializer fails with
//!   [`Error::DepthLimit`] past [`DEFAULT_MAX_DEPTH`] levels of nesting
//!
//! ## Quick Start
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_llsd::{from_notation, to_notation};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Teleport {
//!     region: String,
//!     position: [f32; 3],
//!     flags: u32,
//! }
//!
//! let request = Teleport { region: "Ahern".into(), position: [128.0, 64.0, 22.5], flags: 16 };
//!
//! let text = to_notation(&request).unwrap();
//! assert_eq!(text, "{'region':'Ahern','position':[r128,r64,r22.5],'flags':i16}");
//!
//! let back: Teleport = from_notation(&text).unwrap();
//! assert_eq!(back, request);
//! ```
//!
//! ### Dynamic values
//!
//! ```rust
//! use serde_llsd::{from_str_any, llsd, to_json_string, JsonOptions};
//!
//! let value = from_str_any("<llsd><map><key>seed</key><uri>http://sim/cap/0</uri></map></llsd>").unwrap();
//! assert_eq!(value.get("seed").unwrap().as_string(), "http://sim/cap/0");
//!
//! let reply = llsd!({ "ok": true, "events": [] });
//! assert_eq!(
//!     to_json_string(&reply, &JsonOptions::omit_defaults()).unwrap(),
//!     r#"{"ok":true}"#
//! );
//! ```

pub mod de;
pub mod error;
pub mod format;
pub mod json;
pub mod json_writer;
pub mod macros;
pub mod map;
pub mod notation;
pub mod options;
pub mod pool;
pub mod ser;
pub mod text;
pub mod types;
pub mod value;
pub mod xml;

pub use de::ValueDeserializer;
pub use error::{Error, Result};
pub use format::{from_reader_any, from_slice_any, from_str_any, to_format_string, Format};
pub use json::{from_json_reader, from_json_slice, from_json_str, to_json_string, write_json};
pub use json_writer::JsonWriter;
pub use map::LlsdMap;
pub use notation::{
    from_notation_reader, from_notation_slice, from_notation_str, to_notation_string,
    to_notation_string_pretty, write_notation,
};
pub use options::{
    DefaultsMode, JsonOptions, NotationOptions, ParseOptions, XmlOptions, DEFAULT_MAX_DEPTH,
};
pub use pool::{to_writer_pooled, BufferPool, PooledBuffer};
pub use ser::ValueSerializer;
pub use types::{LlsdType, Uri, Uuid};
pub use value::LlsdValue;
pub use xml::{from_xml_reader, from_xml_slice, from_xml_str, to_xml_string, try_from_xml_str, write_xml};

/// Short alias for [`LlsdValue`].
pub type Value = LlsdValue;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io;

/// Convert any `T: Serialize` to an `LlsdValue`.
///
/// # Examples
///
/// ```rust
/// use serde_llsd::{to_value, LlsdValue};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let value = to_value(&Point { x: 1, y: 2 }).unwrap();
/// assert_eq!(value.get("y"), Some(&LlsdValue::Integer(2)));
/// ```
///
/// # Errors
///
/// Returns an error for map keys that are not strings and for integers
/// wider than 64 bits.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_value<T>(value: &T) -> Result<LlsdValue>
where
    T: ?Sized + Serialize,
{
    ser::value_of(value)
}

/// Interpret an `LlsdValue` as an instance of type `T`.
///
/// Scalars are converted with the value's `as_*` accessors, so numbers
/// sent as strings and booleans sent as integers are accepted.
///
/// # Errors
///
/// Returns an error when the shape of the value does not match `T`, such as
/// a missing struct field or an unknown enum variant.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_value<T>(value: LlsdValue) -> Result<T>
where
    T: DeserializeOwned,
{
    T::deserialize(ValueDeserializer::new(value))
}

/// Serialize any `T: Serialize` to compact JSON.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_json<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_json_with_options(value, &JsonOptions::new())
}

#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_json_with_options<T>(value: &T, options: &JsonOptions) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_json_string(&to_value(value)?, options)
}

/// Deserialize an instance of type `T` from JSON text.
///
/// # Examples
///
/// ```rust
/// use serde_llsd::from_json;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let point: Point = from_json(r#"{"x": 1, "y": "2"}"#).unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_json<T>(s: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    from_value(from_json_str(s)?)
}

/// Serialize any `T: Serialize` to an XML document with a declaration.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_xml<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_xml_string(&to_value(value)?, &XmlOptions::new())
}

/// Deserialize an instance of type `T` from an XML document.
///
/// Unlike [`from_xml_str`], structural errors are reported.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_xml<T>(s: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    from_value(try_from_xml_str(s)?)
}

/// Serialize any `T: Serialize` to compact Notation.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_notation<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_notation_string(&to_value(value)?)
}

#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_notation<T>(s: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    from_value(from_notation_str(s)?)
}

/// Serialize any `T: Serialize` to a writer in the given format.
///
/// # Examples
///
/// ```rust
/// use serde_llsd::{to_writer, Format};
///
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &vec![1, 2], Format::Json).unwrap();
/// assert_eq!(buffer, b"[1,2]");
/// ```
///
/// # Errors
///
/// Returns an error if serialization fails, the format is
/// [`Format::Binary`], or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(mut writer: W, value: &T, format: Format) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    let text = to_format_string(&to_value(value)?, format)?;
    writer.write_all(text.as_bytes())?;
    Ok(())
}

/// Deserialize an instance of type `T` from a seekable stream in any
/// supported encoding.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(reader: R) -> Result<T>
where
    R: io::Read + io::Seek,
    T: DeserializeOwned,
{
    from_value(from_reader_any(reader)?)
}
