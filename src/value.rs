//! Dynamic value representation for LLSD data.
//!
//! [`LlsdValue`] is a closed tagged union over the eleven LLSD types. Every
//! `as_*` accessor is *total*: it never fails and never panics. When a
//! variant cannot supply the requested type the accessor returns that type's
//! default (`false`, `0`, `0.0`, `""`, the nil UUID, the Unix epoch, no URI,
//! or empty bytes).
//!
//! ## Creating Values
//!
//! ```rust
//! use serde_llsd::{llsd, LlsdValue, Uuid};
//!
//! let flag = LlsdValue::from_boolean(true);
//! let id = LlsdValue::from_uuid(Uuid::nil());
//! let msg = llsd!({ "agent": "Alice", "count": 3 });
//!
//! assert!(flag.is_boolean());
//! assert!(id.is_uuid());
//! assert!(msg.is_map());
//! ```
//!
//! ## Converting Values
//!
//! ```rust
//! use serde_llsd::LlsdValue;
//!
//! let text = LlsdValue::from("42.7");
//! assert_eq!(text.as_integer(), 42);
//! assert_eq!(text.as_real(), 42.7);
//! assert!(text.as_boolean());
//!
//! let real = LlsdValue::from_real(2.5);
//! assert_eq!(real.as_integer(), 2); // ties round to even
//! assert_eq!(real.as_string(), "2.5");
//! ```

use crate::options::JsonOptions;
use crate::text::{self, epoch};
use crate::types::{LlsdType, Uri, Uuid};
use crate::LlsdMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A dynamically-typed LLSD value.
///
/// # Examples
///
/// ```rust
/// use serde_llsd::{LlsdValue, LlsdType};
///
/// let value = LlsdValue::Integer(7);
/// assert_eq!(value.llsd_type(), LlsdType::Integer);
/// assert_eq!(value.as_string(), "7");
/// assert_eq!(value.as_binary(), vec![0, 0, 0, 7]);
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub enum LlsdValue {
    #[default]
    Undefined,
    Boolean(bool),
    Integer(i32),
    Real(f64),
    String(String),
    Uuid(Uuid),
    Date(DateTime<Utc>),
    Uri(Uri),
    Binary(Vec<u8>),
    Array(Vec<LlsdValue>),
    Map(LlsdMap),
}

impl LlsdValue {
    #[must_use]
    pub fn from_boolean(value: bool) -> Self {
        LlsdValue::Boolean(value)
    }

    #[must_use]
    pub fn from_integer(value: i32) -> Self {
        LlsdValue::Integer(value)
    }

    /// Stores an unsigned 32-bit integer by reinterpreting its bits as `i32`.
    ///
    /// `as_u_integer` recovers the original value.
    #[must_use]
    pub fn from_u_integer(value: u32) -> Self {
        LlsdValue::Integer(value as i32)
    }

    /// Stores a 64-bit integer as 8 big-endian bytes, the only lossless
    /// carriage LLSD has for it. `as_long` recovers the original value.
    #[must_use]
    pub fn from_long(value: i64) -> Self {
        LlsdValue::Binary(value.to_be_bytes().to_vec())
    }

    /// Stores an unsigned 64-bit integer as 8 big-endian bytes.
    #[must_use]
    pub fn from_u_long(value: u64) -> Self {
        LlsdValue::Binary(value.to_be_bytes().to_vec())
    }

    #[must_use]
    pub fn from_real(value: f64) -> Self {
        LlsdValue::Real(value)
    }

    #[must_use]
    pub fn from_string(value: impl Into<String>) -> Self {
        LlsdValue::String(value.into())
    }

    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        LlsdValue::Uuid(value)
    }

    #[must_use]
    pub fn from_date(value: DateTime<Utc>) -> Self {
        LlsdValue::Date(value)
    }

    #[must_use]
    pub fn from_uri(value: Uri) -> Self {
        LlsdValue::Uri(value)
    }

    #[must_use]
    pub fn from_binary(value: impl Into<Vec<u8>>) -> Self {
        LlsdValue::Binary(value.into())
    }

    #[must_use]
    pub fn from_array(value: Vec<LlsdValue>) -> Self {
        LlsdValue::Array(value)
    }

    #[must_use]
    pub fn from_map(value: LlsdMap) -> Self {
        LlsdValue::Map(value)
    }

    #[must_use]
    pub const fn llsd_type(&self) -> LlsdType {
        match self {
            LlsdValue::Undefined => LlsdType::Undefined,
            LlsdValue::Boolean(_) => LlsdType::Boolean,
            LlsdValue::Integer(_) => LlsdType::Integer,
            LlsdValue::Real(_) => LlsdType::Real,
            LlsdValue::String(_) => LlsdType::String,
            LlsdValue::Uuid(_) => LlsdType::Uuid,
            LlsdValue::Date(_) => LlsdType::Date,
            LlsdValue::Uri(_) => LlsdType::Uri,
            LlsdValue::Binary(_) => LlsdType::Binary,
            LlsdValue::Array(_) => LlsdType::Array,
            LlsdValue::Map(_) => LlsdType::Map,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_undefined(&self) -> bool {
        matches!(self, LlsdValue::Undefined)
    }

    #[inline]
    #[must_use]
    pub const fn is_boolean(&self) -> bool {
        matches!(self, LlsdValue::Boolean(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, LlsdValue::Integer(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_real(&self) -> bool {
        matches!(self, LlsdValue::Real(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, LlsdValue::String(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_uuid(&self) -> bool {
        matches!(self, LlsdValue::Uuid(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_date(&self) -> bool {
        matches!(self, LlsdValue::Date(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_uri(&self) -> bool {
        matches!(self, LlsdValue::Uri(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_binary(&self) -> bool {
        matches!(self, LlsdValue::Binary(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, LlsdValue::Array(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_map(&self) -> bool {
        matches!(self, LlsdValue::Map(_))
    }

    /// Structural copy: a fresh container spine, leaves cloned.
    #[must_use]
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Returns `true` when the value equals its type's zero or empty default.
    ///
    /// This decides which map entries the JSON omit-defaults mode drops:
    /// `false`, `0`, `0.0`, empty strings, binaries, arrays and maps, and
    /// the nil UUID and the empty URI. `Undefined` and dates never count as
    /// defaults.
    #[must_use]
    pub fn is_default(&self) -> bool {
        match self {
            LlsdValue::Boolean(b) => !*b,
            LlsdValue::Integer(i) => *i == 0,
            LlsdValue::Real(r) => *r == 0.0,
            LlsdValue::String(s) => s.is_empty(),
            LlsdValue::Uuid(u) => u.is_nil(),
            LlsdValue::Binary(b) => b.is_empty(),
            LlsdValue::Array(a) => a.is_empty(),
            LlsdValue::Map(m) => m.is_empty(),
            LlsdValue::Uri(u) => u.is_empty(),
            LlsdValue::Undefined | LlsdValue::Date(_) => false,
        }
    }

    /// Truthiness of the value.
    ///
    /// Strings are `false` only when empty, `"0"` or `"false"` in any case.
    #[must_use]
    pub fn as_boolean(&self) -> bool {
        match self {
            LlsdValue::Boolean(b) => *b,
            LlsdValue::Integer(i) => *i != 0,
            LlsdValue::Real(r) => !r.is_nan() && *r != 0.0,
            LlsdValue::String(s) => !(s.is_empty() || s == "0" || s.eq_ignore_ascii_case("false")),
            LlsdValue::Uuid(u) => !u.is_nil(),
            LlsdValue::Array(a) => !a.is_empty(),
            LlsdValue::Map(m) => !m.is_empty(),
            LlsdValue::Undefined
            | LlsdValue::Date(_)
            | LlsdValue::Uri(_)
            | LlsdValue::Binary(_) => false,
        }
    }

    /// Signed 32-bit view of the value.
    ///
    /// Reals round half to even and clamp; strings parse as reals and floor;
    /// binaries and arrays read their first 4 bytes big-endian; dates give
    /// Unix seconds.
    #[must_use]
    pub fn as_integer(&self) -> i32 {
        match self {
            LlsdValue::Boolean(b) => i32::from(*b),
            LlsdValue::Integer(i) => *i,
            // `as` saturates at the target bounds and maps NaN to 0.
            LlsdValue::Real(r) => r.round_ties_even() as i32,
            LlsdValue::String(s) => floor_parsed(s) as i32,
            LlsdValue::Binary(b) => leading_bytes::<4>(b).map_or(0, i32::from_be_bytes),
            LlsdValue::Array(a) => leading_elements::<4>(a).map_or(0, i32::from_be_bytes),
            LlsdValue::Date(d) => d.timestamp().clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32,
            _ => 0,
        }
    }

    /// Unsigned 32-bit view; integers are reinterpreted, reals clamp at 0.
    #[must_use]
    pub fn as_u_integer(&self) -> u32 {
        match self {
            LlsdValue::Boolean(b) => u32::from(*b),
            LlsdValue::Integer(i) => *i as u32,
            LlsdValue::Real(r) => r.round_ties_even() as u32,
            LlsdValue::String(s) => floor_parsed(s) as u32,
            LlsdValue::Binary(b) => leading_bytes::<4>(b).map_or(0, u32::from_be_bytes),
            LlsdValue::Array(a) => leading_elements::<4>(a).map_or(0, u32::from_be_bytes),
            LlsdValue::Date(d) => d.timestamp().clamp(0, i64::from(u32::MAX)) as u32,
            _ => 0,
        }
    }

    /// Signed 64-bit view; binaries and arrays read their first 8 bytes.
    #[must_use]
    pub fn as_long(&self) -> i64 {
        match self {
            LlsdValue::Boolean(b) => i64::from(*b),
            LlsdValue::Integer(i) => i64::from(*i),
            LlsdValue::Real(r) => r.round_ties_even() as i64,
            LlsdValue::String(s) => floor_parsed(s) as i64,
            LlsdValue::Binary(b) => leading_bytes::<8>(b).map_or(0, i64::from_be_bytes),
            LlsdValue::Array(a) => leading_elements::<8>(a).map_or(0, i64::from_be_bytes),
            LlsdValue::Date(d) => d.timestamp(),
            _ => 0,
        }
    }

    /// Unsigned 64-bit view; negative integers are sign-extended then reinterpreted.
    #[must_use]
    pub fn as_u_long(&self) -> u64 {
        match self {
            LlsdValue::Boolean(b) => u64::from(*b),
            LlsdValue::Integer(i) => i64::from(*i) as u64,
            LlsdValue::Real(r) => r.round_ties_even() as u64,
            LlsdValue::String(s) => floor_parsed(s) as u64,
            LlsdValue::Binary(b) => leading_bytes::<8>(b).map_or(0, u64::from_be_bytes),
            LlsdValue::Array(a) => leading_elements::<8>(a).map_or(0, u64::from_be_bytes),
            LlsdValue::Date(d) => d.timestamp().max(0) as u64,
            _ => 0,
        }
    }

    #[must_use]
    pub fn as_real(&self) -> f64 {
        match self {
            LlsdValue::Boolean(b) => f64::from(u8::from(*b)),
            LlsdValue::Integer(i) => f64::from(*i),
            LlsdValue::Real(r) => *r,
            LlsdValue::String(s) => text::parse_real(s).unwrap_or(0.0),
            _ => 0.0,
        }
    }

    /// Text form of the value.
    ///
    /// Booleans become `"1"`/`"0"`, binaries base64, containers compact JSON
    /// with every map entry kept.
    #[must_use]
    pub fn as_string(&self) -> String {
        match self {
            LlsdValue::Undefined => String::new(),
            LlsdValue::Boolean(b) => if *b { "1" } else { "0" }.to_string(),
            LlsdValue::Integer(i) => i.to_string(),
            LlsdValue::Real(r) => text::format_real(*r),
            LlsdValue::String(s) => s.clone(),
            LlsdValue::Uuid(u) => u.to_string(),
            LlsdValue::Date(d) => text::format_date(d),
            LlsdValue::Uri(u) => u.as_str().to_string(),
            LlsdValue::Binary(b) => text::encode_base64(b),
            LlsdValue::Array(_) | LlsdValue::Map(_) => {
                crate::json::to_json_string(self, &JsonOptions::new()).unwrap_or_default()
            }
        }
    }

    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        match self {
            LlsdValue::String(s) => Uuid::parse_str(s).unwrap_or_default(),
            LlsdValue::Uuid(u) => *u,
            _ => Uuid::nil(),
        }
    }

    /// Date view; anything that is not a date or a parseable string gives the epoch.
    ///
    /// A UUID also yields the epoch: it carries no instant to report.
    #[must_use]
    pub fn as_date(&self) -> DateTime<Utc> {
        match self {
            LlsdValue::String(s) => text::parse_date(s).unwrap_or_else(epoch),
            LlsdValue::Date(d) => *d,
            _ => epoch(),
        }
    }

    /// URI view; `None` means "no URI".
    #[must_use]
    pub fn as_uri(&self) -> Option<Uri> {
        match self {
            LlsdValue::String(s) => Uri::parse(s),
            LlsdValue::Uri(u) if !u.is_empty() => Some(u.clone()),
            _ => None,
        }
    }

    /// Byte view of the value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_llsd::LlsdValue;
    ///
    /// assert_eq!(LlsdValue::from(true).as_binary(), b"1");
    /// assert_eq!(LlsdValue::from(258).as_binary(), vec![0, 0, 1, 2]);
    /// assert_eq!(LlsdValue::from("hi").as_binary(), b"hi");
    /// ```
    #[must_use]
    pub fn as_binary(&self) -> Vec<u8> {
        match self {
            LlsdValue::Boolean(b) => vec![if *b { b'1' } else { b'0' }],
            LlsdValue::Integer(i) => i.to_be_bytes().to_vec(),
            LlsdValue::Real(r) => r.to_be_bytes().to_vec(),
            LlsdValue::String(s) => s.as_bytes().to_vec(),
            LlsdValue::Uuid(u) => u.as_bytes().to_vec(),
            LlsdValue::Date(d) => text::unix_seconds(d).to_be_bytes().to_vec(),
            LlsdValue::Uri(u) => u.as_str().as_bytes().to_vec(),
            LlsdValue::Binary(b) => b.clone(),
            LlsdValue::Array(a) => a.iter().map(|v| v.as_integer() as u8).collect(),
            LlsdValue::Map(m) => m.values().map(|v| v.as_integer() as u8).collect(),
            LlsdValue::Undefined => Vec::new(),
        }
    }

    /// If the value is a string, returns a reference to it.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            LlsdValue::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&Vec<LlsdValue>> {
        match self {
            LlsdValue::Array(arr) => Some(arr),
            _ => None,
        }
    }

    #[inline]
    pub fn as_array_mut(&mut self) -> Option<&mut Vec<LlsdValue>> {
        match self {
            LlsdValue::Array(arr) => Some(arr),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_map(&self) -> Option<&LlsdMap> {
        match self {
            LlsdValue::Map(map) => Some(map),
            _ => None,
        }
    }

    #[inline]
    pub fn as_map_mut(&mut self) -> Option<&mut LlsdMap> {
        match self {
            LlsdValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Looks up `key` when the value is a map.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&LlsdValue> {
        self.as_map().and_then(|m| m.get(key))
    }
}

fn floor_parsed(s: &str) -> f64 {
    text::parse_real(s).map_or(0.0, f64::floor)
}

fn leading_bytes<const N: usize>(bytes: &[u8]) -> Option<[u8; N]> {
    bytes.get(..N)?.try_into().ok()
}

fn leading_elements<const N: usize>(values: &[LlsdValue]) -> Option<[u8; N]> {
    let head = values.get(..N)?;
    let mut out = [0u8; N];
    for (slot, v) in out.iter_mut().zip(head) {
        *slot = v.as_integer() as u8;
    }
    Some(out)
}

impl fmt::Display for LlsdValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_string())
    }
}

impl Serialize for LlsdValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            LlsdValue::Undefined => serializer.serialize_unit(),
            LlsdValue::Boolean(b) => serializer.serialize_bool(*b),
            LlsdValue::Integer(i) => serializer.serialize_i32(*i),
            LlsdValue::Real(r) => serializer.serialize_f64(*r),
            LlsdValue::String(s) => serializer.serialize_str(s),
            LlsdValue::Uuid(u) => serializer.collect_str(u),
            LlsdValue::Date(d) => serializer.serialize_str(&text::format_date(d)),
            LlsdValue::Uri(u) => serializer.serialize_str(u.as_str()),
            LlsdValue::Binary(b) => serializer.serialize_bytes(b),
            LlsdValue::Array(arr) => {
                use serde::ser::SerializeSeq;
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for element in arr {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            LlsdValue::Map(map) => {
                use serde::ser::SerializeMap;
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map.iter() {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for LlsdValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct LlsdValueVisitor;

        impl<'de> Visitor<'de> for LlsdValueVisitor {
            type Value = LlsdValue;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any valid LLSD value")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E> {
                Ok(LlsdValue::Boolean(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E> {
                Ok(i32::try_from(value).map_or_else(|_| LlsdValue::from_long(value), LlsdValue::Integer))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E> {
                Ok(i32::try_from(value).map_or_else(|_| LlsdValue::from_u_long(value), LlsdValue::Integer))
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E> {
                Ok(LlsdValue::Real(value))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E> {
                Ok(LlsdValue::String(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E> {
                Ok(LlsdValue::String(value))
            }

            fn visit_bytes<E>(self, value: &[u8]) -> Result<Self::Value, E> {
                Ok(LlsdValue::Binary(value.to_vec()))
            }

            fn visit_byte_buf<E>(self, value: Vec<u8>) -> Result<Self::Value, E> {
                Ok(LlsdValue::Binary(value))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(LlsdValue::Undefined)
            }

            fn visit_none<E>(self) -> Result<Self::Value, E> {
                Ok(LlsdValue::Undefined)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut vec = Vec::with_capacity(seq.size_hint().unwrap_or(0).min(4096));
                while let Some(elem) = seq.next_element()? {
                    vec.push(elem);
                }
                Ok(LlsdValue::Array(vec))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut values = LlsdMap::new();
                while let Some((key, value)) = map.next_entry::<String, LlsdValue>()? {
                    values.insert(key, value);
                }
                Ok(LlsdValue::Map(values))
            }
        }

        deserializer.deserialize_any(LlsdValueVisitor)
    }
}

// From implementations for the lossless primitive conversions
impl From<bool> for LlsdValue {
    fn from(value: bool) -> Self {
        LlsdValue::Boolean(value)
    }
}

impl From<i8> for LlsdValue {
    fn from(value: i8) -> Self {
        LlsdValue::Integer(i32::from(value))
    }
}

impl From<i16> for LlsdValue {
    fn from(value: i16) -> Self {
        LlsdValue::Integer(i32::from(value))
    }
}

impl From<i32> for LlsdValue {
    fn from(value: i32) -> Self {
        LlsdValue::Integer(value)
    }
}

impl From<u8> for LlsdValue {
    fn from(value: u8) -> Self {
        LlsdValue::Integer(i32::from(value))
    }
}

impl From<u16> for LlsdValue {
    fn from(value: u16) -> Self {
        LlsdValue::Integer(i32::from(value))
    }
}

impl From<f32> for LlsdValue {
    fn from(value: f32) -> Self {
        LlsdValue::Real(f64::from(value))
    }
}

impl From<f64> for LlsdValue {
    fn from(value: f64) -> Self {
        LlsdValue::Real(value)
    }
}

impl From<String> for LlsdValue {
    fn from(value: String) -> Self {
        LlsdValue::String(value)
    }
}

impl From<&str> for LlsdValue {
    fn from(value: &str) -> Self {
        LlsdValue::String(value.to_string())
    }
}

impl From<Uuid> for LlsdValue {
    fn from(value: Uuid) -> Self {
        LlsdValue::Uuid(value)
    }
}

impl From<DateTime<Utc>> for LlsdValue {
    fn from(value: DateTime<Utc>) -> Self {
        LlsdValue::Date(value)
    }
}

impl From<Uri> for LlsdValue {
    fn from(value: Uri) -> Self {
        LlsdValue::Uri(value)
    }
}

impl From<Vec<u8>> for LlsdValue {
    fn from(value: Vec<u8>) -> Self {
        LlsdValue::Binary(value)
    }
}

impl From<&[u8]> for LlsdValue {
    fn from(value: &[u8]) -> Self {
        LlsdValue::Binary(value.to_vec())
    }
}

impl From<Vec<LlsdValue>> for LlsdValue {
    fn from(value: Vec<LlsdValue>) -> Self {
        LlsdValue::Array(value)
    }
}

impl From<LlsdMap> for LlsdValue {
    fn from(value: LlsdMap) -> Self {
        LlsdValue::Map(value)
    }
}

impl<T: Into<LlsdValue>> From<Option<T>> for LlsdValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(LlsdValue::Undefined, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_map() -> LlsdMap {
        let mut map = LlsdMap::new();
        map.insert("a".to_string(), LlsdValue::Integer(1));
        map.insert("b".to_string(), LlsdValue::Integer(2));
        map
    }

    #[test]
    fn test_as_boolean_matrix() {
        assert!(!LlsdValue::Undefined.as_boolean());
        assert!(LlsdValue::Integer(-3).as_boolean());
        assert!(!LlsdValue::Integer(0).as_boolean());
        assert!(!LlsdValue::Real(f64::NAN).as_boolean());
        assert!(LlsdValue::Real(0.5).as_boolean());
        assert!(!LlsdValue::from("").as_boolean());
        assert!(!LlsdValue::from("0").as_boolean());
        assert!(!LlsdValue::from("FaLsE").as_boolean());
        assert!(LlsdValue::from("no").as_boolean());
        assert!(!LlsdValue::Uuid(Uuid::nil()).as_boolean());
        assert!(LlsdValue::Uuid(Uuid::from_bytes([1; 16])).as_boolean());
        assert!(!LlsdValue::Array(vec![]).as_boolean());
        assert!(LlsdValue::Map(sample_map()).as_boolean());
        assert!(!LlsdValue::Binary(vec![1]).as_boolean());
    }

    #[test]
    fn test_as_integer_real_rounding_and_clamp() {
        assert_eq!(LlsdValue::Real(2.5).as_integer(), 2);
        assert_eq!(LlsdValue::Real(3.5).as_integer(), 4);
        assert_eq!(LlsdValue::Real(-2.6).as_integer(), -3);
        assert_eq!(LlsdValue::Real(1e12).as_integer(), i32::MAX);
        assert_eq!(LlsdValue::Real(-1e12).as_integer(), i32::MIN);
        assert_eq!(LlsdValue::Real(f64::NAN).as_integer(), 0);
        assert_eq!(LlsdValue::Real(-5.0).as_u_integer(), 0);
        assert_eq!(LlsdValue::Real(1e30).as_long(), i64::MAX);
        assert_eq!(LlsdValue::Real(1e30).as_u_long(), u64::MAX);
    }

    #[test]
    fn test_as_integer_from_string_floors() {
        assert_eq!(LlsdValue::from("3.9").as_integer(), 3);
        assert_eq!(LlsdValue::from("-3.1").as_integer(), -4);
        assert_eq!(LlsdValue::from("junk").as_integer(), 0);
        assert_eq!(LlsdValue::from("12").as_long(), 12);
    }

    #[test]
    fn test_integers_from_bytes() {
        let bin = LlsdValue::Binary(vec![0x00, 0x00, 0x01, 0x00, 0xff]);
        assert_eq!(bin.as_integer(), 256);
        assert_eq!(LlsdValue::Binary(vec![1, 2, 3]).as_integer(), 0);
        assert_eq!(bin.as_long(), 0);

        let long = LlsdValue::from_long(-2);
        assert_eq!(long.as_long(), -2);
        assert_eq!(LlsdValue::from_u_long(u64::MAX).as_u_long(), u64::MAX);

        let arr = LlsdValue::Array(vec![0.into(), 0.into(), 1.into(), 300.into()]);
        // 300 narrows to 44
        assert_eq!(arr.as_integer(), 256 + 44);
        assert_eq!(LlsdValue::Array(vec![1.into()]).as_integer(), 0);
    }

    #[test]
    fn test_u_integer_reinterprets() {
        assert_eq!(LlsdValue::Integer(-1).as_u_integer(), u32::MAX);
        assert_eq!(LlsdValue::from_u_integer(u32::MAX).as_u_integer(), u32::MAX);
        assert_eq!(LlsdValue::Integer(-1).as_u_long(), u64::MAX);
    }

    #[test]
    fn test_date_conversions() {
        let date = Utc.with_ymd_and_hms(2009, 2, 13, 23, 31, 30).unwrap();
        let value = LlsdValue::Date(date);
        assert_eq!(value.as_integer(), 1_234_567_890);
        assert_eq!(value.as_long(), 1_234_567_890);
        assert_eq!(value.as_string(), "2009-02-13T23:31:30Z");
        assert_eq!(value.as_binary(), 1_234_567_890f64.to_be_bytes().to_vec());
        assert_eq!(value.as_real(), 0.0);

        assert_eq!(LlsdValue::from("2009-02-13T23:31:30Z").as_date(), date);
        assert_eq!(LlsdValue::from("garbage").as_date(), epoch());
        assert_eq!(LlsdValue::Uuid(Uuid::nil()).as_date(), epoch());
    }

    #[test]
    fn test_dates_past_2038_clamp() {
        let far = LlsdValue::Date(Utc.with_ymd_and_hms(2100, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(far.as_integer(), i32::MAX);
        assert_eq!(far.as_long(), 4_102_444_800);

        let early = LlsdValue::Date(Utc.with_ymd_and_hms(1800, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(early.as_integer(), i32::MIN);
    }

    #[test]
    fn test_as_string_matrix() {
        assert_eq!(LlsdValue::Undefined.as_string(), "");
        assert_eq!(LlsdValue::Boolean(true).as_string(), "1");
        assert_eq!(LlsdValue::Boolean(false).as_string(), "0");
        assert_eq!(LlsdValue::Real(1.5).as_string(), "1.5");
        assert_eq!(LlsdValue::Binary(b"abc".to_vec()).as_string(), "YWJj");
        assert_eq!(
            LlsdValue::Uuid(Uuid::from_bytes([0xab; 16])).as_string(),
            "abababab-abab-abab-abab-abababababab"
        );
        assert_eq!(
            LlsdValue::Array(vec![1.into(), "x".into()]).as_string(),
            r#"[1,"x"]"#
        );
        assert_eq!(LlsdValue::Map(sample_map()).as_string(), r#"{"a":1,"b":2}"#);
    }

    #[test]
    fn test_as_binary_matrix() {
        assert_eq!(LlsdValue::Boolean(false).as_binary(), vec![b'0']);
        assert_eq!(LlsdValue::Real(1.0).as_binary(), 1.0f64.to_be_bytes().to_vec());
        assert_eq!(LlsdValue::Uuid(Uuid::from_bytes([7; 16])).as_binary(), vec![7; 16]);
        assert_eq!(LlsdValue::Map(sample_map()).as_binary(), vec![1, 2]);
        assert!(LlsdValue::Undefined.as_binary().is_empty());
    }

    #[test]
    fn test_as_uri_and_uuid() {
        assert!(LlsdValue::from("").as_uri().is_none());
        assert!(LlsdValue::from("bad uri").as_uri().is_none());
        assert_eq!(
            LlsdValue::from("http://x/y").as_uri().map(|u| u.to_string()),
            Some("http://x/y".to_string())
        );
        assert!(LlsdValue::Integer(1).as_uri().is_none());
        assert_eq!(LlsdValue::from("not-a-uuid").as_uuid(), Uuid::nil());
        assert_eq!(LlsdValue::Integer(1).as_uuid(), Uuid::nil());
    }

    #[test]
    fn test_is_default() {
        assert!(LlsdValue::Boolean(false).is_default());
        assert!(LlsdValue::Real(-0.0).is_default());
        assert!(LlsdValue::Uuid(Uuid::nil()).is_default());
        assert!(!LlsdValue::Undefined.is_default());
        assert!(LlsdValue::Uri(Uri::empty()).is_default());
        assert!(!LlsdValue::Uri(Uri::parse("caps/seed").unwrap()).is_default());
        assert!(!LlsdValue::Date(epoch()).is_default());
        assert!(!LlsdValue::Real(f64::NAN).is_default());
    }

    #[test]
    fn test_copy_is_independent() {
        let original = LlsdValue::Array(vec![LlsdValue::Map(sample_map())]);
        let mut copy = original.copy();
        if let Some(arr) = copy.as_array_mut() {
            arr.push(LlsdValue::Undefined);
        }
        assert_eq!(original.as_array().map(Vec::len), Some(1));
        assert_eq!(copy.as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn test_from_option() {
        assert_eq!(LlsdValue::from(None::<i32>), LlsdValue::Undefined);
        assert_eq!(LlsdValue::from(Some("x")), LlsdValue::from("x"));
    }
}
