//! Deserialization of Rust types from [`LlsdValue`] trees.
//!
//! Typed requests go through the value's conversion accessors, so the
//! loose typing of LLSD peers is absorbed here: an `i32` field accepts
//! `Integer(3)`, `Real(3.2)` or `String("3")`, and a `String` field accepts
//! an `Undefined` (which is how JSON's `""` arrives).
//!
//! ```rust
//! use serde::Deserialize;
//! use serde_llsd::{from_value, llsd};
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Login { first: String, last: String, port: u16, god_mode: bool }
//!
//! let value = llsd!({ "first": "Ahern", "last": undef, "port": "13000", "god_mode": 0 });
//! let login: Login = from_value(value).unwrap();
//! assert_eq!(login, Login { first: "Ahern".into(), last: String::new(), port: 13000, god_mode: false });
//! ```

use crate::text::format_date;
use crate::{Error, LlsdMap, LlsdValue, Result};
use serde::de;
use serde::forward_to_deserialize_any;

/// A [`serde::Deserializer`] that reads from an owned [`LlsdValue`].
pub struct ValueDeserializer {
    value: LlsdValue,
}

impl ValueDeserializer {
    #[must_use]
    pub fn new(value: LlsdValue) -> Self {
        ValueDeserializer { value }
    }
}

impl<'de> de::Deserializer<'de> for ValueDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            LlsdValue::Undefined => visitor.visit_unit(),
            LlsdValue::Boolean(b) => visitor.visit_bool(b),
            LlsdValue::Integer(i) => visitor.visit_i32(i),
            LlsdValue::Real(r) => visitor.visit_f64(r),
            LlsdValue::String(s) => visitor.visit_string(s),
            LlsdValue::Uuid(u) => visitor.visit_string(u.to_string()),
            LlsdValue::Date(d) => visitor.visit_string(format_date(&d)),
            LlsdValue::Uri(u) => visitor.visit_string(u.to_string()),
            LlsdValue::Binary(b) => visitor.visit_byte_buf(b),
            LlsdValue::Array(arr) => visitor.visit_seq(SeqDeserializer::new(arr)),
            LlsdValue::Map(map) => visitor.visit_map(MapDeserializer::new(map)),
        }
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_bool(self.value.as_boolean())
    }

    fn deserialize_i8<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_i32(self.value.as_integer())
    }

    fn deserialize_i16<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_i32(self.value.as_integer())
    }

    fn deserialize_i32<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_i32(self.value.as_integer())
    }

    fn deserialize_i64<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_i64(self.value.as_long())
    }

    fn deserialize_u8<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_u32(self.value.as_u_integer())
    }

    fn deserialize_u16<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_u32(self.value.as_u_integer())
    }

    fn deserialize_u32<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_u32(self.value.as_u_integer())
    }

    fn deserialize_u64<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_u64(self.value.as_u_long())
    }

    fn deserialize_f32<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_f64(self.value.as_real())
    }

    fn deserialize_f64<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_f64(self.value.as_real())
    }

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_string(visitor)
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_string(visitor)
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            LlsdValue::String(s) => visitor.visit_string(s),
            LlsdValue::Array(_) | LlsdValue::Map(_) => self.deserialize_any(visitor),
            other => visitor.visit_string(other.as_string()),
        }
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_byte_buf(visitor)
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            LlsdValue::Binary(b) => visitor.visit_byte_buf(b),
            LlsdValue::Map(_) => self.deserialize_any(visitor),
            other => visitor.visit_byte_buf(other.as_binary()),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            LlsdValue::Undefined => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            LlsdValue::Binary(bytes) => visitor.visit_seq(SeqDeserializer::new(
                bytes.into_iter().map(|b| LlsdValue::Integer(i32::from(b))).collect(),
            )),
            _ => self.deserialize_any(visitor),
        }
    }

    fn deserialize_tuple<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            LlsdValue::String(variant) => visitor.visit_enum(EnumDeserializer::new(variant, None)),
            LlsdValue::Map(map) if map.len() == 1 => {
                let Some((variant, value)) = map.into_iter().next() else {
                    return Err(Error::custom("expected a single-entry map for an enum"));
                };
                visitor.visit_enum(EnumDeserializer::new(variant, Some(value)))
            }
            other => Err(Error::custom(format!(
                "expected a string or single-entry map for an enum, found {}",
                other.llsd_type()
            ))),
        }
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_string(visitor)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_unit()
    }

    forward_to_deserialize_any! {
        i128 u128 unit unit_struct map struct
    }
}

struct SeqDeserializer {
    iter: std::vec::IntoIter<LlsdValue>,
}

impl SeqDeserializer {
    fn new(vec: Vec<LlsdValue>) -> Self {
        SeqDeserializer {
            iter: vec.into_iter(),
        }
    }
}

impl<'de> de::SeqAccess<'de> for SeqDeserializer {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct MapDeserializer {
    iter: <LlsdMap as IntoIterator>::IntoIter,
    value: Option<LlsdValue>,
}

impl MapDeserializer {
    fn new(map: LlsdMap) -> Self {
        MapDeserializer {
            iter: map.into_iter(),
            value: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for MapDeserializer {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, value)) => {
                self.value = Some(value);
                seed.deserialize(ValueDeserializer::new(LlsdValue::String(key)))
                    .map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct EnumDeserializer {
    variant: String,
    value: Option<LlsdValue>,
}

impl EnumDeserializer {
    fn new(variant: String, value: Option<LlsdValue>) -> Self {
        EnumDeserializer { variant, value }
    }
}

impl<'de> de::EnumAccess<'de> for EnumDeserializer {
    type Error = Error;
    type Variant = VariantDeserializer;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let variant = seed.deserialize(ValueDeserializer::new(LlsdValue::String(self.variant)))?;
        Ok((variant, VariantDeserializer { value: self.value }))
    }
}

struct VariantDeserializer {
    value: Option<LlsdValue>,
}

impl<'de> de::VariantAccess<'de> for VariantDeserializer {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        match self.value {
            Some(LlsdValue::Undefined) | None => Ok(()),
            Some(other) => Err(Error::custom(format!(
                "expected unit variant, found {}",
                other.llsd_type()
            ))),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.value {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)),
            None => Err(Error::custom("expected newtype variant")),
        }
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Some(LlsdValue::Array(arr)) => visitor.visit_seq(SeqDeserializer::new(arr)),
            _ => Err(Error::custom("expected tuple variant")),
        }
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Some(LlsdValue::Map(map)) => visitor.visit_map(MapDeserializer::new(map)),
            _ => Err(Error::custom("expected struct variant")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{from_value, llsd, Uuid};
    use serde::Deserialize;

    #[derive(Deserialize, Debug, PartialEq)]
    enum Shape {
        Point,
        Circle(f64),
        Line(i32, i32),
        Rect { w: u8, h: u8 },
    }

    #[derive(Deserialize, Debug, PartialEq)]
    struct Agent {
        id: String,
        region: Option<String>,
        #[serde(default)]
        flags: Vec<u8>,
        pos: (f32, f32, f32),
    }

    #[test]
    fn test_loose_numbers() {
        assert_eq!(from_value::<i32>(llsd!("42.9")).unwrap(), 42);
        assert_eq!(from_value::<i64>(llsd!(2.5)).unwrap(), 2);
        assert_eq!(from_value::<u64>(LlsdValue::from_u_long(u64::MAX)).unwrap(), u64::MAX);
        assert_eq!(from_value::<f64>(llsd!(true)).unwrap(), 1.0);
        assert_eq!(from_value::<bool>(llsd!("false")).unwrap(), false);
        assert!(from_value::<u8>(llsd!(300)).is_err());
    }

    #[test]
    fn test_strings_from_other_variants() {
        assert_eq!(from_value::<String>(LlsdValue::Undefined).unwrap(), "");
        assert_eq!(
            from_value::<String>(LlsdValue::Uuid(Uuid::nil())).unwrap(),
            "00000000-0000-0000-0000-000000000000"
        );
        assert_eq!(from_value::<String>(llsd!(12)).unwrap(), "12");
        assert!(from_value::<String>(llsd!([1])).is_err());
    }

    #[test]
    fn test_struct() {
        let value = llsd!({
            "id": (Uuid::from_bytes([1; 16])),
            "region": undef,
            "pos": [1, 2.5, "3"],
            "extra": "ignored"
        });
        let agent: Agent = from_value(value).unwrap();
        assert_eq!(
            agent,
            Agent {
                id: "01010101-0101-0101-0101-010101010101".into(),
                region: None,
                flags: vec![],
                pos: (1.0, 2.5, 3.0),
            }
        );
    }

    #[test]
    fn test_bytes_as_sequence() {
        let bytes: Vec<u8> = from_value(LlsdValue::Binary(vec![1, 2, 3])).unwrap();
        assert_eq!(bytes, vec![1, 2, 3]);
    }

    #[test]
    fn test_enums() {
        assert_eq!(from_value::<Shape>(llsd!("Point")).unwrap(), Shape::Point);
        assert_eq!(from_value::<Shape>(llsd!({ "Circle": 2 })).unwrap(), Shape::Circle(2.0));
        assert_eq!(from_value::<Shape>(llsd!({ "Line": [1, 2] })).unwrap(), Shape::Line(1, 2));
        assert_eq!(
            from_value::<Shape>(llsd!({ "Rect": { "w": 3, "h": 4 } })).unwrap(),
            Shape::Rect { w: 3, h: 4 }
        );
        assert!(from_value::<Shape>(llsd!(1)).is_err());
        assert!(from_value::<Shape>(llsd!({ "Hexagon": 1 })).is_err());
    }
}
