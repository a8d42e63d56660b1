//! Serialization of Rust types into [`LlsdValue`] trees.
//!
//! [`ValueSerializer`] maps the serde data model onto LLSD:
//!
//! - structs and maps become `Map`, sequences and tuples become `Array`
//! - integers that fit in `i32` become `Integer`; wider ones become the
//!   8-byte big-endian `Binary` LLSD uses for 64-bit values
//! - `None`, `()` and unit structs become `Undefined`
//! - enums are externally tagged: `"Variant"` or `{ "Variant": payload }`
//!
//! Most callers go through [`to_value`](crate::to_value):
//!
//! ```rust
//! use serde::Serialize;
//! use serde_llsd::{llsd, to_value};
//!
//! #[derive(Serialize)]
//! struct Prim { name: String, scale: [f32; 3], owner_key: u64 }
//!
//! let prim = Prim { name: "Box".into(), scale: [0.5, 1.0, 2.0], owner_key: 1 << 40 };
//! let value = to_value(&prim).unwrap();
//! assert_eq!(value.get("scale"), Some(&llsd!([0.5, 1.0, 2.0])));
//! assert_eq!(value.get("owner_key").unwrap().as_u_long(), 1 << 40);
//! ```

use crate::{Error, LlsdMap, LlsdValue, Result};
use serde::ser::{self, Serialize};

/// Serializer whose output is an [`LlsdValue`].
pub struct ValueSerializer;

pub struct SerializeVec {
    vec: Vec<LlsdValue>,
}

pub struct SerializeTupleVariant {
    name: &'static str,
    vec: Vec<LlsdValue>,
}

pub struct SerializeMap {
    map: LlsdMap,
    current_key: Option<String>,
}

pub struct SerializeStructVariant {
    name: &'static str,
    map: LlsdMap,
}

fn tagged(name: &str, payload: LlsdValue) -> LlsdValue {
    let mut map = LlsdMap::with_capacity(1);
    map.insert(name.to_string(), payload);
    LlsdValue::Map(map)
}

impl ser::Serializer for ValueSerializer {
    type Ok = LlsdValue;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeTupleVariant;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = SerializeStructVariant;

    fn serialize_bool(self, v: bool) -> Result<LlsdValue> {
        Ok(LlsdValue::Boolean(v))
    }

    fn serialize_i8(self, v: i8) -> Result<LlsdValue> {
        Ok(LlsdValue::Integer(i32::from(v)))
    }

    fn serialize_i16(self, v: i16) -> Result<LlsdValue> {
        Ok(LlsdValue::Integer(i32::from(v)))
    }

    fn serialize_i32(self, v: i32) -> Result<LlsdValue> {
        Ok(LlsdValue::Integer(v))
    }

    fn serialize_i64(self, v: i64) -> Result<LlsdValue> {
        Ok(i32::try_from(v).map_or_else(|_| LlsdValue::from_long(v), LlsdValue::Integer))
    }

    fn serialize_i128(self, v: i128) -> Result<LlsdValue> {
        i64::try_from(v)
            .map_err(|_| Error::unsupported("integers wider than 64 bits"))
            .and_then(|v| self.serialize_i64(v))
    }

    fn serialize_u8(self, v: u8) -> Result<LlsdValue> {
        Ok(LlsdValue::Integer(i32::from(v)))
    }

    fn serialize_u16(self, v: u16) -> Result<LlsdValue> {
        Ok(LlsdValue::Integer(i32::from(v)))
    }

    fn serialize_u32(self, v: u32) -> Result<LlsdValue> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<LlsdValue> {
        Ok(i32::try_from(v).map_or_else(|_| LlsdValue::from_u_long(v), LlsdValue::Integer))
    }

    fn serialize_u128(self, v: u128) -> Result<LlsdValue> {
        u64::try_from(v)
            .map_err(|_| Error::unsupported("integers wider than 64 bits"))
            .and_then(|v| self.serialize_u64(v))
    }

    fn serialize_f32(self, v: f32) -> Result<LlsdValue> {
        Ok(LlsdValue::Real(f64::from(v)))
    }

    fn serialize_f64(self, v: f64) -> Result<LlsdValue> {
        Ok(LlsdValue::Real(v))
    }

    fn serialize_char(self, v: char) -> Result<LlsdValue> {
        Ok(LlsdValue::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<LlsdValue> {
        Ok(LlsdValue::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<LlsdValue> {
        Ok(LlsdValue::Binary(v.to_vec()))
    }

    fn serialize_none(self) -> Result<LlsdValue> {
        Ok(LlsdValue::Undefined)
    }

    fn serialize_some<T>(self, value: &T) -> Result<LlsdValue>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<LlsdValue> {
        Ok(LlsdValue::Undefined)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<LlsdValue> {
        Ok(LlsdValue::Undefined)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<LlsdValue> {
        Ok(LlsdValue::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<LlsdValue>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<LlsdValue>
    where
        T: ?Sized + Serialize,
    {
        Ok(tagged(variant, value_of(value)?))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec {
            vec: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeVec> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeTupleVariant> {
        Ok(SerializeTupleVariant {
            name: variant,
            vec: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap {
            map: LlsdMap::with_capacity(len.unwrap_or(0)),
            current_key: None,
        })
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<SerializeMap> {
        self.serialize_map(Some(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeStructVariant> {
        Ok(SerializeStructVariant {
            name: variant,
            map: LlsdMap::with_capacity(len),
        })
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = LlsdValue;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(value_of(value)?);
        Ok(())
    }

    fn end(self) -> Result<LlsdValue> {
        Ok(LlsdValue::Array(self.vec))
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = LlsdValue;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<LlsdValue> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = LlsdValue;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<LlsdValue> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleVariant for SerializeTupleVariant {
    type Ok = LlsdValue;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(value_of(value)?);
        Ok(())
    }

    fn end(self) -> Result<LlsdValue> {
        Ok(tagged(self.name, LlsdValue::Array(self.vec)))
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = LlsdValue;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = match value_of(key)? {
            LlsdValue::String(s) => s,
            LlsdValue::Integer(i) => i.to_string(),
            LlsdValue::Boolean(b) => b.to_string(),
            other => {
                return Err(Error::custom(format!(
                    "map keys must be strings, found {}",
                    other.llsd_type()
                )))
            }
        };
        self.current_key = Some(key);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.map.insert(key, value_of(value)?);
        Ok(())
    }

    fn end(self) -> Result<LlsdValue> {
        Ok(LlsdValue::Map(self.map))
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = LlsdValue;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.map.insert(key.to_string(), value_of(value)?);
        Ok(())
    }

    fn end(self) -> Result<LlsdValue> {
        Ok(LlsdValue::Map(self.map))
    }
}

impl ser::SerializeStructVariant for SerializeStructVariant {
    type Ok = LlsdValue;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.map.insert(key.to_string(), value_of(value)?);
        Ok(())
    }

    fn end(self) -> Result<LlsdValue> {
        Ok(tagged(self.name, LlsdValue::Map(self.map)))
    }
}

pub(crate) fn value_of<T: Serialize + ?Sized>(value: &T) -> Result<LlsdValue> {
    value.serialize(ValueSerializer)
}
