//! Canonical serialization.
//!
//! This module provides the [`Serializer`] that turns a [`Value`] into canonical
//! JSON text, and [`ValueSerializer`], a `serde` serializer that builds a [`Value`]
//! from any `T: Serialize`.
//!
//! ## Overview
//!
//! The canonical form is fixed:
//!
//! - **Literals**: `null`, `true`, `false`, and shortest round-tripping numbers
//! - **Strings**: double-quoted through [`quote`](crate::quote)
//! - **Dates**: `"YYYY-MM-DDThh:mm:ss.mmmZ"` in UTC
//! - **Sequences**: `[a,b,c]`, with absent elements written as `null`
//! - **Mappings**: `{"k":v,"k2":v2}` in insertion order, absent pairs dropped
//!
//! Undefined and function values have no textual form. At the top level they produce
//! `None` instead of text.
//!
//! ## Usage
//!
//! Most users should use the high-level functions in the crate root:
//!
//! ```rust
//! use canon_json::{serialize, value, Value};
//!
//! let data = value!({ "x": 1, "tags": ["a", "b"] });
//! assert_eq!(
//!     serialize(&data).unwrap().as_deref(),
//!     Some(r#"{"x":1,"tags":["a","b"]}"#)
//! );
//!
//! assert_eq!(serialize(&Value::Undefined).unwrap(), None);
//! ```
//!
//! ## Direct Serializer Usage
//!
//! ```rust
//! use canon_json::{JsonOptions, Serializer, Value};
//!
//! let mut serializer = Serializer::new(JsonOptions::new());
//! let written = serializer.write_value(&Value::from(vec![Value::from(1), Value::Undefined])).unwrap();
//! assert!(written);
//! assert_eq!(serializer.into_inner(), "[1,null]");
//! ```

use crate::escape::write_quoted;
use crate::{Error, JsonOptions, Key, Map, Number, Result, Value};
use chrono::{DateTime, Datelike, Utc};
use serde::{ser, Serialize};

/// Formats an instant as `YYYY-MM-DDThh:mm:ss.mmmZ` (without quotes).
///
/// Years outside `0..=9999` use the expanded ISO 8601 form: a sign and six digits,
/// as in `+010000-01-01T00:00:00.000Z`.
///
/// # Examples
///
/// ```rust
/// use canon_json::ser::format_date;
/// use chrono::{TimeZone, Utc};
///
/// let dt = Utc.with_ymd_and_hms(2011, 9, 16, 3, 5, 7).unwrap();
/// assert_eq!(format_date(&dt), "2011-09-16T03:05:07.000Z");
///
/// let dt = Utc.with_ymd_and_hms(-5, 1, 1, 0, 0, 0).unwrap();
/// assert_eq!(format_date(&dt), "-000005-01-01T00:00:00.000Z");
/// ```
#[must_use]
pub fn format_date(dt: &DateTime<Utc>) -> String {
    let year = dt.year();
    let rest = dt.format("-%m-%dT%H:%M:%S%.3fZ");
    if (0..=9999).contains(&year) {
        format!("{:04}{}", year, rest)
    } else {
        let sign = if year < 0 { '-' } else { '+' };
        format!("{}{:06}{}", sign, year.unsigned_abs(), rest)
    }
}

/// The canonical serializer.
///
/// Walks a [`Value`] and appends its canonical text to an internal buffer.
/// Created via [`Serializer::new`].
pub struct Serializer {
    output: String,
    options: JsonOptions,
    depth: usize,
}

impl Serializer {
    pub fn new(options: JsonOptions) -> Self {
        Serializer {
            output: String::with_capacity(256),
            options,
            depth: 0,
        }
    }

    pub fn into_inner(self) -> String {
        self.output
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > self.options.max_depth {
            tracing::debug!(limit = self.options.max_depth, "serializer depth limit hit");
            return Err(Error::depth_exceeded(self.options.max_depth));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    /// Appends the canonical text of `value`.
    ///
    /// Returns `Ok(false)` without writing anything when the value has no textual
    /// form (undefined, functions, or a custom value representing one of those).
    ///
    /// # Errors
    ///
    /// Returns [`Error::DepthExceeded`] when nesting exceeds `max_depth`. A failed
    /// call leaves the buffer and nesting depth as they were before it, so the
    /// serializer can be reused.
    pub fn write_value(&mut self, value: &Value) -> Result<bool> {
        let (start_len, start_depth) = (self.output.len(), self.depth);
        let result = self.write_value_inner(value);
        if result.is_err() {
            self.output.truncate(start_len);
            self.depth = start_depth;
        }
        result
    }

    fn write_value_inner(&mut self, value: &Value) -> Result<bool> {
        match value {
            Value::Null => self.output.push_str("null"),
            Value::Undefined | Value::Function(_) => return Ok(false),
            Value::Bool(b) => self.output.push_str(if *b { "true" } else { "false" }),
            Value::Number(n) => self.write_number(n),
            Value::String(s) => write_quoted(&mut self.output, s),
            Value::Custom(custom) => {
                self.enter()?;
                let representation = custom.to_representation();
                let written = self.write_value_inner(&representation)?;
                self.leave();
                return Ok(written);
            }
            Value::Date(dt) => {
                self.output.push('"');
                self.output.push_str(&format_date(dt));
                self.output.push('"');
            }
            Value::Array(arr) => {
                self.enter()?;
                self.write_array(arr)?;
                self.leave();
            }
            Value::Object(obj) => {
                self.enter()?;
                self.write_object(obj)?;
                self.leave();
            }
        }
        Ok(true)
    }

    #[inline]
    fn write_number(&mut self, n: &Number) {
        use std::fmt::Write;
        // writing into a String cannot fail
        let _ = write!(self.output, "{}", n);
    }

    fn write_array(&mut self, arr: &[Value]) -> Result<()> {
        self.output.push('[');
        for (i, element) in arr.iter().enumerate() {
            if i > 0 {
                self.output.push(',');
            }
            if !self.write_value_inner(element)? {
                self.output.push_str("null");
            }
        }
        self.output.push(']');
        Ok(())
    }

    fn write_object(&mut self, obj: &Map) -> Result<()> {
        let separator = self.options.separator.as_str();
        let mut first = true;

        self.output.push('{');
        for (key, value) in obj {
            if value.is_function() {
                continue;
            }

            let rollback = self.output.len();
            if !first {
                self.output.push_str(separator);
            }
            match key {
                Key::String(s) => write_quoted(&mut self.output, s),
                Key::Number(n) => {
                    self.output.push('"');
                    self.write_number(n);
                    self.output.push('"');
                }
                Key::Bool(_) | Key::Null => {
                    self.output.truncate(rollback);
                    continue;
                }
            }
            self.output.push(':');

            if self.write_value_inner(value)? {
                first = false;
            } else {
                self.output.truncate(rollback);
            }
        }
        self.output.push('}');
        Ok(())
    }
}

/// Serializes `value` with the hand-rolled canonical serializer.
pub(crate) fn to_canonical(value: &Value, options: &JsonOptions) -> Result<Option<String>> {
    let mut serializer = Serializer::new(options.clone());
    if serializer.write_value(value)? {
        Ok(Some(serializer.into_inner()))
    } else {
        Ok(None)
    }
}

/// A `serde` serializer producing [`Value`]s.
///
/// Enum variants with data use the externally tagged form `{"Variant": data}`.
pub struct ValueSerializer;

pub struct SerializeVec {
    vec: Vec<Value>,
    variant: Option<&'static str>,
}

pub struct SerializeMap {
    map: Map,
    current_key: Option<Key>,
    variant: Option<&'static str>,
}

fn tagged(variant: Option<&'static str>, value: Value) -> Value {
    match variant {
        Some(name) => {
            let mut map = Map::with_capacity(1);
            map.insert(name, value);
            Value::Object(map)
        }
        None => value,
    }
}

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeVec;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = SerializeMap;

    fn serialize_bool(self, v: bool) -> Result<Value> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value> {
        Ok(Value::Number(Number::Integer(v as i64)))
    }

    fn serialize_i16(self, v: i16) -> Result<Value> {
        Ok(Value::Number(Number::Integer(v as i64)))
    }

    fn serialize_i32(self, v: i32) -> Result<Value> {
        Ok(Value::Number(Number::Integer(v as i64)))
    }

    fn serialize_i64(self, v: i64) -> Result<Value> {
        Ok(Value::Number(Number::Integer(v)))
    }

    fn serialize_u8(self, v: u8) -> Result<Value> {
        Ok(Value::Number(Number::Integer(v as i64)))
    }

    fn serialize_u16(self, v: u16) -> Result<Value> {
        Ok(Value::Number(Number::Integer(v as i64)))
    }

    fn serialize_u32(self, v: u32) -> Result<Value> {
        Ok(Value::Number(Number::Integer(v as i64)))
    }

    fn serialize_u64(self, v: u64) -> Result<Value> {
        Ok(Value::Number(Number::from(v)))
    }

    fn serialize_f32(self, v: f32) -> Result<Value> {
        Ok(Value::Number(Number::Float(v as f64)))
    }

    fn serialize_f64(self, v: f64) -> Result<Value> {
        Ok(Value::Number(Number::Float(v)))
    }

    fn serialize_char(self, v: char) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value> {
        let vec = v
            .iter()
            .map(|&b| Value::Number(Number::Integer(b as i64)))
            .collect();
        Ok(Value::Array(vec))
    }

    fn serialize_none(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        Ok(Value::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Value>
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
    ) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        Ok(tagged(Some(variant), to_value(value)?))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len.unwrap_or(0), None))
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, None))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, None))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, Some(variant)))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap::new(None))
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<SerializeMap> {
        Ok(SerializeMap::new(None))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<SerializeMap> {
        Ok(SerializeMap::new(Some(variant)))
    }
}

impl SerializeVec {
    fn new(capacity: usize, variant: Option<&'static str>) -> Self {
        SerializeVec {
            vec: Vec::with_capacity(capacity),
            variant,
        }
    }

    fn push<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.vec.push(to_value(value)?);
        Ok(())
    }

    fn finish(self) -> Value {
        tagged(self.variant, Value::Array(self.vec))
    }
}

impl SerializeMap {
    fn new(variant: Option<&'static str>) -> Self {
        SerializeMap {
            map: Map::new(),
            current_key: None,
            variant,
        }
    }

    fn finish(self) -> Value {
        tagged(self.variant, Value::Object(self.map))
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleVariant for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        match to_value(key)? {
            Value::String(s) => {
                self.current_key = Some(Key::String(s));
                Ok(())
            }
            Value::Number(n) => {
                self.current_key = Some(Key::Number(n));
                Ok(())
            }
            _ => Err(Error::custom("Map keys must be strings or numbers")),
        }
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.map.insert(key, to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.map.insert(key, to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeStructVariant for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.map.insert(key, to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

pub(crate) fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    value.serialize(ValueSerializer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Representable, Separator};
    use chrono::TimeZone;

    fn canonical(value: &Value) -> Option<String> {
        to_canonical(value, &JsonOptions::default()).unwrap()
    }

    #[derive(Debug)]
    struct Endless;

    impl Representable for Endless {
        fn to_representation(&self) -> Value {
            Value::custom(Endless)
        }
    }

    #[derive(Debug)]
    struct Hidden;

    impl Representable for Hidden {
        fn to_representation(&self) -> Value {
            Value::Undefined
        }
    }

    #[test]
    fn test_literals() {
        assert_eq!(canonical(&Value::Null).as_deref(), Some("null"));
        assert_eq!(canonical(&Value::Bool(true)).as_deref(), Some("true"));
        assert_eq!(canonical(&Value::Bool(false)).as_deref(), Some("false"));
        assert_eq!(canonical(&Value::from(42)).as_deref(), Some("42"));
        assert_eq!(canonical(&Value::from(3.25)).as_deref(), Some("3.25"));
        assert_eq!(canonical(&Value::from(f64::NAN)).as_deref(), Some("NaN"));
    }

    #[test]
    fn test_absent_top_level() {
        assert_eq!(canonical(&Value::Undefined), None);
        assert_eq!(canonical(&Value::function(|_| Value::Null)), None);
        assert_eq!(canonical(&Value::custom(Hidden)), None);
    }

    #[test]
    fn test_sequence_substitutes_null() {
        let value = Value::Array(vec![Value::Undefined, Value::from(1), Value::Undefined]);
        assert_eq!(canonical(&value).as_deref(), Some("[null,1,null]"));

        let value = Value::Array(vec![Value::function(|_| Value::Null), Value::custom(Hidden)]);
        assert_eq!(canonical(&value).as_deref(), Some("[null,null]"));
    }

    #[test]
    fn test_mapping_drops() {
        let mut map = Map::new();
        map.insert("a", Value::function(|_| Value::Null));
        map.insert(1, Value::from("x"));
        map.insert("b", Value::Undefined);
        map.insert(true, Value::from(0));
        map.insert(Key::Null, Value::from(0));
        map.insert("c", Value::from(3));
        map.insert("d", Value::custom(Hidden));

        let value = Value::Object(map);
        assert_eq!(canonical(&value).as_deref(), Some(r#"{"1":"x","c":3}"#));

        let spaced = JsonOptions::new().with_separator(Separator::Spaced);
        assert_eq!(
            to_canonical(&value, &spaced).unwrap().as_deref(),
            Some(r#"{"1":"x", "c":3}"#)
        );
    }

    #[test]
    fn test_mapping_all_dropped() {
        let mut map = Map::new();
        map.insert("a", Value::Undefined);
        map.insert(false, Value::from(1));
        assert_eq!(canonical(&Value::Object(map)).as_deref(), Some("{}"));
    }

    #[test]
    fn test_keys_are_escaped() {
        let mut map = Map::new();
        map.insert("say \"hi\"", Value::Null);
        map.insert(2.5, Value::Null);
        assert_eq!(
            canonical(&Value::Object(map)).as_deref(),
            Some(r#"{"say \"hi\"":null,"2.5":null}"#)
        );
    }

    #[test]
    fn test_date_format() {
        let dt = Utc.with_ymd_and_hms(2011, 9, 16, 3, 5, 7).unwrap()
            + chrono::Duration::milliseconds(8);
        assert_eq!(
            canonical(&Value::Date(dt)).as_deref(),
            Some(r#""2011-09-16T03:05:07.008Z""#)
        );
    }

    #[test]
    fn test_date_format_expanded_years() {
        let early = Utc.with_ymd_and_hms(33, 1, 2, 0, 0, 0).unwrap();
        assert_eq!(format_date(&early), "0033-01-02T00:00:00.000Z");

        let far = Utc.with_ymd_and_hms(10000, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(format_date(&far), "+010000-01-01T00:00:00.000Z");

        let bc = Utc.with_ymd_and_hms(-5, 6, 7, 8, 9, 10).unwrap();
        assert_eq!(format_date(&bc), "-000005-06-07T08:09:10.000Z");
    }

    #[test]
    fn test_custom_is_resolved() {
        #[derive(Debug)]
        struct Money(i64);

        impl Representable for Money {
            fn to_representation(&self) -> Value {
                Value::from(format!("${}", self.0))
            }
        }

        let value = Value::Array(vec![Value::custom(Money(5))]);
        assert_eq!(canonical(&value).as_deref(), Some(r#"["$5"]"#));
    }

    #[test]
    fn test_endless_custom_hits_depth_limit() {
        let options = JsonOptions::new().with_max_depth(16);
        let err = to_canonical(&Value::custom(Endless), &options).unwrap_err();
        assert_eq!(err, Error::depth_exceeded(16));
    }

    #[test]
    fn test_depth_limit() {
        let mut value = Value::from(1);
        for _ in 0..4 {
            value = Value::Array(vec![value]);
        }
        let options = JsonOptions::new().with_max_depth(4);
        assert_eq!(
            to_canonical(&value, &options).unwrap().as_deref(),
            Some("[[[[1]]]]")
        );

        let options = JsonOptions::new().with_max_depth(3);
        assert!(to_canonical(&value, &options).is_err());
    }

    #[test]
    fn test_serializer_reusable_after_error() {
        let mut serializer = Serializer::new(JsonOptions::new().with_max_depth(2));
        assert!(serializer.write_value(&Value::from(vec![Value::from(1)])).unwrap());

        let deep = Value::from(vec![Value::from(vec![Value::from(vec![Value::Null])])]);
        assert_eq!(
            serializer.write_value(&deep).unwrap_err(),
            Error::depth_exceeded(2)
        );
        assert_eq!(serializer.depth, 0);

        assert!(serializer
            .write_value(&Value::from(vec![Value::from(vec![Value::from(2)])]))
            .unwrap());
        assert_eq!(serializer.into_inner(), "[1][[2]]");
    }

    #[test]
    fn test_value_serializer() {
        #[derive(Serialize)]
        enum Shape {
            Unit,
            Circle(f64),
            Rect { w: u32, h: u32 },
        }

        assert_eq!(to_value(&Shape::Unit).unwrap(), Value::from("Unit"));

        let circle = to_value(&Shape::Circle(1.5)).unwrap();
        assert_eq!(canonical(&circle).as_deref(), Some(r#"{"Circle":1.5}"#));

        let rect = to_value(&Shape::Rect { w: 2, h: 3 }).unwrap();
        assert_eq!(canonical(&rect).as_deref(), Some(r#"{"Rect":{"w":2,"h":3}}"#));

        assert_eq!(
            to_value(&Some(u64::MAX)).unwrap(),
            Value::from(u64::MAX as f64)
        );
    }

    #[test]
    fn test_value_serializer_integer_keys() {
        let mut map = std::collections::BTreeMap::new();
        map.insert(2, "b");
        map.insert(1, "a");
        let value = to_value(&map).unwrap();
        assert_eq!(canonical(&value).as_deref(), Some(r#"{"1":"a","2":"b"}"#));
    }
}
