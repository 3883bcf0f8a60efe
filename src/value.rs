//! Dynamic value representation.
//!
//! This module provides the [`Value`] enum, the closed set of data kinds the
//! serializer walks and the parser builds.
//!
//! ## Core Types
//!
//! - [`Value`]: null, undefined, boolean, number, string, date, array, object,
//!   custom and function values
//! - [`Number`]: integer or floating-point numbers
//! - [`Representable`]: the capability a [`Value::Custom`] exposes
//! - [`Callable`]: a function value, never written to output
//!
//! ## Usage Patterns
//!
//! ### Creating Values
//!
//! ```rust
//! use canon_json::{value, Value};
//!
//! let null = Value::Null;
//! let boolean = Value::from(true);
//! let number = Value::from(42);
//! let text = Value::from("hello");
//!
//! let obj = value!({
//!     "name": "Alice",
//!     "age": 30
//! });
//! ```
//!
//! ### Custom Representations
//!
//! ```rust
//! use canon_json::{serialize, Representable, Value};
//!
//! #[derive(Debug)]
//! struct Celsius(f64);
//!
//! impl Representable for Celsius {
//!     fn to_representation(&self) -> Value {
//!         Value::from(format!("{}C", self.0))
//!     }
//! }
//!
//! let json = serialize(&Value::custom(Celsius(21.5))).unwrap();
//! assert_eq!(json.as_deref(), Some(r#""21.5C""#));
//! ```

use crate::{Key, Map};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

/// A value that chooses its own serialized form.
///
/// The serializer calls [`Representable::to_representation`] and serializes the
/// returned value in its place. Each call counts as one level of nesting, so a
/// representation that keeps producing custom values ends with
/// [`Error::DepthExceeded`](crate::Error::DepthExceeded).
pub trait Representable: fmt::Debug + Send + Sync {
    fn to_representation(&self) -> Value;
}

type Function = dyn Fn(&[Value]) -> Value + Send + Sync;

/// A function value.
///
/// Functions have no textual form: they are dropped from mappings, written as
/// `null` inside sequences and yield no output at the top level.
#[derive(Clone)]
pub struct Callable(Arc<Function>);

impl Callable {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Callable(Arc::new(f))
    }

    pub fn call(&self, args: &[Value]) -> Value {
        (self.0)(args)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callable")
    }
}

impl PartialEq for Callable {
    fn eq(&self, other: &Self) -> bool {
        Arc::as_ptr(&self.0) as *const () == Arc::as_ptr(&other.0) as *const ()
    }
}

/// A dynamically-typed value.
///
/// # Examples
///
/// ```rust
/// use canon_json::{Number, Value};
///
/// let null = Value::Null;
/// let num = Value::Number(Number::Integer(42));
/// let text = Value::String("hello".to_string());
///
/// assert!(null.is_null());
/// assert!(num.is_number());
/// assert!(text.is_string());
/// assert!(!Value::Undefined.is_null());
/// ```
#[derive(Clone, Debug, Default)]
pub enum Value {
    #[default]
    Null,
    Undefined,
    Bool(bool),
    Number(Number),
    String(String),
    Date(DateTime<Utc>),
    Array(Vec<Value>),
    Object(Map),
    Custom(Arc<dyn Representable>),
    Function(Callable),
}

/// A numeric value: a 64-bit integer or a double.
///
/// Equality is numeric, so `Integer(1) == Float(1.0)`.
///
/// # Examples
///
/// ```rust
/// use canon_json::Number;
///
/// assert_eq!(Number::Integer(1), Number::Float(1.0));
/// assert_eq!(Number::Float(3.5).to_string(), "3.5");
/// assert_eq!(Number::Float(f64::INFINITY).to_string(), "Infinity");
/// ```
#[derive(Clone, Copy, Debug)]
pub enum Number {
    Integer(i64),
    Float(f64),
}

impl Number {
    #[inline]
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, Number::Integer(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Number::Float(_))
    }

    /// Returns `true` unless this is a NaN or infinite float.
    #[inline]
    #[must_use]
    pub fn is_finite(&self) -> bool {
        match self {
            Number::Integer(_) => true,
            Number::Float(f) => f.is_finite(),
        }
    }

    /// Converts this number to an `i64` if it is integral and in range.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use canon_json::Number;
    ///
    /// assert_eq!(Number::Integer(42).as_i64(), Some(42));
    /// assert_eq!(Number::Float(42.0).as_i64(), Some(42));
    /// assert_eq!(Number::Float(42.5).as_i64(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Number::Integer(i) => Some(*i),
            Number::Float(f) => {
                if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                    Some(*f as i64)
                } else {
                    None
                }
            }
        }
    }

    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Integer(i) => *i as f64,
            Number::Float(f) => *f,
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Number::Integer(a), Number::Integer(b)) => a == b,
            _ => self.as_f64() == other.as_f64(),
        }
    }
}

/// Canonical numeric text.
///
/// Floats use the shortest digits that read back to the same double. Magnitudes in
/// `1e-7..1e21` are written positionally (`0.000001`, `123.5`); anything outside
/// uses an exponent with an explicit sign (`1e-7`, `1.5e+300`). Non-finite floats
/// print as `NaN`, `Infinity` and `-Infinity`.
impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{}", i),
            Number::Float(fl) if fl.is_nan() => f.write_str("NaN"),
            Number::Float(fl) if fl.is_infinite() => {
                f.write_str(if *fl > 0.0 { "Infinity" } else { "-Infinity" })
            }
            // -0 prints as 0
            Number::Float(fl) if *fl == 0.0 => f.write_str("0"),
            Number::Float(fl) => write_float(f, *fl),
        }
    }
}

fn write_float(f: &mut fmt::Formatter<'_>, value: f64) -> fmt::Result {
    if value < 0.0 {
        f.write_str("-")?;
    }

    // `{:e}` yields the shortest round-tripping digits, e.g. `1.2345e2`
    let scientific = format!("{:e}", value.abs());
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((&scientific, "0"));
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let exponent: i32 = exponent.parse().unwrap_or(0);

    // value = 0.DIGITS * 10^point
    let len = digits.len() as i32;
    let point = exponent + 1;

    if len <= point && point <= 21 {
        f.write_str(&digits)?;
        for _ in 0..point - len {
            f.write_str("0")?;
        }
        Ok(())
    } else if 0 < point && point <= 21 {
        let (whole, fraction) = digits.split_at(point as usize);
        write!(f, "{}.{}", whole, fraction)
    } else if -6 < point && point <= 0 {
        f.write_str("0.")?;
        for _ in 0..-point {
            f.write_str("0")?;
        }
        f.write_str(&digits)
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        let (first, rest) = digits.split_at(1);
        if rest.is_empty() {
            write!(f, "{}e{}{}", first, sign, exponent.abs())
        } else {
            write!(f, "{}.{}e{}{}", first, rest, sign, exponent.abs())
        }
    }
}

impl From<i32> for Number {
    fn from(value: i32) -> Self {
        Number::Integer(value as i64)
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::Integer(value)
    }
}

impl From<u32> for Number {
    fn from(value: u32) -> Self {
        Number::Integer(value as i64)
    }
}

impl From<u64> for Number {
    fn from(value: u64) -> Self {
        if value <= i64::MAX as u64 {
            Number::Integer(value as i64)
        } else {
            Number::Float(value as f64)
        }
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::Float(value)
    }
}

impl Value {
    /// Wraps a [`Representable`] implementation.
    pub fn custom<R>(value: R) -> Self
    where
        R: Representable + 'static,
    {
        Value::Custom(Arc::new(value))
    }

    /// Wraps a closure as a function value.
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Value::Function(Callable::new(f))
    }

    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[inline]
    #[must_use]
    pub const fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_date(&self) -> bool {
        matches!(self, Value::Date(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_function(&self) -> bool {
        matches!(self, Value::Function(_))
    }

    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// If the value is a string, returns a reference to it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use canon_json::Value;
    ///
    /// assert_eq!(Value::from("hello").as_str(), Some("hello"));
    /// assert_eq!(Value::from(42).as_str(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(n.as_f64()),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_date(&self) -> Option<&DateTime<Utc>> {
        match self {
            Value::Date(dt) => Some(dt),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) | (Value::Undefined, Value::Undefined) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Custom(a), Value::Custom(b)) => {
                Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
            }
            (Value::Function(a), Value::Function(b)) => a == b,
            _ => false,
        }
    }
}

/// Serde view of a value.
///
/// Mirrors what a host JSON encoder does with the same data: custom values are
/// replaced by their representation, dates become canonical strings, mapping pairs
/// with non-representable keys or undefined/function values are skipped, and any
/// other undefined or function value is written as unit.
impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null | Value::Undefined | Value::Function(_) => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(Number::Integer(i)) => serializer.serialize_i64(*i),
            Value::Number(Number::Float(f)) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::Date(dt) => serializer.serialize_str(&crate::ser::format_date(dt)),
            Value::Array(arr) => {
                use serde::ser::SerializeSeq;
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for element in arr {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            Value::Object(obj) => {
                use serde::ser::SerializeMap;
                let entries: Vec<_> = obj
                    .iter()
                    .filter(|(k, v)| {
                        k.is_representable() && !v.is_undefined() && !v.is_function()
                    })
                    .collect();
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries {
                    match k {
                        Key::String(s) => map.serialize_entry(s, v)?,
                        _ => map.serialize_entry(&k.to_string(), v)?,
                    }
                }
                map.end()
            }
            Value::Custom(custom) => custom.to_representation().serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any valid JSON value")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E> {
                Ok(Value::Bool(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E> {
                Ok(Value::Number(Number::Integer(value)))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E> {
                Ok(Value::Number(Number::from(value)))
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E> {
                Ok(Value::Number(Number::Float(value)))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E> {
                Ok(Value::String(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E> {
                Ok(Value::String(value))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_none<E>(self) -> Result<Self::Value, E> {
                Ok(Value::Null)
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
                let mut vec = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(elem) = seq.next_element()? {
                    vec.push(elem);
                }
                Ok(Value::Array(vec))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut values = Map::new();
                while let Some((key, value)) = map.next_entry::<String, Value>()? {
                    values.insert(key, value);
                }
                Ok(Value::Object(values))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

impl TryFrom<Value> for i64 {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Number(n) => n
                .as_i64()
                .ok_or_else(|| crate::Error::custom(format!("cannot convert {} to i64", n))),
            _ => Err(crate::Error::custom(format!(
                "expected integer, found {:?}",
                value
            ))),
        }
    }
}

impl TryFrom<Value> for f64 {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Number(n) => Ok(n.as_f64()),
            _ => Err(crate::Error::custom(format!(
                "expected number, found {:?}",
                value
            ))),
        }
    }
}

impl TryFrom<Value> for bool {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Bool(b) => Ok(b),
            _ => Err(crate::Error::custom(format!(
                "expected bool, found {:?}",
                value
            ))),
        }
    }
}

impl TryFrom<Value> for String {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::String(s) => Ok(s),
            _ => Err(crate::Error::custom(format!(
                "expected string, found {:?}",
                value
            ))),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(Number::Integer(value as i64))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(Number::Integer(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Number(Number::Integer(value as i64))
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Number(Number::from(value))
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Value::Number(Number::from(value as u64))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(Number::Float(value))
    }
}

impl From<Number> for Value {
    fn from(value: Number) -> Self {
        Value::Number(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::Date(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value)
    }
}

impl From<Map> for Value {
    fn from(value: Map) -> Self {
        Value::Object(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Point(i64, i64);

    impl Representable for Point {
        fn to_representation(&self) -> Value {
            Value::Array(vec![Value::from(self.0), Value::from(self.1)])
        }
    }

    #[test]
    fn test_tryfrom_i64() {
        let value = Value::Number(Number::Float(42.0));
        let result: i64 = TryFrom::try_from(value).unwrap();
        assert_eq!(result, 42);

        assert!(i64::try_from(Value::from(42.5)).is_err());
        assert!(i64::try_from(Value::from("test")).is_err());
    }

    #[test]
    fn test_tryfrom_other() {
        assert_eq!(f64::try_from(Value::from(42)).unwrap(), 42.0);
        assert!(bool::try_from(Value::Bool(true)).unwrap());
        assert!(bool::try_from(Value::from(1)).is_err());
        assert_eq!(String::try_from(Value::from("hi")).unwrap(), "hi");
        assert!(String::try_from(Value::Null).is_err());
    }

    #[test]
    fn test_number_equality_is_numeric() {
        assert_eq!(Value::from(1), Value::from(1.0));
        assert_ne!(Value::from(1), Value::from(1.5));
        assert_ne!(Value::from(f64::NAN), Value::from(f64::NAN));
        assert_eq!(Number::from(u64::MAX), Number::Float(u64::MAX as f64));
    }

    #[test]
    fn test_number_display() {
        assert_eq!(Number::Integer(-7).to_string(), "-7");
        assert_eq!(Number::Float(1.0).to_string(), "1");
        assert_eq!(Number::Float(-0.0).to_string(), "0");
        assert_eq!(Number::Float(0.1).to_string(), "0.1");
        assert_eq!(Number::Float(f64::NAN).to_string(), "NaN");
        assert_eq!(Number::Float(f64::NEG_INFINITY).to_string(), "-Infinity");
    }

    #[test]
    fn test_float_display_switches_to_exponent() {
        assert_eq!(Number::Float(1e300).to_string(), "1e+300");
        assert_eq!(Number::Float(-1.5e300).to_string(), "-1.5e+300");
        assert_eq!(Number::Float(1e21).to_string(), "1e+21");
        assert_eq!(Number::Float(1e20).to_string(), "100000000000000000000");
        assert_eq!(Number::Float(1e-7).to_string(), "1e-7");
        assert_eq!(Number::Float(2.5e-8).to_string(), "2.5e-8");
        assert_eq!(Number::Float(1e-6).to_string(), "0.000001");
        assert_eq!(Number::Float(123.456).to_string(), "123.456");
        assert_eq!(Number::Float(-0.5).to_string(), "-0.5");
        assert_eq!(Number::Float(5e-324).to_string(), "5e-324");
        assert_eq!(Number::Float(f64::MAX).to_string(), "1.7976931348623157e+308");
    }

    #[test]
    fn test_null_and_undefined_are_distinct() {
        assert_ne!(Value::Null, Value::Undefined);
        assert!(Value::default().is_null());
    }

    #[test]
    fn test_custom_and_function_identity() {
        let custom = Value::custom(Point(1, 2));
        assert_eq!(custom, custom.clone());
        assert_ne!(custom, Value::custom(Point(1, 2)));

        let f = Value::function(|args| Value::from(args.len()));
        assert_eq!(f, f.clone());
        if let Value::Function(callable) = &f {
            assert_eq!(callable.call(&[Value::Null, Value::Null]), Value::from(2));
        }
    }

    #[test]
    fn test_serde_view_resolves_custom() {
        let value = Value::custom(Point(3, 4));
        assert_eq!(serde_json::to_string(&value).unwrap(), "[3,4]");
    }

    #[test]
    fn test_deserialize_keeps_order() {
        let value: Value = serde_json::from_str(r#"{"b":1,"a":[true,null]}"#).unwrap();
        let obj = value.as_object().unwrap();
        let keys: Vec<_> = obj.keys().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(
            obj.get("a"),
            Some(&Value::Array(vec![Value::Bool(true), Value::Null]))
        );
    }
}
