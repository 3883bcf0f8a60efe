//! JSON parsing and `Value` deserialization.
//!
//! This module provides the [`Parser`], a strict recursive-descent parser for
//! RFC 8259 JSON text, and the `serde` deserializer behind
//! [`from_value`](crate::from_value).
//!
//! ## Overview
//!
//! - **Single pass**: no backtracking except to pair UTF-16 surrogate escapes
//! - **Strict grammar**: no comments, trailing commas, leading zeros, or bare words
//! - **Bounded nesting**: arrays and objects deeper than `max_depth` fail with
//!   [`Error::DepthExceeded`] instead of exhausting the stack
//! - **Error reporting**: line/column positions, never the input text itself
//!
//! Integers that fit in an `i64` become [`Number::Integer`]; every other number is a
//! [`Number::Float`]. An unpaired surrogate escape decodes to U+FFFD. Duplicate keys
//! keep the first position and the last value.
//!
//! ## Usage
//!
//! ```rust
//! use canon_json::{parse, Value};
//!
//! let value = parse(r#"{"id": 7, "tags": ["a", "b"]}"#).unwrap();
//! assert_eq!(value.as_object().and_then(|o| o.get("id")), Some(&Value::from(7)));
//!
//! assert!(parse("[1,]").is_err());
//! ```

use crate::options::DEFAULT_MAX_DEPTH;
use crate::{Error, Key, Map, Number, Result, Value};
use serde::de::IntoDeserializer;
use serde::{de, forward_to_deserialize_any};

/// The recursive-descent JSON parser.
///
/// Created via [`Parser::new`]; consumed by [`Parser::parse`].
pub struct Parser<'a> {
    input: &'a str,
    position: usize,
    line: usize,
    column: usize,
    depth: usize,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str, max_depth: usize) -> Self {
        Parser {
            input,
            position: 0,
            line: 1,
            column: 1,
            depth: 0,
            max_depth,
        }
    }

    /// Parses the whole input as a single JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Syntax`] or [`Error::UnexpectedEof`] for malformed text,
    /// including trailing content after the value, and [`Error::DepthExceeded`] for
    /// nesting beyond the limit.
    pub fn parse(mut self) -> Result<Value> {
        self.skip_whitespace();
        let value = self.parse_value()?;
        self.skip_whitespace();
        if !self.at_end() {
            return Err(self.syntax("trailing characters after value"));
        }
        Ok(value)
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn next_char(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.position += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn syntax(&self, msg: &str) -> Error {
        Error::syntax(self.line, self.column, msg)
    }

    fn eof(&self, expected: &str) -> Error {
        Error::unexpected_eof(self.line, self.column, expected)
    }

    /// JSON whitespace only: space, tab, line feed, carriage return.
    fn skip_whitespace(&mut self) {
        while let Some(' ' | '\t' | '\n' | '\r') = self.peek_char() {
            self.next_char();
        }
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > self.max_depth {
            tracing::debug!(limit = self.max_depth, "parser depth limit hit");
            return Err(Error::depth_exceeded(self.max_depth));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn parse_value(&mut self) -> Result<Value> {
        match self.peek_char() {
            None => Err(self.eof("a value")),
            Some('{') => self.parse_object(),
            Some('[') => self.parse_array(),
            Some('"') => Ok(Value::String(self.parse_string()?)),
            Some('t') => self.parse_literal("true", Value::Bool(true)),
            Some('f') => self.parse_literal("false", Value::Bool(false)),
            Some('n') => self.parse_literal("null", Value::Null),
            Some(ch) if ch == '-' || ch.is_ascii_digit() => Ok(Value::Number(self.parse_number()?)),
            Some(_) => Err(self.syntax("expected a value")),
        }
    }

    fn parse_literal(&mut self, literal: &str, value: Value) -> Result<Value> {
        if self.input[self.position..].starts_with(literal) {
            for _ in 0..literal.len() {
                self.next_char();
            }
            Ok(value)
        } else if literal.starts_with(&self.input[self.position..]) {
            Err(self.eof(literal))
        } else {
            Err(self.syntax("invalid literal"))
        }
    }

    fn eat_digits(&mut self) -> usize {
        let mut count = 0;
        while matches!(self.peek_char(), Some(ch) if ch.is_ascii_digit()) {
            self.next_char();
            count += 1;
        }
        count
    }

    fn parse_number(&mut self) -> Result<Number> {
        let start = self.position;

        if self.peek_char() == Some('-') {
            self.next_char();
        }

        match self.peek_char() {
            Some('0') => {
                self.next_char();
            }
            Some(ch) if ch.is_ascii_digit() => {
                self.eat_digits();
            }
            Some(_) => return Err(self.syntax("expected digit")),
            None => return Err(self.eof("digit")),
        }

        let mut is_float = false;

        if self.peek_char() == Some('.') {
            is_float = true;
            self.next_char();
            if self.eat_digits() == 0 {
                return Err(match self.peek_char() {
                    Some(_) => self.syntax("expected digit after decimal point"),
                    None => self.eof("digit"),
                });
            }
        }

        if let Some('e' | 'E') = self.peek_char() {
            is_float = true;
            self.next_char();
            if let Some('+' | '-') = self.peek_char() {
                self.next_char();
            }
            if self.eat_digits() == 0 {
                return Err(match self.peek_char() {
                    Some(_) => self.syntax("expected digit in exponent"),
                    None => self.eof("digit"),
                });
            }
        }

        let text = &self.input[start..self.position];
        if !is_float {
            if let Ok(i) = text.parse::<i64>() {
                return Ok(Number::Integer(i));
            }
        }
        text.parse::<f64>()
            .map(Number::Float)
            .map_err(|_| self.syntax("invalid number"))
    }

    fn parse_string(&mut self) -> Result<String> {
        self.next_char(); // consume opening quote
        let mut result = String::new();

        loop {
            match self.next_char() {
                None => return Err(self.eof("closing quote")),
                Some('"') => return Ok(result),
                Some('\\') => match self.next_char() {
                    Some('"') => result.push('"'),
                    Some('\\') => result.push('\\'),
                    Some('/') => result.push('/'),
                    Some('b') => result.push('\u{0008}'),
                    Some('f') => result.push('\u{000C}'),
                    Some('n') => result.push('\n'),
                    Some('r') => result.push('\r'),
                    Some('t') => result.push('\t'),
                    Some('u') => self.parse_unicode_escape(&mut result)?,
                    Some(_) => return Err(self.syntax("invalid escape sequence")),
                    None => return Err(self.eof("escape sequence")),
                },
                Some(ch) if (ch as u32) < 0x20 => {
                    return Err(self.syntax("control character in string"))
                }
                Some(ch) => result.push(ch),
            }
        }
    }

    fn read_hex4(&mut self) -> Result<u32> {
        let mut code = 0;
        for _ in 0..4 {
            let digit = match self.next_char() {
                Some(ch) => ch
                    .to_digit(16)
                    .ok_or_else(|| self.syntax("invalid unicode escape (expected 4 hex digits)"))?,
                None => return Err(self.eof("hex digit")),
            };
            code = code * 16 + digit;
        }
        Ok(code)
    }

    fn parse_unicode_escape(&mut self, out: &mut String) -> Result<()> {
        let first = self.read_hex4()?;

        if (0xD800..0xDC00).contains(&first) && self.input[self.position..].starts_with("\\u") {
            let saved = (self.position, self.line, self.column);
            self.next_char();
            self.next_char();
            let second = self.read_hex4()?;
            if (0xDC00..0xE000).contains(&second) {
                let code = 0x10000 + ((first - 0xD800) << 10) + (second - 0xDC00);
                out.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
                return Ok(());
            }
            // not a low surrogate: decode it on its own next time round
            (self.position, self.line, self.column) = saved;
        }

        out.push(char::from_u32(first).unwrap_or(char::REPLACEMENT_CHARACTER));
        Ok(())
    }

    fn parse_array(&mut self) -> Result<Value> {
        self.next_char(); // consume '['
        self.enter()?;

        let mut elements = Vec::new();
        self.skip_whitespace();
        if self.peek_char() == Some(']') {
            self.next_char();
            self.leave();
            return Ok(Value::Array(elements));
        }

        loop {
            self.skip_whitespace();
            elements.push(self.parse_value()?);
            self.skip_whitespace();

            match self.next_char() {
                Some(',') => continue,
                Some(']') => break,
                Some(_) => return Err(self.syntax("expected ',' or ']'")),
                None => return Err(self.eof("',' or ']'")),
            }
        }

        self.leave();
        Ok(Value::Array(elements))
    }

    fn parse_object(&mut self) -> Result<Value> {
        self.next_char(); // consume '{'
        self.enter()?;

        let mut map = Map::new();
        self.skip_whitespace();
        if self.peek_char() == Some('}') {
            self.next_char();
            self.leave();
            return Ok(Value::Object(map));
        }

        loop {
            self.skip_whitespace();
            match self.peek_char() {
                Some('"') => {}
                Some(_) => return Err(self.syntax("expected string key")),
                None => return Err(self.eof("string key")),
            }
            let key = self.parse_string()?;

            self.skip_whitespace();
            match self.next_char() {
                Some(':') => {}
                Some(_) => return Err(self.syntax("expected ':' after key")),
                None => return Err(self.eof("':'")),
            }

            self.skip_whitespace();
            let value = self.parse_value()?;
            map.insert(key, value);

            self.skip_whitespace();
            match self.next_char() {
                Some(',') => continue,
                Some('}') => break,
                Some(_) => return Err(self.syntax("expected ',' or '}'")),
                None => return Err(self.eof("',' or '}'")),
            }
        }

        self.leave();
        Ok(Value::Object(map))
    }
}

/// Follows custom representations until a plain value appears.
fn resolve(value: Value) -> Result<Value> {
    let mut current = value;
    for _ in 0..DEFAULT_MAX_DEPTH {
        match current {
            Value::Custom(custom) => current = custom.to_representation(),
            other => return Ok(other),
        }
    }
    Err(Error::depth_exceeded(DEFAULT_MAX_DEPTH))
}

struct SeqDeserializer {
    iter: std::vec::IntoIter<Value>,
}

impl SeqDeserializer {
    fn new(vec: Vec<Value>) -> Self {
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
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

struct MapDeserializer {
    iter: indexmap::map::IntoIter<Key, Value>,
    value: Option<Value>,
}

impl MapDeserializer {
    fn new(map: Map) -> Self {
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
                seed.deserialize(KeyDeserializer { key }).map(Some)
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
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

/// Deserializes a mapping key.
///
/// String keys also deserialize into integer types, so `{"1": ..}` can fill a
/// `HashMap<u32, _>`.
struct KeyDeserializer {
    key: Key,
}

macro_rules! deserialize_integer_key {
    ($($method:ident => $visit:ident: $ty:ty),* $(,)?) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value>
            where
                V: de::Visitor<'de>,
            {
                match self.key {
                    Key::String(s) => match s.parse::<$ty>() {
                        Ok(n) => visitor.$visit(n),
                        Err(_) => Err(Error::custom(format!(
                            "invalid {} map key",
                            stringify!($ty)
                        ))),
                    },
                    key => de::Deserializer::deserialize_any(KeyDeserializer { key }, visitor),
                }
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for KeyDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.key {
            Key::String(s) => visitor.visit_string(s),
            Key::Number(Number::Integer(i)) => visitor.visit_i64(i),
            Key::Number(Number::Float(f)) => visitor.visit_f64(f),
            Key::Bool(b) => visitor.visit_bool(b),
            Key::Null => visitor.visit_unit(),
        }
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_string(self.key.to_string())
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_string(self.key.to_string())
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_string(self.key.to_string())
    }

    deserialize_integer_key! {
        deserialize_i8 => visit_i8: i8,
        deserialize_i16 => visit_i16: i16,
        deserialize_i32 => visit_i32: i32,
        deserialize_i64 => visit_i64: i64,
        deserialize_u8 => visit_u8: u8,
        deserialize_u16 => visit_u16: u16,
        deserialize_u32 => visit_u32: u32,
        deserialize_u64 => visit_u64: u64,
    }

    forward_to_deserialize_any! {
        bool i128 u128 f32 f64 char bytes byte_buf option unit unit_struct
        newtype_struct seq tuple tuple_struct map struct enum ignored_any
    }
}

struct EnumDeserializer {
    variant: String,
    value: Option<Value>,
}

impl<'de> de::EnumAccess<'de> for EnumDeserializer {
    type Error = Error;
    type Variant = VariantDeserializer;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let variant = seed.deserialize(ValueDeserializer::new(Value::String(self.variant)))?;
        let visitor = VariantDeserializer { value: self.value };
        Ok((variant, visitor))
    }
}

struct VariantDeserializer {
    value: Option<Value>,
}

impl<'de> de::VariantAccess<'de> for VariantDeserializer {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        match self.value {
            Some(Value::Null) | None => Ok(()),
            _ => Err(Error::custom("Expected unit variant")),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.value {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)),
            None => Err(Error::custom("Expected newtype variant")),
        }
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Some(Value::Array(arr)) => visitor.visit_seq(SeqDeserializer::new(arr)),
            _ => Err(Error::custom("Expected tuple variant")),
        }
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Some(Value::Object(obj)) => visitor.visit_map(MapDeserializer::new(obj)),
            _ => Err(Error::custom("Expected struct variant")),
        }
    }
}

/// A `serde` deserializer reading from an owned [`Value`].
pub struct ValueDeserializer {
    value: Value,
}

impl ValueDeserializer {
    pub fn new(value: Value) -> Self {
        ValueDeserializer { value }
    }
}

impl<'de> de::Deserializer<'de> for ValueDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match resolve(self.value)? {
            Value::Null | Value::Undefined | Value::Function(_) => visitor.visit_unit(),
            Value::Bool(b) => visitor.visit_bool(b),
            Value::Number(Number::Integer(i)) => visitor.visit_i64(i),
            Value::Number(Number::Float(f)) => visitor.visit_f64(f),
            Value::String(s) => visitor.visit_string(s),
            Value::Date(dt) => visitor.visit_string(crate::ser::format_date(&dt)),
            Value::Array(arr) => visitor.visit_seq(SeqDeserializer::new(arr)),
            Value::Object(obj) => visitor.visit_map(MapDeserializer::new(obj)),
            Value::Custom(_) => Err(Error::depth_exceeded(DEFAULT_MAX_DEPTH)),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match resolve(self.value)? {
            Value::Null | Value::Undefined => visitor.visit_none(),
            value => visitor.visit_some(ValueDeserializer::new(value)),
        }
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
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
        match resolve(self.value)? {
            Value::String(s) => visitor.visit_enum(s.into_deserializer()),
            Value::Object(obj) if obj.len() == 1 => {
                let mut entries = obj.into_iter();
                match entries.next() {
                    Some((variant, value)) => visitor.visit_enum(EnumDeserializer {
                        variant: variant.to_string(),
                        value: Some(value),
                    }),
                    None => Err(Error::custom("Expected enum variant")),
                }
            }
            _ => Err(Error::custom("Expected enum")),
        }
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple
        tuple_struct map struct identifier ignored_any
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Result<Value> {
        Parser::new(input, DEFAULT_MAX_DEPTH).parse()
    }

    #[test]
    fn test_scalars() {
        assert_eq!(parse("null").unwrap(), Value::Null);
        assert_eq!(parse(" true ").unwrap(), Value::Bool(true));
        assert_eq!(parse("false").unwrap(), Value::Bool(false));
        assert_eq!(parse("-12").unwrap(), Value::Number(Number::Integer(-12)));
        assert_eq!(parse("0.5").unwrap(), Value::Number(Number::Float(0.5)));
        assert_eq!(parse("1E+2").unwrap(), Value::from(100.0));
        assert!(parse("1e2").unwrap().as_f64() == Some(100.0));
    }

    #[test]
    fn test_integer_overflow_becomes_float() {
        match parse("123456789012345678901234567890").unwrap() {
            Value::Number(Number::Float(f)) => assert_eq!(f, 1.2345678901234568e29),
            other => panic!("Expected float, got {:?}", other),
        }
    }

    #[test]
    fn test_strings_and_escapes() {
        assert_eq!(
            parse(r#""a\"b\\c\/d\b\f\n\r\t""#).unwrap(),
            Value::from("a\"b\\c/d\u{8}\u{c}\n\r\t")
        );
        assert_eq!(parse(r#""é""#).unwrap(), Value::from("é"));
        assert_eq!(parse(r#""😀""#).unwrap(), Value::from("😀"));
        assert_eq!(parse(r#""\ud83dx""#).unwrap(), Value::from("\u{fffd}x"));
        assert_eq!(
            parse(r#""\ud83dA""#).unwrap(),
            Value::from("\u{fffd}A")
        );
        assert_eq!(parse(r#""\ude00""#).unwrap(), Value::from("\u{fffd}"));
    }

    #[test]
    fn test_nested() {
        let value = parse(r#" { "a" : [ 1 , { "b" : null } ] , "c" : "d" } "#).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        let a = obj.get("a").and_then(|v| v.as_array()).unwrap();
        assert_eq!(a[0], Value::from(1));
        assert_eq!(a[1].as_object().and_then(|o| o.get("b")), Some(&Value::Null));
    }

    #[test]
    fn test_duplicate_keys_last_wins() {
        let value = parse(r#"{"a":1,"b":2,"a":3}"#).unwrap();
        let obj = value.as_object().unwrap();
        let keys: Vec<_> = obj.keys().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(obj.get("a"), Some(&Value::from(3)));
    }

    #[test]
    fn test_syntax_errors() {
        for input in [
            "[1,]",
            "{\"a\":1,}",
            "01",
            "1.",
            "-",
            ".5",
            "+1",
            "tru",
            "nul x",
            "{a:1}",
            "'x'",
            "\"tab\there\"",
            "\"bad \\x escape\"",
            "[1 2]",
            "1 2",
            "",
            "[",
            "\"open",
            "NaN",
            "Infinity",
        ] {
            let err = parse(input).unwrap_err();
            assert!(err.is_syntax(), "{:?} gave {:?}", input, err);
        }
    }

    #[test]
    fn test_error_positions() {
        let err = parse("[1,\n  2,\n  x]").unwrap_err();
        assert_eq!(err, Error::syntax(3, 3, "expected a value"));

        let err = parse("{\"a\": [1, 2").unwrap_err();
        assert!(matches!(err, Error::UnexpectedEof { line: 1, .. }));
    }

    #[test]
    fn test_depth_limit() {
        let deep = format!("{}{}", "[".repeat(5), "]".repeat(5));
        assert!(Parser::new(&deep, 5).parse().is_ok());
        assert_eq!(
            Parser::new(&deep, 4).parse().unwrap_err(),
            Error::depth_exceeded(4)
        );

        let hostile = "[".repeat(100_000);
        assert_eq!(
            parse(&hostile).unwrap_err(),
            Error::depth_exceeded(DEFAULT_MAX_DEPTH)
        );
    }

    #[test]
    fn test_value_deserializer_option_and_enum() {
        use serde::Deserialize;

        #[derive(Deserialize, Debug, PartialEq)]
        enum Shape {
            Unit,
            Circle(f64),
            Rect { w: u32, h: u32 },
        }

        #[derive(Deserialize, Debug, PartialEq)]
        struct Doc {
            name: Option<String>,
            shapes: Vec<Shape>,
        }

        let value = parse(
            r#"{"name":null,"shapes":["Unit",{"Circle":1.5},{"Rect":{"w":2,"h":3}}]}"#,
        )
        .unwrap();
        let doc = Doc::deserialize(ValueDeserializer::new(value)).unwrap();
        assert_eq!(
            doc,
            Doc {
                name: None,
                shapes: vec![Shape::Unit, Shape::Circle(1.5), Shape::Rect { w: 2, h: 3 }],
            }
        );
    }

    #[test]
    fn test_value_deserializer_option_resolves_custom() {
        use crate::Representable;
        use serde::Deserialize;

        #[derive(Debug)]
        struct Missing;

        impl Representable for Missing {
            fn to_representation(&self) -> Value {
                Value::Null
            }
        }

        #[derive(Debug)]
        struct Count;

        impl Representable for Count {
            fn to_representation(&self) -> Value {
                Value::from(4)
            }
        }

        let none = Option::<u32>::deserialize(ValueDeserializer::new(Value::custom(Missing)));
        assert_eq!(none.unwrap(), None);

        let some = Option::<u32>::deserialize(ValueDeserializer::new(Value::custom(Count)));
        assert_eq!(some.unwrap(), Some(4));
    }

    #[test]
    fn test_value_deserializer_integer_keys() {
        use serde::Deserialize;
        use std::collections::BTreeMap;

        let value = parse(r#"{"2":"b","1":"a"}"#).unwrap();
        let map = BTreeMap::<u32, String>::deserialize(ValueDeserializer::new(value)).unwrap();
        assert_eq!(map.get(&1).map(String::as_str), Some("a"));
        assert_eq!(map.len(), 2);
    }
}
