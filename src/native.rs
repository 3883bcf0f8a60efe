//! The `serde_json`-backed codec used by [`Backend::Native`](crate::Backend::Native).
//!
//! Encoding lowers a [`Value`] into a `serde_json::Value` first, applying the same
//! drop and substitution rules as the canonical serializer, then lets `serde_json`
//! write it. Mapping order survives through serde_json's `preserve_order` feature.
//! The outputs differ in three places: non-finite numbers become `null`, exponents
//! carry no `+` sign (`1e300`), and the pair separator is always `,`.
//!
//! Decoding is `serde_json::from_str` plus a nesting check against `max_depth`.

use crate::{Error, JsonOptions, Key, Map, Number, Result, Value};
use serde_json::Value as JsonValue;

struct Lowering {
    depth: usize,
    max_depth: usize,
}

impl Lowering {
    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > self.max_depth {
            tracing::debug!(limit = self.max_depth, "native encoder depth limit hit");
            return Err(Error::depth_exceeded(self.max_depth));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    /// Returns `None` for values with no textual form.
    fn lower(&mut self, value: &Value) -> Result<Option<JsonValue>> {
        let lowered = match value {
            Value::Null => JsonValue::Null,
            Value::Undefined | Value::Function(_) => return Ok(None),
            Value::Bool(b) => JsonValue::Bool(*b),
            Value::Number(Number::Integer(i)) => JsonValue::from(*i),
            Value::Number(Number::Float(f)) => serde_json::Number::from_f64(*f)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            Value::String(s) => JsonValue::String(s.clone()),
            Value::Date(dt) => JsonValue::String(crate::ser::format_date(dt)),
            Value::Custom(custom) => {
                self.enter()?;
                let lowered = self.lower(&custom.to_representation())?;
                self.leave();
                return Ok(lowered);
            }
            Value::Array(arr) => {
                self.enter()?;
                let mut elements = Vec::with_capacity(arr.len());
                for element in arr {
                    elements.push(self.lower(element)?.unwrap_or(JsonValue::Null));
                }
                self.leave();
                JsonValue::Array(elements)
            }
            Value::Object(obj) => {
                self.enter()?;
                let object = self.lower_object(obj)?;
                self.leave();
                JsonValue::Object(object)
            }
        };
        Ok(Some(lowered))
    }

    fn lower_object(&mut self, obj: &Map) -> Result<serde_json::Map<String, JsonValue>> {
        let mut object = serde_json::Map::with_capacity(obj.len());
        for (key, value) in obj {
            let key = match key {
                Key::String(s) => s.clone(),
                Key::Number(n) => n.to_string(),
                Key::Bool(_) | Key::Null => continue,
            };
            if let Some(lowered) = self.lower(value)? {
                object.insert(key, lowered);
            }
        }
        Ok(object)
    }
}

/// Encodes `value` through `serde_json`.
pub(crate) fn encode(value: &Value, options: &JsonOptions) -> Result<Option<String>> {
    let mut lowering = Lowering {
        depth: 0,
        max_depth: options.max_depth,
    };
    match lowering.lower(value)? {
        Some(lowered) => Ok(Some(serde_json::to_string(&lowered)?)),
        None => Ok(None),
    }
}

/// Decodes `source` through `serde_json`.
pub(crate) fn decode(source: &str, options: &JsonOptions) -> Result<Value> {
    let value: Value = serde_json::from_str(source)?;
    if nesting(&value) > options.max_depth {
        tracing::debug!(limit = options.max_depth, "native decoder depth limit hit");
        return Err(Error::depth_exceeded(options.max_depth));
    }
    Ok(value)
}

fn nesting(value: &Value) -> usize {
    match value {
        Value::Array(arr) => 1 + arr.iter().map(nesting).max().unwrap_or(0),
        Value::Object(obj) => 1 + obj.values().map(nesting).max().unwrap_or(0),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Separator;

    #[test]
    fn test_encode_matches_canonical_for_plain_values() {
        let mut map = Map::new();
        map.insert("a", Value::function(|_| Value::Null));
        map.insert(1, Value::from("x"));
        map.insert("b", Value::Undefined);
        map.insert("c", Value::from(3));
        map.insert("list", Value::Array(vec![Value::Undefined, Value::from(1.5)]));
        let value = Value::Object(map);

        let options = JsonOptions::native();
        assert_eq!(
            encode(&value, &options).unwrap().as_deref(),
            Some(r#"{"1":"x","c":3,"list":[null,1.5]}"#)
        );
    }

    #[test]
    fn test_encode_quirks() {
        let options = JsonOptions::native().with_separator(Separator::Spaced);
        assert_eq!(
            encode(&Value::from(f64::INFINITY), &options).unwrap().as_deref(),
            Some("null")
        );
        assert_eq!(
            encode(&Value::from(vec![Value::from(1), Value::from(2)]), &options)
                .unwrap()
                .as_deref(),
            Some("[1,2]")
        );
        assert_eq!(encode(&Value::Undefined, &options).unwrap(), None);
    }

    #[test]
    fn test_decode_and_depth() {
        let options = JsonOptions::native().with_max_depth(2);
        assert_eq!(
            decode("[[1]]", &options).unwrap(),
            Value::Array(vec![Value::Array(vec![Value::from(1)])])
        );
        assert_eq!(
            decode("[[[1]]]", &options).unwrap_err(),
            Error::depth_exceeded(2)
        );
        assert!(decode("[1,]", &options).unwrap_err().is_syntax());
        assert!(decode("[1", &options).unwrap_err().is_syntax());
    }
}
