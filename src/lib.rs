//! # canon_json
//!
//! Canonical JSON text for dynamic values, and a guarded parser for untrusted input.
//!
//! ## Key Features
//!
//! - **Canonical output**: one fixed text per value, with insertion-ordered mappings
//!   and minimal escaping
//! - **Absent values**: undefined and function values vanish from mappings, become
//!   `null` in sequences, and produce no text at all at the top level
//! - **Custom types**: anything implementing [`Representable`] serializes through its
//!   representation
//! - **Guarded parsing**: a textual check rejects anything that is not JSON-shaped
//!   before a strict parser runs
//! - **Two backends**: the hand-rolled codec, or `serde_json` via [`Backend::Native`]
//! - **Bounded recursion**: nesting beyond [`JsonOptions::max_depth`] is an error,
//!   never a stack overflow
//!
//! ## Quick Start
//!
//! ```rust
//! use canon_json::{parse_guarded, serialize, value, Value};
//!
//! let data = value!({
//!     "name": "Alice",
//!     "tags": ["rust", "json"]
//! });
//!
//! let text = serialize(&data).unwrap().unwrap();
//! assert_eq!(text, r#"{"name":"Alice","tags":["rust","json"]}"#);
//!
//! let back = parse_guarded(&text).unwrap();
//! assert_eq!(back, data);
//!
//! // code is rejected before anything is parsed
//! let err = parse_guarded("a;evilCall()").unwrap_err();
//! assert!(err.is_format());
//! ```
//!
//! ### Typed data
//!
//! ```rust
//! use canon_json::{from_str, serialize, to_value};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! let text = serialize(&to_value(&Point { x: 1, y: 2 }).unwrap()).unwrap().unwrap();
//! assert_eq!(text, r#"{"x":1,"y":2}"#);
//!
//! let point: Point = from_str(&text).unwrap();
//! assert_eq!(point, Point { x: 1, y: 2 });
//! ```
//!
//! ## Safety Guarantees
//!
//! - No `unsafe` code blocks
//! - Error messages never include the input text
//! - No panics in public API (except for logic errors that indicate bugs)

pub mod de;
pub mod error;
pub mod escape;
pub mod guard;
pub mod macros;
pub mod map;
mod native;
pub mod options;
pub mod ser;
pub mod value;

pub use de::{Parser, ValueDeserializer};
pub use error::{Error, ErrorKind, Result};
pub use escape::quote;
pub use map::{Key, Map};
pub use options::{Backend, JsonOptions, Separator};
pub use ser::{Serializer, ValueSerializer};
pub use value::{Callable, Number, Representable, Value};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Serializes a value to canonical JSON text with default options.
///
/// Returns `Ok(None)` when the value has no textual form: undefined, a function,
/// or a custom value representing one of those.
///
/// # Examples
///
/// ```rust
/// use canon_json::{serialize, Value};
///
/// let list = Value::from(vec![Value::Undefined, Value::from(1), Value::Undefined]);
/// assert_eq!(serialize(&list).unwrap().as_deref(), Some("[null,1,null]"));
/// assert_eq!(serialize(&Value::Undefined).unwrap(), None);
/// ```
///
/// # Errors
///
/// Returns [`Error::DepthExceeded`] when nesting exceeds the default limit.
pub fn serialize(value: &Value) -> Result<Option<String>> {
    serialize_with_options(value, &JsonOptions::default())
}

/// Serializes a value with custom options.
///
/// # Examples
///
/// ```rust
/// use canon_json::{serialize_with_options, value, JsonOptions};
///
/// let data = value!({ "n": 1.5 });
/// let text = serialize_with_options(&data, &JsonOptions::native()).unwrap();
/// assert_eq!(text.as_deref(), Some(r#"{"n":1.5}"#));
/// ```
///
/// # Errors
///
/// Returns [`Error::DepthExceeded`] when nesting exceeds `options.max_depth`.
pub fn serialize_with_options(value: &Value, options: &JsonOptions) -> Result<Option<String>> {
    tracing::trace!(backend = ?options.backend, "serialize");
    match options.backend {
        Backend::Fallback => ser::to_canonical(value, options),
        Backend::Native => native::encode(value, options),
    }
}

/// Parses JSON text without the textual guard.
///
/// # Examples
///
/// ```rust
/// use canon_json::{parse, Value};
///
/// assert_eq!(parse("[1, 2]").unwrap(), Value::from(vec![Value::from(1), Value::from(2)]));
/// assert!(parse("[1,]").unwrap_err().is_syntax());
/// ```
///
/// # Errors
///
/// Returns [`Error::Syntax`] or [`Error::UnexpectedEof`] for malformed text and
/// [`Error::DepthExceeded`] for excessive nesting.
pub fn parse(source: &str) -> Result<Value> {
    parse_with_options(source, &JsonOptions::default())
}

/// Parses JSON text without the textual guard, with custom options.
///
/// # Errors
///
/// See [`parse`].
pub fn parse_with_options(source: &str, options: &JsonOptions) -> Result<Value> {
    tracing::trace!(backend = ?options.backend, "parse");
    match options.backend {
        Backend::Fallback => Parser::new(source, options.max_depth).parse(),
        Backend::Native => native::decode(source, options),
    }
}

/// Parses untrusted JSON text.
///
/// On the fallback backend the text must first pass [`guard::check`]; only then
/// does the parser run.
///
/// # Examples
///
/// ```rust
/// use canon_json::{parse_guarded, ErrorKind};
///
/// assert!(parse_guarded(r#"{"ok": true}"#).is_ok());
/// assert_eq!(parse_guarded("alert(1)").unwrap_err().kind(), ErrorKind::Format);
/// assert_eq!(parse_guarded("[1,]").unwrap_err().kind(), ErrorKind::Syntax);
/// ```
///
/// # Errors
///
/// Returns [`Error::Format`] when the guard rejects the text, otherwise the errors of
/// [`parse`].
pub fn parse_guarded(source: &str) -> Result<Value> {
    parse_guarded_with_options(source, &JsonOptions::default())
}

/// Parses untrusted JSON text with custom options.
///
/// The native backend is a real parser already and skips the guard.
///
/// # Errors
///
/// See [`parse_guarded`].
pub fn parse_guarded_with_options(source: &str, options: &JsonOptions) -> Result<Value> {
    tracing::trace!(backend = ?options.backend, "parse_guarded");
    match options.backend {
        Backend::Fallback => {
            guard::check(source)?;
            Parser::new(source, options.max_depth).parse()
        }
        Backend::Native => native::decode(source, options),
    }
}

/// Converts any `T: Serialize` into a [`Value`].
///
/// Map keys must serialize to strings or integers.
///
/// # Examples
///
/// ```rust
/// use canon_json::{to_value, Value};
/// use std::collections::BTreeMap;
///
/// let mut scores = BTreeMap::new();
/// scores.insert("alice", 3);
/// let value = to_value(&scores).unwrap();
/// assert_eq!(value.as_object().and_then(|o| o.get("alice")), Some(&Value::from(3)));
/// ```
///
/// # Errors
///
/// Returns an error for unsupported map keys or a failing `Serialize` impl.
pub fn to_value<T>(value: &T) -> Result<Value>
where
    T: Serialize + ?Sized,
{
    ser::to_value(value)
}

/// Interprets a [`Value`] as an instance of `T`.
///
/// # Errors
///
/// Returns an error if the value does not match the shape of `T`.
pub fn from_value<T>(value: Value) -> Result<T>
where
    T: DeserializeOwned,
{
    T::deserialize(ValueDeserializer::new(value))
}

/// Parses untrusted JSON text into an instance of `T`.
///
/// Equivalent to [`parse_guarded`] followed by [`from_value`].
///
/// # Errors
///
/// Returns the errors of [`parse_guarded`], or a data error if the parsed value does
/// not match the shape of `T`.
pub fn from_str<T>(source: &str) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    from_value(parse_guarded(source)?)
}
