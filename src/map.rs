//! Ordered map type for mapping values.
//!
//! This module provides [`Map`], a wrapper around [`IndexMap`] that keeps entries in
//! insertion order, and [`Key`], the set of key kinds a mapping may hold.
//!
//! Serialized output walks entries in insertion order, so the same map always
//! produces the same text. Equality ignores order.
//!
//! Only [`Key::String`] and [`Key::Number`] keys have a textual form; pairs under any
//! other key kind are dropped by the serializer. A number key is stored under its
//! canonical text, so `1` and `"1"` name the same entry.
//!
//! ## Examples
//!
//! ```rust
//! use canon_json::{Key, Map, Value};
//!
//! let mut map = Map::new();
//! map.insert("name", Value::from("Alice"));
//! map.insert(1, Value::from(30));
//!
//! assert_eq!(map.len(), 2);
//! assert_eq!(map.get("name").and_then(|v| v.as_str()), Some("Alice"));
//! assert_eq!(map.get_key(&Key::from(1)).and_then(|v| v.as_i64()), Some(30));
//! assert_eq!(map.get("1").and_then(|v| v.as_i64()), Some(30));
//! ```

use crate::{Number, Value};
use indexmap::map::{IntoIter, Iter, Keys, Values};
use indexmap::{Equivalent, IndexMap};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A mapping key.
#[derive(Clone, Debug)]
pub enum Key {
    String(String),
    Number(Number),
    Bool(bool),
    Null,
}

impl Key {
    /// Returns `true` if pairs under this key can be written out.
    #[inline]
    #[must_use]
    pub const fn is_representable(&self) -> bool {
        matches!(self, Key::String(_) | Key::Number(_))
    }

    /// Rewrites a number key as the string it serializes to.
    #[must_use]
    pub fn canonical(self) -> Key {
        match self {
            Key::Number(n) => Key::String(n.to_string()),
            key => key,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Key::String(s) => Some(s),
            _ => None,
        }
    }
}

// Floats compare and hash by bit pattern so that `Key` is a lawful `Eq`.
impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Key::String(a), Key::String(b)) => a == b,
            (Key::Number(Number::Integer(a)), Key::Number(Number::Integer(b))) => a == b,
            (Key::Number(Number::Float(a)), Key::Number(Number::Float(b))) => {
                a.to_bits() == b.to_bits()
            }
            (Key::Bool(a), Key::Bool(b)) => a == b,
            (Key::Null, Key::Null) => true,
            _ => false,
        }
    }
}

impl Eq for Key {}

impl Hash for Key {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Key::String(s) => s.hash(state),
            Key::Number(Number::Integer(i)) => {
                0u8.hash(state);
                i.hash(state);
            }
            Key::Number(Number::Float(f)) => {
                1u8.hash(state);
                f.to_bits().hash(state);
            }
            Key::Bool(b) => b.hash(state),
            Key::Null => {}
        }
    }
}

/// Lookup by `&str` without allocating a `Key`.
///
/// Must hash exactly like `Key::String`, which hashes its discriminant first.
struct StrKey<'a>(&'a str);

impl Hash for StrKey<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(&Key::String(String::new())).hash(state);
        self.0.hash(state);
    }
}

impl Equivalent<Key> for StrKey<'_> {
    fn equivalent(&self, key: &Key) -> bool {
        key.as_str() == Some(self.0)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::String(s) => f.write_str(s),
            Key::Number(n) => write!(f, "{}", n),
            Key::Bool(b) => write!(f, "{}", b),
            Key::Null => f.write_str("null"),
        }
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Key::String(value)
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Key::String(value.to_string())
    }
}

impl From<i32> for Key {
    fn from(value: i32) -> Self {
        Key::Number(Number::Integer(value as i64))
    }
}

impl From<i64> for Key {
    fn from(value: i64) -> Self {
        Key::Number(Number::Integer(value))
    }
}

impl From<u32> for Key {
    fn from(value: u32) -> Self {
        Key::Number(Number::Integer(value as i64))
    }
}

impl From<f64> for Key {
    fn from(value: f64) -> Self {
        Key::Number(Number::Float(value))
    }
}

impl From<Number> for Key {
    fn from(value: Number) -> Self {
        Key::Number(value)
    }
}

impl From<bool> for Key {
    fn from(value: bool) -> Self {
        Key::Bool(value)
    }
}

/// An insertion-ordered map of [`Key`]s to [`Value`]s.
///
/// # Examples
///
/// ```rust
/// use canon_json::{Map, Value};
///
/// let mut map = Map::new();
/// map.insert("first", Value::from(1));
/// map.insert("second", Value::from(2));
///
/// // Iteration maintains insertion order
/// let keys: Vec<_> = map.keys().map(|k| k.to_string()).collect();
/// assert_eq!(keys, vec!["first", "second"]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Map(IndexMap<Key, Value>);

impl Map {
    #[must_use]
    pub fn new() -> Self {
        Map(IndexMap::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Map(IndexMap::with_capacity(capacity))
    }

    /// Inserts a key-value pair into the map.
    ///
    /// Number keys are stored as their canonical text. If the map already contained
    /// this key, the old value is returned and the entry keeps its original position.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use canon_json::{Map, Value};
    ///
    /// let mut map = Map::new();
    /// assert!(map.insert("key", Value::from(42)).is_none());
    /// assert!(map.insert("key", Value::from(43)).is_some());
    /// ```
    pub fn insert(&mut self, key: impl Into<Key>, value: Value) -> Option<Value> {
        self.0.insert(key.into().canonical(), value)
    }

    /// Returns a reference to the value stored under a string key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(&StrKey(key))
    }

    /// Returns a reference to the value stored under any key kind.
    #[must_use]
    pub fn get_key(&self, key: &Key) -> Option<&Value> {
        match key {
            Key::Number(n) => self.get(&n.to_string()),
            key => self.0.get(key),
        }
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(&StrKey(key))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the keys of the map, in insertion order.
    pub fn keys(&self) -> Keys<'_, Key, Value> {
        self.0.keys()
    }

    /// Returns an iterator over the values of the map, in insertion order.
    pub fn values(&self) -> Values<'_, Key, Value> {
        self.0.values()
    }

    /// Returns an iterator over the key-value pairs of the map, in insertion order.
    pub fn iter(&self) -> Iter<'_, Key, Value> {
        self.0.iter()
    }
}

impl Default for Map {
    fn default() -> Self {
        Self::new()
    }
}

impl IntoIterator for Map {
    type Item = (Key, Value);
    type IntoIter = IntoIter<Key, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Map {
    type Item = (&'a Key, &'a Value);
    type IntoIter = Iter<'a, Key, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<K: Into<Key>> FromIterator<(K, Value)> for Map {
    fn from_iter<T: IntoIterator<Item = (K, Value)>>(iter: T) -> Self {
        Map(iter
            .into_iter()
            .map(|(k, v)| (k.into().canonical(), v))
            .collect())
    }
}
