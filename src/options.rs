//! Configuration options for serialization and parsing.
//!
//! This module provides types to customize how values are encoded and decoded:
//!
//! - [`JsonOptions`]: Main configuration struct
//! - [`Backend`]: Choice between the hand-rolled codec and the native `serde_json` codec
//! - [`Separator`]: Separator placed between mapping pairs
//!
//! ## Examples
//!
//! ```rust
//! use canon_json::{serialize_with_options, value, JsonOptions, Separator};
//!
//! let data = value!({ "x": 1, "y": 2 });
//!
//! let options = JsonOptions::new().with_separator(Separator::Spaced);
//! let json = serialize_with_options(&data, &options).unwrap();
//! assert_eq!(json.as_deref(), Some(r#"{"x":1, "y":2}"#));
//! ```

/// Default nesting limit, matching the recursion limit of `serde_json`.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Codec strategy, chosen once when the options are built.
///
/// - **Fallback**: the crate's own canonical serializer and guarded parser
/// - **Native**: delegate whole calls to `serde_json`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Backend {
    #[default]
    Fallback,
    Native,
}

/// Separator between `"key":value` pairs in mapping output.
///
/// Sequences always use a bare `,`.
///
/// # Examples
///
/// ```rust
/// use canon_json::Separator;
///
/// assert_eq!(Separator::Compact.as_str(), ",");
/// assert_eq!(Separator::Spaced.as_str(), ", ");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Separator {
    #[default]
    Compact,
    Spaced,
}

impl Separator {
    /// Returns the string representation of this separator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Separator::Compact => ",",
            Separator::Spaced => ", ",
        }
    }
}

/// Configuration options for serialization and parsing.
///
/// # Examples
///
/// ```rust
/// use canon_json::{Backend, JsonOptions, Separator};
///
/// // Default: hand-rolled codec, compact separator, depth limit of 128
/// let options = JsonOptions::new();
/// assert_eq!(options.backend, Backend::Fallback);
///
/// // Delegate to serde_json
/// let options = JsonOptions::native();
///
/// // Custom configuration
/// let options = JsonOptions::new()
///     .with_separator(Separator::Spaced)
///     .with_max_depth(32);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JsonOptions {
    pub backend: Backend,
    pub separator: Separator,
    pub max_depth: usize,
}

impl Default for JsonOptions {
    fn default() -> Self {
        JsonOptions {
            backend: Backend::default(),
            separator: Separator::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl JsonOptions {
    /// Creates default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options that delegate to the native `serde_json` codec.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use canon_json::{Backend, JsonOptions};
    ///
    /// assert_eq!(JsonOptions::native().backend, Backend::Native);
    /// ```
    #[must_use]
    pub fn native() -> Self {
        JsonOptions {
            backend: Backend::Native,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    /// Sets the separator placed between mapping pairs.
    ///
    /// Only the fallback serializer honors it; `serde_json` always writes `,`.
    #[must_use]
    pub fn with_separator(mut self, separator: Separator) -> Self {
        self.separator = separator;
        self
    }

    /// Sets the maximum nesting depth accepted in either direction.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use canon_json::JsonOptions;
    ///
    /// let options = JsonOptions::new().with_max_depth(8);
    /// assert_eq!(options.max_depth, 8);
    /// ```
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
