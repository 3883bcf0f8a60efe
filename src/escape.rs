//! String literal escaping.
//!
//! [`quote`] turns any text into a double-quoted JSON string literal. Text without
//! special characters is wrapped as-is; otherwise `"`, `\` and the control ranges
//! U+0000..=U+001F and U+007F..=U+009F are escaped.

/// Returns `true` for characters that may not appear raw inside a literal.
#[inline]
fn needs_escape(ch: char) -> bool {
    matches!(ch, '"' | '\\' | '\u{00}'..='\u{1f}' | '\u{7f}'..='\u{9f}')
}

#[inline]
fn short_escape(ch: char) -> Option<&'static str> {
    match ch {
        '\u{0008}' => Some("\\b"),
        '\t' => Some("\\t"),
        '\n' => Some("\\n"),
        '\u{000C}' => Some("\\f"),
        '\r' => Some("\\r"),
        '"' => Some("\\\""),
        '\\' => Some("\\\\"),
        _ => None,
    }
}

/// Quotes and escapes `text` as a JSON string literal.
///
/// Characters with a short escape use it (`\b \t \n \f \r \" \\`); the remaining
/// control characters use `\u00XX` with lowercase hex digits.
///
/// # Examples
///
/// ```rust
/// use canon_json::quote;
///
/// assert_eq!(quote("apple"), r#""apple""#);
/// assert_eq!(
///     quote(r#""Where are we going?", she asked."#),
///     r#""\"Where are we going?\", she asked.""#
/// );
/// assert_eq!(quote("a\u{7}b"), r#""a\u0007b""#);
/// ```
#[must_use]
pub fn quote(text: &str) -> String {
    let mut output = String::with_capacity(text.len() + 2);
    write_quoted(&mut output, text);
    output
}

/// Appends the quoted form of `text` to `output`.
pub(crate) fn write_quoted(output: &mut String, text: &str) {
    output.push('"');
    if !text.chars().any(needs_escape) {
        output.push_str(text);
        output.push('"');
        return;
    }

    for ch in text.chars() {
        if !needs_escape(ch) {
            output.push(ch);
        } else if let Some(escaped) = short_escape(ch) {
            output.push_str(escaped);
        } else {
            // only reached below U+00A0, so two hex digits suffice
            output.push_str(&format!("\\u{:04x}", ch as u32));
        }
    }
    output.push('"');
}
