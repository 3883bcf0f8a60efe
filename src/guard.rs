//! Textual pre-validation of untrusted input.
//!
//! [`check`] reduces a copy of the source in three regex passes and accepts it only if
//! what remains is structural punctuation. Anything that could be an identifier, a
//! call, or an operator survives the reduction and gets the text rejected before the
//! parser ever sees it.
//!
//! The check over-approximates: every valid JSON text passes, and some invalid ones
//! (`[1,]`, `{"a"}`) do too. The parser rejects those afterwards.
//!
//! ```rust
//! use canon_json::guard;
//!
//! assert!(guard::is_json_shaped(r#"{"a": [1, true, null]}"#));
//! assert!(!guard::is_json_shaped("a;evilCall()"));
//! ```

use crate::{Error, Result};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Backslash escapes inside string literals.
    static ref ESCAPE: Regex = Regex::new(r#"\\["\\/bfnrtu]"#).unwrap();
    /// Quoted literals free of raw quotes, backslashes and line breaks, plus whole-word
    /// keywords and numbers.
    static ref TOKEN: Regex = Regex::new(
        r#""[^"\\\n\r]*"|\b(?:true|false|null)\b|-?[0-9]+(?:\.[0-9]*)?(?:[eE][+\-]?[0-9]+)?"#
    )
    .unwrap();
    /// Runs of opening brackets at the start, or after a colon or comma.
    static ref OPEN_BRACKETS: Regex = Regex::new(r"(?:^|:|,)(?:\s*\[)+").unwrap();
    /// What a JSON-shaped text reduces to.
    static ref SHAPE: Regex = Regex::new(r"^[\],:{}\s]*$").unwrap();
}

/// Returns `true` if `source` reduces to structural punctuation only.
#[must_use]
pub fn is_json_shaped(source: &str) -> bool {
    let reduced = ESCAPE.replace_all(source, "@");
    let reduced = TOKEN.replace_all(&reduced, "]");
    let reduced = OPEN_BRACKETS.replace_all(&reduced, "");
    SHAPE.is_match(&reduced)
}

/// Rejects text that is not JSON-shaped.
///
/// # Errors
///
/// Returns [`Error::Format`] when the reduction leaves anything but `]`, `,`, `:`,
/// `{`, `}` and whitespace.
pub fn check(source: &str) -> Result<()> {
    if is_json_shaped(source) {
        Ok(())
    } else {
        tracing::debug!(len = source.len(), "guard rejected input");
        Err(Error::format("text contains tokens outside of JSON literals"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_valid_texts() {
        for source in [
            "null",
            "true",
            "-1.5e+10",
            r#""plain""#,
            r#""esc \" \\ \/ \b \f \n \r \t é""#,
            "[]",
            "{}",
            "[[[]]]",
            r#"{"a":[1,{"b":[false,"x"]}],"c":{}}"#,
            " \n\t[ 1 , 2 ]\r\n",
            r#"["a:b", "c,d", "[e]"]"#,
            r#"{"ünïcödé": "✓"}"#,
        ] {
            assert!(is_json_shaped(source), "rejected {:?}", source);
        }
    }

    #[test]
    fn test_rejects_code() {
        for source in [
            "a;evilCall()",
            "alert(1)",
            "[1, x]",
            r#"{"a": foo}"#,
            "1 + 1",
            "nulla",
            "[function(){}]",
            "\"a\" + \"b\"",
            "({})",
            "'single'",
            "NaN",
            "-Infinity",
            "new Date()",
            "undefined",
            "nullnull",
            "[truefalse]",
            "{\"a\":nullx()}",
            "[falsey, trueish]",
            "null1",
            "1true",
        ] {
            assert!(!is_json_shaped(source), "accepted {:?}", source);
        }
    }

    #[test]
    fn test_shaped_but_malformed_passes() {
        assert!(is_json_shaped("[1,]"));
        assert!(is_json_shaped(r#"{"a"}"#));
        assert!(is_json_shaped(""));
    }

    #[test]
    fn test_check_error_kind() {
        let err = check("a;evilCall()").unwrap_err();
        assert!(err.is_format());
        assert!(!err.to_string().contains("evilCall"));
        assert!(check("[1,2]").is_ok());
    }
}
