//! Property-based tests for the round-trip and guard guarantees.

use canon_json::{
    from_str, guard, parse, parse_guarded, quote, serialize, to_value, ErrorKind, Map, Value,
};
use proptest::prelude::*;
use serde::{Deserialize, Serialize};

fn arb_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        any::<f64>()
            .prop_filter("finite", |f| f.is_finite())
            .prop_map(Value::from),
        any::<String>().prop_map(Value::from),
    ];

    leaf.prop_recursive(4, 64, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..8).prop_map(Value::from),
            prop::collection::vec((any::<String>(), inner), 0..8)
                .prop_map(|pairs| Value::Object(pairs.into_iter().collect::<Map>())),
        ]
    })
}

fn roundtrip<T: Serialize + for<'de> Deserialize<'de> + PartialEq + std::fmt::Debug>(
    value: &T,
) -> bool {
    let text = match to_value(value).and_then(|v| serialize(&v)) {
        Ok(Some(text)) => text,
        other => {
            eprintln!("Serialize failed: {:?}", other);
            return false;
        }
    };
    match from_str::<T>(&text) {
        Ok(back) => *value == back,
        Err(e) => {
            eprintln!("Deserialize failed: {}", e);
            eprintln!("Serialized was: {}", text);
            false
        }
    }
}

proptest! {
    #[test]
    fn prop_value_round_trip(value in arb_value()) {
        let text = serialize(&value).unwrap().unwrap();
        prop_assert_eq!(parse(&text).unwrap(), value);
    }

    #[test]
    fn prop_guard_accepts_serialized_text(value in arb_value()) {
        let text = serialize(&value).unwrap().unwrap();
        prop_assert!(guard::is_json_shaped(&text));
        prop_assert_eq!(parse_guarded(&text).unwrap(), parse(&text).unwrap());
    }

    #[test]
    fn prop_guard_rejects_identifiers(
        ident in "[a-zA-Z_$][a-zA-Z0-9_$]{0,8}"
            .prop_filter("keyword", |s| !matches!(s.as_str(), "true" | "false" | "null")),
        call in prop::bool::ANY,
    ) {
        let source = if call {
            format!("[1,{}()]", ident)
        } else {
            format!("{{\"k\":{}}}", ident)
        };
        let err = parse_guarded(&source).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn prop_guard_rejects_keyword_prefixed_identifiers(
        keyword in prop::sample::select(vec!["true", "false", "null"]),
        tail in "[a-zA-Z0-9_$]{1,8}",
    ) {
        let source = format!("[{}{}]", keyword, tail);
        prop_assert!(!guard::is_json_shaped(&source));
        prop_assert_eq!(parse_guarded(&source).unwrap_err().kind(), ErrorKind::Format);
    }

    #[test]
    fn prop_plain_strings_are_wrapped(s in "[a-zA-Z0-9 .,;:!?/'é✓]*") {
        prop_assert_eq!(quote(&s), format!("\"{}\"", s));
    }

    #[test]
    fn prop_i64(n in any::<i64>()) {
        prop_assert!(roundtrip(&n));
    }

    #[test]
    fn prop_string(s in any::<String>()) {
        prop_assert!(roundtrip(&s));
    }

    #[test]
    fn prop_vec_option_i32(v in prop::collection::vec(proptest::option::of(any::<i32>()), 0..20)) {
        prop_assert!(roundtrip(&v));
    }

    #[test]
    fn prop_tuple_u32_bool(t in (any::<u32>(), any::<bool>())) {
        prop_assert!(roundtrip(&t));
    }
}
