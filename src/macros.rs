/// Builds a [`Value`](crate::Value) from JSON-like syntax.
///
/// Keys must be string literals. Any other expression goes through
/// [`to_value`](crate::to_value) and becomes `null` if it cannot be represented.
///
/// ```rust
/// use canon_json::{serialize, value};
///
/// let v = value!({ "id": 1, "tags": ["a", "b"], "parent": null });
/// assert_eq!(
///     serialize(&v).unwrap().as_deref(),
///     Some(r#"{"id":1,"tags":["a","b"],"parent":null}"#)
/// );
/// ```
#[macro_export]
macro_rules! value {
    (null) => {
        $crate::Value::Null
    };

    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    ([]) => {
        $crate::Value::Array(vec![])
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::Array(vec![$($crate::value!($elem)),*])
    };

    ({}) => {
        $crate::Value::Object($crate::Map::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut object = $crate::Map::new();
        $(
            object.insert($key, $crate::value!($value));
        )*
        $crate::Value::Object(object)
    }};

    ($s:expr) => {
        $crate::to_value(&$s).unwrap_or($crate::Value::Null)
    };
}
