/// Builds an [`LlsdValue`](crate::LlsdValue) from a JSON-like literal.
///
/// `undef` produces `Undefined`; any other leaf goes through
/// `LlsdValue::from`. Each array element and map value must be a single
/// token tree, so wrap negative numbers and longer expressions in
/// parentheses.
///
/// ```rust
/// use serde_llsd::{llsd, LlsdValue, Uuid};
///
/// let value = llsd!({
///     "agent": (Uuid::nil()),
///     "pos": [128.0, 64.5, (-3)],
///     "flags": { "fly": true, "sit": false },
///     "parent": undef
/// });
/// assert_eq!(value.get("pos").unwrap().as_array().unwrap()[2], LlsdValue::Integer(-3));
/// assert!(value.get("parent").unwrap().is_undefined());
/// ```
#[macro_export]
macro_rules! llsd {
    (undef) => {
        $crate::LlsdValue::Undefined
    };

    (true) => {
        $crate::LlsdValue::Boolean(true)
    };

    (false) => {
        $crate::LlsdValue::Boolean(false)
    };

    ([]) => {
        $crate::LlsdValue::Array(vec![])
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::LlsdValue::Array(vec![$($crate::llsd!($elem)),*])
    };

    ({}) => {
        $crate::LlsdValue::Map($crate::LlsdMap::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut map = $crate::LlsdMap::new();
        $(
            map.insert($key.to_string(), $crate::llsd!($value));
        )*
        $crate::LlsdValue::Map(map)
    }};

    ($other:expr) => {
        $crate::LlsdValue::from($other)
    };
}

#[cfg(test)]
mod tests {
    use crate::{LlsdMap, LlsdValue};

    #[test]
    fn test_llsd_macro_scalars() {
        assert_eq!(llsd!(undef), LlsdValue::Undefined);
        assert_eq!(llsd!(true), LlsdValue::Boolean(true));
        assert_eq!(llsd!(false), LlsdValue::Boolean(false));
        assert_eq!(llsd!(42), LlsdValue::Integer(42));
        assert_eq!(llsd!(3.5), LlsdValue::Real(3.5));
        assert_eq!(llsd!("hello"), LlsdValue::String("hello".to_string()));
        assert_eq!(llsd!(-7), LlsdValue::Integer(-7));
    }

    #[test]
    fn test_llsd_macro_arrays() {
        assert_eq!(llsd!([]), LlsdValue::Array(vec![]));
        assert_eq!(
            llsd!([1, "two", [undef]]),
            LlsdValue::Array(vec![
                LlsdValue::Integer(1),
                LlsdValue::from("two"),
                LlsdValue::Array(vec![LlsdValue::Undefined]),
            ])
        );
    }

    #[test]
    fn test_llsd_macro_maps_keep_order() {
        assert_eq!(llsd!({}), LlsdValue::Map(LlsdMap::new()));

        let map = llsd!({ "z": 1, "a": { "inner": (vec![1u8, 2]) }, "z": 2 });
        let map = map.as_map().unwrap();
        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, ["z", "a"]);
        assert_eq!(map.get("z"), Some(&LlsdValue::Integer(2)));
        assert_eq!(
            map.get("a").and_then(|a| a.get("inner")),
            Some(&LlsdValue::Binary(vec![1, 2]))
        );
    }
}
