//! Property-based tests for conversion totality and codec round trips.
//!
//! Generated values stay inside what every encoding can carry exactly:
//! finite reals, dates with whole seconds, absolute URIs.

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use serde_llsd::{
    from_json_str, from_notation_str, llsd, to_json_string, to_notation_string,
    to_notation_string_pretty, to_xml_string, try_from_xml_str, JsonOptions, LlsdMap, LlsdValue,
    Uri, Uuid, XmlOptions,
};

/// Strings made of printable text plus the characters that need escaping.
fn text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 '\"\\\\<>&\n\r\t\u{e9}\u{4e2d}\u{1F600}]{0,16}"
}

fn scalar() -> impl Strategy<Value = LlsdValue> {
    prop_oneof![
        Just(LlsdValue::Undefined),
        any::<bool>().prop_map(LlsdValue::Boolean),
        any::<i32>().prop_map(LlsdValue::Integer),
        any::<f64>()
            .prop_filter("finite", |r| r.is_finite())
            .prop_map(LlsdValue::Real),
        text().prop_map(LlsdValue::String),
        any::<[u8; 16]>().prop_map(|b| LlsdValue::Uuid(Uuid::from_bytes(b))),
        (0i64..4_102_444_800).prop_map(|secs| {
            LlsdValue::Date(Utc.timestamp_opt(secs, 0).single().unwrap_or_default())
        }),
        "[a-z]{1,8}".prop_map(|path| {
            LlsdValue::Uri(Uri::parse(&format!("http://example.com/{}", path)).unwrap_or_default())
        }),
        prop::collection::vec(any::<u8>(), 0..24).prop_map(LlsdValue::Binary),
    ]
}

fn value() -> impl Strategy<Value = LlsdValue> {
    scalar().prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(LlsdValue::Array),
            prop::collection::vec(("[a-z_]{1,6}", inner), 0..6).prop_map(|entries| {
                LlsdValue::Map(entries.into_iter().collect::<LlsdMap>())
            }),
        ]
    })
}

/// Values whose JSON form parses back to the same variants.
fn json_value() -> impl Strategy<Value = LlsdValue> {
    let leaf = prop_oneof![
        Just(LlsdValue::Undefined),
        any::<bool>().prop_map(LlsdValue::Boolean),
        any::<i32>().prop_map(LlsdValue::Integer),
        any::<f64>()
            .prop_filter("finite", |r| r.is_finite())
            .prop_map(LlsdValue::Real),
        text()
            .prop_filter("non-empty", |s| !s.is_empty())
            .prop_map(LlsdValue::String),
    ];
    leaf.prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(LlsdValue::Array),
            prop::collection::vec(("[a-z_]{1,6}", inner), 0..6).prop_map(|entries| {
                LlsdValue::Map(entries.into_iter().collect::<LlsdMap>())
            }),
        ]
    })
}

proptest! {
    #[test]
    fn prop_conversions_are_total(v in value()) {
        let _ = v.as_boolean();
        let _ = v.as_integer();
        let _ = v.as_u_integer();
        let _ = v.as_long();
        let _ = v.as_u_long();
        let _ = v.as_real();
        let _ = v.as_string();
        let _ = v.as_uuid();
        let _ = v.as_date();
        let _ = v.as_uri();
        let _ = v.as_binary();
    }

    #[test]
    fn prop_integer_views_agree(n in any::<i32>()) {
        let v = LlsdValue::Integer(n);
        prop_assert_eq!(v.as_long(), i64::from(n));
        prop_assert_eq!(v.as_real(), f64::from(n));
        prop_assert_eq!(v.as_boolean(), n != 0);
        prop_assert_eq!(v.as_binary(), n.to_be_bytes().to_vec());
        prop_assert_eq!(LlsdValue::from(v.as_string()).as_integer(), n);
    }

    #[test]
    fn prop_real_string_round_trip(r in any::<f64>().prop_filter("finite", |r| r.is_finite())) {
        let text = LlsdValue::Real(r).as_string();
        prop_assert_eq!(LlsdValue::from(text).as_real(), r);
    }

    #[test]
    fn prop_wide_integers(n in any::<i64>(), u in any::<u64>()) {
        prop_assert_eq!(LlsdValue::from_long(n).as_long(), n);
        prop_assert_eq!(LlsdValue::from_u_long(u).as_u_long(), u);
    }

    #[test]
    fn prop_notation_round_trip(v in value()) {
        let compact = to_notation_string(&v).unwrap();
        prop_assert_eq!(&from_notation_str(&compact).unwrap(), &v);
        let pretty = to_notation_string_pretty(&v).unwrap();
        prop_assert_eq!(&from_notation_str(&pretty).unwrap(), &v);
    }

    #[test]
    fn prop_xml_round_trip(v in value()) {
        let xml = to_xml_string(&v, &XmlOptions::new()).unwrap();
        prop_assert_eq!(&try_from_xml_str(&xml).unwrap(), &v);
    }

    #[test]
    fn prop_json_round_trip(v in json_value()) {
        let json = to_json_string(&v, &JsonOptions::new()).unwrap();
        prop_assert_eq!(&from_json_str(&json).unwrap(), &v);
        let pretty = to_json_string(&v, &JsonOptions::pretty()).unwrap();
        prop_assert_eq!(&from_json_str(&pretty).unwrap(), &v);
    }

    #[test]
    fn prop_string_escaping(s in text()) {
        let v = LlsdValue::String(s.clone());
        prop_assert_eq!(from_notation_str(&to_notation_string(&v).unwrap()).unwrap(), v.clone());
        prop_assert_eq!(try_from_xml_str(&to_xml_string(&v, &XmlOptions::new()).unwrap()).unwrap(), v.clone());
        if !s.is_empty() {
            prop_assert_eq!(from_json_str(&to_json_string(&v, &JsonOptions::new()).unwrap()).unwrap(), v);
        }
    }

    #[test]
    fn prop_omit_defaults_only_drops_defaults(entries in prop::collection::vec(("[a-z]{1,4}", any::<i32>()), 0..8)) {
        let map: LlsdMap = entries
            .into_iter()
            .map(|(k, n)| (k, LlsdValue::Integer(n)))
            .collect();
        let value = LlsdValue::Map(map.clone());
        let json = to_json_string(&value, &JsonOptions::omit_defaults()).unwrap();
        let back = from_json_str(&json).unwrap();
        let back = back.as_map().cloned().unwrap_or_default();

        for (key, n) in map.iter() {
            if n.is_default() {
                prop_assert!(back.get(key).is_none());
            } else {
                prop_assert_eq!(back.get(key), Some(n));
            }
        }
    }
}

#[test]
fn test_empty_string_collapses_only_in_json() {
    let v = llsd!("");
    assert_eq!(from_json_str(&to_json_string(&v, &JsonOptions::new()).unwrap()).unwrap(), llsd!(undef));
    assert_eq!(from_notation_str(&to_notation_string(&v).unwrap()).unwrap(), v);
}
