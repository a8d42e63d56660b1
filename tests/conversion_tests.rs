use chrono::{DateTime, TimeZone, Utc};
use serde_llsd::{from_notation_str, llsd, LlsdMap, LlsdType, LlsdValue, Uri, Uuid};

fn epoch() -> DateTime<Utc> {
    Utc.timestamp_opt(0, 0).unwrap()
}

fn sample_uuid() -> Uuid {
    Uuid::parse_str("6bad258e-06f0-4d94-a03a-a8cd2dd7cbd4").unwrap()
}

fn sample_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2006, 2, 1, 14, 29, 53).unwrap()
}

/// One value of every variant, in declaration order.
fn every_variant() -> Vec<LlsdValue> {
    vec![
        LlsdValue::Undefined,
        LlsdValue::from(true),
        LlsdValue::from(7),
        LlsdValue::from(2.5),
        LlsdValue::from("text"),
        LlsdValue::from(sample_uuid()),
        LlsdValue::from(sample_date()),
        LlsdValue::from(Uri::parse("http://example.com/").unwrap()),
        LlsdValue::from(vec![1u8, 2, 3]),
        llsd!([1, 2]),
        llsd!({ "a": 1 }),
    ]
}

#[test]
fn test_types_are_reported() {
    let types: Vec<LlsdType> = every_variant().iter().map(LlsdValue::llsd_type).collect();
    assert_eq!(
        types,
        vec![
            LlsdType::Undefined,
            LlsdType::Boolean,
            LlsdType::Integer,
            LlsdType::Real,
            LlsdType::String,
            LlsdType::Uuid,
            LlsdType::Date,
            LlsdType::Uri,
            LlsdType::Binary,
            LlsdType::Array,
            LlsdType::Map,
        ]
    );
}

#[test]
fn test_undefined_gives_every_default() {
    let v = LlsdValue::Undefined;
    assert!(!v.as_boolean());
    assert_eq!(v.as_integer(), 0);
    assert_eq!(v.as_u_integer(), 0);
    assert_eq!(v.as_long(), 0);
    assert_eq!(v.as_u_long(), 0);
    assert_eq!(v.as_real(), 0.0);
    assert_eq!(v.as_string(), "");
    assert_eq!(v.as_uuid(), Uuid::nil());
    assert_eq!(v.as_date(), epoch());
    assert_eq!(v.as_uri(), None);
    assert!(v.as_binary().is_empty());
}

#[test]
fn test_boolean_column() {
    let expected = [false, true, true, true, true, true, false, false, false, true, true];
    for (value, want) in every_variant().iter().zip(expected) {
        assert_eq!(value.as_boolean(), want, "{:?}", value);
    }

    assert!(!LlsdValue::from(f64::NAN).as_boolean());
    assert!(!LlsdValue::from(0.0).as_boolean());
    for falsy in ["", "0", "false", "FALSE", "False"] {
        assert!(!LlsdValue::from(falsy).as_boolean(), "{:?}", falsy);
    }
    for truthy in ["1", "true", "no", "0.0", " "] {
        assert!(LlsdValue::from(truthy).as_boolean(), "{:?}", truthy);
    }
    assert!(!LlsdValue::from(Uuid::nil()).as_boolean());
    assert!(!llsd!([]).as_boolean());
    assert!(!llsd!({}).as_boolean());
}

#[test]
fn test_integer_column() {
    assert_eq!(llsd!(true).as_integer(), 1);
    assert_eq!(llsd!(false).as_long(), 0);
    assert_eq!(llsd!(-5).as_long(), -5);

    assert_eq!(llsd!(2.5).as_integer(), 2);
    assert_eq!(llsd!(3.5).as_integer(), 4);
    assert_eq!(llsd!((-2.5)).as_integer(), -2);
    assert_eq!(LlsdValue::from(f64::NAN).as_integer(), 0);
    assert_eq!(llsd!(1e12).as_integer(), i32::MAX);
    assert_eq!(llsd!((-1e12)).as_integer(), i32::MIN);
    assert_eq!(llsd!(1e12).as_long(), 1_000_000_000_000);
    assert_eq!(llsd!((-3.0)).as_u_integer(), 0);

    assert_eq!(llsd!("12.9").as_integer(), 12);
    assert_eq!(llsd!("-12.1").as_long(), -13);
    assert_eq!(llsd!("twelve").as_integer(), 0);

    assert_eq!(LlsdValue::from(vec![0u8, 0, 1, 0, 9]).as_integer(), 256);
    assert_eq!(LlsdValue::from(vec![1u8, 2, 3]).as_integer(), 0);
    assert_eq!(LlsdValue::from(vec![0xffu8; 8]).as_long(), -1);
    assert_eq!(LlsdValue::from(vec![0xffu8; 8]).as_u_long(), u64::MAX);
    assert_eq!(llsd!([0, 0, 1, 2]).as_integer(), 258);
    assert_eq!(llsd!([0, 0, 0, 0, 0, 0, 1, 0]).as_u_long(), 256);
    assert_eq!(llsd!([0, 0, 1]).as_integer(), 0);

    assert_eq!(LlsdValue::from(sample_date()).as_long(), 1_138_804_193);
    assert_eq!(LlsdValue::from(sample_uuid()).as_integer(), 0);
    assert_eq!(llsd!({ "a": 1 }).as_integer(), 0);
}

#[test]
fn test_wide_integers_survive_through_binary() {
    for n in [i64::MIN, -1, 0, i64::from(i32::MAX) + 1, i64::MAX] {
        assert_eq!(LlsdValue::from_long(n).as_long(), n);
    }
    for n in [0, u64::from(u32::MAX), u64::MAX] {
        assert_eq!(LlsdValue::from_u_long(n).as_u_long(), n);
    }
    assert_eq!(LlsdValue::from_u_integer(u32::MAX).as_u_integer(), u32::MAX);
    assert_eq!(LlsdValue::from_u_integer(u32::MAX).as_integer(), -1);
    assert_eq!(llsd!((-1)).as_u_long(), u64::MAX);
}

#[test]
fn test_real_column() {
    assert_eq!(llsd!(true).as_real(), 1.0);
    assert_eq!(llsd!(false).as_real(), 0.0);
    assert_eq!(llsd!(7).as_real(), 7.0);
    assert_eq!(llsd!(" 1.25e2 ").as_real(), 125.0);
    assert_eq!(llsd!("nope").as_real(), 0.0);
    assert_eq!(LlsdValue::from(sample_date()).as_real(), 0.0);
    assert_eq!(llsd!([1]).as_real(), 0.0);
}

#[test]
fn test_string_column() {
    let strings: Vec<String> = every_variant().iter().map(LlsdValue::as_string).collect();
    assert_eq!(
        strings,
        vec![
            "",
            "1",
            "7",
            "2.5",
            "text",
            "6bad258e-06f0-4d94-a03a-a8cd2dd7cbd4",
            "2006-02-01T14:29:53Z",
            "http://example.com/",
            "AQID",
            "[1,2]",
            r#"{"a":1}"#,
        ]
    );
    assert_eq!(llsd!(0.1).as_string(), "0.1");
    assert_eq!(llsd!(1e20).as_string(), "1E+20");
    assert_eq!(llsd!({ "off": false, "s": "" }).as_string(), r#"{"off":false,"s":""}"#);
}

#[test]
fn test_uuid_date_uri_columns() {
    assert_eq!(llsd!("6BAD258E-06F0-4D94-A03A-A8CD2DD7CBD4").as_uuid(), sample_uuid());
    assert_eq!(llsd!("not-a-uuid").as_uuid(), Uuid::nil());
    assert_eq!(llsd!(1).as_uuid(), Uuid::nil());

    assert_eq!(llsd!("2006-02-01T14:29:53Z").as_date(), sample_date());
    assert_eq!(llsd!("yesterday").as_date(), epoch());
    assert_eq!(LlsdValue::from(sample_uuid()).as_date(), epoch());
    assert_eq!(llsd!(1_138_804_193).as_date(), epoch());

    assert_eq!(llsd!("https://example.com/x").as_uri().unwrap().as_str(), "https://example.com/x");
    assert_eq!(llsd!("caps/seed").as_uri().unwrap().as_str(), "caps/seed");
    assert_eq!(llsd!("two words").as_uri(), None);
    assert_eq!(LlsdValue::from(Uri::empty()).as_uri(), None);
    assert_eq!(llsd!(5).as_uri(), None);
}

#[test]
fn test_binary_column() {
    let bytes: Vec<Vec<u8>> = every_variant().iter().map(LlsdValue::as_binary).collect();
    assert_eq!(bytes[0], Vec::<u8>::new());
    assert_eq!(bytes[1], b"1".to_vec());
    assert_eq!(bytes[2], vec![0, 0, 0, 7]);
    assert_eq!(bytes[3], 2.5f64.to_be_bytes().to_vec());
    assert_eq!(bytes[4], b"text".to_vec());
    assert_eq!(bytes[5], sample_uuid().as_bytes().to_vec());
    assert_eq!(bytes[6], 1_138_804_193f64.to_be_bytes().to_vec());
    assert_eq!(bytes[7], b"http://example.com/".to_vec());
    assert_eq!(bytes[8], vec![1, 2, 3]);
    assert_eq!(bytes[9], vec![1, 2]);
    assert_eq!(bytes[10], vec![1]);

    assert_eq!(llsd!(false).as_binary(), vec![b'0']);
    assert_eq!(llsd!([256, 257, (-1)]).as_binary(), vec![0, 1, 255]);
}

#[test]
fn test_nil_uuid_notation_is_false() {
    let value = from_notation_str("u00000000-0000-0000-0000-000000000000").unwrap();
    assert_eq!(value, LlsdValue::Uuid(Uuid::nil()));
    assert!(!value.as_boolean());
}

#[test]
fn test_copy_and_equality() {
    let original = llsd!({ "list": [1, { "deep": "x" }] });
    let mut copy = original.copy();
    assert_eq!(copy, original);

    copy.as_map_mut()
        .and_then(|m| m.get_mut("list"))
        .and_then(LlsdValue::as_array_mut)
        .unwrap()
        .push(llsd!(2));
    assert_ne!(copy, original);
    assert_eq!(original.get("list").and_then(LlsdValue::as_array).map(Vec::len), Some(2));

    assert_ne!(llsd!(1), llsd!(1.0));
    assert_ne!(llsd!("1"), llsd!(1));
    assert_eq!(LlsdValue::Undefined, llsd!(undef));

    let mut a = LlsdMap::new();
    a.insert("x".into(), llsd!(1));
    a.insert("y".into(), llsd!(2));
    let mut b = LlsdMap::new();
    b.insert("y".into(), llsd!(2));
    b.insert("x".into(), llsd!(1));
    assert_eq!(LlsdValue::from(a), LlsdValue::from(b));
}
