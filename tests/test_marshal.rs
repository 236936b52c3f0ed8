use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use pretty_assertions::assert_eq;
use serde::Serialize;
use serde_json::json;
use serde_urlvalues as uv;
use uv::{BoxError, Config, EncodeValues, Error, Record, UrlValues, Value};

fn expected(pairs: &[(&str, &[&str])]) -> UrlValues {
    pairs
        .iter()
        .flat_map(|(key, values)| values.iter().map(move |value| (*key, *value)))
        .collect()
}

fn marshal_with<T: Serialize>(config: Config, input: &T) -> UrlValues {
    config
        .serialize_values(input)
        .unwrap()
        .expect("non-zero input should produce values")
}

fn now() -> DateTime<FixedOffset> {
    FixedOffset::east_opt(2 * 3600)
        .unwrap()
        .with_ymd_and_hms(2024, 3, 9, 17, 45, 12)
        .unwrap()
        + chrono::Duration::nanoseconds(123_456_789)
}

#[test]
fn marshal_example() {
    #[derive(Serialize)]
    struct Object {
        slice: Vec<i32>,
        string: String,
    }

    #[derive(Serialize)]
    struct Nested {
        slice: Vec<&'static str>,
        int: i32,
    }

    #[derive(Serialize)]
    struct Input {
        slice: Vec<&'static str>,
        int: i32,
        map: std::collections::BTreeMap<&'static str, Nested>,
        object: Object,
    }

    let input = json!({
        "slice": ["100", "200"],
        "int": 1,
        "map": {
            "slice": ["100", "200"],
            "int": 1,
        },
        "object": {
            "slice": [1, 2],
            "string": "example",
        },
    });

    assert_eq!(
        uv::to_string(&input).unwrap(),
        "int=1&map%5Bint%5D=1&map%5Bslice%5D=100&map%5Bslice%5D=200&\
         object%5Bslice%5D=1&object%5Bslice%5D=2&object%5Bstring%5D=example&\
         slice=100&slice=200"
    );

    // the same shape through a struct goes to the record encoder
    let mut map = std::collections::BTreeMap::new();
    map.insert(
        "inner",
        Nested {
            slice: vec!["100", "200"],
            int: 1,
        },
    );
    let input = Input {
        slice: vec!["100", "200"],
        int: 1,
        map,
        object: Object {
            slice: vec![1, 2],
            string: "example".to_owned(),
        },
    };
    let values = uv::to_values(&input).unwrap().unwrap();
    assert_eq!(
        values,
        expected(&[
            ("slice", &["100", "200"]),
            ("int", &["1"]),
            ("map[inner][slice]", &["100", "200"]),
            ("map[inner][int]", &["1"]),
            ("object[slice]", &["1", "2"]),
            ("object[string]", &["example"]),
        ])
    );
}

#[test]
fn marshal_struct() {
    #[derive(Serialize)]
    struct Nested {
        string: String,
        #[serde(rename = "stringSlice")]
        string_slice: Vec<String>,
        #[serde(rename = "intSlice")]
        int_slice: Vec<i32>,
        int: i32,
    }

    #[derive(Serialize)]
    struct Object {
        #[serde(skip_serializing_if = "String::is_empty")]
        string: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        object: Option<Nested>,
        #[serde(rename = "stringSlice", skip_serializing_if = "Vec::is_empty")]
        string_slice: Vec<String>,
        #[serde(rename = "stringSliceBrackets[]", skip_serializing_if = "Vec::is_empty")]
        string_slice_brackets: Vec<String>,
        #[serde(rename = "intSlice", skip_serializing_if = "Vec::is_empty")]
        int_slice: Vec<i32>,
        #[serde(skip_serializing_if = "is_zero")]
        int: i32,
    }

    fn is_zero(n: &i32) -> bool {
        *n == 0
    }

    fn strings(s: &[&str]) -> Vec<String> {
        s.iter().map(|s| s.to_string()).collect()
    }

    let input = Object {
        string: "string-value".to_owned(),
        int_slice: vec![101, 102, 103],
        int: 100,
        string_slice: strings(&["101", "102", "103"]),
        string_slice_brackets: strings(&["101", "102", "103"]),
        object: Some(Nested {
            string: "nested-string-value".to_owned(),
            string_slice: strings(&["201", "202", "203"]),
            int_slice: vec![201, 202, 203],
            int: 200,
        }),
    };

    assert_eq!(
        marshal_with(Config::new(), &input),
        expected(&[
            ("string", &["string-value"]),
            ("intSlice", &["101", "102", "103"]),
            ("int", &["100"]),
            ("stringSlice", &["101", "102", "103"]),
            ("stringSliceBrackets[]", &["101", "102", "103"]),
            ("object[string]", &["nested-string-value"]),
            ("object[stringSlice]", &["201", "202", "203"]),
            ("object[intSlice]", &["201", "202", "203"]),
            ("object[int]", &["200"]),
        ])
    );

    // skipped fields leave nothing behind
    let input = Object {
        string: String::new(),
        object: None,
        string_slice: vec![],
        string_slice_brackets: vec![],
        int_slice: vec![],
        int: 0,
    };
    assert_eq!(uv::to_values(&input).unwrap(), Some(UrlValues::new()));
}

#[test]
fn record_options_are_independent_of_config() {
    #[derive(Serialize)]
    struct Flags {
        enabled: bool,
        count: u32,
        ids: Vec<u8>,
    }

    let input = Flags {
        enabled: false,
        count: 0,
        ids: vec![1, 2],
    };
    let config = Config::new()
        .int_bool(true)
        .array_brackets(true)
        .array_delimiter(",");

    assert_eq!(
        marshal_with(config, &input),
        expected(&[
            ("enabled", &["false"]),
            ("count", &["0"]),
            ("ids", &["1", "2"]),
        ])
    );
}

#[test]
fn marshal_string() {
    assert_eq!(uv::to_values("").unwrap(), None);

    let mut source = UrlValues::new();
    source.add("seriesName", "123");
    source.add("client[cif]", "0123");
    source.add("precision", "12");
    let encoded = source.encode();

    assert_eq!(uv::to_values(&encoded).unwrap(), Some(source.clone()));
    assert_eq!(uv::to_values(&Some(&encoded)).unwrap(), Some(source.clone()));
    assert_eq!(
        uv::marshal(&Value::some(Value::some(encoded.as_str()))).unwrap(),
        Some(source)
    );
}

#[test]
fn marshal_malformed_string() {
    let err = uv::to_values("a=%zz").unwrap_err();
    assert!(matches!(err, Error::Parse { .. }), "got: {err}");

    let err = uv::to_values("a=1;b=2").unwrap_err();
    assert!(matches!(err, Error::Parse { position: 3, .. }), "got: {err}");
}

#[test]
fn marshal_bools() {
    let input = json!({ "trueBool": true, "falseBool": false });

    assert_eq!(
        marshal_with(Config::new(), &input),
        expected(&[("trueBool", &["true"]), ("falseBool", &["false"])])
    );
    assert_eq!(
        marshal_with(Config::new().int_bool(true), &input),
        expected(&[("trueBool", &["1"]), ("falseBool", &["0"])])
    );
}

#[test]
fn marshal_numbers() {
    let input = json!({ "int": 100, "neg": -7, "float": 1.25, "zero": 0, "empty": "" });

    // zero scalars below the top level are written as empty strings
    assert_eq!(
        marshal_with(Config::new(), &input),
        expected(&[
            ("int", &["100"]),
            ("neg", &["-7"]),
            ("float", &["1.25"]),
            ("zero", &[""]),
            ("empty", &[""]),
        ])
    );
}

#[test]
fn marshal_times() {
    let now = now();
    let input = Value::map([("time", now)]);
    let marshal = |config: Config| config.marshal(&input).unwrap().unwrap();

    assert_eq!(
        marshal(Config::new().time_unix(true)).get("time"),
        Some(now.timestamp().to_string().as_str())
    );
    assert_eq!(
        marshal(Config::new().time_unix_milli(true)).get("time"),
        Some(now.timestamp_millis().to_string().as_str())
    );
    assert_eq!(
        marshal(Config::new().time_unix_nano(true)).get("time"),
        Some(now.timestamp_nanos_opt().unwrap().to_string().as_str())
    );
    assert_eq!(
        marshal(Config::new().time_layout("%d %b %y %H:%M %z")).get("time"),
        Some("09 Mar 24 17:45 +0200")
    );
    assert_eq!(
        marshal(Config::new()).get("time"),
        Some("2024-03-09T17:45:12+02:00")
    );

    // the unix options win over a layout, in a fixed order
    let config = Config::new()
        .time_unix_nano(true)
        .time_unix_milli(true)
        .time_layout("%Y");
    assert_eq!(
        marshal(config).get("time"),
        Some(now.timestamp_millis().to_string().as_str())
    );
}

#[test]
fn marshal_time_reference() {
    let now = now();
    let input = Value::map([("time", Value::some(now))]);
    let values = uv::marshal(&input).unwrap().unwrap();
    assert_eq!(values.get("time"), Some("2024-03-09T17:45:12+02:00"));
}

#[test]
fn marshal_zero_time() {
    let epoch = Utc.timestamp_opt(0, 0).unwrap();
    let input = Value::map([("time", epoch)]);
    let values = uv::marshal(&input).unwrap().unwrap();
    assert_eq!(values.get("time"), Some("1970-01-01T00:00:00Z"));
}

#[test]
fn marshal_serialized_times() {
    #[derive(Serialize)]
    struct Since(#[serde(serialize_with = "uv::helpers::timestamp::serialize")] DateTime<Utc>);

    let at = Utc.timestamp_opt(1_400_000_000, 0).unwrap();
    let mut input = std::collections::BTreeMap::new();
    input.insert("since", Since(at));

    let values = marshal_with(Config::new().time_unix_milli(true), &input);
    assert_eq!(values.get("since"), Some("1400000000000"));

    // without the helper a chrono timestamp is just a string
    let mut input = std::collections::BTreeMap::new();
    input.insert("since", at);
    let values = marshal_with(Config::new().time_unix(true), &input);
    assert_eq!(values.get("since"), Some("2014-05-13T16:53:20Z"));
}

#[test]
fn marshal_slices() {
    let marshal = |config: Config, input: serde_json::Value| config.serialize_values(&input).unwrap();

    assert_eq!(
        marshal(Config::new(), json!({ "slice": [] })),
        Some(UrlValues::new())
    );
    assert_eq!(
        marshal(Config::new(), json!({ "slice": null })),
        Some(UrlValues::new())
    );
    assert_eq!(
        marshal(Config::new(), json!({ "slice": ["1", "2"] })),
        Some(expected(&[("slice", &["1", "2"])]))
    );
    assert_eq!(
        marshal(Config::new().array_delimiter("|"), json!({ "slice": ["1", "2"] })),
        Some(expected(&[("slice", &["1|2"])]))
    );
    assert_eq!(
        marshal(Config::new().array_brackets(true), json!({ "slice": ["1", "2"] })),
        Some(expected(&[("slice[]", &["1", "2"])]))
    );
    assert_eq!(
        marshal(Config::new(), json!({ "slice": ["", "1"] })),
        Some(expected(&[("slice", &["", "1"])]))
    );
}

#[test]
fn marshal_arrays() {
    let input = Value::map([("array", [""])]);
    assert_eq!(
        uv::marshal(&input).unwrap(),
        Some(expected(&[("array", &[""])]))
    );

    let input = Value::map([("array", ["1", "2"])]);
    assert_eq!(
        uv::marshal(&input).unwrap(),
        Some(expected(&[("array", &["1", "2"])]))
    );
    assert_eq!(
        Config::new().array_delimiter("|").marshal(&input).unwrap(),
        Some(expected(&[("array", &["1|2"])]))
    );
}

#[test]
fn marshal_nested() {
    let object = || Record::new().field("int", 100).field("slice", vec![1, 2]);

    assert_eq!(
        uv::marshal(&Value::map([("map", Value::Map(vec![]))])).unwrap(),
        Some(UrlValues::new())
    );
    assert_eq!(
        uv::marshal(&Value::map([("map", Value::Null)])).unwrap(),
        Some(UrlValues::new())
    );

    let input = Value::map([
        (
            "map1",
            Value::map([
                (
                    "map2",
                    Value::map([("int", Value::from(100)), ("slice", Value::seq([1, 2]))]),
                ),
                ("object", Value::some(object())),
            ]),
        ),
        ("object", Value::from(object())),
    ]);

    assert_eq!(
        uv::marshal(&input).unwrap(),
        Some(expected(&[
            ("map1[map2][int]", &["100"]),
            ("map1[map2][slice]", &["1", "2"]),
            ("map1[object][slice]", &["1", "2"]),
            ("map1[object][int]", &["100"]),
            ("object[int]", &["100"]),
            ("object[slice]", &["1", "2"]),
        ]))
    );
}

#[test]
fn marshal_map_keys() {
    let mut input = std::collections::BTreeMap::new();
    input.insert(0, "zero");
    input.insert(7, "seven");

    // a zero key renders as an empty path segment, which leaves a
    // top-level scalar without a key
    let values = marshal_with(Config::new(), &input);
    assert_eq!(values, expected(&[("7", &["seven"])]));

    let input = Value::map([("outer", Value::map([(0, "x")]))]);
    let values = uv::marshal(&input).unwrap().unwrap();
    assert_eq!(values.get("outer[]"), Some("x"));
}

#[test]
fn marshal_invalid_values() {
    assert_eq!(uv::to_values(&()).unwrap(), Some(UrlValues::new()));
    assert_eq!(uv::marshal(&Value::Null).unwrap(), Some(UrlValues::new()));
    assert_eq!(uv::to_values("").unwrap(), None);
    assert_eq!(uv::to_values(&None::<i32>).unwrap(), None);
    assert_eq!(uv::marshal(&Value::Map(vec![])).unwrap(), None);

    let err = uv::to_values(&10).unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { found: "int" }), "got: {err}");
    assert_eq!(err.to_string(), "expected string/map/struct but got \"int\"");

    let err = uv::to_values(&true).unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { found: "bool" }), "got: {err}");

    let err = uv::to_values(&vec![1, 2]).unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { found: "seq" }), "got: {err}");

    // zero values are reported before the type is checked
    assert_eq!(uv::to_values(&0).unwrap(), None);
    assert_eq!(uv::to_values(&false).unwrap(), None);
}

struct CustomEncodingInt(i64);

impl EncodeValues for CustomEncodingInt {
    fn encode_values(&self, key: &str, values: &mut UrlValues) -> Result<(), BoxError> {
        if self.0 < 0 {
            return Err(format!("invalid value: {}", self.0).into());
        }
        values.set(key, format!("${}", self.0));
        Ok(())
    }
}

#[test]
fn marshal_custom_encoders() {
    let input = Value::map([("int", Value::custom(CustomEncodingInt(10)))]);
    assert_eq!(
        uv::marshal(&input).unwrap(),
        Some(expected(&[("int", &["$10"])]))
    );

    let input = Value::map([("int", Value::some(Value::custom(CustomEncodingInt(10))))]);
    assert_eq!(
        uv::marshal(&input).unwrap(),
        Some(expected(&[("int", &["$10"])]))
    );

    let input = Value::map([("int", Value::custom(CustomEncodingInt(-10)))]);
    let err = uv::marshal(&input).unwrap_err();
    match err {
        Error::CustomEncode { ref key, ref source } => {
            assert_eq!(key, "int");
            assert_eq!(source.to_string(), "invalid value: -10");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn custom_encoder_inside_sequences_and_records() {
    let input = Value::map([(
        "prices",
        Value::seq([
            Value::custom(CustomEncodingInt(1)),
            Value::custom(CustomEncodingInt(2)),
        ]),
    )]);
    // `set` replaces, so the last element wins
    assert_eq!(
        uv::marshal(&input).unwrap(),
        Some(expected(&[("prices", &["$2"])]))
    );

    let record = Record::new().field("price", Value::custom(CustomEncodingInt(5)));
    let input = Value::map([("order", record)]);
    assert_eq!(
        uv::marshal(&input).unwrap(),
        Some(expected(&[("order[price]", &["$5"])]))
    );

    let record = Record::new().field("price", Value::custom(CustomEncodingInt(-5)));
    let input = Value::map([("order", record)]);
    let err = uv::marshal(&input).unwrap_err();
    assert!(matches!(err, Error::Record { ref key, .. } if key == "order"), "got: {err}");
}

#[test]
fn top_level_custom_encoder() {
    struct Fixed;

    impl EncodeValues for Fixed {
        fn encode_values(&self, key: &str, values: &mut UrlValues) -> Result<(), BoxError> {
            assert_eq!(key, "");
            values.add("fixed", "yes");
            Ok(())
        }
    }

    assert_eq!(
        uv::marshal(&Value::custom(Fixed)).unwrap(),
        Some(expected(&[("fixed", &["yes"])]))
    );
}

#[test]
fn marshal_f32_keeps_its_digits() {
    let input = Value::map([("f", Value::from(1.1f32)), ("g", Value::from(0.1f64))]);
    let values = uv::marshal(&input).unwrap().unwrap();
    assert_eq!(values.get("f"), Some("1.1"));
    assert_eq!(values.get("g"), Some("0.1"));

    let input = Value::map([("outer", Value::map([(0.5f32, "half")]))]);
    let values = uv::marshal(&input).unwrap().unwrap();
    assert_eq!(values.get("outer[0.5]"), Some("half"));

    #[derive(Serialize)]
    struct Q {
        f: f32,
        ratios: Vec<f32>,
    }

    let q = Q {
        f: 0.1,
        ratios: vec![0.3, 2.0],
    };
    assert_eq!(uv::to_string(&q).unwrap(), "f=0.1&ratios=0.3&ratios=2");

    let mut map = std::collections::BTreeMap::new();
    map.insert("f", 0.1f32);
    let values = marshal_with(Config::new().array_delimiter(","), &map);
    assert_eq!(values.get("f"), Some("0.1"));
}

#[test]
fn marshal_top_level_times() {
    // the epoch is the zero timestamp: nothing to encode
    let epoch = Utc.timestamp_opt(0, 0).unwrap();
    assert_eq!(uv::marshal(&Value::from(epoch)).unwrap(), None);

    // any other bare timestamp has no key to attach to
    let year_one = Utc.timestamp_opt(-62_135_596_800, 0).unwrap();
    assert_eq!(uv::marshal(&Value::from(year_one)).unwrap(), Some(UrlValues::new()));
    assert_eq!(uv::marshal(&Value::from(now())).unwrap(), Some(UrlValues::new()));
}
