use json_codec::{JsonValue, ParseOutcome, Style, deserialize, from_str, parse, serialize};
use test_case::test_case;

const DOCUMENTS: &[&str] = &[
    "null",
    "[]",
    "{}",
    "[true,false,null]",
    r#"{"foo":["bar","baz"]}"#,
    r#"["foo [\t] [\r] [\n]] [\\] bar"]"#,
    r#"["\u3053\u3093\u306b\u3061\u306f", "\u6c5f\u6238\u524d\uD83C\uDF63", "\uD83C\uDF63"]"#,
    "[0, 10, 234, -0, 3.14, 0.035, 1e2, 1e-2, 3.14e+01, 6.022e23, -5.1e-10]",
    r#"{"a": {"b": {"c": [[], {}, [{"d": "\u0000\u001f\/"}]]}}, "e": -1}"#,
    r#"{"dup": 1, "dup": [2], "other": "x"}"#,
    include_str!("../src/test_data/test_blob.json"),
];

fn parsed(source: &str) -> JsonValue {
    from_str(source).unwrap_or_else(|err| panic!("failed to parse {source:?}: {err}"))
}

#[test]
fn round_trips_through_both_styles() {
    for source in DOCUMENTS {
        let value = parsed(source);
        for style in [Style::Compact, Style::Pretty] {
            let text = serialize(&value, style);
            assert_eq!(value, parsed(&text), "style {style:?}, text {text}");
        }
    }
}

#[test]
fn compact_form_is_idempotent() {
    for source in DOCUMENTS {
        let compact = serialize(&parsed(source), Style::Compact);
        assert_eq!(compact, serialize(&parsed(&compact), Style::Compact));
    }
}

#[test]
fn pretty_form_reparses_to_compact_form() {
    for source in DOCUMENTS {
        let value = parsed(source);
        let pretty = serialize(&value, Style::Pretty);
        assert_eq!(
            serialize(&value, Style::Compact),
            serialize(&parsed(&pretty), Style::Compact)
        );
    }
}

#[test_case("[]", "[]"; "empty array")]
#[test_case(" [ ] ", "[]"; "empty array with spaces")]
#[test_case("{}", "{}"; "empty object")]
#[test_case(" { } ", "{}"; "empty object with spaces")]
#[test_case("[ true ,     false , null ]", "[true,false,null]"; "literals")]
#[test_case(r#"["foo [\t] [\r] [\n]] [\\] bar"]"#, r#"["foo [\t] [\r] [\n]] [\\] bar"]"#; "escapes")]
#[test_case(r#"["\u3053\u3093\u306b\u3061\u306f"]"#, "[\"\u{3053}\u{3093}\u{306b}\u{3061}\u{306f}\"]"; "multi byte")]
#[test_case(r#"["\u6c5f\u6238\u524d\uD83C\uDF63"]"#, "[\"\u{6c5f}\u{6238}\u{524d}\u{1F363}\"]"; "astral plane")]
#[test_case("[0, 10, 234]", "[0,10,234]"; "integers")]
#[test_case("[3.14, 0.035]", "[3.14,0.035]"; "fractions")]
#[test_case("[1e2, 1e-2, 3.14e+01]", "[100,0.01,31.4]"; "exponents")]
#[test_case(r#"["\u003c \u003e"]"#, r#"["< >"]"#; "unicode escapes")]
#[test_case(r#"["\b\f"]"#, r#"["\u0008\u000c"]"#; "other control characters")]
fn compact_output(source: &str, expected: &str) {
    assert_eq!(expected, parsed(source).to_string());
}

#[test]
fn surrogate_escapes() {
    let value = parsed(r#"["\uD83C\uDF63"]"#);
    assert_eq!(Some("\u{1F363}"), value[0].as_str());
    assert_eq!("[\"\u{1F363}\"]", value.to_string());

    let value = parsed(r#"["\u0001\uF363"]"#);
    let chars: Vec<char> = value[0].as_str().unwrap_or_default().chars().collect();
    assert_eq!(vec!['\u{1}', '\u{F363}'], chars);

    let value = parsed(r#"["\u00015\uF363"]"#);
    assert_eq!(Some("\u{1}5\u{F363}"), value[0].as_str());
}

#[test]
fn number_fidelity() {
    let value = parsed("[1e2, 1e-2, 3.14e+01]");
    assert_eq!(Some(100), value[0].as_i64());
    assert_eq!(Some(0.01), value[1].as_f64());
    assert_eq!(Some(31.4), value[2].as_f64());
    assert_eq!("100", JsonValue::Number(100.0).to_string());
    assert_eq!(parsed("1e2"), parsed("100"));
    assert_eq!(parsed("1e-2"), parsed("0.01"));
}

#[test_case(1e300, "1e300"; "huge")]
#[test_case(-1e300, "-1e300"; "huge negative")]
#[test_case(5e-324, "5e-324"; "smallest subnormal")]
#[test_case(1.7976931348623157e308, "1.7976931348623157e308"; "largest finite")]
#[test_case(0.00001234, "1.234e-5"; "tiny")]
#[test_case(12345678.9, "12345678.9"; "plain fraction")]
fn extreme_numbers_stay_short(num: f64, expected: &str) {
    let text = JsonValue::Number(num).to_string();
    assert_eq!(expected, text);
    assert_eq!(Some(num), parsed(&text).as_f64());
}

#[test]
fn duplicate_keys_keep_last_value() {
    let value = parsed(r#"{"a":1,"a":2}"#);
    assert_eq!(Some(2), value["a"].as_i64());
    assert_eq!(r#"{"a":2}"#, value.to_string());
}

#[test]
fn object_order_follows_input() {
    let source = r#"{"z":1,"a":2,"m":{"y":true,"b":false}}"#;
    assert_eq!(source, parsed(source).to_string());
}

#[test]
fn accessors_on_parsed_documents() {
    let value = parsed(include_str!("../src/test_data/test_blob.json"));
    assert_eq!(Some("Springfield"), value["contact"]["address"]["city"].as_str());
    assert_eq!(Some("192.168.1.2"), value["history"][1]["ip"].as_str());
    assert_eq!(Some(42), value["numbers"]["int"].as_i64());
    assert_eq!(None, value["numbers"]["float"].as_i64());
    assert!(value["history"][5]["ip"].is_null());
}

#[test]
fn throwing_and_diagnostic_entry_points_agree() {
    for source in DOCUMENTS {
        let thrown = deserialize(source.as_bytes()).ok();
        let diagnosed = match parse(source) {
            ParseOutcome::Success { value, rest } => {
                assert_eq!("", rest);
                Some(value)
            }
            ParseOutcome::Error { .. } => None,
        };
        assert_eq!(thrown, diagnosed);
        assert!(thrown.is_some());
    }
}

#[test]
fn diagnostic_parse_reports_first_offending_character() {
    let source = "{\n  \"name\": \"x\",\n  \"tags\": [\"a\" \"b\"]\n}";
    match parse(source) {
        ParseOutcome::Error { error, state } => {
            assert_eq!((3, 16), (error.line, error.column));
            assert_eq!((3, 16), (state.line(), state.column()));
            assert_eq!(source.find("\"b\""), Some(state.offset()));
        }
        ParseOutcome::Success { value, .. } => panic!("Expected an error, got '{value}'"),
    }
}
