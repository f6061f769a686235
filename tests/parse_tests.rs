//! Tests for the structured-log record parser.

use chrono::{TimeZone, Utc};
use logevent::parse::parse_record;
use logevent::types::{Level, LogRecord};

#[test]
fn test_parse_structured_record() {
    let raw = r#"{"level":"ERROR","time":"2023-11-14T22:13:20Z","msg":"boom","count":3}"#;

    let record = parse_record(raw);
    assert_eq!(record.level, Level::Error);
    assert_eq!(
        record.time,
        Some(Utc.with_ymd_and_hms(2023, 11, 14, 22, 13, 20).unwrap())
    );
    assert_eq!(record.message, "boom");
    assert_eq!(record.payload.get("count"), Some(&"3".to_string()));
}

#[test]
fn test_parse_source_location() {
    let raw = r#"{"msg":"m","source":{"function":"handler","file":"api.go","line":42}}"#;

    let record = parse_record(raw);
    assert_eq!(record.source.function, "handler");
    assert_eq!(record.source.file, "api.go");
    assert_eq!(record.source.line, 42);
}

#[test]
fn test_parse_partial_source_defaults_missing_fields() {
    let raw = r#"{"source":{"file":"api.go"}}"#;

    let record = parse_record(raw);
    assert_eq!(record.source.function, "");
    assert_eq!(record.source.file, "api.go");
    assert_eq!(record.source.line, 0);
}

#[test]
fn test_parse_plain_text_fallback() {
    let record = parse_record("task started on worker 3");

    assert_eq!(record.level, Level::Info);
    assert_eq!(record.message, "task started on worker 3");
    assert!(record.payload.is_empty());
    assert!(record.time.is_none());
}

#[test]
fn test_parse_non_object_json_fallback() {
    for raw in ["[1, 2, 3]", "42", "\"quoted\"", "true", "null"] {
        let record = parse_record(raw);
        assert_eq!(record, LogRecord::plain(raw), "input: {raw}");
    }
}

#[test]
fn test_parse_empty_string_fallback() {
    let record = parse_record("");
    assert_eq!(record, LogRecord::plain(""));
}

#[test]
fn test_malformed_time_degrades_whole_record() {
    // A present but unparseable reserved field drops the entire record to
    // the plain-text form, same as non-JSON input.
    let raw = r#"{"level":"WARN","time":"yesterday","msg":"m"}"#;

    let record = parse_record(raw);
    assert_eq!(record, LogRecord::plain(raw));
}

#[test]
fn test_non_string_level_degrades_whole_record() {
    let raw = r#"{"level":5,"msg":"m"}"#;

    let record = parse_record(raw);
    assert_eq!(record, LogRecord::plain(raw));
}

#[test]
fn test_non_object_source_degrades_whole_record() {
    let raw = r#"{"source":"api.go:42","msg":"m"}"#;

    let record = parse_record(raw);
    assert_eq!(record, LogRecord::plain(raw));
}

#[test]
fn test_unknown_level_name_stays_structured() {
    // Unknown severity names are not malformed: the record stays structured
    // and the level takes its default.
    let raw = r#"{"level":"verbose","msg":"m"}"#;

    let record = parse_record(raw);
    assert_eq!(record.level, Level::Info);
    assert_eq!(record.message, "m");
    assert!(record.payload.is_empty());
}

#[test]
fn test_structured_record_without_msg_has_empty_message() {
    let record = parse_record(r#"{"level":"DEBUG"}"#);

    assert_eq!(record.level, Level::Debug);
    assert_eq!(record.message, "");
}

#[test]
fn test_payload_keeps_numeric_text() {
    let raw = r#"{"msg":"m","count":3,"ratio":2.5,"big":9999999999999999,"neg":-7}"#;

    let record = parse_record(raw);
    assert_eq!(record.payload.get("count"), Some(&"3".to_string()));
    assert_eq!(record.payload.get("ratio"), Some(&"2.5".to_string()));
    assert_eq!(record.payload.get("big"), Some(&"9999999999999999".to_string()));
    assert_eq!(record.payload.get("neg"), Some(&"-7".to_string()));
}

#[test]
fn test_payload_keeps_raw_text_for_composites() {
    let raw = r#"{"msg":"m","ctx":{"a":1},"items":["x","y"]}"#;

    let record = parse_record(raw);
    assert_eq!(record.payload.get("ctx"), Some(&r#"{"a":1}"#.to_string()));
    assert_eq!(record.payload.get("items"), Some(&r#"["x","y"]"#.to_string()));
}

#[test]
fn test_payload_keeps_raw_text_for_bool_and_null() {
    let raw = r#"{"msg":"m","ok":true,"gone":null}"#;

    let record = parse_record(raw);
    assert_eq!(record.payload.get("ok"), Some(&"true".to_string()));
    assert_eq!(record.payload.get("gone"), Some(&"null".to_string()));
}

#[test]
fn test_payload_never_contains_reserved_keys() {
    let raw = r#"{"level":"INFO","time":"2024-01-01T00:00:00Z","source":{},"msg":"m","extra":"e"}"#;

    let record = parse_record(raw);
    for key in ["level", "time", "source", "msg"] {
        assert!(!record.payload.contains_key(key), "reserved key {key} leaked");
    }
    assert_eq!(record.payload.len(), 1);
}

#[test]
fn test_parse_time_with_offset_normalises_to_utc() {
    let record = parse_record(r#"{"time":"2023-11-14T23:13:20+01:00"}"#);

    assert_eq!(
        record.time,
        Some(Utc.with_ymd_and_hms(2023, 11, 14, 22, 13, 20).unwrap())
    );
}
