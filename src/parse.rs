//! Record parser for the structured-log convention.
//! Turns one raw message string into a [`LogRecord`], never failing the caller.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde_json::value::RawValue;
use tracing::debug;

use crate::types::{LogRecord, SourceLocation};

/// Keys owned by the structured-log convention; everything else is payload.
pub const RESERVED_KEYS: [&str; 4] = ["level", "time", "source", "msg"];

/// Parse one raw message into a [`LogRecord`].
///
/// Messages that follow the structured-log convention yield typed fields
/// plus a payload of the remaining keys. Anything else — plain text, JSON
/// scalars or arrays, or an object with a wrongly-typed reserved field —
/// yields a plain record with `Info` severity and the raw text as the
/// message. A malformed reserved field degrades the whole record, not just
/// that field.
pub fn parse_record(raw: &str) -> LogRecord {
    match try_parse_structured(raw) {
        Ok(record) => record,
        Err(err) => {
            debug!("message is not a structured record: {err:#}");
            LogRecord::plain(raw)
        }
    }
}

fn try_parse_structured(raw: &str) -> Result<LogRecord> {
    // Phase one: generic key -> raw-value map. Fails for anything that is
    // not a JSON object.
    let fields: BTreeMap<String, Box<RawValue>> =
        serde_json::from_str(raw).context("decoding message object")?;

    // Phase two: typed extraction of the reserved keys.
    let mut record = LogRecord::default();
    if let Some(value) = fields.get("level") {
        record.level = serde_json::from_str(value.get()).context("decoding level field")?;
    }
    if let Some(value) = fields.get("time") {
        record.time = Some(decode_time(value.get()).context("decoding time field")?);
    }
    if let Some(value) = fields.get("source") {
        let source: SourceLocation =
            serde_json::from_str(value.get()).context("decoding source field")?;
        record.source = source;
    }
    if let Some(value) = fields.get("msg") {
        record.message = serde_json::from_str(value.get()).context("decoding msg field")?;
    }

    for (key, value) in &fields {
        if RESERVED_KEYS.contains(&key.as_str()) {
            continue;
        }
        record.payload.insert(key.clone(), payload_text(value));
    }

    Ok(record)
}

fn decode_time(raw: &str) -> Result<DateTime<Utc>> {
    let text: String = serde_json::from_str(raw)?;
    let parsed = DateTime::parse_from_rfc3339(&text)?;
    Ok(parsed.with_timezone(&Utc))
}

/// Progressively looser decodings keep every payload value in textual form:
/// JSON string, else numeric literal, else the raw JSON text verbatim.
fn payload_text(value: &RawValue) -> String {
    if let Ok(text) = serde_json::from_str::<String>(value.get()) {
        return text;
    }
    if let Ok(number) = serde_json::from_str::<serde_json::Number>(value.get()) {
        return number.to_string();
    }
    value.get().to_string()
}
