use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity of a log record, normalised across producers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Fatal,
}

impl Level {
    /// Map a severity name to a level, case-insensitively. Unknown names
    /// map to `Info` rather than failing.
    pub fn parse(name: &str) -> Level {
        match name.trim().to_ascii_lowercase().as_str() {
            "trace" => Level::Trace,
            "debug" => Level::Debug,
            "info" => Level::Info,
            "warn" | "warning" => Level::Warn,
            "error" => Level::Error,
            "fatal" | "critical" => Level::Fatal,
            _ => Level::Info,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Fatal => "FATAL",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Only a JSON string is accepted; any other JSON type is a decode error,
// which degrades the whole record to the plain-text form.
impl<'de> Deserialize<'de> for Level {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Ok(Level::parse(&name))
    }
}

/// Code location a structured record claims to come from. Absent fields
/// are zero-valued.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceLocation {
    pub function: String,
    pub file: String,
    pub line: u32,
}

/// Parsed form of one log message.
///
/// Structured messages populate the typed fields; everything outside the
/// `level`/`time`/`source`/`msg` convention lands in `payload` as text.
/// Plain-text messages keep the whole line in `message`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct LogRecord {
    pub level: Level,
    /// Timestamp embedded in the message, if one was present and parseable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<DateTime<Utc>>,
    pub source: SourceLocation,
    #[serde(rename = "msg")]
    pub message: String,
    /// Non-reserved fields, each kept in some textual form.
    #[serde(flatten)]
    pub payload: BTreeMap<String, String>,
}

impl LogRecord {
    /// Record for a message that does not follow the structured convention:
    /// `Info` severity, the raw text as the message, nothing else.
    pub fn plain(text: &str) -> LogRecord {
        LogRecord {
            message: text.to_string(),
            ..LogRecord::default()
        }
    }
}

/// One record as returned by the log-aggregation API, in the CloudWatch
/// `FilteredLogEvent` wire convention. Every field may be absent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RetrievedRecord {
    pub log_stream_name: Option<String>,
    pub event_id: Option<String>,
    pub message: Option<String>,
    /// Creation time reported by the backend, milliseconds since the epoch.
    pub timestamp: Option<i64>,
    /// Ingestion time reported by the backend, milliseconds since the epoch.
    pub ingestion_time: Option<i64>,
}

/// A parsed record together with its retrieval metadata. Built once via
/// [`Event::new`] and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    #[serde(flatten)]
    pub record: LogRecord,
    pub stream: String,
    pub group: String,
    pub id: String,
    pub ingest_time: DateTime<Utc>,
    pub creation_time: DateTime<Utc>,
}
