//! Event construction and derived views over retrieved log records.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::OnceLock;

use chrono::{DateTime, Local, Utc};
use regex::Regex;

use crate::flatten::flatten_payload;
use crate::parse::parse_record;
use crate::types::{Event, RetrievedRecord};

/// Compact timestamp format used by the short-time view.
pub const SHORT_TIME_FORMAT: &str = "%m-%d %H:%M:%S";

fn task_uuid_re() -> &'static Regex {
    static TASK_UUID_RE: OnceLock<Regex> = OnceLock::new();
    TASK_UUID_RE.get_or_init(|| {
        Regex::new(
            r"^[[:alnum:]]{8}-[[:alnum:]]{4}-[[:alnum:]]{4}-[[:alnum:]]{4}-[[:alnum:]]{12}$",
        )
        .expect("valid task uuid regex")
    })
}

/// Convert a millisecond epoch timestamp to UTC. Absent values map to the
/// epoch itself, not an error.
pub fn epoch_ms_to_utc(ms: Option<i64>) -> DateTime<Utc> {
    ms.and_then(DateTime::from_timestamp_millis)
        .unwrap_or(DateTime::UNIX_EPOCH)
}

impl Event {
    /// Build an [`Event`] from one retrieved record and its group label.
    ///
    /// The message is parsed against the structured-log convention; a
    /// record with no embedded time takes the backend's creation time.
    /// Absent metadata degrades to empty strings and the epoch.
    pub fn new(raw: RetrievedRecord, group: &str) -> Event {
        let message = raw.message.unwrap_or_default();
        let mut record = parse_record(&message);

        let creation_time = epoch_ms_to_utc(raw.timestamp);
        if record.time.is_none() {
            record.time = Some(creation_time);
        }

        Event {
            record,
            stream: raw.log_stream_name.unwrap_or_default(),
            group: group.to_string(),
            id: raw.event_id.unwrap_or_default(),
            ingest_time: epoch_ms_to_utc(raw.ingestion_time),
            creation_time,
        }
    }

    /// Shorten a task-UUID stream name to its first segment. Other stream
    /// names pass through unchanged.
    pub fn short_stream(&self) -> &str {
        if task_uuid_re().is_match(&self.stream) {
            self.stream.split('-').next().unwrap_or(&self.stream)
        } else {
            &self.stream
        }
    }

    /// Record timestamp in the local zone, `MM-DD HH:MM:SS`.
    pub fn short_time(&self) -> String {
        self.record
            .time
            .unwrap_or(DateTime::UNIX_EPOCH)
            .with_timezone(&Local)
            .format(SHORT_TIME_FORMAT)
            .to_string()
    }

    /// Payload with nested values expanded into dot-joined leaf keys.
    pub fn flat_payload(&self) -> BTreeMap<String, String> {
        flatten_payload(&self.record.payload)
    }

    /// Indented diagnostic form of the whole event. Falls back to the
    /// `Debug` dump if serialization fails.
    pub fn pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| format!("{self:#?}"))
    }
}

/// Total order on events by backend creation time.
pub fn by_creation_time(a: &Event, b: &Event) -> Ordering {
    a.creation_time.cmp(&b.creation_time)
}

/// Sort events chronologically in place. The sort is stable, so events
/// with equal creation times keep their input order.
pub fn sort_by_creation_time(events: &mut [Event]) {
    events.sort_by(by_creation_time);
}
