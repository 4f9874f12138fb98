//! Completion event model

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// Event type emitted when a job's primary task has finished
pub const JOB_FINISHED_EVENT: &str = "jobFinished";

/// One event in the ingestion endpoint's wire shape
///
/// Built once per notifier run, serialized, sent and dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationEvent {
    pub id: Uuid,
    pub event_type: String,
    pub subject: String,
    /// ISO-8601 UTC, microsecond precision, `Z` suffix
    pub event_time: String,
    pub data: JsonValue,
}

impl NotificationEvent {
    /// Create an event stamped with the current time
    pub fn new(event_type: impl Into<String>, subject: impl Into<String>, data: JsonValue) -> Self {
        Self::at(event_type, subject, data, Timestamp::now())
    }

    pub fn at(
        event_type: impl Into<String>,
        subject: impl Into<String>,
        data: JsonValue,
        time: Timestamp,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_type: event_type.into(),
            subject: subject.into(),
            event_time: format_event_time(time),
            data,
        }
    }
}

/// Format as `YYYY-MM-DDTHH:MM:SS.ffffffZ` in UTC
pub fn format_event_time(time: Timestamp) -> String {
    format!(
        "{}.{:06}Z",
        time.strftime("%Y-%m-%dT%H:%M:%S"),
        time.subsec_microsecond()
    )
}

/// Serialize events as the JSON array the ingestion endpoint expects
pub fn encode_batch(events: &[NotificationEvent]) -> serde_json::Result<String> {
    serde_json::to_string(events)
}
