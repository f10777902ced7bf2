//! Calendar and event types exchanged with providers.

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::conference::ConferenceData;

/// A calendar the user can pick from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarSummary {
    pub id: String,
    pub summary: String,
}

/// An event as stored by the provider.
///
/// Only the fields this tool reads are modeled; everything else is kept in
/// `extra` so a record can be compared before and after a patch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub id: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<EventStart>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conference_data: Option<ConferenceData>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventStart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

impl EventRecord {
    pub fn is_cancelled(&self) -> bool {
        self.status.as_deref() == Some("cancelled")
    }

    pub fn start_date_time(&self) -> Option<DateTime<Utc>> {
        self.start.as_ref().and_then(|s| s.date_time)
    }

    /// Conference data, with the provider's empty placeholder treated as absent.
    pub fn conference(&self) -> Option<&ConferenceData> {
        self.conference_data.as_ref().filter(|cd| !cd.is_empty())
    }
}

/// An upcoming event as shown in the event list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSummary {
    pub id: String,
    pub summary: String,
    pub start: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conference_data: Option<ConferenceData>,
}

impl EventSummary {
    /// Listable events are non-cancelled and have a start date-time.
    /// All-day events only carry a date and are skipped.
    pub fn from_record(record: EventRecord) -> Option<Self> {
        if record.is_cancelled() || record.id.is_empty() {
            return None;
        }
        let start = record.start_date_time()?;

        let conference_data = record.conference().cloned();

        Some(EventSummary {
            id: record.id,
            summary: if record.summary.is_empty() {
                "(No title)".to_string()
            } else {
                record.summary
            },
            start,
            conference_data,
        })
    }

    pub fn conference_url(&self) -> Option<&str> {
        self.conference_data
            .as_ref()
            .and_then(|cd| cd.video_entry_point())
            .map(|ep| ep.uri.as_str())
            .filter(|uri| !uri.is_empty())
    }
}

impl fmt::Display for EventSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let local = self.start.with_timezone(&Local);
        write!(f, "{} ({})", self.summary, local.format("%Y-%m-%d %H:%M"))
    }
}
