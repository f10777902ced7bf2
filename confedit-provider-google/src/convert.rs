//! Conversions from `google_calendar` API types to confedit types.

use anyhow::{Context, Result};
use confedit_core::event::{CalendarSummary, EventRecord};
use google_calendar::types::CalendarListEntry;
use serde_json::Value;

/// Convert from Google API types to confedit types
pub trait FromGoogle<T> {
    fn from_google(value: T) -> Result<Self>
    where
        Self: Sized;
}

/// Events come back from the raw events API as JSON, so no field is lost on
/// the way in.
impl FromGoogle<Value> for EventRecord {
    fn from_google(value: Value) -> Result<Self> {
        event_record_from_value(value)
    }
}

/// Calendars without an id or a name can't be picked, so they convert to `None`.
impl FromGoogle<CalendarListEntry> for Option<CalendarSummary> {
    fn from_google(entry: CalendarListEntry) -> Result<Self> {
        if entry.id.is_empty() || entry.summary.is_empty() {
            return Ok(None);
        }
        Ok(Some(CalendarSummary {
            id: entry.id,
            summary: entry.summary,
        }))
    }
}

/// A listed event whose conference data doesn't fit our model is still
/// listed, just without a conference.
fn event_record_from_value(mut value: Value) -> Result<EventRecord> {
    match serde_json::from_value::<EventRecord>(value.clone()) {
        Ok(record) => Ok(record),
        Err(e) => {
            let Some(object) = value.as_object_mut() else {
                anyhow::bail!("Google event is not an object");
            };
            if object.remove("conferenceData").is_none() {
                return Err(e).context("Failed to parse Google event");
            }
            tracing::warn!("Dropping unreadable conference data: {}", e);
            serde_json::from_value(value).context("Failed to parse Google event")
        }
    }
}
