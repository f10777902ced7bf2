//! An in-process calendar with the provider's patch semantics.
//!
//! Used by tests to exercise the patch client end to end. Conference edits
//! sent without `conferenceDataVersion=1` are ignored, the way the real
//! provider ignores them.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use crate::backend::CalendarBackend;
use crate::error::{ConfEditError, ConfEditResult};
use crate::event::{CalendarSummary, EventRecord, EventSummary};
use crate::payload::{CONFERENCE_DATA_VERSION, ConferencePatch, EventPatch, PatchOptions};
use crate::window::EventWindow;

/// A patch as received by the calendar.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedPatch {
    pub calendar_id: String,
    pub event_id: String,
    pub body: serde_json::Value,
    pub options: PatchOptions,
}

#[derive(Debug, Default)]
struct StoredCalendar {
    summary: String,
    events: Vec<EventRecord>,
}

#[derive(Debug, Default)]
pub struct MemoryCalendar {
    calendars: Mutex<BTreeMap<String, StoredCalendar>>,
    patches: Mutex<Vec<RecordedPatch>>,
}

impl MemoryCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_calendar(self, id: &str, summary: &str) -> Self {
        self.lock_calendars().insert(
            id.to_string(),
            StoredCalendar {
                summary: summary.to_string(),
                events: Vec::new(),
            },
        );
        self
    }

    pub fn insert_event(&self, calendar_id: &str, event: EventRecord) {
        let mut calendars = self.lock_calendars();
        let calendar = calendars.entry(calendar_id.to_string()).or_default();
        calendar.events.retain(|e| e.id != event.id);
        calendar.events.push(event);
    }

    pub fn event(&self, calendar_id: &str, event_id: &str) -> Option<EventRecord> {
        self.lock_calendars()
            .get(calendar_id)?
            .events
            .iter()
            .find(|e| e.id == event_id)
            .cloned()
    }

    pub fn patches(&self) -> Vec<RecordedPatch> {
        self.patches
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn lock_calendars(&self) -> MutexGuard<'_, BTreeMap<String, StoredCalendar>> {
        self.calendars.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl CalendarBackend for MemoryCalendar {
    async fn list_calendars(&self) -> ConfEditResult<Vec<CalendarSummary>> {
        Ok(self
            .lock_calendars()
            .iter()
            .filter(|(_, cal)| !cal.summary.is_empty())
            .map(|(id, cal)| CalendarSummary {
                id: id.clone(),
                summary: cal.summary.clone(),
            })
            .collect())
    }

    async fn list_upcoming_events(
        &self,
        calendar_id: &str,
        window: &EventWindow,
        query: Option<&str>,
    ) -> ConfEditResult<Vec<EventSummary>> {
        let calendars = self.lock_calendars();
        let calendar = calendars
            .get(calendar_id)
            .ok_or_else(|| ConfEditError::NotFound(format!("Calendar {}", calendar_id)))?;

        let query = query.map(str::to_lowercase).filter(|q| !q.is_empty());

        let mut events: Vec<EventSummary> = calendar
            .events
            .iter()
            .cloned()
            .filter_map(EventSummary::from_record)
            .filter(|e| window.contains(e.start))
            .filter(|e| match &query {
                Some(q) => e.summary.to_lowercase().contains(q),
                None => true,
            })
            .collect();

        events.sort_by_key(|e| e.start);
        Ok(events)
    }

    async fn get_event(&self, calendar_id: &str, event_id: &str) -> ConfEditResult<EventRecord> {
        self.event(calendar_id, event_id).ok_or_else(|| {
            ConfEditError::NotFound(format!("Event {} in calendar {}", event_id, calendar_id))
        })
    }

    async fn patch_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        patch: &EventPatch,
        options: PatchOptions,
    ) -> ConfEditResult<EventRecord> {
        let body = serde_json::to_value(patch)
            .map_err(|e| ConfEditError::Serialization(e.to_string()))?;
        self.patches
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(RecordedPatch {
                calendar_id: calendar_id.to_string(),
                event_id: event_id.to_string(),
                body,
                options,
            });

        let mut calendars = self.lock_calendars();
        let event = calendars
            .get_mut(calendar_id)
            .and_then(|cal| cal.events.iter_mut().find(|e| e.id == event_id))
            .ok_or_else(|| {
                ConfEditError::NotFound(format!("Event {} in calendar {}", event_id, calendar_id))
            })?;

        if options.conference_data_version >= CONFERENCE_DATA_VERSION {
            event.conference_data = match &patch.conference_data {
                ConferencePatch::Replace(data) => Some(data.clone()),
                ConferencePatch::Clear => None,
            };
        }

        Ok(event.clone())
    }
}
