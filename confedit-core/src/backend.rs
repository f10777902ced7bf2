//! The calendar operations the editor depends on.
//!
//! One method per operation. Implemented by the provider subprocess client
//! (`provider::Provider`) and by the in-memory calendar used in tests.

use async_trait::async_trait;

use crate::error::ConfEditResult;
use crate::event::{CalendarSummary, EventRecord, EventSummary};
use crate::payload::{EventPatch, PatchOptions};
use crate::window::EventWindow;

#[async_trait]
pub trait CalendarBackend: Send + Sync {
    /// Calendars the user can see.
    async fn list_calendars(&self) -> ConfEditResult<Vec<CalendarSummary>>;

    /// Non-cancelled, timed events starting inside `window`, ordered by
    /// start time. `query` is a free-text filter forwarded to the provider.
    async fn list_upcoming_events(
        &self,
        calendar_id: &str,
        window: &EventWindow,
        query: Option<&str>,
    ) -> ConfEditResult<Vec<EventSummary>>;

    async fn get_event(&self, calendar_id: &str, event_id: &str) -> ConfEditResult<EventRecord>;

    /// Partially update an event, returning the stored result.
    async fn patch_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        patch: &EventPatch,
        options: PatchOptions,
    ) -> ConfEditResult<EventRecord>;
}
