//! Committing conference data back to the calendar.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::backend::CalendarBackend;
use crate::conference::ConferenceData;
use crate::error::{ConfEditError, ConfEditResult};
use crate::event::EventRecord;
use crate::payload::{EventPatch, PatchOptions, build_patch_payload};
use crate::session::EditSession;
use crate::validate::{Validator, is_http_uri};

/// Writes conference data through a `CalendarBackend`.
///
/// Only one write may be in flight at a time. While one is outstanding,
/// `is_busy` returns true and further writes fail with `ConfEditError::Busy`.
pub struct ConferencePatchClient<B> {
    backend: B,
    busy: AtomicBool,
}

impl<B: CalendarBackend> ConferencePatchClient<B> {
    pub fn new(backend: B) -> Self {
        ConferencePatchClient {
            backend,
            busy: AtomicBool::new(false),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// The event's conference data, or `None` if it has none.
    pub async fn fetch_conference_data(
        &self,
        calendar_id: &str,
        event_id: &str,
    ) -> ConfEditResult<Option<ConferenceData>> {
        require_ids(calendar_id, event_id)?;
        let event = self.backend.get_event(calendar_id, event_id).await?;
        Ok(event.conference().cloned())
    }

    /// Fetch an event's conference data and open an editing session on it.
    pub async fn open_session(
        &self,
        calendar_id: &str,
        event_id: &str,
        validator: Validator,
        debounce: Duration,
    ) -> ConfEditResult<EditSession> {
        let record = self.fetch_conference_data(calendar_id, event_id).await?;
        Ok(EditSession::load_with(record, validator, debounce))
    }

    /// Build the canonical payload from `session` and write it.
    ///
    /// The session is only read; on failure it is left exactly as it was so
    /// the user can correct and retry.
    pub async fn submit(
        &self,
        calendar_id: &str,
        event_id: &str,
        session: &EditSession,
    ) -> ConfEditResult<EventRecord> {
        let payload = build_patch_payload(session)?;
        self.update(calendar_id, event_id, payload).await
    }

    /// Replace the event's conference data with `payload`.
    pub async fn update(
        &self,
        calendar_id: &str,
        event_id: &str,
        payload: ConferenceData,
    ) -> ConfEditResult<EventRecord> {
        require_ids(calendar_id, event_id)?;
        require_mandatory_fields(&payload)?;

        let _guard = BusyGuard::acquire(&self.busy)?;
        tracing::info!(calendar_id, event_id, "Updating conference data");

        self.backend
            .patch_event(
                calendar_id,
                event_id,
                &EventPatch::replace(payload),
                PatchOptions::conference(),
            )
            .await
            .inspect_err(|e| tracing::warn!(calendar_id, event_id, error = %e, "Update failed"))
    }

    /// Remove the event's conference data. The event itself stays.
    pub async fn delete(&self, calendar_id: &str, event_id: &str) -> ConfEditResult<EventRecord> {
        require_ids(calendar_id, event_id)?;

        let _guard = BusyGuard::acquire(&self.busy)?;
        tracing::info!(calendar_id, event_id, "Clearing conference data");

        self.backend
            .patch_event(
                calendar_id,
                event_id,
                &EventPatch::clear(),
                PatchOptions::conference(),
            )
            .await
            .inspect_err(|e| tracing::warn!(calendar_id, event_id, error = %e, "Delete failed"))
    }
}

fn require_ids(calendar_id: &str, event_id: &str) -> ConfEditResult<()> {
    if calendar_id.is_empty() || event_id.is_empty() {
        return Err(ConfEditError::Validation(
            "Calendar ID and event ID are required".to_string(),
        ));
    }
    Ok(())
}

fn require_mandatory_fields(payload: &ConferenceData) -> ConfEditResult<()> {
    if payload.solution_name().trim().is_empty() {
        return Err(ConfEditError::Validation(
            "Conference solution name is required".to_string(),
        ));
    }
    match payload.video_entry_point() {
        Some(ep) if is_http_uri(&ep.uri) => Ok(()),
        _ => Err(ConfEditError::Validation(
            "A video entry point with an http(s) URI is required".to_string(),
        )),
    }
}

/// Holds the busy flag for the duration of one request.
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> ConfEditResult<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ConfEditError::Busy)?;
        Ok(BusyGuard(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
