use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use confedit_core::backend::CalendarBackend;
use confedit_core::event::{CalendarSummary, EventRecord, EventSummary};
use confedit_core::memory::MemoryCalendar;
use confedit_core::payload::{EventPatch, PatchOptions, build_patch_payload};
use confedit_core::validate::Validator;
use confedit_core::window::EventWindow;
use confedit_core::{
    ConfEditError, ConfEditResult, ConferencePatchClient, EditSession, FormField,
};
use serde_json::json;
use tokio::sync::Notify;

const CAL: &str = "team@example.com";

fn event(value: serde_json::Value) -> EventRecord {
    serde_json::from_value(value).unwrap()
}

fn calendar() -> MemoryCalendar {
    let cal = MemoryCalendar::new().with_calendar(CAL, "Team");
    cal.insert_event(
        CAL,
        event(json!({
            "id": "plain",
            "summary": "Planning",
            "location": "Room 4",
            "start": {"dateTime": "2026-10-20T09:00:00Z"},
            "attendees": [{"email": "a@example.com"}]
        })),
    );
    cal.insert_event(
        CAL,
        event(json!({
            "id": "meet",
            "summary": "Weekly sync",
            "start": {"dateTime": "2026-10-21T09:00:00Z"},
            "conferenceData": {
                "conferenceId": "abc-defg-hij",
                "conferenceSolution": {"name": "Google Meet", "key": {"type": "hangoutsMeet"}},
                "entryPoints": [
                    {"entryPointType": "phone", "uri": "tel:+1-555-0100"},
                    {"entryPointType": "video", "uri": "https://a"},
                    {"entryPointType": "video", "uri": "https://b"}
                ]
            }
        })),
    );
    cal
}

async fn open(client: &ConferencePatchClient<MemoryCalendar>, event_id: &str) -> EditSession {
    client
        .open_session(CAL, event_id, Validator::default(), Duration::from_millis(300))
        .await
        .unwrap()
}

#[tokio::test]
async fn new_conference_is_submitted_with_version_flag() {
    let client = ConferencePatchClient::new(calendar());

    let mut session = open(&client, "plain").await;
    assert!(session.is_new());
    assert_eq!(session.record().entry_points.len(), 1);
    assert_eq!(
        session.record().conference_solution.as_ref().unwrap().key.kind,
        "addOn"
    );

    session.set_field(FormField::EntryPointUri, "https://meet.example/x");
    session.set_field(FormField::Name, "Meet");
    let stored = client.submit(CAL, "plain", &session).await.unwrap();

    let patches = client.backend().patches();
    assert_eq!(patches.len(), 1);
    assert_eq!(patches[0].options, PatchOptions::conference());
    assert_eq!(patches[0].options.conference_data_version, 1);

    let body = &patches[0].body;
    assert_eq!(body.as_object().unwrap().len(), 1);
    assert_eq!(
        body["conferenceData"]["entryPoints"][0]["uri"],
        "https://meet.example/x"
    );
    assert_eq!(
        body["conferenceData"]["createRequest"]["conferenceSolutionKey"]["type"],
        "addOn"
    );

    let conference = stored.conference_data.unwrap();
    assert_eq!(conference.solution_name(), "Meet");
}

#[tokio::test]
async fn existing_conference_selects_first_video_entry_point() {
    let client = ConferencePatchClient::new(calendar());
    let session = open(&client, "meet").await;

    assert!(!session.is_new());
    assert_eq!(session.form().entry_point_uri, "https://a");
    assert_eq!(session.form().conference_id, "abc-defg-hij");
}

#[tokio::test]
async fn update_is_idempotent() {
    let client = ConferencePatchClient::new(calendar());
    let mut session = open(&client, "meet").await;
    session.set_field(FormField::EntryPointUri, "https://meet.example/new");
    let payload = build_patch_payload(&session).unwrap();

    let once = client.update(CAL, "meet", payload.clone()).await.unwrap();
    let twice = client.update(CAL, "meet", payload).await.unwrap();

    assert_eq!(once, twice);
    let stored = client.backend().event(CAL, "meet").unwrap();
    assert_eq!(stored, twice);
    assert_eq!(stored.conference_data.unwrap().entry_points.len(), 1);
}

#[tokio::test]
async fn delete_clears_conference_but_keeps_event() {
    let client = ConferencePatchClient::new(calendar());
    let before = client.backend().event(CAL, "meet").unwrap();

    client.delete(CAL, "meet").await.unwrap();

    let patches = client.backend().patches();
    assert_eq!(patches[0].body, json!({"conferenceData": null}));
    assert_eq!(patches[0].options.conference_data_version, 1);

    let after = client.backend().get_event(CAL, "meet").await.unwrap();
    assert!(after.conference_data.is_none());
    assert_eq!(after.summary, before.summary);
    assert_eq!(after.start, before.start);
    assert_eq!(after.extra, before.extra);
}

#[tokio::test]
async fn delete_on_event_without_conference_is_harmless() {
    let client = ConferencePatchClient::new(calendar());
    let before = client.backend().event(CAL, "plain").unwrap();

    let after = client.delete(CAL, "plain").await.unwrap();
    assert_eq!(after, before);
}

#[tokio::test]
async fn unknown_event_is_not_found() {
    let client = ConferencePatchClient::new(calendar());

    let err = client.delete(CAL, "missing").await.unwrap_err();
    assert!(matches!(err, ConfEditError::NotFound(_)));

    let err = client
        .fetch_conference_data("other@example.com", "meet")
        .await
        .unwrap_err();
    assert!(matches!(err, ConfEditError::NotFound(_)));
}

#[tokio::test]
async fn invalid_session_never_reaches_backend() {
    let client = ConferencePatchClient::new(calendar());
    let mut session = open(&client, "meet").await;
    session.set_field(FormField::Name, "");

    let err = client.submit(CAL, "meet", &session).await.unwrap_err();
    assert!(matches!(err, ConfEditError::Validation(_)));

    let err = client.delete("", "meet").await.unwrap_err();
    assert!(matches!(err, ConfEditError::Validation(_)));

    assert!(client.backend().patches().is_empty());
}

#[tokio::test]
async fn update_rejects_payload_without_video_uri() {
    let client = ConferencePatchClient::new(calendar());
    let payload = serde_json::from_value(json!({
        "conferenceSolution": {"name": "Meet", "key": {"type": "addOn"}},
        "entryPoints": [{"entryPointType": "phone", "uri": "tel:+1"}]
    }))
    .unwrap();

    let err = client.update(CAL, "meet", payload).await.unwrap_err();
    assert!(matches!(err, ConfEditError::Validation(_)));
}

#[tokio::test]
async fn update_rejects_blank_solution_name() {
    let client = ConferencePatchClient::new(calendar());
    let payload = serde_json::from_value(json!({
        "conferenceSolution": {"name": "   ", "key": {"type": "addOn"}},
        "entryPoints": [{"entryPointType": "video", "uri": "https://meet.example/x"}]
    }))
    .unwrap();

    let err = client.update(CAL, "meet", payload).await.unwrap_err();
    assert!(matches!(err, ConfEditError::Validation(_)));
    assert!(client.backend().patches().is_empty());

    // A session with the same name is blocked the same way
    let mut session = open(&client, "plain").await;
    session.set_field(FormField::Name, "   ");
    session.set_field(FormField::EntryPointUri, "https://meet.example/x");
    assert!(!session.is_submittable());
}

#[tokio::test]
async fn provider_ignores_conference_edit_without_version_flag() {
    let cal = calendar();
    let before = cal.event(CAL, "meet").unwrap();

    let stored = cal
        .patch_event(
            CAL,
            "meet",
            &EventPatch::clear(),
            PatchOptions {
                conference_data_version: 0,
            },
        )
        .await
        .unwrap();

    assert_eq!(stored, before);
}

#[tokio::test]
async fn upcoming_events_respect_window_and_query() {
    let cal = calendar();
    cal.insert_event(
        CAL,
        event(json!({
            "id": "gone",
            "summary": "Cancelled sync",
            "status": "cancelled",
            "start": {"dateTime": "2026-10-22T09:00:00Z"}
        })),
    );
    let window = EventWindow::from_args(Some("2026-10-01"), Some("2026-10-31"), 30).unwrap();

    let all = cal.list_upcoming_events(CAL, &window, None).await.unwrap();
    let ids: Vec<_> = all.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["plain", "meet"]);
    assert_eq!(all[1].conference_url(), Some("https://a"));

    let synced = cal
        .list_upcoming_events(CAL, &window, Some("SYNC"))
        .await
        .unwrap();
    assert_eq!(synced.len(), 1);
    assert_eq!(synced[0].id, "meet");
}

struct FailingBackend;

#[async_trait]
impl CalendarBackend for FailingBackend {
    async fn list_calendars(&self) -> ConfEditResult<Vec<CalendarSummary>> {
        Ok(vec![])
    }

    async fn list_upcoming_events(
        &self,
        _calendar_id: &str,
        _window: &EventWindow,
        _query: Option<&str>,
    ) -> ConfEditResult<Vec<EventSummary>> {
        Ok(vec![])
    }

    async fn get_event(&self, _calendar_id: &str, event_id: &str) -> ConfEditResult<EventRecord> {
        Err(ConfEditError::NotFound(event_id.to_string()))
    }

    async fn patch_event(
        &self,
        _calendar_id: &str,
        _event_id: &str,
        _patch: &EventPatch,
        _options: PatchOptions,
    ) -> ConfEditResult<EventRecord> {
        Err(ConfEditError::Provider(
            "Invalid conference type value.".to_string(),
        ))
    }
}

#[tokio::test]
async fn provider_failure_leaves_session_untouched() {
    let client = ConferencePatchClient::new(FailingBackend);
    let mut session = EditSession::load(None);
    session.set_field(FormField::EntryPointUri, "https://meet.example/x");
    session.set_field(FormField::Name, "Meet");
    let text_before = session.text().to_string();
    let form_before = session.form();

    let err = client.submit(CAL, "e1", &session).await.unwrap_err();

    assert!(matches!(err, ConfEditError::Provider(msg) if msg == "Invalid conference type value."));
    assert_eq!(session.text(), text_before);
    assert_eq!(session.form(), form_before);
    assert!(session.is_submittable());
    assert!(!client.is_busy());
}

/// Holds every patch until released.
struct GatedBackend {
    inner: MemoryCalendar,
    release: Arc<Notify>,
}

#[async_trait]
impl CalendarBackend for GatedBackend {
    async fn list_calendars(&self) -> ConfEditResult<Vec<CalendarSummary>> {
        self.inner.list_calendars().await
    }

    async fn list_upcoming_events(
        &self,
        calendar_id: &str,
        window: &EventWindow,
        query: Option<&str>,
    ) -> ConfEditResult<Vec<EventSummary>> {
        self.inner
            .list_upcoming_events(calendar_id, window, query)
            .await
    }

    async fn get_event(&self, calendar_id: &str, event_id: &str) -> ConfEditResult<EventRecord> {
        self.inner.get_event(calendar_id, event_id).await
    }

    async fn patch_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        patch: &EventPatch,
        options: PatchOptions,
    ) -> ConfEditResult<EventRecord> {
        self.release.notified().await;
        self.inner
            .patch_event(calendar_id, event_id, patch, options)
            .await
    }
}

#[tokio::test]
async fn second_write_while_busy_is_refused() {
    let release = Arc::new(Notify::new());
    let client = Arc::new(ConferencePatchClient::new(GatedBackend {
        inner: calendar(),
        release: release.clone(),
    }));

    let first = {
        let client = client.clone();
        tokio::spawn(async move { client.delete(CAL, "meet").await })
    };

    while !client.is_busy() {
        tokio::task::yield_now().await;
    }

    let err = client.delete(CAL, "meet").await.unwrap_err();
    assert!(matches!(err, ConfEditError::Busy));

    release.notify_one();
    first.await.unwrap().unwrap();

    assert!(!client.is_busy());
    assert_eq!(client.backend().inner.patches().len(), 1);
}
