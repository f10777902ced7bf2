//! Direct calls to the Calendar v3 events resource.
//!
//! The typed `google_calendar` event model has no way to send
//! `conferenceData: null` and drops fields it doesn't know, so event reads,
//! listings and patches go through reqwest with raw JSON.

use anyhow::{Context, Result};
use confedit_core::ConfEditError;
use confedit_core::event::EventRecord;
use confedit_core::payload::{EventPatch, PatchOptions};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::session::Session;

const API_BASE: &str = "https://www.googleapis.com/calendar/v3/";

/// Largest page the events list endpoint hands out.
const MAX_PAGE_SIZE: usize = 2500;

/// Time window and filters for one events listing.
pub struct ListQuery<'a> {
    pub from: &'a str,
    pub to: &'a str,
    pub query: Option<&'a str>,
    pub page_size: usize,
}

impl ListQuery<'_> {
    fn query_pairs(&self, page_token: Option<&str>) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("singleEvents", "true".to_string()),
            ("orderBy", "startTime".to_string()),
            ("timeMin", self.from.to_string()),
            ("timeMax", self.to.to_string()),
            ("maxResults", self.page_size.clamp(1, MAX_PAGE_SIZE).to_string()),
        ];
        if let Some(q) = self.query.filter(|q| !q.trim().is_empty()) {
            pairs.push(("q", q.to_string()));
        }
        if let Some(token) = page_token {
            pairs.push(("pageToken", token.to_string()));
        }
        pairs
    }
}

/// One page of `events.list`. Items stay raw so the caller decides what to
/// do with events it can't read.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventsPage {
    #[serde(default)]
    pub items: Vec<Value>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

pub struct EventsApi {
    http: reqwest::Client,
    access_token: String,
}

impl EventsApi {
    pub fn new(session: &Session) -> Self {
        EventsApi {
            http: reqwest::Client::new(),
            access_token: session.access_token().to_string(),
        }
    }

    pub async fn get(&self, calendar_id: &str, event_id: &str) -> Result<EventRecord> {
        let url = event_url(calendar_id, event_id)?;

        let response = self
            .http
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .context("Failed to fetch event")?;

        read_event(response).await
    }

    pub async fn list_page(
        &self,
        calendar_id: &str,
        query: &ListQuery<'_>,
        page_token: Option<&str>,
    ) -> Result<EventsPage> {
        let url = events_url(calendar_id)?;

        let response = self
            .http
            .get(url)
            .query(&query.query_pairs(page_token))
            .bearer_auth(&self.access_token)
            .send()
            .await
            .context("Failed to fetch events")?;

        let status = response.status();
        let body = response.text().await.context("Failed to read response")?;
        if !status.is_success() {
            return Err(classify_error(status, &body).into());
        }
        serde_json::from_str(&body).context("Failed to parse events page from Google")
    }

    pub async fn patch(
        &self,
        calendar_id: &str,
        event_id: &str,
        patch: &EventPatch,
        options: PatchOptions,
    ) -> Result<EventRecord> {
        let url = event_url(calendar_id, event_id)?;
        tracing::debug!(%url, "Patching event");

        let response = self
            .http
            .patch(url)
            .query(&options.query_pairs())
            .bearer_auth(&self.access_token)
            .json(patch)
            .send()
            .await
            .context("Failed to patch event")?;

        read_event(response).await
    }
}

/// `calendars/{calendarId}/events/{eventId}` with both ids percent-encoded.
fn event_url(calendar_id: &str, event_id: &str) -> Result<Url> {
    api_url(&["calendars", calendar_id, "events", event_id])
}

fn events_url(calendar_id: &str) -> Result<Url> {
    api_url(&["calendars", calendar_id, "events"])
}

fn api_url(segments: &[&str]) -> Result<Url> {
    let mut url = Url::parse(API_BASE)?;
    url.path_segments_mut()
        .map_err(|_| anyhow::anyhow!("Invalid API base URL"))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

async fn read_event(response: reqwest::Response) -> Result<EventRecord> {
    let status = response.status();
    let body = response.text().await.context("Failed to read response")?;

    if !status.is_success() {
        return Err(classify_error(status, &body).into());
    }

    serde_json::from_str(&body).context("Failed to parse event from Google")
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    errors: Vec<ErrorDetail>,
}

#[derive(Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    reason: String,
}

/// Maps a failed API response onto a typed error. The message is Google's
/// own, unmodified, so the user sees exactly what the API rejected.
pub fn classify_error(status: StatusCode, body: &str) -> ConfEditError {
    let (message, reasons) = match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => (
            envelope.error.message,
            envelope
                .error
                .errors
                .into_iter()
                .map(|e| e.reason)
                .collect::<Vec<_>>(),
        ),
        Err(_) => (String::new(), Vec::new()),
    };

    let message = if message.is_empty() {
        format!("Google Calendar API returned {}", status)
    } else {
        message
    };

    let rate_limited = reasons
        .iter()
        .any(|r| r.contains("RateLimit") || r.contains("quota"));

    match status {
        StatusCode::NOT_FOUND | StatusCode::GONE => ConfEditError::NotFound(message),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN if !rate_limited => {
            ConfEditError::Permission(message)
        }
        _ => ConfEditError::Provider(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use confedit_core::error::ErrorKind;

    #[test]
    fn ids_are_percent_encoded() {
        let url = event_url("team@group.calendar.google.com", "abc/def").unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.googleapis.com/calendar/v3/calendars/team@group.calendar.google.com/events/abc%2Fdef"
        );
    }

    #[test]
    fn list_query_caps_page_size_and_skips_blank_search() {
        let query = ListQuery {
            from: "2026-10-17T00:00:00Z",
            to: "2026-11-16T00:00:00Z",
            query: Some("  "),
            page_size: 10_000,
        };
        let pairs = query.query_pairs(Some("next"));

        assert!(pairs.contains(&("maxResults", "2500".to_string())));
        assert!(pairs.contains(&("pageToken", "next".to_string())));
        assert!(pairs.contains(&("singleEvents", "true".to_string())));
        assert!(!pairs.iter().any(|(k, _)| *k == "q"));
    }

    #[test]
    fn events_page_without_items_is_empty() {
        let page: EventsPage = serde_json::from_str(r#"{"kind":"calendar#events"}"#).unwrap();
        assert!(page.items.is_empty());
        assert!(page.next_page_token.is_none());
    }

    #[test]
    fn provider_message_is_kept_verbatim() {
        let body = r#"{"error":{"code":400,"message":"Invalid conference type value.","errors":[{"reason":"invalid"}]}}"#;
        let err = classify_error(StatusCode::BAD_REQUEST, body);
        assert_eq!(err.kind(), ErrorKind::Provider);
        assert_eq!(err.message(), "Invalid conference type value.");
    }

    #[test]
    fn missing_event_is_not_found() {
        let body = r#"{"error":{"code":404,"message":"Not Found","errors":[{"reason":"notFound"}]}}"#;
        assert_eq!(
            classify_error(StatusCode::NOT_FOUND, body).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(classify_error(StatusCode::GONE, "").kind(), ErrorKind::NotFound);
    }

    #[test]
    fn forbidden_is_permission_unless_rate_limited() {
        let denied = r#"{"error":{"code":403,"message":"Forbidden","errors":[{"reason":"forbidden"}]}}"#;
        assert_eq!(
            classify_error(StatusCode::FORBIDDEN, denied).kind(),
            ErrorKind::Permission
        );

        let limited = r#"{"error":{"code":403,"message":"Rate Limit Exceeded","errors":[{"reason":"userRateLimitExceeded"}]}}"#;
        assert_eq!(
            classify_error(StatusCode::FORBIDDEN, limited).kind(),
            ErrorKind::Provider
        );
    }

    #[test]
    fn unparsable_body_falls_back_to_status() {
        let err = classify_error(StatusCode::BAD_GATEWAY, "<html>");
        assert!(err.message().contains("502"));
    }
}
