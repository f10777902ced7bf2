//! Defines the JSON protocol used for communication between confedit
//! and provider binaries over stdin/stdout.
//!
//! Every operation has its own typed request struct, and the response type is
//! fixed by `ProviderCommand::Response`.

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::conference::ConferenceData;
use crate::error::{ConfEditError, ErrorKind};
use crate::event::{CalendarSummary, EventRecord, EventSummary};

pub trait ProviderCommand: Serialize {
    type Response: DeserializeOwned;
    fn command() -> Command;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    AuthInit,
    AuthSubmit,
    ListCalendars,
    ListEvents,
    GetEvent,
    GetConferenceData,
    UpdateConferenceData,
    DeleteConferenceData,
}

/// Request sent from CLI to provider.
#[derive(Debug, Serialize, Deserialize)]
pub struct Request {
    pub command: Command,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Response sent from provider to CLI.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response<T> {
    Success {
        data: T,
    },
    Error {
        error: String,
        #[serde(default)]
        kind: ErrorKind,
    },
}

impl<T: Serialize> Response<T> {
    pub fn success(data: T) -> String {
        serde_json::to_string(&Response::Success { data }).unwrap_or_else(|e| {
            Response::<()>::error(
                &format!("Failed to serialize response: {}", e),
                ErrorKind::Provider,
            )
        })
    }
}

impl Response<()> {
    pub fn error(msg: &str, kind: ErrorKind) -> String {
        serde_json::json!({
            "status": "error",
            "error": msg,
            "kind": kind,
        })
        .to_string()
    }
}

impl<T> Response<T> {
    pub fn into_result(self) -> Result<T, ConfEditError> {
        match self {
            Response::Success { data } => Ok(data),
            Response::Error { error, kind } => Err(ConfEditError::from_kind(kind, error)),
        }
    }
}

// ============================================================================
// Auth
// ============================================================================

/// Ask the provider where the user should grant access.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthInit {
    pub redirect_uri: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthInitResponse {
    pub authorization_url: String,
    pub state: String,
    pub scopes: Vec<String>,
}

impl ProviderCommand for AuthInit {
    type Response = AuthInitResponse;
    fn command() -> Command {
        Command::AuthInit
    }
}

/// Complete authentication with the code from the redirect.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthSubmit {
    pub code: String,
    pub state: String,
    pub redirect_uri: String,
}

impl ProviderCommand for AuthSubmit {
    type Response = String; // Account identifier (e.g., email)
    fn command() -> Command {
        Command::AuthSubmit
    }
}

// ============================================================================
// Calendars and events
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ListCalendars {
    pub account: String,
}

impl ProviderCommand for ListCalendars {
    type Response = Vec<CalendarSummary>;
    fn command() -> Command {
        Command::ListCalendars
    }
}

/// List events within a time range.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListEvents {
    pub account: String,
    pub calendar_id: String,
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    pub max_results: usize,
}

impl ProviderCommand for ListEvents {
    type Response = Vec<EventSummary>;
    fn command() -> Command {
        Command::ListEvents
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GetEvent {
    pub account: String,
    pub calendar_id: String,
    pub event_id: String,
}

impl ProviderCommand for GetEvent {
    type Response = EventRecord;
    fn command() -> Command {
        Command::GetEvent
    }
}

/// The event's conference data, `{"entryPoints": []}` when it has none.
#[derive(Debug, Serialize, Deserialize)]
pub struct GetConferenceData {
    pub account: String,
    pub calendar_id: String,
    pub event_id: String,
}

impl ProviderCommand for GetConferenceData {
    type Response = ConferenceData;
    fn command() -> Command {
        Command::GetConferenceData
    }
}

/// Replace an event's conference data.
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateConferenceData {
    pub account: String,
    pub calendar_id: String,
    pub event_id: String,
    pub conference_data: ConferenceData,
    pub conference_data_version: u8,
}

impl ProviderCommand for UpdateConferenceData {
    type Response = EventRecord;
    fn command() -> Command {
        Command::UpdateConferenceData
    }
}

/// Clear an event's conference data.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteConferenceData {
    pub account: String,
    pub calendar_id: String,
    pub event_id: String,
    pub conference_data_version: u8,
}

impl ProviderCommand for DeleteConferenceData {
    type Response = EventRecord;
    fn command() -> Command {
        Command::DeleteConferenceData
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_response_carries_kind() {
        let line = Response::<()>::error("Event e1 not found", ErrorKind::NotFound);
        let response: Response<EventRecord> = serde_json::from_str(&line).unwrap();

        let err = response.into_result().unwrap_err();
        assert!(matches!(err, ConfEditError::NotFound(msg) if msg == "Event e1 not found"));
    }

    #[test]
    fn error_without_kind_is_provider_error() {
        let response: Response<()> =
            serde_json::from_value(json!({"status": "error", "error": "boom"})).unwrap();
        assert!(matches!(
            response.into_result(),
            Err(ConfEditError::Provider(msg)) if msg == "boom"
        ));
    }

    #[test]
    fn success_response_round_trips() {
        let line = Response::success(vec![CalendarSummary {
            id: "primary".into(),
            summary: "Work".into(),
        }]);
        let response: Response<Vec<CalendarSummary>> = serde_json::from_str(&line).unwrap();
        assert_eq!(response.into_result().unwrap()[0].summary, "Work");
    }

    #[test]
    fn request_command_names() {
        let request = Request {
            command: DeleteConferenceData::command(),
            params: json!({}),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["command"], "delete_conference_data");
    }
}
