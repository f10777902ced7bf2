//! Conference data attached to a calendar event.
//!
//! These types mirror the provider's JSON representation (camelCase keys), so
//! a record fetched from the provider can be edited and patched back without
//! losing fields this tool does not understand: anything unknown lands in the
//! `extra` maps and is written back verbatim.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::error::{ConfEditError, ConfEditResult};

/// Solution key type used for conference data managed by this tool.
pub const ADD_ON_KEY_TYPE: &str = "addOn";

/// The conference record for one event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConferenceData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conference_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conference_solution: Option<ConferenceSolution>,
    #[serde(default)]
    pub entry_points: Vec<EntryPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Asks the provider to create conference data for an event that has none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_request: Option<CreateConferenceRequest>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConferenceSolution {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_uri: Option<String>,
    #[serde(default)]
    pub key: ConferenceSolutionKey,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConferenceSolutionKey {
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl ConferenceSolutionKey {
    pub fn add_on() -> Self {
        ConferenceSolutionKey {
            kind: ADD_ON_KEY_TYPE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateConferenceRequest {
    pub request_id: String,
    pub conference_solution_key: ConferenceSolutionKey,
    /// Provider-populated status and anything else we don't model
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CreateConferenceRequest {
    /// A create request with a freshly generated request id.
    pub fn add_on() -> Self {
        CreateConferenceRequest {
            request_id: uuid::Uuid::new_v4().to_string(),
            conference_solution_key: ConferenceSolutionKey::add_on(),
            extra: Map::new(),
        }
    }
}

/// One way of joining the conference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryPoint {
    pub entry_point_type: EntryPointType,
    #[serde(default)]
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// pin, passcode, regionCode, ...
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EntryPoint {
    pub fn video(uri: impl Into<String>, label: Option<String>) -> Self {
        EntryPoint {
            entry_point_type: EntryPointType::Video,
            uri: uri.into(),
            label,
            extra: Map::new(),
        }
    }

    pub fn is_video(&self) -> bool {
        self.entry_point_type == EntryPointType::Video
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryPointType {
    Video,
    Phone,
    Sip,
    More,
}

impl fmt::Display for EntryPointType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EntryPointType::Video => "video",
            EntryPointType::Phone => "phone",
            EntryPointType::Sip => "sip",
            EntryPointType::More => "more",
        };
        write!(f, "{}", s)
    }
}

impl ConferenceData {
    /// Starting point for an event without conference data: an empty
    /// add-on solution and one empty video entry point.
    pub fn new_default() -> Self {
        ConferenceData {
            conference_solution: Some(ConferenceSolution {
                key: ConferenceSolutionKey::add_on(),
                ..Default::default()
            }),
            entry_points: vec![EntryPoint::video("", None)],
            ..Default::default()
        }
    }

    /// True for the placeholder the provider returns when an event has no
    /// conference data (`{"entryPoints": []}`).
    pub fn is_empty(&self) -> bool {
        self.conference_id.is_none()
            && self.conference_solution.is_none()
            && self.entry_points.is_empty()
            && self.notes.is_none()
            && self.create_request.is_none()
            && self.extra.is_empty()
    }

    /// The editable entry point: the first `video` one in stored order.
    pub fn video_entry_point(&self) -> Option<&EntryPoint> {
        self.entry_points.iter().find(|ep| ep.is_video())
    }

    /// Mutable access to the editable entry point, appending an empty video
    /// entry point if the record has none.
    pub fn video_entry_point_mut(&mut self) -> &mut EntryPoint {
        let index = match self.entry_points.iter().position(|ep| ep.is_video()) {
            Some(index) => index,
            None => {
                self.entry_points.push(EntryPoint::video("", None));
                self.entry_points.len() - 1
            }
        };
        &mut self.entry_points[index]
    }

    pub fn solution_mut(&mut self) -> &mut ConferenceSolution {
        self.conference_solution
            .get_or_insert_with(|| ConferenceSolution {
                key: ConferenceSolutionKey::add_on(),
                ..Default::default()
            })
    }

    pub fn solution_name(&self) -> &str {
        self.conference_solution
            .as_ref()
            .map(|s| s.name.as_str())
            .unwrap_or("")
    }

    pub fn from_json_str(text: &str) -> ConfEditResult<Self> {
        serde_json::from_str(text).map_err(|e| ConfEditError::Parse(e.to_string()))
    }

    /// Pretty-printed JSON, two-space indented.
    pub fn to_pretty_json(&self) -> ConfEditResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ConfEditError::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn first_video_entry_point_wins() {
        let data: ConferenceData = serde_json::from_value(json!({
            "entryPoints": [
                {"entryPointType": "phone", "uri": "tel:+1-555-0100"},
                {"entryPointType": "video", "uri": "https://a"},
                {"entryPointType": "video", "uri": "https://b"}
            ]
        }))
        .unwrap();

        assert_eq!(data.video_entry_point().unwrap().uri, "https://a");
    }

    #[test]
    fn no_video_entry_point_is_none() {
        let data: ConferenceData = serde_json::from_value(json!({
            "entryPoints": [{"entryPointType": "phone", "uri": "tel:+1-555-0100"}]
        }))
        .unwrap();

        assert!(data.video_entry_point().is_none());
    }

    #[test]
    fn video_entry_point_mut_appends_after_existing() {
        let mut data: ConferenceData = serde_json::from_value(json!({
            "entryPoints": [{"entryPointType": "phone", "uri": "tel:+1-555-0100"}]
        }))
        .unwrap();

        data.video_entry_point_mut().uri = "https://meet.example/x".into();

        assert_eq!(data.entry_points.len(), 2);
        assert_eq!(data.entry_points[0].entry_point_type, EntryPointType::Phone);
        assert_eq!(data.entry_points[1].uri, "https://meet.example/x");
    }

    #[test]
    fn unknown_fields_survive_round_trip() {
        let original = json!({
            "conferenceId": "abc-defg-hij",
            "conferenceSolution": {
                "name": "Google Meet",
                "iconUri": "https://fonts.gstatic.com/s/i/productlogos/meet_2020q4/v6/web-512dp/logo_meet_2020q4_color_2x_web_512dp.png",
                "key": {"type": "hangoutsMeet"}
            },
            "entryPoints": [
                {"entryPointType": "video", "uri": "https://meet.google.com/abc-defg-hij", "label": "meet.google.com/abc-defg-hij"},
                {"entryPointType": "phone", "uri": "tel:+1-555-0100", "pin": "123456", "regionCode": "US"}
            ],
            "signature": "AGirE/..."
        });

        let data: ConferenceData = serde_json::from_value(original.clone()).unwrap();
        assert_eq!(data.extra.get("signature"), Some(&json!("AGirE/...")));
        assert_eq!(serde_json::to_value(&data).unwrap(), original);
    }

    #[test]
    fn placeholder_record_is_empty() {
        let data = ConferenceData::from_json_str(r#"{"entryPoints": []}"#).unwrap();
        assert!(data.is_empty());
        assert!(!ConferenceData::new_default().is_empty());
    }

    #[test]
    fn unknown_entry_point_type_is_a_parse_error() {
        let err = ConferenceData::from_json_str(
            r#"{"entryPoints": [{"entryPointType": "carrier-pigeon", "uri": "x"}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfEditError::Parse(_)));
    }
}
