//! Building the patch sent to the provider.

use serde::{Serialize, Serializer};

use crate::conference::{
    ConferenceData, ConferenceSolution, ConferenceSolutionKey, CreateConferenceRequest, EntryPoint,
};
use crate::error::{ConfEditError, ConfEditResult};
use crate::form::non_empty;
use crate::session::EditSession;

/// Without `conferenceDataVersion=1` the provider ignores conference edits
/// and may regenerate the meeting link.
pub const CONFERENCE_DATA_VERSION: u8 = 1;

/// Query options for an event patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchOptions {
    pub conference_data_version: u8,
}

impl PatchOptions {
    /// Options for any write that touches conference data.
    pub fn conference() -> Self {
        PatchOptions {
            conference_data_version: CONFERENCE_DATA_VERSION,
        }
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![(
            "conferenceDataVersion",
            self.conference_data_version.to_string(),
        )]
    }
}

/// New value for an event's `conferenceData`.
#[derive(Debug, Clone, PartialEq)]
pub enum ConferencePatch {
    Replace(ConferenceData),
    /// Serializes as an explicit `null`. Leaving the field out of a patch
    /// changes nothing.
    Clear,
}

impl Serialize for ConferencePatch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ConferencePatch::Replace(data) => data.serialize(serializer),
            ConferencePatch::Clear => serializer.serialize_none(),
        }
    }
}

/// Patch body for an event. Only `conferenceData` is ever sent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPatch {
    pub conference_data: ConferencePatch,
}

impl EventPatch {
    pub fn replace(data: ConferenceData) -> Self {
        EventPatch {
            conference_data: ConferencePatch::Replace(data),
        }
    }

    pub fn clear() -> Self {
        EventPatch {
            conference_data: ConferencePatch::Clear,
        }
    }
}

/// The canonical payload for a session: one video entry point and an add-on
/// solution key. Everything else the record held (other entry points, extra
/// fields) is dropped, since the patch replaces the whole subtree.
pub fn build_patch_payload(session: &EditSession) -> ConfEditResult<ConferenceData> {
    if !session.is_submittable() {
        return Err(ConfEditError::Validation(
            session
                .error_message()
                .unwrap_or_else(|| "Conference data is not valid".to_string()),
        ));
    }

    let form = session.form();

    Ok(ConferenceData {
        conference_id: non_empty(&form.conference_id),
        conference_solution: Some(ConferenceSolution {
            name: form.name,
            icon_uri: non_empty(&form.icon_uri),
            key: ConferenceSolutionKey::add_on(),
            extra: Default::default(),
        }),
        entry_points: vec![EntryPoint::video(
            form.entry_point_uri,
            non_empty(&form.entry_point_label),
        )],
        notes: session.record().notes.clone(),
        create_request: session.is_new().then(CreateConferenceRequest::add_on),
        extra: Default::default(),
    })
}
