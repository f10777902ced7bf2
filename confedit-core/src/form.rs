//! The structured (form) view of a conference record.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::conference::ConferenceData;

/// The editable projection of a `ConferenceData`.
///
/// Empty strings stand for absent optional values, the same way an empty
/// input box does.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConferenceForm {
    pub conference_id: String,
    pub name: String,
    pub icon_uri: String,
    pub entry_point_uri: String,
    pub entry_point_label: String,
}

/// A single input of the conference form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    ConferenceId,
    Name,
    IconUri,
    EntryPointUri,
    EntryPointLabel,
}

impl FormField {
    pub const ALL: [FormField; 5] = [
        FormField::ConferenceId,
        FormField::Name,
        FormField::IconUri,
        FormField::EntryPointUri,
        FormField::EntryPointLabel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FormField::ConferenceId => "conference_id",
            FormField::Name => "name",
            FormField::IconUri => "icon_uri",
            FormField::EntryPointUri => "uri",
            FormField::EntryPointLabel => "label",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FormField::ConferenceId => "Conference ID",
            FormField::Name => "Solution name",
            FormField::IconUri => "Icon URI",
            FormField::EntryPointUri => "Video URI",
            FormField::EntryPointLabel => "Video label",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "conference_id" | "conferenceId" | "id" => Ok(FormField::ConferenceId),
            "name" => Ok(FormField::Name),
            "icon_uri" | "iconUri" | "icon" => Ok(FormField::IconUri),
            "uri" | "entry_point_uri" | "entryPointUri" => Ok(FormField::EntryPointUri),
            "label" | "entry_point_label" | "entryPointLabel" => Ok(FormField::EntryPointLabel),
            _ => Err(format!(
                "Unknown field '{}'. Expected one of: {}",
                s,
                FormField::ALL.map(|f| f.as_str()).join(", ")
            )),
        }
    }
}

impl ConferenceForm {
    /// Project a record onto the form fields. Only the first `video` entry
    /// point is editable.
    pub fn project(data: &ConferenceData) -> Self {
        let solution = data.conference_solution.as_ref();
        let video = data.video_entry_point();

        ConferenceForm {
            conference_id: data.conference_id.clone().unwrap_or_default(),
            name: solution.map(|s| s.name.clone()).unwrap_or_default(),
            icon_uri: solution
                .and_then(|s| s.icon_uri.clone())
                .unwrap_or_default(),
            entry_point_uri: video.map(|ep| ep.uri.clone()).unwrap_or_default(),
            entry_point_label: video.and_then(|ep| ep.label.clone()).unwrap_or_default(),
        }
    }

    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::ConferenceId => &self.conference_id,
            FormField::Name => &self.name,
            FormField::IconUri => &self.icon_uri,
            FormField::EntryPointUri => &self.entry_point_uri,
            FormField::EntryPointLabel => &self.entry_point_label,
        }
    }
}

/// Write one form value back into the record it was projected from.
pub fn apply_field(data: &mut ConferenceData, field: FormField, value: &str) {
    match field {
        FormField::ConferenceId => data.conference_id = non_empty(value),
        FormField::Name => data.solution_mut().name = value.to_string(),
        FormField::IconUri => data.solution_mut().icon_uri = non_empty(value),
        FormField::EntryPointUri => data.video_entry_point_mut().uri = value.to_string(),
        FormField::EntryPointLabel => data.video_entry_point_mut().label = non_empty(value),
    }
}

pub(crate) fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conference::EntryPointType;

    #[test]
    fn apply_then_project_is_identity() {
        let mut data = ConferenceData::new_default();
        for (field, value) in [
            (FormField::ConferenceId, "abc"),
            (FormField::Name, "Meet"),
            (FormField::IconUri, "https://fonts.gstatic.com/icon.png"),
            (FormField::EntryPointUri, "https://meet.example/x"),
            (FormField::EntryPointLabel, "meet.example/x"),
        ] {
            apply_field(&mut data, field, value);
            assert_eq!(ConferenceForm::project(&data).get(field), value);
        }
    }

    #[test]
    fn clearing_optional_fields_removes_them() {
        let mut data = ConferenceData::new_default();
        apply_field(&mut data, FormField::EntryPointLabel, "label");
        apply_field(&mut data, FormField::EntryPointLabel, "");
        assert_eq!(data.entry_points[0].label, None);
    }

    #[test]
    fn editing_uri_on_record_without_video_adds_one() {
        let mut data = ConferenceData::default();
        data.entry_points.push(crate::conference::EntryPoint {
            entry_point_type: EntryPointType::Sip,
            uri: "sip:room@example.com".into(),
            label: None,
            extra: Default::default(),
        });

        apply_field(&mut data, FormField::EntryPointUri, "https://a");

        assert_eq!(data.entry_points.len(), 2);
        assert_eq!(data.entry_points[0].uri, "sip:room@example.com");
        assert_eq!(data.video_entry_point().unwrap().uri, "https://a");
    }

    #[test]
    fn parse_field_names() {
        assert_eq!("uri".parse::<FormField>().unwrap(), FormField::EntryPointUri);
        assert_eq!("iconUri".parse::<FormField>().unwrap(), FormField::IconUri);
        assert!("colour".parse::<FormField>().is_err());
    }
}
