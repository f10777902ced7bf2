//! Replace an event's conference data.

use anyhow::Result;
use confedit_core::payload::{EventPatch, PatchOptions};
use confedit_core::protocol::UpdateConferenceData;

use crate::commands::require_ids;
use crate::events_api::EventsApi;
use crate::session::Session;

pub async fn handle(params: serde_json::Value) -> Result<serde_json::Value> {
    let cmd: UpdateConferenceData = serde_json::from_value(params)?;
    require_ids(&cmd.calendar_id, &cmd.event_id)?;

    let options = PatchOptions {
        conference_data_version: cmd.conference_data_version,
    };

    let session = Session::load_valid(&cmd.account).await?;
    let event = EventsApi::new(&session)
        .patch(
            &cmd.calendar_id,
            &cmd.event_id,
            &EventPatch::replace(cmd.conference_data),
            options,
        )
        .await?;

    Ok(serde_json::to_value(event)?)
}
