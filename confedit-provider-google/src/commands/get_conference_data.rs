use anyhow::Result;
use confedit_core::ConferenceData;
use confedit_core::protocol::GetConferenceData;

use crate::commands::require_ids;
use crate::events_api::EventsApi;
use crate::session::Session;

pub async fn handle(params: serde_json::Value) -> Result<serde_json::Value> {
    let cmd: GetConferenceData = serde_json::from_value(params)?;
    require_ids(&cmd.calendar_id, &cmd.event_id)?;

    let session = Session::load_valid(&cmd.account).await?;
    let event = EventsApi::new(&session)
        .get(&cmd.calendar_id, &cmd.event_id)
        .await?;

    // Events without a conference answer with an empty placeholder
    let data = event.conference_data.unwrap_or_default();
    Ok(serde_json::to_value(data)?)
}
