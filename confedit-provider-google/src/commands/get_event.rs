use anyhow::Result;
use confedit_core::protocol::GetEvent;

use crate::commands::require_ids;
use crate::events_api::EventsApi;
use crate::session::Session;

pub async fn handle(params: serde_json::Value) -> Result<serde_json::Value> {
    let cmd: GetEvent = serde_json::from_value(params)?;
    require_ids(&cmd.calendar_id, &cmd.event_id)?;

    let session = Session::load_valid(&cmd.account).await?;
    let event = EventsApi::new(&session)
        .get(&cmd.calendar_id, &cmd.event_id)
        .await?;

    Ok(serde_json::to_value(event)?)
}
