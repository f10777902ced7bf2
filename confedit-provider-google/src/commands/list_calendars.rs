use anyhow::{Context, Result};
use confedit_core::event::CalendarSummary;
use confedit_core::protocol::ListCalendars;
use google_calendar::types::MinAccessRole;

use crate::convert::FromGoogle;
use crate::session::Session;

pub async fn handle(params: serde_json::Value) -> Result<serde_json::Value> {
    let cmd: ListCalendars = serde_json::from_value(params)?;

    let client = Session::load_valid(&cmd.account).await?.client()?;

    // Conference data can only be edited on calendars we can write to
    let entries = client
        .calendar_list()
        .list_all(MinAccessRole::Writer, false, false)
        .await
        .context("Failed to fetch calendars")?
        .body;

    let mut calendars = Vec::new();
    for entry in entries {
        if let Some(calendar) = Option::<CalendarSummary>::from_google(entry)? {
            calendars.push(calendar);
        }
    }

    Ok(serde_json::to_value(calendars)?)
}
