use anyhow::Result;
use confedit_core::ConfEditError;
use confedit_core::event::{EventRecord, EventSummary};
use confedit_core::protocol::ListEvents;
use serde_json::Value;

use crate::convert::FromGoogle;
use crate::events_api::{EventsApi, ListQuery};
use crate::session::Session;

pub async fn handle(params: serde_json::Value) -> Result<serde_json::Value> {
    let cmd: ListEvents = serde_json::from_value(params)?;

    if cmd.calendar_id.trim().is_empty() {
        return Err(ConfEditError::Validation("Calendar ID is required".into()).into());
    }

    let session = Session::load_valid(&cmd.account).await?;
    let api = EventsApi::new(&session);
    let query = ListQuery {
        from: &cmd.from,
        to: &cmd.to,
        query: cmd.query.as_deref(),
        page_size: cmd.max_results,
    };

    let mut events = Vec::new();
    let mut page_token: Option<String> = None;
    loop {
        let page = api
            .list_page(&cmd.calendar_id, &query, page_token.as_deref())
            .await?;
        collect_summaries(page.items, &mut events, cmd.max_results);

        // Cancelled and all-day events are filtered out, so a full page can
        // still leave us short.
        match page.next_page_token {
            Some(token) if events.len() < cmd.max_results => page_token = Some(token),
            _ => break,
        }
    }

    tracing::debug!(count = events.len(), "Listed events");
    Ok(serde_json::to_value(events)?)
}

/// Adds listable events from one page until `limit` is reached. An event we
/// can't read is skipped so it doesn't hide the rest of the listing.
fn collect_summaries(items: Vec<Value>, events: &mut Vec<EventSummary>, limit: usize) {
    for item in items {
        if events.len() >= limit {
            break;
        }
        let record = match EventRecord::from_google(item) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("Skipping unreadable event: {:#}", e);
                continue;
            }
        };
        if let Some(summary) = EventSummary::from_record(record) {
            events.push(summary);
        }
    }
}
