use anyhow::Result;
use confedit_core::backend::CalendarBackend;
use owo_colors::OwoColorize;

use crate::commands::Context;
use crate::render::Render;
use crate::utils::tui;

pub async fn run(ctx: &Context, calendar_id: &str, event_id: &str, json: bool) -> Result<()> {
    let provider = ctx.client.backend();

    // Bare JSON, suitable for piping into `confedit edit --json -`
    if json {
        let data = provider
            .get_conference_data(calendar_id, event_id)
            .await?
            .unwrap_or_default();
        println!("{}", data.to_pretty_json()?);
        return Ok(());
    }

    let event = tui::with_spinner(
        "Fetching event...",
        provider.get_event(calendar_id, event_id),
    )
    .await?;

    println!("{}", event.render());

    if let Some(data) = event.conference() {
        println!("\n{}", "conferenceData:".dimmed());
        println!("{}", data.to_pretty_json()?);
    }

    Ok(())
}
