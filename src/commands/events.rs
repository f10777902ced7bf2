use anyhow::Result;
use confedit_core::backend::CalendarBackend;
use confedit_core::window::EventWindow;
use owo_colors::OwoColorize;

use crate::commands::Context;
use crate::render::Render;
use crate::utils::tui;

pub async fn run(
    ctx: &Context,
    calendar_id: &str,
    window: &EventWindow,
    query: Option<&str>,
) -> Result<()> {
    let events = tui::with_spinner(
        "Fetching events...",
        ctx.client
            .backend()
            .list_upcoming_events(calendar_id, window, query),
    )
    .await?;

    if events.is_empty() {
        println!("{}", "No upcoming events found".dimmed());
        return Ok(());
    }

    for event in &events {
        println!("{}", event.render());
    }

    println!(
        "\n{}",
        "Run `confedit edit <id>` to change an event's conference.".dimmed()
    );

    Ok(())
}
