use anyhow::Result;
use confedit_core::backend::CalendarBackend;
use owo_colors::OwoColorize;

use crate::commands::Context;
use crate::render::Render;
use crate::utils::tui;

pub async fn run(ctx: &Context) -> Result<()> {
    let calendars = tui::with_spinner(
        "Fetching calendars...",
        ctx.client.backend().list_calendars(),
    )
    .await?;

    if calendars.is_empty() {
        println!("{}", "No calendars found".dimmed());
        return Ok(());
    }

    for calendar in &calendars {
        if calendar.id == ctx.config.default_calendar {
            println!("{} {}", calendar.render(), "(default)".green());
        } else {
            println!("{}", calendar.render());
        }
    }

    Ok(())
}
