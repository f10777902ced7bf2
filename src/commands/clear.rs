use anyhow::Result;
use dialoguer::Confirm;
use owo_colors::OwoColorize;

use crate::commands::Context;
use crate::render::Render;
use crate::utils::tui;

pub async fn run(ctx: &Context, calendar_id: &str, event_id: &str, yes: bool) -> Result<()> {
    if !yes {
        let confirmed = Confirm::new()
            .with_prompt("Remove the conference from this event?")
            .default(false)
            .interact()?;
        if !confirmed {
            println!("{}", "Nothing changed".dimmed());
            return Ok(());
        }
    }

    let event = tui::with_spinner(
        "Removing conference...",
        ctx.client.delete(calendar_id, event_id),
    )
    .await?;

    println!("{}", "Conference removed.".green());
    println!("{}", event.render());

    Ok(())
}
