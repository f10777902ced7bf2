//! Edit an event's conference data, either from flags or interactively.

use std::io::Read;

use anyhow::{Context as _, Result};
use clap::Args;
use confedit_core::payload::{EventPatch, PatchOptions, build_patch_payload};
use confedit_core::{EditSession, FormField};
use dialoguer::{Confirm, Editor, Input, Select};
use owo_colors::OwoColorize;

use crate::commands::Context;
use crate::render::{Render, indent};
use crate::utils::tui;

#[derive(Args, Debug, Default)]
pub struct EditArgs {
    /// Conference solution name (e.g. "Google Meet")
    #[arg(long)]
    pub name: Option<String>,

    /// Video entry point URI
    #[arg(long)]
    pub uri: Option<String>,

    /// Video entry point label
    #[arg(long)]
    pub label: Option<String>,

    /// Solution icon URI
    #[arg(long)]
    pub icon_uri: Option<String>,

    #[arg(long)]
    pub conference_id: Option<String>,

    /// Replace the whole record with JSON from a file ("-" reads stdin).
    /// Field flags are applied on top.
    #[arg(long, value_name = "FILE")]
    pub json: Option<String>,

    /// Print the payload that would be sent instead of saving
    #[arg(long)]
    pub dry_run: bool,
}

impl EditArgs {
    fn field_values(&self) -> Vec<(FormField, &str)> {
        [
            (FormField::ConferenceId, &self.conference_id),
            (FormField::Name, &self.name),
            (FormField::IconUri, &self.icon_uri),
            (FormField::EntryPointUri, &self.uri),
            (FormField::EntryPointLabel, &self.label),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.as_deref().map(|v| (field, v)))
        .collect()
    }

    fn is_batch(&self) -> bool {
        self.json.is_some() || !self.field_values().is_empty()
    }
}

pub async fn run(
    ctx: &Context,
    calendar_id: &str,
    event_id: &str,
    args: EditArgs,
) -> Result<()> {
    let session = tui::with_spinner(
        "Fetching conference data...",
        ctx.client.open_session(
            calendar_id,
            event_id,
            ctx.config.validator(),
            ctx.config.debounce(),
        ),
    )
    .await?;

    if args.is_batch() {
        run_batch(ctx, calendar_id, event_id, session, &args).await
    } else {
        run_interactive(ctx, calendar_id, event_id, session).await
    }
}

async fn run_batch(
    ctx: &Context,
    calendar_id: &str,
    event_id: &str,
    mut session: EditSession,
    args: &EditArgs,
) -> Result<()> {
    let json = args.json.as_deref().map(read_json).transpose()?;
    apply_edits(&mut session, json.as_deref(), &args.field_values())?;

    print_warnings(&session);

    if args.dry_run {
        let patch = EventPatch::replace(build_patch_payload(&session)?);
        let query = PatchOptions::conference()
            .query_pairs()
            .into_iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");
        let request = format!("PATCH {}/{}?{}", calendar_id, event_id, query);
        println!("{}", request.dimmed());
        println!("{}", serde_json::to_string_pretty(&patch)?);
        return Ok(());
    }

    save(ctx, calendar_id, event_id, &session).await
}

/// Applies `--json` and then the field flags. A field edit regenerates the
/// text from the last good record, so JSON that didn't parse must stop here.
fn apply_edits(
    session: &mut EditSession,
    json: Option<&str>,
    fields: &[(FormField, &str)],
) -> Result<()> {
    if let Some(text) = json {
        session.set_text(text);
        if let Some(err) = session.parse_error() {
            anyhow::bail!("{}. Nothing was saved", err);
        }
    }
    for (field, value) in fields {
        session.set_field(*field, value);
    }
    Ok(())
}

fn read_json(source: &str) -> Result<String> {
    if source == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read JSON from stdin")?;
        Ok(text)
    } else {
        std::fs::read_to_string(source).with_context(|| format!("Failed to read {}", source))
    }
}

const ACTIONS: [&str; 5] = [
    "Edit field",
    "Edit JSON",
    "Save",
    "Remove conference",
    "Cancel",
];

async fn run_interactive(
    ctx: &Context,
    calendar_id: &str,
    event_id: &str,
    mut session: EditSession,
) -> Result<()> {
    loop {
        println!("\n{}\n", session.render());

        let ready = session.is_submittable() && session.is_dirty();
        let action = Select::new()
            .with_prompt("What next?")
            .items(&ACTIONS)
            .default(if ready { 2 } else { 0 })
            .interact()?;

        match action {
            0 => edit_field(&mut session)?,
            1 => edit_json(&mut session)?,
            2 => {
                if let Some(reason) = session.error_message() {
                    println!("{} {}", "Can't save:".red(), reason.red());
                    continue;
                }
                // A failed save leaves the session as it was, so the user can retry
                match save(ctx, calendar_id, event_id, &session).await {
                    Ok(()) => return Ok(()),
                    Err(e) => println!("{} {:#}", "Save failed:".red(), e),
                }
            }
            3 => {
                if session.is_new() {
                    println!("{}", "This event has no conference to remove".dimmed());
                    continue;
                }
                let confirmed = Confirm::new()
                    .with_prompt("Remove the conference from this event?")
                    .default(false)
                    .interact()?;
                if !confirmed {
                    continue;
                }
                match tui::with_spinner(
                    "Removing conference...",
                    ctx.client.delete(calendar_id, event_id),
                )
                .await
                {
                    Ok(event) => {
                        println!("{}", "Conference removed.".green());
                        println!("{}", event.render());
                        return Ok(());
                    }
                    Err(e) => println!("{} {}", "Remove failed:".red(), e),
                }
            }
            _ => {
                if session.is_dirty() {
                    let discard = Confirm::new()
                        .with_prompt("Discard your changes?")
                        .default(false)
                        .interact()?;
                    if !discard {
                        continue;
                    }
                }
                println!("{}", "Nothing changed".dimmed());
                return Ok(());
            }
        }
    }
}

fn edit_field(session: &mut EditSession) -> Result<()> {
    let form = session.form();
    let items: Vec<String> = FormField::ALL
        .iter()
        .map(|field| format!("{:<14} {}", field.label(), form.get(*field)))
        .collect();

    let index = Select::new()
        .with_prompt("Field")
        .items(&items)
        .default(0)
        .interact()?;
    let field = FormField::ALL[index];

    let value: String = Input::new()
        .with_prompt(format!("  {}", field.label()))
        .with_initial_text(form.get(field))
        .allow_empty(true)
        .interact_text()?;

    session.set_field(field, value.trim());
    Ok(())
}

fn edit_json(session: &mut EditSession) -> Result<()> {
    let edited = Editor::new()
        .extension(".json")
        .edit(session.text())
        .context("Failed to run editor")?;

    match edited {
        Some(text) => {
            session.set_text(&text);
            if let Some(err) = session.parse_error() {
                println!("{}", indent(&err.red().to_string()));
            }
        }
        None => println!("{}", "Editor closed without saving".dimmed()),
    }
    Ok(())
}

async fn save(
    ctx: &Context,
    calendar_id: &str,
    event_id: &str,
    session: &EditSession,
) -> Result<()> {
    tracing::debug!(calendar_id, event_id, new = session.is_new(), "Saving conference");
    let event = tui::with_spinner(
        "Saving conference...",
        ctx.client.submit(calendar_id, event_id, session),
    )
    .await?;

    println!("{}", "Conference saved.".green());
    println!("{}", event.render());
    Ok(())
}

fn print_warnings(session: &EditSession) {
    for warning in session.warnings() {
        println!("{} {}", "!".yellow(), warning.yellow());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use confedit_core::ConferenceData;

    #[test]
    fn only_given_flags_are_applied() {
        let args = EditArgs {
            uri: Some("https://meet.example/x".into()),
            label: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(
            args.field_values(),
            vec![
                (FormField::EntryPointUri, "https://meet.example/x"),
                (FormField::EntryPointLabel, ""),
            ]
        );
        assert!(args.is_batch());
        assert!(!EditArgs::default().is_batch());
    }

    #[test]
    fn flags_apply_on_top_of_json() {
        let mut session = EditSession::load(None);
        let args = EditArgs {
            uri: Some("https://zoom.example/j/1".into()),
            ..Default::default()
        };
        apply_edits(
            &mut session,
            Some(r#"{"conferenceSolution": {"name": "Zoom", "key": {"type": "addOn"}}, "entryPoints": []}"#),
            &args.field_values(),
        )
        .unwrap();

        assert_eq!(session.form().name, "Zoom");
        assert_eq!(session.form().entry_point_uri, "https://zoom.example/j/1");
        assert!(session.is_submittable());
    }

    #[test]
    fn malformed_json_is_not_hidden_by_field_flags() {
        let meet: ConferenceData = serde_json::from_str(
            r#"{
                "conferenceSolution": {"name": "Google Meet", "key": {"type": "hangoutsMeet"}},
                "entryPoints": [{"entryPointType": "video", "uri": "https://meet.google.com/old"}]
            }"#,
        )
        .unwrap();
        let mut session = EditSession::load(Some(meet));
        let args = EditArgs {
            label: Some("join".into()),
            ..Default::default()
        };

        let err = apply_edits(
            &mut session,
            Some(r#"{"conferenceSolution": {"name": "Zoom"}, BROKEN"#),
            &args.field_values(),
        )
        .unwrap_err();

        assert!(err.to_string().contains("Could not parse conference data"));
        assert!(session.parse_error().is_some());
        assert!(!session.is_submittable());
        assert_eq!(session.form().entry_point_label, "");
    }
}
