//! TUI rendering traits for confedit types.
//!
//! Extension traits that add colored terminal rendering to confedit-core
//! types using owo_colors.

use confedit_core::event::{CalendarSummary, EventRecord, EventSummary};
use confedit_core::{ConferenceData, EditSession, FormField};
use owo_colors::OwoColorize;

pub trait Render {
    fn render(&self) -> String;
}

impl Render for CalendarSummary {
    fn render(&self) -> String {
        format!("📅 {} {}", self.summary, self.id.dimmed())
    }
}

impl Render for EventSummary {
    fn render(&self) -> String {
        let time = self.start.with_timezone(&chrono::Local).format("%a %b %-d %H:%M");
        let meeting = match self.conference_url() {
            Some(url) => format!("🎥 {}", url).green().to_string(),
            None => "no conference".dimmed().to_string(),
        };
        format!(
            "{} {}  {}\n    {} {}",
            time,
            self.summary.bold(),
            meeting,
            "id:".dimmed(),
            self.id.dimmed()
        )
    }
}

impl Render for ConferenceData {
    fn render(&self) -> String {
        let mut lines = vec![format!("{} {}", "Solution:".dimmed(), self.solution_name())];
        if let Some(id) = &self.conference_id {
            lines.push(format!("{} {}", "Conference ID:".dimmed(), id));
        }
        for entry_point in &self.entry_points {
            let label = entry_point
                .label
                .as_deref()
                .map(|l| format!(" ({})", l))
                .unwrap_or_default();
            lines.push(format!(
                "{} {}{}",
                format!("{}:", entry_point.entry_point_type).dimmed(),
                entry_point.uri,
                label
            ));
        }
        if let Some(notes) = &self.notes {
            lines.push(format!("{} {}", "Notes:".dimmed(), notes));
        }
        lines.join("\n")
    }
}

impl Render for EventRecord {
    fn render(&self) -> String {
        let title = if self.summary.is_empty() {
            "(No title)"
        } else {
            self.summary.as_str()
        };
        let conference = match self.conference() {
            Some(data) => indent(&data.render()),
            None => indent(&"No conference data".dimmed().to_string()),
        };
        format!("{}\n{}", title.bold(), conference)
    }
}

impl Render for EditSession {
    fn render(&self) -> String {
        let form = self.form();
        let mut lines = Vec::new();

        let heading = if self.is_new() {
            "New conference"
        } else {
            "Conference"
        };
        let heading = if self.is_dirty() {
            format!("{} {}", heading.bold(), "(modified)".yellow())
        } else {
            heading.bold().to_string()
        };
        lines.push(heading);

        for field in FormField::ALL {
            let value = form.get(field);
            let value = if value.is_empty() {
                "(empty)".dimmed().to_string()
            } else {
                value.to_string()
            };
            let label = format!("{}:", field.label());
            lines.push(format!("  {:<14} {}", label.dimmed(), value));
        }

        if let Some(err) = self.parse_error() {
            lines.push(format!("  {} {}", "✗".red(), err.red()));
        }
        for issue in &self.validation().errors {
            lines.push(format!("  {} {}", "✗".red(), issue.message.red()));
        }
        for warning in self.warnings() {
            lines.push(format!("  {} {}", "!".yellow(), warning.yellow()));
        }

        lines.join("\n")
    }
}

pub fn indent(text: &str) -> String {
    text.lines()
        .map(|line| format!("   {}", line))
        .collect::<Vec<_>>()
        .join("\n")
}
